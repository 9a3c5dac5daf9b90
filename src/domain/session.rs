use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::record::{DecodeError, coerce_f64, into_object, parse_timestamp};

const CONNECTED_FIELD: &str = "carConnected";
const DISCONNECTED_FIELD: &str = "carDisconnected";
const ENERGY_FIELD: &str = "kiloWattHours";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerSession {
    pub car_connected: Option<DateTime<Utc>>,
    pub car_disconnected: Option<DateTime<Utc>>,
    pub kilo_watt_hours: f64,
}

impl ChargerSession {
    pub fn from_payload(payload: Value) -> Result<Self, DecodeError> {
        let object = into_object(payload)?;

        let energy = object
            .get(ENERGY_FIELD)
            .ok_or(DecodeError::MissingField(ENERGY_FIELD))?;

        Ok(Self {
            car_connected: optional_timestamp(&object, CONNECTED_FIELD)?,
            car_disconnected: optional_timestamp(&object, DISCONNECTED_FIELD)?,
            kilo_watt_hours: coerce_f64(energy, ENERGY_FIELD)?,
        })
    }
}

pub fn sessions_newest_first(payload: Value) -> Result<Vec<ChargerSession>, DecodeError> {
    let Value::Array(items) = payload else {
        return Err(DecodeError::InvalidPayloadType);
    };

    let mut sessions = items
        .into_iter()
        .map(ChargerSession::from_payload)
        .collect::<Result<Vec<_>, _>>()?;

    // Stable; sessions without a connect time end up last.
    sessions.sort_by(|left, right| right.car_connected.cmp(&left.car_connected));

    Ok(sessions)
}

fn optional_timestamp(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => parse_timestamp(text, field).map(Some),
        Some(other) => Err(DecodeError::InvalidTimestamp {
            field,
            value: other.to_string(),
        }),
    }
}
