use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::record::{DecodeError, into_object};

/// Recurring basic charge plan. Only the plan fields are kept; anything
/// else in the payload is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerSchedule {
    pub id: Option<Value>,
    pub charge_start_time: Option<Value>,
    pub charge_stop_time: Option<Value>,
    pub repeat: Option<Value>,
}

impl ChargerSchedule {
    pub fn from_payload(payload: Value) -> Result<Self, DecodeError> {
        let object = into_object(payload)?;
        let field = |key: &str| object.get(key).cloned().filter(|value| !value.is_null());

        Ok(Self {
            id: field("id"),
            charge_start_time: field("chargeStartTime"),
            charge_stop_time: field("chargeStopTime"),
            repeat: field("repeat"),
        })
    }

    pub fn repeats(&self) -> bool {
        self.repeat.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ChargerSchedule;

    #[test]
    fn projects_plan_fields_and_ignores_extras() {
        let schedule = ChargerSchedule::from_payload(json!({
            "id": 12,
            "chargeStartTime": "2021-01-01T22:00:00",
            "chargeStopTime": "2021-01-02T06:00:00",
            "repeat": true,
            "isEnabled": true
        }))
        .expect("schedule must decode");

        assert_eq!(schedule.id, Some(json!(12)));
        assert_eq!(schedule.charge_start_time, Some(json!("2021-01-01T22:00:00")));
        assert_eq!(schedule.charge_stop_time, Some(json!("2021-01-02T06:00:00")));
        assert!(schedule.repeats());
        assert_eq!(
            serde_json::to_value(&schedule).expect("serializable"),
            json!({
                "id": 12,
                "chargeStartTime": "2021-01-01T22:00:00",
                "chargeStopTime": "2021-01-02T06:00:00",
                "repeat": true
            })
        );
    }

    #[test]
    fn missing_fields_stay_empty() {
        let schedule = ChargerSchedule::from_payload(json!({"id": 3})).expect("schedule");

        assert_eq!(schedule.charge_start_time, None);
        assert!(!schedule.repeats());
    }
}
