use serde::Serialize;
use serde_json::Value;

use crate::domain::codes::{NodeType, PhaseMode};
use crate::domain::record::{DecodeError, Record, into_object, require, require_code};

const NODE_TYPE_FIELD: &str = "localNodeType";
const PHASE_MODE_FIELD: &str = "phaseMode";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChargerConfig {
    fields: Record,
    #[serde(skip)]
    raw: bool,
}

impl ChargerConfig {
    pub fn from_payload(payload: Value, raw: bool) -> Result<Self, DecodeError> {
        let object = into_object(payload)?;

        if raw {
            return Ok(Self {
                fields: Record::from(object),
                raw,
            });
        }

        let node_code = require_code(require(&object, NODE_TYPE_FIELD)?, NODE_TYPE_FIELD)?;
        let node_type = NodeType::from_code(node_code).ok_or_else(|| DecodeError::UnknownCode {
            field: NODE_TYPE_FIELD,
            code: Value::from(node_code),
        })?;

        let phase_code = require_code(require(&object, PHASE_MODE_FIELD)?, PHASE_MODE_FIELD)?;
        let phase_mode =
            PhaseMode::from_code(phase_code).ok_or_else(|| DecodeError::UnknownCode {
                field: PHASE_MODE_FIELD,
                code: Value::from(phase_code),
            })?;

        let fields = Record::merge(
            object,
            [
                (NODE_TYPE_FIELD, Value::String(node_type.label().to_string())),
                (PHASE_MODE_FIELD, Value::String(phase_mode.label().to_string())),
            ],
        );

        Ok(Self { fields, raw })
    }

    pub fn node_type(&self) -> Option<NodeType> {
        match self.fields.get(NODE_TYPE_FIELD)? {
            Value::String(label) => NodeType::from_label(label),
            other => other.as_i64().and_then(NodeType::from_code),
        }
    }

    pub fn phase_mode(&self) -> Option<PhaseMode> {
        match self.fields.get(PHASE_MODE_FIELD)? {
            Value::String(label) => PhaseMode::from_label(label),
            other => other.as_i64().and_then(PhaseMode::from_code),
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn record(&self) -> &Record {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ChargerConfig;
    use crate::domain::codes::{NodeType, PhaseMode};
    use crate::domain::record::DecodeError;

    #[test]
    fn decodes_node_type_and_phase_mode() {
        let config = ChargerConfig::from_payload(
            json!({"isEnabled": true, "localNodeType": 2, "phaseMode": 3, "maxChargerCurrent": 32}),
            false,
        )
        .expect("config must decode");

        assert_eq!(config.get("localNodeType"), Some(&json!("Extender")));
        assert_eq!(config.get("phaseMode"), Some(&json!("Locked to three phase")));
        assert_eq!(config.get("maxChargerCurrent"), Some(&json!(32)));
        assert_eq!(config.get("isEnabled"), Some(&json!(true)));
        assert_eq!(config.node_type(), Some(NodeType::Extender));
        assert_eq!(config.phase_mode(), Some(PhaseMode::LockedToThreePhase));
    }

    #[test]
    fn raw_mode_preserves_payload() {
        let payload = json!({"localNodeType": 1, "phaseMode": 2, "wiFiSSID": "garage"});

        let config = ChargerConfig::from_payload(payload.clone(), true).expect("raw config");

        assert_eq!(config.record().to_value(), payload);
        assert_eq!(config.phase_mode(), Some(PhaseMode::Auto));
    }

    #[test]
    fn unknown_phase_mode_fails_in_decoded_mode() {
        let result = ChargerConfig::from_payload(json!({"localNodeType": 1, "phaseMode": 4}), false);

        assert_eq!(
            result,
            Err(DecodeError::UnknownCode {
                field: "phaseMode",
                code: json!(4),
            })
        );
    }

    #[test]
    fn missing_node_type_fails_in_decoded_mode() {
        let result = ChargerConfig::from_payload(json!({"phaseMode": 2}), false);

        assert_eq!(result, Err(DecodeError::MissingField("localNodeType")));
    }
}
