use serde::Serialize;
use serde_json::Value;

use crate::domain::codes::{OpMode, describe_reason_for_no_current};
use crate::domain::record::{DecodeError, Record, into_object, require, require_code};

const OP_MODE_FIELD: &str = "chargerOpMode";
const REASON_FIELD: &str = "reasonForNoCurrent";
const RAW_NO_REASON: &str = "none";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChargerState {
    fields: Record,
    #[serde(skip)]
    raw: bool,
}

impl ChargerState {
    /// Decoded mode replaces `chargerOpMode` with its label and renders
    /// `reasonForNoCurrent` as `"(<code>) <label>"`. Raw mode keeps both
    /// codes and only turns a `null` reason into `"none"`.
    pub fn from_payload(payload: Value, raw: bool) -> Result<Self, DecodeError> {
        let object = into_object(payload)?;
        let reason = object.get(REASON_FIELD).cloned().unwrap_or(Value::Null);

        let fields = if raw {
            let reason = match reason {
                Value::Null => Value::String(RAW_NO_REASON.to_string()),
                other => other,
            };
            Record::merge(object, [(REASON_FIELD, reason)])
        } else {
            let code = require_code(require(&object, OP_MODE_FIELD)?, OP_MODE_FIELD)?;
            let mode = OpMode::from_code(code).ok_or_else(|| DecodeError::UnknownCode {
                field: OP_MODE_FIELD,
                code: Value::from(code),
            })?;
            let reason = describe_reason_for_no_current(&reason);

            Record::merge(
                object,
                [
                    (OP_MODE_FIELD, Value::String(mode.label().to_string())),
                    (REASON_FIELD, Value::String(reason)),
                ],
            )
        };

        Ok(Self { fields, raw })
    }

    pub fn op_mode(&self) -> Option<OpMode> {
        match self.fields.get(OP_MODE_FIELD)? {
            Value::String(label) => OpMode::from_label(label),
            other => other.as_i64().and_then(OpMode::from_code),
        }
    }

    pub fn reason_for_no_current(&self) -> Option<&Value> {
        self.fields.get(REASON_FIELD)
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

    use super::ChargerState;
    use crate::domain::codes::OpMode;
    use crate::domain::record::DecodeError;

    #[test]
    fn decodes_op_mode_and_reason() {
        let state = ChargerState::from_payload(
            json!({"chargerOpMode": 3, "reasonForNoCurrent": 0, "totalPower": 7.2}),
            false,
        )
        .expect("state must decode");

        assert_eq!(state.get("chargerOpMode"), Some(&json!("CHARGING")));
        assert_eq!(
            state.get("reasonForNoCurrent"),
            Some(&json!("(0) No reason, charging or ready to charge"))
        );
        assert_eq!(state.get("totalPower"), Some(&json!(7.2)));
        assert_eq!(state.op_mode(), Some(OpMode::Charging));
    }

    #[test]
    fn decodes_every_known_op_mode() {
        let labels = [
            "OFFLINE",
            "DISCONNECTED",
            "AWAITING_START",
            "CHARGING",
            "COMPLETED",
            "ERROR",
            "READY_TO_CHARGE",
        ];

        for (code, label) in labels.iter().enumerate() {
            let state = ChargerState::from_payload(
                json!({"chargerOpMode": code, "reasonForNoCurrent": null}),
                false,
            )
            .expect("state must decode");
            assert_eq!(state.get("chargerOpMode"), Some(&json!(label)));
        }
    }

    #[test]
    fn unknown_op_mode_fails_in_decoded_mode() {
        let result = ChargerState::from_payload(
            json!({"chargerOpMode": 9, "reasonForNoCurrent": 0}),
            false,
        );

        assert_eq!(
            result,
            Err(DecodeError::UnknownCode {
                field: "chargerOpMode",
                code: json!(9),
            })
        );
    }

    #[test]
    fn unknown_reason_keeps_code_with_unknown_label() {
        let state = ChargerState::from_payload(
            json!({"chargerOpMode": 1, "reasonForNoCurrent": 77}),
            false,
        )
        .expect("state must decode");

        assert_eq!(state.get("reasonForNoCurrent"), Some(&json!("(77) Unknown")));
    }

    #[test]
    fn null_reason_decodes_to_no_reason() {
        let state = ChargerState::from_payload(
            json!({"chargerOpMode": 1, "reasonForNoCurrent": null}),
            false,
        )
        .expect("state must decode");

        assert_eq!(state.get("reasonForNoCurrent"), Some(&json!("No reason")));
    }

    #[test]
    fn raw_mode_keeps_codes_and_normalizes_null_reason() {
        let state = ChargerState::from_payload(
            json!({"chargerOpMode": 9, "reasonForNoCurrent": null, "voltage": 231.4}),
            true,
        )
        .expect("raw state must not decode codes");

        assert!(state.is_raw());
        assert_eq!(state.get("chargerOpMode"), Some(&json!(9)));
        assert_eq!(state.get("reasonForNoCurrent"), Some(&json!("none")));
        assert_eq!(state.get("voltage"), Some(&json!(231.4)));
        assert_eq!(state.op_mode(), None);
    }

    #[test]
    fn raw_mode_keeps_numeric_reason() {
        let state = ChargerState::from_payload(
            json!({"chargerOpMode": 2, "reasonForNoCurrent": 54}),
            true,
        )
        .expect("raw state");

        assert_eq!(state.get("reasonForNoCurrent"), Some(&json!(54)));
        assert_eq!(state.op_mode(), Some(OpMode::AwaitingStart));
    }
}
