use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpMode {
    Offline = 0,
    Disconnected = 1,
    AwaitingStart = 2,
    Charging = 3,
    Completed = 4,
    Error = 5,
    ReadyToCharge = 6,
}

const OP_MODES: &[(i64, OpMode, &str)] = &[
    (0, OpMode::Offline, "OFFLINE"),
    (1, OpMode::Disconnected, "DISCONNECTED"),
    (2, OpMode::AwaitingStart, "AWAITING_START"),
    (3, OpMode::Charging, "CHARGING"),
    (4, OpMode::Completed, "COMPLETED"),
    (5, OpMode::Error, "ERROR"),
    (6, OpMode::ReadyToCharge, "READY_TO_CHARGE"),
];

impl OpMode {
    pub fn from_code(code: i64) -> Option<Self> {
        OP_MODES
            .iter()
            .find(|(candidate, _, _)| *candidate == code)
            .map(|(_, mode, _)| *mode)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        OP_MODES
            .iter()
            .find(|(_, _, candidate)| *candidate == label)
            .map(|(_, mode, _)| *mode)
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        OP_MODES[self as usize].2
    }
}

impl fmt::Display for OpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Master,
    Extender,
}

impl NodeType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Master),
            2 => Some(Self::Extender),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [Self::Master, Self::Extender]
            .into_iter()
            .find(|node| node.label() == label)
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Master => 1,
            Self::Extender => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Extender => "Extender",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase selection policy (`phaseMode`). The numeric codes are also what
/// the settings endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseMode {
    LockedToSinglePhase,
    Auto,
    LockedToThreePhase,
}

impl PhaseMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::LockedToSinglePhase),
            2 => Some(Self::Auto),
            3 => Some(Self::LockedToThreePhase),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [
            Self::LockedToSinglePhase,
            Self::Auto,
            Self::LockedToThreePhase,
        ]
        .into_iter()
        .find(|mode| mode.label() == label)
    }

    pub fn code(self) -> i64 {
        match self {
            Self::LockedToSinglePhase => 1,
            Self::Auto => 2,
            Self::LockedToThreePhase => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LockedToSinglePhase => "Locked to single phase",
            Self::Auto => "Auto",
            Self::LockedToThreePhase => "Locked to three phase",
        }
    }
}

impl fmt::Display for PhaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Reverse engineered from observed chargers; the cloud API does not
// document these codes yet.
const REASONS_FOR_NO_CURRENT: &[(i64, &str)] = &[
    (0, "No reason, charging or ready to charge"),
    (1, "Charger paused"),
    (2, "Charger paused"),
    (3, "Charger paused"),
    (4, "Charger paused"),
    (5, "Charger paused"),
    (6, "Charger paused"),
    (9, "Error no current"),
    (50, "Secondary unit not requesting current or no car connected"),
    (51, "Charger paused"),
    (52, "Charger paused"),
    (53, "Charger disabled"),
    (54, "Waiting for schedule/auth"),
    (55, "Pending auth"),
];

pub const NO_REASON_LABEL: &str = "No reason";
pub const UNKNOWN_REASON_LABEL: &str = "Unknown";

pub fn reason_for_no_current_label(code: i64) -> &'static str {
    REASONS_FOR_NO_CURRENT
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map_or(UNKNOWN_REASON_LABEL, |(_, label)| *label)
}

/// Renders a `reasonForNoCurrent` wire value as `"(<code>) <label>"`.
///
/// Never fails: `null` becomes [`NO_REASON_LABEL`] and anything outside the
/// table keeps its code with an `Unknown` label.
pub fn describe_reason_for_no_current(value: &Value) -> String {
    match value {
        Value::Null => NO_REASON_LABEL.to_string(),
        Value::Number(number) => {
            let label = number
                .as_i64()
                .or_else(|| number.as_f64().and_then(whole_code))
                .map_or(UNKNOWN_REASON_LABEL, reason_for_no_current_label);
            format!("({number}) {label}")
        }
        Value::String(text) => format!("({text}) {UNKNOWN_REASON_LABEL}"),
        other => format!("({other}) {UNKNOWN_REASON_LABEL}"),
    }
}

// Integral codes may arrive as floats, e.g. `1.0`.
fn whole_code(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{NodeType, OpMode, PhaseMode, describe_reason_for_no_current};

    #[test]
    fn maps_every_op_mode_code_to_its_label() {
        let expected = [
            "OFFLINE",
            "DISCONNECTED",
            "AWAITING_START",
            "CHARGING",
            "COMPLETED",
            "ERROR",
            "READY_TO_CHARGE",
        ];

        for (code, label) in expected.iter().enumerate() {
            let mode = OpMode::from_code(code as i64).expect("code must be known");
            assert_eq!(mode.label(), *label);
            assert_eq!(mode.code(), code as i64);
            assert_eq!(OpMode::from_label(label), Some(mode));
        }
    }

    #[test]
    fn rejects_op_mode_outside_table() {
        assert_eq!(OpMode::from_code(7), None);
        assert_eq!(OpMode::from_code(-1), None);
    }

    #[test]
    fn maps_node_type_and_phase_mode_tables() {
        assert_eq!(NodeType::from_code(1), Some(NodeType::Master));
        assert_eq!(NodeType::from_code(2), Some(NodeType::Extender));
        assert_eq!(NodeType::from_code(3), None);

        assert_eq!(
            PhaseMode::from_code(1).map(PhaseMode::label),
            Some("Locked to single phase")
        );
        assert_eq!(PhaseMode::from_code(2).map(PhaseMode::label), Some("Auto"));
        assert_eq!(
            PhaseMode::from_code(3).map(PhaseMode::label),
            Some("Locked to three phase")
        );
        assert_eq!(PhaseMode::from_code(0), None);
    }

    #[test]
    fn describes_known_reason_codes() {
        assert_eq!(
            describe_reason_for_no_current(&json!(0)),
            "(0) No reason, charging or ready to charge"
        );
        assert_eq!(
            describe_reason_for_no_current(&json!(53)),
            "(53) Charger disabled"
        );
    }

    #[test]
    fn describes_unknown_reason_codes_without_failing() {
        assert_eq!(describe_reason_for_no_current(&json!(42)), "(42) Unknown");
        assert_eq!(describe_reason_for_no_current(&json!(7)), "(7) Unknown");
    }

    #[test]
    fn looks_up_integral_float_reason_codes() {
        assert_eq!(
            describe_reason_for_no_current(&json!(1.0)),
            "(1.0) Charger paused"
        );
        assert_eq!(describe_reason_for_no_current(&json!(1.5)), "(1.5) Unknown");
    }

    #[test]
    fn describes_null_reason_as_no_reason() {
        assert_eq!(describe_reason_for_no_current(&Value::Null), "No reason");
    }
}
