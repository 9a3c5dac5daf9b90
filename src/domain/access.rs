use std::fmt;
use std::str::FromStr;

use crate::domain::record::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    OpenForAll = 1,
    EaseeAccountRequired = 2,
    Whitelist = 3,
}

const ACCESS_LEVELS: &[(AccessLevel, i64, &str)] = &[
    (AccessLevel::OpenForAll, 1, "open_for_all"),
    (AccessLevel::EaseeAccountRequired, 2, "easee_account_required"),
    (AccessLevel::Whitelist, 3, "whitelist"),
];

impl AccessLevel {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        ACCESS_LEVELS[self as usize - 1].2
    }

    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        ACCESS_LEVELS
            .iter()
            .find(|(_, candidate, _)| *candidate == code)
            .map(|(level, _, _)| *level)
            .ok_or_else(|| DecodeError::UnknownAccessLevel(code.to_string()))
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccessLevel {
    type Err = DecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ACCESS_LEVELS
            .iter()
            .find(|(_, _, name)| *name == value)
            .map(|(level, _, _)| *level)
            .ok_or_else(|| DecodeError::UnknownAccessLevel(value.to_string()))
    }
}

impl TryFrom<i64> for AccessLevel {
    type Error = DecodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl TryFrom<i32> for AccessLevel {
    type Error = DecodeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(code))
    }
}

impl TryFrom<&str> for AccessLevel {
    type Error = DecodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
