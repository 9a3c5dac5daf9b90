use std::convert::Infallible;

use thiserror::Error;

use crate::adapters::transport::TransportError;
use crate::domain::DecodeError;

#[derive(Debug, Error)]
pub enum EaseeError {
    #[error("easee request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to decode easee payload: {0}")]
    Decode(#[from] DecodeError),
    #[error("consumption response is not a number: {0:?}")]
    InvalidConsumption(String),
}

impl EaseeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Transport(error) if error.is_not_found())
    }
}

impl From<Infallible> for EaseeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
