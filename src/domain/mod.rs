pub mod access;
pub mod charger_config;
pub mod charger_state;
pub mod codes;
pub mod record;
pub mod schedule;
pub mod session;

pub use access::AccessLevel;
pub use charger_config::ChargerConfig;
pub use charger_state::ChargerState;
pub use codes::{NodeType, OpMode, PhaseMode};
pub use record::{DecodeError, Record};
pub use schedule::ChargerSchedule;
pub use session::ChargerSession;
