pub mod charger;
pub mod easee_http;
pub mod error;
pub mod site;
pub mod transport;

pub use charger::{Charger, SiteRef};
pub use easee_http::{ClientSettings, EaseeClient};
pub use error::EaseeError;
pub use site::{Circuit, CircuitHandle, Site, SiteDirectory};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
