// meon-api: Async HTTP client for a messaging-gateway instance API

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use client::GatewayClient;
pub use error::Error;
pub use request::{
    Credentials, Endpoint, HttpMethod, INFO_PATH, LOGIN_PATH, LOGOUT_PATH, PreparedRequest,
    ValidationError, build_request,
};
pub use response::{Payload, RawResponse, normalize};
pub use transport::{TlsMode, TransportConfig};
