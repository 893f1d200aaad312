mod envelope;
mod error;
mod http;
mod transport;

pub use envelope::{Fetched, check_status, decode_ack, decode_envelope};
pub use error::{FetchError, FetchErrorKind};
pub use http::HttpTransport;
pub use transport::{RawResponse, Transport};
