//! Transport collaborator boundary.
//!
//! The core never opens sockets. It hands a fully built [`Request`] to a
//! [`Connection`] and gets back the provider's bytes, or a transport
//! failure. TLS, proxies, retries and pooling all live behind this trait.

use crate::{
    errors::{ConnectorError, CustomResult},
    types::{Request, Response},
};

pub trait Connection {
    /// Performs exactly one blocking exchange: one request out, one
    /// response (or one failure) back. No partial delivery.
    fn send(&self, request: &Request) -> CustomResult<Response, ConnectorError>;
}
