//! Provider-independent card payment core.
//!
//! One canonical request/response model, a [`gateway::Gateway`] driving the
//! transaction lifecycle, and per-provider connectors that translate the
//! canonical calls to each processor's wire protocol and back.

pub mod codec;
pub mod codes;
pub mod connection;
pub mod connectors;
pub mod errors;
pub mod gateway;
pub mod masking;
pub mod scrub;
pub mod types;

pub use connection::Connection;
pub use gateway::Gateway;
pub use types::{ConnectorAuthType, ConnectorEnum, PaymentsResponse};
