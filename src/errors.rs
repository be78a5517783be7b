//! Error taxonomy for the normalization core.
//!
//! Only genuinely exceptional conditions travel as errors: bad credentials,
//! transport failures and undecodable payloads. Provider-declared declines
//! are not errors; they come back as ordinary responses with
//! `success == false`.

/// Alias for results carrying an `error_stack` report.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Credentials are absent or of the wrong shape for this connector.
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    /// Credentials are present but unusable (for example, empty strings).
    #[error("Invalid connector configuration: {config}")]
    InvalidConnectorConfig { config: &'static str },
    /// The operation is not offered by this connector.
    #[error("{message} is not supported by {connector}")]
    NotSupported {
        message: &'static str,
        connector: &'static str,
    },
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    /// The provider's response bytes do not decode to the expected shape.
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    /// The amount is unusable for this operation before any network call,
    /// e.g. a zero or negative capture.
    #[error("Invalid amount for {flow}: must be greater than zero")]
    InvalidAmount { flow: &'static str },
    /// The transport collaborator failed to complete the exchange.
    #[error("Failed to communicate with the connector")]
    RequestError,
}
