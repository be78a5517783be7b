//! Connector registry and the capability interface every processor
//! integration implements.
//!
//! One implementation per processor; dispatch is by explicit
//! [`ConnectorEnum`] identifier, never by runtime type inspection.

pub mod merchantesolutions;
pub mod plexo;

pub use merchantesolutions::Merchantesolutions;
pub use plexo::Plexo;

use regex::Regex;

use crate::{
    errors::{ConnectorError, CustomResult},
    types::{
        ConnectorAuthType, ConnectorEnum, CreditData, MinorUnit, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponse, RefundsData, Request,
        Response, TokenizationData, UnstoreData, VerifyData,
    },
};

/// Read-only call context threaded through request building and response
/// handling. Test mode is an explicit construction-time value, not global
/// state.
#[derive(Debug, Clone, Copy)]
pub struct FlowContext<'a> {
    pub auth: &'a ConnectorAuthType,
    pub test_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Flow {
    Authorize,
    Purchase,
    Capture,
    Void,
    Refund,
    Credit,
    Verify,
    Store,
    Unstore,
}

/// How a connector validates a card without leaving a captured charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStrategy {
    /// One dedicated account-verification call.
    SingleCall,
    /// A minimal-amount authorize followed by a void of its token.
    AuthorizeThenVoid,
}

/// Per-processor capability interface: translate canonical calls into the
/// processor's parameter set and parse its replies back into the canonical
/// result. Implementations are stateless; all call state arrives through
/// the context and flow data.
pub trait ConnectorIntegration {
    fn id(&self) -> &'static str;

    fn base_url(&self, test_mode: bool) -> &'static str;

    /// Rejects unusable credentials before any network interaction.
    fn validate_auth(&self, auth: &ConnectorAuthType) -> CustomResult<(), ConnectorError>;

    /// Sensitive-field patterns for transcript scrubbing.
    fn scrub_patterns(&self) -> &'static [Regex];

    fn build_authorize_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentsAuthorizeData,
    ) -> CustomResult<Request, ConnectorError>;

    fn build_capture_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentsCaptureData,
    ) -> CustomResult<Request, ConnectorError>;

    fn build_void_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentVoidData,
    ) -> CustomResult<Request, ConnectorError>;

    fn build_refund_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &RefundsData,
    ) -> CustomResult<Request, ConnectorError>;

    fn build_credit_request(
        &self,
        _ctx: &FlowContext<'_>,
        _data: &CreditData,
    ) -> CustomResult<Request, ConnectorError> {
        Err(error_stack::report!(ConnectorError::NotSupported {
            message: "credit",
            connector: self.id(),
        }))
    }

    /// Only called for [`VerifyStrategy::SingleCall`] connectors.
    fn build_verify_request(
        &self,
        _ctx: &FlowContext<'_>,
        _data: &VerifyData,
    ) -> CustomResult<Request, ConnectorError> {
        Err(error_stack::report!(ConnectorError::NotSupported {
            message: "verify",
            connector: self.id(),
        }))
    }

    fn build_store_request(
        &self,
        _ctx: &FlowContext<'_>,
        _data: &TokenizationData,
    ) -> CustomResult<Request, ConnectorError> {
        Err(error_stack::report!(ConnectorError::NotSupported {
            message: "store",
            connector: self.id(),
        }))
    }

    fn build_unstore_request(
        &self,
        _ctx: &FlowContext<'_>,
        _data: &UnstoreData,
    ) -> CustomResult<Request, ConnectorError> {
        Err(error_stack::report!(ConnectorError::NotSupported {
            message: "unstore",
            connector: self.id(),
        }))
    }

    fn verify_strategy(&self) -> VerifyStrategy {
        VerifyStrategy::AuthorizeThenVoid
    }

    /// Amount used by verify when the caller supplies none.
    fn default_verify_amount(&self) -> MinorUnit {
        MinorUnit::new(100)
    }

    /// Parses a success-status reply into the canonical result. A decline
    /// the provider reports inside a success-status body still comes back
    /// here, as a `success == false` response.
    fn handle_response(
        &self,
        flow: Flow,
        ctx: &FlowContext<'_>,
        res: &Response,
    ) -> CustomResult<PaymentsResponse, ConnectorError>;

    /// Parses an error-status reply. The provider's declared message and
    /// code pass through unmodified.
    fn build_error_response(
        &self,
        ctx: &FlowContext<'_>,
        res: &Response,
    ) -> CustomResult<PaymentsResponse, ConnectorError>;
}

impl ConnectorEnum {
    /// Resolves the identifier to its (stateless, process-wide) connector
    /// implementation.
    pub fn connector(&self) -> &'static (dyn ConnectorIntegration + Sync) {
        match self {
            Self::Merchantesolutions => &Merchantesolutions,
            Self::Plexo => &Plexo,
        }
    }
}
