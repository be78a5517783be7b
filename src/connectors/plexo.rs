//! Plexo connector.
//!
//! JSON processor with HTTP basic credentials. Payments are created with a
//! single POST whose flow field selects authorize vs purchase; captures,
//! cancellations and refunds address the payment by its token in the path.
//! Card verification has no dedicated endpoint: the gateway runs a
//! minimal-amount authorize and voids its token.

pub mod transformers;

#[cfg(test)]
mod test;

use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;

use crate::{
    connectors::{ConnectorIntegration, Flow, FlowContext, VerifyStrategy},
    errors::{ConnectorError, CustomResult},
    masking::{Maskable, PeekInterface, Secret},
    scrub,
    types::{
        ConnectorAuthType, Method, MinorUnit, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsResponse, RefundsData, Request, RequestContent, Response,
    },
};

use transformers as plexo;

const LIVE_URL: &str = "https://api.plexo.com.uy/v1";
const TEST_URL: &str = "https://api.testing.plexo.com.uy/v1";

static SCRUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        scrub::json_string_field("number"),
        scrub::json_string_field("cvc"),
        scrub::basic_auth_header(),
    ]
});

pub struct Plexo;

impl Plexo {
    fn post(
        &self,
        ctx: &FlowContext<'_>,
        path: &str,
        body: serde_json::Value,
    ) -> CustomResult<Request, ConnectorError> {
        let auth = plexo::PlexoAuthType::try_from(ctx.auth)?;
        let credentials = format!("{}:{}", auth.client_id.peek(), auth.api_key.peek());
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        Ok(Request {
            method: Method::Post,
            url: format!("{}{}", self.base_url(ctx.test_mode), path),
            headers: vec![
                (
                    "Content-Type".to_string(),
                    Maskable::from("application/json".to_string()),
                ),
                (
                    "Authorization".to_string(),
                    Maskable::from(Secret::new(format!("Basic {encoded}"))),
                ),
            ],
            body: Some(RequestContent::Json(body)),
        })
    }
}

impl ConnectorIntegration for Plexo {
    fn id(&self) -> &'static str {
        "plexo"
    }

    fn base_url(&self, test_mode: bool) -> &'static str {
        if test_mode {
            TEST_URL
        } else {
            LIVE_URL
        }
    }

    fn validate_auth(&self, auth: &ConnectorAuthType) -> CustomResult<(), ConnectorError> {
        plexo::PlexoAuthType::try_from(auth).map(|_| ())
    }

    fn scrub_patterns(&self) -> &'static [Regex] {
        SCRUB_PATTERNS.as_slice()
    }

    fn build_authorize_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentsAuthorizeData,
    ) -> CustomResult<Request, ConnectorError> {
        let body = plexo::PlexoPaymentsRequest::try_from(data)?;
        self.post(ctx, "/payments", plexo::to_json(&body)?)
    }

    fn build_capture_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentsCaptureData,
    ) -> CustomResult<Request, ConnectorError> {
        let body = plexo::PlexoCaptureRequest::from(data);
        let path = format!("/payments/{}/captures", data.connector_transaction_id);
        self.post(ctx, &path, plexo::to_json(&body)?)
    }

    fn build_void_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentVoidData,
    ) -> CustomResult<Request, ConnectorError> {
        let body = plexo::PlexoCancellationRequest::from(&data.options);
        let path = format!("/payments/{}/cancellations", data.connector_transaction_id);
        self.post(ctx, &path, plexo::to_json(&body)?)
    }

    fn build_refund_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &RefundsData,
    ) -> CustomResult<Request, ConnectorError> {
        let body = plexo::PlexoRefundRequest::from(data);
        let path = format!("/payments/{}/refunds", data.connector_transaction_id);
        self.post(ctx, &path, plexo::to_json(&body)?)
    }

    fn verify_strategy(&self) -> VerifyStrategy {
        VerifyStrategy::AuthorizeThenVoid
    }

    fn default_verify_amount(&self) -> MinorUnit {
        MinorUnit::new(100)
    }

    fn handle_response(
        &self,
        _flow: Flow,
        ctx: &FlowContext<'_>,
        res: &Response,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        plexo::parse_payments_response(&res.response, ctx.test_mode, res.status_code)
    }

    fn build_error_response(
        &self,
        ctx: &FlowContext<'_>,
        res: &Response,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        plexo::parse_error_response(&res.response, ctx.test_mode, res.status_code)
    }
}
