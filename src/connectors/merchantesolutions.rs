//! Merchant e-Solutions (Trident API) connector.
//!
//! Form-encoded processor: every operation is a POST of ordered key/value
//! pairs to a single endpoint, selected by a one-letter `transaction_type`.
//! The processor echoes a `transaction_id` on every reply, declines
//! included, so the canonical authorization token is populated whenever
//! the field comes back non-empty.

pub mod transformers;

#[cfg(test)]
mod test;

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    codec::FormCodec,
    connectors::{ConnectorIntegration, Flow, FlowContext, VerifyStrategy},
    errors::{ConnectorError, CustomResult},
    masking::Maskable,
    scrub,
    types::{
        ConnectorAuthType, CreditData, Method, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsResponse, RefundsData, Request, RequestContent, Response,
        TokenizationData, UnstoreData, VerifyData,
    },
};

use transformers as mes;

const LIVE_URL: &str = "https://api.merchante-solutions.com/mes-api/tridentApi";
const TEST_URL: &str = "https://cert.merchante-solutions.com/mes-api/tridentApi";

static SCRUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        scrub::form_field("profile_key"),
        scrub::form_field("card_number"),
        scrub::form_field("cvv2"),
    ]
});

pub struct Merchantesolutions;

impl Merchantesolutions {
    fn post(&self, ctx: &FlowContext<'_>, fields: Vec<(String, String)>) -> Request {
        Request {
            method: Method::Post,
            url: self.base_url(ctx.test_mode).to_string(),
            headers: vec![(
                "Content-Type".to_string(),
                Maskable::from("application/x-www-form-urlencoded".to_string()),
            )],
            body: Some(RequestContent::FormUrlEncoded(fields)),
        }
    }
}

impl ConnectorIntegration for Merchantesolutions {
    fn id(&self) -> &'static str {
        "merchantesolutions"
    }

    fn base_url(&self, test_mode: bool) -> &'static str {
        if test_mode {
            TEST_URL
        } else {
            LIVE_URL
        }
    }

    fn validate_auth(&self, auth: &ConnectorAuthType) -> CustomResult<(), ConnectorError> {
        mes::MerchantesolutionsAuthType::try_from(auth).map(|_| ())
    }

    fn scrub_patterns(&self) -> &'static [Regex] {
        SCRUB_PATTERNS.as_slice()
    }

    fn build_authorize_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentsAuthorizeData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::authorize_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_capture_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentsCaptureData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::capture_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_void_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &PaymentVoidData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::void_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_refund_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &RefundsData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::refund_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_credit_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &CreditData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::credit_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_verify_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &VerifyData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::verify_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_store_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &TokenizationData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::store_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn build_unstore_request(
        &self,
        ctx: &FlowContext<'_>,
        data: &UnstoreData,
    ) -> CustomResult<Request, ConnectorError> {
        let fields = mes::unstore_fields(ctx, data)?;
        Ok(self.post(ctx, fields))
    }

    fn verify_strategy(&self) -> VerifyStrategy {
        // Trident offers a dedicated zero-dollar account verification
        // transaction type; no follow-up void is needed.
        VerifyStrategy::SingleCall
    }

    fn handle_response(
        &self,
        _flow: Flow,
        ctx: &FlowContext<'_>,
        res: &Response,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        let fields = FormCodec::decode(&res.response)?;
        Ok(mes::MerchantesolutionsResponse::from_fields(fields)
            .into_payments_response(ctx.test_mode, res.status_code))
    }

    fn build_error_response(
        &self,
        ctx: &FlowContext<'_>,
        res: &Response,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        // Trident reports declines inside 200 replies; an HTTP error
        // status still carries a form body when the gateway front end
        // produced it.
        self.handle_response(Flow::Authorize, ctx, res)
    }
}
