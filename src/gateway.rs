//! Transaction lifecycle orchestration.
//!
//! A [`Gateway`] binds one connector, one set of credentials and one
//! transport. It owns no transaction state: the only thing threaded
//! between calls is the authorization token the caller holds, treated as
//! an opaque capability. Tokens are never validated locally; a garbage
//! token goes to the provider and its rejection comes back as a normal
//! failed response.

use crate::{
    connection::Connection,
    connectors::{Flow, FlowContext, VerifyStrategy},
    errors::{ConnectorError, CustomResult},
    scrub,
    types::{
        Card, ConnectorAuthType, ConnectorEnum, CreditData, Currency, MinorUnit, PaymentMethod,
        PaymentOptions, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponse, RefundsData, Request, Response, TokenizationData, UnstoreData,
        VerifyData,
    },
};

/// Message shown when the transport collaborator failed before a reply
/// arrived. The caller cannot act on details it does not have.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Unable to reach the payment processor";

/// Message shown when the provider's reply could not be decoded.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Contact support.";

pub struct Gateway<C: Connection> {
    connector: ConnectorEnum,
    auth: ConnectorAuthType,
    test_mode: bool,
    pub(crate) connection: C,
}

impl<C: Connection> Gateway<C> {
    pub fn new(
        connector: ConnectorEnum,
        auth: ConnectorAuthType,
        test_mode: bool,
        connection: C,
    ) -> Self {
        Self {
            connector,
            auth,
            test_mode,
            connection,
        }
    }

    fn ctx(&self) -> FlowContext<'_> {
        FlowContext {
            auth: &self.auth,
            test_mode: self.test_mode,
        }
    }

    /// Reserves funds on the card. The returned `authorization` is the
    /// token later calls settle, void or refund against.
    pub fn authorize(
        &self,
        amount: MinorUnit,
        currency: Currency,
        payment_method: PaymentMethod,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        ensure_positive(amount, "authorize")?;
        let data = PaymentsAuthorizeData {
            amount,
            currency,
            payment_method,
            options,
            auto_capture: false,
        };
        let request = self
            .connector
            .connector()
            .build_authorize_request(&self.ctx(), &data)?;
        self.execute(Flow::Authorize, request)
    }

    /// Atomic authorize+capture.
    pub fn purchase(
        &self,
        amount: MinorUnit,
        currency: Currency,
        payment_method: PaymentMethod,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        ensure_positive(amount, "purchase")?;
        let data = PaymentsAuthorizeData {
            amount,
            currency,
            payment_method,
            options,
            auto_capture: true,
        };
        let request = self
            .connector
            .connector()
            .build_authorize_request(&self.ctx(), &data)?;
        self.execute(Flow::Purchase, request)
    }

    /// Settles a prior authorization, fully or partially. An amount above
    /// the authorized one is a provider-level decline, not validated here;
    /// a non-positive amount never reaches the provider.
    pub fn capture(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        ensure_positive(amount, "capture")?;
        let data = PaymentsCaptureData {
            amount,
            connector_transaction_id: authorization.to_string(),
            options,
        };
        let request = self
            .connector
            .connector()
            .build_capture_request(&self.ctx(), &data)?;
        self.execute(Flow::Capture, request)
    }

    /// Cancels a prior authorization. A void after capture is forwarded
    /// anyway; whatever the provider reports passes through unmodified.
    pub fn void(
        &self,
        authorization: &str,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        let data = PaymentVoidData {
            connector_transaction_id: authorization.to_string(),
            options,
        };
        let request = self
            .connector
            .connector()
            .build_void_request(&self.ctx(), &data)?;
        self.execute(Flow::Void, request)
    }

    /// Returns captured funds, fully or partially
    /// (`options.refund_type = partial-refund`).
    pub fn refund(
        &self,
        amount: MinorUnit,
        authorization: &str,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        ensure_positive(amount, "refund")?;
        let data = RefundsData {
            amount,
            connector_transaction_id: authorization.to_string(),
            options,
        };
        let request = self
            .connector
            .connector()
            .build_refund_request(&self.ctx(), &data)?;
        self.execute(Flow::Refund, request)
    }

    /// Pushes funds to a card without a prior authorization reference.
    pub fn credit(
        &self,
        amount: MinorUnit,
        currency: Currency,
        payment_method: PaymentMethod,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        ensure_positive(amount, "credit")?;
        let data = CreditData {
            amount,
            currency,
            payment_method,
            options,
        };
        let request = self
            .connector
            .connector()
            .build_credit_request(&self.ctx(), &data)?;
        self.execute(Flow::Credit, request)
    }

    /// Validates a card without leaving a captured charge. Depending on
    /// the connector this is one dedicated verification call, or a
    /// minimal-amount authorize whose token is voided immediately; the
    /// verification outcome is the authorize outcome either way.
    pub fn verify(
        &self,
        payment_method: PaymentMethod,
        currency: Currency,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        let connector = self.connector.connector();
        match connector.verify_strategy() {
            VerifyStrategy::SingleCall => {
                let data = VerifyData {
                    payment_method,
                    currency,
                    options,
                };
                let request = connector.build_verify_request(&self.ctx(), &data)?;
                self.execute(Flow::Verify, request)
            }
            VerifyStrategy::AuthorizeThenVoid => {
                let amount = options
                    .verify_amount
                    .unwrap_or_else(|| connector.default_verify_amount());
                ensure_positive(amount, "verify")?;
                let data = PaymentsAuthorizeData {
                    amount,
                    currency,
                    payment_method,
                    options,
                    auto_capture: false,
                };
                let request = connector.build_authorize_request(&self.ctx(), &data)?;
                let response = self.execute(Flow::Verify, request)?;
                if response.success {
                    if let Some(token) = &response.authorization {
                        let void_data = PaymentVoidData {
                            connector_transaction_id: token.clone(),
                            options: PaymentOptions::default(),
                        };
                        let void_request =
                            connector.build_void_request(&self.ctx(), &void_data)?;
                        // The void releases the hold; its outcome does not
                        // change the verification verdict.
                        let void_response = self.execute(Flow::Void, void_request)?;
                        if !void_response.success {
                            tracing::warn!(
                                connector = %connector.id(),
                                "verification hold could not be released: {}",
                                void_response.message
                            );
                        }
                    }
                }
                Ok(response)
            }
        }
    }

    /// Asks the processor to tokenize card data for later charges.
    pub fn store(
        &self,
        card: Card,
        options: PaymentOptions,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        let data = TokenizationData { card, options };
        let request = self
            .connector
            .connector()
            .build_store_request(&self.ctx(), &data)?;
        self.execute(Flow::Store, request)
    }

    /// Deletes previously stored card data.
    pub fn unstore(
        &self,
        card_id: crate::masking::Secret<String>,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        let data = UnstoreData { card_id };
        let request = self
            .connector
            .connector()
            .build_unstore_request(&self.ctx(), &data)?;
        self.execute(Flow::Unstore, request)
    }

    /// Redacts sensitive values from a transcript using this connector's
    /// pattern set; usable independently of any live call.
    pub fn scrub(&self, transcript: &str) -> String {
        scrub::scrub(transcript, self.connector.connector().scrub_patterns())
    }

    fn execute(
        &self,
        flow: Flow,
        request: Request,
    ) -> CustomResult<PaymentsResponse, ConnectorError> {
        let connector = self.connector.connector();
        let response = match self.connection.send(&request) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    connector = %connector.id(),
                    flow = %flow,
                    "transport failure: {err:?}"
                );
                return Ok(PaymentsResponse::failed_with_message(
                    TRANSPORT_FAILURE_MESSAGE,
                    0,
                    self.test_mode,
                ));
            }
        };
        self.log_transcript(flow, &request, &response);

        let is_success_status = http::StatusCode::from_u16(response.status_code)
            .map(|status| status.is_success())
            .unwrap_or(false);
        let handled = if is_success_status {
            connector.handle_response(flow, &self.ctx(), &response)
        } else {
            connector.build_error_response(&self.ctx(), &response)
        };
        match handled {
            Ok(payments_response) => Ok(payments_response),
            Err(err)
                if matches!(
                    err.current_context(),
                    ConnectorError::ResponseDeserializationFailed
                ) =>
            {
                tracing::warn!(
                    connector = %connector.id(),
                    flow = %flow,
                    "undecodable provider response: {err:?}"
                );
                Ok(PaymentsResponse::failed_with_message(
                    INTERNAL_ERROR_MESSAGE,
                    response.status_code,
                    self.test_mode,
                ))
            }
            Err(err) => Err(err),
        }
    }

    /// Captures the exchange as text, scrubs it, and hands it to the log
    /// sink. Raw transcripts never reach `tracing`.
    fn log_transcript(&self, flow: Flow, request: &Request, response: &Response) {
        let connector = self.connector.connector();
        let mut transcript = format!("{} {}\n", request.method, request.url);
        for (name, value) in &request.headers {
            transcript.push_str(&format!("{}: {}\n", name, value.clone().into_inner()));
        }
        if let Some(body) = &request.body {
            if let Ok(rendered) = body.render() {
                transcript.push_str(&rendered);
                transcript.push('\n');
            }
        }
        transcript.push_str(&String::from_utf8_lossy(&response.response));
        let scrubbed = scrub::scrub(&transcript, connector.scrub_patterns());
        tracing::debug!(
            connector = %connector.id(),
            flow = %flow,
            transcript = %scrubbed,
            "exchange completed"
        );
    }
}

fn ensure_positive(amount: MinorUnit, flow: &'static str) -> CustomResult<(), ConnectorError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(error_stack::report!(ConnectorError::InvalidAmount {
            flow
        }))
    }
}
