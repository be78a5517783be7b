//! Canonical-call to Trident-parameter translation.

use crate::{
    codec::FormCodec,
    codes::{AvsResult, CvvResult},
    connectors::FlowContext,
    errors::{ConnectorError, CustomResult},
    masking::{PeekInterface, Secret},
    types::{
        Address, Card, ConnectorAuthType, CreditData, PaymentMethod, PaymentOptions,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponse, RefundsData,
        TokenizationData, UnstoreData, VerifyData,
    },
};

/// Trident truncates nothing server-side; identifiers past the documented
/// maximum are rejected. The connector truncates instead, which is the
/// documented behavior of this layer.
pub const INVOICE_NUMBER_MAX_LENGTH: usize = 17;

pub mod transaction_types {
    pub const AUTHORIZE: &str = "P";
    pub const PURCHASE: &str = "D";
    pub const CAPTURE: &str = "S";
    pub const VOID: &str = "V";
    pub const REFUND: &str = "U";
    pub const CREDIT: &str = "C";
    pub const VERIFY: &str = "A";
    pub const STORE: &str = "T";
    pub const UNSTORE: &str = "X";
}

/// Error codes Trident reports for an approved outcome. `085` is the
/// card-ok reply of a zero-dollar verification.
const SUCCESS_CODES: [&str; 2] = ["000", "085"];

pub struct MerchantesolutionsAuthType {
    pub profile_id: Secret<String>,
    pub profile_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for MerchantesolutionsAuthType {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => {
                if api_key.peek().is_empty() || key1.peek().is_empty() {
                    return Err(error_stack::report!(
                        ConnectorError::InvalidConnectorConfig {
                            config: "profile_id and profile_key must be non-empty",
                        }
                    ));
                }
                Ok(Self {
                    profile_id: key1.clone(),
                    profile_key: api_key.clone(),
                })
            }
            _ => Err(error_stack::report!(
                ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

/// Ordered field list for one Trident request.
struct FieldList(Vec<(String, String)>);

impl FieldList {
    fn new(auth: &MerchantesolutionsAuthType, transaction_type: &str) -> Self {
        let mut fields = Self(Vec::new());
        fields.add("profile_id", auth.profile_id.peek());
        fields.add("profile_key", auth.profile_key.peek());
        fields.add("transaction_type", transaction_type);
        fields
    }

    fn add(&mut self, name: &str, value: &str) {
        self.0.push((name.to_string(), value.to_string()));
    }

    /// Emits the field only when the option is present; absence emits
    /// nothing, never an empty field.
    fn add_opt(&mut self, name: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.add(name, value);
        }
    }

    fn add_invoice_number(&mut self, options: &PaymentOptions) {
        if let Some(order_id) = &options.order_id {
            self.add("invoice_number", truncate(order_id, INVOICE_NUMBER_MAX_LENGTH));
        }
    }

    fn add_payment_method(&mut self, payment_method: &PaymentMethod) {
        match payment_method {
            PaymentMethod::Card(card) => self.add_card(card),
            PaymentMethod::StoredCard { card_id, exp_date } => {
                self.add("card_id", card_id.peek());
                if let Some(exp_date) = exp_date {
                    self.add("card_exp_date", exp_date.peek());
                }
            }
        }
    }

    fn add_card(&mut self, card: &Card) {
        self.add("card_number", card.number.peek());
        self.add("cvv2", card.cvv.peek());
        self.add("card_exp_date", card.expiry_mmyy().peek());
    }

    fn add_purchase_options(&mut self, options: &PaymentOptions) {
        self.add_opt("moto_ecommerce_ind", options.moto_ecommerce_ind.as_ref());
        // Visa 3-D Secure.
        self.add_opt("xid", options.xid.as_ref());
        self.add_opt("cavv", options.cavv.as_ref());
        // Mastercard UCAF.
        self.add_opt("ucaf_collection_ind", options.ucaf_collection_ind.as_ref());
        self.add_opt("ucaf_auth_data", options.ucaf_auth_data.as_ref());
        self.add_opt("store_card", options.store_card.as_ref());
    }

    fn add_billing_address(&mut self, address: Option<&Address>) {
        if let Some(address) = address {
            if let Some(line1) = &address.line1 {
                self.add("cardholder_street_address", line1.peek());
            }
            if let Some(zip) = &address.zip {
                self.add("cardholder_zip", zip.peek());
            }
        }
    }

    fn into_fields(self) -> Vec<(String, String)> {
        self.0
    }
}

fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}

pub fn authorize_fields(
    ctx: &FlowContext<'_>,
    data: &PaymentsAuthorizeData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let transaction_type = if data.auto_capture {
        transaction_types::PURCHASE
    } else {
        transaction_types::AUTHORIZE
    };
    let mut fields = FieldList::new(&auth, transaction_type);
    fields.add_invoice_number(&data.options);
    fields.add_payment_method(&data.payment_method);
    fields.add_purchase_options(&data.options);
    fields.add_billing_address(data.options.billing_address.as_ref());
    fields.add("transaction_amount", &data.amount.get_amount_as_major_unit_string());
    Ok(fields.into_fields())
}

pub fn capture_fields(
    ctx: &FlowContext<'_>,
    data: &PaymentsCaptureData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::CAPTURE);
    fields.add("transaction_id", &data.connector_transaction_id);
    fields.add("transaction_amount", &data.amount.get_amount_as_major_unit_string());
    Ok(fields.into_fields())
}

pub fn void_fields(
    ctx: &FlowContext<'_>,
    data: &PaymentVoidData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::VOID);
    fields.add("transaction_id", &data.connector_transaction_id);
    Ok(fields.into_fields())
}

pub fn refund_fields(
    ctx: &FlowContext<'_>,
    data: &RefundsData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::REFUND);
    fields.add("transaction_id", &data.connector_transaction_id);
    fields.add("transaction_amount", &data.amount.get_amount_as_major_unit_string());
    Ok(fields.into_fields())
}

pub fn credit_fields(
    ctx: &FlowContext<'_>,
    data: &CreditData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::CREDIT);
    fields.add_invoice_number(&data.options);
    fields.add_payment_method(&data.payment_method);
    fields.add("transaction_amount", &data.amount.get_amount_as_major_unit_string());
    Ok(fields.into_fields())
}

/// Zero-dollar account verification; no amount field, no follow-up void.
pub fn verify_fields(
    ctx: &FlowContext<'_>,
    data: &VerifyData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::VERIFY);
    fields.add_payment_method(&data.payment_method);
    fields.add_purchase_options(&data.options);
    fields.add_billing_address(data.options.billing_address.as_ref());
    Ok(fields.into_fields())
}

pub fn store_fields(
    ctx: &FlowContext<'_>,
    data: &TokenizationData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::STORE);
    fields.add("card_number", data.card.number.peek());
    fields.add("card_exp_date", data.card.expiry_mmyy().peek());
    Ok(fields.into_fields())
}

pub fn unstore_fields(
    ctx: &FlowContext<'_>,
    data: &UnstoreData,
) -> CustomResult<Vec<(String, String)>, ConnectorError> {
    let auth = MerchantesolutionsAuthType::try_from(ctx.auth)?;
    let mut fields = FieldList::new(&auth, transaction_types::UNSTORE);
    fields.add("card_id", data.card_id.peek());
    Ok(fields.into_fields())
}

/// Decoded Trident reply.
#[derive(Debug, Default)]
pub struct MerchantesolutionsResponse {
    pub transaction_id: Option<String>,
    pub error_code: Option<String>,
    pub auth_response_text: Option<String>,
    pub avs_result: Option<String>,
    pub cvv2_result: Option<String>,
    pub auth_code: Option<String>,
    raw: Vec<(String, String)>,
}

impl MerchantesolutionsResponse {
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut response = Self {
            raw: fields.clone(),
            ..Self::default()
        };
        for (name, value) in fields {
            match name.as_str() {
                "transaction_id" => response.transaction_id = Some(value),
                "error_code" => response.error_code = Some(value),
                "auth_response_text" => response.auth_response_text = Some(value),
                "avs_result" => response.avs_result = Some(value),
                "cvv2_result" => response.cvv2_result = Some(value),
                "auth_code" => response.auth_code = Some(value),
                _ => {}
            }
        }
        response
    }

    fn is_success(&self) -> bool {
        self.error_code
            .as_deref()
            .is_some_and(|code| SUCCESS_CODES.contains(&code))
    }

    pub fn into_payments_response(self, test_mode: bool, status_code: u16) -> PaymentsResponse {
        let success = self.is_success();
        // Trident returns a transaction id on declines too; it is still
        // the reference a support ticket needs, so it is surfaced either
        // way.
        let authorization = self.transaction_id.clone().filter(|id| !id.is_empty());
        PaymentsResponse {
            success,
            message: self
                .auth_response_text
                .clone()
                .unwrap_or_else(|| "No response message received".to_string()),
            authorization,
            error_code: match (success, &self.error_code) {
                (false, Some(code)) => Some(serde_json::Value::String(code.clone())),
                _ => None,
            },
            avs_result: self.avs_result.as_deref().map(AvsResult::from_code),
            cvv_result: self.cvv2_result.as_deref().map(CvvResult::from_code),
            raw: FormCodec::pairs_to_map(&self.raw),
            test_mode,
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_cuts_at_the_limit_only() {
        assert_eq!(truncate("thisislongerthan17characters", 17), "thisislongerthan1");
        assert_eq!(truncate("short", 17), "short");
        assert_eq!(truncate("exactly17charssss", 17), "exactly17charssss");
    }

    #[test]
    fn success_codes_cover_verification_replies() {
        let response = MerchantesolutionsResponse::from_fields(vec![
            ("transaction_id".to_string(), "abc".to_string()),
            ("error_code".to_string(), "085".to_string()),
            ("auth_response_text".to_string(), "Card Ok".to_string()),
        ]);
        assert!(response.is_success());
    }
}
