//! Canonical-call to Plexo JSON translation.

use serde::Serialize;

use crate::{
    errors::{ConnectorError, CustomResult},
    masking::{PeekInterface, Secret},
    types::{
        ConnectorAuthType, Currency, LineItem, PaymentMethod, PaymentOptions, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsResponse, RefundType, RefundsData,
    },
};

/// Statuses Plexo reports for a completed, non-declined operation.
const SUCCESS_STATUSES: [&str; 6] = [
    "approved",
    "completed",
    "authorized",
    "captured",
    "cancelled",
    "refunded",
];

pub struct PlexoAuthType {
    pub client_id: Secret<String>,
    pub api_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for PlexoAuthType {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => {
                if api_key.peek().is_empty() || key1.peek().is_empty() {
                    return Err(error_stack::report!(
                        ConnectorError::InvalidConnectorConfig {
                            config: "client_id and api_key must be non-empty",
                        }
                    ));
                }
                Ok(Self {
                    client_id: key1.clone(),
                    api_key: api_key.clone(),
                })
            }
            _ => Err(error_stack::report!(
                ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlexoFlowType {
    /// Atomic authorize+capture.
    Direct,
    Authorization,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoPaymentsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub amount: f64,
    pub currency: Currency,
    pub installments: u32,
    pub flow: PlexoFlowType,
    pub payment_method: PlexoPaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_details: Option<PlexoAmountDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoPaymentMethod {
    pub card: PlexoCard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoCard {
    pub number: Secret<String>,
    pub exp_month: Secret<String>,
    pub exp_year: Secret<String>,
    pub cvc: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder: Option<PlexoCardholder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoCardholder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<PlexoIdentification>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoIdentification {
    #[serde(rename = "type")]
    pub identification_type: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoAmountDetails {
    pub tip_amount: String,
}

impl TryFrom<&PaymentsAuthorizeData> for PlexoPaymentsRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(data: &PaymentsAuthorizeData) -> Result<Self, Self::Error> {
        let card = match &data.payment_method {
            PaymentMethod::Card(card) => card,
            PaymentMethod::StoredCard { .. } => {
                return Err(error_stack::report!(ConnectorError::NotSupported {
                    message: "stored card payments",
                    connector: "plexo",
                }))
            }
        };
        let options = &data.options;
        Ok(Self {
            reference_id: options.order_id.clone(),
            amount: data.amount.get_amount_as_major_unit_f64(),
            currency: data.currency,
            installments: 1,
            flow: if data.auto_capture {
                PlexoFlowType::Direct
            } else {
                PlexoFlowType::Authorization
            },
            payment_method: PlexoPaymentMethod {
                card: PlexoCard {
                    number: card.number.clone(),
                    exp_month: card.exp_month.clone(),
                    exp_year: card.exp_year.clone(),
                    cvc: card.cvv.clone(),
                    cardholder: build_cardholder(card.first_name.clone(), card.last_name.clone(), options),
                },
            },
            items: (!options.items.is_empty()).then(|| options.items.clone()),
            amount_details: options
                .tip_amount
                .clone()
                .map(|tip_amount| PlexoAmountDetails { tip_amount }),
            metadata: options.metadata.clone(),
        })
    }
}

fn build_cardholder(
    first_name: Option<String>,
    last_name: Option<String>,
    options: &PaymentOptions,
) -> Option<PlexoCardholder> {
    let identification = match (&options.identification_type, &options.identification_value) {
        (Some(identification_type), Some(value)) => Some(PlexoIdentification {
            identification_type: identification_type.clone(),
            value: value.clone(),
        }),
        _ => None,
    };
    if first_name.is_none()
        && last_name.is_none()
        && options.email.is_none()
        && identification.is_none()
    {
        return None;
    }
    Some(PlexoCardholder {
        first_name,
        last_name,
        email: options.email.clone(),
        identification,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoCaptureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub amount: f64,
}

impl From<&PaymentsCaptureData> for PlexoCaptureRequest {
    fn from(data: &PaymentsCaptureData) -> Self {
        Self {
            reference_id: data.options.order_id.clone(),
            amount: data.amount.get_amount_as_major_unit_f64(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoCancellationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&PaymentOptions> for PlexoCancellationRequest {
    fn from(options: &PaymentOptions) -> Self {
        Self {
            description: options.cancel_description.clone(),
            reason: options.cancel_reason.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexoRefundRequest {
    #[serde(rename = "type")]
    pub refund_type: RefundType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub amount: f64,
}

impl From<&RefundsData> for PlexoRefundRequest {
    fn from(data: &RefundsData) -> Self {
        Self {
            refund_type: data.options.refund_type.unwrap_or(RefundType::Full),
            description: data.options.cancel_description.clone(),
            reason: data.options.cancel_reason.clone(),
            amount: data.amount.get_amount_as_major_unit_f64(),
        }
    }
}

pub fn to_json<T: Serialize>(body: &T) -> CustomResult<serde_json::Value, ConnectorError> {
    serde_json::to_value(body).map_err(|err| {
        error_stack::report!(ConnectorError::RequestEncodingFailed)
            .attach_printable(err.to_string())
    })
}

/// Parses a success-status payments reply. Declines arrive here too:
/// Plexo answers 200 with `status: "denied"` and its decline code.
pub fn parse_payments_response(
    body: &[u8],
    test_mode: bool,
    status_code: u16,
) -> CustomResult<PaymentsResponse, ConnectorError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|err| {
        error_stack::report!(ConnectorError::ResponseDeserializationFailed)
            .attach_printable(err.to_string())
    })?;
    let object = value
        .as_object()
        .ok_or_else(|| error_stack::report!(ConnectorError::ResponseDeserializationFailed))?;

    let status = object.get("status").and_then(|v| v.as_str()).unwrap_or("");
    let success = SUCCESS_STATUSES.contains(&status);
    let mut message = object
        .get("resultMessage")
        .and_then(|v| v.as_str())
        .filter(|text| !text.is_empty())
        .unwrap_or(status)
        .to_string();
    if message.is_empty() {
        // A failed response always carries a non-empty message.
        message = if success {
            "Transaction approved".to_string()
        } else {
            "An internal error occurred. Contact support.".to_string()
        };
    }
    // The token is the payment id; it comes back on declines as well when
    // Plexo created the payment before denying it.
    let authorization = object
        .get("id")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let error_code = (!success)
        .then(|| object.get("resultCode").cloned())
        .flatten();

    Ok(PaymentsResponse {
        success,
        message,
        authorization,
        error_code,
        avs_result: None,
        cvv_result: None,
        raw: object.clone(),
        test_mode,
        status_code,
    })
}

/// Parses an HTTP-error reply; the provider's declared message and code
/// pass through unmodified.
pub fn parse_error_response(
    body: &[u8],
    test_mode: bool,
    status_code: u16,
) -> CustomResult<PaymentsResponse, ConnectorError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|err| {
        error_stack::report!(ConnectorError::ResponseDeserializationFailed)
            .attach_printable(err.to_string())
    })?;
    let object = value
        .as_object()
        .ok_or_else(|| error_stack::report!(ConnectorError::ResponseDeserializationFailed))?;

    let message = object
        .get("message")
        .or_else(|| object.get("resultMessage"))
        .and_then(|v| v.as_str())
        .unwrap_or("An internal error occurred. Contact support.")
        .to_string();
    let error_code = object
        .get("code")
        .or_else(|| object.get("resultCode"))
        .cloned()
        .or(Some(serde_json::Value::Number(status_code.into())));

    Ok(PaymentsResponse {
        success: false,
        message,
        authorization: None,
        error_code,
        avs_result: None,
        cvv_result: None,
        raw: object.clone(),
        test_mode,
        status_code,
    })
}
