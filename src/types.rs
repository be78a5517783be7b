//! Canonical data model shared by every connector.

use serde::{Deserialize, Serialize};

use crate::{
    codes::{AvsResult, CvvResult},
    errors::{ConnectorError, CustomResult},
    masking::{Maskable, PeekInterface, Secret},
};

/// An exact, integer minor-unit amount. Partial capture and refund
/// arithmetic stays in integer space; floating point never enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinorUnit(i64);

impl MinorUnit {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get_amount_as_i64(&self) -> i64 {
        self.0
    }

    pub fn get_amount_as_string(&self) -> String {
        self.0.to_string()
    }

    /// Renders the amount as a major-unit decimal string, e.g. `100` -> `"1.00"`.
    /// Supported currencies all carry a two-digit exponent. The sign is
    /// carried explicitly so sub-unit negatives (`-50` -> `"-0.50"`) keep it.
    pub fn get_amount_as_major_unit_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    pub fn get_amount_as_major_unit_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_sub(&self, other: MinorUnit) -> Option<MinorUnit> {
        self.0.checked_sub(other.0).map(Self)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
    Inr,
    Usd,
    Uyu,
}

/// Raw card details. Opaque to the core: field placement only, no Luhn or
/// scheme validation happens here.
#[derive(Debug, Clone)]
pub struct Card {
    pub number: Secret<String>,
    pub exp_month: Secret<String>,
    pub exp_year: Secret<String>,
    pub cvv: Secret<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Card {
    /// Expiry in the `MMYY` layout used by form-encoded processors.
    pub fn expiry_mmyy(&self) -> Secret<String> {
        let month = self.exp_month.peek();
        let year = self.exp_year.peek();
        let short_year = if year.len() == 4 { &year[2..] } else { year };
        Secret::new(format!("{:0>2}{}", month, short_year))
    }

    pub fn holder_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// What the charge runs against: raw card fields, or a reference to card
/// data previously stored with the processor.
#[derive(Debug, Clone)]
pub enum PaymentMethod {
    Card(Card),
    StoredCard {
        card_id: Secret<String>,
        exp_date: Option<Secret<String>>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Address {
    pub line1: Option<Secret<String>>,
    pub line2: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<Secret<String>>,
    pub zip: Option<Secret<String>>,
    pub country: Option<String>,
    pub phone: Option<Secret<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundType {
    #[serde(rename = "refund")]
    Full,
    #[serde(rename = "partial-refund")]
    Partial,
}

/// Every recognized transaction option, enumerated. Options a connector
/// does not understand are simply never read; absence of an option must
/// not emit an empty provider field.
#[derive(Debug, Clone, Default)]
pub struct PaymentOptions {
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub ip: Option<String>,
    pub billing_address: Option<Address>,
    /// Mail-order/telephone-order vs e-commerce indicator.
    pub moto_ecommerce_ind: Option<String>,
    /// Visa 3-D Secure.
    pub xid: Option<String>,
    pub cavv: Option<String>,
    /// Mastercard UCAF.
    pub ucaf_collection_ind: Option<String>,
    pub ucaf_auth_data: Option<String>,
    /// Ask the processor to tokenize the card alongside the transaction.
    pub store_card: Option<String>,
    pub items: Vec<LineItem>,
    pub tip_amount: Option<String>,
    pub identification_type: Option<String>,
    pub identification_value: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub refund_type: Option<RefundType>,
    /// Free-text fields some processors attach to cancellations/refunds.
    pub cancel_description: Option<String>,
    pub cancel_reason: Option<String>,
    /// Overrides the connector's default verification amount.
    pub verify_amount: Option<MinorUnit>,
}

/// Connector credential shapes, mirroring how processors expect their
/// secrets delivered.
#[derive(Debug, Clone)]
pub enum ConnectorAuthType {
    HeaderKey {
        api_key: Secret<String>,
    },
    BodyKey {
        api_key: Secret<String>,
        key1: Secret<String>,
    },
    SignatureKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
    },
    NoKey,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectorEnum {
    Merchantesolutions,
    Plexo,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Body of an outbound request, in the provider's wire format.
#[derive(Debug, Clone)]
pub enum RequestContent {
    /// Ordered key/value pairs, percent-encoded on render.
    FormUrlEncoded(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl RequestContent {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::FormUrlEncoded(_) => "application/x-www-form-urlencoded",
            Self::Json(_) => "application/json",
        }
    }

    /// Renders the body to its wire text.
    pub fn render(&self) -> CustomResult<String, ConnectorError> {
        match self {
            Self::FormUrlEncoded(fields) => Ok(crate::codec::FormCodec::encode(fields)),
            Self::Json(value) => serde_json::to_string(value).map_err(|err| {
                error_stack::report!(ConnectorError::RequestEncodingFailed)
                    .attach_printable(err.to_string())
            }),
        }
    }
}

/// One outbound exchange, handed to the transport collaborator.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, Maskable<String>)>,
    pub body: Option<RequestContent>,
}

/// Raw provider reply as returned by the transport.
#[derive(Debug, Clone)]
pub struct Response {
    pub status_code: u16,
    pub response: bytes::Bytes,
}

/// The provider-independent transaction outcome. Created per call, never
/// mutated.
#[derive(Debug, Clone)]
pub struct PaymentsResponse {
    pub success: bool,
    pub message: String,
    /// Opaque reference required to capture/void/refund this transaction.
    /// Present when the provider created a transaction; some processors
    /// return one even on declines, which connectors document.
    pub authorization: Option<String>,
    /// The provider's own decline/error code, kept in its native
    /// representation (string or number) for comparison against provider
    /// documentation.
    pub error_code: Option<serde_json::Value>,
    pub avs_result: Option<AvsResult>,
    pub cvv_result: Option<CvvResult>,
    /// Decoded provider fields in provider order, for diagnostics only.
    pub raw: serde_json::Map<String, serde_json::Value>,
    pub test_mode: bool,
    pub status_code: u16,
}

impl PaymentsResponse {
    /// A failed response carrying only a message, used when the provider's
    /// reply never arrived or could not be decoded.
    pub fn failed_with_message(message: &str, status_code: u16, test_mode: bool) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            authorization: None,
            error_code: None,
            avs_result: None,
            cvv_result: None,
            raw: serde_json::Map::new(),
            test_mode,
            status_code,
        }
    }
}

// Per-flow request data, owned by the caller for the duration of one call.

#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub options: PaymentOptions,
    /// True for purchase (atomic authorize+capture), false for authorize.
    pub auto_capture: bool,
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub amount: MinorUnit,
    pub connector_transaction_id: String,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub connector_transaction_id: String,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub amount: MinorUnit,
    pub connector_transaction_id: String,
    pub options: PaymentOptions,
}

/// Funds pushed to a card without a prior authorization reference.
#[derive(Debug, Clone)]
pub struct CreditData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct VerifyData {
    pub payment_method: PaymentMethod,
    pub currency: Currency,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct TokenizationData {
    pub card: Card,
    pub options: PaymentOptions,
}

#[derive(Debug, Clone)]
pub struct UnstoreData {
    pub card_id: Secret<String>,
}
