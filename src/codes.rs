//! Canonical AVS and CVV code tables.
//!
//! Processors report address and card-verification outcomes as single
//! letter codes. The tables here translate those codes into one small
//! canonical vocabulary; they are process-wide, read-only and built once.
//! Codes outside the tables classify as unavailable instead of failing,
//! since an unknown letter from a processor must never sink a response.

use std::{collections::HashMap, sync::LazyLock};

use serde::Serialize;

/// Street or postal match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AvsCheck {
    Match,
    NoMatch,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvsResult {
    pub code: String,
    pub message: String,
    pub street_match: AvsCheck,
    pub postal_match: AvsCheck,
}

static AVS_MESSAGES: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('A', "Street address matches, but postal code does not match."),
        ('B', "Street address matches, but postal code not verified."),
        ('C', "Street address and postal code do not match."),
        ('D', "Street address and postal code match."),
        ('E', "AVS data is invalid or AVS is not allowed for this card type."),
        ('F', "Card member's name does not match, but billing postal code matches."),
        ('G', "Non-U.S. issuing bank does not support AVS."),
        ('H', "Card member's name does not match. Street address and postal code match."),
        ('I', "Address not verified."),
        ('J', "Card member's name, billing address, and postal code match. Shipping information verified and chargeback protection guaranteed through the Fraud Protection Program."),
        ('K', "Card member's name matches but billing address and billing postal code do not match."),
        ('L', "Card member's name and billing postal code match, but billing address does not match."),
        ('M', "Street address and postal code match."),
        ('N', "Street address and postal code do not match."),
        ('O', "Card member's name and billing address match, but billing postal code does not match."),
        ('P', "Postal code matches, but street address not verified."),
        ('Q', "Card member's name, billing address, and postal code match. Shipping information verified but chargeback protection not guaranteed."),
        ('R', "System unavailable."),
        ('S', "U.S.-issuing bank does not support AVS."),
        ('T', "Card member's name does not match, but street address matches."),
        ('U', "Address information unavailable."),
        ('V', "Card member's name, billing address, and billing postal code match."),
        ('W', "Street address does not match, but 9-digit postal code matches."),
        ('X', "Street address and 9-digit postal code match."),
        ('Y', "Street address and 5-digit postal code match."),
        ('Z', "Street address does not match, but 5-digit postal code matches."),
    ])
});

const AVS_DEFAULT_MESSAGE: &str = "Address information unavailable.";

fn avs_street_match(code: char) -> AvsCheck {
    match code {
        'A' | 'B' | 'D' | 'H' | 'J' | 'M' | 'O' | 'Q' | 'T' | 'V' | 'X' | 'Y' => AvsCheck::Match,
        'C' | 'K' | 'L' | 'N' | 'W' | 'Z' => AvsCheck::NoMatch,
        _ => AvsCheck::Unavailable,
    }
}

fn avs_postal_match(code: char) -> AvsCheck {
    match code {
        'D' | 'F' | 'H' | 'J' | 'L' | 'M' | 'P' | 'Q' | 'V' | 'W' | 'X' | 'Y' | 'Z' => {
            AvsCheck::Match
        }
        'A' | 'C' | 'K' | 'N' | 'O' => AvsCheck::NoMatch,
        _ => AvsCheck::Unavailable,
    }
}

impl AvsResult {
    pub fn from_code(code: &str) -> Self {
        let letter = code.trim().chars().next().map(|c| c.to_ascii_uppercase());
        let (message, street_match, postal_match) = match letter {
            Some(letter) => (
                AVS_MESSAGES
                    .get(&letter)
                    .copied()
                    .unwrap_or(AVS_DEFAULT_MESSAGE),
                avs_street_match(letter),
                avs_postal_match(letter),
            ),
            None => (AVS_DEFAULT_MESSAGE, AvsCheck::Unavailable, AvsCheck::Unavailable),
        };
        Self {
            code: code.to_string(),
            message: message.to_string(),
            street_match,
            postal_match,
        }
    }
}

/// Card-verification-value outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CvvCheck {
    Matches,
    DoesNotMatch,
    NotProcessed,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvvResult {
    pub code: String,
    pub message: String,
    pub check: CvvCheck,
}

static CVV_MESSAGES: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ('D', "CVV check flagged transaction as suspicious"),
        ('I', "CVV failed data validation check"),
        ('M', "CVV matches"),
        ('N', "CVV does not match"),
        ('P', "CVV not processed"),
        ('S', "CVV should have been present"),
        ('U', "CVV request unable to be processed by issuer"),
        ('X', "CVV check not supported for card"),
    ])
});

const CVV_DEFAULT_MESSAGE: &str = "CVV result unavailable";

impl CvvResult {
    pub fn from_code(code: &str) -> Self {
        let letter = code.trim().chars().next().map(|c| c.to_ascii_uppercase());
        let message = letter
            .and_then(|letter| CVV_MESSAGES.get(&letter).copied())
            .unwrap_or(CVV_DEFAULT_MESSAGE);
        let check = match letter {
            Some('M') => CvvCheck::Matches,
            Some('N') => CvvCheck::DoesNotMatch,
            Some('P') => CvvCheck::NotProcessed,
            _ => CvvCheck::Unavailable,
        };
        Self {
            code: code.to_string(),
            message: message.to_string(),
            check,
        }
    }
}
