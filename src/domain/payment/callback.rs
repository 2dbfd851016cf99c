//! Inbound callback handling: envelope extraction and the typed outcome.
//!
//! Processing runs `Received -> SignatureChecked -> Parsed`, rejecting at
//! each step. Nothing in a callback is trusted until the signature over its
//! `vnp_` fields has been checked.

use serde::Serialize;
use thiserror::Error;

use super::canonical::ParameterSet;
use super::errors::PaymentError;
use super::fields;
use super::response_code::{ResponseCode, TransactionStatus};

/// Raw callback parameters split into the signed fields and the claimed
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEnvelope {
    fields: ParameterSet,
    secure_hash: Option<String>,
}

impl CallbackEnvelope {
    /// Builds an envelope from transport query pairs.
    ///
    /// Keeps only `vnp_` keys, minus the signature and its type hint. A blank
    /// signature counts as absent.
    pub fn from_query<I, K, V>(query: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut signed = ParameterSet::new();
        let mut secure_hash = None;

        for (key, value) in query {
            let key = key.as_ref();
            if key == fields::SECURE_HASH {
                let value: String = value.into();
                secure_hash = Some(value).filter(|v| !v.is_empty());
            } else if fields::is_signed_parameter(key) {
                signed.insert(key, value);
            }
        }

        Self {
            fields: signed,
            secure_hash,
        }
    }

    pub fn fields(&self) -> &ParameterSet {
        &self.fields
    }

    pub fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    /// Claimed order reference. Untrusted until verified; use for logging only.
    pub fn claimed_order_reference(&self) -> Option<&str> {
        self.fields.get(fields::TXN_REF)
    }
}

/// Why a callback was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("missing signature")]
    MissingSignature,

    #[error("malformed amount")]
    MalformedAmount,

    #[error("missing field {0}")]
    MissingField(&'static str),
}

/// Result of checking a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid(PaymentResult),
    Invalid(RejectionReason),
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid(_))
    }

    pub fn into_result(self) -> Result<PaymentResult, PaymentError> {
        match self {
            VerificationOutcome::Valid(result) => Ok(result),
            VerificationOutcome::Invalid(reason) => Err(reason.into()),
        }
    }
}

/// Normalized fields of an authenticated callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentResult {
    pub order_reference: String,
    pub response_code: ResponseCode,
    pub transaction_status: TransactionStatus,
    /// Amount in major units.
    pub amount: i64,
    pub transaction_no: Option<String>,
    pub bank_code: Option<String>,
    pub card_type: Option<String>,
    /// Provider pay date, `yyyyMMddHHmmss` at UTC+07:00.
    pub pay_date: Option<String>,
}

impl PaymentResult {
    /// Parses the fields of a callback whose signature already checked out.
    pub fn from_verified_fields(fields: &ParameterSet) -> Result<Self, RejectionReason> {
        let order_reference = required(fields, fields::TXN_REF)?;
        let response_code = required(fields, fields::RESPONSE_CODE)?;
        let transaction_status = required(fields, fields::TRANSACTION_STATUS)?;
        let amount = minor_to_major(required(fields, fields::AMOUNT)?)?;

        Ok(Self {
            order_reference: order_reference.to_string(),
            response_code: ResponseCode::new(response_code),
            transaction_status: TransactionStatus::new(transaction_status),
            amount,
            transaction_no: optional(fields, fields::TRANSACTION_NO),
            bank_code: optional(fields, fields::BANK_CODE),
            card_type: optional(fields, fields::CARD_TYPE),
            pay_date: optional(fields, fields::PAY_DATE),
        })
    }

    /// Paid only when both the response code and the transaction status
    /// report success.
    pub fn is_successful(&self) -> bool {
        self.response_code.is_success() && self.transaction_status.is_success()
    }
}

/// Converts a minor-unit amount string to major units.
///
/// The value must be a non-negative integer and an exact multiple of the
/// minor-unit factor.
pub fn minor_to_major(raw: &str) -> Result<i64, RejectionReason> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectionReason::MalformedAmount);
    }
    let minor: i64 = raw.parse().map_err(|_| RejectionReason::MalformedAmount)?;
    if minor % fields::MINOR_UNIT_FACTOR != 0 {
        return Err(RejectionReason::MalformedAmount);
    }
    Ok(minor / fields::MINOR_UNIT_FACTOR)
}

fn required<'a>(fields: &'a ParameterSet, key: &'static str) -> Result<&'a str, RejectionReason> {
    fields
        .get(key)
        .filter(|v| !v.is_empty())
        .ok_or(RejectionReason::MissingField(key))
}

fn optional(fields: &ParameterSet, key: &str) -> Option<String> {
    fields
        .get(key)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
