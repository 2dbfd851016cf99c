//! Provider result codes.
//!
//! A callback carries two codes: `vnp_ResponseCode` (outcome of the payment
//! attempt) and `vnp_TransactionStatus` (state of the transaction at the
//! provider). A payment only counts as paid when both are `00`.

use serde::Serialize;

const SUCCESS: &str = "00";

/// Value of `vnp_ResponseCode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseCode(String);

impl ResponseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == SUCCESS
    }

    /// Human-readable meaning of the code.
    pub fn description(&self) -> &'static str {
        match self.0.as_str() {
            "00" => "Transaction successful",
            "07" => "Amount deducted, transaction flagged as suspicious",
            "09" => "Card or account not registered for internet banking",
            "10" => "Card or account authentication failed more than 3 times",
            "11" => "Payment window expired",
            "12" => "Card or account is locked",
            "13" => "Incorrect one-time password",
            "24" => "Customer cancelled the transaction",
            "51" => "Insufficient balance",
            "65" => "Daily transaction limit exceeded",
            "75" => "Issuing bank under maintenance",
            "79" => "Payment password entered incorrectly too many times",
            "99" => "Other error",
            _ => "Unknown response code",
        }
    }
}

/// Value of `vnp_TransactionStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransactionStatus(String);

impl TransactionStatus {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == SUCCESS
    }

    pub fn description(&self) -> &'static str {
        match self.0.as_str() {
            "00" => "Transaction completed",
            "01" => "Transaction not completed",
            "02" => "Transaction failed",
            "04" => "Transaction reversed",
            "05" => "Refund in progress",
            "06" => "Refund sent to bank",
            "07" => "Transaction flagged as suspicious",
            "09" => "Refund rejected",
            _ => "Unknown transaction status",
        }
    }
}
