//! Payment intent - the validated input of an outbound payment request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::fields::MINOR_UNIT_FACTOR;
use crate::domain::foundation::ValidationError;

/// Language of the provider's payment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vn,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Vn => "vn",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vn" => Ok(Locale::Vn),
            "en" => Ok(Locale::En),
            other => Err(ValidationError::invalid_format(
                "locale",
                format!("unsupported locale '{}'", other),
            )),
        }
    }
}

/// A request to collect `amount` (major units) for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    order_reference: String,
    amount: i64,
    order_info: Option<String>,
    bank_code: Option<String>,
    locale: Option<Locale>,
}

impl PaymentIntent {
    /// Largest amount whose minor-unit form still fits in an i64.
    pub const MAX_AMOUNT: i64 = i64::MAX / MINOR_UNIT_FACTOR;

    /// Validates and creates an intent.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the order reference is blank
    /// - `OutOfRange` if the amount is not positive or overflows minor units
    pub fn new(order_reference: impl Into<String>, amount: i64) -> Result<Self, ValidationError> {
        let order_reference = order_reference.into().trim().to_string();
        if order_reference.is_empty() {
            return Err(ValidationError::empty_field("order_id"));
        }
        if !(1..=Self::MAX_AMOUNT).contains(&amount) {
            return Err(ValidationError::out_of_range(
                "amount",
                1,
                Self::MAX_AMOUNT,
                amount,
            ));
        }

        Ok(Self {
            order_reference,
            amount,
            order_info: None,
            bank_code: None,
            locale: None,
        })
    }

    /// Sets the order description shown on the payment page. Blank is ignored.
    pub fn with_order_info(mut self, order_info: Option<String>) -> Self {
        self.order_info = non_blank(order_info);
        self
    }

    /// Preselects a bank channel. Blank is ignored.
    pub fn with_bank_code(mut self, bank_code: Option<String>) -> Self {
        self.bank_code = non_blank(bank_code);
        self
    }

    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn order_reference(&self) -> &str {
        &self.order_reference
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Amount as transmitted to the provider.
    pub fn amount_minor(&self) -> i64 {
        // Bounded by MAX_AMOUNT at construction.
        self.amount * MINOR_UNIT_FACTOR
    }

    pub fn bank_code(&self) -> Option<&str> {
        self.bank_code.as_deref()
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    /// Order description, defaulting to one derived from the reference.
    pub fn description(&self) -> String {
        self.order_info
            .clone()
            .unwrap_or_else(|| format!("Payment for order {}", self.order_reference))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
