//! Payment configuration (VNPay)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use super::error::ValidationError;
use crate::domain::payment::Locale;

/// Payment gateway configuration (VNPay)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Merchant terminal code (vnp_TmnCode)
    pub merchant_code: String,

    /// Shared HMAC secret. Redacted in Debug output.
    pub hash_secret: SecretString,

    /// Provider payment page base URL
    pub payment_url: String,

    /// Where the provider sends the customer after payment
    pub return_url: String,

    /// Protocol version (vnp_Version)
    #[serde(default = "default_version")]
    pub version: String,

    /// Currency code (vnp_CurrCode)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Payment page language when the request does not pick one
    #[serde(default)]
    pub default_locale: Locale,

    /// Order category (vnp_OrderType)
    #[serde(default = "default_order_type")]
    pub order_type: String,

    /// Minutes until an issued payment URL expires
    #[serde(default = "default_expire_minutes")]
    pub expire_minutes: u32,
}

impl PaymentConfig {
    /// Create a configuration with default protocol settings.
    pub fn new(
        merchant_code: impl Into<String>,
        hash_secret: impl Into<String>,
        payment_url: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_code: merchant_code.into(),
            hash_secret: SecretString::new(hash_secret.into()),
            payment_url: payment_url.into(),
            return_url: return_url.into(),
            version: default_version(),
            currency: default_currency(),
            default_locale: Locale::default(),
            order_type: default_order_type(),
            expire_minutes: default_expire_minutes(),
        }
    }

    /// Check if pointing at the provider sandbox
    pub fn is_sandbox(&self) -> bool {
        self.payment_url.contains("sandbox")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.merchant_code.trim().is_empty() {
            return Err(ValidationError::MissingRequired("MERCHANT_CODE"));
        }
        if self.hash_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("HASH_SECRET"));
        }
        let payment_url = validate_url(&self.payment_url, "PAYMENT_URL")?;
        // The signed payload is appended after `?`, so the base carries no query.
        if payment_url.query().is_some() || payment_url.fragment().is_some() {
            return Err(ValidationError::InvalidUrl("PAYMENT_URL"));
        }
        validate_url(&self.return_url, "RETURN_URL")?;

        if !(1..=1440).contains(&self.expire_minutes) {
            return Err(ValidationError::InvalidExpiry);
        }

        Ok(())
    }
}

fn validate_url(value: &str, name: &'static str) -> Result<Url, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ValidationError::InvalidUrl(name)),
    }
}

fn default_version() -> String {
    "2.1.0".to_string()
}

fn default_currency() -> String {
    "VND".to_string()
}

fn default_order_type() -> String {
    "other".to_string()
}

fn default_expire_minutes() -> u32 {
    15
}
