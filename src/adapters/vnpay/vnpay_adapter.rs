//! VNPay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for VNPay's hosted checkout.
//!
//! # Security
//!
//! - HMAC-SHA512 over the canonical parameter string, constant-time compare
//! - Callback fields are only read after the signature checks out
//! - The hash secret is held as `secrecy::SecretString` and only exposed to
//!   the signing call; neither it nor the signed payload is ever logged

use chrono::FixedOffset;
use secrecy::ExposeSecret;

use crate::config::PaymentConfig;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::{
    fields, signature, CallbackEnvelope, CanonicalPayload, ParameterSet, PaymentError,
    PaymentIntent, PaymentResult, RejectionReason, VerificationOutcome,
};
use crate::ports::{PaymentGateway, PaymentRedirect};

/// VNPay gateway built from process-wide configuration.
///
/// Immutable after construction, so one instance can be shared across
/// request handlers without locking.
pub struct VnpayGateway {
    config: PaymentConfig,
    provider_offset: FixedOffset,
}

impl VnpayGateway {
    pub fn new(config: PaymentConfig) -> Self {
        let provider_offset = FixedOffset::east_opt(fields::PROVIDER_UTC_OFFSET_SECS)
            .expect("provider UTC offset is within range");
        Self {
            config,
            provider_offset,
        }
    }

    /// Moment the provider stops accepting a URL issued at `now`.
    fn expiry_for(&self, now: Timestamp) -> Timestamp {
        now.plus_minutes(i64::from(self.config.expire_minutes))
    }

    /// Assembles the outbound parameter set for an intent issued at `now`.
    pub fn build_parameters(
        &self,
        intent: &PaymentIntent,
        client_ip: &str,
        now: Timestamp,
    ) -> ParameterSet {
        let client_ip = match client_ip.trim() {
            "" => fields::DEFAULT_CLIENT_IP,
            ip => ip,
        };
        let locale = intent.locale().unwrap_or(self.config.default_locale);
        let expires_at = self.expiry_for(now);

        let mut params = ParameterSet::new();
        params
            .insert(fields::VERSION, self.config.version.as_str())
            .insert(fields::COMMAND, fields::COMMAND_PAY)
            .insert(fields::TMN_CODE, self.config.merchant_code.as_str())
            .insert(fields::AMOUNT, intent.amount_minor().to_string())
            .insert(fields::CURR_CODE, self.config.currency.as_str())
            .insert(fields::CREATE_DATE, now.format_compact(self.provider_offset))
            .insert(fields::EXPIRE_DATE, expires_at.format_compact(self.provider_offset))
            .insert(fields::IP_ADDR, client_ip)
            .insert(fields::LOCALE, locale.as_str())
            .insert(fields::ORDER_INFO, intent.description())
            .insert(fields::ORDER_TYPE, self.config.order_type.as_str())
            .insert(fields::RETURN_URL, self.config.return_url.as_str())
            .insert(fields::TXN_REF, intent.order_reference())
            .insert_optional(fields::BANK_CODE, intent.bank_code());
        params
    }

    /// Builds the signed redirect URL for an intent issued at `now`.
    pub fn create_payment_url_at(
        &self,
        intent: &PaymentIntent,
        client_ip: &str,
        now: Timestamp,
    ) -> Result<PaymentRedirect, PaymentError> {
        let payload = self.build_parameters(intent, client_ip, now).encode();
        if payload.is_empty() {
            return Err(PaymentError::infrastructure("payment parameter set is empty"));
        }

        let secure_hash = self.sign(&payload);

        tracing::info!(
            order_reference = intent.order_reference(),
            amount = intent.amount(),
            "Issued payment URL"
        );

        Ok(PaymentRedirect {
            url: format!(
                "{}?{}&{}={}",
                self.config.payment_url,
                payload,
                fields::SECURE_HASH,
                secure_hash
            ),
            expires_at: self.expiry_for(now),
        })
    }

    fn sign(&self, payload: &CanonicalPayload) -> String {
        signature::sign(payload, self.config.hash_secret.expose_secret().as_bytes())
    }
}

impl PaymentGateway for VnpayGateway {
    fn create_payment_url(
        &self,
        intent: &PaymentIntent,
        client_ip: &str,
    ) -> Result<PaymentRedirect, PaymentError> {
        self.create_payment_url_at(intent, client_ip, Timestamp::now())
    }

    fn verify_callback(&self, envelope: &CallbackEnvelope) -> VerificationOutcome {
        let order_reference = envelope.claimed_order_reference().unwrap_or_default();

        let Some(claimed) = envelope.secure_hash() else {
            tracing::warn!(order_reference, "Rejected callback: missing signature");
            return VerificationOutcome::Invalid(RejectionReason::MissingSignature);
        };

        let payload = envelope.fields().encode();
        let secret = self.config.hash_secret.expose_secret().as_bytes();
        if payload.is_empty() || !signature::verify(&payload, secret, claimed) {
            tracing::warn!(order_reference, "Rejected callback: signature mismatch");
            return VerificationOutcome::Invalid(RejectionReason::SignatureMismatch);
        }

        match PaymentResult::from_verified_fields(envelope.fields()) {
            Ok(result) => VerificationOutcome::Valid(result),
            Err(reason) => {
                tracing::error!(
                    order_reference,
                    %reason,
                    "Signed callback carries malformed fields"
                );
                VerificationOutcome::Invalid(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::canonical::decode;
    use chrono::{DateTime, Utc};

    const TEST_SECRET: &str = "TESTSECRETKEY0123456789ABCDEFGHIJ";

    fn test_gateway() -> VnpayGateway {
        VnpayGateway::new(PaymentConfig::new(
            "DEMOSHOP",
            TEST_SECRET,
            "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html",
            "https://shop.example/payments/return",
        ))
    }

    fn fixed_now() -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn query_of(url: &str) -> Vec<(String, String)> {
        let (_, query) = url.split_once('?').unwrap();
        decode(query)
    }

    fn value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn callback_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("vnp_Amount", "15000000"),
            ("vnp_BankCode", "NCB"),
            ("vnp_BankTranNo", "VNP14226112"),
            ("vnp_CardType", "ATM"),
            ("vnp_OrderInfo", "Payment for order ORD-001"),
            ("vnp_PayDate", "20240115173500"),
            ("vnp_ResponseCode", "00"),
            ("vnp_TmnCode", "DEMOSHOP"),
            ("vnp_TransactionNo", "14226112"),
            ("vnp_TransactionStatus", "00"),
            ("vnp_TxnRef", "ORD-001"),
        ]
    }

    fn sign_fields(fields: &[(&str, &str)]) -> String {
        let params: ParameterSet = fields.iter().copied().collect();
        signature::sign(&params.encode(), TEST_SECRET.as_bytes())
    }

    fn signed_callback() -> Vec<(String, String)> {
        let fields = callback_fields();
        let secure_hash = sign_fields(&fields);
        let mut query: Vec<(String, String)> = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.push(("vnp_SecureHashType".to_string(), "HmacSHA512".to_string()));
        query.push(("vnp_SecureHash".to_string(), secure_hash));
        query
    }

    // ══════════════════════════════════════════════════════════════
    // Outbound Payment URL
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn payment_url_scales_amount_and_carries_signature() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 150_000).unwrap();

        let url = gateway
            .create_payment_url_at(&intent, "203.0.113.7", fixed_now())
            .unwrap()
            .url;

        assert!(url.starts_with("https://sandbox.vnpayment.vn/paymentv2/vpcpay.html?"));
        assert!(url.contains("vnp_Amount=15000000"));
        let pairs = query_of(&url);
        let hash = value(&pairs, "vnp_SecureHash").unwrap();
        assert_eq!(hash.len(), signature::SIGNATURE_HEX_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn payment_url_signature_covers_preceding_parameters() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 150_000).unwrap();

        let url = gateway
            .create_payment_url_at(&intent, "203.0.113.7", fixed_now())
            .unwrap()
            .url;

        let (_, query) = url.split_once('?').unwrap();
        let (signed, hash) = query.rsplit_once("&vnp_SecureHash=").unwrap();
        let expected = gateway
            .build_parameters(&intent, "203.0.113.7", fixed_now())
            .encode();
        assert_eq!(signed, expected.as_str());
        assert!(signature::verify(&expected, TEST_SECRET.as_bytes(), hash));
    }

    #[test]
    fn payment_url_is_deterministic_for_fixed_time() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 150_000).unwrap();

        let first = gateway.create_payment_url_at(&intent, "1.2.3.4", fixed_now());
        let second = gateway.create_payment_url_at(&intent, "1.2.3.4", fixed_now());

        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn redirect_expiry_matches_expire_date() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 1).unwrap();

        let redirect = gateway
            .create_payment_url_at(&intent, "1.2.3.4", fixed_now())
            .unwrap();

        assert_eq!(redirect.expires_at, fixed_now().plus_minutes(15));
        let pairs = query_of(&redirect.url);
        assert_eq!(value(&pairs, "vnp_ExpireDate"), Some("20240115174500"));
    }

    #[test]
    fn parameters_include_fixed_fields() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 150_000).unwrap();

        let params = gateway.build_parameters(&intent, "203.0.113.7", fixed_now());

        assert_eq!(params.get("vnp_Version"), Some("2.1.0"));
        assert_eq!(params.get("vnp_Command"), Some("pay"));
        assert_eq!(params.get("vnp_TmnCode"), Some("DEMOSHOP"));
        assert_eq!(params.get("vnp_CurrCode"), Some("VND"));
        assert_eq!(params.get("vnp_Locale"), Some("vn"));
        assert_eq!(params.get("vnp_OrderType"), Some("other"));
        assert_eq!(params.get("vnp_TxnRef"), Some("ORD-001"));
        assert_eq!(params.get("vnp_IpAddr"), Some("203.0.113.7"));
        assert_eq!(
            params.get("vnp_ReturnUrl"),
            Some("https://shop.example/payments/return")
        );
        assert_eq!(params.get("vnp_OrderInfo"), Some("Payment for order ORD-001"));
    }

    #[test]
    fn dates_use_provider_local_time() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 1).unwrap();

        let params = gateway.build_parameters(&intent, "1.2.3.4", fixed_now());

        // 10:30 UTC is 17:30 at UTC+07:00; expiry is 15 minutes later.
        assert_eq!(params.get("vnp_CreateDate"), Some("20240115173000"));
        assert_eq!(params.get("vnp_ExpireDate"), Some("20240115174500"));
    }

    #[test]
    fn bank_code_only_present_when_supplied() {
        let gateway = test_gateway();
        let without = PaymentIntent::new("ORD-001", 1).unwrap();
        let with = without.clone().with_bank_code(Some("NCB".to_string()));

        let params_without = gateway.build_parameters(&without, "1.2.3.4", fixed_now());
        let params_with = gateway.build_parameters(&with, "1.2.3.4", fixed_now());

        assert_eq!(params_without.get("vnp_BankCode"), None);
        assert_eq!(params_with.get("vnp_BankCode"), Some("NCB"));
    }

    #[test]
    fn blank_client_ip_falls_back_to_loopback() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 1).unwrap();

        let params = gateway.build_parameters(&intent, "  ", fixed_now());

        assert_eq!(params.get("vnp_IpAddr"), Some("127.0.0.1"));
    }

    #[test]
    fn intent_locale_overrides_default() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 1)
            .unwrap()
            .with_locale(Some(crate::domain::payment::Locale::En));

        let params = gateway.build_parameters(&intent, "1.2.3.4", fixed_now());

        assert_eq!(params.get("vnp_Locale"), Some("en"));
    }

    #[test]
    fn payment_url_does_not_contain_secret() {
        let gateway = test_gateway();
        let intent = PaymentIntent::new("ORD-001", 1).unwrap();

        let url = gateway.create_payment_url(&intent, "1.2.3.4").unwrap().url;

        assert!(!url.contains(TEST_SECRET));
    }

    // ══════════════════════════════════════════════════════════════
    // Callback Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn genuine_callback_is_valid() {
        let gateway = test_gateway();
        let envelope = CallbackEnvelope::from_query(signed_callback());

        match gateway.verify_callback(&envelope) {
            VerificationOutcome::Valid(result) => {
                assert_eq!(result.order_reference, "ORD-001");
                assert_eq!(result.amount, 150_000);
                assert_eq!(result.transaction_no.as_deref(), Some("14226112"));
                assert!(result.is_successful());
            }
            other => panic!("expected valid outcome, got {:?}", other),
        }
    }

    #[test]
    fn uppercase_signature_is_accepted() {
        let gateway = test_gateway();
        let query: Vec<(String, String)> = signed_callback()
            .into_iter()
            .map(|(k, v)| {
                if k == "vnp_SecureHash" {
                    (k, v.to_uppercase())
                } else {
                    (k, v)
                }
            })
            .collect();

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert!(outcome.is_valid());
    }

    #[test]
    fn tampered_response_code_is_rejected() {
        let gateway = test_gateway();
        let query: Vec<(String, String)> = signed_callback()
            .into_iter()
            .map(|(k, v)| {
                if k == "vnp_ResponseCode" {
                    (k, "24".to_string())
                } else {
                    (k, v)
                }
            })
            .collect();

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(RejectionReason::SignatureMismatch)
        );
    }

    #[test]
    fn injected_parameter_is_rejected() {
        let gateway = test_gateway();
        let mut query = signed_callback();
        query.push(("vnp_Extra".to_string(), "1".to_string()));

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(RejectionReason::SignatureMismatch)
        );
    }

    #[test]
    fn non_provider_parameters_do_not_affect_signature() {
        let gateway = test_gateway();
        let mut query = signed_callback();
        query.push(("utm_source".to_string(), "newsletter".to_string()));

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert!(outcome.is_valid());
    }

    #[test]
    fn missing_signature_is_rejected() {
        let gateway = test_gateway();
        let query: Vec<(String, String)> = signed_callback()
            .into_iter()
            .filter(|(k, _)| k != "vnp_SecureHash")
            .collect();

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(RejectionReason::MissingSignature)
        );
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let gateway = test_gateway();
        let query: Vec<(String, String)> = signed_callback()
            .into_iter()
            .map(|(k, v)| {
                if k == "vnp_SecureHash" {
                    (k, "not-hex".to_string())
                } else {
                    (k, v)
                }
            })
            .collect();

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(RejectionReason::SignatureMismatch)
        );
    }

    #[test]
    fn signed_but_malformed_amount_is_distinct() {
        let gateway = test_gateway();
        let fields: Vec<(&str, &str)> = callback_fields()
            .into_iter()
            .map(|(k, v)| if k == "vnp_Amount" { (k, "abc") } else { (k, v) })
            .collect();
        let secure_hash = sign_fields(&fields);
        let mut query: Vec<(String, String)> = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.push(("vnp_SecureHash".to_string(), secure_hash));

        let outcome = gateway.verify_callback(&CallbackEnvelope::from_query(query));

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(RejectionReason::MalformedAmount)
        );
    }

    #[test]
    fn callback_signed_with_other_secret_is_rejected() {
        let other = VnpayGateway::new(PaymentConfig::new(
            "DEMOSHOP",
            "some-other-secret",
            "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html",
            "https://shop.example/payments/return",
        ));

        let outcome = other.verify_callback(&CallbackEnvelope::from_query(signed_callback()));

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(RejectionReason::SignatureMismatch)
        );
    }
}
