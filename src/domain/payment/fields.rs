//! VNPay wire vocabulary.
//!
//! Every parameter exchanged with the provider is a flat string pair whose
//! key carries the `vnp_` namespace prefix.

/// Namespace prefix shared by all provider parameters.
pub const PARAM_PREFIX: &str = "vnp_";

pub const VERSION: &str = "vnp_Version";
pub const COMMAND: &str = "vnp_Command";
pub const TMN_CODE: &str = "vnp_TmnCode";
pub const AMOUNT: &str = "vnp_Amount";
pub const CURR_CODE: &str = "vnp_CurrCode";
pub const CREATE_DATE: &str = "vnp_CreateDate";
pub const EXPIRE_DATE: &str = "vnp_ExpireDate";
pub const IP_ADDR: &str = "vnp_IpAddr";
pub const LOCALE: &str = "vnp_Locale";
pub const ORDER_INFO: &str = "vnp_OrderInfo";
pub const ORDER_TYPE: &str = "vnp_OrderType";
pub const RETURN_URL: &str = "vnp_ReturnUrl";
pub const TXN_REF: &str = "vnp_TxnRef";
pub const BANK_CODE: &str = "vnp_BankCode";

pub const RESPONSE_CODE: &str = "vnp_ResponseCode";
pub const TRANSACTION_STATUS: &str = "vnp_TransactionStatus";
pub const TRANSACTION_NO: &str = "vnp_TransactionNo";
pub const PAY_DATE: &str = "vnp_PayDate";
pub const CARD_TYPE: &str = "vnp_CardType";

/// Signature parameter. Never part of the signed payload.
pub const SECURE_HASH: &str = "vnp_SecureHash";

/// Algorithm hint some callbacks carry. Never part of the signed payload.
pub const SECURE_HASH_TYPE: &str = "vnp_SecureHashType";

/// Command value for payment initiation.
pub const COMMAND_PAY: &str = "pay";

/// Amounts travel in minor units: major units multiplied by this factor.
pub const MINOR_UNIT_FACTOR: i64 = 100;

/// Provider timestamps are wall-clock time at UTC+07:00.
pub const PROVIDER_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Caller address used when the transport cannot supply one.
pub const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// Returns true for keys that belong to the signed callback payload.
pub fn is_signed_parameter(key: &str) -> bool {
    key.starts_with(PARAM_PREFIX) && key != SECURE_HASH && key != SECURE_HASH_TYPE
}
