//! Typed pending transaction record
//!
//! Only key presence is enforced before broadcasting. Values are kept as
//! loose JSON and interpreted by whoever uses them, so a pre-signed payload
//! is never held back by a field only the fallback signer reads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::amount::format_signed_btc_amount;

/// Transfer described by the upstream signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub from_address: Value,
    pub to_address: Value,
    pub amount_sats: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_sats: Option<Value>,
}

impl TransferDetails {
    pub fn from_address(&self) -> Option<&str> { self.from_address.as_str() }

    pub fn to_address(&self) -> Option<&str> { self.to_address.as_str() }

    /// Whole satoshis. Integral floats such as `1000.0` are accepted.
    pub fn amount(&self) -> Option<i64> { whole_sats(&self.amount_sats) }

    pub fn amount_btc(&self) -> Option<String> { self.amount().map(format_signed_btc_amount) }

    /// Requested fee as given. `null` and absent are the same.
    pub fn fee(&self) -> Option<&Value> { self.fee_sats.as_ref().filter(|fee| !fee.is_null()) }
}

/// Integer view of a JSON number, if it has one.
pub fn whole_sats(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// Field rendered for logs: strings bare, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// WIF private key. Wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretWif(String);

impl SecretWif {
    pub fn new(wif: impl Into<String>) -> Self { Self(wif.into()) }
    pub fn expose(&self) -> &str { &self.0 }
}

impl std::fmt::Debug for SecretWif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str("SecretWif(<redacted>)") }
}

/// The single record left behind by the upstream signing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub transaction: TransferDetails,
    /// Key must be present. A `null` or non-string value only fails if the fallback needs it.
    #[serde(deserialize_with = "string_or_none")]
    pub private_key_wif: Option<SecretWif>,
    /// Informational only.
    pub address: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Value>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub raw_transaction_hex: Option<String>,
}

fn string_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(T::from(s)),
        _ => None,
    })
}

impl From<String> for SecretWif {
    fn from(wif: String) -> Self { Self(wif) }
}

impl PendingTransaction {
    /// Pre-signed payload, ignoring empty strings.
    pub fn raw_hex(&self) -> Option<&str> {
        self.raw_transaction_hex.as_deref().map(str::trim).filter(|hex| !hex.is_empty())
    }

    pub fn is_signed(&self) -> bool {
        match &self.signature {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Bool(b)) => *b,
            Some(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(extra: serde_json::Value) -> PendingTransaction {
        let mut base = json!({
            "transaction": {"from_address": "A", "to_address": "B", "amount_sats": 1000},
            "private_key_wif": "K",
            "address": "A"
        });
        if let (Some(obj), Some(add)) = (base.as_object_mut(), extra.as_object()) {
            obj.extend(add.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn empty_raw_hex_counts_as_absent() {
        assert_eq!(record(json!({})).raw_hex(), None);
        assert_eq!(record(json!({"raw_transaction_hex": ""})).raw_hex(), None);
        assert_eq!(record(json!({"raw_transaction_hex": null})).raw_hex(), None);
        assert_eq!(record(json!({"raw_transaction_hex": " deadbeef\n"})).raw_hex(), Some("deadbeef"));
    }

    #[test]
    fn amounts_are_read_leniently() {
        assert_eq!(record(json!({})).transaction.amount(), Some(1000));
        let mut rec = record(json!({}));
        rec.transaction.amount_sats = json!(1000.0);
        assert_eq!(rec.transaction.amount(), Some(1000));
        assert_eq!(rec.transaction.amount_btc().as_deref(), Some("0.00001000"));
        rec.transaction.amount_sats = json!(10.5);
        assert_eq!(rec.transaction.amount(), None);
        rec.transaction.amount_sats = json!("ten");
        assert_eq!(rec.transaction.amount_btc(), None);
    }

    #[test]
    fn loose_field_types_still_decode() {
        let rec = record(json!({"address": null, "private_key_wif": 7, "raw_transaction_hex": 42}));
        assert!(rec.address.is_null());
        assert!(rec.private_key_wif.is_none());
        assert_eq!(rec.raw_hex(), None);

        let mut rec = record(json!({}));
        assert_eq!(rec.transaction.fee(), None);
        rec.transaction.fee_sats = Some(json!(null));
        assert_eq!(rec.transaction.fee(), None);
        rec.transaction.fee_sats = Some(json!(-1));
        assert_eq!(rec.transaction.fee(), Some(&json!(-1)));
    }

    #[test]
    fn signature_presence() {
        assert!(!record(json!({})).is_signed());
        assert!(!record(json!({"signature": ""})).is_signed());
        assert!(record(json!({"signature": "3045..."})).is_signed());
        assert!(record(json!({"signature": [48, 69]})).is_signed());
    }

    #[test]
    fn wif_is_redacted_in_debug() {
        let rec = record(json!({}));
        let printed = format!("{:?}", rec);
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("\"K\""));
    }
}
