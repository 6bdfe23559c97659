//! Record validation: key presence only (fail fast, in order), then a loose decode

use serde_json::Value;

use super::record::PendingTransaction;
use crate::error::{BroadcastError, BroadcastResult};

pub const REQUIRED_FIELDS: &[&str] = &["transaction", "private_key_wif", "address"];
pub const REQUIRED_TRANSACTION_FIELDS: &[&str] = &["from_address", "to_address", "amount_sats"];

/// Check required keys, stopping at the first one missing. Values are not inspected.
pub fn check_presence(record: &Value) -> BroadcastResult<()> {
    let top = record.as_object().ok_or_else(|| BroadcastError::MalformedRecord("record is not a JSON object".into()))?;
    for field in REQUIRED_FIELDS {
        if !top.contains_key(*field) {
            return Err(BroadcastError::MissingField(*field));
        }
    }

    let tx = top.get("transaction").and_then(Value::as_object)
        .ok_or_else(|| BroadcastError::MalformedRecord("'transaction' is not an object".into()))?;
    for field in REQUIRED_TRANSACTION_FIELDS {
        if !tx.contains_key(*field) {
            return Err(BroadcastError::MissingTransactionField(*field));
        }
    }
    Ok(())
}

/// Presence checks followed by decoding into [`PendingTransaction`]. Field
/// values are not type checked; see [`super::record`].
pub fn validate(record: &Value) -> BroadcastResult<PendingTransaction> {
    check_presence(record)?;
    serde_json::from_value(record.clone()).map_err(|e| BroadcastError::MalformedRecord(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Value {
        json!({
            "transaction": {"from_address": "A", "to_address": "B", "amount_sats": 1000},
            "private_key_wif": "K",
            "address": "A"
        })
    }

    #[test]
    fn complete_record_validates() {
        let rec = validate(&full()).expect("valid");
        assert_eq!(rec.transaction.to_address(), Some("B"));
        assert_eq!(rec.private_key_wif.as_ref().map(|k| k.expose()), Some("K"));
    }

    #[test]
    fn reports_first_missing_top_level_field() {
        let mut rec = full();
        let obj = rec.as_object_mut().unwrap();
        obj.remove("private_key_wif");
        obj.remove("address");
        assert!(matches!(validate(&rec), Err(BroadcastError::MissingField("private_key_wif"))));
    }

    #[test]
    fn top_level_checked_before_nested() {
        let mut rec = full();
        rec["transaction"].as_object_mut().unwrap().remove("to_address");
        rec.as_object_mut().unwrap().remove("address");
        assert!(matches!(validate(&rec), Err(BroadcastError::MissingField("address"))));
    }

    #[test]
    fn reports_missing_nested_field() {
        let mut rec = full();
        rec["transaction"].as_object_mut().unwrap().remove("to_address");
        assert!(matches!(validate(&rec), Err(BroadcastError::MissingTransactionField("to_address"))));
    }

    #[test]
    fn null_wif_counts_as_present() {
        let mut rec = full();
        rec["private_key_wif"] = Value::Null;
        let decoded = validate(&rec).expect("present key passes");
        assert!(decoded.private_key_wif.is_none());
    }

    #[test]
    fn negative_amount_is_not_rejected_here() {
        let mut rec = full();
        rec["transaction"]["amount_sats"] = json!(-5);
        assert_eq!(validate(&rec).expect("valid").transaction.amount(), Some(-5));
    }

    #[test]
    fn value_types_are_not_checked() {
        let mut rec = full();
        rec["address"] = Value::Null;
        rec["transaction"]["amount_sats"] = json!("ten");
        rec["transaction"]["fee_sats"] = json!(-1);
        assert!(validate(&rec).is_ok());
    }

    #[test]
    fn non_object_shapes_are_malformed() {
        assert!(matches!(validate(&json!([1, 2])), Err(BroadcastError::MalformedRecord(_))));
        let mut rec = full();
        rec["transaction"] = json!("A->B");
        assert!(matches!(validate(&rec), Err(BroadcastError::MalformedRecord(_))));
    }
}
