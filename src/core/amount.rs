//! Satoshi ↔ BTC rendering with integer arithmetic only

use bitcoin::Amount;

pub const SATS_PER_BTC: u64 = 100_000_000;

/// Render satoshis in BTC with all eight decimal places (`150000` → `0.00150000`).
pub fn format_btc_amount(amount_sat: u64) -> String {
    let whole = amount_sat / SATS_PER_BTC;
    let frac = amount_sat % SATS_PER_BTC;
    format!("{}.{:08}", whole, frac)
}

/// Same as [`format_btc_amount`] for a signed record value; keeps the sign.
pub fn format_signed_btc_amount(amount_sat: i64) -> String {
    let sign = if amount_sat < 0 { "-" } else { "" };
    format!("{}{}", sign, format_btc_amount(amount_sat.unsigned_abs()))
}

pub fn btc(amount: Amount) -> String { format_btc_amount(amount.to_sat()) }

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::Denomination;

    #[test]
    fn converts_without_float_drift() {
        assert_eq!(format_btc_amount(150_000), "0.00150000");
        assert_eq!(format_btc_amount(1), "0.00000001");
        assert_eq!(format_btc_amount(100_000_000), "1.00000000");
        assert_eq!(format_btc_amount(0), "0.00000000");
        assert_eq!(format_btc_amount(2_100_000_000_000_000), "21000000.00000000");
    }

    #[test]
    fn agrees_with_bitcoin_denomination_parser() {
        for sats in [1u64, 1_000, 150_000, 99_999_999, 100_000_000, 123_456_789] {
            let parsed = Amount::from_str_in(&format_btc_amount(sats), Denomination::Bitcoin).unwrap();
            assert_eq!(parsed.to_sat(), sats);
        }
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_signed_btc_amount(-1000), "-0.00001000");
        assert_eq!(format_signed_btc_amount(1000), "0.00001000");
    }
}
