//! FallbackBroadcaster - sign locally with the record's WIF and submit
//!
//! The key is parsed before anything touches the network. The spend is a
//! single output to `to_address`; change handling and coin selection are the
//! signing capability's business.

use bitcoin::{Amount, NetworkKind, PrivateKey};
use serde_json::Value;
use tracing::info;

use super::{FeePolicy, PaymentOutput, SigningCapability, SigningRequest};
use crate::error::{BroadcastError, BroadcastResult};
use crate::network::Network;
use crate::pending::{display_value, whole_sats, SecretWif, TransferDetails};

pub struct FallbackBroadcaster {
    signer: Box<dyn SigningCapability>,
    network: Network,
}

impl FallbackBroadcaster {
    pub fn new(signer: Box<dyn SigningCapability>, network: Network) -> Self { Self { signer, network } }

    pub fn network(&self) -> Network { self.network }

    pub async fn sign_and_broadcast(&self, transaction: &TransferDetails, wif: Option<&SecretWif>, fee: Option<&Value>) -> BroadcastResult<String> {
        let key = signing_identity(wif, self.network)?;
        let output = single_output(transaction)?;
        let fee = fee_policy(fee)?;

        match fee {
            FeePolicy::Absolute(fee) => info!(signer = self.signer.name(), fee_sats = fee.to_sat(), "Broadcasting with explicit fee"),
            FeePolicy::Estimate => info!(signer = self.signer.name(), "Broadcasting with estimated fee"),
        }
        info!(to = %output.destination, amount = %output.amount_btc(), unit = output.unit(), "Fallback output");

        let source_address = transaction.from_address().unwrap_or_default().to_string();
        let request = SigningRequest { key, source_address, outputs: vec![output], fee };
        let txid = self.signer.sign_and_send(request).await.map_err(|e| match e {
            BroadcastError::Signing(_) => e,
            other => BroadcastError::Signing(other.to_string()),
        })?;
        let txid = txid.trim().to_string();
        if txid.is_empty() {
            return Err(BroadcastError::Signing(format!("{} signer returned no txid", self.signer.name())));
        }
        info!(txid = %txid, "Broadcast via fallback signer");
        Ok(txid)
    }
}

/// Parse the WIF and check it belongs to `network`.
pub fn signing_identity(wif: Option<&SecretWif>, network: Network) -> BroadcastResult<PrivateKey> {
    let wif = wif.ok_or_else(|| BroadcastError::Signing("no private key in pending record".into()))?;
    let key = PrivateKey::from_wif(wif.expose().trim())
        .map_err(|e| BroadcastError::Signing(format!("could not load WIF: {}", e)))?;
    let expected = NetworkKind::from(network.to_bitcoin());
    if key.network != expected {
        return Err(BroadcastError::Signing(format!("WIF is not a {} key", network)));
    }
    Ok(key)
}

pub fn single_output(transaction: &TransferDetails) -> BroadcastResult<PaymentOutput> {
    let to = transaction.to_address()
        .filter(|to| !to.trim().is_empty())
        .ok_or_else(|| BroadcastError::Signing(format!("to_address is not an address: {}", display_value(&transaction.to_address))))?;
    let sats = transaction.amount()
        .and_then(|sats| u64::try_from(sats).ok())
        .ok_or_else(|| BroadcastError::Signing(format!("amount_sats must be a non-negative integer, got {}", display_value(&transaction.amount_sats))))?;
    Ok(PaymentOutput::new(to.trim(), Amount::from_sat(sats)))
}

/// Positive fee → absolute; zero or absent → estimate; anything else is refused.
pub fn fee_policy(fee: Option<&Value>) -> BroadcastResult<FeePolicy> {
    let Some(fee) = fee.filter(|fee| !fee.is_null()) else {
        return Ok(FeePolicy::Estimate);
    };
    match whole_sats(fee) {
        Some(0) => Ok(FeePolicy::Estimate),
        Some(sats) if sats > 0 => Ok(FeePolicy::Absolute(Amount::from_sat(sats as u64))),
        _ => Err(BroadcastError::Signing(format!("fee_sats must be a non-negative integer, got {}", display_value(fee)))),
    }
}
