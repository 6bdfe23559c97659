//! ElectrumSigner - single-key BDK wallet that signs and broadcasts over Electrum
//!
//! The WIF is wrapped in a descriptor matching the source address type, the
//! wallet is scanned once (no persistence), and the spend is built, signed,
//! and pushed through the same Electrum connection.

use bitcoin::{Address, AddressType, PrivateKey};
use std::str::FromStr;

use crate::network::Network;

/// Electrum scan parameters.
pub const DEFAULT_STOP_GAP: usize = 10;
pub const BATCH_SIZE: usize = 10;
/// Confirmation target for the default fee estimate.
pub const FEE_TARGET_BLOCKS: usize = 6;

/// Descriptor for `key`, shaped after `source_address`. Unknown or
/// unparseable addresses get legacy `pkh`.
pub fn descriptor_for(key: &PrivateKey, source_address: &str, network: Network) -> String {
    let wif = key.to_wif();
    let kind = Address::from_str(source_address)
        .ok()
        .and_then(|a| a.require_network(network.to_bitcoin()).ok())
        .and_then(|a| a.address_type());
    match kind {
        Some(AddressType::P2wpkh) => format!("wpkh({})", wif),
        Some(AddressType::P2sh) => format!("sh(wpkh({}))", wif),
        Some(AddressType::P2tr) => format!("tr({})", wif),
        _ => format!("pkh({})", wif),
    }
}

/// BTC/kvB from Electrum → whole sat/vB, rounded up. `None` when the server has no estimate.
pub fn sat_per_vb_from_btc_per_kvb(btc_per_kvb: f64) -> Option<u64> {
    if !btc_per_kvb.is_finite() || btc_per_kvb <= 0.0 {
        return None;
    }
    Some(((btc_per_kvb * 100_000.0).ceil() as u64).max(1))
}

#[cfg(feature = "wallet")]
mod inner {
    use super::*;
    use anyhow::{anyhow, bail};
    use async_trait::async_trait;
    use bdk_electrum::{electrum_client::{Client, ElectrumApi}, BdkElectrumClient};
    use bdk_wallet::{bitcoin::FeeRate, KeychainKind, SignOptions, Wallet};
    use tracing::{debug, info, warn};

    use crate::broadcast::{FeePolicy, SigningCapability, SigningRequest};
    use crate::error::{BroadcastError, BroadcastResult};

    pub struct ElectrumSigner {
        electrum_url: String,
        network: Network,
        stop_gap: usize,
    }

    impl ElectrumSigner {
        pub fn new(electrum_url: impl Into<String>, network: Network) -> Self {
            Self { electrum_url: electrum_url.into(), network, stop_gap: DEFAULT_STOP_GAP }
        }

        pub fn with_stop_gap(mut self, stop_gap: usize) -> Self { self.stop_gap = stop_gap; self }

        /// Address the fallback wallet would spend from. No network access.
        pub fn spending_address(key: &PrivateKey, source_address: &str, network: Network) -> BroadcastResult<String> {
            let wallet = build_wallet(key, source_address, network).map_err(|e| BroadcastError::Signing(e.to_string()))?;
            Ok(wallet.peek_address(KeychainKind::External, 0).address.to_string())
        }
    }

    fn build_wallet(key: &PrivateKey, source_address: &str, network: Network) -> anyhow::Result<Wallet> {
        let descriptor = descriptor_for(key, source_address, network);
        Wallet::create_single(descriptor)
            .network(network.to_bitcoin())
            .create_wallet_no_persist()
            .map_err(|e| anyhow!("Descriptor: {}", e))
    }

    fn sign_and_send_blocking(url: &str, network: Network, stop_gap: usize, request: SigningRequest) -> anyhow::Result<String> {
        let mut wallet = build_wallet(&request.key, &request.source_address, network)?;
        let spend_from = wallet.peek_address(KeychainKind::External, 0).address;
        debug!(address = %spend_from, "Fallback wallet ready");

        let client = BdkElectrumClient::new(Client::new(url).map_err(|e| anyhow!("Electrum: {}", e))?);
        let update = client.full_scan(wallet.start_full_scan(), stop_gap, BATCH_SIZE, false)
            .map_err(|e| anyhow!("Sync: {}", e))?;
        wallet.apply_update(update).map_err(|e| anyhow!("Apply: {}", e))?;
        info!(address = %spend_from, balance_sats = wallet.balance().total().to_sat(), "Fallback wallet synced");

        let mut builder = wallet.build_tx();
        for output in &request.outputs {
            let address = Address::from_str(&output.destination)
                .map_err(|e| anyhow!("Address: {}", e))?
                .require_network(network.to_bitcoin())
                .map_err(|e| anyhow!("Network: {}", e))?;
            builder.add_recipient(address.script_pubkey(), output.amount);
        }
        match request.fee {
            FeePolicy::Absolute(fee) => {
                builder.fee_absolute(fee);
            }
            FeePolicy::Estimate => match client.inner.estimate_fee(FEE_TARGET_BLOCKS) {
                Ok(btc_per_kvb) => match sat_per_vb_from_btc_per_kvb(btc_per_kvb).and_then(FeeRate::from_sat_per_vb) {
                    Some(rate) => {
                        debug!(sat_per_vb = rate.to_sat_per_vb_ceil(), "Using server fee estimate");
                        builder.fee_rate(rate);
                    }
                    None => warn!("Server has no fee estimate, using wallet default rate"),
                },
                Err(e) => warn!(error = %e, "Fee estimate failed, using wallet default rate"),
            },
        }

        let mut psbt = builder.finish().map_err(|e| anyhow!("Build: {}", e))?;
        #[allow(deprecated)]
        let finalized = wallet.sign(&mut psbt, SignOptions::default()).map_err(|e| anyhow!("Sign: {}", e))?;
        if !finalized {
            bail!("Sign: transaction not fully signed");
        }
        let fee = psbt.fee().map(|f| f.to_sat()).ok();
        let tx = psbt.extract_tx().map_err(|e| anyhow!("Extract: {}", e))?;

        let txid = client.inner.transaction_broadcast(&tx).map_err(|e| anyhow!("Broadcast: {}", e))?;
        info!(txid = %txid, fee_sats = ?fee, "Transaction submitted over Electrum");
        Ok(txid.to_string())
    }

    #[async_trait]
    impl SigningCapability for ElectrumSigner {
        fn name(&self) -> &str { "electrum" }

        async fn sign_and_send(&self, request: SigningRequest) -> BroadcastResult<String> {
            let (url, network, stop_gap) = (self.electrum_url.clone(), self.network, self.stop_gap);
            tokio::task::spawn_blocking(move || sign_and_send_blocking(&url, network, stop_gap, request))
                .await
                .map_err(|e| BroadcastError::Signing(format!("signer task: {}", e)))?
                .map_err(|e| BroadcastError::Signing(e.to_string()))
        }
    }
}

#[cfg(feature = "wallet")]
pub use inner::ElectrumSigner;

#[cfg(not(feature = "wallet"))]
pub struct ElectrumSigner;

#[cfg(not(feature = "wallet"))]
impl ElectrumSigner {
    pub fn new(_: impl Into<String>, _: Network) -> Self { Self }
    pub fn with_stop_gap(self, _: usize) -> Self { self }
    pub fn spending_address(_: &PrivateKey, _: &str, _: Network) -> crate::error::BroadcastResult<String> {
        Err(crate::error::BroadcastError::Signing("No wallet".into()))
    }
}

#[cfg(not(feature = "wallet"))]
#[async_trait::async_trait]
impl crate::broadcast::SigningCapability for ElectrumSigner {
    fn name(&self) -> &str { "disabled" }
    async fn sign_and_send(&self, _: crate::broadcast::SigningRequest) -> crate::error::BroadcastResult<String> {
        Err(crate::error::BroadcastError::Signing("No wallet".into()))
    }
}
