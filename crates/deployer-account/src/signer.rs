//! Signer handed from credential resolution to the delivery layer.
//!
//! `AccountSigner` implements alloy's `TxSigner`, so the delivery layer can build an
//! `EthereumWallet` from it without knowing where the key came from.

use alloy_consensus::SignableTransaction;
use alloy_network::TxSigner;
use alloy_primitives::{Address, Signature};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

/// Resolved signing identity.
#[derive(Clone)]
pub enum AccountSigner {
	/// Private key held in memory.
	Local(PrivateKeySigner),
}

impl AccountSigner {
	/// Returns the signer's Ethereum address.
	pub fn address(&self) -> Address {
		match self {
			Self::Local(s) => Signer::address(s),
		}
	}

	/// Returns the chain ID the signer is bound to, if any.
	pub fn chain_id(&self) -> Option<u64> {
		match self {
			Self::Local(s) => Signer::chain_id(s),
		}
	}

	/// Returns a new signer bound to the given chain ID.
	pub fn with_chain_id(self, chain_id: Option<u64>) -> Self {
		match self {
			Self::Local(s) => Self::Local(Signer::with_chain_id(s, chain_id)),
		}
	}
}

#[async_trait]
impl TxSigner<Signature> for AccountSigner {
	fn address(&self) -> Address {
		AccountSigner::address(self)
	}

	async fn sign_transaction(
		&self,
		tx: &mut dyn SignableTransaction<Signature>,
	) -> alloy_signer::Result<Signature> {
		match self {
			Self::Local(s) => TxSigner::sign_transaction(s, tx).await,
		}
	}
}

impl std::fmt::Debug for AccountSigner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Local(s) => f
				.debug_struct("AccountSigner::Local")
				.field("address", &Signer::address(s))
				.finish_non_exhaustive(),
		}
	}
}
