//! Local private key wallet.

use crate::{AccountError, AccountSigner};
use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use deployer_types::without_0x_prefix;

/// Wallet backed by a private key held in memory.
#[derive(Debug)]
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a new LocalWallet from a hex-encoded private key.
	///
	/// The key must be 64 hex characters (32 bytes), with or without a 0x prefix.
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let key = without_0x_prefix(private_key_hex);

		if key.len() != 64 {
			return Err(AccountError::InvalidKey(
				"Private key must be 64 hex characters (32 bytes)".to_string(),
			));
		}

		if hex::decode(key).is_err() {
			return Err(AccountError::InvalidKey(
				"Private key must be valid hexadecimal".to_string(),
			));
		}

		let signer = key
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	/// Returns the address derived from the key.
	pub fn address(&self) -> Address {
		self.signer.address()
	}

	/// Returns a signer for use with Alloy's `EthereumWallet`.
	pub fn signer(&self) -> AccountSigner {
		AccountSigner::Local(self.signer.clone())
	}
}
