//! Signing identity management for the ZKC contract deployer.
//!
//! This crate turns the credentials listed in a network descriptor into exactly one
//! signing identity. The resulting [`AccountSigner`] is handed explicitly to the
//! delivery layer, which uses it to sign the contract-creation transaction.

use deployer_types::NetworkConfig;
use thiserror::Error;

/// Signer abstraction module
pub mod signer;

pub use signer::AccountSigner;

pub mod implementations {
	pub mod local;
}

pub use implementations::local::LocalWallet;

/// Errors that can occur while resolving or using a signing identity.
#[derive(Debug, Error)]
pub enum AccountError {
	/// No signing credential is configured.
	#[error("No signing credential configured for network {0}")]
	Missing(String),
	/// More than one signing credential is configured.
	#[error("Expected exactly one signing credential, found {count}")]
	Ambiguous { count: usize },
	/// The credential is not a valid private key.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Resolves the single signing identity for a network.
///
/// Blank credentials are ignored. Zero remaining credentials is a
/// [`AccountError::Missing`] error and more than one is [`AccountError::Ambiguous`].
/// The returned signer is bound to the network's chain id.
pub fn resolve_signer(network: &NetworkConfig) -> Result<AccountSigner, AccountError> {
	let keys = network.configured_accounts();

	let key = match keys.as_slice() {
		[] => return Err(AccountError::Missing(network.name.clone())),
		[key] => *key,
		_ => return Err(AccountError::Ambiguous { count: keys.len() }),
	};

	let wallet = key.with_exposed(|hex| LocalWallet::new(hex.trim()))?;
	let signer = wallet.signer().with_chain_id(Some(network.chain_id));

	tracing::debug!(
		network = %network.name,
		address = %signer.address(),
		"Resolved signing identity"
	);

	Ok(signer)
}
