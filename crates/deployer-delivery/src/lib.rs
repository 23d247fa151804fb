//! Transaction delivery for the ZKC contract deployer.
//!
//! This crate owns every interaction with the target network: reading the chain id
//! and balances, submitting the signed contract-creation transaction and waiting for
//! it to be included. The deployment runner only sees [`DeliveryInterface`], which
//! keeps it testable against a mock.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use deployer_account::AccountSigner;
use deployer_types::{NetworkConfig, Transaction, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::{alloy_connector, AlloyDelivery};

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// The endpoint could not be reached or returned a malformed response.
	#[error("Network error: {0}")]
	Network(String),
	/// The node refused the transaction (insufficient funds, nonce conflict,
	/// failed gas estimation).
	#[error("Transaction rejected: {0}")]
	Rejected(String),
	/// The transaction was not included before the deadline.
	#[error("Timed out: {0}")]
	Timeout(String),
	/// The network descriptor cannot be used to build a client.
	#[error("Invalid network configuration: {0}")]
	InvalidConfig(String),
}

/// Trait defining the interface for transaction delivery implementations.
///
/// An implementation is bound to one network and one signer at construction time.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait DeliveryInterface: Send + Sync {
	/// Returns the chain id reported by the endpoint.
	async fn chain_id(&self) -> Result<u64, DeliveryError>;

	/// Gets the native balance of an address in wei.
	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError>;

	/// Signs and submits a transaction, returning its hash.
	///
	/// Nonce, gas limit and fees are filled in from the network defaults.
	async fn submit(&self, tx: Transaction) -> Result<B256, DeliveryError>;

	/// Waits until the transaction is included in a block and returns its receipt.
	///
	/// Fails with [`DeliveryError::Timeout`] if no receipt is available within
	/// `timeout`.
	async fn wait_for_receipt(
		&self,
		hash: B256,
		timeout: Duration,
	) -> Result<TransactionReceipt, DeliveryError>;
}

/// Builds a delivery backend for a network, signing with the given identity.
pub type DeliveryConnector = Arc<
	dyn Fn(&NetworkConfig, &AccountSigner) -> Result<Arc<dyn DeliveryInterface>, DeliveryError>
		+ Send
		+ Sync,
>;
