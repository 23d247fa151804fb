//! Deployment runner for the ZKC contract deployer.
//!
//! The runner performs one contract deployment from start to finish: it resolves
//! the signing identity, encodes the creation payload, connects to the network,
//! records the deployer's balance, submits the contract-creation transaction and
//! waits for it to be included. Everything that can be checked locally is checked
//! before the first network request.

use deployer_account::{resolve_signer, AccountError};
use deployer_delivery::{DeliveryConnector, DeliveryError};
use deployer_types::{
	ArtifactError, ContractArtifact, DeploymentResult, NetworkConfig, Transaction,
};
use std::time::Duration;
use thiserror::Error;

pub mod artifacts;

pub use artifacts::ArtifactLoader;

/// Default time to wait for the deployment to be included.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(180);

/// Errors that end a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
	/// No usable signing identity. Nothing was sent to the network.
	#[error("Credential error: {0}")]
	Credential(#[from] AccountError),
	/// The contract cannot be encoded for deployment. Nothing was sent to the network.
	#[error("Artifact error: {0}")]
	Artifact(#[from] ArtifactError),
	/// The endpoint failed before the transaction was submitted.
	#[error("Endpoint failure: {0}")]
	Network(DeliveryError),
	/// The transaction was refused, reverted or not confirmed. Funds may have
	/// been spent.
	#[error("Transaction error: {0}")]
	Transaction(String),
}

/// Runs contract deployments against networks reached through a connector.
pub struct DeploymentRunner {
	connector: DeliveryConnector,
	confirmation_timeout: Duration,
}

impl DeploymentRunner {
	/// Creates a runner with the default confirmation timeout.
	pub fn new(connector: DeliveryConnector) -> Self {
		Self {
			connector,
			confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
		}
	}

	/// Sets how long to wait for inclusion.
	pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
		self.confirmation_timeout = timeout;
		self
	}

	/// Deploys `artifact` to the network described by `config`.
	///
	/// The run is not retried. A `Transaction` error after submission leaves the
	/// transaction's fate unknown; check the explorer before deploying again.
	pub async fn deploy(
		&self,
		config: &NetworkConfig,
		artifact: &ContractArtifact,
	) -> Result<DeploymentResult, DeployError> {
		let signer = resolve_signer(config).map_err(|e| {
			tracing::error!(network = %config.name, error = %e, "Failed to resolve signing identity");
			DeployError::Credential(e)
		})?;
		let deployer = signer.address();

		let init_code = artifact.deployment_data(deployer).map_err(|e| {
			tracing::error!(contract = %artifact.name, error = %e, "Failed to encode deployment");
			DeployError::Artifact(e)
		})?;

		tracing::info!(
			network = %config.name,
			chain_id = config.chain_id,
			deployer = %deployer,
			contract = %artifact.name,
			"Deploying contracts with the account"
		);

		let delivery = (self.connector)(config, &signer).map_err(|e| {
			tracing::error!(network = %config.name, error = %e, "Failed to connect");
			DeployError::Network(e)
		})?;

		let remote_chain_id = delivery.chain_id().await.map_err(|e| {
			tracing::error!(network = %config.name, error = %e, "Failed to query chain id");
			DeployError::Network(e)
		})?;
		if remote_chain_id != config.chain_id {
			tracing::error!(
				expected = config.chain_id,
				actual = remote_chain_id,
				"Endpoint reports a different chain"
			);
			return Err(DeployError::Transaction(format!(
				"chain id mismatch: {} is configured with {} but the endpoint reports {}",
				config.name, config.chain_id, remote_chain_id
			)));
		}

		let balance_before = delivery.get_balance(deployer).await.map_err(|e| {
			tracing::error!(deployer = %deployer, error = %e, "Failed to query balance");
			DeployError::Network(e)
		})?;
		tracing::info!(deployer = %deployer, balance = %balance_before, "Account balance");

		let tx = Transaction::create(init_code, config.chain_id);
		let tx_hash = delivery.submit(tx).await.map_err(|e| {
			tracing::error!(contract = %artifact.name, error = %e, "Deployment submission failed");
			DeployError::Transaction(format!("submission failed: {}", e))
		})?;

		let receipt = delivery
			.wait_for_receipt(tx_hash, self.confirmation_timeout)
			.await
			.map_err(|e| {
				tracing::error!(tx_hash = %tx_hash, error = %e, "Deployment was not confirmed");
				DeployError::Transaction(format!("transaction {} not confirmed: {}", tx_hash, e))
			})?;

		if !receipt.success {
			tracing::error!(tx_hash = %tx_hash, "Deployment reverted");
			return Err(DeployError::Transaction(format!(
				"transaction {} reverted",
				tx_hash
			)));
		}

		let contract_address = receipt.contract_address.ok_or_else(|| {
			tracing::error!(tx_hash = %tx_hash, "Receipt carries no contract address");
			DeployError::Transaction(format!(
				"transaction {} produced no contract address",
				tx_hash
			))
		})?;

		let balance_after = match delivery.get_balance(deployer).await {
			Ok(balance) => Some(balance),
			Err(e) => {
				tracing::warn!(deployer = %deployer, error = %e, "Failed to query balance after deployment");
				None
			},
		};

		let result = DeploymentResult {
			contract_name: artifact.name.clone(),
			contract_address,
			deployer_address: deployer,
			balance_before,
			balance_after,
			transaction_hash: tx_hash,
			block_number: receipt.block_number,
			gas_used: receipt.gas_used,
			chain_id: config.chain_id,
		};

		tracing::info!(
			contract = %result.contract_name,
			address = %result.contract_address,
			tx_hash = %result.transaction_hash,
			block_number = ?result.block_number,
			gas_used = result.gas_used,
			spent = ?result.cost(),
			"Contract deployed"
		);

		Ok(result)
	}
}
