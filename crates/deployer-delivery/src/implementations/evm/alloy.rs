//! Alloy-backed delivery.
//!
//! One HTTP provider is built per run. The provider's wallet signs with the
//! resolved identity and its fillers supply nonce, gas and chain id, so
//! transactions go out with the network's default pricing. Inclusion is tracked
//! with alloy's pending transaction watcher.

use crate::{DeliveryConnector, DeliveryError, DeliveryInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{
	DynProvider, PendingTransactionConfig, PendingTransactionError, Provider, ProviderBuilder,
	WatchTxError,
};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::TransactionRequest;
use alloy_transport::layers::RetryBackoffLayer;
use async_trait::async_trait;
use deployer_account::AccountSigner;
use deployer_types::{NetworkConfig, Transaction, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Alloy-based EVM delivery implementation.
pub struct AlloyDelivery {
	provider: DynProvider,
	network: String,
}

impl AlloyDelivery {
	/// Creates a provider for the given network that signs with `signer`.
	///
	/// No request is sent here; connectivity problems surface on first use.
	pub fn new(network: &NetworkConfig, signer: &AccountSigner) -> Result<Self, DeliveryError> {
		let url = parse_rpc_url(&network.rpc_url)?;

		let chain_signer = signer.clone().with_chain_id(Some(network.chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		// Configure retry layer for handling rate limits
		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry: retry up to 5 times
			1000, // backoff: initial backoff in milliseconds
			10,   // cups: compute units per second
		);

		let client = RpcClient::builder().layer(retry_layer).http(url);

		let provider = ProviderBuilder::new()
			.wallet(wallet)
			.connect_client(client)
			.erased();

		tracing::debug!(
			network = %network.name,
			chain_id = network.chain_id,
			"Created delivery provider"
		);

		Ok(Self {
			provider,
			network: network.name.clone(),
		})
	}

	/// Fetches the receipt of an included transaction.
	async fn get_receipt(&self, hash: B256) -> Result<TransactionReceipt, DeliveryError> {
		match self.provider.get_transaction_receipt(hash).await {
			Ok(Some(receipt)) => Ok(TransactionReceipt {
				transaction_hash: receipt.transaction_hash,
				block_number: receipt.block_number,
				success: receipt.status(),
				contract_address: receipt.contract_address,
				gas_used: receipt.gas_used,
			}),
			Ok(None) => Err(DeliveryError::Network(format!(
				"Receipt for {} not found on {}",
				hash, self.network
			))),
			Err(e) => Err(DeliveryError::Network(format!(
				"Failed to get receipt on {}: {}",
				self.network, e
			))),
		}
	}
}

/// Parses an RPC endpoint, accepting only http and https.
fn parse_rpc_url(rpc_url: &str) -> Result<Url, DeliveryError> {
	let url = Url::parse(rpc_url)
		.map_err(|e| DeliveryError::InvalidConfig(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme => Err(DeliveryError::InvalidConfig(format!(
			"Unsupported RPC URL scheme {}: only http and https are supported",
			scheme
		))),
	}
}

fn not_included(hash: B256, timeout: Duration) -> DeliveryError {
	DeliveryError::Timeout(format!(
		"transaction {} not included within {}s",
		hash,
		timeout.as_secs()
	))
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get balance: {}", e)))
	}

	async fn submit(&self, tx: Transaction) -> Result<B256, DeliveryError> {
		let chain_id = tx.chain_id;
		let request: TransactionRequest = tx.into();

		tracing::debug!(
			chain_id = chain_id,
			to = ?request.to,
			data_len = request.input.input().map(|d| d.len()).unwrap_or(0),
			"Sending transaction"
		);

		// The provider's wallet handles signing
		let pending_tx = self.provider.send_transaction(request).await.map_err(|e| {
			tracing::error!(chain_id = chain_id, error = %e, "Transaction submission failed");
			match e.as_error_resp() {
				Some(payload) => DeliveryError::Rejected(payload.message.to_string()),
				None => DeliveryError::Network(format!("Failed to send transaction: {}", e)),
			}
		})?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(tx_hash = %tx_hash, chain_id = chain_id, "Transaction submitted");

		Ok(tx_hash)
	}

	async fn wait_for_receipt(
		&self,
		hash: B256,
		timeout: Duration,
	) -> Result<TransactionReceipt, DeliveryError> {
		tracing::info!(
			tx_hash = %hash,
			timeout_secs = timeout.as_secs(),
			"Waiting for transaction inclusion"
		);

		let config = PendingTransactionConfig::new(hash).with_timeout(Some(timeout));

		let watched = match self.provider.watch_pending_transaction(config).await {
			Ok(pending_tx) => pending_tx.await,
			Err(e) => Err(e),
		};

		match watched {
			Ok(confirmed_hash) => self.get_receipt(confirmed_hash).await,
			Err(PendingTransactionError::TxWatcher(WatchTxError::Timeout)) => {
				// The block stream may have stalled; ask for the receipt once more
				match self.get_receipt(hash).await {
					Ok(receipt) => Ok(receipt),
					Err(e) => {
						tracing::debug!(tx_hash = %hash, error = %e, "No receipt after watch timeout");
						Err(not_included(hash, timeout))
					},
				}
			},
			Err(e) => Err(DeliveryError::Network(format!(
				"Transaction watch failed: {}",
				e
			))),
		}
	}
}

/// Connector that builds an [`AlloyDelivery`] for each run.
pub fn alloy_connector() -> DeliveryConnector {
	Arc::new(
		|network: &NetworkConfig,
		 signer: &AccountSigner|
		 -> Result<Arc<dyn DeliveryInterface>, DeliveryError> {
			let delivery = AlloyDelivery::new(network, signer)?;
			Ok(Arc::new(delivery))
		},
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, Bytes};
	use alloy_signer_local::PrivateKeySigner;
	use alloy_transport::mock::Asserter;
	use serde_json::json;

	const CHAIN_ID: u64 = 555272;

	fn create_test_signer() -> AccountSigner {
		let signer: PrivateKeySigner =
			"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
				.parse()
				.unwrap();
		AccountSigner::Local(signer).with_chain_id(Some(CHAIN_ID))
	}

	fn create_test_network(rpc_url: &str) -> NetworkConfig {
		NetworkConfig::new("xsollaZkSepoliaTestnet", rpc_url, CHAIN_ID)
	}

	/// Delivery whose RPC responses come from `asserter`, in request order.
	fn mocked_delivery(asserter: Asserter) -> AlloyDelivery {
		let provider = ProviderBuilder::new()
			.wallet(EthereumWallet::from(create_test_signer()))
			.connect_mocked_client(asserter)
			.erased();
		AlloyDelivery {
			provider,
			network: "xsollaZkSepoliaTestnet".to_string(),
		}
	}

	/// Contract creation with nonce, gas and fees set, so no filler queries the node.
	fn prefilled_creation() -> Transaction {
		Transaction {
			nonce: Some(0),
			gas_limit: Some(1_000_000),
			max_fee_per_gas: Some(2_000_000_000),
			max_priority_fee_per_gas: Some(1_000_000_000),
			..Transaction::create(Bytes::from(vec![0x60, 0x80, 0x60, 0x40]), CHAIN_ID)
		}
	}

	fn rpc_receipt(hash: B256, status: &str) -> serde_json::Value {
		json!({
			"type": "0x2",
			"status": status,
			"cumulativeGasUsed": "0x124f80",
			"logs": [],
			"logsBloom": format!("0x{}", "00".repeat(256)),
			"transactionHash": hash,
			"transactionIndex": "0x0",
			"blockHash": B256::with_last_byte(0xbb),
			"blockNumber": "0x2a",
			"gasUsed": "0x124f80",
			"effectiveGasPrice": "0x3b9aca00",
			"from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
			"to": null,
			"contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3"
		})
	}

	#[tokio::test]
	async fn test_alloy_delivery_new_success() {
		let network = create_test_network("https://zkrpc.xsollazk.com");
		let delivery = AlloyDelivery::new(&network, &create_test_signer()).unwrap();
		assert_eq!(delivery.network, "xsollaZkSepoliaTestnet");
	}

	#[test]
	fn test_parse_rpc_url_invalid() {
		let result = parse_rpc_url("not a url");
		assert!(matches!(result, Err(DeliveryError::InvalidConfig(_))));
	}

	#[test]
	fn test_parse_rpc_url_rejects_websocket() {
		let result = parse_rpc_url("wss://zkrpc.xsollazk.com");
		assert!(matches!(result, Err(DeliveryError::InvalidConfig(msg)) if msg.contains("wss")));
	}

	#[tokio::test]
	async fn test_alloy_connector_invalid_url() {
		let connector = alloy_connector();
		let result = connector(&create_test_network("ftp://example"), &create_test_signer());
		assert!(matches!(result, Err(DeliveryError::InvalidConfig(_))));
	}

	#[tokio::test]
	async fn test_alloy_connector_success() {
		let connector = alloy_connector();
		let result = connector(
			&create_test_network("https://example-test-node"),
			&create_test_signer(),
		);
		assert!(result.is_ok());
	}

	#[tokio::test]
	async fn test_chain_id_and_balance() {
		let asserter = Asserter::new();
		asserter.push_success(&U256::from(CHAIN_ID));
		asserter.push_success(&U256::from(1_500u64));
		let delivery = mocked_delivery(asserter);

		assert_eq!(delivery.chain_id().await.unwrap(), CHAIN_ID);
		assert_eq!(
			delivery
				.get_balance(address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"))
				.await
				.unwrap(),
			U256::from(1_500u64)
		);
	}

	#[tokio::test]
	async fn test_submit_node_rejection() {
		let asserter = Asserter::new();
		asserter.push_failure_msg("insufficient funds for gas * price + value");
		let delivery = mocked_delivery(asserter);

		let result = delivery.submit(prefilled_creation()).await;
		assert!(
			matches!(result, Err(DeliveryError::Rejected(msg)) if msg.contains("insufficient funds"))
		);
	}

	#[tokio::test]
	async fn test_submit_transport_failure() {
		// No queued response: the transport itself fails
		let delivery = mocked_delivery(Asserter::new());

		let result = delivery.submit(prefilled_creation()).await;
		assert!(matches!(result, Err(DeliveryError::Network(_))));
	}

	#[tokio::test]
	async fn test_submit_accepted() {
		let asserter = Asserter::new();
		asserter.push_success(&B256::with_last_byte(0x42));
		let delivery = mocked_delivery(asserter);

		let submitted = delivery.submit(prefilled_creation()).await;
		assert!(submitted.is_ok());
	}

	#[tokio::test]
	async fn test_get_receipt_reverted() {
		let hash = B256::with_last_byte(0x42);
		let asserter = Asserter::new();
		asserter.push_success(&rpc_receipt(hash, "0x0"));
		let delivery = mocked_delivery(asserter);

		let receipt = delivery.get_receipt(hash).await.unwrap();
		assert!(!receipt.success);
		assert_eq!(receipt.transaction_hash, hash);
		assert_eq!(receipt.block_number, Some(42));
		assert_eq!(receipt.gas_used, 1_200_000);
	}

	#[tokio::test]
	async fn test_get_receipt_success_carries_contract_address() {
		let hash = B256::with_last_byte(0x42);
		let asserter = Asserter::new();
		asserter.push_success(&rpc_receipt(hash, "0x1"));
		let delivery = mocked_delivery(asserter);

		let receipt = delivery.get_receipt(hash).await.unwrap();
		assert!(receipt.success);
		assert_eq!(
			receipt.contract_address,
			Some(address!("5fbdb2315678afecb367f032d93f642f64180aa3"))
		);
	}

	#[tokio::test]
	async fn test_get_receipt_missing() {
		let asserter = Asserter::new();
		asserter.push_success(&serde_json::Value::Null);
		let delivery = mocked_delivery(asserter);

		let result = delivery.get_receipt(B256::with_last_byte(0x42)).await;
		assert!(matches!(result, Err(DeliveryError::Network(msg)) if msg.contains("not found")));
	}

	#[tokio::test]
	async fn test_wait_for_receipt_failed_queries_run_to_timeout() {
		let asserter = Asserter::new();
		asserter.push_failure_msg("header not found");
		let delivery = mocked_delivery(asserter);

		let started = std::time::Instant::now();
		let result = delivery
			.wait_for_receipt(B256::with_last_byte(0x42), Duration::from_millis(300))
			.await;

		assert!(matches!(result, Err(DeliveryError::Timeout(_))));
		assert!(started.elapsed() >= Duration::from_millis(300));
	}
}
