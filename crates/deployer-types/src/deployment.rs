//! Transaction and deployment result types.
//!
//! These are the shapes exchanged between the deployment runner and the delivery
//! layer. Alloy primitives are used directly so addresses and hashes carry their
//! fixed sizes in the type.

use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};

/// Transaction to be signed and submitted by the delivery layer.
///
/// Nonce, gas limit and fees left as `None` are filled in by the provider at
/// submission time from the network defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Recipient address (None for contract creation).
	pub to: Option<Address>,
	/// Calldata, or init code for contract creation.
	pub data: Bytes,
	/// Value to transfer in native currency.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	/// Transaction nonce (optional, can be filled by provider).
	pub nonce: Option<u64>,
	/// Gas limit for transaction execution.
	pub gas_limit: Option<u64>,
	/// Legacy gas price (for non-EIP-1559 transactions).
	pub gas_price: Option<u128>,
	/// Maximum fee per gas (EIP-1559).
	pub max_fee_per_gas: Option<u128>,
	/// Maximum priority fee per gas (EIP-1559).
	pub max_priority_fee_per_gas: Option<u128>,
}

impl Transaction {
	/// Builds a contract-creation transaction carrying the given init code.
	pub fn create(init_code: Bytes, chain_id: u64) -> Self {
		Self {
			to: None,
			data: init_code,
			value: U256::ZERO,
			chain_id,
			nonce: None,
			gas_limit: None,
			gas_price: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		}
	}

	/// Returns true if this transaction creates a contract.
	pub fn is_create(&self) -> bool {
		self.to.is_none()
	}
}

/// Conversion from our Transaction type to Alloy's TransactionRequest.
impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		TransactionRequest {
			chain_id: Some(tx.chain_id),
			value: Some(tx.value),
			to: Some(tx.to.map_or(TxKind::Create, TxKind::Call)),
			input: TransactionInput::new(tx.data),
			nonce: tx.nonce,
			gas: tx.gas_limit,
			gas_price: tx.gas_price,
			max_fee_per_gas: tx.max_fee_per_gas,
			max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
			..Default::default()
		}
	}
}

/// Receipt of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub transaction_hash: B256,
	/// The block number where the transaction was included.
	pub block_number: Option<u64>,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Address of the contract created by this transaction, if any.
	pub contract_address: Option<Address>,
	/// Gas consumed by the transaction.
	pub gas_used: u64,
}

/// Outcome of a successful deployment.
///
/// Produced once at the end of a run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
	/// Name of the deployed contract.
	pub contract_name: String,
	/// Address of the newly created contract.
	pub contract_address: Address,
	/// Address of the account that paid for the deployment.
	pub deployer_address: Address,
	/// Deployer balance in wei before submission.
	pub balance_before: U256,
	/// Deployer balance in wei after inclusion, when it could be read.
	pub balance_after: Option<U256>,
	/// Hash of the contract-creation transaction.
	pub transaction_hash: B256,
	/// Block the transaction was included in.
	pub block_number: Option<u64>,
	/// Gas consumed by the deployment.
	pub gas_used: u64,
	/// Chain the contract lives on.
	pub chain_id: u64,
}

impl DeploymentResult {
	/// Wei spent on the deployment, when both balances are known.
	pub fn cost(&self) -> Option<U256> {
		self.balance_after
			.map(|after| self.balance_before.saturating_sub(after))
	}
}
