//! Network descriptor for the deployment target.

use crate::SecretString;
use serde::Deserialize;

/// Configuration for the network a contract is deployed to.
///
/// # Fields
///
/// * `name` - Human readable network name (e.g. "xsollaZkSepoliaTestnet")
/// * `rpc_url` - HTTP(S) JSON-RPC endpoint of an execution-layer node
/// * `chain_id` - Chain identifier the endpoint is expected to report
/// * `accounts` - Signing credentials; exactly one must be usable at runtime
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
	pub name: String,
	pub rpc_url: String,
	pub chain_id: u64,
	#[serde(default)]
	pub accounts: Vec<SecretString>,
}

impl NetworkConfig {
	/// Creates a network descriptor without credentials.
	pub fn new(name: impl Into<String>, rpc_url: impl Into<String>, chain_id: u64) -> Self {
		Self {
			name: name.into(),
			rpc_url: rpc_url.into(),
			chain_id,
			accounts: Vec::new(),
		}
	}

	/// Adds a signing credential.
	pub fn with_account(mut self, key: impl Into<SecretString>) -> Self {
		self.accounts.push(key.into());
		self
	}

	/// Credentials that carry a value.
	///
	/// Blank entries come from unset environment variables such as
	/// `${PRIVATE_KEY:-}` and are treated as absent.
	pub fn configured_accounts(&self) -> Vec<&SecretString> {
		self.accounts.iter().filter(|key| !key.is_blank()).collect()
	}
}
