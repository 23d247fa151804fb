//! Configuration module for the ZKC contract deployer.
//!
//! Configuration is a TOML document with three sections: the target `[network]`,
//! the `[contract]` to deploy and `[deployment]` settings. String values may
//! reference environment variables as `${VAR}` or `${VAR:-default}`; these are
//! resolved before parsing, which is how the signing key reaches the
//! configuration without being written to disk.

use deployer_types::NetworkConfig;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Built-in configuration targeting the xsolla ZK Sepolia testnet.
pub const DEFAULT_CONFIG: &str = r#"
[network]
name = "xsollaZkSepoliaTestnet"
rpc_url = "https://zkrpc.xsollazk.com"
chain_id = 555272
accounts = ["${PRIVATE_KEY:-}"]

[contract]
name = "ZKCAsset"
artifacts_dir = "artifacts"
constructor_args = ["$deployer"]

[deployment]
confirmation_timeout_seconds = 180
"#;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Complete deployer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Network the contract is deployed to.
	pub network: NetworkConfig,
	/// Contract to deploy.
	pub contract: ContractConfig,
	/// Deployment settings.
	#[serde(default)]
	pub deployment: DeploymentConfig,
}

/// Which contract to deploy and how to construct it.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
	/// Contract name as it appears in the compiler output.
	pub name: String,
	/// Directory holding the compiler output.
	#[serde(default = "default_artifacts_dir")]
	pub artifacts_dir: PathBuf,
	/// Constructor arguments as strings, coerced to the ABI types at load time.
	/// `"$deployer"` stands for the signer's address.
	#[serde(default)]
	pub constructor_args: Vec<String>,
}

/// Settings for submitting and confirming the deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
	/// How long to wait for the transaction to be included.
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub confirmation_timeout_seconds: u64,
}

impl Default for DeploymentConfig {
	fn default() -> Self {
		Self {
			confirmation_timeout_seconds: default_confirmation_timeout_seconds(),
		}
	}
}

impl DeploymentConfig {
	/// Confirmation timeout as a duration.
	pub fn confirmation_timeout(&self) -> Duration {
		Duration::from_secs(self.confirmation_timeout_seconds)
	}
}

fn default_artifacts_dir() -> PathBuf {
	PathBuf::from("artifacts")
}

fn default_confirmation_timeout_seconds() -> u64 {
	180
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input is limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut missing = None;
	let result = re.replace_all(input, |caps: &regex::Captures<'_>| {
		let var_name = &caps[1];
		match std::env::var(var_name) {
			Ok(value) => value,
			Err(_) => match caps.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					missing.get_or_insert_with(|| var_name.to_string());
					String::new()
				},
			},
		}
	});

	if let Some(var_name) = missing {
		return Err(ConfigError::Validation(format!(
			"Environment variable '{var_name}' not found"
		)));
	}

	Ok(result.into_owned())
}

impl Config {
	/// Built-in configuration for the xsolla ZK Sepolia testnet.
	///
	/// The signing key is taken from `PRIVATE_KEY`; when unset the account list
	/// holds a single blank entry and the run fails at credential resolution.
	pub fn default_network() -> Result<Self, ConfigError> {
		DEFAULT_CONFIG.parse()
	}

	/// Loads configuration from a TOML file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "Loading configuration");
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration.
	///
	/// Credentials are not checked here. Whether exactly one usable key is
	/// present is decided when the deployment starts.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.network.name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Network name cannot be empty".into(),
			));
		}

		let url = url::Url::parse(&self.network.rpc_url).map_err(|e| {
			ConfigError::Validation(format!(
				"Invalid rpc_url '{}': {}",
				self.network.rpc_url, e
			))
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::Validation(format!(
				"rpc_url must use http or https, got '{}'",
				url.scheme()
			)));
		}

		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation(
				"chain_id must be greater than 0".into(),
			));
		}

		if self.contract.name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Contract name cannot be empty".into(),
			));
		}

		if self.deployment.confirmation_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"confirmation_timeout_seconds must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

/// Parses TOML, resolving environment variables first and validating after.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
