//! Support code for the `zkc-deploy` binary.

use deployer_account::resolve_signer;
use deployer_config::Config;
use deployer_core::{ArtifactLoader, DeployError};
use deployer_types::{ContractArtifact, DeploymentResult};
use std::error::Error;
use std::fmt::Write;

/// Loads the configured contract once the signing credential is known to be usable.
///
/// A missing or malformed key is reported before the build output is read.
pub fn prepare_artifact(config: &Config) -> Result<ContractArtifact, DeployError> {
	resolve_signer(&config.network)?;

	let artifact = ArtifactLoader::new(&config.contract.artifacts_dir)
		.load(&config.contract.name, &config.contract.constructor_args)?;
	Ok(artifact)
}

/// Formats the operator-facing summary of a deployment.
///
/// Three lines: the deployer address, its balance in wei before deployment and
/// the address of the new contract.
pub fn render_report(result: &DeploymentResult) -> String {
	let mut out = String::new();
	let _ = writeln!(
		out,
		"Deploying contracts with the account: {}",
		result.deployer_address
	);
	let _ = writeln!(out, "Account balance: {}", result.balance_before);
	let _ = writeln!(
		out,
		"{} deployed to: {}",
		result.contract_name, result.contract_address
	);
	out
}

/// Joins an error and its sources into one line.
pub fn error_chain(err: &dyn Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		let cause_message = cause.to_string();
		if !message.contains(&cause_message) {
			message.push_str(": ");
			message.push_str(&cause_message);
		}
		source = cause.source();
	}
	message
}
