//! Loading of compiled contract artifacts from a build directory.

use deployer_types::{ArtifactError, ContractArtifact};
use std::path::PathBuf;

/// Finds and loads compiler output for a contract.
///
/// Hardhat (`artifacts/contracts/<Name>.sol/<Name>.json`), Foundry
/// (`out/<Name>.sol/<Name>.json`) and flat (`<dir>/<Name>.json`) layouts are
/// searched in that order.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
	artifacts_dir: PathBuf,
}

impl ArtifactLoader {
	pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
		Self {
			artifacts_dir: artifacts_dir.into(),
		}
	}

	fn candidate_paths(&self, contract_name: &str) -> Vec<PathBuf> {
		let source_dir = format!("{}.sol", contract_name);
		let file_name = format!("{}.json", contract_name);
		vec![
			self.artifacts_dir
				.join("contracts")
				.join(&source_dir)
				.join(&file_name),
			self.artifacts_dir.join(&source_dir).join(&file_name),
			self.artifacts_dir.join(&file_name),
		]
	}

	/// Returns the first existing artifact path for a contract.
	pub fn find(&self, contract_name: &str) -> Result<PathBuf, ArtifactError> {
		self.candidate_paths(contract_name)
			.into_iter()
			.find(|path| path.is_file())
			.ok_or_else(|| {
				ArtifactError::NotFound(format!(
					"{} (searched {})",
					contract_name,
					self.artifacts_dir.display()
				))
			})
	}

	/// Loads a contract and binds its constructor arguments.
	///
	/// `raw_args` are coerced against the constructor's parameter types, so a
	/// bad argument is reported here rather than after connecting to the network.
	pub fn load(
		&self,
		contract_name: &str,
		raw_args: &[String],
	) -> Result<ContractArtifact, ArtifactError> {
		let path = self.find(contract_name)?;
		tracing::debug!(contract = contract_name, path = %path.display(), "Loading artifact");

		let content = std::fs::read_to_string(&path)
			.map_err(|e| ArtifactError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

		let artifact = ContractArtifact::from_json(contract_name, &content)?;
		let args = artifact.coerce_args(raw_args)?;

		tracing::info!(
			contract = contract_name,
			bytecode_len = artifact.bytecode.len(),
			constructor_args = args.len(),
			"Loaded contract artifact"
		);

		Ok(artifact.with_constructor_args(args))
	}
}
