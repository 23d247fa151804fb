//! Compiled contract artifacts.
//!
//! An artifact is the compiler's JSON output for one contract: its ABI and its
//! creation bytecode. Both Hardhat (`"bytecode": "0x.."`) and Foundry
//! (`"bytecode": { "object": "0x.." }`) layouts are accepted.

use crate::without_0x_prefix;
use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes};
use serde::Deserialize;
use thiserror::Error;

/// Configuration placeholder for the resolved deployer address.
pub const DEPLOYER_PLACEHOLDER: &str = "$deployer";

/// Errors raised while reading an artifact or encoding its constructor call.
#[derive(Debug, Error)]
pub enum ArtifactError {
	/// No artifact file was found for the contract.
	#[error("Artifact for contract {0} not found")]
	NotFound(String),
	/// The artifact file could not be read.
	#[error("Failed to read artifact: {0}")]
	Io(String),
	/// The artifact is not valid compiler output.
	#[error("Invalid artifact JSON for {contract}: {message}")]
	InvalidJson { contract: String, message: String },
	/// The bytecode is not valid hex.
	#[error("Invalid bytecode hex for {contract}: {message}")]
	InvalidBytecode { contract: String, message: String },
	/// The contract has no creation code (interface or abstract contract).
	#[error("Contract {0} has no deployable bytecode")]
	EmptyBytecode(String),
	/// Constructor argument count does not match the ABI.
	#[error("Constructor of {contract} expects {expected} arguments, got {actual}")]
	ArgumentCount {
		contract: String,
		expected: usize,
		actual: usize,
	},
	/// A constructor argument could not be converted to its ABI type.
	#[error("Invalid constructor argument {index} for {contract}: {message}")]
	InvalidArgument {
		contract: String,
		index: usize,
		message: String,
	},
	/// ABI encoding of the constructor arguments failed.
	#[error("Failed to encode constructor arguments for {contract}: {message}")]
	Encoding { contract: String, message: String },
}

/// A single constructor argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstructorArg {
	/// A concrete ABI value.
	Value(DynSolValue),
	/// The address of the signer performing the deployment.
	Deployer,
}

/// Compiled contract plus the arguments its constructor will be called with.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
	pub name: String,
	pub bytecode: Bytes,
	pub abi: JsonAbi,
	pub constructor_args: Vec<ConstructorArg>,
}

#[derive(Deserialize)]
struct RawArtifact {
	abi: JsonAbi,
	bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
	Hex(String),
	Object { object: String },
}

impl RawBytecode {
	fn as_hex(&self) -> &str {
		match self {
			RawBytecode::Hex(hex) => hex,
			RawBytecode::Object { object } => object,
		}
	}
}

impl ContractArtifact {
	/// Creates an artifact with no constructor arguments.
	pub fn new(name: impl Into<String>, bytecode: Bytes, abi: JsonAbi) -> Self {
		Self {
			name: name.into(),
			bytecode,
			abi,
			constructor_args: Vec::new(),
		}
	}

	/// Sets the constructor arguments.
	pub fn with_constructor_args(mut self, args: Vec<ConstructorArg>) -> Self {
		self.constructor_args = args;
		self
	}

	/// Parses compiler output JSON.
	///
	/// Rejects artifacts whose creation bytecode is empty, since those belong to
	/// interfaces or abstract contracts and cannot be deployed.
	pub fn from_json(name: &str, json: &str) -> Result<Self, ArtifactError> {
		let raw: RawArtifact =
			serde_json::from_str(json).map_err(|e| ArtifactError::InvalidJson {
				contract: name.to_string(),
				message: e.to_string(),
			})?;

		let bytecode = hex::decode(without_0x_prefix(raw.bytecode.as_hex().trim())).map_err(
			|e| ArtifactError::InvalidBytecode {
				contract: name.to_string(),
				message: e.to_string(),
			},
		)?;

		if bytecode.is_empty() {
			return Err(ArtifactError::EmptyBytecode(name.to_string()));
		}

		Ok(Self::new(name, Bytes::from(bytecode), raw.abi))
	}

	/// ABI types of the constructor parameters, in declaration order.
	pub fn constructor_types(&self) -> Result<Vec<DynSolType>, ArtifactError> {
		let Some(constructor) = &self.abi.constructor else {
			return Ok(Vec::new());
		};

		constructor
			.inputs
			.iter()
			.enumerate()
			.map(|(index, param)| {
				param.resolve().map_err(|e| ArtifactError::InvalidArgument {
					contract: self.name.clone(),
					index,
					message: format!("unsupported parameter type {}: {}", param.ty, e),
				})
			})
			.collect()
	}

	/// Converts textual arguments into constructor arguments.
	///
	/// Each string is coerced to the ABI type at its position. The literal
	/// [`DEPLOYER_PLACEHOLDER`] becomes [`ConstructorArg::Deployer`].
	pub fn coerce_args(&self, raw_args: &[String]) -> Result<Vec<ConstructorArg>, ArtifactError> {
		let types = self.constructor_types()?;
		if types.len() != raw_args.len() {
			return Err(ArtifactError::ArgumentCount {
				contract: self.name.clone(),
				expected: types.len(),
				actual: raw_args.len(),
			});
		}

		raw_args
			.iter()
			.zip(types.iter())
			.enumerate()
			.map(|(index, (raw, ty))| {
				if raw == DEPLOYER_PLACEHOLDER {
					return Ok(ConstructorArg::Deployer);
				}
				ty.coerce_str(raw)
					.map(ConstructorArg::Value)
					.map_err(|e| ArtifactError::InvalidArgument {
						contract: self.name.clone(),
						index,
						message: e.to_string(),
					})
			})
			.collect()
	}

	/// Builds the init code of a contract-creation transaction: creation bytecode
	/// followed by the ABI-encoded constructor arguments.
	pub fn deployment_data(&self, deployer: Address) -> Result<Bytes, ArtifactError> {
		if self.bytecode.is_empty() {
			return Err(ArtifactError::EmptyBytecode(self.name.clone()));
		}

		let values: Vec<DynSolValue> = self
			.constructor_args
			.iter()
			.map(|arg| match arg {
				ConstructorArg::Value(value) => value.clone(),
				ConstructorArg::Deployer => DynSolValue::Address(deployer),
			})
			.collect();

		let encoded_args = match &self.abi.constructor {
			None if values.is_empty() => Vec::new(),
			None => {
				return Err(ArtifactError::ArgumentCount {
					contract: self.name.clone(),
					expected: 0,
					actual: values.len(),
				})
			},
			Some(constructor) => {
				if constructor.inputs.len() != values.len() {
					return Err(ArtifactError::ArgumentCount {
						contract: self.name.clone(),
						expected: constructor.inputs.len(),
						actual: values.len(),
					});
				}
				constructor
					.abi_encode_input(&values)
					.map_err(|e| ArtifactError::Encoding {
						contract: self.name.clone(),
						message: e.to_string(),
					})?
			},
		};

		let mut data = self.bytecode.to_vec();
		data.extend_from_slice(&encoded_args);
		Ok(Bytes::from(data))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, U256};

	const OWNER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

	const HARDHAT_ARTIFACT: &str = r#"{
		"_format": "hh-sol-artifact-1",
		"contractName": "ZKCAsset",
		"sourceName": "contracts/ZKCAsset.sol",
		"abi": [
			{
				"type": "constructor",
				"stateMutability": "nonpayable",
				"inputs": [
					{ "name": "initialOwner", "type": "address", "internalType": "address" }
				]
			}
		],
		"bytecode": "0x6080604052",
		"deployedBytecode": "0x6080"
	}"#;

	const FOUNDRY_ARTIFACT: &str = r#"{
		"abi": [],
		"bytecode": { "object": "0x60806040", "linkReferences": {} }
	}"#;

	fn owner_artifact() -> ContractArtifact {
		ContractArtifact::from_json("ZKCAsset", HARDHAT_ARTIFACT).unwrap()
	}

	#[test]
	fn test_parse_hardhat_artifact() {
		let artifact = owner_artifact();
		assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
		assert!(artifact.abi.constructor.is_some());
		assert!(artifact.constructor_args.is_empty());
	}

	#[test]
	fn test_parse_foundry_artifact() {
		let artifact = ContractArtifact::from_json("Counter", FOUNDRY_ARTIFACT).unwrap();
		assert_eq!(artifact.bytecode.len(), 4);
		assert!(artifact.abi.constructor.is_none());
	}

	#[test]
	fn test_empty_bytecode_rejected() {
		let json = r#"{ "abi": [], "bytecode": "0x" }"#;
		let result = ContractArtifact::from_json("IERC20", json);
		assert!(matches!(result, Err(ArtifactError::EmptyBytecode(name)) if name == "IERC20"));
	}

	#[test]
	fn test_invalid_bytecode_rejected() {
		let json = r#"{ "abi": [], "bytecode": "0xzz" }"#;
		let result = ContractArtifact::from_json("Broken", json);
		assert!(matches!(result, Err(ArtifactError::InvalidBytecode { .. })));
	}

	#[test]
	fn test_missing_abi_rejected() {
		let json = r#"{ "bytecode": "0x6080" }"#;
		let result = ContractArtifact::from_json("Broken", json);
		assert!(matches!(result, Err(ArtifactError::InvalidJson { .. })));
	}

	#[test]
	fn test_constructor_types() {
		let types = owner_artifact().constructor_types().unwrap();
		assert_eq!(types, vec![DynSolType::Address]);
	}

	#[test]
	fn test_coerce_args_with_placeholder() {
		let artifact = owner_artifact();
		let args = artifact
			.coerce_args(&[DEPLOYER_PLACEHOLDER.to_string()])
			.unwrap();
		assert_eq!(args, vec![ConstructorArg::Deployer]);
	}

	#[test]
	fn test_coerce_args_with_literal_address() {
		let artifact = owner_artifact();
		let args = artifact
			.coerce_args(&["0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string()])
			.unwrap();
		assert_eq!(args, vec![ConstructorArg::Value(DynSolValue::Address(OWNER))]);
	}

	#[test]
	fn test_coerce_args_wrong_count() {
		let artifact = owner_artifact();
		let result = artifact.coerce_args(&[]);
		assert!(matches!(
			result,
			Err(ArtifactError::ArgumentCount {
				expected: 1,
				actual: 0,
				..
			})
		));
	}

	#[test]
	fn test_coerce_args_wrong_type() {
		let artifact = owner_artifact();
		let result = artifact.coerce_args(&["not-an-address".to_string()]);
		assert!(matches!(
			result,
			Err(ArtifactError::InvalidArgument { index: 0, .. })
		));
	}

	#[test]
	fn test_deployment_data_appends_encoded_deployer() {
		let artifact = owner_artifact().with_constructor_args(vec![ConstructorArg::Deployer]);
		let data = artifact.deployment_data(OWNER).unwrap();

		assert_eq!(data.len(), artifact.bytecode.len() + 32);
		assert_eq!(&data[..artifact.bytecode.len()], artifact.bytecode.as_ref());
		let word = &data[artifact.bytecode.len()..];
		assert_eq!(&word[..12], &[0u8; 12]);
		assert_eq!(&word[12..], OWNER.as_slice());
	}

	#[test]
	fn test_deployment_data_without_constructor() {
		let artifact = ContractArtifact::from_json("Counter", FOUNDRY_ARTIFACT).unwrap();
		let data = artifact.deployment_data(OWNER).unwrap();
		assert_eq!(data, artifact.bytecode);
	}

	#[test]
	fn test_deployment_data_rejects_extra_args_without_constructor() {
		let artifact = ContractArtifact::from_json("Counter", FOUNDRY_ARTIFACT)
			.unwrap()
			.with_constructor_args(vec![ConstructorArg::Deployer]);
		let result = artifact.deployment_data(OWNER);
		assert!(matches!(
			result,
			Err(ArtifactError::ArgumentCount {
				expected: 0,
				actual: 1,
				..
			})
		));
	}

	#[test]
	fn test_deployment_data_rejects_type_mismatch() {
		let artifact = owner_artifact().with_constructor_args(vec![ConstructorArg::Value(
			DynSolValue::Uint(U256::from(7u64), 256),
		)]);
		let result = artifact.deployment_data(OWNER);
		assert!(matches!(result, Err(ArtifactError::Encoding { .. })));
	}
}
