//! Common types for the ZKC contract deployer.
//!
//! This crate holds the data model shared by every other crate in the workspace:
//! network descriptors, compiled contract artifacts, the transaction and receipt
//! shapes exchanged with the delivery layer, and the final deployment result.

/// Compiled contract artifacts and constructor argument encoding.
pub mod artifact;
/// Transaction, receipt and deployment result types.
pub mod deployment;
/// Network descriptor types.
pub mod network;
/// Secure string type for handling signing credentials.
pub mod secret_string;
/// Utility functions for hex formatting.
pub mod utils;

pub use artifact::{ArtifactError, ConstructorArg, ContractArtifact, DEPLOYER_PLACEHOLDER};
pub use deployment::{DeploymentResult, Transaction, TransactionReceipt};
pub use network::NetworkConfig;
pub use secret_string::SecretString;
pub use utils::without_0x_prefix;
