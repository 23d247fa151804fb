//! Main entry point for the ZKC contract deployer.
//!
//! Deploys the configured contract (by default `ZKCAsset` on the xsolla ZK
//! Sepolia testnet) and prints the deployer address, its balance and the new
//! contract address. The signing key is read from `PRIVATE_KEY`, which may be
//! set in a `.env` file in the working directory.
//!
//! ```bash
//! export PRIVATE_KEY="0x..."
//! zkc-deploy --artifacts ./artifacts
//! ```

use clap::Parser;
use deployer_config::Config;
use deployer_core::DeploymentRunner;
use deployer_delivery::alloy_connector;
use deployer_service::{error_chain, prepare_artifact, render_report};
use deployer_types::DeploymentResult;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line arguments for the deployer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	///
	/// When omitted, the built-in xsollaZkSepoliaTestnet configuration is used.
	#[arg(short, long, env = "ZKC_CONFIG")]
	config: Option<PathBuf>,

	/// Directory holding the compiled contract artifacts
	///
	/// Overrides `contract.artifacts_dir` from the configuration.
	#[arg(short, long)]
	artifacts: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
	let _ = dotenvy::dotenv();
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// stdout carries the report only
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	match run(&args).await {
		Ok(result) => {
			print!("{}", render_report(&result));
			ExitCode::SUCCESS
		},
		Err(e) => {
			eprintln!("Error: {}", error_chain(e.as_ref()));
			ExitCode::FAILURE
		},
	}
}

async fn run(args: &Args) -> Result<DeploymentResult, Box<dyn std::error::Error>> {
	let mut config = match &args.config {
		Some(path) => {
			tracing::info!("Loading configuration from file: {:?}", path);
			Config::from_file(path).await?
		},
		None => {
			tracing::info!("Using built-in network configuration");
			Config::default_network()?
		},
	};

	if let Some(dir) = &args.artifacts {
		config.contract.artifacts_dir = dir.clone();
	}

	let artifact = prepare_artifact(&config)?;

	let runner = DeploymentRunner::new(alloy_connector())
		.with_confirmation_timeout(config.deployment.confirmation_timeout());

	tokio::select! {
		result = runner.deploy(&config.network, &artifact) => Ok(result?),
		_ = tokio::signal::ctrl_c() => {
			tracing::warn!(
				contract = %artifact.name,
				"Interrupted; a submitted deployment transaction may still be included"
			);
			Err("deployment interrupted, outcome unknown".into())
		}
	}
}
