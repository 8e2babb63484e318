//! Connects to a cluster and brings the PriceDB deployment to `Ready`,
//! reusing anything a previous run already provisioned.

use client::{
    chain::RpcChain,
    logs::{log_divider, log_success},
    provision::{ensure_ready, OrchestratorContext},
};
use solana_commitment_config::CommitmentConfig;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ctx = OrchestratorContext {
        url: env_or("PRICEDB_URL", "http://localhost:8899"),
        program_path: env_or("PRICEDB_PROGRAM", "dist/program/pricedb.so").into(),
        keeper_capacity: 50,
        validator_capacity: Some(4),
        commitment: CommitmentConfig::confirmed(),
        config_path: env_or("PRICEDB_CONFIG", "config.json").into(),
        persist_payer_secret: false,
    };

    let chain = RpcChain::connect(&ctx.url, ctx.commitment).await?;
    let provisioned = ensure_ready(&ctx, &chain).await?;

    log_divider();
    log_success("Program", provisioned.program_id);
    log_success("Keeper", provisioned.keeper);
    if let Some(validator) = provisioned.validator {
        log_success("Validator keeper", validator);
    }
    Ok(())
}
