//! Installs a validator pair and runs a verify-and-commit price update
//! through it.

use client::{
    chain::RpcChain,
    logs::log_success,
    operations,
    provision::{ensure_ready, OrchestratorContext},
    submit::Submitter,
};
use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;

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
    let submitter = Submitter::new(&chain);

    let first = Pubkey::new_from_array([1; 32]);
    let second = Pubkey::new_from_array([2; 32]);
    let signature =
        operations::set_validator(&provisioned, &submitter, first, second, ctx.commitment).await?;
    log_success("Set validator", signature);

    let signature = operations::verify_and_set_price(
        &provisioned,
        &submitter,
        second,
        second,
        886_270,
        ctx.commitment,
    )
    .await?;
    log_success("Verify and set price", signature);
    Ok(())
}
