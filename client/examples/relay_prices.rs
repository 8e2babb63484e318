//! Loads the already-provisioned deployment, upserts two records, and prints
//! the decoded keeper snapshot.

use client::{
    chain::RpcChain,
    logs::{log_divider, log_info},
    operations,
    provision::{ensure_ready, OrchestratorContext},
    submit::Submitter,
};
use pricedb_interface::state::{PriceRecord, Symbol};
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
    let submitter = Submitter::new(&chain);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    operations::upsert_prices(
        &provisioned,
        &submitter,
        vec![
            PriceRecord::new(Symbol::try_from("ETH")?, 4_000_000_000, now, 1),
            PriceRecord::new(Symbol::try_from("BTC")?, 1_000_000_000, now, 2),
        ],
        ctx.commitment,
    )
    .await?;

    let snapshot = operations::fetch_price_keeper(&provisioned, &chain).await?;
    log_divider();
    log_info(
        "Keeper",
        format!(
            "{} of {} slots populated",
            snapshot.records().len(),
            snapshot.capacity()
        ),
    );
    for record in snapshot.records() {
        log_info(
            record.symbol,
            format!(
                "px {} updated {} request {}",
                record.px(),
                record.last_updated(),
                record.request_id()
            ),
        );
    }
    Ok(())
}
