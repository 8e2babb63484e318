//! End-to-end operation flows over the mock chain: provision, mutate, snapshot.

use client::{
    operations,
    provision::{ensure_ready, OrchestratorContext},
    submit::Submitter,
    testing::MockChain,
};
use pricedb_interface::state::{PriceKeeper, PriceRecord, Symbol, ValidatorKeeper};
use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;
use solana_sdk::signature::Signer;

fn context(name: &str) -> OrchestratorContext {
    let dir = std::env::temp_dir();
    let tag = format!("{}-ops-{name}", std::process::id());
    let program_path = dir.join(format!("pricedb-program-{tag}.so"));
    std::fs::write(&program_path, [7u8; 64]).unwrap();
    OrchestratorContext {
        url: "http://localhost:8899".to_string(),
        program_path,
        keeper_capacity: 10,
        validator_capacity: Some(4),
        commitment: CommitmentConfig::confirmed(),
        config_path: dir.join(format!("pricedb-config-{tag}.json")),
        persist_payer_secret: false,
    }
}

fn cleanup(ctx: &OrchestratorContext) {
    let _ = std::fs::remove_file(&ctx.program_path);
    let _ = std::fs::remove_file(&ctx.config_path);
}

#[tokio::test]
async fn test_operations_submit_against_provisioned_state() {
    let ctx = context("submit");
    let chain = MockChain::new();
    let provisioned = ensure_ready(&ctx, &chain).await.unwrap();
    let submitter = Submitter::new(&chain);
    let commitment = CommitmentConfig::confirmed();

    operations::initialize_keeper(&provisioned, &submitter, ctx.keeper_capacity, commitment)
        .await
        .unwrap();
    operations::upsert_prices(
        &provisioned,
        &submitter,
        vec![
            PriceRecord::new(Symbol::try_from("ETH").unwrap(), 4, 5, 6),
            PriceRecord::new(Symbol::try_from("BTC").unwrap(), 1, 2, 3),
        ],
        commitment,
    )
    .await
    .unwrap();
    operations::remove_prices(
        &provisioned,
        &submitter,
        vec![Symbol::try_from("BTC").unwrap()],
        commitment,
    )
    .await
    .unwrap();
    operations::set_validator(
        &provisioned,
        &submitter,
        Pubkey::new_from_array([1; 32]),
        Pubkey::new_from_array([2; 32]),
        commitment,
    )
    .await
    .unwrap();
    operations::verify_and_set_price(
        &provisioned,
        &submitter,
        Pubkey::new_from_array([2; 32]),
        Pubkey::new_from_array([2; 32]),
        886_270,
        commitment,
    )
    .await
    .unwrap();

    assert_eq!(chain.send_calls(), 5);
    cleanup(&ctx);
}

#[tokio::test]
async fn test_fetch_decodes_keeper_snapshots() {
    let ctx = context("fetch");
    let chain = MockChain::new();
    let provisioned = ensure_ready(&ctx, &chain).await.unwrap();

    let keeper_state = PriceKeeper::with_records(
        provisioned.payer.pubkey(),
        ctx.keeper_capacity,
        vec![PriceRecord::new(Symbol::try_from("ETH").unwrap(), 4, 5, 6)],
    )
    .unwrap();
    chain.set_account_data(provisioned.keeper, keeper_state.encode().unwrap());

    let snapshot = operations::fetch_price_keeper(&provisioned, &chain)
        .await
        .unwrap();
    assert_eq!(snapshot, keeper_state);
    assert_eq!(snapshot.records()[0].symbol.as_str(), "ETH");

    let validator_state = ValidatorKeeper::with_validators(
        provisioned.payer.pubkey(),
        4,
        vec![Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32])],
    )
    .unwrap();
    chain.set_account_data(
        provisioned.validator.unwrap(),
        validator_state.encode().unwrap(),
    );

    let validators = operations::fetch_validator_keeper(&provisioned, &chain)
        .await
        .unwrap();
    assert_eq!(validators, validator_state);
    cleanup(&ctx);
}
