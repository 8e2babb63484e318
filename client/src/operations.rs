//! High-level keeper operations against a provisioned deployment.
//!
//! Each operation builds its typed instruction first, so malformed input
//! fails before any network call, then submits through the retrying
//! [`Submitter`] and returns the confirmed signature.

use pricedb_interface::{
    error::PriceDbError,
    instructions::{
        Initialize,
        RemovePrices,
        RemovePricesData,
        SetValidator,
        TransferOwnership,
        UpsertPrices,
        UpsertPricesData,
        VerifyAndSetPrice,
    },
    state::{PriceKeeper, PriceRecord, Symbol, ValidatorKeeper},
};
use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};

use crate::{
    chain::{ChainClient, ChainError},
    provision::Provisioned,
    submit::{SubmitError, Submitter},
};

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The operand failed builder validation; nothing was sent.
    #[error("invalid operand: {0}")]
    Invalid(PriceDbError),
    /// Fetched account data disagrees with the expected layout.
    #[error("undecodable account data: {0}")]
    Layout(PriceDbError),
    #[error("no validator keeper was provisioned")]
    MissingValidatorKeeper,
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Initializes the keeper account with the payer as owner.
pub async fn initialize_keeper<C: ChainClient>(
    provisioned: &Provisioned,
    submitter: &Submitter<'_, C>,
    capacity: u8,
    commitment: CommitmentConfig,
) -> Result<Signature, OperationError> {
    let instruction = Initialize {
        keeper: provisioned.keeper,
        capacity,
        owner: provisioned.payer.pubkey(),
    }
    .instruction(&provisioned.program_id);
    Ok(submitter
        .submit(&instruction, &[&provisioned.payer], commitment)
        .await?)
}

pub async fn transfer_ownership<C: ChainClient>(
    provisioned: &Provisioned,
    submitter: &Submitter<'_, C>,
    new_owner: Pubkey,
    commitment: CommitmentConfig,
) -> Result<Signature, OperationError> {
    let instruction = TransferOwnership {
        keeper: provisioned.keeper,
        authority: provisioned.payer.pubkey(),
        new_owner,
    }
    .instruction(&provisioned.program_id);
    Ok(submitter
        .submit(&instruction, &[&provisioned.payer], commitment)
        .await?)
}

pub async fn upsert_prices<C: ChainClient>(
    provisioned: &Provisioned,
    submitter: &Submitter<'_, C>,
    records: Vec<PriceRecord>,
    commitment: CommitmentConfig,
) -> Result<Signature, OperationError> {
    let instruction = UpsertPrices {
        keeper: provisioned.keeper,
        authority: provisioned.payer.pubkey(),
        payload: UpsertPricesData::new(records),
    }
    .instruction(&provisioned.program_id)
    .map_err(OperationError::Invalid)?;
    Ok(submitter
        .submit(&instruction, &[&provisioned.payer], commitment)
        .await?)
}

pub async fn remove_prices<C: ChainClient>(
    provisioned: &Provisioned,
    submitter: &Submitter<'_, C>,
    symbols: Vec<Symbol>,
    commitment: CommitmentConfig,
) -> Result<Signature, OperationError> {
    let instruction = RemovePrices {
        keeper: provisioned.keeper,
        authority: provisioned.payer.pubkey(),
        payload: RemovePricesData::new(symbols),
    }
    .instruction(&provisioned.program_id)
    .map_err(OperationError::Invalid)?;
    Ok(submitter
        .submit(&instruction, &[&provisioned.payer], commitment)
        .await?)
}

pub async fn set_validator<C: ChainClient>(
    provisioned: &Provisioned,
    submitter: &Submitter<'_, C>,
    first: Pubkey,
    second: Pubkey,
    commitment: CommitmentConfig,
) -> Result<Signature, OperationError> {
    let validator_keeper = provisioned
        .validator
        .ok_or(OperationError::MissingValidatorKeeper)?;
    let instruction = SetValidator {
        validator_keeper,
        first,
        second,
    }
    .instruction(&provisioned.program_id);
    Ok(submitter
        .submit(&instruction, &[&provisioned.payer], commitment)
        .await?)
}

pub async fn verify_and_set_price<C: ChainClient>(
    provisioned: &Provisioned,
    submitter: &Submitter<'_, C>,
    target: Pubkey,
    reference: Pubkey,
    threshold: u64,
    commitment: CommitmentConfig,
) -> Result<Signature, OperationError> {
    let validator_keeper = provisioned
        .validator
        .ok_or(OperationError::MissingValidatorKeeper)?;
    let instruction = VerifyAndSetPrice {
        keeper: provisioned.keeper,
        validator_keeper,
        target,
        reference,
        threshold,
    }
    .instruction(&provisioned.program_id);
    Ok(submitter
        .submit(&instruction, &[&provisioned.payer], commitment)
        .await?)
}

/// Fetches and decodes the keeper account's current record set.
pub async fn fetch_price_keeper<C: ChainClient>(
    provisioned: &Provisioned,
    chain: &C,
) -> Result<PriceKeeper, OperationError> {
    let data = chain.account_data(&provisioned.keeper).await?;
    PriceKeeper::decode(&data).map_err(OperationError::Layout)
}

/// Fetches and decodes the validator keeper account's current key set.
pub async fn fetch_validator_keeper<C: ChainClient>(
    provisioned: &Provisioned,
    chain: &C,
) -> Result<ValidatorKeeper, OperationError> {
    let validator_keeper = provisioned
        .validator
        .ok_or(OperationError::MissingValidatorKeeper)?;
    let data = chain.account_data(&validator_keeper).await?;
    ValidatorKeeper::decode(&data).map_err(OperationError::Layout)
}
