//! The provisioning orchestrator.
//!
//! Drives remote state through `Unconfigured -> ProgramDeployed ->
//! AccountsCreated -> Ready` with no back-transitions. Every completed
//! transition persists a full config snapshot, so an aborted run resumes
//! from the stage on disk instead of assuming a clean slate. Re-running
//! against a `Ready` deployment is a pure existence check.

use std::path::PathBuf;

use pricedb_interface::state::{PriceKeeper, ValidatorKeeper};
use solana_commitment_config::CommitmentConfig;
use solana_pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::{
    chain::{ChainClient, ChainError},
    config::{ConfigError, ConfigStore, ProvisioningConfig, Stage, CONFIG_VERSION},
    logs::{log_info, log_success, log_warning},
    secret::PayerSecret,
};

/// Coarse funding floor for a fresh payer: program rent, account rent, and a
/// generous signature allowance. Accuracy is a non-goal; the floor only has
/// to be enough on a test cluster.
const PAYER_FUNDING_FLOOR: u64 = 10_000_000_000;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// The config references remote state that no longer exists. Recover with
    /// [`reprovision`]; `ensure_ready` will not overwrite a config that may
    /// point at a still-valid deployment.
    #[error("remote state missing: {0}")]
    RemoteStateMissing(String),
    #[error("config was provisioned against `{found}`, not `{expected}`")]
    EndpointMismatch { expected: String, found: String },
    #[error("failed to read the program binary")]
    ProgramBinary(#[source] std::io::Error),
}

/// Everything a provisioning run needs, threaded explicitly into every
/// operation; no ambient state.
pub struct OrchestratorContext {
    pub url: String,
    pub program_path: PathBuf,
    pub keeper_capacity: u8,
    /// `None` skips the validator keeper account entirely.
    pub validator_capacity: Option<u8>,
    pub commitment: CommitmentConfig,
    pub config_path: PathBuf,
    /// Keep the payer secret in the persisted config so later runs reuse the
    /// same fee payer. Off by default; the config file is cleartext.
    pub persist_payer_secret: bool,
}

/// Handles to a `Ready` deployment.
#[derive(Debug)]
pub struct Provisioned {
    pub program_id: Pubkey,
    pub keeper: Pubkey,
    pub validator: Option<Pubkey>,
    pub payer: Keypair,
}

/// Brings the deployment to `Ready`, reusing whatever previous runs left
/// behind. Against an already-`Ready` remote state this performs existence
/// checks only: zero writes, zero deploys, zero creates.
pub async fn ensure_ready<C: ChainClient>(
    ctx: &OrchestratorContext,
    chain: &C,
) -> Result<Provisioned, ProvisionError> {
    let store = ConfigStore::new(&ctx.config_path);
    match store.load() {
        Ok(config) => resume(ctx, chain, &store, config).await,
        Err(ConfigError::NotFound(_)) => {
            log_info("Provision", "no config found, provisioning from scratch");
            provision_fresh(ctx, chain, &store).await
        }
        Err(err) => Err(err.into()),
    }
}

/// Deploys fresh state and overwrites the existing config, even one that
/// references a live deployment. The explicit-confirmation path for
/// recovering from [`ProvisionError::RemoteStateMissing`].
pub async fn reprovision<C: ChainClient>(
    ctx: &OrchestratorContext,
    chain: &C,
) -> Result<Provisioned, ProvisionError> {
    log_warning("Provision", "reprovisioning, existing config will be replaced");
    let store = ConfigStore::new(&ctx.config_path);
    provision_fresh(ctx, chain, &store).await
}

async fn resume<C: ChainClient>(
    ctx: &OrchestratorContext,
    chain: &C,
    store: &ConfigStore,
    mut config: ProvisioningConfig,
) -> Result<Provisioned, ProvisionError> {
    if config.url != ctx.url {
        return Err(ProvisionError::EndpointMismatch {
            expected: ctx.url.clone(),
            found: config.url,
        });
    }

    let program_id = config.program_id()?;
    if !chain.account_exists(&program_id).await? {
        return Err(ProvisionError::RemoteStateMissing(format!(
            "program {program_id}"
        )));
    }

    let payer = chain
        .get_or_fund_payer(config.payer_secret.as_ref(), PAYER_FUNDING_FLOOR)
        .await?;

    match config.stage {
        Stage::Ready => {
            let keeper = require_keeper(&config)?;
            confirm_accounts(chain, keeper, config.validator_pubkey()?).await?;
            log_success("Provision", format!("already ready, program {program_id}"));
            Ok(Provisioned {
                program_id,
                keeper,
                validator: config.validator_pubkey()?,
                payer,
            })
        }
        Stage::ProgramDeployed => {
            log_info("Provision", "resuming at account creation");
            let (keeper, validator) =
                create_accounts(ctx, chain, store, &mut config, &payer, &program_id).await?;
            promote_ready(store, &mut config)?;
            Ok(Provisioned {
                program_id,
                keeper,
                validator,
                payer,
            })
        }
        Stage::AccountsCreated => {
            let keeper = require_keeper(&config)?;
            let validator = config.validator_pubkey()?;
            confirm_accounts(chain, keeper, validator).await?;
            promote_ready(store, &mut config)?;
            Ok(Provisioned {
                program_id,
                keeper,
                validator,
                payer,
            })
        }
    }
}

async fn provision_fresh<C: ChainClient>(
    ctx: &OrchestratorContext,
    chain: &C,
    store: &ConfigStore,
) -> Result<Provisioned, ProvisionError> {
    let binary = std::fs::read(&ctx.program_path).map_err(ProvisionError::ProgramBinary)?;

    let payer = chain.get_or_fund_payer(None, PAYER_FUNDING_FLOOR).await?;
    let program_id = chain.deploy_program(&binary, &payer).await?;

    let mut config = ProvisioningConfig {
        version: CONFIG_VERSION,
        stage: Stage::ProgramDeployed,
        url: ctx.url.clone(),
        program_id: program_id.to_string(),
        keeper_pubkey: None,
        validator_pubkey: None,
        payer_secret: ctx
            .persist_payer_secret
            .then(|| PayerSecret::from_keypair(&payer)),
    };
    store.save(&config)?;
    log_info("Provision", format!("stage {}", config.stage));

    let (keeper, validator) =
        create_accounts(ctx, chain, store, &mut config, &payer, &program_id).await?;
    promote_ready(store, &mut config)?;

    Ok(Provisioned {
        program_id,
        keeper,
        validator,
        payer,
    })
}

/// `ProgramDeployed -> AccountsCreated`: creates the keeper (and optional
/// validator keeper) accounts sized to their codec spans, then persists.
async fn create_accounts<C: ChainClient>(
    ctx: &OrchestratorContext,
    chain: &C,
    store: &ConfigStore,
    config: &mut ProvisioningConfig,
    payer: &Keypair,
    program_id: &Pubkey,
) -> Result<(Pubkey, Option<Pubkey>), ProvisionError> {
    let keeper_keypair = Keypair::new();
    chain
        .create_account(
            payer,
            &keeper_keypair,
            program_id,
            PriceKeeper::span(ctx.keeper_capacity),
        )
        .await?;
    let keeper = keeper_keypair.pubkey();

    let validator = match ctx.validator_capacity {
        Some(capacity) => {
            let validator_keypair = Keypair::new();
            chain
                .create_account(
                    payer,
                    &validator_keypair,
                    program_id,
                    ValidatorKeeper::span(capacity),
                )
                .await?;
            Some(validator_keypair.pubkey())
        }
        None => None,
    };

    config.keeper_pubkey = Some(keeper.to_string());
    config.validator_pubkey = validator.map(|pk| pk.to_string());
    config.stage = Stage::AccountsCreated;
    store.save(config)?;
    log_info("Provision", format!("stage {}", config.stage));

    Ok((keeper, validator))
}

/// `AccountsCreated -> Ready`: a persisted promotion, nothing remote.
fn promote_ready(store: &ConfigStore, config: &mut ProvisioningConfig) -> Result<(), ProvisionError> {
    config.stage = Stage::Ready;
    store.save(config)?;
    log_success("Provision", format!("stage {}", config.stage));
    Ok(())
}

async fn confirm_accounts<C: ChainClient>(
    chain: &C,
    keeper: Pubkey,
    validator: Option<Pubkey>,
) -> Result<(), ProvisionError> {
    if !chain.account_exists(&keeper).await? {
        return Err(ProvisionError::RemoteStateMissing(format!(
            "keeper account {keeper}"
        )));
    }
    if let Some(validator) = validator {
        if !chain.account_exists(&validator).await? {
            return Err(ProvisionError::RemoteStateMissing(format!(
                "validator account {validator}"
            )));
        }
    }
    Ok(())
}

fn require_keeper(config: &ProvisioningConfig) -> Result<Pubkey, ProvisionError> {
    config.keeper_pubkey()?.ok_or_else(|| {
        ConfigError::Corrupt(format!("stage {} without a keeper pubkey", config.stage)).into()
    })
}
