//! The chain collaborator boundary.
//!
//! Everything that touches the network goes through [`ChainClient`]; the
//! orchestrator and submitter only ever see errors pre-classified as
//! transient or deterministic rejections.

use std::time::Duration;

use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    rpc_client::RpcClient,
    rpc_request::{
        RpcError,
        RpcResponseErrorData,
    },
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::CommitmentConfig;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;
use solana_sdk::{
    message::Message,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};

use crate::{
    logs::{log_info, log_success},
    secret::PayerSecret,
};

pub const BPF_LOADER_ID: Pubkey =
    Pubkey::from_str_const("BPFLoader2111111111111111111111111111111111");
const RENT_SYSVAR_ID: Pubkey =
    Pubkey::from_str_const("SysvarRent111111111111111111111111111111111");

/// Program bytes written per loader transaction, bounded by the transaction
/// size limit.
const DEPLOY_CHUNK_SIZE: usize = 900;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Worth retrying: timeouts, connection faults, expired blockhashes.
    #[error("transient chain failure: {0}")]
    Transient(String),
    /// Deterministic: the remote end said no and will keep saying no.
    #[error("rejected by the chain: {0}")]
    Rejected(String),
}

/// Classifies an RPC client error. A preflight failure carrying a transaction
/// error is the program itself rejecting the instruction; everything that
/// looks like plumbing is transient.
pub fn classify(error: ClientError) -> ChainError {
    match error.kind() {
        ClientErrorKind::TransactionError(_) | ClientErrorKind::SigningError(_) => {
            ChainError::Rejected(error.to_string())
        }
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            data:
                RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                    err: Some(_),
                    ..
                }),
            ..
        }) => ChainError::Rejected(error.to_string()),
        _ => ChainError::Transient(error.to_string()),
    }
}

/// The four-and-a-half operations the rest of the client needs from the
/// network. Implementations may block internally.
pub trait ChainClient {
    fn cluster_version(&self) -> impl std::future::Future<Output = Result<String, ChainError>>;

    /// Reuses the given secret or funds a fresh keypair up to `min_lamports`.
    fn get_or_fund_payer(
        &self,
        secret: Option<&PayerSecret>,
        min_lamports: u64,
    ) -> impl std::future::Future<Output = Result<Keypair, ChainError>>;

    /// Loads the program bytes on chain and returns the new program id.
    fn deploy_program(
        &self,
        program: &[u8],
        payer: &Keypair,
    ) -> impl std::future::Future<Output = Result<Pubkey, ChainError>>;

    /// Creates a rent-exempt account of exactly `span` bytes owned by `owner`.
    fn create_account(
        &self,
        payer: &Keypair,
        new_account: &Keypair,
        owner: &Pubkey,
        span: usize,
    ) -> impl std::future::Future<Output = Result<(), ChainError>>;

    fn account_exists(
        &self,
        address: &Pubkey,
    ) -> impl std::future::Future<Output = Result<bool, ChainError>>;

    fn account_data(
        &self,
        address: &Pubkey,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, ChainError>>;

    fn send_instruction(
        &self,
        instruction: &Instruction,
        signers: &[&Keypair],
        commitment: CommitmentConfig,
    ) -> impl std::future::Future<Output = Result<Signature, ChainError>>;
}

/// The non-upgradeable BPF loader's wire instructions, bincode-encoded.
#[derive(serde::Serialize)]
enum LoaderInstruction {
    Write { offset: u32, bytes: Vec<u8> },
    Finalize,
}

fn loader_write(program_id: &Pubkey, offset: u32, bytes: Vec<u8>) -> Instruction {
    let data = bincode::serialize(&LoaderInstruction::Write { offset, bytes })
        .expect("Loader instruction serializes");
    Instruction::new_with_bytes(
        BPF_LOADER_ID,
        &data,
        vec![AccountMeta::new(*program_id, true)],
    )
}

fn loader_finalize(program_id: &Pubkey) -> Instruction {
    let data =
        bincode::serialize(&LoaderInstruction::Finalize).expect("Loader instruction serializes");
    Instruction::new_with_bytes(
        BPF_LOADER_ID,
        &data,
        vec![
            AccountMeta::new(*program_id, true),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        ],
    )
}

/// [`ChainClient`] over a JSON-RPC endpoint.
pub struct RpcChain {
    rpc: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcChain {
    /// Connects and logs the cluster version, mostly as a reachability check.
    pub async fn connect(url: &str, commitment: CommitmentConfig) -> Result<Self, ChainError> {
        let chain = RpcChain {
            rpc: RpcClient::new_with_commitment(url.to_string(), commitment),
            commitment,
        };
        let version = chain.cluster_version().await?;
        log_info("Cluster", format!("{url} running {version}"));
        Ok(chain)
    }

    fn send(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
        commitment: CommitmentConfig,
    ) -> Result<Signature, ChainError> {
        let bh = self.rpc.get_latest_blockhash().map_err(classify)?;
        let msg = Message::new(instructions, Some(&payer.pubkey()));
        let mut tx = Transaction::new_unsigned(msg);
        tx.try_sign(
            &[std::iter::once(payer)
                .chain(signers.iter().cloned())
                .collect::<Vec<_>>()]
            .concat(),
            bh,
        )
        .map_err(|err| ChainError::Rejected(err.to_string()))?;

        self.rpc
            .send_and_confirm_transaction_with_spinner_and_commitment(&tx, commitment)
            .map_err(classify)
    }
}

impl ChainClient for RpcChain {
    async fn cluster_version(&self) -> Result<String, ChainError> {
        self.rpc
            .get_version()
            .map(|version| version.solana_core)
            .map_err(classify)
    }

    async fn get_or_fund_payer(
        &self,
        secret: Option<&PayerSecret>,
        min_lamports: u64,
    ) -> Result<Keypair, ChainError> {
        let payer = match secret {
            Some(secret) => secret
                .to_keypair()
                .map_err(|err| ChainError::Rejected(err.to_string()))?,
            None => Keypair::new(),
        };

        let balance = self.rpc.get_balance(&payer.pubkey()).map_err(classify)?;
        if balance < min_lamports {
            let airdrop_signature = self
                .rpc
                .request_airdrop(&payer.pubkey(), min_lamports - balance)
                .map_err(classify)?;

            let mut i = 0;
            // Wait for airdrop confirmation.
            while !self
                .rpc
                .confirm_transaction(&airdrop_signature)
                .map_err(classify)?
                && i < 10
            {
                std::thread::sleep(Duration::from_millis(500));
                i += 1;
            }
        }

        log_info(
            "Payer",
            format!(
                "{} holding {} lamports",
                payer.pubkey(),
                self.rpc.get_balance(&payer.pubkey()).map_err(classify)?
            ),
        );
        Ok(payer)
    }

    async fn deploy_program(&self, program: &[u8], payer: &Keypair) -> Result<Pubkey, ChainError> {
        let program_keypair = Keypair::new();
        let program_id = program_keypair.pubkey();

        let lamports = self
            .rpc
            .get_minimum_balance_for_rent_exemption(program.len())
            .map_err(classify)?;
        let create = solana_system_interface::instruction::create_account(
            &payer.pubkey(),
            &program_id,
            lamports,
            program.len() as u64,
            &BPF_LOADER_ID,
        );
        self.send(&[create], payer, &[&program_keypair], self.commitment)?;

        for (i, chunk) in program.chunks(DEPLOY_CHUNK_SIZE).enumerate() {
            let write = loader_write(&program_id, (i * DEPLOY_CHUNK_SIZE) as u32, chunk.to_vec());
            self.send(&[write], payer, &[&program_keypair], self.commitment)?;
        }

        let finalize = loader_finalize(&program_id);
        self.send(&[finalize], payer, &[&program_keypair], self.commitment)?;

        log_success("Deploy", format!("program loaded to {program_id}"));
        Ok(program_id)
    }

    async fn create_account(
        &self,
        payer: &Keypair,
        new_account: &Keypair,
        owner: &Pubkey,
        span: usize,
    ) -> Result<(), ChainError> {
        let lamports = self
            .rpc
            .get_minimum_balance_for_rent_exemption(span)
            .map_err(classify)?;
        let create = solana_system_interface::instruction::create_account(
            &payer.pubkey(),
            &new_account.pubkey(),
            lamports,
            span as u64,
            owner,
        );
        self.send(&[create], payer, &[new_account], self.commitment)?;
        log_success(
            "Create",
            format!("account {} with {span} bytes", new_account.pubkey()),
        );
        Ok(())
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, ChainError> {
        self.rpc
            .get_account_with_commitment(address, self.commitment)
            .map(|response| response.value.is_some())
            .map_err(classify)
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, ChainError> {
        self.rpc.get_account_data(address).map_err(classify)
    }

    async fn send_instruction(
        &self,
        instruction: &Instruction,
        signers: &[&Keypair],
        commitment: CommitmentConfig,
    ) -> Result<Signature, ChainError> {
        let (payer, rest) = signers
            .split_first()
            .ok_or_else(|| ChainError::Rejected("no signers provided".to_string()))?;
        self.send(std::slice::from_ref(instruction), payer, rest, commitment)
    }
}
