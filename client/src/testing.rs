//! In-memory [`ChainClient`] for driving the orchestrator and submitter in
//! tests: remembers what was deployed and created, counts every call, and
//! fails sends on a script.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
};

use solana_commitment_config::CommitmentConfig;
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};

use crate::{
    chain::{ChainClient, ChainError},
    secret::PayerSecret,
};

#[derive(Default)]
struct MockState {
    programs: HashSet<Pubkey>,
    accounts: HashMap<Pubkey, Vec<u8>>,
    deploy_calls: usize,
    create_calls: usize,
    send_calls: usize,
    send_failures: VecDeque<ChainError>,
}

#[derive(Default)]
pub struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        MockChain::default()
    }

    pub fn deploy_calls(&self) -> usize {
        self.state.lock().unwrap().deploy_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn send_calls(&self) -> usize {
        self.state.lock().unwrap().send_calls
    }

    /// Queues a failure returned by the next `send_instruction` call.
    pub fn push_send_failure(&self, failure: ChainError) {
        self.state.lock().unwrap().send_failures.push_back(failure);
    }

    /// Simulates a program vanishing from the remote ledger.
    pub fn remove_program(&self, program_id: &Pubkey) {
        self.state.lock().unwrap().programs.remove(program_id);
    }

    /// Simulates an account vanishing from the remote ledger.
    pub fn remove_account(&self, address: &Pubkey) {
        self.state.lock().unwrap().accounts.remove(address);
    }

    pub fn set_account_data(&self, address: Pubkey, data: Vec<u8>) {
        self.state.lock().unwrap().accounts.insert(address, data);
    }
}

impl ChainClient for MockChain {
    async fn cluster_version(&self) -> Result<String, ChainError> {
        Ok("mock-0.0.0".to_string())
    }

    async fn get_or_fund_payer(
        &self,
        secret: Option<&PayerSecret>,
        _min_lamports: u64,
    ) -> Result<Keypair, ChainError> {
        match secret {
            Some(secret) => secret
                .to_keypair()
                .map_err(|err| ChainError::Rejected(err.to_string())),
            None => Ok(Keypair::new()),
        }
    }

    async fn deploy_program(
        &self,
        _program: &[u8],
        _payer: &Keypair,
    ) -> Result<Pubkey, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.deploy_calls += 1;
        let program_id = Pubkey::new_unique();
        state.programs.insert(program_id);
        Ok(program_id)
    }

    async fn create_account(
        &self,
        _payer: &Keypair,
        new_account: &Keypair,
        _owner: &Pubkey,
        span: usize,
    ) -> Result<(), ChainError> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        state.accounts.insert(new_account.pubkey(), vec![0; span]);
        Ok(())
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, ChainError> {
        let state = self.state.lock().unwrap();
        Ok(state.programs.contains(address) || state.accounts.contains_key(address))
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, ChainError> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(address)
            .cloned()
            .ok_or_else(|| ChainError::Rejected(format!("no account {address}")))
    }

    async fn send_instruction(
        &self,
        _instruction: &Instruction,
        _signers: &[&Keypair],
        _commitment: CommitmentConfig,
    ) -> Result<Signature, ChainError> {
        let mut state = self.state.lock().unwrap();
        state.send_calls += 1;
        match state.send_failures.pop_front() {
            Some(failure) => Err(failure),
            None => Ok(Signature::default()),
        }
    }
}
