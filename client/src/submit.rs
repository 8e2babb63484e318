//! The retrying transaction submitter.
//!
//! Wraps a [`ChainClient`] send with bounded, backed-off retries of transient
//! failures. Deterministic rejections pass straight through; the submitter
//! never touches the persisted config.

use std::time::Duration;

use solana_commitment_config::CommitmentConfig;
use solana_instruction::Instruction;
use solana_sdk::signature::{Keypair, Signature};

use crate::{
    chain::{ChainClient, ChainError},
    logs::{log_success, log_warning},
};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("transient submission failure: {0}")]
    Transient(String),
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("gave up after {attempts} attempts, last failure: {last}")]
    Exhausted { attempts: usize, last: String },
}

/// Exponential backoff bounds for transient failures.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    fn delay(&self, retry: u32) -> Duration {
        let scaled = self.base_delay.as_millis() as f64 * self.multiplier.powi(retry as i32);
        Duration::from_millis(scaled as u64).min(self.max_delay)
    }
}

pub struct Submitter<'a, C> {
    chain: &'a C,
    policy: RetryPolicy,
}

impl<'a, C: ChainClient> Submitter<'a, C> {
    pub fn new(chain: &'a C) -> Self {
        Submitter {
            chain,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(chain: &'a C, policy: RetryPolicy) -> Self {
        Submitter { chain, policy }
    }

    /// Sends the instruction and waits for confirmation at the requested
    /// commitment. Transient failures are retried up to the policy's attempt
    /// bound; a rejection is returned on the spot.
    pub async fn submit(
        &self,
        instruction: &Instruction,
        signers: &[&Keypair],
        commitment: CommitmentConfig,
    ) -> Result<Signature, SubmitError> {
        let mut last = String::new();
        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.policy.delay(attempt as u32 - 1)).await;
            }
            match self.chain.send_instruction(instruction, signers, commitment).await {
                Ok(signature) => {
                    log_success("Signature", signature);
                    return Ok(signature);
                }
                Err(ChainError::Rejected(msg)) => return Err(SubmitError::Rejected(msg)),
                Err(ChainError::Transient(msg)) => {
                    log_warning(
                        "Submit",
                        format!(
                            "attempt {}/{} failed: {msg}",
                            attempt + 1,
                            self.policy.max_attempts
                        ),
                    );
                    last = msg;
                }
            }
        }
        Err(SubmitError::Exhausted {
            attempts: self.policy.max_attempts,
            last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_millis(500));
        assert_eq!(policy.delay(1), Duration::from_millis(1000));
        assert_eq!(policy.delay(10), policy.max_delay);
    }
}
