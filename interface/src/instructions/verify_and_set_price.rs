use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    instructions::ValidatorInstructionTag,
    state::{PUBKEY_SIZE, U64_SIZE},
};

/// Checks the target key against the keeper's validator set and, if it is
/// admitted, commits the price carried in the payload.
///
/// ### Accounts
///  0. `[WRITE]` Keeper account
///  1. `[WRITE]` Validator keeper account
pub struct VerifyAndSetPrice {
    /// The keeper account receiving the committed price.
    pub keeper: Pubkey,
    /// The validator keeper account consulted for the check.
    pub validator_keeper: Pubkey,
    /// The public key that must appear in the validator set.
    pub target: Pubkey,
    /// The account reference the program checks the target against.
    pub reference: Pubkey,
    /// The u64 price committed when verification passes.
    pub threshold: u64,
}

impl VerifyAndSetPrice {
    pub fn instruction(&self, program_id: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            *program_id,
            &self.data(),
            vec![
                AccountMeta::new(self.keeper, false),
                AccountMeta::new(self.validator_keeper, false),
            ],
        )
    }

    pub fn data(&self) -> [u8; 1 + 2 * PUBKEY_SIZE + U64_SIZE] {
        // Instruction data layout:
        //   - [0]: the instruction tag, 1 byte
        //   - [1..33]: the target public key, 32 bytes
        //   - [33..65]: the reference public key, 32 bytes
        //   - [65..73]: the u64 threshold as little-endian bytes, 8 bytes
        let mut data = [0u8; 1 + 2 * PUBKEY_SIZE + U64_SIZE];
        data[0] = ValidatorInstructionTag::VerifyAndSetPrice as u8;
        data[1..1 + PUBKEY_SIZE].copy_from_slice(self.target.as_ref());
        data[1 + PUBKEY_SIZE..1 + 2 * PUBKEY_SIZE].copy_from_slice(self.reference.as_ref());
        data[1 + 2 * PUBKEY_SIZE..].copy_from_slice(&self.threshold.to_le_bytes());
        data
    }
}
