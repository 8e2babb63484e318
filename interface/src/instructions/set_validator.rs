use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    instructions::ValidatorInstructionTag,
    state::PUBKEY_SIZE,
};

/// Replaces the validator pair held by a validator keeper account.
///
/// ### Accounts
///  0. `[WRITE]` Validator keeper account
pub struct SetValidator {
    /// The validator keeper account to overwrite.
    pub validator_keeper: Pubkey,
    /// The first validator public key.
    pub first: Pubkey,
    /// The second validator public key.
    pub second: Pubkey,
}

impl SetValidator {
    pub fn instruction(&self, program_id: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            *program_id,
            &self.data(),
            vec![AccountMeta::new(self.validator_keeper, false)],
        )
    }

    pub fn data(&self) -> [u8; 1 + 2 * PUBKEY_SIZE] {
        // Instruction data layout:
        //   - [0]: the instruction tag, 1 byte
        //   - [1..33]: the first validator public key, 32 bytes
        //   - [33..65]: the second validator public key, 32 bytes
        let mut data = [0u8; 1 + 2 * PUBKEY_SIZE];
        data[0] = ValidatorInstructionTag::SetValidator as u8;
        data[1..1 + PUBKEY_SIZE].copy_from_slice(self.first.as_ref());
        data[1 + PUBKEY_SIZE..].copy_from_slice(self.second.as_ref());
        data
    }
}
