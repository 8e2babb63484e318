use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    instructions::KeeperInstructionTag,
    state::PUBKEY_SIZE,
};

/// Hands a keeper account to a new owner. Must be signed by the current owner.
///
/// ### Accounts
///  0. `[WRITE]` Keeper account
///  1. `[WRITE, SIGNER]` Current owner
pub struct TransferOwnership {
    /// The keeper account changing hands.
    pub keeper: Pubkey,
    /// The current owner; the transaction signer.
    pub authority: Pubkey,
    /// The public key taking ownership.
    pub new_owner: Pubkey,
}

impl TransferOwnership {
    pub fn instruction(&self, program_id: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            *program_id,
            &self.data(),
            vec![
                AccountMeta::new(self.keeper, false),
                AccountMeta::new(self.authority, true),
            ],
        )
    }

    pub fn data(&self) -> [u8; 1 + PUBKEY_SIZE] {
        // Instruction data layout:
        //   - [0]: the instruction tag, 1 byte
        //   - [1..33]: the new owner public key, 32 bytes
        let mut data = [0u8; 1 + PUBKEY_SIZE];
        data[0] = KeeperInstructionTag::TransferOwnership as u8;
        data[1..].copy_from_slice(self.new_owner.as_ref());
        data
    }
}
