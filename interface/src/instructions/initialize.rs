use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    instructions::KeeperInstructionTag,
    state::PUBKEY_SIZE,
};

/// Initializes an allocated, zero-filled keeper account with a slot capacity
/// and an owner.
///
/// ### Accounts
///  0. `[WRITE]` Keeper account
pub struct Initialize {
    /// The keeper account to initialize.
    pub keeper: Pubkey,
    /// The slot capacity baked into the account at creation.
    pub capacity: u8,
    /// The public key authorized to mutate the keeper.
    pub owner: Pubkey,
}

impl Initialize {
    pub fn instruction(&self, program_id: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            *program_id,
            &self.data(),
            vec![AccountMeta::new(self.keeper, false)],
        )
    }

    pub fn data(&self) -> [u8; 2 + PUBKEY_SIZE] {
        // Instruction data layout:
        //   - [0]: the instruction tag, 1 byte
        //   - [1]: the slot capacity, 1 byte
        //   - [2..34]: the owner public key, 32 bytes
        let mut data = [0u8; 2 + PUBKEY_SIZE];
        data[0] = KeeperInstructionTag::Initialize as u8;
        data[1] = self.capacity;
        data[2..].copy_from_slice(self.owner.as_ref());
        data
    }
}
