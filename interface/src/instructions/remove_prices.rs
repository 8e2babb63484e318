use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    error::{PriceDbError, PriceDbResult},
    instructions::KeeperInstructionTag,
    state::{symbol::SYMBOL_SIZE, Symbol, U32_SIZE},
};

/// The removal payload: a declared symbol count followed by the symbols.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovePricesData {
    pub count: u32,
    pub symbols: Vec<Symbol>,
}

impl RemovePricesData {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        RemovePricesData {
            count: symbols.len() as u32,
            symbols,
        }
    }

    pub fn data(&self) -> PriceDbResult<Vec<u8>> {
        if self.count as usize != self.symbols.len() {
            return Err(PriceDbError::InvalidOperand);
        }

        // Instruction data layout:
        //   - [0]: the instruction tag, 1 byte
        //   - [1..5]: the u32 symbol count as little-endian bytes, 4 bytes
        //   - [5..]: `count` zero-padded symbols, 8 bytes each
        let mut data = Vec::with_capacity(1 + U32_SIZE + self.symbols.len() * SYMBOL_SIZE);
        data.push(KeeperInstructionTag::RemovePrices as u8);
        data.extend_from_slice(&self.count.to_le_bytes());
        for symbol in &self.symbols {
            data.extend_from_slice(symbol.as_bytes());
        }
        Ok(data)
    }
}

/// Removes the records for the given symbols from a keeper account. Must be
/// signed by the keeper's owner.
///
/// ### Accounts
///  0. `[WRITE]` Keeper account
///  1. `[WRITE, SIGNER]` Keeper owner
pub struct RemovePrices {
    /// The keeper account losing the records.
    pub keeper: Pubkey,
    /// The keeper's owner; the transaction signer.
    pub authority: Pubkey,
    /// The declared count and symbols to remove.
    pub payload: RemovePricesData,
}

impl RemovePrices {
    pub fn instruction(&self, program_id: &Pubkey) -> PriceDbResult<Instruction> {
        Ok(Instruction::new_with_bytes(
            *program_id,
            &self.payload.data()?,
            vec![
                AccountMeta::new(self.keeper, false),
                AccountMeta::new(self.authority, true),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_fails_before_emitting_bytes() {
        let mut payload = RemovePricesData::new(vec![Symbol::try_from("BTC").unwrap()]);
        payload.count = 0;
        assert_eq!(payload.data().unwrap_err(), PriceDbError::InvalidOperand);
    }
}
