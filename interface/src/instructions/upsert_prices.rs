use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    error::{PriceDbError, PriceDbResult},
    instructions::KeeperInstructionTag,
    state::{price_record::PRICE_RECORD_SIZE, PriceRecord, U32_SIZE},
};

/// The upsert payload: a declared record count followed by the records.
///
/// The count travels on the wire ahead of the records, so it is carried
/// explicitly here; [`UpsertPricesData::new`] derives it and [`data`] refuses
/// to emit bytes if the two ever disagree.
///
/// [`data`]: UpsertPricesData::data
#[derive(Clone, Debug, PartialEq)]
pub struct UpsertPricesData {
    pub count: u32,
    pub records: Vec<PriceRecord>,
}

impl UpsertPricesData {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        UpsertPricesData {
            count: records.len() as u32,
            records,
        }
    }

    pub fn data(&self) -> PriceDbResult<Vec<u8>> {
        if self.count as usize != self.records.len() {
            return Err(PriceDbError::InvalidOperand);
        }

        // Instruction data layout:
        //   - [0]: the instruction tag, 1 byte
        //   - [1..5]: the u32 record count as little-endian bytes, 4 bytes
        //   - [5..]: `count` records of (symbol 8, px 8, last_updated 8,
        //     request_id 8), 32 bytes each
        let mut data =
            Vec::with_capacity(1 + U32_SIZE + self.records.len() * PRICE_RECORD_SIZE);
        data.push(KeeperInstructionTag::UpsertPrices as u8);
        data.extend_from_slice(&self.count.to_le_bytes());
        for record in &self.records {
            record.write_to(&mut data);
        }
        Ok(data)
    }
}

/// Inserts new records into a keeper account, or updates the records whose
/// symbols are already present. Must be signed by the keeper's owner.
///
/// ### Accounts
///  0. `[WRITE]` Keeper account
///  1. `[WRITE, SIGNER]` Keeper owner
pub struct UpsertPrices {
    /// The keeper account receiving the records.
    pub keeper: Pubkey,
    /// The keeper's owner; the transaction signer.
    pub authority: Pubkey,
    /// The declared count and records to upsert.
    pub payload: UpsertPricesData,
}

impl UpsertPrices {
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
    use crate::state::Symbol;

    #[test]
    fn test_count_mismatch_fails_before_emitting_bytes() {
        let mut payload = UpsertPricesData::new(vec![PriceRecord::new(
            Symbol::try_from("ETH").unwrap(),
            4,
            5,
            6,
        )]);
        payload.count = 2;
        assert_eq!(payload.data().unwrap_err(), PriceDbError::InvalidOperand);
    }
}
