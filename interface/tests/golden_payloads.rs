//! Byte-exact regression fixtures for the instruction builders.
//!
//! The hex strings are the wire payloads the original client sent as
//! hardcoded literals; the builders must keep reproducing them exactly.

#[cfg(test)]
pub mod tests {
    use pricedb_interface::{
        instructions::{
            Initialize,
            RemovePricesData,
            SetValidator,
            TransferOwnership,
            UpsertPricesData,
            VerifyAndSetPrice,
        },
        state::{PriceRecord, Symbol},
    };
    use solana_pubkey::Pubkey;

    const OWNER_HEX: &str = "fa3dcdc78fb119eab365b643b5154b6567c7cbab6b71d181010758f6b59b0e8f";

    fn owner() -> Pubkey {
        Pubkey::new_from_array(hex::decode(OWNER_HEX).unwrap().try_into().unwrap())
    }

    fn record(symbol: &str, px: u64, last_updated: u64, request_id: u64) -> PriceRecord {
        PriceRecord::new(
            Symbol::try_from(symbol).unwrap(),
            px,
            last_updated,
            request_id,
        )
    }

    #[test]
    fn test_upsert_two_records_golden() {
        let payload =
            UpsertPricesData::new(vec![record("ETH", 4, 5, 6), record("BTC", 1, 2, 3)]);
        let expected = hex::decode(concat!(
            "02",
            "02000000",
            "4554480000000000",
            "0400000000000000",
            "0500000000000000",
            "0600000000000000",
            "4254430000000000",
            "0100000000000000",
            "0200000000000000",
            "0300000000000000",
        ))
        .unwrap();
        assert_eq!(payload.data().unwrap(), expected);
    }

    #[test]
    fn test_upsert_relay_batch_golden() {
        // The eleven-record batch the original relayer pushed in one shot.
        let symbols = [
            "B20", "B23", "B21", "B18", "B22", "B19", "B25", "B15", "B16", "B17", "B24",
        ];
        let payload = UpsertPricesData::new(
            symbols.iter().map(|s| record(s, 1, 1, 1)).collect(),
        );

        let mut expected = hex::decode("020b000000").unwrap();
        for symbol in symbols {
            let mut name = [0u8; 8];
            name[..symbol.len()].copy_from_slice(symbol.as_bytes());
            expected.extend_from_slice(&name);
            for _ in 0..3 {
                expected.extend_from_slice(&1u64.to_le_bytes());
            }
        }
        assert_eq!(payload.data().unwrap(), expected);
    }

    #[test]
    fn test_remove_fifty_one_symbols_golden() {
        // B50 down to B0, the original clean-sweep removal.
        let symbols: Vec<Symbol> = (0..=50u8)
            .rev()
            .map(|i| Symbol::try_from(format!("B{i}").as_str()).unwrap())
            .collect();
        let payload = RemovePricesData::new(symbols.clone());

        let mut expected = hex::decode("0333000000").unwrap();
        for symbol in &symbols {
            expected.extend_from_slice(symbol.as_bytes());
        }
        assert_eq!(payload.data().unwrap(), expected);
        assert_eq!(expected.len(), 5 + 51 * 8);
    }

    #[test]
    fn test_initialize_golden() {
        let data = Initialize {
            keeper: Pubkey::new_unique(),
            capacity: 50,
            owner: owner(),
        }
        .data();
        let expected = hex::decode(format!("0032{OWNER_HEX}")).unwrap();
        assert_eq!(data.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_transfer_ownership_golden() {
        let data = TransferOwnership {
            keeper: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            new_owner: owner(),
        }
        .data();
        let expected = hex::decode(format!("01{OWNER_HEX}")).unwrap();
        assert_eq!(data.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_set_validator_golden() {
        let data = SetValidator {
            validator_keeper: Pubkey::new_unique(),
            first: Pubkey::new_from_array([1; 32]),
            second: Pubkey::new_from_array([2; 32]),
        }
        .data();
        let expected = hex::decode(format!(
            "02{}{}",
            "01".repeat(32),
            "02".repeat(32),
        ))
        .unwrap();
        assert_eq!(data.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_verify_and_set_price_golden() {
        let data = VerifyAndSetPrice {
            keeper: Pubkey::new_unique(),
            validator_keeper: Pubkey::new_unique(),
            target: Pubkey::new_from_array([2; 32]),
            reference: Pubkey::new_from_array([2; 32]),
            threshold: 886_270,
        }
        .data();
        let expected = hex::decode(format!(
            "68{}{}fe850d0000000000",
            "02".repeat(32),
            "02".repeat(32),
        ))
        .unwrap();
        assert_eq!(data.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_instruction_account_metas() {
        let program_id = Pubkey::new_unique();
        let keeper = Pubkey::new_unique();
        let authority = Pubkey::new_unique();

        let init = Initialize {
            keeper,
            capacity: 10,
            owner: authority,
        }
        .instruction(&program_id);
        assert_eq!(init.program_id, program_id);
        assert_eq!(init.accounts.len(), 1);
        assert!(init.accounts[0].is_writable);
        assert!(!init.accounts[0].is_signer);

        let upsert = pricedb_interface::instructions::UpsertPrices {
            keeper,
            authority,
            payload: UpsertPricesData::new(vec![record("ETH", 4, 5, 6)]),
        }
        .instruction(&program_id)
        .unwrap();
        assert_eq!(upsert.accounts.len(), 2);
        assert_eq!(upsert.accounts[1].pubkey, authority);
        assert!(upsert.accounts[1].is_signer);
    }
}
