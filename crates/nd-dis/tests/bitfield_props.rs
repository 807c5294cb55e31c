//! Property-based tests for bitfield insert/extract.

use nd_dis::{BitField, FieldError};
use proptest::prelude::*;

/// Field shapes in use by the Fermi tables
const FIELDS: &[BitField] = &[
    BitField::new(0xe, 6),
    BitField::new(0x1a, 20).signed(),
    BitField::new(0x1a, 20).shifted(12),
    BitField::new(0x1a, 20).shifted(44),
    BitField::new(0x1c, 30).signed().shifted(2),
    BitField::split(&[(0x37, 3), (0x1a, 17)]).signed(),
    BitField::split(&[(0x3a, 1), (8, 2)]),
    BitField::split(&[(0x26, 5), (5, 5)]).signed().shifted(3),
    BitField::new(26, 24).signed().plus(8).pc_relative(),
    BitField::new(0x34, 2).plus(1),
    BitField::new(0x1a, 32).signed(),
];

fn arb_field() -> impl Strategy<Value = BitField> {
    prop::sample::select(FIELDS.to_vec())
}

/// Pick a raw value inside the field's range from an arbitrary seed
fn raw_in_range(field: &BitField, seed: u64) -> i64 {
    let (min, max) = field.range();
    let span = (max as i128 - min as i128 + 1) as u128;
    (min as i128 + (seed as u128 % span) as i128) as i64
}

proptest! {
    #[test]
    fn extract_inverts_insert(field in arb_field(), word in any::<u64>(), seed in any::<u64>(), address in (0u64..1 << 32).prop_map(|a| a & !7)) {
        let raw = raw_in_range(&field, seed);
        let mut value = (raw << field.shift()) + field.addend();
        if field.is_pcrel() {
            value += address as i64;
        }

        let encoded = field.insert(word, value, address).unwrap();
        prop_assert_eq!(field.extract(encoded, address), value);
        prop_assert_eq!(encoded & !field.mask(), word & !field.mask());
    }

    #[test]
    fn out_of_range_is_rejected(field in arb_field(), excess in 1i64..1000) {
        prop_assume!(field.width() + field.shift() < 63);
        let (_, max) = field.range();
        let value = ((max + excess) << field.shift()) + field.addend();
        let err = field.insert(0, value, 0).unwrap_err();
        prop_assert!(matches!(err, FieldError::FieldOverflow { .. }), "expected FieldOverflow, got {:?}", err);
    }

    #[test]
    fn unsigned_fields_never_go_negative(word in any::<u64>()) {
        let field = BitField::new(0x1a, 32);
        prop_assert!(field.extract(word, 0) >= 0);
        prop_assert!(field.extract(word, 0) <= u32::MAX as i64);
    }
}
