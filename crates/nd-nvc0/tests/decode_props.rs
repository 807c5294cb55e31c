//! Decoding arbitrary words never panics and never hides a failure.

use nd_dis::DecodeError;
use proptest::prelude::*;

proptest! {
    #[test]
    fn any_word_decodes_or_reports(word in any::<u64>(), slot in 0u64..1 << 20) {
        let address = slot * 8;
        match nd_nvc0::decoder().decode(word, address) {
            Ok(insn) => {
                prop_assert_eq!(insn.word, word);
                prop_assert_eq!(insn.address, address);
                prop_assert!(!insn.to_string().contains("???"));
            }
            Err(DecodeError::ExplicitUnrecognized { rendering, .. }) => {
                prop_assert!(rendering.contains("???"));
            }
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }

    #[test]
    fn join_bit_only_prefixes(word in any::<u64>()) {
        // Class 7 ignores the join bit; every other class prints it first
        let plain = word & !0x10;
        prop_assume!(plain & 7 != 7);
        let dec = nd_nvc0::decoder();
        if let (Ok(a), Ok(b)) = (dec.decode(plain, 0), dec.decode(plain | 0x10, 0)) {
            prop_assert_eq!(format!("join {}", a), b.to_string());
        }
    }
}
