//! Memory operand selectors
//!
//! Global addresses are 64-bit when bit 0x3a is set (0x3b for the first
//! half of the dual load), using a register pair as base.
//!
//! The dual `ld ... ldu` form packs the access types of both halves into one
//! 5-bit field at 0x35. Displacements are scaled by the access size.

use crate::fields::*;
use nd_dis::table::{choice, enumerate, md, t};
use nd_dis::{Atom, Table};
use once_cell::sync::Lazy;

pub static GMEM: Lazy<Table> = Lazy::new(|| choice("gmem", 0x3a, [GLOBAL], [GLOBALD]));
pub static GAMEM: Lazy<Table> = Lazy::new(|| choice("gamem", 0x3a, [GATOM], [GATOMD]));
pub static GCMEM_SEL: Lazy<Table> = Lazy::new(|| choice("gcmem", 0x3a, [GCMEM], [GDCMEM]));

/// Load/store destination sized by the `ldstt` type
pub static LDSTD: Lazy<Table> = Lazy::new(|| {
    let mut builder = Table::builder("ldstd");
    for (i, dst) in [DST, DST, DST, DST, DST, DSTD, DSTQ].into_iter().enumerate() {
        builder = builder.row((i as u64) << 5, 0xe0, [dst]);
    }
    builder.oops([DST]).build()
});

// Dual load: second half (shared or global through SRC1)

const LDULD: u32 = 0x35;

/// log2 of the access size of the second half for each type code
fn second_scale(code: usize) -> usize {
    match code {
        0..=9 => 0,
        10..=19 => 1,
        20..=26 => 2,
        27..=29 => 3,
        _ => 4,
    }
}

/// log2 of the access size of the first half for each type code
fn first_scale(code: usize) -> usize {
    match code {
        0..=24 => [0, 0, 1, 1, 2][code % 5],
        _ => [3, 4, 2][(code - 25) % 3],
    }
}

pub static LDULD_GMEM1: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem1", 0x3b, [LDULD_GLOBAL1], [LDULD_GLOBALD1]));
pub static LDULD_GMEM1S1: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem1s1", 0x3b, [LDULD_GLOBAL1S1], [LDULD_GLOBALD1S1]));
pub static LDULD_GMEM1S2: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem1s2", 0x3b, [LDULD_GLOBAL1S2], [LDULD_GLOBALD1S2]));
pub static LDULD_GMEM1S3: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem1s3", 0x3b, [LDULD_GLOBAL1S3], [LDULD_GLOBALD1S3]));
pub static LDULD_GMEM1S4: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem1s4", 0x3b, [LDULD_GLOBAL1S4], [LDULD_GLOBALD1S4]));

pub static LDULD_GMEM2: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem2", 0x3a, [LDULD_GLOBAL2], [LDULD_GLOBALD2]));
pub static LDULD_GMEM2S1: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem2s1", 0x3a, [LDULD_GLOBAL2S1], [LDULD_GLOBALD2S1]));
pub static LDULD_GMEM2S2: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem2s2", 0x3a, [LDULD_GLOBAL2S2], [LDULD_GLOBALD2S2]));
pub static LDULD_GMEM2S3: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem2s3", 0x3a, [LDULD_GLOBAL2S3], [LDULD_GLOBALD2S3]));
pub static LDULD_GMEM2S4: Lazy<Table> =
    Lazy::new(|| choice("lduld_gmem2s4", 0x3a, [LDULD_GLOBAL2S4], [LDULD_GLOBALD2S4]));

fn per_code(name: &'static str, atoms: impl Fn(usize) -> Vec<Atom>) -> Table {
    enumerate(name, LDULD, 5, (0..32).map(|code| Some(atoms(code))))
}

/// Type and destination of the `ld` half
pub static LDULD_DST2_SEL: Lazy<Table> = Lazy::new(|| {
    per_code("ldulddst2", |code| match code {
        0..=4 => vec![md("u8"), LDULD_DST2],
        5..=9 => vec![md("s8"), LDULD_DST2],
        10..=14 => vec![md("u16"), LDULD_DST2],
        15..=19 => vec![md("s16"), LDULD_DST2],
        20..=26 => vec![md("b32"), LDULD_DST2],
        27..=29 => vec![md("b64"), LDULD_DST2D],
        _ => vec![md("b128"), LDULD_DST2Q],
    })
});

pub static LDULD_SRC2S: Lazy<Table> = Lazy::new(|| {
    const SHARED: [Atom; 5] = [
        LDULD_SHARED,
        LDULD_SHAREDS1,
        LDULD_SHAREDS2,
        LDULD_SHAREDS3,
        LDULD_SHAREDS4,
    ];
    per_code("lduldsrc2s", |code| vec![SHARED[second_scale(code)]])
});

pub static LDULD_SRC2G: Lazy<Table> = Lazy::new(|| {
    let global = [
        t(&LDULD_GMEM1),
        t(&LDULD_GMEM1S1),
        t(&LDULD_GMEM1S2),
        t(&LDULD_GMEM1S3),
        t(&LDULD_GMEM1S4),
    ];
    per_code("lduldsrc2g", |code| vec![global[second_scale(code)]])
});

/// Type and destination of the `ldu` half
pub static LDULD_DST1: Lazy<Table> = Lazy::new(|| {
    const SMALL: [&str; 5] = ["u8", "s8", "u16", "s16", "b32"];
    per_code("ldulddst1", |code| match first_scale(code) {
        3 => vec![md("b64"), DSTD],
        4 => vec![md("b128"), DSTQ],
        _ if code < 25 => vec![md(SMALL[code % 5]), DST],
        _ => vec![md("b32"), DST],
    })
});

/// Source of the `ldu` half, always global through SRC2
pub static LDULD_SRC1G: Lazy<Table> = Lazy::new(|| {
    let global = [
        t(&LDULD_GMEM2),
        t(&LDULD_GMEM2S1),
        t(&LDULD_GMEM2S2),
        t(&LDULD_GMEM2S3),
        t(&LDULD_GMEM2S4),
    ];
    per_code("lduldsrc1g", |code| vec![global[first_scale(code)]])
});

#[cfg(test)]
mod tests {
    use super::*;
    use nd_dis::operand::MemValue;
    use nd_dis::{Operand, RegValue, Token};

    #[test]
    fn test_scales() {
        let first: Vec<_> = (0..32).map(first_scale).collect();
        assert_eq!(&first[..10], &[0, 0, 1, 1, 2, 0, 0, 1, 1, 2]);
        assert_eq!(&first[25..], &[3, 4, 2, 3, 4, 2, 3]);

        let second: Vec<_> = (0..32).map(second_scale).collect();
        assert_eq!(second.iter().filter(|&&s| s == 2).count(), 7);
        assert_eq!(&second[27..], &[3, 3, 3, 4, 4]);
    }

    #[test]
    fn test_dual_load_halves() {
        // code 26: ld b32 from s[] scaled by 4, ldu b128
        let word = (26u64 << LDULD) | (3 << 0x2b) | (2 << 0x14);
        let dst1 = LDULD_DST1.match_word(word, 0).unwrap();
        assert_eq!(dst1[0], Token::Modifier("b128"));

        let dst2 = LDULD_DST2_SEL.match_word(word, 0).unwrap();
        assert_eq!(dst2[0], Token::Modifier("b32"));

        let src2 = LDULD_SRC2S.match_word(word, 0).unwrap();
        assert_eq!(
            src2,
            vec![Token::Operand(Operand::Mem(MemValue {
                space: Some("s"),
                bank: None,
                base: Some(RegValue::Numbered {
                    prefix: "r",
                    index: 2,
                    suffix: ""
                }),
                index: None,
                disp: 12,
                symbol: None,
            }))]
        );
    }

    #[test]
    fn test_wide_global_base() {
        let tokens = GMEM.match_word((1 << 0x3a) | (4 << 0x14), 0).unwrap();
        let Token::Operand(Operand::Mem(mem)) = &tokens[0] else {
            panic!("expected memory operand, got {:?}", tokens);
        };
        assert_eq!(
            mem.base,
            Some(RegValue::Numbered {
                prefix: "r",
                index: 4,
                suffix: "d"
            })
        );
    }

    #[test]
    fn test_ldstd_sizes() {
        let quad = LDSTD.match_word(6 << 5, 0).unwrap();
        assert!(matches!(
            quad[0],
            Token::Operand(Operand::Reg(RegValue::Numbered { suffix: "q", .. }))
        ));
        assert_eq!(LDSTD.match_word(7 << 5, 0).unwrap()[0], Token::Unrecognized);
    }
}
