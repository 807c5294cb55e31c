//! Second/third source selectors and the compound source tables of `set`
//! and `cvt`
//!
//! Bits 0x2e-0x2f pick the form of the second source: register, `c[]`,
//! third register or immediate.

use crate::fields::*;
use crate::flags::{ABS6, ACOUT30, NEG8, PNOT1, PNOT2, PNOT3};
use nd_dis::table::{enumerate, md, t};
use nd_dis::{Atom, Table};
use once_cell::sync::Lazy;

const FORM: u32 = 0x2e;

fn forms(name: &'static str, entries: [Option<Atom>; 4]) -> Table {
    enumerate(name, FORM, 2, entries.map(|atom| atom.map(|a| vec![a])))
}

pub static IS2: Lazy<Table> = Lazy::new(|| forms("is2", [Some(SRC2), Some(CONST), None, Some(IMM)]));
pub static IS2W3: Lazy<Table> =
    Lazy::new(|| forms("is2w3", [Some(SRC2), Some(CONST), Some(SRC3), Some(IMM)]));
/// Third source; swaps places with `c[]` when the second source is a register
pub static IS3: Lazy<Table> =
    Lazy::new(|| forms("is3", [Some(SRC3), Some(SRC3), Some(CONST), Some(SRC3)]));
pub static FS2: Lazy<Table> = Lazy::new(|| forms("fs2", [Some(SRC2), Some(CONST), None, Some(FIMM)]));
pub static FS2W3: Lazy<Table> =
    Lazy::new(|| forms("fs2w3", [Some(SRC2), Some(CONST), Some(SRC3), Some(FIMM)]));
pub static DS2: Lazy<Table> = Lazy::new(|| forms("ds2", [Some(SRC2D), None, None, Some(DIMM)]));
pub static LS2: Lazy<Table> = Lazy::new(|| forms("ls2", [Some(SRC2D), None, None, Some(IMM)]));

/// Video second source: immediate unless bit 0x2f is set
pub static VS2: Lazy<Table> =
    Lazy::new(|| enumerate("vs2", 0x2f, 1, [Some(vec![VIMM]), Some(vec![SRC2])]));
pub static V4S2: Lazy<Table> =
    Lazy::new(|| enumerate("v4s2", 0x2f, 1, [Some(vec![V4IMM]), Some(vec![SRC2])]));

/// Predicate source of `set` on predicates, optionally combined with a second
pub static PSRC: Lazy<Table> = Lazy::new(|| {
    Table::builder("psrc")
        .row(0, 0xfc00_0000, [t(&PNOT1), PSRC1])
        .row(0x0000_0000, 0xc000_0000, [t(&PNOT1), PSRC1, md("and"), t(&PNOT2), PSRC2])
        .row(0x4000_0000, 0xc000_0000, [t(&PNOT1), PSRC1, md("or"), t(&PNOT2), PSRC2])
        .row(0x8000_0000, 0xc000_0000, [t(&PNOT1), PSRC1, md("xor"), t(&PNOT2), PSRC2])
        .oops([])
        .build()
});

/// Combining operation applied to the result of `set`. `and $p7` is a no-op
/// and renders nothing.
pub static SETLOP: Lazy<Table> = Lazy::new(|| {
    const OP: u64 = 0x0060_0000_0000_0000;
    Table::builder("setlop")
        .row(0x000e_0000_0000_0000, 0x006e_0000_0000_0000, [])
        .row(0, OP, [md("and"), t(&PNOT3), PSRC3])
        .row(0x0020_0000_0000_0000, OP, [md("or"), t(&PNOT3), PSRC3])
        .row(0x0040_0000_0000_0000, OP, [md("xor"), t(&PNOT3), PSRC3])
        .oops([t(&PNOT3), PSRC3])
        .build()
});

// cvt: destination and source type selectors

const CVT_SIZE: u64 = 0x30_0000;
const CVT_DST: u64 = 0x30_0080;
const CVT_SRC: u64 = 0x380_0000;
const CVT_ISRC: u64 = 0x380_0200;

pub static CVTFDST: Lazy<Table> = Lazy::new(|| {
    Table::builder("cvtfdst")
        .row(0x10_0000, CVT_SIZE, [md("f16"), DST, t(&ACOUT30)])
        .row(0x20_0000, CVT_SIZE, [md("f32"), DST, t(&ACOUT30)])
        .row(0x30_0000, CVT_SIZE, [md("f64"), DSTD, t(&ACOUT30)])
        .oops([DST])
        .build()
});

const INT_DST: [(u64, &str); 8] = [
    (0x00_0000, "u8"),
    (0x00_0080, "s8"),
    (0x10_0000, "u16"),
    (0x10_0080, "s16"),
    (0x20_0000, "u32"),
    (0x20_0080, "s32"),
    (0x30_0000, "u64"),
    (0x30_0080, "s64"),
];

fn int_dst(name: &'static str, types: &[(u64, &'static str)]) -> Table {
    let mut builder = Table::builder(name);
    for &(value, ty) in types {
        let dst = if value & CVT_SIZE == CVT_SIZE { DSTD } else { DST };
        builder = builder.row(value, CVT_DST, [md(ty), dst, t(&ACOUT30)]);
    }
    builder.oops([DST]).build()
}

pub static CVTIDST: Lazy<Table> = Lazy::new(|| int_dst("cvtidst", &INT_DST));
/// Float to integer has no byte-sized destination
pub static CVTF2IDST: Lazy<Table> = Lazy::new(|| int_dst("cvtf2idst", &INT_DST[2..]));

pub static CVTF2ISRC: Lazy<Table> = Lazy::new(|| {
    let (neg, abs) = (t(&NEG8), t(&ABS6));
    Table::builder("cvtf2isrc")
        .row(0x080_0000, CVT_SRC, [neg, abs, md("f16"), HNUM, t(&IS2)])
        .row(0x100_0000, CVT_SRC, [neg, abs, md("f32"), t(&FS2)])
        .row(0x180_0000, CVT_SRC, [neg, abs, md("f64"), t(&DS2)])
        .oops([neg, abs, SRC2])
        .build()
});

const INT_SRC: [(u64, &str, Option<Atom>); 8] = [
    (0x000_0000, "u8", Some(BNUM)),
    (0x000_0200, "s8", Some(BNUM)),
    (0x080_0000, "u16", Some(HNUM)),
    (0x080_0200, "s16", Some(HNUM)),
    (0x100_0000, "u32", None),
    (0x100_0200, "s32", None),
    (0x180_0000, "u64", None),
    (0x180_0200, "s64", None),
];

fn int_src(name: &'static str, types: &[(u64, &'static str, Option<Atom>)]) -> Table {
    let mut builder = Table::builder(name);
    for &(value, ty, part) in types {
        let src = if value & CVT_SRC == 0x180_0000 { t(&LS2) } else { t(&IS2) };
        let atoms = [t(&NEG8), t(&ABS6), md(ty)]
            .into_iter()
            .chain(part)
            .chain(Some(src));
        builder = builder.row(value, CVT_ISRC, atoms);
    }
    builder.oops([t(&NEG8), t(&ABS6), SRC2]).build()
}

/// Integer source of integer to float conversions
pub static CVTISRC: Lazy<Table> = Lazy::new(|| int_src("cvtisrc", &INT_SRC));
/// Integer source of integer to integer conversions; no 64-bit sources
pub static CVTI2ISRC: Lazy<Table> = Lazy::new(|| int_src("cvti2isrc", &INT_SRC[..6]));

#[cfg(test)]
mod tests {
    use super::*;
    use nd_dis::{Operand, RegValue, Token};

    fn reg(index: u64) -> Token {
        Token::Operand(Operand::Reg(RegValue::Numbered {
            prefix: "r",
            index,
            suffix: "",
        }))
    }

    #[test]
    fn test_source_forms() {
        // SRC2 = $r5, SRC3 = $r9
        let word = (5 << 0x1a) | (9 << 0x31);
        assert_eq!(IS2W3.match_word(word, 0).unwrap(), vec![reg(5)]);
        assert_eq!(IS2W3.match_word(word | (2 << FORM), 0).unwrap(), vec![reg(9)]);
        assert_eq!(IS3.match_word(word, 0).unwrap(), vec![reg(9)]);
        assert_eq!(IS2.match_word(word | (2 << FORM), 0).unwrap(), vec![Token::Unrecognized]);

        let imm = IS2.match_word((3 << FORM) | (0xfffff << 0x1a), 0).unwrap();
        assert_eq!(imm, vec![Token::Operand(Operand::Imm { value: -1, hex: false })]);
    }

    #[test]
    fn test_setlop_noop() {
        // and, PSRC3 = $p7
        assert!(SETLOP.match_word(7 << 0x31, 0).unwrap().is_empty());
        assert_eq!(SETLOP.match_word((7 << 0x31) | (1 << 0x35), 0).unwrap()[0], Token::Modifier("or"));
        let tokens = SETLOP.match_word((3 << 0x31) | (1 << 0x34), 0).unwrap();
        assert_eq!(tokens[..2], [Token::Modifier("and"), Token::Modifier("not")]);
    }

    #[test]
    fn test_cvt_types() {
        let tokens = CVTIDST.match_word(0x30_0080, 0).unwrap();
        assert_eq!(tokens[0], Token::Modifier("s64"));
        assert!(matches!(
            tokens[1],
            Token::Operand(Operand::Reg(RegValue::Numbered { suffix: "d", .. }))
        ));

        assert_eq!(CVTF2IDST.match_word(0x80, 0).unwrap()[0], Token::Unrecognized);

        let tokens = CVTI2ISRC.match_word(0x180_0000, 0).unwrap();
        assert_eq!(tokens[0], Token::Unrecognized);
        let tokens = CVTISRC.match_word(0x080_0200 | (1 << 0x38), 0).unwrap();
        assert_eq!(
            tokens[..2],
            [Token::Modifier("s16"), Token::Operand(Operand::Imm { value: 1, hex: false })]
        );
    }
}
