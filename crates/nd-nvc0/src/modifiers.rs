//! Multi-way modifier tables: rounding modes, comparisons, lane masks, types
//! and the video-instruction byte/half selectors

use crate::fields::CC;
use nd_dis::table::{enumerate, md};
use nd_dis::{Atom, Table, TableBuilder};
use once_cell::sync::Lazy;

/// One modifier per field value, `""` renders nothing
fn names(names: &[&'static str]) -> Vec<Option<Vec<Atom>>> {
    names
        .iter()
        .map(|&name| match name {
            "" => Some(vec![]),
            name => Some(vec![md(name)]),
        })
        .collect()
}

const ROUNDING: [&str; 4] = ["rn", "rm", "rp", "rz"];
const COND: [&str; 24] = [
    "never", "l", "e", "le", "g", "lg", "ge", "lge", "u", "lu", "eu", "leu", "gu", "lgu", "geu",
    "true", "no", "nc", "ns", "na", "a", "s", "c", "o",
];
const QOP: [&str; 4] = ["add", "subr", "sub", "mov2"];

pub static FARM: Lazy<Table> = Lazy::new(|| enumerate("farm", 0x37, 2, names(&ROUNDING)));
pub static FCRM: Lazy<Table> = Lazy::new(|| enumerate("fcrm", 0x31, 2, names(&ROUNDING)));
/// Round to integer
pub static FCRMI: Lazy<Table> =
    Lazy::new(|| enumerate("fcrmi", 0x31, 2, names(&["rni", "rmi", "rpi", "rzi"])));

/// Float comparison for `set` and `slct`
pub static SETIT: Lazy<Table> = Lazy::new(|| {
    enumerate(
        "setit",
        0x37,
        4,
        names(&[
            "false", "lt", "eq", "le", "gt", "ne", "ge", "num", "nan", "ltu", "equ", "leu", "gtu",
            "neu", "geu", "true",
        ]),
    )
});

/// Condition-code test used by `set` on `$c`
pub static SETCT: Lazy<Table> = Lazy::new(|| enumerate("setct", 20, 6, names(&COND)));

/// Condition-code guard; `true` is implicit and renders nothing
pub static CC_GUARD: Lazy<Table> = Lazy::new(|| {
    let entries = COND.iter().map(|&name| match name {
        "true" => Some(vec![]),
        name => Some(vec![md(name), CC]),
    });
    enumerate("cc", 5, 5, entries)
});

pub static MULF: Lazy<Table> = Lazy::new(|| {
    let mut entries = names(&["", "mul2", "mul4", "mul8", "", "div2", "div4", "div8"]);
    entries[4] = None;
    enumerate("mulf", 0x31, 3, entries)
});

pub static PRMTMOD: Lazy<Table> = Lazy::new(|| {
    enumerate("prmtmod", 5, 3, names(&["", "f4e", "b4e", "rc8", "ecl", "ecr", "rc16"]))
});

/// Load cache operation
pub static LCOP: Lazy<Table> = Lazy::new(|| enumerate("lcop", 8, 2, names(&["ca", "cg", "cs", "cv"])));
/// Store cache operation
pub static SCOP: Lazy<Table> = Lazy::new(|| enumerate("scop", 8, 2, names(&["wb", "cg", "cs", "wt"])));

/// Surface out-of-bounds handling
pub static SCLAMP: Lazy<Table> =
    Lazy::new(|| enumerate("sclamp", 0x2f, 2, names(&["zero", "clamp", "trap"])));

pub static CCTLOP: Lazy<Table> = Lazy::new(|| {
    enumerate(
        "cctlop",
        5,
        5,
        names(&["query1", "pf1", "pf15", "pf2", "wb", "iv", "ivall", "rs"]),
    )
});
pub static CCTLMOD: Lazy<Table> = Lazy::new(|| enumerate("cctlmod", 26, 2, names(&["", "u", "c", "i"])));

/// Lane mask of `mov`; all four lanes is the default and renders nothing
pub static LANE: Lazy<Table> = Lazy::new(|| {
    enumerate(
        "lane",
        5,
        4,
        names(&[
            "lnone", "l0", "l1", "l01", "l2", "l02", "l12", "l012", "l3", "l03", "l13", "l013",
            "l23", "l023", "l123", "",
        ]),
    )
});

/// Source lane of `quadop`
pub static QS1: Lazy<Table> =
    Lazy::new(|| enumerate("qs1", 6, 3, names(&["l0", "l1", "l2", "l3", "dx", "dy"])));
pub static QOP0: Lazy<Table> = Lazy::new(|| enumerate("qop0", 38, 2, names(&QOP)));
pub static QOP1: Lazy<Table> = Lazy::new(|| enumerate("qop1", 36, 2, names(&QOP)));
pub static QOP2: Lazy<Table> = Lazy::new(|| enumerate("qop2", 34, 2, names(&QOP)));
pub static QOP3: Lazy<Table> = Lazy::new(|| enumerate("qop3", 32, 2, names(&QOP)));

pub static LDSTT: Lazy<Table> = Lazy::new(|| {
    enumerate("ldstt", 5, 3, names(&["u8", "s8", "u16", "s16", "b32", "b64", "b128"]))
});
/// Vertex fetch width
pub static LDVF: Lazy<Table> =
    Lazy::new(|| enumerate("ldvf", 5, 3, names(&["b32", "b64", "b96", "b128"])));

// Video instructions

pub static VIDEO_DST: Lazy<Table> = Lazy::new(|| {
    enumerate("vdst", 0x37, 3, names(&["h1", "h0", "b0", "b2", "add", "min", "max", ""]))
});
pub static VSRC1: Lazy<Table> =
    Lazy::new(|| enumerate("vsrc1", 0x2c, 3, names(&["b0", "b1", "b2", "b3", "h0", "h1", ""])));
pub static VSRC2: Lazy<Table> =
    Lazy::new(|| enumerate("vsrc2", 0x20, 3, names(&["b0", "b1", "b2", "b3", "h0", "h1", ""])));

pub static V4DST: Lazy<Table> = Lazy::new(|| {
    let mut entries = names(&["", "simd_min", "simd_max", "", "add", "min", "max"]);
    entries[3] = None;
    enumerate("v4dst", 0x2c, 3, entries)
});

/// Destination component mask, split over bits 0x37-0x38 (x, y) and
/// 0x22-0x23 (z, w); all four renders nothing
pub static V4DMASK: Lazy<Table> = Lazy::new(|| {
    const MASKS: [&str; 16] = [
        "none", "x", "y", "xy", "z", "xz", "yz", "xyz", "w", "xw", "yw", "xyw", "zw", "xzw", "yzw",
        "",
    ];
    let mask = (3 << 0x37) | (3 << 0x22);
    let mut builder = Table::builder("v4dmask");
    for (i, name) in MASKS.iter().enumerate() {
        let i = i as u64;
        let value = ((i & 3) << 0x37) | ((i >> 2) << 0x22);
        builder = match *name {
            "" => builder.row(value, mask, []),
            name => builder.row(value, mask, [md(name)]),
        };
    }
    builder.oops([]).build()
});

pub static V2DMASK: Lazy<Table> =
    Lazy::new(|| enumerate("v2dmask", 0x37, 2, names(&["none", "x", "y", ""])));

pub static V4SRC1: Lazy<Table> = Lazy::new(|| {
    enumerate(
        "v4src1",
        0x28,
        4,
        names(&[
            "b0", "b1", "b2", "b3", "", "b1234", "b2345", "b3456", "b1023", "b2103", "b3120",
            "b0213", "b0321", "b0132",
        ]),
    )
});

pub static V4SRC2: Lazy<Table> = Lazy::new(|| {
    enumerate(
        "v4src2",
        0x24,
        4,
        names(&[
            "b4", "b5", "b6", "b7", "", "b3456", "b2345", "b1234", "b7654", "b5476", "b6745",
        ]),
    )
});

const HALVES: [&str; 16] = [
    "h0", "h10", "h20", "h30", "", "h1", "h21", "h31", "h02", "h12", "h2", "h32", "h03", "h13",
    "h23", "h3",
];

/// Half selector of the first source. With bit 0x2f clear only bits
/// 0x2a-0x2b take part.
pub static V2SRC1: Lazy<Table> = Lazy::new(|| {
    let short = 0xc << 0x28 | 1 << 0x2f;
    let long = 0xf << 0x28 | 1 << 0x2f;
    let builder = Table::builder("v2src1")
        .row(0, short, [md("h0")])
        .row(0x4 << 0x28, short, [md("h10")])
        .row(0x8 << 0x28, short, [])
        .row(0xc << 0x28, short, [md("h1")]);
    half_rows(builder, 0x28, long).oops([]).build()
});

/// Half selector of the second source; bit 0x2f clear selects the
/// immediate form, which has no selector
pub static V2SRC2: Lazy<Table> = Lazy::new(|| {
    let long = 0xf << 0x24 | 1 << 0x2f;
    let builder = Table::builder("v2src2").row(0, 1 << 0x2f, []);
    let mut halves = HALVES;
    halves[4] = "h01";
    halves[14] = "";
    half_rows_from(builder, 0x24, long, &halves).oops([]).build()
});

fn half_rows(builder: TableBuilder, start: u32, mask: u64) -> TableBuilder {
    half_rows_from(builder, start, mask, &HALVES)
}

fn half_rows_from(
    mut builder: TableBuilder,
    start: u32,
    mask: u64,
    halves: &[&'static str; 16],
) -> TableBuilder {
    for (i, name) in halves.iter().enumerate() {
        let value = (i as u64) << start | 1 << 0x2f;
        builder = match *name {
            "" => builder.row(value, mask, []),
            name => builder.row(value, mask, [md(name)]),
        };
    }
    builder
}

pub static VMOP: Lazy<Table> =
    Lazy::new(|| enumerate("vmop", 7, 2, names(&["add", "sub", "subr", "addpo"])));
pub static VMSHR: Lazy<Table> = Lazy::new(|| enumerate("vmshr", 0x37, 2, names(&["", "shr7", "shr15"])));
pub static VSETOP: Lazy<Table> = Lazy::new(|| {
    enumerate(
        "vsetop",
        7,
        3,
        names(&["false", "lt", "eq", "le", "gt", "ne", "ge", "true"]),
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use nd_dis::{Operand, RegValue, Token};

    #[test]
    fn test_condition_guard() {
        let always = CC_GUARD.match_word(15 << 5, 0).unwrap();
        assert!(always.is_empty());

        let carry = CC_GUARD.match_word(22 << 5, 0).unwrap();
        assert_eq!(
            carry,
            vec![Token::Modifier("c"), Token::Operand(Operand::Reg(RegValue::Fixed("c")))]
        );

        // 24..31 are not assigned
        assert_eq!(CC_GUARD.match_word(30 << 5, 0).unwrap(), vec![Token::Unrecognized]);
    }

    #[test]
    fn test_mulf_gap() {
        assert!(MULF.match_word(0, 0).unwrap().is_empty());
        assert_eq!(MULF.match_word(5 << 0x31, 0).unwrap(), vec![Token::Modifier("div2")]);
        assert_eq!(MULF.match_word(4 << 0x31, 0).unwrap(), vec![Token::Unrecognized]);
    }

    #[test]
    fn test_component_mask() {
        // x, w
        let word = (1 << 0x37) | (2 << 0x22);
        assert_eq!(V4DMASK.match_word(word, 0).unwrap(), vec![Token::Modifier("xw")]);
        let all = (3 << 0x37) | (3 << 0x22);
        assert!(V4DMASK.match_word(all, 0).unwrap().is_empty());
    }

    #[test]
    fn test_half_selectors() {
        assert_eq!(V2SRC1.match_word(0xc << 0x28, 0).unwrap(), vec![Token::Modifier("h1")]);
        let long = (1 << 0x2f) | (0xa << 0x28);
        assert_eq!(V2SRC1.match_word(long, 0).unwrap(), vec![Token::Modifier("h2")]);

        assert!(V2SRC2.match_word(0xf << 0x24, 0).unwrap().is_empty());
        let long = (1 << 0x2f) | (4 << 0x24);
        assert_eq!(V2SRC2.match_word(long, 0).unwrap(), vec![Token::Modifier("h01")]);
    }

    #[test]
    fn test_no_dead_rows() {
        for table in [&*V4DMASK, &*V2SRC1, &*V2SRC2, &*CC_GUARD, &*SETCT] {
            assert!(table.malformed_rows().is_empty(), "{}", table.name());
            assert!(table.shadowed_rows().is_empty(), "{}", table.name());
        }
    }
}
