//! Non-control instructions
//!
//! Bits 0-2 select the instruction class:
//!
//! | class | contents                                   |
//! |-------|--------------------------------------------|
//! | 0     | single precision float                     |
//! | 1     | double precision float                     |
//! | 2     | 32-bit long immediate forms                |
//! | 3     | integer                                    |
//! | 4     | moves, conversions, predicates, video      |
//! | 5     | `g[]`, `s[]`, `l[]` and surface access     |
//! | 6     | `c[]`, attributes and textures             |
//!
//! Bits 0x3b-0x3f hold the opcode within a class. Bits 3-4 are never
//! used here; bit 4 is the `join` flag handled at the root.

use crate::fields::*;
use crate::flags::*;
use crate::memory::*;
use crate::modifiers::*;
use crate::sources::*;
use nd_dis::table::{md, op, t};
use nd_dis::{Atom, Table};
use once_cell::sync::Lazy;

const OPC: u64 = 0xf800_0000_0000_0007;
const OPC4: u64 = 0xfc00_0000_0000_0007;

pub static ADDOP: Lazy<Table> =
    Lazy::new(|| opcodes("addop", 8, 2, &["add", "sub", "subr", "addpo"]));
pub static ADDOP2: Lazy<Table> =
    Lazy::new(|| opcodes("addop2", 0x37, 2, &["add", "sub", "subr", "addpo"]));
pub static LOGOP: Lazy<Table> =
    Lazy::new(|| opcodes("logop", 6, 2, &["and", "or", "xor", "mov2"]));
/// Reduction operation of `red`, `ld` on atomics and `suredp`
pub static REDOP: Lazy<Table> = Lazy::new(|| {
    opcodes("redop", 5, 4, &["add", "min", "max", "inc", "dec", "and", "or", "xor"])
});
/// Reductions available on signed values
pub static REDOPS: Lazy<Table> = Lazy::new(|| opcodes("redops", 5, 4, &["add", "min", "max"]));

/// `min` or `max` from bits 0x31-0x34; anything else selects by predicate
/// (`min` when true)
pub static MINMAX: Lazy<Table> = Lazy::new(|| {
    Table::builder("minmax")
        .row(0x000e_0000_0000_0000, 0x001e_0000_0000_0000, [op("min")])
        .row(0x001e_0000_0000_0000, 0x001e_0000_0000_0000, [op("max")])
        .default([op("minmax"), t(&PNOT3), PSRC3])
        .build()
});

fn opcodes(name: &'static str, start: u32, width: u32, names: &[&'static str]) -> Table {
    let entries = names.iter().map(|&name| Some(vec![op(name)]));
    nd_dis::table::enumerate(name, start, width, entries)
}

/// Class-dispatched table of everything that is not control flow
pub static OPS: Lazy<Table> = Lazy::new(|| {
    Table::builder("ops")
        .row(0, 7, [t(&FLOAT)])
        .row(1, 7, [t(&DOUBLE)])
        .row(2, 7, [t(&LONG_IMM)])
        .row(3, 7, [t(&INTEGER)])
        .row(4, 7, [t(&MOVE)])
        .row(5, 7, [t(&MEMORY)])
        .row(6, 7, [t(&TEXTURE)])
        .oops([DST, SRC1, t(&IS2), SRC3])
        .build()
});

const fn class_op(opcode: u64, class: u64) -> u64 {
    opcode << 56 | class
}

pub static FLOAT: Lazy<Table> = Lazy::new(|| {
    let f = |opcode| class_op(opcode, 0);
    let mut builder = Table::builder("float")
        .row(f(0x08), OPC, [
            t(&MINMAX), t(&FTZ5), md("f32"), DST, t(&ACOUT30),
            t(&NEG9), t(&ABS7), SRC1, t(&NEG8), t(&ABS6), t(&FS2),
        ])
        .row(f(0x10), 0xf000_0000_0000_0007, [
            op("set"), t(&FTZ3B), t(&SETDT5), DST, t(&ACOUT30), t(&SETIT), md("f32"),
            t(&NEG9), t(&ABS7), SRC1, t(&NEG8), t(&ABS6), t(&FS2), t(&SETLOP),
        ])
        .row(f(0x20), 0xf000_0000_0000_0007, [
            op("set"), t(&FTZ3B), PDST, PDSTN, t(&SETIT), md("f32"),
            t(&NEG9), t(&ABS7), SRC1, t(&NEG8), t(&ABS6), t(&FS2), t(&SETLOP),
        ])
        .row(f(0x30), OPC, [
            op("add"), t(&FTZ6), t(&SAT5), t(&FARM), md("f32"), DST, t(&ACOUT30),
            t(&NEG9), md("mul"), t(&FMZ7), SRC1, t(&FS2W3), t(&NEG8), t(&IS3),
        ])
        .row(f(0x38), OPC, [
            op("slct"), t(&FTZ5), md("b32"), DST, SRC1, t(&FS2W3), t(&SETIT), md("f32"), t(&IS3),
        ])
        .row(f(0x48), OPC, [
            op("quadop"), t(&FTZ5), t(&FARM), md("f32"),
            t(&QOP0), t(&QOP1), t(&QOP2), t(&QOP3),
            DST, t(&ACOUT30), t(&QS1), SRC1, SRC2,
        ])
        .row(f(0x50), OPC, [
            op("add"), t(&FTZ5), t(&SAT31), t(&FARM), md("f32"), DST, t(&ACOUT30),
            t(&NEG9), t(&ABS7), SRC1, t(&NEG8), t(&ABS6), t(&FS2),
        ])
        .row(f(0x58), OPC, [
            op("mul"), t(&MULF), t(&FMZ7), t(&FTZ6), t(&SAT5), t(&FARM), t(&NEG39),
            md("f32"), DST, t(&ACOUT30), SRC1, t(&FS2),
        ])
        .row(f(0x60), OPC | 0x20, [op("presin"), md("f32"), DST, t(&NEG8), t(&ABS6), t(&FS2)])
        .row(f(0x60) | 0x20, OPC | 0x20, [op("preex2"), md("f32"), DST, t(&NEG8), t(&ABS6), t(&FS2)]);

    // Interpolation: bits 6-8 pick the mode, SRC3 must be 63.
    // Modes without an explicit multiplier need SRC2 = 63 as well.
    const INTERP: u64 = 0xc07e_0000_0000_0000;
    const INTERP_MASK: u64 = 0xf87e_0000_0000_01c7;
    const NO_SRC2: u64 = 0xfc00_0000;
    builder = builder
        .row(INTERP | NO_SRC2, INTERP_MASK | NO_SRC2, [op("interp"), md("f32"), DST, VAR])
        .row(INTERP | 0x40, INTERP_MASK, [op("interp"), md("f32"), DST, SRC2, VAR])
        .row(INTERP | NO_SRC2 | 0x80, INTERP_MASK | NO_SRC2, [op("interp"), md("f32"), DST, md("flat"), VAR])
        .row(INTERP | NO_SRC2 | 0x100, INTERP_MASK | NO_SRC2, [op("interp"), md("f32"), DST, md("cent"), VAR])
        .row(INTERP | 0x140, INTERP_MASK, [op("interp"), md("f32"), DST, md("cent"), SRC2, VAR]);

    // Special function unit, function in bits 0x1a-0x1c
    const SFU: [(&str, bool); 8] = [
        ("cos", true),
        ("sin", true),
        ("ex2", true),
        ("lg2", true),
        ("rcp", true),
        ("rsqrt", true),
        ("rcp64h", false),
        ("rsqrt64h", false),
    ];
    for (i, &(name, single)) in SFU.iter().enumerate() {
        let value = f(0xc8) | (i as u64) << 0x1a;
        let ty = single.then_some(md("f32"));
        let atoms = [op(name), t(&SAT5)]
            .into_iter()
            .chain(ty)
            .chain([DST, t(&NEG9), t(&ABS7), SRC1]);
        builder = builder.row(value, OPC | 0x1c00_0000, atoms);
    }

    builder
        .oops([t(&FARM), md("f32"), DST, SRC1, t(&FS2W3), t(&IS3)])
        .build()
});

pub static DOUBLE: Lazy<Table> = Lazy::new(|| {
    let f = |opcode| class_op(opcode, 1);
    Table::builder("double")
        .row(f(0x08), OPC, [
            t(&MINMAX), md("f64"), DSTD, t(&ACOUT30),
            t(&NEG9), t(&ABS7), SRC1D, t(&NEG8), t(&ABS6), t(&DS2),
        ])
        .row(f(0x10), OPC, [
            op("set"), t(&SETDT5), DST, t(&ACOUT30), t(&SETIT), md("f64"),
            t(&NEG9), t(&ABS7), SRC1D, t(&NEG8), t(&ABS6), t(&DS2), t(&SETLOP),
        ])
        .row(f(0x18), OPC, [
            op("set"), PDST, PDSTN, t(&SETIT), md("f64"),
            t(&NEG9), t(&ABS7), SRC1D, t(&NEG8), t(&ABS6), t(&DS2), t(&SETLOP),
        ])
        .row(f(0x20), OPC, [
            op("fma"), t(&FARM), md("f64"), DSTD, t(&ACOUT30),
            t(&NEG9), SRC1D, t(&DS2), t(&NEG8), SRC3D,
        ])
        .row(f(0x48), OPC, [
            op("add"), t(&FARM), md("f64"), DSTD, t(&ACOUT30),
            t(&NEG9), t(&ABS7), SRC1D, t(&NEG8), t(&ABS6), t(&DS2),
        ])
        .row(f(0x50), OPC, [
            op("mul"), t(&FARM), t(&NEG9), md("f64"), DSTD, t(&ACOUT30), SRC1D, t(&DS2),
        ])
        .oops([t(&FARM), md("f64"), DSTD, SRC1D, t(&DS2), SRC3D])
        .build()
});

pub static LONG_IMM: Lazy<Table> = Lazy::new(|| {
    let f = |opcode| class_op(opcode, 2);
    Table::builder("long_imm")
        .row(f(0x00), OPC, [
            t(&ADDOP), DST, t(&ACOUT3A), md("mul"), t(&HIGH6),
            t(&US32_7), SRC1, t(&US32_5), LIMM, SRC3,
        ])
        .row(f(0x08), OPC, [
            t(&ADDOP), t(&SAT5), md("b32"), DST, t(&ACOUT3A), SRC1, LIMM, t(&ACIN6),
        ])
        .row(f(0x10), OPC, [
            op("mul"), t(&HIGH6), DST, t(&ACOUT3A), t(&US32_7), SRC1, t(&US32_5), LIMM,
        ])
        .row(f(0x18), OPC, [t(&LANE), op("mov"), md("b32"), DST, LIMM])
        .row(f(0x20), OPC, [
            op("add"), t(&FTZ6), t(&SAT5), t(&FARM), md("f32"), DST, t(&ACOUT3A),
            t(&NEG9), md("mul"), t(&FMZ7), SRC1, LIMM, t(&NEG8), SRC3,
        ])
        .row(f(0x28), OPC, [
            op("add"), t(&FTZ5), md("f32"), DST, t(&ACOUT3A), t(&NEG9), t(&ABS7), SRC1, LIMM,
        ])
        .row(f(0x30), OPC, [
            op("mul"), t(&FMZ7), t(&FTZ6), t(&SAT5), md("f32"), DST, t(&ACOUT3A), SRC1, LIMM,
        ])
        .row(f(0x38), OPC, [
            t(&LOGOP), md("b32"), DST, t(&ACOUT3A), t(&NOT9), SRC1, t(&NOT8), LIMM, t(&ACIN5),
        ])
        .row(f(0x40), OPC, [
            op("add"), md("b32"), DST, t(&ACOUT3A), md("shl"), SRC1, SHCNT, LIMM,
        ])
        .oops([md("b32"), DST, SRC1, LIMM])
        .build()
});

pub static INTEGER: Lazy<Table> = Lazy::new(|| {
    let f = |opcode| class_op(opcode, 3);
    let mut builder = Table::builder("integer");

    // Three-way min/max/median variants in bits 6-7
    for (mode, part, carry) in [
        (0x00, None, false),
        (0x40, Some("low"), true),
        (0x80, Some("med"), true),
        (0xc0, Some("high"), false),
    ] {
        let atoms = [t(&MINMAX)]
            .into_iter()
            .chain(part.map(md))
            .chain([t(&US32_5), DST, t(&ACOUT30), SRC1, t(&IS2)])
            .chain(carry.then_some(CC));
        builder = builder.row(f(0x08) | mode, OPC | 0xc0, atoms);
    }

    builder
        .row(f(0x10), OPC, [
            op("set"), t(&SETDT7), DST, t(&ACOUT30), t(&SETIT), t(&US32_5),
            SRC1, t(&IS2), t(&ACIN6), t(&SETLOP),
        ])
        .row(f(0x18), OPC, [
            op("set"), PDST, PDSTN, t(&SETIT), t(&US32_5), SRC1, t(&IS2), t(&ACIN6), t(&SETLOP),
        ])
        .row(f(0x20), OPC, [
            t(&ADDOP), t(&SAT38), DST, t(&ACOUT30), md("mul"), t(&HIGH6),
            t(&US32_7), SRC1, t(&US32_5), t(&IS2W3), t(&IS3), t(&ACIN37),
        ])
        .row(f(0x28), OPC, [op("ins"), md("b32"), DST, t(&ACOUT30), SRC1, t(&IS2W3), t(&IS3)])
        .row(f(0x30), OPC, [
            op("slct"), md("b32"), DST, SRC1, t(&IS2W3), t(&SETIT), t(&US32_5), t(&IS3),
        ])
        .row(f(0x38), OPC, [op("sad"), t(&US32_5), DST, t(&ACOUT30), SRC1, t(&IS2W3), t(&IS3)])
        .row(f(0x40), OPC, [
            t(&ADDOP2), md("b32"), DST, t(&ACOUT30), md("shl"), SRC1, SHCNT, t(&IS2),
        ])
        .row(f(0x48), OPC, [
            t(&ADDOP), t(&SAT5), md("b32"), DST, t(&ACOUT30), SRC1, t(&IS2), t(&ACIN6),
        ])
        .row(f(0x50), OPC, [
            op("mul"), t(&HIGH6), DST, t(&ACOUT30), t(&US32_7), SRC1, t(&US32_5), t(&IS2),
        ])
        .row(f(0x58), OPC, [
            op("shr"), t(&REV), t(&US32_5), DST, t(&ACOUT30), SRC1, t(&SHCLAMP), t(&IS2), t(&ACIN7),
        ])
        .row(f(0x60), OPC, [
            op("shl"), md("b32"), DST, t(&ACOUT30), SRC1, t(&SHCLAMP), t(&IS2), t(&ACIN6),
        ])
        .row(f(0x68), OPC, [
            t(&LOGOP), md("b32"), DST, t(&ACOUT30), t(&NOT9), SRC1, t(&NOT8), t(&IS2), t(&ACIN5),
        ])
        // rev reverses the bits of the extracted field
        .row(f(0x70), OPC, [op("ext"), t(&REV), t(&US32_5), DST, t(&ACOUT30), SRC1, t(&IS2)])
        // Index of the highest set bit, or of the highest bit differing from
        // the sign for signed sources; -1 when there is none
        .row(f(0x78), OPC, [
            op("bfind"), t(&SHIFTAMT), t(&US32_5), DST, t(&ACOUT30), t(&NOT8), t(&IS2),
        ])
        .oops([md("b32"), DST, SRC1, t(&IS2W3), t(&IS3)])
        .build()
});

/// Operands shared by the packed video instructions
fn video4(dmask: Atom, src1: Atom, src2: Atom, s2: Atom) -> [Atom; 12] {
    [
        t(&SAT9), t(&V4DST), dmask, t(&US8_39), DST, t(&ACOUT30),
        src1, t(&US8_6), SRC1, src2, t(&US8_5), s2,
    ]
}

/// Packed video instructions; `lanes` is 4 for bytes and 2 for halves
fn packed_video(mut builder: nd_dis::TableBuilder, base: u64, lanes: u8) -> nd_dis::TableBuilder {
    let (dmask, src1, src2, s2) = match lanes {
        4 => (t(&V4DMASK), t(&V4SRC1), t(&V4SRC2), t(&V4S2)),
        _ => (t(&V2DMASK), t(&V2SRC1), t(&V2SRC2), t(&VS2)),
    };
    let names: [&'static str; 11] = match lanes {
        4 => [
            "vadd4", "vsub4", "vsubr4", "vavg4", "vmin4", "vmax4", "vabsdiff4", "vset4", "vshr4",
            "vshl4", "vsel4",
        ],
        _ => [
            "vadd2", "vsub2", "vsubr2", "vavg2", "vmin2", "vmax2", "vabsdiff2", "vset2", "vshr2",
            "vshl2", "vsel2",
        ],
    };
    let common = video4(dmask, src1, src2, s2);
    let f = |opcode: u64| class_op(base + opcode, 4);

    for (i, sub) in [0u64, 0x80, 0x100, 0x180].into_iter().enumerate() {
        let atoms = std::iter::once(op(names[i])).chain(common).chain([SRC3]);
        builder = builder.row(f(0) | sub, OPC4 | 0x180, atoms);
    }
    for (i, sub) in [0u64, 0x80].into_iter().enumerate() {
        let atoms = std::iter::once(op(names[4 + i])).chain(common).chain([SRC3]);
        builder = builder.row(f(4) | sub, OPC4 | 0x80, atoms);
    }
    let absdiff = std::iter::once(op(names[6])).chain(common).chain([SRC3]);
    let set = [
        op(names[7]), t(&V4DST), dmask, DST, t(&ACOUT30), t(&VSETOP),
        src1, t(&US8_6), SRC1, src2, t(&US8_5), s2, SRC3,
    ];
    // Shifts have no signedness on the second source
    let shift = |name| {
        [op(name), t(&VSCLAMP)]
            .into_iter()
            .chain(common[..10].iter().copied())
            .chain([s2, SRC3])
    };
    let sel = std::iter::once(op(names[10])).chain(common).chain([t(&PNOT3), PSRC3]);

    builder
        .row(f(8), OPC4, absdiff)
        .row(f(0xc), OPC4, set)
        .row(f(0x10), OPC4, shift(names[8]))
        .row(f(0x14), OPC4, shift(names[9]))
        .row(f(0x18), OPC4, sel)
}

/// Operands shared by the scalar video instructions
fn video1(dst: &[Atom]) -> Vec<Atom> {
    dst.iter()
        .copied()
        .chain([t(&VSRC1), t(&US32_6), SRC1, t(&VSRC2), t(&US32_5), t(&VS2)])
        .collect()
}

fn scalar_video(mut builder: nd_dis::TableBuilder) -> nd_dis::TableBuilder {
    let f = |opcode: u64| class_op(opcode, 4);
    let arith = [t(&SAT9), t(&VIDEO_DST), t(&US32_2A), DST, t(&ACOUT30)];

    for (name, sub, opcode, mask) in [
        ("vadd", 0x000, 0xc0, 0x187),
        ("vsub", 0x080, 0xc0, 0x187),
        ("vsubr", 0x100, 0xc0, 0x187),
        ("vaddpo", 0x180, 0xc0, 0x187),
        ("vmin", 0x000, 0xc8, 0x87),
        ("vmax", 0x080, 0xc8, 0x87),
        ("vabsdiff", 0x000, 0xd0, 0x07),
    ] {
        let atoms = std::iter::once(op(name)).chain(video1(&arith)).chain([SRC3]);
        builder = builder.row(f(opcode) | sub, 0xf800_0000_0000_0000 | mask, atoms);
    }

    // Shifts write the condition codes before naming the destination
    let shift = [t(&VSCLAMP), t(&SAT9), t(&VIDEO_DST), t(&US32_2A), t(&ACOUT30), DST];
    let set = [t(&VIDEO_DST), DST, t(&ACOUT30), t(&VSETOP)];
    let mad = [t(&VMOP), t(&SAT9), t(&VMSHR), DST, t(&ACOUT30)];
    let with = |name, dst: &[Atom], last: Atom| {
        std::iter::once(op(name)).chain(video1(dst)).chain([last])
    };
    builder
        .row(f(0xd8), OPC, with("vset", &set, SRC3))
        .row(f(0xe0), OPC, with("vshr", &shift, SRC3))
        .row(f(0xe8), OPC, with("vshl", &shift, SRC3))
        .row(f(0xf0), OPC, with("vmad", &mad, SRC3))
        .row(f(0xf8), OPC, with("vset", &[PDST, PDSTN, t(&VSETOP)], t(&SETLOP)))
}

pub static MOVE: Lazy<Table> = Lazy::new(|| {
    const PMEVENT: u64 = 1 << 0x32;
    let f = |opcode| class_op(opcode, 4);
    let mut builder = Table::builder("move")
        .row(f(0x00), OPC4, [op("set"), t(&SETDT5), DST, t(&ACOUT30), t(&SETCT), CC, t(&SETLOP)])
        .row(f(0x04), OPC4, [op("set"), PDST, PDSTN, t(&SETCT), CC, t(&SETLOP)])
        .row(f(0x08), OPC4, [op("set"), t(&SETDT5), DST, t(&ACOUT30), t(&PSRC), t(&SETLOP)])
        .row(f(0x0c), OPC4, [op("set"), PDST, PDSTN, t(&PSRC), t(&SETLOP)]);

    // Float to float conversions, keyed by destination and source size.
    // Same-size conversions round to integer.
    const CVT_MASK: u64 = OPC4 | 0x1b0_0000;
    for (sizes, round, dst_ty, dst, src_ty, src, part) in [
        (0x090_0000, Some(t(&RINT)), "f16", DST, "f16", t(&IS2), Some(HNUM)),
        (0x120_0000, Some(t(&RINT)), "f32", DST, "f32", t(&FS2), None),
        (0x1b0_0000, Some(t(&RINT)), "f64", DSTD, "f64", t(&DS2), None),
        (0x110_0000, Some(t(&FCRM)), "f16", DST, "f32", t(&FS2), None),
        (0x1a0_0000, Some(t(&FCRM)), "f32", DST, "f64", t(&DS2), None),
        (0x0a0_0000, None, "f32", DST, "f16", t(&IS2), Some(HNUM)),
        (0x130_0000, None, "f64", DSTD, "f32", t(&FS2), None),
    ] {
        let atoms = [op("cvt"), t(&FTZ37), t(&SAT5)]
            .into_iter()
            .chain(round)
            .chain([md(dst_ty), dst, t(&ACOUT30), t(&NEG8), t(&ABS6), md(src_ty), src])
            .chain(part);
        builder = builder.row(f(0x10) | sizes, CVT_MASK, atoms);
    }

    builder = builder
        .row(f(0x14), OPC4, [op("cvt"), t(&FTZ37), t(&FCRMI), t(&CVTF2IDST), t(&CVTF2ISRC)])
        .row(f(0x18), OPC4, [op("cvt"), t(&FCRM), t(&CVTFDST), t(&CVTISRC)])
        .row(f(0x1c), OPC4, [op("cvt"), t(&SAT5), t(&CVTIDST), t(&CVTI2ISRC)])
        .row(f(0x20), OPC4, [op("selp"), md("b32"), DST, SRC1, t(&IS2), t(&PNOT3), PSRC3])
        .row(f(0x24), OPC4, [op("prmt"), t(&PRMTMOD), md("b32"), DST, SRC1, t(&IS2W3), t(&IS3)])
        .row(f(0x28), OPC4, [t(&LANE), op("mov"), md("b32"), DST, t(&IS2)])
        .row(f(0x2c), OPC4, [op("mov"), md("b32"), DST, SREG])
        // SRC1 = 63: plain flags read
        .row(f(0x30) | 0x3f0_0000, OPC4 | 0x3f0_0000, [
            op("mov"), DST, t(&HIGH5), FLAGS, md("mask"), t(&IS2),
        ])
        .row(f(0x30), OPC4, [
            op("mov"), DST, SRC1, md("or"), t(&HIGH5), FLAGS, md("mask"), t(&IS2),
        ])
        .row(f(0x34), OPC4, [op("mov"), t(&HIGH5), FLAGS, SRC1, md("mask"), t(&IS2)])
        .row(f(0x38), OPC4, [op("bar"), md("read"), DST, BAR])
        .row(f(0x40), OPC4 | PMEVENT, [t(&CC_GUARD), op("nop")])
        // Operand looks like a mask of triggered events, 0 ignored
        .row(f(0x40) | PMEVENT, OPC4 | PMEVENT, [t(&CC_GUARD), op("pmevent"), PM])
        .row(f(0x44), OPC4, [op("lepc"), DST]);

    for (mode, sub) in [("all", 0x00), ("any", 0x20), ("uni", 0x40)] {
        builder = builder.row(f(0x48) | sub, OPC4 | 0x60, [
            op("vote"), md(mode), DST, PDST2, t(&PNOT1), PSRC1,
        ]);
    }
    // bar sync is bar popc with the result unused
    for (mode, sub) in [("popc", 0x00), ("and", 0x20), ("or", 0x40), ("arrive", 0x80)] {
        builder = builder.row(f(0x50) | sub, OPC4 | 0xe0, [
            op("bar"), md(mode), PDST3, DST, t(&BAR_SRC), t(&TCNT_SRC), t(&PNOT3), PSRC3,
        ]);
    }
    // Operation unconfirmed, assumed to count SRC1 & SRC2
    builder = builder.row(f(0x54), OPC4, [op("popc"), DST, t(&NOT9), SRC1, t(&NOT8), t(&IS2)]);

    builder = packed_video(builder, 0x80, 4);
    builder = packed_video(builder, 0xa0, 2);
    scalar_video(builder)
        .oops([DST, SRC1, t(&IS2), SRC3])
        .build()
});

pub static MEMORY: Lazy<Table> = Lazy::new(|| {
    let f = |opcode| class_op(opcode, 5);
    const RED: u64 = OPC | 0x200;
    const ATOM: u64 = 0xf87e_0000_0000_0307;
    const ATOM_OP: u64 = 0xf87e_0000_0000_03e7;
    const NO_SRC3: u64 = 0x007e_0000_0000_0000;

    let mut builder = Table::builder("memory")
        .row(f(0x10), RED, [t(&REDOP), md("u32"), t(&GMEM), DST])
        .row(f(0x10) | 0x200, RED, [op("add"), md("u64"), t(&GMEM), DSTD])
        .row(f(0x18) | 0x200, RED, [t(&REDOPS), md("s32"), t(&GMEM), DST])
        .row(f(0x28) | 0x200, RED, [op("add"), md("f32"), t(&GMEM), DST])
        // Atomics with a result; SRC3 must be 63 except for cas
        .row(f(0x50) | NO_SRC3, ATOM, [op("ld"), t(&REDOP), md("u32"), DST2, t(&GAMEM), DST])
        .row(f(0x50) | NO_SRC3 | 0x200, ATOM_OP, [op("ld"), md("add"), md("u64"), DST2, t(&GAMEM), DST])
        .row(f(0x50) | NO_SRC3 | 0x100, ATOM_OP, [op("exch"), md("b32"), DST2, t(&GAMEM), DST])
        .row(f(0x50) | NO_SRC3 | 0x300, ATOM_OP, [op("exch"), md("b64"), DST2D, t(&GAMEM), DSTD])
        .row(f(0x50) | 0x120, OPC | 0x3e0, [op("cas"), md("b32"), DST2, t(&GAMEM), DST, SRC3])
        .row(f(0x50) | 0x320, OPC | 0x3e0, [op("cas"), md("b64"), DST2D, t(&GAMEM), DSTD, SRC3D])
        .row(f(0x58) | NO_SRC3 | 0x200, ATOM, [op("ld"), t(&REDOPS), md("s32"), DST2, t(&GAMEM), DST])
        .row(f(0x68) | NO_SRC3 | 0x200, ATOM_OP, [op("ld"), md("add"), md("f32"), DST2, t(&GAMEM), DST])
        .row(f(0x80), OPC, [op("ld"), t(&LDSTT), t(&LDSTD), t(&LCOP), t(&GMEM)])
        .row(f(0x88), OPC, [op("ldu"), t(&LDSTT), t(&LDSTD), t(&GMEM)])
        .row(f(0x90), OPC, [op("st"), t(&LDSTT), t(&SCOP), t(&GMEM), t(&LDSTD)])
        .row(f(0x98), OPC, [op("cctl"), t(&CCTLOP), t(&CCTLMOD), DST, t(&GCMEM_SEL)])
        .row(f(0xa0), OPC, [op("ld"), md("lock"), t(&LDSTT), PDSTL, t(&LDSTD), GLOBAL])
        .row(f(0xa8), OPC, [
            op("ld"), t(&LDULD_DST2_SEL), t(&LDULD_SRC2S),
            op("ldu"), t(&LDULD_DST1), t(&LDULD_SRC1G),
        ])
        .row(f(0xb0), 0xf000_0000_0000_0007, [
            op("ld"), t(&LDULD_DST2_SEL), t(&LDULD_SRC2G),
            op("ldu"), t(&LDULD_DST1), t(&LDULD_SRC1G),
        ]);

    // Bit 0x38 separates loads from stores, bit 0x39 lock/unlock
    const LS: u64 = 0xfd00_0000_0000_0007;
    builder = builder
        .row(f(0xc0), LS, [op("ld"), t(&LDSTT), t(&LDSTD), t(&LCOP), LOCAL])
        .row(f(0xc1), LS, [op("ld"), t(&LDSTT), t(&LDSTD), SHARED])
        .row(f(0xc4), OPC4, [op("ld"), md("lock"), t(&LDSTT), PDST4, t(&LDSTD), SHARED])
        .row(f(0xc8), LS, [op("st"), t(&LDSTT), t(&SCOP), LOCAL, t(&LDSTD)])
        .row(f(0xc9), LS, [op("st"), t(&LDSTT), SHARED, t(&LDSTD)])
        .row(f(0xcc), OPC4, [op("st"), md("unlock"), t(&LDSTT), SHARED, t(&LDSTD)])
        .row(f(0xd0), OPC4, [op("cctl"), t(&CCTLOP), DST, LCMEM]);

    // Surfaces; bit 0x2e set on every known encoding
    const SURF_BIT: u64 = 1 << 0x2e;
    builder = builder
        .row(f(0xd4) | SURF_BIT, OPC4 | SURF_BIT, [
            op("suldb"), t(&LDSTT), t(&LDSTD), t(&LCOP), t(&SCLAMP), SURF, SADDR,
        ])
        .row(f(0xd8) | SURF_BIT | 1 << 0x20, OPC4 | SURF_BIT | 1 << 0x20, [
            op("suredp"), t(&REDOP), t(&SCLAMP), SURF, SADDR, DST,
        ])
        .row(f(0xdc) | SURF_BIT, OPC4 | SURF_BIT | 1 << 0x31, [
            op("sustb"), t(&LDSTT), t(&SCOP), t(&SCLAMP), SURF, SADDR, t(&LDSTD),
        ])
        .row(f(0xdc) | SURF_BIT | 1 << 0x31, OPC4 | SURF_BIT | 1 << 0x31, [
            op("sustp"), t(&SCOP), t(&SCLAMP), SURF, SADDR, DST,
        ]);

    // membar prep precedes every other membar
    for (scope, sub) in [("prep", 0x00), ("gl", 0x20), ("sys", 0x40)] {
        builder = builder.row(f(0xe0) | sub, OPC | 0x60, [op("membar"), md(scope)]);
    }

    builder
        .row(f(0xe8), OPC4, [op("st"), md("unlock"), t(&LDSTT), GLOBAL, t(&LDSTD)])
        .row(f(0xf0) | SURF_BIT | 0x80, OPC4 | SURF_BIT | 0x80, [
            op("suleab"), PDST2, DSTD, t(&LDSTT), t(&SCLAMP), SURF, SADDR,
        ])
        .oops([])
        .build()
});

pub static TEXTURE: Lazy<Table> = Lazy::new(|| {
    let f = |opcode| class_op(opcode, 6);
    const NO_SRC1: u64 = 0x3f0_0000;
    const NO_SRC2: u64 = 0xfc00_0000;
    const EXPORT: u64 = 0xfe7e_0000_03f0_0107;
    const TEX_MASK: u64 = 0xfc00_0000_fc00_0007;
    let tex = |name| [op(name), t(&TEXF), TDST, TEX, SAMP, TSRC];

    Table::builder("texture")
        .row(f(0x00), 0xfe00_0000_0000_0067, [op("pfetch"), DST, VBASRC])
        // SRC2 is the vertex offset
        .row(f(0x06), 0xfe00_0000_0000_0107, [op("vfetch"), VDST, t(&LDVF), ATTR])
        .row(f(0x06) | 0x100, 0xfe00_0000_0000_0107, [op("vfetch"), md("patch"), VDST, t(&LDVF), ATTR])
        // Geometry programs leave SRC3 clear, vertex programs set it to 63
        .row(f(0x0a) | NO_SRC1, EXPORT, [op("export"), VAR, ESRC])
        .row(f(0x0a) | 0x007e_0000_0000_0000 | NO_SRC1, EXPORT, [op("export"), VAR, ESRC])
        .row(f(0x0a) | 0x007e_0000_0000_0000 | NO_SRC1 | 0x100, EXPORT, [
            op("export"), md("patch"), VAR, ESRC,
        ])
        .row(f(0x14), OPC4, [op("ld"), t(&LDSTT), t(&LDSTD), FCONST])
        .row(f(0x1c) | NO_SRC2 | 0x20, 0xfe00_0000_fc00_0067, [op("emit")])
        .row(f(0x1c) | NO_SRC2 | 0x40, 0xfe00_0000_fc00_0067, [op("restart")])
        .row(f(0x80) | NO_SRC2 | 0x80, TEX_MASK | 0x80, tex("texauto"))
        .row(f(0x90) | NO_SRC2 | 0x80, TEX_MASK | 0x80, tex("texfetch"))
        .row(f(0xc0) | NO_SRC2, TEX_MASK, tex("texsize"))
        // Plenty of texture opcodes are still unknown; assume the common layout
        .oops([t(&TEXF), TDST, TEX, SAMP, TSRC])
        .build()
});
