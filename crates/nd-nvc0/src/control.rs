//! Control flow instructions (class 7)
//!
//! Branch targets are either absolute (`abs`, 32 bits at 0x1a) or relative
//! to the next instruction (24-bit signed). Bit 0xe switches the target to
//! a `c[]` operand.

use crate::fields::*;
use crate::flags::{BRAWARP, LIM};
use crate::modifiers::CC_GUARD;
use nd_dis::table::{md, op, t};
use nd_dis::Table;
use once_cell::sync::Lazy;

/// Guard predicate; `$p7` is always true and renders nothing
pub static P: Lazy<Table> = Lazy::new(|| {
    Table::builder("p")
        .row(0x1c00, 0x3c00, [])
        .row(0x3c00, 0x3c00, [md("never")])
        .row(0x0000, 0x2000, [PRED])
        .row(0x2000, 0x2000, [md("not"), PRED])
        .build()
});

/// Relative branch target, or a `c[]` word with the target offset
pub static BTARG_SEL: Lazy<Table> = Lazy::new(|| {
    Table::builder("btarg")
        .row(0, 0x4000, [BTARG])
        .row(0x4000, 0x4000, [md("pcrel"), CONST])
        .build()
});

const CTL: u64 = 0xf800_0000_0000_0007;
const CTL_CONST: u64 = CTL | 0x4000;

const fn ctl(opcode: u64) -> u64 {
    opcode << 56 | 7
}

pub static CONTROL: Lazy<Table> = Lazy::new(|| {
    let (p, cc) = (t(&P), t(&CC_GUARD));
    let (lim, warp) = (t(&LIM), t(&BRAWARP));
    let btarg = t(&BTARG_SEL);

    let mut builder = Table::builder("control")
        .row(ctl(0x00), CTL_CONST, [p, cc, op("bra"), lim, warp, md("abs"), ABTARG])
        .row(ctl(0x00) | 0x4000, CTL_CONST, [p, cc, op("bra"), lim, warp, CONST])
        .row(ctl(0x08), CTL_CONST, [p, cc, op("bra"), lim, SRC1, md("abs"), ANTARG])
        .row(ctl(0x08) | 0x4000, CTL_CONST, [p, cc, op("bra"), lim, SRC1, CONST])
        .row(ctl(0x10), CTL_CONST, [op("call"), lim, md("abs"), ACTARG])
        .row(ctl(0x10) | 0x4000, CTL_CONST, [op("call"), lim, CONST])
        .row(ctl(0x40), CTL, [p, cc, op("bra"), lim, warp, btarg])
        .row(ctl(0x48), CTL_CONST, [p, cc, op("bra"), lim, SRC1, NTARG])
        .row(ctl(0x48) | 0x4000, CTL_CONST, [p, cc, op("bra"), lim, SRC1, md("pcrel"), CONST])
        .row(ctl(0x50), CTL_CONST, [op("call"), lim, CTARG])
        .row(ctl(0x50) | 0x4000, CTL_CONST, [op("call"), lim, md("pcrel"), CONST]);

    // Stack pushes for the matching pops further down
    for (opcode, name) in [
        (0x58, "prelongjmp"),
        (0x60, "joinat"),
        (0x68, "prebrk"),
        (0x70, "precont"),
        (0x78, "preret"),
    ] {
        builder = builder.row(ctl(opcode), CTL, [op(name), btarg]);
    }
    for (opcode, name) in [
        (0x80, "exit"),
        (0x88, "longjmp"),
        (0x90, "ret"),
        (0x98, "discard"),
        (0xa8, "brk"),
        (0xb0, "cont"),
    ] {
        builder = builder.row(ctl(opcode), CTL, [p, cc, op(name)]);
    }

    const TRAP: u64 = 0xc000;
    builder
        .row(ctl(0xc0), CTL, [op("quadon")])
        .row(ctl(0xc8), CTL, [op("quadpop")])
        .row(ctl(0xd0), CTL | TRAP, [op("membar"), md("cta")])
        .row(ctl(0xd0) | TRAP, CTL | TRAP, [op("trap")])
        // Unknown control opcode; most of them take a branch target
        .row(7, 7, [p, nd_dis::table::oops(), BTARG])
        .oops([])
        .build()
});
