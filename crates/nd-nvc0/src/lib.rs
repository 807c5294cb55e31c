//! NVC0 (Fermi) shader ISA
//!
//! Every instruction is one 64-bit little-endian word. The low three bits
//! pick the class; class 7 is control flow and is dispatched straight from
//! the root, everything else goes through the guard predicate and
//! [`ops::OPS`].

pub mod control;
pub mod fields;
pub mod flags;
pub mod memory;
pub mod modifiers;
pub mod ops;
pub mod sources;

use nd_dis::table::{md, oops, t};
use nd_dis::{Decoder, Isa, Table};
use once_cell::sync::Lazy;

pub static ROOT: Lazy<Table> = Lazy::new(|| {
    tracing::debug!("Building NVC0 instruction tables");
    Table::builder("root")
        .row(7, 7, [t(&control::CONTROL)])
        .row(0, 0x10, [t(&control::P), t(&ops::OPS)])
        .row(0x10, 0x10, [md("join"), t(&control::P), t(&ops::OPS)])
        .row(0, 0, [oops()])
        .build()
});

pub static NVC0: Isa = Isa {
    name: "nvc0",
    root: &ROOT,
    max_op_len: 8,
    op_unit: 8,
    pos_unit: 1,
    root_tables: 1,
};

/// Decoder over [`NVC0`] without symbol resolution
pub fn decoder() -> Decoder<'static> {
    Decoder::new(&NVC0)
}
