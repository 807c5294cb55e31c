//! Table-driven instruction decoder engine
//!
//! An ISA is described as data: [`BitField`]s locate values inside the
//! instruction word, operand descriptors ([`Reg`], [`Mem`], [`VecGroup`])
//! say how to read them, and [`Table`]s of `(value, mask, atoms)` rows say
//! which atoms an encoding renders. [`Decoder`] walks the root table of an
//! [`Isa`] and returns an [`Instruction`] or a [`DecodeError`].

pub mod bitfield;
pub mod decoder;
pub mod insn;
pub mod listing;
pub mod operand;
pub mod resolve;
pub mod syntax;
pub mod table;

pub use bitfield::{BitField, Sign};
pub use decoder::{Decoded, Decoder, Isa};
pub use insn::{Instruction, Token};
pub use listing::{Line, Listing};
pub use nd_core::{DecodeError, FieldError};
pub use operand::{Mem, Operand, Reg, RegValue, Special, SpecialReg, TargetKind, VecGroup};
pub use resolve::{NoSymbols, SymbolResolver};
pub use syntax::Syntax;
pub use table::{Atom, Row, Table, TableBuilder, TableRef};
