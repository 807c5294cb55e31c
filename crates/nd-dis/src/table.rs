//! Rule tables and the matcher
//!
//! A [`Table`] is an ordered list of `(value, mask, atoms)` rows. Matching a
//! word walks the rows in order; the first row with `word & mask == value`
//! wins and its atoms render left to right. [`Atom::Table`] recurses into a
//! sub-table with the same word.
//!
//! Tables are built once into `once_cell::sync::Lazy` statics and shared
//! read-only afterwards.

use crate::bitfield::BitField;
use crate::insn::Token;
use crate::operand::{Mem, Operand, Reg, TargetKind, VecGroup};
use crate::resolve::{NoSymbols, SymbolResolver};
use nd_core::DecodeError;
use once_cell::sync::Lazy;
use std::fmt;

/// Reference to a lazily built table
pub type TableRef = &'static Lazy<Table>;

/// Rendering instruction inside a row
#[derive(Clone, Copy)]
pub enum Atom {
    /// Instruction name
    Opcode(&'static str),
    /// Any other fixed literal (type suffix, flag, prefix)
    Modifier(&'static str),
    Reg(&'static Reg),
    Imm(&'static BitField),
    Mem(&'static Mem),
    Vec(&'static VecGroup),
    Target(TargetKind, &'static BitField),
    Table(TableRef),
    /// Unrecognized-encoding marker
    Oops,
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opcode(name) => write!(f, "Opcode({})", name),
            Self::Modifier(name) => write!(f, "Modifier({})", name),
            Self::Reg(reg) => write!(f, "Reg({})", reg.prefix),
            Self::Imm(field) => write!(f, "Imm({:?})", field.pieces()),
            Self::Mem(mem) => write!(f, "Mem({:?})", mem.space),
            Self::Vec(group) => write!(f, "Vec({})", group.prefix),
            Self::Target(kind, _) => write!(f, "Target({:?})", kind),
            Self::Table(table) => write!(f, "Table({})", table.name()),
            Self::Oops => write!(f, "Oops"),
        }
    }
}

pub const fn op(name: &'static str) -> Atom {
    Atom::Opcode(name)
}

pub const fn md(name: &'static str) -> Atom {
    Atom::Modifier(name)
}

pub const fn t(table: TableRef) -> Atom {
    Atom::Table(table)
}

pub const fn oops() -> Atom {
    Atom::Oops
}

/// One `(value, mask, atoms)` rule
#[derive(Debug, Clone)]
pub struct Row {
    pub value: u64,
    pub mask: u64,
    pub atoms: Vec<Atom>,
}

impl Row {
    #[inline]
    pub fn matches(&self, word: u64) -> bool {
        word & self.mask == self.value
    }
}

/// Ordered, immutable rule table
#[derive(Debug, Clone)]
pub struct Table {
    name: &'static str,
    rows: Vec<Row>,
}

/// Rendering state threaded through a recursive match
pub(crate) struct Cursor<'a> {
    pub word: u64,
    pub address: u64,
    pub resolver: &'a dyn SymbolResolver,
    pub tokens: Vec<Token>,
}

impl Cursor<'_> {
    fn render(&mut self, atom: &Atom) -> Result<(), DecodeError> {
        let (word, address) = (self.word, self.address);
        let token = match *atom {
            Atom::Opcode(name) => Token::Opcode(name),
            Atom::Modifier(name) => Token::Modifier(name),
            Atom::Reg(reg) => Token::Operand(Operand::Reg(reg.decode(word, address))),
            Atom::Imm(field) => Token::Operand(Operand::Imm {
                value: field.extract(word, address),
                hex: field.is_wrap(),
            }),
            Atom::Mem(mem) => Token::Operand(Operand::Mem(mem.decode(word, address, self.resolver))),
            Atom::Vec(group) => Token::Operand(Operand::Vec {
                prefix: group.prefix,
                slots: group.decode(word, address),
            }),
            Atom::Target(kind, field) => {
                let target = field.extract(word, address) as u64;
                Token::Operand(Operand::Target {
                    kind,
                    address: target,
                    name: self.resolver.resolve_target(target, kind),
                })
            }
            Atom::Table(table) => return table.render_into(self),
            Atom::Oops => Token::Unrecognized,
        };
        self.tokens.push(token);
        Ok(())
    }
}

impl Table {
    pub fn builder(name: &'static str) -> TableBuilder {
        TableBuilder {
            name,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// First row matching `word`, with its position
    pub fn find(&self, word: u64) -> Option<(usize, &Row)> {
        self.rows.iter().enumerate().find(|(_, row)| row.matches(word))
    }

    /// Match `word` and return the rendered tokens
    pub fn match_word(&self, word: u64, address: u64) -> Result<Vec<Token>, DecodeError> {
        self.match_with(word, address, &NoSymbols)
    }

    pub fn match_with(
        &self,
        word: u64,
        address: u64,
        resolver: &dyn SymbolResolver,
    ) -> Result<Vec<Token>, DecodeError> {
        let mut cursor = Cursor {
            word,
            address,
            resolver,
            tokens: Vec::new(),
        };
        self.render_into(&mut cursor)?;
        Ok(cursor.tokens)
    }

    pub(crate) fn render_into(&self, cursor: &mut Cursor<'_>) -> Result<(), DecodeError> {
        let (index, row) = self.find(cursor.word).ok_or(DecodeError::NoMatchingRule {
            table: self.name,
            word: cursor.word,
        })?;

        tracing::trace!(table = self.name, row = index, "Matched 0x{:016x}", cursor.word);

        for atom in &row.atoms {
            cursor.render(atom)?;
        }
        Ok(())
    }

    /// Rows whose value has bits outside their mask; such rows never match
    pub fn malformed_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.value & !row.mask != 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Pairs `(shadowed, by)` where every word matching row `shadowed` is
    /// already taken by the earlier row `by`
    pub fn shadowed_rows(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (j, later) in self.rows.iter().enumerate() {
            let earlier = self.rows[..j].iter().position(|row| {
                row.mask & !later.mask == 0 && later.value & row.mask == row.value
            });
            if let Some(i) = earlier {
                tracing::debug!(table = self.name, "Row {} is shadowed by row {}", j, i);
                out.push((j, i));
            }
        }
        out
    }

    /// Tables referenced directly by this table's rows
    pub fn subtables(&self) -> Vec<&'static Table> {
        let mut out: Vec<&'static Table> = Vec::new();
        for atom in self.rows.iter().flat_map(|row| &row.atoms) {
            if let Atom::Table(table) = *atom {
                let table = Lazy::force(table);
                if !out.iter().any(|seen| std::ptr::eq(*seen, table)) {
                    out.push(table);
                }
            }
        }
        out
    }

    /// This table and every table reachable from it
    pub fn reachable(&'static self) -> Vec<&'static Table> {
        let mut seen: Vec<&'static Table> = vec![self];
        let mut next = 0;
        while next < seen.len() {
            for sub in seen[next].subtables() {
                if !seen.iter().any(|s| std::ptr::eq(*s, sub)) {
                    seen.push(sub);
                }
            }
            next += 1;
        }
        seen
    }
}

/// Incremental table construction
#[derive(Debug)]
pub struct TableBuilder {
    name: &'static str,
    rows: Vec<Row>,
}

impl TableBuilder {
    pub fn row(mut self, value: u64, mask: u64, atoms: impl IntoIterator<Item = Atom>) -> Self {
        self.rows.push(Row {
            value,
            mask,
            atoms: atoms.into_iter().collect(),
        });
        self
    }

    /// Catch-all that renders `atoms` after the unrecognized marker
    pub fn oops(self, atoms: impl IntoIterator<Item = Atom>) -> Self {
        let atoms: Vec<Atom> = std::iter::once(Atom::Oops).chain(atoms).collect();
        self.row(0, 0, atoms)
    }

    /// Catch-all without the marker
    pub fn default(self, atoms: impl IntoIterator<Item = Atom>) -> Self {
        self.row(0, 0, atoms)
    }

    pub fn build(self) -> Table {
        Table {
            name: self.name,
            rows: self.rows,
        }
    }
}

/// Bit clear renders nothing, bit set renders `atoms`
pub fn flag(name: &'static str, bit: u32, atoms: impl IntoIterator<Item = Atom>) -> Table {
    let mask = 1u64 << bit;
    Table::builder(name)
        .row(0, mask, [])
        .row(mask, mask, atoms)
        .build()
}

/// Bit clear renders `off`, bit set renders `on`
pub fn choice(
    name: &'static str,
    bit: u32,
    off: impl IntoIterator<Item = Atom>,
    on: impl IntoIterator<Item = Atom>,
) -> Table {
    let mask = 1u64 << bit;
    Table::builder(name)
        .row(0, mask, off)
        .row(mask, mask, on)
        .build()
}

/// One row per value of the `width`-bit field at `start`
///
/// `None` entries leave a gap; gaps and values past the end of `entries`
/// fall through to the unrecognized fallback.
pub fn enumerate(
    name: &'static str,
    start: u32,
    width: u32,
    entries: impl IntoIterator<Item = Option<Vec<Atom>>>,
) -> Table {
    let mask = ((1u64 << width) - 1) << start;
    let mut builder = Table::builder(name);
    for (value, entry) in entries.into_iter().enumerate() {
        if let Some(atoms) = entry {
            builder = builder.row((value as u64) << start, mask, atoms);
        }
    }
    builder.oops([]).build()
}
