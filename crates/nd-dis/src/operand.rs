//! Operand descriptors and their decoded values
//!
//! Descriptors ([`Reg`], [`Mem`], [`VecGroup`]) are `const` data living next
//! to the ISA tables. Decoding a descriptor against a word produces one of
//! the value types ([`RegValue`], [`MemValue`], [`Operand`]); turning a value
//! into text is the job of [`crate::syntax::Syntax`].

use crate::bitfield::BitField;
use crate::resolve::SymbolResolver;

/// Alternate spelling for one register index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    /// Renders as `$name`
    Named(&'static str),
    /// Hardwired zero register, renders as `0`
    Zero,
    /// Hardwired true predicate, renders as `1`
    One,
}

/// Entry of a register's specials table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialReg {
    pub index: u64,
    pub special: Special,
}

impl SpecialReg {
    pub const fn named(index: u64, name: &'static str) -> Self {
        Self {
            index,
            special: Special::Named(name),
        }
    }

    pub const fn zero(index: u64) -> Self {
        Self {
            index,
            special: Special::Zero,
        }
    }

    pub const fn one(index: u64) -> Self {
        Self {
            index,
            special: Special::One,
        }
    }
}

/// Register operand descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg {
    /// Index field; `None` for fixed registers such as `$c`
    pub field: Option<&'static BitField>,
    pub prefix: &'static str,
    /// Size suffix (`d` for pairs, `q` for quads)
    pub suffix: &'static str,
    pub specials: &'static [SpecialReg],
    /// The index is only a key into `specials`
    pub always_special: bool,
}

impl Reg {
    pub const fn new(field: &'static BitField, prefix: &'static str) -> Self {
        Self {
            field: Some(field),
            prefix,
            suffix: "",
            specials: &[],
            always_special: false,
        }
    }

    /// Register without an index field
    pub const fn fixed(prefix: &'static str) -> Self {
        Self {
            field: None,
            prefix,
            suffix: "",
            specials: &[],
            always_special: false,
        }
    }

    pub const fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    pub const fn specials(mut self, specials: &'static [SpecialReg]) -> Self {
        self.specials = specials;
        self
    }

    pub const fn always_special(mut self) -> Self {
        self.always_special = true;
        self
    }

    /// Decode the register selected by `word`
    pub fn decode(&self, word: u64, address: u64) -> RegValue {
        let Some(field) = self.field else {
            return RegValue::Fixed(self.prefix);
        };

        let index = field.extract(word, address) as u64;
        if let Some(entry) = self.specials.iter().find(|s| s.index == index) {
            return match entry.special {
                Special::Named(name) => RegValue::Named(name),
                Special::Zero => RegValue::Zero,
                Special::One => RegValue::One,
            };
        }

        if self.always_special {
            tracing::debug!(
                "Unknown special register {}{} in 0x{:016x}",
                self.prefix,
                index,
                word
            );
            return RegValue::UnknownSpecial {
                prefix: self.prefix,
                index,
            };
        }

        RegValue::Numbered {
            prefix: self.prefix,
            index,
            suffix: self.suffix,
        }
    }
}

/// Memory operand descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mem {
    /// Address-space tag; `None` renders a bare `[...]`
    pub space: Option<&'static str>,
    /// Constant bank selector
    pub bank: Option<&'static BitField>,
    pub base: Option<&'static Reg>,
    pub disp: &'static BitField,
    pub index: Option<&'static Reg>,
}

impl Mem {
    pub const fn new(space: &'static str, disp: &'static BitField) -> Self {
        Self {
            space: Some(space),
            bank: None,
            base: None,
            disp,
            index: None,
        }
    }

    /// Memory operand without a space tag
    pub const fn bare(disp: &'static BitField) -> Self {
        Self {
            space: None,
            bank: None,
            base: None,
            disp,
            index: None,
        }
    }

    pub const fn bank(mut self, bank: &'static BitField) -> Self {
        self.bank = Some(bank);
        self
    }

    pub const fn base(mut self, base: &'static Reg) -> Self {
        self.base = Some(base);
        self
    }

    pub const fn index(mut self, index: &'static Reg) -> Self {
        self.index = Some(index);
        self
    }

    pub fn decode(&self, word: u64, address: u64, resolver: &dyn SymbolResolver) -> MemValue {
        let bank = self.bank.map(|f| f.extract(word, address) as u64);
        let disp = self.disp.extract(word, address);
        let symbol = bank.and_then(|b| resolver.resolve_const(b, disp));

        MemValue {
            space: self.space,
            bank,
            base: self.base.map(|r| r.decode(word, address)),
            index: self.index.map(|r| r.decode(word, address)),
            disp,
            symbol,
        }
    }
}

/// Vector register group descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VecGroup {
    pub prefix: &'static str,
    pub base: &'static BitField,
    pub count: &'static BitField,
    /// Slot validity bits; every slot is present when `None`
    pub mask: Option<&'static BitField>,
}

impl VecGroup {
    pub const fn new(prefix: &'static str, base: &'static BitField, count: &'static BitField) -> Self {
        Self {
            prefix,
            base,
            count,
            mask: None,
        }
    }

    pub const fn masked(mut self, mask: &'static BitField) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Slots of the group: `Some(index)` for present registers, `None` for holes
    pub fn decode(&self, word: u64, address: u64) -> Vec<Option<u64>> {
        let base = self.base.extract(word, address) as u64;
        let count = self.count.extract(word, address).clamp(0, 64) as u32;
        let mask = self.mask.map(|m| m.extract(word, address) as u64);

        let mut next = base;
        (0..count)
            .map(|slot| {
                let present = mask.map_or(true, |m| (m >> slot) & 1 != 0);
                present.then(|| {
                    let reg = next;
                    next += 1;
                    reg
                })
            })
            .collect()
    }
}

/// How a code address is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    /// Jump destination, labelled `B…` in listings
    Branch,
    /// Subroutine entry, labelled `C…` in listings
    Call,
    /// Code address used as a plain number
    Number,
}

/// Decoded register
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegValue {
    Numbered {
        prefix: &'static str,
        index: u64,
        suffix: &'static str,
    },
    Named(&'static str),
    Zero,
    One,
    /// Index with no entry in an always-special table
    UnknownSpecial { prefix: &'static str, index: u64 },
    Fixed(&'static str),
}

/// Decoded memory reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemValue {
    pub space: Option<&'static str>,
    pub bank: Option<u64>,
    pub base: Option<RegValue>,
    pub index: Option<RegValue>,
    pub disp: i64,
    /// Name supplied by a [`SymbolResolver`] for constant-space operands
    pub symbol: Option<String>,
}

/// Structured operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(RegValue),
    Imm { value: i64, hex: bool },
    Mem(MemValue),
    Vec {
        prefix: &'static str,
        slots: Vec<Option<u64>>,
    },
    Target {
        kind: TargetKind,
        address: u64,
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::NoSymbols;

    const SRC: BitField = BitField::new(0x14, 6);
    const REG_SR: &[SpecialReg] = &[SpecialReg::zero(63)];
    const R: Reg = Reg::new(&SRC, "r").specials(REG_SR);
    const RD: Reg = Reg::new(&SRC, "r").suffix("d");

    const SREG_BF: BitField = BitField::new(0x1a, 7);
    const SREG_SR: &[SpecialReg] = &[SpecialReg::named(0x21, "tidx")];
    const SREG: Reg = Reg::new(&SREG_BF, "sr").specials(SREG_SR).always_special();

    #[test]
    fn test_register_specials() {
        assert_eq!(
            R.decode(5 << 0x14, 0),
            RegValue::Numbered {
                prefix: "r",
                index: 5,
                suffix: ""
            }
        );
        assert_eq!(R.decode(63 << 0x14, 0), RegValue::Zero);
        // No specials attached to the pair form
        assert!(matches!(RD.decode(63 << 0x14, 0), RegValue::Numbered { index: 63, .. }));
    }

    #[test]
    fn test_always_special() {
        assert_eq!(SREG.decode(0x21 << 0x1a, 0), RegValue::Named("tidx"));
        assert_eq!(
            SREG.decode(0x01 << 0x1a, 0),
            RegValue::UnknownSpecial {
                prefix: "sr",
                index: 1
            }
        );
    }

    #[test]
    fn test_fixed_register() {
        assert_eq!(Reg::fixed("c").decode(u64::MAX, 0), RegValue::Fixed("c"));
    }

    #[test]
    fn test_vector_mask() {
        const DST: BitField = BitField::new(0xe, 6);
        const FOUR: BitField = BitField::constant(4);
        const MASK: BitField = BitField::new(0x2e, 4);
        let group = VecGroup::new("r", &DST, &FOUR).masked(&MASK);

        let word = (4 << 0xe) | (0b1011 << 0x2e);
        assert_eq!(group.decode(word, 0), vec![Some(4), Some(5), None, Some(6)]);
    }

    #[test]
    fn test_memory_decode() {
        const DISP: BitField = BitField::new(0x1a, 16).signed();
        let mem = Mem::new("g", &DISP).base(&R);
        let value = mem.decode((2 << 0x14) | (0xfffc << 0x1a), 0, &NoSymbols);
        assert_eq!(value.disp, -4);
        assert_eq!(value.bank, None);
        assert!(matches!(value.base, Some(RegValue::Numbered { index: 2, .. })));
    }
}
