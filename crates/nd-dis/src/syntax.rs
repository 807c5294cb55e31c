//! Text rendering of decoded tokens

use crate::insn::Token;
use crate::operand::{MemValue, Operand, RegValue};
use nd_core::config::SyntaxConfig;
use std::fmt::Write;

/// Operand spelling rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub sigil: String,
    /// Immediates with a magnitude below this print in decimal
    pub hex_threshold: u64,
    pub uppercase_hex: bool,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            sigil: "$".to_string(),
            hex_threshold: 10,
            uppercase_hex: false,
        }
    }
}

impl From<&SyntaxConfig> for Syntax {
    fn from(config: &SyntaxConfig) -> Self {
        Self {
            sigil: config.register_sigil.clone(),
            hex_threshold: config.hex_threshold,
            uppercase_hex: config.uppercase_hex,
        }
    }
}

impl Syntax {
    pub fn hex(&self, value: u64) -> String {
        if self.uppercase_hex {
            format!("0x{:X}", value)
        } else {
            format!("0x{:x}", value)
        }
    }

    /// Hex with a leading `-` for negative values
    pub fn signed_hex(&self, value: i64) -> String {
        if value < 0 {
            format!("-{}", self.hex(value.unsigned_abs()))
        } else {
            self.hex(value as u64)
        }
    }

    pub fn imm(&self, value: i64, force_hex: bool) -> String {
        if !force_hex && value.unsigned_abs() < self.hex_threshold {
            value.to_string()
        } else {
            self.signed_hex(value)
        }
    }

    pub fn reg(&self, reg: &RegValue) -> String {
        match reg {
            RegValue::Numbered {
                prefix,
                index,
                suffix,
            } => format!("{}{}{}{}", self.sigil, prefix, index, suffix),
            RegValue::Named(name) => format!("{}{}", self.sigil, name),
            RegValue::Zero => "0".to_string(),
            RegValue::One => "1".to_string(),
            RegValue::UnknownSpecial { prefix, index } => {
                format!("{}{}{}", self.sigil, prefix, index)
            }
            RegValue::Fixed(prefix) => format!("{}{}", self.sigil, prefix),
        }
    }

    pub fn mem(&self, mem: &MemValue) -> String {
        let mut out = String::new();
        if let Some(space) = mem.space {
            out.push_str(space);
        }
        if let Some(bank) = mem.bank {
            let _ = write!(out, "{}", bank);
        }
        out.push('[');

        let mut inner = String::new();
        for reg in [&mem.base, &mem.index].into_iter().flatten() {
            if *reg == RegValue::Zero {
                continue;
            }
            if !inner.is_empty() {
                inner.push('+');
            }
            inner.push_str(&self.reg(reg));
        }

        match &mem.symbol {
            Some(name) => {
                if !inner.is_empty() {
                    inner.push('+');
                }
                inner.push_str(name);
            }
            None if inner.is_empty() => inner.push_str(&self.signed_hex(mem.disp)),
            None if mem.disp < 0 => inner.push_str(&self.signed_hex(mem.disp)),
            None if mem.disp > 0 => {
                inner.push('+');
                inner.push_str(&self.hex(mem.disp as u64));
            }
            None => {}
        }

        out.push_str(&inner);
        out.push(']');
        out
    }

    pub fn vec(&self, prefix: &str, slots: &[Option<u64>]) -> String {
        let mut out = String::from("{");
        for slot in slots {
            match slot {
                Some(index) => {
                    let _ = write!(out, " {}{}{}", self.sigil, prefix, index);
                }
                None => out.push_str(" #"),
            }
        }
        out.push_str(" }");
        out
    }

    pub fn operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Reg(reg) => self.reg(reg),
            Operand::Imm { value, hex } => self.imm(*value, *hex),
            Operand::Mem(mem) => self.mem(mem),
            Operand::Vec { prefix, slots } => self.vec(prefix, slots),
            Operand::Target { address, name, .. } => match name {
                Some(name) => name.clone(),
                None => self.hex(*address),
            },
        }
    }

    pub fn token(&self, token: &Token) -> String {
        match token {
            Token::Opcode(text) | Token::Modifier(text) => text.to_string(),
            Token::Operand(operand) => self.operand(operand),
            Token::Unrecognized => "???".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(index: u64) -> RegValue {
        RegValue::Numbered {
            prefix: "r",
            index,
            suffix: "",
        }
    }

    #[test]
    fn test_immediate_radix() {
        let syntax = Syntax::default();
        assert_eq!(syntax.imm(9, false), "9");
        assert_eq!(syntax.imm(-9, false), "-9");
        assert_eq!(syntax.imm(10, false), "0xa");
        assert_eq!(syntax.imm(-16, false), "-0x10");
        assert_eq!(syntax.imm(3, true), "0x3");
    }

    #[test]
    fn test_uppercase_hex() {
        let syntax = Syntax {
            uppercase_hex: true,
            ..Syntax::default()
        };
        assert_eq!(syntax.imm(0xbeef, false), "0xBEEF");
    }

    #[test]
    fn test_register_spelling() {
        let syntax = Syntax::default();
        assert_eq!(syntax.reg(&r(5)), "$r5");
        assert_eq!(
            syntax.reg(&RegValue::Numbered {
                prefix: "r",
                index: 4,
                suffix: "d"
            }),
            "$r4d"
        );
        assert_eq!(syntax.reg(&RegValue::Zero), "0");
        assert_eq!(syntax.reg(&RegValue::One), "1");
        assert_eq!(syntax.reg(&RegValue::Named("tidx")), "$tidx");
        assert_eq!(
            syntax.reg(&RegValue::UnknownSpecial {
                prefix: "sr",
                index: 1
            }),
            "$sr1"
        );
        assert_eq!(syntax.reg(&RegValue::Fixed("c")), "$c");

        let percent = Syntax {
            sigil: "%".to_string(),
            ..Syntax::default()
        };
        assert_eq!(percent.reg(&r(1)), "%r1");
    }

    #[test]
    fn test_memory_spelling() {
        let syntax = Syntax::default();
        let mut mem = MemValue {
            space: Some("g"),
            bank: None,
            base: Some(r(2)),
            index: None,
            disp: 0x10,
            symbol: None,
        };
        assert_eq!(syntax.mem(&mem), "g[$r2+0x10]");

        mem.disp = -4;
        assert_eq!(syntax.mem(&mem), "g[$r2-0x4]");

        mem.disp = 0;
        assert_eq!(syntax.mem(&mem), "g[$r2]");

        mem.base = Some(RegValue::Zero);
        assert_eq!(syntax.mem(&mem), "g[0x0]");

        mem.disp = 0x20;
        assert_eq!(syntax.mem(&mem), "g[0x20]");

        let cmem = MemValue {
            space: Some("c"),
            bank: Some(1),
            base: None,
            index: None,
            disp: 0x20,
            symbol: None,
        };
        assert_eq!(syntax.mem(&cmem), "c1[0x20]");

        let named = MemValue {
            symbol: Some("viewport".to_string()),
            ..cmem
        };
        assert_eq!(syntax.mem(&named), "c1[viewport]");
    }

    #[test]
    fn test_memory_with_index() {
        let syntax = Syntax::default();
        let mem = MemValue {
            space: Some("a"),
            bank: None,
            base: Some(r(1)),
            index: Some(r(3)),
            disp: 0x8,
            symbol: None,
        };
        assert_eq!(syntax.mem(&mem), "a[$r1+$r3+0x8]");
    }

    #[test]
    fn test_vector_spelling() {
        let syntax = Syntax::default();
        assert_eq!(
            syntax.vec("r", &[Some(4), Some(5), None, Some(6)]),
            "{ $r4 $r5 # $r6 }"
        );
    }
}
