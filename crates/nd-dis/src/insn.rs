//! Decoded instruction record

use crate::operand::{Operand, TargetKind};
use crate::syntax::Syntax;
use std::fmt;

/// One rendered element of an instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Opcode(&'static str),
    Modifier(&'static str),
    Operand(Operand),
    /// Unrecognized-encoding marker, rendered `???`
    Unrecognized,
}

/// Decoded instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub address: u64,
    pub word: u64,
    pub tokens: Vec<Token>,
}

impl Instruction {
    /// First opcode token
    pub fn mnemonic(&self) -> Option<&'static str> {
        self.tokens.iter().find_map(|t| match t {
            Token::Opcode(name) => Some(*name),
            _ => None,
        })
    }

    pub fn modifiers(&self) -> Vec<&'static str> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Modifier(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    /// Operands rendered with the default syntax
    pub fn operands(&self) -> Vec<String> {
        let syntax = Syntax::default();
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operand(op) => Some(syntax.operand(op)),
                _ => None,
            })
            .collect()
    }

    /// Resolved code addresses referenced by this instruction
    pub fn targets(&self) -> Vec<(TargetKind, u64)> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operand(Operand::Target { kind, address, .. }) => Some((*kind, *address)),
                _ => None,
            })
            .collect()
    }

    pub fn is_unrecognized(&self) -> bool {
        self.tokens.contains(&Token::Unrecognized)
    }

    pub fn render(&self, syntax: &Syntax) -> String {
        self.tokens
            .iter()
            .map(|t| syntax.token(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&Syntax::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::RegValue;

    fn sample() -> Instruction {
        Instruction {
            address: 0x10,
            word: 0,
            tokens: vec![
                Token::Modifier("join"),
                Token::Opcode("add"),
                Token::Modifier("b32"),
                Token::Operand(Operand::Reg(RegValue::Numbered {
                    prefix: "r",
                    index: 0,
                    suffix: "",
                })),
                Token::Operand(Operand::Imm {
                    value: 12,
                    hex: false,
                }),
            ],
        }
    }

    #[test]
    fn test_accessors() {
        let insn = sample();
        assert_eq!(insn.mnemonic(), Some("add"));
        assert_eq!(insn.modifiers(), vec!["join", "b32"]);
        assert_eq!(insn.operands(), vec!["$r0", "0xc"]);
        assert!(insn.targets().is_empty());
        assert!(!insn.is_unrecognized());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "join add b32 $r0 0xc");
    }
}
