//! Labelled listings of decoded streams

use crate::decoder::{Decoded, Decoder};
use crate::insn::Token;
use crate::operand::{Operand, TargetKind};
use crate::resolve::SymbolResolver;
use crate::syntax::Syntax;
use nd_core::DecodeError;
use std::collections::BTreeSet;
use std::fmt;

/// One decoded word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: u64,
    pub word: u64,
    pub result: Decoded,
}

/// Decoded stream plus the code labels it references
#[derive(Debug, Clone, Default)]
pub struct Listing {
    lines: Vec<Line>,
    branch_targets: BTreeSet<u64>,
    call_targets: BTreeSet<u64>,
}

impl Listing {
    /// Decode `words` and name every branch and call target
    pub fn build(decoder: &Decoder<'_>, words: &[u64], base: u64, threads: usize) -> Self {
        let stride = decoder.isa().stride();
        let results = decoder.decode_parallel(words, base, threads);

        let mut listing = Self::default();
        for insn in results.iter().flatten() {
            for (kind, address) in insn.targets() {
                match kind {
                    TargetKind::Branch => listing.branch_targets.insert(address),
                    TargetKind::Call => listing.call_targets.insert(address),
                    TargetKind::Number => false,
                };
            }
        }

        listing.lines = words
            .iter()
            .zip(results)
            .enumerate()
            .map(|(i, (&word, result))| Line {
                address: base.wrapping_add((i as u64).wrapping_mul(stride)),
                word,
                result,
            })
            .collect();

        let mut lines = std::mem::take(&mut listing.lines);
        for line in &mut lines {
            if let Ok(insn) = &mut line.result {
                listing.name_targets(&mut insn.tokens);
            }
        }
        listing.lines = lines;
        listing
    }

    fn name_targets(&self, tokens: &mut [Token]) {
        for token in tokens {
            if let Token::Operand(Operand::Target {
                kind,
                address,
                name: name @ None,
            }) = token
            {
                *name = self.resolve_target(*address, *kind);
            }
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn branch_targets(&self) -> &BTreeSet<u64> {
        &self.branch_targets
    }

    pub fn call_targets(&self) -> &BTreeSet<u64> {
        &self.call_targets
    }

    /// Label for `address`; call labels win over branch labels
    pub fn label(&self, address: u64) -> Option<String> {
        if self.call_targets.contains(&address) {
            Some(format!("C{:x}", address))
        } else if self.branch_targets.contains(&address) {
            Some(format!("B{:x}", address))
        } else {
            None
        }
    }

    pub fn render(&self, syntax: &Syntax, show_encoding: bool) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if let Some(label) = self.label(line.address) {
                out.push_str(&label);
                out.push_str(":\n");
            }

            let text = match &line.result {
                Ok(insn) => insn.render(syntax),
                Err(DecodeError::ExplicitUnrecognized { rendering, .. }) => rendering.clone(),
                Err(e) => format!("??? # {}", e),
            };

            if show_encoding {
                out.push_str(&format!("{:08x}: {:016x}  {}\n", line.address, line.word, text));
            } else {
                out.push_str(&format!("{:08x}: {}\n", line.address, text));
            }
        }
        out
    }
}

impl SymbolResolver for Listing {
    fn resolve_target(&self, address: u64, kind: TargetKind) -> Option<String> {
        match kind {
            TargetKind::Number => None,
            _ => self.label(address),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&Syntax::default(), true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitfield::BitField;
    use crate::decoder::Isa;
    use crate::table::{op, Atom, Table};
    use once_cell::sync::Lazy;

    static TARG: BitField = BitField::new(16, 16).signed().plus(8).pc_relative();
    static ABS: BitField = BitField::new(16, 16);

    static ROOT: Lazy<Table> = Lazy::new(|| {
        Table::builder("root")
            .row(0x1, 0xff, [op("bra"), Atom::Target(TargetKind::Branch, &TARG)])
            .row(0x2, 0xff, [op("call"), Atom::Target(TargetKind::Call, &ABS)])
            .row(0x3, 0xff, [op("exit")])
            .build()
    });

    static ISA: Isa = Isa {
        name: "test",
        root: &ROOT,
        max_op_len: 8,
        op_unit: 8,
        pos_unit: 1,
        root_tables: 1,
    };

    #[test]
    fn test_labels() {
        let decoder = Decoder::new(&ISA);
        // bra +8 -> 0x10, call 0x18, exit, exit
        let words = [(0x8 << 16) | 0x1, (0x18 << 16) | 0x2, 0x3, 0x3];
        let listing = Listing::build(&decoder, &words, 0, 1);

        assert!(listing.branch_targets().contains(&0x10));
        assert!(listing.call_targets().contains(&0x18));
        assert_eq!(listing.label(0x10).as_deref(), Some("B10"));
        assert_eq!(listing.label(0x18).as_deref(), Some("C18"));
        assert_eq!(listing.label(0x0), None);

        let text = listing.render(&Syntax::default(), false);
        assert_eq!(
            text,
            "00000000: bra B10\n00000008: call C18\nB10:\n00000010: exit\nC18:\n00000018: exit\n"
        );
    }

    #[test]
    fn test_failed_lines() {
        let decoder = Decoder::new(&ISA);
        let listing = Listing::build(&decoder, &[0x3, 0xff], 0x100, 1);
        assert_eq!(listing.lines().len(), 2);
        assert!(listing.lines()[1].result.is_err());

        let text = listing.to_string();
        assert!(text.starts_with("00000100: 0000000000000003  exit\n"));
        assert!(text.contains("00000108: 00000000000000ff  ??? # No matching rule"));
    }
}
