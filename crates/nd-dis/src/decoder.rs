//! Instruction dispatcher
//!
//! [`Decoder`] drives the root table of an [`Isa`] over single words, byte
//! buffers and word streams. Decoding is stateless, so long streams can be
//! split across worker threads.

use crate::insn::Instruction;
use crate::resolve::{NoSymbols, SymbolResolver};
use crate::table::{Table, TableRef};
use nd_core::DecodeError;
use once_cell::sync::Lazy;

/// ISA description
#[derive(Debug)]
pub struct Isa {
    pub name: &'static str,
    pub root: TableRef,
    /// Longest instruction, in bytes
    pub max_op_len: usize,
    /// Bits per addressable unit of an opcode
    pub op_unit: usize,
    /// Address increment per unit
    pub pos_unit: usize,
    pub root_tables: usize,
}

impl Isa {
    pub fn root(&self) -> &'static Table {
        Lazy::force(self.root)
    }

    /// Address distance between consecutive words
    pub fn stride(&self) -> u64 {
        (self.max_op_len * self.pos_unit) as u64
    }
}

/// Result of decoding one word of a stream
pub type Decoded = Result<Instruction, DecodeError>;

/// Instruction decoder bound to one ISA
#[derive(Clone, Copy)]
pub struct Decoder<'r> {
    isa: &'static Isa,
    resolver: &'r dyn SymbolResolver,
}

impl Decoder<'static> {
    pub fn new(isa: &'static Isa) -> Self {
        Self {
            isa,
            resolver: &NoSymbols,
        }
    }
}

impl<'r> Decoder<'r> {
    pub fn with_resolver(isa: &'static Isa, resolver: &'r dyn SymbolResolver) -> Self {
        Self { isa, resolver }
    }

    pub fn isa(&self) -> &'static Isa {
        self.isa
    }

    /// Decode one word located at `address`
    pub fn decode(&self, word: u64, address: u64) -> Decoded {
        let tokens = self.isa.root().match_with(word, address, self.resolver)?;
        let insn = Instruction {
            address,
            word,
            tokens,
        };

        if insn.is_unrecognized() {
            return Err(DecodeError::ExplicitUnrecognized {
                word,
                address,
                rendering: insn.to_string(),
            });
        }
        Ok(insn)
    }

    /// Decode consecutive words starting at `base`; addresses wrap at `u64::MAX`
    pub fn decode_words(&self, words: &[u64], base: u64) -> Vec<Decoded> {
        let stride = self.isa.stride();
        words
            .iter()
            .enumerate()
            .map(|(i, &word)| {
                let address = base.wrapping_add((i as u64).wrapping_mul(stride));
                let result = self.decode(word, address);
                if let Err(e) = &result {
                    tracing::warn!("0x{:x}: {}", address, e);
                }
                result
            })
            .collect()
    }

    /// Decode a little-endian byte buffer
    ///
    /// Every complete word is decoded independently; a trailing partial
    /// word yields [`DecodeError::Truncated`].
    pub fn decode_bytes(&self, bytes: &[u8], base: u64) -> Vec<Decoded> {
        let len = self.isa.max_op_len;
        let chunks = bytes.chunks_exact(len);
        let tail = chunks.remainder();

        let words: Vec<u64> = chunks
            .map(|chunk| {
                chunk
                    .iter()
                    .rev()
                    .fold(0u64, |acc, &b| (acc << 8) | b as u64)
            })
            .collect();

        let mut out = self.decode_words(&words, base);
        if !tail.is_empty() {
            let address = base.wrapping_add((words.len() as u64).wrapping_mul(self.isa.stride()));
            tracing::warn!("0x{:x}: {} trailing bytes", address, tail.len());
            out.push(Err(DecodeError::Truncated {
                address,
                len: tail.len(),
            }));
        }
        out
    }

    /// Decode a stream on up to `threads` scoped workers
    ///
    /// The result order always matches `words`.
    pub fn decode_parallel(&self, words: &[u64], base: u64, threads: usize) -> Vec<Decoded> {
        let threads = threads.max(1);
        if threads == 1 || words.len() < 2 * threads {
            return self.decode_words(words, base);
        }

        let chunk = words.len().div_ceil(threads);
        let stride = self.isa.stride();
        tracing::debug!("Decoding {} words on {} threads", words.len(), threads);

        let scoped = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = words
                .chunks(chunk)
                .enumerate()
                .map(|(i, part)| {
                    let start = base.wrapping_add(((i * chunk) as u64).wrapping_mul(stride));
                    s.spawn(move |_| self.decode_words(part, start))
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect::<Vec<_>>()
        });

        scoped.unwrap_or_else(|e| std::panic::resume_unwind(e))
    }
}
