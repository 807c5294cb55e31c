//! Bitfield extraction and insertion
//!
//! A [`BitField`] describes where an integer lives inside a 64-bit
//! instruction word. The value may be split over several pieces; pieces are
//! concatenated MSB-first in the order they are listed, so the first piece
//! carries the sign bit of a signed field.
//!
//! After concatenation the raw value is sign-extended (for signed fields),
//! shifted left by `shift`, offset by `addend` and, for PC-relative fields,
//! offset by the address of the instruction.

use nd_core::FieldError;

/// Maximum number of pieces in one field
pub const MAX_PIECES: usize = 4;

/// Signedness of the concatenated raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Unsigned,
    Signed,
}

/// One contiguous run of bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Position of the least significant bit (bit 0 = LSB of the word)
    pub start: u8,
    pub width: u8,
}

/// Field descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pieces: [Piece; MAX_PIECES],
    len: u8,
    sign: Sign,
    shift: u8,
    addend: i64,
    wrap: bool,
    pcrel: bool,
}

impl BitField {
    /// Unsigned single-piece field
    pub const fn new(start: u8, width: u8) -> Self {
        Self::split(&[(start, width)])
    }

    /// Field made of several pieces, most significant first
    pub const fn split(pieces: &[(u8, u8)]) -> Self {
        assert!(pieces.len() <= MAX_PIECES, "too many bitfield pieces");

        let mut out = [Piece { start: 0, width: 0 }; MAX_PIECES];
        let mut total = 0u32;
        let mut i = 0;
        while i < pieces.len() {
            assert!(pieces[i].0 < 64, "piece starts past bit 63");
            assert!(
                pieces[i].0 as u32 + pieces[i].1 as u32 <= 64,
                "piece runs past bit 63"
            );
            out[i] = Piece {
                start: pieces[i].0,
                width: pieces[i].1,
            };
            total += pieces[i].1 as u32;
            i += 1;
        }
        assert!(total <= 64, "bitfield wider than 64 bits");

        Self {
            pieces: out,
            len: pieces.len() as u8,
            sign: Sign::Unsigned,
            shift: 0,
            addend: 0,
            wrap: false,
            pcrel: false,
        }
    }

    /// Field with no bits whose value is always `value`
    pub const fn constant(value: i64) -> Self {
        Self::split(&[]).plus(value)
    }

    pub const fn signed(mut self) -> Self {
        self.sign = Sign::Signed;
        self
    }

    pub const fn shifted(mut self, shift: u8) -> Self {
        self.shift = shift;
        self
    }

    pub const fn plus(mut self, addend: i64) -> Self {
        self.addend = addend;
        self
    }

    /// Keep only the low bits on insert; no range checks
    pub const fn wrapping(mut self) -> Self {
        self.wrap = true;
        self
    }

    /// Add the instruction address on extract
    pub const fn pc_relative(mut self) -> Self {
        self.pcrel = true;
        self
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces[..self.len as usize]
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn shift(&self) -> u32 {
        self.shift as u32
    }

    pub fn addend(&self) -> i64 {
        self.addend
    }

    pub fn is_wrap(&self) -> bool {
        self.wrap
    }

    pub fn is_pcrel(&self) -> bool {
        self.pcrel
    }

    /// Total width of all pieces
    pub fn width(&self) -> u32 {
        self.pieces().iter().map(|p| p.width as u32).sum()
    }

    /// Bits of the word covered by this field
    pub fn mask(&self) -> u64 {
        self.pieces()
            .iter()
            .fold(0, |acc, p| acc | (low_mask(p.width as u32) << p.start))
    }

    /// Representable raw range, before shift and addend
    pub fn range(&self) -> (i64, i64) {
        match (self.sign, self.width()) {
            (_, 0) => (0, 0),
            (Sign::Signed, n) if n >= 64 => (i64::MIN, i64::MAX),
            (Sign::Signed, n) => (-(1i64 << (n - 1)), (1i64 << (n - 1)) - 1),
            (Sign::Unsigned, n) if n >= 63 => (0, i64::MAX),
            (Sign::Unsigned, n) => (0, (1i64 << n) - 1),
        }
    }

    /// Concatenated raw bits, before any sign handling
    pub fn raw(&self, word: u64) -> u64 {
        self.pieces().iter().fold(0, |acc, p| {
            let bits = (word >> p.start) & low_mask(p.width as u32);
            shl(acc, p.width as u32) | bits
        })
    }

    /// Decode the field from `word` located at `address`
    pub fn extract(&self, word: u64, address: u64) -> i64 {
        let raw = self.raw(word);
        let value = match self.sign {
            Sign::Signed => sign_extend(raw, self.width()),
            Sign::Unsigned => raw as i64,
        };

        let mut value = (value << self.shift).wrapping_add(self.addend);
        if self.pcrel {
            value = value.wrapping_add(address as i64);
        }
        value
    }

    /// Encode `value` into `word`, leaving bits outside the field untouched
    pub fn insert(&self, word: u64, value: i64, address: u64) -> Result<u64, FieldError> {
        let mut v = value;
        if self.pcrel {
            v = v.wrapping_sub(address as i64);
        }
        v = v.wrapping_sub(self.addend);

        let shift = self.shift();
        if shift > 0 {
            let low = v & (low_mask(shift) as i64);
            if low != 0 && !self.wrap {
                return Err(FieldError::Misaligned { value, shift });
            }
            v = match self.sign {
                Sign::Signed => v >> shift,
                Sign::Unsigned => ((v as u64) >> shift) as i64,
            };
        }

        let width = self.width();
        if !self.wrap {
            let (min, max) = self.range();
            let unbounded = self.sign == Sign::Unsigned && width >= 64;
            if !unbounded && (v < min || v > max) {
                return Err(FieldError::FieldOverflow {
                    value,
                    width,
                    signed: self.sign == Sign::Signed,
                });
            }
        }

        // Last piece holds the least significant bits.
        let mut raw = (v as u64) & low_mask(width);
        let mut word = word;
        for p in self.pieces().iter().rev() {
            let mask = low_mask(p.width as u32);
            word = (word & !(mask << p.start)) | ((raw & mask) << p.start);
            raw = shr(raw, p.width as u32);
        }
        Ok(word)
    }
}

fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn shl(value: u64, amount: u32) -> u64 {
    if amount >= 64 {
        0
    } else {
        value << amount
    }
}

fn shr(value: u64, amount: u32) -> u64 {
    if amount >= 64 {
        0
    } else {
        value >> amount
    }
}

fn sign_extend(raw: u64, width: u32) -> i64 {
    match width {
        0 => 0,
        w if w >= 64 => raw as i64,
        w => {
            let shift = 64 - w;
            ((raw << shift) as i64) >> shift
        }
    }
}
