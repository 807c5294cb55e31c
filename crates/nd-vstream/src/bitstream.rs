//! Bit-level reader and writer sharing one syntax interface
//!
//! Syntax functions take every field by `&mut` and call the same
//! [`Bitstream`] methods whether they parse or produce a stream. A
//! [`BitReader`] overwrites the fields, a [`BitWriter`] reads them and
//! appends their encoding.

use nd_core::VstreamError;

pub type Result<T> = std::result::Result<T, VstreamError>;

/// Longest Exp-Golomb prefix that still yields a 32-bit value
const MAX_LEADING_ZEROS: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

/// Padding used by [`Bitstream::align_byte`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Zero,
    One,
}

impl Fill {
    fn bit(self) -> u32 {
        match self {
            Fill::Zero => 0,
            Fill::One => 1,
        }
    }
}

/// Values that can be inferred instead of coded
pub trait Inferable: Copy + PartialEq {
    fn as_i64(self) -> i64;
}

impl Inferable for u32 {
    fn as_i64(self) -> i64 {
        self as i64
    }
}

impl Inferable for i32 {
    fn as_i64(self) -> i64 {
        self as i64
    }
}

impl Inferable for bool {
    fn as_i64(self) -> i64 {
        self as i64
    }
}

pub trait Bitstream {
    fn direction(&self) -> Direction;

    /// Fixed-width unsigned field, at most 32 bits
    fn u(&mut self, value: &mut u32, bits: u32) -> Result<()>;

    /// Unsigned Exp-Golomb field
    fn ue(&mut self, value: &mut u32) -> Result<()>;

    /// Signed Exp-Golomb field
    fn se(&mut self, value: &mut i32) -> Result<()>;

    /// Skip or emit padding up to the next byte boundary
    fn align_byte(&mut self, fill: Fill) -> Result<()>;

    /// `more_rbsp_data()`: false once only the stop bit and padding remain
    fn has_more_data(&mut self) -> Result<bool>;

    /// One-bit flag
    fn flag(&mut self, value: &mut bool) -> Result<()> {
        let mut bit = *value as u32;
        self.u(&mut bit, 1)?;
        *value = bit != 0;
        Ok(())
    }

    /// Field absent from the stream. Decoding sets it to `default`;
    /// encoding requires it to already hold `default`.
    fn infer<T: Inferable>(&mut self, value: &mut T, default: T) -> Result<()> {
        match self.direction() {
            Direction::Decode => {
                *value = default;
                Ok(())
            }
            Direction::Encode if *value == default => Ok(()),
            Direction::Encode => Err(VstreamError::InferMismatch {
                expected: default.as_i64(),
                actual: value.as_i64(),
            }),
        }
    }

    fn is_decode(&self) -> bool {
        self.direction() == Direction::Decode
    }
}

/// Map a signed Exp-Golomb value to its code number
fn se_to_code(value: i32) -> u64 {
    let v = value as i64;
    if v > 0 {
        (2 * v - 1) as u64
    } else {
        (-2 * v) as u64
    }
}

fn code_to_se(code: u32) -> i32 {
    let k = code as i64;
    let v = if k & 1 == 1 { (k + 1) / 2 } else { -(k / 2) };
    v as i32
}

/// MSB-first reader over an RBSP
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn bits_left(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    fn read_bit(&mut self) -> Result<u32> {
        let byte = *self.data.get(self.pos / 8).ok_or(VstreamError::EndOfStream)?;
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Ok(bit as u32)
    }

    fn read_bits(&mut self, bits: u32) -> Result<u64> {
        let mut out = 0u64;
        for _ in 0..bits {
            out = out << 1 | self.read_bit()? as u64;
        }
        Ok(out)
    }

    fn read_ue(&mut self) -> Result<u32> {
        let mut zeros = 0;
        while self.read_bit()? == 0 {
            zeros += 1;
            if zeros > MAX_LEADING_ZEROS {
                return Err(VstreamError::ExpGolombOverflow);
            }
        }
        let rest = self.read_bits(zeros)?;
        Ok(((1u64 << zeros) - 1 + rest) as u32)
    }
}

impl Bitstream for BitReader<'_> {
    fn direction(&self) -> Direction {
        Direction::Decode
    }

    fn u(&mut self, value: &mut u32, bits: u32) -> Result<()> {
        if bits > 32 {
            return Err(VstreamError::Unsupported("fixed-width field over 32 bits"));
        }
        *value = self.read_bits(bits)? as u32;
        Ok(())
    }

    fn ue(&mut self, value: &mut u32) -> Result<()> {
        *value = self.read_ue()?;
        Ok(())
    }

    fn se(&mut self, value: &mut i32) -> Result<()> {
        *value = code_to_se(self.read_ue()?);
        Ok(())
    }

    fn align_byte(&mut self, fill: Fill) -> Result<()> {
        while self.pos % 8 != 0 {
            let bit = self.read_bit()?;
            if bit != fill.bit() {
                return Err(VstreamError::InferMismatch {
                    expected: fill.bit() as i64,
                    actual: bit as i64,
                });
            }
        }
        Ok(())
    }

    fn has_more_data(&mut self) -> Result<bool> {
        // Position of the last set bit is the RBSP stop bit
        let stop = self
            .data
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i * 8 + 7 - self.data[i].trailing_zeros() as usize);
        Ok(matches!(stop, Some(stop) if self.pos < stop))
    }
}

/// MSB-first writer producing an RBSP
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    pos: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    fn write_bit(&mut self, bit: u32) {
        if self.pos % 8 == 0 {
            self.data.push(0);
        }
        if bit != 0 {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.pos % 8);
        }
        self.pos += 1;
    }

    fn write_bits(&mut self, value: u64, bits: u32) {
        for i in (0..bits).rev() {
            self.write_bit((value >> i) as u32 & 1);
        }
    }

    fn write_ue(&mut self, code: u64) -> Result<()> {
        let coded = code + 1;
        let len = 64 - coded.leading_zeros();
        if len - 1 > MAX_LEADING_ZEROS {
            return Err(VstreamError::ExpGolombOverflow);
        }
        self.write_bits(0, len - 1);
        self.write_bits(coded, len);
        Ok(())
    }

    /// Append the stop bit and zero padding and return the bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.write_bit(1);
        while self.pos % 8 != 0 {
            self.write_bit(0);
        }
        self.data
    }
}

impl Bitstream for BitWriter {
    fn direction(&self) -> Direction {
        Direction::Encode
    }

    fn u(&mut self, value: &mut u32, bits: u32) -> Result<()> {
        if bits > 32 {
            return Err(VstreamError::Unsupported("fixed-width field over 32 bits"));
        }
        if bits < 32 && *value >> bits != 0 {
            return Err(VstreamError::ValueTooWide {
                value: *value as u64,
                bits,
            });
        }
        self.write_bits(*value as u64, bits);
        Ok(())
    }

    fn ue(&mut self, value: &mut u32) -> Result<()> {
        self.write_ue(*value as u64)
    }

    fn se(&mut self, value: &mut i32) -> Result<()> {
        self.write_ue(se_to_code(*value))
    }

    fn align_byte(&mut self, fill: Fill) -> Result<()> {
        while self.pos % 8 != 0 {
            self.write_bit(fill.bit());
        }
        Ok(())
    }

    fn has_more_data(&mut self) -> Result<bool> {
        Err(VstreamError::Unsupported("has_more_data while encoding"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ue_known_codes() {
        // 1, 010, 011, 00100, 00111
        let data = [0b1010_0110, 0b0100_0011, 0b1000_0000];
        let mut r = BitReader::new(&data);
        let mut v = 0;
        for expected in [0, 1, 2, 3, 6] {
            r.ue(&mut v).unwrap();
            assert_eq!(v, expected);
        }
        assert_eq!(r.position(), 17);
    }

    #[test]
    fn test_se_mapping() {
        // codes 1..=4 map to 1, -1, 2, -2
        assert_eq!([1, 2, 3, 4].map(code_to_se), [1, -1, 2, -2]);
        assert_eq!(se_to_code(-2), 4);
        assert_eq!(se_to_code(0), 0);
        assert_eq!(se_to_code(i32::MIN), 1 << 32);
    }

    #[test]
    fn test_writer_layout() {
        let mut w = BitWriter::new();
        w.u(&mut 5, 3).unwrap();
        w.ue(&mut 3).unwrap();
        w.se(&mut -1).unwrap();
        // 101 00100 011 + stop bit
        assert_eq!(w.finish(), vec![0b1010_0100, 0b0111_0000]);
    }

    #[test]
    fn test_value_too_wide() {
        let mut w = BitWriter::new();
        assert_eq!(
            w.u(&mut 4, 2),
            Err(VstreamError::ValueTooWide { value: 4, bits: 2 })
        );
        assert!(w.u(&mut u32::MAX, 32).is_ok());
    }

    #[test]
    fn test_exp_golomb_limits() {
        let mut w = BitWriter::new();
        assert!(w.ue(&mut 0xffff_fffe).is_ok());
        assert_eq!(w.ue(&mut u32::MAX), Err(VstreamError::ExpGolombOverflow));
        assert_eq!(w.se(&mut i32::MIN), Err(VstreamError::ExpGolombOverflow));

        let zeros = [0u8; 8];
        let mut r = BitReader::new(&zeros);
        assert_eq!(r.ue(&mut 0), Err(VstreamError::ExpGolombOverflow));
    }

    #[test]
    fn test_end_of_stream() {
        let mut r = BitReader::new(&[0xff]);
        let mut v = 0;
        r.u(&mut v, 6).unwrap();
        assert_eq!(r.u(&mut v, 3), Err(VstreamError::EndOfStream));
    }

    #[test]
    fn test_infer() {
        let mut r = BitReader::new(&[]);
        let mut v = 7u32;
        r.infer(&mut v, 1).unwrap();
        assert_eq!(v, 1);

        let mut w = BitWriter::new();
        assert!(w.infer(&mut 1u32, 1).is_ok());
        assert_eq!(
            w.infer(&mut 3u32, 1),
            Err(VstreamError::InferMismatch {
                expected: 1,
                actual: 3
            })
        );
        assert_eq!(w.position(), 0);
    }

    #[test]
    fn test_align_byte() {
        let mut w = BitWriter::new();
        w.u(&mut 1, 1).unwrap();
        w.align_byte(Fill::One).unwrap();
        w.u(&mut 0, 1).unwrap();
        let bytes = w.finish();
        assert_eq!(bytes, vec![0xff, 0x40]);

        let mut r = BitReader::new(&bytes);
        r.u(&mut 0, 1).unwrap();
        r.align_byte(Fill::One).unwrap();
        assert_eq!(r.position(), 8);

        let mut r = BitReader::new(&bytes);
        r.u(&mut 0, 1).unwrap();
        assert!(r.align_byte(Fill::Zero).is_err());
    }

    #[test]
    fn test_has_more_data() {
        // One 3-bit field, stop bit, padding
        let data = [0b1011_0000];
        let mut r = BitReader::new(&data);
        assert!(r.has_more_data().unwrap());
        r.u(&mut 0, 3).unwrap();
        assert!(!r.has_more_data().unwrap());

        // Trailing zero bytes after the stop bit
        let data = [0b0110_0000, 0, 0];
        let mut r = BitReader::new(&data);
        r.u(&mut 0, 2).unwrap();
        assert!(!r.has_more_data().unwrap());

        assert!(!BitReader::new(&[0, 0]).has_more_data().unwrap());
    }
}
