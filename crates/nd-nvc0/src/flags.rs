//! One-bit flag and two-way choice tables

use crate::fields::*;
use crate::modifiers::FCRMI;
use nd_dis::table::{choice, flag, md, t};
use nd_dis::Table;
use once_cell::sync::Lazy;

macro_rules! flags {
    ($($name:ident = $bit:expr => [$($atom:expr),*];)*) => {
        $(
            pub static $name: Lazy<Table> =
                Lazy::new(|| flag(stringify!($name), $bit, [$($atom),*]));
        )*
    };
}

macro_rules! choices {
    ($($name:ident = $bit:expr => [$($off:expr),*] | [$($on:expr),*];)*) => {
        $(
            pub static $name: Lazy<Table> =
                Lazy::new(|| choice(stringify!($name), $bit, [$($off),*], [$($on),*]));
        )*
    };
}

flags! {
    SAT5 = 5 => [md("sat")];
    SAT9 = 9 => [md("sat")];
    SAT31 = 0x31 => [md("sat")];
    SAT38 = 0x38 => [md("sat")];
    FTZ5 = 5 => [md("ftz")];
    FTZ6 = 6 => [md("ftz")];
    FTZ3B = 0x3b => [md("ftz")];
    FTZ37 = 0x37 => [md("ftz")];
    FMZ7 = 7 => [md("fmz")];
    NEG39 = 0x39 => [md("neg")];
    NEG9 = 9 => [md("neg")];
    NEG8 = 8 => [md("neg")];
    ABS7 = 7 => [md("abs")];
    ABS6 = 6 => [md("abs")];
    RINT = 7 => [t(&FCRMI)];
    REV = 8 => [md("rev")];
    NOT9 = 9 => [md("not")];
    NOT8 = 8 => [md("not")];
    SHIFTAMT = 6 => [md("shiftamt")];
    HIGH5 = 5 => [md("high")];
    HIGH6 = 6 => [md("high")];
    DTEX = 0x2d => [md("deriv")];
    BRAWARP = 0xf => [md("allwarp")];
    LIM = 0x10 => [md("lim")];
}

// Condition code write-back (out) and carry-in (in)
flags! {
    ACOUT30 = 0x30 => [CC];
    ACOUT3A = 0x3a => [CC];
    ACIN5 = 5 => [CC];
    ACIN6 = 6 => [CC];
    ACIN7 = 7 => [CC];
    ACIN37 = 0x37 => [CC];
}

// Predicate inversion
flags! {
    PNOT1 = 0x17 => [md("not")];
    PNOT2 = 0x1d => [md("not")];
    PNOT3 = 0x34 => [md("not")];
}

choices! {
    SETDT5 = 5 => [md("b32")] | [md("f32")];
    SETDT7 = 7 => [md("b32")] | [md("f32")];
    SHCLAMP = 9 => [md("clamp")] | [md("wrap")];
    VSCLAMP = 7 => [md("clamp")] | [md("wrap")];
    US32_5 = 5 => [md("u32")] | [md("s32")];
    US32_6 = 6 => [md("u32")] | [md("s32")];
    US32_7 = 7 => [md("u32")] | [md("s32")];
    US32_2A = 0x2a => [md("u32")] | [md("s32")];
    US8_5 = 5 => [md("u8")] | [md("s8")];
    US8_6 = 6 => [md("u8")] | [md("s8")];
    US8_39 = 0x39 => [md("u8")] | [md("s8")];
    LTEX = 9 => [md("all")] | [md("live")];
    BAR_SRC = 0x2f => [SRC1] | [BAR];
    TCNT_SRC = 0x2e => [SRC2] | [TCNT];
}

/// Texture lane-liveness and derivative flags
pub static TEXF: Lazy<Table> =
    Lazy::new(|| Table::builder("TEXF").default([t(&LTEX), t(&DTEX)]).build());

#[cfg(test)]
mod tests {
    use super::*;
    use nd_dis::Token;

    #[test]
    fn test_flag_bits() {
        assert_eq!(SAT31.match_word(1 << 0x31, 0).unwrap(), vec![Token::Modifier("sat")]);
        assert!(SAT31.match_word(!(1 << 0x31), 0).unwrap().is_empty());
        assert_eq!(PNOT3.match_word(1 << 0x34, 0).unwrap(), vec![Token::Modifier("not")]);
    }

    #[test]
    fn test_rint_nests_rounding() {
        // bit 7 set, rounding field = 3
        let word = (1 << 7) | (3 << 0x31);
        assert_eq!(RINT.match_word(word, 0).unwrap(), vec![Token::Modifier("rzi")]);
    }

    #[test]
    fn test_texf_always_renders_lane_mode() {
        assert_eq!(TEXF.match_word(0, 0).unwrap(), vec![Token::Modifier("all")]);
        assert_eq!(
            TEXF.match_word((1 << 9) | (1 << 0x2d), 0).unwrap(),
            vec![Token::Modifier("live"), Token::Modifier("deriv")]
        );
    }
}
