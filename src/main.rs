//! nvdis - Fermi shader disassembler
//!
//! Reads hex instruction words from stdin and prints a listing.

use anyhow::{Context, Result};
use nd_core::config::LogLevel;
use nd_core::{logging, Config};
use nd_dis::{Listing, Syntax};
use std::io::Read;

fn main() -> Result<()> {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let level = if config.debug.trace_decode {
        LogLevel::Trace
    } else {
        config.debug.log_level
    };
    logging::init(level);
    if let Err(e) = &loaded {
        tracing::warn!("Using default configuration: {}", e);
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read instruction words from stdin")?;
    let words = parse_words(&input)?;

    tracing::info!(
        "Disassembling {} words at 0x{:x}",
        words.len(),
        config.general.base_address
    );

    let listing = Listing::build(
        &nd_nvc0::decoder(),
        &words,
        config.general.base_address,
        config.decoder.threads,
    );
    print!(
        "{}",
        listing.render(&Syntax::from(&config.syntax), config.general.show_encoding)
    );
    Ok(())
}

/// Whitespace separated hex words, `0x` optional
fn parse_words(input: &str) -> Result<Vec<u64>> {
    input
        .split_whitespace()
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u64::from_str_radix(digits, 16)
                .with_context(|| format!("Invalid instruction word '{}'", token))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_words() {
        let words = parse_words("0x8000000000001de7\n4800000008101c03  0X10\n").unwrap();
        assert_eq!(words, vec![0x8000000000001de7, 0x4800000008101c03, 0x10]);
    }

    #[test]
    fn test_parse_words_rejects_junk() {
        let err = parse_words("0x1 zz").unwrap_err();
        assert!(err.to_string().contains("'zz'"));
    }
}
