//! Symbol resolution hooks

use crate::operand::TargetKind;

/// Supplies display names for addresses found while decoding.
pub trait SymbolResolver: Send + Sync {
    /// Name for offset `offset` of constant bank `bank`
    fn resolve_const(&self, bank: u64, offset: i64) -> Option<String> {
        let _ = (bank, offset);
        None
    }

    /// Name for a code address
    fn resolve_target(&self, address: u64, kind: TargetKind) -> Option<String> {
        let _ = (address, kind);
        None
    }
}

/// Resolver that never names anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {}
