//! Open-position record.
//!
//! Owned by the caller (the durable position row), not by the TTL store:
//! the fixed stop-loss and flow-reversal exits read only this record plus
//! the snapshot, so they keep working when the ephemeral store is down.

use serde::{Deserialize, Serialize};

/// Two buy tranches and two sell tranches bound the counters.
pub const MAX_TRANCHES: u8 = 2;

/// A position the engine is managing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub position_id: u64,
    pub symbol: String,
    /// First-tranche fill price; the stop-loss anchors here.
    pub entry_price: f64,
    /// Buys executed so far (0..=2).
    pub buy_count: u8,
    /// Sells executed so far (0..=2).
    pub sell_count: u8,
    /// Shares currently held.
    pub quantity: u64,
    /// Cash still available for the second tranche.
    pub remaining_cash: f64,
}

impl PositionState {
    /// Open a position with its first tranche filled.
    pub fn opened(
        position_id: u64,
        symbol: impl Into<String>,
        entry_price: f64,
        quantity: u64,
        remaining_cash: f64,
    ) -> Self {
        Self {
            position_id,
            symbol: symbol.into(),
            entry_price,
            buy_count: 1,
            sell_count: 0,
            quantity,
            remaining_cash,
        }
    }

    pub fn is_open(&self) -> bool {
        self.quantity > 0
    }

    /// Another buy tranche may still be added.
    pub fn can_scale_in(&self) -> bool {
        self.buy_count < MAX_TRANCHES
    }

    /// Return since entry as a fraction (−0.03 = −3%).
    pub fn unrealized_return(&self, current_price: f64) -> f64 {
        (current_price - self.entry_price) / self.entry_price
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity as f64 * current_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opened_position_has_one_tranche() {
        let pos = PositionState::opened(1, "005930", 70_000.0, 10, 350_000.0);
        assert!(pos.is_open());
        assert!(pos.can_scale_in());
        assert_eq!(pos.buy_count, 1);
        assert_eq!(pos.sell_count, 0);
    }

    #[test]
    fn unrealized_return_sign() {
        let pos = PositionState::opened(1, "005930", 70_000.0, 10, 0.0);
        assert!((pos.unrealized_return(67_900.0) - (-0.03)).abs() < 1e-9);
        assert!(pos.unrealized_return(72_100.0) > 0.0);
    }

    #[test]
    fn second_tranche_exhausts_scaling() {
        let mut pos = PositionState::opened(1, "005930", 70_000.0, 10, 350_000.0);
        pos.buy_count = 2;
        assert!(!pos.can_scale_in());
    }
}
