//! Captured packings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One placed square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

/// A complete packing, ordered largest square first (index 0 has side `n`).
///
/// Solutions are immutable once captured; the search only ever replaces its
/// best solution with a strictly better one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub bounding_side: i32,
    pub placements: Vec<Placement>,
}

impl Solution {
    /// Checks the packing from first principles: every square inside the
    /// bounding square, no two squares overlapping (touching edges are
    /// fine) and the total area fitting.
    pub fn is_valid_packing(&self) -> bool {
        let side = self.bounding_side;
        let contained = self
            .placements
            .iter()
            .all(|p| p.x >= 0 && p.y >= 0 && p.x + p.size <= side && p.y + p.size <= side);
        if !contained {
            return false;
        }

        let area: i64 = self
            .placements
            .iter()
            .map(|p| p.size as i64 * p.size as i64)
            .sum();
        if area > side as i64 * side as i64 {
            return false;
        }

        for (i, a) in self.placements.iter().enumerate() {
            for b in &self.placements[i + 1..] {
                let separated = a.x + a.size <= b.x
                    || b.x + b.size <= a.x
                    || a.y + a.size <= b.y
                    || b.y + b.size <= a.y;
                if !separated {
                    return false;
                }
            }
        }
        true
    }
}

/// The classic listing: the bounding side, then one `[x, y]` line per
/// square in index order.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "s -> {}", self.bounding_side)?;
        for placement in &self.placements {
            writeln!(f, "[{}, {}]", placement.x, placement.y)?;
        }
        Ok(())
    }
}
