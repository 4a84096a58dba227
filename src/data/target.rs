//! Per-meat cook target selection.

use super::meat::MeatType;
use super::thresholds::{thresholds, Tier};

/// Index every meat's target starts at: the first tier above `undercooked`.
pub const DEFAULT_TARGET_INDEX: usize = 1;

/// The selected target tier for every meat.
///
/// Seeded to [`DEFAULT_TARGET_INDEX`] on construction and only changed by
/// [`TargetState::cycle_target`]. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetState {
    indices: [usize; MeatType::COUNT],
}

impl Default for TargetState {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetState {
    /// Create a target state with every meat at its default tier.
    pub fn new() -> Self {
        let mut indices = [0; MeatType::COUNT];
        for meat in MeatType::ALL {
            indices[meat.index()] = Self::clamp_index(meat, DEFAULT_TARGET_INDEX);
        }
        Self { indices }
    }

    /// Index of the selected tier in the meat's threshold table.
    pub fn selected_index(&self, meat: MeatType) -> usize {
        self.indices[meat.index()]
    }

    /// The selected target tier for a meat.
    pub fn current_target(&self, meat: MeatType) -> Tier {
        thresholds(meat)[self.selected_index(meat)]
    }

    /// Advance the meat's target to the next tier and return it.
    ///
    /// Wraps from the last tier back to index 1; `undercooked` is never a
    /// cycle destination. A single-entry table stays at index 0.
    pub fn cycle_target(&mut self, meat: MeatType) -> Tier {
        let len = thresholds(meat).len();
        let next = if len <= 1 {
            0
        } else {
            match (self.selected_index(meat) + 1) % len {
                0 => 1,
                idx => idx,
            }
        };
        self.indices[meat.index()] = next;
        self.current_target(meat)
    }

    fn clamp_index(meat: MeatType, index: usize) -> usize {
        index.min(thresholds(meat).len() - 1)
    }
}
