//! Doneness threshold tables and tier classification.
//!
//! Each meat has a static, strictly increasing table of doneness tiers.
//! The first tier is always `undercooked` at 0°F, so every reading maps
//! to exactly one tier.

use super::meat::MeatType;

/// A named doneness band with its minimum temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tier {
    /// Identifier-style label, e.g. `medium_rare`.
    pub label: &'static str,
    /// Minimum temperature in Fahrenheit.
    pub cutoff_f: f64,
}

impl Tier {
    /// Create a new tier.
    pub const fn new(label: &'static str, cutoff_f: f64) -> Self {
        Self { label, cutoff_f }
    }

    /// Label with underscores replaced by spaces, for speech.
    pub fn spoken_label(&self) -> String {
        self.label.replace('_', " ")
    }
}

/// Label of the implicit first tier of every table.
pub const UNDERCOOKED: &str = "undercooked";

// Beef and lamb share the steak ladder.
const RED_MEAT: [Tier; 6] = [
    Tier::new(UNDERCOOKED, 0.0),
    Tier::new("rare", 125.0),
    Tier::new("medium_rare", 135.0),
    Tier::new("medium", 145.0),
    Tier::new("medium_well", 150.0),
    Tier::new("well_done", 160.0),
];

static BEEF: [Tier; 6] = RED_MEAT;

static LAMB: [Tier; 6] = RED_MEAT;

static PORK: [Tier; 4] = [
    Tier::new(UNDERCOOKED, 0.0),
    Tier::new("medium", 145.0),
    Tier::new("medium_well", 150.0),
    Tier::new("well_done", 160.0),
];

static POULTRY: [Tier; 4] = [
    Tier::new(UNDERCOOKED, 0.0),
    Tier::new("approaching_safe", 155.0),
    Tier::new("safe", 165.0),
    Tier::new("dry_overcooked", 175.0),
];

static SEAFOOD: [Tier; 3] = [
    Tier::new(UNDERCOOKED, 0.0),
    Tier::new("medium", 125.0),
    Tier::new("safe_flaky", 145.0),
];

/// The threshold table for a meat, in increasing cutoff order.
pub fn thresholds(meat: MeatType) -> &'static [Tier] {
    match meat {
        MeatType::Beef => &BEEF,
        MeatType::Pork => &PORK,
        MeatType::Poultry => &POULTRY,
        MeatType::Lamb => &LAMB,
        MeatType::Seafood => &SEAFOOD,
    }
}

/// Classify a temperature into the highest tier it has reached.
///
/// Readings below every cutoff (only possible below 0°F) fall back to
/// the first tier.
///
/// # Example
///
/// ```
/// use doneness_monitor::data::{classify, MeatType};
///
/// assert_eq!(classify(MeatType::Beef, 140.0), "medium_rare");
/// assert_eq!(classify(MeatType::Poultry, 90.0), "undercooked");
/// ```
pub fn classify(meat: MeatType, temperature_f: f64) -> &'static str {
    classify_tier(meat, temperature_f).label
}

/// Like [`classify`], returning the whole tier.
pub fn classify_tier(meat: MeatType, temperature_f: f64) -> Tier {
    let table = thresholds(meat);
    table
        .iter()
        .take_while(|tier| temperature_f >= tier.cutoff_f)
        .last()
        .copied()
        .unwrap_or(table[0])
}

/// Position of a label within a meat's table, if present.
pub fn tier_index(meat: MeatType, label: &str) -> Option<usize> {
    thresholds(meat).iter().position(|tier| tier.label == label)
}
