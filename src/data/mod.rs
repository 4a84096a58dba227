//! Cook-state data structures.
//!
//! This module contains the meat types, their static doneness tables,
//! the tier classifier, per-meat target selection and the temperature
//! sample type.

pub mod meat;
pub mod target;
pub mod temperatures;
pub mod thresholds;

pub use meat::MeatType;
pub use target::{TargetState, DEFAULT_TARGET_INDEX};
pub use temperatures::TemperatureSample;
pub use thresholds::{classify, classify_tier, thresholds, tier_index, Tier, UNDERCOOKED};
