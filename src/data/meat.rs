//! Meat types.

use std::fmt;

/// The kinds of meat the monitor knows thresholds for.
///
/// Short presses with the menu closed walk this list in declaration
/// order and wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MeatType {
    /// Beef cuts.
    #[default]
    Beef = 0,
    /// Pork cuts.
    Pork = 1,
    /// Chicken, turkey, duck.
    Poultry = 2,
    /// Lamb cuts.
    Lamb = 3,
    /// Fish and shellfish.
    Seafood = 4,
}

impl MeatType {
    /// Number of meat types.
    pub const COUNT: usize = 5;

    /// All meat types in cycling order.
    pub const ALL: [MeatType; Self::COUNT] = [
        Self::Beef,
        Self::Pork,
        Self::Poultry,
        Self::Lamb,
        Self::Seafood,
    ];

    /// Create from raw index.
    pub fn from_raw(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Position of this meat in cycling order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The meat after this one, wrapping from seafood back to beef.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// Lowercase name used in logs and announcements.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Beef => "beef",
            Self::Pork => "pork",
            Self::Poultry => "poultry",
            Self::Lamb => "lamb",
            Self::Seafood => "seafood",
        }
    }
}

impl fmt::Display for MeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_without_skips() {
        let mut meat = MeatType::Beef;
        let mut seen = Vec::new();
        for _ in 0..MeatType::COUNT {
            meat = meat.next();
            seen.push(meat);
        }
        assert_eq!(
            seen,
            vec![
                MeatType::Pork,
                MeatType::Poultry,
                MeatType::Lamb,
                MeatType::Seafood,
                MeatType::Beef,
            ]
        );
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(MeatType::from_raw(0), Some(MeatType::Beef));
        assert_eq!(MeatType::from_raw(4), Some(MeatType::Seafood));
        assert_eq!(MeatType::from_raw(5), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MeatType::Poultry.to_string(), "poultry");
        assert_eq!(format!("{}", MeatType::Seafood), "seafood");
    }
}
