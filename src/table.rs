//! The static acuity catalog.
//!
//! Levels are ordered from the largest angular size (easiest) to the smallest
//! (hardest). The `(label, arcminutes)` pairs are authored data and are not
//! derived from the Snellen fraction at runtime.
//!
//! | Line | Label | Arcminutes |
//! |------|-------|------------|
//! | 1 | 20/200 | 50 |
//! | 2 | 20/100 | 25 |
//! | 3 | 20/70 | 17.5 |
//! | 4 | 20/50 | 12.5 |
//! | 5 | 20/40 | 10 |
//! | 6 | 20/30 | 7.5 |
//! | 7 | 20/25 | 6.25 |
//! | 8 | 20/20 | 5 |

use serde::Serialize;

use crate::error::{Error, Result};

/// Number of letter-set variants carried by every level.
pub const VARIANT_COUNT: usize = 3;

/// One line of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcuityLevel {
    /// Snellen notation, e.g. `"20/40"`.
    pub label: &'static str,
    /// Angular height of the letter block at the viewing distance.
    pub arcminutes: f64,
    /// Alternative letter lines of equal difficulty, space separated.
    pub letter_variants: [&'static str; VARIANT_COUNT],
}

impl AcuityLevel {
    /// Denominator of the Snellen fraction (`"20/40"` gives 40).
    ///
    /// Returns `None` if the label has no `/` or the part after it is not an
    /// integer; catalog labels always parse.
    #[must_use]
    pub fn denominator(&self) -> Option<u32> {
        snellen_denominator(self.label)
    }

    /// Letters of the given variant, wrapping indices past the last variant.
    #[must_use]
    pub fn letters(&self, variant: usize) -> &'static str {
        self.letter_variants[variant % VARIANT_COUNT]
    }

    /// Number of optotypes shown on this line.
    #[must_use]
    pub fn letter_count(&self, variant: usize) -> usize {
        self.letters(variant).split_whitespace().count()
    }
}

/// Parse the integer after `/` in a Snellen label.
#[must_use]
pub fn snellen_denominator(label: &str) -> Option<u32> {
    let (_, denominator) = label.split_once('/')?;
    denominator.trim().parse().ok()
}

/// Chart lines, easiest first.
pub static CATALOG: [AcuityLevel; 8] = [
    AcuityLevel {
        label: "20/200",
        arcminutes: 50.0,
        letter_variants: ["E F P", "H N T", "Z C L"],
    },
    AcuityLevel {
        label: "20/100",
        arcminutes: 25.0,
        letter_variants: ["T O Z", "L E D", "P C F"],
    },
    AcuityLevel {
        label: "20/70",
        arcminutes: 17.5,
        letter_variants: ["L P E D", "F Z O T", "C N H P"],
    },
    AcuityLevel {
        label: "20/50",
        arcminutes: 12.5,
        letter_variants: ["F C Z H R", "E D N P T", "O L Z F D"],
    },
    AcuityLevel {
        label: "20/40",
        arcminutes: 10.0,
        letter_variants: ["D N P O T H", "E F Z L C R", "T H F E D Z"],
    },
    AcuityLevel {
        label: "20/30",
        arcminutes: 7.5,
        letter_variants: ["F E Z P C L D", "T O H N R E F", "L D P C Z T O"],
    },
    AcuityLevel {
        label: "20/25",
        arcminutes: 6.25,
        letter_variants: ["P O L E D F C Z", "H N T R Z E L D", "C F D O P T H N"],
    },
    AcuityLevel {
        label: "20/20",
        arcminutes: 5.0,
        letter_variants: [
            "E D F P O T E C L",
            "Z H N R L C F D T",
            "O P T E Z D H L N",
        ],
    },
];

/// Read-only view over an ordered level list.
///
/// Defaults to [`CATALOG`]; a custom slice is accepted for alternate charts.
#[derive(Debug, Clone, Copy)]
pub struct AcuityTable {
    levels: &'static [AcuityLevel],
}

impl AcuityTable {
    /// Wrap an ordered slice of levels.
    ///
    /// Returns an error if the slice is empty or not ordered from largest
    /// to smallest angular size.
    pub fn new(levels: &'static [AcuityLevel]) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::InvalidConfig("acuity table is empty".to_string()));
        }
        if levels.windows(2).any(|w| w[1].arcminutes > w[0].arcminutes) {
            return Err(Error::InvalidConfig(
                "acuity levels must be ordered from largest to smallest".to_string(),
            ));
        }
        Ok(Self { levels })
    }

    /// The built-in chart.
    #[must_use]
    pub fn standard() -> Self {
        Self { levels: &CATALOG }
    }

    /// All levels, easiest first.
    #[must_use]
    pub fn levels(&self) -> &'static [AcuityLevel] {
        self.levels
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'static AcuityLevel> {
        self.levels.get(index)
    }

    /// Index of the level with the given label.
    pub fn position_of(&self, label: &str) -> Result<usize> {
        self.levels
            .iter()
            .position(|level| level.label == label)
            .ok_or_else(|| Error::UnknownLevel(label.to_string()))
    }
}

impl Default for AcuityTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ordered_easiest_first() {
        for pair in CATALOG.windows(2) {
            assert!(
                pair[0].arcminutes > pair[1].arcminutes,
                "{} should be larger than {}",
                pair[0].label,
                pair[1].label
            );
        }
    }

    #[test]
    fn test_catalog_literal_values() {
        let expected = [
            ("20/200", 50.0),
            ("20/100", 25.0),
            ("20/70", 17.5),
            ("20/50", 12.5),
            ("20/40", 10.0),
            ("20/30", 7.5),
            ("20/25", 6.25),
            ("20/20", 5.0),
        ];
        assert_eq!(CATALOG.len(), expected.len());
        for (level, (label, arcmin)) in CATALOG.iter().zip(expected) {
            assert_eq!(level.label, label);
            assert_eq!(level.arcminutes, arcmin);
        }
        assert_eq!(CATALOG[0].letter_variants[0], "E F P");
        assert_eq!(CATALOG[7].letter_variants[0], "E D F P O T E C L");
    }

    #[test]
    fn test_variants_share_letter_count() {
        for level in &CATALOG {
            let n = level.letter_count(0);
            assert!(n >= 1);
            for v in 0..VARIANT_COUNT {
                assert_eq!(level.letter_count(v), n, "{} variant {}", level.label, v);
                assert!(level.letters(v).split_whitespace().all(|t| t.chars().count() == 1));
            }
        }
    }

    #[test]
    fn test_variants_are_distinct() {
        for level in &CATALOG {
            let [a, b, c] = level.letter_variants;
            assert!(a != b && b != c && a != c, "{}", level.label);
        }
    }

    #[test]
    fn test_denominators_parse() {
        let denominators: Vec<u32> = CATALOG.iter().filter_map(AcuityLevel::denominator).collect();
        assert_eq!(denominators, vec![200, 100, 70, 50, 40, 30, 25, 20]);
        assert_eq!(snellen_denominator("20/40"), Some(40));
        assert_eq!(snellen_denominator("6/6"), Some(6));
        assert_eq!(snellen_denominator("twenty"), None);
        assert_eq!(snellen_denominator("20/x"), None);
    }

    #[test]
    fn test_letters_wraps_variant() {
        let level = &CATALOG[1];
        assert_eq!(level.letters(3), level.letters(0));
        assert_eq!(level.letters(5), level.letters(2));
    }

    #[test]
    fn test_position_of() {
        let table = AcuityTable::standard();
        assert_eq!(table.position_of("20/200").unwrap(), 0);
        assert_eq!(table.position_of("20/40").unwrap(), 4);
        assert!(matches!(table.position_of("20/15"), Err(Error::UnknownLevel(_))));
    }

    #[test]
    fn test_custom_table_validation() {
        static EMPTY: [AcuityLevel; 0] = [];
        assert!(AcuityTable::new(&EMPTY).is_err());

        static REVERSED: [AcuityLevel; 2] = [
            AcuityLevel {
                label: "20/20",
                arcminutes: 5.0,
                letter_variants: ["E", "F", "P"],
            },
            AcuityLevel {
                label: "20/200",
                arcminutes: 50.0,
                letter_variants: ["T", "O", "Z"],
            },
        ];
        assert!(AcuityTable::new(&REVERSED).is_err());
        assert_eq!(AcuityTable::new(&CATALOG).unwrap().len(), 8);
    }
}
