//! # Unique Build Bonus
//!
//! Scores research contributions by the element combination used to build
//! them:
//!
//! ```text
//! bonus = (|elements| * 0.5 + synergy) * (1 + ln(|elements| + 1) * 0.3)
//! ```
//!
//! Synergy comes from a fixed lookup of predefined combinations. Only the
//! single highest-value matching combination applies; overlapping combos
//! never stack, so a large element set cannot farm every subset bonus at
//! once.
//!
//! Element sets are a bitmask over the fixed 7-tag vocabulary. Inserting a
//! duplicate tag is a no-op, and order never matters.

use serde::{Deserialize, Serialize};

/// Bonus contributed per element in the set.
pub const BASE_BONUS_PER_ELEMENT: f64 = 0.5;

/// Scale applied to the logarithmic uniqueness factor.
const UNIQUENESS_SCALE: f64 = 0.3;

/// One tag from the fixed element vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ElementTag {
    /// Carbon-based matter.
    Organic = 0,
    /// Minerals and metals.
    Inorganic = 1,
    /// Lab-made compounds.
    Synthetic = 2,
    /// Living material.
    Biological = 3,
    /// Energy sources.
    Energy = 4,
    /// Reaction accelerants.
    Catalyst = 5,
    /// Multi-element composites.
    Compound = 6,
}

impl ElementTag {
    /// Bitmask position for this tag.
    #[inline]
    #[must_use]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A duplicate-free set of element tags.
///
/// Backed by a single byte; insertion is idempotent and membership order
/// is irrelevant, matching set semantics exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ElementSet(u8);

impl ElementSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Adds a tag to the set. Adding a tag twice is a no-op.
    #[inline]
    pub fn insert(&mut self, tag: ElementTag) {
        self.0 |= tag.bit();
    }

    /// Whether the set contains the given tag.
    #[inline]
    #[must_use]
    pub const fn contains(self, tag: ElementTag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Whether every tag of `other` is present in this set.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of distinct tags in the set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<ElementTag> for ElementSet {
    fn from_iter<I: IntoIterator<Item = ElementTag>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Builds a set from two tags (const, for the synergy table).
const fn pair(a: ElementTag, b: ElementTag) -> ElementSet {
    ElementSet(a.bit() | b.bit())
}

/// Builds a set from three tags (const, for the synergy table).
const fn triple(a: ElementTag, b: ElementTag, c: ElementTag) -> ElementSet {
    ElementSet(a.bit() | b.bit() | c.bit())
}

/// Predefined synergy combinations and their fixed bonus values.
///
/// Process-wide constants, never mutated at runtime.
const SYNERGY_COMBOS: [(ElementSet, f64); 5] = [
    (pair(ElementTag::Organic, ElementTag::Catalyst), 2.0),
    (pair(ElementTag::Biological, ElementTag::Synthetic), 3.0),
    (pair(ElementTag::Energy, ElementTag::Compound), 2.5),
    (
        triple(ElementTag::Organic, ElementTag::Biological, ElementTag::Catalyst),
        5.0,
    ),
    (
        triple(ElementTag::Synthetic, ElementTag::Energy, ElementTag::Compound),
        4.0,
    ),
];

/// Highest-value synergy bonus whose combination is fully present.
///
/// Non-stacking: when several combinations match (e.g. a triple and one of
/// its pairs), only the single best bonus applies.
#[must_use]
pub fn synergy_bonus(elements: ElementSet) -> f64 {
    let mut best = 0.0;
    for (combo, bonus) in SYNERGY_COMBOS {
        if elements.contains_all(combo) && bonus > best {
            best = bonus;
        }
    }
    best
}

/// Computes the unique build bonus for an element combination.
///
/// The empty set scores exactly 0.0. The caller adds the result to its own
/// base contribution; this function never touches that value.
#[must_use]
pub fn build_bonus(elements: ElementSet) -> f64 {
    let count = f64::from(elements.len());
    let base = count * BASE_BONUS_PER_ELEMENT;
    let uniqueness = (count + 1.0).ln() * UNIQUENESS_SCALE;
    (base + synergy_bonus(elements)) * (1.0 + uniqueness)
}
