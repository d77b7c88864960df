//! Shared domain types for the note-drill engine.
//!
//! Closed enumerations (clefs, note names, tiers) are modeled as tagged
//! variants with stable wire names; configuration structs derive serde so
//! they round-trip through the persistence boundary unchanged.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ==================== Clef ====================

/// Coarse item category: which clef a note is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    /// All clefs, in catalog order.
    pub const ALL: [Clef; 2] = [Clef::Treble, Clef::Bass];

    /// Stable lowercase name used in item ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "treble" => Some(Clef::Treble),
            "bass" => Some(Clef::Bass),
            _ => None,
        }
    }
}

// ==================== Note names and accidentals ====================

/// The seven base note letters, in diatonic order starting at C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// All note names, in catalog order.
    pub const ALL: [NoteName; 7] = [
        NoteName::C,
        NoteName::D,
        NoteName::E,
        NoteName::F,
        NoteName::G,
        NoteName::A,
        NoteName::B,
    ];

    pub fn letter(&self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }

    /// Position within the diatonic scale (C = 0 .. B = 6).
    pub fn diatonic_index(&self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 1,
            NoteName::E => 2,
            NoteName::F => 3,
            NoteName::G => 4,
            NoteName::A => 5,
            NoteName::B => 6,
        }
    }
}

/// Optional per-item variant emitted when a tier enables accidentals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    /// Id suffix for the variant item.
    pub fn suffix(&self) -> &'static str {
        match self {
            Accidental::Sharp => "sharp",
            Accidental::Flat => "flat",
        }
    }
}

// ==================== Note (the selectable item) ====================

/// One selectable unit of practice content.
///
/// The id is derived deterministically from the defining attributes, so a
/// fixed (clef, tier-configuration) pair always enumerates the same id set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Stable id: `"<name><octave>-<clef>[-<accidental>]"`.
    pub id: String,
    pub clef: Clef,
    pub name: NoteName,
    pub octave: u8,
    pub accidental: Option<Accidental>,
    /// Diatonic offset from the clef's bottom staff line (negative below).
    pub staff_position: i32,
}

impl Note {
    pub fn new(clef: Clef, name: NoteName, octave: u8, accidental: Option<Accidental>) -> Self {
        let id = match accidental {
            Some(acc) => format!("{}{}-{}-{}", name.letter(), octave, clef.as_str(), acc.suffix()),
            None => format!("{}{}-{}", name.letter(), octave, clef.as_str()),
        };
        Self {
            id,
            clef,
            name,
            octave,
            accidental,
            staff_position: staff_position(clef, name, octave),
        }
    }
}

/// Diatonic offset of a note from its clef's bottom line.
///
/// Anchors: E4 for treble, G2 for bass.
fn staff_position(clef: Clef, name: NoteName, octave: u8) -> i32 {
    let absolute = octave as i32 * 7 + name.diatonic_index();
    let anchor = match clef {
        Clef::Treble => 4 * 7 + NoteName::E.diatonic_index(),
        Clef::Bass => 2 * 7 + NoteName::G.diatonic_index(),
    };
    absolute - anchor
}

// ==================== Tier ====================

/// Ordered difficulty level. Progression only ever moves forward, one step
/// at a time; the terminal tier has no successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Starter,
    Intermediate,
    Advanced,
}

impl Tier {
    /// All tiers, in progression order.
    pub const ALL: [Tier; 3] = [Tier::Starter, Tier::Intermediate, Tier::Advanced];

    /// The following tier, or `None` at the terminal tier.
    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Starter => Some(Tier::Intermediate),
            Tier::Intermediate => Some(Tier::Advanced),
            Tier::Advanced => None,
        }
    }
}

// ==================== Tier configuration ====================

/// Inclusive octave bounds for one clef within a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctaveRange {
    pub low: u8,
    pub high: u8,
}

impl OctaveRange {
    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }
}

/// Criteria that must all hold simultaneously for a tier transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressionCriteria {
    /// Minimum global accuracy in [0, 1].
    pub min_accuracy: f64,
    /// Minimum global question count.
    pub min_questions_at_level: u32,
    /// Required session-level consecutive-correct streak.
    pub consecutive_correct_required: u32,
}

/// Static per-tier definition: item ranges, category split, base weights
/// and progression criteria.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierConfig {
    pub tier: Tier,
    /// Per-clef inclusive octave bounds.
    pub ranges: HashMap<Clef, OctaveRange>,
    /// Per-clef relative selection weight (multiplicative, need not sum to 1).
    pub distribution: HashMap<Clef, f64>,
    /// Whether this tier emits accidental variants of each note.
    pub accidentals: bool,
    /// Per-item base weight overrides; items not listed default to 1.0.
    pub base_weights: HashMap<String, f64>,
    pub progression: ProgressionCriteria,
}

impl TierConfig {
    /// Base weight for an item id, defaulting to 1.0 when absent.
    pub fn base_weight(&self, item_id: &str) -> f64 {
        self.base_weights.get(item_id).copied().unwrap_or(1.0)
    }

    /// Distribution multiplier for a clef, defaulting to 1.0 when absent.
    pub fn distribution_weight(&self, clef: Clef) -> f64 {
        self.distribution.get(&clef).copied().unwrap_or(1.0)
    }
}

// ==================== Filters ====================

/// Learner-chosen restrictions applied after catalog generation.
///
/// Filtering is pure set membership; it never alters the underlying
/// enumeration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActiveFilters {
    /// Restrict to a single clef, or `None` for all clefs.
    pub clef: Option<Clef>,
    /// Restrict to a named subset of item ids, independent of tier.
    pub focus: Option<HashSet<String>>,
}

impl ActiveFilters {
    pub fn allows(&self, note: &Note) -> bool {
        if let Some(clef) = self.clef {
            if note.clef != clef {
                return false;
            }
        }
        if let Some(focus) = &self.focus {
            if !focus.contains(&note.id) {
                return false;
            }
        }
        true
    }
}

// ==================== Global learner stats ====================

/// Cumulative session stats as reported by the progress collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub tier: Tier,
    /// Cumulative accuracy in [0, 1] (0 when no attempts).
    pub accuracy: f64,
    pub total_attempts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_is_deterministic() {
        let a = Note::new(Clef::Treble, NoteName::C, 4, None);
        let b = Note::new(Clef::Treble, NoteName::C, 4, None);
        assert_eq!(a.id, b.id, "Same attributes must derive the same id");
        assert_eq!(a.id, "C4-treble");

        let sharp = Note::new(Clef::Bass, NoteName::F, 3, Some(Accidental::Sharp));
        assert_eq!(sharp.id, "F3-bass-sharp");
    }

    #[test]
    fn test_staff_position_anchors() {
        // E4 sits on the bottom line of the treble staff.
        let e4 = Note::new(Clef::Treble, NoteName::E, 4, None);
        assert_eq!(e4.staff_position, 0);

        // G2 sits on the bottom line of the bass staff.
        let g2 = Note::new(Clef::Bass, NoteName::G, 2, None);
        assert_eq!(g2.staff_position, 0);

        // Middle C is one ledger line below the treble staff.
        let c4 = Note::new(Clef::Treble, NoteName::C, 4, None);
        assert_eq!(c4.staff_position, -2);
    }

    #[test]
    fn test_tier_order_is_forward_only() {
        assert_eq!(Tier::Starter.next(), Some(Tier::Intermediate));
        assert_eq!(Tier::Intermediate.next(), Some(Tier::Advanced));
        assert_eq!(Tier::Advanced.next(), None, "Terminal tier has no successor");
        assert!(Tier::Starter < Tier::Advanced);
    }

    #[test]
    fn test_filters_membership() {
        let c4 = Note::new(Clef::Treble, NoteName::C, 4, None);
        let g2 = Note::new(Clef::Bass, NoteName::G, 2, None);

        let all = ActiveFilters::default();
        assert!(all.allows(&c4) && all.allows(&g2));

        let treble_only = ActiveFilters {
            clef: Some(Clef::Treble),
            focus: None,
        };
        assert!(treble_only.allows(&c4));
        assert!(!treble_only.allows(&g2));

        let focus: HashSet<String> = ["G2-bass".to_string()].into_iter().collect();
        let focused = ActiveFilters {
            clef: None,
            focus: Some(focus),
        };
        assert!(!focused.allows(&c4));
        assert!(focused.allows(&g2));
    }

    #[test]
    fn test_base_weight_defaults() {
        let cfg = TierConfig {
            tier: Tier::Starter,
            ranges: HashMap::new(),
            distribution: HashMap::new(),
            accidentals: false,
            base_weights: [("C4-treble".to_string(), 2.5)].into_iter().collect(),
            progression: ProgressionCriteria {
                min_accuracy: 0.8,
                min_questions_at_level: 10,
                consecutive_correct_required: 3,
            },
        };
        assert_eq!(cfg.base_weight("C4-treble"), 2.5);
        assert_eq!(cfg.base_weight("D4-treble"), 1.0, "Unlisted items default to 1.0");
        assert_eq!(cfg.distribution_weight(Clef::Bass), 1.0);
    }
}
