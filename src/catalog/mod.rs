//! Item catalog builder.
//!
//! Enumerates the universe of selectable notes for a tier configuration.
//! Pure and deterministic: a fixed (configuration, filters) pair always
//! yields the same ordered id set. Filters are applied strictly after
//! generation via membership tests.

use crate::types::{Accidental, ActiveFilters, Clef, Note, NoteName, TierConfig};

/// Accidental variants emitted per note when the tier enables them.
const VARIANTS: [Accidental; 2] = [Accidental::Sharp, Accidental::Flat];

/// Enumerate every candidate note for a tier, then apply the active filters.
pub fn build_candidates(cfg: &TierConfig, filters: &ActiveFilters) -> Vec<Note> {
    let mut notes = Vec::new();
    for clef in Clef::ALL {
        let Some(range) = cfg.ranges.get(&clef) else {
            continue;
        };
        for octave in range.low..=range.high {
            for name in NoteName::ALL {
                notes.push(Note::new(clef, name, octave, None));
                if cfg.accidentals {
                    for variant in VARIANTS {
                        notes.push(Note::new(clef, name, octave, Some(variant)));
                    }
                }
            }
        }
    }
    notes.retain(|note| filters.allows(note));
    notes
}
