//! The two caller-supplied pure functions the core treats as external collaborators:
//! name cleaning and adaptive edit-distance selection.
//!
//! Both are modeled as trait objects rather than bare function pointers so callers can
//! carry state-free configuration (a locale table, a precompiled regex) behind the
//! interface while the core still only ever calls a pure `&self` method.

/// `clean: UTF8 -> UTF8`. Must be pure: the same input always yields the same output,
/// and calling it does not observe or mutate anything outside its argument. The builder
/// and matcher apply the same `Cleaner` so that build-time and query-time tokens agree.
pub trait Cleaner {
    fn clean(&self, name: &str) -> String;
}

/// `dist: UTF8 -> {0..4}`. Chooses the deletion-neighborhood depth for a single word;
/// returning 0 disables fuzziness for that word (phonetic expansion still applies).
pub trait DistanceFn {
    fn dist(&self, word: &str) -> u32;
}

impl<F: Fn(&str) -> String> Cleaner for F {
    fn clean(&self, name: &str) -> String {
        self(name)
    }
}

impl<F: Fn(&str) -> u32> DistanceFn for F {
    fn dist(&self, word: &str) -> u32 {
        self(word)
    }
}

/// A fixed-depth `DistanceFn` that ignores the word and always returns the same value;
/// useful for tests and for callers who want uniform fuzziness.
pub struct FixedDistance(pub u32);

impl DistanceFn for FixedDistance {
    fn dist(&self, _word: &str) -> u32 {
        self.0
    }
}

/// A `Cleaner` that uppercases and strips ASCII punctuation, a reasonable default for
/// corporate and personal names (`clean = upper+strip-punctuation`).
pub struct UpperStripPunctuation;

impl Cleaner for UpperStripPunctuation {
    fn clean(&self, name: &str) -> String {
        name.chars()
            .filter(|c| !c.is_ascii_punctuation())
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}
