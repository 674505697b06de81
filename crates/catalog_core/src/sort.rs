//! Display-only re-ordering of the loaded records.
//!
//! The projection never touches the query state; it is applied to a snapshot
//! at render time.

use std::cmp::Ordering;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::{Character, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOption {
    AToZ,
    ZToA,
    MaleFirst,
    FemaleFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option {0:?} (expected a-z, z-a, male or female)")]
pub struct UnknownSortOption(pub String);

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::AToZ,
        SortOption::ZToA,
        SortOption::MaleFirst,
        SortOption::FemaleFirst,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortOption::AToZ => "a-z",
            SortOption::ZToA => "z-a",
            SortOption::MaleFirst => "male",
            SortOption::FemaleFirst => "female",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOption::AToZ => "A-Z",
            SortOption::ZToA => "Z-A",
            SortOption::MaleFirst => "Male",
            SortOption::FemaleFirst => "Female",
        }
    }

    pub fn compare(self, a: &Character, b: &Character) -> Ordering {
        match self {
            SortOption::AToZ => collate_names(&a.name, &b.name),
            SortOption::ZToA => collate_names(&b.name, &a.name),
            SortOption::MaleFirst => group_first(a, b, |g| *g == Gender::Male),
            SortOption::FemaleFirst => group_first(a, b, |g| *g == Gender::Female),
        }
    }
}

impl FromStr for SortOption {
    type Err = UnknownSortOption;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        SortOption::ALL
            .into_iter()
            .find(|option| option.key().eq_ignore_ascii_case(raw))
            .ok_or_else(|| UnknownSortOption(raw.to_string()))
    }
}

/// Returns a re-ordered copy of `records`; `None` keeps fetch order.
pub fn sort_projection(records: &[Character], option: Option<SortOption>) -> Vec<Character> {
    let mut sorted = records.to_vec();
    if let Some(option) = option {
        sorted.sort_by(|a, b| option.compare(a, b));
    }
    sorted
}

/// Locale-style name order. Letters are compared with accents and case
/// folded away first, then accented after plain, then lowercase before
/// uppercase at the first differing position, then by raw code points.
pub fn collate_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn group_first(a: &Character, b: &Character, matches: impl Fn(&Gender) -> bool) -> Ordering {
    matches(&b.gender)
        .cmp(&matches(&a.gender))
        .then_with(|| collate_names(&a.name, &b.name))
}
