use crate::core::aliases::{normalize_breed, BreedAliases};
use crate::models::{Gender, SizeCategory, Species};
use std::collections::BTreeSet;

/// Outcome of comparing two identifier codes (microchip-style)
///
/// Three-valued on purpose: "both codes missing" must never be conflated
/// with "both present and different". Only `Match` has scoring effect;
/// `Mismatch` does not penalize, since the absence or misreading of a chip
/// does not imply "not the same animal".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierMatch {
    Match,
    Mismatch,
    Unknown,
}

/// Compare species: exact enum equality, no partial credit
#[inline]
pub fn compare_species(a: Species, b: Species) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

/// Compare breeds, primary and secondary
///
/// Exact (case-insensitive) primary equality scores 1.0, an alias-table hit
/// 0.85, any cross-match involving a secondary breed 0.5, otherwise 0.
pub fn compare_breed(
    aliases: &BreedAliases,
    primary_a: &str,
    secondary_a: Option<&str>,
    primary_b: &str,
    secondary_b: Option<&str>,
) -> f64 {
    let prim_a = normalize_breed(primary_a);
    let prim_b = normalize_breed(primary_b);

    if !prim_a.is_empty() && prim_a == prim_b {
        return 1.0;
    }

    if aliases.same_class(&prim_a, &prim_b) {
        return 0.85;
    }

    let sec_a = secondary_a.map(normalize_breed);
    let sec_b = secondary_b.map(normalize_breed);

    let crossings = [
        (Some(&prim_a), sec_b.as_ref()),
        (sec_a.as_ref(), Some(&prim_b)),
        (sec_a.as_ref(), sec_b.as_ref()),
    ];

    for (left, right) in crossings {
        if let (Some(left), Some(right)) = (left, right) {
            if (!left.is_empty() && left == right) || aliases.same_class(left, right) {
                return 0.5;
            }
        }
    }

    0.0
}

/// Compare colors, primary and secondary
///
/// Primary-vs-primary match scores 1.0, a primary-vs-secondary crossing in
/// either direction 0.6, anything else 0.
#[inline]
pub fn compare_color(
    primary_a: &str,
    secondary_a: Option<&str>,
    primary_b: &str,
    secondary_b: Option<&str>,
) -> f64 {
    let prim_a = normalize_color(primary_a);
    let prim_b = normalize_color(primary_b);

    if !prim_a.is_empty() && prim_a == prim_b {
        return 1.0;
    }

    let sec_a = secondary_a.map(normalize_color);
    let sec_b = secondary_b.map(normalize_color);

    let prim_vs_sec = sec_b.map_or(false, |s| !s.is_empty() && s == prim_a);
    let sec_vs_prim = sec_a.map_or(false, |s| !s.is_empty() && s == prim_b);

    if prim_vs_sec || sec_vs_prim {
        return 0.6;
    }

    0.0
}

#[inline]
fn normalize_color(color: &str) -> String {
    color.trim().to_lowercase()
}

/// Compare size categories
///
/// Equal known categories score 1.0, adjacent ones (Small/Medium or
/// Medium/Large) 0.4, opposite ends or any Unknown 0.
#[inline]
pub fn compare_size(a: SizeCategory, b: SizeCategory) -> f64 {
    use SizeCategory::*;

    match (a, b) {
        (Unknown, _) | (_, Unknown) => 0.0,
        _ if a == b => 1.0,
        (Small, Medium) | (Medium, Small) | (Medium, Large) | (Large, Medium) => 0.4,
        _ => 0.0,
    }
}

/// Compare genders as a soft signal
///
/// Equal known genders score 1.0 and an Unknown on either side a neutral
/// 0.5. A mismatch scores 0 points but never excludes the candidate:
/// reporter-observed gender is frequently wrong.
#[inline]
pub fn compare_gender(a: Gender, b: Gender) -> f64 {
    use Gender::*;

    match (a, b) {
        (Unknown, _) | (_, Unknown) => 0.5,
        _ if a == b => 1.0,
        _ => 0.0,
    }
}

/// Jaccard similarity of two distinguishing-feature tag sets
///
/// Returns `None` when both sets are empty: the factor is not evaluable and
/// must contribute nothing, rather than scoring a penalizing zero.
pub fn compare_features(a: &[String], b: &[String]) -> Option<f64> {
    let set_a: BTreeSet<String> = a
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    let set_b: BTreeSet<String> = b
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    if set_a.is_empty() && set_b.is_empty() {
        return None;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    Some(intersection as f64 / union as f64)
}

/// Compare identifier codes
///
/// An empty or whitespace-only code counts as missing.
pub fn compare_identifier(a: Option<&str>, b: Option<&str>) -> IdentifierMatch {
    let code_a = a.map(str::trim).filter(|c| !c.is_empty());
    let code_b = b.map(str::trim).filter(|c| !c.is_empty());

    match (code_a, code_b) {
        (Some(a), Some(b)) if a == b => IdentifierMatch::Match,
        (Some(_), Some(_)) => IdentifierMatch::Mismatch,
        _ => IdentifierMatch::Unknown,
    }
}
