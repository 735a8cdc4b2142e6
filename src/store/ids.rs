use std::collections::HashSet;

use uuid::Uuid;

const SUFFIX_MIN: u32 = 100;
const SUFFIX_SPAN: u32 = 900;
const RANDOM_DRAWS: usize = 32;

/// Generates `prefix` followed by a three-digit suffix in `[100, 999]`,
/// skipping suffixes already present in `taken`.
///
/// When every suffix of the prefix is in use the id falls back to the prefix
/// followed by a simple-format UUID.
pub fn generate_id<'a>(prefix: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();

    for _ in 0..RANDOM_DRAWS {
        let candidate = format!("{prefix}{}", random_suffix());
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }

    (SUFFIX_MIN..SUFFIX_MIN + SUFFIX_SPAN)
        .map(|suffix| format!("{prefix}{suffix}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| format!("{prefix}{}", Uuid::new_v4().simple()))
}

fn random_suffix() -> u32 {
    let bits = Uuid::new_v4().as_u128();
    SUFFIX_MIN + (bits % u128::from(SUFFIX_SPAN)) as u32
}
