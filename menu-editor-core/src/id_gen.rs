//! Identifier minting for menu items
//!
//! Identifiers are derived from the display title (`"Order History"` becomes
//! `menu_order_history`). When that base is taken, a numeric suffix one
//! greater than the largest suffix already in use is appended, so ids minted
//! after deletions keep increasing instead of refilling gaps.

use std::collections::HashSet;

/// Prefix used when no settings override it
pub const DEFAULT_ID_PREFIX: &str = "menu";

/// Slug used for titles that contain no alphanumeric characters
const EMPTY_SLUG: &str = "item";

/// Derives collision-free identifiers from titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    prefix: String,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The id `title` would get if nothing were taken yet
    pub fn base_id(&self, title: &str) -> String {
        let slug = slugify(title);
        let slug = if slug.is_empty() { EMPTY_SLUG } else { slug.as_str() };
        if self.prefix.is_empty() {
            slug.to_string()
        } else {
            format!("{}_{}", self.prefix, slug)
        }
    }

    /// Mints an id for `title` that is not in `existing`.
    ///
    /// Does not record the result: callers minting several ids in one pass
    /// must insert each returned id into `existing` before the next call.
    pub fn generate(&self, title: &str, existing: &HashSet<String>) -> String {
        let base = self.base_id(title);
        if !existing.contains(&base) {
            return base;
        }

        match highest_suffix(&base, existing).map_or(Some(1), |n| n.checked_add(1)) {
            Some(next) => format!("{}_{}", base, next),
            None => lowest_free_suffix(&base, existing),
        }
    }

    /// Mints an id and records it in `existing` in one step
    pub fn generate_into(&self, title: &str, existing: &mut HashSet<String>) -> String {
        let id = self.generate(title, existing);
        existing.insert(id.clone());
        id
    }
}

/// Lowercases, strips non-alphanumerics and joins words with underscores
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Largest `n` such that `{base}_{n}` is in `existing`
fn highest_suffix(base: &str, existing: &HashSet<String>) -> Option<u128> {
    let stem = format!("{}_", base);
    existing
        .iter()
        .filter_map(|id| id.strip_prefix(&stem))
        .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|digits| digits.parse::<u128>().ok())
        .max()
}

/// First `{base}_{n}` not in `existing`, counting up from 1. Only used when
/// the highest suffix in use cannot be incremented.
fn lowest_free_suffix(base: &str, existing: &HashSet<String>) -> String {
    (1u128..)
        .map(|n| format!("{}_{}", base, n))
        .find(|id| !existing.contains(id))
        .unwrap_or_else(|| format!("{}_{}", base, u128::MAX))
}
