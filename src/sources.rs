//! Collapsing grounding citations to one entry per cited page.

use crate::models::CitationEntry;
use std::collections::HashMap;

/// Deduplicate citations by URI and drop those without one (an empty URI
/// counts as none).
///
/// Behaves like an insertion-ordered map keyed by URI: a URI keeps the
/// position where it was first seen, while a later duplicate replaces the
/// stored entry (last write wins). Every returned entry has a URI, so the
/// title-or-URI fallback is always renderable.
pub fn dedupe_sources(sources: &[CitationEntry]) -> Vec<CitationEntry> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(sources.len());
    let mut unique: Vec<CitationEntry> = Vec::with_capacity(sources.len());

    for source in sources {
        let Some(uri) = source.uri().filter(|uri| !uri.is_empty()) else {
            continue;
        };
        match slots.get(uri) {
            Some(&slot) => unique[slot] = source.clone(),
            None => {
                slots.insert(uri, unique.len());
                unique.push(source.clone());
            }
        }
    }

    unique
}
