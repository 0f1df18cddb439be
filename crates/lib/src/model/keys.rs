//! Identifier and key syntax.
//!
//! - reference ids: `Z` followed by a positive integer (`Z1`, `Z11`, `Z10001`), or `Z0`
//! - global keys: a reference id, `K`, a positive integer (`Z11K1`)
//! - local keys: `K` followed by a positive integer (`K1`, `K12`)

fn is_positive_integer(s: &str) -> bool {
    !s.is_empty() && !s.starts_with('0') && s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `true` if `s` looks like a reference to a persisted object.
///
/// `Z0`, the placeholder id of an unsaved object, counts as a reference.
pub fn is_reference_id(s: &str) -> bool {
    s == crate::constants::NEW_OBJECT_ID || s.strip_prefix('Z').is_some_and(is_positive_integer)
}

/// Returns `true` if `s` is a key of a persisted type (`Z11K1`).
pub fn is_global_key(s: &str) -> bool {
    match s.split_once('K') {
        Some((zid, index)) => is_reference_id(zid) && is_positive_integer(index),
        None => false,
    }
}

/// Returns `true` if `s` is a locally scoped key (`K1`).
pub fn is_local_key(s: &str) -> bool {
    local_key_index(s).is_some()
}

/// The numeric part of a local key, `K3` → `3`.
pub fn local_key_index(s: &str) -> Option<usize> {
    s.strip_prefix('K')
        .filter(|n| is_positive_integer(n))
        .and_then(|n| n.parse().ok())
}

/// The owning object id and index of a global key, `Z11K2` → `("Z11", 2)`.
pub fn split_global_key(s: &str) -> Option<(&str, usize)> {
    if !is_global_key(s) {
        return None;
    }
    let (zid, index) = s.split_once('K')?;
    Some((zid, index.parse().ok()?))
}

/// Builds the key `<zid>K<index>`.
pub fn global_key(zid: &str, index: usize) -> String {
    format!("{zid}K{index}")
}

/// Builds the local key `K<index>`.
pub fn local_key(index: usize) -> String {
    format!("K{index}")
}
