//! Helpers for generating unique test fixtures.

use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Produce a unique display name with the given prefix.
///
/// Names stay within the engine's join-name rules (letters, digits, spaces,
/// underscores, hyphens; at most 20 characters), so they can be passed to
/// `join` directly.
pub fn unique_name(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!("{prefix}-{n}");
    debug_assert!(name.len() <= 20, "test name exceeds join limit: {name}");
    name
}
