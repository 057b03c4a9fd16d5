//! Process-wide style registry.
//!
//! Maps a normalized style key (`"01;34"`, `"marked"`) to a rendering
//! attribute handle. Registration is append-only and idempotent: the first
//! registration of a key wins and later ones return the existing handle.
//! One instance is built at startup and shared by `Arc` with every component
//! that emits markup; tests construct a fresh one per case.

use crate::palette;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Opaque handle of a registered attribute (index in registration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AttrId(u32);

impl AttrId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Foreground / background description in palette notation: comma separated
/// color and text attribute names, empty for the surface default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct AttrSpec {
    pub foreground: String,
    pub background: String,
}

impl AttrSpec {
    pub fn new(foreground: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            foreground: foreground.into(),
            background: background.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    by_key: HashMap<String, AttrId>,
    entries: Vec<(String, AttrSpec)>,
}

#[derive(Debug, Default)]
pub struct AttributeRegistry {
    inner: Mutex<Inner>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with the built-in palette.
    pub fn with_default_palette() -> Self {
        let registry = Self::new();
        registry.register_default_palette();
        registry
    }

    /// Register every built-in palette entry not registered yet. Entries
    /// registered earlier (configured overrides) are kept.
    pub fn register_default_palette(&self) {
        let mut added = 0usize;
        for &(key, fg, bg) in palette::DEFAULT_PALETTE {
            if self.register_with(key, || AttrSpec::new(fg, bg)).1 {
                added += 1;
            }
        }
        debug!(target: "markup.registry", added, total = self.len(), "default_palette_registered");
    }

    /// Register `spec` under `key` unless the key is already known.
    pub fn register(&self, key: &str, spec: AttrSpec) -> AttrId {
        self.register_with(key, || spec).0
    }

    /// Check-then-insert under one lock. `make` only runs for a new key.
    /// Returns the handle and whether this call inserted it.
    pub fn register_with(&self, key: &str, make: impl FnOnce() -> AttrSpec) -> (AttrId, bool) {
        let mut inner = self.lock();
        if let Some(id) = inner.by_key.get(key) {
            return (*id, false);
        }
        let id = AttrId(inner.entries.len() as u32);
        let spec = make();
        trace!(target: "markup.registry", key, fg = %spec.foreground, bg = %spec.background, id = id.0, "register");
        inner.entries.push((key.to_string(), spec));
        inner.by_key.insert(key.to_string(), id);
        (id, true)
    }

    pub fn lookup(&self, key: &str) -> Option<AttrId> {
        self.lock().by_key.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn spec(&self, id: AttrId) -> Option<AttrSpec> {
        self.lock().entries.get(id.index()).map(|(_, spec)| spec.clone())
    }

    pub fn spec_for_key(&self, key: &str) -> Option<AttrSpec> {
        let inner = self.lock();
        let id = inner.by_key.get(key)?;
        inner.entries.get(id.index()).map(|(_, spec)| spec.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all registrations in registration order.
    pub fn entries(&self) -> Vec<(String, AttrSpec)> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are only ever appended, so a poisoned guard still holds consistent data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_registration_wins() {
        let reg = AttributeRegistry::new();
        let a = reg.register("01;34", AttrSpec::new("bold,dark blue", ""));
        let b = reg.register("01;34", AttrSpec::new("white", "black"));
        assert_eq!(a, b);
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.spec_for_key("01;34"),
            Some(AttrSpec::new("bold,dark blue", ""))
        );
    }

    #[test]
    fn register_with_skips_factory_for_known_key() {
        let reg = AttributeRegistry::new();
        let (_, inserted) = reg.register_with("k", AttrSpec::default);
        assert!(inserted);
        let (_, inserted) = reg.register_with("k", || panic!("factory must not run"));
        assert!(!inserted);
    }

    #[test]
    fn handles_follow_registration_order() {
        let reg = AttributeRegistry::new();
        let a = reg.register("a", AttrSpec::default());
        let b = reg.register("b", AttrSpec::default());
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(reg.lookup("b"), Some(b));
        assert_eq!(reg.lookup("c"), None);
        assert!(reg.spec(b).is_some());
        let keys: Vec<String> = reg.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn default_palette_keeps_earlier_overrides() {
        let reg = AttributeRegistry::new();
        reg.register("marked", AttrSpec::new("white", "dark blue"));
        reg.register_default_palette();
        assert_eq!(
            reg.spec_for_key("marked"),
            Some(AttrSpec::new("white", "dark blue"))
        );
        assert!(reg.contains(palette::DIRECTORY));
        assert_eq!(reg.len(), palette::DEFAULT_PALETTE.len());
    }

    #[test]
    fn concurrent_registration_dedupes() {
        let reg = Arc::new(AttributeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        reg.register(&format!("k{i}"), AttrSpec::default());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.len(), 50);
    }
}
