// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-function vectorization verdicts.
//!
//! The map is built once per run by an evidence source, then shared
//! read-only with the reporting loop. A missing key deliberately reads as
//! `false`: absence of evidence means "not vectorized", and callers rely on
//! that default being explicit rather than an artifact of the container.

use ahash::AHashMap;

/// Mapping from function name to "was vectorized".
#[derive(Debug, Clone, Default)]
pub struct VerdictMap {
    verdicts: AHashMap<String, bool>,
}

impl VerdictMap {
    /// Creates an empty verdict map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// OR-accumulates evidence for `function_name`.
    ///
    /// A function may have several candidate vectorization sites; it counts
    /// as vectorized if any one of them succeeded, so later `false`
    /// sightings never erase an earlier `true`.
    pub fn record(&mut self, function_name: &str, vectorized: bool) {
        *self
            .verdicts
            .entry(function_name.to_owned())
            .or_insert(false) |= vectorized;
    }

    /// Looks up a function's verdict, defaulting to `false` when unseen.
    #[must_use]
    pub fn is_vectorized(&self, function_name: &str) -> bool {
        self.verdicts.get(function_name).copied().unwrap_or(false)
    }

    /// Number of functions with recorded evidence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Whether no evidence has been recorded at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Number of functions with a positive verdict.
    #[must_use]
    pub fn vectorized_count(&self) -> usize {
        self.verdicts.values().filter(|v| **v).count()
    }

    /// Iterates over `(function_name, verdict)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.verdicts.iter().map(|(name, v)| (name.as_str(), *v))
    }
}
