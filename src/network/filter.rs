//! Adapter filtering for selective reporting.
//!
//! # Design
//!
//! - **Pure Matchers**: [`FlagFilter`] and [`NameRegexFilter`] only answer
//!   "does this adapter match?" without include/exclude semantics.
//! - **Filter Chain**: [`FilterChain`] combines matchers with correct semantics:
//!   - Exclude filters: AND logic (must pass ALL excludes)
//!   - Include filters: OR logic (pass ANY include, empty = match all)

use std::collections::HashSet;

use regex::Regex;

use super::Adapter;

/// Trait for filtering classified adapters.
///
/// Filters must be `Send + Sync` so a builder holding one can be moved
/// onto a blocking task.
pub trait AdapterFilter: Send + Sync {
    /// Returns `true` if the adapter matches.
    fn matches(&self, adapter: &Adapter) -> bool;
}

// ============================================================================
// FlagFilter - Pure matcher by link-layer flag
// ============================================================================

/// A link-layer property an adapter can be matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterFlag {
    /// Loopback interface.
    Loopback,
    /// Virtual (alias or tunnel) interface.
    Virtual,
    /// Interface that is administratively or operationally down.
    Down,
}

impl AdapterFlag {
    const fn is_set(self, adapter: &Adapter) -> bool {
        match self {
            Self::Loopback => adapter.is_loopback(),
            Self::Virtual => adapter.is_virtual(),
            Self::Down => !adapter.is_up(),
        }
    }
}

/// Matches adapters that carry any of the configured flags.
///
/// # Examples
///
/// ```
/// use netsnap::network::filter::{AdapterFilter, AdapterFlag, FlagFilter};
/// use netsnap::network::{Adapter, RawInterface};
///
/// let filter = FlagFilter::new([AdapterFlag::Loopback]);
///
/// let mut lo = RawInterface::new("lo", vec![]);
/// lo.is_loopback = true;
///
/// assert!(filter.matches(&Adapter::aggregate(lo, None)));
/// assert!(!filter.matches(&Adapter::aggregate(RawInterface::new("eth0", vec![]), None)));
/// ```
#[derive(Debug, Clone)]
pub struct FlagFilter {
    flags: HashSet<AdapterFlag>,
}

impl FlagFilter {
    /// Creates a flag filter matching any of the specified flags.
    #[must_use]
    pub fn new(flags: impl IntoIterator<Item = AdapterFlag>) -> Self {
        Self {
            flags: flags.into_iter().collect(),
        }
    }

    /// Returns true if no flags are configured (matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }
}

impl AdapterFilter for FlagFilter {
    fn matches(&self, adapter: &Adapter) -> bool {
        self.flags.iter().any(|flag| flag.is_set(adapter))
    }
}

// ============================================================================
// NameRegexFilter - Pure matcher by name pattern
// ============================================================================

/// Matches adapters whose name matches a regex.
#[derive(Debug)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a name filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl AdapterFilter for NameRegexFilter {
    fn matches(&self, adapter: &Adapter) -> bool {
        self.pattern.is_match(adapter.name())
    }
}

// ============================================================================
// FilterChain - Include OR / Exclude AND semantics
// ============================================================================

/// Filter chain with include/exclude semantics.
///
/// Evaluation order:
/// 1. **Exclude filters**: any match rejects the adapter.
/// 2. **Include filters**: any match accepts. Empty includes = match all.
#[derive(Default)]
pub struct FilterChain {
    includes: Vec<Box<dyn AdapterFilter>>,
    excludes: Vec<Box<dyn AdapterFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all adapters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include filter (OR semantics).
    #[must_use]
    pub fn include<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.includes.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter (rejects on ANY match).
    #[must_use]
    pub fn exclude<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }

    #[must_use]
    pub fn include_count(&self) -> usize {
        self.includes.len()
    }

    #[must_use]
    pub fn exclude_count(&self) -> usize {
        self.excludes.len()
    }

    /// Total number of filters in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.includes.len() + self.excludes.len()
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

impl AdapterFilter for FilterChain {
    fn matches(&self, adapter: &Adapter) -> bool {
        if self.excludes.iter().any(|f| f.matches(adapter)) {
            return false;
        }

        self.includes.is_empty() || self.includes.iter().any(|f| f.matches(adapter))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("include_count", &self.includes.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}

impl<T: AdapterFilter + ?Sized> AdapterFilter for &T {
    fn matches(&self, adapter: &Adapter) -> bool {
        (*self).matches(adapter)
    }
}

impl AdapterFilter for Box<dyn AdapterFilter> {
    fn matches(&self, adapter: &Adapter) -> bool {
        self.as_ref().matches(adapter)
    }
}
