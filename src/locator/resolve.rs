//! Platform filtering and the field registry.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::platform::Platform;

use super::locate::{FieldLocators, Locate, Locator};

// ============================================================================
// Filtering
// ============================================================================

/// Selects the declarations closest to `platform`.
///
/// Walks the fallback chain from `platform` outward and stops at the first
/// level with at least one declaration. Returns that level and every
/// declaration on it, or `None` when the whole chain is empty.
#[must_use]
pub fn filter_by_platform(
    locates: &[Locate],
    platform: Platform,
) -> Option<(Platform, Vec<&Locate>)> {
    select_by_platform(locates, platform, |l| l.on)
}

/// [`filter_by_platform`] over any declaration that names its platform.
#[must_use]
pub fn select_by_platform<T>(
    items: &[T],
    platform: Platform,
    on: impl Fn(&T) -> Platform,
) -> Option<(Platform, Vec<&T>)> {
    platform.chain().find_map(|level| {
        let hits: Vec<&T> = items.iter().filter(|item| on(item) == level).collect();
        (!hits.is_empty()).then_some((level, hits))
    })
}

// ============================================================================
// LocatorRegistry
// ============================================================================

/// Field tables keyed by their `Owner#field` identifier.
///
/// Useful for resolving a whole page object at once, or for looking up a
/// field by name when it is only known at runtime.
#[derive(Debug, Clone, Default)]
pub struct LocatorRegistry {
    fields: FxHashMap<String, FieldLocators>,
}

impl LocatorRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field table, replacing any previous table with the same id.
    pub fn register(&mut self, field: FieldLocators) -> &mut Self {
        self.fields.insert(field.id(), field);
        self
    }

    /// Returns the table registered under `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FieldLocators> {
        self.fields.get(id)
    }

    /// Returns the number of registered fields.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves one registered field.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `id` is unknown, otherwise the errors of
    /// [`FieldLocators::resolve`].
    pub fn resolve(&self, id: &str, platform: Platform) -> Result<Locator> {
        self.get(id)
            .ok_or_else(|| Error::config(format!("No locators registered for field [{id}]")))?
            .resolve(platform)
    }

    /// Resolves every registered field, failing on the first bad table.
    pub fn resolve_all(&self, platform: Platform) -> Result<FxHashMap<String, Locator>> {
        debug!(%platform, fields = self.fields.len(), "Resolving registered locators");
        self.fields
            .iter()
            .map(|(id, field)| Ok((id.clone(), field.resolve(platform)?)))
            .collect()
    }
}

impl FromIterator<FieldLocators> for LocatorRegistry {
    fn from_iter<I: IntoIterator<Item = FieldLocators>>(iter: I) -> Self {
        let mut registry = Self::new();
        for field in iter {
            registry.register(field);
        }
        registry
    }
}

// ============================================================================
// Tests
// ============================================================================
