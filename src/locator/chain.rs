//! Ancestor locator chains.
//!
//! A nested element is found by walking its parents from the root down.
//! [`LocatorChain`] captures that walk as data: it renders the diagnostic
//! `a -> b -> c` form used in log and error messages, and composes the
//! single combined document query that JQuery locators need.

use std::fmt;

use crate::error::{Error, Result};

use super::locate::Locator;
use super::strategy::{By, Strategy};

// ============================================================================
// ChainLink
// ============================================================================

/// One locator in a chain, together with its format arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    locator: Locator,
    format_args: Vec<String>,
}

impl ChainLink {
    /// Creates a link.
    #[inline]
    #[must_use]
    pub fn new(locator: Locator, format_args: Vec<String>) -> Self {
        Self {
            locator,
            format_args,
        }
    }

    /// Returns the link's locator.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Returns the concrete selector of this link.
    #[must_use]
    pub fn by(&self) -> By {
        self.locator.by(&self.format_args)
    }
}

// ============================================================================
// LocatorChain
// ============================================================================

/// A target locator and its ancestors, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorChain {
    ancestors: Vec<ChainLink>,
    target: ChainLink,
}

impl LocatorChain {
    /// Creates a chain with no ancestors.
    #[must_use]
    pub fn new(target: ChainLink) -> Self {
        Self {
            ancestors: Vec::new(),
            target,
        }
    }

    /// Creates a chain from ancestors ordered root first.
    #[must_use]
    pub fn with_ancestors(ancestors: Vec<ChainLink>, target: ChainLink) -> Self {
        Self { ancestors, target }
    }

    /// Returns the number of ancestors.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Returns the ancestors, root first.
    #[inline]
    #[must_use]
    pub fn ancestors(&self) -> &[ChainLink] {
        &self.ancestors
    }

    /// Returns the target link.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &ChainLink {
        &self.target
    }

    /// Returns every selector in the chain, root first.
    #[must_use]
    pub fn by_chain(&self) -> Vec<By> {
        self.ancestors
            .iter()
            .chain(std::iter::once(&self.target))
            .map(ChainLink::by)
            .collect()
    }

    /// Composes the whole chain into one JQuery document query.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLocatorChain`] if a link is neither JQuery nor CSS.
    pub fn query_by(&self) -> Result<By> {
        let mut parts = Vec::with_capacity(self.ancestors.len() + 1);

        for link in &self.ancestors {
            let part = link.locator.query_string(&link.format_args).ok_or_else(|| {
                Error::invalid_locator_chain(format!(
                    "JQuery elements require either JQuery or CSS parents. Element [{}]. Parent [{}]",
                    self.target.by(),
                    link.by()
                ))
            })?;
            parts.push(part);
        }

        let own = self
            .target
            .locator
            .query_string(&self.target.format_args)
            .ok_or_else(|| {
                Error::invalid_locator_chain(format!(
                    "Element [{}] cannot be expressed as a document query",
                    self.target.by()
                ))
            })?;
        parts.push(own);

        Ok(By::new(Strategy::JQuery, parts.join(" ")))
    }
}

impl fmt::Display for LocatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .by_chain()
            .iter()
            .map(|by| format!("[{by}]"))
            .collect();
        f.write_str(&rendered.join(" -> "))
    }
}

// ============================================================================
// Tests
// ============================================================================
