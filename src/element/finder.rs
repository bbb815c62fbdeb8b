//! Native lookups shared by lazy elements and lists.
//!
//! Dispatches between the driver's own search and script-based lookups,
//! applies locator indexes, and polls the document for presence.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use crate::context::PageObjectContext;
use crate::driver::{NativeElement, SearchScope, script};
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::By;
use crate::sync::Wait;

// ============================================================================
// Single Lookups
// ============================================================================

/// Finds one element within `scope`, picking `index` when set.
pub(crate) async fn find_one(
    context: &PageObjectContext,
    scope: SearchScope<'_>,
    by: &By,
    index: Option<usize>,
    variable: Option<&str>,
) -> Result<NativeElement> {
    let id = match index {
        None if by.strategy().is_script_based() => {
            script::find_element(context.driver().as_ref(), by).await?
        }
        None => context.driver().find_element(scope, by).await?,
        Some(index) => find_ids(context, scope, by)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::element_not_found(variable, format!("{by} [{index}]")))?,
    };
    Ok(wrap(context, id))
}

/// Finds every element within `scope`.
pub(crate) async fn find_all(
    context: &PageObjectContext,
    scope: SearchScope<'_>,
    by: &By,
) -> Result<Vec<NativeElement>> {
    let ids = find_ids(context, scope, by).await?;
    Ok(ids.into_iter().map(|id| wrap(context, id)).collect())
}

async fn find_ids(context: &PageObjectContext, scope: SearchScope<'_>, by: &By) -> Result<Vec<ElementId>> {
    if by.strategy().is_script_based() {
        script::find_elements(context.driver().as_ref(), by).await
    } else {
        context.driver().find_elements(scope, by).await
    }
}

fn wrap(context: &PageObjectContext, id: ElementId) -> NativeElement {
    NativeElement::new(id, Arc::clone(context.driver()))
}

// ============================================================================
// Document Lookups
// ============================================================================

/// Finds one element from the document root, polling for presence.
///
/// A zero timeout is a single lookup.
///
/// # Errors
///
/// [`Error::ElementNotFound`] naming `variable` once the wait elapses.
pub(crate) async fn find_in_document(
    context: &PageObjectContext,
    by: &By,
    index: Option<usize>,
    variable: Option<&str>,
    wait: Wait,
) -> Result<NativeElement> {
    if wait.is_none() {
        return find_one(context, SearchScope::Document, by, index, variable).await;
    }

    let found = wait
        .until(|| async move {
            find_one(context, SearchScope::Document, by, index, variable)
                .await
                .map(Some)
        })
        .await?;

    found.ok_or_else(|| {
        let locator = match index {
            Some(index) => format!("{by} [{index}]"),
            None => by.to_string(),
        };
        Error::element_not_found(variable, locator)
    })
}

/// Finds every element from the document root, polling until at least one
/// is present.
///
/// Returns an empty vector when nothing appeared before the wait elapsed.
pub(crate) async fn find_all_in_document(
    context: &PageObjectContext,
    by: &By,
    wait: Wait,
) -> Result<Vec<NativeElement>> {
    let found = wait
        .until(|| async move {
            let elements = find_all(context, SearchScope::Document, by).await?;
            Ok((!elements.is_empty()).then_some(elements))
        })
        .await?;
    Ok(found.unwrap_or_default())
}

// ============================================================================
// Tests
// ============================================================================
