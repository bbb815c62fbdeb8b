//! Script-based element lookups.
//!
//! JQuery and JavaScript locators cannot be handed to the native find
//! commands. They are evaluated with `execute_script` instead, and the
//! W3C element references in the result are decoded back into IDs.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::{By, Strategy};

use super::WebDriver;

// ============================================================================
// Constants
// ============================================================================

/// Key of the W3C web element reference object.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Document query used for JQuery locators.
///
/// Prefers Sizzle, then jQuery, then the native selector engine.
const QUERY_SCRIPT: &str = r#"
const selector = arguments[0];
if (typeof window.Sizzle === 'function') { return window.Sizzle(selector); }
if (typeof window.jQuery === 'function') { return window.jQuery(selector).toArray(); }
return Array.from(document.querySelectorAll(selector));
"#;

// ============================================================================
// Element References
// ============================================================================

/// Builds the W3C reference object for an element.
#[must_use]
pub fn element_reference(id: &ElementId) -> Value {
    json!({ ELEMENT_KEY: id.as_str() })
}

/// Extracts element IDs from a script result.
///
/// Accepts a single reference, an array of references, or `null`.
/// Non-element array entries are skipped.
pub fn decode_elements(value: &Value) -> Result<Vec<ElementId>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().filter_map(decode_reference).collect()),
        Value::Object(_) => decode_reference(value)
            .map(|id| vec![id])
            .ok_or_else(|| Error::script_error(format!("Script returned a non-element object: {value}"))),
        other => Err(Error::script_error(format!(
            "Script returned a non-element value: {other}"
        ))),
    }
}

fn decode_reference(value: &Value) -> Option<ElementId> {
    value.get(ELEMENT_KEY)?.as_str().map(ElementId::new)
}

// ============================================================================
// Lookup
// ============================================================================

/// Finds elements for a script-based selector from the document root.
///
/// # Errors
///
/// [`Error::Unsupported`] if `by` is not script based.
pub async fn find_elements(driver: &dyn WebDriver, by: &By) -> Result<Vec<ElementId>> {
    let value = match by.strategy() {
        Strategy::JQuery => {
            driver
                .execute_script(QUERY_SCRIPT, vec![Value::String(by.value().to_string())])
                .await?
        }
        Strategy::JavaScript => driver.execute_script(by.value(), Vec::new()).await?,
        other => {
            return Err(Error::unsupported(format!(
                "Script lookup with non-script strategy {other:?}"
            )));
        }
    };

    let ids = decode_elements(&value)?;
    debug!(locator = %by, found = ids.len(), "Script lookup finished");
    Ok(ids)
}

/// Finds the first element for a script-based selector.
///
/// # Errors
///
/// [`Error::ElementNotFound`] if the script returned no elements.
pub async fn find_element(driver: &dyn WebDriver, by: &By) -> Result<ElementId> {
    find_elements(driver, by)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::element_not_found(None, by.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
