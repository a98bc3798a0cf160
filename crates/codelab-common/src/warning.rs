//! Deduplicated warnings for tolerated input.
//!
//! Exported documents are machine-generated and drift over time, so the
//! parser degrades unknown shapes to generic nodes instead of failing. Each
//! degradation is reported once per distinct message through `tracing`.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about tolerated input (emits once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("gdoc", "table with 3 cells flattened into paragraphs");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Clear all recorded warnings (call before parsing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Whether `component`/`message` has already been reported.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_message_once() {
        warn_once("test", "records_each_message_once");
        warn_once("test", "records_each_message_once");
        assert!(was_warned("test", "records_each_message_once"));
        assert!(!was_warned("test", "never emitted"));
    }
}
