//! Developer-facing diagnostics with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same notice multiple times.
//! Used by the css3 parser for conditions that are worth flagging but are not
//! part of a stylesheet's returned `parsing_errors` list (for example, a
//! duplicate at-rule handler registration silently overwriting the old one).

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output.
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of notices we've already printed (to deduplicate).
static NOTED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Emit a developer-facing notice about a non-fatal, non-data condition
/// (prints once per unique message).
///
/// # Example
/// ```ignore
/// note_once("css3", "at-rule handler for 'import' overwritten");
/// ```
///
/// # Panics
/// Panics if the global notice set mutex is poisoned.
pub fn note_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = NOTED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[{component}] note: {message}{RESET}");
    }
}

/// Clear all recorded notices (mainly useful between test runs or parses
/// that want a clean slate).
///
/// # Panics
/// Panics if the global notice set mutex is poisoned.
pub fn clear_notices() {
    let mut guard = NOTED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{clear_notices, note_once};

    #[test]
    fn dedupes_repeated_messages() {
        clear_notices();
        note_once("css3", "test message");
        note_once("css3", "test message");
        // No assertion beyond "doesn't panic" - the dedup set is process-global
        // and there's no public way to observe its size.
    }
}
