//! Fixture loader.
//!
//! Loads canned upstream payloads (Gemini, IGDB) from `fixtures/` at the
//! workspace root.

use std::path::{Path, PathBuf};

use serde_json::Value;

const FIXTURE_DIR: &str = "fixtures";

/// # Example
/// ```no_run
/// use playnext_testing::fixture::Fixture;
/// let val = Fixture::load("gemini/generate_content.json");
/// ```
pub struct Fixture;

impl Fixture {
    fn root() -> PathBuf {
        let start = std::env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap());
        start
            .ancestors()
            .find(|a| a.join(FIXTURE_DIR).is_dir())
            .unwrap_or(Path::new("."))
            .join(FIXTURE_DIR)
    }

    /// Read a fixture file as text. Panics if it is missing.
    pub fn text(relative_path: &str) -> String {
        let full_path = Self::root().join(relative_path);
        std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e))
    }

    /// Load and parse a JSON fixture. Panics if missing or invalid.
    pub fn load(relative_path: &str) -> Value {
        serde_json::from_str(&Self::text(relative_path))
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {}: {}", relative_path, e))
    }
}
