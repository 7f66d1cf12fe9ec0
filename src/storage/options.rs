//! Behavior switches for a [`Store`](super::Store)

use serde::{Deserialize, Serialize};

/// What `get_hex` does with a string entry that lacks the `0x` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexPrefix {
    /// Return 0 without recording anything
    #[default]
    Lenient,
    /// Return 0 and record a Normal error
    Strict,
}

/// How failed Point/Rect components are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentErrors {
    /// One error naming every failed component
    #[default]
    Aggregate,
    /// One error per failed component
    PerComponent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Emit `# comment` lines above entries that have one
    pub write_comments: bool,

    /// Errors listed by `error_message` before the rest are summarized
    pub max_reported_errors: usize,

    pub hex_prefix: HexPrefix,

    pub component_errors: ComponentErrors,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            write_comments: true,
            max_reported_errors: 5,
            hex_prefix: HexPrefix::default(),
            component_errors: ComponentErrors::default(),
        }
    }
}
