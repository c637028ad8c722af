//! JSON encoding shared by storage and the CLI.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Output layout for serialized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    Compact,
    /// Two-space indentation with a trailing newline.
    #[default]
    Pretty,
}

pub fn to_string<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> serde_json::Result<String> {
    match style {
        JsonStyle::Compact => serde_json::to_string(value),
        JsonStyle::Pretty => {
            let mut buf = serde_json::to_string_pretty(value)?;
            buf.push('\n');
            Ok(buf)
        }
    }
}

pub fn from_str<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    serde_json::from_str(text)
}
