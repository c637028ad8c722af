//! The translation source abstraction.

use std::fmt::Display;

use super::{Locale, MessageFormat};

/// A source of message formats keyed by translation key and locale.
pub trait Translator: Send + Sync {
    /// Identifier of this source, for display to users.
    fn name(&self) -> &str;

    /// The message format for `key` in `locale`, or `None` to skip translation.
    fn translate(&self, key: &str, locale: &Locale) -> Option<MessageFormat>;
}

/// Render `key` with `args` through `translator`.
///
/// Without an explicit locale the system default is used, falling back to
/// English. Unknown keys render as the key itself.
pub fn render(
    translator: &dyn Translator,
    key: &str,
    locale: Option<&Locale>,
    args: &[&dyn Display],
) -> String {
    let locale = locale
        .cloned()
        .or_else(Locale::system_default)
        .unwrap_or_else(Locale::english);
    match translator.translate(key, &locale) {
        Some(format) => format.format(args),
        None => key.to_string(),
    }
}
