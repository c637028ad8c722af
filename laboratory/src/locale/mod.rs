//! Localized message lookup.
//!
//! Translations are registered per key and [`Locale`] in a
//! [`TranslationRegistry`], aggregated by a [`GlobalTranslator`], and loaded
//! from `.properties` files by the [`TranslationManager`].

pub mod global;
pub mod manager;
pub mod message_format;
pub mod properties;
pub mod registry;
pub mod tag;
pub mod translator;

use thiserror::Error;

pub use global::GlobalTranslator;
pub use manager::TranslationManager;
pub use message_format::MessageFormat;
pub use registry::TranslationRegistry;
pub use tag::Locale;
pub use translator::{Translator, render};

/// Errors raised while registering or parsing translations.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation already exists: {key} for {locale}")]
    Duplicate { key: String, locale: Locale },

    #[error("invalid message format '{pattern}': {reason}")]
    InvalidFormat { pattern: String, reason: String },

    #[error("malformed properties at line {line}: {reason}")]
    MalformedProperties { line: usize, reason: String },

    #[error("invalid key (and {more} more)")]
    Multiple {
        #[source]
        first: Box<TranslationError>,
        more: usize,
    },

    #[error("the global translator cannot be its own source")]
    SelfSource,
}
