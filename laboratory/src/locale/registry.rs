//! Per-key, per-locale translation storage.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use tracing::debug;

use super::{Locale, MessageFormat, TranslationError, Translator, properties};

/// A registry of translations, usable directly or as a source of a
/// [`GlobalTranslator`](super::GlobalTranslator).
///
/// Lookups fall back from the exact locale to its language, then to the
/// registry default locale, then to the system default locale.
#[derive(Debug)]
pub struct TranslationRegistry {
    name: String,
    translations: RwLock<HashMap<String, HashMap<Locale, MessageFormat>>>,
    default_locale: RwLock<Locale>,
}

impl TranslationRegistry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translations: RwLock::new(HashMap::new()),
            default_locale: RwLock::new(Locale::us()),
        }
    }

    /// Register a single translation. A second format for the same key and
    /// locale is rejected.
    pub fn register(
        &self,
        key: &str,
        locale: &Locale,
        format: MessageFormat,
    ) -> Result<(), TranslationError> {
        let mut translations = self
            .translations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let formats = translations.entry(key.to_string()).or_default();
        if formats.contains_key(locale) {
            return Err(TranslationError::Duplicate {
                key: key.to_string(),
                locale: locale.clone(),
            });
        }
        formats.insert(locale.clone(), format);
        Ok(())
    }

    /// Register raw patterns for `locale`, e.g. the entries of a `.properties`
    /// file. With `escape_single_quotes`, every `'` is treated literally.
    ///
    /// Every entry is attempted; a single failure is returned as is, several
    /// are folded into [`TranslationError::Multiple`].
    pub fn register_all<I, K, V>(
        &self,
        locale: &Locale,
        entries: I,
        escape_single_quotes: bool,
    ) -> Result<(), TranslationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.register_each(
            locale,
            entries.into_iter().map(|(key, pattern)| {
                let pattern = if escape_single_quotes {
                    pattern.as_ref().replace('\'', "''")
                } else {
                    pattern.as_ref().to_string()
                };
                (key.as_ref().to_string(), MessageFormat::parse(&pattern))
            }),
        )
    }

    /// Register already-parsed formats for `locale`.
    pub fn register_formats<I>(&self, locale: &Locale, formats: I) -> Result<(), TranslationError>
    where
        I: IntoIterator<Item = (String, MessageFormat)>,
    {
        self.register_each(
            locale,
            formats.into_iter().map(|(key, format)| (key, Ok(format))),
        )
    }

    /// Register the contents of a `.properties` file for `locale`.
    pub fn register_file(&self, locale: &Locale, path: &Path, escape_single_quotes: bool) -> Result<()> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let entries =
            properties::parse(&contents).with_context(|| format!("parse {}", path.display()))?;
        self.register_all(locale, &entries, escape_single_quotes)
            .with_context(|| format!("register {}", path.display()))?;
        Ok(())
    }

    fn register_each<I>(&self, locale: &Locale, entries: I) -> Result<(), TranslationError>
    where
        I: Iterator<Item = (String, Result<MessageFormat, TranslationError>)>,
    {
        let mut first_error = None;
        let mut error_count = 0usize;
        for (key, format) in entries {
            let result = format.and_then(|format| self.register(&key, locale, format));
            if let Err(err) = result {
                debug!(key = %key, locale = %locale, error = %err, "translation rejected");
                first_error.get_or_insert(err);
                error_count += 1;
            }
        }
        match first_error {
            None => Ok(()),
            Some(first) if error_count == 1 => Err(first),
            Some(first) => Err(TranslationError::Multiple {
                first: Box::new(first),
                more: error_count - 1,
            }),
        }
    }

    pub fn unregister(&self, key: &str) {
        self.translations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Whether any translation is registered for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.translations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_default_locale(&self, locale: Locale) {
        *self
            .default_locale
            .write()
            .unwrap_or_else(PoisonError::into_inner) = locale;
    }
}

impl Translator for TranslationRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn translate(&self, key: &str, locale: &Locale) -> Option<MessageFormat> {
        let translations = self
            .translations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let formats = translations.get(key)?;
        formats
            .get(locale)
            .or_else(|| formats.get(&locale.without_country()))
            .or_else(|| formats.get(&self.default_locale()))
            .or_else(|| Locale::system_default().and_then(|system| formats.get(&system)))
            .cloned()
    }
}
