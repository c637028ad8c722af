//! Aggregation of translation sources.

use std::fmt::Display;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::{Locale, MessageFormat, TranslationError, Translator, render};

const NAME: &str = "global";

static GLOBAL: LazyLock<GlobalTranslator> = LazyLock::new(GlobalTranslator::new);

/// An ordered set of translation sources queried in registration order.
#[derive(Default)]
pub struct GlobalTranslator {
    sources: RwLock<Vec<Arc<dyn Translator>>>,
}

impl GlobalTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance.
    pub fn global() -> &'static GlobalTranslator {
        &GLOBAL
    }

    /// Add a source. Returns `false` if it is already registered.
    pub fn add_source(&self, source: Arc<dyn Translator>) -> Result<bool, TranslationError> {
        if std::ptr::addr_eq(Arc::as_ptr(&source), self as *const Self) {
            return Err(TranslationError::SelfSource);
        }
        let mut sources = self.sources.write().unwrap_or_else(PoisonError::into_inner);
        if sources.iter().any(|known| same_source(known, &source)) {
            return Ok(false);
        }
        sources.push(source);
        Ok(true)
    }

    /// Remove a source. Returns `false` if it was not registered.
    pub fn remove_source(&self, source: &Arc<dyn Translator>) -> bool {
        let mut sources = self.sources.write().unwrap_or_else(PoisonError::into_inner);
        let before = sources.len();
        sources.retain(|known| !same_source(known, source));
        sources.len() != before
    }

    pub fn sources(&self) -> Vec<Arc<dyn Translator>> {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Render `key` through every source; see [`render`].
    pub fn render(&self, key: &str, locale: Option<&Locale>, args: &[&dyn Display]) -> String {
        render(self, key, locale, args)
    }
}

fn same_source(a: &Arc<dyn Translator>, b: &Arc<dyn Translator>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl Translator for GlobalTranslator {
    fn name(&self) -> &str {
        NAME
    }

    fn translate(&self, key: &str, locale: &Locale) -> Option<MessageFormat> {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find_map(|source| source.translate(key, locale))
    }
}
