//! Language/country/variant identifiers.

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

/// A locale in `language[_COUNTRY[_variant]]` form.
///
/// Language is stored lowercase and country uppercase, so `en_us` and
/// `EN_US` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    pub fn new(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.trim().to_lowercase(),
            country: country.trim().to_uppercase(),
            variant: variant.trim().to_string(),
        }
    }

    /// A locale with only a language code.
    pub fn language_only(language: &str) -> Self {
        Self::new(language, "", "")
    }

    pub fn english() -> Self {
        Self::language_only("en")
    }

    /// `en_US`, the initial default of every registry.
    pub fn us() -> Self {
        Self::new("en", "US", "")
    }

    /// Parse `language`, `language_COUNTRY` or `language_COUNTRY_variant`.
    ///
    /// Returns `None` for an empty language segment.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = raw.trim().splitn(3, '_');
        let language = segments.next().unwrap_or_default();
        if language.is_empty() {
            return None;
        }
        let country = segments.next().unwrap_or_default();
        let variant = segments.next().unwrap_or_default();
        Some(Self::new(language, country, variant))
    }

    /// The locale configured for the process (`LC_ALL`, `LC_MESSAGES`, `LANG`).
    ///
    /// Encoding and modifier suffixes (`.UTF-8`, `@euro`) are dropped; the
    /// `C` and `POSIX` locales yield `None`.
    pub fn system_default() -> Option<Self> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .and_then(|value| Self::from_posix(&value))
    }

    fn from_posix(value: &str) -> Option<Self> {
        let name = value.split(['.', '@']).next().unwrap_or_default();
        if name.is_empty() || name == "C" || name == "POSIX" {
            return None;
        }
        Self::parse(name)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// This locale reduced to its language.
    pub fn without_country(&self) -> Self {
        Self::language_only(&self.language)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow!("unknown locale '{s}'"))
    }
}
