//! Loading of bundled and user-supplied translations.
//!
//! User files live in the translations directory as `<locale>.properties`
//! (e.g. `fr_CA.properties`). They are registered before the bundled English
//! file, so the first registration of a key/locale pair wins.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, warn};

use super::{GlobalTranslator, Locale, TranslationRegistry, Translator, properties};

/// Name of the registry that holds Laboratory's own messages.
pub const REGISTRY_NAME: &str = "laboratory";

const BUNDLED_TRANSLATIONS: &str = include_str!("../../resources/laboratory.properties");
const TRANSLATION_EXTENSION: &str = "properties";

/// The locale of the bundled translations.
pub fn default_locale() -> Locale {
    Locale::english()
}

pub struct TranslationManager {
    translations_dir: PathBuf,
    installed: BTreeSet<Locale>,
    registry: Option<Arc<TranslationRegistry>>,
}

impl TranslationManager {
    /// Create a manager reading from `translations_dir`, creating it if needed.
    pub fn new(translations_dir: impl Into<PathBuf>) -> Self {
        let translations_dir = translations_dir.into();
        if let Err(err) = fs::create_dir_all(&translations_dir) {
            warn!(path = %translations_dir.display(), error = %err, "could not create translations directory");
        }
        Self {
            translations_dir,
            installed: BTreeSet::new(),
            registry: None,
        }
    }

    pub fn translations_dir(&self) -> &Path {
        &self.translations_dir
    }

    /// Locales loaded from the translations directory.
    pub fn installed_locales(&self) -> &BTreeSet<Locale> {
        &self.installed
    }

    /// The registry built by the last [`reload`](Self::reload).
    pub fn registry(&self) -> Option<&Arc<TranslationRegistry>> {
        self.registry.as_ref()
    }

    /// Rebuild the registry and (re-)register it with `global`.
    pub fn reload(&mut self, global: &GlobalTranslator) -> Result<()> {
        if let Some(previous) = self.registry.take() {
            let previous: Arc<dyn Translator> = previous;
            global.remove_source(&previous);
            self.installed.clear();
        }

        let registry = Arc::new(TranslationRegistry::new(REGISTRY_NAME));
        registry.set_default_locale(default_locale());

        let dir = self.translations_dir.clone();
        self.load_from_file_system(&registry, &dir);
        load_bundled(&registry);

        global
            .add_source(registry.clone())
            .context("register translations")?;
        info!(installed = self.installed.len(), "translations reloaded");
        self.registry = Some(registry);
        Ok(())
    }

    fn load_from_file_system(&mut self, registry: &TranslationRegistry, directory: &Path) {
        let files = match list_translation_files(directory) {
            Ok(files) => files,
            Err(err) => {
                debug!(path = %directory.display(), error = %err, "no translation files");
                return;
            }
        };

        let mut loaded = BTreeMap::new();
        for file in files {
            match self.load_translation_file(registry, &file) {
                Ok((locale, entries)) => {
                    loaded.insert(locale, entries);
                }
                Err(err) => {
                    warn!(file = %file.display(), error = %format!("{err:#}"), "error loading locale file");
                }
            }
        }

        // Register a language-only alias unless one is already installed.
        for (locale, entries) in &loaded {
            let language = locale.without_country();
            if *locale != language
                && language != default_locale()
                && self.installed.insert(language.clone())
                && let Err(err) = registry.register_all(&language, entries, false)
            {
                debug!(locale = %language, error = %err, "partial language alias");
            }
        }
    }

    fn load_translation_file(
        &mut self,
        registry: &TranslationRegistry,
        file: &Path,
    ) -> Result<(Locale, BTreeMap<String, String>)> {
        let stem = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let locale = Locale::parse(stem)
            .ok_or_else(|| anyhow!("unknown locale '{stem}' - unable to register"))?;

        let contents =
            fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        let entries =
            properties::parse(&contents).with_context(|| format!("parse {}", file.display()))?;
        registry
            .register_all(&locale, &entries, false)
            .with_context(|| format!("register {}", file.display()))?;

        self.installed.insert(locale.clone());
        Ok((locale, entries))
    }
}

/// Whether `path` names a translation file.
pub fn is_translation_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == TRANSLATION_EXTENSION)
}

fn list_translation_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(directory).with_context(|| format!("read dir {}", directory.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_translation_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A standalone registry holding only the bundled English translations.
pub fn bundled_registry() -> TranslationRegistry {
    let registry = TranslationRegistry::new(REGISTRY_NAME);
    registry.set_default_locale(default_locale());
    load_bundled(&registry);
    registry
}

fn load_bundled(registry: &TranslationRegistry) {
    let result = properties::parse(BUNDLED_TRANSLATIONS)
        .and_then(|entries| registry.register_all(&default_locale(), &entries, false));
    if let Err(err) = result {
        warn!(error = %err, "error loading default locale file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS_KEY: &str = "laboratory.duration.unit.years.plural";

    #[test]
    fn bundled_translations_are_registered() {
        let temp = tempfile::tempdir().expect("tempdir");
        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(temp.path().join("translations"));
        manager.reload(&global).expect("reload");

        assert!(manager.installed_locales().is_empty());
        let out = global.render(YEARS_KEY, Some(&Locale::english()), &[&3]);
        assert_eq!(out, "3 years");
    }

    #[test]
    fn new_creates_translations_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("nested").join("translations");
        let manager = TranslationManager::new(&dir);
        assert!(dir.is_dir());
        assert_eq!(manager.translations_dir(), dir.as_path());
    }

    #[test]
    fn user_file_overrides_bundled_english() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("translations");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(dir.join("en.properties"), format!("{YEARS_KEY}={{0}} summers\n")).expect("write");

        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(&dir);
        manager.reload(&global).expect("reload");

        assert_eq!(global.render(YEARS_KEY, Some(&Locale::english()), &[&2]), "2 summers");
    }

    #[test]
    fn country_file_installs_language_alias() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("translations");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(dir.join("fr_CA.properties"), format!("{YEARS_KEY}={{0}} ans\n")).expect("write");

        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(&dir);
        manager.reload(&global).expect("reload");

        let installed: Vec<String> = manager
            .installed_locales()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(installed, vec!["fr", "fr_CA"]);
        let fr = Locale::language_only("fr");
        assert_eq!(global.render(YEARS_KEY, Some(&fr), &[&4]), "4 ans");
    }

    #[test]
    fn english_country_file_installs_no_english_alias() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("translations");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(dir.join("en_GB.properties"), format!("{YEARS_KEY}={{0}} yonks\n")).expect("write");

        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(&dir);
        manager.reload(&global).expect("reload");

        let installed: Vec<String> = manager
            .installed_locales()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(installed, vec!["en_GB"]);
        let en_gb = Locale::parse("en_GB").expect("locale");
        assert_eq!(global.render(YEARS_KEY, Some(&en_gb), &[&2]), "2 yonks");
        assert_eq!(global.render(YEARS_KEY, Some(&Locale::english()), &[&2]), "2 years");
    }

    #[test]
    fn language_file_wins_over_country_alias() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("translations");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(dir.join("fr.properties"), format!("{YEARS_KEY}={{0}} années\n")).expect("write");
        fs::write(dir.join("fr_CA.properties"), format!("{YEARS_KEY}={{0}} ans\n")).expect("write");

        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(&dir);
        manager.reload(&global).expect("reload");

        assert_eq!(manager.installed_locales().len(), 2);
        let fr = Locale::language_only("fr");
        let fr_ca = Locale::parse("fr_CA").expect("locale");
        assert_eq!(global.render(YEARS_KEY, Some(&fr), &[&4]), "4 années");
        assert_eq!(global.render(YEARS_KEY, Some(&fr_ca), &[&4]), "4 ans");
    }

    #[test]
    fn broken_file_is_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("translations");
        fs::create_dir_all(&dir).expect("dir");
        fs::write(dir.join("de.properties"), "bad={\n").expect("write");
        fs::write(dir.join("notes.txt"), "ignored").expect("write");

        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(&dir);
        manager.reload(&global).expect("reload");

        assert!(manager.installed_locales().is_empty());
    }

    #[test]
    fn reload_replaces_previous_registry() {
        let temp = tempfile::tempdir().expect("tempdir");
        let global = GlobalTranslator::new();
        let mut manager = TranslationManager::new(temp.path().join("translations"));
        manager.reload(&global).expect("first");
        manager.reload(&global).expect("second");
        assert_eq!(global.sources().len(), 1);
    }

    #[test]
    fn translation_file_detection() {
        assert!(is_translation_file(Path::new("translations/en_US.properties")));
        assert!(!is_translation_file(Path::new("translations/en_US.json")));
        assert!(!is_translation_file(Path::new("translations/properties")));
    }
}
