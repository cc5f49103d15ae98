//! Persisted settings store.
//!
//! All configuration lives in one JSON document (by default under the user
//! config directory). Every setter rewrites the whole document and notifies
//! subscribers; concurrent writers are not reconciled: last write wins,
//! consistent with the rest of the system's overwrite-never-merge convention.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{PosteaError, Result};
use crate::languages::migrate_language_value;
use crate::model::{self, ModelRef, ProviderSettings};
use crate::prompts::{Prompt, now_millis, system_prompts};
use crate::reader::ParserKind;

/// Fallback output language when none has been chosen.
pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

const DEFAULT_DIR: &str = "postea";
const SETTINGS_FILE: &str = "settings.json";

/// The on-disk settings document. Every field has a default so older files
/// keep loading as keys are added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SettingsDocument {
    server_url: String,
    parser: ParserKind,
    default_target_language: Option<String>,
    user_prompts: Vec<Prompt>,
    /// `None` means the user never touched the toggle list, in which case
    /// every built-in prompt counts as enabled.
    enabled_system_prompts: Option<Vec<String>>,
    shortcuts_enabled: Option<bool>,
    selected_model_id: Option<String>,
    default_provider: Option<String>,
    providers: BTreeMap<String, ProviderSettings>,
}

/// The prompt-related slice of settings, as read and written by settings
/// panels: target language, the merged prompt list, and the server-shortcuts
/// flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptsSettings {
    pub default_target_language: String,
    pub prompts: Vec<Prompt>,
    pub shortcuts_enabled: bool,
}

type Observer = Box<dyn Fn(&str) + Send + Sync>;

/// Process-wide configuration repository backed by one JSON file.
///
/// Reads are served from memory after the initial load; writes persist the
/// full document and then invoke every subscriber with the changed key name.
pub struct SettingsStore {
    path: PathBuf,
    doc: Mutex<SettingsDocument>,
    observers: Mutex<Vec<Observer>>,
}

impl SettingsStore {
    /// Opens the store at the default per-user location.
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| PosteaError::Settings("could not determine the user config directory".to_string()))?;
        Self::open(base.join(DEFAULT_DIR).join(SETTINGS_FILE))
    }

    /// Opens the store at an explicit path. A missing file yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| PosteaError::Settings(format!("{}: {e}", path.display())))?
        } else {
            SettingsDocument::default()
        };

        Ok(Self { path, doc: Mutex::new(doc), observers: Mutex::new(Vec::new()) })
    }

    /// Where this store persists its document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registers a change listener, invoked with the key name after every
    /// successful write.
    pub fn subscribe(&self, observer: impl Fn(&str) + Send + Sync + 'static) {
        self.observers.lock().unwrap().push(Box::new(observer));
    }

    fn persist(&self, key: &str) -> Result<()> {
        {
            let doc = self.doc.lock().unwrap();
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, serde_json::to_string_pretty(&*doc)?)?;
        }
        for observer in self.observers.lock().unwrap().iter() {
            observer(key);
        }
        Ok(())
    }

    /// The configured server URL, if one has been saved.
    pub fn server_url(&self) -> Option<String> {
        let doc = self.doc.lock().unwrap();
        if doc.server_url.is_empty() { None } else { Some(doc.server_url.clone()) }
    }

    pub fn set_server_url(&self, url: &str) -> Result<()> {
        self.doc.lock().unwrap().server_url = url.trim_end_matches('/').to_string();
        self.persist("serverUrl")
    }

    pub fn parser(&self) -> ParserKind {
        self.doc.lock().unwrap().parser
    }

    pub fn set_parser(&self, parser: ParserKind) -> Result<()> {
        self.doc.lock().unwrap().parser = parser;
        self.persist("parser")
    }

    /// Default output language, migrating legacy stored values.
    pub fn default_target_language(&self) -> String {
        let doc = self.doc.lock().unwrap();
        match doc.default_target_language.as_deref() {
            Some(stored) => migrate_language_value(stored).to_string(),
            None => DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }

    pub fn set_default_target_language(&self, language: &str) -> Result<()> {
        self.doc.lock().unwrap().default_target_language = Some(language.to_string());
        self.persist("defaultTargetLanguage")
    }

    pub fn shortcuts_enabled(&self) -> bool {
        self.doc.lock().unwrap().shortcuts_enabled.unwrap_or(true)
    }

    pub fn set_shortcuts_enabled(&self, enabled: bool) -> Result<()> {
        self.doc.lock().unwrap().shortcuts_enabled = Some(enabled);
        self.persist("shortcutsEnabled")
    }

    pub fn selected_model_id(&self) -> Option<String> {
        self.doc.lock().unwrap().selected_model_id.clone()
    }

    pub fn set_selected_model_id(&self, model_id: &str) -> Result<()> {
        self.doc.lock().unwrap().selected_model_id = Some(model_id.to_string());
        self.persist("selectedModelId")
    }

    pub fn default_provider(&self) -> Option<String> {
        self.doc.lock().unwrap().default_provider.clone()
    }

    pub fn set_default_provider(&self, provider: Option<&str>) -> Result<()> {
        self.doc.lock().unwrap().default_provider = provider.map(str::to_string);
        self.persist("defaultProvider")
    }

    pub fn providers(&self) -> BTreeMap<String, ProviderSettings> {
        self.doc.lock().unwrap().providers.clone()
    }

    pub fn provider(&self, key: &str) -> Option<ProviderSettings> {
        self.doc.lock().unwrap().providers.get(key).cloned()
    }

    pub fn set_provider(&self, key: &str, provider: ProviderSettings) -> Result<()> {
        self.doc.lock().unwrap().providers.insert(key.to_string(), provider);
        self.persist("providers")
    }

    /// The selectable model list derived from current settings.
    pub fn available_models(&self) -> Vec<ModelRef> {
        let doc = self.doc.lock().unwrap();
        model::available_models(
            !doc.server_url.is_empty(),
            doc.shortcuts_enabled.unwrap_or(true),
            &doc.providers,
        )
    }

    /// The model a dispatch should use, applying the saved-id → default
    /// provider → first-model fallback chain.
    pub fn selected_model(&self) -> Option<ModelRef> {
        let models = self.available_models();
        let doc = self.doc.lock().unwrap();
        model::resolve_selected_model(doc.selected_model_id.as_deref(), &models, doc.default_provider.as_deref())
    }

    /// Assembles the prompt slice: built-ins regenerated for the stored
    /// target language with their persisted enabled state (all enabled when
    /// never set), followed by user prompts.
    pub fn prompts_settings(&self) -> PromptsSettings {
        let language = self.default_target_language();
        let doc = self.doc.lock().unwrap();

        let mut prompts = system_prompts(&language);
        if let Some(enabled_ids) = &doc.enabled_system_prompts {
            for prompt in &mut prompts {
                prompt.enabled = enabled_ids.iter().any(|id| id == &prompt.id);
            }
        }
        prompts.extend(doc.user_prompts.iter().cloned());

        PromptsSettings {
            default_target_language: language,
            prompts,
            shortcuts_enabled: doc.shortcuts_enabled.unwrap_or(true),
        }
    }

    /// Persists a prompt slice, storing only what cannot be regenerated:
    /// user prompts verbatim plus the ids of enabled built-ins.
    pub fn save_prompts_settings(&self, settings: &PromptsSettings) -> Result<()> {
        {
            let mut doc = self.doc.lock().unwrap();
            doc.default_target_language = Some(settings.default_target_language.clone());
            doc.user_prompts = settings.prompts.iter().filter(|p| !p.is_system).cloned().collect();
            doc.enabled_system_prompts = Some(
                settings
                    .prompts
                    .iter()
                    .filter(|p| p.is_system && p.enabled)
                    .map(|p| p.id.clone())
                    .collect(),
            );
            doc.shortcuts_enabled = Some(settings.shortcuts_enabled);
        }
        self.persist("prompts")
    }

    /// Appends a user prompt and persists.
    pub fn add_user_prompt(&self, name: &str, content: &str, target_language: &str) -> Result<Prompt> {
        let now = now_millis();
        let prompt = Prompt {
            id: format!("user_{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            content: content.to_string(),
            target_language: target_language.to_string(),
            enabled: true,
            is_system: false,
            created_at: now,
            updated_at: now,
        };
        self.doc.lock().unwrap().user_prompts.push(prompt.clone());
        self.persist("userPrompts")?;
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::BUILTIN_PROMPT_IDS;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("settings.json")).unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.server_url().is_none());
        assert_eq!(store.parser(), ParserKind::Readability);
        assert_eq!(store.default_target_language(), "English");
        assert!(store.shortcuts_enabled());
        assert!(store.selected_model_id().is_none());
    }

    #[test]
    fn test_write_then_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = store_in(&dir);
            store.set_server_url("https://postea.example.com/").unwrap();
            store.set_parser(ParserKind::Density).unwrap();
            store.set_selected_model_id("acme:fast-1").unwrap();
        }

        let store = store_in(&dir);
        // Trailing slash is normalized away on write.
        assert_eq!(store.server_url().as_deref(), Some("https://postea.example.com"));
        assert_eq!(store.parser(), ParserKind::Density);
        assert_eq!(store.selected_model_id().as_deref(), Some("acme:fast-1"));
    }

    #[test]
    fn test_system_prompts_default_enabled_when_never_set() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let settings = store.prompts_settings();
        let builtins: Vec<_> = settings.prompts.iter().filter(|p| p.is_system).collect();
        assert_eq!(builtins.len(), BUILTIN_PROMPT_IDS.len());
        assert!(builtins.iter().all(|p| p.enabled));
    }

    #[test]
    fn test_prompts_round_trip_preserves_enabled_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut settings = store.prompts_settings();
        settings.default_target_language = "Japanese".to_string();
        for prompt in &mut settings.prompts {
            if prompt.id == "builtin_translate" || prompt.id == "builtin_explain" {
                prompt.enabled = false;
            }
        }
        store.save_prompts_settings(&settings).unwrap();

        let reloaded = store_in(&dir).prompts_settings();
        assert_eq!(reloaded.default_target_language, "Japanese");
        for prompt in reloaded.prompts.iter().filter(|p| p.is_system) {
            let expect_disabled = prompt.id == "builtin_translate" || prompt.id == "builtin_explain";
            assert_eq!(prompt.enabled, !expect_disabled, "prompt {}", prompt.id);
        }
    }

    #[test]
    fn test_user_prompts_survive_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let prompt = store.add_user_prompt("ELI5", "Explain like I am five.\n\nRespond in {lang}.", "English").unwrap();

        let settings = store_in(&dir).prompts_settings();
        let user: Vec<_> = settings.prompts.iter().filter(|p| !p.is_system).collect();
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].id, prompt.id);
        assert_eq!(user[0].name, "ELI5");
    }

    #[test]
    fn test_legacy_chinese_migrates_on_read() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set_default_target_language("Chinese").unwrap();
        assert_eq!(store.default_target_language(), "Chinese (Simplified)");
    }

    #[test]
    fn test_observers_fire_on_write() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        store.subscribe(move |key| {
            if key == "parser" {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.set_parser(ParserKind::Density).unwrap();
        store.set_shortcuts_enabled(false).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_selected_model_uses_fallback_chain() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set_server_url("https://postea.example.com").unwrap();

        // Only the server model is available, so it wins.
        let selected = store.selected_model().unwrap();
        assert_eq!(selected.id, "server:default");

        // A saved id pointing at a vanished model falls back too.
        store.set_selected_model_id("gone:model").unwrap();
        assert_eq!(store.selected_model().unwrap().id, "server:default");
    }
}
