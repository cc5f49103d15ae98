//! AI model references and selection.
//!
//! A model is addressed by `"<provider>:<model id>"`. The special `server`
//! provider is the backing read-it-later server's own AI endpoint; everything
//! else comes from user-configured providers in settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provider key of the backing server's built-in AI endpoint.
pub const SERVER_PROVIDER: &str = "server";

/// One model offered by a provider, as configured in settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
}

/// Configuration of one AI provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub display_name: String,
    pub enabled: bool,
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// A selectable model, resolved from provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRef {
    /// `"<provider>:<model id>"`.
    pub id: String,
    pub name: String,
    pub provider: String,
    pub provider_name: String,
}

impl ModelRef {
    fn new(provider: &str, provider_name: &str, model_id: &str, name: &str) -> Self {
        Self {
            id: format!("{provider}:{model_id}"),
            name: name.to_string(),
            provider: provider.to_string(),
            provider_name: provider_name.to_string(),
        }
    }

    /// The model identifier without its provider prefix.
    pub fn model_id(&self) -> &str {
        match self.id.split_once(':') {
            Some((_, model)) => model,
            None => &self.id,
        }
    }
}

/// The backing server's built-in model reference.
pub fn server_model() -> ModelRef {
    ModelRef::new(SERVER_PROVIDER, "Postea", "default", "Postea AI")
}

/// Assembles the selectable model list.
///
/// The server's built-in model comes first when a server URL is configured
/// and server shortcuts are enabled; after it, every model of every enabled
/// provider in configuration order. Disabled providers contribute nothing.
pub fn available_models(
    server_configured: bool, shortcuts_enabled: bool, providers: &BTreeMap<String, ProviderSettings>,
) -> Vec<ModelRef> {
    let mut models = Vec::new();

    if server_configured && shortcuts_enabled {
        models.push(server_model());
    }

    for (key, provider) in providers {
        if !provider.enabled {
            continue;
        }
        for entry in &provider.models {
            models.push(ModelRef::new(key, &provider.display_name, &entry.id, &entry.name));
        }
    }

    models
}

/// Resolves which model to select.
///
/// Fallback chain: the saved id if it is still available, else the first
/// model of the configured default provider, else the first available model,
/// else nothing.
pub fn resolve_selected_model(
    saved_id: Option<&str>, models: &[ModelRef], default_provider: Option<&str>,
) -> Option<ModelRef> {
    if let Some(saved) = saved_id
        && let Some(found) = models.iter().find(|m| m.id == saved)
    {
        return Some(found.clone());
    }

    if let Some(provider) = default_provider
        && let Some(found) = models.iter().find(|m| m.provider == provider)
    {
        return Some(found.clone());
    }

    models.first().cloned()
}
