//! Model price catalog
//!
//! Loads the built-in model list from embedded JSON at compile time.
//! Prices are in USD per million tokens.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Embedded JSON data
const MODELS_JSON: &str = include_str!("models.json");

/// Per-token prices for a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    /// USD per million prompt tokens
    pub prompt: f64,
    /// USD per million completion tokens
    pub completion: f64,
}

/// A model offered to the user, with its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub model: String,
    #[serde(default)]
    pub label: Option<String>,
    pub cost: TokenPrice,
}

impl ModelPricing {
    pub fn new(model: impl Into<String>, prompt: f64, completion: f64) -> Self {
        Self {
            model: model.into(),
            label: None,
            cost: TokenPrice { prompt, completion },
        }
    }

    /// Display name, falling back to the model id
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.model)
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    models: Vec<ModelPricing>,
}

static BUILTIN: LazyLock<Vec<ModelPricing>> = LazyLock::new(|| {
    let raw: RawCatalog =
        serde_json::from_str(MODELS_JSON).expect("failed to parse models.json");
    raw.models
});

/// Ordered list of priced models
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<ModelPricing>,
}

impl ModelCatalog {
    /// Catalog with no entries; every model costs zero
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN.clone(),
        }
    }

    /// Add or replace entries, matching on model id
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = ModelPricing>) -> Self {
        for entry in overrides {
            match self.models.iter_mut().find(|m| m.model == entry.model) {
                Some(existing) => *existing = entry,
                None => self.models.push(entry),
            }
        }
        self
    }

    /// Look up a model by id
    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.models.iter().find(|m| m.model == model)
    }

    /// Prices for a model, zero when unknown
    pub fn price(&self, model: &str) -> TokenPrice {
        self.get(model).map(|m| m.cost).unwrap_or_default()
    }

    pub fn models(&self) -> &[ModelPricing] {
        &self.models
    }
}
