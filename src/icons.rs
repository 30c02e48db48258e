//! Icon lookup consumed by the engine.
//!
//! The host owns the stencil registry; the engine only needs to know whether an
//! icon exists and which logical/prescribed variant it has.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait IconCatalog {
    fn contains(&self, name: &str) -> bool;

    /// Name of the `icon<marker>` variant of `name`, e.g. `iconl` for logical shapes.
    fn variant(&self, name: &str, marker: char) -> Option<String>;
}

/// Catalog that knows no icons; every lookup falls back to the undefined stencil.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl IconCatalog for EmptyCatalog {
    fn contains(&self, _name: &str) -> bool {
        false
    }

    fn variant(&self, _name: &str, _marker: char) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iconl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iconp: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl IconEntry {
    pub fn variant(&self, marker: char) -> Option<&str> {
        match marker {
            'l' => self.iconl.as_deref(),
            'p' => self.iconp.as_deref(),
            _ => None,
        }
    }
}

/// Icons keyed by name with their categories flattened away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIconCatalog {
    icons: IndexMap<String, IconEntry>,
}

impl FlatIconCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `category -> icon -> entry`. A later category wins on duplicate names.
    pub fn from_categories(categories: IndexMap<String, IndexMap<String, IconEntry>>) -> Self {
        let mut icons = IndexMap::new();
        for category in categories.into_values() {
            icons.extend(category);
        }
        Self { icons }
    }

    /// Parse a categorized icon table, either bare or wrapped in `Sidebars.Icons`.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let table = value
            .pointer("/Sidebars/Icons")
            .cloned()
            .unwrap_or(value);
        let categories: IndexMap<String, IndexMap<String, IconEntry>> =
            serde_json::from_value(table)?;
        Ok(Self::from_categories(categories))
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: IconEntry) {
        self.icons.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&IconEntry> {
        self.icons.get(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconCatalog for FlatIconCatalog {
    fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    fn variant(&self, name: &str, marker: char) -> Option<String> {
        self.icons
            .get(name)
            .and_then(|entry| entry.variant(marker))
            .map(str::to_string)
    }
}

/// Where the painter takes a shape's icon from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum IconSource {
    Stencil(String),
    Image(String),
    Undefined(String),
}

/// Known stencil first, then a dropped image, then the undefined stencil.
pub fn resolve_icon(
    catalog: &dyn IconCatalog,
    icon_name: Option<&str>,
    image: Option<&str>,
    stencil_prefix: &str,
    undefined_icon: &str,
) -> IconSource {
    if let Some(name) = icon_name.filter(|name| !name.is_empty() && *name != undefined_icon) {
        if catalog.contains(name) {
            return IconSource::Stencil(format!("{stencil_prefix}{name}"));
        }
    }
    if let Some(image) = image.filter(|image| !image.is_empty() && *image != undefined_icon) {
        return IconSource::Image(image.to_string());
    }
    IconSource::Undefined(format!("{stencil_prefix}{undefined_icon}"))
}
