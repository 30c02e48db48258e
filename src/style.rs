//! Style strings, typed style keys and per-key deltas.
//!
//! A style string is a `;`-terminated list of `key=value` pairs. The literal `null`
//! decodes to an explicit null, which is distinct from an absent key when patching
//! (it removes the key) but reads like an absent key everywhere else.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const NULL_LITERAL: &str = "null";

/// Every style key the engine reads, each with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Shape,
    ShapeType,
    ShapeLayout,
    HideIcon,
    RotateIcon,
    StyleDashed,
    StyleDouble,
    StyleStrikethrough,
    StyleMultiplicity,
    LineColor,
    FillColor,
    FontColor,
    BadgeColor,
    Badge,
    Container,
    HideHeader,
    Image,
}

impl StyleKey {
    pub const ALL: [StyleKey; 17] = [
        StyleKey::Shape,
        StyleKey::ShapeType,
        StyleKey::ShapeLayout,
        StyleKey::HideIcon,
        StyleKey::RotateIcon,
        StyleKey::StyleDashed,
        StyleKey::StyleDouble,
        StyleKey::StyleStrikethrough,
        StyleKey::StyleMultiplicity,
        StyleKey::LineColor,
        StyleKey::FillColor,
        StyleKey::FontColor,
        StyleKey::BadgeColor,
        StyleKey::Badge,
        StyleKey::Container,
        StyleKey::HideHeader,
        StyleKey::Image,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Shape => "shape",
            Self::ShapeType => "ibmType",
            Self::ShapeLayout => "ibmLayout",
            Self::HideIcon => "ibmNoIcon",
            Self::RotateIcon => "ibmRotateIcon",
            Self::StyleDashed => "ibmDashed",
            Self::StyleDouble => "ibmDouble",
            Self::StyleStrikethrough => "ibmStrikethrough",
            Self::StyleMultiplicity => "ibmMultiplicity",
            Self::LineColor => "strokeColor",
            Self::FillColor => "fillColor",
            Self::FontColor => "fontColor",
            Self::BadgeColor => "ibmBadgeColor",
            Self::Badge => "ibmBadge",
            Self::Container => "container",
            Self::HideHeader => "ibmNoHeader",
            Self::Image => "image",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            Self::Shape | Self::Image => "",
            Self::ShapeType => "nodep",
            Self::ShapeLayout => "collapsed",
            Self::HideIcon
            | Self::RotateIcon
            | Self::StyleDashed
            | Self::StyleDouble
            | Self::StyleStrikethrough
            | Self::StyleMultiplicity
            | Self::Container
            | Self::HideHeader => "0",
            Self::LineColor | Self::FillColor | Self::FontColor | Self::BadgeColor | Self::Badge => {
                "none"
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true")
}

/// Key/value style state. Output keeps insertion order; equality ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap {
    entries: IndexMap<String, Option<String>>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a style string. Empty segments are skipped, a later duplicate key
    /// overwrites an earlier one and a bare `key` decodes to an empty value.
    pub fn parse(style: &str) -> Self {
        let mut entries = IndexMap::new();
        for segment in style.split(';') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key, value),
                None => (segment, ""),
            };
            if key.is_empty() {
                continue;
            }
            let value = if value == NULL_LITERAL {
                None
            } else {
                Some(value.to_string())
            };
            entries.insert(key.to_string(), value);
        }
        Self { entries }
    }

    /// Encode as `key=value;` pairs. `null` is reserved for explicit nulls, so a
    /// literal `"null"` value decodes back as null.
    pub fn to_style_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value.as_deref().unwrap_or(NULL_LITERAL));
            out.push(';');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw lookup: `None` when absent, `Some(None)` for an explicit null.
    pub fn get_raw(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(key).map(|value| value.as_deref())
    }

    /// Value of `key`, treating explicit null like an absent key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_raw(key).flatten()
    }

    /// Value of a typed key, falling back to its default.
    pub fn value(&self, key: StyleKey) -> &str {
        self.value_or(key, key.default_value())
    }

    pub fn value_or<'a>(&'a self, key: StyleKey, default: &'a str) -> &'a str {
        self.get(key.name()).unwrap_or(default)
    }

    pub fn flag(&self, key: StyleKey) -> bool {
        is_truthy(self.value(key))
    }

    /// True when the key resolves to its default (absent, null or equal to it).
    pub fn is_default(&self, key: StyleKey) -> bool {
        self.value(key) == key.default_value()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value);
    }

    pub fn set(&mut self, key: StyleKey, value: impl Into<String>) {
        self.insert(key.name(), Some(value.into()));
    }

    pub fn set_null(&mut self, key: StyleKey) {
        self.insert(key.name(), None);
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Overlay `other` onto `self`; keys in `other` win.
    pub fn merge(&mut self, other: &StyleMap) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Patch a style string the way the host does: null removes, anything else sets.
    pub fn apply_to(&self, style: &str) -> String {
        let mut target = StyleMap::parse(style);
        target.apply(self);
        target.to_style_string()
    }

    /// In-place form of [`StyleMap::apply_to`].
    pub fn apply(&mut self, patch: &StyleMap) {
        for (key, value) in &patch.entries {
            match value {
                Some(value) => {
                    self.entries.insert(key.clone(), Some(value.clone()));
                }
                None => {
                    self.entries.shift_remove(key);
                }
            }
        }
    }

    /// Entries of this patch that would change `current` if applied.
    pub fn without_noops(&self, current: &StyleMap) -> StyleMap {
        let mut out = StyleMap::new();
        for (key, value) in &self.entries {
            let existing = current.get(key);
            let unchanged = match value {
                Some(value) => existing == Some(value.as_str()),
                None => existing.is_none(),
            };
            if !unchanged {
                out.entries.insert(key.clone(), value.clone());
            }
        }
        out
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_style_string())
    }
}

impl From<&str> for StyleMap {
    fn from(style: &str) -> Self {
        Self::parse(style)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, Option<V>)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (key, value) in iter {
            map.insert(key, value.map(Into::into));
        }
        map
    }
}

/// Previous and current value of one style key within a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDelta<T> {
    pub current: T,
    pub previous: T,
    pub changed: bool,
}

impl<T: PartialEq> StyleDelta<T> {
    pub fn new(previous: T, current: T) -> Self {
        let changed = current != previous;
        Self {
            current,
            previous,
            changed,
        }
    }
}

impl<T> StyleDelta<T> {
    /// Convert both sides, keeping the change flag of the raw values.
    pub fn map<U>(self, f: impl Fn(T) -> U) -> StyleDelta<U> {
        StyleDelta {
            current: f(self.current),
            previous: f(self.previous),
            changed: self.changed,
        }
    }
}

impl StyleDelta<String> {
    pub fn of(previous: &StyleMap, current: &StyleMap, key: StyleKey) -> Self {
        Self::of_or(previous, current, key, key.default_value())
    }

    pub fn of_or(previous: &StyleMap, current: &StyleMap, key: StyleKey, default: &str) -> Self {
        Self::new(
            previous.value_or(key, default).to_string(),
            current.value_or(key, default).to_string(),
        )
    }

    pub fn is_on(&self) -> bool {
        is_truthy(&self.current)
    }
}
