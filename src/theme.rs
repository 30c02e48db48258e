use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})").unwrap()
});

const DARK_TIER: u32 = 50;

const HUES: [(&str, [&str; 10]); 10] = [
    (
        "Red",
        [
            "FFF1F1", "FFD7D9", "FFB3B8", "FF8389", "FA4D56", "DA1E28", "A2191F", "750E13",
            "520408", "2D0709",
        ],
    ),
    (
        "Magenta",
        [
            "FFF0F7", "FFD6E8", "FFAFD2", "FF7EB6", "EE5396", "D02670", "9F1853", "740937",
            "510224", "2A0A18",
        ],
    ),
    (
        "Purple",
        [
            "F6F2FF", "E8DAFF", "D4BBFF", "BE95FF", "A56EFF", "8A3FFC", "6929C4", "491D8B",
            "31135E", "1C0F30",
        ],
    ),
    (
        "Blue",
        [
            "EDF5FF", "D0E2FF", "A6C8FF", "78A9FF", "4589FF", "0F62FE", "0043CE", "002D9C",
            "001D6C", "001141",
        ],
    ),
    (
        "Cyan",
        [
            "E5F6FF", "BAE6FF", "82CFFF", "33B1FF", "1192E8", "0072C3", "00539A", "003A6D",
            "012749", "061727",
        ],
    ),
    (
        "Teal",
        [
            "D9FBFB", "9EF0F0", "3DDBD9", "08BDBA", "009D9A", "007D79", "005D5D", "004144",
            "022B30", "081A1C",
        ],
    ),
    (
        "Green",
        [
            "DEFBE6", "A7F0BA", "6FDC8C", "42BE65", "24A148", "198038", "0E6027", "044317",
            "022D0D", "071908",
        ],
    ),
    (
        "Cool Gray",
        [
            "F2F4F8", "DDE1E6", "C1C7CD", "A2A9B0", "878D96", "697077", "4D5358", "343A3F",
            "21272A", "121619",
        ],
    ),
    (
        "Gray",
        [
            "F4F4F4", "E0E0E0", "C6C6C6", "A8A8A8", "8D8D8D", "6F6F6F", "525252", "393939",
            "262626", "161616",
        ],
    ),
    (
        "Warm Gray",
        [
            "F7F3F2", "E5E0DF", "CAC5C4", "ADA8A8", "8F8B8B", "726E6E", "565151", "3C3838",
            "272525", "171414",
        ],
    ),
];

/// The IBM design-language palette: hex digits (no `#`) to tagged entry name.
pub fn ibm_palette() -> IndexMap<String, String> {
    let mut palette = IndexMap::new();
    palette.insert("000000".to_string(), "Black (Line, Font)".to_string());
    palette.insert("FFFFFF".to_string(), "White (Fill, Font)".to_string());
    for (hue, tiers) in HUES {
        for (index, hex) in tiers.iter().enumerate() {
            let tier = (index + 1) * 10;
            let name = match tier {
                10 | 20 => format!("{hue} {tier} (Fill)"),
                30 | 40 => format!("{hue} {tier}"),
                _ => format!("{hue} {tier} (Line, Font)"),
            };
            palette.insert(hex.to_string(), name);
        }
    }
    palette
}

/// Fixed colors the derivation rules refer to by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentinelColors {
    pub black: String,
    pub white: String,
    pub none: String,
    pub coolgray: String,
    pub gray: String,
}

impl Default for SentinelColors {
    fn default() -> Self {
        Self {
            black: "#000000".to_string(),
            white: "#FFFFFF".to_string(),
            none: "none".to_string(),
            coolgray: "#697077".to_string(),
            gray: "#6F6F6F".to_string(),
        }
    }
}

/// Substrings of a palette name that tag it as usable for a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyTokens {
    pub line: String,
    pub fill: String,
    pub font: String,
}

impl Default for FamilyTokens {
    fn default() -> Self {
        Self {
            line: "Line".to_string(),
            fill: "Fill".to_string(),
            font: "Font".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorRole {
    Line,
    Fill,
    Font,
    Badge,
    Icon,
    IconArea,
    Style,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub hex: String,
    pub name: String,
}

impl PaletteEntry {
    /// Numeric shade tiers found in the name, e.g. `60` for "Blue 60 (Line, Font)".
    pub fn tiers(&self) -> impl Iterator<Item = u32> + '_ {
        self.name.split(' ').filter_map(leading_number)
    }

    pub fn is_dark(&self) -> bool {
        self.tiers().any(|tier| tier >= DARK_TIER)
    }
}

fn leading_number(segment: &str) -> Option<u32> {
    let end = segment
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(segment.len());
    segment[..end].parse().ok()
}

/// Normalize an `rgb(r,g,b)` literal to `#RRGGBB`; anything else is returned as-is.
pub fn rgb_to_hex(color: &str) -> String {
    let Some(caps) = RGB_RE.captures(color) else {
        return color.to_string();
    };
    let channel = |idx: usize| -> u8 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .map(|v| v.min(255) as u8)
            .unwrap_or(0)
    };
    format!("#{:02X}{:02X}{:02X}", channel(1), channel(2), channel(3))
}

/// Canonical palette key: upper-case hex digits without the leading `#`.
pub fn palette_key(color: &str) -> String {
    rgb_to_hex(color)
        .trim()
        .trim_start_matches('#')
        .to_ascii_uppercase()
}

/// Hex lookup over the configured palette plus the role and visibility rules built on it.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    entries: HashMap<String, String>,
    families: FamilyTokens,
    colors: SentinelColors,
}

impl ColorPalette {
    pub fn new(
        palette: &IndexMap<String, String>,
        families: FamilyTokens,
        colors: SentinelColors,
    ) -> Self {
        let entries = palette
            .iter()
            .map(|(hex, name)| (palette_key(hex), name.clone()))
            .collect();
        Self {
            entries,
            families,
            colors,
        }
    }

    pub fn colors(&self) -> &SentinelColors {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_none(&self, color: &str) -> bool {
        color.trim().eq_ignore_ascii_case(&self.colors.none)
    }

    /// Palette entry for a hex or `rgb()` color. The none sentinel never resolves.
    pub fn resolve(&self, color: &str) -> Option<PaletteEntry> {
        if self.is_none(color) {
            return None;
        }
        let key = palette_key(color);
        self.entries.get(&key).map(|name| PaletteEntry {
            hex: format!("#{key}"),
            name: name.clone(),
        })
    }

    pub fn resolve_name(&self, color: &str) -> Option<&str> {
        if self.is_none(color) {
            return None;
        }
        self.entries.get(&palette_key(color)).map(String::as_str)
    }

    pub fn family_token(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Fill => &self.families.fill,
            ColorRole::Font => &self.families.font,
            ColorRole::Line
            | ColorRole::Badge
            | ColorRole::Icon
            | ColorRole::IconArea
            | ColorRole::Style => &self.families.line,
        }
    }

    pub fn is_member(&self, entry: &PaletteEntry, role: ColorRole) -> bool {
        entry.name.contains(self.family_token(role))
    }

    /// True when `color` resolves to a palette entry tagged for `role`.
    pub fn accepts(&self, color: &str, role: ColorRole) -> bool {
        self.resolve_name(color)
            .is_some_and(|name| name.contains(self.family_token(role)))
    }

    /// `candidate` unless `background` is dark enough to need white on top of it.
    pub fn visible(&self, candidate: &str, background: &str) -> String {
        if self.is_none(background) {
            return candidate.to_string();
        }
        if palette_key(background) == palette_key(&self.colors.black) {
            return self.colors.white.clone();
        }
        match self.resolve(background) {
            Some(entry) if entry.is_dark() => self.colors.white.clone(),
            _ => candidate.to_string(),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(
            &ibm_palette(),
            FamilyTokens::default(),
            SentinelColors::default(),
        )
    }
}
