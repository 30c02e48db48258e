use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::log::debug;
use crate::theme::{ibm_palette, palette_key, ColorPalette, FamilyTokens, SentinelColors};

static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#?[0-9A-Fa-f]{6}$").unwrap());

/// Stencil names of the three shape kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeNames {
    pub base: String,
    pub legend: String,
    pub unit: String,
    pub stencil_prefix: String,
    pub undefined_icon: String,
}

impl Default for ShapeNames {
    fn default() -> Self {
        Self {
            base: "mxgraph.ibm.box".to_string(),
            legend: "mxgraph.ibm.legend".to_string(),
            unit: "mxgraph.ibm.unit".to_string(),
            stencil_prefix: "mxgraph.ibm.".to_string(),
            undefined_icon: "undefined".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidetickRules {
    pub width: f32,
    pub height: f32,
    pub align: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollapsedRules {
    pub min_width: f32,
    pub target_min_width: f32,
}

impl Default for CollapsedRules {
    fn default() -> Self {
        Self {
            min_width: 48.0,
            target_min_width: 64.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpandedRules {
    pub min_width: f32,
    pub default_width: f32,
    pub default_height: f32,
    /// Trimmed from the target icon area so the icon clears the rounded end.
    pub target_icon_inset: f32,
    pub sidebar_width: f32,
    pub sidebar_height: f32,
}

impl Default for ExpandedRules {
    fn default() -> Self {
        Self {
            min_width: 96.0,
            default_width: 240.0,
            default_height: 152.0,
            target_icon_inset: 4.0,
            sidebar_width: 4.0,
            sidebar_height: 48.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemRules {
    pub min_width: f32,
    pub swatch_shape_width: f32,
    pub swatch_label_align: f32,
    pub target_shape_width: f32,
    pub shape_width: f32,
    pub label_align: f32,
    pub curve_radius: f32,
    pub round_curve_radius: f32,
    pub target_shape_align: f32,
    pub sidebar_width: f32,
    pub sidebar_height: f32,
    pub sidetick: SidetickRules,
    pub multiplicity_align: f32,
    pub double_align: f32,
    pub icon_size: f32,
    pub icon_spacing: f32,
}

impl Default for ItemRules {
    fn default() -> Self {
        Self {
            min_width: 64.0,
            swatch_shape_width: 32.0,
            swatch_label_align: 40.0,
            target_shape_width: 20.0,
            shape_width: 16.0,
            label_align: 24.0,
            curve_radius: 4.0,
            round_curve_radius: 8.0,
            target_shape_align: -2.0,
            sidebar_width: 2.0,
            sidebar_height: 12.0,
            sidetick: SidetickRules {
                width: 4.0,
                height: 2.0,
                align: -2.0,
            },
            multiplicity_align: 2.0,
            double_align: 2.0,
            icon_size: 16.0,
            icon_spacing: 0.0,
        }
    }
}

/// Design-grid constants for base shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryRules {
    pub min_height: f32,
    pub item_min_height: f32,
    pub label_height: f32,
    pub expanded_label_height: f32,
    pub curve_radius: f32,
    pub round_curve_radius: f32,
    pub sidetick: SidetickRules,
    pub multiplicity_align: f32,
    pub double_align: f32,
    pub icon_size: f32,
    pub icon_spacing: f32,
    pub collapsed: CollapsedRules,
    pub expanded: ExpandedRules,
    pub item: ItemRules,
}

impl Default for GeometryRules {
    fn default() -> Self {
        Self {
            min_height: 48.0,
            item_min_height: 16.0,
            label_height: 16.0,
            expanded_label_height: 48.0,
            curve_radius: 8.0,
            round_curve_radius: 24.0,
            sidetick: SidetickRules::default(),
            multiplicity_align: 4.0,
            double_align: 3.0,
            icon_size: 20.0,
            icon_spacing: 14.0,
            collapsed: CollapsedRules::default(),
            expanded: ExpandedRules::default(),
            item: ItemRules::default(),
        }
    }
}

impl Default for SidetickRules {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 4.0,
            align: -4.0,
        }
    }
}

/// Style fragments emitted as a unit by the layout and decoration reconcilers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyBundles {
    pub collapsed_label: String,
    pub expanded_label: String,
    pub expanded_target_label: String,
    pub expanded_target_label_no_icon: String,
    pub item_label: String,
    pub container: String,
    pub container_null: String,
    pub expanded_stack: String,
    pub expanded_stack_null: String,
    pub default_fill: String,
    pub no_fill: String,
    pub style_dashed_on: String,
    pub style_dashed_off: String,
    pub style_double_on: String,
    pub style_double_off: String,
    pub style_strikethrough_on: String,
    pub style_strikethrough_off: String,
}

impl Default for PropertyBundles {
    fn default() -> Self {
        Self {
            collapsed_label: "labelPosition=center;verticalLabelPosition=bottom;align=center;verticalAlign=top;spacingLeft=0;spacingTop=-4;".to_string(),
            expanded_label: "labelPosition=center;verticalLabelPosition=middle;align=left;verticalAlign=top;spacingLeft=8;spacingTop=4;".to_string(),
            expanded_target_label: "labelPosition=center;verticalLabelPosition=middle;align=left;verticalAlign=middle;spacingLeft=8;spacingTop=0;".to_string(),
            expanded_target_label_no_icon: "labelPosition=center;verticalLabelPosition=middle;align=left;verticalAlign=middle;spacingLeft=20;spacingTop=0;".to_string(),
            item_label: "labelPosition=right;verticalLabelPosition=middle;align=left;verticalAlign=middle;spacingLeft=4;spacingTop=0;".to_string(),
            container: "container=1;collapsible=0;recursiveResize=0;".to_string(),
            container_null: "container=null;collapsible=null;recursiveResize=null;".to_string(),
            expanded_stack: "childLayout=stackLayout;horizontalStack=0;stackFill=1;marginLeft=8;marginRight=8;marginTop=56;marginBottom=8;resizeParent=1;resizeLast=0;".to_string(),
            expanded_stack_null: "childLayout=null;horizontalStack=null;stackFill=null;marginLeft=null;marginRight=null;marginTop=null;marginBottom=null;resizeParent=null;resizeLast=null;".to_string(),
            default_fill: "fillColor=#FFFFFF;".to_string(),
            no_fill: "fillColor=none;".to_string(),
            style_dashed_on: "ibmDashed=1;ibmDouble=0;ibmStrikethrough=0;".to_string(),
            style_dashed_off: "ibmDashed=0;".to_string(),
            style_double_on: "ibmDashed=0;ibmDouble=1;ibmStrikethrough=0;".to_string(),
            style_double_off: "ibmDouble=0;".to_string(),
            style_strikethrough_on: "ibmDashed=0;ibmDouble=0;ibmStrikethrough=1;".to_string(),
            style_strikethrough_off: "ibmStrikethrough=0;".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendRules {
    pub padding: f32,
    pub item_height: f32,
    pub titlebar: f32,
    pub title_height: f32,
    pub min_width: f32,
}

impl Default for LegendRules {
    fn default() -> Self {
        Self {
            padding: 8.0,
            item_height: 16.0,
            titlebar: 32.0,
            title_height: 16.0,
            min_width: 64.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitRules {
    pub label_height: f32,
    pub label_align: f32,
    pub icon_size: f32,
    pub icon_align: f32,
    pub stencil_family: String,
}

impl Default for UnitRules {
    fn default() -> Self {
        Self {
            label_height: 16.0,
            label_align: 24.0,
            icon_size: 16.0,
            icon_align: 0.0,
            stencil_family: "deployment-unit--".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeRules {
    pub font_size: f32,
    /// Character width as a fraction of the font size.
    pub char_width_ratio: f32,
    pub height: f32,
    pub text_padding: f32,
    pub round_offset: f32,
    pub item_label_offset: f32,
    pub item_label_gap: f32,
}

impl Default for BadgeRules {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            char_width_ratio: 0.6,
            height: 14.0,
            text_padding: 4.0,
            round_offset: -8.0,
            item_label_offset: 15.0,
            item_label_gap: 8.0,
        }
    }
}

/// The complete design-token table handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignConfig {
    pub shapes: ShapeNames,
    pub colors: SentinelColors,
    pub palette: IndexMap<String, String>,
    pub families: FamilyTokens,
    pub geometry: GeometryRules,
    pub properties: PropertyBundles,
    pub legend: LegendRules,
    pub unit: UnitRules,
    pub badge: BadgeRules,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            shapes: ShapeNames::default(),
            colors: SentinelColors::default(),
            palette: ibm_palette(),
            families: FamilyTokens::default(),
            geometry: GeometryRules::default(),
            properties: PropertyBundles::default(),
            legend: LegendRules::default(),
            unit: UnitRules::default(),
            badge: BadgeRules::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("palette entry `{hex}` is not a 6-digit hex color")]
    InvalidHex { hex: String },
    #[error("palette lists `{hex}` more than once")]
    DuplicatePaletteEntry { hex: String },
    #[error("family token for {role} colors is empty")]
    EmptyFamilyToken { role: &'static str },
    #[error("grid value `{field}` must be positive, got {value}")]
    NonPositiveGridValue { field: &'static str, value: f32 },
}

impl DesignConfig {
    pub fn palette(&self) -> ColorPalette {
        ColorPalette::new(&self.palette, self.families.clone(), self.colors.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for hex in self.palette.keys() {
            if !HEX_RE.is_match(hex) {
                return Err(ConfigError::InvalidHex { hex: hex.clone() });
            }
            let key = hex.trim_start_matches('#').to_ascii_uppercase();
            if !seen.insert(key) {
                return Err(ConfigError::DuplicatePaletteEntry { hex: hex.clone() });
            }
        }

        for (role, token) in [
            ("line", &self.families.line),
            ("fill", &self.families.fill),
            ("font", &self.families.font),
        ] {
            if token.trim().is_empty() {
                return Err(ConfigError::EmptyFamilyToken { role });
            }
        }

        let geometry = &self.geometry;
        let grid = [
            ("geometry.minHeight", geometry.min_height),
            ("geometry.itemMinHeight", geometry.item_min_height),
            ("geometry.labelHeight", geometry.label_height),
            ("geometry.expandedLabelHeight", geometry.expanded_label_height),
            ("geometry.iconSize", geometry.icon_size),
            ("geometry.collapsed.minWidth", geometry.collapsed.min_width),
            (
                "geometry.collapsed.targetMinWidth",
                geometry.collapsed.target_min_width,
            ),
            ("geometry.expanded.minWidth", geometry.expanded.min_width),
            ("geometry.expanded.defaultWidth", geometry.expanded.default_width),
            ("geometry.expanded.defaultHeight", geometry.expanded.default_height),
            ("geometry.item.minWidth", geometry.item.min_width),
            ("geometry.item.shapeWidth", geometry.item.shape_width),
            ("geometry.item.iconSize", geometry.item.icon_size),
            ("legend.itemHeight", self.legend.item_height),
            ("legend.minWidth", self.legend.min_width),
            ("unit.iconSize", self.unit.icon_size),
            ("badge.fontSize", self.badge.font_size),
            ("badge.height", self.badge.height),
        ];
        for (field, value) in grid {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositiveGridValue { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    shapes: Option<ShapeNames>,
    colors: Option<SentinelColors>,
    palette: Option<IndexMap<String, String>>,
    /// Replace the built-in palette instead of extending it.
    replace_palette: Option<bool>,
    families: Option<FamilyTokens>,
    geometry: Option<GeometryRules>,
    properties: Option<PropertyBundles>,
    legend: Option<LegendRules>,
    unit: Option<UnitRules>,
    badge: Option<BadgeRules>,
}

fn parse_config_file(path: &Path, contents: &str) -> anyhow::Result<ConfigFile> {
    let is_json5 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json5"));
    if is_json5 {
        Ok(json5::from_str(contents)?)
    } else {
        Ok(serde_json::from_str(contents)?)
    }
}

impl ConfigFile {
    fn overlay(self, mut config: DesignConfig) -> DesignConfig {
        if let Some(v) = self.shapes {
            config.shapes = v;
        }
        if let Some(v) = self.colors {
            config.colors = v;
        }
        if let Some(entries) = self.palette {
            let entries = entries
                .into_iter()
                .map(|(hex, name)| (palette_key(&hex), name))
                .collect::<IndexMap<_, _>>();
            if self.replace_palette.unwrap_or(false) {
                config.palette = entries;
            } else {
                config.palette.extend(entries);
            }
        }
        if let Some(v) = self.families {
            config.families = v;
        }
        if let Some(v) = self.geometry {
            config.geometry = v;
        }
        if let Some(v) = self.properties {
            config.properties = v;
        }
        if let Some(v) = self.legend {
            config.legend = v;
        }
        if let Some(v) = self.unit {
            config.unit = v;
        }
        if let Some(v) = self.badge {
            config.badge = v;
        }
        config
    }
}

/// Overlay a JSON design-token document onto the defaults and validate it.
pub fn parse_config(json: &str) -> anyhow::Result<DesignConfig> {
    let parsed: ConfigFile = serde_json::from_str(json)?;
    let config = parsed.overlay(DesignConfig::default());
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<DesignConfig> {
    let Some(path) = path else {
        return Ok(DesignConfig::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config = parse_config_file(path, &contents)?.overlay(DesignConfig::default());

    config.validate()?;
    debug!(
        path = %path.display(),
        palette = config.palette.len(),
        "loaded design config"
    );
    Ok(config)
}
