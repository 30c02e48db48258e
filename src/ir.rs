use serde::{Deserialize, Serialize};

use crate::log::warn;
use crate::style::{StyleKey, StyleMap};

/// Structural kind of a base shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    #[serde(rename = "nodep")]
    Node,
    #[serde(rename = "nodel")]
    NodeLogical,
    #[serde(rename = "compp")]
    Comp,
    #[serde(rename = "compl")]
    CompLogical,
    #[serde(rename = "groupp")]
    GroupPhysical,
    #[serde(rename = "groupl")]
    GroupLogical,
    #[serde(rename = "actor")]
    Actor,
    #[serde(rename = "target")]
    Target,
}

impl ShapeType {
    pub const DEFAULT: Self = Self::Node;

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "nodep" | "node" => Some(Self::Node),
            "nodel" => Some(Self::NodeLogical),
            "compp" | "comp" => Some(Self::Comp),
            "compl" => Some(Self::CompLogical),
            "groupp" | "group" => Some(Self::GroupPhysical),
            "groupl" => Some(Self::GroupLogical),
            "actor" => Some(Self::Actor),
            "target" => Some(Self::Target),
            _ => None,
        }
    }

    /// Like `from_token`, but unknown tokens resolve to the default type.
    pub fn from_token_or_default(token: &str) -> Self {
        Self::from_token(token).unwrap_or_else(|| {
            warn!(token = %token, "unknown shape type, using default");
            Self::DEFAULT
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Node => "nodep",
            Self::NodeLogical => "nodel",
            Self::Comp => "compp",
            Self::CompLogical => "compl",
            Self::GroupPhysical => "groupp",
            Self::GroupLogical => "groupl",
            Self::Actor => "actor",
            Self::Target => "target",
        }
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::GroupPhysical | Self::GroupLogical)
    }

    pub fn is_comp(self) -> bool {
        matches!(self, Self::Comp | Self::CompLogical)
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            Self::NodeLogical | Self::CompLogical | Self::GroupLogical
        )
    }

    /// Actors and target systems are drawn with fully rounded ends.
    pub fn is_round(self) -> bool {
        matches!(self, Self::Actor | Self::Target)
    }

    /// Trailing variant marker (`l` logical, `p` prescribed), if the type has variants.
    pub fn variant_marker(self) -> Option<char> {
        match self {
            Self::Actor | Self::Target => None,
            other if other.is_logical() => Some('l'),
            _ => Some('p'),
        }
    }
}

/// Presentation mode of a base shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeLayout {
    Collapsed,
    Expanded,
    ExpandedTarget,
    ExpandedStack,
    ItemShape,
    ItemIcon,
    ItemColor,
    ItemStyle,
    ItemBadge,
}

impl ShapeLayout {
    pub const DEFAULT: Self = Self::Collapsed;

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "collapsed" => Some(Self::Collapsed),
            "expanded" => Some(Self::Expanded),
            "expandedTarget" => Some(Self::ExpandedTarget),
            "expandedStack" => Some(Self::ExpandedStack),
            "itemShape" => Some(Self::ItemShape),
            "itemIcon" => Some(Self::ItemIcon),
            "itemColor" => Some(Self::ItemColor),
            "itemStyle" => Some(Self::ItemStyle),
            "itemBadge" => Some(Self::ItemBadge),
            _ => None,
        }
    }

    pub fn from_token_or_default(token: &str) -> Self {
        Self::from_token(token).unwrap_or_else(|| {
            warn!(token = %token, "unknown shape layout, using default");
            Self::DEFAULT
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
            Self::ExpandedTarget => "expandedTarget",
            Self::ExpandedStack => "expandedStack",
            Self::ItemShape => "itemShape",
            Self::ItemIcon => "itemIcon",
            Self::ItemColor => "itemColor",
            Self::ItemStyle => "itemStyle",
            Self::ItemBadge => "itemBadge",
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(
            self,
            Self::Expanded | Self::ExpandedTarget | Self::ExpandedStack
        )
    }

    pub fn is_item(self) -> bool {
        matches!(
            self,
            Self::ItemShape | Self::ItemIcon | Self::ItemColor | Self::ItemStyle | Self::ItemBadge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeIdentity {
    pub shape_type: ShapeType,
    pub shape_layout: ShapeLayout,
}

impl ShapeIdentity {
    pub fn new(shape_type: ShapeType, shape_layout: ShapeLayout) -> Self {
        Self {
            shape_type,
            shape_layout,
        }
    }

    pub fn from_style(style: &StyleMap) -> Self {
        Self {
            shape_type: ShapeType::from_token_or_default(style.value(StyleKey::ShapeType)),
            shape_layout: ShapeLayout::from_token_or_default(style.value(StyleKey::ShapeLayout)),
        }
    }
}

/// Orientation of a legend container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendLayout {
    #[serde(rename = "legendh")]
    Horizontal,
    #[serde(rename = "legendv")]
    Vertical,
}

impl LegendLayout {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "legendh" => Some(Self::Horizontal),
            "legendv" => Some(Self::Vertical),
            _ => None,
        }
    }

    pub const DEFAULT: Self = Self::Vertical;

    pub fn token(self) -> &'static str {
        match self {
            Self::Horizontal => "legendh",
            Self::Vertical => "legendv",
        }
    }
}

/// Deployment-unit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "unitd")]
    Data,
    #[serde(rename = "unite")]
    Execution,
    #[serde(rename = "uniti")]
    Installation,
    #[serde(rename = "unitp")]
    Presentation,
    #[serde(rename = "unittd")]
    TechnicalData,
    #[serde(rename = "unitte")]
    TechnicalExecution,
    #[serde(rename = "unitti")]
    TechnicalInstallation,
    #[serde(rename = "unittp")]
    TechnicalPresentation,
}

impl UnitType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "unitd" => Some(Self::Data),
            "unite" => Some(Self::Execution),
            "uniti" => Some(Self::Installation),
            "unitp" => Some(Self::Presentation),
            "unittd" => Some(Self::TechnicalData),
            "unitte" => Some(Self::TechnicalExecution),
            "unitti" => Some(Self::TechnicalInstallation),
            "unittp" => Some(Self::TechnicalPresentation),
            _ => None,
        }
    }

    pub fn stencil_suffix(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Execution => "execution",
            Self::Installation => "installation",
            Self::Presentation => "presentation",
            Self::TechnicalData => "technical--data",
            Self::TechnicalExecution => "technical--execution",
            Self::TechnicalInstallation => "technical--installation",
            Self::TechnicalPresentation => "technical--presentation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn same_size(&self, other: &Rect) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn with_size(self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}

/// Named attributes read from the host's object model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeName {
    #[serde(rename = "Icon-Name")]
    IconName,
    #[serde(rename = "Badge-Text")]
    BadgeText,
    #[serde(rename = "Primary-Label")]
    PrimaryLabel,
    #[serde(rename = "Secondary-Text")]
    SecondaryText,
    #[serde(rename = "Legend-Title")]
    LegendTitle,
}

impl AttributeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IconName => "Icon-Name",
            Self::BadgeText => "Badge-Text",
            Self::PrimaryLabel => "Primary-Label",
            Self::SecondaryText => "Secondary-Text",
            Self::LegendTitle => "Legend-Title",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Icon-Name" => Some(Self::IconName),
            "Badge-Text" => Some(Self::BadgeText),
            "Primary-Label" => Some(Self::PrimaryLabel),
            "Secondary-Text" => Some(Self::SecondaryText),
            "Legend-Title" => Some(Self::LegendTitle),
            _ => None,
        }
    }
}

/// Read-only snapshot of a cell's identity attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeAttributes {
    pub icon_name: Option<String>,
    pub badge_text: Option<String>,
    pub primary_label: Option<String>,
    pub secondary_text: Option<String>,
    pub legend_title: Option<String>,
}

impl ShapeAttributes {
    pub fn get(&self, name: AttributeName) -> Option<&str> {
        let slot = match name {
            AttributeName::IconName => &self.icon_name,
            AttributeName::BadgeText => &self.badge_text,
            AttributeName::PrimaryLabel => &self.primary_label,
            AttributeName::SecondaryText => &self.secondary_text,
            AttributeName::LegendTitle => &self.legend_title,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, name: AttributeName, value: impl Into<String>) {
        let slot = match name {
            AttributeName::IconName => &mut self.icon_name,
            AttributeName::BadgeText => &mut self.badge_text,
            AttributeName::PrimaryLabel => &mut self.primary_label,
            AttributeName::SecondaryText => &mut self.secondary_text,
            AttributeName::LegendTitle => &mut self.legend_title,
        };
        *slot = Some(value.into());
    }

    /// Attributes from `required` the host has not created yet.
    pub fn missing(&self, required: &[AttributeName]) -> Vec<AttributeName> {
        required
            .iter()
            .copied()
            .filter(|name| self.get(*name).is_none())
            .collect()
    }
}

/// A single attribute write the host should perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeUpdate {
    pub name: AttributeName,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_type_tokens_round_trip() {
        for ty in [
            ShapeType::Node,
            ShapeType::NodeLogical,
            ShapeType::Comp,
            ShapeType::CompLogical,
            ShapeType::GroupPhysical,
            ShapeType::GroupLogical,
            ShapeType::Actor,
            ShapeType::Target,
        ] {
            assert_eq!(ShapeType::from_token(ty.token()), Some(ty));
        }
        assert_eq!(ShapeType::from_token("node"), Some(ShapeType::Node));
        assert_eq!(ShapeType::from_token_or_default("cloud"), ShapeType::Node);
    }

    #[test]
    fn variant_markers_follow_trailing_letter() {
        assert_eq!(ShapeType::GroupLogical.variant_marker(), Some('l'));
        assert_eq!(ShapeType::Comp.variant_marker(), Some('p'));
        assert_eq!(ShapeType::Actor.variant_marker(), None);
    }

    #[test]
    fn layout_families() {
        assert!(ShapeLayout::ExpandedTarget.is_expanded());
        assert!(!ShapeLayout::Collapsed.is_expanded());
        assert!(ShapeLayout::ItemBadge.is_item());
        assert_eq!(
            ShapeLayout::from_token_or_default("sideways"),
            ShapeLayout::Collapsed
        );
    }

    #[test]
    fn missing_attributes_are_reported() {
        let mut attrs = ShapeAttributes::default();
        attrs.set(AttributeName::IconName, "cloud");
        let missing = attrs.missing(&[AttributeName::IconName, AttributeName::BadgeText]);
        assert_eq!(missing, vec![AttributeName::BadgeText]);
    }
}
