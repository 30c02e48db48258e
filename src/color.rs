//! Palette validation of color edits and derivation of paint colors.

use serde::Serialize;

use crate::ir::{ShapeIdentity, ShapeLayout, ShapeType};
use crate::log::debug;
use crate::style::{StyleDelta, StyleKey, StyleMap};
use crate::theme::{rgb_to_hex, ColorPalette, ColorRole};

/// Per-role deltas of the four editable colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDeltas {
    pub line: StyleDelta<String>,
    pub fill: StyleDelta<String>,
    pub font: StyleDelta<String>,
    pub badge: StyleDelta<String>,
}

impl ColorDeltas {
    pub fn from_styles(previous: &StyleMap, current: &StyleMap) -> Self {
        Self {
            line: StyleDelta::of(previous, current, StyleKey::LineColor),
            fill: StyleDelta::of(previous, current, StyleKey::FillColor),
            font: StyleDelta::of(previous, current, StyleKey::FontColor),
            badge: StyleDelta::of(previous, current, StyleKey::BadgeColor),
        }
    }

    pub fn changed(&self) -> bool {
        self.line.changed || self.fill.changed || self.font.changed || self.badge.changed
    }
}

/// Reverts for color edits outside their role's palette family.
///
/// An invalid line color takes the fill color back with it; font and badge
/// reverts only touch their own key.
pub fn reconcile_colors(palette: &ColorPalette, deltas: &ColorDeltas) -> StyleMap {
    let mut patch = StyleMap::new();
    if !deltas.changed() {
        return patch;
    }

    if deltas.line.changed && !palette.accepts(&deltas.line.current, ColorRole::Line) {
        debug!(color = %deltas.line.current, "line color outside palette, reverting");
        patch.set(StyleKey::LineColor, deltas.line.previous.clone());
        patch.set(StyleKey::FillColor, deltas.fill.previous.clone());
    }

    if deltas.font.changed && !palette.accepts(&deltas.font.current, ColorRole::Font) {
        debug!(color = %deltas.font.current, "font color outside palette, reverting");
        patch.set(StyleKey::FontColor, deltas.font.previous.clone());
    }

    if deltas.badge.changed && !palette.accepts(&deltas.badge.current, ColorRole::Badge) {
        debug!(color = %deltas.badge.current, "badge color outside palette, reverting");
        patch.set(StyleKey::BadgeColor, deltas.badge.previous.clone());
    }

    patch
}

/// Color values as they appear in a style, before any derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawColors<'a> {
    pub line: &'a str,
    pub fill: &'a str,
    pub font: &'a str,
    pub badge: &'a str,
}

impl<'a> RawColors<'a> {
    pub fn from_style(style: &'a StyleMap) -> Self {
        Self {
            line: style.value(StyleKey::LineColor),
            fill: style.value(StyleKey::FillColor),
            font: style.value(StyleKey::FontColor),
            badge: style.value(StyleKey::BadgeColor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedColors {
    pub line: String,
    pub fill: String,
    pub font: String,
    pub badge: String,
    pub badge_font: String,
    pub icon: String,
    pub icon_area: String,
    pub style: String,
}

/// Resolve every paint color of a base shape from its raw style colors.
pub fn derive_colors(
    palette: &ColorPalette,
    identity: ShapeIdentity,
    raw: RawColors<'_>,
) -> DerivedColors {
    let colors = palette.colors();
    let ShapeIdentity {
        shape_type,
        shape_layout,
    } = identity;
    let or_default = |value: &str, default: &str| {
        if palette.is_none(value) {
            default.to_string()
        } else {
            rgb_to_hex(value)
        }
    };

    let line = or_default(raw.line, &colors.black);
    let mut fill = or_default(raw.fill, &colors.none);
    if shape_layout == ShapeLayout::ItemColor {
        fill = line.clone();
    }
    let has_fill = !palette.is_none(&fill);

    let mut icon_area = if shape_type.is_group() {
        colors.none.clone()
    } else {
        line.clone()
    };
    let fill_in_corner = match shape_layout {
        ShapeLayout::Collapsed => true,
        ShapeLayout::Expanded => shape_type == ShapeType::Target,
        _ => false,
    };
    if fill_in_corner && has_fill {
        icon_area = fill.clone();
    }

    let mut font = or_default(raw.font, &colors.black);
    if shape_type == ShapeType::Target {
        match shape_layout {
            ShapeLayout::Expanded => font = palette.visible(&font, &icon_area),
            ShapeLayout::Collapsed => font = colors.black.clone(),
            _ => {}
        }
    }

    let badge = or_default(raw.badge, &line);
    let badge_font = palette.visible(&font, &badge);

    let icon = if shape_layout == ShapeLayout::ItemIcon {
        colors.coolgray.clone()
    } else {
        palette.visible(&colors.black, &icon_area)
    };

    let style = if shape_layout.is_expanded() || shape_layout == ShapeLayout::ItemStyle {
        line.clone()
    } else {
        palette.visible(&line, &icon_area)
    };

    DerivedColors {
        line,
        fill,
        font,
        badge,
        badge_font,
        icon,
        icon_area,
        style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(shape_type: ShapeType, shape_layout: ShapeLayout) -> ShapeIdentity {
        ShapeIdentity::new(shape_type, shape_layout)
    }

    fn derive(style: &str, shape_type: ShapeType, shape_layout: ShapeLayout) -> DerivedColors {
        let style = StyleMap::parse(style);
        derive_colors(
            &ColorPalette::default(),
            identity(shape_type, shape_layout),
            RawColors::from_style(&style),
        )
    }

    #[test]
    fn invalid_line_reverts_line_and_fill() {
        let previous = StyleMap::parse("strokeColor=#0000FF;fillColor=#D0E2FF;");
        let current = StyleMap::parse("strokeColor=#123456;fillColor=#D0E2FF;");
        let patch = reconcile_colors(
            &ColorPalette::default(),
            &ColorDeltas::from_styles(&previous, &current),
        );
        assert_eq!(
            patch.to_style_string(),
            "strokeColor=#0000FF;fillColor=#D0E2FF;"
        );
    }

    #[test]
    fn valid_line_is_accepted() {
        let previous = StyleMap::parse("strokeColor=#0F62FE;");
        let current = StyleMap::parse("strokeColor=#198038;");
        let patch = reconcile_colors(
            &ColorPalette::default(),
            &ColorDeltas::from_styles(&previous, &current),
        );
        assert!(patch.is_empty());
    }

    #[test]
    fn font_and_badge_revert_independently() {
        let previous = StyleMap::parse("fontColor=#000000;ibmBadgeColor=#DA1E28;strokeColor=#0F62FE;");
        let current = StyleMap::parse("fontColor=#78A9FF;ibmBadgeColor=#FFD7D9;strokeColor=#0F62FE;");
        let patch = reconcile_colors(
            &ColorPalette::default(),
            &ColorDeltas::from_styles(&previous, &current),
        );
        assert_eq!(
            patch,
            StyleMap::parse("fontColor=#000000;ibmBadgeColor=#DA1E28;")
        );
    }

    #[test]
    fn clearing_a_color_to_none_reverts() {
        let previous = StyleMap::parse("strokeColor=#0F62FE;fillColor=#EDF5FF;");
        let current = StyleMap::parse("strokeColor=none;fillColor=#EDF5FF;");
        let patch = reconcile_colors(
            &ColorPalette::default(),
            &ColorDeltas::from_styles(&previous, &current),
        );
        assert_eq!(patch.get("strokeColor"), Some("#0F62FE"));
    }

    #[test]
    fn unset_colors_take_defaults() {
        let colors = derive("", ShapeType::Node, ShapeLayout::Collapsed);
        assert_eq!(colors.line, "#000000");
        assert_eq!(colors.fill, "none");
        assert_eq!(colors.font, "#000000");
        assert_eq!(colors.badge, "#000000");
        assert_eq!(colors.icon_area, "#000000");
        assert_eq!(colors.icon, "#FFFFFF");
        assert_eq!(colors.style, "#FFFFFF");
    }

    #[test]
    fn collapsed_fill_moves_into_corner() {
        let colors = derive(
            "strokeColor=#0F62FE;fillColor=#D0E2FF;",
            ShapeType::Node,
            ShapeLayout::Collapsed,
        );
        assert_eq!(colors.icon_area, "#D0E2FF");
        assert_eq!(colors.icon, "#000000");
        assert_eq!(colors.style, "#0F62FE");
    }

    #[test]
    fn groups_have_no_corner_color() {
        let colors = derive(
            "strokeColor=#0043CE;",
            ShapeType::GroupLogical,
            ShapeLayout::Expanded,
        );
        assert_eq!(colors.icon_area, "none");
        assert_eq!(colors.icon, "#000000");
        assert_eq!(colors.style, "#0043CE");
    }

    #[test]
    fn target_font_follows_corner() {
        let expanded = derive(
            "strokeColor=#0F62FE;fillColor=#0043CE;fontColor=#000000;",
            ShapeType::Target,
            ShapeLayout::Expanded,
        );
        assert_eq!(expanded.font, "#FFFFFF");

        let collapsed = derive(
            "strokeColor=#0F62FE;fontColor=#FFFFFF;",
            ShapeType::Target,
            ShapeLayout::Collapsed,
        );
        assert_eq!(collapsed.font, "#000000");
    }

    #[test]
    fn legend_items() {
        let color = derive("strokeColor=#198038;", ShapeType::Node, ShapeLayout::ItemColor);
        assert_eq!(color.fill, "#198038");

        let icon = derive("strokeColor=#198038;", ShapeType::Node, ShapeLayout::ItemIcon);
        assert_eq!(icon.icon, "#697077");

        let style = derive("strokeColor=#198038;", ShapeType::Node, ShapeLayout::ItemStyle);
        assert_eq!(style.style, "#198038");
    }

    #[test]
    fn badge_font_contrasts_with_badge() {
        let colors = derive(
            "strokeColor=#0F62FE;ibmBadgeColor=#DA1E28;",
            ShapeType::Comp,
            ShapeLayout::Expanded,
        );
        assert_eq!(colors.badge, "#DA1E28");
        assert_eq!(colors.badge_font, "#FFFFFF");
    }

    #[test]
    fn derivation_is_repeatable() {
        let style = StyleMap::parse("strokeColor=rgb(15,98,254);fillColor=#EDF5FF;");
        let palette = ColorPalette::default();
        let id = identity(ShapeType::Actor, ShapeLayout::Collapsed);
        let first = derive_colors(&palette, id, RawColors::from_style(&style));
        let second = derive_colors(&palette, id, RawColors::from_style(&style));
        assert_eq!(first, second);
        assert_eq!(first.line, "#0F62FE");
    }
}
