use serde::Serialize;

use crate::config::GeometryRules;
use crate::ir::{Rect, ShapeIdentity, ShapeLayout, ShapeType};

/// Design-grid measurements of a base shape for one type/layout pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryProfile {
    pub min_width: f32,
    pub min_height: f32,
    pub default_width: f32,
    pub default_height: f32,
    pub shape_width: f32,
    pub shape_height: f32,
    pub curve_radius: f32,
    pub shape_align: f32,
    pub icon_area_width: f32,
    pub icon_area_height: f32,
    pub sidebar_width: f32,
    pub sidebar_height: f32,
    pub label_height: f32,
    pub label_align: f32,
    pub sidetick_width: f32,
    pub sidetick_height: f32,
    pub sidetick_align: f32,
    pub multiplicity_align: f32,
    pub double_align: f32,
    pub icon_size: f32,
    pub icon_spacing: f32,
    pub icon_align: f32,
}

pub fn dimensions(
    rules: &GeometryRules,
    identity: ShapeIdentity,
    width: f32,
    height: f32,
) -> GeometryProfile {
    let ShapeIdentity {
        shape_type,
        shape_layout,
    } = identity;
    let round = shape_type.is_round();

    let min_height = if shape_layout.is_item() {
        rules.item_min_height
    } else {
        rules.min_height
    };
    let label_height = if shape_layout.is_expanded() {
        rules.expanded_label_height
    } else {
        rules.label_height
    };
    let shape_align = if shape_type == ShapeType::Target && shape_layout == ShapeLayout::ItemShape {
        rules.item.target_shape_align
    } else {
        0.0
    };

    let mut profile = GeometryProfile {
        min_width: 0.0,
        min_height,
        default_width: 0.0,
        default_height: min_height,
        shape_width: width,
        shape_height: height,
        curve_radius: if round {
            rules.round_curve_radius
        } else {
            rules.curve_radius
        },
        shape_align,
        icon_area_width: 0.0,
        icon_area_height: min_height,
        sidebar_width: 0.0,
        sidebar_height: 0.0,
        label_height,
        label_align: 0.0,
        sidetick_width: rules.sidetick.width,
        sidetick_height: rules.sidetick.height,
        sidetick_align: rules.sidetick.align,
        multiplicity_align: rules.multiplicity_align,
        double_align: rules.double_align,
        icon_size: rules.icon_size,
        icon_spacing: rules.icon_spacing,
        icon_align: rules.icon_spacing,
    };

    if shape_layout == ShapeLayout::Collapsed {
        let collapsed = &rules.collapsed;
        profile.min_width = if shape_type == ShapeType::Target {
            collapsed.target_min_width
        } else {
            collapsed.min_width
        };
        profile.default_width = profile.min_width;
        profile.icon_area_width = profile.min_width;
    } else if shape_layout.is_expanded() {
        let expanded = &rules.expanded;
        profile.min_width = expanded.min_width;
        profile.default_width = expanded.default_width;
        if shape_type != ShapeType::Target {
            profile.default_height = expanded.default_height;
        }
        profile.icon_area_width = if shape_type.is_group() {
            rules.icon_spacing + rules.icon_size
        } else if shape_type == ShapeType::Target {
            rules.icon_spacing + rules.icon_size - expanded.target_icon_inset
        } else {
            2.0 * rules.icon_spacing + rules.icon_size
        };
        profile.sidebar_width = expanded.sidebar_width;
        profile.sidebar_height = expanded.sidebar_height;
    } else if shape_layout.is_item() {
        let item = &rules.item;
        profile.min_width = item.min_width;
        profile.default_width = item.min_width;

        let swatch = matches!(
            shape_layout,
            ShapeLayout::ItemStyle | ShapeLayout::ItemColor | ShapeLayout::ItemBadge
        );
        let (shape_width, label_align) = if swatch {
            (item.swatch_shape_width, item.swatch_label_align)
        } else if shape_type == ShapeType::Target {
            (item.target_shape_width, item.label_align)
        } else {
            (item.shape_width, item.label_align)
        };
        profile.shape_width = shape_width;
        profile.label_align = label_align;
        profile.curve_radius = if round {
            item.round_curve_radius
        } else {
            item.curve_radius
        };
        profile.icon_area_width = shape_width;
        profile.sidebar_width = item.sidebar_width;
        profile.sidebar_height = item.sidebar_height;
        profile.sidetick_width = item.sidetick.width;
        profile.sidetick_height = item.sidetick.height;
        profile.sidetick_align = item.sidetick.align;
        profile.multiplicity_align = item.multiplicity_align;
        profile.double_align = item.double_align;
        profile.icon_size = item.icon_size;
        profile.icon_spacing = item.icon_spacing;
        profile.icon_align = item.icon_spacing;
    }

    profile
}

/// Smallest legal rectangle for `proposed` under the given type and layout.
///
/// `using_min_size` is set for interactive resizes; layout-change repairs leave
/// it unset so expanded shapes grow to their default width.
pub fn minimum_rect(
    rules: &GeometryRules,
    using_min_size: bool,
    proposed: Rect,
    identity: ShapeIdentity,
) -> Rect {
    let profile = dimensions(rules, identity, proposed.width, proposed.height);
    let mut width = profile.min_width.max(proposed.width);
    let mut height = profile.min_height;

    if identity.shape_layout == ShapeLayout::Collapsed {
        width = profile.min_width;
    } else if identity.shape_layout.is_expanded() {
        let floor = if using_min_size {
            profile.min_width
        } else {
            profile.default_width
        };
        width = floor.max(width);
        height = if identity.shape_type == ShapeType::Target {
            profile.min_height
        } else {
            profile.min_height.max(proposed.height)
        };
    }

    proposed.with_size(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(shape_type: ShapeType, shape_layout: ShapeLayout) -> GeometryProfile {
        dimensions(
            &GeometryRules::default(),
            ShapeIdentity::new(shape_type, shape_layout),
            200.0,
            100.0,
        )
    }

    #[test]
    fn collapsed_target() {
        let p = profile(ShapeType::Target, ShapeLayout::Collapsed);
        assert_eq!(p.min_width, 64.0);
        assert_eq!(p.curve_radius, 24.0);
        assert_eq!(p.icon_area_width, 64.0);
        assert_eq!(p.min_height, 48.0);
        assert_eq!(p.label_height, 16.0);
    }

    #[test]
    fn collapsed_node() {
        let p = profile(ShapeType::Node, ShapeLayout::Collapsed);
        assert_eq!(p.min_width, 48.0);
        assert_eq!(p.default_width, 48.0);
        assert_eq!(p.curve_radius, 8.0);
        assert_eq!(p.shape_width, 200.0);
    }

    #[test]
    fn expanded_icon_areas() {
        assert_eq!(
            profile(ShapeType::GroupPhysical, ShapeLayout::Expanded).icon_area_width,
            34.0
        );
        assert_eq!(
            profile(ShapeType::Target, ShapeLayout::Expanded).icon_area_width,
            30.0
        );
        let node = profile(ShapeType::Comp, ShapeLayout::ExpandedStack);
        assert_eq!(node.icon_area_width, 48.0);
        assert_eq!(node.min_width, 96.0);
        assert_eq!(node.default_width, 240.0);
        assert_eq!(node.default_height, 152.0);
        assert_eq!((node.sidebar_width, node.sidebar_height), (4.0, 48.0));
        assert_eq!(node.label_height, 48.0);
    }

    #[test]
    fn item_sub_kinds() {
        let swatch = profile(ShapeType::Node, ShapeLayout::ItemColor);
        assert_eq!((swatch.shape_width, swatch.label_align), (32.0, 40.0));
        assert_eq!(swatch.min_height, 16.0);

        let target = profile(ShapeType::Target, ShapeLayout::ItemShape);
        assert_eq!((target.shape_width, target.label_align), (20.0, 24.0));
        assert_eq!(target.curve_radius, 8.0);
        assert_eq!(target.shape_align, -2.0);

        let other = profile(ShapeType::Comp, ShapeLayout::ItemIcon);
        assert_eq!((other.shape_width, other.label_align), (16.0, 24.0));
        assert_eq!(other.curve_radius, 4.0);
        assert_eq!(other.icon_size, 16.0);
        assert_eq!(other.icon_align, 0.0);
        assert_eq!(
            (other.sidetick_width, other.sidetick_height, other.sidetick_align),
            (4.0, 2.0, -2.0)
        );
    }

    #[test]
    fn minimum_rect_per_tier() {
        let rules = GeometryRules::default();
        let proposed = Rect::new(10.0, 20.0, 30.0, 30.0);

        let collapsed = minimum_rect(
            &rules,
            true,
            Rect::new(10.0, 20.0, 300.0, 300.0),
            ShapeIdentity::new(ShapeType::Node, ShapeLayout::Collapsed),
        );
        assert_eq!(collapsed, Rect::new(10.0, 20.0, 48.0, 48.0));

        let expanded = minimum_rect(
            &rules,
            false,
            proposed,
            ShapeIdentity::new(ShapeType::Node, ShapeLayout::Expanded),
        );
        assert_eq!(expanded, Rect::new(10.0, 20.0, 240.0, 48.0));

        let resized = minimum_rect(
            &rules,
            true,
            Rect::new(0.0, 0.0, 120.0, 200.0),
            ShapeIdentity::new(ShapeType::Node, ShapeLayout::Expanded),
        );
        assert_eq!(resized, Rect::new(0.0, 0.0, 120.0, 200.0));

        let target = minimum_rect(
            &rules,
            true,
            Rect::new(0.0, 0.0, 120.0, 200.0),
            ShapeIdentity::new(ShapeType::Target, ShapeLayout::Expanded),
        );
        assert_eq!(target.height, 48.0);

        let item = minimum_rect(
            &rules,
            true,
            proposed,
            ShapeIdentity::new(ShapeType::Node, ShapeLayout::ItemBadge),
        );
        assert_eq!(item, Rect::new(10.0, 20.0, 64.0, 16.0));
    }

    #[test]
    fn dimensions_are_repeatable() {
        let a = profile(ShapeType::Actor, ShapeLayout::Expanded);
        let b = profile(ShapeType::Actor, ShapeLayout::Expanded);
        assert_eq!(a, b);
    }
}
