use serde::Serialize;

use crate::color::{derive_colors, DerivedColors, RawColors};
use crate::config::{BadgeRules, DesignConfig};
use crate::geometry::{dimensions, GeometryProfile};
use crate::icons::{resolve_icon, IconCatalog, IconSource};
use crate::ir::{Point, Rect, ShapeAttributes, ShapeIdentity, ShapeLayout, ShapeType};
use crate::style::{StyleKey, StyleMap};
use crate::theme::{ColorPalette, SentinelColors};

const CONNECTION_POSITIONS: [f32; 11] = [0.1, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 0.75, 0.8, 0.9];
const ACTOR_CONNECTION_STEP: usize = 30;
const MULTIPLICITY_CONNECTION_OFFSET: f32 = 8.0;

/// Borrowed inputs every paint pass needs.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a DesignConfig,
    pub palette: &'a ColorPalette,
    pub icons: &'a dyn IconCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeMetrics {
    pub font_size: f32,
    pub extra_text_width: f32,
    pub width: f32,
    pub height: f32,
    pub center: f32,
    pub top: f32,
    pub text_y: f32,
    pub left_x: f32,
    pub right_x: f32,
    pub center_x: f32,
}

/// Relative anchor on the shape bounds plus an absolute offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectionPoint {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl ConnectionPoint {
    fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
        }
    }
}

/// Everything the paint layer needs to draw one base shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRenderParams {
    pub shape_type: ShapeType,
    pub shape_layout: ShapeLayout,
    pub shape_visible: bool,

    pub hide_icon: bool,
    pub rotate_icon: f32,

    pub style_dashed: bool,
    pub style_double: bool,
    pub style_strikethrough: bool,
    pub style_multiplicity: bool,

    pub second_line: bool,
    pub label_align: f32,
    pub label_height: f32,

    pub bar_visible: bool,
    pub sidebar_width: f32,
    pub sidebar_height: f32,

    pub tick_visible: bool,
    pub sidetick_width: f32,
    pub sidetick_height: f32,
    pub sidetick_align: f32,

    pub badge: String,
    pub badge_visible: bool,
    pub badge_color: String,
    pub badge_font_color: String,
    pub badge_text: Option<String>,
    pub badge_metrics: Option<BadgeMetrics>,

    pub line_color: String,
    pub fill_color: String,
    pub font_color: String,
    pub corner_color: String,
    pub style_color: String,

    pub corner_visible: bool,
    pub icon_color: String,
    pub icon: IconSource,
    pub icon_position: Point,

    pub icon_area_width: f32,
    pub corner_height: f32,

    pub shape_width: f32,
    pub shape_height: f32,
    pub curve_radius: f32,
    pub shape_align: f32,
    pub double_align: f32,
    pub multiplicity_align: f32,
    pub icon_size: f32,
    pub icon_align: f32,

    pub connection_points: Vec<ConnectionPoint>,
    /// Font color the host should write back when the style disagrees with it.
    pub font_color_update: Option<String>,
}

impl ShapeRenderParams {
    pub fn identity(&self) -> ShapeIdentity {
        ShapeIdentity::new(self.shape_type, self.shape_layout)
    }

    pub fn label_bounds(&self, rect: Rect, scale: f32) -> Rect {
        let inset = self.label_align * scale;
        Rect::new(
            rect.x + inset,
            rect.y,
            rect.width - inset,
            self.label_height * scale,
        )
    }
}

/// Font color a legend or unit should write back. Only a font left at black, gray
/// or none is rewritten, and only when it differs from the resolved value.
pub fn persisted_font_color(
    colors: &SentinelColors,
    style_font: Option<&str>,
    resolved: &str,
) -> Option<String> {
    let font = style_font?;
    let neutral = font == colors.black || font == colors.gray || font == colors.none;
    (neutral && font != resolved).then(|| resolved.to_string())
}

pub fn badge_metrics(
    rules: &BadgeRules,
    identity: ShapeIdentity,
    text: Option<&str>,
    shape_width: f32,
    shape_height: f32,
) -> BadgeMetrics {
    let char_width = rules.char_width_ratio * rules.font_size;
    let len = text.map(|t| t.chars().count()).unwrap_or(0);
    let extra_text_width = if len > 1 {
        char_width * (len - 1) as f32 + rules.text_padding
    } else {
        0.0
    };

    let item = identity.shape_layout.is_item();
    let center = if item { shape_height / 2.0 } else { 0.0 };
    let width = rules.height + extra_text_width;
    let offset = if identity.shape_type.is_round() {
        rules.round_offset
    } else {
        0.0
    };
    let space_right = -rules.height / 2.0 - offset;
    let right_x = if item {
        width
    } else {
        shape_width - space_right
    };
    let left_x = right_x - width;

    BadgeMetrics {
        font_size: rules.font_size,
        extra_text_width,
        width,
        height: rules.height,
        center,
        top: -rules.height / 2.0 + center,
        text_y: center - 1.0,
        left_x,
        right_x,
        center_x: (left_x + right_x) / 2.0,
    }
}

pub fn connection_points(identity: ShapeIdentity, multiplicity: bool) -> Vec<ConnectionPoint> {
    if identity.shape_layout.is_item() {
        return Vec::new();
    }

    if identity.shape_type == ShapeType::Actor {
        return (0..360)
            .step_by(ACTOR_CONNECTION_STEP)
            .map(|angle| {
                let radians = (angle as f32).to_radians();
                ConnectionPoint::at(0.5 + 0.5 * radians.cos(), 0.5 - 0.5 * radians.sin())
            })
            .collect();
    }

    let offset = if identity.shape_type != ShapeType::Target && multiplicity {
        MULTIPLICITY_CONNECTION_OFFSET
    } else {
        0.0
    };

    let mut points = Vec::with_capacity(CONNECTION_POSITIONS.len() * 4);
    points.extend(CONNECTION_POSITIONS.iter().map(|&p| ConnectionPoint::at(0.0, p)));
    points.extend(CONNECTION_POSITIONS.iter().map(|&p| ConnectionPoint {
        dx: offset,
        ..ConnectionPoint::at(1.0, p)
    }));
    points.extend(CONNECTION_POSITIONS.iter().map(|&p| ConnectionPoint {
        dy: -offset,
        ..ConnectionPoint::at(p, 0.0)
    }));
    points.extend(CONNECTION_POSITIONS.iter().map(|&p| ConnectionPoint::at(p, 1.0)));
    points
}

fn icon_position(
    identity: ShapeIdentity,
    icon_area_width: f32,
    icon_size: f32,
    curve_radius: f32,
    corner_height: f32,
) -> Point {
    let mut x = if identity.shape_type.is_group() {
        icon_area_width - icon_size
    } else {
        icon_area_width / 2.0 - icon_size / 2.0
    };
    if identity.shape_layout.is_expanded() && identity.shape_type == ShapeType::Target {
        x += curve_radius / 2.0;
    }
    if identity.shape_layout.is_item() {
        x = 0.0;
    }
    Point::new(x, corner_height / 2.0 - icon_size / 2.0)
}

/// Compose geometry, derived colors and visibility rules into paint parameters.
pub fn build(
    ctx: RenderContext<'_>,
    style: &StyleMap,
    attributes: &ShapeAttributes,
    width: f32,
    height: f32,
) -> ShapeRenderParams {
    let identity = ShapeIdentity::from_style(style);
    let ShapeIdentity {
        shape_type,
        shape_layout,
    } = identity;
    let item = shape_layout.is_item();
    let expanded = shape_layout.is_expanded();
    let collapsed = shape_layout == ShapeLayout::Collapsed;

    let shape_visible = expanded
        || collapsed
        || (item && !matches!(shape_layout, ShapeLayout::ItemBadge | ShapeLayout::ItemIcon));

    let hide_icon = style.flag(StyleKey::HideIcon) || (item && shape_layout != ShapeLayout::ItemIcon);
    let rotate_icon = style
        .value(StyleKey::RotateIcon)
        .trim()
        .parse::<f32>()
        .unwrap_or(0.0);

    let plain_item = matches!(shape_layout, ShapeLayout::ItemColor | ShapeLayout::ItemShape);
    let decorated = |key: StyleKey| !plain_item && style.flag(key);
    let style_dashed = decorated(StyleKey::StyleDashed);
    let style_double = decorated(StyleKey::StyleDouble);
    let style_strikethrough = decorated(StyleKey::StyleStrikethrough);
    let style_multiplicity = decorated(StyleKey::StyleMultiplicity);

    let profile: GeometryProfile = dimensions(&ctx.config.geometry, identity, width, height);
    let colors: DerivedColors = derive_colors(ctx.palette, identity, RawColors::from_style(style));

    // Driven by ibmDouble; dashed only adds it on collapsed and item shapes.
    let mut second_line = style_double;
    if collapsed || item {
        if style_dashed {
            second_line = true;
        }
    } else if expanded && shape_type == ShapeType::Target && style_dashed {
        second_line = false;
    }

    let mut corner_visible =
        shape_visible && (!hide_icon || !ctx.palette.is_none(&colors.icon_area));
    if item || (hide_icon && expanded && shape_type != ShapeType::Target) {
        corner_visible = false;
    }

    let icon_area_width = if corner_visible {
        profile.icon_area_width
    } else {
        0.0
    };
    let corner_height = profile.icon_area_height;

    let badge = style.value(StyleKey::Badge).to_string();
    let badge_visible = badge != StyleKey::Badge.default_value()
        && (collapsed || expanded || shape_layout == ShapeLayout::ItemBadge);
    let badge_text = if badge_visible {
        attributes.badge_text.clone()
    } else {
        None
    };

    let mut label_align = if expanded {
        if shape_type == ShapeType::Target && hide_icon {
            0.0
        } else {
            icon_area_width
        }
    } else {
        profile.label_align
    };

    let badge_metrics = badge_visible.then(|| {
        badge_metrics(
            &ctx.config.badge,
            identity,
            badge_text.as_deref(),
            profile.shape_width,
            profile.shape_height,
        )
    });
    if let Some(metrics) = &badge_metrics {
        if item {
            label_align = ctx.config.badge.item_label_offset
                + metrics.extra_text_width
                + ctx.config.badge.item_label_gap;
        }
    }

    let icon = resolve_icon(
        ctx.icons,
        attributes.icon_name.as_deref(),
        style.get(StyleKey::Image.name()),
        &ctx.config.shapes.stencil_prefix,
        &ctx.config.shapes.undefined_icon,
    );
    let icon_position = icon_position(
        identity,
        icon_area_width,
        profile.icon_size,
        profile.curve_radius,
        corner_height,
    );

    let font_color_update = (style.get(StyleKey::FontColor.name()) != Some(colors.font.as_str()))
        .then(|| colors.font.clone());

    ShapeRenderParams {
        shape_type,
        shape_layout,
        shape_visible,
        hide_icon,
        rotate_icon,
        style_dashed,
        style_double,
        style_strikethrough,
        style_multiplicity,
        second_line,
        label_align,
        label_height: profile.label_height,
        bar_visible: shape_type.is_group(),
        sidebar_width: profile.sidebar_width,
        sidebar_height: profile.sidebar_height,
        tick_visible: shape_type.is_comp(),
        sidetick_width: profile.sidetick_width,
        sidetick_height: profile.sidetick_height,
        sidetick_align: profile.sidetick_align,
        badge,
        badge_visible,
        badge_color: colors.badge,
        badge_font_color: colors.badge_font,
        badge_text,
        badge_metrics,
        line_color: colors.line,
        fill_color: colors.fill,
        font_color: colors.font,
        corner_color: colors.icon_area,
        style_color: colors.style,
        corner_visible,
        icon_color: colors.icon,
        icon,
        icon_position,
        icon_area_width,
        corner_height,
        shape_width: profile.shape_width,
        shape_height: profile.shape_height,
        curve_radius: profile.curve_radius,
        shape_align: profile.shape_align,
        double_align: profile.double_align,
        multiplicity_align: profile.multiplicity_align,
        icon_size: profile.icon_size,
        icon_align: profile.icon_align,
        connection_points: connection_points(identity, style_multiplicity),
        font_color_update,
    }
}
