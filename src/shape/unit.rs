use serde::Serialize;

use crate::config::{DesignConfig, ShapeNames, UnitRules};
use crate::icons::IconSource;
use crate::ir::{AttributeName, Point, Rect, ShapeAttributes, UnitType};
use crate::render::{persisted_font_color, RenderContext};
use crate::style::{StyleKey, StyleMap};

use super::{Reconciliation, ShapeCapability, StyleChange};

const REQUIRED: &[AttributeName] = &[AttributeName::PrimaryLabel, AttributeName::SecondaryText];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRenderParams {
    pub unit_type: Option<UnitType>,
    pub label_height: f32,
    pub label_align: f32,
    pub hide_icon: bool,
    pub rotate_icon: f32,
    pub icon_color: String,
    pub icon_size: f32,
    pub icon_align: f32,
    pub icon_position: Point,
    pub icon: IconSource,
    pub line_color: String,
    pub fill_color: String,
    pub font_color: String,
    pub font_color_update: Option<String>,
}

impl UnitRenderParams {
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

pub fn unit_icon(names: &ShapeNames, rules: &UnitRules, unit_type: Option<UnitType>) -> IconSource {
    match unit_type {
        Some(unit_type) => IconSource::Stencil(format!(
            "{}{}{}",
            names.stencil_prefix,
            rules.stencil_family,
            unit_type.stencil_suffix()
        )),
        None => IconSource::Undefined(format!("{}{}", names.stencil_prefix, names.undefined_icon)),
    }
}

/// Deployment units: fixed label band and a type stencil in the top-left corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitShape;

impl ShapeCapability for UnitShape {
    type Params = UnitRenderParams;

    fn render_params(
        &self,
        ctx: RenderContext<'_>,
        style: &StyleMap,
        _attributes: &ShapeAttributes,
        _width: f32,
        _height: f32,
    ) -> UnitRenderParams {
        let config = ctx.config;
        let rules = &config.unit;
        let unit_type = UnitType::from_token(style.value(StyleKey::ShapeType));
        let fill_color = style.value(StyleKey::FillColor);
        let font_color = ctx
            .palette
            .visible(style.value(StyleKey::FontColor), fill_color);
        let font_color_update = persisted_font_color(
            &config.colors,
            style.get(StyleKey::FontColor.name()),
            &font_color,
        );

        UnitRenderParams {
            unit_type,
            label_height: rules.label_height,
            label_align: rules.label_align,
            hide_icon: false,
            rotate_icon: 0.0,
            icon_color: config.colors.black.clone(),
            icon_size: rules.icon_size,
            icon_align: rules.icon_align,
            icon_position: Point::new(rules.icon_align, rules.icon_align),
            icon: unit_icon(&config.shapes, rules, unit_type),
            line_color: style.value(StyleKey::LineColor).to_string(),
            fill_color: fill_color.to_string(),
            font_color,
            font_color_update,
        }
    }

    fn minimum_rect(
        &self,
        _config: &DesignConfig,
        _style: &StyleMap,
        _using_min_size: bool,
        proposed: Rect,
    ) -> Rect {
        proposed
    }

    fn reconcile(&self, _ctx: RenderContext<'_>, _change: &StyleChange<'_>) -> Reconciliation {
        Reconciliation::default()
    }

    fn required_attributes(&self) -> &'static [AttributeName] {
        REQUIRED
    }
}
