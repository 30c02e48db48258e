use serde::Serialize;

use crate::config::{DesignConfig, LegendRules};
use crate::ir::{AttributeName, LegendLayout, Rect, ShapeAttributes};
use crate::log::debug;
use crate::render::{persisted_font_color, RenderContext};
use crate::style::{StyleDelta, StyleKey, StyleMap};

use super::{Reconciliation, ShapeCapability, StyleChange};

const REQUIRED: &[AttributeName] = &[AttributeName::LegendTitle];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendRenderParams {
    pub legend_layout: LegendLayout,
    pub show_title: bool,
    pub line_color: String,
    pub fill_color: String,
    pub font_color: String,
    pub padding: f32,
    pub title_height: f32,
    pub font_color_update: Option<String>,
}

impl LegendRenderParams {
    /// Title band inset by the padding on every side but the bottom.
    pub fn label_bounds(&self, rect: Rect, scale: f32) -> Rect {
        let inset = self.padding * scale;
        Rect::new(
            rect.x + inset,
            rect.y + inset,
            rect.width - 2.0 * inset,
            self.title_height * scale,
        )
    }
}

fn legend_layout(style: &StyleMap) -> LegendLayout {
    LegendLayout::from_token(style.value_or(StyleKey::ShapeType, LegendLayout::DEFAULT.token()))
        .unwrap_or(LegendLayout::DEFAULT)
}

fn margin_top(rules: &LegendRules, show_title: bool) -> f32 {
    if show_title {
        rules.titlebar
    } else {
        rules.padding
    }
}

/// Width and height a legend needs to hold `children`.
pub fn legend_size(
    rules: &LegendRules,
    layout: LegendLayout,
    show_title: bool,
    children: &[Rect],
) -> (f32, f32) {
    let title = if show_title { rules.titlebar } else { 0.0 };
    let min_height = title + rules.item_height + 2.0 * rules.padding;

    let mut width = 2.0 * rules.padding;
    let mut height = margin_top(rules, show_title);
    for child in children {
        match layout {
            LegendLayout::Horizontal => {
                width += child.width + rules.padding;
                height = min_height;
            }
            LegendLayout::Vertical => {
                width = width.max(child.width + 2.0 * rules.padding);
                height += child.height + rules.padding;
            }
        }
    }

    (width.max(rules.min_width), height.max(min_height))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LegendShape;

impl ShapeCapability for LegendShape {
    type Params = LegendRenderParams;

    fn render_params(
        &self,
        ctx: RenderContext<'_>,
        style: &StyleMap,
        _attributes: &ShapeAttributes,
        _width: f32,
        _height: f32,
    ) -> LegendRenderParams {
        let rules = &ctx.config.legend;
        let none = ctx.config.colors.none.as_str();
        let fill_color = style.value_or(StyleKey::FillColor, none);
        let font_color = ctx
            .palette
            .visible(style.value_or(StyleKey::FontColor, none), fill_color);
        let font_color_update = persisted_font_color(
            &ctx.config.colors,
            style.get(StyleKey::FontColor.name()),
            &font_color,
        );

        LegendRenderParams {
            legend_layout: legend_layout(style),
            show_title: !style.flag(StyleKey::HideHeader),
            line_color: style.value_or(StyleKey::LineColor, none).to_string(),
            fill_color: fill_color.to_string(),
            font_color,
            padding: rules.padding,
            title_height: rules.title_height,
            font_color_update,
        }
    }

    fn minimum_rect(
        &self,
        config: &DesignConfig,
        style: &StyleMap,
        _using_min_size: bool,
        proposed: Rect,
    ) -> Rect {
        let (width, height) = legend_size(
            &config.legend,
            legend_layout(style),
            !style.flag(StyleKey::HideHeader),
            &[],
        );
        proposed.with_size(proposed.width.max(width), proposed.height.max(height))
    }

    fn reconcile(&self, ctx: RenderContext<'_>, change: &StyleChange<'_>) -> Reconciliation {
        let config = ctx.config;
        let StyleChange {
            previous, current, ..
        } = *change;
        if current.value(StyleKey::Shape) != config.shapes.legend {
            return Reconciliation::default();
        }

        let rules = &config.legend;
        let layout = StyleDelta::of_or(
            previous,
            current,
            StyleKey::ShapeType,
            LegendLayout::DEFAULT.token(),
        );
        let header = StyleDelta::of(previous, current, StyleKey::HideHeader);
        if !layout.changed && !header.changed {
            return Reconciliation::default();
        }

        let orientation = legend_layout(current);
        let show_title = !header.is_on();
        let margin = margin_top(rules, show_title).to_string();
        let mut patch = StyleMap::new();

        if layout.changed {
            let horizontal = orientation == LegendLayout::Horizontal;
            patch.insert("stackFill", Some(if horizontal { "0" } else { "1" }.to_string()));
            patch.insert(
                "horizontalStack",
                Some(if horizontal { "1" } else { "0" }.to_string()),
            );
            patch.insert("marginTop", Some(margin.clone()));
        }
        if header.changed {
            patch.insert("noLabel", Some(if show_title { "0" } else { "1" }.to_string()));
            patch.insert("marginTop", Some(margin));
        }

        let geometry = change.geometry.and_then(|bounds| {
            let (width, height) = legend_size(rules, orientation, show_title, change.children);
            let rect = bounds.with_size(width, height);
            (!rect.same_size(&bounds)).then_some(rect)
        });
        debug!(layout = %orientation.token(), show_title, "legend restyled");

        Reconciliation {
            style_patch: patch,
            geometry,
            attribute_updates: Vec::new(),
        }
    }

    fn required_attributes(&self) -> &'static [AttributeName] {
        REQUIRED
    }
}
