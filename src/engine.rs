//! Entry point the host talks to.
//!
//! An [`Engine`] owns one immutable design-token table and the palette index
//! built from it. Every call is a pure function of its arguments and that table.

use serde::Serialize;

use crate::config::DesignConfig;
use crate::icons::{EmptyCatalog, IconCatalog};
use crate::ir::{AttributeName, Rect, ShapeAttributes};
use crate::log::debug;
use crate::render::{RenderContext, ShapeRenderParams};
use crate::shape::{
    BaseShape, LegendRenderParams, LegendShape, Reconciliation, ShapeCapability, ShapeKind,
    StyleChange, UnitRenderParams, UnitShape,
};
use crate::style::StyleMap;
use crate::theme::ColorPalette;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderParams {
    Base(ShapeRenderParams),
    Legend(LegendRenderParams),
    Unit(UnitRenderParams),
}

pub struct Engine {
    config: DesignConfig,
    palette: ColorPalette,
    icons: Box<dyn IconCatalog + Send + Sync>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DesignConfig::default())
    }
}

impl Engine {
    pub fn new(config: DesignConfig) -> Self {
        let palette = config.palette();
        debug!(colors = palette.len(), "engine palette indexed");
        Self {
            config,
            palette,
            icons: Box::new(EmptyCatalog),
        }
    }

    pub fn with_icons(mut self, icons: impl IconCatalog + Send + Sync + 'static) -> Self {
        self.icons = Box::new(icons);
        self
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    fn ctx(&self) -> RenderContext<'_> {
        RenderContext {
            config: &self.config,
            palette: &self.palette,
            icons: &*self.icons,
        }
    }

    pub fn kind(&self, style: &StyleMap) -> Option<ShapeKind> {
        ShapeKind::from_style(&self.config.shapes, style)
    }

    /// Paint parameters for an IBM shape; `None` for any other shape.
    pub fn render_params(
        &self,
        style: &StyleMap,
        attributes: &ShapeAttributes,
        width: f32,
        height: f32,
    ) -> Option<RenderParams> {
        let ctx = self.ctx();
        let params = match self.kind(style)? {
            ShapeKind::Base => {
                RenderParams::Base(BaseShape.render_params(ctx, style, attributes, width, height))
            }
            ShapeKind::Legend => RenderParams::Legend(
                LegendShape.render_params(ctx, style, attributes, width, height),
            ),
            ShapeKind::Unit => {
                RenderParams::Unit(UnitShape.render_params(ctx, style, attributes, width, height))
            }
        };
        Some(params)
    }

    /// Smallest legal bounds for a resize. Non-IBM shapes keep `proposed`.
    pub fn minimum_rect(&self, style: &StyleMap, using_min_size: bool, proposed: Rect) -> Rect {
        let config = &self.config;
        match self.kind(style) {
            Some(ShapeKind::Base) => BaseShape.minimum_rect(config, style, using_min_size, proposed),
            Some(ShapeKind::Legend) => {
                LegendShape.minimum_rect(config, style, using_min_size, proposed)
            }
            Some(ShapeKind::Unit) => UnitShape.minimum_rect(config, style, using_min_size, proposed),
            None => proposed,
        }
    }

    pub fn reconcile(&self, change: &StyleChange<'_>) -> Reconciliation {
        let ctx = self.ctx();
        let result = match ShapeKind::for_change(&self.config.shapes, change) {
            Some(ShapeKind::Base) => BaseShape.reconcile(ctx, change),
            Some(ShapeKind::Legend) => LegendShape.reconcile(ctx, change),
            Some(ShapeKind::Unit) => UnitShape.reconcile(ctx, change),
            None => Reconciliation::default(),
        };
        debug!(
            patch = %result.style_patch,
            geometry = ?result.geometry,
            "reconciled style change"
        );
        result
    }

    pub fn required_attributes(&self, style: &StyleMap) -> &'static [AttributeName] {
        match self.kind(style) {
            Some(ShapeKind::Base) => BaseShape.required_attributes(),
            Some(ShapeKind::Legend) => LegendShape.required_attributes(),
            Some(ShapeKind::Unit) => UnitShape.required_attributes(),
            None => &[],
        }
    }

    /// Required attributes the cell lacks; the host creates them with an empty value.
    pub fn missing_attributes(
        &self,
        style: &StyleMap,
        attributes: &ShapeAttributes,
    ) -> Vec<AttributeName> {
        attributes.missing(self.required_attributes(style))
    }
}
