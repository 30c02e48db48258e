//! Shape kinds and the capability every kind exposes to the host.
//!
//! Base, legend and unit shapes share only style and geometry plumbing, so each
//! is its own type implementing [`ShapeCapability`]. [`ShapeKind`] picks one
//! from the style's `shape` key.

mod base;
mod legend;
mod unit;

pub use base::BaseShape;
pub use legend::{legend_size, LegendRenderParams, LegendShape};
pub use unit::{UnitRenderParams, UnitShape};

use serde::Serialize;

use crate::config::{DesignConfig, ShapeNames};
use crate::ir::{AttributeName, AttributeUpdate, Rect, ShapeAttributes};
use crate::render::RenderContext;
use crate::style::{StyleKey, StyleMap};

/// One host change event for a single cell.
#[derive(Debug, Clone, Copy)]
pub struct StyleChange<'a> {
    pub previous: &'a StyleMap,
    pub current: &'a StyleMap,
    /// Cell bounds at the time of the event, when the host wants geometry repairs.
    pub geometry: Option<Rect>,
    pub attributes: &'a ShapeAttributes,
    /// Bounds of the cell's children, used by containers that size to their content.
    pub children: &'a [Rect],
}

impl<'a> StyleChange<'a> {
    pub fn new(previous: &'a StyleMap, current: &'a StyleMap) -> Self {
        Self {
            previous,
            current,
            geometry: None,
            attributes: &EMPTY_ATTRIBUTES,
            children: &[],
        }
    }

    pub fn with_geometry(mut self, geometry: Rect) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_attributes(mut self, attributes: &'a ShapeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_children(mut self, children: &'a [Rect]) -> Self {
        self.children = children;
        self
    }
}

static EMPTY_ATTRIBUTES: ShapeAttributes = ShapeAttributes {
    icon_name: None,
    badge_text: None,
    primary_label: None,
    secondary_text: None,
    legend_title: None,
};

/// Corrections the host applies in one transaction. Never applied by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub style_patch: StyleMap,
    pub geometry: Option<Rect>,
    pub attribute_updates: Vec<AttributeUpdate>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.style_patch.is_empty() && self.geometry.is_none() && self.attribute_updates.is_empty()
    }

    /// Drop patch entries that would leave `current` as it is.
    pub fn compact(&self, current: &StyleMap) -> Reconciliation {
        Reconciliation {
            style_patch: self.style_patch.without_noops(current),
            ..self.clone()
        }
    }

    /// `current` with the style patch applied.
    pub fn patched_style(&self, current: &StyleMap) -> StyleMap {
        let mut style = current.clone();
        style.apply(&self.style_patch);
        style
    }
}

pub trait ShapeCapability {
    type Params: Serialize;

    fn render_params(
        &self,
        ctx: RenderContext<'_>,
        style: &StyleMap,
        attributes: &ShapeAttributes,
        width: f32,
        height: f32,
    ) -> Self::Params;

    fn minimum_rect(
        &self,
        config: &DesignConfig,
        style: &StyleMap,
        using_min_size: bool,
        proposed: Rect,
    ) -> Rect;

    fn reconcile(&self, ctx: RenderContext<'_>, change: &StyleChange<'_>) -> Reconciliation;

    /// Attributes the host creates with an empty value when a cell lacks them.
    fn required_attributes(&self) -> &'static [AttributeName];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Base,
    Legend,
    Unit,
}

impl ShapeKind {
    pub fn from_shape_name(names: &ShapeNames, shape: &str) -> Option<Self> {
        if shape == names.base {
            Some(Self::Base)
        } else if shape == names.legend {
            Some(Self::Legend)
        } else if shape == names.unit {
            Some(Self::Unit)
        } else {
            None
        }
    }

    pub fn from_style(names: &ShapeNames, style: &StyleMap) -> Option<Self> {
        Self::from_shape_name(names, style.value(StyleKey::Shape))
    }

    /// Kind that owns a change event. A base shape that just had an image
    /// dropped on it no longer names itself in `shape`, but is still ours.
    pub fn for_change(names: &ShapeNames, change: &StyleChange<'_>) -> Option<Self> {
        Self::from_style(names, change.current).or_else(|| {
            base::is_image_drop(names, change.previous, change.current).then_some(Self::Base)
        })
    }
}
