use crate::color::{reconcile_colors, ColorDeltas};
use crate::config::{DesignConfig, ShapeNames};
use crate::decoration::{reconcile_decorations, DecorationDeltas};
use crate::geometry::minimum_rect;
use crate::icons::IconCatalog;
use crate::ir::{
    AttributeName, AttributeUpdate, Rect, ShapeAttributes, ShapeIdentity, ShapeLayout, ShapeType,
};
use crate::layout::{reconcile_layout, LayoutBundle, LayoutDeltas};
use crate::log::debug;
use crate::render::{build, RenderContext, ShapeRenderParams};
use crate::style::{StyleDelta, StyleKey, StyleMap};

use super::{Reconciliation, ShapeCapability, StyleChange};

const REQUIRED: &[AttributeName] = &[
    AttributeName::BadgeText,
    AttributeName::IconName,
    AttributeName::PrimaryLabel,
    AttributeName::SecondaryText,
];

/// Previous style was a base shape and the current one carries a dropped image.
pub(super) fn is_image_drop(names: &ShapeNames, previous: &StyleMap, current: &StyleMap) -> bool {
    current.value(StyleKey::Shape) != names.base
        && previous.value(StyleKey::Shape) == names.base
        && current.contains_key(StyleKey::Image.name())
}

/// Icon name matching the new type's logical/prescribed variant, if the catalog has one.
fn icon_variant_update(
    icons: &dyn IconCatalog,
    shape_type: &StyleDelta<String>,
    attributes: &ShapeAttributes,
) -> Option<AttributeUpdate> {
    if !shape_type.changed {
        return None;
    }
    let marker = ShapeType::from_token_or_default(&shape_type.current).variant_marker()?;
    let name = attributes.icon_name.as_deref()?;
    let variant = icons.variant(name, marker)?;
    (variant != name).then(|| AttributeUpdate {
        name: AttributeName::IconName,
        value: variant,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseShape;

impl ShapeCapability for BaseShape {
    type Params = ShapeRenderParams;

    fn render_params(
        &self,
        ctx: RenderContext<'_>,
        style: &StyleMap,
        attributes: &ShapeAttributes,
        width: f32,
        height: f32,
    ) -> ShapeRenderParams {
        build(ctx, style, attributes, width, height)
    }

    fn minimum_rect(
        &self,
        config: &DesignConfig,
        style: &StyleMap,
        using_min_size: bool,
        proposed: Rect,
    ) -> Rect {
        minimum_rect(
            &config.geometry,
            using_min_size,
            proposed,
            ShapeIdentity::from_style(style),
        )
    }

    fn reconcile(&self, ctx: RenderContext<'_>, change: &StyleChange<'_>) -> Reconciliation {
        let config = ctx.config;
        let StyleChange {
            previous, current, ..
        } = *change;

        let image_drop = is_image_drop(&config.shapes, previous, current);
        if current.value(StyleKey::Shape) != config.shapes.base && !image_drop {
            return Reconciliation::default();
        }

        let layout = LayoutDeltas::from_styles(previous, current);
        let mut patch = StyleMap::new();

        if image_drop {
            debug!(shape = %config.shapes.base, "image dropped on shape, restoring stencil");
            patch.set(StyleKey::Shape, config.shapes.base.clone());
        }

        if layout.changed() {
            patch.merge(&reconcile_layout(&config.properties, &layout));
        } else if image_drop {
            let bundle = LayoutBundle::for_layout(
                ShapeType::from_token_or_default(&layout.shape_type.current),
                ShapeLayout::from_token(&layout.shape_layout.current),
                layout.hide_icon.is_on(),
            );
            patch.merge(&bundle.style(&config.properties));
        }

        let attribute_updates =
            icon_variant_update(ctx.icons, &layout.shape_type, change.attributes)
                .into_iter()
                .collect();

        patch.merge(&reconcile_decorations(
            &config.properties,
            &DecorationDeltas::from_styles(previous, current),
        ));
        patch.merge(&reconcile_colors(
            ctx.palette,
            &ColorDeltas::from_styles(previous, current),
        ));

        let geometry = change
            .geometry
            .filter(|_| layout.shape_type.changed || layout.shape_layout.changed)
            .and_then(|bounds| {
                let effective_layout = patch
                    .get(StyleKey::ShapeLayout.name())
                    .unwrap_or(layout.shape_layout.current.as_str());
                let identity = ShapeIdentity::new(
                    ShapeType::from_token_or_default(&layout.shape_type.current),
                    ShapeLayout::from_token_or_default(effective_layout),
                );
                let rect = minimum_rect(&config.geometry, false, bounds, identity);
                (!rect.same_size(&bounds)).then_some(rect)
            });

        Reconciliation {
            style_patch: patch,
            geometry,
            attribute_updates,
        }
    }

    fn required_attributes(&self) -> &'static [AttributeName] {
        REQUIRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::{FlatIconCatalog, IconEntry};
    use crate::theme::ColorPalette;

    struct Fixture {
        config: DesignConfig,
        palette: ColorPalette,
        icons: FlatIconCatalog,
    }

    impl Fixture {
        fn new() -> Self {
            let config = DesignConfig::default();
            let palette = config.palette();
            let mut icons = FlatIconCatalog::new();
            icons.insert(
                "virtual-server",
                IconEntry {
                    iconl: Some("virtual-server--logical".to_string()),
                    ..IconEntry::default()
                },
            );
            Self {
                config,
                palette,
                icons,
            }
        }

        fn ctx(&self) -> RenderContext<'_> {
            RenderContext {
                config: &self.config,
                palette: &self.palette,
                icons: &self.icons,
            }
        }

        fn reconcile(&self, previous: &str, current: &str) -> Reconciliation {
            let previous = StyleMap::parse(previous);
            let current = StyleMap::parse(current);
            BaseShape.reconcile(self.ctx(), &StyleChange::new(&previous, &current))
        }
    }

    #[test]
    fn foreign_shapes_are_ignored() {
        let fixture = Fixture::new();
        let result = fixture.reconcile("shape=rectangle;", "shape=rectangle;ibmLayout=expanded;");
        assert!(result.is_empty());
    }

    #[test]
    fn color_revert_passes_through() {
        let fixture = Fixture::new();
        let result = fixture.reconcile(
            "shape=mxgraph.ibm.box;strokeColor=#0000FF;fillColor=#D0E2FF;",
            "shape=mxgraph.ibm.box;strokeColor=#123456;fillColor=#D0E2FF;",
        );
        assert_eq!(
            result.style_patch.to_style_string(),
            "strokeColor=#0000FF;fillColor=#D0E2FF;"
        );
        assert_eq!(
            result.compact(&StyleMap::parse("fillColor=#D0E2FF;")).style_patch.to_style_string(),
            "strokeColor=#0000FF;"
        );
    }

    #[test]
    fn illegal_layout_reverts_and_keeps_geometry_at_previous_layout() {
        let fixture = Fixture::new();
        let previous = StyleMap::parse("shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=expanded;");
        let current = StyleMap::parse("shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=collapsed;");
        let bounds = Rect::new(0.0, 0.0, 300.0, 200.0);
        let change = StyleChange::new(&previous, &current).with_geometry(bounds);
        let result = BaseShape.reconcile(fixture.ctx(), &change);
        assert_eq!(result.style_patch.to_style_string(), "ibmLayout=expanded;");
        assert_eq!(result.geometry, None);
    }

    #[test]
    fn collapsing_repairs_geometry() {
        let fixture = Fixture::new();
        let previous = StyleMap::parse("shape=mxgraph.ibm.box;ibmLayout=expanded;container=1;");
        let current = StyleMap::parse("shape=mxgraph.ibm.box;ibmLayout=collapsed;container=1;");
        let change = StyleChange::new(&previous, &current)
            .with_geometry(Rect::new(5.0, 5.0, 240.0, 152.0));
        let result = BaseShape.reconcile(fixture.ctx(), &change);
        assert_eq!(result.geometry, Some(Rect::new(5.0, 5.0, 48.0, 48.0)));
        assert_eq!(result.style_patch.get_raw("container"), Some(None));
        assert_eq!(result.style_patch.get("labelPosition"), Some("center"));
    }

    #[test]
    fn decoration_and_layout_in_one_event() {
        let fixture = Fixture::new();
        let result = fixture.reconcile(
            "shape=mxgraph.ibm.box;ibmDashed=1;",
            "shape=mxgraph.ibm.box;ibmDashed=1;ibmDouble=1;ibmLayout=itemShape;",
        );
        let patch = &result.style_patch;
        assert_eq!(patch.get("ibmDashed"), Some("0"));
        assert_eq!(patch.get("labelPosition"), Some("right"));
        assert_eq!(patch.get("ibmDouble"), Some("1"));
    }

    #[test]
    fn type_change_switches_icon_variant() {
        let fixture = Fixture::new();
        let previous = StyleMap::parse("shape=mxgraph.ibm.box;ibmType=nodep;");
        let current = StyleMap::parse("shape=mxgraph.ibm.box;ibmType=nodel;");
        let mut attributes = ShapeAttributes::default();
        attributes.icon_name = Some("virtual-server".to_string());
        let change = StyleChange::new(&previous, &current).with_attributes(&attributes);
        let result = BaseShape.reconcile(fixture.ctx(), &change);
        assert_eq!(
            result.attribute_updates,
            vec![AttributeUpdate {
                name: AttributeName::IconName,
                value: "virtual-server--logical".to_string(),
            }]
        );
    }

    #[test]
    fn image_drop_restores_shape() {
        let fixture = Fixture::new();
        let result = fixture.reconcile(
            "shape=mxgraph.ibm.box;ibmType=nodep;ibmLayout=expanded;container=1;",
            "shape=image;image=data:image/png;ibmType=nodep;ibmLayout=expanded;container=1;",
        );
        assert_eq!(result.style_patch.get("shape"), Some("mxgraph.ibm.box"));
        assert_eq!(result.style_patch.get("labelPosition"), Some("center"));
        assert_eq!(result.style_patch.get("container"), Some("1"));
    }

    #[test]
    fn required_attributes_for_base() {
        assert_eq!(BaseShape.required_attributes().len(), 4);
        let missing = ShapeAttributes::default().missing(BaseShape.required_attributes());
        assert!(missing.contains(&AttributeName::BadgeText));
    }
}
