//! Type/layout transition rules for base shapes.

use crate::config::PropertyBundles;
use crate::ir::{ShapeLayout, ShapeType};
use crate::log::debug;
use crate::style::{StyleDelta, StyleKey, StyleMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDeltas {
    pub shape_type: StyleDelta<String>,
    pub shape_layout: StyleDelta<String>,
    pub hide_icon: StyleDelta<String>,
}

impl LayoutDeltas {
    pub fn from_styles(previous: &StyleMap, current: &StyleMap) -> Self {
        Self {
            shape_type: StyleDelta::of(previous, current, StyleKey::ShapeType),
            shape_layout: StyleDelta::of(previous, current, StyleKey::ShapeLayout),
            hide_icon: StyleDelta::of(previous, current, StyleKey::HideIcon),
        }
    }

    pub fn changed(&self) -> bool {
        self.shape_type.changed || self.shape_layout.changed || self.hide_icon.changed
    }
}

/// Property bundle that goes with a layout, applied whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutBundle {
    Collapsed,
    ExpandedTarget { hide_icon: bool },
    Expanded,
    ExpandedStack,
    Item,
    Other,
}

impl LayoutBundle {
    pub fn for_layout(shape_type: ShapeType, layout: Option<ShapeLayout>, hide_icon: bool) -> Self {
        match layout {
            Some(ShapeLayout::Collapsed) => Self::Collapsed,
            Some(ShapeLayout::Expanded) if shape_type == ShapeType::Target => {
                Self::ExpandedTarget { hide_icon }
            }
            Some(ShapeLayout::Expanded) => Self::Expanded,
            Some(ShapeLayout::ExpandedStack) => Self::ExpandedStack,
            Some(layout) if layout.is_item() => Self::Item,
            _ => Self::Other,
        }
    }

    pub fn fragments(self, bundles: &PropertyBundles) -> [&str; 4] {
        match self {
            Self::Collapsed => [
                bundles.collapsed_label.as_str(),
                bundles.expanded_stack_null.as_str(),
                bundles.container_null.as_str(),
                bundles.no_fill.as_str(),
            ],
            Self::ExpandedTarget { hide_icon } => [
                if hide_icon {
                    bundles.expanded_target_label_no_icon.as_str()
                } else {
                    bundles.expanded_target_label.as_str()
                },
                bundles.container_null.as_str(),
                bundles.expanded_stack_null.as_str(),
                bundles.no_fill.as_str(),
            ],
            Self::Expanded => [
                bundles.expanded_label.as_str(),
                bundles.container.as_str(),
                bundles.expanded_stack_null.as_str(),
                bundles.default_fill.as_str(),
            ],
            Self::ExpandedStack => [
                bundles.expanded_label.as_str(),
                bundles.expanded_stack.as_str(),
                bundles.container.as_str(),
                bundles.default_fill.as_str(),
            ],
            Self::Item => [
                bundles.item_label.as_str(),
                bundles.container_null.as_str(),
                bundles.expanded_stack_null.as_str(),
                bundles.no_fill.as_str(),
            ],
            Self::Other => [
                "",
                bundles.expanded_stack_null.as_str(),
                bundles.container_null.as_str(),
                bundles.no_fill.as_str(),
            ],
        }
    }

    pub fn style(self, bundles: &PropertyBundles) -> StyleMap {
        let mut style = StyleMap::new();
        for fragment in self.fragments(bundles) {
            style.merge(&StyleMap::parse(fragment));
        }
        style
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutTransition {
    Unchanged,
    /// The new layout is not allowed for the previous type; put the old one back.
    Illegal { revert_to: String },
    Legal(LayoutBundle),
}

pub fn classify(deltas: &LayoutDeltas) -> LayoutTransition {
    if !deltas.changed() {
        return LayoutTransition::Unchanged;
    }

    let previous_type = ShapeType::from_token_or_default(&deltas.shape_type.previous);
    let current_type = ShapeType::from_token_or_default(&deltas.shape_type.current);
    let layout = ShapeLayout::from_token(&deltas.shape_layout.current);

    let illegal = match layout {
        Some(ShapeLayout::Collapsed) => previous_type.is_group(),
        Some(ShapeLayout::ExpandedStack) => {
            previous_type == ShapeType::Actor || previous_type == ShapeType::Target
        }
        Some(layout) if layout.is_expanded() => previous_type == ShapeType::Actor,
        _ => false,
    };
    if illegal {
        debug!(
            shape_type = %deltas.shape_type.previous,
            layout = %deltas.shape_layout.current,
            "illegal layout transition, reverting"
        );
        return LayoutTransition::Illegal {
            revert_to: deltas.shape_layout.previous.clone(),
        };
    }

    LayoutTransition::Legal(LayoutBundle::for_layout(
        current_type,
        layout,
        deltas.hide_icon.is_on(),
    ))
}

/// Style corrections for a type, layout or icon-visibility change.
pub fn reconcile_layout(bundles: &PropertyBundles, deltas: &LayoutDeltas) -> StyleMap {
    match classify(deltas) {
        LayoutTransition::Unchanged => StyleMap::new(),
        LayoutTransition::Illegal { revert_to } => {
            let mut patch = StyleMap::new();
            patch.set(StyleKey::ShapeLayout, revert_to);
            patch
        }
        LayoutTransition::Legal(bundle) => bundle.style(bundles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(previous: &str, current: &str) -> LayoutDeltas {
        LayoutDeltas::from_styles(&StyleMap::parse(previous), &StyleMap::parse(current))
    }

    #[test]
    fn collapsing_a_group_is_reverted() {
        let d = deltas(
            "ibmType=groupl;ibmLayout=expanded;",
            "ibmType=groupl;ibmLayout=collapsed;",
        );
        let patch = reconcile_layout(&PropertyBundles::default(), &d);
        assert_eq!(patch.to_style_string(), "ibmLayout=expanded;");
    }

    #[test]
    fn actors_never_expand() {
        for layout in ["expanded", "expandedStack", "expandedTarget"] {
            let d = deltas(
                "ibmType=actor;ibmLayout=collapsed;",
                &format!("ibmType=actor;ibmLayout={layout};"),
            );
            assert_eq!(
                classify(&d),
                LayoutTransition::Illegal {
                    revert_to: "collapsed".to_string()
                }
            );
        }
    }

    #[test]
    fn targets_cannot_stack() {
        let d = deltas("ibmType=target;", "ibmType=target;ibmLayout=expandedStack;");
        assert!(matches!(classify(&d), LayoutTransition::Illegal { .. }));
    }

    #[test]
    fn legality_uses_previous_type() {
        // Switching a group to a node and collapsing it in one event is still refused.
        let d = deltas(
            "ibmType=groupp;ibmLayout=expanded;",
            "ibmType=nodep;ibmLayout=collapsed;",
        );
        assert!(matches!(classify(&d), LayoutTransition::Illegal { .. }));
    }

    #[test]
    fn expanding_a_node_makes_it_a_container() {
        let bundles = PropertyBundles::default();
        let d = deltas("ibmType=nodep;", "ibmType=nodep;ibmLayout=expanded;");
        let patch = reconcile_layout(&bundles, &d);
        assert_eq!(patch.get("container"), Some("1"));
        assert_eq!(patch.get_raw("childLayout"), Some(None));
        assert_eq!(patch.get("fillColor"), Some("#FFFFFF"));
    }

    #[test]
    fn expanded_target_label_depends_on_icon() {
        let bundles = PropertyBundles::default();
        let d = deltas(
            "ibmType=target;",
            "ibmType=target;ibmLayout=expanded;ibmNoIcon=1;",
        );
        assert_eq!(
            classify(&d),
            LayoutTransition::Legal(LayoutBundle::ExpandedTarget { hide_icon: true })
        );
        let patch = reconcile_layout(&bundles, &d);
        assert_eq!(patch.get("spacingLeft"), Some("20"));
        assert_eq!(patch.get_raw("container"), Some(None));
        assert_eq!(patch.get("fillColor"), Some("none"));
    }

    #[test]
    fn stack_and_items() {
        let bundles = PropertyBundles::default();
        let stack = reconcile_layout(
            &bundles,
            &deltas("ibmType=compp;ibmLayout=expanded;", "ibmType=compp;ibmLayout=expandedStack;"),
        );
        assert_eq!(stack.get("childLayout"), Some("stackLayout"));
        assert_eq!(stack.get("container"), Some("1"));

        let item = reconcile_layout(&bundles, &deltas("", "ibmLayout=itemBadge;"));
        assert_eq!(item.get("labelPosition"), Some("right"));
        assert_eq!(item.get_raw("container"), Some(None));
    }

    #[test]
    fn other_layouts_only_clear_state() {
        let bundles = PropertyBundles::default();
        let patch = reconcile_layout(
            &bundles,
            &deltas("ibmType=target;", "ibmType=target;ibmLayout=expandedTarget;"),
        );
        assert!(patch.get("labelPosition").is_none());
        assert_eq!(patch.get("fillColor"), Some("none"));
    }

    #[test]
    fn nothing_changed() {
        let d = deltas("ibmLayout=expanded;", "ibmLayout=expanded;fillColor=#FFFFFF;");
        assert_eq!(classify(&d), LayoutTransition::Unchanged);
    }
}
