use crate::config::PropertyBundles;
use crate::style::{StyleDelta, StyleKey, StyleMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationDeltas {
    pub dashed: StyleDelta<String>,
    pub double: StyleDelta<String>,
    pub strikethrough: StyleDelta<String>,
}

impl DecorationDeltas {
    pub fn from_styles(previous: &StyleMap, current: &StyleMap) -> Self {
        Self {
            dashed: StyleDelta::of(previous, current, StyleKey::StyleDashed),
            double: StyleDelta::of(previous, current, StyleKey::StyleDouble),
            strikethrough: StyleDelta::of(previous, current, StyleKey::StyleStrikethrough),
        }
    }

    pub fn changed(&self) -> bool {
        self.dashed.changed || self.double.changed || self.strikethrough.changed
    }
}

/// Keep at most one of dashed, double and strikethrough switched on.
///
/// Deltas are checked dashed, double, strikethrough; the last changed one
/// replaces whatever an earlier check produced.
pub fn reconcile_decorations(bundles: &PropertyBundles, deltas: &DecorationDeltas) -> StyleMap {
    let mut fragment: Option<&str> = None;

    if deltas.dashed.changed {
        fragment = Some(if deltas.dashed.is_on() {
            bundles.style_dashed_on.as_str()
        } else {
            bundles.style_dashed_off.as_str()
        });
    }

    if deltas.double.changed {
        fragment = Some(if deltas.double.is_on() {
            bundles.style_double_on.as_str()
        } else {
            bundles.style_double_off.as_str()
        });
    }

    if deltas.strikethrough.changed {
        fragment = Some(if deltas.strikethrough.is_on() {
            bundles.style_strikethrough_on.as_str()
        } else {
            bundles.style_strikethrough_off.as_str()
        });
    }

    fragment.map(StyleMap::parse).unwrap_or_default()
}
