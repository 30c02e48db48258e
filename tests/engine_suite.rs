use std::path::Path;

use ibm_shape_style::geometry::dimensions;
use ibm_shape_style::ir::{Rect, ShapeAttributes, ShapeIdentity, ShapeLayout, ShapeType};
use ibm_shape_style::render::ShapeRenderParams;
use ibm_shape_style::{load_config, Engine, RenderParams, StyleChange, StyleMap};

fn base_params(engine: &Engine, style: &str, width: f32, height: f32) -> ShapeRenderParams {
    match engine.render_params(
        &StyleMap::parse(style),
        &ShapeAttributes::default(),
        width,
        height,
    ) {
        Some(RenderParams::Base(params)) => params,
        other => panic!("{style}: expected base params, got {other:?}"),
    }
}

fn reconcile(engine: &Engine, previous: &str, current: &str) -> StyleMap {
    let previous = StyleMap::parse(previous);
    let current = StyleMap::parse(current);
    engine
        .reconcile(&StyleChange::new(&previous, &current))
        .style_patch
}

#[test]
fn style_codec_round_trips() {
    let samples = [
        "shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=expanded;",
        "container=null;fillColor=none;strokeColor=#0F62FE;",
        "html=;whiteSpace=wrap;",
        "image=data:image/svg+xml,PHN2Zz4=;shape=image;",
        "rounded;html=null;",
        "ibmDashed=1;ibmDouble=1;ibmDashed=0;",
        "strokeColor=#0F62FE;fontColor=#000000",
        ";;a=1;;",
        "",
    ];
    for sample in samples {
        let map = StyleMap::parse(sample);
        assert_eq!(StyleMap::parse(&map.to_style_string()), map, "{sample}");
    }

    let reordered = StyleMap::parse("b=2;a=1;c=null;");
    let serialized = reordered.to_style_string();
    for key in ["a=1;", "b=2;", "c=null;"] {
        assert!(serialized.contains(key), "{serialized} lacks {key}");
    }
}

#[test]
fn built_style_maps_round_trip() {
    let keys = ["shape", "ibmType", "fillColor", "a", "x-y"];
    let values = [
        None,
        Some(""),
        Some("1"),
        Some("a=b"),
        Some("==x="),
        Some("#0F62FE"),
        Some("rgb(15,98,254)"),
        Some("mxgraph.ibm.box"),
    ];

    // Every key/value pairing, with several keys per map in rotated orders.
    for offset in 0..values.len() {
        for len in 0..=keys.len() {
            let mut map = StyleMap::new();
            for (i, key) in keys.iter().take(len).enumerate() {
                let value = values[(offset + i * 3) % values.len()];
                map.insert(*key, value.map(str::to_string));
            }
            let serialized = map.to_style_string();
            assert_eq!(StyleMap::parse(&serialized), map, "{serialized}");
        }
    }
}

#[test]
fn null_literal_is_reserved() {
    let mut map = StyleMap::new();
    map.insert("fillColor", Some("null".to_string()));
    assert_eq!(map.to_style_string(), "fillColor=null;");

    let decoded = StyleMap::parse(&map.to_style_string());
    assert_eq!(decoded.get_raw("fillColor"), Some(None));
    assert_ne!(decoded, map);
}

#[test]
fn derivation_is_repeatable() {
    let engine = Engine::default();
    let style = "shape=mxgraph.ibm.box;ibmType=target;ibmLayout=expanded;fillColor=#0043CE;";
    assert_eq!(
        base_params(&engine, style, 240.0, 48.0),
        base_params(&engine, style, 240.0, 48.0)
    );

    let rules = &engine.config().geometry;
    let identity = ShapeIdentity::new(ShapeType::CompLogical, ShapeLayout::ItemStyle);
    assert_eq!(
        dimensions(rules, identity, 64.0, 16.0),
        dimensions(rules, identity, 64.0, 16.0)
    );
}

#[test]
fn decorations_stay_exclusive() {
    let engine = Engine::default();
    let mut state = StyleMap::parse("shape=mxgraph.ibm.box;");
    let toggles = [
        ("ibmDashed", "1"),
        ("ibmDouble", "1"),
        ("ibmStrikethrough", "1"),
        ("ibmStrikethrough", "0"),
        ("ibmDashed", "1"),
        ("ibmDouble", "1"),
        ("ibmDouble", "0"),
    ];

    for (key, value) in toggles {
        let previous = state.clone();
        let mut current = state.clone();
        current.insert(key, Some(value.to_string()));
        let result = engine.reconcile(&StyleChange::new(&previous, &current));
        state = result.patched_style(&current);

        let on = ["ibmDashed", "ibmDouble", "ibmStrikethrough"]
            .iter()
            .filter(|flag| state.get(flag) == Some("1"))
            .count();
        assert!(on <= 1, "{key}={value} left {state}");
    }
}

#[test]
fn invalid_line_color_reverts_line_and_fill() {
    let engine = Engine::default();
    let patch = reconcile(
        &engine,
        "shape=mxgraph.ibm.box;strokeColor=#0000FF;fillColor=#D0E2FF;",
        "shape=mxgraph.ibm.box;strokeColor=#123456;fillColor=#D0E2FF;",
    );
    assert_eq!(
        patch.to_style_string(),
        "strokeColor=#0000FF;fillColor=#D0E2FF;"
    );
}

#[test]
fn collapsing_a_logical_group_is_refused() {
    let engine = Engine::default();
    let patch = reconcile(
        &engine,
        "shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=expanded;",
        "shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=collapsed;",
    );
    assert_eq!(patch.to_style_string(), "ibmLayout=expanded;");
}

#[test]
fn dark_backgrounds_flip_to_white() {
    let engine = Engine::default();
    let palette = engine.palette();
    assert_eq!(palette.visible("#000000", "#0043CE"), "#FFFFFF");
    assert_eq!(palette.visible("#000000", "#D0E2FF"), "#000000");
}

#[test]
fn collapsed_target_geometry() {
    let engine = Engine::default();
    let profile = dimensions(
        &engine.config().geometry,
        ShapeIdentity::new(ShapeType::Target, ShapeLayout::Collapsed),
        100.0,
        100.0,
    );
    assert_eq!(profile.min_width, 64.0);
    assert_eq!(profile.curve_radius, 24.0);
    assert_eq!(profile.icon_area_width, 64.0);
    assert_eq!(profile.min_height, 48.0);
    assert_eq!(profile.default_height, 48.0);

    let rect = engine.minimum_rect(
        &StyleMap::parse("shape=mxgraph.ibm.box;ibmType=target;"),
        true,
        Rect::new(0.0, 0.0, 10.0, 10.0),
    );
    assert_eq!(rect, Rect::new(0.0, 0.0, 64.0, 48.0));
}

#[test]
fn badge_visibility() {
    let engine = Engine::default();
    for badge in ["circle", "square", "none"] {
        let item = base_params(
            &engine,
            &format!("shape=mxgraph.ibm.box;ibmLayout=itemIcon;ibmBadge={badge};"),
            64.0,
            16.0,
        );
        assert!(!item.badge_visible, "itemIcon with {badge}");
    }
    let collapsed = base_params(
        &engine,
        "shape=mxgraph.ibm.box;ibmLayout=collapsed;ibmBadge=circle;",
        48.0,
        48.0,
    );
    assert!(collapsed.badge_visible);
}

#[test]
fn synthetic_palette_fixture() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("synthetic_palette.json");
    let config = load_config(Some(&path)).expect("fixture config should load");
    assert_eq!(config.palette.len(), 5);
    assert_eq!(config.legend.padding, 4.0);
    assert_eq!(config.legend.titlebar, 32.0);

    let engine = Engine::new(config);
    assert!(
        reconcile(
            &engine,
            "shape=mxgraph.ibm.box;strokeColor=#000000;",
            "shape=mxgraph.ibm.box;strokeColor=#112233;",
        )
        .is_empty()
    );
    assert_eq!(
        reconcile(
            &engine,
            "shape=mxgraph.ibm.box;strokeColor=#112233;",
            "shape=mxgraph.ibm.box;strokeColor=#445566;",
        )
        .get("strokeColor"),
        Some("#112233")
    );
    assert_eq!(engine.palette().visible("#000000", "#112233"), "#FFFFFF");
    assert_eq!(engine.palette().visible("#000000", "#AABBCC"), "#000000");

    let rect = engine.minimum_rect(
        &StyleMap::parse("shape=mxgraph.ibm.box;ibmType=target;"),
        true,
        Rect::new(0.0, 0.0, 10.0, 10.0),
    );
    assert_eq!(rect, Rect::new(0.0, 0.0, 56.0, 48.0));
}

#[test]
fn legend_grows_with_children() {
    let engine = Engine::default();
    let previous = StyleMap::parse("shape=mxgraph.ibm.legend;ibmType=legendv;");
    let current = StyleMap::parse("shape=mxgraph.ibm.legend;ibmType=legendh;");
    let children = [
        Rect::new(0.0, 0.0, 64.0, 16.0),
        Rect::new(0.0, 0.0, 64.0, 16.0),
        Rect::new(0.0, 0.0, 64.0, 16.0),
    ];
    let result = engine.reconcile(
        &StyleChange::new(&previous, &current)
            .with_geometry(Rect::new(20.0, 20.0, 80.0, 120.0))
            .with_children(&children),
    );
    assert_eq!(result.style_patch.get("horizontalStack"), Some("1"));
    assert_eq!(result.geometry, Some(Rect::new(20.0, 20.0, 16.0 + 3.0 * 72.0, 64.0)));
}
