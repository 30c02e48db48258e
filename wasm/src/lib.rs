use ibm_shape_style::icons::FlatIconCatalog;
use ibm_shape_style::ir::{Rect, ShapeAttributes};
use ibm_shape_style::{parse_config, DesignConfig, Engine, StyleChange, StyleMap};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileRequest {
    previous: String,
    current: String,
    geometry: Option<Rect>,
    #[serde(default)]
    attributes: ShapeAttributes,
    #[serde(default)]
    children: Vec<Rect>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileResponse {
    style_patch: String,
    patched_style: String,
    geometry: Option<Rect>,
    attribute_updates: Vec<ibm_shape_style::ir::AttributeUpdate>,
}

fn build_engine(config_json: Option<&str>) -> Result<Engine, String> {
    let config = match config_json {
        Some(json) => parse_config(json).map_err(|error| error.to_string())?,
        None => DesignConfig::default(),
    };
    Ok(Engine::new(config))
}

fn render_params_json(
    engine: &Engine,
    style: &str,
    attributes_json: Option<&str>,
    width: f32,
    height: f32,
) -> Result<String, String> {
    let attributes = match attributes_json {
        Some(json) => {
            serde_json::from_str::<ShapeAttributes>(json).map_err(|error| error.to_string())?
        }
        None => ShapeAttributes::default(),
    };
    let params = engine.render_params(&StyleMap::parse(style), &attributes, width, height);
    serde_json::to_string(&params).map_err(|error| error.to_string())
}

fn reconcile_json(engine: &Engine, request_json: &str) -> Result<String, String> {
    let request: ReconcileRequest =
        serde_json::from_str(request_json).map_err(|error| error.to_string())?;
    let previous = StyleMap::parse(&request.previous);
    let current = StyleMap::parse(&request.current);
    let mut change = StyleChange::new(&previous, &current)
        .with_attributes(&request.attributes)
        .with_children(&request.children);
    if let Some(geometry) = request.geometry {
        change = change.with_geometry(geometry);
    }

    let result = engine.reconcile(&change);
    let response = ReconcileResponse {
        style_patch: result.style_patch.to_style_string(),
        patched_style: result.patched_style(&current).to_style_string(),
        geometry: result.geometry,
        attribute_updates: result.attribute_updates,
    };
    serde_json::to_string(&response).map_err(|error| error.to_string())
}

/// Engine handle kept alive on the JavaScript side between paint calls.
#[wasm_bindgen]
pub struct ShapeEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl ShapeEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ShapeEngine, JsValue> {
        let engine = build_engine(config_json.as_deref()).map_err(|error| JsValue::from_str(&error))?;
        Ok(ShapeEngine { engine })
    }

    #[wasm_bindgen(js_name = setIcons)]
    pub fn set_icons(&mut self, icons_json: &str) -> Result<(), JsValue> {
        let icons = FlatIconCatalog::from_json(icons_json)
            .map_err(|error| JsValue::from_str(&error.to_string()))?;
        let engine = std::mem::take(&mut self.engine);
        self.engine = engine.with_icons(icons);
        Ok(())
    }

    #[wasm_bindgen(js_name = renderParams)]
    pub fn render_params(
        &self,
        style: &str,
        attributes_json: Option<String>,
        width: f32,
        height: f32,
    ) -> Result<String, JsValue> {
        render_params_json(&self.engine, style, attributes_json.as_deref(), width, height)
            .map_err(|error| JsValue::from_str(&error))
    }

    pub fn reconcile(&self, request_json: &str) -> Result<String, JsValue> {
        reconcile_json(&self.engine, request_json).map_err(|error| JsValue::from_str(&error))
    }

    #[wasm_bindgen(js_name = minimumRect)]
    pub fn minimum_rect(
        &self,
        style: &str,
        using_min_size: bool,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<String, JsValue> {
        let rect = self.engine.minimum_rect(
            &StyleMap::parse(style),
            using_min_size,
            Rect::new(x, y, width, height),
        );
        serde_json::to_string(&rect).map_err(|error| JsValue::from_str(&error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{build_engine, reconcile_json, render_params_json};

    #[test]
    fn renders_collapsed_base_shape() {
        let engine = build_engine(None).unwrap();
        let json = render_params_json(
            &engine,
            "shape=mxgraph.ibm.box;ibmType=actor;ibmBadge=circle;",
            Some(r#"{"badgeText": "7"}"#),
            48.0,
            48.0,
        )
        .unwrap();
        assert!(json.contains(r#""kind":"base""#));
        assert!(json.contains(r#""badgeVisible":true"#));
        assert!(json.contains(r#""badgeText":"7""#));
    }

    #[test]
    fn reconciles_illegal_collapse() {
        let engine = build_engine(None).unwrap();
        let json = reconcile_json(
            &engine,
            r#"{
                "previous": "shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=expanded;",
                "current": "shape=mxgraph.ibm.box;ibmType=groupl;ibmLayout=collapsed;"
            }"#,
        )
        .unwrap();
        assert!(json.contains(r#""stylePatch":"ibmLayout=expanded;""#));
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(build_engine(Some(r#"{"palette": {"nothex": "Broken"}}"#)).is_err());
    }
}
