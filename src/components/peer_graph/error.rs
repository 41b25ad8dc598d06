use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid graph config: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("invalid graph config: `{field}` {reason}")]
	Invalid {
		field: &'static str,
		reason: &'static str,
	},
}

#[derive(Debug, Error)]
pub enum CanvasError {
	#[error("no global window")]
	NoWindow,
	#[error("2d rendering context unavailable")]
	NoContext,
	#[error("canvas call failed: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasError {
	fn from(value: JsValue) -> Self {
		CanvasError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
