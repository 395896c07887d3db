use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UtilError {
    #[error("failed to load image '{filename}': {cause}")]
    ImageLoad { filename: String, cause: String },
    #[error("no unused hit color found after {attempts} attempts")]
    ColorSpaceExhausted { attempts: usize },
    #[error("no window")]
    NoWindow,
    #[error("viewport width unavailable: {0}")]
    Viewport(String),
    #[error("invalid settings: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, UtilError>;

impl From<UtilError> for JsValue {
    fn from(err: UtilError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
