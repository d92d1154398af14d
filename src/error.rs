use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter `{label}` has no property to filter on")]
    MissingProperty { label: String },

    #[error("mount point `{0}` not found")]
    MountPointNotFound(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid filter configuration: {0}")]
    Config(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl FilterError {
    pub fn dom(context: &str, err: wasm_bindgen::JsValue) -> Self {
        Self::Dom(format!("{context}: {err:?}"))
    }
}
