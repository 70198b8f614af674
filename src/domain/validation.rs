use serde_json::Value;

/// A decoded model payload that does not honour the requested output shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("required key `{0}` is missing from the model output")]
    MissingKey(String),
    #[error("`{path}` must be a JSON object, got {value}")]
    NotAnObject { path: String, value: Value },
    #[error("`{key}` must be an integer between 1 and 5 or null, got {value}")]
    InvalidScore { key: String, value: Value },
    #[error("`{path}` must be an array of strings, got {value}")]
    NotAStringList { path: String, value: Value },
}

/// Looks up a required member of a decoded payload.
pub fn required<'a>(payload: &'a Value, key: &str) -> Result<&'a Value, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject {
            path: "$".to_string(),
            value: payload.clone(),
        })?;

    object
        .get(key)
        .ok_or_else(|| ValidationError::MissingKey(key.to_string()))
}

pub fn string_list(value: &Value, path: &str) -> Result<Vec<String>, ValidationError> {
    let not_a_list = || ValidationError::NotAStringList {
        path: path.to_string(),
        value: value.clone(),
    };

    value
        .as_array()
        .ok_or_else(not_a_list)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(not_a_list))
        .collect()
}
