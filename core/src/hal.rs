//! HAL envelope unwrapping.
//!
//! A collection body is either a bare JSON array or an object of the form
//! `{ "_embedded": { "<rel>": [...] }, "page": {...} }`. A missing
//! `_embedded` block or a missing rel means the collection is empty; any
//! other shape is a deserialization error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::PageMetadata;

/// Items extracted from a collection body plus optional paging info.
#[derive(Debug, Clone, PartialEq)]
pub struct HalCollection<T> {
    pub items: Vec<T>,
    pub page: Option<PageMetadata>,
}

pub fn extract_embedded<T: DeserializeOwned>(
    body: &str,
    rel: &str,
) -> Result<HalCollection<T>, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(deserialization)?;
    match value {
        list @ Value::Array(_) => Ok(HalCollection {
            items: serde_json::from_value(list).map_err(deserialization)?,
            page: None,
        }),
        Value::Object(mut envelope) => {
            let page = match envelope.remove("page") {
                None | Some(Value::Null) => None,
                Some(page) => Some(serde_json::from_value(page).map_err(deserialization)?),
            };
            let items = match envelope.remove("_embedded") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Object(mut embedded)) => match embedded.remove(rel) {
                    None | Some(Value::Null) => Vec::new(),
                    Some(list @ Value::Array(_)) => {
                        serde_json::from_value(list).map_err(deserialization)?
                    }
                    Some(_) => {
                        return Err(ApiError::Deserialization(format!(
                            "_embedded.{rel} is not an array"
                        )))
                    }
                },
                Some(_) => {
                    return Err(ApiError::Deserialization(
                        "_embedded is not an object".to_string(),
                    ))
                }
            };
            Ok(HalCollection { items, page })
        }
        _ => Err(ApiError::Deserialization(
            "expected a JSON array or a HAL envelope".to_string(),
        )),
    }
}

fn deserialization(e: serde_json::Error) -> ApiError {
    ApiError::Deserialization(e.to_string())
}
