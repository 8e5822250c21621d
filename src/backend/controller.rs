//! Item controller
//!
//! Maps item requests onto a [`Model`] and answers with a status code and a
//! JSON body. Routing and transport belong to whatever server hosts it.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::model::{Model, ModelFactory, ModelKind};
use crate::database::WardrobeItem;
use crate::error::{Result, WardrobeError};

const DETAIL_REQUIRED: &str = "Item detail is required.";
const ADD_FAILED: &str = "Failed to add item. Please try again.";

/// Status and JSON body of one controller call
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ControllerResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, json!({ "error": message.into() }))
    }

    /// Body serialized for the wire
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}

/// Backend entry points for `/items`
pub struct WardrobeController {
    model: Box<dyn Model>,
}

impl WardrobeController {
    pub fn new(model: Box<dyn Model>) -> Self {
        Self { model }
    }

    /// Build a controller over a model of `kind`
    pub fn init(kind: &ModelKind) -> Result<Self> {
        Ok(Self::new(ModelFactory::get_model(kind)?))
    }

    /// `GET /items`
    pub fn get_all_items(&self) -> ControllerResponse {
        match self.model.read() {
            Ok(items) => ControllerResponse::new(StatusCode::OK, json!({ "items": items })),
            Err(e) => internal_error("Error reading items", &e),
        }
    }

    /// `GET /items/{userId}`
    pub fn get_user_items(&self, user_id: &str) -> ControllerResponse {
        match self.model.read_for_user(user_id) {
            Ok(items) => ControllerResponse::new(StatusCode::OK, json!({ "usersItems": items })),
            Err(e) => internal_error("Error reading user items", &e),
        }
    }

    /// `POST /items`
    pub fn add_item(&mut self, body: Option<&Value>) -> ControllerResponse {
        let item = match parse_body(body) {
            Ok(item) => item,
            Err(response) => return response,
        };

        match self.model.create(&item) {
            Ok(created) => {
                let id = created.id_string();
                match body.and_then(attached_file_name) {
                    Some(file) => tracing::info!("New Item: {id} - with file: {file}"),
                    None => tracing::info!("New Item: {id} - without file"),
                }
                to_response(StatusCode::CREATED, &created)
            }
            Err(WardrobeError::ValidationError(msg)) => {
                ControllerResponse::error(StatusCode::BAD_REQUEST, msg)
            }
            Err(e) => {
                tracing::error!("Error adding item: {e}");
                ControllerResponse::error(StatusCode::INTERNAL_SERVER_ERROR, ADD_FAILED)
            }
        }
    }

    /// `PUT /items`; the target id travels inside the body
    pub fn update_item(&mut self, body: Option<&Value>) -> ControllerResponse {
        let item = match parse_body(body) {
            Ok(item) => item,
            Err(response) => return response,
        };
        let Some(item_id) = item.item_id else {
            return ControllerResponse::error(StatusCode::BAD_REQUEST, "Item id is required.");
        };

        match self.model.update(item_id, &item) {
            Ok(Some(updated)) => to_response(StatusCode::OK, &updated),
            Ok(None) => {
                ControllerResponse::error(StatusCode::NOT_FOUND, format!("Item {item_id} not found."))
            }
            Err(WardrobeError::ValidationError(msg)) => {
                ControllerResponse::error(StatusCode::BAD_REQUEST, msg)
            }
            Err(e) => internal_error("Error updating item", &e),
        }
    }

    /// `DELETE /items`: remove everything, then answer with what is left
    pub fn clear_items(&mut self) -> ControllerResponse {
        let remaining = self.model.delete(None).and_then(|removed| {
            tracing::info!(removed, "Cleared items");
            self.model.read()
        });
        match remaining {
            Ok(items) => to_response(StatusCode::OK, &items),
            Err(e) => internal_error("Error clearing items", &e),
        }
    }
}

fn parse_body(body: Option<&Value>) -> std::result::Result<WardrobeItem, ControllerResponse> {
    let body = match body {
        Some(value) if !value.is_null() => value,
        _ => return Err(ControllerResponse::error(StatusCode::BAD_REQUEST, DETAIL_REQUIRED)),
    };
    WardrobeItem::deserialize(body)
        .map_err(|e| ControllerResponse::error(StatusCode::BAD_REQUEST, e.to_string()))
}

/// Name of the uploaded file, reported as the body's `filename` whenever a
/// `file` is attached
fn attached_file_name(body: &Value) -> Option<String> {
    let attached = match body.get("file")? {
        Value::Null | Value::Bool(false) => false,
        Value::String(file) => !file.is_empty(),
        _ => true,
    };
    if !attached {
        return None;
    }
    let filename = body.get("filename").and_then(Value::as_str).unwrap_or_default();
    Some(filename.to_string())
}

fn to_response<T: serde::Serialize>(status: StatusCode, value: &T) -> ControllerResponse {
    match serde_json::to_value(value) {
        Ok(body) => ControllerResponse::new(status, body),
        Err(e) => internal_error("Error encoding response", &WardrobeError::from(e)),
    }
}

fn internal_error(context: &str, err: &WardrobeError) -> ControllerResponse {
    tracing::error!("{context}: {err}");
    ControllerResponse::error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
