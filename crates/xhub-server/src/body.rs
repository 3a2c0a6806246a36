//! JSON request and response bodies.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use xhub_resources::{CollectionItem, DeleteReport};
use xhub_types::ResourceKind;

use crate::error::{ServerError, ServerResult};

/// Body of a create request.
///
/// `id` names the new resource, either bare (`"study_a"`) or as its
/// canonical key (`"/studies/study_a"`). Only `data` is stored.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(alias = "name", alias = "ID")]
    pub id: String,
    #[serde(alias = "Data")]
    pub data: Box<RawValue>,
}

impl CreateRequest {
    pub fn from_slice(bytes: &[u8]) -> ServerResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ServerError::BadRequest(e.to_string()))
    }

    /// The payload bytes exactly as the client sent them.
    pub fn payload(&self) -> &[u8] {
        self.data.get().as_bytes()
    }
}

/// Response to a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedBody {
    pub id: String,
    pub url: String,
}

/// Response to a delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedBody {
    pub id: String,
    pub existed: bool,
    pub descendants_removed: usize,
}

impl DeletedBody {
    pub fn new(id: String, report: DeleteReport) -> Self {
        Self {
            id,
            existed: report.existed,
            descendants_removed: report.descendants_removed,
        }
    }
}

/// One entry of a list response.
#[derive(Debug, Serialize)]
pub struct ItemBody {
    pub version: &'static str,
    pub resource: ResourceKind,
    pub id: String,
    pub url: String,
    pub data: Box<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl TryFrom<CollectionItem> for ItemBody {
    type Error = ServerError;

    fn try_from(item: CollectionItem) -> ServerResult<Self> {
        let text = String::from_utf8(item.data).map_err(|e| {
            ServerError::Internal(format!("stored payload at {} is not UTF-8: {e}", item.id))
        })?;
        let data = RawValue::from_string(text).map_err(|e| {
            ServerError::Internal(format!("stored payload at {} is not JSON: {e}", item.id))
        })?;
        Ok(Self {
            version: item.version,
            resource: item.kind,
            id: item.id,
            url: item.url,
            data,
            created: item
                .created
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
