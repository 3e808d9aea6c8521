//! Core types for Big Store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// A product in the catalog.
///
/// The store assigns the identifier at insert time; it is immutable and used
/// verbatim in later lookups. Callers may attach arbitrary extra fields
/// (name, price, image URL, ...) which are preserved as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Owner email; empty when the document was created by an upsert
    #[serde(default)]
    pub email: String,
    /// Units in stock (may go negative, matching the original behavior)
    #[serde(default)]
    pub quantity: i64,
    /// Additional caller-supplied fields, preserved verbatim
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// A product as submitted by the caller, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewProduct {
    /// Owner email
    pub email: String,
    /// Initial units in stock
    #[serde(default)]
    pub quantity: i64,
    /// Additional caller-supplied fields, preserved verbatim
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Acknowledgment for a single-document insert.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    /// Identifier the store assigned to the new document
    pub inserted_id: Uuid,
}

/// Acknowledgment for a single-document update or upsert.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    /// Number of documents matched by the filter (0 or 1)
    pub matched_count: u64,
    /// Number of documents actually modified (0 or 1)
    pub modified_count: u64,
    /// Identifier of the document created when the filter matched nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Uuid>,
}

/// Acknowledgment for a single-document delete.
///
/// Deleting an absent document is a zero-count success, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
