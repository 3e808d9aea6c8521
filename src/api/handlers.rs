//! API request handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::gate::AuthedUser;
use super::routes::AppState;
use crate::auth;
use crate::types::{DeleteAck, InsertAck, NewProduct, Product, UpdateAck};

/// Number of products shown on the storefront home page
const HOME_PAGE_SIZE: usize = 6;

// Query parameters

#[derive(Debug, Deserialize, IntoParams)]
pub struct MyItemsParams {
    /// Owner email to list products for; must match the token's email claim
    pub email: String,
}

// Request bodies

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    /// Legacy field; the stored quantity is authoritative and this value is ignored
    pub current_quantity: Option<i64>,
    /// Units to add to the stored quantity
    pub stock_to_add: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignInRequest {
    /// Email to embed in the token's claims
    pub email: String,
}

// Response types

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Signed bearer token, valid for one day
    pub access_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Error helpers

fn store_error(e: crate::error::Error) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!("store call failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn invalid_id() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid product ID".into(),
        }),
    )
}

fn parse_id(id: &str) -> Result<Uuid, (StatusCode, Json<ErrorResponse>)> {
    id.parse::<Uuid>().map_err(|_| invalid_id())
}

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = String)
    ),
    tag = "health"
)]
pub async fn root() -> &'static str {
    "Big Store server is running"
}

/// List the entire product catalog
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ErrorResponse>)> {
    let products = state.catalog.list_products().map_err(store_error)?;
    Ok(Json(products))
}

/// List the products shown on the home page (at most six)
#[utoipa::path(
    get,
    path = "/products-home",
    responses(
        (status = 200, description = "Home page products", body = Vec<Product>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn home_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ErrorResponse>)> {
    let products = state
        .catalog
        .home_products(HOME_PAGE_SIZE)
        .map_err(store_error)?;
    Ok(Json(products))
}

/// Add a product to the catalog
#[utoipa::path(
    post,
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = InsertAck),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<InsertAck>), (StatusCode, Json<ErrorResponse>)> {
    let ack = state.catalog.insert_product(req).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(ack)))
}

/// Remove a product from the catalog.
///
/// Deleting an absent id succeeds with a zero deleted count.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = String, Path, description = "Product UUID")
    ),
    responses(
        (status = 200, description = "Delete acknowledgment", body = DeleteAck),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;
    let ack = state.catalog.delete_product(id).map_err(store_error)?;
    Ok(Json(ack))
}

/// Fetch a single product by id.
///
/// An absent id yields a 200 with a JSON `null` body, not a 404.
#[utoipa::path(
    get,
    path = "/inventory/{id}",
    params(
        ("id" = String, Path, description = "Product UUID")
    ),
    responses(
        (status = 200, description = "The product, or null if absent", body = Product),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Product>>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;
    let product = state.catalog.get_product(id).map_err(store_error)?;
    Ok(Json(product))
}

/// List the signed-in user's products.
///
/// Gated by the bearer-token middleware; additionally the token's email
/// claim must equal the `email` query parameter.
#[utoipa::path(
    get,
    path = "/products/my-items",
    params(MyItemsParams),
    responses(
        (status = 200, description = "Products owned by the caller", body = Vec<Product>),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid token or email mismatch", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn my_items(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Query(params): Query<MyItemsParams>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ErrorResponse>)> {
    if user.email != params.email {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Token email does not match requested email".into(),
            }),
        ));
    }

    let products = state
        .catalog
        .products_by_owner(&params.email)
        .map_err(store_error)?;
    Ok(Json(products))
}

/// Sell one unit: atomically decrement a product's quantity.
///
/// The decrement happens in a single store operation, so concurrent sales
/// cannot lose updates. A missing product is upserted. No floor check is
/// applied; the quantity may go negative.
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    params(
        ("id" = String, Path, description = "Product UUID")
    ),
    responses(
        (status = 200, description = "Update acknowledgment", body = UpdateAck),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn decrement_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateAck>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;
    let ack = state.catalog.decrement_quantity(id).map_err(store_error)?;
    Ok(Json(ack))
}

/// Restock: atomically add `stockToAdd` units to a product's quantity.
///
/// The stored quantity is authoritative; the legacy `currentQuantity` field
/// is accepted for wire compatibility but never trusted.
#[utoipa::path(
    post,
    path = "/inventory/{id}",
    params(
        ("id" = String, Path, description = "Product UUID")
    ),
    request_body = RestockRequest,
    responses(
        (status = 200, description = "Update acknowledgment", body = UpdateAck),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn restock_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<UpdateAck>, (StatusCode, Json<ErrorResponse>)> {
    let id = parse_id(&id)?;

    if let Some(claimed) = req.current_quantity {
        tracing::debug!(product = %id, claimed, "ignoring caller-supplied current quantity");
    }

    let ack = state
        .catalog
        .restock_quantity(id, req.stock_to_add)
        .map_err(store_error)?;
    Ok(Json(ack))
}

/// List all blog documents
#[utoipa::path(
    get,
    path = "/blogs",
    responses(
        (status = 200, description = "All blogs"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "content"
)]
pub async fn list_blogs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<ErrorResponse>)> {
    let blogs = state.catalog.list_blogs().map_err(store_error)?;
    Ok(Json(blogs))
}

/// List all review documents
#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "All reviews"),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "content"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<ErrorResponse>)> {
    let reviews = state.catalog.list_reviews().map_err(store_error)?;
    Ok(Json(reviews))
}

/// Sign in: mint a one-day access token for the given email
#[utoipa::path(
    post,
    path = "/signIn",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Access token", body = SignInResponse),
        (status = 500, description = "Token minting failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = auth::mint_token(&state.jwt_secret, &req.email).map_err(|e| {
        tracing::error!("failed to mint token: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(SignInResponse {
        access_token: token,
    }))
}
