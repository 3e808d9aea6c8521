//! API route definitions

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::gate;
use super::handlers::{
    self, ErrorResponse, RestockRequest, SignInRequest, SignInResponse,
};
use crate::store::CatalogStore;
use crate::types::{DeleteAck, InsertAck, NewProduct, Product, UpdateAck};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Big Store API",
        version = "0.1.0",
        description = "Minimal REST backend for an e-commerce inventory demo"
    ),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "inventory", description = "Stock levels"),
        (name = "content", description = "Blogs and reviews"),
        (name = "auth", description = "Sign-in"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::root,
        handlers::list_products,
        handlers::home_products,
        handlers::create_product,
        handlers::delete_product,
        handlers::get_inventory_item,
        handlers::my_items,
        handlers::decrement_inventory,
        handlers::restock_inventory,
        handlers::list_blogs,
        handlers::list_reviews,
        handlers::sign_in,
    ),
    components(schemas(
        Product,
        NewProduct,
        InsertAck,
        UpdateAck,
        DeleteAck,
        RestockRequest,
        SignInRequest,
        SignInResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub jwt_secret: String,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    Router::new()
        // Health
        .route("/", get(handlers::root))

        // Product catalog
        .route("/products", get(handlers::list_products))
        .route("/products", post(handlers::create_product))
        .route("/products-home", get(handlers::home_products))
        .route("/products/{id}", delete(handlers::delete_product))
        .route(
            "/products/my-items",
            get(handlers::my_items).layer(middleware::from_fn_with_state(
                state.clone(),
                gate::require_auth,
            )),
        )

        // Inventory
        .route("/inventory/{id}", get(handlers::get_inventory_item))
        .route("/inventory/{id}", put(handlers::decrement_inventory))
        .route("/inventory/{id}", post(handlers::restock_inventory))

        // Content
        .route("/blogs", get(handlers::list_blogs))
        .route("/reviews", get(handlers::list_reviews))

        // Auth
        .route("/signIn", post(handlers::sign_in))

        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi))

        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
