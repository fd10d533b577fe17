use axum::{
    http::HeaderName,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::client_extractor::{resolve_client_id, sign_in};
use crate::api::handlers::{self, AppState};
use crate::api::docs;
use crate::model::CLIENT_ID_HEADER;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>(state: AppState<S>) -> Router {
    // Everything under /todos needs a resolved client id
    let todo_routes: Router<AppState<S>> = Router::new()
        .route(
            "/todos",
            get(handlers::list_todos::<S>)
                .post(handlers::create_todo::<S>)
                .patch(handlers::update_todos::<S>)
                .delete(handlers::delete_todos::<S>),
        )
        .route("/todos/bulk-complete", post(handlers::bulk_complete::<S>))
        .route("/todos/bulk-delete", post(handlers::bulk_delete::<S>))
        .route(
            "/todos/:id",
            patch(handlers::update_todo::<S>).delete(handlers::delete_todo::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.client_id_mode,
            resolve_client_id,
        ));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // API Documentation
        .route("/docs", get(docs::get_api_docs))
        .route("/docs/openapi.json", get(docs::get_openapi_spec))
        .route("/sign_in", post(sign_in))
        .merge(todo_routes)
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::permissive().expose_headers([HeaderName::from_static(CLIENT_ID_HEADER)])
}
