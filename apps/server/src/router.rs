use axum::Router;
use ohub::kernel::server::ApiState;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(
    info(title = "Order Hub", description = "Orders, product catalog and bin width calculation"),
    tags(
        (name = "System", description = "Operational endpoints"),
        (name = "Orders", description = "Create and look up orders"),
    )
)]
struct ApiDoc;

/// Builds the complete application router: feature routes, tracing and the Scalar UI at `/api`.
#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(ohub::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
