use super::health;
use axum::extract::FromRef;
use ohub_database::Database;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Operational routes shared by every deployment (currently `/health`).
pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
    Database: FromRef<S>,
{
    OpenApiRouter::<S>::new().routes(routes!(health::health_handler))
}
