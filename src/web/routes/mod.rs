use crate::web::error::AppError;

pub mod identity_routes;
pub mod news_routes;
pub mod program_routes;
pub mod upload_routes;
pub mod visit_routes;

/// Fallback for verbs a route does not serve.
pub(crate) async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
