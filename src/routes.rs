use crate::common::state::AppState;
use crate::{common, database, uploads};
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(app_state: AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Club Event API",
            description = "Serverless functions backing the club events platform"
        ),
        tags(
            (name = "health", description = "Reachability checks"),
            (name = "uploads", description = "Direct-to-S3 browser uploads"),
            (name = "database", description = "Schema bootstrap and connectivity")
        )
    )]
    struct ApiDoc;

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(common::views::router())
        .merge(uploads::views::router(&app_state))
        .nest("/database", database::views::router(&app_state))
        .split_for_parts();

    let openapi_json = api.clone();
    router
        .route(
            "/api/openapi.json",
            get(move || async move { Json(openapi_json) }),
        )
        .merge(Scalar::with_url("/api/docs", api))
}
