use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AnswerMatch, DrawMode, DrawStatus, EntryStatus, Platform, WinnerType};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::draw::create_draw,
        handlers::draw::get_draw,
        handlers::draw::update_draw,
        handlers::draw::upsert_rules,
        handlers::draw::upsert_source,
        handlers::draw::mark_ready,
        handlers::draw::freeze,
        handlers::entry::sync_draw,
        handlers::entry::latest_snapshot,
        handlers::entry::list_entries,
        handlers::winner::run_draw,
        handlers::winner::list_winners,
        handlers::winner::publish,
    ),
    components(
        schemas(
            Platform,
            DrawMode,
            AnswerMatch,
            DrawStatus,
            EntryStatus,
            WinnerType,
            CreateDrawRequest,
            UpdateDrawRequest,
            UpdateRulesRequest,
            UpdateSourceRequest,
            DrawResponse,
            DrawDetailResponse,
            RuleSetResponse,
            SourceResponse,
            SnapshotResponse,
            EntryQuery,
            EntryResponse,
            WinnerResponse,
            PublishResponse,
            PaginationInfo,
            PaginatedResponse<EntryResponse>,
            ApiError,
        )
    ),
    tags(
        (name = "draws", description = "Draw lifecycle and configuration API"),
        (name = "entries", description = "Comment sync and entry listing API"),
        (name = "winners", description = "Winner selection and publishing API"),
    ),
    info(
        title = "Giveaway Backend API",
        version = "1.0.0",
        description = "Giveaway draw eligibility and selection REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
