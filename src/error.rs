use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 抽奖已冻结/已开奖/已发布, 禁止再修改规则或元数据
    #[error("Draw is locked: {0}")]
    DrawLocked(String),

    /// 已开过奖的抽奖不允许重抽 (防止刷结果)
    #[error("Draw already drawn: {0}")]
    AlreadyDrawn(String),

    /// 评论源整体拉取失败, 本次对账不落任何数据
    #[error("Comment source fetch failed: {0}")]
    SourceFetch(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::DrawLocked(msg) => {
                log::warn!("Draw locked: {msg}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "DRAW_LOCKED",
                    msg.clone(),
                )
            }
            AppError::AlreadyDrawn(msg) => {
                log::warn!("Already drawn: {msg}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "ALREADY_DRAWN",
                    msg.clone(),
                )
            }
            AppError::SourceFetch(msg) => {
                log::error!("Source fetch error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "SOURCE_FETCH_ERROR",
                    msg.clone(),
                )
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg.clone(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
