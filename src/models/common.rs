use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应里 error 字段的形状 (code 为稳定错误码)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
