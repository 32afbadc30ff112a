use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{DrawService, SyncService};

#[utoipa::path(
    post,
    path = "/draws",
    tag = "draws",
    request_body = CreateDrawRequest,
    responses(
        (status = 200, description = "创建抽奖成功", body = DrawResponse),
        (status = 400, description = "参数校验失败")
    )
)]
/// 创建抽奖, 同时落一行默认规则
pub async fn create_draw(
    service: web::Data<DrawService>,
    body: web::Json<CreateDrawRequest>,
) -> Result<HttpResponse> {
    match service.create_draw(body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/{id}",
    tag = "draws",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "获取抽奖详情成功", body = DrawDetailResponse),
        (status = 404, description = "抽奖不存在")
    )
)]
/// 抽奖详情 (元数据 + 最近一次对账快照)
pub async fn get_draw(
    service: web::Data<DrawService>,
    sync_service: web::Data<SyncService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let draw_id = path.into_inner();
    let draw = match service.get_draw(draw_id).await {
        Ok(d) => d,
        Err(e) => return Ok(e.error_response()),
    };
    match sync_service.find_latest_snapshot(draw_id).await {
        Ok(latest_snapshot) => {
            let data = DrawDetailResponse { draw, latest_snapshot };
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/draws/{id}",
    tag = "draws",
    params(("id" = i64, Path, description = "抽奖ID")),
    request_body = UpdateDrawRequest,
    responses(
        (status = 200, description = "修改抽奖成功", body = DrawResponse),
        (status = 400, description = "参数校验失败"),
        (status = 404, description = "抽奖不存在"),
        (status = 409, description = "抽奖已锁定")
    )
)]
/// 修改抽奖元数据 (仅 draft/ready)
pub async fn update_draw(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
    body: web::Json<UpdateDrawRequest>,
) -> Result<HttpResponse> {
    match service.update_draw(path.into_inner(), body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/draws/{id}/rules",
    tag = "draws",
    params(("id" = i64, Path, description = "抽奖ID")),
    request_body = UpdateRulesRequest,
    responses(
        (status = 200, description = "规则保存成功", body = RuleSetResponse),
        (status = 404, description = "抽奖不存在"),
        (status = 409, description = "抽奖已锁定")
    )
)]
/// upsert 资格规则 (仅 draft/ready)
pub async fn upsert_rules(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
    body: web::Json<UpdateRulesRequest>,
) -> Result<HttpResponse> {
    match service.upsert_rules(path.into_inner(), body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/draws/{id}/source",
    tag = "draws",
    params(("id" = i64, Path, description = "抽奖ID")),
    request_body = UpdateSourceRequest,
    responses(
        (status = 200, description = "来源保存成功", body = SourceResponse),
        (status = 404, description = "抽奖不存在"),
        (status = 409, description = "抽奖已锁定")
    )
)]
/// upsert 评论来源 (仅 draft/ready)
pub async fn upsert_source(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
    body: web::Json<UpdateSourceRequest>,
) -> Result<HttpResponse> {
    match service.upsert_source(path.into_inner(), body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draws/{id}/ready",
    tag = "draws",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "已置为 ready", body = DrawResponse),
        (status = 400, description = "配置不完整"),
        (status = 409, description = "状态不允许迁移")
    )
)]
/// draft -> ready (要求来源已配置; random_correct 必须有答案)
pub async fn mark_ready(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.mark_ready(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draws/{id}/freeze",
    tag = "draws",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "已冻结", body = DrawResponse),
        (status = 409, description = "状态不允许迁移")
    )
)]
/// ready -> frozen (开奖前定格规则)
pub async fn freeze(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.freeze(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}
