use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{PublishService, WinnerService};

#[utoipa::path(
    post,
    path = "/draws/{id}/draw",
    tag = "winners",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "开奖成功", body = [WinnerResponse]),
        (status = 400, description = "没有合格条目"),
        (status = 404, description = "抽奖不存在"),
        (status = 409, description = "已开过奖或尚未 ready")
    )
)]
/// 执行开奖:
/// 1. 状态条件更新 ready/frozen -> drawn (并发只有一次成功)
/// 2. 合格池上 OsRng 无放回抽样 正取 + 备选
/// 3. 中奖记录与状态翻转同事务提交
pub async fn run_draw(
    service: web::Data<WinnerService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.run_draw(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/{id}/winners",
    tag = "winners",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "获取中奖名单成功", body = [WinnerResponse])
    )
)]
/// 按 rank 升序返回中奖名单 (未开奖时为空)
pub async fn list_winners(
    service: web::Data<WinnerService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.list_winners(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/draws/{id}/publish",
    tag = "winners",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "发布成功", body = PublishResponse),
        (status = 400, description = "尚未开奖"),
        (status = 404, description = "抽奖不存在")
    )
)]
/// 发布抽奖结果:
/// 1. 首次发布生成 public_view_slug (之后不变)
/// 2. upsert 发布产物, published_at 只进不退
/// 3. manifest 尽力投递给渲染协作方 (失败只记日志)
pub async fn publish(
    service: web::Data<PublishService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.publish(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}
