use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::SyncService;

#[utoipa::path(
    post,
    path = "/draws/{id}/sync",
    tag = "entries",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "对账完成, 返回本次快照", body = SnapshotResponse),
        (status = 404, description = "抽奖不存在"),
        (status = 409, description = "开奖后名单已定格"),
        (status = 502, description = "评论来源拉取失败")
    )
)]
/// 触发一次评论对账:
/// 1. 按平台拉取帖子全部评论
/// 2. 规范化并按固定顺序求值资格规则
/// 3. 按 (draw_id, comment_id) upsert 参与条目
/// 4. 追加一行资格快照
pub async fn sync_draw(
    service: web::Data<SyncService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.sync_draw(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/{id}/snapshot",
    tag = "entries",
    params(("id" = i64, Path, description = "抽奖ID")),
    responses(
        (status = 200, description = "获取最近快照成功", body = SnapshotResponse),
        (status = 404, description = "尚未同步过")
    )
)]
/// 最近一次对账的快照
pub async fn latest_snapshot(
    service: web::Data<SyncService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.latest_snapshot(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/draws/{id}/entries",
    tag = "entries",
    params(
        ("id" = i64, Path, description = "抽奖ID"),
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)"),
        ("status" = Option<String>, Query, description = "按状态过滤 (eligible / excluded)")
    ),
    responses(
        (status = 200, description = "获取参与条目成功", body = PaginatedResponse<EntryResponse>)
    )
)]
/// 按评论时间升序分页列出参与条目
pub async fn list_entries(
    service: web::Data<SyncService>,
    path: web::Path<i64>,
    query: web::Query<EntryQuery>,
) -> Result<HttpResponse> {
    match service.list_entries(path.into_inner(), query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}
