use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use serde_json::json;

use crate::entities::{
    DrawStatus, draw_entity as draws, publish_asset_entity as publish_assets,
};
use crate::error::{AppError, AppResult};
use crate::external::RendererClient;
use crate::models::PublishResponse;
use crate::services::WinnerService;
use crate::utils::generate_public_slug;

/// 发布服务: 定格公开slug与发布时间, 产出交给渲染协作方的 manifest。
/// 可重复调用; slug 只生成一次, published_at 只进不退。
#[derive(Clone)]
pub struct PublishService {
    pool: DatabaseConnection,
    winner_service: WinnerService,
    renderer: RendererClient,
}

impl PublishService {
    pub fn new(
        pool: DatabaseConnection,
        winner_service: WinnerService,
        renderer: RendererClient,
    ) -> Self {
        Self {
            pool,
            winner_service,
            renderer,
        }
    }

    pub async fn publish(&self, draw_id: i64) -> AppResult<PublishResponse> {
        let draw = draws::Entity::find_by_id(draw_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))?;

        if !matches!(draw.status, DrawStatus::Drawn | DrawStatus::Published) {
            return Err(AppError::ValidationError(format!(
                "Draw {draw_id} is {} and cannot be published before winners are drawn",
                draw.status
            )));
        }

        // slug 只生成一次; 条件更新挡住并发的重复生成
        let slug = match &draw.public_view_slug {
            Some(slug) => slug.clone(),
            None => {
                let candidate = generate_public_slug();
                let result = draws::Entity::update_many()
                    .col_expr(
                        draws::Column::PublicViewSlug,
                        Expr::value(Some(candidate.clone())),
                    )
                    .col_expr(draws::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(draws::Column::Id.eq(draw_id))
                    .filter(draws::Column::PublicViewSlug.is_null())
                    .exec(&self.pool)
                    .await?;
                if result.rows_affected == 1 {
                    candidate
                } else {
                    draws::Entity::find_by_id(draw_id)
                        .one(&self.pool)
                        .await?
                        .and_then(|d| d.public_view_slug)
                        .ok_or_else(|| {
                            AppError::InternalError(format!(
                                "Draw {draw_id} lost its public slug during publish"
                            ))
                        })?
                }
            }
        };

        let winners = self.winner_service.list_winners(draw_id).await?;

        // 发布产物 upsert; 重复发布保留首次 published_at
        let existing = publish_assets::Entity::find()
            .filter(publish_assets::Column::DrawId.eq(draw_id))
            .one(&self.pool)
            .await?;
        let asset = match existing {
            Some(row) => {
                let mut am = row.into_active_model();
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?
            }
            None => publish_assets::ActiveModel {
                draw_id: Set(draw_id),
                video_url: Set(None),
                published_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?,
        };

        draws::Entity::update_many()
            .col_expr(draws::Column::Status, Expr::value(DrawStatus::Published))
            .col_expr(draws::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(draws::Column::Id.eq(draw_id))
            .filter(draws::Column::Status.eq(DrawStatus::Drawn))
            .exec(&self.pool)
            .await?;

        let manifest = json!({
            "draw_id": draw_id,
            "title": draw.title,
            "platform": draw.platform,
            "public_view_slug": slug,
            "published_at": asset.published_at,
            "video_format": draw.video_format,
            "animation": draw.animation,
            "logo_url": draw.logo_url,
            "cover_url": draw.cover_url,
            "video_url": asset.video_url,
            "winners": winners,
        });

        // 渲染投递尽力而为; 协作方异步回写, 失败不影响发布本身
        if self.renderer.is_configured() {
            if let Err(e) = self.renderer.enqueue(&manifest).await {
                log::warn!("Render enqueue failed for draw {draw_id}: {e}");
            }
        }

        log::info!("Draw {draw_id} published with slug {slug}");
        Ok(PublishResponse {
            draw_id,
            public_view_slug: slug,
            published_at: asset.published_at,
            video_url: asset.video_url,
            manifest,
        })
    }
}
