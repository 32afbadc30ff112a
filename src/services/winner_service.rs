use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};

use crate::entities::{
    DrawMode, DrawStatus, EntryStatus, WinnerType, draw_entity as draws, entry_entity as entries,
    winner_entity as winners,
};
use crate::error::{AppError, AppResult};
use crate::models::WinnerResponse;
use crate::utils::sample_without_replacement;

/// 开奖服务: 在合格池上无放回抽取 正取 + 备选, 并把状态翻为 drawn。
#[derive(Clone)]
pub struct WinnerService {
    pool: DatabaseConnection,
}

impl WinnerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 执行开奖。状态闸与中奖写入在同一事务里提交;
    /// 条件更新保证并发触发时只有一次成功, 其余得到 ALREADY_DRAWN。
    pub async fn run_draw(&self, draw_id: i64) -> AppResult<Vec<WinnerResponse>> {
        let draw = draws::Entity::find_by_id(draw_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))?;

        match draw.status {
            DrawStatus::Drawn | DrawStatus::Published => {
                return Err(AppError::AlreadyDrawn(format!(
                    "Draw {draw_id} has already been drawn"
                )));
            }
            DrawStatus::Draft => {
                return Err(AppError::DrawLocked(format!(
                    "Draw {draw_id} is draft and must be marked ready before drawing"
                )));
            }
            DrawStatus::Ready | DrawStatus::Frozen => {}
        }

        let txn = self.pool.begin().await?;

        // 与对账共用同一把事务级咨询锁: 在途的同步提交完才开奖, 开奖后同步被状态闸拒绝
        txn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_advisory_xact_lock($1)",
            [draw_id.into()],
        ))
        .await?;

        // 状态闸: ready/frozen -> drawn, 同一行最多翻一次
        let flipped = draws::Entity::update_many()
            .col_expr(draws::Column::Status, Expr::value(DrawStatus::Drawn))
            .col_expr(draws::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(draws::Column::Id.eq(draw_id))
            .filter(
                draws::Column::Status.is_in([DrawStatus::Ready, DrawStatus::Frozen]),
            )
            .exec(&txn)
            .await?;
        if flipped.rows_affected == 0 {
            return Err(AppError::AlreadyDrawn(format!(
                "Draw {draw_id} has already been drawn"
            )));
        }

        let mut finder = entries::Entity::find()
            .filter(entries::Column::DrawId.eq(draw_id))
            .filter(entries::Column::EntryStatus.eq(EntryStatus::Eligible));
        if draw.draw_mode == DrawMode::RandomCorrect {
            finder = finder.filter(entries::Column::IsCorrect.eq(true));
        }
        let mut pool = finder.order_by_asc(entries::Column::Id).all(&txn).await?;

        if pool.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Draw {draw_id} has no eligible entries to draw from"
            )));
        }

        // 池子不够时能抽多少抽多少, 不报错
        let target = (draw.winners_count + draw.alternates_count).max(0) as usize;
        let picked = sample_without_replacement(&mut pool, target);

        let mut responses = Vec::with_capacity(picked.len());
        for (i, entry) in picked.iter().enumerate() {
            let rank = (i + 1) as i32;
            let winner_type = if rank <= draw.winners_count {
                WinnerType::Primary
            } else {
                WinnerType::Alternate
            };
            let row = winners::ActiveModel {
                draw_id: Set(draw_id),
                entry_id: Set(entry.id),
                rank: Set(rank),
                winner_type: Set(winner_type),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            responses.push(WinnerResponse::from_parts(&row, entry));
        }

        txn.commit().await?;

        log::info!(
            "Draw {draw_id} drawn: {} winners selected out of {} requested",
            responses.len(),
            target
        );
        Ok(responses)
    }

    /// 按 rank 升序返回中奖名单
    pub async fn list_winners(&self, draw_id: i64) -> AppResult<Vec<WinnerResponse>> {
        let rows = winners::Entity::find()
            .filter(winners::Column::DrawId.eq(draw_id))
            .order_by_asc(winners::Column::Rank)
            .all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let entry_ids: Vec<i64> = rows.iter().map(|w| w.entry_id).collect();
        let entry_map: HashMap<i64, entries::Model> = entries::Entity::find()
            .filter(entries::Column::Id.is_in(entry_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut responses = Vec::with_capacity(rows.len());
        for w in &rows {
            let entry = entry_map.get(&w.entry_id).ok_or_else(|| {
                AppError::InternalError(format!(
                    "Winner rank {} of draw {draw_id} references missing entry {}",
                    w.rank, w.entry_id
                ))
            })?;
            responses.push(WinnerResponse::from_parts(w, entry));
        }
        Ok(responses)
    }
}
