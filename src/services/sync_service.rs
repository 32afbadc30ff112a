use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};

use crate::eligibility::{
    DrawSpec, EffectiveRules, EvaluationRun, Verdict, evaluate_comment, normalize_comment,
};
use crate::entities::{
    DrawStatus, EntryStatus, draw_entity as draws, entry_entity as entries,
    rule_set_entity as rule_sets, snapshot_entity as snapshots, source_entity as sources,
};
use crate::error::{AppError, AppResult};
use crate::external::CommentSources;
use crate::models::{EntryPageResponse, EntryQuery, PaginationParams, SnapshotResponse};

/// 开奖后名单定格, 条目不允许再被对账改写
pub fn assert_entries_mutable(draw: &draws::Model) -> AppResult<()> {
    if matches!(draw.status, DrawStatus::Drawn | DrawStatus::Published) {
        return Err(AppError::DrawLocked(format!(
            "Draw {} is {} and its entries are final",
            draw.id, draw.status
        )));
    }
    Ok(())
}

/// 评论对账服务: 拉取 -> 规范化 -> 规则求值 -> upsert 条目 -> 落快照。
/// 同一抽奖的对账全程持有事务级咨询锁, 并发触发时串行执行;
/// 开奖侧也持同一把锁, 对账与开奖互斥。
#[derive(Clone)]
pub struct SyncService {
    pool: DatabaseConnection,
    sources: CommentSources,
}

impl SyncService {
    pub fn new(pool: DatabaseConnection, sources: CommentSources) -> Self {
        Self { pool, sources }
    }

    /// 对一个抽奖执行一次完整对账, 返回本次运行的快照。
    /// 拉取失败时不写任何数据, 上一次对账结果原样保留。
    pub async fn sync_draw(&self, draw_id: i64) -> AppResult<SnapshotResponse> {
        let draw = draws::Entity::find_by_id(draw_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))?;
        assert_entries_mutable(&draw)?;

        let source = sources::Entity::find()
            .filter(sources::Column::DrawId.eq(draw_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError(format!("Draw {draw_id} has no comment source configured"))
            })?;

        let rule_row = rule_sets::Entity::find()
            .filter(rule_sets::Column::DrawId.eq(draw_id))
            .one(&self.pool)
            .await?;
        let rules = EffectiveRules::from_model(rule_row.as_ref());

        let spec = DrawSpec {
            platform: draw.platform,
            draw_mode: draw.draw_mode,
            answer_match: draw.answer_match,
            correct_answer: draw.correct_answer.clone(),
            locked_at: draw.locked_at,
        };

        // 先拉全量评论再开事务; 网络失败不会留下半截写入
        let raw_comments = self
            .sources
            .fetch_comments(draw.platform, &source, rules.include_replies)
            .await?;

        let mut run = EvaluationRun::new();
        let mut rows: Vec<entries::ActiveModel> = Vec::new();
        let mut seen_comment_ids: HashSet<String> = HashSet::new();
        let now = Utc::now();

        for raw in &raw_comments {
            // 没有平台侧ID的评论无法做幂等 upsert, 跳过
            if raw.id.is_empty() || !seen_comment_ids.insert(raw.id.clone()) {
                continue;
            }
            let Some(comment) = normalize_comment(draw.platform, raw, rules.include_replies)
            else {
                continue;
            };

            let verdict = evaluate_comment(&mut run, &rules, &spec, &comment);
            let (entry_status, exclusion_reason, is_correct) = match verdict {
                Verdict::OutsideWindow => continue,
                Verdict::Eligible { is_correct } => (EntryStatus::Eligible, None, is_correct),
                Verdict::Excluded { reason, is_correct } => (
                    EntryStatus::Excluded,
                    Some(reason.as_str().to_string()),
                    is_correct,
                ),
            };

            rows.push(entries::ActiveModel {
                draw_id: Set(draw_id),
                comment_id: Set(comment.id.clone()),
                author_id: Set(comment.author_id.clone()),
                author_display_name: Set(comment.author_display_name.clone()),
                comment_text: Set(comment.text.clone()),
                comment_url: Set(comment.url.clone()),
                commented_at: Set(comment.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)),
                entry_status: Set(entry_status),
                exclusion_reason: Set(exclusion_reason),
                is_correct: Set(is_correct),
                updated_at: Set(Some(now)),
                ..Default::default()
            });
        }

        let txn = self.pool.begin().await?;

        // 事务级咨询锁: 同一抽奖的并发对账串行化, 事务结束自动释放
        txn.execute(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_advisory_xact_lock($1)",
            [draw_id.into()],
        ))
        .await?;

        // 锁内复查状态: 求值期间可能已经开奖, 此时放弃写入
        let current = draws::Entity::find_by_id(draw_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))?;
        assert_entries_mutable(&current)?;

        if !rows.is_empty() {
            entries::Entity::insert_many(rows)
                .on_conflict(
                    OnConflict::columns([entries::Column::DrawId, entries::Column::CommentId])
                        .update_columns([
                            entries::Column::AuthorId,
                            entries::Column::AuthorDisplayName,
                            entries::Column::CommentText,
                            entries::Column::CommentUrl,
                            entries::Column::CommentedAt,
                            entries::Column::EntryStatus,
                            entries::Column::ExclusionReason,
                            entries::Column::IsCorrect,
                            entries::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(&txn)
                .await?;
        }

        let snapshot = snapshots::ActiveModel {
            draw_id: Set(draw_id),
            total_comments_in_window: Set(run.total_in_window),
            unique_users_count: Set(run.unique_users_count()),
            eligible_count: Set(run.eligible_count),
            excluded_count: Set(run.excluded_count),
            exclusion_breakdown: Set(serde_json::to_value(&run.breakdown)?),
            latest_comment_at_in_window: Set(run.latest_comment_at),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Synced draw {draw_id}: {} fetched, {} in window, {} eligible, {} excluded",
            raw_comments.len(),
            run.total_in_window,
            run.eligible_count,
            run.excluded_count
        );
        Ok(snapshot.into())
    }

    /// 最近一次对账的快照; 从未同步过时为 None
    pub async fn find_latest_snapshot(&self, draw_id: i64) -> AppResult<Option<SnapshotResponse>> {
        let row = snapshots::Entity::find()
            .filter(snapshots::Column::DrawId.eq(draw_id))
            .order_by_desc(snapshots::Column::Id)
            .one(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// 最近一次对账的快照
    pub async fn latest_snapshot(&self, draw_id: i64) -> AppResult<SnapshotResponse> {
        self.find_latest_snapshot(draw_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} has not been synced yet")))
    }

    /// 按评论时间升序分页列出参与条目, 可按状态过滤
    pub async fn list_entries(
        &self,
        draw_id: i64,
        query: EntryQuery,
    ) -> AppResult<EntryPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut finder = entries::Entity::find().filter(entries::Column::DrawId.eq(draw_id));
        if let Some(status) = query.status {
            finder = finder.filter(entries::Column::EntryStatus.eq(status));
        }

        let total = finder.clone().count(&self.pool).await? as i64;
        let rows = finder
            .order_by_asc(entries::Column::CommentedAt)
            .order_by_asc(entries::Column::Id)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(EntryPageResponse::new(items, &params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AnswerMatch, DrawMode, Platform};

    fn draw_with_status(status: DrawStatus) -> draws::Model {
        draws::Model {
            id: 1,
            organizer_id: 7,
            title: "test".to_string(),
            platform: Platform::Facebook,
            draw_mode: DrawMode::RandomAll,
            correct_answer: None,
            answer_match: AnswerMatch::Exact,
            winners_count: 1,
            alternates_count: 0,
            locked_at: None,
            status,
            logo_url: None,
            cover_url: None,
            video_format: None,
            animation: None,
            public_view_slug: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// 开奖前可对账, 开奖后条目定格; 锁内复查用的也是这同一判定
    #[test]
    fn test_entries_mutable_until_drawn() {
        for status in [DrawStatus::Draft, DrawStatus::Ready, DrawStatus::Frozen] {
            assert!(assert_entries_mutable(&draw_with_status(status)).is_ok());
        }
        for status in [DrawStatus::Drawn, DrawStatus::Published] {
            let err = assert_entries_mutable(&draw_with_status(status)).unwrap_err();
            assert!(matches!(err, AppError::DrawLocked(_)));
        }
    }
}
