use crate::eligibility::default_rules;
use crate::entities::{
    AnswerMatch, DrawMode, DrawStatus, draw_entity as draws, rule_set_entity as rule_sets,
    source_entity as sources,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateDrawRequest, DrawResponse, RuleSetResponse, SourceResponse, UpdateDrawRequest,
    UpdateRulesRequest, UpdateSourceRequest,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};

/// frozen 起规则与元数据全部只读; 所有变更入口先过这道闸
pub fn assert_editable(draw: &draws::Model) -> AppResult<()> {
    if draw.status.is_locked() {
        return Err(AppError::DrawLocked(format!(
            "Draw {} is {} and can no longer be modified",
            draw.id, draw.status
        )));
    }
    Ok(())
}

/// random_correct 模式必须配置非空答案 (空答案会让所有评论都"答对")
pub fn validate_answer_config(mode: DrawMode, correct_answer: Option<&str>) -> AppResult<()> {
    if mode == DrawMode::RandomCorrect
        && correct_answer.map(str::trim).unwrap_or("").is_empty()
    {
        return Err(AppError::ValidationError(
            "correct_answer is required when draw_mode is random_correct".to_string(),
        ));
    }
    Ok(())
}

/// 双层 Option 补丁合并: 字段缺省保持原值, 显式 null 清空, 带值覆盖
pub fn merge_patch_field<T: Clone>(patch: &Option<Option<T>>, current: &Option<T>) -> Option<T> {
    match patch {
        Some(explicit) => explicit.clone(),
        None => current.clone(),
    }
}

fn validate_counts(winners_count: i32, alternates_count: i32) -> AppResult<()> {
    if winners_count < 1 {
        return Err(AppError::ValidationError(
            "winners_count must be at least 1".to_string(),
        ));
    }
    if alternates_count < 0 {
        return Err(AppError::ValidationError(
            "alternates_count cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub(crate) async fn load_draw(&self, draw_id: i64) -> AppResult<draws::Model> {
        draws::Entity::find_by_id(draw_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Draw {draw_id} not found")))
    }

    /// 创建抽奖并落一行默认规则 (默认值唯一出处见 eligibility::default_rules)
    pub async fn create_draw(&self, req: CreateDrawRequest) -> AppResult<DrawResponse> {
        if req.title.trim().is_empty() {
            return Err(AppError::ValidationError("title is required".to_string()));
        }
        let draw_mode = req.draw_mode.unwrap_or(DrawMode::RandomAll);
        let winners_count = req.winners_count.unwrap_or(1);
        let alternates_count = req.alternates_count.unwrap_or(0);
        validate_counts(winners_count, alternates_count)?;
        validate_answer_config(draw_mode, req.correct_answer.as_deref())?;

        let txn = self.pool.begin().await?;

        let draw = draws::ActiveModel {
            organizer_id: Set(req.organizer_id),
            title: Set(req.title.trim().to_string()),
            platform: Set(req.platform),
            draw_mode: Set(draw_mode),
            correct_answer: Set(req.correct_answer),
            answer_match: Set(req.answer_match.unwrap_or(AnswerMatch::Exact)),
            winners_count: Set(winners_count),
            alternates_count: Set(alternates_count),
            locked_at: Set(req.locked_at),
            status: Set(DrawStatus::Draft),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let defaults = default_rules();
        rule_sets::ActiveModel {
            draw_id: Set(draw.id),
            dedup_one_entry_per_user: Set(defaults.dedup_one_entry_per_user),
            exclude_page_admins: Set(defaults.exclude_page_admins),
            include_replies: Set(defaults.include_replies),
            required_keyword: Set(None),
            banned_keyword: Set(None),
            require_like: Set(defaults.require_like),
            like_check_available: Set(defaults.like_check_available),
            min_mentions: Set(defaults.min_mentions),
            required_hashtag: Set(None),
            required_mention: Set(None),
            block_list: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        log::info!("Created draw {} on {}", draw.id, draw.platform);
        Ok(draw.into())
    }

    pub async fn get_draw(&self, draw_id: i64) -> AppResult<DrawResponse> {
        Ok(self.load_draw(draw_id).await?.into())
    }

    /// 修改抽奖元数据 (draft/ready)
    pub async fn update_draw(&self, draw_id: i64, req: UpdateDrawRequest) -> AppResult<DrawResponse> {
        let draw = self.load_draw(draw_id).await?;
        assert_editable(&draw)?;

        let draw_mode = req.draw_mode.unwrap_or(draw.draw_mode);
        let correct_answer = merge_patch_field(&req.correct_answer, &draw.correct_answer);
        let locked_at = merge_patch_field(&req.locked_at, &draw.locked_at);
        let winners_count = req.winners_count.unwrap_or(draw.winners_count);
        let alternates_count = req.alternates_count.unwrap_or(draw.alternates_count);
        validate_counts(winners_count, alternates_count)?;
        validate_answer_config(draw_mode, correct_answer.as_deref())?;

        let mut am = draw.clone().into_active_model();
        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(AppError::ValidationError("title cannot be empty".to_string()));
            }
            am.title = Set(title.trim().to_string());
        }
        am.draw_mode = Set(draw_mode);
        am.correct_answer = Set(correct_answer);
        if let Some(v) = req.answer_match {
            am.answer_match = Set(v);
        }
        am.winners_count = Set(winners_count);
        am.alternates_count = Set(alternates_count);
        am.locked_at = Set(locked_at);
        if let Some(v) = req.logo_url {
            am.logo_url = Set(Some(v));
        }
        if let Some(v) = req.cover_url {
            am.cover_url = Set(Some(v));
        }
        if let Some(v) = req.video_format {
            am.video_format = Set(Some(v));
        }
        if let Some(v) = req.animation {
            am.animation = Set(Some(v));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// upsert 规则行 (draft/ready); like_check_available 在这里派生
    pub async fn upsert_rules(
        &self,
        draw_id: i64,
        req: UpdateRulesRequest,
    ) -> AppResult<RuleSetResponse> {
        let draw = self.load_draw(draw_id).await?;
        assert_editable(&draw)?;

        if let Some(n) = req.min_mentions
            && n < 0
        {
            return Err(AppError::ValidationError(
                "min_mentions cannot be negative".to_string(),
            ));
        }

        let existing = rule_sets::Entity::find()
            .filter(rule_sets::Column::DrawId.eq(draw_id))
            .one(&self.pool)
            .await?;

        let block_list_json = req
            .block_list
            .map(|list| serde_json::Value::from(list));

        let defaults = default_rules();
        let updated = match existing {
            Some(row) => {
                let require_like = req.require_like.unwrap_or(row.require_like);
                let mut am = row.clone().into_active_model();
                if let Some(v) = req.dedup_one_entry_per_user {
                    am.dedup_one_entry_per_user = Set(v);
                }
                if let Some(v) = req.exclude_page_admins {
                    am.exclude_page_admins = Set(v);
                }
                if let Some(v) = req.include_replies {
                    am.include_replies = Set(v);
                }
                if let Some(v) = req.required_keyword {
                    am.required_keyword = Set(Some(v).filter(|s| !s.trim().is_empty()));
                }
                if let Some(v) = req.banned_keyword {
                    am.banned_keyword = Set(Some(v).filter(|s| !s.trim().is_empty()));
                }
                if let Some(v) = req.min_mentions {
                    am.min_mentions = Set(v);
                }
                if let Some(v) = req.required_hashtag {
                    am.required_hashtag = Set(Some(v).filter(|s| !s.trim().is_empty()));
                }
                if let Some(v) = req.required_mention {
                    am.required_mention = Set(Some(v).filter(|s| !s.trim().is_empty()));
                }
                if let Some(v) = block_list_json {
                    am.block_list = Set(Some(v));
                }
                am.require_like = Set(require_like);
                // 平台无法核实点赞: 一旦要求点赞, 核实能力即为 false
                am.like_check_available = Set(!require_like);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?
            }
            None => {
                let require_like = req.require_like.unwrap_or(defaults.require_like);
                rule_sets::ActiveModel {
                    draw_id: Set(draw_id),
                    dedup_one_entry_per_user: Set(req
                        .dedup_one_entry_per_user
                        .unwrap_or(defaults.dedup_one_entry_per_user)),
                    exclude_page_admins: Set(req
                        .exclude_page_admins
                        .unwrap_or(defaults.exclude_page_admins)),
                    include_replies: Set(req.include_replies.unwrap_or(defaults.include_replies)),
                    required_keyword: Set(req
                        .required_keyword
                        .filter(|s| !s.trim().is_empty())),
                    banned_keyword: Set(req.banned_keyword.filter(|s| !s.trim().is_empty())),
                    require_like: Set(require_like),
                    like_check_available: Set(!require_like),
                    min_mentions: Set(req.min_mentions.unwrap_or(defaults.min_mentions)),
                    required_hashtag: Set(req
                        .required_hashtag
                        .filter(|s| !s.trim().is_empty())),
                    required_mention: Set(req
                        .required_mention
                        .filter(|s| !s.trim().is_empty())),
                    block_list: Set(block_list_json),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        Ok(updated.into())
    }

    /// upsert 评论来源 (draft/ready)
    pub async fn upsert_source(
        &self,
        draw_id: i64,
        req: UpdateSourceRequest,
    ) -> AppResult<SourceResponse> {
        let draw = self.load_draw(draw_id).await?;
        assert_editable(&draw)?;

        if req.post_external_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "post_external_id is required".to_string(),
            ));
        }

        let existing = sources::Entity::find()
            .filter(sources::Column::DrawId.eq(draw_id))
            .one(&self.pool)
            .await?;

        let updated = match existing {
            Some(row) => {
                let mut am = row.into_active_model();
                am.post_url = Set(req.post_url);
                am.post_external_id = Set(req.post_external_id.trim().to_string());
                am.page_token_ref = Set(req.page_token_ref);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?
            }
            None => sources::ActiveModel {
                draw_id: Set(draw_id),
                post_url: Set(req.post_url),
                post_external_id: Set(req.post_external_id.trim().to_string()),
                page_token_ref: Set(req.page_token_ref),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?,
        };

        Ok(updated.into())
    }

    /// draft -> ready; random_correct 的答案校验在这里卡死
    pub async fn mark_ready(&self, draw_id: i64) -> AppResult<DrawResponse> {
        let draw = self.load_draw(draw_id).await?;
        assert_editable(&draw)?;
        validate_answer_config(draw.draw_mode, draw.correct_answer.as_deref())?;

        let source = sources::Entity::find()
            .filter(sources::Column::DrawId.eq(draw_id))
            .one(&self.pool)
            .await?;
        if source.is_none() {
            return Err(AppError::ValidationError(
                "comment source must be configured before marking ready".to_string(),
            ));
        }

        self.transition(draw_id, DrawStatus::Draft, DrawStatus::Ready)
            .await
    }

    /// ready -> frozen: 开奖前定格规则
    pub async fn freeze(&self, draw_id: i64) -> AppResult<DrawResponse> {
        self.transition(draw_id, DrawStatus::Ready, DrawStatus::Frozen)
            .await
    }

    /// 单行条件更新完成状态迁移; 并发迁移只会有一个成功
    async fn transition(
        &self,
        draw_id: i64,
        from: DrawStatus,
        to: DrawStatus,
    ) -> AppResult<DrawResponse> {
        let result = draws::Entity::update_many()
            .col_expr(draws::Column::Status, Expr::value(to))
            .col_expr(draws::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(draws::Column::Id.eq(draw_id))
            .filter(draws::Column::Status.eq(from))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            let current = self.load_draw(draw_id).await?;
            return Err(AppError::DrawLocked(format!(
                "Draw {draw_id} is {} and cannot transition to {to}",
                current.status
            )));
        }

        log::info!("Draw {draw_id} transitioned {from} -> {to}");
        self.load_draw(draw_id).await.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Platform;

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

    #[test]
    fn test_editable_only_before_freeze() {
        assert!(assert_editable(&draw_with_status(DrawStatus::Draft)).is_ok());
        assert!(assert_editable(&draw_with_status(DrawStatus::Ready)).is_ok());
        for status in [DrawStatus::Frozen, DrawStatus::Drawn, DrawStatus::Published] {
            let err = assert_editable(&draw_with_status(status)).unwrap_err();
            assert!(matches!(err, AppError::DrawLocked(_)));
        }
    }

    #[test]
    fn test_random_correct_requires_answer() {
        assert!(validate_answer_config(DrawMode::RandomAll, None).is_ok());
        assert!(validate_answer_config(DrawMode::RandomCorrect, Some("cafe")).is_ok());
        for answer in [None, Some(""), Some("   ")] {
            let err = validate_answer_config(DrawMode::RandomCorrect, answer).unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }

    #[test]
    fn test_merge_patch_field_distinguishes_missing_from_null() {
        let current = Some("cafe".to_string());
        // 字段缺省: 保持原值
        assert_eq!(merge_patch_field(&None, &current), current);
        // 显式 null: 清空
        assert_eq!(merge_patch_field::<String>(&Some(None), &current), None);
        // 带值: 覆盖
        assert_eq!(
            merge_patch_field(&Some(Some("tea".to_string())), &current),
            Some("tea".to_string())
        );
    }

    #[test]
    fn test_patch_json_null_clears_locked_at() {
        let req: UpdateDrawRequest =
            serde_json::from_value(serde_json::json!({ "locked_at": null })).unwrap();
        assert_eq!(req.locked_at, Some(None));
        let untouched: UpdateDrawRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(untouched.locked_at, None);
    }

    #[test]
    fn test_counts_validation() {
        assert!(validate_counts(1, 0).is_ok());
        assert!(validate_counts(3, 2).is_ok());
        assert!(validate_counts(0, 0).is_err());
        assert!(validate_counts(1, -1).is_err());
    }
}
