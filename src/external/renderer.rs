use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::RendererConfig;
use crate::error::{AppError, AppResult};

/// 渲染协作方异步写回的任务状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStatus {
    pub status: RenderState,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    Queued,
    Rendering,
    Published,
    Failed,
}

/// 渲染/发布协作方客户端。
/// 只负责投递 manifest; 视频产出与状态回写是协作方的异步过程, 本服务不等待。
#[derive(Clone)]
pub struct RendererClient {
    client: Client,
    config: RendererConfig,
}

impl RendererClient {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.base_url.is_empty()
    }

    /// 把发布 manifest 投递给渲染队列
    pub async fn enqueue(&self, manifest: &serde_json::Value) -> AppResult<RenderStatus> {
        if !self.is_configured() {
            return Err(AppError::ExternalApiError(
                "Renderer is not configured".to_string(),
            ));
        }

        let url = format!("{}/render-jobs", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(manifest)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Renderer enqueue failed with status {}",
                response.status()
            )));
        }

        let status: RenderStatus = response.json().await?;
        log::info!("Render job enqueued, status: {:?}", status.status);
        Ok(status)
    }
}
