/// 猫耳 API 客户端
///
/// 封装所有与猫耳接口相关的网络请求，解析交给 `api::missevan`
use crate::api::missevan::{
    comment_url, danmaku_url, drama_url, parse_comment_page, parse_danmaku_user_ids,
    parse_drama_listing, parse_sound_detail, sound_url,
};
use crate::api::DramaApi;
use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::models::{CommentPage, DramaListing, EpisodeDetail, UserIdSet};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 猫耳 API 客户端
pub struct MissevanClient {
    client: Client,
    base_url: String,
}

impl MissevanClient {
    /// 创建新的客户端，超时和 User-Agent 取自配置
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 发送 GET 请求并返回响应文本，非 2xx 视为失败
    async fn get_text(&self, url: &str) -> FetchResult<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            endpoint: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DramaApi for MissevanClient {
    async fn fetch_drama(&self, drama_id: &str) -> FetchResult<DramaListing> {
        let url = drama_url(&self.base_url, drama_id);
        let body = self.get_text(&url).await?;
        parse_drama_listing(&url, &body)
    }

    async fn fetch_episode_detail(&self, sound_id: u64) -> FetchResult<EpisodeDetail> {
        let url = sound_url(&self.base_url, sound_id);
        let body = self.get_text(&url).await?;
        parse_sound_detail(&url, &body)
    }

    async fn fetch_danmaku_user_ids(&self, sound_id: u64) -> FetchResult<UserIdSet> {
        let url = danmaku_url(&self.base_url, sound_id);
        let body = self.get_text(&url).await?;
        parse_danmaku_user_ids(&url, &body)
    }

    async fn fetch_comment_page(&self, sound_id: u64, page: u32) -> FetchResult<CommentPage> {
        let url = comment_url(&self.base_url, sound_id, page);
        let body = self.get_text(&url).await?;
        parse_comment_page(&url, &body)
    }
}
