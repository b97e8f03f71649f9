#![allow(dead_code)]

use async_trait::async_trait;
use drama_stats::models::{CommentPage, DramaListing, EpisodeDetail};
use drama_stats::{DramaApi, EpisodeDescriptor, FetchError, FetchResult, UserIdSet};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// 单集的预设响应
#[derive(Debug, Clone, Default)]
pub struct ScriptedEpisode {
    /// `None` 表示详情请求失败
    pub detail: Option<EpisodeDetail>,
    /// `None` 表示弹幕请求失败
    pub danmaku: Option<Vec<u64>>,
    /// 每个元素是一页评论用户
    pub comment_pages: Vec<Vec<u64>>,
    /// 请求到该页时失败
    pub comment_fail_at: Option<u32>,
    /// 每个请求的延迟
    pub delay: Duration,
    /// 详情请求直接 panic
    pub detail_panics: bool,
}

impl ScriptedEpisode {
    pub fn new(views: u64, create_time: i64, danmaku: &[u64], comments: &[u64]) -> Self {
        Self {
            detail: Some(EpisodeDetail {
                view_count: Some(views),
                create_time: Some(create_time),
                ..Default::default()
            }),
            danmaku: Some(danmaku.to_vec()),
            comment_pages: vec![comments.to_vec()],
            comment_fail_at: None,
            delay: Duration::ZERO,
            detail_panics: false,
        }
    }

    pub fn panicking(mut self) -> Self {
        self.detail_panics = true;
        self
    }

    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn with_comment_pages(mut self, pages: Vec<Vec<u64>>) -> Self {
        self.comment_pages = pages;
        self
    }
}

/// 内存中的猫耳接口，按剧集ID / 声音ID返回预设数据
#[derive(Default)]
pub struct ScriptedApi {
    dramas: HashMap<String, DramaListing>,
    episodes: HashMap<u64, ScriptedEpisode>,
    comment_requests: Mutex<HashMap<u64, u32>>,
    detail_completions: Mutex<Vec<u64>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册剧集；`episodes` 为 (声音ID, 标题, need_pay, 预设响应)
    pub fn drama(
        mut self,
        drama_id: &str,
        name: &str,
        episodes: Vec<(u64, &str, u64, ScriptedEpisode)>,
    ) -> Self {
        let mut descriptors = Vec::new();
        for (sound_id, title, need_pay, scripted) in episodes {
            descriptors.push(EpisodeDescriptor {
                sound_id,
                title: title.to_string(),
                paid: need_pay > 0,
            });
            self.episodes.insert(sound_id, scripted);
        }
        self.dramas.insert(
            drama_id.to_string(),
            DramaListing {
                episodes: descriptors,
                name: Some(name.to_string()),
                price: Some(199),
                view_count: Some(100_000),
                catalog_name: Some("广播剧".to_string()),
            },
        );
        self
    }

    pub fn comment_requests(&self, sound_id: u64) -> u32 {
        self.comment_requests
            .lock()
            .unwrap()
            .get(&sound_id)
            .copied()
            .unwrap_or(0)
    }

    /// 详情请求完成的顺序
    pub fn detail_completions(&self) -> Vec<u64> {
        self.detail_completions.lock().unwrap().clone()
    }

    fn episode(&self, sound_id: u64) -> &ScriptedEpisode {
        self.episodes
            .get(&sound_id)
            .unwrap_or_else(|| panic!("unknown sound {}", sound_id))
    }
}

fn unavailable(endpoint: String) -> FetchError {
    FetchError::Status {
        endpoint,
        status: 503,
    }
}

#[async_trait]
impl DramaApi for ScriptedApi {
    async fn fetch_drama(&self, drama_id: &str) -> FetchResult<DramaListing> {
        self.dramas
            .get(drama_id)
            .cloned()
            .ok_or_else(|| unavailable(format!("getdrama?drama_id={}", drama_id)))
    }

    async fn fetch_episode_detail(&self, sound_id: u64) -> FetchResult<EpisodeDetail> {
        let scripted = self.episode(sound_id);
        tokio::time::sleep(scripted.delay).await;
        if scripted.detail_panics {
            panic!("scripted panic for sound {}", sound_id);
        }
        self.detail_completions.lock().unwrap().push(sound_id);
        scripted
            .detail
            .clone()
            .ok_or_else(|| unavailable(format!("getsound?soundid={}", sound_id)))
    }

    async fn fetch_danmaku_user_ids(&self, sound_id: u64) -> FetchResult<UserIdSet> {
        let scripted = self.episode(sound_id);
        tokio::time::sleep(scripted.delay).await;
        scripted
            .danmaku
            .as_ref()
            .map(|ids| ids.iter().copied().collect())
            .ok_or_else(|| unavailable(format!("getdm?soundid={}", sound_id)))
    }

    async fn fetch_comment_page(&self, sound_id: u64, page: u32) -> FetchResult<CommentPage> {
        *self
            .comment_requests
            .lock()
            .unwrap()
            .entry(sound_id)
            .or_insert(0) += 1;

        let scripted = self.episode(sound_id);
        tokio::time::sleep(scripted.delay).await;

        if scripted.comment_fail_at == Some(page) {
            return Err(unavailable(format!("getcomment?e_id={}&p={}", sound_id, page)));
        }

        let index = page as usize - 1;
        let user_ids = scripted
            .comment_pages
            .get(index)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        Ok(CommentPage {
            user_ids,
            has_more: index + 1 < scripted.comment_pages.len(),
        })
    }
}
