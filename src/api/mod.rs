//! API 模块
//!
//! 负责所有与猫耳接口的交互。`DramaApi` 是网络层的唯一抽象，
//! 生产实现见 [`crate::clients::MissevanClient`]。

pub mod comments;
pub mod missevan;

use crate::error::FetchResult;
use crate::models::{CommentPage, DramaListing, EpisodeDetail, UserIdSet};
use async_trait::async_trait;

pub use comments::collect_comment_user_ids;
pub use missevan::COMMENT_PAGE_SIZE;

/// 猫耳接口能力
///
/// 每个方法只发起一次请求，不重试；失败原样返回，由调用方决定是否降级。
#[async_trait]
pub trait DramaApi: Send + Sync {
    /// 剧集信息和单集列表
    async fn fetch_drama(&self, drama_id: &str) -> FetchResult<DramaListing>;

    /// 单集详情
    async fn fetch_episode_detail(&self, sound_id: u64) -> FetchResult<EpisodeDetail>;

    /// 弹幕用户ID（不含系统弹幕）
    async fn fetch_danmaku_user_ids(&self, sound_id: u64) -> FetchResult<UserIdSet>;

    /// 评论的第 `page` 页（从 1 开始）
    async fn fetch_comment_page(&self, sound_id: u64, page: u32) -> FetchResult<CommentPage>;
}
