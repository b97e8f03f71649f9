//! 剧集 / 声音领域模型

use std::collections::BTreeSet;

/// 用户ID集合
pub type UserIdSet = BTreeSet<u64>;

/// 剧集列表中的单集描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeDescriptor {
    pub sound_id: u64,
    pub title: String,
    /// 是否付费（`need_pay > 0`）
    pub paid: bool,
}

/// 剧集列表接口的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DramaListing {
    pub episodes: Vec<EpisodeDescriptor>,
    pub name: Option<String>,
    pub price: Option<u64>,
    pub view_count: Option<u64>,
    pub catalog_name: Option<String>,
}

/// 单集详情
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeDetail {
    pub view_count: Option<u64>,
    pub view_count_formatted: Option<String>,
    pub comment_count: Option<u64>,
    pub favorite_count: Option<u64>,
    pub username: Option<String>,
    /// Unix 时间戳（秒）
    pub create_time: Option<i64>,
}

/// 评论接口的一页
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub user_ids: UserIdSet,
    pub has_more: bool,
}

/// 单集统计结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub sound_id: u64,
    pub title: String,
    pub paid: bool,
    pub create_time: Option<i64>,
    pub view_count: u64,
    pub view_count_formatted: Option<String>,
    pub comment_count: Option<u64>,
    pub favorite_count: Option<u64>,
    pub username: Option<String>,
    /// 弹幕用户
    pub danmaku_user_ids: UserIdSet,
    /// 评论用户（含楼中楼回复）
    pub comment_user_ids: UserIdSet,
    /// 弹幕用户 ∪ 评论用户
    pub all_user_ids: UserIdSet,
    /// 有子请求失败，部分字段为默认值
    pub partial: bool,
}

impl EpisodeRecord {
    /// 合并单集描述、详情和两类用户集合
    pub fn assemble(
        descriptor: EpisodeDescriptor,
        detail: EpisodeDetail,
        danmaku_user_ids: UserIdSet,
        comment_user_ids: UserIdSet,
        partial: bool,
    ) -> Self {
        let all_user_ids = danmaku_user_ids.union(&comment_user_ids).copied().collect();
        Self {
            sound_id: descriptor.sound_id,
            title: descriptor.title,
            paid: descriptor.paid,
            create_time: detail.create_time,
            view_count: detail.view_count.unwrap_or(0),
            view_count_formatted: detail.view_count_formatted,
            comment_count: detail.comment_count,
            favorite_count: detail.favorite_count,
            username: detail.username,
            danmaku_user_ids,
            comment_user_ids,
            all_user_ids,
            partial,
        }
    }

    /// 处理任务异常时的降级记录
    pub fn degraded(descriptor: EpisodeDescriptor) -> Self {
        Self::assemble(
            descriptor,
            EpisodeDetail::default(),
            UserIdSet::new(),
            UserIdSet::new(),
            true,
        )
    }
}

/// 剧集汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DramaSummary {
    pub drama_id: String,
    pub name: Option<String>,
    pub catalog_name: Option<String>,
    /// 所有声音中最早的创建时间
    pub earliest_create_time: Option<i64>,
    pub price: Option<u64>,
    /// 剧集接口给出的总播放量，与分集之和不一定相等
    pub view_count: Option<u64>,
    pub paid_view_count: u64,
    pub free_view_count: u64,
    pub paid_danmaku_users: usize,
    pub paid_comment_users: usize,
    pub free_danmaku_users: usize,
    pub free_comment_users: usize,
    pub paid_total_users: usize,
    pub free_total_users: usize,
    pub paid_episodes: usize,
    pub free_episodes: usize,
    pub partial_episodes: usize,
}
