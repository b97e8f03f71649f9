//! 单集处理流程 - 流程层
//!
//! 核心职责：定义"一集"的完整处理流程
//!
//! 1. 并发请求：详情 / 弹幕用户 / 评论用户（分页）
//! 2. 任一请求失败 → 该部分取默认值，记录标记为 partial
//! 3. 合并为 `EpisodeRecord`

use crate::api::{collect_comment_user_ids, DramaApi};
use crate::error::FetchResult;
use crate::models::{EpisodeDescriptor, EpisodeRecord};
use crate::workflow::episode_ctx::EpisodeCtx;
use tracing::{debug, warn};

/// 处理单集
///
/// 三个请求之间没有数据依赖，用 `tokio::join!` 同时发出。
/// 失败不会向上传播：评论分页失败只丢弃评论用户，详情和弹幕照常保留。
pub async fn process_episode<A>(
    api: &A,
    descriptor: EpisodeDescriptor,
    ctx: &EpisodeCtx,
    max_comment_pages: u32,
) -> EpisodeRecord
where
    A: DramaApi + ?Sized,
{
    let sound_id = descriptor.sound_id;
    debug!("{} 开始处理: {}", ctx, descriptor.title);

    let (detail, danmaku, comments) = tokio::join!(
        api.fetch_episode_detail(sound_id),
        api.fetch_danmaku_user_ids(sound_id),
        collect_comment_user_ids(api, sound_id, max_comment_pages),
    );

    let mut partial = false;
    let detail = or_default(detail, ctx, "详情", &mut partial);
    let danmaku_user_ids = or_default(danmaku, ctx, "弹幕", &mut partial);
    let comment_user_ids = or_default(comments, ctx, "评论", &mut partial);

    let record = EpisodeRecord::assemble(
        descriptor,
        detail,
        danmaku_user_ids,
        comment_user_ids,
        partial,
    );

    debug!(
        "{} ✓ 完成: 弹幕 {} / 评论 {} / 合计 {}",
        ctx,
        record.danmaku_user_ids.len(),
        record.comment_user_ids.len(),
        record.all_user_ids.len()
    );

    record
}

/// 失败时记录日志并返回默认值
fn or_default<T: Default>(
    result: FetchResult<T>,
    ctx: &EpisodeCtx,
    what: &str,
    partial: &mut bool,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} ⚠️ 获取{}失败: {}", ctx, what, e);
            *partial = true;
            T::default()
        }
    }
}
