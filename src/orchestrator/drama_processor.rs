//! 单个剧集处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **获取单集列表**：列表请求失败时按空剧集处理，不中断整次运行
//! 2. **并发调度**：每集一个 tokio 任务，用 Semaphore 限制同时处理的集数
//! 3. **汇总**：任务把结果发到 mpsc 通道，由唯一的消费者按付费/免费分别累计
//! 4. **排序输出**：全部完成后按声音ID升序，再写单集行和剧集行
//!
//! 汇总状态只属于消费者，任务之间不共享可变数据。

use crate::api::DramaApi;
use crate::config::Config;
use crate::error::{AggregationIssue, AppResult};
use crate::models::{DramaListing, DramaSummary, EpisodeDescriptor, EpisodeRecord, UserIdSet};
use crate::services::RowSink;
use crate::workflow::{process_episode, EpisodeCtx};
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tracing::{error, info, warn};

/// 剧集处理参数
#[derive(Debug, Clone, Copy)]
pub struct DramaOptions {
    /// 同时处理的集数，0 表示不限制
    pub max_concurrent_episodes: usize,
    /// 评论分页上限
    pub max_comment_pages: u32,
}

impl From<&Config> for DramaOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrent_episodes: config.max_concurrent_episodes,
            max_comment_pages: config.max_comment_pages,
        }
    }
}

impl DramaOptions {
    fn permits(&self) -> usize {
        match self.max_concurrent_episodes {
            0 => Semaphore::MAX_PERMITS,
            n => n,
        }
    }
}

/// 单个剧集的处理结果
#[derive(Debug, Clone)]
pub struct DramaOutcome {
    /// 按声音ID升序
    pub episodes: Vec<EpisodeRecord>,
    pub summary: DramaSummary,
    /// 付费集的用户并集
    pub paid_user_ids: UserIdSet,
    pub issues: Vec<AggregationIssue>,
}

/// 付费或免费部分的累计值
#[derive(Debug, Default)]
struct PartitionTotals {
    episodes: usize,
    view_count: u64,
    danmaku_user_ids: UserIdSet,
    comment_user_ids: UserIdSet,
    all_user_ids: UserIdSet,
}

impl PartitionTotals {
    fn absorb(&mut self, record: &EpisodeRecord) {
        self.episodes += 1;
        self.view_count += record.view_count;
        self.danmaku_user_ids
            .extend(record.danmaku_user_ids.iter().copied());
        self.comment_user_ids
            .extend(record.comment_user_ids.iter().copied());
        self.all_user_ids.extend(record.all_user_ids.iter().copied());
    }
}

/// 剧集汇总器
///
/// 每收到一集调用一次 [`DramaAccumulator::absorb`]，全部完成后 [`DramaAccumulator::finish`]。
#[derive(Debug)]
pub struct DramaAccumulator {
    drama_id: String,
    paid: PartitionTotals,
    free: PartitionTotals,
    earliest_create_time: Option<i64>,
    partial_episodes: usize,
    episodes: Vec<EpisodeRecord>,
    issues: Vec<AggregationIssue>,
}

impl DramaAccumulator {
    pub fn new(drama_id: impl Into<String>) -> Self {
        Self {
            drama_id: drama_id.into(),
            paid: PartitionTotals::default(),
            free: PartitionTotals::default(),
            earliest_create_time: None,
            partial_episodes: 0,
            episodes: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn absorb(&mut self, record: EpisodeRecord) {
        if record.paid {
            self.paid.absorb(&record);
        } else {
            self.free.absorb(&record);
        }

        match record.create_time {
            Some(t) => {
                self.earliest_create_time =
                    Some(self.earliest_create_time.map_or(t, |earliest| earliest.min(t)));
            }
            None => self.issues.push(AggregationIssue::MissingCreateTime {
                drama_id: self.drama_id.clone(),
                sound_id: record.sound_id,
            }),
        }

        if record.partial {
            self.partial_episodes += 1;
        }
        self.episodes.push(record);
    }

    pub fn record_issue(&mut self, issue: AggregationIssue) {
        self.issues.push(issue);
    }

    /// 排序单集并生成剧集汇总
    pub fn finish(mut self, listing: &DramaListing) -> DramaOutcome {
        self.episodes.sort_by_key(|record| record.sound_id);

        let summary = DramaSummary {
            drama_id: self.drama_id,
            name: listing.name.clone(),
            catalog_name: listing.catalog_name.clone(),
            earliest_create_time: self.earliest_create_time,
            price: listing.price,
            view_count: listing.view_count,
            paid_view_count: self.paid.view_count,
            free_view_count: self.free.view_count,
            paid_danmaku_users: self.paid.danmaku_user_ids.len(),
            paid_comment_users: self.paid.comment_user_ids.len(),
            free_danmaku_users: self.free.danmaku_user_ids.len(),
            free_comment_users: self.free.comment_user_ids.len(),
            paid_total_users: self.paid.all_user_ids.len(),
            free_total_users: self.free.all_user_ids.len(),
            paid_episodes: self.paid.episodes,
            free_episodes: self.free.episodes,
            partial_episodes: self.partial_episodes,
        };

        DramaOutcome {
            episodes: self.episodes,
            summary,
            paid_user_ids: self.paid.all_user_ids,
            issues: self.issues,
        }
    }
}

/// 汇总单个剧集（不写输出）
pub async fn aggregate_drama<A>(api: Arc<A>, drama_id: &str, options: DramaOptions) -> DramaOutcome
where
    A: DramaApi + 'static,
{
    let listing = match api.fetch_drama(drama_id).await {
        Ok(listing) => listing,
        Err(e) => {
            error!("[剧集 {}] ❌ 获取单集列表失败: {}", drama_id, e);
            DramaListing::default()
        }
    };

    let mut accumulator = DramaAccumulator::new(drama_id);

    if listing.episodes.is_empty() {
        warn!("[剧集 {}] ⚠️ 没有可处理的单集", drama_id);
        return accumulator.finish(&listing);
    }

    info!(
        "[剧集 {}] 《{}》共 {} 集",
        drama_id,
        listing.name.as_deref().unwrap_or(""),
        listing.episodes.len()
    );

    let semaphore = Arc::new(Semaphore::new(options.permits()));
    let (tx, mut rx) = mpsc::channel::<EpisodeRecord>(listing.episodes.len());
    let mut handles = Vec::with_capacity(listing.episodes.len());

    for descriptor in listing.episodes.iter().cloned() {
        let Some(permit) = acquire_slot(&semaphore, drama_id, descriptor.sound_id).await else {
            skip_episode(&mut accumulator, drama_id, descriptor);
            continue;
        };
        let api = Arc::clone(&api);
        let tx = tx.clone();
        let ctx = EpisodeCtx::new(drama_id, descriptor.sound_id);
        let fallback = descriptor.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let record =
                process_episode(api.as_ref(), descriptor, &ctx, options.max_comment_pages).await;
            if tx.send(record).await.is_err() {
                error!("{} 汇总通道已关闭", ctx);
            }
        });
        handles.push((fallback, handle));
    }
    drop(tx);

    // 唯一的消费者：按完成顺序逐条累计
    while let Some(record) = rx.recv().await {
        accumulator.absorb(record);
    }

    for (descriptor, handle) in handles {
        if let Err(e) = handle.await {
            error!(
                "[剧集 {}] 声音 {} 任务执行失败: {}",
                drama_id, descriptor.sound_id, e
            );
            skip_episode(&mut accumulator, drama_id, descriptor);
        }
    }

    let outcome = accumulator.finish(&listing);
    for issue in &outcome.issues {
        warn!("⚠️ {}", issue);
    }
    outcome
}

/// 取得一个并发名额；信号量已关闭时返回 `None`
async fn acquire_slot(
    semaphore: &Arc<Semaphore>,
    drama_id: &str,
    sound_id: u64,
) -> Option<OwnedSemaphorePermit> {
    match Arc::clone(semaphore).acquire_owned().await {
        Ok(permit) => Some(permit),
        Err(e) => {
            error!("[剧集 {}] 声音 {} 无法获取并发名额: {}", drama_id, sound_id, e);
            None
        }
    }
}

/// 未能正常处理的单集：记一条问题并按降级记录计入
fn skip_episode(accumulator: &mut DramaAccumulator, drama_id: &str, descriptor: EpisodeDescriptor) {
    accumulator.record_issue(AggregationIssue::TaskAborted {
        drama_id: drama_id.to_string(),
        sound_id: descriptor.sound_id,
    });
    accumulator.absorb(EpisodeRecord::degraded(descriptor));
}

/// 处理单个剧集：汇总后按声音ID顺序写单集行，再写一行剧集汇总
pub async fn process_drama<A, S>(
    api: Arc<A>,
    drama_id: &str,
    options: DramaOptions,
    sink: &mut S,
) -> AppResult<DramaOutcome>
where
    A: DramaApi + 'static,
    S: RowSink + ?Sized,
{
    let outcome = aggregate_drama(api, drama_id, options).await;

    for record in &outcome.episodes {
        sink.write_episode(record)?;
    }
    sink.write_drama(&outcome.summary)?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EpisodeDetail;

    fn record(
        sound_id: u64,
        paid: bool,
        views: u64,
        create_time: Option<i64>,
        danmaku: &[u64],
        comments: &[u64],
    ) -> EpisodeRecord {
        EpisodeRecord::assemble(
            EpisodeDescriptor {
                sound_id,
                title: format!("第{}集", sound_id),
                paid,
            },
            EpisodeDetail {
                view_count: Some(views),
                create_time,
                ..Default::default()
            },
            danmaku.iter().copied().collect(),
            comments.iter().copied().collect(),
            false,
        )
    }

    #[test]
    fn partitions_by_paid_flag() {
        let mut acc = DramaAccumulator::new("1");
        acc.absorb(record(2, true, 5, Some(200), &[4], &[]));
        acc.absorb(record(1, false, 10, Some(300), &[1, 2], &[2, 3]));

        let outcome = acc.finish(&DramaListing {
            name: Some("剧".to_string()),
            view_count: Some(999),
            ..Default::default()
        });
        let s = &outcome.summary;

        assert_eq!(s.free_view_count, 10);
        assert_eq!(s.paid_view_count, 5);
        assert_eq!(s.free_total_users, 3);
        assert_eq!(s.paid_total_users, 1);
        assert_eq!(s.free_danmaku_users, 2);
        assert_eq!(s.free_comment_users, 2);
        assert_eq!(s.view_count, Some(999));
        assert_eq!(s.earliest_create_time, Some(200));
        assert_eq!((s.paid_episodes, s.free_episodes), (1, 1));
        assert_eq!(outcome.paid_user_ids, [4].into_iter().collect());
        assert_eq!(
            outcome.episodes.iter().map(|r| r.sound_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn missing_create_time_is_excluded_and_reported() {
        let mut acc = DramaAccumulator::new("7");
        acc.absorb(record(1, false, 1, None, &[], &[]));
        acc.absorb(record(2, false, 1, Some(1_500_000_000), &[], &[]));

        let outcome = acc.finish(&DramaListing::default());

        assert_eq!(outcome.summary.earliest_create_time, Some(1_500_000_000));
        assert_eq!(
            outcome.issues,
            vec![AggregationIssue::MissingCreateTime {
                drama_id: "7".to_string(),
                sound_id: 1
            }]
        );
    }

    #[test]
    fn empty_drama_has_zero_summary() {
        let outcome = DramaAccumulator::new("3").finish(&DramaListing::default());
        assert!(outcome.episodes.is_empty());
        assert_eq!(outcome.summary.drama_id, "3");
        assert_eq!(outcome.summary.earliest_create_time, None);
        assert_eq!(outcome.summary.paid_view_count + outcome.summary.free_view_count, 0);
    }

    #[tokio::test]
    async fn closed_semaphore_yields_no_slot() {
        let semaphore = Arc::new(Semaphore::new(1));
        assert!(acquire_slot(&semaphore, "1", 1).await.is_some());

        semaphore.close();
        assert!(acquire_slot(&semaphore, "1", 2).await.is_none());
    }

    #[test]
    fn skipped_episode_is_counted_as_degraded() {
        let mut acc = DramaAccumulator::new("8");
        skip_episode(
            &mut acc,
            "8",
            EpisodeDescriptor {
                sound_id: 3,
                title: "断".to_string(),
                paid: true,
            },
        );

        let outcome = acc.finish(&DramaListing::default());

        assert_eq!(outcome.summary.paid_episodes, 1);
        assert_eq!(outcome.summary.partial_episodes, 1);
        assert_eq!(
            outcome.issues[0],
            AggregationIssue::TaskAborted {
                drama_id: "8".to_string(),
                sound_id: 3
            }
        );
    }

    #[test]
    fn unbounded_option_uses_max_permits() {
        let options = DramaOptions {
            max_concurrent_episodes: 0,
            max_comment_pages: 1,
        };
        assert_eq!(options.permits(), Semaphore::MAX_PERMITS);
    }
}
