//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量剧集处理器
//! - 读取剧集ID，创建输出文件
//! - 剧集之间顺序处理
//! - 累计全局付费用户集合，输出统计
//!
//! ### `drama_processor` - 单个剧集处理器
//! - 获取单集列表，并发处理每一集（Semaphore 限流）
//! - 通过 mpsc 通道汇总，按付费/免费分别统计
//! - 按声音ID排序后输出
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<剧集ID>)
//!     ↓
//! drama_processor (处理 Vec<EpisodeDescriptor>)
//!     ↓
//! workflow::process_episode (处理单集)
//!     ↓
//! api::DramaApi (详情 / 弹幕 / 评论分页)
//! ```

pub mod batch_processor;
pub mod drama_processor;

pub use batch_processor::{App, RunReport};
pub use drama_processor::{aggregate_drama, process_drama, DramaAccumulator, DramaOptions, DramaOutcome};
