//! # Drama Stats
//!
//! 猫耳广播剧的用户统计工具：按剧集统计每一集的弹幕用户、评论用户，
//! 并按付费/免费汇总到两张 CSV 表。
//!
//! ## 架构设计
//!
//! ### ① 接口层（API / Clients）
//! - `api/` - `DramaApi` 抽象、响应解析、评论分页遍历
//! - `clients/` - 基于 reqwest 的 `MissevanClient`
//!
//! ### ② 业务能力层（Services）
//! - `CsvReportWriter` - 写 CSV 能力（`RowSink`）
//!
//! ### ③ 流程层（Workflow）
//! - `process_episode` - "一集"的完整处理流程（详情 + 弹幕 + 评论）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/drama_processor` - 单个剧集：并发处理各集并汇总
//! - `orchestrator/batch_processor` - 多个剧集：顺序处理，输出全局统计

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::DramaApi;
pub use clients::MissevanClient;
pub use config::Config;
pub use error::{AggregationIssue, AppError, AppResult, FetchError, FetchResult};
pub use models::{DramaSummary, EpisodeDescriptor, EpisodeRecord, UserIdSet};
pub use orchestrator::{aggregate_drama, process_drama, App, DramaOptions, DramaOutcome, RunReport};
pub use services::{CsvReportWriter, RowSink};
pub use workflow::{process_episode, EpisodeCtx};
