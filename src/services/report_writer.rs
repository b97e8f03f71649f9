//! 报表写入服务 - 业务能力层
//!
//! 只负责"写 CSV"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::models::{DramaSummary, EpisodeRecord};
use chrono::{DateTime, Local, Utc};
use std::fs::File;
use std::io::Write;
use tracing::debug;

/// 单集表表头
pub const SOUND_HEADERS: [&str; 6] = [
    "声音标题",
    "创建时间",
    "是否需要付费",
    "弹幕用户ID",
    "评论用户ID",
    "总用户ID",
];

/// 剧集表表头
pub const DRAMA_HEADERS: [&str; 13] = [
    "剧集ID",
    "剧集名称",
    "首个声音创建时间",
    "价格",
    "总观看次数",
    "付费观看次数",
    "免费观看次数",
    "付费弹幕用户ID",
    "付费评论用户ID",
    "免费弹幕用户ID",
    "免费评论用户ID",
    "付费总用户ID",
    "免费总用户ID",
];

/// 行输出目标
///
/// 单集行和剧集行分别写入两个表。
pub trait RowSink {
    fn write_episode(&mut self, record: &EpisodeRecord) -> AppResult<()>;
    fn write_drama(&mut self, summary: &DramaSummary) -> AppResult<()>;
    fn flush(&mut self) -> AppResult<()>;
}

/// CSV 报表写入服务
///
/// 创建时即写入两张表的表头。
pub struct CsvReportWriter<W: Write> {
    sound_writer: csv::Writer<W>,
    drama_writer: csv::Writer<W>,
}

impl CsvReportWriter<File> {
    /// 创建（覆盖）两个输出文件
    pub fn create(sound_path: &str, drama_path: &str) -> AppResult<Self> {
        let sound_file = File::create(sound_path)?;
        let drama_file = File::create(drama_path)?;
        Self::new(sound_file, drama_file)
    }
}

impl<W: Write> CsvReportWriter<W> {
    pub fn new(sound_out: W, drama_out: W) -> AppResult<Self> {
        let mut sound_writer = csv::Writer::from_writer(sound_out);
        let mut drama_writer = csv::Writer::from_writer(drama_out);
        sound_writer.write_record(SOUND_HEADERS)?;
        drama_writer.write_record(DRAMA_HEADERS)?;

        Ok(Self {
            sound_writer,
            drama_writer,
        })
    }

    /// 刷新并取回底层输出（单集表, 剧集表）
    pub fn into_inner(self) -> AppResult<(W, W)> {
        let sound = self
            .sound_writer
            .into_inner()
            .map_err(|e| AppError::Io(e.into_error()))?;
        let drama = self
            .drama_writer
            .into_inner()
            .map_err(|e| AppError::Io(e.into_error()))?;
        Ok((sound, drama))
    }
}

impl<W: Write> RowSink for CsvReportWriter<W> {
    fn write_episode(&mut self, record: &EpisodeRecord) -> AppResult<()> {
        debug!("写入单集行: {}", record.sound_id);

        self.sound_writer.write_record([
            record.title.clone(),
            format_create_time(record.create_time),
            u8::from(record.paid).to_string(),
            record.danmaku_user_ids.len().to_string(),
            record.comment_user_ids.len().to_string(),
            record.all_user_ids.len().to_string(),
        ])?;
        Ok(())
    }

    fn write_drama(&mut self, summary: &DramaSummary) -> AppResult<()> {
        debug!("写入剧集行: {}", summary.drama_id);

        self.drama_writer.write_record([
            summary.drama_id.clone(),
            summary.name.clone().unwrap_or_default(),
            format_create_time(summary.earliest_create_time),
            optional(summary.price),
            optional(summary.view_count),
            summary.paid_view_count.to_string(),
            summary.free_view_count.to_string(),
            summary.paid_danmaku_users.to_string(),
            summary.paid_comment_users.to_string(),
            summary.free_danmaku_users.to_string(),
            summary.free_comment_users.to_string(),
            summary.paid_total_users.to_string(),
            summary.free_total_users.to_string(),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        self.sound_writer.flush()?;
        self.drama_writer.flush()?;
        Ok(())
    }
}

/// 本地时间 `%Y-%m-%d %H:%M:%S`，缺失时为空
pub fn format_create_time(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}

fn optional(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
