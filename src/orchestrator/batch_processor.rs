//! 批量剧集处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责剧集ID的获取、输出文件和全局统计。
//!
//! 1. **应用初始化**：创建 HTTP 客户端
//! 2. **读取输入**：配置中的剧集ID，为空时从标准输入读取
//! 3. **顺序处理**：剧集之间不并发，逐个委托 drama_processor
//! 4. **全局统计**：累计所有剧集付费部分的用户并集

use crate::api::DramaApi;
use crate::clients::MissevanClient;
use crate::config::{parse_drama_ids, Config};
use crate::models::UserIdSet;
use crate::orchestrator::drama_processor::{self, DramaOptions, DramaOutcome};
use crate::services::{CsvReportWriter, RowSink};
use crate::utils::logging;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

/// 一次运行的结果
#[derive(Debug, Default)]
pub struct RunReport {
    /// 按输入顺序排列的各剧集结果
    pub dramas: Vec<DramaOutcome>,
    /// 所有剧集付费部分的用户并集
    pub all_paid_user_ids: UserIdSet,
}

impl RunReport {
    pub fn total_episodes(&self) -> usize {
        self.dramas.iter().map(|d| d.episodes.len()).sum()
    }

    pub fn partial_episodes(&self) -> usize {
        self.dramas.iter().map(|d| d.summary.partial_episodes).sum()
    }
}

/// 应用主结构
pub struct App<A: DramaApi + 'static> {
    config: Config,
    api: Arc<A>,
}

impl App<MissevanClient> {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let client = MissevanClient::new(&config).context("无法创建 HTTP 客户端")?;
        Ok(Self::with_api(config, Arc::new(client)))
    }
}

impl<A: DramaApi + 'static> App<A> {
    pub fn with_api(config: Config, api: Arc<A>) -> Self {
        Self { config, api }
    }

    /// 运行应用主逻辑：读取剧集ID，写入两个 CSV 文件
    pub async fn run(&self) -> Result<RunReport> {
        logging::log_startup(&self.config);

        let drama_ids = if self.config.drama_ids.is_empty() {
            prompt_drama_ids().await?
        } else {
            self.config.drama_ids.clone()
        };

        if drama_ids.is_empty() {
            warn!("⚠️ 没有输入剧集ID，程序结束");
            return Ok(RunReport::default());
        }

        let mut writer =
            CsvReportWriter::create(&self.config.sound_csv_path, &self.config.drama_csv_path)
                .with_context(|| {
                    format!(
                        "无法创建输出文件: {} / {}",
                        self.config.sound_csv_path, self.config.drama_csv_path
                    )
                })?;

        let report = self.run_with_sink(&drama_ids, &mut writer).await?;

        logging::print_final_stats(&report, &self.config);
        Ok(report)
    }

    /// 逐个处理剧集，行写入 `sink`
    pub async fn run_with_sink<S>(&self, drama_ids: &[String], sink: &mut S) -> Result<RunReport>
    where
        S: RowSink + ?Sized,
    {
        let options = DramaOptions::from(&self.config);
        let mut report = RunReport::default();

        for (index, drama_id) in drama_ids.iter().enumerate() {
            logging::log_drama_start(index + 1, drama_ids.len(), drama_id);

            let outcome =
                drama_processor::process_drama(Arc::clone(&self.api), drama_id, options, sink)
                    .await
                    .with_context(|| format!("写入剧集 {} 的结果失败", drama_id))?;

            logging::log_drama_complete(&outcome.summary);

            report
                .all_paid_user_ids
                .extend(outcome.paid_user_ids.iter().copied());
            report.dramas.push(outcome);
        }

        sink.flush().context("刷新输出文件失败")?;
        Ok(report)
    }
}

/// 从标准输入读取逗号分隔的剧集ID
async fn prompt_drama_ids() -> Result<Vec<String>> {
    let line = tokio::task::spawn_blocking(|| -> std::io::Result<String> {
        print!("请输入剧集ID（用逗号分隔，例如 62452,68690,72732）: ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line)
    })
    .await
    .context("读取输入的任务异常退出")?
    .context("读取标准输入失败")?;

    Ok(parse_drama_ids(&line))
}
