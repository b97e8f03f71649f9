/// 日志工具模块
///
/// 提供运行过程中的横幅和统计输出
use crate::config::Config;
use crate::models::DramaSummary;
use crate::orchestrator::RunReport;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 猫耳剧集用户统计");
    info!("🌐 接口地址: {}", config.api_base_url);
    match config.max_concurrent_episodes {
        0 => info!("📊 单剧集并发数: 不限制"),
        n => info!("📊 单剧集并发数: {}", n),
    }
    info!("📄 评论分页上限: {} 页", config.max_comment_pages);
    info!("{}", "=".repeat(60));
}

/// 记录剧集开始信息
///
/// # 参数
/// - `index`: 剧集序号（从1开始）
/// - `total`: 剧集总数
/// - `drama_id`: 剧集ID
pub fn log_drama_start(index: usize, total: usize, drama_id: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始处理第 {}/{} 部剧集 (ID: {})", index, total, drama_id);
}

/// 记录剧集完成信息
pub fn log_drama_complete(summary: &DramaSummary) {
    info!(
        "✓ 剧集 {} 完成: 付费 {} 集 / 免费 {} 集, 付费用户 {} / 免费用户 {}",
        summary.drama_id,
        summary.paid_episodes,
        summary.free_episodes,
        summary.paid_total_users,
        summary.free_total_users
    );
    if summary.partial_episodes > 0 {
        info!(
            "⚠️ 剧集 {} 有 {} 集数据不完整",
            summary.drama_id, summary.partial_episodes
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 剧集: {} 部, 单集: {} 集", report.dramas.len(), report.total_episodes());
    info!("❌ 数据不完整的单集: {}", report.partial_episodes());
    info!("👥 所有付费用户ID总数: {}", report.all_paid_user_ids.len());
    info!("{}", "=".repeat(60));
    info!(
        "\n结果已保存至: {} / {}",
        config.sound_csv_path, config.drama_csv_path
    );
}
