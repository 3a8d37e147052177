/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::batch::BatchResult;
use crate::services::DeliveryReport;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则 `debug` 为真时输出 debug 级别，默认 info。
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量图片生成");
    info!("🎨 默认风格: {}", config.default_style);
    info!("📐 默认尺寸: {}", config.default_size);
    info!("📂 输出目录: {}", config.output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录表格加载信息
pub fn log_table_loaded(total: usize) {
    info!("✓ 已加载 {} 条提示词", total);
}

/// 打印最终统计信息
///
/// 每个失败的行单独输出一行，方便定位。
pub fn print_final_stats(result: &BatchResult, output_dir: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", result.success_count(), result.total);
    info!("❌ 失败: {}", result.failure_count());
    for failure in &result.failures {
        error!(
            "   第 {} 行 [{}] {}: {}",
            failure.index,
            truncate_text(&failure.prompt, 40),
            failure.stage,
            failure.reason
        );
    }
    info!("{}", "=".repeat(60));
    info!("\n图片已保存至: {}", output_dir);
}

/// 打印邮件发送统计
pub fn print_delivery_stats(report: &DeliveryReport) {
    info!("\n{}", "─".repeat(60));
    info!(
        "📧 邮件发送: 成功 {}/{}",
        report.success_count(),
        report.outcomes.len()
    );
    for (recipient, err) in report.failures() {
        error!("   {}: {}", recipient, err);
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_text("一只红色的狐狸", 3), "一只红...");
    }
}
