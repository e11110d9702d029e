/// 日志工具模块
///
/// 提供日志初始化和面向操作者的进度输出
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 verbose 模式为 debug，默认 info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `service`: 目标服务端点
/// - `concurrency`: 最大并发数
/// - `batch_size`: 每批文件数
pub fn log_startup(service: &str, concurrency: usize, batch_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Dataseer 批量处理模式");
    info!("🎯 目标服务: {}", service);
    info!("📊 最大并发数: {}", concurrency);
    info!("📋 每批文件数: {}", batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `size`: 本批文件数
pub fn log_batch_start(batch_num: usize, size: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {} 批, 本批共 {} 个文件", batch_num, size);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `success`: 成功写出的数量
/// - `total`: 本批文件数
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 记录累计吞吐量
///
/// # 参数
/// - `total`: 累计处理的文档数
/// - `elapsed`: 累计耗时
/// - `unit`: 文档单位（PDF / TEI）
pub fn log_progress(total: usize, elapsed: Duration, unit: &str) {
    info!(
        "📈 Dataseer - 累计处理: {} - 累计耗时: {:.3}s - {:.2} {}/s",
        total,
        elapsed.as_secs_f64(),
        throughput(total, elapsed),
        unit
    );
}

/// 打印最终统计信息
///
/// # 参数
/// - `succeeded`: 服务成功返回结果的数量
/// - `failed`: 失败数量（请求失败 + 写入失败）
/// - `skipped`: 因输出已存在而跳过的数量
/// - `elapsed`: 总耗时
pub fn print_final_stats(succeeded: usize, failed: usize, skipped: usize, elapsed: Duration) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}", succeeded);
    info!("❌ 失败: {}", failed);
    info!("⏭️ 跳过: {}", skipped);
    info!("⏱️ 总耗时: {:.3}s", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
}

/// 每秒处理的文档数
pub fn throughput(total: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        total as f64 / secs
    } else {
        0.0
    }
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
