//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验输入目录、创建客户端、启动探活
//! 2. **惰性扫描**：边遍历目录边切分批次
//! 3. **分批处理**：每批完成（含重试和写出）后再开始下一批
//! 4. **结果写出**：按完成顺序写出每个结果
//! 5. **全局统计**：汇总所有批次的处理结果和吞吐量
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的请求细节
//! - **资源所有者**：唯一持有客户端和工作池的模块
//! - **向下委托**：请求交给 `worker_pool`，落盘交给 `ResultWriter`

use crate::clients::DataseerClient;
use crate::config::Config;
use crate::error::FileError;
use crate::models::ServiceKind;
use crate::orchestrator::worker_pool::{plan_batch, WorkerPool};
use crate::services::file_enumerator::{batches, discover};
use crate::services::output_path::OutputLayout;
use crate::services::result_writer::{ResultWriter, WriteResult};
use crate::utils::logging;
use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 单次运行的参数（来自命令行）
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 目标服务
    pub service: ServiceKind,
    /// 输入根目录
    pub input: PathBuf,
    /// 输出根目录，None 表示写在输入文件旁边
    pub output: Option<PathBuf>,
    /// 最大并发数
    pub concurrency: usize,
    /// 是否覆盖已存在的输出
    pub force: bool,
    /// 是否打印详细信息
    pub verbose: bool,
}

/// 应用主结构
pub struct App {
    config: Config,
    options: RunOptions,
    pool: WorkerPool<DataseerClient>,
    writer: ResultWriter,
}

impl App {
    /// 初始化应用
    ///
    /// 服务连不上时直接返回错误；探活返回非 200 只打印警告。
    pub async fn initialize(config: Config, options: RunOptions) -> Result<Self> {
        if !options.input.is_dir() {
            return Err(FileError::DirectoryNotFound {
                path: options.input.clone(),
            }
            .into());
        }

        logging::log_startup(options.service.endpoint(), options.concurrency, config.batch_size);

        let client = DataseerClient::new(&config)?;
        client
            .check_alive()
            .await
            .context("启动探活失败，终止运行")?;

        let layout = OutputLayout::new(&options.input, options.output.clone());
        let pool = WorkerPool::new(Arc::new(client), options.concurrency);

        Ok(Self {
            config,
            options,
            pool,
            writer: ResultWriter::new(layout),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let started = Instant::now();
        let mut stats = ProcessingStats::default();
        let unit = self.options.service.unit();

        info!("\n📁 正在扫描 {} ...", self.options.input.display());
        logging::log_progress(0, started.elapsed(), unit);

        let files = discover(&self.options.input, self.options.service, self.options.verbose);
        for (idx, batch) in batches(files, self.config.batch_size).enumerate() {
            let batch_result = self.process_batch(idx + 1, batch).await;
            stats.absorb(&batch_result);
            logging::log_progress(stats.dispatched, started.elapsed(), unit);
        }

        if stats.batches == 0 {
            warn!("⚠️ 没有找到待处理的文件，程序结束");
        }

        logging::print_final_stats(
            stats.succeeded,
            stats.failed + stats.write_failed,
            stats.skipped,
            started.elapsed(),
        );

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(&self, batch_num: usize, paths: Vec<PathBuf>) -> BatchResult {
        logging::log_batch_start(batch_num, paths.len());
        if self.options.verbose {
            info!("Dataseer - 本批共 {} 个文件待处理", paths.len());
        }

        let plan = plan_batch(
            paths,
            self.options.service,
            self.writer.layout(),
            self.options.force,
        );
        let mut result = BatchResult {
            skipped: plan.skipped.len(),
            dispatched: plan.tasks.len(),
            ..Default::default()
        };

        // 按完成顺序写出
        let mut pending = self.pool.dispatch(plan.tasks);
        while let Some(outcome) = pending.next().await {
            match self.writer.write(&outcome).await {
                WriteResult::Written(_) => {
                    result.succeeded += 1;
                    result.written += 1;
                }
                WriteResult::ProcessingFailed => result.failed += 1,
                WriteResult::WriteFailed(_) => {
                    result.succeeded += 1;
                    result.write_failed += 1;
                }
            }
        }

        logging::log_batch_complete(batch_num, result.written, result.dispatched + result.skipped);
        result
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    /// 处理过的批次数
    pub batches: usize,
    /// 实际提交给服务的文件数
    pub dispatched: usize,
    /// 服务成功返回结果的文件数（无论是否写出）
    pub succeeded: usize,
    /// 成功写出的文件数
    pub written: usize,
    /// 处理失败的文件数
    pub failed: usize,
    /// 写入失败的文件数
    pub write_failed: usize,
    /// 因输出已存在而跳过的文件数
    pub skipped: usize,
}

impl ProcessingStats {
    fn absorb(&mut self, batch: &BatchResult) {
        self.batches += 1;
        self.dispatched += batch.dispatched;
        self.succeeded += batch.succeeded;
        self.written += batch.written;
        self.failed += batch.failed;
        self.write_failed += batch.write_failed;
        self.skipped += batch.skipped;
    }
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    dispatched: usize,
    succeeded: usize,
    written: usize,
    failed: usize,
    write_failed: usize,
    skipped: usize,
}
