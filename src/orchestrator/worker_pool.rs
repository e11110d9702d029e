//! 批次工作池 - 编排层
//!
//! ## 职责
//!
//! 1. **跳过规则**：输出已存在且未指定 `--force` 的文件不分派
//! 2. **并发控制**：使用 Semaphore 限制同时在途的请求数
//! 3. **结果收集**：按完成先后顺序产出 `Outcome`，每个分派的任务恰好一个
//!
//! 单个任务的失败（包括工作任务 panic）只影响它自己，不会中断同批的其他任务。

use crate::models::{FailureKind, Outcome, ServiceKind, Task};
use crate::services::output_path::OutputLayout;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// 处理单个文档的能力
///
/// 生产环境由 [`crate::clients::DataseerClient`] 实现。
pub trait DocumentProcessor: Send + Sync + 'static {
    /// 处理一个任务，总是返回一个结果
    fn process(&self, task: Task) -> impl Future<Output = Outcome> + Send;
}

/// 一批文件的分派计划
#[derive(Debug, Default)]
pub struct BatchPlan {
    /// 需要提交的任务
    pub tasks: Vec<Task>,
    /// 因输出已存在而跳过的输入文件
    pub skipped: Vec<PathBuf>,
}

/// 根据跳过规则生成分派计划
///
/// # 参数
/// - `paths`: 本批输入文件
/// - `kind`: 目标服务
/// - `layout`: 输出布局（用于推导输出路径）
/// - `force`: 为 true 时即使输出已存在也重新处理
pub fn plan_batch(
    paths: Vec<PathBuf>,
    kind: ServiceKind,
    layout: &OutputLayout,
    force: bool,
) -> BatchPlan {
    let mut plan = BatchPlan::default();

    for path in paths {
        let target = layout.output_path(&path);
        if !force && target.is_file() {
            info!(
                "⏭️ Dataseer - {} 已存在, 跳过... (使用 --force 重新处理)",
                target.display()
            );
            plan.skipped.push(path);
            continue;
        }
        plan.tasks.push(Task::new(path, kind));
    }

    plan
}

/// 批次工作池
pub struct WorkerPool<P> {
    processor: Arc<P>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl<P: DocumentProcessor> WorkerPool<P> {
    /// 创建工作池
    ///
    /// # 参数
    /// - `processor`: 文档处理能力
    /// - `concurrency`: 最大在途请求数（至少为 1）
    pub fn new(processor: Arc<P>, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            processor,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 分派一批任务，返回按完成顺序产出结果的流
    pub fn dispatch(&self, tasks: Vec<Task>) -> FuturesUnordered<impl Future<Output = Outcome>> {
        let pending = FuturesUnordered::new();

        for task in tasks {
            let path = task.path().to_path_buf();
            let processor = Arc::clone(&self.processor);
            let semaphore = Arc::clone(&self.semaphore);

            let handle = tokio::spawn(async move {
                // Semaphore 不会被关闭，acquire 失败时直接执行
                let _permit = semaphore.acquire_owned().await.ok();
                processor.process(task).await
            });

            pending.push(async move {
                match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!("❌ {} 任务执行失败: {}", path.display(), e);
                        Outcome::failed(path, FailureKind::WorkerAborted)
                    }
                }
            });
        }

        pending
    }

    /// 分派一批任务并等待全部完成
    pub async fn run_batch(&self, tasks: Vec<Task>) -> Vec<Outcome> {
        self.dispatch(tasks).collect().await
    }
}
