//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、探活、运行）
//! - 惰性扫描输入目录并切分批次
//! - 批次之间串行，前一批完全结束才开始下一批
//! - 输出吞吐量和全局统计信息
//!
//! ### `worker_pool` - 批次工作池
//! - 执行跳过规则
//! - 控制并发数量（Semaphore）
//! - 按完成顺序产出每个任务的结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Batch>)
//!     ↓
//! worker_pool (处理 Vec<Task>)
//!     ↓
//! clients::DataseerClient (处理单个 Task)
//!     ↓
//! services (能力层：扫描 / 输出路径 / 写出)
//! ```

pub mod batch_processor;
pub mod worker_pool;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats, RunOptions};
pub use worker_pool::{plan_batch, BatchPlan, DocumentProcessor, WorkerPool};
