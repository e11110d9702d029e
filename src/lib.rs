//! # Dataseer Client
//!
//! 一个批量调用 Dataseer 服务的 Rust 客户端：递归扫描目录中的 PDF / TEI XML 文档，
//! 分批并发提交给远端服务，并把返回的 TEI XML 写回磁盘。
//!
//! ## 架构设计
//!
//! ### ① 模型层（Models）
//! - `models/` - `ServiceKind`、`Task`、`Outcome`
//!
//! ### ② 客户端层（Clients）
//! - `DataseerClient` - 启动探活、multipart 提交、过载（503）重试
//!
//! ### ③ 业务能力层（Services）
//! - `file_enumerator` - 扫描目录并分批
//! - `output_path` - 输入路径到输出路径的推导
//! - `ResultWriter` - 写出处理结果
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/worker_pool` - 跳过规则 + 有界并发
//! - `orchestrator/batch_processor` - 批次串行调度与统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::DataseerClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{FailureKind, Outcome, OutcomeStatus, ServiceKind, Task};
pub use orchestrator::{App, ProcessingStats, RunOptions};
pub use services::OutputLayout;
