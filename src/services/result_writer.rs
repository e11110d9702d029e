//! 结果写入服务 - 业务能力层
//!
//! 只负责"把一个处理结果落盘"，不关心调度和并发

use crate::error::FileError;
use crate::models::Outcome;
use crate::services::output_path::OutputLayout;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// 单个结果的写入情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// 已写出到该路径
    Written(PathBuf),
    /// 处理失败，没有可写的内容
    ProcessingFailed,
    /// 写入文件失败
    WriteFailed(PathBuf),
}

/// 结果写入服务
///
/// 职责：
/// - 成功的结果写到推导出的输出路径，按需创建父目录
/// - 失败的结果只报告，不碰文件系统
/// - 写入失败只报告，不中断批次
pub struct ResultWriter {
    layout: OutputLayout,
}

impl ResultWriter {
    /// 创建新的结果写入服务
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// 写入单个处理结果
    pub async fn write(&self, outcome: &Outcome) -> WriteResult {
        let Some(body) = &outcome.body else {
            error!(
                "❌ Dataseer - {} 处理失败, 错误: {}",
                outcome.path.display(),
                outcome.status
            );
            return WriteResult::ProcessingFailed;
        };

        let target = self.layout.output_path(&outcome.path);
        match write_document(&target, body).await {
            Ok(()) => {
                debug!("写入 TEI XML: {}", target.display());
                WriteResult::Written(target)
            }
            Err(e) => {
                error!("❌ Dataseer - 写入 TEI XML 文件失败: {}", e);
                WriteResult::WriteFailed(target)
            }
        }
    }
}

async fn write_document(target: &Path, body: &str) -> Result<(), FileError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FileError::write_failed(parent, e))?;
    }
    tokio::fs::write(target, body.as_bytes())
        .await
        .map_err(|e| FileError::write_failed(target, e))
}
