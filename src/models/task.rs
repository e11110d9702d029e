//! 任务与处理结果
//!
//! `Task` 描述"要把哪个文件送到哪个端点"，`Outcome` 记录一次尝试的结果。

use super::ServiceKind;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// 单个文件的处理任务，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    path: PathBuf,
    kind: ServiceKind,
}

impl Task {
    /// 创建新的任务
    pub fn new(path: impl Into<PathBuf>, kind: ServiceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// 输入文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 目标服务
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// 输入文件是否为 gzip 压缩
    pub fn is_gzipped(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext == "gz")
            .unwrap_or(false)
    }

    /// 上传时使用的文件名（去掉 .gz 后缀）
    pub fn upload_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.strip_suffix(".gz") {
            Some(stripped) if self.is_gzipped() => stripped.to_string(),
            _ => name,
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.kind, self.path.display())
    }
}

/// 非 HTTP 状态的失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 请求超时
    Timeout,
    /// 重定向次数过多
    TooManyRedirects,
    /// 其他传输层错误（连接失败等）
    Request,
    /// 输入文件无法读取或解压
    InputUnreadable,
    /// 工作任务异常退出
    WorkerAborted,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FailureKind::Timeout => "请求超时",
            FailureKind::TooManyRedirects => "重定向次数过多",
            FailureKind::Request => "请求失败",
            FailureKind::InputUnreadable => "输入文件无法读取",
            FailureKind::WorkerAborted => "工作任务异常退出",
        };
        f.write_str(text)
    }
}

/// 处理状态：HTTP 状态码，或传输层失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Http(u16),
    Failed(FailureKind),
}

impl Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Http(code) => write!(f, "HTTP {}", code),
            OutcomeStatus::Failed(kind) => write!(f, "{}", kind),
        }
    }
}

/// 单个任务的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// 原始输入文件路径
    pub path: PathBuf,
    /// 最终状态
    pub status: OutcomeStatus,
    /// 服务返回的 TEI XML，失败时为 None
    pub body: Option<String>,
    /// 因服务过载而等待的次数
    pub backoffs: u32,
}

impl Outcome {
    /// 成功结果（HTTP 200）
    pub fn success(path: impl Into<PathBuf>, body: String) -> Self {
        Self {
            path: path.into(),
            status: OutcomeStatus::Http(200),
            body: Some(body),
            backoffs: 0,
        }
    }

    /// HTTP 错误结果
    pub fn http_error(path: impl Into<PathBuf>, code: u16) -> Self {
        Self {
            path: path.into(),
            status: OutcomeStatus::Http(code),
            body: None,
            backoffs: 0,
        }
    }

    /// 传输层失败结果
    pub fn failed(path: impl Into<PathBuf>, kind: FailureKind) -> Self {
        Self {
            path: path.into(),
            status: OutcomeStatus::Failed(kind),
            body: None,
            backoffs: 0,
        }
    }

    /// 记录过载等待次数
    pub fn with_backoffs(mut self, backoffs: u32) -> Self {
        self.backoffs = backoffs;
        self
    }

    pub fn is_success(&self) -> bool {
        self.body.is_some()
    }
}
