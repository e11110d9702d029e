/// Dataseer 服务客户端
///
/// 封装所有与 Dataseer 服务相关的调用逻辑：启动探活、提交文档、过载重试
use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::{FailureKind, Outcome, ServiceKind, Task};
use crate::orchestrator::worker_pool::DocumentProcessor;
use crate::utils::logging::truncate_text;
use flate2::read::GzDecoder;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::future::Future;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 探活端点
pub const ENDPOINT_IS_ALIVE: &str = "isalive";

/// multipart 表单中文件字段的名称
const INPUT_FIELD: &str = "input";

/// Dataseer 服务客户端
pub struct DataseerClient {
    http: Client,
    service_url: String,
    overload_sleep: Duration,
    max_retries: Option<u32>,
}

impl DataseerClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Other(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            service_url: config.service_url(),
            overload_sleep: config.overload_sleep(),
            max_retries: config.max_retries,
        })
    }

    /// 服务根地址
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// 某个服务的完整端点地址
    pub fn endpoint_url(&self, kind: ServiceKind) -> String {
        format!("{}{}", self.service_url, kind.endpoint())
    }

    /// 检查服务是否在线
    ///
    /// 只有连不上服务才算失败；服务返回非 200 时只打印警告并继续。
    ///
    /// # 返回
    /// 返回探活接口的 HTTP 状态码
    pub async fn check_alive(&self) -> AppResult<u16> {
        let url = format!("{}{}", self.service_url, ENDPOINT_IS_ALIVE);

        let response = self.http.get(&url).send().await.map_err(|e| {
            error!("❌ Dataseer 服务似乎没有启动，连接服务器失败: {}", url);
            AppError::server_unavailable(&url, e)
        })?;

        let status = response.status().as_u16();
        if status == 200 {
            info!("✓ Dataseer 服务已启动: {}", self.service_url);
        } else {
            warn!("⚠️ Dataseer 服务似乎没有正常运行, 状态码: {}", status);
        }

        Ok(status)
    }

    /// 提交单个文档，直到得到终态结果
    ///
    /// - 200：成功，返回的 TEI XML 原样保存
    /// - 503：等待 `sleep_time` 后重新提交（可选上限 `max_retries`）
    /// - 其他状态码以及传输层错误：终态失败，不重试
    pub async fn submit(&self, task: &Task) -> Outcome {
        let url = self.endpoint_url(task.kind());
        let mut backoffs = 0u32;

        loop {
            let content = match read_input(task).await {
                Ok(content) => content,
                Err(e) => {
                    error!("{} ❌ {}", task, e);
                    return Outcome::failed(task.path(), FailureKind::InputUnreadable)
                        .with_backoffs(backoffs);
                }
            };

            let response = match self.post(&url, task, content).await {
                Ok(response) => response,
                Err(e) => {
                    let kind = classify_error(&e);
                    error!("{} ❌ 请求 {} 失败 ({}): {}", task, url, kind, e);
                    return Outcome::failed(task.path(), kind).with_backoffs(backoffs);
                }
            };

            let status = response.status().as_u16();
            debug!("{} 服务返回状态码 {}", task, status);

            match status {
                503 => {
                    if let Some(max) = self.max_retries {
                        if backoffs >= max {
                            warn!("{} ⚠️ 服务持续过载，已重试 {} 次，放弃", task, backoffs);
                            return Outcome::http_error(task.path(), status)
                                .with_backoffs(backoffs);
                        }
                    }
                    info!(
                        "⏳ 服务过载, 等待 {} 秒后重试 {}",
                        self.overload_sleep.as_secs_f64(),
                        task.path().display()
                    );
                    tokio::time::sleep(self.overload_sleep).await;
                    backoffs += 1;
                    continue;
                }
                200 => {
                    // 没有识别到任何数据集的文档同样返回完整的 TEI，按成功处理
                    return match response.text().await {
                        Ok(body) => Outcome::success(task.path(), body).with_backoffs(backoffs),
                        Err(e) => {
                            let kind = classify_error(&e);
                            error!("{} ❌ 读取响应内容失败 ({}): {}", task, kind, e);
                            Outcome::failed(task.path(), kind).with_backoffs(backoffs)
                        }
                    };
                }
                s if s >= 500 => {
                    error!("❌ [{}] 服务器错误 {}", s, task.path().display());
                }
                404 => {
                    error!("❌ [{}] URL 不存在: {}", status, url);
                }
                s if s >= 400 => {
                    let body = response.text().await.unwrap_or_default();
                    error!("❌ [{}] 错误请求 {}: {}", s, task.path().display(), truncate_text(&body, 200));
                }
                s => {
                    let body = response.text().await.unwrap_or_default();
                    error!("❌ 意外的响应 [HTTP {}] {}: {}", s, task.path().display(), truncate_text(&body, 200));
                }
            }

            return Outcome::http_error(task.path(), status).with_backoffs(backoffs);
        }
    }

    /// 发送一次 multipart 请求
    async fn post(&self, url: &str, task: &Task, content: Vec<u8>) -> reqwest::Result<Response> {
        let part = Part::bytes(content)
            .file_name(task.upload_name())
            .mime_str(task.kind().mime_type())?;
        let form = Form::new().part(INPUT_FIELD, part);

        self.http.post(url).multipart(form).send().await
    }
}

impl DocumentProcessor for DataseerClient {
    fn process(&self, task: Task) -> impl Future<Output = Outcome> + Send {
        async move { self.submit(&task).await }
    }
}

/// 读取输入文件，`.gz` 文件透明解压
async fn read_input(task: &Task) -> Result<Vec<u8>, FileError> {
    let raw = tokio::fs::read(task.path())
        .await
        .map_err(|e| FileError::read_failed(task.path(), e))?;
    if !task.is_gzipped() {
        return Ok(raw);
    }

    let mut content = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut content)
        .map_err(|e| FileError::read_failed(task.path(), e))?;
    Ok(content)
}

/// 将 reqwest 错误归类为失败原因
fn classify_error(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::TooManyRedirects
    } else {
        FailureKind::Request
    }
}
