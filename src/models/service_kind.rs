/// 服务类型枚举
///
/// 每种服务对应远端的一个处理端点，以及一组可接受的输入文件后缀。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ServiceKind {
    /// PDF 文档（可为 gzip 压缩）
    #[value(name = "processDataseerPDF", alias = "pdf")]
    Pdf,
    /// 已结构化的 TEI XML 文档
    #[value(name = "processDataseerTEI", alias = "tei")]
    Tei,
}

impl ServiceKind {
    /// 获取处理端点名称
    pub fn endpoint(self) -> &'static str {
        match self {
            ServiceKind::Pdf => "processDataseerPDF",
            ServiceKind::Tei => "processDataseerTEI",
        }
    }

    /// 可接受的文件名后缀
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ServiceKind::Pdf => &[".pdf", ".pdf.gz"],
            ServiceKind::Tei => &[".tei.xml"],
        }
    }

    /// 上传时使用的 MIME 类型
    pub fn mime_type(self) -> &'static str {
        match self {
            ServiceKind::Pdf => "application/pdf",
            ServiceKind::Tei => "application/xml",
        }
    }

    /// 判断文件名是否是本服务的输入
    pub fn accepts(self, file_name: &str) -> bool {
        self.extensions().iter().any(|ext| file_name.ends_with(ext))
    }

    /// 日志中使用的文档单位
    pub fn unit(self) -> &'static str {
        match self {
            ServiceKind::Pdf => "PDF",
            ServiceKind::Tei => "TEI",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}
