use anyhow::Result;
use clap::Parser;
use dataseer_client::config::DEFAULT_CONFIG_PATH;
use dataseer_client::utils::logging;
use dataseer_client::{App, Config, RunOptions, ServiceKind};
use std::path::{Path, PathBuf};

/// Dataseer 批量客户端
///
/// 递归扫描输入目录，将 PDF 或 TEI XML 文档提交给 Dataseer 服务，
/// 并把返回的 TEI XML 写到输出目录。
#[derive(Parser, Debug)]
#[command(name = "dataseer_client", author, version, about = "Dataseer 批量处理客户端")]
struct Args {
    /// 目标服务
    #[arg(value_enum)]
    service: ServiceKind,

    /// 输入目录
    #[arg(long)]
    input: PathBuf,

    /// 输出目录（不指定则写在输入文件旁边）
    #[arg(long)]
    output: Option<PathBuf>,

    /// 配置文件路径（JSON 或 TOML），默认尝试 ./config.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// 并发请求数
    #[arg(short = 'n', long = "concurrency", default_value_t = 10)]
    n: usize,

    /// 重新处理已存在输出的文件
    #[arg(long)]
    force: bool,

    /// 打印详细信息
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    logging::init(args.verbose);

    // 加载配置
    let config_path = args.config.clone().or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_PATH);
        default.is_file().then(|| default.to_path_buf())
    });
    let config = Config::load(config_path.as_deref())?;

    let options = RunOptions {
        service: args.service,
        input: args.input,
        output: args.output,
        concurrency: args.n,
        force: args.force,
        verbose: args.verbose,
    };

    // 初始化并运行应用
    let _stats = App::initialize(config, options).await?.run().await?;

    Ok(())
}
