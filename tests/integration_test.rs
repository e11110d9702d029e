use dataseer_client::{App, AppError, Config, RunOptions, ServiceKind};
use flate2::write::GzEncoder;
use flate2::Compression;
use mockito::{Mock, Server, ServerGuard};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 指向 mock 服务的配置
fn config_for(server: &ServerGuard, batch_size: usize) -> Config {
    Config {
        dataseer_server: server.host_with_port(),
        dataseer_port: None,
        timeout: 5.0,
        sleep_time: 0.01,
        batch_size,
        max_retries: None,
    }
}

fn options(service: ServiceKind, input: &Path, output: Option<&Path>, force: bool) -> RunOptions {
    RunOptions {
        service,
        input: input.to_path_buf(),
        output: output.map(Path::to_path_buf),
        concurrency: 4,
        force,
        verbose: true,
    }
}

fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

fn gzip(content: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
}

async fn mock_alive(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("GET", "/service/isalive")
        .with_status(200)
        .with_body("true")
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn test_second_run_skips_existing_outputs() {
    let mut server = Server::new_async().await;
    let alive = mock_alive(&mut server, 2).await;
    let process = server
        .mock("POST", "/service/processDataseerPDF")
        .with_status(200)
        .with_body("<TEI>annotated</TEI>")
        .expect(3)
        .create_async()
        .await;

    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_file(input.path(), "a.pdf", b"%PDF-1.4 a");
    write_file(input.path(), "sub/b.pdf", b"%PDF-1.4 b");
    write_file(input.path(), "sub/deep/c.pdf.gz", &gzip(b"%PDF-1.4 c"));
    write_file(input.path(), "sub/ignored.txt", b"nope");

    let first = App::initialize(
        config_for(&server, 2),
        options(ServiceKind::Pdf, input.path(), Some(output.path()), false),
    )
    .await
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(first.dispatched, 3);
    assert_eq!(first.succeeded, 3);
    assert_eq!(first.written, 3);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.batches, 2);
    for relative in [
        "a.dataseer.tei.xml",
        "sub/b.dataseer.tei.xml",
        "sub/deep/c.dataseer.tei.xml",
    ] {
        let written = std::fs::read_to_string(output.path().join(relative)).unwrap();
        assert_eq!(written, "<TEI>annotated</TEI>");
    }

    let second = App::initialize(
        config_for(&server, 2),
        options(ServiceKind::Pdf, input.path(), Some(output.path()), false),
    )
    .await
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(second.dispatched, 0);
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped, 3);
    alive.assert_async().await;
    process.assert_async().await;
}

#[tokio::test]
async fn test_force_reprocesses_existing_outputs() {
    let mut server = Server::new_async().await;
    let _alive = mock_alive(&mut server, 1).await;
    let process = server
        .mock("POST", "/service/processDataseerTEI")
        .with_status(200)
        .with_body("<TEI>fresh</TEI>")
        .expect(1)
        .create_async()
        .await;

    let input = tempfile::tempdir().unwrap();
    write_file(input.path(), "doc.tei.xml", b"<TEI/>");
    let existing = write_file(input.path(), "doc.dataseer.tei.xml", b"<TEI>stale</TEI>");

    let stats = App::initialize(
        config_for(&server, 10),
        options(ServiceKind::Tei, input.path(), None, true),
    )
    .await
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(stats.written, 1);
    assert_eq!(stats.skipped, 0);
    assert_eq!(std::fs::read_to_string(existing).unwrap(), "<TEI>fresh</TEI>");
    process.assert_async().await;
}

#[tokio::test]
async fn test_failed_documents_are_reported_not_written() {
    let mut server = Server::new_async().await;
    let _alive = mock_alive(&mut server, 1).await;
    let process = server
        .mock("POST", "/service/processDataseerTEI")
        .with_status(404)
        .expect(2)
        .create_async()
        .await;

    let input = tempfile::tempdir().unwrap();
    write_file(input.path(), "one.tei.xml", b"<TEI/>");
    write_file(input.path(), "nested/two.tei.xml", b"<TEI/>");

    let stats = App::initialize(
        config_for(&server, 10),
        options(ServiceKind::Tei, input.path(), None, false),
    )
    .await
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.succeeded, 0);
    assert_eq!(stats.written, 0);
    assert!(!input.path().join("one.dataseer.tei.xml").exists());
    assert!(!input.path().join("nested/two.dataseer.tei.xml").exists());
    process.assert_async().await;
}

#[tokio::test]
async fn test_unwritable_output_still_counts_as_succeeded() {
    let mut server = Server::new_async().await;
    let _alive = mock_alive(&mut server, 1).await;
    let process = server
        .mock("POST", "/service/processDataseerPDF")
        .with_status(200)
        .with_body("<TEI>annotated</TEI>")
        .expect(1)
        .create_async()
        .await;

    let input = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    write_file(input.path(), "paper.pdf", b"%PDF-1.4");
    // 输出根目录被普通文件占用，无法创建
    let blocker = write_file(scratch.path(), "blocker", b"");

    let stats = App::initialize(
        config_for(&server, 10),
        options(ServiceKind::Pdf, input.path(), Some(&blocker), false),
    )
    .await
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.written, 0);
    assert_eq!(stats.write_failed, 1);
    assert_eq!(stats.failed, 0);
    process.assert_async().await;
}

#[tokio::test]
async fn test_empty_input_directory_runs_no_batches() {
    let mut server = Server::new_async().await;
    let _alive = mock_alive(&mut server, 1).await;
    let input = tempfile::tempdir().unwrap();

    let stats = App::initialize(
        config_for(&server, 10),
        options(ServiceKind::Pdf, input.path(), None, false),
    )
    .await
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(stats.batches, 0);
    assert_eq!(stats.dispatched, 0);
}

#[tokio::test]
async fn test_non_200_liveness_check_only_warns() {
    let mut server = Server::new_async().await;
    let alive = server
        .mock("GET", "/service/isalive")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let input = tempfile::tempdir().unwrap();

    let app = App::initialize(
        config_for(&server, 10),
        options(ServiceKind::Pdf, input.path(), None, false),
    )
    .await;

    assert!(app.is_ok());
    alive.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_service_aborts_startup() {
    let input = tempfile::tempdir().unwrap();
    let config = Config {
        dataseer_server: "127.0.0.1".to_string(),
        dataseer_port: Some("1".to_string()),
        ..Config::default()
    };

    let err = App::initialize(config, options(ServiceKind::Pdf, input.path(), None, false))
        .await
        .err()
        .expect("服务不可达时应当启动失败");

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::ServerUnavailable { .. })
    ));
}
