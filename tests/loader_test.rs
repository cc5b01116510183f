//! Loading from files and over HTTP

mod common;

use common::{write_csv, SAMPLE_CSV};
use release_dashboard::loader::{load_text, Source};
use release_dashboard::ReleaseAnalyzer;
use tempfile::tempdir;

#[tokio::test]
async fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = write_csv(dir.path(), "releases.csv", SAMPLE_CSV);

    let text = load_text(&Source::File(path.clone()), 5).await.unwrap();
    assert_eq!(text, SAMPLE_CSV);

    let mut analyzer = ReleaseAnalyzer::new(Source::File(path), 5);
    assert_eq!(analyzer.load().await.unwrap(), 4);
    assert_eq!(analyzer.records()[0].id, 4);
}

#[tokio::test]
async fn test_missing_file_is_a_load_failure() {
    let dir = tempdir().unwrap();
    let source = Source::File(dir.path().join("absent.csv"));

    let err = load_text(&source, 5).await.unwrap_err();
    assert!(err.is_load_failure());
}

#[cfg(feature = "fetch")]
mod http {
    use super::*;
    use release_dashboard::error::DashboardError;
    use release_dashboard::loader::fetch_text;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned response per connection on a local port
    async fn serve(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/releases.csv", addr)
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let url = serve("200 OK", SAMPLE_CSV).await;
        let text = fetch_text(&client(), &url).await.unwrap();
        assert_eq!(text, SAMPLE_CSV);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = serve("404 Not Found", "missing").await;
        let err = fetch_text(&client(), &url).await.unwrap_err();

        match err {
            DashboardError::HttpStatus { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_load_failure() {
        // Bind then drop to get a port with nothing listening
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let url = format!("http://{}/releases.csv", addr);

        let err = fetch_text(&client(), &url).await.unwrap_err();
        assert!(err.is_load_failure());
    }
}
