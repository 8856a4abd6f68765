use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tempfile::tempdir;
use tower_http::services::ServeDir;
use week_picker::app::prober::{check_exists, probe_all, site_root};
use week_picker::catalog::{CandidateEntry, Catalog};
use week_picker::infra::http_client::ReqwestHttp;

/// Serve `dir` as a static site on an ephemeral port
fn serve_dir(dir: &Path) -> Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let app = Router::new().fallback_service(ServeDir::new(dir));
    let server = axum::Server::from_tcp(listener)?.serve(app.into_make_service());
    tokio::spawn(server);
    Ok(addr)
}

#[tokio::test]
async fn test_head_probe_against_static_site() -> Result<()> {
    let site = tempdir()?;
    fs::write(site.path().join("week-1.html"), "<h1>Week 1</h1>")?;
    fs::write(site.path().join("week-2.html"), "<h1>Week 2</h1>")?;
    let addr = serve_dir(site.path())?;

    let mut catalog = Catalog::new(vec![
        CandidateEntry::new("week-1.html", "Week 1"),
        CandidateEntry::new("week-2.html", "Week 2"),
        CandidateEntry::new("week-3.html", "Week 3"),
    ]);
    let base = site_root(&format!("http://{}", addr))?;
    let http = Arc::new(ReqwestHttp::new(None)?);

    let summary = probe_all(&mut catalog, http, &base).await;

    assert_eq!(summary.checked, 3);
    assert_eq!(summary.existing, 2);
    let flags: Vec<bool> = catalog.iter().map(|e| e.exists).collect();
    assert_eq!(flags, vec![true, true, false]);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_counts_as_missing() -> Result<()> {
    // Grab a free port and release it so nothing is listening there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    let http = ReqwestHttp::new(Some(std::time::Duration::from_secs(5)))?;

    assert!(!check_exists(&http, &format!("http://{}/week-1.html", addr)).await);
    Ok(())
}
