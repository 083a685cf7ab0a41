use std::{env, path::Path};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::info;

use crate::error::{Error, Result};

async fn download_file(url: &str, path: &Path) -> Result<()> {
    info!(url, path = %path.display(), "downloading model");

    let mut header_map = HeaderMap::new();

    if let Ok(token) = env::var("GITHUB_TOKEN") {
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("invalid GITHUB_TOKEN format".into()))?;
        header_map.insert(AUTHORIZATION, auth_value);
    }
    header_map.insert(ACCEPT, HeaderValue::from_static("application/octet-stream"));

    let client = reqwest::Client::new();
    let bytes = client
        .get(url)
        .headers(header_map)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;
    info!(bytes = bytes.len(), "model downloaded");
    Ok(())
}

/// Makes sure the frozen graph is on disk, fetching it once if a URL is configured.
pub async fn ensure_model_exists(model_path: &Path, model_url: Option<&str>) -> Result<()> {
    if model_path.exists() {
        return Ok(());
    }

    match model_url {
        Some(url) => download_file(url, model_path).await,
        None => Err(Error::Config(format!(
            "model not found at {} and MODEL_URL is not set",
            model_path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{http::StatusCode, routing::get, Router};

    use super::*;

    /// Serves `/graph.pb` with a fixed body and everything else as 404.
    fn spawn_model_host() -> SocketAddr {
        let app = Router::new()
            .route("/graph.pb", get(|| async { &b"frozen graph bytes"[..] }))
            .fallback(|| async { StatusCode::NOT_FOUND });
        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("leaf_doctor_{name}_{}", std::process::id()))
    }

    #[tokio::test]
    async fn downloads_missing_model_into_nested_dir() {
        let addr = spawn_model_host();
        let dir = scratch_dir("download");
        let path = dir.join("model/frozen_graph.pb");

        let url = format!("http://{addr}/graph.pb");
        ensure_model_exists(&path, Some(url.as_str())).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"frozen graph bytes");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn error_status_is_a_download_error() {
        let addr = spawn_model_host();
        let dir = scratch_dir("not_found");
        let path = dir.join("frozen_graph.pb");

        let url = format!("http://{addr}/missing.pb");
        let result = ensure_model_exists(&path, Some(url.as_str())).await;
        assert!(matches!(result, Err(Error::Download(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn existing_model_needs_no_download() {
        let dir = scratch_dir("existing");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frozen_graph.pb");
        std::fs::write(&path, b"graph").unwrap();

        ensure_model_exists(&path, None).await.unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_model_without_url_is_a_config_error() {
        let path = env::temp_dir().join("leaf_doctor_missing/frozen_graph.pb");
        let result = ensure_model_exists(&path, None).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
