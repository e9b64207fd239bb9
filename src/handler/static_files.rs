//! Static file serving module
//!
//! Serves the site directory when no redirect rule matched the request path.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Serve the request path from the site directory
pub async fn serve(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let loaded = load_from_source(
        &state.config.source.path,
        ctx.path,
        &state.config.rules.file,
        &state.config.source.index_files,
    )
    .await;

    match loaded {
        Some((content, content_type)) => build_static_file_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Load a file from the site directory with index file support
async fn load_from_source(
    source_dir: &str,
    path: &str,
    rules_file: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let mut file_path = Path::new(source_dir).join(&clean_path);

    // Security: ensure file_path is within source_dir
    let source_dir_canonical = match Path::new(source_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Source directory not found or inaccessible '{source_dir}': {e}"
            ));
            return None;
        }
    };

    // Directory requests try index files
    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.exists() && index_path.is_file() {
                file_path = index_path;
                break;
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&source_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    // The rule file is configuration, not content
    if file_path_canonical == source_dir_canonical.join(rules_file) {
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    // Determine content type from extension
    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(data.to_owned()), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &std::path::Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_load_file_from_source() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "page.html", "<p>hi</p>");
        let root = dir.path().to_str().unwrap();

        let (content, content_type) = load_from_source(root, "/page.html", "_redirects", &[])
            .await
            .unwrap();
        assert_eq!(content, b"<p>hi</p>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_index_file_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.html", "home");
        let root = dir.path().to_str().unwrap();

        let index_files = vec!["index.html".to_string()];
        let (content, _) = load_from_source(root, "/", "_redirects", &index_files)
            .await
            .unwrap();
        assert_eq!(content, b"home");
    }

    #[tokio::test]
    async fn test_rule_file_is_never_served() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "_redirects", "/a /b\n");
        let root = dir.path().to_str().unwrap();

        assert!(load_from_source(root, "/_redirects", "_redirects", &[])
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        std::fs::create_dir(&site).unwrap();
        write_file(dir.path(), "secret.txt", "secret");
        let root = site.to_str().unwrap();

        assert!(load_from_source(root, "/../secret.txt", "_redirects", &[])
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        assert!(load_from_source(root, "/nope.html", "_redirects", &[])
            .await
            .is_none());
    }
}
