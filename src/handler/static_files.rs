//! Static file serving module
//!
//! Serves the bundled front-end: the entry file for `/`, every other asset
//! by path below the static root.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Serve a front-end asset, 404 when it does not exist
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    config: &StaticFilesConfig,
) -> Response<Full<Bytes>> {
    match load_asset(&config.root, ctx.path, &config.index_file).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Load a file below `static_dir`, falling back to `index_file` for directories
pub async fn load_asset(
    static_dir: &str,
    path: &str,
    index_file: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let relative_path = sanitize_path(path)?;

    let static_dir_canonical = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = static_dir_canonical.join(relative_path);
    if fs::metadata(&file_path).await.ok()?.is_dir() {
        file_path = file_path.join(index_file);
    }

    // File not found is common (404), no need to log at warning level
    let file_path_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Turn a request path into a relative path, rejecting `..` and absolute parts
///
/// Percent-escapes are decoded first, so `%2e%2e` counts as `..`.
fn sanitize_path(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') || decoded.contains('\\') {
        return None;
    }
    let trimmed = decoded.trim_start_matches('/');
    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_end() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>converter</html>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        dir
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/"), Some(PathBuf::new()));
        assert_eq!(
            sanitize_path("/assets/./app.js"),
            Some(PathBuf::from("assets/app.js"))
        );
        assert_eq!(sanitize_path("/../etc/passwd"), None);
        assert_eq!(sanitize_path("/assets/../../secret"), None);
    }

    #[test]
    fn test_sanitize_decodes_escapes() {
        assert_eq!(
            sanitize_path("/my%20file.js"),
            Some(PathBuf::from("my file.js"))
        );
        assert_eq!(
            sanitize_path("/assets%2Fapp.js"),
            Some(PathBuf::from("assets/app.js"))
        );
        assert_eq!(sanitize_path("/%2e%2e/secret.txt"), None);
        assert_eq!(sanitize_path("/assets/%2E%2E/%2E%2E/secret"), None);
        assert_eq!(sanitize_path("/%2F%2E%2E%2Fsecret"), None);
        assert_eq!(sanitize_path("/..%5Csecret"), None);
        assert_eq!(sanitize_path("/app.js%00.html"), None);
        assert_eq!(sanitize_path("/%ff%fe"), None);
    }

    #[tokio::test]
    async fn test_escaped_asset_name() {
        let dir = front_end();
        std::fs::write(dir.path().join("my file.js"), "spaced()").unwrap();
        let root = dir.path().to_str().unwrap();
        let (content, _) = load_asset(root, "/my%20file.js", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"spaced()");
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = front_end();
        let root = dir.path().to_str().unwrap();
        let (content, content_type) = load_asset(root, "/", "index.html").await.unwrap();
        assert_eq!(content, b"<html>converter</html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_nested_asset() {
        let dir = front_end();
        let root = dir.path().to_str().unwrap();
        let (content, content_type) = load_asset(root, "/assets/app.js", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"console.log(1)");
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_missing_asset_and_missing_root() {
        let dir = front_end();
        let root = dir.path().to_str().unwrap();
        assert!(load_asset(root, "/nope.css", "index.html").await.is_none());
        assert!(load_asset(root, "/assets/", "index.html").await.is_none());

        let missing = dir.path().join("not-built");
        assert!(load_asset(missing.to_str().unwrap(), "/", "index.html")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let root = outer.path().join("dist");
        std::fs::create_dir(&root).unwrap();

        let root = root.to_str().unwrap();
        assert!(load_asset(root, "/../secret.txt", "index.html").await.is_none());
        assert!(load_asset(root, "/%2e%2e/secret.txt", "index.html")
            .await
            .is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let root = outer.path().join("dist");
        std::fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("link.txt"))
            .unwrap();

        assert!(load_asset(root.to_str().unwrap(), "/link.txt", "index.html")
            .await
            .is_none());
    }
}
