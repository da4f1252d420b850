//! Environment/runtime helpers
//!
//! Sanity checks for directories the server expects at startup.

use tracing::warn;

/// Check that the dashboard build directory exists; warn and report `false` when it does not.
pub async fn ensure_static_dir(static_dir: &str) -> bool {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => true,
        Ok(_) => {
            warn!(%static_dir, "static path is not a directory; dashboard assets will 404");
            false
        }
        Err(_) => {
            warn!(%static_dir, "dashboard assets directory not found; static assets will 404");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_dir_reports_false() {
        assert!(!ensure_static_dir("/definitely/not/here/guhdeh-dashboard").await);
    }

    #[tokio::test]
    async fn temp_dir_reports_true() {
        let tmp = std::env::temp_dir();
        assert!(ensure_static_dir(tmp.to_str().unwrap()).await);
    }
}
