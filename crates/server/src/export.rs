//! Writes the embedded bundle to the build output directory.

use anyhow::{bail, Context, Result};
use rust_embed::RustEmbed;
use skillhub_core::proxy::BuildConfig;
use std::path::Path;
use tokio::fs;

use crate::assets::{safe_relative_path, Assets};

/// Export every bundled file; returns the number of files written
pub async fn export_assets(build: &BuildConfig) -> Result<usize> {
    export_from::<Assets>(build).await
}

async fn export_from<E: RustEmbed>(build: &BuildConfig) -> Result<usize> {
    let out_dir = &build.out_dir;

    if build.empty_out_dir && fs::metadata(out_dir).await.is_ok() {
        ensure_safe_to_empty(out_dir)?;
        fs::remove_dir_all(out_dir)
            .await
            .with_context(|| format!("Failed to empty output directory: {:?}", out_dir))?;
        tracing::debug!(out_dir = ?out_dir, "Emptied output directory");
    }

    fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    let mut written = 0;
    for name in E::iter() {
        let Some(relative) = safe_relative_path(&name) else {
            tracing::warn!(asset = %name, "Skipping asset with unsafe path");
            continue;
        };
        let Some(file) = E::get(&name) else {
            continue;
        };

        let dest = out_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&dest, file.data.as_ref())
            .await
            .with_context(|| format!("Failed to write asset: {:?}", dest))?;
        written += 1;
    }

    tracing::info!(files = written, out_dir = ?out_dir, "Exported frontend bundle");
    Ok(written)
}

/// Refuse to wipe the filesystem root or the working directory
fn ensure_safe_to_empty(out_dir: &Path) -> Result<()> {
    let resolved = out_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve output directory: {:?}", out_dir))?;

    if resolved.parent().is_none() {
        bail!("Refusing to empty filesystem root {:?}", resolved);
    }
    if let Ok(cwd) = std::env::current_dir().and_then(|d| d.canonicalize()) {
        if cwd.starts_with(&resolved) {
            bail!(
                "Refusing to empty {:?}: it contains the working directory",
                resolved
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_export_writes_bundle() {
        let tmp = tempdir().unwrap();
        let out_dir = tmp.path().join("web_dist");
        let build = BuildConfig::default().with_out_dir(&out_dir);

        let written = export_assets(&build).await.unwrap();
        assert_eq!(written, Assets::iter().count());
        assert!(out_dir.join("index.html").exists());
        assert!(out_dir.join("assets").join("app.js").exists());
    }

    #[tokio::test]
    async fn test_export_empties_stale_files() {
        let tmp = tempdir().unwrap();
        let out_dir = tmp.path().join("web_dist");
        std::fs::create_dir_all(&out_dir).unwrap();
        std::fs::write(out_dir.join("stale.js"), "old").unwrap();

        export_assets(&BuildConfig::default().with_out_dir(&out_dir))
            .await
            .unwrap();
        assert!(!out_dir.join("stale.js").exists());
        assert!(out_dir.join("index.html").exists());
    }

    #[tokio::test]
    async fn test_export_can_keep_existing_files() {
        let tmp = tempdir().unwrap();
        let out_dir = tmp.path().join("web_dist");
        std::fs::create_dir_all(&out_dir).unwrap();
        std::fs::write(out_dir.join("keep.txt"), "mine").unwrap();

        let build = BuildConfig {
            out_dir: out_dir.clone(),
            empty_out_dir: false,
        };
        export_assets(&build).await.unwrap();
        assert!(out_dir.join("keep.txt").exists());
    }

    #[test]
    fn test_refuses_to_empty_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        assert!(ensure_safe_to_empty(&cwd).is_err());
        assert!(ensure_safe_to_empty(Path::new("/")).is_err());
    }
}
