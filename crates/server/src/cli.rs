//! # CLI Views
//!
//! Terminal renderings of the listing and detail views, driven by the same
//! client, router, and view loader as the browser bundle.

use anyhow::{Context, Result};
use skillhub_core::client::{cancellable, ClientResult, SkillsClient};
use skillhub_core::models::{SkillDetail, SkillSummary};
use skillhub_core::routing::{Navigator, Route, Router};
use skillhub_core::views::{View, ViewLoader};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run a request, cancelling it on Ctrl-C
pub async fn interruptible<T, F>(request: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };

    let result = cancellable(&token, request).await;
    watcher.abort();
    result
}

pub async fn list(client: &SkillsClient, query: Option<&str>) -> Result<()> {
    let skills = interruptible(client.list_skills(query))
        .await
        .context("Failed to list skills")?;
    print!("{}", format_listing(&skills));
    Ok(())
}

pub async fn show(client: &SkillsClient, name: &str) -> Result<()> {
    let detail = interruptible(client.get_skill_detail(name))
        .await
        .with_context(|| format!("Failed to load skill '{}'", name))?;
    print!("{}", format_detail(&detail));
    Ok(())
}

pub async fn markdown(client: &SkillsClient, name: &str) -> Result<()> {
    let md = interruptible(client.get_skill_markdown(name))
        .await
        .with_context(|| format!("Failed to load Markdown for '{}'", name))?;
    println!("{}", md);
    Ok(())
}

pub async fn guide(client: &SkillsClient) -> Result<()> {
    let md = interruptible(client.get_registry_guide())
        .await
        .context("Failed to load registry guide")?;
    println!("{}", md);
    Ok(())
}

pub async fn download(client: &SkillsClient, name: &str, output: Option<PathBuf>) -> Result<()> {
    let bytes = interruptible(client.download_skill_archive(name))
        .await
        .with_context(|| format!("Failed to download '{}'", name))?;

    let output = match output {
        Some(path) => path,
        None => default_archive_path(name)?,
    };
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("Failed to write archive: {:?}", output))?;
    println!("Saved {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

/// `<name>.zip` in the working directory, using only the last path component
pub fn default_archive_path(name: &str) -> Result<PathBuf> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Cannot derive an archive file name from '{}'", name))?;
    Ok(PathBuf::from(format!("{}.zip", file_name)))
}

/// Resolve a URL and render its view
pub async fn open(client: SkillsClient, base: &str, url: &str) -> Result<()> {
    let navigator = Navigator::new(Router::with_base(base), url)?;
    let loader = ViewLoader::new(Arc::new(client));

    let view = tokio::select! {
        view = loader.load_location(navigator.current()) => view,
        _ = tokio::signal::ctrl_c() => {
            loader.abandon();
            anyhow::bail!("Interrupted");
        }
    };
    let view = view.with_context(|| format!("Failed to open {}", url))?;

    match view {
        View::Listing { skills, .. } => print!("{}", format_listing(&skills)),
        View::Detail(detail) => print!("{}", format_detail(&detail)),
    }
    Ok(())
}

/// Print the route a URL resolves to, without touching the network
pub fn route(base: &str, url: &str) -> Result<()> {
    println!("{}", describe_route(&Router::with_base(base), url));
    Ok(())
}

pub fn describe_route(router: &Router, url: &str) -> String {
    match router.resolve(url) {
        Some(route @ Route::Home) => format!("{} (no params)", route.name()),
        Some(Route::SkillDetail { name }) => format!("skill-detail name={}", name),
        None => format!("no route matches '{}'", url),
    }
}

pub fn format_listing(skills: &[SkillSummary]) -> String {
    if skills.is_empty() {
        return "No skills found.\n".to_string();
    }

    let width = skills.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for skill in skills {
        if skill.description.is_empty() {
            out.push_str(&format!("{}\n", skill.name));
        } else {
            out.push_str(&format!(
                "{:<width$}  {}\n",
                skill.name,
                skill.description,
                width = width
            ));
        }
    }
    out
}

pub fn format_detail(detail: &SkillDetail) -> String {
    let summary = &detail.summary;
    let mut out = format!("# {}\n", summary.name);
    if !summary.description.is_empty() {
        out.push_str(&format!("\n> {}\n", summary.description));
    }

    let mut meta = Vec::new();
    if let Some(version) = &summary.version {
        meta.push(format!("Version: {}", version));
    }
    if let Some(author) = &summary.author {
        meta.push(format!("Author: {}", author));
    }
    if !summary.tags.is_empty() {
        meta.push(format!("Tags: {}", summary.tags.join(", ")));
    }
    if let Some(updated) = summary.updated_at {
        meta.push(format!("Updated: {}", updated.format("%Y-%m-%d %H:%M UTC")));
    }
    if !meta.is_empty() {
        out.push('\n');
        for line in meta {
            out.push_str(&format!("- {}\n", line));
        }
    }

    if !detail.file_tree.is_empty() {
        out.push_str(&format!("\n## Files\n{}", detail.file_tree));
        if !detail.file_tree.ends_with('\n') {
            out.push('\n');
        }
    }
    if !detail.readme.is_empty() {
        out.push_str(&format!("\n{}\n", detail.readme.trim_end()));
    }
    out
}
