//! Embedded frontend bundle.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Built frontend assets
#[derive(RustEmbed)]
#[folder = "../../apps/web/dist"]
pub struct Assets;

pub const INDEX_HTML: &str = "index.html";

/// A bundled file with its MIME type
pub struct Asset {
    pub data: Cow<'static, [u8]>,
    pub mime: String,
}

/// Look up a bundled file by its URL path (leading `/` optional)
pub fn lookup(path: &str) -> Option<Asset> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    let file = Assets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(Asset {
        data: file.data,
        mime: mime.as_ref().to_string(),
    })
}

pub fn index_html() -> Option<Cow<'static, [u8]>> {
    Assets::get(INDEX_HTML).map(|file| file.data)
}

/// Relative bundle path as a filesystem path, rejecting anything that
/// could leave the output directory
pub fn safe_relative_path(path: &str) -> Option<PathBuf> {
    let candidate = Path::new(path);
    let mut clean = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}
