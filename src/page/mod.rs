//! The preview page: tracked document, metadata, rendered HTML.
//!
//! Everything here is pure with respect to HTTP; [`render_page`] maps the
//! current state of the tutorial directory to a status and an HTML body.

mod meta;

pub use meta::TutorialMeta;

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::PreviewConfig;
use crate::embed::preview::{ERROR_HTML, ErrorVars, NOT_FOUND_HTML, NotFoundVars, PAGE_HTML, PageVars};
use crate::markdown::{self, MarkdownOptions};
use crate::utils::html::escape;

/// The watched document and its companion metadata file.
///
/// Fixed at start-up; `dir` is absolute.
#[derive(Debug, Clone)]
pub struct PreviewTarget {
    pub dir: PathBuf,
    pub document: String,
    pub metadata: String,
}

impl PreviewTarget {
    pub fn new(dir: PathBuf, config: &PreviewConfig) -> Self {
        Self {
            dir,
            document: config.document.clone(),
            metadata: config.metadata.clone(),
        }
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.join(&self.document)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(&self.metadata)
    }

    /// Last path component of the tutorial directory.
    pub fn dir_name(&self) -> String {
        dir_name(&self.dir)
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// A rendered response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

/// Render the preview for the current contents of `target`.
///
/// - document missing: 404 naming the expected path
/// - read/render failure or panic: 500 with the error chain
pub fn render_page(target: &PreviewTarget) -> Page {
    match panic::catch_unwind(AssertUnwindSafe(|| try_render(target))) {
        Ok(Ok(page)) => page,
        Ok(Err(e)) => error_page(&e),
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error_page(&anyhow::anyhow!("renderer panicked: {msg}"))
        }
    }
}

fn try_render(target: &PreviewTarget) -> Result<Page> {
    let document = target.document_path();
    if !document.is_file() {
        return Ok(not_found_page(target, &document));
    }

    let source = fs::read_to_string(&document)
        .with_context(|| format!("failed to read {}", document.display()))?;
    let content = markdown::render(&source, &MarkdownOptions::all());

    let meta = load_meta(target)?;
    let title = meta
        .as_ref()
        .and_then(|m| m.name.clone())
        .unwrap_or_else(|| target.dir_name());

    let body = PAGE_HTML.render(&PageVars {
        title: &escape(&title),
        meta: &meta.map(|m| meta_line(&m)).unwrap_or_default(),
        content: &content,
    });
    Ok(Page { status: 200, body })
}

/// Read metadata fresh; `None` when the file does not exist.
fn load_meta(target: &PreviewTarget) -> Result<Option<TutorialMeta>> {
    let path = target.metadata_path();
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(Some(
        TutorialMeta::extract(&text).with_defaults(&target.dir_name()),
    ))
}

/// Escaped header line: `📁 category • description`.
fn meta_line(meta: &TutorialMeta) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(category) = &meta.category {
        parts.push(format!(
            "<span class=\"category\">📁 {}</span>",
            escape(category)
        ));
    }
    if let Some(description) = &meta.description {
        parts.push(format!(
            "<span class=\"description\">• {}</span>",
            escape(description)
        ));
    }
    parts.join(" ")
}

fn not_found_page(target: &PreviewTarget, document: &Path) -> Page {
    let path = document.display().to_string();
    let body = NOT_FOUND_HTML.render(&NotFoundVars {
        title: &escape(&target.dir_name()),
        document: &escape(&target.document),
        path: &escape(&path),
    });
    Page { status: 404, body }
}

fn error_page(error: &anyhow::Error) -> Page {
    let chain = format!("{error:?}");
    let body = ERROR_HTML.render(&ErrorVars {
        error: &escape(&chain),
    });
    Page { status: 500, body }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn target(dir: &Path) -> PreviewTarget {
        PreviewTarget::new(dir.to_path_buf(), &PreviewConfig::default())
    }

    #[test]
    fn test_renders_document() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "# Hello").unwrap();

        let page = render_page(&target(temp.path()));
        assert_eq!(page.status, 200);
        assert!(page.body.contains("<h1 id=\"hello\">Hello</h1>"));
        assert!(page.body.contains("new EventSource('/events')"));
    }

    #[test]
    fn test_title_falls_back_to_dir_name() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("zero-to-hero");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("README.md"), "text").unwrap();

        let page = render_page(&target(&dir));
        assert!(page.body.contains("<title>Preview: zero-to-hero</title>"));
        assert!(!page.body.contains("📁"));
    }

    #[test]
    fn test_missing_document_is_404_with_path() {
        let temp = TempDir::new().unwrap();
        let t = target(temp.path());

        let page = render_page(&t);
        assert_eq!(page.status, 404);
        let expected = escape(&t.document_path().display().to_string()).into_owned();
        assert!(page.body.contains(&expected));
    }

    #[test]
    fn test_deleted_document_becomes_404() {
        let temp = TempDir::new().unwrap();
        let readme = temp.path().join("README.md");
        fs::write(&readme, "# Here").unwrap();
        let t = target(temp.path());
        assert_eq!(render_page(&t).status, 200);

        fs::remove_file(&readme).unwrap();
        assert_eq!(render_page(&t).status, 404);
    }

    #[test]
    fn test_metadata_enriches_and_is_escaped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "body").unwrap();
        fs::write(
            temp.path().join("tutorial.yml"),
            "name: <Script> & Co\ndescription: a \"quoted\" <b>desc</b>\n",
        )
        .unwrap();

        let page = render_page(&target(temp.path()));
        assert!(page.body.contains("<title>Preview: &lt;Script&gt; &amp; Co</title>"));
        assert!(page.body.contains("📁 Unknown"));
        assert!(page.body.contains("&lt;b&gt;desc&lt;/b&gt;"));
        assert!(!page.body.contains("<b>desc</b>"));
    }

    #[test]
    fn test_metadata_read_fresh() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "body").unwrap();
        let t = target(temp.path());

        fs::write(temp.path().join("tutorial.yml"), "name: One").unwrap();
        assert!(render_page(&t).body.contains("<h1>One</h1>"));
        fs::write(temp.path().join("tutorial.yml"), "name: Two").unwrap();
        assert!(render_page(&t).body.contains("<h1>Two</h1>"));
    }

    #[test]
    fn test_unreadable_document_is_500() {
        let temp = TempDir::new().unwrap();
        // invalid UTF-8 fails read_to_string
        fs::write(temp.path().join("README.md"), [0xff, 0xfe, 0x00]).unwrap();

        let page = render_page(&target(temp.path()));
        assert_eq!(page.status, 500);
        assert!(page.body.contains("failed to read"));
    }

    #[test]
    fn test_meta_line() {
        let meta = TutorialMeta {
            name: None,
            category: Some("sdk".into()),
            description: None,
        };
        assert_eq!(meta_line(&meta), "<span class=\"category\">📁 sdk</span>");
    }
}
