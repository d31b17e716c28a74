//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `preview` - Preview server pages (page.html, not_found.html, error.html)
//! - `create` - Scaffold files written by `cookbook create`
//!
//! # Usage
//!
//! ```ignore
//! use embed::preview::{PAGE_HTML, PageVars};
//! use embed::create::{README_MD, SlugVars};
//!
//! let html = PAGE_HTML.render(&PageVars { title, meta, content });
//! let readme = README_MD.render(&SlugVars { slug: "zero-to-hero", title: "Zero To Hero" });
//! ```

mod template;

pub use template::{Template, TemplateVars, fill};

pub mod preview {
    use super::{Template, TemplateVars, fill};

    /// Variables for page.html. All values must already be HTML-safe.
    pub struct PageVars<'a> {
        pub title: &'a str,
        pub meta: &'a str,
        pub content: &'a str,
    }

    impl TemplateVars for PageVars<'_> {
        fn apply(&self, content: &str) -> String {
            fill(
                content,
                &[
                    ("TITLE", self.title),
                    ("META", self.meta),
                    ("CONTENT", self.content),
                ],
            )
        }
    }

    /// Variables for not_found.html.
    pub struct NotFoundVars<'a> {
        pub title: &'a str,
        pub document: &'a str,
        pub path: &'a str,
    }

    impl TemplateVars for NotFoundVars<'_> {
        fn apply(&self, content: &str) -> String {
            fill(
                content,
                &[
                    ("TITLE", self.title),
                    ("DOCUMENT", self.document),
                    ("PATH", self.path),
                ],
            )
        }
    }

    /// Variables for error.html.
    pub struct ErrorVars<'a> {
        pub error: &'a str,
    }

    impl TemplateVars for ErrorVars<'_> {
        fn apply(&self, content: &str) -> String {
            fill(content, &[("ERROR", self.error)])
        }
    }

    /// Rendered tutorial page with the live-reload client.
    pub const PAGE_HTML: Template<PageVars<'static>> =
        Template::new(include_str!("preview/page.html"));

    /// Page shown when the tracked document does not exist.
    pub const NOT_FOUND_HTML: Template<NotFoundVars<'static>> =
        Template::new(include_str!("preview/not_found.html"));

    /// Page shown when rendering fails.
    pub const ERROR_HTML: Template<ErrorVars<'static>> =
        Template::new(include_str!("preview/error.html"));
}

pub mod create {
    use super::{Template, TemplateVars, fill};

    /// Variables shared by all scaffold templates.
    pub struct SlugVars<'a> {
        pub slug: &'a str,
        pub title: &'a str,
    }

    impl TemplateVars for SlugVars<'_> {
        fn apply(&self, content: &str) -> String {
            fill(content, &[("SLUG", self.slug), ("TITLE", self.title)])
        }
    }

    pub const JUSTFILE: Template<SlugVars<'static>> = Template::new(include_str!("create/justfile"));
    pub const README_MD: Template<SlugVars<'static>> =
        Template::new(include_str!("create/README.md"));
    pub const TUTORIAL_YML: Template<SlugVars<'static>> =
        Template::new(include_str!("create/tutorial.yml"));
    pub const E2E_TEST_TS: Template<SlugVars<'static>> =
        Template::new(include_str!("create/e2e.test.ts"));
    pub const GITIGNORE: Template<SlugVars<'static>> =
        Template::new(include_str!("create/gitignore"));
    pub const VITEST_CONFIG_TS: Template<SlugVars<'static>> =
        Template::new(include_str!("create/vitest.config.ts"));
    pub const TSCONFIG_JSON: Template<SlugVars<'static>> =
        Template::new(include_str!("create/tsconfig.json"));
}
