//! Page template cache using the Tera template engine
//!
//! Every `*.page.*` file in the template directory is compiled once, at
//! startup, together with all `*.layout.*` files, so a page can
//! `{% extends %}` or `{% include %}` any layout by file name. The cache is
//! read-only afterwards and can be shared between requests without locking.

use chrono::{Datelike, Local};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::content::Post;
use crate::error::{Error, Result};
use crate::helpers;

/// Suffix convention for individually addressable pages
pub const PAGE_PATTERN: &str = "*.page.*";

/// Suffix convention for layouts shared by every page
pub const LAYOUT_PATTERN: &str = "*.layout.*";

/// Data available to templates
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub post: Option<Post>,
    pub posts: Option<Vec<Post>>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data for a single-post page
    pub fn with_post(post: Post) -> Self {
        Self {
            post: Some(post),
            ..Self::default()
        }
    }

    /// Data for a post listing
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Some(posts),
            ..Self::default()
        }
    }

    /// Fill in the values every page receives, computed at call time
    fn with_defaults(mut self) -> Self {
        self.current_year = Local::now().year();
        self
    }
}

/// Compiled pages keyed by file name (e.g. `home.page.html`)
pub struct TemplateCache {
    pages: HashMap<String, Tera>,
}

impl TemplateCache {
    /// Compile every page in `dir` together with the shared layouts
    pub fn build<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let layouts = find_templates(dir, LAYOUT_PATTERN)?;
        let pages = find_templates(dir, PAGE_PATTERN)?;

        if pages.is_empty() {
            tracing::warn!("No page templates found in {:?}", dir);
        }

        let mut cache = HashMap::with_capacity(pages.len());

        for (name, path) in pages {
            let mut tera = Tera::default();
            helpers::register(&mut tera);

            let mut files: Vec<(PathBuf, Option<String>)> = vec![(path, Some(name.clone()))];
            files.extend(
                layouts
                    .iter()
                    .map(|(layout, path)| (path.clone(), Some(layout.clone()))),
            );

            tera.add_template_files(files)
                .map_err(|source| Error::TemplateCompile {
                    name: name.clone(),
                    source,
                })?;

            tracing::debug!("Compiled template {} with {} layouts", name, layouts.len());
            cache.insert(name, tera);
        }

        tracing::info!("Built template cache with {} pages", cache.len());

        Ok(Self { pages: cache })
    }

    /// Render a page fully into memory
    pub fn render(&self, name: &str, data: TemplateData) -> Result<Vec<u8>> {
        let tera = self
            .pages
            .get(name)
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))?;

        let execution_error = |source: tera::Error| Error::TemplateExecution {
            name: name.to_string(),
            source,
        };

        let context = Context::from_serialize(data.with_defaults()).map_err(execution_error)?;
        let output = tera.render(name, &context).map_err(execution_error)?;

        Ok(output.into_bytes())
    }

    /// Render a page and write it to `writer` only once rendering succeeded
    pub fn render_to<W: Write>(&self, name: &str, data: TemplateData, writer: &mut W) -> Result<()> {
        let output = self.render(name, data)?;
        writer.write_all(&output).map_err(Error::Output)?;
        writer.flush().map_err(Error::Output)
    }

    /// Whether a page of that name was compiled
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Sorted list of page names
    pub fn page_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Find files in `dir` matching a file-name pattern, keyed by file name
fn find_templates(dir: &Path, pattern: &str) -> Result<Vec<(String, PathBuf)>> {
    let dir_pattern = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&dir_pattern).join(pattern);

    let entries = glob::glob(&full_pattern.to_string_lossy())
        .map_err(|e| Error::Config(format!("invalid template pattern: {}", e)))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            Error::io(path, e.into_error())
        })?;
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            found.push((name.to_string(), path.clone()));
        }
    }

    Ok(found)
}
