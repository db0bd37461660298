//! eirene: a small blog server
//!
//! Posts are Markdown files with YAML front matter. They are read and
//! rendered on every request and passed to page templates that are compiled
//! once at startup.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod templates;

use std::path::Path;

pub use config::{Config, Environment};
pub use content::{ContentLoader, Post};
pub use error::{Error, Result};
pub use templates::{TemplateCache, TemplateData};

/// Page names served by the built-in routes
pub mod pages {
    pub const HOME: &str = "home.page.html";
    pub const POSTS: &str = "posts.page.html";
    pub const POST: &str = "post.page.html";
}

/// Application context shared by all request handlers.
///
/// Built once at startup and never mutated afterwards.
pub struct Blog {
    /// Server configuration
    pub config: Config,
    /// Compiled page templates
    pub templates: TemplateCache,
    /// Content directory reader
    pub loader: ContentLoader,
}

impl Blog {
    /// Build the template cache and content loader described by `config`
    pub fn new(config: Config) -> Result<Self> {
        let templates = TemplateCache::build(&config.template_dir)?;
        let loader = ContentLoader::from_config(&config);

        Ok(Self {
            config,
            templates,
            loader,
        })
    }

    /// Load the configuration file at `path` and build the context
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(Config::load(path)?)
    }

    /// Render the home page
    pub fn home(&self) -> Result<Vec<u8>> {
        self.templates.render(pages::HOME, TemplateData::new())
    }

    /// Render the list of all posts, newest first
    pub fn posts(&self) -> Result<Vec<u8>> {
        let posts = self.loader.load_all()?;
        self.templates
            .render(pages::POSTS, TemplateData::with_posts(posts))
    }

    /// Render a single post
    pub fn post(&self, id: &str) -> Result<Vec<u8>> {
        let post = self.loader.load_by_id(id)?;
        self.templates.render(pages::POST, TemplateData::with_post(post))
    }
}
