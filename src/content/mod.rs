//! Content module - front matter, markdown and post loading

pub mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, MalformedPolicy};
pub use markdown::{plain_text, MarkdownRenderer};
pub use post::{sort_newest_first, Post};
