//! Validate templates and content without starting the server

use anyhow::{Context, Result};

use crate::{pages, Blog, Config};

/// Build the template cache and load every post, reporting what was found
pub fn run(config: Config) -> Result<()> {
    let blog = Blog::new(config).context("failed to build the template cache")?;

    let names = blog.templates.page_names();
    println!("Templates ({}):", names.len());
    for name in &names {
        println!("  {}", name);
    }

    let missing: Vec<_> = [pages::HOME, pages::POSTS, pages::POST]
        .into_iter()
        .filter(|page| !blog.templates.contains(page))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("missing page templates: {}", missing.join(", "));
    }

    let posts = blog
        .loader
        .load_all()
        .with_context(|| format!("failed to load posts from {:?}", blog.loader.dir()))?;
    println!("Posts: {}", posts.len());

    let undated = posts.iter().filter(|p| p.created_at.is_none()).count();
    if undated > 0 {
        tracing::warn!("{} posts have no CreatedAt date", undated);
    }

    Ok(())
}
