//! List blog content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::ContentLoader;

/// List content by type
pub fn run(loader: &ContentLoader, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = loader.load_all()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = post
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                println!("  {} - {} [{}]", date, post.title, post.id);
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_all()?;
            let mut tags: HashMap<String, usize> = HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}
