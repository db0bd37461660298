//! Start the blog server

use anyhow::Result;

use crate::Blog;

/// Serve the blog on `addr`, or on the configured address
pub async fn run(blog: Blog, addr: Option<&str>) -> Result<()> {
    let addr = addr
        .map(str::to_string)
        .unwrap_or_else(|| blog.config.server_address.clone());

    println!("Server running at http://{}", addr);
    println!("Press Ctrl+C to stop.");

    crate::server::start(blog, &addr).await
}
