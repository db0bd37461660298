//! Content loader - loads posts from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{frontmatter, markdown, post, FrontMatter, MarkdownRenderer, Post};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::helpers;

/// How `load_all` treats a file whose front matter cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Abort the whole listing
    #[default]
    Fail,
    /// Log a warning and leave the file out
    Skip,
}

/// Loads posts from a content directory.
///
/// Every call reads the filesystem again; nothing is memoised between calls.
pub struct ContentLoader {
    dir: PathBuf,
    extensions: Vec<String>,
    policy: MalformedPolicy,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for `dir` with the default extensions and renderer
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extensions: vec!["md".to_string(), "markdown".to_string()],
            policy: MalformedPolicy::Fail,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Create a loader from the server configuration
    pub fn from_config(config: &Config) -> Self {
        let policy = if config.skip_malformed {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Fail
        };
        Self::new(&config.content_dir)
            .with_extensions(config.content_extensions.clone())
            .with_policy(policy)
            .with_renderer(MarkdownRenderer::with_options(
                &config.highlight_theme,
                config.line_numbers,
            ))
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// The directory posts are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every post in the directory, newest first
    pub fn load_all(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_dangling_link(&e) => {
                    tracing::warn!("Skipping broken link {:?}", e.path().unwrap_or(&self.dir));
                    continue;
                }
                Err(e) => {
                    let path = e.path().unwrap_or(&self.dir).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                    return Err(Error::io(path, source));
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_content_file(path) {
                continue;
            }

            match self.load_one(path) {
                Ok(post) => posts.push(post),
                Err(e @ Error::MalformedContent { .. }) if self.policy == MalformedPolicy::Skip => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                }
                Err(e) => return Err(e),
            }
        }

        post::sort_newest_first(&mut posts);
        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.dir);

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_one<P: AsRef<Path>>(&self, path: P) -> Result<Post> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => Error::malformed(path, "content is not valid UTF-8"),
            _ => Error::io(path, e),
        })?;

        let segments = frontmatter::split(&content).map_err(|reason| Error::malformed(path, reason))?;
        let fm = FrontMatter::from_yaml(segments.front_matter)
            .map_err(|e| Error::malformed(path, e.to_string()))?;

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let mut post = Post::new(id, fm);
        post.content = self.renderer.render(segments.body);
        post.word_count = helpers::word_count(&markdown::plain_text(segments.body));

        Ok(post)
    }

    /// Load the post whose file stem is `id`
    pub fn load_by_id(&self, id: &str) -> Result<Post> {
        if !is_valid_id(id) {
            return Err(Error::ContentNotFound(id.to_string()));
        }

        let path = self
            .extensions
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", id, ext)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| Error::ContentNotFound(id.to_string()))?;

        self.load_one(path)
    }

    /// Check if a file has one of the recognised content extensions
    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|ext| ext == e))
            .unwrap_or(false)
    }
}

/// A symlink whose target no longer exists
fn is_dangling_link(err: &walkdir::Error) -> bool {
    let target_missing = err
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound);
    target_missing
        && err
            .path()
            .and_then(|p| fs::symlink_metadata(p).ok())
            .is_some_and(|m| m.file_type().is_symlink())
}

/// Identifiers name a file directly inside the content directory
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\', '\0'])
        && !id.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn article(title: &str, date: &str, body: &str) -> String {
        format!(
            "---\nAuthor: Ada\nTitle: {}\nSynopsis: About {}\nCreatedAt: {}\nTags: [rust]\n---\n{}",
            title, title, date, body
        )
    }

    #[test]
    fn test_load_one() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "hello.md",
            &article("Hello", "2023-06-01", "# Heading\n\nSome *text*."),
        );

        let loader = ContentLoader::new(dir.path());
        let post = loader.load_one(&path).unwrap();
        assert_eq!(post.id, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.tags, vec!["rust"]);
        assert!(post.content.contains("<h1>Heading</h1>"));
        assert!(post.content.contains("<em>text</em>"));
        assert!(!post.content.contains("---"));
        assert!(!post.content.contains("Synopsis"));
    }

    #[test]
    fn test_word_count_ignores_markup() {
        let dir = TempDir::new().unwrap();
        let prose = vec!["**word**,"; 150].join(" ");
        let code = (0..40)
            .map(|i| format!("    let x{} = call(\"{}\");", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let body = format!("{}\n\n```rust\n{}\n```\n", prose, code);
        let path = write(&dir, "dense.md", &article("Dense", "2023-06-01", &body));

        let post = ContentLoader::new(dir.path()).load_one(&path).unwrap();
        // 150 prose words plus 4 per line of code
        assert_eq!(post.word_count, 150 + 40 * 4);
        assert_eq!(helpers::reading_minutes(post.word_count), 2);

        let short = write(&dir, "short.md", &article("Short", "2023-06-01", &prose));
        let post = ContentLoader::new(dir.path()).load_one(&short).unwrap();
        assert_eq!(post.word_count, 150);
        assert_eq!(helpers::reading_minutes(post.word_count), 1);
    }

    #[test]
    fn test_load_one_rejects_missing_separators() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path());

        for (name, content) in [
            ("none.md", "# Just markdown\n"),
            ("one.md", "---\nTitle: Half\n"),
            ("three.md", "---\nTitle: Extra\n---\nbody\n---\nmore\n"),
        ] {
            let path = write(&dir, name, content);
            let err = loader.load_one(&path).unwrap_err();
            assert!(
                matches!(err, Error::MalformedContent { .. }),
                "{}: {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_load_one_rejects_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.md", "---\nTitle: [unclosed\n---\nbody\n");
        let err = ContentLoader::new(dir.path()).load_one(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedContent { .. }));
    }

    #[test]
    fn test_load_one_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ContentLoader::new(dir.path())
            .load_one(dir.path().join("gone.md"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_all_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a-january.md", &article("January", "2023-01-01", "old"));
        write(&dir, "b-june.md", &article("June", "2023-06-01", "new"));
        write(&dir, "c-march.md", &article("March", "2023-03-15", "middle"));
        write(&dir, "notes.txt", "not a post");
        fs::create_dir(dir.path().join("drafts")).unwrap();
        write(&dir, "drafts/d.md", &article("Draft", "2024-01-01", "hidden"));

        let posts = ContentLoader::new(dir.path()).load_all().unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["June", "March", "January"]);
        for pair in posts.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_load_all_fails_on_malformed_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.md", &article("Good", "2023-01-01", "fine"));
        write(&dir, "broken.md", "no front matter here");

        let err = ContentLoader::new(dir.path()).load_all().unwrap_err();
        assert!(matches!(err, Error::MalformedContent { .. }));
    }

    #[test]
    fn test_load_all_can_skip_malformed_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.md", &article("Good", "2023-01-01", "fine"));
        write(&dir, "broken.md", "no front matter here");

        let posts = ContentLoader::new(dir.path())
            .with_policy(MalformedPolicy::Skip)
            .load_all()
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Good");
    }

    #[cfg(unix)]
    #[test]
    fn test_load_all_skips_dangling_links() {
        let dir = TempDir::new().unwrap();
        write(&dir, "real.md", &article("Real", "2023-01-01", "here"));
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("link.md"))
            .unwrap();

        for policy in [MalformedPolicy::Fail, MalformedPolicy::Skip] {
            let posts = ContentLoader::new(dir.path())
                .with_policy(policy)
                .load_all()
                .unwrap();
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].title, "Real");
        }
    }

    #[test]
    fn test_load_all_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = ContentLoader::new(dir.path().join("nope"))
            .load_all()
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_by_id() {
        let dir = TempDir::new().unwrap();
        write(&dir, "first-post.markdown", &article("First", "2023-01-01", "hi"));
        let loader = ContentLoader::new(dir.path());

        assert_eq!(loader.load_by_id("first-post").unwrap().title, "First");
        assert!(matches!(
            loader.load_by_id("second-post"),
            Err(Error::ContentNotFound(_))
        ));
    }

    #[test]
    fn test_load_by_id_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir(&content).unwrap();
        write(&dir, "secret.md", &article("Secret", "2023-01-01", "hidden"));

        let loader = ContentLoader::new(&content);
        for id in ["../secret", "", "..", ".hidden", "a/b"] {
            assert!(
                matches!(loader.load_by_id(id), Err(Error::ContentNotFound(_))),
                "id {:?}",
                id
            );
        }
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "post.txt", &article("Text", "2023-01-01", "plain"));
        write(&dir, "post.md", &article("Markdown", "2023-02-01", "md"));

        let posts = ContentLoader::new(dir.path())
            .with_extensions(vec!["txt".to_string()])
            .load_all()
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Text");
    }
}
