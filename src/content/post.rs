//! Post model

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::FrontMatter;

/// A blog post, built from one content file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Post {
    /// Identifier used in URLs (file stem)
    pub id: String,

    pub author: String,

    pub title: String,

    pub synopsis: String,

    /// Publication date, `None` when the front matter omits it
    pub created_at: Option<DateTime<Utc>>,

    pub tags: Vec<String>,

    /// Optional numeric identifier from the front matter
    pub article_id: Option<i64>,

    /// Words in the markdown body, markup excluded
    pub word_count: usize,

    /// Rendered HTML body
    pub content: String,
}

impl Post {
    /// Create a post from its parsed front matter
    pub fn new(id: impl Into<String>, fm: FrontMatter) -> Self {
        Self {
            id: id.into(),
            author: fm.author,
            title: fm.title,
            synopsis: fm.synopsis,
            created_at: fm.created_at,
            tags: fm.tags,
            article_id: fm.article_id,
            word_count: 0,
            content: String::new(),
        }
    }
}

/// Sort posts newest first; posts without a date go last.
///
/// The sort is stable, so posts sharing a timestamp keep their input order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(id: &str, date: Option<(i32, u32, u32)>) -> Post {
        Post {
            id: id.to_string(),
            created_at: date.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            post("jan", Some((2023, 1, 1))),
            post("undated", None),
            post("jun", Some((2023, 6, 1))),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(ids(&posts), vec!["jun", "jan", "undated"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut posts = vec![
            post("a", Some((2023, 1, 1))),
            post("b", Some((2023, 1, 1))),
            post("c", Some((2024, 1, 1))),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(ids(&posts), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_serialized_post_fields() {
        let mut p = post("hello", Some((2023, 6, 1)));
        p.word_count = 2;
        p.content = "<h1>Hello there</h1>".to_string();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["word_count"], 2);
        assert_eq!(json["content"], "<h1>Hello there</h1>");
        assert_eq!(json["created_at"], "2023-06-01T00:00:00Z");
    }
}
