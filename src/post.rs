//! Post Model
//!
//! Records as served by the posts endpoint, plus the client-side filters
//! applied to them. Posts are never created or mutated locally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reaction counters attached to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub user_id: u64,
}

impl Post {
    /// Literal, case-sensitive substring match on title or body.
    /// An empty term matches every post.
    pub fn matches_term(&self, term: &str) -> bool {
        self.title.contains(term) || self.body.contains(term)
    }

    /// Whether the post carries exactly this tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Envelope returned by the collection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsPage {
    pub posts: Vec<Post>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Keep the posts matching `term`, preserving order
pub fn filter_posts(posts: &[Post], term: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| post.matches_term(term))
        .cloned()
        .collect()
}

/// Keep the posts matching `term` and, when given, carrying `tag`
pub fn filter_posts_by(posts: &[Post], term: &str, tag: Option<&str>) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| post.matches_term(term))
        .filter(|post| tag.map_or(true, |t| post.has_tag(t)))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated tags across a collection
pub fn unique_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Shorten `text` to at most `max_chars` characters, adding an ellipsis
/// when something was cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}\u{2026}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64, title: &str, body: &str, tags: &[&str]) -> Post {
        Post {
            id,
            title: title.to_string(),
            body: body.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            reactions: Reactions::default(),
            views: 0,
            user_id: 0,
        }
    }

    #[test]
    fn term_matches_title_or_body_case_sensitively() {
        let posts = vec![
            post(1, "Cats rule", "a cat sat here", &[]),
            post(2, "Dogs", "no cats here", &[]),
            post(3, "Cats only", "Nothing", &[]),
        ];
        let ids: Vec<u64> = filter_posts(&posts, "cat").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_term_keeps_everything_in_order() {
        let posts = vec![post(3, "c", "", &[]), post(1, "a", "", &[]), post(2, "b", "", &[])];
        assert_eq!(filter_posts(&posts, ""), posts);
    }

    #[test]
    fn tag_filter_requires_exact_tag() {
        let posts = vec![
            post(1, "one", "x", &["history", "crime"]),
            post(2, "two", "x", &["historyx"]),
            post(3, "three", "y", &["history"]),
        ];
        let ids: Vec<u64> = filter_posts_by(&posts, "x", Some("history"))
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(filter_posts_by(&posts, "", None).len(), 3);
    }

    #[test]
    fn unique_tags_sorted_and_deduplicated() {
        let posts = vec![
            post(1, "", "", &["love", "crime"]),
            post(2, "", "", &["crime", "american"]),
        ];
        assert_eq!(unique_tags(&posts), vec!["american", "crime", "love"]);
        assert!(unique_tags(&[]).is_empty());
    }

    #[test]
    fn deserializes_endpoint_payload() {
        let json = r#"{
            "posts": [{
                "id": 1,
                "title": "His mother had always taught him",
                "body": "His mother had always taught him not to ever think of himself as better than others.",
                "tags": ["history", "american", "crime"],
                "reactions": { "likes": 192, "dislikes": 25 },
                "views": 305,
                "userId": 121
            }, {
                "id": 2,
                "title": "Bare",
                "body": "Only the required fields"
            }],
            "total": 251,
            "skip": 0,
            "limit": 30
        }"#;
        let page: PostsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 251);
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].user_id, 121);
        assert_eq!(page.posts[0].reactions.likes, 192);
        assert!(page.posts[1].tags.is_empty());
    }

    #[test]
    fn payload_without_posts_is_rejected() {
        let result: Result<PostsPage, _> = serde_json::from_str(r#"{"message":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("héllo wörld", 6), "héllo\u{2026}");
    }
}
