//! Post Sources
//!
//! Where posts come from. [`HttpPostSource`] talks to the demo API; the
//! request for the collection never carries search, tag or paging
//! parameters, all of that is applied client-side by the feed.

use crate::error::{BlogViewError, Result};
use crate::logging;
use crate::post::{Post, PostsPage};
use reqwest::blocking::Client;
use std::time::Duration;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Retrieval of posts, run from worker threads
pub trait PostSource: Send + Sync {
    /// The whole post collection
    fn fetch_posts(&self) -> Result<Vec<Post>>;

    /// A single post by id
    fn fetch_post(&self, id: u64) -> Result<Post>;
}

/// Blocking HTTP client for the posts endpoint
pub struct HttpPostSource {
    client: Client,
    base_url: String,
}

impl HttpPostSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("blogview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BlogViewError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the collection endpoint
    pub fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    /// URL of a single post
    pub fn post_url(&self, id: u64) -> String {
        format!("{}/posts/{}", self.base_url, id)
    }

    fn get_body(&self, url: &str) -> Result<(u16, String)> {
        logging::debug("HTTP", &format!("GET {}", url));
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| BlogViewError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|source| BlogViewError::Request {
            url: url.to_string(),
            source,
        })?;
        logging::debug("HTTP", &format!("GET {} -> {} ({} bytes)", url, status, body.len()));
        Ok((status, body))
    }
}

impl PostSource for HttpPostSource {
    fn fetch_posts(&self) -> Result<Vec<Post>> {
        let url = self.posts_url();
        let (status, body) = self.get_body(&url)?;
        if !(200..300).contains(&status) {
            return Err(BlogViewError::Status { url, status });
        }
        let page: PostsPage =
            serde_json::from_str(&body).map_err(|source| BlogViewError::Decode {
                url: url.clone(),
                source,
            })?;
        Ok(page.posts)
    }

    fn fetch_post(&self, id: u64) -> Result<Post> {
        let url = self.post_url(id);
        let (status, body) = self.get_body(&url)?;
        match status {
            404 => Err(BlogViewError::PostNotFound(id)),
            200..=299 => serde_json::from_str(&body)
                .map_err(|source| BlogViewError::Decode { url, source }),
            _ => Err(BlogViewError::Status { url, status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_never_carry_query_parameters() {
        let source =
            HttpPostSource::new("https://dummyjson.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.base_url(), "https://dummyjson.com");
        assert_eq!(source.posts_url(), "https://dummyjson.com/posts");
        assert_eq!(source.post_url(7), "https://dummyjson.com/posts/7");
    }
}
