//! BlogView - terminal blog viewer
//!
//! Browses the posts of a public demo API with search-as-you-type.
//!
//! # Features
//!
//! - **Debounced search**: edits settle for a quiet period before a fetch
//! - **Client-side filtering**: case-sensitive substring match on title or
//!   body, plus an optional tag filter
//! - **Paging**: infinite scroll or one page at a time
//! - **Persistence**: the scroll mode survives restarts
//!
//! # Example
//!
//! ```no_run
//! use blogview::{AppConfig, FeedConfig, HttpPostSource, PostFeed};
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//!
//! fn main() -> blogview::Result<()> {
//!     let config = AppConfig::default();
//!     let source = HttpPostSource::new(&config.api_base_url, config.request_timeout)?;
//!
//!     let feed_config = FeedConfig {
//!         search_term: "love".to_string(),
//!         ..config.feed_config()
//!     };
//!     let mut feed = PostFeed::new(Arc::new(source), feed_config, Instant::now());
//!     feed.refresh();
//!     feed.wait_idle(Duration::from_secs(10))?;
//!
//!     for post in feed.posts() {
//!         println!("{}: {}", post.id, post.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod debounce;
pub mod error;
pub mod feed;
pub mod logging;
pub mod post;
pub mod preference;
pub mod source;
pub mod storage;
pub mod tui;

// Re-export main types
pub use debounce::Debouncer;
pub use error::{BlogViewError, Result};
pub use feed::{FeedConfig, PostFeed};
pub use post::{filter_posts, Post, PostsPage};
pub use preference::{Preference, ScrollMode};
pub use source::{HttpPostSource, PostSource};
pub use storage::{FileStorage, MemoryStorage, Storage};

use std::path::PathBuf;
use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the API root
pub const API_URL_ENV: &str = "BLOGVIEW_API_URL";

/// Overrides the data directory (preferences and log file)
pub const DATA_DIR_ENV: &str = "BLOGVIEW_DATA_DIR";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API root; posts are read from `<root>/posts`
    pub api_base_url: String,
    /// Where preferences and the log file live
    pub data_dir: PathBuf,
    /// Delay between the last search edit and the fetch
    pub quiet_period: Duration,
    /// Posts per page
    pub page_size: usize,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: source::DEFAULT_BASE_URL.to_string(),
            data_dir: default_data_dir(),
            quiet_period: feed::DEFAULT_QUIET_PERIOD,
            page_size: feed::DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATA_DIR_ENV).ok().map(PathBuf::from),
        )
    }

    /// Apply optional overrides; blank values are ignored
    pub fn with_overrides(mut self, api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(dir) = data_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.data_dir = dir;
        }
        self
    }

    /// Storage for preferences inside the data directory
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.data_dir.join("prefs"))
    }

    /// Feed settings derived from this configuration
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            page_size: self.page_size,
            quiet_period: self.quiet_period,
            ..FeedConfig::default()
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("blogview"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://dummyjson.com");
        assert_eq!(config.quiet_period, Duration::from_millis(1000));
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn overrides_skip_blank_values() {
        let config = AppConfig::default().with_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api_base_url, "https://dummyjson.com");

        let config = AppConfig::default().with_overrides(
            Some("http://localhost:9000".to_string()),
            Some(PathBuf::from("/tmp/bv")),
        );
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.storage().dir(), std::path::Path::new("/tmp/bv/prefs"));
        assert_eq!(config.feed_config().quiet_period, config.quiet_period);
    }
}
