//! Post Feed
//!
//! Owns retrieval of the post collection and everything derived from it:
//! the debounced search term, client-side search and tag filtering, the
//! paging window and the loading / error flags read by the display layer.
//!
//! Requests run on short-lived worker threads that report back over a
//! channel. The feed is driven by [`PostFeed::tick`]; nothing changes
//! between ticks. Every request carries a sequence number and only the
//! reply to the latest one is applied, so a slow earlier response can
//! never overwrite a newer result.

use crate::debounce::Debouncer;
use crate::error::{BlogViewError, Result};
use crate::logging;
use crate::post::{filter_posts_by, unique_tags, Post};
use crate::preference::ScrollMode;
use crate::source::PostSource;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Quiet period between the last search edit and the fetch it triggers
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Posts per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Initial search term
    pub search_term: String,
    /// Initial tag filter
    pub tag: Option<String>,
    /// Posts per page
    pub page_size: usize,
    /// Growing list or one page at a time
    pub scroll_mode: ScrollMode,
    /// Delay between the last search edit and the fetch
    pub quiet_period: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            tag: None,
            page_size: DEFAULT_PAGE_SIZE,
            scroll_mode: ScrollMode::Infinite,
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

/// Replies from worker threads
enum FeedMessage {
    Posts {
        seq: u64,
        term: String,
        result: Result<Vec<Post>>,
    },
    Post {
        seq: u64,
        id: u64,
        result: Result<Post>,
    },
}

pub struct PostFeed {
    source: Arc<dyn PostSource>,

    // Filters
    search: Debouncer<String>,
    tag: Option<String>,

    // Data
    all_posts: Vec<Post>,
    posts: Vec<Post>,
    applied_term: String,
    selected: Option<Post>,

    // Status
    loading: bool,
    selecting: bool,
    error: Option<String>,

    // Paging
    page_size: usize,
    scroll_mode: ScrollMode,
    pages_loaded: usize,
    page: usize,

    // Sequencing
    fetch_seq: u64,
    lookup_seq: u64,
    requests_issued: u64,

    // Channel
    tx: Sender<FeedMessage>,
    rx: Receiver<FeedMessage>,
}

impl PostFeed {
    /// Create a feed. The first fetch is armed immediately and goes out
    /// once the quiet period has elapsed after `now`.
    pub fn new(source: Arc<dyn PostSource>, config: FeedConfig, now: Instant) -> Self {
        let (tx, rx) = unbounded();
        let mut search = Debouncer::with_delay(config.search_term.clone(), config.quiet_period);
        search.schedule(config.search_term, now);

        Self {
            source,
            search,
            tag: config.tag,
            all_posts: Vec::new(),
            posts: Vec::new(),
            applied_term: String::new(),
            selected: None,
            loading: true,
            selecting: false,
            error: None,
            page_size: config.page_size.max(1),
            scroll_mode: config.scroll_mode,
            pages_loaded: 1,
            page: 0,
            fetch_seq: 0,
            lookup_seq: 0,
            requests_issued: 0,
            tx,
            rx,
        }
    }

    // --- Accessors ---

    /// Filtered posts from the last successful fetch
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// The full collection from the last successful fetch
    pub fn all_posts(&self) -> &[Post] {
        &self.all_posts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A single-post lookup is outstanding
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.selecting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Post> {
        self.selected.as_ref()
    }

    /// The latest search input, settled or not
    pub fn search_input(&self) -> &str {
        self.search.pending().unwrap_or(self.search.value())
    }

    /// The search term the current posts were filtered with
    pub fn applied_term(&self) -> &str {
        &self.applied_term
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll_mode
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of network requests sent so far
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }

    /// When the pending search will be fetched, if one is waiting
    pub fn next_fetch_at(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Sorted tags of the fetched collection
    pub fn unique_tags(&self) -> Vec<String> {
        unique_tags(&self.all_posts)
    }

    // --- Inputs ---

    /// Record a search edit. The fetch waits for the quiet period.
    pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) {
        self.search.set(term.into(), now);
    }

    /// Change the tag filter. Filters the cached collection, no request.
    pub fn set_tag(&mut self, tag: Option<String>) {
        if self.tag == tag {
            return;
        }
        self.tag = tag;
        self.refilter();
    }

    pub fn set_scroll_mode(&mut self, mode: ScrollMode) {
        if self.scroll_mode != mode {
            self.scroll_mode = mode;
            self.reset_window();
        }
    }

    /// Fetch right away for the latest search input, skipping whatever is
    /// left of its quiet period
    pub fn refresh(&mut self) {
        self.search.flush();
        let term = self.search.value().clone();
        self.issue_fetch(term);
    }

    /// Look up a single post in the background
    pub fn select_post(&mut self, id: u64) {
        self.lookup_seq += 1;
        self.selecting = true;
        self.requests_issued += 1;

        let seq = self.lookup_seq;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        logging::debug("FEED", &format!("Lookup #{} for post {}", seq, id));

        thread::spawn(move || {
            let result = source.fetch_post(id);
            let _ = tx.send(FeedMessage::Post { seq, id, result });
        });
    }

    /// Close the selected post. An outstanding lookup is ignored when it lands.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.selecting = false;
        self.lookup_seq += 1;
    }

    /// Drop a pending search edit without fetching it
    pub fn cancel_pending(&mut self) {
        self.search.cancel();
        if self.fetch_seq == 0 {
            // Only the initial fetch was armed; nothing is in flight
            self.loading = false;
        }
    }

    // --- Driving ---

    /// Advance the feed: fire the debounced fetch if its quiet period has
    /// elapsed, then apply any worker replies. Returns true if anything
    /// visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(term) = self.search.poll(now).cloned() {
            self.issue_fetch(term);
            changed = true;
        }
        self.process_messages() || changed
    }

    /// Apply every reply already received, without blocking
    pub fn process_messages(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.apply(msg);
        }
        changed
    }

    /// Block until one worker reply has been applied or discarded
    pub fn wait_message(&mut self, timeout: Duration) -> Result<bool> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => Ok(self.apply(msg)),
            Err(_) => Err(BlogViewError::Timeout("worker reply".to_string())),
        }
    }

    /// Block until no fetch or lookup is outstanding
    pub fn wait_idle(&mut self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(BlogViewError::Timeout("posts".to_string()));
            }
            self.wait_message(remaining)?;
        }
        Ok(())
    }

    fn issue_fetch(&mut self, term: String) {
        self.fetch_seq += 1;
        self.requests_issued += 1;
        self.loading = true;

        let seq = self.fetch_seq;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        logging::info("FEED", &format!("Fetch #{} for term {:?}", seq, term));

        thread::spawn(move || {
            let result = source.fetch_posts();
            let _ = tx.send(FeedMessage::Posts { seq, term, result });
        });
    }

    fn apply(&mut self, msg: FeedMessage) -> bool {
        match msg {
            FeedMessage::Posts { seq, term, result } => {
                if seq != self.fetch_seq {
                    logging::debug(
                        "FEED",
                        &format!("Dropping stale fetch #{} (latest #{})", seq, self.fetch_seq),
                    );
                    return false;
                }
                self.loading = false;
                match result {
                    Ok(posts) => {
                        self.all_posts = posts;
                        self.applied_term = term;
                        self.error = None;
                        self.refilter();
                        logging::info(
                            "FEED",
                            &format!(
                                "Fetch #{}: {} of {} posts match",
                                seq,
                                self.posts.len(),
                                self.all_posts.len()
                            ),
                        );
                    }
                    Err(e) => {
                        logging::warn("FEED", &format!("Fetch #{} failed: {}", seq, e));
                        self.error = Some(e.to_string());
                    }
                }
                true
            }
            FeedMessage::Post { seq, id, result } => {
                if seq != self.lookup_seq {
                    logging::debug("FEED", &format!("Dropping stale lookup #{}", seq));
                    return false;
                }
                self.selecting = false;
                match result {
                    Ok(post) => self.selected = Some(post),
                    Err(e) => {
                        logging::warn("FEED", &format!("Lookup of post {} failed: {}", id, e));
                        self.error = Some(e.to_string());
                    }
                }
                true
            }
        }
    }

    fn refilter(&mut self) {
        self.posts = filter_posts_by(&self.all_posts, &self.applied_term, self.tag.as_deref());
        self.reset_window();
    }

    // --- Paging ---

    fn reset_window(&mut self) {
        self.pages_loaded = 1;
        self.page = 0;
    }

    /// Number of pages of filtered posts (at least one)
    pub fn page_count(&self) -> usize {
        self.posts.len().div_ceil(self.page_size).max(1)
    }

    /// Zero-based current page in paginated mode
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// The slice of posts the display layer should render
    pub fn visible_posts(&self) -> &[Post] {
        let len = self.posts.len();
        match self.scroll_mode {
            ScrollMode::Infinite => {
                let end = (self.pages_loaded * self.page_size).min(len);
                &self.posts[..end]
            }
            ScrollMode::Paginated => {
                let start = (self.page * self.page_size).min(len);
                let end = (start + self.page_size).min(len);
                &self.posts[start..end]
            }
        }
    }

    /// More posts exist past the visible window
    pub fn has_more(&self) -> bool {
        match self.scroll_mode {
            ScrollMode::Infinite => self.posts.len() > self.pages_loaded * self.page_size,
            ScrollMode::Paginated => (self.page + 1) * self.page_size < self.posts.len(),
        }
    }

    /// Grow the infinite list by one page. Returns false if nothing was added.
    pub fn load_more(&mut self) -> bool {
        if self.scroll_mode != ScrollMode::Infinite || !self.has_more() {
            return false;
        }
        self.pages_loaded += 1;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.scroll_mode != ScrollMode::Paginated || !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.scroll_mode != ScrollMode::Paginated || self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }
}
