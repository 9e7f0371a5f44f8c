//! HttpPostSource against a local server

use blogview::{BlogViewError, FeedConfig, HttpPostSource, PostFeed, PostSource};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tiny_http::{Header, Response, Server};

const POSTS_JSON: &str = r#"{
  "posts": [
    {
      "id": 1,
      "title": "His mother had always taught him",
      "body": "His mother had always taught him not to ever think of himself as better than others.",
      "tags": ["history", "american", "crime"],
      "reactions": { "likes": 192, "dislikes": 25 },
      "views": 305,
      "userId": 121
    },
    {
      "id": 2,
      "title": "He was an expert but not in a discipline",
      "body": "He was an expert but not in a discipline that anyone could fully appreciate.",
      "tags": ["french", "fiction", "english"],
      "reactions": { "likes": 859, "dislikes": 32 },
      "views": 4884,
      "userId": 91
    }
  ],
  "total": 251,
  "skip": 0,
  "limit": 30
}"#;

const POST_JSON: &str = r#"{
  "id": 2,
  "title": "He was an expert but not in a discipline",
  "body": "He was an expert but not in a discipline that anyone could fully appreciate.",
  "tags": ["french", "fiction", "english"],
  "reactions": { "likes": 859, "dislikes": 32 },
  "views": 4884,
  "userId": 91
}"#;

/// Serves canned bodies by path and records every requested URL
struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    fn start(routes: &[(&str, u16, &str)]) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for request in server.incoming_requests() {
                let url = request.url().to_string();
                seen.lock().push(url.clone());
                let (status, body) = routes
                    .get(&url)
                    .cloned()
                    .unwrap_or((404, r#"{"message":"not found"}"#.to_string()));
                let header =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }

    fn source(&self) -> HttpPostSource {
        HttpPostSource::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[test]
fn fetches_and_decodes_the_collection() {
    let server = TestServer::start(&[("/posts", 200, POSTS_JSON)]);
    let posts = server.source().fetch_posts().unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[0].tags, vec!["history", "american", "crime"]);
    assert_eq!(posts[1].reactions.likes, 859);
    assert_eq!(posts[1].user_id, 91);
    assert_eq!(server.requests(), vec!["/posts"]);
}

#[test]
fn error_status_is_a_failure() {
    let server = TestServer::start(&[("/posts", 500, r#"{"message":"boom"}"#)]);
    let err = server.source().fetch_posts().unwrap_err();

    assert!(matches!(err, BlogViewError::Status { status: 500, .. }));
    assert!(err.is_retrieval());
}

#[test]
fn malformed_body_is_a_failure() {
    let server = TestServer::start(&[("/posts", 200, "<html>not json</html>")]);
    let err = server.source().fetch_posts().unwrap_err();

    assert!(matches!(err, BlogViewError::Decode { .. }));
    assert!(err.to_string().contains("/posts"));
}

#[test]
fn unreachable_server_is_a_failure() {
    // Bind then drop to get a port nobody listens on
    let port = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap().port()
    };
    let source =
        HttpPostSource::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2)).unwrap();
    let err = source.fetch_posts().unwrap_err();

    assert!(matches!(err, BlogViewError::Request { .. }));
}

#[test]
fn single_post_lookup() {
    let server = TestServer::start(&[("/posts/2", 200, POST_JSON)]);
    let source = server.source();

    let post = source.fetch_post(2).unwrap();
    assert_eq!(post.id, 2);
    assert_eq!(post.views, 4884);

    let err = source.fetch_post(999).unwrap_err();
    assert!(matches!(err, BlogViewError::PostNotFound(999)));
    assert_eq!(server.requests(), vec!["/posts/2", "/posts/999"]);
}

#[test]
fn feed_filters_client_side_with_a_fixed_request() {
    let server = TestServer::start(&[("/posts", 200, POSTS_JSON)]);
    let t0 = Instant::now();
    let config = FeedConfig {
        search_term: "expert".to_string(),
        tag: Some("fiction".to_string()),
        ..Default::default()
    };
    let mut feed = PostFeed::new(Arc::new(server.source()), config, t0);

    feed.tick(t0 + Duration::from_millis(1000));
    feed.wait_idle(Duration::from_secs(5)).unwrap();
    assert_eq!(feed.posts().len(), 1);
    assert_eq!(feed.posts()[0].id, 2);

    feed.set_search_term("mother", t0 + Duration::from_millis(1000));
    feed.set_tag(None);
    feed.tick(t0 + Duration::from_millis(2000));
    feed.wait_idle(Duration::from_secs(5)).unwrap();
    assert_eq!(feed.posts().len(), 1);
    assert_eq!(feed.posts()[0].id, 1);

    // Term and tag never reach the URL
    assert_eq!(server.requests(), vec!["/posts", "/posts"]);
}
