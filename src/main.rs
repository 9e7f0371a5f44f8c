//! BlogView CLI
//!
//! Command-line interface for the blog viewer.
//! Runs the interactive terminal UI by default; the other commands are
//! one-shot queries against the same feed.

use blogview::feed::FeedConfig;
use blogview::post::excerpt;
use blogview::preference::{self, ScrollMode};
use blogview::tui::App;
use blogview::{logging, AppConfig, BlogViewError, HttpPostSource, PostFeed, Storage};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// BlogView - terminal blog viewer
///
/// Browses the posts of a public demo API with debounced search,
/// tag filtering and infinite scroll or pagination.
#[derive(Parser)]
#[command(name = "blogview")]
#[command(author = "BlogView Contributors")]
#[command(version)]
#[command(about = "Terminal blog viewer", long_about = None)]
struct Cli {
    /// API root serving /posts (default: https://dummyjson.com)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for preferences and the log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse posts interactively (default)
    Tui {
        /// Initial search term
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Print posts whose title or body contains a term
    Search {
        /// Case-sensitive search term (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true, default_value = "")]
        term: String,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Posts per page
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Page to print, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// List the tags used across all posts
    Tags,

    /// Show a single post
    Show {
        /// Post id
        id: u64,
    },

    /// Inspect or change stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print stored preferences
    Show,
    /// Choose between infinite scroll and pagination
    SetScrollMode {
        /// infinite or paginated
        mode: ScrollMode,
    },
    /// Forget stored preferences
    Reset,
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.api_url, cli.data_dir);

    let log_path = logging::init(&config.data_dir);
    logging::separator("startup");
    logging::info(
        "MAIN",
        &format!(
            "BlogView {} starting up (api: {}, log: {})",
            blogview::VERSION,
            config.api_base_url,
            log_path.display()
        ),
    );

    let command = cli.command.unwrap_or(Commands::Tui {
        query: String::new(),
    });

    let result = match command {
        Commands::Tui { query } => cmd_tui(&config, query),

        Commands::Search {
            term,
            tag,
            limit,
            page,
            output,
        } => cmd_search(&config, term, tag, limit, page, &output),

        Commands::Tags => cmd_tags(&config),

        Commands::Show { id } => cmd_show(&config, id),

        Commands::Prefs { action } => cmd_prefs(&config, action),
    };

    logging::flush();

    if let Err(e) = result {
        logging::error("MAIN", &e.to_string());
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn open_feed(config: &AppConfig, feed_config: FeedConfig) -> blogview::Result<PostFeed> {
    let source = HttpPostSource::new(&config.api_base_url, config.request_timeout)?;
    Ok(PostFeed::new(Arc::new(source), feed_config, Instant::now()))
}

/// Run the feed's outstanding work to completion behind a spinner
fn wait_with_spinner(
    feed: &mut PostFeed,
    config: &AppConfig,
    message: &str,
) -> blogview::Result<Duration> {
    let start = Instant::now();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = feed.wait_idle(config.request_timeout + Duration::from_secs(1));
    spinner.finish_and_clear();
    result?;

    match feed.error() {
        Some(message) => Err(BlogViewError::Retrieval(message.to_string())),
        None => Ok(start.elapsed()),
    }
}

/// Interactive terminal UI
fn cmd_tui(config: &AppConfig, query: String) -> blogview::Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(config.storage());
    let scroll_mode = preference::scroll_mode(storage);

    let feed = open_feed(
        config,
        FeedConfig {
            search_term: query,
            ..config.feed_config()
        },
    )?;
    let mut app = App::new(feed, scroll_mode);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    logging::info("MAIN", "BlogView shutting down");
    result
}

/// Search command implementation
fn cmd_search(
    config: &AppConfig,
    term: String,
    tag: Option<String>,
    limit: usize,
    page: usize,
    output_format: &str,
) -> blogview::Result<()> {
    let mut feed = open_feed(
        config,
        FeedConfig {
            search_term: term.clone(),
            tag: tag.clone(),
            page_size: limit,
            scroll_mode: ScrollMode::Paginated,
            ..config.feed_config()
        },
    )?;
    feed.refresh();
    let elapsed = wait_with_spinner(&mut feed, config, "Fetching posts...")?;

    for _ in 1..page {
        if !feed.next_page() {
            break;
        }
    }

    if output_format == "json" {
        println!(
            "{}",
            serde_json::json!({
                "term": term,
                "tag": tag,
                "page": feed.current_page() + 1,
                "pages": feed.page_count(),
                "matches": feed.posts().len(),
                "total": feed.all_posts().len(),
                "posts": feed.visible_posts(),
            })
        );
        return Ok(());
    }

    println!(
        "{} {} of {} posts match '{}'{} ({})",
        style("→").cyan().bold(),
        style(feed.posts().len()).green(),
        feed.all_posts().len(),
        style(&term).yellow(),
        tag.as_deref()
            .map(|t| format!(" tagged #{}", t))
            .unwrap_or_default(),
        HumanDuration(elapsed)
    );
    println!();

    if feed.visible_posts().is_empty() {
        println!("  {}", style("No posts available").dim());
        return Ok(());
    }

    for post in feed.visible_posts() {
        println!(
            "  {} {}",
            style(format!("{:>4}.", post.id)).dim(),
            style(&post.title).cyan().bold()
        );
        println!("        {}", excerpt(&post.body, 100));
        if !post.tags.is_empty() {
            let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
            println!("        {}", style(tags.join(" ")).magenta());
        }
    }

    println!();
    println!(
        "  Page {} of {}",
        feed.current_page() + 1,
        feed.page_count()
    );

    Ok(())
}

/// Tags command implementation
fn cmd_tags(config: &AppConfig) -> blogview::Result<()> {
    let mut feed = open_feed(config, config.feed_config())?;
    feed.refresh();
    wait_with_spinner(&mut feed, config, "Fetching posts...")?;

    let tags = feed.unique_tags();
    println!(
        "{} {} tags across {} posts:",
        style("→").cyan().bold(),
        style(tags.len()).green(),
        feed.all_posts().len()
    );
    println!();

    for tag in &tags {
        let count = feed.all_posts().iter().filter(|p| p.has_tag(tag)).count();
        println!(
            "  {} {}",
            style(format!("{:>4}", count)).yellow(),
            style(format!("#{}", tag)).magenta()
        );
    }

    Ok(())
}

/// Show command implementation
fn cmd_show(config: &AppConfig, id: u64) -> blogview::Result<()> {
    let mut feed = open_feed(config, config.feed_config())?;
    feed.cancel_pending();
    feed.select_post(id);
    wait_with_spinner(&mut feed, config, &format!("Fetching post {}...", id))?;

    let post = feed.selected().ok_or(BlogViewError::PostNotFound(id))?;

    println!(
        "{} {}",
        style(format!("#{}", post.id)).dim(),
        style(&post.title).cyan().bold()
    );
    println!();
    println!("{}", post.body);
    println!();
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("  {} {}", style("Tags:").bold(), style(tags.join(" ")).magenta());
    }
    println!(
        "  {} {} likes, {} dislikes",
        style("Reactions:").bold(),
        post.reactions.likes,
        post.reactions.dislikes
    );
    println!("  {} {}", style("Views:").bold(), post.views);
    println!("  {} {}", style("Author:").bold(), post.user_id);

    Ok(())
}

/// Prefs command implementation
fn cmd_prefs(config: &AppConfig, action: PrefsAction) -> blogview::Result<()> {
    let file_storage = config.storage();
    let path = file_storage.path_for(preference::SCROLL_MODE_KEY)?;
    let storage: Arc<dyn Storage> = Arc::new(file_storage);
    let mut scroll_mode = preference::scroll_mode(storage);

    match action {
        PrefsAction::Show => {}
        PrefsAction::SetScrollMode { mode } => {
            scroll_mode.set(mode);
            println!(
                "{} Scroll mode set to {}",
                style("✓").green().bold(),
                style(mode.as_str()).yellow()
            );
        }
        PrefsAction::Reset => {
            scroll_mode.remove();
            println!("{} Preferences reset", style("✓").green().bold());
            return Ok(());
        }
    }

    println!(
        "  {} {}",
        style("Scroll mode:").bold(),
        style(scroll_mode.get().as_str()).yellow()
    );
    println!("  {} {}", style("Stored in:").bold(), path.display());

    Ok(())
}
