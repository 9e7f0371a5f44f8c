use crate::feed::PostFeed;
use crate::logging;
use crate::preference::{Preference, ScrollMode};
use crate::tui::list::ListState;
use crate::tui::search::SearchState;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_millis(50);

pub struct App {
    // Data
    pub feed: PostFeed,
    pub scroll_mode: Preference<ScrollMode>,

    // Sub-states
    pub search: SearchState,
    pub list: ListState,

    pub status_message: String,
    pub spinner_frame: usize,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(mut feed: PostFeed, scroll_mode: Preference<ScrollMode>) -> Self {
        feed.set_scroll_mode(*scroll_mode.get());
        let search = SearchState {
            query: feed.search_input().to_string(),
            cursor_pos: feed.search_input().len(),
            ..SearchState::default()
        };

        Self {
            feed,
            scroll_mode,
            search,
            list: ListState::default(),
            status_message: "Loading posts...".to_string(),
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                self.tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Advance the feed and resync the list with whatever it published
    pub fn tick(&mut self, now: Instant) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        let was_loading = self.feed.is_loading();

        if self.feed.tick(now) {
            if was_loading && !self.feed.is_loading() {
                // A new result set landed
                self.list.reset(self.feed.visible_posts().len());
                self.status_message = match self.feed.error() {
                    Some(_) => "Failed to load posts".to_string(),
                    None => format!("{} posts", self.feed.posts().len()),
                };
            } else {
                self.list.clamp(self.feed.visible_posts().len());
            }
        }
    }

    // --- Actions ---

    fn on_search_edit(&mut self, now: Instant) {
        self.feed.set_search_term(self.search.query.clone(), now);
    }

    pub fn toggle_scroll_mode(&mut self) {
        let mode = self.scroll_mode.get().toggled();
        self.scroll_mode.set(mode);
        self.feed.set_scroll_mode(mode);
        self.list.reset(self.feed.visible_posts().len());
        self.status_message = format!("Scroll mode: {}", mode.as_str());
        logging::info("APP", &self.status_message);
    }

    /// Step through: no tag, then each known tag in order, then no tag again
    pub fn cycle_tag(&mut self) {
        let tags = self.feed.unique_tags();
        let next = match self.feed.tag() {
            None => tags.first().cloned(),
            Some(current) => tags
                .iter()
                .position(|t| t == current)
                .and_then(|i| tags.get(i + 1))
                .cloned(),
        };
        self.status_message = match &next {
            Some(tag) => format!("Tag: #{}", tag),
            None => "All tags".to_string(),
        };
        self.feed.set_tag(next);
        self.list.reset(self.feed.visible_posts().len());
    }

    pub fn open_selected(&mut self) {
        let id = self
            .list
            .selected
            .and_then(|i| self.feed.visible_posts().get(i))
            .map(|post| post.id);
        if let Some(id) = id {
            self.feed.select_post(id);
        }
    }

    fn select_next(&mut self) {
        let total = self.feed.visible_posts().len();
        if self.list.is_at_end(total) && self.feed.load_more() {
            self.status_message = format!(
                "Showing {} of {} posts",
                self.feed.visible_posts().len(),
                self.feed.posts().len()
            );
        }
        self.list.select_next(self.feed.visible_posts().len());
    }

    fn change_page(&mut self, forward: bool) {
        let moved = if forward {
            self.feed.next_page()
        } else {
            self.feed.prev_page()
        };
        if moved {
            self.list.reset(self.feed.visible_posts().len());
            self.status_message = format!(
                "Page {} of {}",
                self.feed.current_page() + 1,
                self.feed.page_count()
            );
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.toggle_scroll_mode();
                return;
            }
            KeyCode::Char('t') if ctrl => {
                self.cycle_tag();
                return;
            }
            KeyCode::Char('n') if ctrl => {
                self.change_page(true);
                return;
            }
            KeyCode::Char('p') if ctrl => {
                self.change_page(false);
                return;
            }
            KeyCode::F(5) => {
                self.feed.refresh();
                self.status_message = "Reloading...".to_string();
                return;
            }
            KeyCode::Esc => {
                if self.feed.selected().is_some() || self.feed.is_selecting() {
                    self.feed.clear_selection();
                } else if self.search.focused && !self.search.query.is_empty() {
                    self.search.clear();
                    self.on_search_edit(now);
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.feed.selected().is_some() {
            // Detail view swallows everything else but Enter
            if key.code == KeyCode::Enter {
                self.feed.clear_selection();
            }
            return;
        }

        if self.search.focused {
            self.handle_search_key(key, now);
        } else {
            self.handle_list_key(key, now);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert_char(c);
                self.on_search_edit(now);
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.on_search_edit(now);
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.on_search_edit(now);
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
                self.list.clamp(self.feed.visible_posts().len());
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, now: Instant) {
        let total = self.feed.visible_posts().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::PageUp => self.list.page_up(),
            KeyCode::PageDown => self.list.page_down(total),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(total),
            KeyCode::Right => self.change_page(true),
            KeyCode::Left => self.change_page(false),
            KeyCode::Enter => self.open_selected(),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.push_char(c);
                self.on_search_edit(now);
            }

            _ => {}
        }
    }
}
