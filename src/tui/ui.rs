use crate::post::Post;
use crate::preference::ScrollMode;
use crate::tui::app::App;
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows per card: title, excerpt, tags, spacer
const CARD_HEIGHT: u16 = 4;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const EMPTY_MESSAGE: &str = "No posts available";
pub const ERROR_MESSAGE: &str = "An error occurred while loading posts";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let banner_height = if app.feed.error().is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Length(3),             // Search bar
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(CARD_HEIGHT),      // Posts
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    if banner_height > 0 {
        draw_error_banner(frame, app, chunks[2]);
    }
    draw_posts(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    if let Some(post) = app.feed.selected() {
        draw_post_details(frame, post, area);
    } else if app.search.focused {
        // Border (1) + space (1) + search icon (2) + space (1)
        let cursor_x = chunks[1].x + 5 + app.search.before_cursor().width() as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mode = app.feed.scroll_mode();
    let left = " Blog".to_string();
    let right = format!(
        "{} {}{} ",
        colors::scroll_mode_icon(mode),
        mode.as_str(),
        app.feed
            .tag()
            .map(|t| format!("  #{}", t))
            .unwrap_or_default()
    );
    let padding = (area.width as usize).saturating_sub(left.width() + right.width());
    let line = Line::from(vec![
        Span::styled(left, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 50))),
        area,
    );
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let search_text = format!(" \u{1F50D} {}", app.search.query);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let detail = app.feed.error().unwrap_or_default();
    let text = vec![
        Line::from(Span::styled(
            ERROR_MESSAGE,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            truncate_to_width(detail, area.width.saturating_sub(2) as usize),
            Style::default().fg(Color::White),
        ))
        .alignment(Alignment::Center),
    ];
    let banner = Paragraph::new(text).style(Style::default().bg(Color::Rgb(120, 20, 30)));
    frame.render_widget(Clear, area);
    frame.render_widget(banner, area);
}

fn draw_posts(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list.visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

    let posts = app.feed.visible_posts();
    if posts.is_empty() {
        let message = if app.feed.is_loading() {
            format!(
                "{} Loading posts...",
                SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()]
            )
        } else {
            EMPTY_MESSAGE.to_string()
        };
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::LightBlue))
            .block(Block::default().borders(Borders::NONE));
        let top = area.y + area.height / 2;
        frame.render_widget(placeholder, Rect::new(area.x, top, area.width, 1.min(area.height)));
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let start = app.list.scroll_offset.min(posts.len());
    let end = (start + app.list.visible_rows).min(posts.len());

    let mut lines: Vec<Line> = Vec::with_capacity((end - start) * CARD_HEIGHT as usize);
    for (visual_idx, index) in (start..end).enumerate() {
        let post = &posts[index];
        let is_selected = !app.search.focused && app.list.selected == Some(index);

        let bg = if is_selected {
            colors::SELECTED_BG
        } else if visual_idx % 2 == 1 {
            colors::ALT_BG
        } else {
            Color::Reset
        };
        let title_style = if is_selected {
            Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::LightBlue).bg(bg).add_modifier(Modifier::BOLD)
        };

        lines.push(
            Line::from(Span::styled(
                pad_to_width(&format!(" {}", truncate_to_width(&post.title, width)), width + 1),
                title_style,
            ))
            .style(Style::default().bg(bg)),
        );
        lines.push(
            Line::from(Span::styled(
                pad_to_width(&format!(" {}", truncate_to_width(&post.body, width)), width + 1),
                Style::default().fg(Color::Gray).bg(bg),
            ))
            .style(Style::default().bg(bg)),
        );
        lines.push(tag_line(post, width, bg));
        lines.push(Line::default());
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn tag_line(post: &Post, width: usize, bg: Color) -> Line<'static> {
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    let mut used = 1;
    for tag in &post.tags {
        let label = format!("#{} ", tag);
        if used + label.width() > width {
            break;
        }
        used += label.width();
        spans.push(Span::styled(
            label,
            Style::default().fg(colors::color_for_tag(tag)).bg(bg),
        ));
    }
    let stats = format!(
        "\u{1F44D} {}  \u{1F441} {}",
        post.reactions.likes, post.views
    );
    if used + stats.width() + 1 <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - stats.width()),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(stats, Style::default().fg(Color::DarkGray).bg(bg)));
    }
    Line::from(spans)
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let feed = &app.feed;
    let left_text = if feed.is_loading() || feed.is_selecting() {
        format!(
            " {} Loading...",
            SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()]
        )
    } else {
        let page_info = match feed.scroll_mode() {
            ScrollMode::Infinite => format!(
                "showing {}{}",
                feed.visible_posts().len(),
                if feed.has_more() { "+" } else { "" }
            ),
            ScrollMode::Paginated => {
                format!("page {}/{}", feed.current_page() + 1, feed.page_count())
            }
        };
        format!(
            " {} posts | {} | {}",
            feed.posts().len(),
            page_info,
            app.status_message
        )
    };

    let right_text = match feed.scroll_mode() {
        ScrollMode::Infinite => " Tab:Focus  Enter:Open  ^S:Mode  ^T:Tag  F5:Reload  ^Q:Quit ",
        ScrollMode::Paginated => {
            " Tab:Focus  Enter:Open  \u{2190}\u{2192}:Page  ^S:Mode  ^T:Tag  F5:Reload  ^Q:Quit "
        }
    };

    // Left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        truncate_to_width(&left_text, available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::ACCENT));

    frame.render_widget(status, area);
}

fn draw_post_details(frame: &mut Frame, post: &Post, area: Rect) {
    let width = (area.width * 4 / 5).max(20);
    let height = (area.height * 4 / 5).max(8);
    let popup = centered_rect(width, height, area);

    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(post.body.clone(), Style::default().fg(Color::Gray))),
        Line::default(),
    ];
    let tags: Vec<Span> = post
        .tags
        .iter()
        .map(|t| Span::styled(format!("#{} ", t), Style::default().fg(colors::color_for_tag(t))))
        .collect();
    lines.push(Line::from(tags));
    lines.push(Line::from(Span::styled(
        format!(
            "\u{1F44D} {}  \u{1F44E} {}  \u{1F441} {}  user #{}",
            post.reactions.likes, post.reactions.dislikes, post.views, post.user_id
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Post #{} ", post.id))
        .title_bottom(" Esc/Enter:Close ");

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Cut `text` to its first line and at most `max_width` display columns,
/// ellipsis included
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let multi_line = first_line.len() < text.len();
    if !multi_line && first_line.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in first_line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let w = text.width();
    if w >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - w))
    }
}
