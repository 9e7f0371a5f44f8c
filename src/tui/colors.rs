use crate::preference::ScrollMode;
use ratatui::style::Color;

/// Status bar and header background
pub const ACCENT: Color = Color::Rgb(0, 95, 135);

/// Selected card background
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);

/// Alternating card background
pub const ALT_BG: Color = Color::Rgb(25, 25, 35);

const TAG_PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::LightBlue,
    Color::LightRed,
    Color::LightYellow,
    Color::LightGreen,
];

/// Stable color for a tag, so the same tag looks the same everywhere
pub fn color_for_tag(tag: &str) -> Color {
    let hash = tag
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    TAG_PALETTE[hash as usize % TAG_PALETTE.len()]
}

pub fn scroll_mode_icon(mode: ScrollMode) -> &'static str {
    match mode {
        ScrollMode::Infinite => "\u{221E}", // infinity
        ScrollMode::Paginated => "\u{1F4C4}", // page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_colors_are_stable() {
        assert_eq!(color_for_tag("history"), color_for_tag("history"));
        assert!(TAG_PALETTE.contains(&color_for_tag("")));
    }
}
