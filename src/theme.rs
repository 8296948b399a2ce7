use ratatui::style::Color;

/// Colours for one display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_bg: Color,
    pub line_number: Color,
    pub key_bg: Color,
    pub key_fg: Color,
}

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            accent: Color::LightMagenta,
            border: Color::DarkGray,
            tab_active_bg: Color::Blue,
            tab_active_fg: Color::White,
            tab_inactive_bg: Color::Rgb(55, 65, 81),
            line_number: Color::Yellow,
            key_bg: Color::DarkGray,
            key_fg: Color::White,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            accent: Color::Magenta,
            border: Color::Rgb(79, 70, 229),
            tab_active_bg: Color::Blue,
            tab_active_fg: Color::White,
            tab_inactive_bg: Color::Rgb(209, 213, 219),
            line_number: Color::Blue,
            key_bg: Color::Gray,
            key_fg: Color::Black,
        }
    }
}
