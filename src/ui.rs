use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use crate::app::{
    AppState, InputMode, PassageLayout, PassageView, Tab, VerseView, LOADING_PASSAGE,
    LOADING_VERSE, PASSAGE_PROMPT,
};
use crate::catalog::Book;
use crate::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Draws the whole screen. Returns the passage measurement when chapter text
/// was drawn, so the caller can feed it back as `Action::PassageMeasured`.
pub fn render(state: &AppState, frame: &mut Frame) -> Option<PassageLayout> {
    let theme = Theme::for_mode(state.dark_mode);
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
        area,
    );

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(state, &theme, frame, header_area);

    let layout = match state.tab {
        Tab::Home => {
            render_home(state, &theme, frame, body_area);
            None
        }
        Tab::Bible => render_bible(state, &theme, frame, body_area),
        Tab::Prayer => {
            render_prayer(&theme, frame, body_area);
            None
        }
    };

    render_footer(state, &theme, frame, footer_area);

    if state.input_mode == InputMode::BookPicker {
        render_book_picker(state, &theme, frame, area);
    }

    layout
}

fn spinner(state: &AppState) -> &'static str {
    SPINNER[state.animation_frame as usize % SPINNER.len()]
}

fn render_header(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" Daily Verse ", Style::default().fg(theme.accent).bold()),
        Span::raw(" "),
    ];

    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == state.tab {
            Style::default().bg(theme.tab_active_bg).fg(theme.tab_active_fg).bold()
        } else {
            Style::default().bg(theme.tab_inactive_bg).fg(theme.foreground)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, tab.title()), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(theme.muted),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_home(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let mut lines = vec![
        Line::default(),
        Line::styled(
            "Daily Verse & Prayer Journal",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Line::raw("Start your day with inspiration and record your prayers in one place."),
        Line::default(),
    ];

    match state.verse_view() {
        VerseView::Loading => {
            lines.push(Line::styled(
                format!("{} {}", spinner(state), LOADING_VERSE),
                Style::default().fg(theme.muted),
            ));
        }
        VerseView::Loaded { text, citation } => {
            lines.push(Line::styled(text.to_string(), Style::default().italic()));
            if let Some(citation) = citation {
                lines.push(Line::styled(citation, Style::default().fg(theme.muted)));
            }
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::raw("Continue reading: "),
        Span::styled(state.continue_reading_label(), Style::default().bold()),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_bible(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) -> Option<PassageLayout> {
    let [controls_area, content_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    render_selection(state, theme, frame, controls_area);
    render_passage(state, theme, frame, content_area)
}

fn render_selection(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Bible Reader ");

    let book = state.selection.book();
    let mut spans = vec![
        Span::raw(" Book: "),
        Span::styled(book.name(), Style::default().bold()),
        Span::raw("   Chapter: "),
        Span::styled(state.selection.chapter().to_string(), Style::default().bold()),
        Span::styled(format!(" of {}", book.chapter_count()), Style::default().fg(theme.muted)),
    ];

    if state.input_mode == InputMode::ChapterEntry {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!(" Go to chapter: {}_ ", state.chapter_input),
            Style::default().bg(theme.tab_active_bg).fg(theme.tab_active_fg),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_passage(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) -> Option<PassageLayout> {
    let title = state.passage.reference.as_deref().unwrap_or("Passage");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" {} ", title));

    let inner = block.inner(area);

    let lines = match state.passage_view() {
        PassageView::Loading => {
            let loading = Paragraph::new(format!("{} {}", spinner(state), LOADING_PASSAGE))
                .style(Style::default().fg(theme.muted))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(loading, area);
            return None;
        }
        PassageView::Prompt => {
            let prompt = Paragraph::new(PASSAGE_PROMPT)
                .style(Style::default().fg(theme.muted))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(prompt, area);
            return None;
        }
        PassageView::Lines(lines) => lines,
    };

    let text: Vec<Line> = lines
        .into_iter()
        .map(|(number, line)| {
            Line::from(vec![
                Span::styled(format!("{:>3}  ", number), Style::default().fg(theme.line_number).bold()),
                Span::raw(line),
            ])
        })
        .collect();

    // Scrolling moves by wrapped rows, so measure before attaching the block.
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    let layout = PassageLayout {
        rows: u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX),
        viewport: inner.height,
    };
    let max_scroll = layout.rows.saturating_sub(layout.viewport);
    // After a resize the stored offset may be past the end until re-measured.
    let scroll = state.passage.scroll.min(max_scroll);

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);

    if layout.rows > layout.viewport {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize + 1)
            .viewport_content_length(layout.viewport as usize)
            .position(scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }

    Some(layout)
}

fn render_prayer(theme: &Theme, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let lines = vec![
        Line::default(),
        Line::styled("Prayer Journal", Style::default().fg(theme.accent).bold()),
        Line::default(),
        Line::raw("Here you can add and view your prayers."),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_footer(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(theme.key_bg).fg(theme.key_fg);
    let label_style = Style::default().fg(theme.foreground);

    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {} ", key), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match (state.input_mode, state.tab) {
        (InputMode::BookPicker, _) => {
            hints.extend(hint("j/k", "nav"));
            hints.extend(hint("Enter", "select"));
            hints.extend(hint("Esc", "cancel"));
        }
        (InputMode::ChapterEntry, _) => {
            hints.extend(hint("0-9", "chapter"));
            hints.extend(hint("Enter", "go"));
            hints.extend(hint("Esc", "cancel"));
        }
        (InputMode::Normal, Tab::Home) => {
            hints.extend(hint("Enter", "continue reading"));
        }
        (InputMode::Normal, Tab::Bible) => {
            hints.extend(hint("Enter", "fetch"));
            hints.extend(hint("h/l", "book"));
            hints.extend(hint("[/]", "chapter"));
            hints.extend(hint("b", "books"));
            hints.extend(hint(":", "go to"));
            hints.extend(hint("j/k", "scroll"));
        }
        (InputMode::Normal, Tab::Prayer) => {}
    }

    if state.input_mode == InputMode::Normal {
        hints.extend(hint("Tab", "switch"));
        hints.extend(hint("t", if state.dark_mode { "light" } else { "dark" }));
        hints.extend(hint("q", "quit"));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_book_picker(state: &AppState, theme: &Theme, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 30.min(area.width.saturating_sub(4));
    let popup_height = (Book::count() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Select Book ")
        .style(Style::default().bg(theme.background).fg(theme.foreground));

    let current = state.selection.book();
    let items: Vec<ListItem> = Book::all()
        .map(|book| {
            let style = if book == current {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} ({}) ", book.name(), book.chapter_count())).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.tab_active_bg)
                .fg(theme.tab_active_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.picker_index));
    frame.render_stateful_widget(list, popup_area, &mut list_state);
}
