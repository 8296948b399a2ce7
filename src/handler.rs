use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{Action, AppState, InputMode, Tab};
use crate::tui::AppEvent;

/// Translates an event into the action it stands for, if any.
pub fn handle_event(state: &AppState, event: AppEvent) -> Option<Action> {
    match event {
        AppEvent::Key(key) => handle_key(state, key),
        AppEvent::Resize(_, _) => None,
        AppEvent::Tick => Some(Action::Tick),
        AppEvent::Action(action) => Some(action),
    }
}

fn handle_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::ChapterEntry => handle_chapter_entry(key),
        InputMode::BookPicker => handle_book_picker(key),
    }
}

fn handle_normal_mode(state: &AppState, key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('1') => Action::SelectTab(Tab::Home),
        KeyCode::Char('2') => Action::SelectTab(Tab::Bible),
        KeyCode::Char('3') => Action::SelectTab(Tab::Prayer),
        KeyCode::Tab => Action::NextTab,
        KeyCode::BackTab => Action::PrevTab,
        KeyCode::Char('t') => Action::ToggleDarkMode,
        _ => match state.tab {
            Tab::Home => return handle_home(key),
            Tab::Bible => return handle_bible(key),
            Tab::Prayer => return None,
        },
    };
    Some(action)
}

fn handle_home(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('c') => Some(Action::ContinueReading),
        _ => None,
    }
}

fn handle_bible(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        // Half-page scroll
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::ScrollHalfPageDown
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::ScrollHalfPageUp
        }
        KeyCode::PageDown => Action::ScrollHalfPageDown,
        KeyCode::PageUp => Action::ScrollHalfPageUp,

        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::Char('g') | KeyCode::Home => Action::ScrollTop,

        // Selection
        KeyCode::Char('h') | KeyCode::Left => Action::PrevBook,
        KeyCode::Char('l') | KeyCode::Right => Action::NextBook,
        KeyCode::Char('[') => Action::PrevChapter,
        KeyCode::Char(']') => Action::NextChapter,
        KeyCode::Char('b') => Action::OpenBookPicker,
        KeyCode::Char(':') => Action::BeginChapterEntry,

        KeyCode::Enter | KeyCode::Char('f') => Action::FetchPassage,
        _ => return None,
    };
    Some(action)
}

fn handle_book_picker(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::PickerDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::PickerUp),
        KeyCode::Enter => Some(Action::PickerConfirm),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::PickerCancel),
        _ => None,
    }
}

fn handle_chapter_entry(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(Action::ChapterDigit(c)),
        KeyCode::Backspace => Some(Action::ChapterBackspace),
        KeyCode::Enter => Some(Action::SubmitChapterEntry),
        KeyCode::Esc => Some(Action::CancelChapterEntry),
        _ => None,
    }
}
