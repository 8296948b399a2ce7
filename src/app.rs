//! Application state and its transitions.
//!
//! [`AppState::update`] is a pure function from (state, action) to
//! (state, effects). Network requests are described as [`Effect`]s and run
//! elsewhere; their results come back in as actions.

use crate::catalog::Book;
use crate::error::FetchError;
use crate::passage::{split_lines, PassageRequest, PASSAGE_FALLBACK};
use crate::storage::{Preferences, ReadingSelection};
use crate::verse::Verse;

pub const LOADING_VERSE: &str = "Loading verse...";
pub const LOADING_PASSAGE: &str = "Loading passage...";
pub const PASSAGE_PROMPT: &str = "Select a book and chapter to start reading";

pub const ANIMATION_FRAMES: u8 = 4;

const HALF_PAGE: u16 = 10;
const MAX_CHAPTER_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Bible,
    Prayer,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Bible, Tab::Prayer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Bible => "bible",
            Tab::Prayer => "prayer",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Bible => "Bible",
            Tab::Prayer => "Prayer",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Bible => 1,
            Tab::Prayer => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a chapter number on the bible tab.
    ChapterEntry,
    /// The book list popup is open.
    BookPicker,
}

/// `SelectBook` and `SelectChapter` have no key binding; they are the
/// programmatic entry points for setting the selection directly.
#[derive(Debug)]
pub enum Action {
    /// The view appeared; loads the verse of the day.
    Mount,
    SelectTab(Tab),
    NextTab,
    PrevTab,

    SelectBook(Book),
    NextBook,
    PrevBook,
    SelectChapter(u32),
    NextChapter,
    PrevChapter,
    ToggleDarkMode,

    /// Fetch the currently selected chapter.
    FetchPassage,
    /// Jump to the bible tab and fetch the current selection.
    ContinueReading,

    VerseLoaded(Verse),
    PassageLoaded {
        token: u64,
        result: Result<String, FetchError>,
    },

    OpenBookPicker,
    PickerDown,
    PickerUp,
    PickerConfirm,
    PickerCancel,

    BeginChapterEntry,
    ChapterDigit(char),
    ChapterBackspace,
    SubmitChapterEntry,
    CancelChapterEntry,

    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollTop,
    /// The renderer measured the wrapped passage.
    PassageMeasured(PassageLayout),

    Tick,
    Quit,
}

/// Work the runtime must perform on behalf of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    LoadVerse,
    LoadPassage(PassageRequest),
}

/// Size of the drawn passage in screen rows, after wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassageLayout {
    pub rows: u16,
    pub viewport: u16,
}

#[derive(Debug, Clone, Default)]
pub struct PassageState {
    pub text: String,
    pub loading: bool,
    /// `"<book> <chapter>"` of the most recent request.
    pub reference: Option<String>,
    pub scroll: u16,
    /// Last measurement reported by the renderer; zeroed until the text is drawn.
    pub layout: PassageLayout,
    /// Token of the most recently issued request; older responses are dropped.
    pub latest_token: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tab: Tab,
    pub input_mode: InputMode,
    pub chapter_input: String,
    pub picker_index: usize,

    pub verse: Option<Verse>,

    pub selection: ReadingSelection,
    pub dark_mode: bool,
    pub passage: PassageState,

    pub animation_frame: u8,
    pub should_quit: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum VerseView<'a> {
    Loading,
    Loaded {
        text: &'a str,
        citation: Option<String>,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum PassageView<'a> {
    Loading,
    /// 1-indexed lines of the chapter.
    Lines(Vec<(usize, &'a str)>),
    Prompt,
}

impl AppState {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            selection: preferences.selection,
            dark_mode: preferences.dark_mode,
            ..Self::default()
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            selection: self.selection,
            dark_mode: self.dark_mode,
        }
    }

    pub fn update(mut self, action: Action) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match action {
            Action::Mount => {
                self.verse = None;
                effects.push(Effect::LoadVerse);
            }
            Action::SelectTab(tab) => self.tab = tab,
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),

            Action::SelectBook(book) => self.selection = self.selection.with_book(book),
            Action::NextBook => {
                self.selection = self.selection.with_book(self.selection.book().next());
            }
            Action::PrevBook => {
                self.selection = self.selection.with_book(self.selection.book().prev());
            }
            Action::SelectChapter(chapter) => self.set_chapter(chapter),
            Action::NextChapter => self.set_chapter(self.selection.chapter() + 1),
            Action::PrevChapter => self.set_chapter(self.selection.chapter().saturating_sub(1)),
            Action::ToggleDarkMode => self.dark_mode = !self.dark_mode,

            Action::FetchPassage => effects.push(self.start_passage_fetch()),
            Action::ContinueReading => {
                self.tab = Tab::Bible;
                effects.push(self.start_passage_fetch());
            }

            Action::VerseLoaded(verse) => self.verse = Some(verse),
            Action::PassageLoaded { token, result } => self.finish_passage_fetch(token, result),

            Action::OpenBookPicker => {
                self.input_mode = InputMode::BookPicker;
                self.picker_index = self.selection.book().index();
            }
            Action::PickerDown => {
                self.picker_index = (self.picker_index + 1).min(Book::count() - 1);
            }
            Action::PickerUp => self.picker_index = self.picker_index.saturating_sub(1),
            Action::PickerConfirm => {
                if let Some(book) = Book::from_index(self.picker_index) {
                    self.selection = self.selection.with_book(book);
                }
                self.input_mode = InputMode::Normal;
            }
            Action::PickerCancel => self.input_mode = InputMode::Normal,

            Action::BeginChapterEntry => {
                self.input_mode = InputMode::ChapterEntry;
                self.chapter_input.clear();
            }
            Action::ChapterDigit(c) => {
                if c.is_ascii_digit() && self.chapter_input.len() < MAX_CHAPTER_DIGITS {
                    self.chapter_input.push(c);
                }
            }
            Action::ChapterBackspace => {
                self.chapter_input.pop();
            }
            Action::SubmitChapterEntry => {
                if let Ok(chapter) = self.chapter_input.parse::<u32>() {
                    self.set_chapter(chapter);
                }
                self.chapter_input.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::CancelChapterEntry => {
                self.chapter_input.clear();
                self.input_mode = InputMode::Normal;
            }

            Action::ScrollDown => self.scroll_to(self.passage.scroll.saturating_add(1)),
            Action::ScrollUp => self.scroll_to(self.passage.scroll.saturating_sub(1)),
            Action::ScrollHalfPageDown => {
                self.scroll_to(self.passage.scroll.saturating_add(HALF_PAGE));
            }
            Action::ScrollHalfPageUp => {
                self.scroll_to(self.passage.scroll.saturating_sub(HALF_PAGE));
            }
            Action::ScrollTop => self.passage.scroll = 0,
            Action::PassageMeasured(layout) => {
                self.passage.layout = layout;
                self.scroll_to(self.passage.scroll);
            }

            Action::Tick => {
                self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
            }
            Action::Quit => self.should_quit = true,
        }

        (self, effects)
    }

    /// Out-of-range chapters leave the selection unchanged.
    fn set_chapter(&mut self, chapter: u32) {
        if let Some(selection) = self.selection.with_chapter(chapter) {
            self.selection = selection;
        }
    }

    fn start_passage_fetch(&mut self) -> Effect {
        self.passage.latest_token += 1;
        self.passage.loading = true;
        self.passage.scroll = 0;
        self.passage.layout = PassageLayout::default();

        let request = PassageRequest {
            token: self.passage.latest_token,
            book: self.selection.book(),
            chapter: self.selection.chapter(),
        };
        self.passage.reference = Some(request.reference());

        Effect::LoadPassage(request)
    }

    fn finish_passage_fetch(&mut self, token: u64, result: Result<String, FetchError>) {
        if token != self.passage.latest_token {
            return;
        }

        self.passage.loading = false;
        self.passage.text = match result {
            Ok(text) => text,
            Err(_) => PASSAGE_FALLBACK.to_string(),
        };
    }

    fn scroll_to(&mut self, offset: u16) {
        self.passage.scroll = offset.min(self.max_scroll());
    }

    /// Last offset that still fills the viewport. Before the first measurement
    /// every line counts as one row.
    pub fn max_scroll(&self) -> u16 {
        let layout = self.passage.layout;
        if layout.viewport == 0 {
            let line_count = split_lines(&self.passage.text).len();
            return u16::try_from(line_count.saturating_sub(1)).unwrap_or(u16::MAX);
        }
        layout.rows.saturating_sub(layout.viewport)
    }

    pub fn verse_view(&self) -> VerseView<'_> {
        match &self.verse {
            None => VerseView::Loading,
            Some(verse) => VerseView::Loaded {
                text: &verse.text,
                citation: verse.citation(),
            },
        }
    }

    pub fn passage_view(&self) -> PassageView<'_> {
        if self.passage.loading {
            PassageView::Loading
        } else if self.passage.text.is_empty() {
            PassageView::Prompt
        } else {
            PassageView::Lines(
                split_lines(&self.passage.text)
                    .into_iter()
                    .enumerate()
                    .map(|(i, line)| (i + 1, line))
                    .collect(),
            )
        }
    }

    /// What "continue reading" will open, e.g. `"Genesis 1"`.
    pub fn continue_reading_label(&self) -> String {
        format!("{} {}", self.selection.book().name(), self.selection.chapter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn book(name: &str) -> Book {
        Book::from_name(name).unwrap()
    }

    fn apply(state: AppState, actions: Vec<Action>) -> (AppState, Vec<Effect>) {
        actions.into_iter().fold((state, Vec::new()), |(state, mut all), action| {
            let (state, effects) = state.update(action);
            all.extend(effects);
            (state, all)
        })
    }

    fn at(name: &str, chapter: u32) -> AppState {
        AppState::new(Preferences {
            selection: ReadingSelection::new(book(name), chapter).unwrap(),
            dark_mode: false,
        })
    }

    fn request(effects: &[Effect]) -> PassageRequest {
        match effects.last() {
            Some(Effect::LoadPassage(request)) => *request,
            other => panic!("expected a passage fetch, got {:?}", other),
        }
    }

    #[test]
    fn starts_on_home_and_loads_verse_on_mount() {
        let (state, effects) = AppState::default().update(Action::Mount);
        assert_eq!(state.tab, Tab::Home);
        assert_eq!(effects, vec![Effect::LoadVerse]);
        assert_eq!(state.verse_view(), VerseView::Loading);
    }

    #[test]
    fn loaded_verse_shows_citation() {
        let verse = Verse::new("Ps 23:1", "The Lord is my shepherd");
        let (state, _) = AppState::default().update(Action::VerseLoaded(verse));
        assert_eq!(
            state.verse_view(),
            VerseView::Loaded {
                text: "The Lord is my shepherd",
                citation: Some("Ps 23:1 (KJV)".to_string()),
            }
        );
    }

    #[test]
    fn fallback_verse_has_no_citation() {
        let (state, _) = AppState::default().update(Action::VerseLoaded(Verse::fallback()));
        assert_eq!(
            state.verse_view(),
            VerseView::Loaded {
                text: "Could not load verse",
                citation: None,
            }
        );
    }

    #[test]
    fn tabs_cycle_in_both_directions() {
        let (state, _) = apply(AppState::default(), vec![Action::NextTab, Action::NextTab]);
        assert_eq!(state.tab, Tab::Prayer);
        let (state, _) = state.update(Action::NextTab);
        assert_eq!(state.tab, Tab::Home);
        let (state, _) = state.update(Action::PrevTab);
        assert_eq!(state.tab, Tab::Prayer);
        let (state, _) = state.update(Action::SelectTab(Tab::Bible));
        assert_eq!(state.tab.as_str(), "bible");
    }

    #[test]
    fn book_change_resets_chapter() {
        let (state, effects) = apply(
            at("Psalms", 119),
            vec![Action::SelectBook(book("Jude"))],
        );
        assert_eq!(state.selection.book().name(), "Jude");
        assert_eq!(state.selection.chapter(), 1);
        assert!(effects.is_empty(), "selection changes never fetch");

        let (state, _) = at("Genesis", 40).update(Action::NextBook);
        assert_eq!(state.continue_reading_label(), "Exodus 1");
    }

    #[test]
    fn chapter_steps_stay_in_range() {
        let (state, _) = apply(at("Jude", 1), vec![Action::NextChapter, Action::PrevChapter]);
        assert_eq!(state.selection.chapter(), 1);

        let (state, _) = apply(at("Ruth", 3), vec![Action::NextChapter, Action::NextChapter]);
        assert_eq!(state.selection.chapter(), 4);

        let (state, _) = at("Ruth", 3).update(Action::SelectChapter(9));
        assert_eq!(state.selection.chapter(), 3);
    }

    #[test]
    fn chapter_entry_accepts_only_valid_chapters() {
        let typed = |digits: &str| {
            let mut actions = vec![Action::BeginChapterEntry];
            actions.extend(digits.chars().map(Action::ChapterDigit));
            actions.push(Action::SubmitChapterEntry);
            apply(at("John", 1), actions).0
        };

        let state = typed("21");
        assert_eq!(state.selection.chapter(), 21);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.chapter_input.is_empty());

        assert_eq!(typed("22").selection.chapter(), 1);
        assert_eq!(typed("x3").selection.chapter(), 3);
        assert_eq!(typed("").selection.chapter(), 1);

        let (state, _) = apply(
            at("Psalms", 1),
            vec![
                Action::BeginChapterEntry,
                Action::ChapterDigit('1'),
                Action::ChapterDigit('1'),
                Action::ChapterDigit('9'),
                Action::ChapterDigit('9'),
                Action::ChapterBackspace,
                Action::ChapterDigit('7'),
            ],
        );
        assert_eq!(state.chapter_input, "117");
        let (state, _) = state.update(Action::CancelChapterEntry);
        assert_eq!(state.selection.chapter(), 1);
    }

    #[test]
    fn picker_selects_book_and_resets_chapter() {
        let (state, _) = apply(
            at("Genesis", 12),
            vec![Action::OpenBookPicker, Action::PickerDown, Action::PickerDown],
        );
        assert_eq!(state.input_mode, InputMode::BookPicker);
        assert_eq!(state.picker_index, 2);

        let (state, _) = state.update(Action::PickerConfirm);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.continue_reading_label(), "Leviticus 1");

        let (state, _) = apply(
            at("Revelation", 5),
            vec![Action::OpenBookPicker, Action::PickerDown, Action::PickerConfirm],
        );
        assert_eq!(state.continue_reading_label(), "Revelation 5");

        let (state, _) = apply(
            at("Exodus", 5),
            vec![Action::OpenBookPicker, Action::PickerUp, Action::PickerCancel],
        );
        assert_eq!(state.continue_reading_label(), "Exodus 5");
    }

    #[test]
    fn fetch_renders_numbered_lines() {
        let (state, effects) = at("John", 3).update(Action::FetchPassage);
        let req = request(&effects);
        assert_eq!((req.book.name(), req.chapter), ("John", 3));
        assert_eq!(state.passage_view(), PassageView::Loading);
        assert_eq!(state.passage.reference.as_deref(), Some("John 3"));

        let (state, _) = state.update(Action::PassageLoaded {
            token: req.token,
            result: Ok("line1\nline2\nline3".to_string()),
        });
        assert!(!state.passage.loading);
        assert_eq!(
            state.passage_view(),
            PassageView::Lines(vec![(1, "line1"), (2, "line2"), (3, "line3")])
        );
    }

    #[test]
    fn failed_fetch_shows_fallback_and_ends_loading() {
        let (state, effects) = at("John", 3).update(Action::FetchPassage);
        let req = request(&effects);

        let (state, _) = state.update(Action::PassageLoaded {
            token: req.token,
            result: Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
        });
        assert!(!state.passage.loading);
        assert_eq!(state.passage.text, "Could not fetch passage");
        assert_eq!(
            state.passage_view(),
            PassageView::Lines(vec![(1, "Could not fetch passage")])
        );
    }

    #[test]
    fn stale_responses_are_discarded() {
        let (state, first) = at("John", 3).update(Action::FetchPassage);
        let (state, _) = state.update(Action::NextChapter);
        let (state, second) = state.update(Action::FetchPassage);
        let (first, second) = (request(&first), request(&second));
        assert!(second.token > first.token);

        let (state, _) = state.update(Action::PassageLoaded {
            token: second.token,
            result: Ok("chapter four".to_string()),
        });
        let (state, _) = state.update(Action::PassageLoaded {
            token: first.token,
            result: Ok("chapter three".to_string()),
        });
        assert_eq!(state.passage.text, "chapter four");
        assert_eq!(state.passage.reference.as_deref(), Some("John 4"));

        // An older response arriving first does not end the newer load.
        let (state, a) = state.update(Action::FetchPassage);
        let (state, b) = state.update(Action::FetchPassage);
        let (state, _) = state.update(Action::PassageLoaded {
            token: request(&a).token,
            result: Ok("old".to_string()),
        });
        assert!(state.passage.loading);
        let (state, _) = state.update(Action::PassageLoaded {
            token: request(&b).token,
            result: Ok("new".to_string()),
        });
        assert!(!state.passage.loading);
        assert_eq!(state.passage.text, "new");
    }

    #[test]
    fn empty_passage_prompts_for_selection() {
        assert_eq!(AppState::default().passage_view(), PassageView::Prompt);
    }

    #[test]
    fn continue_reading_switches_tab_and_fetches_selection() {
        let (state, effects) = at("Romans", 8).update(Action::ContinueReading);
        assert_eq!(state.tab, Tab::Bible);
        let req = request(&effects);
        assert_eq!((req.book.name(), req.chapter), ("Romans", 8));
        assert!(state.passage.loading);
    }

    #[test]
    fn scrolling_is_bounded_by_line_count() {
        let (state, effects) = at("John", 3).update(Action::FetchPassage);
        let (state, _) = state.update(Action::PassageLoaded {
            token: request(&effects).token,
            result: Ok((1..=15).map(|n| n.to_string()).collect::<Vec<_>>().join("\n")),
        });

        let (state, _) = apply(state, vec![Action::ScrollHalfPageDown, Action::ScrollHalfPageDown]);
        assert_eq!(state.passage.scroll, 14);
        let (state, _) = apply(state, vec![Action::ScrollUp, Action::ScrollHalfPageUp]);
        assert_eq!(state.passage.scroll, 3);
        let (state, _) = state.update(Action::ScrollTop);
        assert_eq!(state.passage.scroll, 0);

        let (state, _) = apply(state, vec![Action::ScrollDown, Action::FetchPassage]);
        assert_eq!(state.passage.scroll, 0);
    }

    #[test]
    fn measured_rows_bound_scrolling() {
        let (state, effects) = at("Psalms", 119).update(Action::FetchPassage);
        let (state, _) = state.update(Action::PassageLoaded {
            token: request(&effects).token,
            result: Ok("a\nb\nc".to_string()),
        });

        // Three long lines wrapping to 40 rows in a 10-row viewport.
        let layout = PassageLayout { rows: 40, viewport: 10 };
        let (state, _) = state.update(Action::PassageMeasured(layout));
        let (state, _) = apply(state, (0..5).map(|_| Action::ScrollHalfPageDown).collect());
        assert_eq!(state.passage.scroll, 30);

        // A taller viewport pulls the offset back.
        let layout = PassageLayout { rows: 40, viewport: 25 };
        let (state, _) = state.update(Action::PassageMeasured(layout));
        assert_eq!(state.passage.scroll, 15);

        let (state, _) = state.update(Action::FetchPassage);
        assert_eq!(state.passage.layout, PassageLayout::default());
    }

    #[test]
    fn dark_mode_toggles_and_reaches_preferences() {
        let (state, _) = AppState::default().update(Action::ToggleDarkMode);
        assert!(state.preferences().dark_mode);
        let (state, _) = state.update(Action::ToggleDarkMode);
        assert!(!state.preferences().dark_mode);
    }

    #[test]
    fn tick_wraps_animation_and_quit_sets_flag() {
        let ticks = (0..ANIMATION_FRAMES).map(|_| Action::Tick).collect();
        let (state, _) = apply(AppState::default(), ticks);
        assert_eq!(state.animation_frame, 0);
        let (state, _) = state.update(Action::Quit);
        assert!(state.should_quit);
    }
}
