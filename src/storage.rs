//! Local key/value persistence for the reading selection and display
//! preference.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::catalog::Book;

pub const KEY_BOOK: &str = "bibleBook";
pub const KEY_CHAPTER: &str = "bibleChapter";
pub const KEY_DARK_MODE: &str = "darkMode";

/// String key/value storage, the only persistence the app uses.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Stores several values at once. Stores that can write atomically
    /// override this so a failure leaves none of them applied.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        (**self).set_many(entries)
    }
}

/// Keeps values for the lifetime of the process only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object on disk, rewritten in full on every write. The in-memory
/// values only change once the file has been written.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable preference store");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("daily-verse").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.set_many(vec![(key, value)])
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<()> {
        let mut values = self.values.clone();
        values.extend(entries.into_iter().map(|(key, value)| (key.to_string(), value)));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, content)?;

        self.values = values;
        Ok(())
    }
}

/// A valid (book, chapter) pair: the chapter always exists in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingSelection {
    book: Book,
    chapter: u32,
}

impl ReadingSelection {
    pub fn new(book: Book, chapter: u32) -> Option<Self> {
        book.has_chapter(chapter).then_some(Self { book, chapter })
    }

    pub fn book(&self) -> Book {
        self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Switches book. The chapter goes back to 1 because chapter ranges
    /// differ between books; picking the current book changes nothing.
    pub fn with_book(self, book: Book) -> Self {
        if book == self.book {
            self
        } else {
            Self { book, chapter: 1 }
        }
    }

    /// Switches chapter, or `None` when the book has no such chapter.
    pub fn with_chapter(self, chapter: u32) -> Option<Self> {
        Self::new(self.book, chapter)
    }
}

impl Default for ReadingSelection {
    fn default() -> Self {
        Self {
            book: Book::GENESIS,
            chapter: 1,
        }
    }
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub selection: ReadingSelection,
    pub dark_mode: bool,
}

impl Preferences {
    /// Reads each value independently, falling back to Genesis 1 and light
    /// mode for anything absent or invalid. A stored chapter is only kept
    /// if it exists in the resolved book.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let book = store
            .get(KEY_BOOK)
            .and_then(|name| Book::from_name(&name))
            .unwrap_or_default();

        let selection = store
            .get(KEY_CHAPTER)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .and_then(|chapter| ReadingSelection::new(book, chapter))
            .unwrap_or_else(|| ReadingSelection::default().with_book(book));

        let dark_mode = store
            .get(KEY_DARK_MODE)
            .and_then(|raw| raw.trim().parse::<bool>().ok())
            .unwrap_or(false);

        Self { selection, dark_mode }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.set_many(vec![
            (KEY_BOOK, self.selection.book().name().to_string()),
            (KEY_CHAPTER, self.selection.chapter().to_string()),
            (KEY_DARK_MODE, self.dark_mode.to_string()),
        ])
    }
}
