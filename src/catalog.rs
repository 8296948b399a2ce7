//! The canonical book catalog: 66 books in canonical order with their
//! chapter counts.

use std::fmt;
use std::ops::RangeInclusive;

const BOOKS: [(&str, u32); 66] = [
    // Old Testament
    ("Genesis", 50),
    ("Exodus", 40),
    ("Leviticus", 27),
    ("Numbers", 36),
    ("Deuteronomy", 34),
    ("Joshua", 24),
    ("Judges", 21),
    ("Ruth", 4),
    ("1 Samuel", 31),
    ("2 Samuel", 24),
    ("1 Kings", 22),
    ("2 Kings", 25),
    ("1 Chronicles", 29),
    ("2 Chronicles", 36),
    ("Ezra", 10),
    ("Nehemiah", 13),
    ("Esther", 10),
    ("Job", 42),
    ("Psalms", 150),
    ("Proverbs", 31),
    ("Ecclesiastes", 12),
    ("Song of Solomon", 8),
    ("Isaiah", 66),
    ("Jeremiah", 52),
    ("Lamentations", 5),
    ("Ezekiel", 48),
    ("Daniel", 12),
    ("Hosea", 14),
    ("Joel", 3),
    ("Amos", 9),
    ("Obadiah", 1),
    ("Jonah", 4),
    ("Micah", 7),
    ("Nahum", 3),
    ("Habakkuk", 3),
    ("Zephaniah", 3),
    ("Haggai", 2),
    ("Zechariah", 14),
    ("Malachi", 4),
    // New Testament
    ("Matthew", 28),
    ("Mark", 16),
    ("Luke", 24),
    ("John", 21),
    ("Acts", 28),
    ("Romans", 16),
    ("1 Corinthians", 16),
    ("2 Corinthians", 13),
    ("Galatians", 6),
    ("Ephesians", 6),
    ("Philippians", 4),
    ("Colossians", 4),
    ("1 Thessalonians", 5),
    ("2 Thessalonians", 3),
    ("1 Timothy", 6),
    ("2 Timothy", 4),
    ("Titus", 3),
    ("Philemon", 1),
    ("Hebrews", 13),
    ("James", 5),
    ("1 Peter", 5),
    ("2 Peter", 3),
    ("1 John", 5),
    ("2 John", 1),
    ("3 John", 1),
    ("Jude", 1),
    ("Revelation", 22),
];

/// A book of the catalog. Only values that name a catalog entry can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Book(usize);

impl Book {
    pub const GENESIS: Book = Book(0);

    pub fn all() -> impl Iterator<Item = Book> {
        (0..BOOKS.len()).map(Book)
    }

    pub fn count() -> usize {
        BOOKS.len()
    }

    /// Exact, case-sensitive lookup by canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        BOOKS.iter().position(|(n, _)| *n == name).map(Book)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < BOOKS.len()).then_some(Book(index))
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn name(self) -> &'static str {
        BOOKS[self.0].0
    }

    pub fn chapter_count(self) -> u32 {
        BOOKS[self.0].1
    }

    /// Every chapter a reader may select for this book.
    pub fn chapters(self) -> RangeInclusive<u32> {
        1..=self.chapter_count()
    }

    pub fn has_chapter(self, chapter: u32) -> bool {
        self.chapters().contains(&chapter)
    }

    /// The following book, staying on Revelation at the end.
    pub fn next(self) -> Self {
        Book((self.0 + 1).min(BOOKS.len() - 1))
    }

    /// The preceding book, staying on Genesis at the start.
    pub fn prev(self) -> Self {
        Book(self.0.saturating_sub(1))
    }
}

impl Default for Book {
    fn default() -> Self {
        Book::GENESIS
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
