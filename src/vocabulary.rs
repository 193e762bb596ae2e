//! This module loads the finite vocabulary that the solver draws words from. Words are normalized
//! (whitespace stripped, NFC, uppercase) and interned, so the rest of the crate can refer to them
//! by `WordId` and look up the letter at any offset in constant time.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt::Debug;
use std::path::Path;
use std::{fmt, fs};
use unicode_normalization::UnicodeNormalization;

use crate::types::WordId;
use crate::MAX_SLOT_LENGTH;

/// A struct representing a word in the vocabulary.
#[derive(Debug, Clone)]
pub struct Word {
    /// The word as it would appear in a grid.
    pub normalized_string: String,

    /// The word as it appears in the user's word list.
    pub canonical_string: String,

    /// The chars making up `normalized_string`, so that indexing by cell is O(1) even for
    /// multi-byte letters.
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,

    /// The index of the source that this word came from. If the same word appears in multiple
    /// sources, this is the first one.
    pub source_index: u16,
}

impl Word {
    /// The number of cells this word occupies.
    #[must_use]
    pub fn length(&self) -> usize {
        self.chars.len()
    }
}

/// Given a canonical word string from a word list file, turn it into the normalized form we'll use
/// in the actual fill engine.
#[must_use]
pub fn normalize_word(canonical: &str) -> String {
    canonical
        .to_uppercase()
        .nfc() // Normalize Unicode combining forms
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Could this normalized word be written into a grid? Characters that the template format uses
/// for structure, and control characters, can't.
fn is_valid_word(normalized: &str) -> bool {
    !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c != '_' && c != '#' && c != '█' && !c.is_control())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    InvalidPath(String),
    InvalidWord(String),
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyError::InvalidPath(path) => write!(f, "Can’t read file: “{path}”"),
            VocabularyError::InvalidWord(word) => {
                write!(f, "Word list contains invalid word: “{word}”")
            }
        }
    }
}

impl std::error::Error for VocabularyError {}

/// Configuration describing a source of vocabulary entries.
pub enum VocabularySource {
    Memory { id: String, words: Vec<String> },
    File { id: String, path: OsString },
    FileContents { id: String, contents: String },
}

impl VocabularySource {
    /// The unique id of this source, used to key its errors.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            VocabularySource::Memory { id, .. }
            | VocabularySource::File { id, .. }
            | VocabularySource::FileContents { id, .. } => id.clone(),
        }
    }
}

/// A single entry read from a source, before deduplication.
struct RawEntry {
    normalized: String,
    canonical: String,
}

fn parse_entries<'a>(
    lines: impl Iterator<Item = &'a str>,
    errors: &mut Vec<VocabularyError>,
) -> Vec<RawEntry> {
    lines
        .filter_map(|line| {
            let canonical = line.trim();
            if canonical.is_empty() {
                return None;
            }

            let normalized = normalize_word(canonical);
            if !is_valid_word(&normalized) {
                errors.push(VocabularyError::InvalidWord(canonical.into()));
                return None;
            }

            Some(RawEntry {
                normalized,
                canonical: canonical.into(),
            })
        })
        .collect()
}

fn load_entries(source: &VocabularySource) -> (Vec<RawEntry>, Vec<VocabularyError>) {
    let mut errors = vec![];

    let entries = match source {
        VocabularySource::Memory { words, .. } => {
            parse_entries(words.iter().map(String::as_str), &mut errors)
        }

        VocabularySource::File { path, .. } => {
            if let Ok(contents) = fs::read_to_string(path) {
                parse_entries(contents.lines(), &mut errors)
            } else {
                errors.push(VocabularyError::InvalidPath(path.to_string_lossy().into()));
                vec![]
            }
        }

        VocabularySource::FileContents { contents, .. } => {
            parse_entries(contents.lines(), &mut errors)
        }
    };

    (entries, errors)
}

/// A struct representing the loaded vocabulary. Word ids are stable for the lifetime of the
/// struct.
pub struct Vocabulary {
    /// All loaded words; a `WordId` is an index into this list.
    pub words: Vec<Word>,

    /// A map from a normalized string to the id of the Word representing it.
    pub word_id_by_string: HashMap<String, WordId>,

    /// Errors encountered while loading, keyed by source id.
    pub source_errors: HashMap<String, Vec<VocabularyError>>,
}

impl Vocabulary {
    /// Construct a new `Vocabulary` from the given sources. Errors are recorded per source rather
    /// than aborting the load.
    #[must_use]
    pub fn new(sources: &[VocabularySource]) -> Vocabulary {
        assert!(sources.len() < 2usize.pow(16), "Too many vocabulary sources");

        let mut instance = Vocabulary {
            words: vec![],
            word_id_by_string: HashMap::new(),
            source_errors: HashMap::new(),
        };

        for (source_index, source) in sources.iter().enumerate() {
            let (entries, errors) = load_entries(source);

            for entry in entries {
                if instance.word_id_by_string.contains_key(&entry.normalized) {
                    continue;
                }

                let word_id = instance.words.len();
                instance
                    .word_id_by_string
                    .insert(entry.normalized.clone(), word_id);
                instance.words.push(Word {
                    chars: entry.normalized.chars().collect(),
                    normalized_string: entry.normalized,
                    canonical_string: entry.canonical,
                    source_index: source_index as u16,
                });
            }

            instance.source_errors.insert(source.id(), errors);
        }

        instance
    }

    /// Build a vocabulary directly from a list of words.
    #[must_use]
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Vocabulary {
        Vocabulary::new(&[VocabularySource::Memory {
            id: "0".into(),
            words: words.iter().map(|word| word.as_ref().to_string()).collect(),
        }])
    }

    /// Load a plain-text word list (one word per line), failing on the first error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vocabulary, VocabularyError> {
        let vocabulary = Vocabulary::new(&[VocabularySource::File {
            id: "0".into(),
            path: path.as_ref().as_os_str().to_owned(),
        }]);

        let first_error = vocabulary.errors().next().cloned();
        match first_error {
            Some(error) => Err(error),
            None => Ok(vocabulary),
        }
    }

    /// Iterate over every error recorded while loading.
    pub fn errors(&self) -> impl Iterator<Item = &VocabularyError> {
        self.source_errors.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    /// Look up a word by its (not necessarily normalized) spelling.
    #[must_use]
    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.word_id_by_string.get(&normalize_word(word)).copied()
    }

    /// The letter at the given cell of the given word, or `None` if the word is too short to
    /// reach that cell.
    #[inline]
    #[must_use]
    pub fn char_at(&self, word_id: WordId, cell_idx: usize) -> Option<char> {
        self.words[word_id].chars.get(cell_idx).copied()
    }

    /// Ids of every word with exactly `length` cells.
    pub fn words_of_length(&self, length: usize) -> impl Iterator<Item = WordId> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(move |(_, word)| word.length() == length)
            .map(|(word_id, _)| word_id)
    }
}

impl Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vocabulary")
            .field("words", &format!("({} entries)", self.words.len()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::vocabulary::{Vocabulary, VocabularyError, VocabularySource};
    use std::io::Write;

    #[test]
    fn test_normalizes_and_deduplicates_words() {
        let vocabulary = Vocabulary::from_words(&["cat", "  Dog ", "CAT", "", "sea lion"]);

        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.word(0).normalized_string, "CAT");
        assert_eq!(vocabulary.word(1).normalized_string, "DOG");
        assert_eq!(vocabulary.word(1).canonical_string, "Dog");
        assert_eq!(vocabulary.word(2).normalized_string, "SEALION");
        assert_eq!(vocabulary.word_id("cat"), Some(0));
        assert_eq!(vocabulary.word_id("emu"), None);
    }

    #[test]
    fn test_unusual_characters() {
        let vocabulary = Vocabulary::from_words(&[
            // Non-English character expressed as one `char`
            "monsutâ",
            // Non-English character expressed as two chars w/ combining form
            "he\u{301}len",
        ]);

        let lengths: Vec<usize> = vocabulary.words.iter().map(|word| word.length()).collect();
        assert_eq!(lengths, vec![7, 5]);
        assert_eq!(vocabulary.char_at(1, 1), Some('É'));
        assert_eq!(vocabulary.char_at(1, 5), None);
    }

    #[test]
    fn test_words_of_length() {
        let vocabulary = Vocabulary::from_words(&["CAT", "AB", "DOG", "TREE"]);

        assert_eq!(vocabulary.words_of_length(3).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(vocabulary.words_of_length(5).count(), 0);
    }

    #[test]
    fn test_invalid_words_are_recorded_per_source() {
        let vocabulary = Vocabulary::new(&[
            VocabularySource::Memory {
                id: "good".into(),
                words: vec!["ONE".into()],
            },
            VocabularySource::FileContents {
                id: "bad".into(),
                contents: "TWO\nA_B\nTHREE\n".into(),
            },
        ]);

        assert_eq!(vocabulary.len(), 3);
        assert!(vocabulary.source_errors["good"].is_empty());
        assert_eq!(
            vocabulary.source_errors["bad"],
            vec![VocabularyError::InvalidWord("A_B".into())]
        );
        assert_eq!(vocabulary.word(2).source_index, 1);
    }

    #[test]
    fn test_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "one\ntwo\nthree").unwrap();

        let vocabulary = Vocabulary::from_file(file.path()).expect("should load word list");

        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.word_id("THREE"), Some(2));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let error = Vocabulary::from_file("/nonexistent/words.txt").unwrap_err();

        assert_eq!(
            error,
            VocabularyError::InvalidPath("/nonexistent/words.txt".into())
        );
        assert_eq!(error.to_string(), "Can’t read file: “/nonexistent/words.txt”");
    }
}
