//! Assignments and the checker that validates them. An assignment is consistent when its words are
//! pairwise distinct, each word fits its variable's length, and every pair of assigned crossing
//! variables agrees on their shared letter. Partial assignments are allowed; constraints involving
//! an unassigned variable are skipped.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::crossword::Crossword;
use crate::types::{VariableId, WordId};
use crate::vocabulary::Vocabulary;

/// A struct recording a single variable assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub variable_id: VariableId,
    pub word_id: WordId,
}

/// A partial or complete mapping from variables to chosen words. Search never edits an
/// assignment in place; `with_choice` produces an extended copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    choices: BTreeMap<VariableId, WordId>,
}

impl Assignment {
    #[must_use]
    pub fn new() -> Assignment {
        Assignment::default()
    }

    /// A copy of this assignment with one more (or one replaced) choice.
    #[must_use]
    pub fn with_choice(&self, variable_id: VariableId, word_id: WordId) -> Assignment {
        let mut choices = self.choices.clone();
        choices.insert(variable_id, word_id);
        Assignment { choices }
    }

    #[must_use]
    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.choices.get(&variable_id).copied()
    }

    #[must_use]
    pub fn contains(&self, variable_id: VariableId) -> bool {
        self.choices.contains_key(&variable_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Does this assignment cover every variable in the crossword?
    #[must_use]
    pub fn is_complete(&self, crossword: &Crossword) -> bool {
        (0..crossword.variable_count()).all(|variable_id| self.contains(variable_id))
    }

    /// Iterate over (variable, word) pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.choices
            .iter()
            .map(|(&variable_id, &word_id)| (variable_id, word_id))
    }

    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.iter()
            .map(|(variable_id, word_id)| Choice {
                variable_id,
                word_id,
            })
            .collect()
    }
}

impl FromIterator<(VariableId, WordId)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (VariableId, WordId)>>(iter: T) -> Self {
        Assignment {
            choices: iter.into_iter().collect(),
        }
    }
}

/// The first constraint violation found in an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// The same word is assigned to more than one variable.
    DuplicateWord { word_id: WordId },

    /// A word doesn't have the same length as its variable.
    LengthMismatch {
        variable_id: VariableId,
        word_id: WordId,
    },

    /// Two crossing variables disagree on their shared letter.
    OverlapConflict { x: VariableId, y: VariableId },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::DuplicateWord { word_id } => {
                write!(f, "word {word_id} is assigned more than once")
            }
            Inconsistency::LengthMismatch {
                variable_id,
                word_id,
            } => write!(
                f,
                "word {word_id} doesn't fit the length of variable {variable_id}"
            ),
            Inconsistency::OverlapConflict { x, y } => {
                write!(f, "variables {x} and {y} disagree at their crossing")
            }
        }
    }
}

/// Check an assignment against the distinctness, length, and overlap constraints, in that order,
/// returning the first violation found.
pub fn check_consistency(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    assignment: &Assignment,
) -> Result<(), Inconsistency> {
    // The vocabulary is deduplicated, so equal ids and equal words are the same thing.
    let mut seen_words: HashSet<WordId> = HashSet::with_capacity(assignment.len());
    for (_, word_id) in assignment.iter() {
        if !seen_words.insert(word_id) {
            return Err(Inconsistency::DuplicateWord { word_id });
        }
    }

    for (variable_id, word_id) in assignment.iter() {
        if vocabulary.word(word_id).length() != crossword.variable(variable_id).length {
            return Err(Inconsistency::LengthMismatch {
                variable_id,
                word_id,
            });
        }
    }

    for (x, x_word) in assignment.iter() {
        for &y in crossword.neighbors(x) {
            let Some(y_word) = assignment.get(y) else {
                continue;
            };
            let Some((x_cell, y_cell)) = crossword.overlap(x, y) else {
                continue;
            };

            if vocabulary.char_at(x_word, x_cell) != vocabulary.char_at(y_word, y_cell) {
                return Err(Inconsistency::OverlapConflict { x, y });
            }
        }
    }

    Ok(())
}

/// Is this (possibly partial) assignment consistent?
#[must_use]
pub fn is_consistent(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    assignment: &Assignment,
) -> bool {
    check_consistency(crossword, vocabulary, assignment).is_ok()
}

#[cfg(test)]
mod tests {
    use crate::consistency::{check_consistency, is_consistent, Assignment, Inconsistency};
    use crate::crossword::tests::CROSSING_TEMPLATE;
    use crate::crossword::Crossword;
    use crate::vocabulary::Vocabulary;

    fn fixture() -> (Crossword, Vocabulary) {
        (
            Crossword::from_template(CROSSING_TEMPLATE).unwrap(),
            // CAT=0, BAT=1, ARCH=2, TREE=3, AB=4, ARC=5
            Vocabulary::from_words(&["CAT", "BAT", "ARCH", "TREE", "AB", "ARC"]),
        )
    }

    #[test]
    fn test_empty_assignment_is_consistent() {
        let (crossword, vocabulary) = fixture();

        assert!(is_consistent(&crossword, &vocabulary, &Assignment::new()));
        assert!(!Assignment::new().is_complete(&crossword));
    }

    #[test]
    fn test_complete_matching_assignment_is_consistent() {
        let (crossword, vocabulary) = fixture();
        let assignment = Assignment::new().with_choice(0, 0).with_choice(1, 2);

        assert!(assignment.is_complete(&crossword));
        assert_eq!(check_consistency(&crossword, &vocabulary, &assignment), Ok(()));
    }

    #[test]
    fn test_duplicates_are_inconsistent() {
        let crossword = Crossword::from_template("___\n#_#\n#__\n").unwrap();
        let vocabulary = Vocabulary::from_words(&["AAA", "AA"]);

        // Across 0 and down 2 can both hold "AAA" as far as letters go.
        let distinct = Assignment::new().with_choice(0, 0).with_choice(1, 1);
        let duplicated = distinct.with_choice(2, 0);

        assert!(is_consistent(&crossword, &vocabulary, &distinct));
        assert_eq!(
            check_consistency(&crossword, &vocabulary, &duplicated),
            Err(Inconsistency::DuplicateWord { word_id: 0 })
        );
    }

    #[test]
    fn test_length_mismatch_is_inconsistent() {
        let (crossword, vocabulary) = fixture();
        let assignment = Assignment::new().with_choice(1, 5);

        assert_eq!(
            check_consistency(&crossword, &vocabulary, &assignment),
            Err(Inconsistency::LengthMismatch {
                variable_id: 1,
                word_id: 5
            })
        );
    }

    #[test]
    fn test_overlap_conflict_is_inconsistent() {
        let (crossword, vocabulary) = fixture();
        let assignment = Assignment::new().with_choice(0, 0).with_choice(1, 3);

        assert_eq!(
            check_consistency(&crossword, &vocabulary, &assignment),
            Err(Inconsistency::OverlapConflict { x: 0, y: 1 })
        );
    }

    #[test]
    fn test_unassigned_neighbors_are_skipped() {
        let (crossword, vocabulary) = fixture();

        // TREE doesn't cross anything assigned yet.
        let assignment = Assignment::new().with_choice(1, 3);

        assert!(is_consistent(&crossword, &vocabulary, &assignment));
        assert!(!assignment.is_complete(&crossword));
    }

    #[test]
    fn test_with_choice_copies() {
        let base = Assignment::new().with_choice(0, 0);
        let extended = base.with_choice(1, 2);

        assert_eq!(base.len(), 1);
        assert_eq!(base.get(1), None);
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.get(1), Some(2));
        assert_eq!(
            extended.iter().collect::<Vec<_>>(),
            vec![(0, 0), (1, 2)]
        );
    }
}
