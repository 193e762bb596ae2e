//! The domain store: for each variable, the vocabulary words still considered possible. Domains
//! start as the full vocabulary and only ever shrink. They are mutated by node consistency (here)
//! and arc consistency (`arc_consistency.rs`), and are read-only once search begins.

use log::debug;

use crate::crossword::Crossword;
use crate::types::{VariableId, WordId};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    /// Remaining options for each variable, indexed by `VariableId`. Options keep vocabulary order
    /// and contain no duplicates.
    options: Vec<Vec<WordId>>,
}

impl Domains {
    /// Give every variable in the crossword a copy of the full vocabulary.
    #[must_use]
    pub fn new(crossword: &Crossword, vocabulary: &Vocabulary) -> Domains {
        Domains {
            options: vec![(0..vocabulary.len()).collect(); crossword.variable_count()],
        }
    }

    /// Build domains from explicit option lists.
    #[must_use]
    pub fn from_options(options: Vec<Vec<WordId>>) -> Domains {
        Domains { options }
    }

    /// The remaining options for a variable.
    #[must_use]
    pub fn options(&self, variable_id: VariableId) -> &[WordId] {
        &self.options[variable_id]
    }

    #[must_use]
    pub fn option_count(&self, variable_id: VariableId) -> usize {
        self.options[variable_id].len()
    }

    #[must_use]
    pub fn total_option_count(&self) -> usize {
        self.options.iter().map(Vec::len).sum()
    }

    /// Has this variable's domain been wiped out?
    #[must_use]
    pub fn is_empty_for(&self, variable_id: VariableId) -> bool {
        self.options[variable_id].is_empty()
    }

    #[must_use]
    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.options[variable_id].contains(&word_id)
    }

    /// Keep only the options for which `keep` returns true, returning the number removed.
    pub fn retain<F: FnMut(WordId) -> bool>(&mut self, variable_id: VariableId, mut keep: F) -> usize {
        let options = &mut self.options[variable_id];
        let before = options.len();
        options.retain(|&word_id| keep(word_id));
        before - options.len()
    }

    /// Narrow a variable's domain to a single word. If the word isn't currently an option, the
    /// domain becomes empty.
    pub fn restrict(&mut self, variable_id: VariableId, word_id: WordId) -> usize {
        self.retain(variable_id, |option| option == word_id)
    }

    /// Remove every option whose length differs from its variable's length, returning the number
    /// of options removed. An emptied domain is left for arc consistency or search to report.
    pub fn enforce_node_consistency(
        &mut self,
        crossword: &Crossword,
        vocabulary: &Vocabulary,
    ) -> usize {
        let mut removed = 0;

        for (variable_id, variable) in crossword.variables.iter().enumerate() {
            removed += self.retain(variable_id, |word_id| {
                vocabulary.word(word_id).length() == variable.length
            });

            if self.is_empty_for(variable_id) {
                debug!("node consistency emptied the domain of {variable}");
            }
        }

        debug!("node consistency removed {removed} options");
        removed
    }
}

#[cfg(test)]
mod tests {
    use crate::crossword::tests::CROSSING_TEMPLATE;
    use crate::crossword::Crossword;
    use crate::domains::Domains;
    use crate::vocabulary::Vocabulary;

    #[test]
    fn test_new_domains_hold_the_full_vocabulary() {
        let crossword = Crossword::from_template(CROSSING_TEMPLATE).unwrap();
        let vocabulary = Vocabulary::from_words(&["CAT", "TREE", "AB"]);

        let domains = Domains::new(&crossword, &vocabulary);

        assert_eq!(domains.options(0), &[0, 1, 2]);
        assert_eq!(domains.options(1), &[0, 1, 2]);
        assert_eq!(domains.total_option_count(), 6);
    }

    #[test]
    fn test_node_consistency_prunes_by_length() {
        let crossword = Crossword::from_template(CROSSING_TEMPLATE).unwrap();
        let vocabulary = Vocabulary::from_words(&["CAT", "TREE", "AB", "DOG", "TOAD"]);
        let mut domains = Domains::new(&crossword, &vocabulary);

        let removed = domains.enforce_node_consistency(&crossword, &vocabulary);

        assert_eq!(removed, 6);
        assert_eq!(domains.options(0), &[0, 3]);
        assert_eq!(domains.options(1), &[1, 4]);

        // Running it again changes nothing.
        assert_eq!(domains.enforce_node_consistency(&crossword, &vocabulary), 0);
    }

    #[test]
    fn test_node_consistency_can_empty_a_domain() {
        let crossword = Crossword::from_template(CROSSING_TEMPLATE).unwrap();
        let vocabulary = Vocabulary::from_words(&["CAT", "DOG"]);
        let mut domains = Domains::new(&crossword, &vocabulary);

        domains.enforce_node_consistency(&crossword, &vocabulary);

        assert!(!domains.is_empty_for(0));
        assert!(domains.is_empty_for(1));
    }

    #[test]
    fn test_restrict() {
        let mut domains = Domains::from_options(vec![vec![0, 1, 2]]);

        assert_eq!(domains.restrict(0, 1), 2);
        assert_eq!(domains.options(0), &[1]);

        assert_eq!(domains.restrict(0, 2), 1);
        assert!(domains.is_empty_for(0));
    }
}
