//! This module implements grid-filling as a constraint satisfaction problem. We first prune every
//! variable's domain with node consistency (word length) and arc consistency (crossing letters),
//! and then run a depth-first backtracking search ordered by the minimum-remaining-values and
//! least-constraining-value heuristics.
//!
//! The search never shrinks the shared domains. Each recursive call receives its own extended copy
//! of the assignment, so a failed branch can't leak state into its siblings. With inference turned
//! on, each branch also gets its own narrowed copy of the domains.

use instant::{Duration, Instant};
use log::{debug, trace};
use std::fmt;
use std::fmt::{Debug, Formatter};

use crate::arc_consistency::{establish_arc_consistency, ArcConsistencyResult};
use crate::consistency::{is_consistent, Assignment, Choice};
use crate::crossword::Crossword;
use crate::domains::Domains;
use crate::heuristics::{Heuristics, TieBreak};
use crate::render::render_grid;
use crate::types::{Arc, VariableId, WordId};
use crate::vocabulary::{Vocabulary, VocabularySource};
use crate::CHECK_INVARIANTS;

/// A struct tracking stats about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: usize,
    pub backtracks: usize,
    pub consistency_checks: usize,
    pub inference_wipeouts: usize,
    pub node_consistency_eliminations: usize,
    pub arc_consistency_eliminations: usize,
    pub total_time: Duration,
    pub propagation_time: Duration,
    pub search_time: Duration,
}

/// Settings for a fill attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// How to break ties left open by the variable- and value-ordering heuristics.
    pub tie_break: TieBreak,

    /// Should each choice be followed by local arc-consistency propagation on a copy of the
    /// domains? This prunes hopeless branches earlier but doesn't change which puzzles are
    /// solvable.
    pub inference: bool,
}

/// A struct representing the results of a successful fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

impl FillSuccess {
    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.assignment.choices()
    }
}

/// Why a fill operation found no solution. Both cases are ordinary outcomes for an unsolvable
/// puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillFailure {
    /// Arc consistency wiped out this variable's domain before search began.
    PropagationFailure { variable_id: VariableId },

    /// Search tried every candidate without completing an assignment.
    SearchExhausted,
}

impl fmt::Display for FillFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "No solution.")
    }
}

impl std::error::Error for FillFailure {}

/// The recursive part of a fill attempt.
struct Search<'a> {
    crossword: &'a Crossword,
    vocabulary: &'a Vocabulary,
    heuristics: Heuristics,
    inference: bool,
    statistics: Statistics,
}

impl<'a> Search<'a> {
    /// Extend `assignment` one variable at a time until it's complete, or return `None` if no
    /// extension of it can be completed.
    fn backtrack(&mut self, domains: &Domains, assignment: &Assignment) -> Option<Assignment> {
        self.statistics.states += 1;

        // If every variable is assigned, we're done.
        let Some(variable_id) =
            self.heuristics
                .select_unassigned_variable(self.crossword, domains, assignment)
        else {
            return Some(assignment.clone());
        };

        let candidates = self.heuristics.order_domain_values(
            self.crossword,
            self.vocabulary,
            domains,
            variable_id,
            assignment,
        );

        for word_id in candidates {
            let extended = assignment.with_choice(variable_id, word_id);

            self.statistics.consistency_checks += 1;
            if !is_consistent(self.crossword, self.vocabulary, &extended) {
                continue;
            }

            let result = if self.inference {
                let mut narrowed = domains.clone();
                match self.infer(&mut narrowed, variable_id, word_id) {
                    Ok(_) => self.backtrack(&narrowed, &extended),
                    Err(_) => {
                        self.statistics.inference_wipeouts += 1;
                        None
                    }
                }
            } else {
                self.backtrack(domains, &extended)
            };

            if result.is_some() {
                return result;
            }

            self.statistics.backtracks += 1;
        }

        trace!(
            "exhausted candidates for {} at depth {}",
            self.crossword.variable(variable_id),
            assignment.len()
        );
        None
    }

    /// Narrow a copy of the domains to reflect a choice and propagate it to the crossing
    /// variables.
    fn infer(
        &self,
        domains: &mut Domains,
        variable_id: VariableId,
        word_id: WordId,
    ) -> ArcConsistencyResult {
        domains.restrict(variable_id, word_id);

        let arcs: Vec<Arc> = self
            .crossword
            .neighbors(variable_id)
            .iter()
            .map(|&neighbor_id| (neighbor_id, variable_id))
            .collect();

        establish_arc_consistency(self.crossword, self.vocabulary, domains, Some(arcs))
    }
}

/// A solver for a single puzzle, owning the domain store for the duration of the fill.
pub struct Creator<'a> {
    crossword: &'a Crossword,
    vocabulary: &'a Vocabulary,
    domains: Domains,
    config: SearchConfig,
}

impl<'a> Debug for Creator<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creator")
            .field("crossword", &self.crossword)
            .field("vocabulary", &self.vocabulary)
            .field("option_count", &self.domains.total_option_count())
            .field("config", &self.config)
            .finish()
    }
}

impl<'a> Creator<'a> {
    /// Start a fill with every variable's domain set to the full vocabulary.
    #[must_use]
    pub fn new(crossword: &'a Crossword, vocabulary: &'a Vocabulary) -> Creator<'a> {
        Creator::with_config(crossword, vocabulary, SearchConfig::default())
    }

    #[must_use]
    pub fn with_config(
        crossword: &'a Crossword,
        vocabulary: &'a Vocabulary,
        config: SearchConfig,
    ) -> Creator<'a> {
        Creator {
            crossword,
            vocabulary,
            domains: Domains::new(crossword, vocabulary),
            config,
        }
    }

    #[must_use]
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Remove options whose length doesn't match their variable.
    pub fn enforce_node_consistency(&mut self) -> usize {
        self.domains
            .enforce_node_consistency(self.crossword, self.vocabulary)
    }

    /// Run AC-3 over the domain store, starting from the given arcs or from every arc.
    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> ArcConsistencyResult {
        establish_arc_consistency(self.crossword, self.vocabulary, &mut self.domains, arcs)
    }

    /// Search for a complete, consistent extension of `assignment` using the current domains.
    #[must_use]
    pub fn backtrack(&self, assignment: &Assignment) -> Option<Assignment> {
        self.search(assignment).0
    }

    fn search(&self, assignment: &Assignment) -> (Option<Assignment>, Statistics) {
        let mut search = Search {
            crossword: self.crossword,
            vocabulary: self.vocabulary,
            heuristics: Heuristics::new(self.crossword, self.config.tie_break),
            inference: self.config.inference,
            statistics: Statistics::default(),
        };

        let result = search.backtrack(&self.domains, assignment);
        (result, search.statistics)
    }

    /// Enforce node and arc consistency, and then search for a complete assignment.
    pub fn solve(&mut self) -> Result<FillSuccess, FillFailure> {
        let start = Instant::now();

        let node_consistency_eliminations = self.enforce_node_consistency();

        // If propagation alone wipes out a domain, there's no point searching.
        let arc_consistency_eliminations = match self.ac3(None) {
            Ok(success) => success.eliminations,
            Err(failure) => {
                debug!(
                    "no solution: {} has no viable options",
                    self.crossword.variable(failure.variable_id)
                );
                return Err(FillFailure::PropagationFailure {
                    variable_id: failure.variable_id,
                });
            }
        };

        let propagation_time = start.elapsed();
        let (result, mut statistics) = self.search(&Assignment::new());

        statistics.node_consistency_eliminations = node_consistency_eliminations;
        statistics.arc_consistency_eliminations = arc_consistency_eliminations;
        statistics.propagation_time = propagation_time;
        statistics.total_time = start.elapsed();
        statistics.search_time = statistics.total_time - propagation_time;
        debug!("{statistics:?}");

        let Some(assignment) = result else {
            return Err(FillFailure::SearchExhausted);
        };

        if CHECK_INVARIANTS {
            assert!(
                assignment.is_complete(self.crossword),
                "Search returned an incomplete assignment"
            );
            assert!(
                is_consistent(self.crossword, self.vocabulary, &assignment),
                "Search returned an inconsistent assignment"
            );
        }

        Ok(FillSuccess {
            statistics,
            assignment,
        })
    }
}

/// Search for a fill of the given crossword, using a fresh domain store.
pub fn find_fill(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    config: SearchConfig,
) -> Result<FillSuccess, FillFailure> {
    Creator::with_config(crossword, vocabulary, config).solve()
}

/// Parse a structure template and a word list (one word per line), fill the grid, and render the
/// result as text. Returns `Ok(None)` if the puzzle has no solution.
pub fn fill_template(
    structure: &str,
    words: &str,
    config: SearchConfig,
) -> Result<Option<String>, String> {
    let crossword = Crossword::from_template(structure).map_err(|error| error.to_string())?;

    let vocabulary = Vocabulary::new(&[VocabularySource::FileContents {
        id: "0".into(),
        contents: words.into(),
    }]);
    if let Some(error) = vocabulary.errors().next() {
        return Err(error.to_string());
    }

    Ok(find_fill(&crossword, &vocabulary, config)
        .ok()
        .map(|success| render_grid(&crossword, &vocabulary, &success.assignment)))
}
