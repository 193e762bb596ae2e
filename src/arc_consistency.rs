//! This module contains a crossword-specific implementation of the AC-3 algorithm. A pair of
//! crossing variables is arc-consistent when every option for one of them has at least one option
//! in the other that agrees on the letter in their shared cell. For example, if 1D doesn't have
//! any options starting with the letter A, we want to remove any options for 1A that start with
//! the letter A.
//!
//! We keep revising arcs until no more eliminations are possible, or until some variable has no
//! options left, in which case the puzzle has no solution.

use log::{debug, trace};
use std::collections::{HashSet, VecDeque};

use crate::crossword::Crossword;
use crate::domains::Domains;
use crate::types::{Arc, VariableId};
use crate::util::build_glyph_counts;
use crate::vocabulary::Vocabulary;

/// Result from a successful call to `establish_arc_consistency`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many arcs caused at least one elimination.
    pub revisions: usize,

    /// How many options were removed in total.
    pub eliminations: usize,
}

/// Result from a failed call to `establish_arc_consistency`, identifying the variable whose domain
/// was wiped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub variable_id: VariableId,
}

/// Result from a call to `establish_arc_consistency`.
pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Make `x` arc-consistent with `y` by removing every option for `x` that has no option in `y`
/// agreeing at their shared cell. Returns the number of options removed; zero means no revision
/// was made. Variables that don't cross are left alone.
///
/// The domains are expected to be node-consistent already. An option too short to reach the
/// shared cell has no letter there, so it's never supported and never supports anything.
pub fn revise(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    domains: &mut Domains,
    x: VariableId,
    y: VariableId,
) -> usize {
    let Some((x_cell, y_cell)) = crossword.overlap(x, y) else {
        return 0;
    };

    // The letters `y` can supply at the shared cell, counted once up front so that each option
    // for `x` can be checked in constant time.
    let supported_glyphs = build_glyph_counts(vocabulary, domains.options(y), y_cell);

    domains.retain(x, |word_id| {
        vocabulary
            .char_at(word_id, x_cell)
            .is_some_and(|glyph| supported_glyphs.contains_key(&glyph))
    })
}

/// Prune `domains` until every arc is consistent. If `arcs` is `None`, every ordered pair of
/// crossing variables is checked; otherwise only the given arcs are queued to begin with (which is
/// enough when the domains were previously arc-consistent and only the variables those arcs point
/// at have changed).
pub fn establish_arc_consistency(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    domains: &mut Domains,
    arcs: Option<Vec<Arc>>,
) -> ArcConsistencyResult {
    let mut queue: VecDeque<Arc> = arcs.unwrap_or_else(|| crossword.all_arcs()).into();
    let mut queued: HashSet<Arc> = queue.iter().copied().collect();
    let mut success = ArcConsistencySuccess::default();

    while let Some((x, y)) = queue.pop_front() {
        queued.remove(&(x, y));

        let removed = revise(crossword, vocabulary, domains, x, y);
        if removed == 0 {
            continue;
        }

        trace!(
            "revising {} against {} removed {removed} options",
            crossword.variable(x),
            crossword.variable(y)
        );
        success.revisions += 1;
        success.eliminations += removed;

        if domains.is_empty_for(x) {
            debug!(
                "arc consistency wiped out the domain of {}",
                crossword.variable(x)
            );
            return Err(ArcConsistencyFailure { variable_id: x });
        }

        // `x` lost options, so every other variable crossing it needs to be rechecked against it.
        for &z in crossword.neighbors(x) {
            if z != y && queued.insert((z, x)) {
                queue.push_back((z, x));
            }
        }
    }

    debug!(
        "arc consistency established after {} revisions ({} eliminations)",
        success.revisions, success.eliminations
    );
    Ok(success)
}
