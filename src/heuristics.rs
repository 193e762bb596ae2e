//! Variable- and value-ordering heuristics for the backtracking search. These only affect how
//! quickly a solution is found (and which one), never whether one is found: every candidate is
//! still tried eventually.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Reverse;

use crate::consistency::Assignment;
use crate::crossword::Crossword;
use crate::domains::Domains;
use crate::types::{VariableId, WordId};
use crate::util::{build_glyph_counts, GlyphCounts};
use crate::vocabulary::Vocabulary;

/// How to break ties that the heuristics themselves leave open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Prefer lower variable ids and keep candidates in domain order.
    #[default]
    Stable,

    /// Permute the residual variable ranking and the candidate order using the given seed.
    Seeded(u64),
}

/// The heuristic state for one search: a residual ranking of variables and, for seeded
/// tie-breaks, the RNG used to permute candidates.
pub struct Heuristics {
    variable_ranks: Vec<usize>,
    rng: Option<SmallRng>,
}

impl Heuristics {
    #[must_use]
    pub fn new(crossword: &Crossword, tie_break: TieBreak) -> Heuristics {
        let mut variable_ranks: Vec<usize> = (0..crossword.variable_count()).collect();

        let rng = match tie_break {
            TieBreak::Stable => None,
            TieBreak::Seeded(seed) => {
                let mut rng = SmallRng::seed_from_u64(seed);
                variable_ranks.shuffle(&mut rng);
                Some(rng)
            }
        };

        Heuristics {
            variable_ranks,
            rng,
        }
    }

    /// Choose the unassigned variable with the fewest remaining options, preferring the one with
    /// the most neighbors among those. Returns `None` once every variable is assigned.
    #[must_use]
    pub fn select_unassigned_variable(
        &self,
        crossword: &Crossword,
        domains: &Domains,
        assignment: &Assignment,
    ) -> Option<VariableId> {
        (0..crossword.variable_count())
            .filter(|&variable_id| !assignment.contains(variable_id))
            .min_by_key(|&variable_id| {
                (
                    domains.option_count(variable_id),
                    Reverse(crossword.degree(variable_id)),
                    self.variable_ranks[variable_id],
                )
            })
    }

    /// Order a variable's options so that the ones ruling out the fewest options for unassigned
    /// neighbors come first.
    pub fn order_domain_values(
        &mut self,
        crossword: &Crossword,
        vocabulary: &Vocabulary,
        domains: &Domains,
        variable_id: VariableId,
        assignment: &Assignment,
    ) -> Vec<WordId> {
        let mut options = domains.options(variable_id).to_vec();
        if let Some(rng) = self.rng.as_mut() {
            options.shuffle(rng);
        }

        // For each unassigned crossing: our cell index, the neighbor's option count, and the
        // neighbor's glyph counts at the shared cell.
        let crossings: Vec<(usize, usize, GlyphCounts)> = crossword
            .neighbors(variable_id)
            .iter()
            .filter(|&&neighbor_id| !assignment.contains(neighbor_id))
            .filter_map(|&neighbor_id| {
                let (cell_idx, neighbor_cell_idx) = crossword.overlap(variable_id, neighbor_id)?;
                Some((
                    cell_idx,
                    domains.option_count(neighbor_id),
                    build_glyph_counts(vocabulary, domains.options(neighbor_id), neighbor_cell_idx),
                ))
            })
            .collect();

        // Equal counts keep their current relative order.
        options.sort_by_cached_key(|&word_id| {
            crossings
                .iter()
                .map(|(cell_idx, option_count, glyph_counts)| {
                    let compatible = vocabulary
                        .char_at(word_id, *cell_idx)
                        .and_then(|glyph| glyph_counts.get(&glyph).copied())
                        .unwrap_or(0);
                    option_count - compatible
                })
                .sum::<usize>()
        });

        options
    }
}

#[cfg(test)]
mod tests {
    use crate::consistency::Assignment;
    use crate::crossword::tests::CROSSING_TEMPLATE;
    use crate::crossword::Crossword;
    use crate::domains::Domains;
    use crate::heuristics::{Heuristics, TieBreak};
    use crate::vocabulary::Vocabulary;
    use indoc::indoc;

    fn lcv_fixture() -> (Crossword, Vocabulary, Domains) {
        (
            Crossword::from_template(CROSSING_TEMPLATE).unwrap(),
            Vocabulary::from_words(&["ICE", "OWL", "CAT", "ARCH", "AXLE", "CORN", "WOLF"]),
            Domains::from_options(vec![vec![0, 1, 2], vec![3, 4, 5, 6]]),
        )
    }

    #[test]
    fn test_selects_minimum_remaining_values() {
        let (crossword, _, _) = lcv_fixture();
        let heuristics = Heuristics::new(&crossword, TieBreak::Stable);

        let domains = Domains::from_options(vec![vec![0, 1, 2], vec![3, 4]]);
        assert_eq!(
            heuristics.select_unassigned_variable(&crossword, &domains, &Assignment::new()),
            Some(1)
        );

        let assignment = Assignment::new().with_choice(1, 3);
        assert_eq!(
            heuristics.select_unassigned_variable(&crossword, &domains, &assignment),
            Some(0)
        );

        let assignment = assignment.with_choice(0, 2);
        assert_eq!(
            heuristics.select_unassigned_variable(&crossword, &domains, &assignment),
            None
        );
    }

    #[test]
    fn test_breaks_ties_by_degree() {
        // The down entry crosses both across entries; each across entry crosses only it.
        let crossword = Crossword::from_template(indoc! {"
            ___
            #_#
            ___
        "})
        .unwrap();
        let heuristics = Heuristics::new(&crossword, TieBreak::Stable);
        let domains = Domains::from_options(vec![vec![0, 1], vec![2, 3], vec![4, 5]]);

        assert_eq!(crossword.degree(2), 2);
        assert_eq!(
            heuristics.select_unassigned_variable(&crossword, &domains, &Assignment::new()),
            Some(2)
        );

        // Once it's assigned, the remaining tie goes to the lower id.
        let assignment = Assignment::new().with_choice(2, 4);
        assert_eq!(
            heuristics.select_unassigned_variable(&crossword, &domains, &assignment),
            Some(0)
        );
    }

    #[test]
    fn test_seeded_tie_break_is_reproducible() {
        let crossword = Crossword::from_template("____\n____\n____\n____\n").unwrap();
        let domains = Domains::from_options(vec![vec![0]; crossword.variable_count()]);

        let pick = |seed| {
            Heuristics::new(&crossword, TieBreak::Seeded(seed)).select_unassigned_variable(
                &crossword,
                &domains,
                &Assignment::new(),
            )
        };

        assert!(pick(7).is_some());
        assert_eq!(pick(7), pick(7));
    }

    #[test]
    fn test_orders_least_constraining_values_first() {
        let (crossword, vocabulary, domains) = lcv_fixture();
        let mut heuristics = Heuristics::new(&crossword, TieBreak::Stable);

        // CAT rules out CORN and WOLF; ICE and OWL each rule out three options.
        let order =
            heuristics.order_domain_values(&crossword, &vocabulary, &domains, 0, &Assignment::new());

        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_assigned_neighbors_dont_count() {
        let (crossword, vocabulary, domains) = lcv_fixture();
        let mut heuristics = Heuristics::new(&crossword, TieBreak::Stable);
        let assignment = Assignment::new().with_choice(1, 3);

        let order = heuristics.order_domain_values(&crossword, &vocabulary, &domains, 0, &assignment);

        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_seeded_ordering_keeps_every_option() {
        let (crossword, vocabulary, domains) = lcv_fixture();
        let mut heuristics = Heuristics::new(&crossword, TieBreak::Seeded(42));

        let mut order =
            heuristics.order_domain_values(&crossword, &vocabulary, &domains, 0, &Assignment::new());

        assert_eq!(order[0], 2);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
