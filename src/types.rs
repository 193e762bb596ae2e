/// An identifier for a given word, based on its index in the `Vocabulary`'s `words` field.
pub type WordId = usize;

/// An identifier for a given variable (word slot), based on its index in the `Crossword`'s
/// `variables` field.
pub type VariableId = usize;

/// An ordered pair of variables whose consistency is being enforced, as used by AC-3. The first
/// variable is the one whose domain may shrink.
pub type Arc = (VariableId, VariableId);

/// The position of the single shared cell between two crossing variables, as (index into the first
/// variable's word, index into the second's).
pub type Overlap = (usize, usize);

/// Zero-indexed (row, column) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);
