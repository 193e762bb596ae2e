//! This module implements the structural model of a puzzle: the grid of playable and blocked
//! cells, the word slots (variables) it contains, and the overlaps between crossing slots. This is
//! everything the solver needs to know about the grid, independent of the vocabulary.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::{fmt, fs};

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{Arc, GridCoord, Overlap, VariableId};
use crate::MAX_NEIGHBOR_COUNT;

/// The character marking a playable cell in a structure template.
pub const PLAYABLE_CELL: char = '_';

/// The characters marking a blocked cell in a structure template.
pub const BLOCKED_CELLS: [char; 2] = ['#', '█'];

/// The direction that a variable is facing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Across,
    Down,
}

/// A single word slot in the grid. Two variables occupying the same slot are equal.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    #[must_use]
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable {
            row,
            col,
            direction,
            length,
        }
    }

    /// Generate the coords for each cell of this variable.
    #[must_use]
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length)
            .map(|cell_idx| match self.direction {
                Direction::Across => (self.row, self.col + cell_idx),
                Direction::Down => (self.row + cell_idx, self.col),
            })
            .collect()
    }

    /// Parse a string like "1,2,down,5" into a `Variable`.
    pub fn from_key(key: &str) -> Result<Variable, String> {
        let key_parts: Vec<&str> = key.split(',').collect();
        if key_parts.len() != 4 {
            return Err(format!("invalid variable key: {key}"));
        }

        let row: Result<usize, _> = key_parts[0].parse();
        let col: Result<usize, _> = key_parts[1].parse();
        let direction: Option<Direction> = match key_parts[2] {
            "across" => Some(Direction::Across),
            "down" => Some(Direction::Down),
            _ => None,
        };
        let length: Result<usize, _> = key_parts[3].parse();

        if let (Ok(row), Ok(col), Some(direction), Ok(length)) = (row, col, direction, length) {
            Ok(Variable::new(row, col, direction, length))
        } else {
            Err(format!("invalid variable key: {key:?}"))
        }
    }

    /// Represent this variable as a string like "1,2,down,5".
    #[must_use]
    pub fn to_key(&self) -> String {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        format!("{},{},{},{}", self.row, self.col, direction, self.length)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

/// Serialize a `Variable` into a string key.
#[cfg(feature = "serde")]
impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_key())
    }
}

/// Deserialize a `Variable` from a string key.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_string = String::deserialize(deserializer)?;
        Variable::from_key(&raw_string).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrosswordError {
    Empty,
    InvalidCell { row: usize, col: usize, found: char },
    InvalidPath(String),
}

impl fmt::Display for CrosswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrosswordError::Empty => write!(f, "Grid must have at least one row"),
            CrosswordError::InvalidCell { row, col, found } => write!(
                f,
                "Grid contains invalid character “{found}” at row {row}, column {col}"
            ),
            CrosswordError::InvalidPath(path) => write!(f, "Can’t read file: “{path}”"),
        }
    }
}

impl std::error::Error for CrosswordError {}

/// The static constraint graph for a puzzle: grid geometry, variables, and the overlaps between
/// them.
#[derive(Clone)]
pub struct Crossword {
    pub height: usize,
    pub width: usize,

    /// `structure[row][col]` is true if the cell is playable. Every row has `width` entries.
    pub structure: Vec<Vec<bool>>,

    /// Every slot of length > 1, across slots first, each group in row-major order of start cell.
    pub variables: Vec<Variable>,

    /// Overlaps keyed by ordered pair; both orderings of each crossing are present.
    overlaps: HashMap<(VariableId, VariableId), Overlap>,

    /// Sorted neighbor lists, indexed by `VariableId`.
    neighbors: Vec<SmallVec<[VariableId; MAX_NEIGHBOR_COUNT]>>,
}

impl Crossword {
    /// Build a crossword from a playable/blocked matrix. Ragged rows are padded with blocked
    /// cells.
    #[must_use]
    pub fn new(structure: Vec<Vec<bool>>) -> Crossword {
        let height = structure.len();
        let width = structure.iter().map(Vec::len).max().unwrap_or(0);
        let structure: Vec<Vec<bool>> = structure
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();

        let variables = generate_variables(&structure);
        let overlaps = generate_overlaps(&variables);

        let mut neighbors: Vec<SmallVec<[VariableId; MAX_NEIGHBOR_COUNT]>> =
            vec![SmallVec::new(); variables.len()];
        for &(x, y) in overlaps.keys() {
            neighbors[x].push(y);
        }
        for neighbor_list in &mut neighbors {
            neighbor_list.sort_unstable();
        }

        Crossword {
            height,
            width,
            structure,
            variables,
            overlaps,
            neighbors,
        }
    }

    /// Parse a structure template, with `_` representing playable cells and `#` (or `█`)
    /// representing blocks.
    pub fn from_template(template: &str) -> Result<Crossword, CrosswordError> {
        let mut lines: Vec<&str> = template
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        if lines.is_empty() {
            return Err(CrosswordError::Empty);
        }

        let structure = lines
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, cell)| {
                        if cell == PLAYABLE_CELL {
                            Ok(true)
                        } else if BLOCKED_CELLS.contains(&cell) {
                            Ok(false)
                        } else {
                            Err(CrosswordError::InvalidCell {
                                row,
                                col,
                                found: cell,
                            })
                        }
                    })
                    .collect::<Result<Vec<bool>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Crossword::new(structure))
    }

    /// Read a structure template from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Crossword, CrosswordError> {
        let template = fs::read_to_string(path.as_ref()).map_err(|_| {
            CrosswordError::InvalidPath(path.as_ref().to_string_lossy().into())
        })?;
        Crossword::from_template(&template)
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    /// Find the id of the variable occupying the given slot, if there is one.
    #[must_use]
    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variables.iter().position(|v| v == variable)
    }

    /// Is the given cell part of the playable grid?
    #[must_use]
    pub fn is_playable(&self, row: usize, col: usize) -> bool {
        self.structure
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// The cell offsets at which `x` and `y` cross, as (index into x, index into y).
    #[must_use]
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// Every variable that crosses `variable_id`, in ascending id order.
    #[must_use]
    pub fn neighbors(&self, variable_id: VariableId) -> &[VariableId] {
        &self.neighbors[variable_id]
    }

    #[must_use]
    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.neighbors[variable_id].len()
    }

    /// Every ordered pair of crossing variables, which is the starting queue for a full AC-3 pass.
    #[must_use]
    pub fn all_arcs(&self) -> Vec<Arc> {
        (0..self.variables.len())
            .flat_map(|x| self.neighbors(x).iter().map(move |&y| (x, y)))
            .collect()
    }
}

impl Debug for Crossword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crossword")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variables", &self.variables)
            .field("overlaps", &format!("({} entries)", self.overlaps.len() / 2))
            .finish_non_exhaustive()
    }
}

/// Find every run of two or more playable cells, across runs first and then down runs.
fn generate_variables(structure: &[Vec<bool>]) -> Vec<Variable> {
    let height = structure.len();
    let width = structure.first().map_or(0, Vec::len);
    let mut variables = vec![];

    for row in 0..height {
        for col in 0..width {
            if structure[row][col] && (col == 0 || !structure[row][col - 1]) {
                let length = (col..width)
                    .take_while(|&c| structure[row][c])
                    .count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Across, length));
                }
            }
        }
    }

    for row in 0..height {
        for col in 0..width {
            if structure[row][col] && (row == 0 || !structure[row - 1][col]) {
                let length = (row..height)
                    .take_while(|&r| structure[r][col])
                    .count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Down, length));
                }
            }
        }
    }

    variables
}

/// Build a map from each ordered pair of crossing variables to the offsets of their shared cell.
fn generate_overlaps(variables: &[Variable]) -> HashMap<(VariableId, VariableId), Overlap> {
    // Map from cell location to the variables covering it, which we can then use to find
    // crossings.
    let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(VariableId, usize); 2]>> =
        HashMap::new();

    for (variable_id, variable) in variables.iter().enumerate() {
        for (cell_idx, loc) in variable.cell_coords().into_iter().enumerate() {
            entries_by_loc
                .entry(loc)
                .or_default()
                .push((variable_id, cell_idx));
        }
    }

    let mut overlaps = HashMap::new();
    for entries in entries_by_loc.values() {
        for &(x, x_cell) in entries {
            for &(y, y_cell) in entries {
                if x != y {
                    overlaps.insert((x, y), (x_cell, y_cell));
                }
            }
        }
    }

    overlaps
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::crossword::{Direction, Variable};

    #[test]
    fn test_variable_serialization() {
        let variable = Variable::new(1, 2, Direction::Across, 5);

        let key = serde_json::to_string(&variable).unwrap();

        assert_eq!(key, "\"1,2,across,5\"");
    }

    #[test]
    fn test_variable_deserialization() {
        let variable: Variable = serde_json::from_str("\"3,4,down,12\"").unwrap();

        assert_eq!(variable, Variable::new(3, 4, Direction::Down, 12));
    }
}
