//! Presentation of an assignment: as a grid of letters, as text, and as a bitmap image.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::consistency::Assignment;
use crate::crossword::Crossword;
use crate::vocabulary::Vocabulary;

/// The character used for non-playable cells in text output.
pub const BLOCK_CHAR: char = '█';

/// The side length of one cell in a rendered image, in pixels.
pub const CELL_SIZE: usize = 100;

/// The width of the black frame drawn inside each cell, in pixels.
pub const BORDER_WIDTH: usize = 2;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
const GLYPH_SCALE: usize = 10;

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

lazy_static! {
    /// A 5x7 bitmap font for the Latin capitals. Each row is five bits, most significant bit on
    /// the left.
    static ref FONT: HashMap<char, [u8; GLYPH_HEIGHT]> = {
        let glyphs: [(char, [u8; GLYPH_HEIGHT]); 26] = [
            ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
            ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
            ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
            ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
            ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
            ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
            ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
            ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
            ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
            ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
            ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
            ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
            ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
            ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
            ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
            ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
            ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
            ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
            ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
            ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
            ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
            ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
            ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
            ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
            ('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
            ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        ];
        glyphs.into_iter().collect()
    };
}

/// Lay out the letters of an assignment on the grid. Blocked cells and playable cells that no
/// assigned variable covers are `None`.
#[must_use]
pub fn letter_grid(
    crossword: &Crossword,
    vocabulary: &Vocabulary,
    assignment: &Assignment,
) -> Vec<Vec<Option<char>>> {
    let mut grid = vec![vec![None; crossword.width]; crossword.height];

    for (variable_id, word_id) in assignment.iter() {
        let word = vocabulary.word(word_id);
        let coords = crossword.variable(variable_id).cell_coords();

        for (&(row, col), &glyph) in coords.iter().zip(word.chars.iter()) {
            grid[row][col] = Some(glyph);
        }
    }

    grid
}

/// Render an assignment as text, one line per row: letters for assigned cells, a space for empty
/// playable cells, and `█` for blocks.
#[must_use]
pub fn render_grid(crossword: &Crossword, vocabulary: &Vocabulary, assignment: &Assignment) -> String {
    letter_grid(crossword, vocabulary, assignment)
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Some(glyph) => *glyph,
                    None if crossword.is_playable(row, col) => ' ',
                    None => BLOCK_CHAR,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an assignment as a binary PPM (P6) image. Each cell is `CELL_SIZE` pixels square with a
/// black frame; blocks are solid black, and letters missing from the built-in font are left out.
#[must_use]
pub fn render_image(crossword: &Crossword, vocabulary: &Vocabulary, assignment: &Assignment) -> Vec<u8> {
    let width_px = crossword.width * CELL_SIZE;
    let height_px = crossword.height * CELL_SIZE;
    let letters = letter_grid(crossword, vocabulary, assignment);

    let mut pixels = vec![0_u8; width_px * height_px * 3];
    let mut paint = |x: usize, y: usize, color: [u8; 3]| {
        let idx = (y * width_px + x) * 3;
        pixels[idx..idx + 3].copy_from_slice(&color);
    };

    let glyph_left = (CELL_SIZE - GLYPH_WIDTH * GLYPH_SCALE) / 2;
    let glyph_top = (CELL_SIZE - GLYPH_HEIGHT * GLYPH_SCALE) / 2;

    for row in 0..crossword.height {
        for col in 0..crossword.width {
            if !crossword.is_playable(row, col) {
                continue;
            }

            let (cell_x, cell_y) = (col * CELL_SIZE, row * CELL_SIZE);
            for y in BORDER_WIDTH..CELL_SIZE - BORDER_WIDTH {
                for x in BORDER_WIDTH..CELL_SIZE - BORDER_WIDTH {
                    paint(cell_x + x, cell_y + y, WHITE);
                }
            }

            let Some(glyph) = letters[row][col].and_then(|letter| FONT.get(&letter)) else {
                continue;
            };

            for (glyph_row, bits) in glyph.iter().enumerate() {
                for glyph_col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - glyph_col)) == 0 {
                        continue;
                    }
                    let x0 = cell_x + glyph_left + glyph_col * GLYPH_SCALE;
                    let y0 = cell_y + glyph_top + glyph_row * GLYPH_SCALE;
                    for y in y0..y0 + GLYPH_SCALE {
                        for x in x0..x0 + GLYPH_SCALE {
                            paint(x, y, BLACK);
                        }
                    }
                }
            }
        }
    }

    let mut image = format!("P6\n{width_px} {height_px}\n255\n").into_bytes();
    image.extend_from_slice(&pixels);
    image
}

#[cfg(test)]
mod tests {
    use crate::consistency::Assignment;
    use crate::crossword::tests::CROSSING_TEMPLATE;
    use crate::crossword::Crossword;
    use crate::render::{letter_grid, render_grid, render_image, CELL_SIZE};
    use crate::vocabulary::Vocabulary;

    fn fixture() -> (Crossword, Vocabulary) {
        (
            Crossword::from_template(CROSSING_TEMPLATE).unwrap(),
            Vocabulary::from_words(&["CAT", "ARCH"]),
        )
    }

    fn pixel(image: &[u8], header_len: usize, width_px: usize, x: usize, y: usize) -> [u8; 3] {
        let idx = header_len + (y * width_px + x) * 3;
        [image[idx], image[idx + 1], image[idx + 2]]
    }

    #[test]
    fn test_letter_grid() {
        let (crossword, vocabulary) = fixture();
        let assignment = Assignment::new().with_choice(0, 0);

        let grid = letter_grid(&crossword, &vocabulary, &assignment);

        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0], vec![Some('C'), Some('A'), Some('T')]);
        assert_eq!(grid[1], vec![None, None, None]);
    }

    #[test]
    fn test_render_grid() {
        let (crossword, vocabulary) = fixture();

        let partial = Assignment::new().with_choice(0, 0);
        assert_eq!(
            render_grid(&crossword, &vocabulary, &partial),
            "CAT\n█ █\n█ █\n█ █"
        );

        let complete = partial.with_choice(1, 1);
        assert_eq!(
            render_grid(&crossword, &vocabulary, &complete),
            "CAT\n█R█\n█C█\n█H█"
        );

        assert_eq!(
            render_grid(&crossword, &vocabulary, &Assignment::new()),
            "   \n█ █\n█ █\n█ █"
        );
    }

    #[test]
    fn test_render_image() {
        let (crossword, vocabulary) = fixture();
        let assignment = Assignment::new().with_choice(0, 0);

        let image = render_image(&crossword, &vocabulary, &assignment);

        let header = b"P6\n300 400\n255\n";
        assert!(image.starts_with(header));
        assert_eq!(image.len(), header.len() + 300 * 400 * 3);

        let at = |x, y| pixel(&image, header.len(), 3 * CELL_SIZE, x, y);

        // Blocked cell.
        assert_eq!(at(50, 150), [0, 0, 0]);

        // Empty playable cell, with its frame.
        assert_eq!(at(150, 150), [255, 255, 255]);
        assert_eq!(at(100, 150), [0, 0, 0]);
        assert_eq!(at(150, 101), [0, 0, 0]);

        // The top bar of the T in the top-right cell, and the background beside its stem.
        assert_eq!(at(250, 20), [0, 0, 0]);
        assert_eq!(at(230, 30), [255, 255, 255]);
    }
}
