//! Binary shape grids and their dihedral images.

use std::fmt;

use crate::error::ShapeError;
use crate::geometry::{Pos, MAX_SIDE};

/// A rectangular grid of filled/empty cells.
///
/// Equality is structural: the dimensions and the row-major cells must both
/// match, so the same pattern inside a larger bounding box is a different shape.
/// The derived ordering (width, height, then cells) picks canonical forms.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: Vec<bool>,
}

impl Shape {
    /// Parse a grid of 0/1 values, one slice per row.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Shape, ShapeError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(ShapeError::Empty);
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(ShapeError::TooLarge { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                match value {
                    0 => cells.push(false),
                    1 => cells.push(true),
                    _ => return Err(ShapeError::InvalidCell { x, y, value }),
                }
            }
        }

        if !cells.iter().any(|&c| c) {
            return Err(ShapeError::NoFilledCells);
        }

        Ok(Shape {
            width: width as u8,
            height: height as u8,
            cells,
        })
    }

    /// Build a shape of the given size from a cell function.
    fn from_fn(width: u8, height: u8, f: impl Fn(usize, usize) -> bool) -> Shape {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as usize {
            for x in 0..width as usize {
                cells.push(f(x, y));
            }
        }
        Shape {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// True if `(x, y)` is inside the bounding box and filled.
    #[inline]
    pub fn filled(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && x < self.width as i32
            && y < self.height as i32
            && self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Number of filled cells.
    pub fn cell_count(&self) -> u32 {
        self.cells.iter().filter(|&&c| c).count() as u32
    }

    /// Filled cells in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(move |(i, _)| Pos::new((i % width) as u8, (i / width) as u8))
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotated(&self) -> Shape {
        let h = self.height as usize;
        Shape::from_fn(self.height, self.width, |x, y| {
            self.cells[(h - 1 - x) * self.width as usize + y]
        })
    }

    /// Mirror left-right.
    pub fn mirrored_horizontal(&self) -> Shape {
        let w = self.width as usize;
        Shape::from_fn(self.width, self.height, |x, y| self.cells[y * w + (w - 1 - x)])
    }

    /// Mirror top-bottom.
    pub fn mirrored_vertical(&self) -> Shape {
        let w = self.width as usize;
        let h = self.height as usize;
        Shape::from_fn(self.width, self.height, |x, y| self.cells[(h - 1 - y) * w + x])
    }

    /// The 12 images {original, mirrored left-right, mirrored top-bottom} x
    /// {0, 90, 180, 270 degrees}. Together they cover all 8 dihedral images.
    pub fn images(&self) -> Vec<Shape> {
        let mut images = Vec::with_capacity(12);
        for reflected in [
            self.clone(),
            self.mirrored_horizontal(),
            self.mirrored_vertical(),
        ] {
            let mut current = reflected;
            for _ in 0..4 {
                let next = current.rotated();
                images.push(current);
                current = next;
            }
        }
        images
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                write!(f, "{}", if self.filled(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}x{}:", self.width, self.height)?;
        for y in 0..self.height as i32 {
            write!(f, " ")?;
            for x in 0..self.width as i32 {
                write!(f, "{}", if self.filled(x, y) { 1 } else { 0 })?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: &[&[u8]]) -> Shape {
        Shape::from_rows(rows).unwrap()
    }

    #[test]
    fn test_from_rows_rejects_non_binary() {
        let err = Shape::from_rows(&[[0u8, 1, 2]]).unwrap_err();
        assert_eq!(err, ShapeError::InvalidCell { x: 2, y: 0, value: 2 });
    }

    #[test]
    fn test_from_rows_rejects_bad_grids() {
        let empty: [&[u8]; 0] = [];
        assert_eq!(Shape::from_rows(&empty).unwrap_err(), ShapeError::Empty);
        assert_eq!(Shape::from_rows(&[[0u8; 0]]).unwrap_err(), ShapeError::Empty);
        assert_eq!(
            Shape::from_rows(&[&[1u8, 1][..], &[1][..]]).unwrap_err(),
            ShapeError::Ragged { row: 1, expected: 2, found: 1 }
        );
        assert_eq!(
            Shape::from_rows(&[[0u8, 0], [0, 0]]).unwrap_err(),
            ShapeError::NoFilledCells
        );
    }

    #[test]
    fn test_rotate() {
        // 01
        // 11
        let s = shape(&[&[0, 1], &[1, 1]]);
        // 10
        // 11
        assert_eq!(s.rotated(), shape(&[&[1, 0], &[1, 1]]));

        // 011
        // 110
        let s = shape(&[&[0, 1, 1], &[1, 1, 0]]);
        // 10
        // 11
        // 01
        assert_eq!(s.rotated(), shape(&[&[1, 0], &[1, 1], &[0, 1]]));
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let s = shape(&[&[1, 0, 0], &[1, 1, 1]]);
        assert_eq!(s.rotated().rotated().rotated().rotated(), s);
    }

    #[test]
    fn test_mirrors() {
        let s = shape(&[&[1, 1, 0], &[0, 1, 0]]);
        assert_eq!(s.mirrored_horizontal(), shape(&[&[0, 1, 1], &[0, 1, 0]]));
        assert_eq!(s.mirrored_vertical(), shape(&[&[0, 1, 0], &[1, 1, 0]]));
        assert_eq!(s.mirrored_horizontal().mirrored_horizontal(), s);
    }

    #[test]
    fn test_bounding_box_is_part_of_identity() {
        let tight = shape(&[&[1, 1]]);
        let padded = shape(&[&[1, 1], &[0, 0]]);
        assert_ne!(tight, padded);
        assert_eq!(tight.cell_count(), padded.cell_count());
    }

    #[test]
    fn test_filled_cells_row_major() {
        let s = shape(&[&[0, 1], &[1, 1]]);
        assert_eq!(
            s.filled_cells().collect::<Vec<_>>(),
            vec![Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)]
        );
        assert!(!s.filled(-1, 0));
        assert!(!s.filled(0, 2));
    }

    #[test]
    fn test_images_count() {
        let s = shape(&[&[1]]);
        assert_eq!(s.images().len(), 12);
    }

    #[test]
    fn test_display() {
        let s = shape(&[&[0, 1, 0], &[1, 1, 1]]);
        assert_eq!(s.to_string(), ".#.\n###\n");
    }
}
