//! The 21 classic Blokus pieces.

use crate::error::CatalogError;
use crate::piece::Catalog;
use crate::shape::Shape;

/// Classic board side.
pub const BOARD_SIZE: usize = 20;

/// Piece grids, smallest first: monomino, domino, trominoes, tetrominoes,
/// then the 12 pentominoes.
pub const GRIDS: [&[&[u8]]; 21] = [
    // I1
    &[&[1]],
    // I2
    &[&[1, 1]],
    // I3
    &[&[1, 1, 1]],
    // V3
    &[&[1, 1], &[1, 0]],
    // I4
    &[&[1, 1, 1, 1]],
    // O4
    &[&[1, 1], &[1, 1]],
    // T4
    &[&[1, 1, 1], &[0, 1, 0]],
    // L4
    &[&[1, 0], &[1, 0], &[1, 1]],
    // S4
    &[&[0, 1, 1], &[1, 1, 0]],
    // I5
    &[&[1, 1, 1, 1, 1]],
    // L5
    &[&[1, 0], &[1, 0], &[1, 0], &[1, 1]],
    // Y5
    &[&[0, 1], &[1, 1], &[0, 1], &[0, 1]],
    // N5
    &[&[0, 1], &[0, 1], &[1, 1], &[1, 0]],
    // P5
    &[&[1, 1], &[1, 1], &[1, 0]],
    // U5
    &[&[1, 0, 1], &[1, 1, 1]],
    // V5
    &[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1]],
    // T5
    &[&[1, 1, 1], &[0, 1, 0], &[0, 1, 0]],
    // W5
    &[&[1, 0, 0], &[1, 1, 0], &[0, 1, 1]],
    // Z5
    &[&[1, 1, 0], &[0, 1, 0], &[0, 1, 1]],
    // F5
    &[&[0, 1, 1], &[1, 1, 0], &[0, 1, 0]],
    // X5
    &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]],
];

/// Parsed standard shapes.
pub fn shapes() -> Result<Vec<Shape>, CatalogError> {
    GRIDS
        .iter()
        .enumerate()
        .map(|(piece, &rows)| {
            Shape::from_rows(rows).map_err(|source| CatalogError::Shape { piece, source })
        })
        .collect()
}

/// Standard pieces bound to a `width` x `height` board.
///
/// The I5 needs a side of 5 at least.
pub fn catalog(width: usize, height: usize) -> Result<Catalog, CatalogError> {
    Catalog::from_grids(width, height, &GRIDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_counts() {
        let shapes = shapes().unwrap();
        assert_eq!(shapes.len(), 21);
        assert_eq!(shapes.iter().map(|s| s.cell_count()).sum::<u32>(), 89);
    }

    #[test]
    fn test_standard_variant_counts() {
        let catalog = catalog(BOARD_SIZE, BOARD_SIZE).unwrap();
        let counts: Vec<usize> = catalog.pieces().iter().map(|p| p.variants().len()).collect();
        assert_eq!(
            counts,
            vec![1, 2, 2, 4, 2, 1, 4, 8, 4, 2, 8, 8, 8, 8, 4, 4, 4, 4, 4, 8, 1]
        );
        assert_eq!(counts.iter().sum::<usize>(), 91);
    }

    #[test]
    fn test_standard_catalog_needs_room() {
        assert!(matches!(
            catalog(4, 4),
            Err(CatalogError::PieceTooLarge { piece: 9, .. })
        ));
        assert!(catalog(5, 5).is_ok());
        // Bars stand up in three columns
        assert!(catalog(3, 20).is_ok());
    }

    #[test]
    fn test_every_grid_parses() {
        let shapes = shapes().unwrap();
        for (shape, rows) in shapes.iter().zip(GRIDS) {
            assert_eq!(shape.height() as usize, rows.len());
            assert_eq!(shape.width() as usize, rows[0].len());
        }
    }
}
