/// TileGrid: the level's immutable 2D array of tile ids.
///
/// Built once when a level loads and never mutated during play.
/// Two coordinate spaces:
///   - tile coordinates (`tile_at`), row-major, `y` grows downward
///   - pixel coordinates (`tile_at_pixel`), floor-divided by the tile size
///
/// Anything outside the grid reads as `TileId::INVALID`.

use thiserror::Error;

use super::tile::{TileClasses, TileId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("tile grid has no cells")]
    Empty,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<TileId>,
    tile_size: i32,
    classes: TileClasses,
}

impl TileGrid {
    /// Build from row-major rows. Every row must have the same length.
    pub fn from_rows(
        rows: &[Vec<TileId>],
        tile_size: i32,
        classes: TileClasses,
    ) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(GridError::RaggedRow { row, expected: width, found: r.len() });
            }
            cells.extend_from_slice(r);
        }
        Ok(TileGrid { width, height, cells, tile_size, classes })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn pixel_width(&self) -> i32 {
        self.width as i32 * self.tile_size
    }

    pub fn pixel_height(&self) -> i32 {
        self.height as i32 * self.tile_size
    }

    pub fn classes(&self) -> &TileClasses {
        &self.classes
    }

    /// Tile id at tile coordinates, or the invalid sentinel out of range.
    #[inline]
    pub fn tile_at(&self, tx: i32, ty: i32) -> TileId {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return TileId::INVALID;
        }
        self.cells[ty as usize * self.width + tx as usize]
    }

    /// Pixel → tile (floor division) → id.
    #[inline]
    pub fn tile_at_pixel(&self, px: i32, py: i32) -> TileId {
        self.tile_at(px.div_euclid(self.tile_size), py.div_euclid(self.tile_size))
    }

    #[inline]
    pub fn is_solid_at(&self, px: i32, py: i32) -> bool {
        self.classes.is_solid(self.tile_at_pixel(px, py))
    }

    #[inline]
    pub fn is_top_solid_at(&self, px: i32, py: i32) -> bool {
        self.classes.is_top_solid_only(self.tile_at_pixel(px, py))
    }

    #[inline]
    pub fn is_non_solid_at(&self, px: i32, py: i32) -> bool {
        self.classes.is_non_solid(self.tile_at_pixel(px, py))
    }
}

/// Test helper: build a grid from ASCII rows.
///
/// Legend (default tile table):
///   '#' solid       '=' top-solid    'I' icy solid
///   'H' ladder      '^' spike        'D' exit door
///   'L' locked door anything else: empty sky
#[cfg(test)]
pub(crate) fn tiles_from(rows: &[&str]) -> TileGrid {
    let rows: Vec<Vec<TileId>> = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|ch| match ch {
                    '#' => TileId(0),
                    '=' => TileId(3),
                    'I' => TileId(12),
                    'H' => TileId(57),
                    '^' => TileId(132),
                    'D' => TileId(62),
                    'L' => TileId(80),
                    _ => TileId(21),
                })
                .collect()
        })
        .collect();
    TileGrid::from_rows(&rows, 16, TileClasses::default()).expect("test grid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_invalid() {
        let g = tiles_from(&["#."]);
        assert_eq!(g.tile_at(-1, 0), TileId::INVALID);
        assert_eq!(g.tile_at(2, 0), TileId::INVALID);
        assert_eq!(g.tile_at(0, 1), TileId::INVALID);
        assert_eq!(g.tile_at(0, 0), TileId(0));
    }

    #[test]
    fn pixel_lookup_floors() {
        let g = tiles_from(&["#.", ".#"]);
        assert_eq!(g.tile_at_pixel(15, 15), TileId(0));
        assert_eq!(g.tile_at_pixel(16, 15), TileId(21));
        assert_eq!(g.tile_at_pixel(16, 16), TileId(0));
        // Negative pixels land in tile -1, not tile 0.
        assert_eq!(g.tile_at_pixel(-1, 0), TileId::INVALID);
    }

    #[test]
    fn pixel_dimensions() {
        let g = tiles_from(&["....", "####"]);
        assert_eq!(g.pixel_width(), 64);
        assert_eq!(g.pixel_height(), 32);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec![TileId(0), TileId(0)], vec![TileId(0)]];
        let err = TileGrid::from_rows(&rows, 16, TileClasses::default()).unwrap_err();
        assert_eq!(err, GridError::RaggedRow { row: 1, expected: 2, found: 1 });
    }

    #[test]
    fn empty_rejected() {
        let err = TileGrid::from_rows(&[], 16, TileClasses::default()).unwrap_err();
        assert_eq!(err, GridError::Empty);
    }

    #[test]
    fn outside_map_is_never_solid() {
        let g = tiles_from(&["#"]);
        assert!(!g.is_solid_at(-5, -5));
        assert!(!g.is_solid_at(100, 0));
        assert!(g.is_non_solid_at(100, 0));
    }
}
