#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Board shape and mine budget for one session.
///
/// `new` enforces that the requested mines always fit, no matter which cell
/// receives the first reveal: placement keeps the first-revealed cell and all
/// of its neighbors clear, so in the worst case a `min(height, 3) *
/// min(width, 3)` block is unavailable to mines.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub height: Coord,
    pub width: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(height: Coord, width: Coord, mines: CellCount) -> Self {
        Self {
            height,
            width,
            mines,
        }
    }

    pub fn new(height: Coord, width: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(height, width, mines);
        if height == 0 || width == 0 {
            return Err(GameError::InvalidConfig);
        }
        if mines > config.total_cells() - config.max_exclusion_zone() {
            return Err(GameError::InvalidConfig);
        }
        Ok(config)
    }

    /// Largest possible first-reveal exclusion zone: the revealed cell plus
    /// its in-bounds neighbors.
    const fn max_exclusion_zone(&self) -> CellCount {
        let rows = if self.height < 3 { self.height } else { 3 };
        let cols = if self.width < 3 { self.width } else { 3 };
        mult(rows, cols)
    }

    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.height && coords.1 < self.width {
            Ok(coords)
        } else {
            Err(GameError::OutOfRange)
        }
    }

    /// Maps a linear row-major index to `(row, col)` coordinates.
    pub fn coordinate_of(&self, index: CellIndex) -> Result<Coord2> {
        if index >= self.total_cells() {
            return Err(GameError::OutOfRange);
        }
        let width = self.width as CellIndex;
        Ok(((index / width) as Coord, (index % width) as Coord))
    }

    /// Maps `(row, col)` coordinates to a linear row-major index.
    pub fn index_of(&self, coords: Coord2) -> Result<CellIndex> {
        let (row, col) = self.validate_coords(coords)?;
        Ok(row as CellIndex * self.width as CellIndex + col as CellIndex)
    }

    /// Key under which completed runs of this board shape are recorded,
    /// e.g. `"8x10x10"`.
    pub fn size_key(&self) -> String {
        format!("{}x{}x{}", self.height, self.width, self.mines)
    }
}

/// The actual mine placement of one session, fixed once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacency: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        let adjacency = Self::adjacency_grid(&mine_mask);
        Self {
            mine_mask,
            adjacency,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfRange);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    /// Neighboring-mine count for every non-mine cell; mine cells stay zero,
    /// their entry is never read.
    fn adjacency_grid(mine_mask: &Array2<bool>) -> Array2<u8> {
        let mut adjacency: Array2<u8> = Array2::default(mine_mask.raw_dim());
        let dim = mine_mask.dim();
        for row in 0..dim.0 {
            for col in 0..dim.1 {
                let coords: Coord2 = (row.try_into().unwrap(), col.try_into().unwrap());
                if mine_mask[coords.to_nd_index()] {
                    continue;
                }
                adjacency[coords.to_nd_index()] = mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count()
                    .try_into()
                    .unwrap();
            }
        }
        adjacency
    }

    pub fn game_config(&self) -> GameConfig {
        let (height, width) = self.size();
        GameConfig {
            height,
            width,
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mine_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacency[coords.to_nd_index()]
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.mine_mask[(row as usize, col as usize)]
    }
}

/// Outcome of a reveal call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    /// The session goes on, including no-op reveals of flagged or already
    /// revealed cells.
    Continue,
    Exploded,
    Won,
}

impl RevealOutcome {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Exploded | Self::Won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_mines_that_cannot_avoid_the_first_reveal() {
        // 1x1 with one mine: the only cell must stay clear
        assert_eq!(GameConfig::new(1, 1, 1), Err(GameError::InvalidConfig));
        // 3x3 with one mine: a center reveal excludes all nine cells
        assert_eq!(GameConfig::new(3, 3, 1), Err(GameError::InvalidConfig));
        assert_eq!(GameConfig::new(0, 5, 0), Err(GameError::InvalidConfig));
        assert_eq!(GameConfig::new(8, 10, 81), Err(GameError::InvalidConfig));
    }

    #[test]
    fn config_accepts_boards_with_room_to_spare() {
        assert!(GameConfig::new(1, 1, 0).is_ok());
        assert!(GameConfig::new(5, 5, 16).is_ok());
        assert!(GameConfig::new(8, 10, 10).is_ok());
        assert!(GameConfig::new(8, 10, 71).is_ok());
    }

    #[test]
    fn index_and_coordinate_round_trip() {
        let config = GameConfig::new(4, 7, 5).unwrap();
        for index in 0..config.total_cells() {
            let coords = config.coordinate_of(index).unwrap();
            assert_eq!(config.index_of(coords).unwrap(), index);
        }
        assert_eq!(config.coordinate_of(9).unwrap(), (1, 2));
        assert_eq!(config.index_of((3, 6)).unwrap(), 27);
    }

    #[test]
    fn out_of_range_references_are_errors_not_wraparounds() {
        let config = GameConfig::new(4, 7, 5).unwrap();
        assert_eq!(config.coordinate_of(28), Err(GameError::OutOfRange));
        assert_eq!(config.index_of((4, 0)), Err(GameError::OutOfRange));
        assert_eq!(config.index_of((0, 7)), Err(GameError::OutOfRange));
    }

    #[test]
    fn layout_counts_mines_and_adjacency() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 7);
        assert!(layout.contains_mine((0, 0)));
        assert!(!layout.contains_mine((1, 1)));
        assert_eq!(layout.adjacent_mine_count((1, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 0);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mine_coords() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::OutOfRange)
        );
    }

    #[test]
    fn size_key_matches_record_format() {
        let config = GameConfig::new(8, 10, 10).unwrap();
        assert_eq!(config.size_key(), "8x10x10");
    }

    #[test]
    fn duplicate_mine_coords_collapse_into_one_mine() {
        let layout = MineLayout::from_mine_coords((2, 4), &[(0, 0), (0, 0)]).unwrap();
        assert_eq!(layout.mine_count(), 1);
    }
}
