use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No reveal has happened yet; the mine layout does not exist.
    Fresh,
    Playing,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Fresh)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Fresh
    }
}

/// A single game session from construction to win or loss.
///
/// The session owns both grids exclusively and provides no internal
/// synchronization; a host sharing one across concurrent callers must wrap
/// it in its own lock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    config: GameConfig,
    seed: u64,
    layout: Option<MineLayout>,
    board: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: SessionState,
}

impl Session {
    /// New session with deferred mine placement: the layout is generated by
    /// the first reveal so that cell and its neighbors can be kept clear.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            layout: None,
            board: Array2::default(config.size().to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: Default::default(),
        }
    }

    /// Session over an explicit mine placement, already initialized. The
    /// first reveal plays on this layout as-is, with no exclusion zone.
    pub fn from_layout(layout: MineLayout) -> Self {
        let config = layout.game_config();
        Self {
            layout: Some(layout),
            ..Self::new(config, 0)
        }
    }

    /// Returns the session to the all-hidden state. The previous layout is
    /// dropped; the next reveal generates a fresh one.
    pub fn reset(&mut self) {
        self.layout = None;
        self.board.fill(Cell::Hidden);
        self.revealed_count = 0;
        self.flagged_count = 0;
        self.state = SessionState::Fresh;
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    /// True exactly when every safe cell has been revealed.
    pub fn is_complete(&self) -> bool {
        self.revealed_count == self.config.safe_cells()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    /// Mine truth for a cell; always false before the first reveal.
    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        match &self.layout {
            Some(layout) => layout.contains_mine(coords),
            None => false,
        }
    }

    /// Full visible board as a flat row-major sequence, for rendering.
    pub fn snapshot(&self) -> Vec<Cell> {
        self.board.iter().copied().collect()
    }

    /// In-bounds neighbors of a cell in deterministic row-major order.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.board.iter_neighbors(coords)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.config.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(RevealOutcome::Continue);
        }
        if !matches!(self.board[coords.to_nd_index()], Cell::Hidden) {
            // flagged and already revealed cells are left alone
            return Ok(RevealOutcome::Continue);
        }

        self.ensure_initialized(coords);
        Ok(self.reveal_hidden_cell(coords))
    }

    pub fn reveal_index(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let coords = self.config.coordinate_of(index)?;
        self.reveal(coords)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.config.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(());
        }

        match self.board[coords.to_nd_index()] {
            Cell::Hidden => {
                self.board[coords.to_nd_index()] = Cell::Flagged;
                self.flagged_count += 1;
            }
            Cell::Flagged => {
                self.board[coords.to_nd_index()] = Cell::Hidden;
                self.flagged_count -= 1;
            }
            Cell::Revealed(_) | Cell::Mine => {}
        }
        Ok(())
    }

    pub fn toggle_flag_index(&mut self, index: CellIndex) -> Result<()> {
        let coords = self.config.coordinate_of(index)?;
        self.toggle_flag(coords)
    }

    fn ensure_initialized(&mut self, first_cell: Coord2) {
        if self.layout.is_none() {
            let generator = RandomLayoutGenerator::new(self.seed, first_cell);
            self.layout = Some(generator.generate(self.config));
        }
    }

    fn adjacent_mines(&self, coords: Coord2) -> u8 {
        match &self.layout {
            Some(layout) => layout.adjacent_mine_count(coords),
            None => 0,
        }
    }

    /// Reveals a cell known to be hidden, flooding out from it when it has
    /// no neighboring mines.
    fn reveal_hidden_cell(&mut self, coords: Coord2) -> RevealOutcome {
        if self.has_mine_at(coords) {
            self.board[coords.to_nd_index()] = Cell::Mine;
            self.state = SessionState::Lost;
            return RevealOutcome::Exploded;
        }

        let adjacent = self.adjacent_mines(coords);
        self.board[coords.to_nd_index()] = Cell::Revealed(adjacent);
        self.revealed_count += 1;
        log::debug!(
            "revealed ({}, {}), adjacent mines: {}",
            coords.0,
            coords.1,
            adjacent
        );

        if adjacent == 0 {
            self.flood_fill_from(coords);
        }

        if self.revealed_count == self.config.safe_cells() {
            self.state = SessionState::Won;
            RevealOutcome::Won
        } else {
            self.state = SessionState::Playing;
            RevealOutcome::Continue
        }
    }

    /// Opens the connected zero-count region around `start` plus its numbered
    /// border. Cells are skipped at pop time when no longer hidden; that
    /// check is the sole de-duplication keeping the traversal finite, and it
    /// is what keeps flagged cells closed. Zero-count cells cannot touch a
    /// mine, so the fill never reveals one.
    fn flood_fill_from(&mut self, start: Coord2) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<Coord2> = self
            .neighbors(start)
            .filter(|&pos| matches!(self.board[pos.to_nd_index()], Cell::Hidden))
            .collect();

        while let Some(visit) = to_visit.pop_front() {
            if !visited.insert(visit) {
                continue;
            }

            if !matches!(self.board[visit.to_nd_index()], Cell::Hidden) {
                continue;
            }

            let adjacent = self.adjacent_mines(visit);
            self.board[visit.to_nd_index()] = Cell::Revealed(adjacent);
            self.revealed_count += 1;
            log::trace!(
                "flood revealed ({}, {}), adjacent mines: {}",
                visit.0,
                visit.1,
                adjacent
            );

            if adjacent == 0 {
                to_visit.extend(
                    self.neighbors(visit)
                        .filter(|&pos| matches!(self.board[pos.to_nd_index()], Cell::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }
}
