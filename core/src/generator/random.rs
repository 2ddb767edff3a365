use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Uniform mine placement that keeps the first-revealed cell and all of its
/// neighbors clear, so the first reveal is never a mine and always floods.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomLayoutGenerator {
    pub const fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }
}

impl MineLayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());

        let mut excluded: Array2<bool> = Array2::default(config.size().to_nd_index());
        excluded[self.start.to_nd_index()] = true;
        for pos in excluded.iter_neighbors(self.start) {
            excluded[pos.to_nd_index()] = true;
        }

        let mut candidates: Vec<Coord2> = Vec::with_capacity(config.total_cells() as usize);
        for row in 0..config.height {
            for col in 0..config.width {
                if !excluded[(row, col).to_nd_index()] {
                    candidates.push((row, col));
                }
            }
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for &coords in candidates.choose_multiple(&mut rng, config.mines as usize) {
            mine_mask[coords.to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        // validated configs always have enough candidates; an unchecked one may not
        if layout.mine_count() != config.mines {
            log::warn!(
                "generated layout mine count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "placed {} mines on a {}x{} board, keeping {:?} clear",
            layout.mine_count(),
            config.height,
            config.width,
            self.start
        );
        layout
    }
}
