use crate::*;
pub use random::*;

mod random;

/// Strategy producing the actual mine placement of a session.
pub trait MineLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}
