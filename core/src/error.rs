use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell reference is outside the board")]
    OutOfRange,
    #[error("Mine count does not fit the board")]
    InvalidConfig,
}

pub type Result<T> = core::result::Result<T, GameError>;
