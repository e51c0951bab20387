use crate::cards::Card;

/// Every failure the engine reports to its caller.
///
/// Construction errors (`InvalidRank`, `InvalidSuit`, `DuplicateCard`,
/// `MalformedCards`) abort the call that built the card or hand. The
/// remaining variants are precondition violations on scenario building and
/// EV evaluation; none of them is transient.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid rank '{0}'")]
    InvalidRank(String),
    #[error("invalid suit '{0}'")]
    InvalidSuit(String),
    #[error("duplicate card {0}")]
    DuplicateCard(Card),
    #[error("malformed card string '{0}'")]
    MalformedCards(String),
    #[error("invalid board: {0}")]
    InvalidBoard(String),
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("player '{0}' not found in scenario")]
    PlayerNotFound(String),
    #[error("player '{0}' has no hole cards")]
    MissingHoleCards(String),
    #[error("invalid bet size {0}")]
    InvalidBetSize(f64),
    #[error("invalid action '{0}', expected fold, call or raise")]
    InvalidAction(String),
    #[error("ICM valuation requires a non-empty payout structure")]
    MissingPayoutStructure,
    #[error("ICM over {players} players with {places} paid places is too large to evaluate")]
    IcmFieldTooLarge { players: usize, places: usize },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}
