//! Port for game persistence.

use async_trait::async_trait;

use crate::domain::{Game, GameId, GameName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by game repository adapters.
    pub enum GameRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "game repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "game repository query failed: {message}",
        /// Another game already uses the name.
        DuplicateName { name: String } => "game {name} already exists",
    }
}

/// Port for reading and writing games.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Insert a new game.
    async fn insert(&self, game: &Game) -> Result<(), GameRepositoryError>;

    /// Fetch a game by identifier.
    async fn find_by_id(&self, id: &GameId) -> Result<Option<Game>, GameRepositoryError>;

    /// Fetch a game by its exact name.
    async fn find_by_name(&self, name: &GameName) -> Result<Option<Game>, GameRepositoryError>;

    /// All games ordered by name.
    async fn list_all(&self) -> Result<Vec<Game>, GameRepositoryError>;

    /// Most recently added game.
    async fn latest(&self) -> Result<Option<Game>, GameRepositoryError>;
}
