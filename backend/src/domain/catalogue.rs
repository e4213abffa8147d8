//! Games and articles published by staff.

use std::fmt;

use chrono::{DateTime, Utc};

use super::identifier::define_uuid_id;
use super::slug::ArticleSlug;

define_uuid_id! {
    /// Stable game identifier.
    pub struct GameId;
}

/// Maximum game name length in characters.
pub const GAME_NAME_MAX: usize = 100;
/// Maximum article title length in characters.
pub const ARTICLE_TITLE_MAX: usize = 200;

/// Validation errors for catalogue values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    #[error("game name must not be empty")]
    EmptyGameName,
    #[error("game name must be at most {max} characters")]
    GameNameTooLong { max: usize },
    #[error("article title must not be empty")]
    EmptyTitle,
    #[error("article title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("article content must not be empty")]
    EmptyContent,
}

/// Unique, trimmed game name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameName(String);

impl GameName {
    /// Validate and construct a [`GameName`].
    pub fn new(raw: impl Into<String>) -> Result<Self, CatalogueValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogueValidationError::EmptyGameName);
        }
        if trimmed.chars().count() > GAME_NAME_MAX {
            return Err(CatalogueValidationError::GameNameTooLong { max: GAME_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Game that listings and articles refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: GameId,
    pub name: GameName,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub name: GameName,
    pub description: String,
}

impl NewGame {
    /// Validate raw game fields.
    pub fn try_from_parts(name: &str, description: &str) -> Result<Self, CatalogueValidationError> {
        Ok(Self {
            name: GameName::new(name)?,
            description: description.trim().to_owned(),
        })
    }
}

/// Editorial article about a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub slug: ArticleSlug,
    pub game_id: GameId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an article; the slug is allocated later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub game_id: GameId,
    pub title: String,
    pub content: String,
}

impl NewArticle {
    /// Validate raw article fields.
    pub fn try_from_parts(
        game_id: GameId,
        title: &str,
        content: &str,
    ) -> Result<Self, CatalogueValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogueValidationError::EmptyTitle);
        }
        if title.chars().count() > ARTICLE_TITLE_MAX {
            return Err(CatalogueValidationError::TitleTooLong { max: ARTICLE_TITLE_MAX });
        }
        if content.trim().is_empty() {
            return Err(CatalogueValidationError::EmptyContent);
        }
        Ok(Self {
            game_id,
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CatalogueValidationError::EmptyGameName)]
    #[case("   ", CatalogueValidationError::EmptyGameName)]
    fn rejects_blank_game_names(#[case] raw: &str, #[case] expected: CatalogueValidationError) {
        assert_eq!(GameName::new(raw), Err(expected));
    }

    #[test]
    fn trims_game_names() {
        let name = GameName::new("  Game 1 ").expect("valid name");
        assert_eq!(name.as_str(), "Game 1");
    }

    #[test]
    fn rejects_overlong_game_names() {
        let raw = "x".repeat(GAME_NAME_MAX + 1);
        assert_eq!(
            GameName::new(raw),
            Err(CatalogueValidationError::GameNameTooLong { max: GAME_NAME_MAX })
        );
    }

    #[rstest]
    #[case(" ", "body", CatalogueValidationError::EmptyTitle)]
    #[case("Title", "  ", CatalogueValidationError::EmptyContent)]
    fn rejects_incomplete_articles(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: CatalogueValidationError,
    ) {
        assert_eq!(
            NewArticle::try_from_parts(GameId::random(), title, content),
            Err(expected)
        );
    }
}
