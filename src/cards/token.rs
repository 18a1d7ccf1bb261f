//! Tokens - the matching unit shared by a pair of cards.
//!
//! A token is the creature printed on the front of a card. Its identity is
//! its name: two cards match when their tokens have the same name.

use serde::{Deserialize, Serialize};

/// Base URL for creature artwork.
pub const ARTWORK_BASE_URL: &str = "https://img.pokemondb.net/artwork/large";

/// The face of a card: a name plus a display asset.
///
/// Immutable once created.
///
/// ## Example
///
/// ```
/// use memory_match::cards::Token;
///
/// let token = Token::with_artwork("pikachu");
/// assert_eq!(token.name(), "pikachu");
/// assert_eq!(token.image(), "https://img.pokemondb.net/artwork/large/pikachu.jpg");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    name: String,
    image: String,
}

impl Token {
    /// Create a token with an explicit image reference.
    #[must_use]
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }

    /// Create a token whose image is the standard artwork for `name`.
    #[must_use]
    pub fn with_artwork(name: impl Into<String>) -> Self {
        let name = name.into();
        let image = format!("{ARTWORK_BASE_URL}/{name}.jpg");
        Self { name, image }
    }

    /// Identity of the token.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display asset reference.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
