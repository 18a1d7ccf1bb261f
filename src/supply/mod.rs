//! Token supply: where a round's tokens come from.
//!
//! The engine asks a `TokenSupplier` for exactly `pair_count` distinct
//! tokens before it touches any round state, so a failing supplier leaves
//! the previous round untouched.
//!
//! `CatalogSupplier` draws distinct names at random from a fixed catalog
//! and attaches the standard artwork URL to each. Closures of the right
//! shape are suppliers too, which keeps tests and network-backed hosts
//! simple:
//!
//! ```
//! use memory_match::cards::Token;
//! use memory_match::core::SupplyError;
//! use memory_match::supply::TokenSupplier;
//!
//! let mut offline = |_count: usize| -> Result<Vec<Token>, SupplyError> {
//!     Err(SupplyError::Network("offline".into()))
//! };
//! assert!(offline.fetch_tokens(6).is_err());
//! ```

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::cards::Token;
use crate::core::{GameRng, SupplyError};

/// Something that can hand out tokens for a new round.
pub trait TokenSupplier {
    /// Fetch `count` distinct tokens.
    fn fetch_tokens(&mut self, count: usize) -> Result<Vec<Token>, SupplyError>;
}

impl<F> TokenSupplier for F
where
    F: FnMut(usize) -> Result<Vec<Token>, SupplyError>,
{
    fn fetch_tokens(&mut self, count: usize) -> Result<Vec<Token>, SupplyError> {
        self(count)
    }
}

/// Creature names used when no catalog is given.
pub const DEFAULT_CATALOG: &[&str] = &[
    "bulbasaur", "ivysaur", "venusaur", "charmander", "charmeleon", "charizard",
    "squirtle", "wartortle", "blastoise", "caterpie", "metapod", "butterfree",
    "weedle", "pidgey", "rattata", "spearow", "ekans", "pikachu",
    "raichu", "sandshrew", "nidoran-f", "clefairy", "vulpix", "jigglypuff",
    "zubat", "oddish", "paras", "venonat", "diglett", "meowth",
    "psyduck", "mankey", "growlithe", "poliwag", "abra", "machop",
    "bellsprout", "tentacool", "geodude", "ponyta", "slowpoke", "magnemite",
    "doduo", "seel", "grimer", "shellder", "gastly", "onix",
    "drowzee", "krabby", "voltorb", "exeggcute", "cubone", "lickitung",
    "koffing", "rhyhorn", "chansey", "tangela", "kangaskhan", "horsea",
    "goldeen", "staryu", "scyther", "jynx", "electabuzz", "magmar",
    "pinsir", "tauros", "magikarp", "lapras", "ditto", "eevee",
    "porygon", "omanyte", "kabuto", "aerodactyl", "snorlax", "dratini",
    "mewtwo", "mew",
];

/// Draws distinct random tokens from a catalog of names.
#[derive(Clone, Debug)]
pub struct CatalogSupplier {
    names: Vec<String>,
    rng: GameRng,
}

impl CatalogSupplier {
    /// Supplier over `names`; repeated names are kept once.
    pub fn new<I, S>(names: I, rng: GameRng) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = FxHashSet::default();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { names, rng }
    }

    /// Supplier over `DEFAULT_CATALOG`.
    #[must_use]
    pub fn with_default_catalog(rng: GameRng) -> Self {
        Self::new(DEFAULT_CATALOG.iter().copied(), rng)
    }

    /// Number of distinct names available.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TokenSupplier for CatalogSupplier {
    fn fetch_tokens(&mut self, count: usize) -> Result<Vec<Token>, SupplyError> {
        if count > self.names.len() {
            return Err(SupplyError::Short {
                requested: count,
                available: self.names.len(),
            });
        }

        let tokens: Vec<Token> = self
            .rng
            .sample_indices(self.names.len(), count)
            .into_iter()
            .map(|i| Token::with_artwork(self.names[i].as_str()))
            .collect();
        debug!(count, "drew tokens from catalog");
        Ok(tokens)
    }
}
