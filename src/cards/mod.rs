//! Board model: tokens, cards and the shuffled board.
//!
//! ## Key Types
//!
//! - `Token`: Immutable matching unit (name + image)
//! - `Card`: One slot on the board referencing a token, with flip/match state
//! - `Board`: Ordered, shuffled sequence of paired cards

pub mod token;
pub mod card;
pub mod board;

pub use token::{Token, ARTWORK_BASE_URL};
pub use card::Card;
pub use board::Board;
