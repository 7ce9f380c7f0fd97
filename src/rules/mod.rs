//! Game rules: legality, transitions, and round resolution.
//!
//! The rules layer is pure: [`legal_actions`] and [`step`] are deterministic
//! functions of the state with no side effects and no I/O. All randomness
//! was consumed at deal time.

pub mod legal;
pub mod round;
pub mod transition;

pub use legal::legal_actions;
pub use transition::step;

/// Maximum number of attack cards on the table in one exchange.
pub const MAX_TABLE_ATTACKS: usize = 6;
