//! Combatants, attacks, and the roster that owns them

pub mod attack;
pub mod roster;
pub mod unit;

pub use attack::{perform, Attack, Effect};
pub use roster::Roster;
pub use unit::{Archetype, Combatant, Side};
