//! Attacks and their effects
//!
//! An `Attack` is a bag of `Effect`s. Each effect is a stateless rule: one
//! aim offset (where the owner may point, relative to itself) and an
//! affected pattern (which cells around the aim point get hit). The AI and
//! the map generator's destructibility model share this vocabulary.
//!
//! Effect shapes, `B` is the attacker, `T` the aim cell, `x` a hit cell:
//!
//! ```text
//!  punch        side punch      wall punch
//!    T            xTx
//!   TBT            B              TBT      (T cells are also the hits)
//!    T            xTx
//! ```

use serde::{Deserialize, Serialize};

use crate::combat::roster::Roster;
use crate::core::types::{Cell, Offset, UnitId};
use crate::map::grid::Grid;

/// One aim-offset + affected-pattern rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Where the owner may aim, relative to its own cell
    pub aim: Offset,
    /// Which cells get hit, relative to the aim cell
    pub pattern: Vec<Offset>,
}

impl Effect {
    pub fn new(aim: Offset, pattern: Vec<Offset>) -> Self {
        Self { aim, pattern }
    }
}

/// A combatant's full set of effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub effects: Vec<Effect>,
}

impl Attack {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }

    /// Aim at any orthogonal neighbor, hit the aim cell
    pub fn punch() -> Self {
        Self::new(
            crate::core::types::CARDINALS
                .iter()
                .map(|&aim| Effect::new(aim, vec![Offset::new(0, 0)]))
                .collect(),
        )
    }

    /// Aim above or below, hit left and right of the aim cell
    pub fn side_punch() -> Self {
        Self::new(vec![
            Effect::new(Offset::new(0, -1), vec![Offset::new(-1, 0), Offset::new(1, 0)]),
            Effect::new(Offset::new(0, 1), vec![Offset::new(-1, 0), Offset::new(1, 0)]),
        ])
    }

    /// Aim left or right, hit the aim cell itself (the building-breaker)
    pub fn wall_punch() -> Self {
        Self::new(vec![
            Effect::new(Offset::new(-1, 0), vec![Offset::new(0, 0)]),
            Effect::new(Offset::new(1, 0), vec![Offset::new(0, 0)]),
        ])
    }

    /// Combine several attacks into one effect set
    pub fn combined(parts: &[Attack]) -> Self {
        Self::new(parts.iter().flat_map(|a| a.effects.clone()).collect())
    }

    /// Every cell this attack can reach from `origin`: each effect's aim
    /// offset combined with that effect's own pattern offsets
    ///
    /// Pass `Cell::new(0, 0)` for a range-agnostic offset query; inverting
    /// the offsets around a victim yields the cells worth standing on to
    /// hit it.
    pub fn attackable_positions(&self, origin: Cell) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .effects
            .iter()
            .flat_map(|e| {
                e.pattern
                    .iter()
                    .map(move |&p| origin.offset(e.aim).offset(p))
            })
            .collect();
        cells.sort();
        cells.dedup();
        cells
    }
}

/// Apply the attacker's effects at `aim`
///
/// For every effect whose aim offset resolves to `aim` from the attacker's
/// cell: combatants on the pattern cells lose one hit point, destructible
/// map objects are replaced by their successors. Cells off the grid are
/// skipped.
///
/// No-ops (returning `false`) when the attacker already attacked this turn
/// or when no effect matches the aim cell; a mismatched aim does not
/// consume the turn. A landed attack ends the attacker's turn entirely:
/// both `attacked` and `moved` are set.
pub fn perform(grid: &mut Grid, roster: &mut Roster, attacker: UnitId, aim: Cell) -> bool {
    let Some(owner) = roster.unit(attacker) else {
        return false;
    };
    if owner.attacked {
        return false;
    }
    let origin = owner.cell;

    let patterns: Vec<Vec<Offset>> = owner
        .attack
        .effects
        .iter()
        .filter(|e| origin.offset(e.aim) == aim)
        .map(|e| e.pattern.clone())
        .collect();
    if patterns.is_empty() {
        return false;
    }

    for pattern in &patterns {
        for &offset in pattern {
            let cell = aim.offset(offset);
            if !grid.in_bounds(cell) {
                continue;
            }
            if let Some(victim) = roster.unit_at_mut(cell) {
                victim.hp -= 1;
                tracing::debug!(victim = %victim.id, hp = victim.hp, at = %cell, "hit");
            }
            let _ = grid.destroy_object(cell);
        }
    }

    if let Some(owner) = roster.unit_mut(attacker) {
        owner.attacked = true;
        owner.moved = true; // Attacking ends the turn, movement included
    }
    true
}
