//! Enemy decision engine
//!
//! The engine runs in two strictly ordered steps. `gather_map_info` walks
//! every tile on the board, paths to it, and scores what the unit could hit
//! from there; `decide` picks the best candidate and advances the unit one
//! path step per call. State lives on the owning enemy and is cleared at
//! the start of its next turn: Idle -> Gathered -> Decided -> Idle.
//!
//! The engine is pure computation plus that single position mutation. It
//! never executes attacks itself; the turn machine reads the chosen
//! record's aim data and drives the attack model separately.

use serde::{Deserialize, Serialize};

use crate::combat::roster::Roster;
use crate::core::config::GameConfig;
use crate::core::types::{Cell, UnitId};
use crate::map::grid::Grid;
use crate::pathfind::{path_steps, ObstacleMatrix, Pathfinder};

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiPhase {
    #[default]
    Idle,
    Gathered,
    Decided,
}

/// Something worth hitting, recorded while scoring an affected group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Unit(UnitId),
    Object(Cell),
}

/// One candidate tile, recomputed from scratch on every gather
///
/// `targetables`, `affected`, and `priorities` are parallel arrays: entry
/// `i` describes the i-th usable effect from this tile (its aim cell, the
/// cells it hits, and the score of that group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Where to walk; for out-of-range candidates this is the farthest
    /// cell actually reachable within range along the path
    pub tile: Cell,
    /// Walk path, inclusive of the unit's current cell; trimmed to range
    /// for out-of-range candidates
    pub path: Vec<Cell>,
    pub targetables: Vec<Cell>,
    pub affected: Vec<Vec<Cell>>,
    pub priorities: Vec<i32>,
    pub targets: Vec<Target>,
    pub in_range: bool,
}

impl TileRecord {
    /// Highest group priority; `i32::MIN` when no aim cell was usable
    pub fn max_priority(&self) -> i32 {
        self.priorities.iter().copied().max().unwrap_or(i32::MIN)
    }

    /// The best-scoring group: `(aim cell, affected cells, priority)`
    ///
    /// The first group wins ties, matching the decision sort's stable
    /// tie-break.
    pub fn best_group(&self) -> Option<(Cell, &[Cell], i32)> {
        let mut best: Option<(usize, i32)> = None;
        for (i, &p) in self.priorities.iter().enumerate() {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((i, p));
            }
        }
        best.map(|(i, p)| (self.targetables[i], self.affected[i].as_slice(), p))
    }
}

/// The engine's verdict for this activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// Attack from the record's tile (in range, has targets)
    Act(TileRecord),
    /// Nothing attackable in range; walk toward the best opportunity
    Walk(TileRecord),
    /// Nothing reachable and nothing to do
    NoAction,
}

impl Decision {
    pub fn record(&self) -> Option<&TileRecord> {
        match self {
            Decision::Act(r) | Decision::Walk(r) => Some(r),
            Decision::NoAction => None,
        }
    }
}

/// Decision engine state, owned 1:1 by an enemy combatant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub phase: AiPhase,
    pub in_range: Vec<TileRecord>,
    pub out_of_range: Vec<TileRecord>,
    decision: Option<Decision>,
}

impl AiState {
    /// Back to Idle; gathered records are ephemeral and discarded
    pub fn reset(&mut self) {
        *self = AiState::default();
    }

    /// The cached verdict, once `decide` has run
    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }
}

/// Populate the unit's candidate lists from the current board state
///
/// Every tile is pathed to with a dynamic obstacle run (other living units
/// block). Unreachable tiles are skipped. Reachable tiles get their
/// effects enumerated and scored; tiles within range that hit at least one
/// target file as in-range, everything else as out-of-range with the walk
/// path trimmed to range. A tile that offers neither a target nor any
/// actual walking (the unit's own cell with nothing to hit) is discarded,
/// so a fully boxed-in unit gathers two empty lists.
pub fn gather_map_info(
    grid: &Grid,
    roster: &mut Roster,
    pathfinder: &mut Pathfinder,
    config: &GameConfig,
    unit_id: UnitId,
) {
    let Some(unit) = roster.unit(unit_id) else {
        return;
    };
    let origin = unit.cell;
    let side = unit.side;
    let move_range = unit.move_range;
    let attack = unit.attack.clone();

    let matrix = ObstacleMatrix::dynamic_run(grid, roster, unit_id);
    let mut in_range = Vec::new();
    let mut out_of_range = Vec::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            let tile = Cell::new(x, y);
            let path = pathfinder.find_path(&matrix, origin, tile);
            if path.is_empty() {
                continue; // Unreachable, or occupied
            }
            let steps = path_steps(&path);

            let mut targetables = Vec::new();
            let mut affected = Vec::new();
            let mut priorities = Vec::new();
            let mut targets = Vec::new();

            for effect in &attack.effects {
                let aim = tile.offset(effect.aim);
                if !grid.in_bounds(aim) {
                    continue;
                }
                let group: Vec<Cell> = effect
                    .pattern
                    .iter()
                    .map(|&p| aim.offset(p))
                    .filter(|&c| grid.in_bounds(c))
                    .collect();

                let mut priority = -(steps as i32 * config.range_falloff);
                for &cell in &group {
                    if let Some(other) = roster.unit_at(cell) {
                        if other.id == unit_id {
                            // The unit will have left this cell by the
                            // time it attacks from `tile`
                        } else if other.side == side {
                            priority -= config.friendly_fire_penalty;
                        } else if other.hp == 1 {
                            priority += config.kill_priority;
                            targets.push(Target::Unit(other.id));
                        } else {
                            priority += config.attack_priority;
                            targets.push(Target::Unit(other.id));
                        }
                    }
                    if grid.object_at(cell).map_or(false, |o| o.target()) {
                        priority += config.building_priority;
                        targets.push(Target::Object(cell));
                    }
                }

                targetables.push(aim);
                affected.push(group);
                priorities.push(priority);
            }

            let within = steps <= move_range;
            if within && !targets.is_empty() {
                in_range.push(TileRecord {
                    tile,
                    path,
                    targetables,
                    affected,
                    priorities,
                    targets,
                    in_range: true,
                });
            } else {
                let reachable = (move_range as usize).min(path.len() - 1);
                let walk_path: Vec<Cell> = path[..=reachable].to_vec();
                if targets.is_empty() && walk_path.len() < 2 {
                    continue; // Nowhere to go, nothing to hit
                }
                out_of_range.push(TileRecord {
                    tile: walk_path[walk_path.len() - 1],
                    path: walk_path,
                    targetables,
                    affected,
                    priorities,
                    targets,
                    in_range: false,
                });
            }
        }
    }

    tracing::debug!(
        unit = %unit_id,
        in_range = in_range.len(),
        out_of_range = out_of_range.len(),
        "gathered map info"
    );

    if let Some(unit) = roster.unit_mut(unit_id) {
        unit.ai = Some(AiState {
            phase: AiPhase::Gathered,
            in_range,
            out_of_range,
            decision: None,
        });
    }
}

/// Pick the best candidate and advance the unit one step along its path
///
/// In-range records are preferred; out-of-range records are the "walk
/// toward opportunity" fallback. Sorting is by maximum group priority
/// descending, ties broken by shorter path, then lower `(y, x)` of the
/// tile, so the verdict never depends on gather iteration order.
///
/// The verdict is computed once and cached: calling `decide` again without
/// re-gathering returns the same record (while still advancing the walk by
/// one step per call).
pub fn decide(roster: &mut Roster, unit_id: UnitId) -> Decision {
    let Some(unit) = roster.unit(unit_id) else {
        return Decision::NoAction;
    };
    let Some(state) = unit.ai.as_ref() else {
        tracing::warn!(unit = %unit_id, "decide called before gather");
        return Decision::NoAction;
    };

    let decision = match &state.decision {
        Some(cached) => cached.clone(),
        None => {
            let pick = |records: &[TileRecord]| -> Option<TileRecord> {
                let mut sorted: Vec<&TileRecord> = records.iter().collect();
                sorted.sort_by(|a, b| {
                    b.max_priority()
                        .cmp(&a.max_priority())
                        .then(a.path.len().cmp(&b.path.len()))
                        .then((a.tile.y, a.tile.x).cmp(&(b.tile.y, b.tile.x)))
                });
                sorted.first().map(|r| (*r).clone())
            };

            if let Some(record) = pick(&state.in_range) {
                Decision::Act(record)
            } else if let Some(record) = pick(&state.out_of_range) {
                Decision::Walk(record)
            } else {
                Decision::NoAction
            }
        }
    };

    if let Some(unit) = roster.unit_mut(unit_id) {
        if let Some(record) = decision.record() {
            let position = record.path.iter().position(|&c| c == unit.cell);
            if let Some(i) = position {
                if i + 1 < record.path.len() {
                    unit.move_to(record.path[i + 1]);
                }
            }
        }
        if let Some(state) = unit.ai.as_mut() {
            state.phase = AiPhase::Decided;
            state.decision = Some(decision.clone());
        }
    }

    match &decision {
        Decision::Act(r) => {
            tracing::debug!(unit = %unit_id, tile = %r.tile, priority = r.max_priority(), "decision: act")
        }
        Decision::Walk(r) => tracing::debug!(unit = %unit_id, tile = %r.tile, "decision: walk"),
        Decision::NoAction => tracing::debug!(unit = %unit_id, "decision: nothing to do"),
    }
    decision
}

/// Has the unit finished walking its decision path?
pub fn walk_finished(roster: &Roster, unit_id: UnitId) -> bool {
    let Some(unit) = roster.unit(unit_id) else {
        return true;
    };
    let Some(state) = unit.ai.as_ref() else {
        return true;
    };
    match state.decision.as_ref().and_then(|d| d.record()) {
        Some(record) => unit.cell == record.tile,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::unit::Archetype;
    use crate::map::object::{MapObject, ObjectKind};

    fn setup() -> (Grid, Roster, Pathfinder, GameConfig) {
        (
            Grid::new(8, 8),
            Roster::new(),
            Pathfinder::new(),
            GameConfig::default(),
        )
    }

    #[test]
    fn test_adjacent_kill_scores_kill_priority() {
        let (grid, mut roster, mut finder, config) = setup();
        let enemy = roster.spawn(Archetype::Raider, Cell::new(3, 3), 2, 2);
        let victim = roster.spawn(Archetype::Soldier, Cell::new(3, 5), 1, 2);

        gather_map_info(&grid, &mut roster, &mut finder, &config, enemy);
        let state = roster.unit(enemy).unwrap().ai.as_ref().unwrap();
        assert_eq!(state.phase, AiPhase::Gathered);

        // The side punch hits flanks, so the kill comes from tiles like
        // (2, 4) aiming (2, 5) and catching (3, 5), or the wall punch from
        // (2, 5) aiming right. At least one in-range record must list the
        // victim.
        let has_kill = state
            .in_range
            .iter()
            .any(|r| r.targets.contains(&Target::Unit(victim)));
        assert!(has_kill);

        let decision = decide(&mut roster, enemy);
        assert!(matches!(decision, Decision::Act(_)));
    }

    #[test]
    fn test_gather_skips_occupied_tiles() {
        let (grid, mut roster, mut finder, config) = setup();
        let enemy = roster.spawn(Archetype::Raider, Cell::new(0, 0), 2, 4);
        let blocker = roster.spawn(Archetype::Raider, Cell::new(2, 0), 2, 2);

        gather_map_info(&grid, &mut roster, &mut finder, &config, enemy);
        let state = roster.unit(enemy).unwrap().ai.as_ref().unwrap();
        let blocker_cell = roster.unit(blocker).unwrap().cell;
        for record in state.in_range.iter().chain(&state.out_of_range) {
            assert_ne!(record.tile, blocker_cell);
            assert!(!record.path.contains(&blocker_cell));
        }
    }

    #[test]
    fn test_friendly_fire_lowers_priority() {
        let (grid, mut roster, mut finder, config) = setup();
        let enemy = roster.spawn(Archetype::Raider, Cell::new(3, 3), 2, 2);
        roster.spawn(Archetype::Raider, Cell::new(2, 5), 2, 2);
        let victim = roster.spawn(Archetype::Soldier, Cell::new(4, 5), 3, 2);

        gather_map_info(&grid, &mut roster, &mut finder, &config, enemy);
        let state = roster.unit(enemy).unwrap().ai.as_ref().unwrap();

        // From (3, 4) the downward side punch aims (3, 5) and hits both
        // the ally at (2, 5) and the victim at (4, 5): attack bonus and
        // friendly-fire penalty both apply, on top of one step of falloff
        let record = state
            .in_range
            .iter()
            .find(|r| r.tile == Cell::new(3, 4))
            .expect("tile (3,4) reaches a target within range");
        let group_idx = record
            .targetables
            .iter()
            .position(|&aim| aim == Cell::new(3, 5))
            .unwrap();
        assert_eq!(
            record.priorities[group_idx],
            config.attack_priority - config.friendly_fire_penalty - config.range_falloff
        );
        assert!(record.targets.contains(&Target::Unit(victim)));
    }

    #[test]
    fn test_decide_without_gather_is_no_action() {
        let (_, mut roster, _, _) = setup();
        let enemy = roster.spawn(Archetype::Raider, Cell::new(0, 0), 2, 2);
        assert_eq!(decide(&mut roster, enemy), Decision::NoAction);
    }

    #[test]
    fn test_decide_is_idempotent_on_the_record() {
        let (mut grid, mut roster, mut finder, config) = setup();
        grid.add_object(MapObject::new(Cell::new(6, 3), ObjectKind::Building));
        let enemy = roster.spawn(Archetype::Raider, Cell::new(0, 3), 2, 2);

        gather_map_info(&grid, &mut roster, &mut finder, &config, enemy);
        let first = decide(&mut roster, enemy);
        let second = decide(&mut roster, enemy);
        assert_eq!(first, second);
        assert_eq!(
            roster.unit(enemy).unwrap().ai.as_ref().unwrap().phase,
            AiPhase::Decided
        );
    }

    #[test]
    fn test_decide_advances_one_step_per_call() {
        let (mut grid, mut roster, mut finder, config) = setup();
        grid.add_object(MapObject::new(Cell::new(7, 0), ObjectKind::Building));
        let enemy = roster.spawn(Archetype::Raider, Cell::new(0, 0), 2, 2);

        gather_map_info(&grid, &mut roster, &mut finder, &config, enemy);
        let decision = decide(&mut roster, enemy);
        let record = decision.record().unwrap().clone();
        assert_eq!(roster.unit(enemy).unwrap().cell, record.path[1]);

        decide(&mut roster, enemy);
        assert_eq!(roster.unit(enemy).unwrap().cell, record.path[2]);
        assert!(walk_finished(&roster, enemy));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let (grid, mut roster, mut finder, config) = setup();
        let enemy = roster.spawn(Archetype::Raider, Cell::new(0, 0), 2, 2);
        gather_map_info(&grid, &mut roster, &mut finder, &config, enemy);
        decide(&mut roster, enemy);

        let state = roster.unit_mut(enemy).unwrap().ai.as_mut().unwrap();
        state.reset();
        assert_eq!(state.phase, AiPhase::Idle);
        assert!(state.in_range.is_empty() && state.out_of_range.is_empty());
    }
}
