//! Turn sequencing
//!
//! `Game` owns everything for the duration of a tick: grid, roster,
//! pathfinder, and RNG. The machine is cooperative and tick-driven; no
//! phase suspends mid-computation, and "animation" is one discrete state
//! advance per external tick. State is read through accessors, never
//! through a global.
//!
//! Enemy phases process one enemy at a time: its full gather -> decide ->
//! act cycle completes (across ticks, for movement) before the next enemy
//! is considered.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai;
use crate::combat::attack;
use crate::combat::roster::Roster;
use crate::combat::unit::{Archetype, Side};
use crate::core::config::GameConfig;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{Cell, UnitId};
use crate::map::generator::generate_map;
use crate::map::grid::Grid;
use crate::pathfind::{ObstacleMatrix, Pathfinder};

/// Turn machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    GenerateMap,
    Play,
    Move,
    Target,
    PlayerMoveAnimation,
    EnemyTurn,
    EnemyAttack,
}

/// Inbound boundary events from the input layer
///
/// Pointer positions arrive already converted to cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pointer(Cell),
    Confirm,
    Cancel,
}

pub struct Game {
    pub config: GameConfig,
    pub grid: Grid,
    pub roster: Roster,
    pathfinder: Pathfinder,
    rng: ChaCha8Rng,
    state: TurnState,
    cursor: Cell,
    selected: Option<UnitId>,
    planned_path: Vec<Cell>,
    active_enemy: Option<UnitId>,
}

impl Game {
    pub fn new(config: GameConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid_width, config.grid_height);
        Ok(Self {
            config,
            grid,
            roster: Roster::new(),
            pathfinder: Pathfinder::new(),
            rng,
            state: TurnState::GenerateMap,
            cursor: Cell::new(0, 0),
            selected: None,
            planned_path: Vec::new(),
            active_enemy: None,
        })
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    /// The MOVE-phase path preview, already trimmed to the unit's range
    pub fn planned_path(&self) -> &[Cell] {
        &self.planned_path
    }

    /// Advance the simulation one external clock tick
    pub fn tick(&mut self) -> Result<()> {
        self.cleanup_dead();
        self.check_consistency()?;

        match self.state {
            TurnState::GenerateMap => self.tick_generate_map()?,
            TurnState::Play => self.tick_play(),
            TurnState::Move | TurnState::Target => {
                // Waiting on input; nothing advances by clock alone
            }
            TurnState::PlayerMoveAnimation => self.tick_player_animation(),
            TurnState::EnemyTurn => self.tick_enemy_turn(),
            TurnState::EnemyAttack => self.tick_enemy_attack(),
        }
        Ok(())
    }

    /// Route an input event; events outside their phase are ignored
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer(cell) => {
                self.cursor = cell;
                if self.state == TurnState::Move {
                    self.replan_path();
                }
            }
            InputEvent::Confirm => match self.state {
                TurnState::Play => self.select_at_cursor(),
                TurnState::Move => self.confirm_move(),
                TurnState::Target => self.confirm_attack(),
                _ => {}
            },
            InputEvent::Cancel => {
                if matches!(self.state, TurnState::Move | TurnState::Target) {
                    self.deselect();
                    self.state = TurnState::Play;
                }
            }
        }
    }

    /// Dead units leave the board before any turn-phase logic runs, so
    /// this tick's decisions already see the losses
    fn cleanup_dead(&mut self) {
        for id in self.roster.remove_dead() {
            tracing::info!(unit = %id, "unit destroyed");
            self.grid.remove_threats_of(id);
            if self.selected == Some(id) {
                self.selected = None;
                self.planned_path.clear();
            }
            if self.active_enemy == Some(id) {
                self.active_enemy = None;
            }
        }
    }

    /// An active player unit outside MOVE/TARGET/animation corrupts the
    /// turn bookkeeping; fail fast rather than play on
    fn check_consistency(&self) -> Result<()> {
        if self.roster.any_active(Side::Player)
            && !matches!(
                self.state,
                TurnState::Move | TurnState::Target | TurnState::PlayerMoveAnimation
            )
        {
            return Err(SkirmishError::StateCorruption(format!(
                "active player unit while state is {:?}",
                self.state
            )));
        }
        Ok(())
    }

    fn tick_generate_map(&mut self) -> Result<()> {
        generate_map(&mut self.grid, &mut self.pathfinder, &self.config, &mut self.rng)?;

        for _ in 0..self.config.player_count {
            self.roster.spawn_on_free_cell(
                &self.grid,
                &mut self.rng,
                Archetype::Soldier,
                self.config.move_range,
                self.config.spawn_attempts,
            )?;
        }
        for _ in 0..self.config.enemy_count {
            self.roster.spawn_on_free_cell(
                &self.grid,
                &mut self.rng,
                Archetype::Raider,
                self.config.move_range,
                self.config.spawn_attempts,
            )?;
        }

        tracing::info!(
            players = self.config.player_count,
            enemies = self.config.enemy_count,
            "map ready, combatants deployed"
        );
        self.state = TurnState::Play;
        Ok(())
    }

    fn tick_play(&mut self) {
        let all_moved = self.roster.living_on(Side::Player).all(|u| u.moved);
        if !all_moved {
            return;
        }
        if self.roster.living_on(Side::Enemy).next().is_some() {
            tracing::debug!("player phase complete, enemy turn");
            self.state = TurnState::EnemyTurn;
        } else {
            // No enemy side left; start the next player turn directly
            self.roster.reset_turn_flags();
            self.grid.clear_threats();
        }
    }

    fn select_at_cursor(&mut self) {
        let Some(unit) = self.roster.unit_at(self.cursor) else {
            return;
        };
        if unit.side != Side::Player || unit.attacked {
            // Attacked units are done for the turn and may not re-enter
            // movement or targeting
            return;
        }
        let id = unit.id;
        let moved = unit.moved;
        if let Some(unit) = self.roster.unit_mut(id) {
            unit.active = true;
        }
        self.selected = Some(id);
        self.planned_path.clear();
        self.state = if moved { TurnState::Target } else { TurnState::Move };
        tracing::debug!(unit = %id, state = ?self.state, "player unit selected");
    }

    /// Recompute the path preview toward the cursor (MOVE phase)
    fn replan_path(&mut self) {
        self.planned_path.clear();
        let Some(id) = self.selected else {
            return;
        };
        let Some(unit) = self.roster.unit(id) else {
            return;
        };
        let matrix = ObstacleMatrix::dynamic_run(&self.grid, &self.roster, id);
        let path = self.pathfinder.find_path(&matrix, unit.cell, self.cursor);
        if path.is_empty() {
            return;
        }
        let reachable = (unit.move_range as usize).min(path.len() - 1);
        self.planned_path = path[..=reachable].to_vec();
    }

    fn confirm_move(&mut self) {
        if self.planned_path.len() < 2 {
            return; // No reachable destination under the cursor
        }
        self.state = TurnState::PlayerMoveAnimation;
    }

    fn tick_player_animation(&mut self) {
        let Some(id) = self.selected else {
            // Selection died mid-animation; nothing left to animate
            self.state = TurnState::Play;
            return;
        };
        let Some(unit) = self.roster.unit_mut(id) else {
            self.state = TurnState::Play;
            return;
        };

        let position = self.planned_path.iter().position(|&c| c == unit.cell);
        match position {
            Some(i) if i + 1 < self.planned_path.len() => {
                unit.move_to(self.planned_path[i + 1]);
            }
            _ => {
                unit.moved = true;
                self.planned_path.clear();
                self.state = TurnState::Target;
                tracing::debug!(unit = %id, "move finished, targeting");
            }
        }
    }

    fn confirm_attack(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        // Success or not (a mismatched aim is a silent non-event), the
        // unit is deselected and play resumes
        let landed = attack::perform(&mut self.grid, &mut self.roster, id, self.cursor);
        tracing::debug!(unit = %id, aim = %self.cursor, landed, "player attack");
        self.deselect();
        self.state = TurnState::Play;
    }

    fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            if let Some(unit) = self.roster.unit_mut(id) {
                unit.active = false;
            }
        }
        self.planned_path.clear();
    }

    fn tick_enemy_turn(&mut self) {
        let enemy = match self.active_enemy {
            Some(id) => id,
            None => {
                let Some(id) = self.roster.next_unmoved_enemy() else {
                    self.end_enemy_phase();
                    return;
                };
                self.active_enemy = Some(id);
                if let Some(unit) = self.roster.unit_mut(id) {
                    unit.active = true;
                }
                id
            }
        };

        // Lazy gather, once per activation
        let needs_gather = self
            .roster
            .unit(enemy)
            .and_then(|u| u.ai.as_ref())
            .map_or(true, |s| s.phase == ai::AiPhase::Idle);
        if needs_gather {
            ai::gather_map_info(
                &self.grid,
                &mut self.roster,
                &mut self.pathfinder,
                &self.config,
                enemy,
            );
        }

        let decision = ai::decide(&mut self.roster, enemy);
        match decision {
            ai::Decision::NoAction => {
                // Boxed in: forfeit both the move and the attack
                if let Some(unit) = self.roster.unit_mut(enemy) {
                    unit.moved = true;
                    unit.attacked = true;
                }
                self.release_enemy(enemy);
            }
            ai::Decision::Act(_) | ai::Decision::Walk(_) => {
                if ai::walk_finished(&self.roster, enemy) {
                    if let Some(unit) = self.roster.unit_mut(enemy) {
                        unit.moved = true;
                    }
                    self.post_threat_overlay(enemy);
                    self.state = TurnState::EnemyAttack;
                }
            }
        }
    }

    fn tick_enemy_attack(&mut self) {
        let Some(enemy) = self.active_enemy else {
            self.state = TurnState::EnemyTurn;
            return;
        };

        let aim = self
            .roster
            .unit(enemy)
            .and_then(|u| u.ai.as_ref())
            .and_then(|s| s.decision())
            .and_then(|d| match d {
                ai::Decision::Act(record) => record.best_group().map(|(aim, _, _)| aim),
                _ => None,
            });

        if let Some(aim) = aim {
            let landed = attack::perform(&mut self.grid, &mut self.roster, enemy, aim);
            tracing::debug!(unit = %enemy, aim = %aim, landed, "enemy attack");
        } else if let Some(unit) = self.roster.unit_mut(enemy) {
            // Walk decisions have nothing to swing at
            unit.attacked = true;
        }

        self.release_enemy(enemy);
        self.state = TurnState::EnemyTurn;
    }

    /// Mark the enemy's threat on the tiles its best group would hit
    fn post_threat_overlay(&mut self, enemy: UnitId) {
        let affected: Vec<Cell> = self
            .roster
            .unit(enemy)
            .and_then(|u| u.ai.as_ref())
            .and_then(|s| s.decision())
            .and_then(|d| match d {
                ai::Decision::Act(record) => {
                    record.best_group().map(|(_, cells, _)| cells.to_vec())
                }
                _ => None,
            })
            .unwrap_or_default();

        for cell in affected {
            if let Some(tile) = self.grid.tile_mut(cell) {
                tile.add_threat(enemy);
            }
        }
    }

    /// Clear AI state and activity once the enemy's cycle is complete
    fn release_enemy(&mut self, enemy: UnitId) {
        if let Some(unit) = self.roster.unit_mut(enemy) {
            unit.active = false;
            if let Some(state) = unit.ai.as_mut() {
                state.reset();
            }
        }
        self.active_enemy = None;
    }

    /// All enemies done: fresh per-turn flags for both sides
    fn end_enemy_phase(&mut self) {
        self.roster.reset_turn_flags();
        self.grid.clear_threats();
        self.active_enemy = None;
        self.state = TurnState::Play;
        tracing::debug!("enemy phase complete, play resumes");
    }
}
