//! Plain-text views of a battle.

use std::fmt::Write;

use tactics_core::{BattleState, Position, Team};
use tactics_runtime::BattleSnapshot;

/// Draws the grid with north at the top.
///
/// `#` blocked, `.` open, `P`/`E` units; the selected unit is lowercase.
pub fn map(state: &BattleState) -> String {
    let dimensions = state.grid.dimensions();
    let mut out = String::new();
    for y in (0..dimensions.height as i32).rev() {
        let _ = write!(out, "{y:>3} ");
        for x in 0..dimensions.width as i32 {
            let cell = Position::new(x, y);
            let glyph = match state.unit_at(cell) {
                Some(unit) => {
                    let glyph = match unit.team {
                        Team::Player => 'P',
                        Team::Enemy => 'E',
                    };
                    if state.input.selected == Some(unit.id) {
                        glyph.to_ascii_lowercase()
                    } else {
                        glyph
                    }
                }
                None if !state.grid.is_walkable(cell) => '#',
                None => '.',
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out.push_str("    ");
    for x in 0..dimensions.width {
        out.push(char::from_digit(x % 10, 10).unwrap_or('?'));
    }
    out.push('\n');
    out
}

pub fn status(snapshot: &BattleSnapshot) -> String {
    let mut out = format!(
        "round {} | {} | mode {}",
        snapshot.round, snapshot.phase, snapshot.mode
    );
    if let Some(current) = snapshot.current.and_then(|id| snapshot.unit(id)) {
        let _ = write!(out, " | {} to act, momentum {}", current.name, snapshot.momentum);
    }
    if let Some(winner) = snapshot.winner {
        let _ = write!(out, " | {winner} won");
    }
    out.push('\n');

    for unit in &snapshot.units {
        let at = unit
            .position
            .map_or_else(|| "-".to_string(), |p| format!("({}, {})", p.x, p.y));
        let _ = writeln!(
            out,
            "  [{}] {:<12} {:<6} {:>3}/{:<3} {}",
            unit.id.0, unit.name, unit.team, unit.hp, unit.max_hp, at
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use tactics_core::{Character, EntityId, GameConfig, Grid, MapDimensions};

    use super::*;

    #[test]
    fn map_marks_units_and_obstacles() {
        let grid = Grid::build(
            MapDimensions::new(3, 2),
            1.0,
            |p| p == Position::new(1, 1),
            |_| 0.0,
        );
        let mut state = BattleState::new(grid, &GameConfig::default());
        state
            .register_unit(
                Character::new(EntityId(1), "Hero", Team::Player),
                Position::new(0, 0),
            )
            .unwrap();
        state
            .register_unit(
                Character::new(EntityId(2), "Ogre", Team::Enemy),
                Position::new(2, 1),
            )
            .unwrap();

        assert_eq!(map(&state), "  1 .#E\n  0 P..\n    012\n");
    }
}
