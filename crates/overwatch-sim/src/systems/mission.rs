//! Win/lose check.

use overwatch_core::enums::{DefeatCondition, MissionResult};
use overwatch_core::constants::PLAYER_FACTION;
use overwatch_core::scenario::ScenarioDef;
use overwatch_core::types::SimClock;

use crate::unit::Unit;

/// An objective is met once an entity carrying its tag is destroyed.
pub fn objective_complete(units: &[Unit], tag: &str) -> bool {
    units
        .iter()
        .any(|u| u.tag.as_deref() == Some(tag) && !u.is_alive())
}

/// Every player unit that is not a base has been destroyed.
fn player_wiped_out(units: &[Unit]) -> bool {
    let mut force = units
        .iter()
        .filter(|u| u.faction == PLAYER_FACTION && u.base.is_none())
        .peekable();
    force.peek().is_some() && force.all(|u| !u.is_alive())
}

/// Victory wins ties: destroying the last objective on the final tick counts.
pub fn evaluate(units: &[Unit], scenario: &ScenarioDef, clock: &SimClock) -> MissionResult {
    let objectives = &scenario.objectives;
    if !objectives.is_empty()
        && objectives
            .iter()
            .all(|o| objective_complete(units, &o.entity_tag))
    {
        return MissionResult::Victory;
    }

    let defeated = match scenario.defeat_condition {
        DefeatCondition::AllBlueDead => player_wiped_out(units),
        DefeatCondition::TimeExpired => clock.is_expired(),
        DefeatCondition::Both => player_wiped_out(units) || clock.is_expired(),
    };
    if defeated {
        MissionResult::Defeat
    } else {
        MissionResult::Pending
    }
}
