//! Finishing-order tiers and role derivation.

use super::state::{FinishStatus, GameState, PlayerId, Role, Tier};
use crate::errors::domain::DomainError;

/// Tier for a position in the finishing order.
pub fn tier_for_position(position: usize) -> Tier {
    match position {
        0 => Tier::Gold,
        1 => Tier::Silver,
        2 => Tier::Bronze,
        _ => Tier::Loser,
    }
}

/// Append a finisher to the order (if absent) and stamp their tier.
///
/// Positions already taken never move: once an id is in the finishing order
/// it is not removed or reordered by later plays.
pub fn record_finish(state: &mut GameState, player_id: PlayerId) -> Result<Tier, DomainError> {
    if !state.finishing_order.contains(&player_id) {
        state.finishing_order.push(player_id);
    }
    let position = state
        .finishing_order
        .iter()
        .position(|&id| id == player_id)
        .unwrap_or(state.finishing_order.len());
    let tier = tier_for_position(position);
    state.player_mut(player_id)?.finish = FinishStatus::Finished(tier);
    Ok(tier)
}

/// Recompute every player's role from the finishing order.
///
/// Always a full recompute: all roles reset to neutral first, so applying
/// this twice to the same order yields the same assignment.
pub fn assign_roles(state: &mut GameState) {
    for p in state.players.values_mut() {
        p.role = Role::Neutral;
    }

    let order = state.finishing_order.clone();
    if order.len() >= 2 {
        set_role(state, order[0], Role::President);
        set_role(state, order[order.len() - 1], Role::Culo);
    }
    if order.len() >= 4 {
        set_role(state, order[1], Role::VicePresident);
        set_role(state, order[order.len() - 2], Role::ViceCulo);
    }
}

fn set_role(state: &mut GameState, player_id: PlayerId, role: Role) {
    // Kicked players may linger in an order being recomputed mid-purge.
    if let Some(p) = state.players.get_mut(&player_id) {
        p.role = role;
    }
}
