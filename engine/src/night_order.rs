use std::collections::HashSet;

use types::{PlayerState, Role, NIGHT_ORDER};

/// The next role to wake up: the first role in night order that has not acted
/// yet and is held by at least one living player. `None` means the night is over.
pub fn next_night_role(completed: &[Role], alive_players: &[PlayerState]) -> Option<Role> {
    let alive_roles: HashSet<Role> = alive_players
        .iter()
        .filter(|p| p.is_alive)
        .filter_map(|p| p.role)
        .collect();

    NIGHT_ORDER
        .into_iter()
        .find(|role| !completed.contains(role) && alive_roles.contains(role))
}

/// Roles that count as already done when a night begins. Cupid only ever acts
/// on the first night.
pub fn pre_completed_roles(night_number: u32) -> Vec<Role> {
    if night_number > 1 {
        vec![Role::Cupid]
    } else {
        Vec::new()
    }
}
