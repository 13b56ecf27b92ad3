use types::{LoverBond, PlayerState, Winner};

/// Checks the table (after deaths are applied) for a winner.
///
/// Checked in this order: no wolves left means the village wins; wolves at
/// parity or better means the wolves win; the bonded pair being the last two
/// alive means the lovers win. Because parity is checked first, a last pair
/// of one wolf and their non-wolf lover is a wolf win.
pub fn check_win(players: &[PlayerState], lovers: Option<&LoverBond>) -> Option<Winner> {
    let (wolves, others): (Vec<&PlayerState>, Vec<&PlayerState>) = players
        .iter()
        .filter(|p| p.is_alive)
        .partition(|p| p.is_wolf());

    if wolves.is_empty() {
        return Some(Winner::Villagers);
    }
    if wolves.len() >= others.len() {
        return Some(Winner::Wolves);
    }
    if let Some(bond) = lovers {
        let alive: Vec<&PlayerState> = wolves.iter().chain(others.iter()).copied().collect();
        if alive.len() == 2 && alive.iter().all(|p| bond.contains(p.id)) {
            return Some(Winner::Lovers);
        }
    }
    None
}
