use types::{find_player, LoverBond, PlayerId, PlayerState};

/// The lover who dies of grief when `victim` dies, if any. Only looks one step
/// ahead: the partner's own death never triggers anything further here.
pub fn lover_cascade(
    victim: PlayerId,
    players: &[PlayerState],
    lovers: Option<&LoverBond>,
) -> Option<PlayerId> {
    let partner = lovers?.partner_of(victim)?;
    let other = find_player(players, partner)?;
    other.is_alive.then_some(partner)
}
