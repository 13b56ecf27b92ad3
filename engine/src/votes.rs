use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use types::{
    find_player, player_name, DataIntegrityWarning, LoverBond, PlayerId, PlayerState, Vote,
};

use crate::cascade::lover_cascade;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteTally {
    /// Set only when exactly one player holds the most votes.
    pub eliminated: Option<PlayerId>,
    pub tie: bool,
    pub counts: BTreeMap<PlayerId, usize>,
    pub warnings: Vec<DataIntegrityWarning>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteResult {
    pub deaths: Vec<PlayerId>,
    pub summary: Vec<String>,
}

fn living(players: &[PlayerState], id: PlayerId) -> Result<(), DataIntegrityWarning> {
    match find_player(players, id) {
        None => Err(DataIntegrityWarning::UnknownPlayer { id }),
        Some(p) if !p.is_alive => Err(DataIntegrityWarning::DeadPlayer { id }),
        Some(_) => Ok(()),
    }
}

/// Counts the day's ballots. A later ballot from the same voter replaces an
/// earlier one. Ballots from or against players who are not alive are
/// skipped. A shared top score is a tie and nobody is eliminated.
pub fn tally_votes(votes: &[Vote], alive_players: &[PlayerState]) -> VoteTally {
    let mut tally = VoteTally::default();

    let mut ballots: HashMap<PlayerId, PlayerId> = HashMap::new();
    for vote in votes {
        let check = living(alive_players, vote.voter).and(living(alive_players, vote.target));
        match check {
            Ok(()) => {
                ballots.insert(vote.voter, vote.target);
            }
            Err(warning) => {
                log::warn!("Ignoring vote from {}: {warning}", vote.voter);
                tally.warnings.push(warning);
            }
        }
    }

    tally.counts = ballots.values().copied().counts().into_iter().collect();

    let top_score = tally.counts.values().copied().max().unwrap_or(0);
    let leaders = tally
        .counts
        .iter()
        .filter(|&(_, &count)| count == top_score && count > 0)
        .map(|(&id, _)| id)
        .collect_vec();

    tally.tie = leaders.len() > 1;
    if let [only] = leaders[..] {
        tally.eliminated = Some(only);
    }
    log::debug!(
        "Vote counts: {:?}, eliminated: {:?}, tie: {}",
        tally.counts,
        tally.eliminated,
        tally.tie
    );
    tally
}

/// Turns a tally into deaths: the eliminated player and, one step further,
/// their lover.
pub fn resolve_vote(
    tally: &VoteTally,
    players: &[PlayerState],
    lovers: Option<&LoverBond>,
) -> VoteResult {
    let mut result = VoteResult::default();

    let Some(eliminated) = tally.eliminated else {
        let line = if tally.tie {
            "\u{2696}\u{FE0F} Tie! Nobody is eliminated."
        } else {
            "\u{2696}\u{FE0F} No votes were cast. Nobody is eliminated."
        };
        result.summary.push(line.to_string());
        return result;
    };

    result.deaths.push(eliminated);
    let role = find_player(players, eliminated)
        .and_then(|p| p.role)
        .map_or_else(|| "unknown".to_string(), |r| r.to_string());
    result.summary.push(format!(
        "\u{2696}\u{FE0F} {} was eliminated by the village! Role: {role}",
        player_name(players, eliminated)
    ));

    if let Some(partner) = lover_cascade(eliminated, players, lovers) {
        result.deaths.push(partner);
        result.summary.push(format!(
            "\u{1F494} {} died of a broken heart!",
            player_name(players, partner)
        ));
    }
    result
}
