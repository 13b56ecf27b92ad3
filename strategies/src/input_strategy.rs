use std::io::{self, Write};

use itertools::Itertools;
use regex::{Captures, Regex};
use types::{Action, PlayerId, PrivateInfo, PublicInfo, PublicPlayerState, Strategy};

/// Lets a human at the terminal play a seat.
#[derive(Debug, Default)]
pub struct InputStrategy {}

impl Strategy for InputStrategy {
    fn select_action(
        &mut self,
        private_info: &PrivateInfo,
        public_info: &PublicInfo,
        available_actions: &[Action],
    ) -> Action {
        print_public_info(public_info, private_info);
        println!("Private info: {private_info}");
        let table = &public_info.public_table;
        println!(
            "Available actions: {}",
            available_actions
                .iter()
                .enumerate()
                .map(|(idx, action)| format!("[{}] {}", idx + 1, describe(action, table)))
                .join(" || ")
        );

        // if only one available action, do it
        if available_actions.len() == 1 {
            let action = available_actions[0];
            log::info!("Only have one action available: {action}");
            return action;
        }

        let mut buf = String::new();
        loop {
            match select_action_from_stdin(&mut buf, available_actions, table) {
                Ok(action) => return action,
                Err(err) => {
                    buf.clear();
                    log::error!("Error parsing message from stdin: {err}")
                }
            }
        }
    }
}

fn print_public_info(info: &PublicInfo, me: &PrivateInfo) {
    println!("Phase: {}", info.phase);
    for player in info.public_table.iter() {
        let status = match (player.is_alive, player.revealed_role) {
            (true, _) => "alive".to_string(),
            (false, Some(role)) => format!("dead, was {role}"),
            (false, None) => "dead".to_string(),
        };
        println!("  {} ({status})", player.name);
    }
    for event in info
        .history
        .iter()
        .filter(|event| event.is_visible_to(Some(me.state.id)))
        .rev()
        .take(5)
        .collect_vec()
        .into_iter()
        .rev()
    {
        println!("  {event}");
    }
}

fn describe(action: &Action, table: &[PublicPlayerState]) -> String {
    let name = |id: &PlayerId| {
        table
            .iter()
            .find(|p| p.id == *id)
            .map_or("???", |p| p.name.as_str())
            .to_string()
    };
    match action {
        Action::LinkLovers { first, second } => format!("link {} {}", name(first), name(second)),
        Action::Spy => "spy".to_string(),
        Action::Pass => "pass".to_string(),
        other => {
            let verb = other.to_string();
            let verb = verb.split_whitespace().next().unwrap_or_default().to_lowercase();
            let target = other.target().map(|id| name(&id)).unwrap_or_default();
            format!("{verb} {target}")
        }
    }
}

fn select_action_from_stdin(
    buf: &mut String,
    actions: &[Action],
    table: &[PublicPlayerState],
) -> Result<Action, String> {
    print!("Your action? >> ");
    let _ = io::stdout().flush();
    match io::stdin().read_line(buf) {
        Ok(_) => select_action_from_str(buf, actions, table),
        Err(err) => {
            buf.clear();
            Err(format!("Error reading line from stdin: {err}"))
        }
    }
}

/// Parses commands such as `kill bob`, `link ann bob`, `vote carol`, `pass`,
/// or the number of an offered action.
pub fn select_action_from_str(
    input: &str,
    actions: &[Action],
    table: &[PublicPlayerState],
) -> Result<Action, String> {
    let input = input.trim().to_lowercase();
    let input = input.as_str();

    let index_re = Regex::new(r"^(\d+)$").expect("Valid index regex");
    if let Some(caps) = index_re.captures(input) {
        let idx: usize = caps[1]
            .parse()
            .map_err(|err| format!("Bad action number {input:?}: {err}"))?;
        return idx
            .checked_sub(1)
            .and_then(|idx| actions.get(idx))
            .copied()
            .ok_or_else(|| format!("No action numbered {idx}"));
    }

    let targeted_re = Regex::new(r"^(?<verb>kill|heal|poison|protect|reveal|vote|shoot)\s+(?<name>.+)$")
        .expect("Valid targeted regex");
    if let Some(caps) = targeted_re.captures(input) {
        return targeted_action_from_captures(&caps, actions, table);
    }

    let link_re = Regex::new(r"^link\s+(?<first>\S+)\s+(?:and\s+|&\s*)?(?<second>\S+)$")
        .expect("Valid link regex");
    if let Some(caps) = link_re.captures(input) {
        let first = player_by_name(&caps["first"], table)?;
        let second = player_by_name(&caps["second"], table)?;
        return actions
            .iter()
            .copied()
            .find(|action| match action {
                Action::LinkLovers { first: a, second: b } => {
                    (*a == first && *b == second) || (*a == second && *b == first)
                }
                _ => false,
            })
            .ok_or_else(|| "Linking those two players is not a permitted action".to_string());
    }

    let bare = match input {
        "spy" => Some(Action::Spy),
        "pass" => Some(Action::Pass),
        _ => None,
    };
    if let Some(action) = bare {
        return if actions.contains(&action) {
            Ok(action)
        } else {
            Err(format!("{action} is not a permitted action right now"))
        };
    }

    Err(format!(
        "Unable to parse a permitted action from string: {input}"
    ))
}

fn targeted_action_from_captures(
    caps: &Captures,
    actions: &[Action],
    table: &[PublicPlayerState],
) -> Result<Action, String> {
    let target = player_by_name(&caps["name"], table)?;
    let verb = &caps["verb"];
    let action = match verb {
        "kill" => Action::Kill { target },
        "heal" => Action::Heal { target },
        "poison" => Action::Poison { target },
        "protect" => Action::Protect { target },
        "reveal" => Action::Reveal { target },
        "vote" => Action::Vote { target },
        "shoot" => Action::Shoot { target },
        _ => return Err(format!("Unknown verb {verb}")),
    };
    log::debug!("From actions {actions:?}, parsed {action:?}");
    if actions.contains(&action) {
        Ok(action)
    } else {
        Err(format!("{verb} on that player is not a permitted action"))
    }
}

/// Exact (case-insensitive) name first, then an unambiguous prefix.
fn player_by_name(name: &str, table: &[PublicPlayerState]) -> Result<PlayerId, String> {
    let name = name.trim().to_lowercase();
    if let Some(player) = table.iter().find(|p| p.name.to_lowercase() == name) {
        return Ok(player.id);
    }
    let matches = table
        .iter()
        .filter(|p| p.name.to_lowercase().starts_with(&name))
        .collect_vec();
    match matches[..] {
        [only] => Ok(only.id),
        [] => Err(format!("No player named {name:?}")),
        _ => Err(format!(
            "{name:?} could be any of: {}",
            matches.iter().map(|p| p.name.as_str()).join(", ")
        )),
    }
}
