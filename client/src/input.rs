//! Console command parsing

use thiserror::Error;

pub const HELP: &str = "\
commands:
  create [players]             create a game (server default roster without a count)
  join <game-id>               watch a game
  leave                        stop watching the current game
  show                         print the current game
  list                         list every territory
  targets                      list possible attacks for the acting player
  place <territory> <armies>   place part of the pending reinforcements
  commit <territory>=<armies> ...
                               place all pending reinforcements at once
  attack <from> <to> <armies>  attack an adjacent enemy territory
  fortify <from> <to> <armies> move armies through your own territories
  next                         finish attacking and start fortifying
  end                          end the turn
  as <player>                  act as the given player id or name
  help                         show this help
  quit                         disconnect and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Create { players: Option<u8> },
    Join { game_id: String },
    Leave,
    Show,
    List,
    Targets,
    Place { territory: String, armies: i32 },
    Commit { placements: Vec<(String, i32)> },
    Attack { from: String, to: String, armies: i32 },
    Fortify { from: String, to: String, armies: i32 },
    Next,
    End,
    ActAs { player: String },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command {0:?}, type help for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a number")]
    NotANumber(String),
}

/// Parses one line typed by the user. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, InputError> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (keyword.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("create", []) => ConsoleCommand::Create { players: None },
        ("create", [count]) => ConsoleCommand::Create {
            players: Some(number(count)?),
        },
        ("create", _) => return Err(InputError::Usage("create [players]")),
        ("join", [game_id]) => ConsoleCommand::Join {
            game_id: game_id.to_string(),
        },
        ("join", _) => return Err(InputError::Usage("join <game-id>")),
        ("leave", []) => ConsoleCommand::Leave,
        ("show", []) => ConsoleCommand::Show,
        ("list", []) => ConsoleCommand::List,
        ("targets", []) => ConsoleCommand::Targets,
        ("place", [territory, armies]) => ConsoleCommand::Place {
            territory: territory.to_string(),
            armies: number(armies)?,
        },
        ("place", _) => return Err(InputError::Usage("place <territory> <armies>")),
        ("commit", placements) if !placements.is_empty() => ConsoleCommand::Commit {
            placements: placements
                .iter()
                .map(|p| placement(p))
                .collect::<Result<_, _>>()?,
        },
        ("commit", _) => return Err(InputError::Usage("commit <territory>=<armies> ...")),
        ("attack", [from, to, armies]) => ConsoleCommand::Attack {
            from: from.to_string(),
            to: to.to_string(),
            armies: number(armies)?,
        },
        ("attack", _) => return Err(InputError::Usage("attack <from> <to> <armies>")),
        ("fortify", [from, to, armies]) => ConsoleCommand::Fortify {
            from: from.to_string(),
            to: to.to_string(),
            armies: number(armies)?,
        },
        ("fortify", _) => return Err(InputError::Usage("fortify <from> <to> <armies>")),
        ("next", []) => ConsoleCommand::Next,
        ("end", []) => ConsoleCommand::End,
        ("as", [player]) => ConsoleCommand::ActAs {
            player: player.to_string(),
        },
        ("as", _) => return Err(InputError::Usage("as <player>")),
        ("help" | "?", _) => ConsoleCommand::Help,
        ("quit" | "exit", _) => ConsoleCommand::Quit,
        _ => return Err(InputError::Unknown(line.trim().to_string())),
    };

    Ok(Some(command))
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, InputError> {
    text.parse()
        .map_err(|_| InputError::NotANumber(text.to_string()))
}

fn placement(text: &str) -> Result<(String, i32), InputError> {
    match text.split_once('=') {
        Some((territory, armies)) if !territory.is_empty() => {
            Ok((territory.to_string(), number(armies)?))
        }
        _ => Err(InputError::Usage("commit <territory>=<armies> ...")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_line("show"), Ok(Some(ConsoleCommand::Show)));
        assert_eq!(parse_line("  END "), Ok(Some(ConsoleCommand::End)));
        assert_eq!(parse_line("next"), Ok(Some(ConsoleCommand::Next)));
        assert_eq!(parse_line("exit"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(
            parse_line("create"),
            Ok(Some(ConsoleCommand::Create { players: None }))
        );
        assert_eq!(
            parse_line("create 4"),
            Ok(Some(ConsoleCommand::Create { players: Some(4) }))
        );
    }

    #[test]
    fn test_attack_and_fortify() {
        assert_eq!(
            parse_line("attack arg bra 2"),
            Ok(Some(ConsoleCommand::Attack {
                from: "arg".into(),
                to: "bra".into(),
                armies: 2
            }))
        );
        assert_eq!(
            parse_line("fortify chi arg -1"),
            Ok(Some(ConsoleCommand::Fortify {
                from: "chi".into(),
                to: "arg".into(),
                armies: -1
            }))
        );
    }

    #[test]
    fn test_commit_placements() {
        assert_eq!(
            parse_line("commit arg=2 chi=1"),
            Ok(Some(ConsoleCommand::Commit {
                placements: vec![("arg".into(), 2), ("chi".into(), 1)]
            }))
        );
        assert_eq!(
            parse_line("commit arg"),
            Err(InputError::Usage("commit <territory>=<armies> ..."))
        );
        assert_eq!(
            parse_line("commit =3"),
            Err(InputError::Usage("commit <territory>=<armies> ..."))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_line("attack arg bra lots"),
            Err(InputError::NotANumber("lots".into()))
        );
        assert_eq!(
            parse_line("place arg"),
            Err(InputError::Usage("place <territory> <armies>"))
        );
        assert!(matches!(
            parse_line("dance"),
            Err(InputError::Unknown(_))
        ));
    }
}
