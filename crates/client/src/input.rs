//! Line-oriented command parsing.

use tactics_core::{CommandMode, Position};

/// A request typed at the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Primary select on a cell.
    Select(Position),
    Mode(CommandMode),
    /// Secondary select.
    Cancel,
    EndTurn,
    /// Acknowledge the running animation.
    Done,
    Restart,
    Status,
    Log,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  select <x> <y>   pick a unit, or the target cell in move/attack mode
  move             highlight where the selected unit can go
  attack           highlight what the selected unit can hit
  cancel           deselect and clear highlights
  end              end the current turn
  done             finish the running animation
  restart          start the battle over
  status           show the map and units
  log              show the combat log
  quit             leave";

pub fn parse(line: &str) -> Result<Request, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err("empty command".to_string());
    };

    let request = match command.to_lowercase().as_str() {
        "select" | "s" | "click" => {
            let x = coordinate(words.next())?;
            let y = coordinate(words.next())?;
            Request::Select(Position::new(x, y))
        }
        "move" | "m" => Request::Mode(CommandMode::MoveTo),
        "attack" | "a" => Request::Mode(CommandMode::Attack),
        "cancel" | "c" => Request::Cancel,
        "end" | "e" => Request::EndTurn,
        "done" | "d" => Request::Done,
        "restart" => Request::Restart,
        "status" | "st" => Request::Status,
        "log" | "l" => Request::Log,
        "help" | "h" | "?" => Request::Help,
        "quit" | "q" | "exit" => Request::Quit,
        other => return Err(format!("unknown command `{other}`")),
    };

    if words.next().is_some() {
        return Err(format!("too many arguments for `{command}`"));
    }
    Ok(request)
}

fn coordinate(word: Option<&str>) -> Result<i32, String> {
    let word = word.ok_or_else(|| "expected two coordinates".to_string())?;
    word.parse()
        .map_err(|_| format!("`{word}` is not a coordinate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_select_with_coordinates() {
        assert_eq!(parse("select 3 4"), Ok(Request::Select(Position::new(3, 4))));
        assert_eq!(parse("  s 0 -1 "), Ok(Request::Select(Position::new(0, -1))));
    }

    #[test]
    fn modes_and_shortcuts() {
        assert_eq!(parse("move"), Ok(Request::Mode(CommandMode::MoveTo)));
        assert_eq!(parse("A"), Ok(Request::Mode(CommandMode::Attack)));
        assert_eq!(parse("e"), Ok(Request::EndTurn));
        assert_eq!(parse("q"), Ok(Request::Quit));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse("").is_err());
        assert!(parse("select 3").is_err());
        assert!(parse("select x 2").is_err());
        assert!(parse("end now").is_err());
        assert!(parse("dance").is_err());
    }
}
