use std::fmt;
use std::str::FromStr;

use crate::model::config::MovementConfig;
use crate::model::unit::{Direction, Unit};
use crate::region_set::MoveRequest;

/// Which of the two configured bulk line counts to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bulk {
    /// `bulk_counts[0]`, ten by default.
    Small,
    /// `bulk_counts[1]`, thirty by default.
    Large,
}

/// All text-moving commands the host can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // -- Lines
    MoveTextUp { times: usize },
    MoveTextDown { times: usize },
    MoveTextUpBulk(Bulk),
    MoveTextDownBulk(Bulk),

    // -- Along the line; `None` uses the configured horizontal unit
    MoveTextLeft { by: Option<Unit> },
    MoveTextRight { by: Option<Unit> },
    MoveSubwordLeft,
    MoveSubwordRight,

    // -- Line boundaries
    MoveToBol,
    MoveToEol,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::MoveTextUp { times: 1 },
        Command::MoveTextDown { times: 1 },
        Command::MoveTextLeft { by: None },
        Command::MoveTextRight { by: None },
        Command::MoveSubwordLeft,
        Command::MoveSubwordRight,
        Command::MoveToBol,
        Command::MoveToEol,
        Command::MoveTextUpBulk(Bulk::Small),
        Command::MoveTextDownBulk(Bulk::Small),
        Command::MoveTextUpBulk(Bulk::Large),
        Command::MoveTextDownBulk(Bulk::Large),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveTextUp { .. } => "granular_move_text_up",
            Command::MoveTextDown { .. } => "granular_move_text_down",
            Command::MoveTextLeft { .. } => "granular_move_text_left",
            Command::MoveTextRight { .. } => "granular_move_text_right",
            Command::MoveSubwordLeft => "granular_move_text_subword_left",
            Command::MoveSubwordRight => "granular_move_text_subword_right",
            Command::MoveToBol => "granular_move_text_to_bol",
            Command::MoveToEol => "granular_move_text_to_eol",
            Command::MoveTextUpBulk(Bulk::Small) => "granular_move_text_up_ten_times",
            Command::MoveTextDownBulk(Bulk::Small) => "granular_move_text_down_ten_times",
            Command::MoveTextUpBulk(Bulk::Large) => "granular_move_text_up_thirty_times",
            Command::MoveTextDownBulk(Bulk::Large) => "granular_move_text_down_thirty_times",
        }
    }

    /// Override the repeat count of a line command, or the unit of a
    /// horizontal one. Other commands are returned unchanged.
    pub fn with_times(self, times: usize) -> Self {
        match self {
            Command::MoveTextUp { .. } | Command::MoveTextUpBulk(_) => {
                Command::MoveTextUp { times }
            }
            Command::MoveTextDown { .. } | Command::MoveTextDownBulk(_) => {
                Command::MoveTextDown { times }
            }
            other => other,
        }
    }

    pub fn with_unit(self, unit: Unit) -> Self {
        match self {
            Command::MoveTextLeft { .. } => Command::MoveTextLeft { by: Some(unit) },
            Command::MoveTextRight { .. } => Command::MoveTextRight { by: Some(unit) },
            other => other,
        }
    }

    /// Unit, direction and count this command moves by.
    pub fn request(&self, config: &MovementConfig) -> MoveRequest {
        let [small, large] = config.bulk_counts;
        let bulk = |b: &Bulk| match b {
            Bulk::Small => small,
            Bulk::Large => large,
        };

        let (unit, direction, times) = match self {
            Command::MoveTextUp { times } => (Unit::Line, Direction::Backward, *times),
            Command::MoveTextDown { times } => (Unit::Line, Direction::Forward, *times),
            Command::MoveTextUpBulk(b) => (Unit::Line, Direction::Backward, bulk(b)),
            Command::MoveTextDownBulk(b) => (Unit::Line, Direction::Forward, bulk(b)),
            Command::MoveTextLeft { by } => {
                (by.unwrap_or(config.horizontal_unit), Direction::Backward, 1)
            }
            Command::MoveTextRight { by } => {
                (by.unwrap_or(config.horizontal_unit), Direction::Forward, 1)
            }
            Command::MoveSubwordLeft => (Unit::Subword, Direction::Backward, 1),
            Command::MoveSubwordRight => (Unit::Subword, Direction::Forward, 1),
            Command::MoveToBol => (Unit::Bol, Direction::Forward, 1),
            Command::MoveToEol => (Unit::Eol, Direction::Forward, 1),
        };
        MoveRequest::new(unit, direction, times)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = String;

    /// Accepts the full name or the name without the `granular_move_text_` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Command::ALL
            .into_iter()
            .find(|cmd| {
                let name = cmd.name();
                name == wanted || name.strip_prefix("granular_move_text_") == Some(wanted.as_str())
            })
            .ok_or_else(|| format!("unknown command: {s}"))
    }
}
