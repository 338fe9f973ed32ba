use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Granularity of the text that gets cut and moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// A single character.
    #[default]
    #[serde(alias = "character")]
    Char,
    /// Part of an identifier (`camel` in `camelCase`, `snake` in `snake_case`).
    Subword,
    /// A run of word characters or a run of punctuation.
    Word,
    /// A coarser word that ignores punctuation boundaries.
    Bigword,
    /// A whole line, moved vertically.
    Line,
    /// The first non-blank character of the line, then column 0.
    #[serde(alias = "line_start")]
    Bol,
    /// The end of the line, before its terminator.
    #[serde(alias = "line_end")]
    Eol,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Char,
        Unit::Subword,
        Unit::Word,
        Unit::Bigword,
        Unit::Line,
        Unit::Bol,
        Unit::Eol,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Char => "char",
            Unit::Subword => "subword",
            Unit::Word => "word",
            Unit::Bigword => "bigword",
            Unit::Line => "line",
            Unit::Bol => "bol",
            Unit::Eol => "eol",
        }
    }

    /// Line moves travel between rows; everything else travels along the text.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Unit::Line)
    }

    /// Units whose destination does not depend on a repeat count.
    pub fn is_line_boundary(&self) -> bool {
        matches!(self, Unit::Bol | Unit::Eol)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "char" | "character" => Ok(Unit::Char),
            "subword" => Ok(Unit::Subword),
            "word" => Ok(Unit::Word),
            "bigword" => Ok(Unit::Bigword),
            "line" => Ok(Unit::Line),
            "bol" | "line_start" | "line-start" => Ok(Unit::Bol),
            "eol" | "line_end" | "line-end" => Ok(Unit::Eol),
            _ => Err(format!("unknown unit: {s}")),
        }
    }
}

/// Which way a unit travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}
