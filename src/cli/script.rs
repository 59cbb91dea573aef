//! Line-oriented layout scripts
//!
//! One command per line, arguments separated by whitespace. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! canvas 0 0 1920 1080 main
//! fill main
//! split <1> east
//! next <1> east
//! ```

use crate::models::geometry::{CardinalDirection, Vector};
use crate::GraphError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: {source}")]
    Failed {
        line: usize,
        #[source]
        source: GraphError,
    },
}

/// One parsed script command. Tile and element tags stay textual until the
/// command runs, since earlier lines create the tiles they refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Canvas {
        position: Vector,
        size: Vector,
        name: Option<String>,
    },
    Fill(String),
    Split(String, CardinalDirection),
    Next(String, CardinalDirection),
    NextUndivided(String, CardinalDirection),
    Name(String, String),
    Unname(String),
    Validate(String),
    ParallelEnd(String, CardinalDirection),
    Connect(String, String, CardinalDirection),
    Spacing(String),
    Show,
}

impl FromStr for ScriptCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = words.split_first() else {
            return Err("empty command".to_string());
        };

        let command = match (keyword, args) {
            ("canvas", [x, y, width, height, rest @ ..]) if rest.len() <= 1 => {
                ScriptCommand::Canvas {
                    position: Vector::new(number(x)?, number(y)?),
                    size: Vector::new(number(width)?, number(height)?),
                    name: rest.first().map(|name| name.to_string()),
                }
            }
            ("fill", [tag]) => ScriptCommand::Fill(tag.to_string()),
            ("split", [tag, direction]) => {
                ScriptCommand::Split(tag.to_string(), parse_direction(direction)?)
            }
            ("next", [tag, direction]) => {
                ScriptCommand::Next(tag.to_string(), parse_direction(direction)?)
            }
            ("next-undivided", [tag, direction]) => {
                ScriptCommand::NextUndivided(tag.to_string(), parse_direction(direction)?)
            }
            ("name", [tag, name]) => ScriptCommand::Name(tag.to_string(), name.to_string()),
            ("unname", [tag]) => ScriptCommand::Unname(tag.to_string()),
            ("validate", [tag]) => ScriptCommand::Validate(tag.to_string()),
            ("parallel-end", [tag, direction]) => {
                ScriptCommand::ParallelEnd(tag.to_string(), parse_direction(direction)?)
            }
            ("connect", [from, to, direction]) => {
                let direction = parse_direction(direction)?;
                ScriptCommand::Connect(from.to_string(), to.to_string(), direction)
            }
            ("spacing", [tag]) => ScriptCommand::Spacing(tag.to_string()),
            ("show", []) => ScriptCommand::Show,
            (
                "canvas" | "fill" | "split" | "next" | "next-undivided" | "name" | "unname"
                | "validate" | "parallel-end" | "connect" | "spacing" | "show",
                _,
            ) => return Err(format!("wrong number of arguments for {}", keyword)),
            _ => return Err(format!("unknown command {:?}", keyword)),
        };
        Ok(command)
    }
}

fn number(text: &str) -> Result<i32, String> {
    text.parse()
        .map_err(|_| format!("expected an integer, found {:?}", text))
}

fn parse_direction(text: &str) -> Result<CardinalDirection, String> {
    text.parse()
        .map_err(|_| format!("expected a direction, found {:?}", text))
}

/// Parse a whole script into numbered commands
pub fn parse_script(source: &str) -> Result<Vec<(usize, ScriptCommand)>, ScriptError> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            text.parse::<ScriptCommand>()
                .map(|command| (line, command))
                .map_err(|message| ScriptError::Syntax { line, message })
        })
        .collect()
}
