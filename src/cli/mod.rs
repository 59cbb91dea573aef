//! Command-line interface for tilegraph
//!
//! Drives a [`TileManager`] from a layout script or the built-in demo and
//! prints the results as text or JSON.

pub mod script;

use crate::config::{Settings, SettingsParser};
use crate::logging::{init_logging, LogConfig};
use crate::models::geometry::{CardinalDirection, Vector};
use crate::models::graph::{Edge, Element};
use crate::models::problem::StateProblem;
use crate::services::{LayoutSnapshot, TileManager};
use crate::{GraphError, Result};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info};

pub use script::{parse_script, ScriptCommand, ScriptError};

#[derive(Parser)]
#[command(name = "tilegraph")]
#[command(about = "Corner-adjacency layout graph for tiling window managers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct TileGraphCli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ~/.config/tilegraph/settings.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill a 300x300 canvas and split it twice
    Demo {
        /// Window margin used for the second split
        #[arg(short, long, default_value_t = 30)]
        margin: u32,
    },

    /// Run a layout script against a fresh layout
    Run {
        /// Script file, one command per line
        script: PathBuf,
    },

    /// Configuration commands
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub action: ConfigActions,
}

#[derive(Subcommand)]
pub enum ConfigActions {
    /// Print the effective settings
    Show,

    /// Check a settings file without running anything
    Validate {
        /// Settings file (defaults to the --config path or the default path)
        file: Option<PathBuf>,
    },
}

/// Result of one executed command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutput {
    Created {
        tile: String,
    },
    Split {
        window: String,
        problems: Vec<StateProblem>,
    },
    Moved {
        from: String,
        direction: CardinalDirection,
        to: Option<String>,
    },
    Named {
        tile: String,
        name: Option<String>,
    },
    Problems {
        element: String,
        problems: Vec<StateProblem>,
    },
    ParallelEnd {
        edge: String,
        end: Option<String>,
    },
    Connected {
        from: String,
        to: String,
    },
    Layout(LayoutSnapshot),
}

impl fmt::Display for StepOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutput::Created { tile } => write!(f, "created {}", tile),
            StepOutput::Split { window, problems } => {
                write!(f, "split created {}", window)?;
                for problem in problems {
                    write!(f, "\n  warning: {}", problem)?;
                }
                Ok(())
            }
            StepOutput::Moved { from, direction, to } => match to {
                Some(to) => write!(f, "{} -> {} -> {}", from, direction, to),
                None => write!(f, "{} -> {} -> nothing", from, direction),
            },
            StepOutput::Named { tile, name } => match name {
                Some(name) => write!(f, "{} is named {}", tile, name),
                None => write!(f, "{} has no name", tile),
            },
            StepOutput::Problems { element, problems } if problems.is_empty() => {
                write!(f, "{} is valid", element)
            }
            StepOutput::Problems { element, problems } => {
                write!(f, "{} has {} problem(s)", element, problems.len())?;
                for problem in problems {
                    write!(f, "\n  {}", problem)?;
                }
                Ok(())
            }
            StepOutput::ParallelEnd { edge, end } => match end {
                Some(end) => write!(f, "parallel end of {}: {}", edge, end),
                None => write!(f, "{} has no parallel end", edge),
            },
            StepOutput::Connected { from, to } => write!(f, "connected {} and {}", from, to),
            StepOutput::Layout(snapshot) => {
                write!(f, "layout (margin {}):", snapshot.window_margin)?;
                for tile in &snapshot.tiles {
                    write!(
                        f,
                        "\n  {:<20} at {} size {}{}",
                        tile.tag,
                        tile.position,
                        tile.size,
                        if tile.divided { " (divided)" } else { "" }
                    )?;
                }
                Ok(())
            }
        }
    }
}

pub struct CliExecutor {
    settings: Settings,
    parser: SettingsParser,
    config_path: Option<PathBuf>,
    json_output: bool,
}

impl CliExecutor {
    pub fn new(settings: Settings, config_path: Option<PathBuf>, json_output: bool) -> Self {
        Self {
            settings,
            parser: SettingsParser::default(),
            config_path,
            json_output,
        }
    }

    pub fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Demo { margin } => {
                let outputs = self.run_demo(margin)?;
                self.emit(&outputs)
            }
            Commands::Run { script } => {
                let source = std::fs::read_to_string(&script)
                    .with_context(|| format!("Failed to read script {}", script.display()))?;
                let outputs = self.run_script(&source)?;
                self.emit(&outputs)
            }
            Commands::Config(config_cmd) => self.execute_config_command(config_cmd),
        }
    }

    /// The canonical two-split layout: an unmargined split of the canvas
    /// window, then a margined split of the new window
    pub fn run_demo(&self, margin: u32) -> Result<Vec<StepOutput>> {
        let mut settings = self.settings.clone();
        settings.constraints.window_margin = 0;
        let mut manager = TileManager::new(settings.clone());
        let mut outputs = Vec::new();

        let canvas =
            manager.create_canvas(Vector::new(100, 100), Vector::new(300, 300), Some("main"))?;
        outputs.push(StepOutput::Created {
            tile: manager.tag(canvas),
        });

        let first = manager.fill(canvas)?;
        outputs.push(StepOutput::Created {
            tile: manager.tag(first),
        });

        let (second, problems) = manager.split(first, CardinalDirection::East)?;
        outputs.push(StepOutput::Split {
            window: manager.tag(second),
            problems,
        });

        settings.constraints.window_margin = margin;
        self.parser.validate(&settings)?;
        manager.set_settings(settings);
        let (third, problems) = manager.split(second, CardinalDirection::East)?;
        outputs.push(StepOutput::Split {
            window: manager.tag(third),
            problems,
        });

        outputs.push(StepOutput::Layout(manager.snapshot()));
        Ok(outputs)
    }

    /// Run every command of a script, stopping at the first failure
    pub fn run_script(&self, source: &str) -> Result<Vec<StepOutput>> {
        let commands = parse_script(source)?;
        let mut manager = TileManager::new(self.settings.clone());
        info!(commands = commands.len(), "running layout script");

        let mut outputs = Vec::with_capacity(commands.len());
        for (line, command) in commands {
            debug!(line, ?command, "executing");
            outputs.push(execute_step(&mut manager, line, command)?);
        }
        Ok(outputs)
    }

    fn emit(&self, outputs: &[StepOutput]) -> Result<()> {
        if self.json_output {
            println!("{}", serde_json::to_string_pretty(outputs)?);
        } else {
            for output in outputs {
                println!("{}", output);
            }
        }
        Ok(())
    }

    fn execute_config_command(&self, cmd: ConfigCommands) -> Result<()> {
        match cmd.action {
            ConfigActions::Show => {
                if self.json_output {
                    println!("{}", serde_json::to_string_pretty(&self.settings)?);
                } else {
                    print!("{}", self.parser.to_toml(&self.settings)?);
                }
            }
            ConfigActions::Validate { file } => {
                let path = file
                    .or_else(|| self.config_path.clone())
                    .unwrap_or_else(|| self.parser.default_path());
                let settings = self.parser.parse_file(&path)?;
                if self.json_output {
                    let result = serde_json::json!({
                        "valid": true,
                        "path": path.display().to_string(),
                        "settings": settings,
                    });
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    println!("{} is valid", path.display());
                }
            }
        }
        Ok(())
    }
}

fn execute_step(
    manager: &mut TileManager,
    line: usize,
    command: ScriptCommand,
) -> std::result::Result<StepOutput, ScriptError> {
    let failed = |source: GraphError| ScriptError::Failed { line, source };

    let output = match command {
        ScriptCommand::Canvas {
            position,
            size,
            name,
        } => {
            let canvas = manager
                .create_canvas(position, size, name.as_deref())
                .map_err(failed)?;
            StepOutput::Created {
                tile: manager.tag(canvas),
            }
        }
        ScriptCommand::Fill(tag) => {
            let target = manager.resolve_tile(&tag).map_err(failed)?;
            let window = manager.fill(target).map_err(failed)?;
            StepOutput::Created {
                tile: manager.tag(window),
            }
        }
        ScriptCommand::Split(tag, direction) => {
            let target = manager.resolve_tile(&tag).map_err(failed)?;
            let (window, problems) = manager.split(target, direction).map_err(failed)?;
            StepOutput::Split {
                window: manager.tag(window),
                problems,
            }
        }
        ScriptCommand::Next(tag, direction) => {
            let tile = manager.resolve_tile(&tag).map_err(failed)?;
            let next = manager.next_tile(tile, direction).map_err(failed)?;
            StepOutput::Moved {
                from: manager.tag(tile),
                direction,
                to: next.map(|next| manager.tag(next)),
            }
        }
        ScriptCommand::NextUndivided(tag, direction) => {
            let tile = manager.resolve_tile(&tag).map_err(failed)?;
            let next = manager.next_undivided_tile(tile, direction).map_err(failed)?;
            StepOutput::Moved {
                from: manager.tag(tile),
                direction,
                to: next.map(|next| manager.tag(next)),
            }
        }
        ScriptCommand::Name(tag, name) => {
            let tile = manager.resolve_tile(&tag).map_err(failed)?;
            manager.name(tile, &name).map_err(failed)?;
            StepOutput::Named {
                tile: manager.tag(tile),
                name: Some(name),
            }
        }
        ScriptCommand::Unname(tag) => {
            let tile = manager.resolve_tile(&tag).map_err(failed)?;
            manager.unname(tile);
            StepOutput::Named {
                tile: manager.tag(tile),
                name: None,
            }
        }
        ScriptCommand::Validate(tag) => {
            let element = resolve_element(manager, &tag).map_err(failed)?;
            StepOutput::Problems {
                element: element_tag(manager, &element),
                problems: manager.validate(&element),
            }
        }
        ScriptCommand::ParallelEnd(tag, direction) => {
            let edge = match resolve_element(manager, &tag).map_err(failed)? {
                Element::Edge(edge) => edge,
                _ => {
                    return Err(ScriptError::Syntax {
                        line,
                        message: format!("{} does not name an edge", tag),
                    })
                }
            };
            StepOutput::ParallelEnd {
                edge: edge_tag(manager, edge),
                end: manager
                    .find_parallel_end(edge, direction)
                    .map(|end| edge_tag(manager, end)),
            }
        }
        ScriptCommand::Connect(from, to, direction) => {
            let from = manager.resolve_tile(&from).map_err(failed)?;
            let to = manager.resolve_tile(&to).map_err(failed)?;
            manager.connect_canvases(from, to, direction).map_err(failed)?;
            StepOutput::Connected {
                from: manager.tag(from),
                to: manager.tag(to),
            }
        }
        ScriptCommand::Spacing(tag) => {
            let tile = manager.resolve_tile(&tag).map_err(failed)?;
            StepOutput::Problems {
                element: manager.tag(tile),
                problems: manager.check_spacing(tile).map_err(failed)?,
            }
        }
        ScriptCommand::Show => StepOutput::Layout(manager.snapshot()),
    };
    Ok(output)
}

/// Full tags name any element; bare keys name tiles
fn resolve_element(manager: &TileManager, text: &str) -> std::result::Result<Element, GraphError> {
    match manager.lookup(text) {
        Err(GraphError::Tag(_)) => {
            let id = manager.resolve_tile(text)?;
            Ok(Element::Tile {
                id,
                kind: manager.registry().kind(id),
            })
        }
        result => result,
    }
}

fn element_tag(manager: &TileManager, element: &Element) -> String {
    manager.registry().tag_for(element).to_string()
}

fn edge_tag(manager: &TileManager, edge: Edge) -> String {
    element_tag(manager, &Element::Edge(edge))
}

fn load_settings(cli: &TileGraphCli) -> Result<Settings> {
    let parser = SettingsParser::default();
    let settings = parser
        .load(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Failed to load settings from {}", path.display()),
            None => "Failed to load default settings".to_string(),
        })?;
    Ok(settings)
}

/// Parse arguments, set up logging and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = TileGraphCli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Logging disabled: {}", e);
    }

    let result = load_settings(&cli).and_then(|settings| {
        let executor = CliExecutor::new(settings, cli.config.clone(), cli.json);
        executor.execute(cli.command)
    });

    if let Err(e) = &result {
        if cli.json {
            let error_json = serde_json::json!({
                "error": true,
                "message": format!("{:#}", e),
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
        } else {
            error!("Command failed: {:#}", e);
        }
    }
    result
}
