//! Run configuration from `name=value` arguments.

use std::fmt;
use std::path::PathBuf;

use crate::board::{PlyCounting, Recording, SearchParams, Side, DEFAULT_REPLY_HORIZON};

/// Error type for configuration failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownOption { name: String },
    /// Argument without `=value`
    MissingValue { name: String },
    InvalidValue { name: String, value: String },
    /// Tree reply horizon beyond what ply markers can express
    ReplyHorizonTooLarge { found: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownOption { name } => write!(f, "Unknown option '{name}'"),
            ConfigError::MissingValue { name } => write!(f, "Option '{name}' needs a value"),
            ConfigError::InvalidValue { name, value } => {
                write!(f, "Invalid value '{value}' for option '{name}'")
            }
            ConfigError::ReplyHorizonTooLarge { found, max } => {
                write!(f, "Reply horizon {found} exceeds the maximum of {max}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which partitions this process searches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerSelection {
    One(usize),
    /// Every partition, one thread each
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookOptions {
    pub params: SearchParams,
    pub workers: usize,
    pub worker: WorkerSelection,
    /// Search just this first move instead of a partition
    pub first_move: Option<usize>,
    pub out_dir: PathBuf,
}

impl Default for BookOptions {
    fn default() -> Self {
        BookOptions {
            params: SearchParams::default(),
            workers: 1,
            worker: WorkerSelection::One(0),
            first_move: None,
            out_dir: PathBuf::from("."),
        }
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| invalid(name, value))
}

impl BookOptions {
    /// Build options from `name=value` arguments, validating the result.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = BookOptions::default();
        for arg in args {
            let arg = arg.as_ref();
            let (name, value) = arg.split_once('=').ok_or_else(|| ConfigError::MissingValue {
                name: arg.to_string(),
            })?;
            options.apply(name, value)?;
        }
        options.params.validate()?;
        Ok(options)
    }

    pub fn apply(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let normalized = name.trim().to_ascii_lowercase();
        let value = value.trim();
        match normalized.as_str() {
            "side" | "perspective" => {
                self.params.perspective = value.parse::<Side>().map_err(|_| invalid(name, value))?;
            }
            "horizon" | "depth" => {
                self.params.horizon = match value.to_ascii_lowercase().as_str() {
                    "none" | "full" => None,
                    _ => Some(parse_number(name, value)?),
                };
            }
            "counting" => {
                self.params.ply_counting = match value.to_ascii_lowercase().as_str() {
                    "perspective" | "side" => PlyCounting::PerspectiveMoves,
                    "every" | "all" => PlyCounting::EveryMove,
                    _ => return Err(invalid(name, value)),
                };
            }
            "cutoff" => {
                self.params.cutoff = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "1" => true,
                    "off" | "false" | "0" => false,
                    _ => return Err(invalid(name, value)),
                };
            }
            "table" => {
                self.params.recording = Recording::Table {
                    capacity: parse_number(name, value)?,
                };
            }
            "tree" => {
                let reply_horizon = if value.eq_ignore_ascii_case("default") {
                    DEFAULT_REPLY_HORIZON
                } else {
                    parse_number(name, value)?
                };
                self.params.recording = Recording::Tree { reply_horizon };
            }
            "record" => {
                if !value.eq_ignore_ascii_case("off") {
                    return Err(invalid(name, value));
                }
                self.params.recording = Recording::Off;
            }
            "workers" => {
                let workers: usize = parse_number(name, value)?;
                if workers == 0 {
                    return Err(invalid(name, value));
                }
                self.workers = workers;
            }
            "worker" => {
                self.worker = if value.eq_ignore_ascii_case("all") {
                    WorkerSelection::All
                } else {
                    WorkerSelection::One(parse_number(name, value)?)
                };
            }
            "move" => self.first_move = Some(parse_number(name, value)?),
            "out" => self.out_dir = PathBuf::from(value),
            _ => {
                return Err(ConfigError::UnknownOption {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }
}
