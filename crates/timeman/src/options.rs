//! Time management options (`setoption` equivalents)
//!
//! The time manager reads these by value on every `init`, so a change takes
//! effect from the next move on.

use serde::Deserialize;

use crate::complexity::ComplexityModel;
use crate::limits::TimePoint;

/// Option names as exposed to the GUI
pub const MOVE_OVERHEAD: &str = "Move Overhead";
pub const NODES_TIME: &str = "nodestime";
pub const PONDER: &str = "Ponder";
pub const COMPLEXITY_MODEL: &str = "ComplexityModel";

/// Time management options
///
/// Implements `Copy` so it can be handed to `init` without cloning; keep the
/// fields plain values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeOptions {
    /// Safety margin subtracted from the usable time (ms)
    pub move_overhead: TimePoint,
    /// Nodes per millisecond; non-zero switches to node-time accounting
    pub nodes_per_ms: i64,
    /// Pondering enabled (inflates the optimum budget by 25%)
    pub ponder: bool,
    /// Which position signal drives the curves
    pub complexity_model: ComplexityModel,
}

impl Default for TimeOptions {
    fn default() -> Self {
        Self {
            move_overhead: constants::DEFAULT_MOVE_OVERHEAD_MS,
            nodes_per_ms: 0,
            ponder: false,
            complexity_model: ComplexityModel::Material,
        }
    }
}

/// Validation errors for time options
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimeOptionError {
    #[error("Move Overhead must be between {min} and {max}, got {value}")]
    MoveOverhead { value: i64, min: i64, max: i64 },

    #[error("nodestime must be between {min} and {max}, got {value}")]
    NodesTime { value: i64, min: i64, max: i64 },

    #[error("Evaluation volatility must be between {min} and {max}, got {value}")]
    Volatility { value: f64, min: f64, max: f64 },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Option defaults and validation ranges
pub mod constants {
    pub const DEFAULT_MOVE_OVERHEAD_MS: i64 = 30;

    pub const MIN_MOVE_OVERHEAD_MS: i64 = 0;
    pub const MAX_MOVE_OVERHEAD_MS: i64 = 5000;
    pub const MIN_NODES_PER_MS: i64 = 0;
    pub const MAX_NODES_PER_MS: i64 = 10_000;
    pub const MIN_EVAL_VOLATILITY: f64 = 0.0;
    pub const MAX_EVAL_VOLATILITY: f64 = 4.0;
}

impl TimeOptions {
    /// Whether node-time accounting is requested
    #[inline]
    pub fn uses_node_time(&self) -> bool {
        self.nodes_per_ms != 0
    }

    /// Check every field against its range (for deserialized documents)
    pub fn validate(&self) -> Result<(), TimeOptionError> {
        check_move_overhead(self.move_overhead)?;
        check_nodes_per_ms(self.nodes_per_ms)?;
        check_model(&self.complexity_model)?;
        Ok(())
    }

    /// Apply a `setoption name <name> value <value>` update
    ///
    /// Names are matched case-insensitively. On error the options are left
    /// unchanged.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), TimeOptionError> {
        let value = value.trim();
        let invalid = || TimeOptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        if name.eq_ignore_ascii_case(MOVE_OVERHEAD) {
            let ms = value.parse::<i64>().map_err(|_| invalid())?;
            check_move_overhead(ms)?;
            self.move_overhead = ms;
        } else if name.eq_ignore_ascii_case(NODES_TIME) {
            let npms = value.parse::<i64>().map_err(|_| invalid())?;
            check_nodes_per_ms(npms)?;
            self.nodes_per_ms = npms;
        } else if name.eq_ignore_ascii_case(PONDER) {
            self.ponder = parse_bool(value).ok_or_else(invalid)?;
        } else if name.eq_ignore_ascii_case(COMPLEXITY_MODEL) {
            self.complexity_model = ComplexityModel::from_name(value).ok_or_else(invalid)?;
        } else {
            return Err(TimeOptionError::UnknownOption(name.to_string()));
        }

        log::debug!("[TimeOptions] {name} = {value}");
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn check_move_overhead(ms: i64) -> Result<(), TimeOptionError> {
    if !(constants::MIN_MOVE_OVERHEAD_MS..=constants::MAX_MOVE_OVERHEAD_MS).contains(&ms) {
        return Err(TimeOptionError::MoveOverhead {
            value: ms,
            min: constants::MIN_MOVE_OVERHEAD_MS,
            max: constants::MAX_MOVE_OVERHEAD_MS,
        });
    }
    Ok(())
}

fn check_nodes_per_ms(npms: i64) -> Result<(), TimeOptionError> {
    if !(constants::MIN_NODES_PER_MS..=constants::MAX_NODES_PER_MS).contains(&npms) {
        return Err(TimeOptionError::NodesTime {
            value: npms,
            min: constants::MIN_NODES_PER_MS,
            max: constants::MAX_NODES_PER_MS,
        });
    }
    Ok(())
}

fn check_model(model: &ComplexityModel) -> Result<(), TimeOptionError> {
    if let ComplexityModel::Evaluation { volatility } = *model {
        if !(constants::MIN_EVAL_VOLATILITY..=constants::MAX_EVAL_VOLATILITY).contains(&volatility)
        {
            return Err(TimeOptionError::Volatility {
                value: volatility,
                min: constants::MIN_EVAL_VOLATILITY,
                max: constants::MAX_EVAL_VOLATILITY,
            });
        }
    }
    Ok(())
}

/// Builder for TimeOptions with validation
#[derive(Debug, Default)]
pub struct TimeOptionsBuilder {
    options: TimeOptions,
}

impl TimeOptionsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set move overhead in milliseconds
    pub fn move_overhead(mut self, ms: i64) -> Result<Self, TimeOptionError> {
        check_move_overhead(ms)?;
        self.options.move_overhead = ms;
        Ok(self)
    }

    /// Set nodes per millisecond (0 disables node-time accounting)
    pub fn nodes_per_ms(mut self, npms: i64) -> Result<Self, TimeOptionError> {
        check_nodes_per_ms(npms)?;
        self.options.nodes_per_ms = npms;
        Ok(self)
    }

    pub fn ponder(mut self, enabled: bool) -> Self {
        self.options.ponder = enabled;
        self
    }

    /// Set the complexity model
    pub fn complexity_model(mut self, model: ComplexityModel) -> Result<Self, TimeOptionError> {
        check_model(&model)?;
        self.options.complexity_model = model;
        Ok(self)
    }

    pub fn build(self) -> TimeOptions {
        self.options
    }
}
