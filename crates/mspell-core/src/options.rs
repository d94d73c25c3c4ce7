//! Engine options (rc-file format)
//!
//! Options are read from `OPTIONS=` lines, comma separated. A bare name sets
//! a boolean, `!name` or `noname` clears it, and `name:value` or `name=value`
//! sets a numeric option.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_RANGE;
use crate::error::OptionsError;

/// Tunables for the casting engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellOptions {
    /// Casters remember which player resistances they have seen.
    pub smart_learn: bool,
    /// Casters know every player resistance without having seen it.
    pub smart_cheat: bool,
    /// Suppress messages for casts the player cannot see.
    pub ignore_unview: bool,
    /// Longest distance a caster will target
    pub max_range: i32,
    /// Drop heal and escape spells from healthy casters instead of leaving
    /// them at their base weight.
    pub strike_self_care_when_healthy: bool,
}

impl Default for SpellOptions {
    fn default() -> Self {
        Self {
            smart_learn: true,
            smart_cheat: false,
            ignore_unview: false,
            max_range: MAX_RANGE,
            strike_self_care_when_healthy: false,
        }
    }
}

impl SpellOptions {
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| OptionsError::Io(e.to_string()))?;
        Self::parse_config(&contents)
    }

    /// Parse options from rc-file text
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    options.parse_option(opt.trim())?;
                }
            }
        }

        Ok(options)
    }

    /// Apply a single `name`, `!name` or `name:value` entry.
    pub fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        if let Some((key, value)) = opt.split_once([':', '=']) {
            return self.set_option(key.trim(), value.trim());
        }

        let (negated, name) = if let Some(name) = opt.strip_prefix('!') {
            (true, name)
        } else if let Some(name) = opt.strip_prefix("no") {
            (true, name)
        } else {
            (false, opt)
        };
        self.set_bool_option(name.trim(), !negated)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<(), OptionsError> {
        match name {
            "smart_learn" => self.smart_learn = value,
            "smart_cheat" => self.smart_cheat = value,
            "ignore_unview" => self.ignore_unview = value,
            "strike_self_care_when_healthy" => self.strike_self_care_when_healthy = value,
            "max_range" => return Err(OptionsError::MissingValue(name.to_string())),
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionsError> {
        if value.is_empty() {
            return Err(OptionsError::MissingValue(name.to_string()));
        }
        match name {
            "max_range" => {
                self.max_range = value
                    .parse::<i32>()
                    .ok()
                    .filter(|n| (1..=MAX_RANGE * 4).contains(n))
                    .ok_or_else(|| {
                        OptionsError::InvalidValue(name.to_string(), value.to_string())
                    })?;
            }
            "smart_learn"
            | "smart_cheat"
            | "ignore_unview"
            | "strike_self_care_when_healthy" => {
                let flag = match value.to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => {
                        return Err(OptionsError::InvalidValue(
                            name.to_string(),
                            value.to_string(),
                        ));
                    }
                };
                self.set_bool_option(name, flag)?;
            }
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Write the options back out in rc-file form.
    pub fn to_config_string(&self) -> String {
        let flag = |on: bool, name: &str| {
            if on {
                format!("OPTIONS={name}")
            } else {
                format!("OPTIONS=!{name}")
            }
        };
        let lines = [
            "# monster spell options".to_string(),
            flag(self.smart_learn, "smart_learn"),
            flag(self.smart_cheat, "smart_cheat"),
            flag(self.ignore_unview, "ignore_unview"),
            flag(
                self.strike_self_care_when_healthy,
                "strike_self_care_when_healthy",
            ),
            format!("OPTIONS=max_range:{}", self.max_range),
        ];
        lines.join("\n") + "\n"
    }
}
