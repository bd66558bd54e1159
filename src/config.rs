//! Loading junction parameters and arrival schedules from text files
//!
//! Parameter file, one `key : value` (or `key = value`) per line:
//!
//! ```text
//! laneLength      : 10
//! laneWSLength    :  8
//! lightPeriod     : 14
//! lightWestGreen  :  6
//! lightSouthGreen :  4
//! ```
//!
//! Regime table, one regime per line: duration, arrival probability,
//! turning probability and an optional comment.
//!
//! ```text
//! 100   0.2   0.3   Night
//!  20   0.8   0.8   Morning rush
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};

use crate::simulation::{Regime, Tick};

/// Sizes of the lanes and timing of the two lights
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JunctionConfig {
    /// Capacity of the shared entry lane
    pub lane_length: usize,
    /// Capacity of each lane in front of a light
    pub lane_ws_length: usize,
    /// Cycle length shared by both lights
    pub light_period: usize,
    pub light_west_green: usize,
    pub light_south_green: usize,
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            lane_length: 10,
            lane_ws_length: 8,
            light_period: 14,
            light_west_green: 6,
            light_south_green: 4,
        }
    }
}

impl JunctionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("File {} could not be loaded", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid properties in {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once([':', '=']) else {
                bail!("line {}: expected `key : value`, got {:?}", number + 1, line);
            };
            let value = value.trim().parse::<usize>().with_context(|| {
                format!("line {}: {} is not a whole number", number + 1, key.trim())
            })?;
            values.insert(key.trim().to_string(), value);
        }

        let get = |key: &str| -> Result<usize> {
            values
                .get(key)
                .copied()
                .with_context(|| format!("missing property {key}"))
        };
        let config = Self {
            lane_length: get("laneLength")?,
            lane_ws_length: get("laneWSLength")?,
            light_period: get("lightPeriod")?,
            light_west_green: get("lightWestGreen")?,
            light_south_green: get("lightSouthGreen")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.lane_length > 0, "laneLength must be at least 1");
        ensure!(self.lane_ws_length > 0, "laneWSLength must be at least 1");
        ensure!(self.light_period > 0, "lightPeriod must be at least 1");
        ensure!(
            self.light_west_green <= self.light_period,
            "lightWestGreen ({}) is longer than lightPeriod ({})",
            self.light_west_green,
            self.light_period
        );
        ensure!(
            self.light_south_green <= self.light_period,
            "lightSouthGreen ({}) is longer than lightPeriod ({})",
            self.light_south_green,
            self.light_period
        );
        Ok(())
    }
}

pub fn load_regimes(path: impl AsRef<Path>) -> Result<Vec<Regime>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("File {} could not be loaded", path.display()))?;
    parse_regimes(&text).with_context(|| format!("Invalid regime table in {}", path.display()))
}

/// Parse a whitespace-separated regime table. Blank lines are skipped and
/// everything after the third number is kept as the comment.
pub fn parse_regimes(text: &str) -> Result<Vec<Regime>> {
    let mut regimes = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let number = number + 1;
        let mut rest = line;
        let duration = next_field(&mut rest)
            .with_context(|| format!("line {number}: missing duration"))?
            .parse::<Tick>()
            .with_context(|| format!("line {number}: duration is not a whole number"))?;
        let arrival_prob = next_field(&mut rest)
            .with_context(|| format!("line {number}: missing arrival probability"))?
            .parse::<f64>()
            .with_context(|| format!("line {number}: arrival probability is not a number"))?;
        let turn_prob = next_field(&mut rest)
            .with_context(|| format!("line {number}: missing turning probability"))?
            .parse::<f64>()
            .with_context(|| format!("line {number}: turning probability is not a number"))?;
        ensure!(
            (0.0..=1.0).contains(&arrival_prob),
            "line {number}: arrival probability {arrival_prob} is outside [0, 1]"
        );
        ensure!(
            (0.0..=1.0).contains(&turn_prob),
            "line {number}: turning probability {turn_prob} is outside [0, 1]"
        );
        let comment = rest.trim();
        regimes.push(Regime::new(duration, arrival_prob, turn_prob, comment));
    }
    ensure!(!regimes.is_empty(), "no regimes defined");
    Ok(regimes)
}

/// Split the next whitespace-delimited token off the front of `rest`
fn next_field<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (field, tail) = trimmed.split_at(end);
    *rest = tail;
    (!field.is_empty()).then_some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_properties_with_mixed_separators() {
        let text = "# junction\nlaneLength : 10\nlaneWSLength=8\n\n\
                    lightPeriod     : 14\nlightWestGreen  :  6\nlightSouthGreen :  4\n";
        assert_eq!(JunctionConfig::parse(text).unwrap(), JunctionConfig::default());
    }

    #[test]
    fn missing_property_is_an_error() {
        let text = "laneLength : 10\nlaneWSLength : 8\nlightPeriod : 14\nlightWestGreen : 6\n";
        let err = JunctionConfig::parse(text).unwrap_err();
        assert!(err.to_string().contains("lightSouthGreen"));
    }

    #[test]
    fn green_longer_than_period_is_rejected() {
        let text = "laneLength : 1\nlaneWSLength : 1\nlightPeriod : 4\n\
                    lightWestGreen : 5\nlightSouthGreen : 1\n";
        assert!(JunctionConfig::parse(text).is_err());
    }

    #[test]
    fn parses_regime_table_with_comments() {
        let text = "100   0.2   0.3   Night\n 20 0.8 0.8 Morning rush rush\n\n60 0.5 0.5\n";
        let regimes = parse_regimes(text).unwrap();
        assert_eq!(regimes.len(), 3);
        assert_eq!(regimes[0], Regime::new(100, 0.2, 0.3, "Night"));
        assert_eq!(regimes[1].comment, "Morning rush rush");
        assert_eq!(regimes[2].comment, "");
    }

    #[test]
    fn rejects_bad_regime_lines() {
        assert!(parse_regimes("").is_err());
        assert!(parse_regimes("10 0.5").is_err());
        assert!(parse_regimes("ten 0.5 0.5").is_err());
        assert!(parse_regimes("10 1.2 0.5").is_err());
    }
}
