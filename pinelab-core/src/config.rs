//! Strategy configuration — the knobs the user sets before generating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target chart timeframe for the generated indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M15,
}

impl Timeframe {
    /// The literal chart code embedded in the prompt.
    pub fn code(self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
        }
    }

    /// Human-readable label for the form selector.
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::M1 => "1 minute",
            Timeframe::M5 => "5 minutes",
            Timeframe::M15 => "15 minutes",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Timeframe::M1 => 0,
            Timeframe::M5 => 1,
            Timeframe::M15 => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Timeframe::M1),
            1 => Some(Timeframe::M5),
            2 => Some(Timeframe::M15),
            _ => None,
        }
    }

    pub fn next(self) -> Timeframe {
        match self {
            Timeframe::M1 => Timeframe::M5,
            Timeframe::M5 => Timeframe::M15,
            Timeframe::M15 => Timeframe::M1,
        }
    }

    pub fn prev(self) -> Timeframe {
        match self {
            Timeframe::M1 => Timeframe::M15,
            Timeframe::M5 => Timeframe::M1,
            Timeframe::M15 => Timeframe::M5,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "M1" => Ok(Timeframe::M1),
            "M5" => Ok(Timeframe::M5),
            "M15" => Ok(Timeframe::M15),
            other => Err(format!("unknown timeframe '{other}' (expected M1, M5, or M15)")),
        }
    }
}

/// Full set of generator inputs. Owned by the front-end, replaced field by
/// field as the user edits the form; never persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub timeframe: Timeframe,
    /// Reward side of the 1:N risk/reward ratio. Must be positive.
    pub risk_ratio: f64,
    /// Smart Money Concepts structure detection (FVG, BOS, OB).
    pub use_smc: bool,
    /// Momentum RSI module.
    pub use_rsi: bool,
    /// ATR-based volatility filter module.
    pub volatility_filter: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::M5,
            risk_ratio: 2.0,
            use_smc: true,
            use_rsi: true,
            volatility_filter: true,
        }
    }
}

impl StrategyConfig {
    /// Number of enabled optional strategy modules.
    pub fn enabled_module_count(&self) -> usize {
        usize::from(self.use_smc) + usize::from(self.use_rsi) + usize::from(self.volatility_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_cycle() {
        assert_eq!(Timeframe::M1.next(), Timeframe::M5);
        assert_eq!(Timeframe::M15.next(), Timeframe::M1);
        assert_eq!(Timeframe::M1.prev(), Timeframe::M15);
        assert_eq!(Timeframe::M5.prev(), Timeframe::M1);
    }

    #[test]
    fn timeframe_from_index_roundtrip() {
        for i in 0..3 {
            let tf = Timeframe::from_index(i).unwrap();
            assert_eq!(tf.index(), i);
        }
        assert!(Timeframe::from_index(3).is_none());
    }

    #[test]
    fn timeframe_parses_case_insensitive() {
        assert_eq!("m5".parse::<Timeframe>().unwrap(), Timeframe::M5);
        assert_eq!("M15".parse::<Timeframe>().unwrap(), Timeframe::M15);
        assert!("H1".parse::<Timeframe>().is_err());
    }

    #[test]
    fn default_matches_initial_form_state() {
        let config = StrategyConfig::default();
        assert_eq!(config.timeframe, Timeframe::M5);
        assert_eq!(config.risk_ratio, 2.0);
        assert!(config.use_smc);
        assert!(config.use_rsi);
        assert!(config.volatility_filter);
        assert_eq!(config.enabled_module_count(), 3);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: StrategyConfig =
            toml::from_str("timeframe = \"M1\"\nuse_rsi = false\n").unwrap();
        assert_eq!(config.timeframe, Timeframe::M1);
        assert!(!config.use_rsi);
        // Unspecified fields fall back to defaults
        assert_eq!(config.risk_ratio, 2.0);
        assert!(config.use_smc);
    }
}
