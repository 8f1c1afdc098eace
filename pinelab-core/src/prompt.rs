//! Prompt builder — renders a [`StrategyConfig`] into the model instruction.
//!
//! The instruction must parse-proof the model: it states the exact JSON
//! schema the response has to follow, and the transport additionally enforces
//! that schema on the endpoint side.

use crate::config::StrategyConfig;

/// Render a configuration into the instruction sent to the completion
/// endpoint. Pure: same config in, same text out.
///
/// The optional strategy-module clauses appear only when the corresponding
/// flag is set; the multi-EMA trend filter and the ATR stop/target levels are
/// requested unconditionally.
pub fn build_prompt(config: &StrategyConfig) -> String {
    let mut modules: Vec<&str> = Vec::new();
    if config.use_smc {
        modules.push("Smart Money Concepts (FVG, BOS, OB)");
    }
    if config.use_rsi {
        modules.push("Momentum RSI");
    }
    if config.volatility_filter {
        modules.push("ATR-based Volatility Filter");
    }
    let modules_line = if modules.is_empty() {
        "none (mandatory elements only)".to_string()
    } else {
        modules.join(", ")
    };

    format!(
        r#"Act as a world-class Quantitative Forex Trader specializing in XAUUSD scalping.
Generate a professional Pine Script (Version 5) indicator based on the following configuration:
- Timeframe target: {timeframe}
- Risk/Reward: 1:{risk_ratio}
- Strategy Modules: {modules_line}

The script MUST include:
1. Multi-EMA trend identification (21, 50, 200).
2. ATR-based dynamic Stop Loss and Take Profit levels.
3. Visual markers (Labels) for Entry (Long/Short), SL, and TP.
4. Specialized handling for Gold's high volatility (avoiding whipsaws).

Respond ONLY with a JSON object following this schema:
{{
  "code": "The complete Pine Script code",
  "explanation": "Brief breakdown of why this works for XAUUSD scalping",
  "keyFeatures": ["List of 3-5 technical features implemented"]
}}"#,
        timeframe = config.timeframe.code(),
        risk_ratio = config.risk_ratio,
    )
}
