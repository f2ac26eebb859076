use std::env;
use std::time::Duration;

use crate::ai::PlayStyle;
use crate::error::AppError;

/// Delays between game steps. None of them affect correctness; they give
/// clients time to show what just happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Hakem-determination cards on screen before the first deal.
    pub hakem_reveal: Duration,
    /// Completed trick on screen before a bot leads the next one.
    pub trick_display: Duration,
    /// Round result on screen before the next deal.
    pub round_result: Duration,
    /// Bot "thinking" time before a card, drawn uniformly from this range.
    pub bot_think_min: Duration,
    pub bot_think_max: Duration,
    /// Bot hakem's pause before choosing hokm.
    pub bot_trump: Duration,
}

impl Pacing {
    pub fn normal() -> Self {
        Self {
            hakem_reveal: Duration::from_secs(3),
            trick_display: Duration::from_secs(3),
            round_result: Duration::from_secs(4),
            bot_think_min: Duration::from_secs(1),
            bot_think_max: Duration::from_secs(2),
            bot_trump: Duration::from_secs(2),
        }
    }

    /// Every delay zero.
    pub fn instant() -> Self {
        Self {
            hakem_reveal: Duration::ZERO,
            trick_display: Duration::ZERO,
            round_result: Duration::ZERO,
            bot_think_min: Duration::ZERO,
            bot_think_max: Duration::ZERO,
            bot_trump: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::normal()
    }
}

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub idle_timeout: Duration,
    pub cleanup_interval: Duration,
    pub bot_style: PlayStyle,
    pub pacing: Pacing,
}

impl ServerConfig {
    /// Read `HOKM_*` variables from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOKM_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "HOKM_PORT", 3000u16)?;
        let idle_minutes = parse_or(&lookup, "HOKM_IDLE_TIMEOUT_MINUTES", 30u64)?;
        let cleanup_secs = parse_or(&lookup, "HOKM_CLEANUP_INTERVAL_SECS", 300u64)?;
        if cleanup_secs == 0 {
            return Err(AppError::config(
                "HOKM_CLEANUP_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let bot_style = match lookup("HOKM_BOT_STYLE") {
            Some(raw) => raw
                .parse::<PlayStyle>()
                .map_err(|e| AppError::config(format!("HOKM_BOT_STYLE: {e}")))?,
            None => PlayStyle::default(),
        };

        let pacing = match lookup("HOKM_PACING").as_deref() {
            None | Some("normal") => Pacing::normal(),
            Some("instant") => Pacing::instant(),
            Some(other) => {
                return Err(AppError::config(format!(
                    "HOKM_PACING must be 'normal' or 'instant', got '{other}'"
                )))
            }
        };

        Ok(Self {
            host,
            port,
            idle_timeout: Duration::from_secs(idle_minutes * 60),
            cleanup_interval: Duration::from_secs(cleanup_secs),
            bot_style,
            pacing,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{key} is invalid ('{raw}'): {e}"))),
        None => Ok(default),
    }
}
