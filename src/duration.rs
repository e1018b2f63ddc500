//! Target length calculation
//!
//! Converts a desired speaking duration into a character budget. The result
//! is a band around a target count that the generation backend is told to
//! respect, and that the CLI uses to check the script it got back.
//!
//! Policy constants:
//!
//! - Rates come from [`crate::catalog::LANGUAGES`] (characters per spoken minute).
//! - The band is `target ∓ TOLERANCE_PERCENT`, symmetric.
//! - Custom minutes outside `[MIN_CUSTOM_MINUTES, MAX_CUSTOM_MINUTES]` are clamped.

use crate::catalog::{find_duration, find_language};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Half-width of the accepted band, as a percentage of the target
pub const TOLERANCE_PERCENT: u32 = 10;

/// Smallest accepted custom duration in minutes
pub const MIN_CUSTOM_MINUTES: u32 = 1;

/// Largest accepted custom duration in minutes
pub const MAX_CUSTOM_MINUTES: u32 = 120;

/// Character budget for a script
///
/// Invariant: `0 < min_chars <= target_chars <= max_chars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStats {
    /// Lower bound of the accepted band
    pub min_chars: u32,
    /// Upper bound of the accepted band
    pub max_chars: u32,
    /// Ideal character count
    pub target_chars: u32,
}

impl TargetStats {
    /// Build the band around a target character count
    pub fn around(target_chars: u32) -> Self {
        let delta = target_chars * TOLERANCE_PERCENT / 100;
        Self {
            min_chars: target_chars - delta,
            max_chars: target_chars + delta,
            target_chars,
        }
    }

    /// Whether a character count lands inside the band (inclusive)
    pub fn contains(&self, chars: usize) -> bool {
        chars >= self.min_chars as usize && chars <= self.max_chars as usize
    }
}

/// Count characters the way the budget counts them (Unicode scalar values)
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Clamp a user-supplied custom duration into the accepted range
pub fn clamp_custom_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_CUSTOM_MINUTES, MAX_CUSTOM_MINUTES)
}

/// Compute the character budget for a language and duration
///
/// `custom_minutes` is only consulted when `duration_id` is `"custom"`.
///
/// # Errors
///
/// Returns `ReelscriptError::Config` for an unknown language id or an
/// unknown duration id.
///
/// # Examples
///
/// ```
/// use reelscript::duration::calculate_target_length;
///
/// let stats = calculate_target_length("vi", "custom", 5).unwrap();
/// assert_eq!(stats.target_chars, 4000);
/// assert_eq!(stats.min_chars, 3600);
/// assert_eq!(stats.max_chars, 4400);
/// ```
pub fn calculate_target_length(
    language_id: &str,
    duration_id: &str,
    custom_minutes: u32,
) -> Result<TargetStats> {
    let language = find_language(language_id)?;
    let duration = find_duration(duration_id)?;

    let minutes = match duration.minutes {
        Some(fixed) => fixed,
        None => {
            let clamped = clamp_custom_minutes(custom_minutes);
            if clamped != custom_minutes {
                tracing::debug!(
                    requested = custom_minutes,
                    clamped,
                    "Custom minutes outside accepted range, clamping"
                );
            }
            clamped
        }
    };

    Ok(TargetStats::around(minutes * language.chars_per_minute))
}
