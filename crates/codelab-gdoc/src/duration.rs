//! Step duration annotations.
//!
//! Authors annotate a step with `Duration: M` or `Duration: M:SS` in meta
//! colored text right below the step heading.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*duration\s*:\s*(\d+)(?::(\d+))?\s*$").expect("duration pattern is valid")
});

/// Parse a duration annotation into whole minutes.
///
/// `M:SS` is rounded up to the next whole minute, so `Duration: 1:30` is two
/// minutes and `Duration: 1:00` is one. Returns `None` when `text` is not an
/// annotation or its value does not fit in a [`Duration`] of whole
/// seconds.
#[must_use]
pub fn parse_duration(text: &str) -> Option<Duration> {
    let captures = DURATION.captures(text)?;
    let minutes: u64 = captures.get(1)?.as_str().parse().ok()?;
    let seconds: u64 = match captures.get(2) {
        Some(seconds) => seconds.as_str().parse().ok()?,
        None => 0,
    };
    let total = minutes.checked_mul(60)?.checked_add(seconds)?;
    Some(Duration::from_secs(total.div_ceil(60).checked_mul(60)?))
}
