//! Property tests for the duration annotation grammar.

use std::time::Duration;

use codelab_gdoc::parse_duration;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn bare_minutes_are_exact(minutes: u16) -> bool {
    let text = format!("Duration: {minutes}");
    parse_duration(&text) == Some(Duration::from_secs(u64::from(minutes) * 60))
}

#[quickcheck]
fn seconds_round_up_to_next_minute(minutes: u16, seconds: u8) -> bool {
    let seconds = seconds % 60;
    let text = format!("duration : {minutes}:{seconds:02} ");
    let want = u64::from(minutes) + u64::from(seconds > 0);
    parse_duration(&text) == Some(Duration::from_secs(want * 60))
}

#[quickcheck]
fn seconds_past_a_minute_carry_over(minutes: u16, seconds: u16) -> bool {
    let text = format!("Duration: {minutes}:{seconds}");
    let total = u64::from(minutes) * 60 + u64::from(seconds);
    parse_duration(&text) == Some(Duration::from_secs(total.div_ceil(60) * 60))
}

#[quickcheck]
fn huge_values_never_panic(offset: u8, seconds: u64) -> bool {
    let minutes = (u64::MAX / 60).saturating_sub(u64::from(offset) / 2) + u64::from(offset % 3);
    let text = format!("Duration: {minutes}:{seconds}");
    let want = minutes
        .checked_mul(60)
        .and_then(|secs| secs.checked_add(seconds))
        .and_then(|total| total.div_ceil(60).checked_mul(60))
        .map(Duration::from_secs);
    parse_duration(&text) == want
}

#[quickcheck]
fn keyword_is_case_insensitive(minutes: u8, upper: bool) -> bool {
    let keyword = if upper { "DURATION" } else { "Duration" };
    parse_duration(&format!("{keyword}:{minutes}")).is_some()
}
