//! Display formatting for raw API fields.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid")
});

/// Compact count: `1400000` → `1.4M`, `25000` → `25K`, `999` → `999`.
/// A missing count reads as `0`.
pub fn format_number(count: Option<u64>) -> String {
    let Some(n) = count else {
        return "0".to_string();
    };

    if n >= 1_000_000_000 {
        format!("{}B", to_fixed(n as f64 / 1e9, 1))
    } else if n >= 1_000_000 {
        format!("{}M", to_fixed(n as f64 / 1e6, 1))
    } else if n >= 1_000 {
        format!("{}K", to_fixed(n as f64 / 1e3, 0))
    } else {
        n.to_string()
    }
}

// Rounds the exact value of `value`. Only an exact tie at `decimals` goes
// away from zero; `{:.N}` would take it to even.
fn to_fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let exact = value.mul_add(factor, -scaled) == 0.0;
    if exact && scaled.fract() == 0.5 {
        return format!("{:.*}", decimals, (scaled.trunc() + 1.0) / factor);
    }
    format!("{:.*}", decimals, value)
}

/// `PT1M35S` → `1:35`, `PT2H5M` → `2:05:00`. Empty, absent or unrecognised
/// input yields an empty string. Day components are ignored.
pub fn format_duration(iso: Option<&str>) -> String {
    let Some(iso) = iso.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return String::new();
    };

    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Relative age such as `3 days ago`. A unit is used only once more than one
/// of it has elapsed; anything shorter falls through to seconds.
pub fn time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = ((now - published).num_milliseconds() as f64 / 1000.0).round() as i64;

    const UNITS: [(i64, &str); 5] = [
        (31_536_000, "years"),
        (2_592_000, "months"),
        (86_400, "days"),
        (3_600, "hours"),
        (60, "minutes"),
    ];

    for (unit_seconds, label) in UNITS {
        let interval = seconds.div_euclid(unit_seconds);
        if interval > 1 {
            return format!("{interval} {label} ago");
        }
    }
    format!("{seconds} seconds ago")
}

/// Generated avatar for a name without a picture
pub fn avatar_placeholder(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random&color=fff",
        utf8_percent_encode(name, NON_ALPHANUMERIC)
    )
}
