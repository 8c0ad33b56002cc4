//! View derivations: pure transforms from raw record fields to display values.
//!
//! Every function here is total over its input. Missing inputs are expected
//! to arrive already defaulted (see `records`), and unknown enumerated values
//! fall through to `None` rather than failing.

use crate::records::Activity;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Rows of the dashboard "Priority Tasks" panel.
pub const PRIORITY_TASK_LIMIT: usize = 5;

/// Rows of the dashboard "Recent Activity" panel.
pub const ACTIVITY_LIMIT: usize = 8;

const STUB_WARNING_THRESHOLD: f64 = 10.0;
const STUB_CRITICAL_THRESHOLD: f64 = 20.0;

// ============================================================================
// BANDS AND TONES
// ============================================================================

/// Presentation colour class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Accent,
    Warning,
    Danger,
    Muted,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Accent => "accent",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
            Tone::Muted => "muted",
        }
    }
}

/// Severity band of the overall stub rate. Presentation only, never a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StubBand {
    Normal,
    Warning,
    Critical,
}

impl StubBand {
    pub fn tone(&self) -> Tone {
        match self {
            StubBand::Normal => Tone::Accent,
            StubBand::Warning => Tone::Warning,
            StubBand::Critical => Tone::Danger,
        }
    }
}

/// `[..10] → normal`, `(10, 20] → warning`, `(20, ..) → critical`.
pub fn stub_band(stub_pct: f64) -> StubBand {
    if stub_pct > STUB_CRITICAL_THRESHOLD {
        StubBand::Critical
    } else if stub_pct > STUB_WARNING_THRESHOLD {
        StubBand::Warning
    } else {
        StubBand::Normal
    }
}

pub fn critical_stub_tone(critical_stubs: u64) -> Tone {
    if critical_stubs > 0 {
        Tone::Danger
    } else {
        Tone::Accent
    }
}

/// Files with any detected stub are highlighted.
pub fn stub_count_tone(stub_count: u64) -> Tone {
    if stub_count > 0 {
        Tone::Warning
    } else {
        Tone::Muted
    }
}

// ============================================================================
// PERCENTAGES
// ============================================================================

/// Stub functions as a percentage of all functions, rounded to 2 decimals.
pub fn stub_percentage(stub_functions: u64, total_functions: u64) -> f64 {
    if total_functions == 0 {
        return 0.0;
    }
    let raw = stub_functions as f64 / total_functions as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// `value / max × 100`, or `0` when `max ≤ 0`.
///
/// Not clamped: values above 100 are shown as given.
pub fn progress_percent(value: f64, max: f64) -> f64 {
    if !(max > 0.0) {
        return 0.0;
    }
    value / max * 100.0
}

/// `40.0 → "40%"`, `33.333 → "33.33%"`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        return format!("{}%", rounded as i64);
    }
    let text = format!("{:.2}", rounded);
    format!("{}%", text.trim_end_matches('0').trim_end_matches('.'))
}

// ============================================================================
// SEQUENCES
// ============================================================================

/// First `n` items in server order. The client never re-sorts.
pub fn top_n<T>(items: &[T], n: usize) -> &[T] {
    &items[..items.len().min(n)]
}

// ============================================================================
// TAGS
// ============================================================================

pub fn priority_tag_color(priority: &str) -> Option<Tone> {
    match priority.trim().to_ascii_uppercase().as_str() {
        "P0" => Some(Tone::Danger),
        "P1" => Some(Tone::Warning),
        "P2" => Some(Tone::Accent),
        "P3" => Some(Tone::Muted),
        _ => None,
    }
}

/// Stub severity as reported by the scanner.
pub fn severity_tag_color(severity: &str) -> Option<Tone> {
    match severity.trim().to_ascii_lowercase().as_str() {
        "critical" => Some(Tone::Danger),
        "high" => Some(Tone::Warning),
        "medium" => Some(Tone::Accent),
        "low" => Some(Tone::Muted),
        _ => None,
    }
}

pub fn status_tag_color(status: &str) -> Option<Tone> {
    match status.trim().to_ascii_lowercase().as_str() {
        "implemented" | "verified" | "done" => Some(Tone::Accent),
        "in_progress" | "testing" | "review" => Some(Tone::Warning),
        "blocked" => Some(Tone::Danger),
        "not_started" | "planned" | "todo" | "deprecated" | "cancelled" => Some(Tone::Muted),
        _ => None,
    }
}

/// Class-name form of a status: the first `_` becomes `-`.
pub fn status_class(status: &str) -> String {
    status.replacen('_', "-", 1)
}

// ============================================================================
// TEXT
// ============================================================================

/// `1234567 → "1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Entity name of an activity row, or `#<id>` when the server gave none.
pub fn entity_label(activity: &Activity) -> String {
    match activity.entity_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => match activity.entity_id {
            Some(id) => format!("#{}", id),
            None => "#?".to_string(),
        },
    }
}

/// Short display form of a server timestamp; unparseable input is echoed.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_band_boundaries() {
        assert_eq!(stub_band(0.0), StubBand::Normal);
        assert_eq!(stub_band(10.0), StubBand::Normal);
        assert_eq!(stub_band(10.01), StubBand::Warning);
        assert_eq!(stub_band(20.0), StubBand::Warning);
        assert_eq!(stub_band(20.5), StubBand::Critical);
        assert_eq!(stub_band(25.0).tone(), Tone::Danger);
    }

    #[test]
    fn test_critical_stub_tone() {
        assert_eq!(critical_stub_tone(0), Tone::Accent);
        assert_eq!(critical_stub_tone(3), Tone::Danger);
    }

    #[test]
    fn test_stub_percentage_rounds_and_handles_zero() {
        assert_eq!(stub_percentage(0, 0), 0.0);
        assert_eq!(stub_percentage(5, 0), 0.0);
        assert_eq!(stub_percentage(1, 3), 33.33);
        assert_eq!(stub_percentage(50, 200), 25.0);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(40.0, 100.0), 40.0);
        assert_eq!(progress_percent(3.0, 0.0), 0.0);
        assert_eq!(progress_percent(3.0, -1.0), 0.0);
        assert_eq!(progress_percent(150.0, 100.0), 150.0);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(40.0), "40%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(100.0 / 3.0), "33.33%");
        assert_eq!(format_percent(12.5), "12.5%");
        assert_eq!(format_percent(f64::NAN), "0%");
    }

    #[test]
    fn test_top_n_preserves_order() {
        let items = [5, 1, 4, 2, 3, 9, 8];
        assert_eq!(top_n(&items, 5), &[5, 1, 4, 2, 3]);
        assert_eq!(top_n(&items, 50), &items);
        assert!(top_n(&items, 0).is_empty());
        let empty: [u8; 0] = [];
        assert!(top_n(&empty, 3).is_empty());
    }

    #[test]
    fn test_priority_tags() {
        assert_eq!(priority_tag_color("P0"), Some(Tone::Danger));
        assert_eq!(priority_tag_color(" p1 "), Some(Tone::Warning));
        assert_eq!(priority_tag_color("P3"), Some(Tone::Muted));
        assert_eq!(priority_tag_color("urgent"), None);
        assert_eq!(priority_tag_color(""), None);
    }

    #[test]
    fn test_severity_tags() {
        assert_eq!(severity_tag_color("critical"), Some(Tone::Danger));
        assert_eq!(severity_tag_color("High"), Some(Tone::Warning));
        assert_eq!(severity_tag_color(" medium "), Some(Tone::Accent));
        assert_eq!(severity_tag_color("low"), Some(Tone::Muted));
        assert_eq!(severity_tag_color("P0"), None);
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(status_tag_color("in_progress"), Some(Tone::Warning));
        assert_eq!(status_tag_color("DONE"), Some(Tone::Accent));
        assert_eq!(status_tag_color("blocked"), Some(Tone::Danger));
        assert_eq!(status_tag_color("someday"), None);
    }

    #[test]
    fn test_status_class_replaces_first_underscore_only() {
        assert_eq!(status_class("in_progress"), "in-progress");
        assert_eq!(status_class("not_started_yet"), "not-started_yet");
        assert_eq!(status_class("done"), "done");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_entity_label_fallback() {
        let named = Activity {
            entity_name: Some("EPT".to_string()),
            entity_id: Some(4),
            ..Activity::default()
        };
        assert_eq!(entity_label(&named), "EPT");
        let unnamed = Activity {
            entity_id: Some(4),
            ..Activity::default()
        };
        assert_eq!(entity_label(&unnamed), "#4");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(Some("2024-03-05 14:22:10")), "2024-03-05 14:22");
        assert_eq!(format_timestamp(Some("2024-03-05T14:22:10.5")), "2024-03-05 14:22");
        assert_eq!(
            format_timestamp(Some("2024-03-05T14:22:10+00:00")),
            "2024-03-05 14:22"
        );
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_timestamp(None), "-");
    }
}
