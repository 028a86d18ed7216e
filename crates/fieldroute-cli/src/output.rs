//! Shared formatting for command output.

use fieldroute_client::ApiError;
use fieldroute_core::Location;

/// The normalized error body as pretty JSON, for stderr.
pub(crate) fn error_json(err: &ApiError) -> String {
    let body = err.normalized();
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| format!("{}: {}", body.error, body.message))
}

/// Truncate to `max` characters, appending `...` when shortened.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Format an optional value for display, with a dash for `None`.
pub(crate) fn or_dash(value: Option<&str>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), str::to_string)
}

pub(crate) fn print_locations(locations: &[Location]) {
    let header = format!(
        "{:<40}{:<28}{:<11}{:<11}{:<13}{:<8}ADDRESS",
        "ID", "NAME", "LAT", "LON", "WINDOW", "PRIO"
    );
    println!("{header}");
    for location in locations {
        println!(
            "{:<40}{:<28}{:<11.5}{:<11.5}{:<13}{:<8}{}",
            location.id,
            truncate(&location.name, 25),
            location.latitude,
            location.longitude,
            format!("{}-{}", location.time_window_start, location.time_window_end),
            location.priority.to_string(),
            or_dash(location.address().as_deref()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Store 1", 10), "Store 1");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("Магазин у дома", 7), "Магазин...");
    }

    #[test]
    fn or_dash_fills_missing_values() {
        assert_eq!(or_dash(None), "\u{2014}");
        assert_eq!(or_dash(Some("Moscow")), "Moscow");
    }

    #[test]
    fn error_json_contains_code() {
        let err = ApiError::Timeout {
            url: "http://localhost:8000/health".to_string(),
        };
        let json = error_json(&err);
        assert!(json.contains("\"code\": \"TIMEOUT_ERROR\""), "got: {json}");
    }
}
