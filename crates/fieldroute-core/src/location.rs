use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_WINDOW_START: &str = "09:00";
pub const DEFAULT_TIME_WINDOW_END: &str = "18:00";

/// A retail point of sale a field rep can be routed to.
///
/// Instances are only produced from data that passed validation, so
/// `latitude`/`longitude` are always within geographic bounds and `name` is
/// never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Server-assigned, or generated client-side during ingestion.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// `HH:MM`.
    #[serde(default = "default_window_start")]
    pub time_window_start: String,
    /// `HH:MM`.
    #[serde(default = "default_window_end")]
    pub time_window_end: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Location {
    /// Single-line address, e.g. `"Moscow, Tverskaya 15"`, or `None` when no
    /// address part is known.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        let street = match (self.street.as_deref(), self.house_number.as_deref()) {
            (Some(street), Some(number)) => Some(format!("{street} {number}")),
            (Some(street), None) => Some(street.to_string()),
            (None, Some(number)) => Some(number.to_string()),
            (None, None) => None,
        };
        match (self.city.as_deref(), street) {
            (Some(city), Some(street)) => Some(format!("{city}, {street}")),
            (Some(city), None) => Some(city.to_string()),
            (None, street) => street,
        }
    }
}

fn default_window_start() -> String {
    DEFAULT_TIME_WINDOW_START.to_string()
}

fn default_window_end() -> String {
    DEFAULT_TIME_WINDOW_END.to_string()
}

/// Named priority used by the optimisation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
}

/// Visit priority. Depending on the data source it is either a label or a
/// numeric rank in `1..=4`; both spellings survive a serde round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Priority {
    Label(PriorityLabel),
    Rank(u8),
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Label(PriorityLabel::Medium)
    }
}

impl Priority {
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 4;

    /// Parses `low`/`medium`/`high` (case-insensitive) or a rank `1..=4`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "low" => Some(Priority::Label(PriorityLabel::Low)),
            "medium" => Some(Priority::Label(PriorityLabel::Medium)),
            "high" => Some(Priority::Label(PriorityLabel::High)),
            _ => trimmed.parse::<u8>().ok().and_then(Self::from_rank),
        }
    }

    /// Accepts integral numbers in `1..=4`.
    #[must_use]
    pub fn from_number(value: f64) -> Option<Self> {
        if value.fract() != 0.0
            || value < f64::from(Self::MIN_RANK)
            || value > f64::from(Self::MAX_RANK)
        {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rank = value as u8;
        Self::from_rank(rank)
    }

    fn from_rank(rank: u8) -> Option<Self> {
        (Self::MIN_RANK..=Self::MAX_RANK)
            .contains(&rank)
            .then_some(Priority::Rank(rank))
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Label(PriorityLabel::Low) => write!(f, "low"),
            Priority::Label(PriorityLabel::Medium) => write!(f, "medium"),
            Priority::Label(PriorityLabel::High) => write!(f, "high"),
            Priority::Rank(rank) => write!(f, "{rank}"),
        }
    }
}

/// Finite and within `[-90, 90]`.
#[must_use]
pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

/// Finite and within `[-180, 180]`.
#[must_use]
pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Location {
        Location {
            id: "loc-1".to_string(),
            name: "Store 1".to_string(),
            city: Some("Moscow".to_string()),
            street: Some("Tverskaya".to_string()),
            house_number: Some("15".to_string()),
            latitude: 55.7558,
            longitude: 37.6173,
            time_window_start: DEFAULT_TIME_WINDOW_START.to_string(),
            time_window_end: DEFAULT_TIME_WINDOW_END.to_string(),
            priority: Priority::default(),
        }
    }

    #[test]
    fn latitude_bounds_are_inclusive() {
        assert!(is_valid_latitude(90.0));
        assert!(is_valid_latitude(-90.0));
        assert!(!is_valid_latitude(90.0001));
        assert!(!is_valid_latitude(f64::NAN));
    }

    #[test]
    fn longitude_bounds_are_inclusive() {
        assert!(is_valid_longitude(180.0));
        assert!(is_valid_longitude(-180.0));
        assert!(!is_valid_longitude(-180.5));
        assert!(!is_valid_longitude(f64::INFINITY));
    }

    #[test]
    fn priority_parses_labels_case_insensitively() {
        assert_eq!(
            Priority::parse(" High "),
            Some(Priority::Label(PriorityLabel::High))
        );
        assert_eq!(
            Priority::parse("low"),
            Some(Priority::Label(PriorityLabel::Low))
        );
    }

    #[test]
    fn priority_parses_ranks_in_range_only() {
        assert_eq!(Priority::parse("1"), Some(Priority::Rank(1)));
        assert_eq!(Priority::parse("4"), Some(Priority::Rank(4)));
        assert_eq!(Priority::parse("0"), None);
        assert_eq!(Priority::parse("5"), None);
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn priority_from_number_rejects_fractions() {
        assert_eq!(Priority::from_number(2.0), Some(Priority::Rank(2)));
        assert_eq!(Priority::from_number(2.5), None);
        assert_eq!(Priority::from_number(-1.0), None);
    }

    #[test]
    fn priority_serializes_in_original_spelling() {
        let label = serde_json::to_value(Priority::Label(PriorityLabel::Medium)).unwrap();
        assert_eq!(label, serde_json::json!("medium"));
        let rank = serde_json::to_value(Priority::Rank(3)).unwrap();
        assert_eq!(rank, serde_json::json!(3));
    }

    #[test]
    fn location_deserializes_backend_short_coordinate_names() {
        let json = serde_json::json!({
            "id": "abc",
            "name": "Warehouse A",
            "lat": 54.18,
            "lon": 45.17,
            "time_window_start": "08:00",
            "time_window_end": "17:00"
        });
        let location: Location = serde_json::from_value(json).unwrap();
        assert!((location.latitude - 54.18).abs() < f64::EPSILON);
        assert!((location.longitude - 45.17).abs() < f64::EPSILON);
        assert_eq!(location.priority, Priority::default());
        assert!(location.city.is_none());
    }

    #[test]
    fn address_joins_known_parts() {
        assert_eq!(store().address().as_deref(), Some("Moscow, Tverskaya 15"));

        let mut no_street = store();
        no_street.street = None;
        no_street.house_number = None;
        assert_eq!(no_street.address().as_deref(), Some("Moscow"));

        let mut nothing = no_street;
        nothing.city = None;
        assert!(nothing.address().is_none());
    }
}
