//! Approach records: the strictly-typed input of the orbit engine.
//!
//! Sources deliver loose [`RawApproachRecord`]s (every field optional, as the
//! public NEO feeds do). [`ApproachRecord::from_raw`] is the single place
//! where defaults are applied, so nothing past this module ever sees a
//! missing, negative, or non-finite number.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Diameter assumed when a record has none (km).
pub const DEFAULT_DIAMETER_KM: f64 = 0.5;
/// Relative velocity assumed when a record has none (km/s).
pub const DEFAULT_VELOCITY_KM_S: f64 = 20.0;
/// Miss distance assumed when a record has none (km).
pub const DEFAULT_MISS_DISTANCE_KM: f64 = 1_000_000.0;
/// Absolute magnitude assumed when a record has none.
pub const DEFAULT_MAGNITUDE: f64 = 20.0;

/// Kind of tracked object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Asteroid,
    Comet,
}

/// One tracked object's close-approach summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachRecord {
    /// Designation, unique within a record set.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Estimated diameter in km. Always finite and > 0.
    pub diameter_km: f64,
    /// Relative velocity in km/s. Always finite and >= 0.
    pub velocity_km_s: f64,
    /// Miss distance in km. Always finite and >= 0.
    pub miss_distance_km: f64,
    /// Absolute magnitude (H).
    pub magnitude: f64,
    /// Potentially hazardous flag.
    pub hazardous: bool,
    /// Close-approach date as delivered by the source.
    pub close_approach_date: String,
    pub kind: ObjectKind,
}

/// A record as it arrives from an external feed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawApproachRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub diameter: Option<f64>,
    pub velocity: Option<f64>,
    pub miss_distance: Option<f64>,
    pub magnitude: Option<f64>,
    pub hazardous: Option<bool>,
    pub close_approach_date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ObjectKind>,
}

/// Which field of a raw record needed a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    Id,
    Diameter,
    Velocity,
    MissDistance,
    Magnitude,
}

/// Keep `value` when it is finite and accepted by `valid`, otherwise note the
/// field and fall back to `default`.
fn checked(
    value: Option<f64>,
    valid: impl Fn(f64) -> bool,
    default: f64,
    field: RecordField,
    issues: &mut Vec<RecordField>,
) -> f64 {
    match value {
        Some(v) if v.is_finite() && valid(v) => v,
        _ => {
            issues.push(field);
            default
        }
    }
}

impl ApproachRecord {
    /// Validate a raw record, substituting defaults for missing or
    /// out-of-range fields. `index` is only used to invent an id when the
    /// source provides neither id nor name.
    pub fn from_raw(raw: RawApproachRecord, index: usize) -> Self {
        let (record, issues) = Self::from_raw_with_issues(raw, index);
        if !issues.is_empty() {
            warn!(id = %record.id, ?issues, "approach record defaulted");
        }
        record
    }

    /// Like [`from_raw`](Self::from_raw) but also returns the defaulted fields.
    pub fn from_raw_with_issues(
        raw: RawApproachRecord,
        index: usize,
    ) -> (Self, Vec<RecordField>) {
        let mut issues = Vec::new();

        let id = match (raw.id.filter(|s| !s.is_empty()), &raw.name) {
            (Some(id), _) => id,
            (None, Some(name)) if !name.is_empty() => name.clone(),
            _ => {
                issues.push(RecordField::Id);
                format!("unknown-{index}")
            }
        };
        let name = raw.name.filter(|s| !s.is_empty()).unwrap_or_else(|| id.clone());

        let diameter_km = checked(
            raw.diameter,
            |v| v > 0.0,
            DEFAULT_DIAMETER_KM,
            RecordField::Diameter,
            &mut issues,
        );
        let velocity_km_s = checked(
            raw.velocity,
            |v| v >= 0.0,
            DEFAULT_VELOCITY_KM_S,
            RecordField::Velocity,
            &mut issues,
        );
        let miss_distance_km = checked(
            raw.miss_distance,
            |v| v >= 0.0,
            DEFAULT_MISS_DISTANCE_KM,
            RecordField::MissDistance,
            &mut issues,
        );
        let magnitude = checked(
            raw.magnitude,
            |_| true,
            DEFAULT_MAGNITUDE,
            RecordField::Magnitude,
            &mut issues,
        );

        let record = Self {
            id,
            name,
            diameter_km,
            velocity_km_s,
            miss_distance_km,
            magnitude,
            hazardous: raw.hazardous.unwrap_or(false),
            close_approach_date: raw.close_approach_date.unwrap_or_default(),
            kind: raw.kind.unwrap_or_default(),
        };
        (record, issues)
    }
}

/// Validate a whole raw set, keeping at most `limit` records in source order.
pub fn validate_all(raw: Vec<RawApproachRecord>, limit: usize) -> Vec<ApproachRecord> {
    raw.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, r)| ApproachRecord::from_raw(r, i))
        .collect()
}

/// Object-kind filter applied before records reach the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Asteroid,
    Comet,
}

impl KindFilter {
    /// Whether a record of the given kind passes this filter.
    pub fn accepts(self, kind: ObjectKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Asteroid => kind == ObjectKind::Asteroid,
            KindFilter::Comet => kind == ObjectKind::Comet,
        }
    }

    /// Return the records passing this filter, preserving order.
    pub fn apply(self, records: &[ApproachRecord]) -> Vec<ApproachRecord> {
        records
            .iter()
            .filter(|r| self.accepts(r.kind))
            .cloned()
            .collect()
    }
}

impl std::str::FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(KindFilter::All),
            "asteroid" | "asteroids" => Ok(KindFilter::Asteroid),
            "comet" | "comets" => Ok(KindFilter::Comet),
            other => Err(format!("unknown object kind filter: {other}")),
        }
    }
}

/// Ordering applied to a record set before it is displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest miss distance first.
    #[default]
    ClosestFirst,
    /// Largest diameter first.
    LargestFirst,
}

impl SortOrder {
    /// Sort records in place. Stable, so equal keys keep source order.
    pub fn sort(self, records: &mut [ApproachRecord]) {
        match self {
            SortOrder::ClosestFirst => {
                records.sort_by(|a, b| a.miss_distance_km.total_cmp(&b.miss_distance_km));
            }
            SortOrder::LargestFirst => {
                records.sort_by(|a, b| b.diameter_km.total_cmp(&a.diameter_km));
            }
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "closest" | "closest_first" | "dangerous" => Ok(SortOrder::ClosestFirst),
            "largest" | "largest_first" | "large" => Ok(SortOrder::LargestFirst),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Number of records flagged as potentially hazardous.
pub fn hazardous_count(records: &[ApproachRecord]) -> usize {
    records.iter().filter(|r| r.hazardous).count()
}

/// Ten well-known near-Earth asteroids, used when no record source is
/// configured.
pub fn sample_catalog() -> Vec<ApproachRecord> {
    let entry = |id: &str,
                 name: &str,
                 diameter_km: f64,
                 velocity_km_s: f64,
                 miss_distance_km: f64,
                 hazardous: bool,
                 date: &str,
                 magnitude: f64| ApproachRecord {
        id: id.to_string(),
        name: name.to_string(),
        diameter_km,
        velocity_km_s,
        miss_distance_km,
        magnitude,
        hazardous,
        close_approach_date: date.to_string(),
        kind: ObjectKind::Asteroid,
    };

    vec![
        entry("99942", "99942 Apophis", 0.37, 30.73, 31_860_000.0, true, "2029-04-13", 19.7),
        entry("101955", "101955 Bennu", 0.49, 28.0, 480_000.0, true, "2182-09-24", 20.9),
        entry("433", "433 Eros", 16.84, 24.36, 26_758_428.0, true, "2025-01-31", 10.4),
        entry("4179", "4179 Toutatis", 4.6, 31.0, 6_900_000.0, true, "2069-11-05", 15.3),
        entry("1950", "1950 DA", 1.3, 15.1, 7_800_000.0, true, "2880-03-16", 17.4),
        entry("2340", "2340 Hathor", 0.5, 33.2, 1_200_000.0, true, "2086-10-21", 20.1),
        entry("25143", "25143 Itokawa", 0.33, 23.8, 10_500_000.0, false, "2026-07-11", 19.2),
        entry("162173", "162173 Ryugu", 0.9, 31.9, 96_000_000.0, false, "2076-05-10", 18.7),
        entry("1866", "1866 Sisyphus", 8.5, 27.7, 16_000_000.0, false, "2071-11-24", 13.0),
        entry("4660", "4660 Nereus", 0.33, 6.5, 3_900_000.0, false, "2060-02-14", 18.2),
    ]
}
