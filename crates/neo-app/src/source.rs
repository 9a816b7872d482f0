//! Where approach records come from.
//!
//! A source is pulled once at startup and again on every refresh tick. A
//! failed pull leaves the view on its previous record set.

use std::path::{Path, PathBuf};

use neo_orbit::{ApproachRecord, RawApproachRecord, SortOrder, sample_catalog, validate_all};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Order and cap applied to every pulled record set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub max_records: usize,
    pub sort: Option<SortOrder>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            max_records: 10,
            sort: None,
        }
    }
}

impl Selection {
    /// Sort (when configured), then keep the first `max_records`.
    pub fn apply(&self, mut records: Vec<ApproachRecord>) -> Vec<ApproachRecord> {
        if let Some(order) = self.sort {
            order.sort(&mut records);
        }
        records.truncate(self.max_records);
        records
    }
}

pub trait RecordSource {
    /// Fetch a complete, validated record set.
    fn pull(&mut self) -> Result<Vec<ApproachRecord>, SourceError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// The bundled catalog of well-known objects.
#[derive(Debug, Default)]
pub struct SampleSource {
    selection: Selection,
}

impl SampleSource {
    pub fn new(selection: Selection) -> Self {
        Self { selection }
    }
}

impl RecordSource for SampleSource {
    fn pull(&mut self) -> Result<Vec<ApproachRecord>, SourceError> {
        Ok(self.selection.apply(sample_catalog()))
    }

    fn describe(&self) -> String {
        "bundled sample catalog".to_string()
    }
}

/// A JSON array of loose records on disk, re-read on every pull.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    selection: Selection,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>, selection: Selection) -> Self {
        Self {
            path: path.into(),
            selection,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn pull(&mut self) -> Result<Vec<ApproachRecord>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let raw: Vec<RawApproachRecord> =
            serde_json::from_str(&contents).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let total = raw.len();
        let records = self.selection.apply(validate_all(raw, usize::MAX));
        info!(path = %self.path.display(), total, kept = records.len(), "records loaded");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }
}

/// Build the source named by the config: a file when one is set, otherwise
/// the sample catalog.
pub fn source_for(path: Option<&Path>, selection: Selection) -> Box<dyn RecordSource> {
    match path {
        Some(path) => Box::new(JsonFileSource::new(path, selection)),
        None => Box::new(SampleSource::new(selection)),
    }
}

/// Pull from `source`, logging and swallowing failures.
pub fn pull_soft(source: &mut dyn RecordSource) -> Option<Vec<ApproachRecord>> {
    match source.pull() {
        Ok(records) => Some(records),
        Err(e) => {
            warn!(
                source = %source.describe(),
                error = %e,
                "record pull failed, keeping previous set"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sample_source_respects_cap() {
        let mut source = SampleSource::new(Selection {
            max_records: 3,
            sort: None,
        });
        assert_eq!(source.pull().unwrap().len(), 3);
    }

    #[test]
    fn test_sample_source_sorted_closest_first() {
        let mut source = SampleSource::new(Selection {
            max_records: 10,
            sort: Some(SortOrder::ClosestFirst),
        });
        let records = source.pull().unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].miss_distance_km <= pair[1].miss_distance_km);
        }
    }

    #[test]
    fn test_json_source_fills_defaults() {
        let file = write_json(
            r#"[
                {"id": "99942", "name": "Apophis", "diameter": 0.37, "velocity": 7.42,
                 "missDistance": 31000, "hazardous": true, "type": "asteroid"},
                {"name": "Mystery", "velocity": -3.0},
                {}
            ]"#,
        );
        let mut source = JsonFileSource::new(file.path(), Selection::default());
        let records = source.pull().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Apophis");
        assert!(records[0].hazardous);
        for r in &records {
            assert!(r.diameter_km.is_finite() && r.diameter_km > 0.0);
            assert!(r.velocity_km_s.is_finite() && r.velocity_km_s >= 0.0);
            assert!(r.miss_distance_km.is_finite() && r.miss_distance_km >= 0.0);
        }
    }

    #[test]
    fn test_json_source_sort_before_cap() {
        let file = write_json(
            r#"[
                {"id": "a", "diameter": 0.1},
                {"id": "b", "diameter": 5.0},
                {"id": "c", "diameter": 1.0}
            ]"#,
        );
        let mut source = JsonFileSource::new(
            file.path(),
            Selection {
                max_records: 2,
                sort: Some(SortOrder::LargestFirst),
            },
        );
        let ids: Vec<_> = source.pull().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn test_json_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = JsonFileSource::new(dir.path().join("nope.json"), Selection::default());
        assert!(matches!(source.pull(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn test_json_source_malformed() {
        let file = write_json("{ not json");
        let mut source = JsonFileSource::new(file.path(), Selection::default());
        assert!(matches!(source.pull(), Err(SourceError::Parse { .. })));
    }

    #[test]
    fn test_pull_soft_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = JsonFileSource::new(dir.path().join("nope.json"), Selection::default());
        assert!(pull_soft(&mut source).is_none());
        let mut sample = SampleSource::default();
        assert_eq!(pull_soft(&mut sample).map(|r| r.len()), Some(10));
    }

    #[test]
    fn test_source_for() {
        assert_eq!(
            source_for(None, Selection::default()).describe(),
            "bundled sample catalog"
        );
        assert!(
            source_for(Some(Path::new("neo.json")), Selection::default())
                .describe()
                .contains("neo.json")
        );
    }
}
