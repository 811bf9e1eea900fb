//! Network table: the static list of known heat network points.
//!
//! Loaded once at startup from `~/.heatnet/networks.csv` (or an explicit
//! path) and read-only afterwards. CSV and JSON are accepted; the format
//! is picked from the file extension.

use crate::proximity::{NetworkPoint, ProximityError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source of network points for the classifier.
pub trait NetworkTable {
    /// All points, in the table's stable order.
    fn points(&self) -> &[NetworkPoint];

    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// Errors raised while loading a network table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Cannot read network table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} (row {row}): {source}", path.display())]
    InvalidPoint {
        path: PathBuf,
        row: usize,
        #[source]
        source: ProximityError,
    },
    #[error("{}: {source}", path.display())]
    Empty {
        path: PathBuf,
        #[source]
        source: ProximityError,
    },
}

/// One CSV row. Header names follow the original data sheet (`Nom`, `Lat`,
/// `Long`); English names are accepted too and extra columns are ignored.
#[derive(Deserialize)]
struct CsvRow {
    #[serde(alias = "Nom", alias = "nom", alias = "Name")]
    name: String,
    #[serde(alias = "Lat", alias = "latitude")]
    lat: f64,
    #[serde(alias = "Long", alias = "lon", alias = "longitude")]
    long: f64,
}

#[derive(Deserialize)]
struct JsonPoint {
    #[serde(alias = "Nom")]
    name: String,
    #[serde(alias = "lat", alias = "Lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "Long")]
    longitude: f64,
}

/// A network with the number of surveyed points along its route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub name: String,
    pub points: usize,
}

/// In-memory network table.
#[derive(Debug, Clone, Default)]
pub struct StaticNetworkTable {
    points: Vec<NetworkPoint>,
}

impl StaticNetworkTable {
    pub fn new(points: Vec<NetworkPoint>) -> Self {
        Self { points }
    }

    /// Default table location: `~/.heatnet/networks.csv`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".heatnet")
            .join("networks.csv")
    }

    /// Load a table from disk. `.json` files are read as a JSON array of
    /// points, anything else as CSV. An empty table is an error.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let table = if is_json {
            Self::from_json_reader(file, path)?
        } else {
            Self::from_csv_reader(file, path)?
        };

        if table.is_empty() {
            return Err(TableError::Empty {
                path: path.to_path_buf(),
                source: ProximityError::EmptyNetworkTable,
            });
        }

        info!(
            "Loaded {} network points ({} networks) from {}",
            table.points.len(),
            table.summaries().len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV with a header row. `origin` is only used in error messages.
    pub fn from_csv_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut points = Vec::new();

        for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = record.map_err(|source| TableError::Csv {
                path: origin.to_path_buf(),
                source,
            })?;
            // Row numbers count the header as row 1.
            let point = NetworkPoint::new(row.name, row.lat, row.long).map_err(|source| TableError::InvalidPoint {
                path: origin.to_path_buf(),
                row: i + 2,
                source,
            })?;
            points.push(point);
        }

        debug!("Parsed {} CSV rows from {}", points.len(), origin.display());
        Ok(Self { points })
    }

    /// Parse a JSON array of `{ name, latitude, longitude }` objects.
    pub fn from_json_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, TableError> {
        let raw: Vec<JsonPoint> = serde_json::from_reader(reader).map_err(|source| TableError::Json {
            path: origin.to_path_buf(),
            source,
        })?;

        let points = raw
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                NetworkPoint::new(p.name, p.latitude, p.longitude).map_err(|source| TableError::InvalidPoint {
                    path: origin.to_path_buf(),
                    row: i + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { points })
    }

    /// Distinct networks in order of first appearance.
    pub fn summaries(&self) -> Vec<NetworkSummary> {
        let mut out: Vec<NetworkSummary> = Vec::new();
        for p in &self.points {
            match out.iter_mut().find(|s| s.name == p.name()) {
                Some(s) => s.points += 1,
                None => out.push(NetworkSummary {
                    name: p.name().to_string(),
                    points: 1,
                }),
            }
        }
        out
    }
}

impl NetworkTable for StaticNetworkTable {
    fn points(&self) -> &[NetworkPoint] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_CSV: &str = "\
Nom,Lat,Long,Rayon
Tour & Taxis,50.8667,4.3497,50
Tour & Taxis,50.8671,4.3502,50
Gare du Midi,50.8354,4.3365,50
";

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_csv_original_headers() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "networks.csv", SAMPLE_CSV);

        let table = StaticNetworkTable::load(&path).unwrap();
        assert_eq!(table.points().len(), 3);
        assert_eq!(table.points()[0].name(), "Tour & Taxis");
        assert!((table.points()[2].latitude() - 50.8354).abs() < 1e-9);
        assert!((table.points()[2].longitude() - 4.3365).abs() < 1e-9);
    }

    #[test]
    fn test_load_csv_english_headers() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "points.csv", "name,latitude,longitude\nKarno Nord, 50.9, 4.4\n");
        let table = StaticNetworkTable::load(&path).unwrap();
        assert_eq!(table.points()[0].name(), "Karno Nord");
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "networks.json",
            r#"[{"name": "Ixelles", "latitude": 50.8333, "longitude": 4.3667},
                {"Nom": "Ixelles", "lat": 50.834, "lon": 4.367}]"#,
        );
        let table = StaticNetworkTable::load(&path).unwrap();
        assert_eq!(table.points().len(), 2);
        assert_eq!(table.summaries(), vec![NetworkSummary { name: "Ixelles".into(), points: 2 }]);
    }

    #[test]
    fn test_summaries_keep_first_appearance_order() {
        let table = StaticNetworkTable::from_csv_reader(SAMPLE_CSV.as_bytes(), Path::new("mem")).unwrap();
        let names: Vec<_> = table.summaries().into_iter().map(|s| (s.name, s.points)).collect();
        assert_eq!(names, vec![("Tour & Taxis".to_string(), 2), ("Gare du Midi".to_string(), 1)]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "networks.csv", "Nom,Lat,Long\n");
        match StaticNetworkTable::load(&path) {
            Err(TableError::Empty { source, .. }) => assert_eq!(source, ProximityError::EmptyNetworkTable),
            other => panic!("expected Empty, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordinate_row() {
        let csv = "Nom,Lat,Long\nOk,50.0,4.0\nBroken,95.0,4.0\n";
        match StaticNetworkTable::from_csv_reader(csv.as_bytes(), Path::new("mem.csv")) {
            Err(TableError::InvalidPoint { row, source, .. }) => {
                assert_eq!(row, 3);
                assert!(matches!(source, ProximityError::InvalidCoordinate { .. }));
            }
            other => panic!("expected InvalidPoint, got {:?}", other),
        }
    }

    #[test]
    fn test_json_out_of_range_point_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "networks.json",
            r#"[{"name": "Ok", "latitude": 50.85, "longitude": 4.35},
                {"name": "Bad", "latitude": 500.0, "longitude": 4.35}]"#,
        );
        match StaticNetworkTable::load(&path) {
            Err(TableError::InvalidPoint { row, source, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(source, ProximityError::InvalidCoordinate { latitude: 500.0, longitude: 4.35 });
            }
            other => panic!("expected InvalidPoint, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_number() {
        let csv = "Nom,Lat,Long\nOops,fifty,4.0\n";
        let err = StaticNetworkTable::from_csv_reader(csv.as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert!(matches!(err, TableError::Csv { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = StaticNetworkTable::load(Path::new("/nonexistent/heatnet/networks.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/heatnet/networks.csv"));
    }

    #[test]
    fn test_default_path() {
        let path = StaticNetworkTable::default_path();
        assert!(path.ends_with(".heatnet/networks.csv"));
    }
}
