use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{AllocError, Result};
use crate::models::{Student, Supervisor};
use crate::ranker::MatchConfig;
use crate::scope::Scope;

/// A snapshot of everything one allocation run reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchParameters {
    #[serde(default)]
    pub scope: Scope,
    pub students: Vec<Student>,
    pub supervisors: Vec<Supervisor>,
    #[serde(default)]
    pub config: MatchConfig,
}

impl MatchParameters {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        bincode::deserialize_from(reader)
            .map_err(|e| AllocError::DeserializationError(e.to_string()))
    }

    /// Reads a snapshot exported as JSON, e.g. straight from the database.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn snapshot_survives_bincode_file() {
        let params = MatchParameters {
            scope: Scope::new("cs", "2025/2026"),
            students: (0..5).map(|_| Student::sample_student()).collect(),
            supervisors: (0..3).map(|_| Supervisor::sample_supervisor()).collect(),
            config: MatchConfig { tie_threshold: 0.2, require_overlap: false },
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.bin");
        params.save(&path).unwrap();
        assert_eq!(MatchParameters::open(&path).unwrap(), params);
    }

    #[test]
    fn json_snapshot_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{
            "students": [
                {{"id": "s1", "area_of_research": "machine learning", "created_at": "2025-09-01T08:00:00Z"}},
                {{"id": "s2", "created_at": "2025-09-01T09:00:00Z"}}
            ],
            "supervisors": [
                {{"id": "sup1", "area_of_research": "deep learning", "max_students": 5, "current_students": 4}}
            ]
        }}"#).unwrap();

        let params = MatchParameters::from_json_file(file.path()).unwrap();
        assert_eq!(params.students.len(), 2);
        assert_eq!(params.students[1].area_of_research, None);
        assert_eq!(params.supervisors[0].current_students, 4);
        assert_eq!(params.config, MatchConfig::default());
        assert_eq!(params.scope, Scope::default());
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(MatchParameters::from_json_file(file.path()),
                         Err(AllocError::DeserializationError(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(MatchParameters::open(dir.path().join("nope.bin")),
                         Err(AllocError::IoError(_))));
    }

    #[test]
    fn corrupt_snapshot_is_a_deserialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff; 5]).unwrap();
        assert!(matches!(MatchParameters::open(file.path()),
                         Err(AllocError::DeserializationError(_))));
    }

    #[test]
    fn unwritable_snapshot_is_not_a_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let params = MatchParameters {
            scope: Scope::default(),
            students: vec![],
            supervisors: vec![],
            config: MatchConfig::default(),
        };
        assert!(matches!(params.save(dir.path()), Err(AllocError::IoError(_))));
    }
}
