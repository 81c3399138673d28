mod generator;

use std::sync::atomic::{AtomicU32, Ordering};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static STUDENT_COUNTER: AtomicU32 = AtomicU32::new(0);
static SUPERVISOR_COUNTER: AtomicU32 = AtomicU32::new(0);

pub trait Identified {
    fn id(&self) -> &str;
}

pub trait HasResearchArea {
    /// Interest text, `None` when absent or blank.
    fn research_area(&self) -> Option<&str>;
}

pub trait Registered {
    fn registered_at(&self) -> DateTime<Utc>;
}

pub trait HasCapacity {
    fn max_students(&self) -> u32;
    fn current_students(&self) -> u32;

    /// Negative when a supervisor is already over capacity.
    fn available_slots(&self) -> i64 {
        self.max_students() as i64 - self.current_students() as i64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    #[serde(default)]
    pub area_of_research: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(id: impl Into<String>, area_of_research: Option<&str>, created_at: DateTime<Utc>) -> Student {
        Student {
            id: id.into(),
            area_of_research: area_of_research.map(String::from),
            created_at,
        }
    }

    pub fn sample_student() -> Student {
        let n = STUDENT_COUNTER.fetch_add(1, Ordering::SeqCst);
        Student {
            id: format!("stu-{:05}", n),
            area_of_research: generator::random_research_area(),
            created_at: generator::random_registration(),
        }
    }
}

impl Identified for Student {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasResearchArea for Student {
    fn research_area(&self) -> Option<&str> {
        non_blank(&self.area_of_research)
    }
}

impl Registered for Student {
    fn registered_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: String,
    #[serde(default)]
    pub area_of_research: Option<String>,
    pub max_students: u32,
    #[serde(default)]
    pub current_students: u32,
}

impl Supervisor {
    pub fn new(id: impl Into<String>, area_of_research: Option<&str>, max_students: u32, current_students: u32) -> Supervisor {
        Supervisor {
            id: id.into(),
            area_of_research: area_of_research.map(String::from),
            max_students,
            current_students,
        }
    }

    pub fn sample_supervisor() -> Supervisor {
        let n = SUPERVISOR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let max_students = generator::random_capacity();
        Supervisor {
            id: format!("sup-{:04}", n),
            area_of_research: generator::random_research_area(),
            max_students,
            current_students: generator::random_current_load(max_students),
        }
    }
}

impl Identified for Supervisor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasResearchArea for Supervisor {
    fn research_area(&self) -> Option<&str> {
        non_blank(&self.area_of_research)
    }
}

impl HasCapacity for Supervisor {
    fn max_students(&self) -> u32 {
        self.max_students
    }

    fn current_students(&self) -> u32 {
        self.current_students
    }
}

/// One proposed pairing. The score is kept so coordinators can see why.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub student_id: String,
    pub supervisor_id: String,
    pub similarity_score: f64,
}

fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_research_area_counts_as_absent() {
        let now = Utc::now();
        assert_eq!(Student::new("a", None, now).research_area(), None);
        assert_eq!(Student::new("b", Some(""), now).research_area(), None);
        assert_eq!(Student::new("c", Some("   \t"), now).research_area(), None);
        assert_eq!(Student::new("d", Some("ml"), now).research_area(), Some("ml"));
    }

    #[test]
    fn available_slots_can_go_negative() {
        assert_eq!(Supervisor::new("s", None, 5, 2).available_slots(), 3);
        assert_eq!(Supervisor::new("s", None, 2, 2).available_slots(), 0);
        assert_eq!(Supervisor::new("s", None, 2, 4).available_slots(), -2);
    }

    #[test]
    fn sample_supervisor_never_starts_over_capacity() {
        for _ in 0..100 {
            let s = Supervisor::sample_supervisor();
            assert!(s.max_students >= 1);
            assert!(s.available_slots() >= 0);
        }
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let s: Supervisor = serde_json::from_str(r#"{"id":"x","max_students":3}"#).unwrap();
        assert_eq!(s.area_of_research, None);
        assert_eq!(s.current_students, 0);
    }
}
