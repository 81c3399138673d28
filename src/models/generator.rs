use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

const RESEARCH_VOCABULARY: &[&str] = &[
    "machine", "learning", "neural", "networks", "deep", "database", "systems",
    "distributed", "computing", "security", "cryptography", "compilers",
    "programming", "languages", "robotics", "vision", "image", "processing",
    "natural", "language", "software", "engineering", "cloud", "networking",
    "embedded", "signal", "data", "mining", "blockchain", "optimization",
    "graphics", "human", "interaction", "bioinformatics", "quantum",
];

pub fn random_capacity() -> u32 {
    rand::rng().random_range(1..=8)
}

pub fn random_current_load(max_students: u32) -> u32 {
    rand::rng().random_range(0..=max_students)
}

/// A short space-separated interest string, or `None` for the few users
/// who never filled it in.
pub fn random_research_area() -> Option<String> {
    let mut rng = rand::rng();
    if rng.random_bool(0.05) {
        return None;
    }
    let num_words = rng.random_range(2..=5);
    let words: Vec<&str> = RESEARCH_VOCABULARY
        .choose_multiple(&mut rng, num_words)
        .copied()
        .collect();
    Some(words.join(" "))
}

pub fn random_registration() -> DateTime<Utc> {
    Utc::now() - Duration::minutes(rand::rng().random_range(0..60 * 24 * 90))
}
