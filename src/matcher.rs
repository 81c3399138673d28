use crate::models::{Allocation, HasCapacity, HasResearchArea, Identified, Registered};
use crate::ranker::{self, Candidate, MatchConfig};

/// A supervisor's entry in the working capacity table of one run.
#[derive(Clone, Debug)]
pub struct Slot<'a, P> {
    pub supervisor: &'a P,
    pub available: u32,
}

/// Greedy first-registered, first-served matcher.
///
/// The capacity table is built fresh from the supervisor snapshot on every
/// `run_match` and only lives inside the matcher; the inputs are never
/// modified.
#[derive(Clone)]
pub struct Matcher<'a, S, P>
where S: Identified + HasResearchArea + Registered,
      P: Identified + HasResearchArea + HasCapacity
{
    pub allocations: Vec<Allocation>,
    pub skipped_no_interest: Vec<&'a S>,
    pub unmatched: Vec<&'a S>,
    pub capacity: Vec<Slot<'a, P>>,
    config: MatchConfig,
}

impl<'a, S, P> Matcher<'a, S, P>
where
    S: Identified + HasResearchArea + Registered,
    P: Identified + HasResearchArea + HasCapacity
{
    pub fn new() -> Matcher<'a, S, P> {
        Self::with_config(MatchConfig::default())
    }

    pub fn with_config(config: MatchConfig) -> Matcher<'a, S, P> {
        Matcher {
            allocations: Vec::new(),
            skipped_no_interest: Vec::new(),
            unmatched: Vec::new(),
            capacity: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn clear(&mut self) {
        self.allocations.clear();
        self.skipped_no_interest.clear();
        self.unmatched.clear();
        self.capacity.clear();
    }

    pub fn run_match(&mut self, students: &'a [S], supervisors: &'a [P]) {
        self.clear();
        self.capacity = supervisors.iter()
            .filter(|p| p.available_slots() > 0)
            .map(|p| Slot { supervisor: p, available: p.available_slots() as u32 })
            .collect();

        log::info!("Allocating {} students across {} supervisors ({} open slots)",
                   students.len(), self.capacity.len(), self.unfilled_slots());

        // stable sort: equal registration times keep snapshot order
        let mut queue: Vec<&'a S> = students.iter().collect();
        queue.sort_by_key(|s| s.registered_at());

        for student in queue {
            self.attempt_match(student);
        }

        log::info!("Allocated {} students, {} unmatched, {} without research area, {} slots left",
                   self.allocations.len(), self.unmatched.len(),
                   self.skipped_no_interest.len(), self.unfilled_slots());
    }

    fn attempt_match(&mut self, student: &'a S) {
        let interest = match student.research_area() {
            Some(text) => text,
            None => {
                log::debug!("Skipping student {}: no research area", student.id());
                self.skipped_no_interest.push(student);
                return;
            }
        };

        let candidates: Vec<Candidate> = self.capacity.iter()
            .enumerate()
            .filter(|(_, slot)| slot.available > 0)
            .map(|(index, slot)| Candidate {
                index,
                score: slot.supervisor.research_area()
                    .map_or(0.0, |area| ranker::similarity(interest, area)),
                free_ratio: slot.available as f64 / slot.supervisor.max_students() as f64,
            })
            .filter(|c| !self.config.require_overlap || c.score > 0.0)
            .collect();

        let chosen = match ranker::select(&candidates, &self.config) {
            Some(c) => c,
            None => {
                log::debug!("No supervisor available for student {}", student.id());
                self.unmatched.push(student);
                return;
            }
        };

        let slot = &mut self.capacity[chosen.index];
        slot.available -= 1;
        log::debug!("Student {} -> supervisor {} (score {:.3}, {} slots left)",
                    student.id(), slot.supervisor.id(), chosen.score, slot.available);
        self.allocations.push(Allocation {
            student_id: student.id().to_string(),
            supervisor_id: slot.supervisor.id().to_string(),
            similarity_score: chosen.score,
        });
    }

    pub fn unfilled_slots(&self) -> u64 {
        self.capacity.iter().map(|s| s.available as u64).sum()
    }

    pub fn into_allocations(self) -> Vec<Allocation> {
        self.allocations
    }
}

/// Runs a match with the default configuration.
pub fn allocate<S, P>(students: &[S], supervisors: &[P]) -> Vec<Allocation>
where S: Identified + HasResearchArea + Registered,
      P: Identified + HasResearchArea + HasCapacity
{
    allocate_with(students, supervisors, &MatchConfig::default())
}

pub fn allocate_with<S, P>(students: &[S], supervisors: &[P], config: &MatchConfig) -> Vec<Allocation>
where S: Identified + HasResearchArea + Registered,
      P: Identified + HasResearchArea + HasCapacity
{
    let mut matcher = Matcher::with_config(config.clone());
    matcher.run_match(students, supervisors);
    matcher.into_allocations()
}
