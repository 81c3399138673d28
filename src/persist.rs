use std::collections::{BTreeMap, HashMap, HashSet};
use crate::error::StoreError;
use crate::models::{Allocation, Supervisor};
use crate::scope::Scope;

/// Where accepted allocations end up. Each record is written on its own;
/// one failure must not undo the others.
pub trait AllocationStore {
    fn persist(&mut self, scope: &Scope, allocation: &Allocation) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    pub allocation: Allocation,
    pub result: Result<(), StoreError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub scope: Scope,
    pub outcomes: Vec<AllocationOutcome>,
    pub total_students: usize,
}

impl RunReport {
    pub fn new(scope: Scope, outcomes: Vec<AllocationOutcome>, total_students: usize) -> RunReport {
        RunReport { scope, outcomes, total_students }
    }

    pub fn allocated_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AllocationOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn summary(&self) -> String {
        format!("{} of {} students were allocated", self.allocated_count(), self.total_students)
    }
}

impl AllocationOutcome {
    /// An allocation that has not been written yet.
    pub fn pending(allocation: Allocation) -> AllocationOutcome {
        AllocationOutcome { allocation, result: Ok(()) }
    }
}

/// Writes one allocation and records how it went.
pub fn persist_one<St>(store: &mut St, scope: &Scope, outcome: &mut AllocationOutcome)
where St: AllocationStore + ?Sized
{
    outcome.result = store.persist(scope, &outcome.allocation);
    if let Err(ref e) = outcome.result {
        log::warn!("Could not persist allocation {} -> {}: {}",
                   outcome.allocation.student_id, outcome.allocation.supervisor_id, e);
    }
}

/// Writes every allocation, keeping going past failures.
pub fn persist_all<St>(store: &mut St, scope: &Scope, allocations: Vec<Allocation>, total_students: usize) -> RunReport
where St: AllocationStore + ?Sized
{
    let mut outcomes: Vec<AllocationOutcome> = allocations.into_iter()
        .map(AllocationOutcome::pending)
        .collect();
    for outcome in outcomes.iter_mut() {
        persist_one(store, scope, outcome);
    }
    RunReport::new(scope.clone(), outcomes, total_students)
}

/// In-memory store with the same uniqueness rules a database would enforce:
/// one allocation per student per scope, supervisors never past their cap
/// within a scope. Load is counted separately for every scope.
#[derive(Debug, Default)]
pub struct MemoryStore {
    supervisors: BTreeMap<String, Supervisor>,
    loads: HashMap<(Scope, String), u32>,
    allocated: HashSet<(Scope, String)>,
    allocations: Vec<(Scope, Allocation)>,
}

impl MemoryStore {
    /// A store whose supervisors already carry `current_students` in `scope`.
    /// Every other scope starts empty.
    pub fn new(scope: &Scope, supervisors: impl IntoIterator<Item = Supervisor>) -> MemoryStore {
        let mut store = MemoryStore::default();
        store.seed(scope, supervisors);
        store
    }

    /// Registers supervisors and their existing load in `scope`.
    pub fn seed(&mut self, scope: &Scope, supervisors: impl IntoIterator<Item = Supervisor>) {
        for s in supervisors {
            self.loads.insert((scope.clone(), s.id.clone()), s.current_students);
            self.supervisors.insert(s.id.clone(), s);
        }
    }

    fn load(&self, scope: &Scope, supervisor_id: &str) -> u32 {
        self.loads.get(&(scope.clone(), supervisor_id.to_string())).copied().unwrap_or(0)
    }

    /// Supervisors with their load in `scope` as of the last successful
    /// write, ready to feed into the next run for that scope.
    pub fn supervisors(&self, scope: &Scope) -> Vec<Supervisor> {
        self.supervisors.values()
            .map(|s| Supervisor {
                current_students: self.load(scope, &s.id),
                ..s.clone()
            })
            .collect()
    }

    pub fn is_allocated(&self, scope: &Scope, student_id: &str) -> bool {
        self.allocated.contains(&(scope.clone(), student_id.to_string()))
    }

    pub fn allocations(&self, scope: &Scope) -> Vec<&Allocation> {
        self.allocations.iter()
            .filter(|(s, _)| s == scope)
            .map(|(_, a)| a)
            .collect()
    }
}

impl AllocationStore for MemoryStore {
    fn persist(&mut self, scope: &Scope, allocation: &Allocation) -> Result<(), StoreError> {
        let key = (scope.clone(), allocation.student_id.clone());
        if self.allocated.contains(&key) {
            return Err(StoreError::AlreadyAllocated {
                student_id: allocation.student_id.clone(),
                scope: scope.clone(),
            });
        }
        let max_students = self.supervisors.get(&allocation.supervisor_id)
            .map(|s| s.max_students)
            .ok_or_else(|| StoreError::UnknownSupervisor(allocation.supervisor_id.clone()))?;
        let load = self.loads.entry((scope.clone(), allocation.supervisor_id.clone())).or_insert(0);
        if *load >= max_students {
            return Err(StoreError::CapacityExceeded {
                supervisor_id: allocation.supervisor_id.clone(),
                scope: scope.clone(),
            });
        }

        *load += 1;
        self.allocated.insert(key);
        self.allocations.push((scope.clone(), allocation.clone()));
        Ok(())
    }
}
