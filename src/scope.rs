use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use crate::error::{AllocError, Result};

/// The (department, session) pair that allocation candidates are drawn from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub department: String,
    pub session: String,
}

impl Scope {
    pub fn new(department: impl Into<String>, session: impl Into<String>) -> Scope {
        Scope {
            department: department.into(),
            session: session.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.department, self.session)
    }
}

/// Registry of scopes with a run in flight. At most one run per scope may
/// hold a guard at any time; capacity snapshots are only trustworthy under it.
#[derive(Clone, Default)]
pub struct ScopeLocks {
    active: Arc<Mutex<HashSet<Scope>>>,
}

impl ScopeLocks {
    pub fn new() -> ScopeLocks {
        Self::default()
    }

    pub fn try_lock(&self, scope: &Scope) -> Result<ScopeGuard> {
        let mut active = lock(&self.active);
        if !active.insert(scope.clone()) {
            return Err(AllocError::ScopeBusy(scope.clone()));
        }
        log::debug!("Acquired allocation lock for {}", scope);
        Ok(ScopeGuard {
            active: self.active.clone(),
            scope: scope.clone(),
        })
    }

    pub fn is_locked(&self, scope: &Scope) -> bool {
        lock(&self.active).contains(scope)
    }
}

pub struct ScopeGuard {
    active: Arc<Mutex<HashSet<Scope>>>,
    scope: Scope,
}

impl ScopeGuard {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.scope);
        log::debug!("Released allocation lock for {}", self.scope);
    }
}

// the set stays consistent even if a holder panicked
fn lock(m: &Mutex<HashSet<Scope>>) -> MutexGuard<'_, HashSet<Scope>> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
