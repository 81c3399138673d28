pub mod driver;
pub mod error;
pub mod matcher;
pub mod models;
pub mod parameters;
pub mod persist;
pub mod ranker;
pub mod scope;
pub mod setup;

pub use error::{AllocError, Result, StoreError};
pub use matcher::{allocate, allocate_with, Matcher};
pub use models::{Allocation, Student, Supervisor};
pub use ranker::{similarity, MatchConfig};
pub use scope::{Scope, ScopeLocks};
