//! Structured onboarding sources: the role checklist and the employee roster.
//!
//! Both are read fresh from disk on every use so edits to the files are
//! always reflected; nothing here caches.

pub mod checklist;
pub mod roster;

pub use checklist::{ChecklistFile, ChecklistTask, RoleChecklist, task_sentence};
pub use roster::{EmployeeRecord, days_until, find_employee, load_roster, profile_sentence};
