use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::KbError;

/// One row of the employee roster CSV.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department: String,
    pub start_date: NaiveDate,
    pub location: String,
    pub employment_type: String,
    pub manager_email: String,
}

impl EmployeeRecord {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Calendar days from `today` until `start` (negative when the start date
/// has passed).
#[must_use]
pub fn days_until(start: NaiveDate, today: NaiveDate) -> i64 {
    (start - today).num_days()
}

/// Read all rows of the roster.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row fails to parse.
pub fn load_roster(path: &Path) -> Result<Vec<EmployeeRecord>, KbError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Look up one employee by exact `employee_id` string equality, reading the
/// roster fresh from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed; an unknown id is
/// `Ok(None)`, not an error.
pub fn find_employee(path: &Path, employee_id: &str) -> Result<Option<EmployeeRecord>, KbError> {
    Ok(load_roster(path)?
        .into_iter()
        .find(|r| r.employee_id == employee_id))
}

/// Render one roster row as the natural-language profile sentence stored in
/// the knowledge base.
#[must_use]
pub fn profile_sentence(record: &EmployeeRecord) -> String {
    format!(
        "New Employee Record: {name} is joining as a {role} in the {department} department. \
         Start date: {start}. Work location: {location}. Employment type: {emp_type}. \
         Reports to manager: {manager}.",
        name = record.full_name(),
        role = record.role,
        department = record.department,
        start = record.start_date,
        location = record.location,
        emp_type = record.employment_type,
        manager = record.manager_email,
    )
}
