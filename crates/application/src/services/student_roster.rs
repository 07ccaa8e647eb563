//! Student roster
//!
//! The list of enrolled students, persisted as one JSON array. The itinerary
//! builder only reads the `going` flag and the pickup address.

use std::sync::Arc;

use chrono::Utc;
use domain::{Address, Student, StudentId};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{KeyValueStoreExt, KeyValueStorePort},
};

/// Persisted list of students
#[derive(Debug, Clone)]
pub struct StudentRoster {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
}

impl StudentRoster {
    /// Create a roster stored under `key`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// All students in enrollment order
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the store fails.
    pub async fn list(&self) -> Result<Vec<Student>, ApplicationError> {
        Ok(self.store.load(&self.key).await?.unwrap_or_default())
    }

    /// Students marked as going, in roster order
    ///
    /// # Errors
    ///
    /// Returns `Storage` when the store fails.
    pub async fn going(&self) -> Result<Vec<Student>, ApplicationError> {
        let mut students = self.list().await?;
        students.retain(|s| s.going);
        Ok(students)
    }

    /// Look up one student
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: StudentId) -> Result<Student, ApplicationError> {
        self.list()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ApplicationError::NotFound(format!("student {id}")))
    }

    /// Enroll a student; new students are marked as going
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the name, phone or address is invalid, and
    /// `Internal` when every id is taken.
    #[instrument(skip(self, phone, address))]
    pub async fn add(
        &self,
        name: &str,
        phone: &str,
        address: Address,
    ) -> Result<Student, ApplicationError> {
        let mut students = self.list().await?;

        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let id = match students.iter().map(|s| s.id).max() {
            None => Some(now),
            Some(last) => last.checked_add(1).map(|next| next.max(now)),
        }
        .or_else(|| (0..StudentId::MAX).find(|candidate| students.iter().all(|s| s.id != *candidate)))
        .ok_or_else(|| ApplicationError::Internal("no free student id".to_string()))?;

        let student = Student::new(id, name.trim(), phone.trim(), address);
        student
            .validate()
            .map_err(|e| ApplicationError::Validation(e.to_string()))?;

        students.push(student.clone());
        self.persist(&students).await?;
        info!(id, "Student enrolled");
        Ok(student)
    }

    /// Set the going flag, or toggle it when `going` is `None`
    ///
    /// Returns the new value of the flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn set_going(
        &self,
        id: StudentId,
        going: Option<bool>,
    ) -> Result<bool, ApplicationError> {
        let mut students = self.list().await?;
        let student = students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApplicationError::NotFound(format!("student {id}")))?;

        let value = going.unwrap_or(!student.going);
        student.set_going(value);
        self.persist(&students).await?;
        debug!(id, going = value, "Student going flag updated");
        Ok(value)
    }

    /// Remove a student
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn remove(&self, id: StudentId) -> Result<Student, ApplicationError> {
        let mut students = self.list().await?;
        let position = students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ApplicationError::NotFound(format!("student {id}")))?;

        let removed = students.remove(position);
        self.persist(&students).await?;
        info!(id, "Student removed");
        Ok(removed)
    }

    async fn persist(&self, students: &[Student]) -> Result<(), ApplicationError> {
        self.store.save(&self.key, &students).await
    }
}
