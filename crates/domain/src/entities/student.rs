//! Student entity - A rider enrolled on the route

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Address;
use crate::errors::DomainError;

/// Minimum length of a student's name
pub const NAME_MIN_LENGTH: usize = 2;

/// Minimum number of digits in a contact phone
pub const PHONE_MIN_DIGITS: usize = 10;

/// Student identifier
pub type StudentId = u64;

/// An enrolled student and the address they are picked up at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: StudentId,
    /// Display name
    pub name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Pickup address
    #[serde(flatten)]
    pub address: Address,
    /// Alternative drop-off address for the way back
    #[serde(default, alias = "returnAddress")]
    pub return_address: Option<String>,
    /// Whether the student rides on the current trip
    #[serde(default)]
    pub going: bool,
    /// When the student was enrolled
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Student {
    /// Enroll a new student; new students ride by default
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        phone: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            address,
            return_address: None,
            going: true,
            created_at: Some(Utc::now()),
            updated_at: None,
        }
    }

    /// Mark the student as riding (or not) and stamp the update time
    pub fn set_going(&mut self, going: bool) {
        self.going = going;
        self.updated_at = Some(Utc::now());
    }

    /// Phone to show on a stop, if any was recorded
    pub fn contact_phone(&self) -> Option<&str> {
        let phone = self.phone.trim();
        (!phone.is_empty()).then_some(phone)
    }

    /// Validate the enrollment form fields
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().chars().count() < NAME_MIN_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "name must have at least {NAME_MIN_LENGTH} characters"
            )));
        }

        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if digits < PHONE_MIN_DIGITS {
            return Err(DomainError::ValidationError(format!(
                "phone must have at least {PHONE_MIN_DIGITS} digits"
            )));
        }

        self.address.validate()
    }
}
