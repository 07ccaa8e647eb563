//! Postal address entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A postal address as entered by the driver or stored for a student
///
/// Field aliases accept the camel-case/Portuguese keys used by earlier
/// stored data (`address` for the street, `cep` for the postal code).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street name (logradouro)
    #[serde(alias = "address")]
    pub street: String,
    /// House number, kept as text ("120", "s/n", "45B")
    pub number: String,
    /// Neighborhood (bairro)
    #[serde(default)]
    pub neighborhood: Option<String>,
    /// City (localidade)
    pub city: String,
    /// State abbreviation (UF)
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code as entered
    #[serde(default, alias = "cep")]
    pub postal_code: Option<String>,
}

impl Address {
    /// Create an address from the three fields required for geocoding
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            city: city.into(),
            ..Self::default()
        }
    }

    /// Set the neighborhood
    #[must_use]
    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    /// Set the state abbreviation
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the postal code
    #[must_use]
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Whether street, number and city are all non-blank
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check that the address may be sent to a geocoder
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("street", &self.street),
            ("number", &self.number),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::IncompleteAddress(format!(
                    "{field} is required"
                )));
            }
        }
        Ok(())
    }

    /// Single-line search string: `street, number[, neighborhood], city[ - state]`
    pub fn search_query(&self) -> String {
        let mut query = format!("{}, {}", self.street.trim(), self.number.trim());
        if let Some(neighborhood) = non_blank(self.neighborhood.as_deref()) {
            query.push_str(", ");
            query.push_str(neighborhood);
        }
        query.push_str(", ");
        query.push_str(self.city.trim());
        if let Some(state) = non_blank(self.state.as_deref()) {
            query.push_str(" - ");
            query.push_str(state);
        }
        query
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.search_query())
    }
}
