//! Postal code lookup models

use domain::PostalCode;
use serde::{Deserialize, Serialize};

/// Address data returned for a postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalRecord {
    /// The code that was looked up
    pub postal_code: PostalCode,
    /// Street (logradouro); empty for city-wide codes
    pub street: String,
    /// Complement (building, range of numbers)
    pub complement: Option<String>,
    /// Neighborhood (bairro)
    pub neighborhood: Option<String>,
    /// City (localidade)
    pub city: String,
    /// State abbreviation (UF)
    pub state: String,
    /// IBGE municipality code
    pub ibge: Option<String>,
    /// Telephone area code
    pub ddd: Option<String>,
}

/// Raw ViaCEP response
#[derive(Debug, Deserialize)]
pub(crate) struct RawViaCepResponse {
    #[serde(default)]
    pub erro: Option<ErrorFlag>,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub ddd: String,
}

/// ViaCEP has sent the not-found flag both as a boolean and as a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorFlag {
    Bool(bool),
    Text(String),
}

impl ErrorFlag {
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

impl RawViaCepResponse {
    pub fn is_not_found(&self) -> bool {
        self.erro.as_ref().is_some_and(ErrorFlag::is_set)
    }

    pub fn into_record(self, postal_code: PostalCode) -> PostalRecord {
        PostalRecord {
            postal_code,
            street: self.logradouro,
            complement: non_empty(self.complemento),
            neighborhood: non_empty(self.bairro),
            city: self.localidade,
            state: self.uf,
            ibge: non_empty(self.ibge),
            ddd: non_empty(self.ddd),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
