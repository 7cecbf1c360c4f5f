//! Hospital directory client — read-only listing from the backend,
//! filtered client-side.  Nothing here is persisted locally.

use serde::{Deserialize, Serialize};

use crate::GatewayError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

/// Directory envelope: `{ "hospitals": [...] }`.  A missing array decodes
/// as an empty directory rather than an error.
#[derive(Debug, Deserialize)]
struct DirectoryEnvelope {
    #[serde(default)]
    hospitals: Vec<Hospital>,
}

#[derive(Debug, Clone)]
pub struct HospitalDirectory {
    client: reqwest::Client,
    backend_url: String,
}

impl HospitalDirectory {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            backend_url: backend_url.into(),
        }
    }

    /// Fetch the full hospital listing from `{backend_url}/hospitals`.
    pub async fn list(&self) -> Result<Vec<Hospital>, GatewayError> {
        let url = format!("{}/hospitals", self.backend_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "hospital directory request failed");
            return Err(GatewayError::Status(status));
        }

        let envelope: DirectoryEnvelope = response
            .json()
            .await
            .map_err(|_| GatewayError::MalformedResponse)?;
        Ok(envelope.hospitals)
    }
}

/// Case-insensitive substring filter over name, address, and specialties —
/// the same projection the directory page applies to its search box.
pub fn search(hospitals: &[Hospital], term: &str) -> Vec<Hospital> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return hospitals.to_vec();
    }
    hospitals
        .iter()
        .filter(|hospital| {
            hospital.name.to_lowercase().contains(&term)
                || hospital.address.to_lowercase().contains(&term)
                || hospital
                    .specialties
                    .iter()
                    .any(|specialty| specialty.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Hospital> {
        vec![
            Hospital {
                name: "City General".to_string(),
                address: "12 MG Road".to_string(),
                contact: "011-1234".to_string(),
                specialties: vec!["Cardiology".to_string(), "Neurology".to_string()],
            },
            Hospital {
                name: "Lakeside Clinic".to_string(),
                address: "7 Lake View".to_string(),
                contact: "011-5678".to_string(),
                specialties: vec!["Pediatrics".to_string()],
            },
        ]
    }

    #[test]
    fn envelope_with_missing_array_decodes_empty() {
        let envelope: DirectoryEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.hospitals.is_empty());
    }

    #[test]
    fn hospital_tolerates_missing_optional_fields() {
        let hospital: Hospital =
            serde_json::from_str(r#"{ "name": "City General" }"#).unwrap();
        assert_eq!(hospital.name, "City General");
        assert!(hospital.address.is_empty());
        assert!(hospital.specialties.is_empty());
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let hits = search(&sample(), "city");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "City General");
    }

    #[test]
    fn search_matches_address_and_specialty() {
        assert_eq!(search(&sample(), "lake view").len(), 1);
        assert_eq!(search(&sample(), "cardio").len(), 1);
    }

    #[test]
    fn blank_search_returns_everything() {
        assert_eq!(search(&sample(), "  ").len(), 2);
    }

    #[test]
    fn unmatched_search_returns_nothing() {
        assert!(search(&sample(), "oncology ward").is_empty());
    }
}
