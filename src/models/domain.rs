use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marketplace role an account registers under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            other => Err(format!("Role must be one of: buyer, seller (got '{}')", other)),
        }
    }
}

/// Server-held account record
///
/// `password_hash` never leaves the server; use [`Account::profile`] for
/// anything that is serialized to a client.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Account {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Public account fields returned alongside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Input for creating an account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Trim and lower-case an email so uniqueness is case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// What a swipe candidate represents on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// A buyer profile, shown to sellers
    Buyer,
    /// A business for sale, shown to buyers; tagged `seller` on the wire
    #[serde(rename = "seller", alias = "deal")]
    Deal,
}

/// Errors raised when building a [`SwipeCandidate`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandidateError {
    #[error("Candidate id must not be empty")]
    EmptyId,

    #[error("Candidate name must not be empty")]
    EmptyName,

    #[error("Candidate value must be a finite, non-negative number (got {0})")]
    InvalidValue(f64),
}

/// A buyer or deal profile presented for a swipe decision
///
/// Fields are private so a candidate cannot change after it has been
/// validated; build one through [`SwipeCandidate::builder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandidateRecord", into = "CandidateRecord")]
pub struct SwipeCandidate {
    id: String,
    name: String,
    company: String,
    avatar: String,
    status: String,
    time: String,
    badge: String,
    kind: Option<CandidateKind>,
    description: Option<String>,
    value: Option<f64>,
    location: Option<String>,
    industry: Option<String>,
}

impl SwipeCandidate {
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> SwipeCandidateBuilder {
        SwipeCandidateBuilder {
            raw: CandidateRecord {
                id: id.into(),
                name: name.into(),
                ..CandidateRecord::default()
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn kind(&self) -> Option<CandidateKind> {
        self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }
}

/// Builder for [`SwipeCandidate`]; validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct SwipeCandidateBuilder {
    raw: CandidateRecord,
}

impl SwipeCandidateBuilder {
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.raw.company = company.into();
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.raw.avatar = avatar.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.raw.status = status.into();
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.raw.time = time.into();
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.raw.badge = badge.into();
        self
    }

    pub fn kind(mut self, kind: CandidateKind) -> Self {
        self.raw.kind = Some(kind);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.raw.description = Some(description.into());
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.raw.value = Some(value);
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.raw.location = Some(location.into());
        self
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.raw.industry = Some(industry.into());
        self
    }

    pub fn build(self) -> Result<SwipeCandidate, CandidateError> {
        SwipeCandidate::try_from(self.raw)
    }
}

/// Unvalidated wire shape of a candidate, using the dashboard's JSON field
/// names. Convert with `SwipeCandidate::try_from`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub badge: String,
    #[serde(rename = "userType", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CandidateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl TryFrom<CandidateRecord> for SwipeCandidate {
    type Error = CandidateError;

    fn try_from(raw: CandidateRecord) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(CandidateError::EmptyId);
        }
        if raw.name.trim().is_empty() {
            return Err(CandidateError::EmptyName);
        }
        if let Some(value) = raw.value {
            if !value.is_finite() || value < 0.0 {
                return Err(CandidateError::InvalidValue(value));
            }
        }

        Ok(Self {
            id: raw.id,
            name: raw.name,
            company: raw.company,
            avatar: raw.avatar,
            status: raw.status,
            time: raw.time,
            badge: raw.badge,
            kind: raw.kind,
            description: raw.description,
            value: raw.value,
            location: raw.location,
            industry: raw.industry,
        })
    }
}

impl From<SwipeCandidate> for CandidateRecord {
    fn from(candidate: SwipeCandidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            company: candidate.company,
            avatar: candidate.avatar,
            status: candidate.status,
            time: candidate.time,
            badge: candidate.badge,
            kind: candidate.kind,
            description: candidate.description,
            value: candidate.value,
            location: candidate.location,
            industry: candidate.industry,
        }
    }
}

/// Which swipe collection a candidate id currently sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Accepted,
    Declined,
    Neither,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("buyer".parse::<Role>(), Ok(Role::Buyer));
        assert_eq!(" Seller ".parse::<Role>(), Ok(Role::Seller));
        assert!("broker".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_hides_hash() {
        let account = Account {
            id: "a1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role: Role::Buyer,
            created_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(account.profile()).unwrap();
        assert_eq!(json["role"], "buyer");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn test_candidate_builder_validates() {
        assert_eq!(
            SwipeCandidate::builder("", "Acme").build(),
            Err(CandidateError::EmptyId)
        );
        assert_eq!(
            SwipeCandidate::builder("deal1", "  ").build(),
            Err(CandidateError::EmptyName)
        );
        assert!(matches!(
            SwipeCandidate::builder("deal1", "Acme").value(-5.0).build(),
            Err(CandidateError::InvalidValue(_))
        ));

        let candidate = SwipeCandidate::builder("deal1", "Acme Bakery")
            .company("Acme Holdings")
            .kind(CandidateKind::Deal)
            .value(1_200_000.0)
            .industry("Food")
            .build()
            .unwrap();
        assert_eq!(candidate.id(), "deal1");
        assert_eq!(candidate.value(), Some(1_200_000.0));
        assert_eq!(candidate.location(), None);
    }

    #[test]
    fn test_candidate_deserialize_validates() {
        let ok: SwipeCandidate = serde_json::from_str(
            r#"{"id":"b7","name":"Jordan","company":"Northwind","userType":"buyer"}"#,
        )
        .unwrap();
        assert_eq!(ok.kind(), Some(CandidateKind::Buyer));

        let seller: SwipeCandidate =
            serde_json::from_str(r#"{"id":"d2","name":"Corner Shop","userType":"seller"}"#).unwrap();
        assert_eq!(seller.kind(), Some(CandidateKind::Deal));

        let bad = serde_json::from_str::<SwipeCandidate>(r#"{"id":"","name":"x"}"#);
        assert!(bad.is_err());
    }
}
