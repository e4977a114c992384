use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize};

/// The signed-in user as stored alongside the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// The backend sends ids either as strings or as numbers.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// The caller's credentials, handed explicitly to whoever needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<SessionUser>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// A session with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Parses the stored session document: `{"token": "...", "user": {...}}`.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::InvalidSession(e.to_string()))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// The bearer token, if one is present and non-blank.
    pub fn token(&self) -> Result<&str, CoreError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(CoreError::MissingToken)
    }

    /// The organizer whose analytics this session may read: the signed-in user's id.
    pub fn organizer_id(&self) -> Result<&str, CoreError> {
        let user = self.user.as_ref().ok_or(CoreError::MissingUser)?;
        user.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(CoreError::MissingOrganizerId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Integer(number) => number.to_string(),
        RawId::Unsigned(number) => number.to_string(),
        // `42.0` prints as "42"; a real fraction keeps its digits.
        RawId::Float(number) => number.to_string(),
    }))
}
