//! Session types and auth wire formats.
//!
//! Wire types use `camelCase` to match the backend's JSON.

use serde::{Deserialize, Serialize};

/// Access/refresh credential pair.
///
/// Tokens are opaque; nothing here inspects their contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Longer-lived credential used only to mint access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Create a new token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// Whether a refresh is possible at all.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The locally cached authenticated principal.
///
/// Not a security boundary: authorization is enforced by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// Backend user id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Lower-cased role name (e.g. `admin`).
    pub role: String,
}

impl SessionIdentity {
    /// Build an identity, normalizing the role and display name.
    pub fn new(
        id: i64,
        email: impl Into<String>,
        display_name: Option<String>,
        role: impl AsRef<str>,
    ) -> Self {
        let email = email.into();
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.clone());
        Self {
            id,
            email,
            display_name,
            role: role.as_ref().to_lowercase(),
        }
    }

    /// Check the role case-insensitively.
    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create login credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// New access token.
    pub access_token: String,
    /// Refresh token, when the backend issues one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Backend user id.
    pub user_id: i64,
    /// Account email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub nombre: Option<String>,
    /// Role as sent by the backend (any case).
    pub role: String,
}

impl LoginResponse {
    /// Split into the stored token pair and identity.
    pub fn into_session(self) -> (TokenPair, SessionIdentity) {
        let identity = SessionIdentity::new(self.user_id, self.email, self.nombre, &self.role);
        let tokens = TokenPair::new(self.access_token, self.refresh_token);
        (tokens, identity)
    }
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    /// The stored refresh token.
    pub refresh_token: &'a str,
}

/// Response from `POST /auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Freshly minted access token; absent means the response is malformed.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl RefreshResponse {
    /// The new access token, if the response carried a usable one.
    pub fn into_access_token(self) -> Option<String> {
        self.access_token.filter(|t| !t.is_empty())
    }
}

/// Response from the profile endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Backend user id.
    #[serde(alias = "userId")]
    pub id: i64,
    /// Account email.
    pub email: String,
    /// Display name.
    #[serde(default, alias = "displayName", alias = "name")]
    pub nombre: Option<String>,
    /// Role as sent by the backend.
    pub role: String,
}

impl From<ProfileResponse> for SessionIdentity {
    fn from(profile: ProfileResponse) -> Self {
        SessionIdentity::new(profile.id, profile.email, profile.nombre, &profile.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_response_into_session() {
        let json = r#"{
            "accessToken": "T1",
            "refreshToken": "R1",
            "userId": 7,
            "email": "a@b.com",
            "role": "ADMIN"
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        let (tokens, identity) = resp.into_session();

        assert_eq!(tokens, TokenPair::new("T1", Some("R1".to_string())));
        assert_eq!(identity.id, 7);
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.role, "admin");
        assert_eq!(identity.display_name, "a@b.com");
    }

    #[test]
    fn test_login_response_without_refresh_token() {
        let json = r#"{"accessToken":"T1","userId":1,"email":"x@y.z","nombre":"Ana","role":"Docente"}"#;
        let (tokens, identity) = serde_json::from_str::<LoginResponse>(json)
            .unwrap()
            .into_session();

        assert!(!tokens.can_refresh());
        assert_eq!(identity.display_name, "Ana");
        assert!(identity.has_role("DOCENTE"));
    }

    #[test]
    fn test_identity_storage_format() {
        let identity = SessionIdentity::new(3, "c@d.com", Some("Carla".into()), "Admin");
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "email": "c@d.com",
                "displayName": "Carla",
                "role": "admin"
            })
        );
    }

    #[test]
    fn test_refresh_response_missing_token() {
        let resp: RefreshResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.into_access_token(), None);

        let resp: RefreshResponse = serde_json::from_str(r#"{"accessToken":""}"#).unwrap();
        assert_eq!(resp.into_access_token(), None);

        let resp: RefreshResponse = serde_json::from_str(r#"{"accessToken":"T2"}"#).unwrap();
        assert_eq!(resp.into_access_token().as_deref(), Some("T2"));
    }

    #[test]
    fn test_refresh_request_body() {
        let body = serde_json::to_value(RefreshRequest { refresh_token: "R1" }).unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "R1"}));
    }

    #[test]
    fn test_profile_response_aliases() {
        let json = r#"{"userId": 9, "email": "p@q.r", "displayName": "Pablo", "role": "USER"}"#;
        let identity: SessionIdentity = serde_json::from_str::<ProfileResponse>(json)
            .unwrap()
            .into();
        assert_eq!(identity.id, 9);
        assert_eq!(identity.display_name, "Pablo");
        assert_eq!(identity.role, "user");
    }
}
