//! Authentication state of the running client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockia_core::{FieldError, FieldErrorKind, FieldId, FieldSpec, FormSchema, FormValues, InputKind, Rule};

pub const EMAIL: FieldId = FieldId::new("email");
pub const PASSWORD: FieldId = FieldId::new("password");

/// Raised when an operation needs a token and the session has none.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("not signed in")]
pub struct Unauthenticated;

/// JWT issued by `POST /api/auth/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens must not end up in logs.
impl core::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Who is signed in, as reported by the login response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub fn login_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::new(EMAIL, "Email", Rule::Email { required: true }, InputKind::Email),
        FieldSpec::new(
            PASSWORD,
            "Password",
            Rule::Text {
                required: true,
                min_len: Some(6),
                max_len: None,
            },
            InputKind::Text,
        ),
    ])
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn from_form(values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let form = login_schema().validate(values)?;
        match (form.text(EMAIL), form.text(PASSWORD)) {
            (Some(email), Some(password)) => Ok(Self::new(email, password)),
            _ => Err(vec![FieldError::new(EMAIL, FieldErrorKind::Required)]),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<BearerToken>,
    user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: BearerToken) -> Self {
        Self {
            token: Some(token),
            user: None,
        }
    }

    pub fn sign_in(&mut self, token: BearerToken, user: Option<SessionUser>) {
        self.token = Some(token);
        self.user = user;
    }

    /// Drop the token and user; returns the token that was held, if any.
    pub fn sign_out(&mut self) -> Option<BearerToken> {
        self.user = None;
        self.token.take()
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn require_token(&self) -> Result<BearerToken, Unauthenticated> {
        self.token.clone().ok_or(Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_has_no_token() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert_eq!(session.require_token(), Err(Unauthenticated));
    }

    #[test]
    fn sign_out_returns_and_clears_the_token() {
        let mut session = Session::anonymous();
        session.sign_in(BearerToken::new("jwt"), Some(SessionUser::default()));
        assert_eq!(session.require_token().unwrap().as_str(), "jwt");

        let old = session.sign_out();
        assert_eq!(old, Some(BearerToken::new("jwt")));
        assert!(session.user().is_none());
        assert!(session.sign_out().is_none());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let token = format!("{:?}", BearerToken::new("secret-jwt"));
        assert!(!token.contains("secret-jwt"));
        let creds = format!("{:?}", Credentials::new("a@b.co", "hunter22"));
        assert!(creds.contains("a@b.co"));
        assert!(!creds.contains("hunter22"));
    }

    #[test]
    fn login_form_requires_email_and_six_char_password() {
        let values = FormValues::new().with(EMAIL, "ana@stockia").with(PASSWORD, "12345");
        let errors = Credentials::from_form(&values).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, FieldErrorKind::InvalidEmail);
        assert_eq!(errors[1].kind, FieldErrorKind::TooShort { min: 6 });

        let values = FormValues::new().with(EMAIL, "ana@stockia.com").with(PASSWORD, "123456");
        let creds = Credentials::from_form(&values).unwrap();
        assert_eq!(creds.email, "ana@stockia.com");
    }
}
