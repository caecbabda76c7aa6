//! Identity session
//!
//! Credentials live with a third-party identity provider. The client only
//! needs a handful of its operations, collected in [`IdentityProvider`]:
//! a fresh id token per request, the current session, change notifications,
//! and the account calls registration and login use.

use async_trait::async_trait;
use tokio::sync::watch;

/// Signed-in identity account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

impl SessionUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            email_verified: false,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn(SessionUser),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::SignedIn(user) => Some(user),
            SessionState::SignedOut => None,
        }
    }
}

/// User-facing message for an identity provider error code
pub fn message_for_code(code: &str) -> &'static str {
    match code {
        "auth/user-not-found" => "Usuario no encontrado",
        "auth/wrong-password" => "Contraseña incorrecta",
        "auth/email-already-in-use" => "Este correo ya está registrado",
        "auth/weak-password" => "La contraseña debe tener al menos 6 caracteres",
        "auth/invalid-email" => "Correo electrónico inválido",
        "auth/too-many-requests" => "Demasiados intentos. Intenta más tarde",
        "auth/network-request-failed" => "Error de conexión. Verifica tu internet",
        _ => "Error de autenticación",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Provider rejected the call; `message` is already user-facing
    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("No hay usuario autenticado")]
    NoSession,

    #[error("operación no disponible: {0}")]
    Unsupported(&'static str),
}

impl IdentityError {
    pub fn from_code(code: &str) -> Self {
        IdentityError::Provider {
            code: code.to_string(),
            message: message_for_code(code).to_string(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            IdentityError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fresh bearer token for the current session, `None` when signed out
    async fn id_token(&self) -> Result<Option<String>, IdentityError>;

    fn session(&self) -> SessionState;

    /// Receiver that observes every session change
    fn subscribe(&self) -> watch::Receiver<SessionState>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, IdentityError>;

    /// Create an account and sign it in
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SessionUser, IdentityError>;

    /// Delete the signed-in account
    async fn delete_current_user(&self) -> Result<(), IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Session backed by a bearer token issued elsewhere (CLI, service
/// accounts). It cannot create accounts or sign in with a password.
#[derive(Debug)]
pub struct TokenSession {
    token: watch::Sender<Option<String>>,
    state: watch::Sender<SessionState>,
}

impl TokenSession {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        let (token, _) = watch::channel(Some(token.into()));
        let (state, _) = watch::channel(SessionState::SignedIn(user));
        Self { token, state }
    }

    pub fn signed_out() -> Self {
        let (token, _) = watch::channel(None);
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self { token, state }
    }

    /// Replace the token, e.g. after an external refresh
    pub fn set_token(&self, token: impl Into<String>, user: SessionUser) {
        self.token.send_replace(Some(token.into()));
        self.state.send_replace(SessionState::SignedIn(user));
    }
}

#[async_trait]
impl IdentityProvider for TokenSession {
    async fn id_token(&self) -> Result<Option<String>, IdentityError> {
        Ok(self.token.borrow().clone())
    }

    fn session(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<SessionUser, IdentityError> {
        Err(IdentityError::Unsupported("inicio de sesión con contraseña"))
    }

    async fn create_user(
        &self,
        _email: &str,
        _password: &str,
        _display_name: &str,
    ) -> Result<SessionUser, IdentityError> {
        Err(IdentityError::Unsupported("creación de cuentas"))
    }

    async fn delete_current_user(&self) -> Result<(), IdentityError> {
        Err(IdentityError::Unsupported("eliminación de cuentas"))
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.token.send_replace(None);
        self.state.send_replace(SessionState::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(message_for_code("auth/user-not-found"), "Usuario no encontrado");
        assert_eq!(message_for_code("auth/wrong-password"), "Contraseña incorrecta");
        assert_eq!(message_for_code("auth/something-new"), "Error de autenticación");

        let err = IdentityError::from_code("auth/email-already-in-use");
        assert_eq!(err.to_string(), "Este correo ya está registrado");
        assert_eq!(err.code(), Some("auth/email-already-in-use"));
    }

    #[tokio::test]
    async fn test_token_session_sign_out() {
        let session = TokenSession::new("tok-1", SessionUser::new("uid-1"));
        let mut rx = session.subscribe();
        assert!(session.session().is_authenticated());
        assert_eq!(session.id_token().await.unwrap().as_deref(), Some("tok-1"));

        session.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SessionState::SignedOut);
        assert!(session.id_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_session_cannot_create_accounts() {
        let session = TokenSession::signed_out();
        let err = session.create_user("a@b.cl", "Segura123", "A B").await.unwrap_err();
        assert!(matches!(err, IdentityError::Unsupported(_)));
    }
}
