//! Registration, login and logout

use sistema911_model::wire;
use sistema911_model::{EmailAvailability, EmailVerification, LoginCredentials, RegistrationForm};
use tracing::{error, info, instrument, warn};

use super::{check, ApiClient};
use crate::endpoints;
use crate::error::ApiError;
use crate::fetch::RequestOptions;
use crate::session::SessionUser;

impl ApiClient {
    /// Create the identity account, then the backend profile.
    ///
    /// When the backend refuses the profile the identity account is deleted
    /// again so the two never disagree.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: RegistrationForm) -> Result<SessionUser, ApiError> {
        check(form.validate())?;

        let user = self
            .identity
            .create_user(form.email.trim(), &form.password, &form.display_name())
            .await?;

        let profile = form.into_profile(&user.uid);
        let body = wire::encode(&profile, self.schema)?;

        match self.fetch.request(endpoints::AUTH_REGISTER, RequestOptions::post(body)).await {
            Ok(_) => {
                info!(uid = %user.uid, "user registered");
                Ok(user)
            }
            Err(err) => {
                warn!(uid = %user.uid, error = %err, "backend rejected profile, removing identity account");
                if let Err(cleanup) = self.identity.delete_current_user().await {
                    error!(uid = %user.uid, error = %cleanup, "could not remove identity account");
                }
                Err(err)
            }
        }
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionUser, ApiError> {
        check(credentials.validate())?;
        let user = self
            .identity
            .sign_in(credentials.email.trim(), &credentials.password)
            .await?;
        info!(uid = %user.uid, "signed in");
        Ok(user)
    }

    /// Tell the backend, then sign out of the identity provider whatever the
    /// backend answered.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let backend = self
            .fetch
            .request(endpoints::AUTH_LOGOUT, RequestOptions::post(serde_json::json!({})))
            .await;
        if let Err(err) = &backend {
            warn!(error = %err, "backend logout failed");
        }
        self.identity.sign_out().await?;
        backend.map(|_| ())
    }

    /// Whether `email` is still free; callable before sign-in
    pub async fn check_email(&self, email: &str) -> Result<EmailAvailability, ApiError> {
        check(sistema911_model::validation::validate_email("email", email))?;
        let body = self
            .fetch
            .request(&endpoints::check_email(email.trim()), RequestOptions::get().anonymous())
            .await?;
        Ok(wire::decode(body, self.schema)?)
    }

    pub async fn verify_email(&self) -> Result<EmailVerification, ApiError> {
        let body = self
            .fetch
            .request(endpoints::AUTH_VERIFY_EMAIL, RequestOptions::post(serde_json::json!({})))
            .await?;
        Ok(wire::decode(body, self.schema)?)
    }
}
