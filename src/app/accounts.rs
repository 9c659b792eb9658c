use crate::app::credentials::{hash_password_blocking, verify_password_blocking};
use crate::app::marketplace::Marketplace;
use crate::domain::model::{LinkedAccount, Session, User};
use crate::domain::ports::MarketStore;
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{as_input_error, validate_email, validate_non_empty_string, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<()> {
        validate_email("email", &self.email).map_err(as_input_error)?;
        validate_non_empty_string("name", &self.name).map_err(as_input_error)?;
        validate_non_empty_string("password", &self.password).map_err(as_input_error)?;
        Ok(())
    }
}

/// OAuth provider 回傳的使用者資料
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthProfile {
    pub provider: String,
    pub provider_account_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl<S: MarketStore> Marketplace<S> {
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        request.validate()?;
        if request.password.chars().count() < self.settings.min_password_length {
            return Err(MarketError::validation(format!(
                "password must be at least {} characters",
                self.settings.min_password_length
            )));
        }

        let hashed_password =
            hash_password_blocking(request.password, self.settings.bcrypt_cost).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: Some(request.name.trim().to_string()),
            email: request.email.trim().to_lowercase(),
            image: None,
            hashed_password: Some(hashed_password),
            favorite_ids: Vec::new(),
            accounts: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let user = self.store.insert_user(user).await?;
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Every failure reports the same `InvalidCredentials` error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(MarketError::InvalidCredentials);
        }

        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(MarketError::InvalidCredentials)?;
        let stored = user
            .hashed_password
            .clone()
            .ok_or(MarketError::InvalidCredentials)?;

        if !verify_password_blocking(password.to_string(), stored).await? {
            tracing::warn!("Rejected sign-in for user {}", user.id);
            return Err(MarketError::InvalidCredentials);
        }
        Ok(user)
    }

    /// 先找已連結的帳號，再用 email 找既有使用者，都沒有就建立新使用者
    pub async fn sign_in_oauth(&self, profile: OAuthProfile) -> Result<User> {
        validate_non_empty_string("provider", &profile.provider).map_err(as_input_error)?;
        validate_non_empty_string("providerAccountId", &profile.provider_account_id)
            .map_err(as_input_error)?;
        validate_email("email", &profile.email).map_err(as_input_error)?;
        if !self
            .settings
            .oauth_providers
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&profile.provider))
        {
            return Err(MarketError::forbidden(format!(
                "sign-in with {} is not enabled",
                profile.provider
            )));
        }

        let account = LinkedAccount {
            provider: profile.provider.clone(),
            provider_account_id: profile.provider_account_id.clone(),
        };

        if let Some(user) = self.store.find_user_by_account(&account).await? {
            return Ok(user);
        }

        if let Some(user) = self.store.find_user_by_email(&profile.email).await? {
            tracing::info!("Linking {} account to user {}", account.provider, user.id);
            return self.store.link_account(user.id, account).await;
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: profile.name,
            email: profile.email.trim().to_lowercase(),
            image: profile.image,
            hashed_password: None,
            favorite_ids: Vec::new(),
            accounts: vec![account],
            created_at: now,
            updated_at: now,
        };
        let user = self.store.insert_user(user).await?;
        tracing::info!("Created user {} from {} sign-in", user.id, profile.provider);
        Ok(user)
    }

    pub fn issue_session(&self, user: &User, now: DateTime<Utc>) -> Session {
        Session {
            user_id: user.id,
            email: user.email.clone(),
            expires_at: now + self.settings.session_max_age,
        }
    }

    /// `None` when there is no session, it has expired, or its user is gone.
    pub async fn current_user(
        &self,
        session: Option<&Session>,
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let Some(session) = session else {
            return Ok(None);
        };
        if session.is_expired(now) {
            tracing::debug!("Session for {} expired at {}", session.user_id, session.expires_at);
            return Ok(None);
        }

        let user = self.store.find_user_by_email(&session.email).await?;
        Ok(user.filter(|u| u.id == session.user_id))
    }
}
