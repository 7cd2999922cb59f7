//! User service: broker registration, sign-in and token authentication.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bizlist_common::{AppError, AppResult, IdGenerator};
use bizlist_db::{entities::user, repositories::UserRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Input for registering a broker.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBrokerInput {
    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 200))]
    pub agency_name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Input for updating the signed-in broker's profile.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 200))]
    pub agency_name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// A user together with a freshly issued session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: user::Model,
    pub token: String,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a broker account and sign it in.
    pub async fn register_broker(&self, input: RegisterBrokerInput) -> AppResult<Session> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            password_hash: Set(password_hash),
            token: Set(Some(token.clone())),
            name: Set(input.name.trim().to_string()),
            agency_name: Set(input.agency_name),
            phone: Set(input.phone),
            role: Set(user::UserRole::Broker),
            is_suspended: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, "Registered broker");

        Ok(Session { user, token })
    }

    /// Verify credentials and issue a new session token.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = email.trim().to_lowercase();
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if user.is_suspended {
            return Err(AppError::Forbidden("Account is suspended".to_string()));
        }

        let token = self.id_gen.generate_token();
        let mut model: user::ActiveModel = user.into();
        model.token = Set(Some(token.clone()));
        model.updated_at = Set(Some(Utc::now().into()));
        let user = self.user_repo.update(model).await?;

        info!(user_id = %user.id, "Signed in");
        Ok(Session { user, token })
    }

    /// Revoke the current session token.
    pub async fn sign_out(&self, user: &user::Model) -> AppResult<()> {
        let mut model: user::ActiveModel = user.clone().into();
        model.token = Set(None);
        self.user_repo.update(model).await?;
        Ok(())
    }

    /// Resolve a session token. Suspended users are not authenticated.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.is_suspended {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Update the caller's own profile.
    pub async fn update_profile(
        &self,
        user: &user::Model,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let mut model: user::ActiveModel = user.clone().into();
        if let Some(name) = input.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(agency_name) = input.agency_name {
            model.agency_name = Set(Some(agency_name).filter(|a| !a.trim().is_empty()));
        }
        if let Some(phone) = input.phone {
            model.phone = Set(Some(phone).filter(|p| !p.trim().is_empty()));
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Check a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
