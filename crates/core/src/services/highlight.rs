//! Highlight service.

use bizlist_common::{AppError, AppResult, IdGenerator};
use bizlist_db::{
    entities::{highlight, user},
    repositories::HighlightRepository,
};
use chrono::Utc;
use sea_orm::Set;
use tracing::info;

use super::listing::slugify;
use super::moderation::require_admin;

const MAX_LABEL_LEN: usize = 100;

fn validate_label(label: &str) -> AppResult<String> {
    let label = label.trim();
    if label.is_empty() || label.chars().count() > MAX_LABEL_LEN {
        return Err(AppError::Validation(format!(
            "Highlight label must be between 1 and {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(label.to_string())
}

/// Service for highlight tags.
#[derive(Clone)]
pub struct HighlightService {
    highlight_repo: HighlightRepository,
    id_gen: IdGenerator,
}

impl HighlightService {
    /// Create a new highlight service.
    #[must_use]
    pub const fn new(highlight_repo: HighlightRepository) -> Self {
        Self {
            highlight_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Active highlights by label.
    pub async fn list_active(&self) -> AppResult<Vec<highlight::Model>> {
        self.highlight_repo.find_active().await
    }

    /// Every highlight, active or not.
    pub async fn list_all(&self, admin: &user::Model) -> AppResult<Vec<highlight::Model>> {
        require_admin(admin)?;
        self.highlight_repo.find_all().await
    }

    /// Create a highlight.
    pub async fn create(&self, admin: &user::Model, label: &str) -> AppResult<highlight::Model> {
        require_admin(admin)?;
        let label = validate_label(label)?;

        let slug = slugify(&label);
        if self.highlight_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!("Highlight already exists: {label}")));
        }

        let model = highlight::ActiveModel {
            id: Set(self.id_gen.generate()),
            slug: Set(slug),
            label: Set(label),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        let highlight = self.highlight_repo.create(model).await?;
        info!(highlight_id = %highlight.id, "Created highlight");
        Ok(highlight)
    }

    /// Change the label. The slug stays as created.
    pub async fn update_label(
        &self,
        admin: &user::Model,
        highlight_id: &str,
        label: &str,
    ) -> AppResult<highlight::Model> {
        require_admin(admin)?;
        let label = validate_label(label)?;

        let mut model: highlight::ActiveModel = self.get(highlight_id).await?.into();
        model.label = Set(label);
        self.highlight_repo.update(model).await
    }

    /// Activate or deactivate a highlight.
    pub async fn set_active(
        &self,
        admin: &user::Model,
        highlight_id: &str,
        is_active: bool,
    ) -> AppResult<highlight::Model> {
        require_admin(admin)?;

        let mut model: highlight::ActiveModel = self.get(highlight_id).await?.into();
        model.is_active = Set(is_active);

        let highlight = self.highlight_repo.update(model).await?;
        info!(highlight_id = %highlight.id, is_active, "Changed highlight visibility");
        Ok(highlight)
    }

    async fn get(&self, highlight_id: &str) -> AppResult<highlight::Model> {
        self.highlight_repo
            .find_by_id(highlight_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Highlight not found: {highlight_id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bizlist_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn admin() -> user::Model {
        user::Model {
            id: "admin1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            name: "Admin".to_string(),
            agency_name: None,
            phone: None,
            role: UserRole::Admin,
            is_suspended: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_validate_label() {
        assert_eq!(validate_label("  Freehold ").unwrap(), "Freehold");
        assert!(validate_label("   ").is_err());
        assert!(validate_label(&"x".repeat(101)).is_err());
    }

    #[tokio::test]
    async fn test_create() {
        let created = highlight::Model {
            id: "h1".to_string(),
            slug: "owner-financing".to_string(),
            label: "Owner financing".to_string(),
            is_active: true,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<highlight::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );
        let svc = HighlightService::new(HighlightRepository::new(db));

        let highlight = svc.create(&admin(), "Owner financing").await.unwrap();
        assert_eq!(highlight.slug, "owner-financing");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<highlight::Model>::new()])
                .into_connection(),
        );
        let svc = HighlightService::new(HighlightRepository::new(db));

        let result = svc.update_label(&admin(), "missing", "Freehold").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
