//! Category service.

use bizlist_common::{AppError, AppResult, IdGenerator};
use bizlist_db::{
    entities::{category, user},
    repositories::CategoryRepository,
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::listing::slugify;
use super::moderation::require_admin;

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Derived from the name when absent.
    #[validate(length(min = 1, max = 100))]
    pub slug: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    pub display_order: i32,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub display_order: Option<i32>,
}

/// Service for listing categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Active categories in display order.
    pub async fn list_active(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_active().await
    }

    /// Every category, active or not.
    pub async fn list_all(&self, admin: &user::Model) -> AppResult<Vec<category::Model>> {
        require_admin(admin)?;
        self.category_repo.find_all().await
    }

    /// Create a category.
    pub async fn create(
        &self,
        admin: &user::Model,
        input: CreateCategoryInput,
    ) -> AppResult<category::Model> {
        require_admin(admin)?;
        input.validate()?;

        let slug = slugify(input.slug.as_deref().unwrap_or(&input.name));
        if self.category_repo.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::Conflict(format!("Category slug already in use: {slug}")));
        }

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            slug: Set(slug),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            is_active: Set(true),
            display_order: Set(input.display_order),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let category = self.category_repo.create(model).await?;
        info!(category_id = %category.id, slug = %category.slug, "Created category");
        Ok(category)
    }

    /// Update name, description or display order.
    pub async fn update(
        &self,
        admin: &user::Model,
        category_id: &str,
        input: UpdateCategoryInput,
    ) -> AppResult<category::Model> {
        require_admin(admin)?;
        input.validate()?;

        let current = self.get(category_id).await?;
        let mut model: category::ActiveModel = current.into();

        if let Some(name) = input.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }
        if let Some(order) = input.display_order {
            model.display_order = Set(order);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.category_repo.update(model).await
    }

    /// Activate or deactivate a category. Deactivated categories vanish from
    /// public lists and search resolution; listings keep their reference.
    pub async fn set_active(
        &self,
        admin: &user::Model,
        category_id: &str,
        is_active: bool,
    ) -> AppResult<category::Model> {
        require_admin(admin)?;

        let current = self.get(category_id).await?;
        let mut model: category::ActiveModel = current.into();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(Utc::now().into()));

        let category = self.category_repo.update(model).await?;
        info!(category_id = %category.id, is_active, "Changed category visibility");
        Ok(category)
    }

    async fn get(&self, category_id: &str) -> AppResult<category::Model> {
        self.category_repo
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found: {category_id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bizlist_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(role: UserRole) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            name: "User".to_string(),
            agency_name: None,
            phone: None,
            role,
            is_suspended: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_category(slug: &str, is_active: bool) -> category::Model {
        category::Model {
            id: "cat1".to_string(),
            slug: slug.to_string(),
            name: "Cafes & Restaurants".to_string(),
            description: None,
            is_active,
            display_order: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = CategoryService::new(CategoryRepository::new(db));

        let result = svc
            .create(
                &create_test_user(UserRole::Broker),
                CreateCategoryInput {
                    name: "Cafes".to_string(),
                    slug: None,
                    description: None,
                    display_order: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let created = create_test_category("cafes-restaurants", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );
        let svc = CategoryService::new(CategoryRepository::new(db));

        let category = svc
            .create(
                &create_test_user(UserRole::Admin),
                CreateCategoryInput {
                    name: "Cafes & Restaurants".to_string(),
                    slug: None,
                    description: None,
                    display_order: 0,
                },
            )
            .await
            .unwrap();

        assert_eq!(category.slug, "cafes-restaurants");
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let existing = create_test_category("cafes", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let svc = CategoryService::new(CategoryRepository::new(db));

        let result = svc
            .create(
                &create_test_user(UserRole::Admin),
                CreateCategoryInput {
                    name: "Cafes".to_string(),
                    slug: Some("cafes".to_string()),
                    description: None,
                    display_order: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_set_active() {
        let current = create_test_category("cafes", true);
        let updated = create_test_category("cafes", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[current]])
                .append_query_results([[updated]])
                .into_connection(),
        );
        let svc = CategoryService::new(CategoryRepository::new(db));

        let category = svc
            .set_active(&create_test_user(UserRole::Admin), "cat1", false)
            .await
            .unwrap();

        assert!(!category.is_active);
    }
}
