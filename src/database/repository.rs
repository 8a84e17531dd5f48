use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Meal, MealFields, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Resolve a session digest to its owner. Expiry is checked by the caller.
    async fn find_user_by_session_hash(&self, session_hash: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with `UniqueViolation` when the email or session digest is taken.
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn insert_meal(&self, meal: &Meal) -> Result<(), DatabaseError>;

    async fn find_meal(&self, id: Uuid) -> Result<Option<Meal>, DatabaseError>;

    /// All meals owned by `user_id`, sorted by date descending.
    async fn list_meals_for_user(&self, user_id: Uuid) -> Result<Vec<Meal>, DatabaseError>;

    /// Fails with `NotFound` when no meal has this id.
    async fn update_meal(&self, id: Uuid, fields: &MealFields) -> Result<(), DatabaseError>;

    /// Deletes only when the meal belongs to `user_id`. Returns whether a row was removed.
    async fn delete_meal(&self, id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError>;

    async fn count_meals_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> Result<u64, DatabaseError>;
}

/// Everything the HTTP layer needs from persistence
#[async_trait]
pub trait Store: UserRepository + MealRepository {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
