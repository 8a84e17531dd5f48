use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Meal, MealFields, User};
use crate::database::repository::{MealRepository, Store, UserRepository};

/// Process-local store for tests and `--in-memory` runs.
///
/// Rows live in insertion order so same-date meals list the same way the
/// PostgreSQL store orders them.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<User>>>,
    meals: Arc<RwLock<Vec<Meal>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_session_hash(&self, session_hash: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.session_hash == session_hash).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }
        if users.iter().any(|u| u.session_hash == user.session_hash) {
            return Err(DatabaseError::UniqueViolation("users_session_hash_key".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl MealRepository for MemoryStore {
    async fn insert_meal(&self, meal: &Meal) -> Result<(), DatabaseError> {
        let mut meals = self.meals.write().await;
        if meals.iter().any(|m| m.id == meal.id) {
            return Err(DatabaseError::UniqueViolation("meals_pkey".to_string()));
        }
        meals.push(meal.clone());
        Ok(())
    }

    async fn find_meal(&self, id: Uuid) -> Result<Option<Meal>, DatabaseError> {
        let meals = self.meals.read().await;
        Ok(meals.iter().find(|m| m.id == id).cloned())
    }

    async fn list_meals_for_user(&self, user_id: Uuid) -> Result<Vec<Meal>, DatabaseError> {
        let meals = self.meals.read().await;
        let mut owned: Vec<Meal> = meals.iter().filter(|m| m.user_id == user_id).cloned().collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(owned)
    }

    async fn update_meal(&self, id: Uuid, fields: &MealFields) -> Result<(), DatabaseError> {
        let mut meals = self.meals.write().await;
        let meal = meals
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DatabaseError::NotFound("Meal not found".to_string()))?;
        meal.apply(fields);
        Ok(())
    }

    async fn delete_meal(&self, id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(meals.len() < before)
    }

    async fn count_meals_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> Result<u64, DatabaseError> {
        let meals = self.meals.read().await;
        let count = meals
            .iter()
            .filter(|m| m.user_id == user_id && m.is_on_diet == is_on_diet)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        let _users = self.users.read().await;
        Ok(())
    }
}
