use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Meal, MealFields, User};
use crate::database::repository::{MealRepository, Store, UserRepository};

const USER_COLUMNS: &str = "id, name, email, session_hash, session_expires_at, created_at";
const MEAL_COLUMNS: &str = "id, user_id, name, description, is_on_diet, date, created_at, updated_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_session_hash(&self, session_hash: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE session_hash = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(session_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, session_hash, session_expires_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.session_hash)
        .bind(user.session_expires_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl MealRepository for PgStore {
    async fn insert_meal(&self, meal: &Meal) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO meals (id, user_id, name, description, is_on_diet, date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.is_on_diet)
        .bind(meal.date)
        .bind(meal.created_at)
        .bind(meal.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_meal(&self, id: Uuid) -> Result<Option<Meal>, DatabaseError> {
        let sql = format!("SELECT {} FROM meals WHERE id = $1", MEAL_COLUMNS);
        let meal = sqlx::query_as::<_, Meal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(meal)
    }

    async fn list_meals_for_user(&self, user_id: Uuid) -> Result<Vec<Meal>, DatabaseError> {
        // created_at keeps same-date meals in insertion order
        let sql = format!(
            "SELECT {} FROM meals WHERE user_id = $1 ORDER BY date DESC, created_at ASC",
            MEAL_COLUMNS
        );
        let meals = sqlx::query_as::<_, Meal>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(meals)
    }

    async fn update_meal(&self, id: Uuid, fields: &MealFields) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE meals
             SET name = $2, description = $3, is_on_diet = $4, date = $5, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.is_on_diet)
        .bind(fields.date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Meal not found".to_string()));
        }
        Ok(())
    }

    async fn delete_meal(&self, id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_meals_by_diet(&self, user_id: Uuid, is_on_diet: bool) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(id) FROM meals WHERE user_id = $1 AND is_on_diet = $2",
        )
        .bind(user_id)
        .bind(is_on_diet)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
