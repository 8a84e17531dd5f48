use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::metrics::DietEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meal {
    /// New meal owned by `user_id`, stamped with the current time
    pub fn new(user_id: Uuid, fields: MealFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: fields.name,
            description: fields.description,
            is_on_diet: fields.is_on_diet,
            date: fields.date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn apply(&mut self, fields: &MealFields) {
        self.name = fields.name.clone();
        self.description = fields.description.clone();
        self.is_on_diet = fields.is_on_diet;
        self.date = fields.date;
        self.updated_at = Utc::now();
    }
}

impl DietEntry for Meal {
    fn is_on_diet(&self) -> bool {
        self.is_on_diet
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// The client-editable fields of a meal, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealFields {
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub date: DateTime<Utc>,
}
