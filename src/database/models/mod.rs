pub mod meal;
pub mod user;

pub use meal::{Meal, MealFields};
pub use user::{NewUser, User};
