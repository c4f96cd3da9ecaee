use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored recipe as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Chicken Curry")]
    pub title: String,
    #[schema(example = "45 min")]
    pub making_time: String,
    #[schema(example = "4 people")]
    pub serves: String,
    #[schema(example = "onion, chicken, seasoning")]
    pub ingredients: String,
    #[schema(example = 1000)]
    pub cost: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new recipe. Every writable field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub making_time: String,
    pub serves: String,
    pub ingredients: String,
    pub cost: i32,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub making_time: Option<String>,
    pub serves: Option<String>,
    pub ingredients: Option<String>,
    pub cost: Option<i32>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.making_time.is_none()
            && self.serves.is_none()
            && self.ingredients.is_none()
            && self.cost.is_none()
    }

    /// Apply the present fields onto `recipe`. Timestamps are left to the store.
    pub fn apply_to(self, recipe: &mut Recipe) {
        if let Some(title) = self.title {
            recipe.title = title;
        }
        if let Some(making_time) = self.making_time {
            recipe.making_time = making_time;
        }
        if let Some(serves) = self.serves {
            recipe.serves = serves;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(cost) = self.cost {
            recipe.cost = cost;
        }
    }
}
