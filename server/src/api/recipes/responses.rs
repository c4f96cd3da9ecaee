//! Response envelopes for the recipes endpoints.
//!
//! Single-record responses always carry the record inside a one-element
//! `recipe` list, never as a bare object.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Recipe;
use crate::validation::ValidationFailure;

pub const CREATED: &str = "Recipe successfully created!";
pub const UPDATED: &str = "Recipe successfully updated!";
pub const DELETED: &str = "Recipe successfully removed!";
pub const DETAILS: &str = "Recipe details by id";
pub const API_WORKING: &str = "Recipes API is working!";
pub const CREATION_FAILED: &str = "Recipe creation failed!";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    #[schema(example = "Recipe details by id")]
    pub message: String,
    pub recipe: Vec<Recipe>,
}

impl RecipeResponse {
    pub fn new(message: &str, recipe: Recipe) -> Self {
        Self {
            message: message.to_string(),
            recipe: vec![recipe],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipesResponse {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Recipe successfully removed!")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Body of a rejected create or update, sent with status 200.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationFailureResponse {
    #[schema(example = "Recipe creation failed!")]
    pub message: String,
    #[schema(example = "title, making_time, serves, ingredients, cost")]
    pub required: String,
}

impl From<&ValidationFailure> for ValidationFailureResponse {
    fn from(failure: &ValidationFailure) -> Self {
        Self {
            message: CREATION_FAILED.to_string(),
            required: failure.required(),
        }
    }
}
