use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::{next_updated_at, truncate_to_micros, RecipeStore, StoreError};
use crate::models::{NewRecipe, Recipe, RecipePatch};

/// In-process store. Ids are assigned from 1 upward and never reused.
#[derive(Debug)]
pub struct MemoryRecipeStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: i32,
    recipes: BTreeMap<i32, Recipe>,
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                recipes: BTreeMap::new(),
            }),
        }
    }
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("recipe store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("recipe store lock poisoned".to_string()))
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn create(&self, input: NewRecipe) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "create").entered();
        let mut inner = self.write()?;

        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("recipe ids exhausted".to_string()))?;

        let now = truncate_to_micros(Utc::now());
        let recipe = Recipe {
            id,
            title: input.title,
            making_time: input.making_time,
            serves: input.serves,
            ingredients: input.ingredients,
            cost: input.cost,
            created_at: now,
            updated_at: now,
        };
        inner.recipes.insert(id, recipe.clone());

        Ok(recipe)
    }

    fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let _span = tracing::info_span!("db.query", op = "list_all").entered();
        Ok(self.read()?.recipes.values().cloned().collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "find_by_id").entered();
        self.read()?
            .recipes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: i32, patch: RecipePatch) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "update").entered();
        let mut inner = self.write()?;

        let recipe = inner.recipes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply_to(recipe);
        recipe.updated_at = next_updated_at(recipe.updated_at);

        Ok(recipe.clone())
    }

    fn remove(&self, id: i32) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "remove").entered();
        self.write()?
            .recipes
            .remove(&id)
            .ok_or(StoreError::NotFound(id))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
