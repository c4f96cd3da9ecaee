use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::{next_updated_at, RecipeStore, StoreError};
use crate::db::DbPool;
use crate::models::{NewRecipe, Recipe, RecipePatch};
use crate::schema::recipes;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct RecipeRow {
    id: i32,
    title: String,
    making_time: String,
    serves: String,
    ingredients: String,
    cost: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            title: row.title,
            making_time: row.making_time,
            serves: row.serves,
            ingredients: row.ingredients,
            cost: row.cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// created_at and updated_at come from the column defaults
#[derive(Insertable)]
#[diesel(table_name = recipes)]
struct NewRecipeRow<'a> {
    title: &'a str,
    making_time: &'a str,
    serves: &'a str,
    ingredients: &'a str,
    cost: i32,
}

/// `None` fields are left out of the UPDATE statement.
#[derive(AsChangeset)]
#[diesel(table_name = recipes)]
struct RecipeChangeset<'a> {
    title: Option<&'a str>,
    making_time: Option<&'a str>,
    serves: Option<&'a str>,
    ingredients: Option<&'a str>,
    cost: Option<i32>,
    updated_at: DateTime<Utc>,
}

/// Postgres-backed store using a pooled diesel connection per call.
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_locked(conn: &mut PgConnection, id: i32) -> Result<RecipeRow, StoreError> {
    recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .for_update()
        .get_result(conn)
        .optional()?
        .ok_or(StoreError::NotFound(id))
}

impl RecipeStore for PgRecipeStore {
    fn create(&self, input: NewRecipe) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "create").entered();
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(recipes::table)
            .values(&NewRecipeRow {
                title: &input.title,
                making_time: &input.making_time,
                serves: &input.serves,
                ingredients: &input.ingredients,
                cost: input.cost,
            })
            .returning(RecipeRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let _span = tracing::info_span!("db.query", op = "list_all").entered();
        let mut conn = self.pool.get()?;

        let rows = recipes::table
            .order(recipes::id.asc())
            .select(RecipeRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    fn find_by_id(&self, id: i32) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "find_by_id").entered();
        let mut conn = self.pool.get()?;

        recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Recipe::from)
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: i32, patch: RecipePatch) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "update").entered();
        let mut conn = self.pool.get()?;

        let row = conn.transaction::<RecipeRow, StoreError, _>(|conn| {
            let current = find_locked(conn, id)?;

            let changes = RecipeChangeset {
                title: patch.title.as_deref(),
                making_time: patch.making_time.as_deref(),
                serves: patch.serves.as_deref(),
                ingredients: patch.ingredients.as_deref(),
                cost: patch.cost,
                updated_at: next_updated_at(current.updated_at),
            };

            let row = diesel::update(recipes::table.find(id))
                .set(&changes)
                .returning(RecipeRow::as_returning())
                .get_result(conn)?;
            Ok(row)
        })?;

        Ok(row.into())
    }

    fn remove(&self, id: i32) -> Result<Recipe, StoreError> {
        let _span = tracing::info_span!("db.query", op = "remove").entered();
        let mut conn = self.pool.get()?;

        let row = conn.transaction::<RecipeRow, StoreError, _>(|conn| {
            let current = find_locked(conn, id)?;
            diesel::delete(recipes::table.find(id)).execute(conn)?;
            Ok(current)
        })?;

        Ok(row.into())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
