use crate::api::error::AppError;
use crate::entities::complaints;
use sea_orm::sea_query::{DeleteStatement, Expr, Query, UpdateStatement};
use sea_orm::{ConnectionTrait, EntityTrait, Value};

/// Sparse set of column assignments against a single complaint row.
///
/// Fields are rendered in the order they were added, so the first present
/// field binds to `$1`. Row predicates come last and the target `id` is
/// always the final parameter:
///
/// ```text
/// UPDATE "complaints" SET "status" = $1, "priority" = $2
/// WHERE "user_id" = $3 AND "id" = $4 RETURNING *
/// ```
#[derive(Debug, Default, Clone)]
pub struct PartialUpdate {
    fields: Vec<(complaints::Column, Value)>,
}

impl PartialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column` only when a value was supplied. Presence is the `Option`,
    /// so `Some("")` or `Some(0)` still count.
    pub fn set<V: Into<Value>>(mut self, column: complaints::Column, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.fields.push((column, value.into()));
        }
        self
    }

    /// Adds `column` unconditionally. `None` values are written as SQL NULL.
    pub fn assign<V: Into<Value>>(mut self, column: complaints::Column, value: V) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = complaints::Column> + '_ {
        self.fields.iter().map(|(column, _)| *column)
    }

    /// Fails with `NoFieldsToUpdate` before anything touches the store.
    pub fn into_statement(self, id: i32, owner: Option<i32>) -> Result<UpdateStatement, AppError> {
        if self.fields.is_empty() {
            return Err(AppError::NoFieldsToUpdate);
        }

        let mut stmt = Query::update();
        stmt.table(complaints::Entity);
        for (column, value) in self.fields {
            stmt.value(column, value);
        }
        if let Some(owner) = owner {
            stmt.and_where(Expr::col(complaints::Column::UserId).eq(owner));
        }
        stmt.and_where(Expr::col(complaints::Column::Id).eq(id))
            .returning_all();

        Ok(stmt)
    }

    /// Runs the update and returns the row as stored afterwards, or `None`
    /// when the predicates matched nothing.
    pub async fn execute<C: ConnectionTrait>(
        self,
        db: &C,
        id: i32,
        owner: Option<i32>,
    ) -> Result<Option<complaints::Model>, AppError> {
        let stmt = self.into_statement(id, owner)?;
        let stmt = db.get_database_backend().build(&stmt);

        Ok(complaints::Entity::find()
            .from_raw_sql(stmt)
            .one(db)
            .await?)
    }
}

/// Single-statement delete returning the removed row, same predicate layout
/// as [`PartialUpdate`].
pub fn delete_statement(id: i32, owner: Option<i32>) -> DeleteStatement {
    let mut stmt = Query::delete();
    stmt.from_table(complaints::Entity);
    if let Some(owner) = owner {
        stmt.and_where(Expr::col(complaints::Column::UserId).eq(owner));
    }
    stmt.and_where(Expr::col(complaints::Column::Id).eq(id))
        .returning_all();
    stmt
}
