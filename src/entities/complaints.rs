use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "complaints")]
#[schema(as = Complaint)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date: DateTimeUtc,
    pub status: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub complaint_type: String,
    pub priority: Option<String>,
    /// Blob store path of the current attachment, if any.
    pub attachment_path: Option<String>,
    pub user_id: Option<i32>,
    pub rating: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback_comment: Option<String>,
}

/// No relation variants: `user_id` is whatever identity the caller asserted,
/// so the generated schema carries no foreign key for it.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::users::Entity)
            .from(Column::UserId)
            .to(super::users::Column::Id)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub type Complaint = Model;
