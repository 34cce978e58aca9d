use sea_orm::entity::prelude::*;

/// Latest generated recommendation set for a user. `items` holds the parsed
/// suggestions as a JSON array; `raw_response` is the model text it came from.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recommendations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub raw_response: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
