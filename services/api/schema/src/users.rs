use sea_orm::entity::prelude::*;

/// Registered account. `password_hash` is a bcrypt hash, never the plain password.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub user_age: Option<i32>,
    pub registration_date: chrono::DateTime<chrono::Utc>,
    pub is_admin: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
    #[sea_orm(has_many = "super::backlog_items::Entity")]
    BacklogItems,
    #[sea_orm(has_many = "super::recommendations::Entity")]
    Recommendations,
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::backlog_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BacklogItems.def()
    }
}

impl Related<super::recommendations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recommendations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
