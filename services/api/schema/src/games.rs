use sea_orm::entity::prelude::*;

/// Catalog entry imported from IGDB.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub genre: String,
    pub platform: String,
    pub release_date: Date,
    pub image_url: String,
    #[sea_orm(unique)]
    pub igdb_id: Option<i64>,
    pub age_rating: String,
    pub igdb_link: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
    #[sea_orm(has_many = "super::backlog_items::Entity")]
    BacklogItems,
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

impl ActiveModelBehavior for ActiveModel {}
