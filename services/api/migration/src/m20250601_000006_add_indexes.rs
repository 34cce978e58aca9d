use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Ratings::Table)
                    .col(Ratings::UserId)
                    .col(Ratings::GameId)
                    .name("uq_ratings_user_id_game_id")
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Ratings::Table)
                    .col(Ratings::GameId)
                    .name("idx_ratings_game_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(BacklogItems::Table)
                    .col(BacklogItems::UserId)
                    .name("idx_backlog_items_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Recommendations::Table)
                    .col(Recommendations::UserId)
                    .name("idx_recommendations_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Games::Table)
                    .col(Games::Name)
                    .name("idx_games_name")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_games_name",
            "idx_recommendations_user_id",
            "idx_backlog_items_user_id",
            "idx_ratings_game_id",
            "uq_ratings_user_id_game_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Ratings {
    Table,
    UserId,
    GameId,
}

#[derive(Iden)]
enum BacklogItems {
    Table,
    UserId,
}

#[derive(Iden)]
enum Recommendations {
    Table,
    UserId,
}

#[derive(Iden)]
enum Games {
    Table,
    Name,
}
