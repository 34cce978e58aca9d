use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BacklogItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BacklogItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BacklogItems::UserId).integer().not_null())
                    .col(ColumnDef::new(BacklogItems::GameId).integer().not_null())
                    .col(
                        ColumnDef::new(BacklogItems::Status)
                            .string_len(20)
                            .not_null()
                            .default("planning"),
                    )
                    .col(ColumnDef::new(BacklogItems::Rating).double().null())
                    .col(
                        ColumnDef::new(BacklogItems::AddedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BacklogItems::Table, BacklogItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BacklogItems::Table, BacklogItems::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BacklogItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BacklogItems {
    Table,
    Id,
    UserId,
    GameId,
    Status,
    Rating,
    AddedDate,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
}
