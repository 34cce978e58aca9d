use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recommendations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recommendations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recommendations::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Recommendations::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Recommendations::RawResponse).text().null())
                    .col(ColumnDef::new(Recommendations::Items).json_binary().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Recommendations::Table, Recommendations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recommendations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Recommendations {
    Table,
    Id,
    UserId,
    GeneratedAt,
    RawResponse,
    Items,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
