use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::Name).string().not_null())
                    .col(ColumnDef::new(Games::Genre).string().not_null())
                    .col(ColumnDef::new(Games::Platform).string().not_null())
                    .col(ColumnDef::new(Games::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Games::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Games::IgdbId).big_integer().null().unique_key())
                    .col(ColumnDef::new(Games::AgeRating).string_len(20).not_null())
                    .col(ColumnDef::new(Games::IgdbLink).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    Name,
    Genre,
    Platform,
    ReleaseDate,
    ImageUrl,
    IgdbId,
    AgeRating,
    IgdbLink,
}
