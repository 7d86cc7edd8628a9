//! Create properties table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Property::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Property::Title).string().not_null())
                    .col(ColumnDef::new(Property::SearchTitle).string().not_null())
                    .col(ColumnDef::new(Property::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Property::Surface).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Property::Rooms).integer().not_null())
                    .col(ColumnDef::new(Property::Bedrooms).integer().not_null())
                    .col(ColumnDef::new(Property::Floor).integer().not_null())
                    .col(ColumnDef::new(Property::City).string().not_null())
                    .col(ColumnDef::new(Property::PostalCode).string().not_null())
                    .col(
                        ColumnDef::new(Property::Sold)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Property::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Property::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Property::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_created_at")
                    .table(Property::Table)
                    .col(Property::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_deleted_at")
                    .table(Property::Table)
                    .col(Property::DeletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Property::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Property {
    #[sea_orm(iden = "properties")]
    Table,
    Id,
    Title,
    SearchTitle,
    Price,
    Surface,
    Rooms,
    Bedrooms,
    Floor,
    City,
    PostalCode,
    Sold,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
