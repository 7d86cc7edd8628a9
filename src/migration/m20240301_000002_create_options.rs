//! Create options table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AmenityOption::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AmenityOption::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AmenityOption::Name).string().not_null())
                    .col(
                        ColumnDef::new(AmenityOption::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AmenityOption::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AmenityOption::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AmenityOption {
    #[sea_orm(iden = "options")]
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}
