//! Create pictures table.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_properties::Property;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Picture::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Picture::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Picture::PropertyId).integer().not_null())
                    .col(ColumnDef::new(Picture::Filename).string().not_null())
                    .col(
                        ColumnDef::new(Picture::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Picture::Table, Picture::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pictures_property")
                    .table(Picture::Table)
                    .col(Picture::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Picture::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Picture {
    #[sea_orm(iden = "pictures")]
    Table,
    Id,
    PropertyId,
    Filename,
    CreatedAt,
}
