//! Create option_property join table.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_properties::Property;
use super::m20240301_000002_create_options::AmenityOption;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OptionProperty::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OptionProperty::OptionId).integer().not_null())
                    .col(ColumnDef::new(OptionProperty::PropertyId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(OptionProperty::OptionId)
                            .col(OptionProperty::PropertyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OptionProperty::Table, OptionProperty::OptionId)
                            .to(AmenityOption::Table, AmenityOption::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(OptionProperty::Table, OptionProperty::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_option_property_property")
                    .table(OptionProperty::Table)
                    .col(OptionProperty::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OptionProperty::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OptionProperty {
    Table,
    OptionId,
    PropertyId,
}
