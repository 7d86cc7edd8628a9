//! Option (amenity) entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::option_property::Entity")]
    PropertyLinks,
}

impl Related<super::option_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyLinks.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        super::option_property::Relation::LinkedProperty.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::option_property::Relation::LinkedOption.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
