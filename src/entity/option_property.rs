//! Join table between options and properties.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "option_property")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub option_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub property_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::option::Entity",
        from = "Column::OptionId",
        to = "super::option::Column::Id",
        on_delete = "Cascade"
    )]
    LinkedOption,
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    LinkedProperty,
}

impl Related<super::option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkedOption.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkedProperty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
