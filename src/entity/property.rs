//! Property entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Accent-free lowercase title used for substring search
    pub search_title: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub surface: Decimal,
    pub rooms: i32,
    pub bedrooms: i32,
    pub floor: i32,
    pub city: String,
    pub postal_code: String,
    pub sold: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::picture::Entity")]
    Pictures,
    #[sea_orm(has_many = "super::option_property::Entity")]
    OptionLinks,
}

impl Related<super::picture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pictures.def()
    }
}

impl Related<super::option_property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OptionLinks.def()
    }
}

impl Related<super::option::Entity> for Entity {
    fn to() -> RelationDef {
        super::option_property::Relation::LinkedOption.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::option_property::Relation::LinkedProperty.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
