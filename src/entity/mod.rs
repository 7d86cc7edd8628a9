//! SeaORM entity definitions.

pub mod option;
pub mod option_property;
pub mod picture;
pub mod property;
