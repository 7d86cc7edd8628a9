//! Option (amenity) DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entity::option;

/// An option as exposed on property pages and the JSON resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PropertyOption {
    pub id: i32,
    pub name: String,
}

impl From<option::Model> for PropertyOption {
    fn from(model: option::Model) -> Self {
        PropertyOption {
            id: model.id,
            name: model.name,
        }
    }
}

/// Admin option create/update body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OptionForm {
    #[validate(length(min = 2, max = 255, message = "The name must be between 2 and 255 characters."))]
    pub name: String,
}

impl OptionForm {
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_string()
    }
}

/// Result of an option deletion.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OptionDeleted {
    pub id: i32,
    /// Number of properties the option was detached from
    pub detached: u64,
}
