//! Active enums shared by the data field entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How often values are expected to be entered for a data field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EntryInterval {
    #[default]
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Irregular cadence, entered on demand
    #[sea_orm(string_value = "custom")]
    Custom,
}

impl std::fmt::Display for EntryInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryInterval::Daily => write!(f, "daily"),
            EntryInterval::Weekly => write!(f, "weekly"),
            EntryInterval::Monthly => write!(f, "monthly"),
            EntryInterval::Custom => write!(f, "custom"),
        }
    }
}
