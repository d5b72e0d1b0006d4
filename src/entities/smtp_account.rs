use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored mail-sending account. The password is kept in plaintext for
/// behavioral parity with the system this replaces; it is never serialized
/// outward and never logged. Treat the table as sensitive.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "smtp_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
