use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reusable company letterhead preset. Invoices copy these fields at
/// creation time instead of referencing a profile row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub company_phone: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
