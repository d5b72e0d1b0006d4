use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;
use validator::Validate;

use crate::entities::company_profile::{self, Entity as CompanyProfile};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct NewCompanyProfile {
    #[validate(length(min = 1, message = "company_name is required"))]
    pub company_name: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(default)]
    pub company_phone: String,
}

/// Patch-shaped update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyProfilePatch {
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
}

pub async fn list_profiles(
    db: &DatabaseConnection,
) -> Result<Vec<company_profile::Model>, ServiceError> {
    CompanyProfile::find()
        .order_by_asc(company_profile::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn create_profile(
    db: &DatabaseConnection,
    new: NewCompanyProfile,
) -> Result<i32, ServiceError> {
    new.validate()?;
    let profile = company_profile::ActiveModel {
        company_name: Set(new.company_name),
        company_address: Set(new.company_address),
        company_email: Set(new.company_email),
        company_phone: Set(new.company_phone),
        ..Default::default()
    };
    let inserted = profile.insert(db).await?;
    Ok(inserted.id)
}

pub async fn update_profile(
    db: &DatabaseConnection,
    id: i32,
    patch: CompanyProfilePatch,
) -> Result<(), ServiceError> {
    if matches!(&patch.company_name, Some(name) if name.trim().is_empty()) {
        return Err(ServiceError::Validation(
            "company_name must not be empty".to_string(),
        ));
    }

    let profile = CompanyProfile::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("company profile {id}")))?;

    let mut active: company_profile::ActiveModel = profile.into();
    if let Some(v) = patch.company_name {
        active.company_name = Set(v);
    }
    if let Some(v) = patch.company_address {
        active.company_address = Set(v);
    }
    if let Some(v) = patch.company_email {
        active.company_email = Set(v);
    }
    if let Some(v) = patch.company_phone {
        active.company_phone = Set(v);
    }
    active.update(db).await?;
    Ok(())
}

pub async fn delete_profile(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let profile = CompanyProfile::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("company profile {id}")))?;
    profile.delete(db).await?;
    Ok(())
}
