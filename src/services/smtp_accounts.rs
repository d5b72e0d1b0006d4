use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::smtp_account::{self, Entity as SmtpAccount};
use crate::errors::ServiceError;
use crate::mailer::{Mailer, SmtpCredentials};

pub async fn list_accounts(
    db: &DatabaseConnection,
) -> Result<Vec<smtp_account::Model>, ServiceError> {
    SmtpAccount::find()
        .order_by_asc(smtp_account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Verifies the credentials with a live relay login before persisting
/// anything; a rejected login leaves no record behind.
pub async fn create_account(
    db: &DatabaseConnection,
    mailer: &Mailer,
    creds: SmtpCredentials,
) -> Result<i32, ServiceError> {
    if creds.email.trim().is_empty() || creds.password.is_empty() {
        return Err(ServiceError::Validation(
            "email and password are required".to_string(),
        ));
    }

    mailer.verify_login(&creds).await?;

    let account = smtp_account::ActiveModel {
        email: Set(creds.email),
        password: Set(creds.password),
        ..Default::default()
    };
    let inserted = account.insert(db).await?;
    info!(account_id = inserted.id, "smtp account verified and stored");
    Ok(inserted.id)
}

pub async fn delete_account(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let account = SmtpAccount::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("smtp account {id}")))?;
    account.delete(db).await?;
    Ok(())
}
