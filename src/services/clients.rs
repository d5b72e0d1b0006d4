use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::entities::{
    client::{self, Entity as Client},
    invoice::{self, Entity as Invoice},
    invoice_item::{self, Entity as InvoiceItem},
};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct NewClient {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// Patch-shaped update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>, ServiceError> {
    Client::find()
        .order_by_asc(client::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn create_client(db: &DatabaseConnection, new: NewClient) -> Result<i32, ServiceError> {
    new.validate()?;
    let model = client::ActiveModel {
        name: Set(new.name),
        email: Set(new.email),
        address: Set(new.address),
        phone: Set(new.phone),
        ..Default::default()
    };
    let inserted = model.insert(db).await?;
    Ok(inserted.id)
}

pub async fn update_client(
    db: &DatabaseConnection,
    id: i32,
    patch: ClientPatch,
) -> Result<(), ServiceError> {
    for (field, value) in [("name", &patch.name), ("email", &patch.email)] {
        if matches!(value, Some(v) if v.trim().is_empty()) {
            return Err(ServiceError::Validation(format!(
                "{field} must not be empty"
            )));
        }
    }

    let existing = Client::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("client {id}")))?;

    let mut active: client::ActiveModel = existing.into();
    if let Some(v) = patch.name {
        active.name = Set(v);
    }
    if let Some(v) = patch.email {
        active.email = Set(v);
    }
    if let Some(v) = patch.address {
        active.address = Set(v);
    }
    if let Some(v) = patch.phone {
        active.phone = Set(v);
    }
    active.update(db).await?;
    Ok(())
}

/// Deletes a client together with all of its invoices and their items.
/// The cascade runs explicitly inside one transaction so it holds on
/// backends where the FK constraints are not enforced.
pub async fn delete_client(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let existing = Client::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("client {id}")))?;

    let txn = db.begin().await?;

    let invoice_ids: Vec<i32> = Invoice::find()
        .filter(invoice::Column::ClientId.eq(id))
        .select_only()
        .column(invoice::Column::Id)
        .into_tuple()
        .all(&txn)
        .await?;

    if !invoice_ids.is_empty() {
        InvoiceItem::delete_many()
            .filter(invoice_item::Column::InvoiceId.is_in(invoice_ids.clone()))
            .exec(&txn)
            .await?;
        Invoice::delete_many()
            .filter(invoice::Column::ClientId.eq(id))
            .exec(&txn)
            .await?;
    }

    existing.delete(&txn).await?;
    txn.commit().await?;

    info!(
        client_id = id,
        invoices = invoice_ids.len(),
        "client deleted with cascading invoices"
    );
    Ok(())
}
