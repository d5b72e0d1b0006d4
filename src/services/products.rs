use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use validator::Validate;

use crate::entities::{
    invoice_item::{self, Entity as InvoiceItem},
    product::{self, Entity as Product},
};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
}

/// Patch-shaped update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>, ServiceError> {
    Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<i32, ServiceError> {
    new.validate()?;
    if new.price < Decimal::ZERO {
        return Err(ServiceError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    let model = product::ActiveModel {
        name: Set(new.name),
        description: Set(new.description),
        price: Set(new.price),
        ..Default::default()
    };
    let inserted = model.insert(db).await?;
    Ok(inserted.id)
}

pub async fn update_product(
    db: &DatabaseConnection,
    id: i32,
    patch: ProductPatch,
) -> Result<(), ServiceError> {
    if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
        return Err(ServiceError::Validation("name must not be empty".to_string()));
    }
    if matches!(patch.price, Some(price) if price < Decimal::ZERO) {
        return Err(ServiceError::Validation(
            "price must not be negative".to_string(),
        ));
    }

    let existing = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))?;

    let mut active: product::ActiveModel = existing.into();
    if let Some(v) = patch.name {
        active.name = Set(v);
    }
    if let Some(v) = patch.description {
        active.description = Set(v);
    }
    if let Some(v) = patch.price {
        active.price = Set(v);
    }
    active.update(db).await?;
    Ok(())
}

/// Deletes a product and every invoice item referencing it. Invoice totals
/// are intentionally left untouched: unit prices on items are historical
/// snapshots and removing the product does not rewrite issued invoices
/// beyond dropping the orphaned rows.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let existing = Product::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))?;

    let txn = db.begin().await?;
    InvoiceItem::delete_many()
        .filter(invoice_item::Column::ProductId.eq(id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}
