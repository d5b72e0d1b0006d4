use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::config::AppConfig;
use crate::document::{DocumentLine, InvoiceDocument};
use crate::entities::{
    client::Entity as Client,
    invoice::{self, Entity as Invoice},
    invoice_item::{self, Entity as InvoiceItem},
    product::Entity as Product,
};
use crate::errors::ServiceError;
use crate::pdf::render_invoice_pdf;

/// One line item as it appears on the wire, both inbound (create/update)
/// and outbound (invoice detail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemPayload {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct NewInvoice {
    pub client_id: i32,
    pub date: NaiveDate,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(default)]
    pub company_phone: String,
    pub items: Vec<InvoiceItemPayload>,
}

/// Full-replace update. The snapshot fields are patch-shaped (absent means
/// keep the stored copy); the item set always replaces the old one and the
/// total is recomputed from it.
#[derive(Debug, Deserialize)]
pub struct InvoiceUpdate {
    pub date: NaiveDate,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub items: Vec<InvoiceItemPayload>,
}

/// Row shape for the invoice list: client is flattened to its name.
#[derive(Debug, Serialize)]
pub struct InvoiceSummary {
    pub id: i32,
    pub client: String,
    pub date: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub client_id: i32,
    pub date: NaiveDate,
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub company_phone: String,
    pub total: Decimal,
    pub items: Vec<InvoiceItemPayload>,
}

/// Grand total over a line-item set. Client-supplied totals are never
/// trusted; this runs on every create and update.
pub fn compute_total(items: &[InvoiceItemPayload]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.unit_price)
        .sum()
}

fn validate_items(items: &[InvoiceItemPayload]) -> Result<(), ServiceError> {
    for item in items {
        if item.quantity < 1 {
            return Err(ServiceError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(ServiceError::Validation(
                "unit_price must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}

async fn ensure_products_exist<C: ConnectionTrait>(
    conn: &C,
    items: &[InvoiceItemPayload],
) -> Result<(), ServiceError> {
    let mut seen = Vec::new();
    for item in items {
        if seen.contains(&item.product_id) {
            continue;
        }
        seen.push(item.product_id);
        Product::find_by_id(item.product_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {}", item.product_id)))?;
    }
    Ok(())
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    invoice_id: i32,
    items: &[InvoiceItemPayload],
) -> Result<(), ServiceError> {
    for item in items {
        invoice_item::ActiveModel {
            invoice_id: Set(invoice_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

pub async fn list_invoices(db: &DatabaseConnection) -> Result<Vec<InvoiceSummary>, ServiceError> {
    let rows = Invoice::find()
        .find_also_related(Client)
        .order_by_desc(invoice::Column::Date)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(inv, client)| InvoiceSummary {
            id: inv.id,
            client: client.map(|c| c.name).unwrap_or_default(),
            date: inv.date,
            total: inv.total,
        })
        .collect())
}

/// Creates an invoice and its item rows atomically, computing the total
/// server-side. Returns the new id together with the computed total.
pub async fn create_invoice(
    db: &DatabaseConnection,
    new: NewInvoice,
) -> Result<(i32, Decimal), ServiceError> {
    validate_items(&new.items)?;

    let txn = db.begin().await?;

    Client::find_by_id(new.client_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("client {}", new.client_id)))?;
    ensure_products_exist(&txn, &new.items).await?;

    let total = compute_total(&new.items);
    let inserted = invoice::ActiveModel {
        client_id: Set(new.client_id),
        date: Set(new.date),
        company_name: Set(new.company_name),
        company_address: Set(new.company_address),
        company_email: Set(new.company_email),
        company_phone: Set(new.company_phone),
        total: Set(total),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    insert_items(&txn, inserted.id, &new.items).await?;
    txn.commit().await?;

    info!(invoice_id = inserted.id, %total, "invoice created");
    Ok((inserted.id, total))
}

pub async fn get_invoice(db: &DatabaseConnection, id: i32) -> Result<InvoiceDetail, ServiceError> {
    let inv = Invoice::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("invoice {id}")))?;

    let items = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(id))
        .order_by_asc(invoice_item::Column::Id)
        .all(db)
        .await?;

    Ok(InvoiceDetail {
        id: inv.id,
        client_id: inv.client_id,
        date: inv.date,
        company_name: inv.company_name,
        company_address: inv.company_address,
        company_email: inv.company_email,
        company_phone: inv.company_phone,
        total: inv.total,
        items: items
            .into_iter()
            .map(|item| InvoiceItemPayload {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
    })
}

/// Replaces the invoice's item set wholesale and recomputes the total in
/// the same transaction. Items missing from the payload are gone after.
pub async fn update_invoice(
    db: &DatabaseConnection,
    id: i32,
    update: InvoiceUpdate,
) -> Result<(), ServiceError> {
    validate_items(&update.items)?;

    let existing = Invoice::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("invoice {id}")))?;

    let txn = db.begin().await?;
    ensure_products_exist(&txn, &update.items).await?;

    InvoiceItem::delete_many()
        .filter(invoice_item::Column::InvoiceId.eq(id))
        .exec(&txn)
        .await?;
    insert_items(&txn, id, &update.items).await?;

    let total = compute_total(&update.items);
    let mut active: invoice::ActiveModel = existing.into();
    active.date = Set(update.date);
    if let Some(v) = update.company_name {
        active.company_name = Set(v);
    }
    if let Some(v) = update.company_address {
        active.company_address = Set(v);
    }
    if let Some(v) = update.company_email {
        active.company_email = Set(v);
    }
    if let Some(v) = update.company_phone {
        active.company_phone = Set(v);
    }
    active.total = Set(total);
    active.update(&txn).await?;

    txn.commit().await?;
    info!(invoice_id = id, %total, "invoice replaced");
    Ok(())
}

pub async fn delete_invoice(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let existing = Invoice::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("invoice {id}")))?;

    let txn = db.begin().await?;
    InvoiceItem::delete_many()
        .filter(invoice_item::Column::InvoiceId.eq(id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Assembles the renderable/mailable view of an invoice: the snapshot
/// fields, the owning client, and each item joined with its product name.
pub async fn load_document(
    db: &DatabaseConnection,
    id: i32,
) -> Result<InvoiceDocument, ServiceError> {
    let (inv, client) = Invoice::find_by_id(id)
        .find_also_related(Client)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("invoice {id}")))?;
    let client =
        client.ok_or_else(|| ServiceError::NotFound(format!("client for invoice {id}")))?;

    let items = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(id))
        .order_by_asc(invoice_item::Column::Id)
        .find_also_related(Product)
        .all(db)
        .await?;

    Ok(InvoiceDocument {
        id: inv.id,
        date: inv.date,
        company_name: inv.company_name,
        company_address: inv.company_address,
        company_email: inv.company_email,
        company_phone: inv.company_phone,
        client_name: client.name,
        client_address: client.address,
        client_email: client.email,
        total: inv.total,
        lines: items
            .into_iter()
            .map(|(item, product)| DocumentLine {
                description: product.map(|p| p.name).unwrap_or_default(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
    })
}

/// Renders the invoice PDF and stores it under the configured directory as
/// `invoice_<id>.pdf`, overwriting any previous render. Returns the
/// document view together with the fresh bytes.
pub async fn render_and_store_pdf(
    db: &DatabaseConnection,
    cfg: &AppConfig,
    id: i32,
) -> Result<(InvoiceDocument, Vec<u8>), ServiceError> {
    let doc = load_document(db, id).await?;
    let bytes = render_invoice_pdf(&doc, &cfg.default_company_name, &cfg.currency_symbol)?;

    let dir = PathBuf::from(&cfg.pdf_dir);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ServiceError::Internal(format!("creating pdf dir: {e}")))?;
    let path = dir.join(doc.pdf_filename());
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ServiceError::Internal(format!("writing {}: {e}", path.display())))?;

    info!(invoice_id = id, path = %path.display(), "invoice pdf rendered");
    Ok((doc, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(product_id: i32, quantity: i32, unit_price: Decimal) -> InvoiceItemPayload {
        InvoiceItemPayload {
            product_id,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn total_sums_quantity_times_unit_price() {
        let items = vec![item(1, 3, dec!(10.0)), item(2, 2, dec!(4.25))];
        assert_eq!(compute_total(&items), dec!(38.50));
    }

    #[test]
    fn total_of_zero_items_is_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = validate_items(&[item(1, 0, dec!(10.0))]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let err = validate_items(&[item(1, 1, dec!(-0.01))]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn zero_unit_price_is_allowed() {
        assert!(validate_items(&[item(1, 1, dec!(0))]).is_ok());
    }
}
