mod common;

use chrono::NaiveDate;
use common::{seed_client, seed_product, test_config, test_db};
use invoicing_api::errors::ServiceError;
use invoicing_api::services::invoices::{
    create_invoice, delete_invoice, get_invoice, list_invoices, load_document,
    render_and_store_pdf, update_invoice, InvoiceItemPayload, InvoiceUpdate, NewInvoice,
};
use rust_decimal_macros::dec;

fn item(product_id: i32, quantity: i32, unit_price: rust_decimal::Decimal) -> InvoiceItemPayload {
    InvoiceItemPayload {
        product_id,
        quantity,
        unit_price,
    }
}

fn new_invoice(client_id: i32, date: &str, items: Vec<InvoiceItemPayload>) -> NewInvoice {
    NewInvoice {
        client_id,
        date: date.parse().unwrap(),
        company_name: "Acme Corp".to_string(),
        company_address: String::new(),
        company_email: String::new(),
        company_phone: String::new(),
        items,
    }
}

#[tokio::test]
async fn create_computes_total_server_side() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;
    assert_eq!(client_id, 1);
    assert_eq!(product_id, 1);

    let (id, total) = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 3, dec!(10.0))]),
    )
    .await
    .unwrap();

    assert_eq!(id, 1);
    assert_eq!(total, dec!(30.0));

    let detail = get_invoice(&db, id).await.unwrap();
    assert_eq!(detail.total, dec!(30.0));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(detail.company_name, "Acme Corp");
}

#[tokio::test]
async fn zero_item_invoice_has_zero_total() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;

    let (_, total) = create_invoice(&db, new_invoice(client_id, "2024-01-01", vec![]))
        .await
        .unwrap();
    assert_eq!(total, dec!(0));
}

#[tokio::test]
async fn update_replaces_item_set_and_recomputes_total() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;

    let (id, _) = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 3, dec!(10.0))]),
    )
    .await
    .unwrap();

    update_invoice(
        &db,
        id,
        InvoiceUpdate {
            date: "2024-01-01".parse().unwrap(),
            company_name: None,
            company_address: None,
            company_email: None,
            company_phone: None,
            items: vec![item(product_id, 1, dec!(10.0))],
        },
    )
    .await
    .unwrap();

    let detail = get_invoice(&db, id).await.unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].quantity, 1);
    assert_eq!(detail.total, dec!(10.0));
    // Snapshot fields absent from the payload keep their stored copy.
    assert_eq!(detail.company_name, "Acme Corp");
}

#[tokio::test]
async fn unit_price_is_a_snapshot_independent_of_product_changes() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;

    let (id, _) = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 2, dec!(10.0))]),
    )
    .await
    .unwrap();

    invoicing_api::services::products::update_product(
        &db,
        product_id,
        invoicing_api::services::products::ProductPatch {
            price: Some(dec!(99.0)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let detail = get_invoice(&db, id).await.unwrap();
    assert_eq!(detail.items[0].unit_price, dec!(10.0));
    assert_eq!(detail.total, dec!(20.0));
}

#[tokio::test]
async fn list_is_sorted_by_date_descending_with_client_names() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;

    create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 1, dec!(10.0))]),
    )
    .await
    .unwrap();
    create_invoice(
        &db,
        new_invoice(client_id, "2024-02-01", vec![item(product_id, 2, dec!(10.0))]),
    )
    .await
    .unwrap();

    let rows = list_invoices(&db).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(rows[0].total, dec!(20.0));
    assert_eq!(rows[0].client, "Acme");
}

#[tokio::test]
async fn missing_invoice_is_not_found() {
    let db = test_db().await;
    let err = get_invoice(&db, 999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = delete_invoice(&db, 999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn create_requires_existing_client_and_products() {
    let db = test_db().await;
    let err = create_invoice(&db, new_invoice(42, "2024-01-01", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let err = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(42, 1, dec!(10.0))]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn invalid_items_are_rejected_before_any_write() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;

    let err = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 0, dec!(10.0))]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    assert!(list_invoices(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn document_view_joins_client_and_product_names() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;

    let (id, _) = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 3, dec!(10.0))]),
    )
    .await
    .unwrap();

    let doc = load_document(&db, id).await.unwrap();
    assert_eq!(doc.client_name, "Acme");
    assert_eq!(doc.client_email, "a@x.com");
    assert_eq!(doc.lines.len(), 1);
    assert_eq!(doc.lines[0].description, "Widget");
    assert_eq!(doc.lines[0].line_total(), dec!(30.0));
}

#[tokio::test]
async fn rendering_stores_the_pdf_and_is_idempotent() {
    let db = test_db().await;
    let client_id = seed_client(&db, "Acme", "a@x.com").await;
    let product_id = seed_product(&db, "Widget", dec!(10.0)).await;
    let (id, _) = create_invoice(
        &db,
        new_invoice(client_id, "2024-01-01", vec![item(product_id, 3, dec!(10.0))]),
    )
    .await
    .unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let cfg = test_config(tmp.path());

    let (doc, first) = render_and_store_pdf(&db, &cfg, id).await.unwrap();
    let stored = tmp.path().join(doc.pdf_filename());
    assert!(stored.exists());
    assert!(first.starts_with(b"%PDF"));

    // Same invoice state must reproduce an equivalent document; the PDF
    // metadata timestamp keeps the bytes from being identical.
    let (_, second) = render_and_store_pdf(&db, &cfg, id).await.unwrap();
    assert_eq!(first.len(), second.len());
    assert_eq!(std::fs::read(stored).unwrap(), second);
}
