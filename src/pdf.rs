//! Invoice PDF rendering.
//!
//! Fixed single-column US-Letter layout: centered company title, invoice
//! number and date, optional company contact lines, a "Billed To" block, a
//! line-item table with page-break handling, and a right-aligned grand
//! total. The layout is a pure function of the document; only the creation
//! timestamp in the PDF metadata varies between renders.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt};
use std::io::BufWriter;

use crate::document::{format_amount, InvoiceDocument};
use crate::errors::ServiceError;

// US Letter, in PDF points.
const PAGE_W: f32 = 612.0;
const PAGE_H: f32 = 792.0;

const MARGIN_X: f32 = 50.0;
// Cursor position at the top of a fresh page.
const TOP_Y: f32 = PAGE_H - 50.0;
// Start a new page when the cursor drops below this.
const BREAK_Y: f32 = 100.0;
const ROW_STEP: f32 = 15.0;

// Table columns: left edges for the header, right edges for numeric cells.
const COL_QTY: f32 = 300.0;
const COL_UNIT_PRICE: f32 = 350.0;
const COL_LINE_TOTAL: f32 = 450.0;
const RIGHT_QTY: f32 = 330.0;
const RIGHT_UNIT_PRICE: f32 = 410.0;
const RIGHT_LINE_TOTAL: f32 = 520.0;
const RULE_END_X: f32 = 550.0;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const TABLE_SIZE: f32 = 10.0;

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn push_line(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, x: f32, y: f32) {
    layer.use_text(text, size, mm(x), mm(y), font);
}

/// printpdf exposes no metrics for the built-in fonts; a per-character
/// estimate is close enough for numeric columns and short headings.
fn text_width_est(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn push_line_right(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size: f32,
    x_right: f32,
    y: f32,
) {
    let x = (x_right - text_width_est(text, size)).max(0.0);
    push_line(layer, font, text, size, x, y);
}

fn push_line_centered(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, y: f32) {
    let x = ((PAGE_W - text_width_est(text, size)) / 2.0).max(0.0);
    push_line(layer, font, text, size, x, y);
}

fn draw_rule(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(x1), mm(y)), false),
            (Point::new(mm(x2), mm(y)), false),
        ],
        is_closed: false,
    });
}

fn table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
    for (text, x) in [
        ("Description", MARGIN_X),
        ("Qty", COL_QTY),
        ("Unit Price", COL_UNIT_PRICE),
        ("Line Total", COL_LINE_TOTAL),
    ] {
        push_line(layer, bold, text, TABLE_SIZE, x, y);
    }
    draw_rule(layer, MARGIN_X, RULE_END_X, y - 2.0);
}

/// Renders one invoice into PDF bytes.
///
/// `fallback_company` is used as the title when the invoice's company-name
/// snapshot is blank. `currency` prefixes every money cell.
pub fn render_invoice_pdf(
    inv: &InvoiceDocument,
    fallback_company: &str,
    currency: &str,
) -> Result<Vec<u8>, ServiceError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Invoice #{}", inv.id),
        mm(PAGE_W),
        mm(PAGE_H),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ServiceError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ServiceError::Pdf(e.to_string()))?;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    // Header
    let title = if inv.company_name.is_empty() {
        fallback_company
    } else {
        inv.company_name.as_str()
    };
    push_line_centered(&layer, &bold, title, TITLE_SIZE, TOP_Y);
    push_line(
        &layer,
        &font,
        &format!("Invoice #{}    Date: {}", inv.id, inv.date),
        BODY_SIZE,
        MARGIN_X,
        PAGE_H - 80.0,
    );

    // Company contact lines, rendered only when present
    let mut y = PAGE_H - 110.0;
    for field in [&inv.company_address, &inv.company_email, &inv.company_phone] {
        if !field.is_empty() {
            push_line(&layer, &font, field, BODY_SIZE, MARGIN_X, y);
            y -= ROW_STEP;
        }
    }

    // Client block
    push_line(&layer, &font, "Billed To:", BODY_SIZE, MARGIN_X, y - 10.0);
    y -= 30.0;
    push_line(&layer, &font, &inv.client_name, BODY_SIZE, MARGIN_X + 20.0, y);
    if !inv.client_address.is_empty() {
        push_line(
            &layer,
            &font,
            &inv.client_address,
            BODY_SIZE,
            MARGIN_X + 20.0,
            y - ROW_STEP,
        );
        y -= ROW_STEP;
    }
    push_line(
        &layer,
        &font,
        &inv.client_email,
        BODY_SIZE,
        MARGIN_X + 20.0,
        y - 30.0,
    );
    y -= 50.0;

    // Line-item table
    table_header(&layer, &bold, y);
    y -= 20.0;
    for line in &inv.lines {
        push_line(&layer, &font, &line.description, TABLE_SIZE, MARGIN_X, y);
        push_line_right(&layer, &font, &line.quantity.to_string(), TABLE_SIZE, RIGHT_QTY, y);
        push_line_right(
            &layer,
            &font,
            &format_amount(currency, line.unit_price),
            TABLE_SIZE,
            RIGHT_UNIT_PRICE,
            y,
        );
        push_line_right(
            &layer,
            &font,
            &format_amount(currency, line.line_total()),
            TABLE_SIZE,
            RIGHT_LINE_TOTAL,
            y,
        );
        y -= ROW_STEP;
        if y < BREAK_Y {
            let (page, page_layer) = doc.add_page(mm(PAGE_W), mm(PAGE_H), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = TOP_Y;
            // Repeat the column header so continuation pages stay readable.
            table_header(&layer, &bold, y);
            y -= 20.0;
        }
    }

    // Grand total
    push_line_right(
        &layer,
        &bold,
        &format!("Grand Total: {}", format_amount(currency, inv.total)),
        BODY_SIZE,
        RIGHT_LINE_TOTAL,
        y - 10.0,
    );

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes))
        .map_err(|e| ServiceError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentLine;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_document(line_count: usize) -> InvoiceDocument {
        InvoiceDocument {
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            company_name: "Acme Corp".into(),
            company_address: "1 Main St".into(),
            company_email: "billing@acme.test".into(),
            company_phone: "555-0100".into(),
            client_name: "Jane Doe".into(),
            client_address: "2 Oak Ave".into(),
            client_email: "jane@example.com".into(),
            total: dec!(30.0),
            lines: (0..line_count)
                .map(|i| DocumentLine {
                    description: format!("Item {}", i),
                    quantity: 1,
                    unit_price: dec!(10.0),
                })
                .collect(),
        }
    }

    #[test]
    fn renders_nonempty_pdf() {
        let bytes = render_invoice_pdf(&sample_document(3), "Fallback Co", "$").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn rendering_reproduces_equivalent_layout() {
        // The PDF metadata carries a creation timestamp, so byte equality
        // is not guaranteed; the layout payload is, which fixes the size.
        let doc = sample_document(5);
        let a = render_invoice_pdf(&doc, "Fallback Co", "$").unwrap();
        let b = render_invoice_pdf(&doc, "Fallback Co", "$").unwrap();
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn long_item_lists_paginate() {
        // Enough rows to push the cursor below the break threshold at least
        // twice; the document must grow compared to a short one.
        let short = render_invoice_pdf(&sample_document(3), "Fallback Co", "$").unwrap();
        let long = render_invoice_pdf(&sample_document(90), "Fallback Co", "$").unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn zero_item_invoice_renders() {
        let mut doc = sample_document(0);
        doc.total = dec!(0);
        let bytes = render_invoice_pdf(&doc, "Fallback Co", "$").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn blank_company_name_falls_back_to_configured_default() {
        let mut doc = sample_document(1);
        doc.company_name.clear();
        // Built-in fonts are not subset, so the title text is embedded
        // uncompressed and must differ between the two renders.
        let with_fallback = render_invoice_pdf(&doc, "Fallback Co", "$").unwrap();
        doc.company_name = "Acme Corp".into();
        let with_snapshot = render_invoice_pdf(&doc, "Fallback Co", "$").unwrap();
        assert_ne!(with_fallback, with_snapshot);
    }
}
