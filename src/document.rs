use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One renderable line of an invoice: the product description plus the
/// quantity and unit price snapshotted on the invoice item.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLine {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl DocumentLine {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Everything the PDF renderer and the mail sender need to know about an
/// invoice, detached from any persisted record. The test-email path builds
/// one of these synthetically with zero items.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub id: i32,
    pub date: NaiveDate,
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub company_phone: String,
    pub client_name: String,
    pub client_address: String,
    pub client_email: String,
    pub total: Decimal,
    pub lines: Vec<DocumentLine>,
}

impl InvoiceDocument {
    /// Attachment / on-disk file name for the rendered PDF.
    pub fn pdf_filename(&self) -> String {
        format!("invoice_{}.pdf", self.id)
    }

    /// Synthetic zero-item document used by the send-test-email path. The
    /// account's own address doubles as recipient and greeting name.
    pub fn test_message(recipient: &str, company_name: &str) -> Self {
        Self {
            id: 0,
            date: chrono::Utc::now().date_naive(),
            company_name: company_name.to_string(),
            company_address: String::new(),
            company_email: String::new(),
            company_phone: String::new(),
            client_name: recipient.to_string(),
            client_address: String::new(),
            client_email: recipient.to_string(),
            total: Decimal::ZERO,
            lines: Vec::new(),
        }
    }
}

/// Currency rendering with two decimal places, e.g. `$30.00`.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    format!("{}{:.2}", symbol, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies_quantity_and_unit_price() {
        let line = DocumentLine {
            description: "Widget".into(),
            quantity: 3,
            unit_price: dec!(10.0),
        };
        assert_eq!(line.line_total(), dec!(30.0));
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(format_amount("$", dec!(30)), "$30.00");
        assert_eq!(format_amount("$", dec!(9.5)), "$9.50");
        assert_eq!(format_amount("", dec!(0)), "0.00");
    }

    #[test]
    fn test_message_is_zero_item_and_self_addressed() {
        let doc = InvoiceDocument::test_message("me@example.com", "Acme");
        assert_eq!(doc.id, 0);
        assert_eq!(doc.total, Decimal::ZERO);
        assert!(doc.lines.is_empty());
        assert_eq!(doc.client_email, "me@example.com");
        assert_eq!(doc.client_name, "me@example.com");
    }

    #[test]
    fn pdf_filename_is_keyed_by_invoice_id() {
        let doc = InvoiceDocument::test_message("me@example.com", "Acme");
        assert_eq!(doc.pdf_filename(), "invoice_0.pdf");
    }
}
