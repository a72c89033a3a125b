//! Invoice and bill numbering
//!
//! Numbers are `<PREFIX>-<unix millis>-<4 hex digits>`. The timestamp keeps them
//! roughly chronological; the suffix separates documents created in the same
//! millisecond. Uniqueness is finally enforced by the store.

/// Kind of commercial document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Sales invoice
    Invoice,
    /// Purchase bill
    Bill,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INV",
            DocumentKind::Bill => "PO",
        }
    }
}

/// Build a document number from a wall-clock timestamp and a random salt
pub fn document_number(kind: DocumentKind, timestamp_millis: i64, salt: u32) -> String {
    format!("{}-{}-{:04X}", kind.prefix(), timestamp_millis, salt & 0xFFFF)
}

/// Whether `number` carries the prefix for `kind`
pub fn has_document_prefix(kind: DocumentKind, number: &str) -> bool {
    number
        .strip_prefix(kind.prefix())
        .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_and_bill_prefixes() {
        assert_eq!(
            document_number(DocumentKind::Invoice, 1_700_000_000_000, 0xBEEF),
            "INV-1700000000000-BEEF"
        );
        assert_eq!(
            document_number(DocumentKind::Bill, 1_700_000_000_000, 0x1_0001),
            "PO-1700000000000-0001"
        );
    }

    #[test]
    fn prefix_check() {
        assert!(has_document_prefix(DocumentKind::Invoice, "INV-1"));
        assert!(!has_document_prefix(DocumentKind::Invoice, "INV-"));
        assert!(!has_document_prefix(DocumentKind::Invoice, "PO-1"));
        assert!(has_document_prefix(DocumentKind::Bill, "PO-42-00AA"));
    }

    #[test]
    fn salt_distinguishes_same_millisecond() {
        let a = document_number(DocumentKind::Invoice, 5, 1);
        let b = document_number(DocumentKind::Invoice, 5, 2);
        assert_ne!(a, b);
    }
}
