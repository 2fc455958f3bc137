//! Signatory block and payment details printed under every certificate.

use chrono::NaiveDate;

use super::document::{DocumentNode, Inline, TextSize, BLANK};
use crate::common::format_long_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// Name of the official signing; `None` prints a blank line.
    pub signatory: Option<String>,
    pub signatory_title: String,
    pub amount: String,
    pub issued_on: NaiveDate,
}

impl Footer {
    pub fn nodes(&self) -> Vec<DocumentNode> {
        let amount = match self.amount.trim() {
            "" => format!("PHP {BLANK}"),
            value => format!("PHP {value}"),
        };

        vec![
            DocumentNode::Fill,
            DocumentNode::Signature {
                name: self
                    .signatory
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(|n| format!("HON. {}", n.to_uppercase())),
                title: self.signatory_title.clone(),
            },
            DocumentNode::Spacer(10),
            DocumentNode::Fields(vec![
                ("O.R. No.".to_string(), Inline::blank()),
                ("Amount Paid".to_string(), Inline::text(amount)),
                (
                    "Date Issued".to_string(),
                    Inline::text(format_long_date(self.issued_on)),
                ),
            ]),
            DocumentNode::Spacer(5),
            DocumentNode::Line {
                spans: vec![Inline::text("Not valid without the official dry seal.")],
                align: super::document::Align::Left,
                size: TextSize::Small,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer(amount: &str, signatory: Option<&str>) -> Footer {
        Footer {
            signatory: signatory.map(str::to_string),
            signatory_title: "Punong Barangay".to_string(),
            amount: amount.to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        }
    }

    fn text(footer: &Footer) -> String {
        footer
            .nodes()
            .iter()
            .map(DocumentNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_footer_shows_amount_and_signatory() {
        let rendered = text(&footer("10.00", Some("Ramon Bautista")));
        assert!(rendered.contains("Amount Paid: PHP 10.00"));
        assert!(rendered.contains("HON. RAMON BAUTISTA"));
        assert!(rendered.contains("Date Issued: October 17, 2026"));
        assert!(rendered.contains(&format!("O.R. No.: {BLANK}")));
    }

    #[test]
    fn test_footer_blanks_when_unset() {
        let rendered = text(&footer(" ", None));
        assert!(rendered.contains(&format!("Amount Paid: PHP {BLANK}")));
        assert!(rendered.contains(&format!("{BLANK}\nPunong Barangay")));
    }
}
