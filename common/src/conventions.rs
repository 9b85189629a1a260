//! 出力規約チェック
//!
//! 代替品マーカーや除外行の規約はプロンプトでモデルに指示するだけで、
//! 正規化結果は変えない。ここでは規約違反らしい行を警告として列挙する。

use crate::prompts::{DEPARTMENT_HEADERS, PAYMENT_SUMMARY_HEADER, SUBSTITUTION_MARKER};
use crate::types::ReceiptLineItem;
use regex::Regex;
use std::fmt;

lazy_static::lazy_static! {
    // 末尾の " [SUB]"
    static ref SUB_MARKER_RE: Regex = Regex::new(r"\s*\[SUB\]\s*$").unwrap();
    // [sub] (SUB) [Substituted] など
    static ref LOOSE_SUB_RE: Regex = Regex::new(r"(?i)[\[(]\s*sub(stitut(e|ed|ion))?\s*[\])]").unwrap();
    // Was €2.00, now €1.50
    static ref PRICE_DIFF_RE: Regex = Regex::new(r"(?i)\bwas\s*[€£$]?\s*\d+(\.\d+)?\s*,?\s*now\b").unwrap();
    static ref TAX_RE: Regex = Regex::new(r"(?i)\b(vat|tax)\b").unwrap();
    static ref UNAVAILABLE_RE: Regex = Regex::new(r"(?i)\bunavailable\b").unwrap();
    static ref CURRENCY_RE: Regex = Regex::new(r"[€£$]").unwrap();
}

impl ReceiptLineItem {
    /// 代替品マーカー付きかどうか
    pub fn is_substitution(&self) -> bool {
        SUB_MARKER_RE.is_match(&self.product)
    }

    /// マーカーを除いた商品名
    pub fn base_product(&self) -> &str {
        match SUB_MARKER_RE.find(&self.product) {
            Some(m) => &self.product[..m.start()],
            None => &self.product,
        }
    }
}

/// 規約違反の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConventionIssue {
    DepartmentHeader,
    PriceDifferenceText,
    TaxText,
    UnavailableEntry,
    PaymentSummary,
    MalformedSubstitutionMarker,
    CurrencySymbol,
}

impl fmt::Display for ConventionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConventionIssue::DepartmentHeader => write!(f, "looks like a department header"),
            ConventionIssue::PriceDifferenceText => write!(f, "looks like price-difference text"),
            ConventionIssue::TaxText => write!(f, "looks like a VAT/tax explanation"),
            ConventionIssue::UnavailableEntry => write!(f, "mentions an unavailable product"),
            ConventionIssue::PaymentSummary => write!(f, "belongs to the payment summary"),
            ConventionIssue::MalformedSubstitutionMarker => {
                write!(f, "substitution marker is not a trailing \" {}\"", SUBSTITUTION_MARKER)
            }
            ConventionIssue::CurrencySymbol => write!(f, "product name contains a currency symbol"),
        }
    }
}

/// 1件の警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionWarning {
    /// 行番号（0始まり）
    pub index: usize,
    pub product: String,
    pub issue: ConventionIssue,
}

impl fmt::Display for ConventionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} \"{}\" {}", self.index, self.product, self.issue)
    }
}

/// 規約違反らしい行を列挙（結果は変更しない）
pub fn check_conventions(items: &[ReceiptLineItem]) -> Vec<ConventionWarning> {
    let mut warnings = Vec::new();

    for (index, item) in items.iter().enumerate() {
        for issue in item_issues(item) {
            warnings.push(ConventionWarning {
                index,
                product: item.product.clone(),
                issue,
            });
        }
    }

    warnings
}

fn item_issues(item: &ReceiptLineItem) -> Vec<ConventionIssue> {
    let product = item.product.trim();
    let mut issues = Vec::new();

    if DEPARTMENT_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(product)) {
        issues.push(ConventionIssue::DepartmentHeader);
    }
    if PRICE_DIFF_RE.is_match(product) {
        issues.push(ConventionIssue::PriceDifferenceText);
    }
    if TAX_RE.is_match(product) {
        issues.push(ConventionIssue::TaxText);
    }
    if UNAVAILABLE_RE.is_match(product) {
        issues.push(ConventionIssue::UnavailableEntry);
    }
    if product.to_lowercase().contains(&PAYMENT_SUMMARY_HEADER.to_lowercase()) {
        issues.push(ConventionIssue::PaymentSummary);
    }
    if LOOSE_SUB_RE.is_match(product) && !item.is_substitution() {
        issues.push(ConventionIssue::MalformedSubstitutionMarker);
    }
    if CURRENCY_RE.is_match(product) && !issues.contains(&ConventionIssue::PriceDifferenceText) {
        issues.push(ConventionIssue::CurrencySymbol);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str) -> ReceiptLineItem {
        ReceiptLineItem::new(product, 1.0, 1.0)
    }

    #[test]
    fn test_is_substitution() {
        assert!(item("Shannon Baking Parchment 12M [SUB]").is_substitution());
        assert!(!item("Shannon Baking Parchment 12M").is_substitution());
        assert!(!item("[SUB] Shannon Baking Parchment 12M").is_substitution());
    }

    #[test]
    fn test_base_product() {
        assert_eq!(item("Shannon Baking Parchment 12M [SUB]").base_product(), "Shannon Baking Parchment 12M");
        assert_eq!(item("Tesco Ginger 100g").base_product(), "Tesco Ginger 100g");
    }

    #[test]
    fn test_clean_items_have_no_warnings() {
        let items = vec![
            item("Tesco Irish Chicken Breast Fillets 500G"),
            item("Shannon Baking Parchment 12M [SUB]"),
            item("Sprite Zero Sugar Lemon-Lime Soft Drink 2L"),
        ];
        assert!(check_conventions(&items).is_empty());
    }

    #[test]
    fn test_department_header() {
        let warnings = check_conventions(&[item("Milk"), item("Freezer")]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index, 1);
        assert_eq!(warnings[0].issue, ConventionIssue::DepartmentHeader);
    }

    #[test]
    fn test_price_difference_text() {
        let warnings = check_conventions(&[item("Was €2.00, now €1.50")]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].issue, ConventionIssue::PriceDifferenceText);
    }

    #[test]
    fn test_tax_and_unavailable() {
        let warnings = check_conventions(&[item("VAT included at 23%"), item("Unavailable: Tesco Kiwi")]);
        let issues: Vec<_> = warnings.iter().map(|w| w.issue).collect();
        assert_eq!(issues, vec![ConventionIssue::TaxText, ConventionIssue::UnavailableEntry]);
    }

    #[test]
    fn test_payment_summary() {
        let warnings = check_conventions(&[item("Payment Summary total")]);
        assert_eq!(warnings[0].issue, ConventionIssue::PaymentSummary);
    }

    #[test]
    fn test_malformed_substitution_marker() {
        for product in ["Baking Parchment (SUB)", "Baking Parchment [sub]", "[SUB] Baking Parchment"] {
            let warnings = check_conventions(&[item(product)]);
            assert_eq!(warnings.len(), 1, "{}", product);
            assert_eq!(warnings[0].issue, ConventionIssue::MalformedSubstitutionMarker);
        }
    }

    #[test]
    fn test_currency_symbol() {
        let warnings = check_conventions(&[item("Chicken €5.69")]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].issue, ConventionIssue::CurrencySymbol);
    }

    #[test]
    fn test_warning_display() {
        let warnings = check_conventions(&[item("Fridge")]);
        assert_eq!(warnings[0].to_string(), "item 0 \"Fridge\" looks like a department header");
    }
}
