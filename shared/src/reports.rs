//! Dashboard and financial report aggregation
//!
//! Every figure is a full scan over the records handed in; nothing is
//! maintained incrementally.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Expense, Product, Purchase, Sale};
use crate::types::{DateRange, DocumentStatus};

/// How expenses are matched to "this month" on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseMonthRule {
    /// Calendar month only; the same month of earlier years also counts
    #[default]
    MonthOnly,
    MonthAndYear,
}

impl ExpenseMonthRule {
    fn matches<Tz: TimeZone>(&self, at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        let local = at.with_timezone(&now.timezone());
        match self {
            ExpenseMonthRule::MonthOnly => local.month() == now.month(),
            ExpenseMonthRule::MonthAndYear => {
                local.month() == now.month() && local.year() == now.year()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub outstanding_amount: Decimal,
    pub monthly_expenses: Decimal,
    pub vat_collected: Decimal,
    pub overdue_count: u64,
    pub low_stock_products: u64,
    pub total_products: u64,
    pub total_customers: u64,
}

impl DashboardStats {
    /// `now` fixes both the current month and the time zone expense dates are
    /// read in.
    pub fn compute<Tz: TimeZone>(
        sales: &[Sale],
        expenses: &[Expense],
        products: &[Product],
        total_customers: u64,
        now: &DateTime<Tz>,
        rule: ExpenseMonthRule,
    ) -> Self {
        let mut stats = DashboardStats {
            total_products: products.len() as u64,
            total_customers,
            ..Default::default()
        };

        for sale in sales {
            match sale.status {
                DocumentStatus::Paid => {
                    stats.total_revenue += sale.total_amount;
                    stats.vat_collected += sale.vat_amount;
                }
                DocumentStatus::Overdue => {
                    stats.outstanding_amount += sale.total_amount;
                    stats.overdue_count += 1;
                }
                DocumentStatus::Pending => stats.outstanding_amount += sale.total_amount,
                DocumentStatus::Cancelled => {}
            }
        }

        stats.monthly_expenses = expenses
            .iter()
            .filter(|e| rule.matches(&e.expense_date, now))
            .map(|e| e.amount)
            .sum();

        stats.low_stock_products = products.iter().filter(|p| p.is_low_stock()).count() as u64;

        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossReport {
    pub period: DateRange,
    pub total_revenue: Decimal,
    /// All purchases in the period, standing in for cost of goods sold
    pub total_purchases: Decimal,
    pub total_expenses: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
}

impl ProfitLossReport {
    pub fn compute(
        sales: &[Sale],
        purchases: &[Purchase],
        expenses: &[Expense],
        period: DateRange,
    ) -> Self {
        let total_revenue = paid_sales(sales, &period).map(|s| s.total_amount).sum();
        let total_purchases = purchases
            .iter()
            .filter(|p| period.contains(&p.purchase_date))
            .map(|p| p.total_amount)
            .sum();
        let total_expenses = expenses
            .iter()
            .filter(|e| period.contains(&e.expense_date))
            .map(|e| e.amount)
            .sum();

        Self::from_totals(total_revenue, total_purchases, total_expenses, period)
    }

    pub fn from_totals(
        total_revenue: Decimal,
        total_purchases: Decimal,
        total_expenses: Decimal,
        period: DateRange,
    ) -> Self {
        let gross_profit = total_revenue - total_purchases;
        Self {
            period,
            total_revenue,
            total_purchases,
            total_expenses,
            gross_profit,
            net_profit: gross_profit - total_expenses,
        }
    }

    pub fn lines(&self) -> Vec<ReportLine> {
        vec![
            ReportLine::new("Total Revenue", self.total_revenue),
            ReportLine::new("Total Purchases", self.total_purchases),
            ReportLine::new("Gross Profit", self.gross_profit),
            ReportLine::new("Total Expenses", self.total_expenses),
            ReportLine::new("Net Profit", self.net_profit),
        ]
    }
}

/// Which way the net VAT flows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatPosition {
    /// Owed to the tax authority (includes a zero balance)
    #[default]
    Payable,
    Refundable,
}

impl VatPosition {
    pub fn of(net_vat: Decimal) -> Self {
        if net_vat >= Decimal::ZERO {
            VatPosition::Payable
        } else {
            VatPosition::Refundable
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatReport {
    pub period: DateRange,
    pub vat_collected: Decimal,
    pub vat_paid: Decimal,
    pub vat_on_expenses: Decimal,
    pub total_vat_paid: Decimal,
    #[serde(rename = "netVATPayable")]
    pub net_vat_payable: Decimal,
    pub position: VatPosition,
}

impl VatReport {
    pub fn compute(
        sales: &[Sale],
        purchases: &[Purchase],
        expenses: &[Expense],
        period: DateRange,
    ) -> Self {
        let vat_collected = paid_sales(sales, &period).map(|s| s.vat_amount).sum();
        let vat_paid = purchases
            .iter()
            .filter(|p| period.contains(&p.purchase_date))
            .map(|p| p.vat_amount)
            .sum();
        let vat_on_expenses = expenses
            .iter()
            .filter(|e| period.contains(&e.expense_date))
            .map(Expense::claimable_vat)
            .sum();

        Self::from_totals(vat_collected, vat_paid, vat_on_expenses, period)
    }

    pub fn from_totals(
        vat_collected: Decimal,
        vat_paid: Decimal,
        vat_on_expenses: Decimal,
        period: DateRange,
    ) -> Self {
        let net_vat_payable = vat_collected - vat_paid - vat_on_expenses;
        Self {
            period,
            vat_collected,
            vat_paid,
            vat_on_expenses,
            total_vat_paid: vat_paid + vat_on_expenses,
            net_vat_payable,
            position: VatPosition::of(net_vat_payable),
        }
    }

    pub fn lines(&self) -> Vec<ReportLine> {
        vec![
            ReportLine::new("VAT Collected", self.vat_collected),
            ReportLine::new("VAT Paid on Purchases", self.vat_paid),
            ReportLine::new("VAT on Expenses", self.vat_on_expenses),
            ReportLine::new("Total VAT Paid", self.total_vat_paid),
            ReportLine::new("Net VAT Payable", self.net_vat_payable),
        ]
    }
}

/// One row of an exported report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub metric: String,
    pub amount: Decimal,
}

impl ReportLine {
    pub fn new(metric: &str, amount: Decimal) -> Self {
        Self {
            metric: metric.to_string(),
            amount,
        }
    }
}

fn paid_sales<'a>(sales: &'a [Sale], period: &'a DateRange) -> impl Iterator<Item = &'a Sale> {
    sales
        .iter()
        .filter(move |s| s.status == DocumentStatus::Paid && period.contains(&s.sale_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sale(status: DocumentStatus, total: &str, vat: &str) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            invoice_number: format!("INV-{}", Uuid::new_v4()),
            customer_id: Uuid::new_v4(),
            sale_date: Utc::now(),
            due_date: None,
            subtotal: dec(total) - dec(vat),
            vat_amount: dec(vat),
            total_amount: dec(total),
            status,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn expense(amount: &str, at: DateTime<Utc>) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: "Fuel".into(),
            description: None,
            amount: dec(amount),
            category: "Transport".into(),
            expense_date: at,
            receipt_path: None,
            is_vat_applicable: false,
            vat_amount: Decimal::ZERO,
            created_at: at,
        }
    }

    #[test]
    fn dashboard_splits_sales_by_status() {
        let sales = vec![
            sale(DocumentStatus::Paid, "113", "13"),
            sale(DocumentStatus::Pending, "50", "0"),
            sale(DocumentStatus::Overdue, "20", "0"),
            sale(DocumentStatus::Cancelled, "999", "99"),
        ];
        let now = Utc::now();
        let stats = DashboardStats::compute(&sales, &[], &[], 3, &now, ExpenseMonthRule::MonthOnly);
        assert_eq!(stats.total_revenue, dec("113"));
        assert_eq!(stats.vat_collected, dec("13"));
        assert_eq!(stats.outstanding_amount, dec("70"));
        assert_eq!(stats.overdue_count, 1);
        assert_eq!(stats.total_customers, 3);
    }

    #[test]
    fn monthly_expenses_rule() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let expenses = vec![
            expense("100", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            expense("40", Utc.with_ymd_and_hms(2023, 3, 9, 0, 0, 0).unwrap()),
            expense("7", Utc.with_ymd_and_hms(2024, 2, 9, 0, 0, 0).unwrap()),
        ];
        let month_only =
            DashboardStats::compute(&[], &expenses, &[], 0, &now, ExpenseMonthRule::MonthOnly);
        assert_eq!(month_only.monthly_expenses, dec("140"));
        let strict =
            DashboardStats::compute(&[], &expenses, &[], 0, &now, ExpenseMonthRule::MonthAndYear);
        assert_eq!(strict.monthly_expenses, dec("100"));
    }

    #[test]
    fn expense_month_is_read_in_local_time() {
        // 2024-02-29 20:00 UTC is already March 1st in Kathmandu (+05:45)
        let kathmandu = FixedOffset::east_opt(5 * 3600 + 45 * 60).unwrap();
        let now = kathmandu.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let expenses = vec![expense(
            "25",
            Utc.with_ymd_and_hms(2024, 2, 29, 20, 0, 0).unwrap(),
        )];
        let stats =
            DashboardStats::compute(&[], &expenses, &[], 0, &now, ExpenseMonthRule::MonthAndYear);
        assert_eq!(stats.monthly_expenses, dec("25"));
    }

    #[test]
    fn net_vat_payable() {
        let report = VatReport::from_totals(dec("130"), dec("50"), dec("10"), DateRange::default());
        assert_eq!(report.net_vat_payable, dec("70"));
        assert_eq!(report.total_vat_paid, dec("60"));
        assert_eq!(report.position, VatPosition::Payable);

        let refund = VatReport::from_totals(dec("10"), dec("50"), dec("0"), DateRange::default());
        assert_eq!(refund.net_vat_payable, dec("-40"));
        assert_eq!(refund.position, VatPosition::Refundable);
    }

    #[test]
    fn vat_report_serializes_legacy_field_name() {
        let report = VatReport::from_totals(dec("1"), dec("0"), dec("0"), DateRange::default());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("netVATPayable").is_some());
        assert_eq!(json["position"], "payable");
    }

    #[test]
    fn profit_and_loss_respects_period() {
        let mut old = sale(DocumentStatus::Paid, "500", "0");
        old.sale_date = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let sales = vec![sale(DocumentStatus::Paid, "1000", "0"), old];
        let expenses = vec![expense("100", Utc::now())];
        let today = Utc::now().date_naive();
        let period = DateRange::new(Some(today), None);

        let report = ProfitLossReport::compute(&sales, &[], &expenses, period);
        assert_eq!(report.total_revenue, dec("1000"));
        assert_eq!(report.net_profit, dec("900"));

        let all = ProfitLossReport::compute(&sales, &[], &expenses, DateRange::default());
        assert_eq!(all.total_revenue, dec("1500"));
        assert_eq!(all.lines().len(), 5);
    }
}
