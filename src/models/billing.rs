// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "debt_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebtKind {
    CommonExpense, // Gasto comum rateado por alícuota
    Parking,       // Taxa fixa de estacionamento
}

// --- Structs ---

/// Morador: identidade externa (cadastro pertence a outro módulo); o core
/// só lê alícuota e vaga de estacionamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,
    #[schema(example = "Apto 402")]
    pub unit: String,
    #[schema(example = "12.50")]
    pub alicuota: Decimal,
    pub has_parking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: i64,
    pub status: ExpenseStatus,
    #[schema(example = "2025-06")]
    pub period: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: Uuid,
    pub resident_id: Uuid,
    #[schema(example = "2025-06")]
    pub period: String,
    pub kind: DebtKind,
    pub amount: i64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

/// Linha do extrato consolidado do condomínio. Append-only: o saldo do
/// período N alimenta o cálculo do período N+1.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatement {
    pub id: Uuid,
    #[schema(example = "2025-06")]
    pub period: String,
    pub income: i64,
    pub expenses: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Valida o rótulo de período `YYYY-MM`.
pub fn validate_period(period: &str) -> Result<(), AppError> {
    let ok = NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_ok()
        && period.len() == 7;
    if ok {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Período inválido: '{period}' (esperado YYYY-MM)."
        )))
    }
}

/// Cota de um morador no total de gastos: `round(total * alicuota / 100)`,
/// arredondamento half-up para a unidade monetária inteira. A soma das
/// cotas arredondadas pode divergir do total por centavos; a diferença não
/// é redistribuída.
pub fn prorate_share(total_expenses: i64, alicuota: Decimal) -> Result<i64, AppError> {
    let share = (Decimal::from(total_expenses) * alicuota / Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    share
        .to_i64()
        .ok_or_else(|| anyhow::anyhow!("cota fora do intervalo de i64: {share}").into())
}

/// Saldo acumulado: saldo anterior + receitas − despesas do período.
pub fn running_balance(previous_balance: i64, income: i64, expenses: i64) -> i64 {
    previous_balance + income - expenses
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn prorates_by_alicuota() {
        // 12,5% de 1.000.000 = 125.000
        assert_eq!(prorate_share(1_000_000, dec!(12.5)).unwrap(), 125_000);
        assert_eq!(prorate_share(1_000_000, dec!(100)).unwrap(), 1_000_000);
        assert_eq!(prorate_share(1_000_000, dec!(0)).unwrap(), 0);
    }

    #[test]
    fn rounds_half_up() {
        // 10% de 5 = 0,5 -> 1
        assert_eq!(prorate_share(5, dec!(10)).unwrap(), 1);
        // 10% de 4 = 0,4 -> 0
        assert_eq!(prorate_share(4, dec!(10)).unwrap(), 0);
        // 12,34% de 999 = 123,2766 -> 123
        assert_eq!(prorate_share(999, dec!(12.34)).unwrap(), 123);
        // 3,33% de 1.000.001 = 33.300,0333 -> 33.300
        assert_eq!(prorate_share(1_000_001, dec!(3.33)).unwrap(), 33_300);
    }

    #[test]
    fn rounding_drift_is_not_redistributed() {
        // Três alícuotas de 33,33% sobre 100: cada cota vira 33 e o total
        // rateado (99) fica aquém do gasto (100).
        let share = prorate_share(100, dec!(33.33)).unwrap();
        assert_eq!(share, 33);
        assert_eq!(share * 3, 99);
    }

    #[test]
    fn balance_carries_over() {
        assert_eq!(running_balance(0, 500_000, 300_000), 200_000);
        assert_eq!(running_balance(200_000, 100_000, 400_000), -100_000);
    }

    #[test]
    fn period_labels() {
        assert!(validate_period("2025-06").is_ok());
        assert!(validate_period("1999-12").is_ok());
        for bad in ["2025-13", "2025-00", "2025-6", "junho", "2025/06", "2025-06-01", ""] {
            assert!(validate_period(bad).is_err(), "{bad}");
        }
    }
}
