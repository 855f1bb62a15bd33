// src/services/billing_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BillingRepository,
    models::billing::{
        Debt, DebtKind, FinancialStatement, prorate_share, running_balance, validate_period,
    },
};

/// Fechamento mensal: consolida as despesas aprovadas do período, rateia
/// por alícuota, lança a taxa de estacionamento e grava o extrato com saldo
/// acumulado. O período é sempre parâmetro explícito — nunca o relógio.
#[derive(Clone)]
pub struct BillingService {
    billing: BillingRepository,
    parking_fee: i64,
}

impl BillingService {
    pub fn new(billing: BillingRepository, parking_fee: i64) -> Self {
        Self {
            billing,
            parking_fee,
        }
    }

    /// Roda o fechamento de um período `YYYY-MM`. Retorna `None` quando o
    /// período não tem despesa aprovada (nada é gravado). A unicidade do
    /// extrato por período impede o fechamento duplo, inclusive entre
    /// processos concorrentes.
    pub async fn close_month<'e, A>(
        &self,
        acquirer: A,
        period: &str,
    ) -> Result<Option<FinancialStatement>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        validate_period(period)?;

        let mut tx = acquirer.begin().await?;

        // Reivindica o período antes de qualquer cálculo: se outro
        // fechamento chegou primeiro, paramos aqui com PeriodAlreadyClosed.
        let statement_id = self.billing.claim_period(&mut *tx, period).await?;

        let expenses = self.billing.sum_approved_expenses(&mut *tx, period).await?;
        if expenses == 0 {
            // Período sem despesa aprovada: nada a ratear, nada é gravado.
            tx.rollback().await?;
            tracing::info!(period, "Fechamento sem despesas aprovadas, nada gerado");
            return Ok(None);
        }

        let income = self.billing.sum_payments(&mut *tx, period).await?;
        let previous_balance = self
            .billing
            .get_latest_statement_before(&mut *tx, period)
            .await?
            .map(|s| s.balance)
            .unwrap_or(0);
        let balance = running_balance(previous_balance, income, expenses);

        let mut debts_issued = 0u32;
        for resident in self.billing.get_all_residents(&mut *tx).await? {
            let share = prorate_share(expenses, resident.alicuota)?;
            if share > 0 {
                self.billing
                    .insert_debt(&mut *tx, resident.id, period, DebtKind::CommonExpense, share)
                    .await?;
                debts_issued += 1;
            }
            if resident.has_parking && self.parking_fee > 0 {
                self.billing
                    .insert_debt(
                        &mut *tx,
                        resident.id,
                        period,
                        DebtKind::Parking,
                        self.parking_fee,
                    )
                    .await?;
                debts_issued += 1;
            }
        }

        let statement = self
            .billing
            .finalize_statement(&mut *tx, statement_id, income, expenses, balance)
            .await?;

        tx.commit().await?;

        tracing::info!(
            period,
            receitas = income,
            despesas = expenses,
            saldo = balance,
            dividas = debts_issued,
            "Período fechado"
        );
        Ok(Some(statement))
    }

    pub async fn list_statements<'e, A>(
        &self,
        acquirer: A,
    ) -> Result<Vec<FinancialStatement>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.billing.get_all_statements(&mut *conn).await
    }

    pub async fn debts_for_resident<'e, A>(
        &self,
        acquirer: A,
        resident_id: Uuid,
    ) -> Result<Vec<Debt>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.billing
            .get_debts_for_resident(&mut *conn, resident_id)
            .await
    }
}
