// src/db/billing_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::billing::{Debt, DebtKind, FinancialStatement, Resident},
};

#[derive(Clone)]
pub struct BillingRepository;

impl BillingRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  DIRETÓRIO DE MORADORES (somente leitura)
    // =========================================================================

    pub async fn get_all_residents<'e, E>(&self, executor: E) -> Result<Vec<Resident>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let residents =
            sqlx::query_as::<_, Resident>("SELECT * FROM residents ORDER BY unit ASC")
                .fetch_all(executor)
                .await?;

        Ok(residents)
    }

    // =========================================================================
    //  RAZÃO EXTERNO (despesas e pagamentos do período)
    // =========================================================================

    pub async fn sum_approved_expenses<'e, E>(
        &self,
        executor: E,
        period: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // SUM(bigint) vira NUMERIC no Postgres, por isso o cast
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM expenses
            WHERE period = $1 AND status = 'APPROVED'
            "#,
        )
        .bind(period)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn sum_payments<'e, E>(&self, executor: E, period: &str) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM payments WHERE period = $1",
        )
        .bind(period)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    /// Crédito realizado para o condomínio (ex.: retenção de caução entra
    /// aqui e compõe a receita do período).
    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        description: &str,
        amount: i64,
        source: &str,
        period: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO payments (description, amount, source, period)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(description)
        .bind(amount)
        .bind(source)
        .bind(period)
        .execute(executor)
        .await?;

        Ok(())
    }

    // =========================================================================
    //  FECHAMENTO MENSAL (extrato e dívidas)
    // =========================================================================

    /// Reserva o período para este fechamento. A constraint
    /// `financial_statements_period_key` impede dois fechamentos do mesmo
    /// mês, inclusive concorrentes.
    pub async fn claim_period<'e, E>(&self, executor: E, period: &str) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO financial_statements (period) VALUES ($1) RETURNING id",
        )
        .bind(period)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "financial_statements_period_key") {
                AppError::PeriodAlreadyClosed
            } else {
                AppError::DatabaseError(e)
            }
        })?;

        Ok(id)
    }

    pub async fn finalize_statement<'e, E>(
        &self,
        executor: E,
        statement_id: Uuid,
        income: i64,
        expenses: i64,
        balance: i64,
    ) -> Result<FinancialStatement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statement = sqlx::query_as::<_, FinancialStatement>(
            r#"
            UPDATE financial_statements
            SET income = $2, expenses = $3, balance = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(statement_id)
        .bind(income)
        .bind(expenses)
        .bind(balance)
        .fetch_one(executor)
        .await?;

        Ok(statement)
    }

    /// Saldo do período anterior: último extrato com rótulo menor que o
    /// consultado (YYYY-MM ordena lexicograficamente).
    pub async fn get_latest_statement_before<'e, E>(
        &self,
        executor: E,
        period: &str,
    ) -> Result<Option<FinancialStatement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statement = sqlx::query_as::<_, FinancialStatement>(
            r#"
            SELECT * FROM financial_statements
            WHERE period < $1
            ORDER BY period DESC
            LIMIT 1
            "#,
        )
        .bind(period)
        .fetch_optional(executor)
        .await?;

        Ok(statement)
    }

    pub async fn get_all_statements<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<FinancialStatement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statements = sqlx::query_as::<_, FinancialStatement>(
            "SELECT * FROM financial_statements ORDER BY period ASC",
        )
        .fetch_all(executor)
        .await?;

        Ok(statements)
    }

    pub async fn insert_debt<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        period: &str,
        kind: DebtKind,
        amount: i64,
    ) -> Result<Debt, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let debt = sqlx::query_as::<_, Debt>(
            r#"
            INSERT INTO debts (resident_id, period, kind, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(resident_id)
        .bind(period)
        .bind(kind)
        .bind(amount)
        .fetch_one(executor)
        .await?;

        Ok(debt)
    }

    pub async fn get_debts_for_resident<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
    ) -> Result<Vec<Debt>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let debts = sqlx::query_as::<_, Debt>(
            "SELECT * FROM debts WHERE resident_id = $1 ORDER BY period DESC",
        )
        .bind(resident_id)
        .fetch_all(executor)
        .await?;

        Ok(debts)
    }
}
