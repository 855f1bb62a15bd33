// src/models/deposit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deposit_verdict", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositVerdict {
    Release,       // Devolve tudo ao morador
    RetainPartial, // Retém parte, devolve o resto
    RetainFull,    // Retém tudo
}

/// Adjudicação pós-uso da caução. Terminal: uma por reserva, garantida por
/// constraint de unicidade no banco.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositDecision {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub verdict: DepositVerdict,
    #[schema(example = 5000)]
    pub retained_amount: i64,
    #[schema(example = 15000)]
    pub refunded_amount: i64,
    pub reason: Option<String>,
    pub decided_at: DateTime<Utc>,
}

/// Divisão final da caução entre condomínio e morador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositSplit {
    pub retained: i64,
    pub refunded: i64,
}

/// Valida o veredito contra o valor congelado da caução e normaliza a
/// divisão retido/devolvido. Regras:
/// - RELEASE: sem valor retido, motivo opcional;
/// - RETAIN_PARTIAL: motivo obrigatório, retido em (0, caução];
/// - RETAIN_FULL: motivo obrigatório, retido é a caução inteira.
pub fn adjudicate(
    verdict: DepositVerdict,
    retained_amount: Option<i64>,
    reason: Option<&str>,
    deposit_amount: i64,
) -> Result<DepositSplit, AppError> {
    if deposit_amount <= 0 {
        return Err(AppError::DepositChargeMissing);
    }

    let reason_given = reason.map(str::trim).is_some_and(|r| !r.is_empty());
    if verdict != DepositVerdict::Release && !reason_given {
        return Err(AppError::InvalidInput(
            "O motivo é obrigatório quando a caução é retida.".into(),
        ));
    }

    match verdict {
        DepositVerdict::Release => {
            if retained_amount.is_some_and(|r| r != 0) {
                return Err(AppError::InvalidInput(
                    "Não informe valor retido ao liberar a caução.".into(),
                ));
            }
            Ok(DepositSplit {
                retained: 0,
                refunded: deposit_amount,
            })
        }
        DepositVerdict::RetainPartial => {
            let retained = retained_amount.ok_or_else(|| {
                AppError::InvalidInput("Informe o valor retido da caução.".into())
            })?;
            if retained <= 0 || retained > deposit_amount {
                return Err(AppError::InvalidInput(
                    "O valor retido deve ser maior que zero e no máximo o valor da caução.".into(),
                ));
            }
            Ok(DepositSplit {
                retained,
                refunded: deposit_amount - retained,
            })
        }
        DepositVerdict::RetainFull => {
            if retained_amount.is_some_and(|r| r != deposit_amount) {
                return Err(AppError::InvalidInput(
                    "Na retenção total o valor retido é a caução inteira.".into(),
                ));
            }
            Ok(DepositSplit {
                retained: deposit_amount,
                refunded: 0,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPOSIT: i64 = 20000;

    #[test]
    fn release_returns_everything() {
        let split = adjudicate(DepositVerdict::Release, None, None, DEPOSIT).unwrap();
        assert_eq!(
            split,
            DepositSplit {
                retained: 0,
                refunded: DEPOSIT
            }
        );
    }

    #[test]
    fn release_rejects_retained_amount() {
        let err = adjudicate(DepositVerdict::Release, Some(5000), None, DEPOSIT);
        assert!(matches!(err, Err(AppError::InvalidInput(_))));
        // Zero explícito é tratado como ausente
        assert!(adjudicate(DepositVerdict::Release, Some(0), None, DEPOSIT).is_ok());
    }

    #[test]
    fn retain_partial_splits_the_deposit() {
        let split = adjudicate(
            DepositVerdict::RetainPartial,
            Some(5000),
            Some("cadeira quebrada"),
            DEPOSIT,
        )
        .unwrap();
        assert_eq!(
            split,
            DepositSplit {
                retained: 5000,
                refunded: 15000
            }
        );
    }

    #[test]
    fn retain_partial_requires_amount_in_range() {
        for bad in [Some(0), Some(-1), Some(DEPOSIT + 1), None] {
            let err = adjudicate(DepositVerdict::RetainPartial, bad, Some("dano"), DEPOSIT);
            assert!(matches!(err, Err(AppError::InvalidInput(_))), "{bad:?}");
        }
        // O limite superior é inclusivo
        assert!(
            adjudicate(
                DepositVerdict::RetainPartial,
                Some(DEPOSIT),
                Some("dano"),
                DEPOSIT
            )
            .is_ok()
        );
    }

    #[test]
    fn retention_requires_reason() {
        for verdict in [DepositVerdict::RetainPartial, DepositVerdict::RetainFull] {
            for reason in [None, Some(""), Some("   ")] {
                let err = adjudicate(verdict, Some(5000), reason, DEPOSIT);
                assert!(matches!(err, Err(AppError::InvalidInput(_))));
            }
        }
    }

    #[test]
    fn retain_full_takes_the_whole_deposit() {
        let split = adjudicate(DepositVerdict::RetainFull, None, Some("festa fora de hora"), DEPOSIT)
            .unwrap();
        assert_eq!(
            split,
            DepositSplit {
                retained: DEPOSIT,
                refunded: 0
            }
        );
        // Informar o valor exato também é aceito
        assert!(
            adjudicate(
                DepositVerdict::RetainFull,
                Some(DEPOSIT),
                Some("festa fora de hora"),
                DEPOSIT
            )
            .is_ok()
        );
        // Valor diferente da caução, não
        assert!(
            adjudicate(
                DepositVerdict::RetainFull,
                Some(DEPOSIT - 1),
                Some("festa fora de hora"),
                DEPOSIT
            )
            .is_err()
        );
    }

    #[test]
    fn missing_deposit_is_its_own_error() {
        let err = adjudicate(DepositVerdict::Release, None, None, 0);
        assert!(matches!(err, Err(AppError::DepositChargeMissing)));
    }
}
