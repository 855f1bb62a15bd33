// ---
// Helpers para traduzir violações de constraint em erros de negócio
// ---
// As regras de concorrência (exclusão de sobreposição, decisão única,
// período único) vivem no banco; aqui só reconhecemos o código que o
// Postgres devolve quando a constraint segura uma corrida.

/// Violação de constraint de exclusão (código 23P01 do Postgres) — é o que
/// a `reservations_no_overlap` devolve quando duas reservas disputam a
/// mesma janela.
pub(crate) fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23P01")
}

/// Violação de unicidade em uma constraint específica.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation() && db.constraint() == Some(constraint))
}
