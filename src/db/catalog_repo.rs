// src/db/catalog_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Amenity, ReservationType},
};

#[derive(Clone)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  ESPAÇOS COMUNS
    // =========================================================================

    pub async fn create_amenity<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
    ) -> Result<Amenity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let amenity = sqlx::query_as::<_, Amenity>(
            r#"
            INSERT INTO amenities (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(amenity)
    }

    pub async fn get_amenity<'e, E>(
        &self,
        executor: E,
        amenity_id: Uuid,
    ) -> Result<Option<Amenity>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let amenity = sqlx::query_as::<_, Amenity>("SELECT * FROM amenities WHERE id = $1")
            .bind(amenity_id)
            .fetch_optional(executor)
            .await?;

        Ok(amenity)
    }

    pub async fn get_all_amenities<'e, E>(&self, executor: E) -> Result<Vec<Amenity>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let amenities =
            sqlx::query_as::<_, Amenity>("SELECT * FROM amenities ORDER BY name ASC")
                .fetch_all(executor)
                .await?;

        Ok(amenities)
    }

    // =========================================================================
    //  TIPOS DE RESERVA
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn create_reservation_type<'e, E>(
        &self,
        executor: E,
        amenity_id: Uuid,
        name: &str,
        fee_amount: i64,
        deposit_amount: i64,
        max_duration_minutes: i32,
        rules: Option<&str>,
        requires_approval: bool,
    ) -> Result<ReservationType, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rtype = sqlx::query_as::<_, ReservationType>(
            r#"
            INSERT INTO reservation_types (
                amenity_id, name, fee_amount, deposit_amount,
                max_duration_minutes, rules, requires_approval
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(amenity_id)
        .bind(name)
        .bind(fee_amount)
        .bind(deposit_amount)
        .bind(max_duration_minutes)
        .bind(rules)
        .bind(requires_approval)
        .fetch_one(executor)
        .await?;

        Ok(rtype)
    }

    pub async fn get_reservation_type<'e, E>(
        &self,
        executor: E,
        type_id: Uuid,
    ) -> Result<Option<ReservationType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rtype =
            sqlx::query_as::<_, ReservationType>("SELECT * FROM reservation_types WHERE id = $1")
                .bind(type_id)
                .fetch_optional(executor)
                .await?;

        Ok(rtype)
    }

    pub async fn get_types_for_amenity<'e, E>(
        &self,
        executor: E,
        amenity_id: Uuid,
    ) -> Result<Vec<ReservationType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, ReservationType>(
            "SELECT * FROM reservation_types WHERE amenity_id = $1 ORDER BY name ASC",
        )
        .bind(amenity_id)
        .fetch_all(executor)
        .await?;

        Ok(types)
    }
}
