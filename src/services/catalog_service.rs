// src/services/catalog_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Amenity, ReservationType},
};

/// Administração do catálogo de espaços e tipos de reserva. O motor de
/// reservas só lê daqui; os valores são congelados na criação de cada
/// reserva, então editar o catálogo nunca mexe em dívidas existentes.
#[derive(Clone)]
pub struct CatalogService {
    catalog: CatalogRepository,
}

impl CatalogService {
    pub fn new(catalog: CatalogRepository) -> Self {
        Self { catalog }
    }

    pub async fn create_amenity<'e, A>(
        &self,
        acquirer: A,
        name: &str,
        description: Option<&str>,
    ) -> Result<Amenity, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.catalog.create_amenity(&mut *conn, name, description).await
    }

    pub async fn get_all_amenities<'e, A>(&self, acquirer: A) -> Result<Vec<Amenity>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.catalog.get_all_amenities(&mut *conn).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_reservation_type<'e, A>(
        &self,
        acquirer: A,
        amenity_id: Uuid,
        name: &str,
        fee_amount: i64,
        deposit_amount: i64,
        max_duration_minutes: i32,
        rules: Option<&str>,
        requires_approval: bool,
    ) -> Result<ReservationType, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = acquirer.begin().await?;

        self.catalog
            .get_amenity(&mut *tx, amenity_id)
            .await?
            .ok_or(AppError::AmenityNotFound)?;

        let rtype = self
            .catalog
            .create_reservation_type(
                &mut *tx,
                amenity_id,
                name,
                fee_amount,
                deposit_amount,
                max_duration_minutes,
                rules,
                requires_approval,
            )
            .await?;

        tx.commit().await?;
        Ok(rtype)
    }

    pub async fn get_types_for_amenity<'e, A>(
        &self,
        acquirer: A,
        amenity_id: Uuid,
    ) -> Result<Vec<ReservationType>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = acquirer.acquire().await?;
        self.catalog
            .get_types_for_amenity(&mut *conn, amenity_id)
            .await
    }
}
