// src/db/propriedade_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::propriedade::Propriedade};

#[derive(Clone)]
pub struct PropriedadeRepository {
    pool: PgPool,
}

impl PropriedadeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn listar(&self) -> Result<Vec<Propriedade>, AppError> {
        let propriedades = sqlx::query_as::<_, Propriedade>(
            "SELECT * FROM propriedades ORDER BY nome_propriedade ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(propriedades)
    }

    pub async fn obter(&self, id: Uuid) -> Result<Option<Propriedade>, AppError> {
        let propriedade =
            sqlx::query_as::<_, Propriedade>("SELECT * FROM propriedades WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(propriedade)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn criar<'e, E>(
        &self,
        executor: E,
        nome_propriedade: &str,
        produtor: &str,
        municipio: &str,
        uf: &str,
        area_total_ha: Decimal,
        tipo_ciclo_pecuario: &str,
    ) -> Result<Propriedade, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let propriedade = sqlx::query_as::<_, Propriedade>(
            r#"
            INSERT INTO propriedades
                (nome_propriedade, produtor, municipio, uf, area_total_ha, tipo_ciclo_pecuario)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(nome_propriedade)
        .bind(produtor)
        .bind(municipio)
        .bind(uf)
        .bind(area_total_ha)
        .bind(tipo_ciclo_pecuario)
        .fetch_one(executor)
        .await?;
        Ok(propriedade)
    }
}
