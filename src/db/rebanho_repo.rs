// src/db/rebanho_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::rebanho::{CategoriaAnimal, InventarioRebanho, Sexo},
};

#[derive(Clone)]
pub struct RebanhoRepository {
    pool: PgPool,
}

impl RebanhoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---
    // Categorias (taxonomia de referência)
    // ---

    pub async fn listar_categorias(&self) -> Result<Vec<CategoriaAnimal>, AppError> {
        let categorias = sqlx::query_as::<_, CategoriaAnimal>(
            "SELECT * FROM categorias_animais ORDER BY idade_minima_meses NULLS LAST, nome ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categorias)
    }

    pub async fn obter_categoria(&self, id: Uuid) -> Result<Option<CategoriaAnimal>, AppError> {
        let categoria =
            sqlx::query_as::<_, CategoriaAnimal>("SELECT * FROM categorias_animais WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(categoria)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn criar_categoria<'e, E>(
        &self,
        executor: E,
        nome: &str,
        descricao: Option<&str>,
        sexo: Sexo,
        idade_minima_meses: Option<i32>,
        idade_maxima_meses: Option<i32>,
        peso_medio_kg: Option<Decimal>,
    ) -> Result<CategoriaAnimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CategoriaAnimal>(
            r#"
            INSERT INTO categorias_animais
                (nome, descricao, sexo, idade_minima_meses, idade_maxima_meses, peso_medio_kg)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(descricao)
        .bind(sexo)
        .bind(idade_minima_meses)
        .bind(idade_maxima_meses)
        .bind(peso_medio_kg)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::RegistroDuplicado(format!("categoria '{nome}'"));
                }
            }
            e.into()
        })
    }

    // ---
    // Inventário (fotografias datadas)
    // ---

    pub async fn listar_inventario(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<InventarioRebanho>, AppError> {
        let inventario = sqlx::query_as::<_, InventarioRebanho>(
            r#"
            SELECT * FROM inventario_rebanho
            WHERE propriedade_id = $1
            ORDER BY data_inventario DESC, categoria_id ASC
            "#,
        )
        .bind(propriedade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(inventario)
    }

    pub async fn existe_inventario(&self, propriedade_id: Uuid) -> Result<bool, AppError> {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM inventario_rebanho WHERE propriedade_id = $1)",
        )
        .bind(propriedade_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }

    /// Grava ou substitui a fotografia de uma categoria na data informada.
    pub async fn upsert_inventario<'e, E>(
        &self,
        executor: E,
        propriedade_id: Uuid,
        categoria_id: Uuid,
        quantidade: i32,
        valor_por_cabeca: Decimal,
        data_inventario: NaiveDate,
    ) -> Result<InventarioRebanho, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inventario = sqlx::query_as::<_, InventarioRebanho>(
            r#"
            INSERT INTO inventario_rebanho
                (propriedade_id, categoria_id, quantidade, valor_por_cabeca, data_inventario)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (propriedade_id, categoria_id, data_inventario)
            DO UPDATE SET quantidade = EXCLUDED.quantidade,
                          valor_por_cabeca = EXCLUDED.valor_por_cabeca
            RETURNING *
            "#,
        )
        .bind(propriedade_id)
        .bind(categoria_id)
        .bind(quantidade)
        .bind(valor_por_cabeca)
        .bind(data_inventario)
        .fetch_one(executor)
        .await?;
        Ok(inventario)
    }
}
