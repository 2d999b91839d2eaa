// src/db/movimentacao_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::movimentacao::{MovimentacaoProjetada, NovaMovimentacao, NovaVendaProjetada, VendaProjetada},
};

#[derive(Clone)]
pub struct MovimentacaoRepository {
    pool: PgPool,
}

impl MovimentacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insere uma movimentação do lote; `ordem` é atribuída pelo BIGSERIAL
    /// e volta no RETURNING.
    pub async fn inserir<'e, E>(
        &self,
        executor: E,
        planejamento_id: Uuid,
        nova: &NovaMovimentacao,
    ) -> Result<MovimentacaoProjetada, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacao = sqlx::query_as::<_, MovimentacaoProjetada>(
            r#"
            INSERT INTO movimentacoes_projetadas
                (propriedade_id, planejamento_id, categoria_id, data_movimentacao,
                 tipo_movimentacao, quantidade, valor_por_cabeca, valor_total, observacao)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(nova.propriedade_id)
        .bind(planejamento_id)
        .bind(nova.categoria_id)
        .bind(nova.data_movimentacao)
        .bind(nova.tipo_movimentacao)
        .bind(nova.quantidade)
        .bind(nova.valor_por_cabeca)
        .bind(nova.valor_total)
        .bind(nova.observacao.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(movimentacao)
    }

    pub async fn listar_por_planejamento(
        &self,
        planejamento_id: Uuid,
    ) -> Result<Vec<MovimentacaoProjetada>, AppError> {
        let movimentacoes = sqlx::query_as::<_, MovimentacaoProjetada>(
            r#"
            SELECT * FROM movimentacoes_projetadas
            WHERE planejamento_id = $1
            ORDER BY data_movimentacao ASC, ordem ASC
            "#,
        )
        .bind(planejamento_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimentacoes)
    }

    /// Todas as movimentações de uma propriedade, em ordem de replay.
    pub async fn listar_por_propriedade(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<MovimentacaoProjetada>, AppError> {
        let movimentacoes = sqlx::query_as::<_, MovimentacaoProjetada>(
            r#"
            SELECT * FROM movimentacoes_projetadas
            WHERE propriedade_id = $1
            ORDER BY data_movimentacao ASC, ordem ASC
            "#,
        )
        .bind(propriedade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimentacoes)
    }

    pub async fn inserir_venda<'e, E>(
        &self,
        executor: E,
        planejamento_id: Uuid,
        movimentacao_projetada_id: Uuid,
        nova: &NovaVendaProjetada,
    ) -> Result<VendaProjetada, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let venda = sqlx::query_as::<_, VendaProjetada>(
            r#"
            INSERT INTO vendas_projetadas
                (propriedade_id, planejamento_id, movimentacao_projetada_id, categoria_id,
                 data_venda, quantidade, peso_medio_kg, peso_total_kg, valor_por_kg, valor_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(nova.propriedade_id)
        .bind(planejamento_id)
        .bind(movimentacao_projetada_id)
        .bind(nova.categoria_id)
        .bind(nova.data_venda)
        .bind(nova.quantidade)
        .bind(nova.peso_medio_kg)
        .bind(nova.peso_total_kg)
        .bind(nova.valor_por_kg)
        .bind(nova.valor_total)
        .fetch_one(executor)
        .await?;
        Ok(venda)
    }

    pub async fn listar_vendas_por_planejamento(
        &self,
        planejamento_id: Uuid,
    ) -> Result<Vec<VendaProjetada>, AppError> {
        let vendas = sqlx::query_as::<_, VendaProjetada>(
            r#"
            SELECT * FROM vendas_projetadas
            WHERE planejamento_id = $1
            ORDER BY data_venda ASC
            "#,
        )
        .bind(planejamento_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vendas)
    }
}
