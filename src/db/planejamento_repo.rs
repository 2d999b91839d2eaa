// src/db/planejamento_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::planejamento::{
        CompraProgramada, ParametrosProjecaoRebanho, ParametrosVendaPorCategoria,
        PlanejamentoAnual, RegraTransferencia, StatusPlanejamento,
    },
};

#[derive(Clone)]
pub struct PlanejamentoRepository {
    pool: PgPool,
}

impl PlanejamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---
    // Planejamentos (rodadas de projeção)
    // ---

    pub async fn obter(&self, id: Uuid) -> Result<Option<PlanejamentoAnual>, AppError> {
        let planejamento = sqlx::query_as::<_, PlanejamentoAnual>(
            "SELECT * FROM planejamentos_anuais WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(planejamento)
    }

    pub async fn listar_por_propriedade(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<PlanejamentoAnual>, AppError> {
        let planejamentos = sqlx::query_as::<_, PlanejamentoAnual>(
            r#"
            SELECT * FROM planejamentos_anuais
            WHERE propriedade_id = $1
            ORDER BY data_criacao DESC, ano DESC
            "#,
        )
        .bind(propriedade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(planejamentos)
    }

    /// Próximo código sequencial do ano, no formato PROJ-AAAA-NNNN.
    pub async fn proximo_codigo<'e, E>(&self, executor: E, ano: i32) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ultimo = sqlx::query_scalar::<_, String>(
            r#"
            SELECT codigo FROM planejamentos_anuais
            WHERE ano = $1 AND codigo IS NOT NULL
            ORDER BY codigo DESC
            LIMIT 1
            "#,
        )
        .bind(ano)
        .fetch_optional(executor)
        .await?;

        let sequencial = ultimo
            .as_deref()
            .and_then(|codigo| codigo.rsplit('-').next())
            .and_then(|n| n.parse::<u32>().ok())
            .map(|n| n + 1)
            .unwrap_or(1);

        Ok(format!("PROJ-{ano}-{sequencial:04}"))
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        propriedade_id: Uuid,
        codigo: &str,
        ano: i32,
        descricao: &str,
        status: StatusPlanejamento,
    ) -> Result<PlanejamentoAnual, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let planejamento = sqlx::query_as::<_, PlanejamentoAnual>(
            r#"
            INSERT INTO planejamentos_anuais (propriedade_id, codigo, ano, descricao, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(propriedade_id)
        .bind(codigo)
        .bind(ano)
        .bind(descricao)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(planejamento)
    }

    // ---
    // Parâmetros de projeção
    // ---

    pub async fn obter_parametros(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Option<ParametrosProjecaoRebanho>, AppError> {
        let parametros = sqlx::query_as::<_, ParametrosProjecaoRebanho>(
            "SELECT * FROM parametros_projecao WHERE propriedade_id = $1",
        )
        .bind(propriedade_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(parametros)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_parametros<'e, E>(
        &self,
        executor: E,
        propriedade_id: Uuid,
        taxa_natalidade_anual: Decimal,
        taxa_mortalidade_bezerros_anual: Decimal,
        taxa_mortalidade_adultos_anual: Decimal,
        percentual_venda_machos_anual: Decimal,
        percentual_venda_femeas_anual: Decimal,
        preco_venda_kg: Decimal,
        venda_final_ultimo_ano: bool,
    ) -> Result<ParametrosProjecaoRebanho, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let parametros = sqlx::query_as::<_, ParametrosProjecaoRebanho>(
            r#"
            INSERT INTO parametros_projecao
                (propriedade_id, taxa_natalidade_anual, taxa_mortalidade_bezerros_anual,
                 taxa_mortalidade_adultos_anual, percentual_venda_machos_anual,
                 percentual_venda_femeas_anual, preco_venda_kg, venda_final_ultimo_ano)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (propriedade_id)
            DO UPDATE SET taxa_natalidade_anual = EXCLUDED.taxa_natalidade_anual,
                          taxa_mortalidade_bezerros_anual = EXCLUDED.taxa_mortalidade_bezerros_anual,
                          taxa_mortalidade_adultos_anual = EXCLUDED.taxa_mortalidade_adultos_anual,
                          percentual_venda_machos_anual = EXCLUDED.percentual_venda_machos_anual,
                          percentual_venda_femeas_anual = EXCLUDED.percentual_venda_femeas_anual,
                          preco_venda_kg = EXCLUDED.preco_venda_kg,
                          venda_final_ultimo_ano = EXCLUDED.venda_final_ultimo_ano
            RETURNING *
            "#,
        )
        .bind(propriedade_id)
        .bind(taxa_natalidade_anual)
        .bind(taxa_mortalidade_bezerros_anual)
        .bind(taxa_mortalidade_adultos_anual)
        .bind(percentual_venda_machos_anual)
        .bind(percentual_venda_femeas_anual)
        .bind(preco_venda_kg)
        .bind(venda_final_ultimo_ano)
        .fetch_one(executor)
        .await?;
        Ok(parametros)
    }

    // ---
    // Percentuais de venda por categoria
    // ---

    pub async fn listar_percentuais_venda(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<ParametrosVendaPorCategoria>, AppError> {
        let percentuais = sqlx::query_as::<_, ParametrosVendaPorCategoria>(
            "SELECT * FROM parametros_venda_categoria WHERE propriedade_id = $1",
        )
        .bind(propriedade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(percentuais)
    }

    pub async fn upsert_percentual_venda<'e, E>(
        &self,
        executor: E,
        propriedade_id: Uuid,
        categoria_id: Uuid,
        percentual_venda_anual: Decimal,
    ) -> Result<ParametrosVendaPorCategoria, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let percentual = sqlx::query_as::<_, ParametrosVendaPorCategoria>(
            r#"
            INSERT INTO parametros_venda_categoria
                (propriedade_id, categoria_id, percentual_venda_anual)
            VALUES ($1, $2, $3)
            ON CONFLICT (propriedade_id, categoria_id)
            DO UPDATE SET percentual_venda_anual = EXCLUDED.percentual_venda_anual,
                          ativo = TRUE
            RETURNING *
            "#,
        )
        .bind(propriedade_id)
        .bind(categoria_id)
        .bind(percentual_venda_anual)
        .fetch_one(executor)
        .await?;
        Ok(percentual)
    }

    // ---
    // Regras de transferência
    // ---

    /// Regras em que a propriedade participa como origem ou destino.
    pub async fn listar_regras_transferencia(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<RegraTransferencia>, AppError> {
        let regras = sqlx::query_as::<_, RegraTransferencia>(
            r#"
            SELECT * FROM regras_transferencia
            WHERE propriedade_origem_id = $1 OR propriedade_destino_id = $1
            "#,
        )
        .bind(propriedade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(regras)
    }

    pub async fn criar_regra_transferencia<'e, E>(
        &self,
        executor: E,
        propriedade_origem_id: Uuid,
        propriedade_destino_id: Uuid,
        categoria_id: Uuid,
        quantidade: i32,
        frequencia_meses: i32,
    ) -> Result<RegraTransferencia, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let regra = sqlx::query_as::<_, RegraTransferencia>(
            r#"
            INSERT INTO regras_transferencia
                (propriedade_origem_id, propriedade_destino_id, categoria_id,
                 quantidade, frequencia_meses)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(propriedade_origem_id)
        .bind(propriedade_destino_id)
        .bind(categoria_id)
        .bind(quantidade)
        .bind(frequencia_meses)
        .fetch_one(executor)
        .await?;
        Ok(regra)
    }

    // ---
    // Compras programadas
    // ---

    pub async fn listar_compras_programadas(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<CompraProgramada>, AppError> {
        let compras = sqlx::query_as::<_, CompraProgramada>(
            "SELECT * FROM compras_programadas WHERE propriedade_id = $1",
        )
        .bind(propriedade_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(compras)
    }

    pub async fn criar_compra_programada<'e, E>(
        &self,
        executor: E,
        propriedade_id: Uuid,
        categoria_id: Uuid,
        quantidade: i32,
        frequencia_meses: i32,
        valor_por_cabeca: Option<Decimal>,
    ) -> Result<CompraProgramada, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let compra = sqlx::query_as::<_, CompraProgramada>(
            r#"
            INSERT INTO compras_programadas
                (propriedade_id, categoria_id, quantidade, frequencia_meses, valor_por_cabeca)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(propriedade_id)
        .bind(categoria_id)
        .bind(quantidade)
        .bind(frequencia_meses)
        .bind(valor_por_cabeca)
        .fetch_one(executor)
        .await?;
        Ok(compra)
    }
}
