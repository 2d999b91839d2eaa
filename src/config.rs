// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        MovimentacaoRepository, PlanejamentoRepository, PropriedadeRepository, RebanhoRepository,
    },
    services::{projecao_service::ProjecaoService, rebanho_service::RebanhoService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub propriedades: PropriedadeRepository,
    pub rebanho_service: RebanhoService,
    pub projecao_service: ProjecaoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let propriedades = PropriedadeRepository::new(db_pool.clone());
        let rebanho = RebanhoRepository::new(db_pool.clone());
        let planejamentos = PlanejamentoRepository::new(db_pool.clone());
        let movimentacoes = MovimentacaoRepository::new(db_pool.clone());

        let rebanho_service = RebanhoService::new(
            propriedades.clone(),
            rebanho.clone(),
            movimentacoes.clone(),
        );
        let projecao_service = ProjecaoService::new(
            propriedades.clone(),
            rebanho,
            planejamentos,
            movimentacoes,
        );

        Ok(Self { db_pool, propriedades, rebanho_service, projecao_service })
    }
}
