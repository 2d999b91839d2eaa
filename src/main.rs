// src/main.rs

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let propriedade_routes = Router::new()
        .route(
            "/",
            post(handlers::propriedades::criar_propriedade)
                .get(handlers::propriedades::listar_propriedades),
        )
        .route("/{id}", get(handlers::propriedades::obter_propriedade))
        .route(
            "/{id}/inventario",
            post(handlers::rebanho::registrar_inventario)
                .get(handlers::rebanho::listar_inventario),
        )
        .route(
            "/{id}/categorias/{categoria_id}/saldo",
            get(handlers::rebanho::consultar_saldo),
        )
        .route("/{id}/auditoria", get(handlers::rebanho::auditar_razao))
        .route(
            "/{id}/parametros",
            put(handlers::planejamentos::configurar_parametros)
                .get(handlers::planejamentos::obter_parametros),
        )
        .route(
            "/{id}/percentuais-venda",
            put(handlers::planejamentos::definir_percentual_venda)
                .get(handlers::planejamentos::listar_percentuais_venda),
        )
        .route(
            "/{id}/regras-transferencia",
            post(handlers::planejamentos::criar_regra_transferencia)
                .get(handlers::planejamentos::listar_regras_transferencia),
        )
        .route(
            "/{id}/compras-programadas",
            post(handlers::planejamentos::criar_compra_programada)
                .get(handlers::planejamentos::listar_compras_programadas),
        )
        .route(
            "/{id}/planejamentos",
            get(handlers::planejamentos::listar_planejamentos),
        )
        .route("/{id}/projecoes", post(handlers::projecoes::gerar_projecao));

    let planejamento_routes = Router::new()
        .route("/{id}", get(handlers::planejamentos::obter_planejamento))
        .route(
            "/{id}/movimentacoes",
            get(handlers::projecoes::listar_movimentacoes),
        )
        .route("/{id}/vendas", get(handlers::projecoes::listar_vendas))
        .route("/{id}/resumo", get(handlers::projecoes::resumo_planejamento))
        .route(
            "/{id}/evolucao",
            get(handlers::projecoes::evolucao_planejamento),
        );

    let categoria_routes = Router::new().route(
        "/",
        post(handlers::rebanho::criar_categoria).get(handlers::rebanho::listar_categorias),
    );

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/propriedades", propriedade_routes)
        .nest("/api/planejamentos", planejamento_routes)
        .nest("/api/categorias", categoria_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("APP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
