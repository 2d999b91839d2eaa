// src/handlers/projecoes.rs
//
// Geração da projeção e relatórios do lote gravado.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::movimentacao::{MovimentacaoProjetada, VendaProjetada},
    services::{
        projecao_service::ResumoProjecao,
        saldo::{RelatorioEvolucao, ResumoPeriodo},
    },
};

// ---
// Payload: GerarProjecao
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GerarProjecaoPayload {
    #[validate(range(min = 1, max = 20, message = "O horizonte deve estar entre 1 e 20 anos."))]
    pub anos: u32,

    pub data_inicio: NaiveDate,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
}

#[utoipa::path(
    post,
    path = "/propriedades/{id}/projecoes",
    tag = "Projeções",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    request_body = GerarProjecaoPayload,
    responses(
        (status = 201, description = "Projeção gerada e gravada", body = ResumoProjecao),
        (status = 404, description = "Propriedade não encontrada"),
        (status = 422, description = "Parâmetros ou inventário ausentes"),
    )
)]
pub async fn gerar_projecao(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GerarProjecaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resumo = app_state
        .projecao_service
        .gerar(id, payload.anos, payload.data_inicio, &payload.descricao)
        .await?;

    Ok((StatusCode::CREATED, Json(resumo)))
}

#[utoipa::path(
    get,
    path = "/planejamentos/{id}/movimentacoes",
    tag = "Projeções",
    params(("id" = Uuid, Path, description = "Id do planejamento")),
    responses(
        (status = 200, description = "Movimentações do planejamento em ordem de replay", body = [MovimentacaoProjetada]),
        (status = 404, description = "Planejamento não encontrado"),
    )
)]
pub async fn listar_movimentacoes(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movimentacoes = app_state.projecao_service.listar_movimentacoes(id).await?;
    Ok(Json(movimentacoes))
}

#[utoipa::path(
    get,
    path = "/planejamentos/{id}/vendas",
    tag = "Projeções",
    params(("id" = Uuid, Path, description = "Id do planejamento")),
    responses(
        (status = 200, description = "Vendas projetadas do planejamento", body = [VendaProjetada]),
        (status = 404, description = "Planejamento não encontrado"),
    )
)]
pub async fn listar_vendas(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vendas = app_state.projecao_service.listar_vendas(id).await?;
    Ok(Json(vendas))
}

#[utoipa::path(
    get,
    path = "/planejamentos/{id}/resumo",
    tag = "Projeções",
    params(("id" = Uuid, Path, description = "Id do planejamento")),
    responses(
        (status = 200, description = "Totais mensais por tipo de movimentação", body = [ResumoPeriodo]),
        (status = 404, description = "Planejamento não encontrado"),
    )
)]
pub async fn resumo_planejamento(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resumo = app_state.projecao_service.resumo_mensal(id).await?;
    Ok(Json(resumo))
}

#[utoipa::path(
    get,
    path = "/planejamentos/{id}/evolucao",
    tag = "Projeções",
    params(("id" = Uuid, Path, description = "Id do planejamento")),
    responses(
        (status = 200, description = "Evolução mensal por categoria", body = RelatorioEvolucao),
        (status = 404, description = "Planejamento não encontrado"),
    )
)]
pub async fn evolucao_planejamento(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = app_state.projecao_service.evolucao(id).await?;
    Ok(Json(relatorio))
}
