// src/handlers/planejamentos.rs
//
// Configuração da projeção (parâmetros, percentuais de venda, regras de
// transferência, compras programadas) e consulta de planejamentos.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::planejamento::{
        CompraProgramada, ParametrosProjecaoRebanho, ParametrosVendaPorCategoria,
        PlanejamentoAnual, RegraTransferencia,
    },
};

fn validar_percentual(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > Decimal::from(100) {
        let mut err = ValidationError::new("range");
        err.message = Some("O percentual deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: ConfigurarParametros
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurarParametrosPayload {
    #[validate(custom(function = "validar_percentual"))]
    pub taxa_natalidade_anual: Decimal,

    #[validate(custom(function = "validar_percentual"))]
    pub taxa_mortalidade_bezerros_anual: Decimal,

    #[validate(custom(function = "validar_percentual"))]
    pub taxa_mortalidade_adultos_anual: Decimal,

    #[validate(custom(function = "validar_percentual"))]
    pub percentual_venda_machos_anual: Decimal,

    #[validate(custom(function = "validar_percentual"))]
    pub percentual_venda_femeas_anual: Decimal,

    #[validate(custom(function = "crate::handlers::propriedades::validar_nao_negativo"))]
    pub preco_venda_kg: Decimal,

    #[serde(default)]
    pub venda_final_ultimo_ano: bool,
}

#[utoipa::path(
    put,
    path = "/propriedades/{id}/parametros",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    request_body = ConfigurarParametrosPayload,
    responses(
        (status = 200, description = "Parâmetros gravados", body = ParametrosProjecaoRebanho),
        (status = 404, description = "Propriedade não encontrada"),
    )
)]
pub async fn configurar_parametros(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfigurarParametrosPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let parametros = app_state
        .projecao_service
        .configurar_parametros(
            id,
            payload.taxa_natalidade_anual,
            payload.taxa_mortalidade_bezerros_anual,
            payload.taxa_mortalidade_adultos_anual,
            payload.percentual_venda_machos_anual,
            payload.percentual_venda_femeas_anual,
            payload.preco_venda_kg,
            payload.venda_final_ultimo_ano,
        )
        .await?;

    Ok(Json(parametros))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/parametros",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Parâmetros da propriedade", body = ParametrosProjecaoRebanho),
        (status = 422, description = "Parâmetros ainda não configurados"),
    )
)]
pub async fn obter_parametros(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let parametros = app_state.projecao_service.obter_parametros(id).await?;
    Ok(Json(parametros))
}

// ---
// Payload: PercentualVendaCategoria
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PercentualVendaPayload {
    pub categoria_id: Uuid,

    #[validate(custom(function = "validar_percentual"))]
    pub percentual_venda_anual: Decimal,
}

#[utoipa::path(
    put,
    path = "/propriedades/{id}/percentuais-venda",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    request_body = PercentualVendaPayload,
    responses(
        (status = 200, description = "Percentual gravado", body = ParametrosVendaPorCategoria),
        (status = 404, description = "Propriedade ou categoria não encontrada"),
    )
)]
pub async fn definir_percentual_venda(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PercentualVendaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let percentual = app_state
        .projecao_service
        .definir_percentual_venda(id, payload.categoria_id, payload.percentual_venda_anual)
        .await?;

    Ok(Json(percentual))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/percentuais-venda",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Percentuais por categoria", body = [ParametrosVendaPorCategoria]),
    )
)]
pub async fn listar_percentuais_venda(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let percentuais = app_state.projecao_service.listar_percentuais_venda(id).await?;
    Ok(Json(percentuais))
}

// ---
// Payload: CriarRegraTransferencia
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarRegraTransferenciaPayload {
    pub propriedade_destino_id: Uuid,
    pub categoria_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser positiva."))]
    pub quantidade: i32,

    #[validate(range(min = 1, max = 12, message = "A frequência deve estar entre 1 e 12 meses."))]
    pub frequencia_meses: i32,
}

#[utoipa::path(
    post,
    path = "/propriedades/{id}/regras-transferencia",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade de origem")),
    request_body = CriarRegraTransferenciaPayload,
    responses(
        (status = 201, description = "Regra criada", body = RegraTransferencia),
        (status = 404, description = "Propriedade ou categoria não encontrada"),
    )
)]
pub async fn criar_regra_transferencia(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CriarRegraTransferenciaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let regra = app_state
        .projecao_service
        .criar_regra_transferencia(
            id,
            payload.propriedade_destino_id,
            payload.categoria_id,
            payload.quantidade,
            payload.frequencia_meses,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(regra)))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/regras-transferencia",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Regras em que a propriedade participa", body = [RegraTransferencia]),
    )
)]
pub async fn listar_regras_transferencia(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let regras = app_state.projecao_service.listar_regras_transferencia(id).await?;
    Ok(Json(regras))
}

// ---
// Payload: CriarCompraProgramada
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarCompraProgramadaPayload {
    pub categoria_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser positiva."))]
    pub quantidade: i32,

    #[validate(range(min = 1, max = 12, message = "A frequência deve estar entre 1 e 12 meses."))]
    pub frequencia_meses: i32,

    pub valor_por_cabeca: Option<Decimal>,
}

#[utoipa::path(
    post,
    path = "/propriedades/{id}/compras-programadas",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    request_body = CriarCompraProgramadaPayload,
    responses(
        (status = 201, description = "Compra programada criada", body = CompraProgramada),
        (status = 404, description = "Propriedade ou categoria não encontrada"),
    )
)]
pub async fn criar_compra_programada(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CriarCompraProgramadaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let compra = app_state
        .projecao_service
        .criar_compra_programada(
            id,
            payload.categoria_id,
            payload.quantidade,
            payload.frequencia_meses,
            payload.valor_por_cabeca,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(compra)))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/compras-programadas",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Compras programadas", body = [CompraProgramada]),
    )
)]
pub async fn listar_compras_programadas(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let compras = app_state.projecao_service.listar_compras_programadas(id).await?;
    Ok(Json(compras))
}

// ---
// Consulta de planejamentos
// ---
#[utoipa::path(
    get,
    path = "/propriedades/{id}/planejamentos",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Planejamentos da propriedade", body = [PlanejamentoAnual]),
        (status = 404, description = "Propriedade não encontrada"),
    )
)]
pub async fn listar_planejamentos(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let planejamentos = app_state.projecao_service.listar_planejamentos(id).await?;
    Ok(Json(planejamentos))
}

#[utoipa::path(
    get,
    path = "/planejamentos/{id}",
    tag = "Planejamentos",
    params(("id" = Uuid, Path, description = "Id do planejamento")),
    responses(
        (status = 200, description = "Planejamento", body = PlanejamentoAnual),
        (status = 404, description = "Planejamento não encontrado"),
    )
)]
pub async fn obter_planejamento(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let planejamento = app_state.projecao_service.obter_planejamento(id).await?;
    Ok(Json(planejamento))
}
