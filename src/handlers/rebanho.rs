// src/handlers/rebanho.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::propriedades::validar_nao_negativo,
    models::rebanho::{CategoriaAnimal, InventarioRebanho, Sexo},
    services::{auditoria::RelatorioAuditoria, rebanho_service::ItemInventario},
};

// ---
// Payload: CriarCategoria
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarCategoriaPayload {
    #[validate(length(min = 1, message = "O nome da categoria é obrigatório."))]
    pub nome: String,

    pub descricao: Option<String>,

    pub sexo: Sexo,

    #[validate(range(min = 0, message = "A idade mínima não pode ser negativa."))]
    pub idade_minima_meses: Option<i32>,

    #[validate(range(min = 1, message = "A idade máxima deve ser positiva."))]
    pub idade_maxima_meses: Option<i32>,

    pub peso_medio_kg: Option<Decimal>,
}

impl CriarCategoriaPayload {
    fn validar_faixa(&self) -> Result<(), validator::ValidationErrors> {
        if let (Some(min), Some(max)) = (self.idade_minima_meses, self.idade_maxima_meses) {
            if max <= min {
                let mut err = validator::ValidationError::new("faixa_etaria");
                err.message = Some("A idade máxima deve ser maior que a mínima.".into());
                let mut errors = validator::ValidationErrors::new();
                errors.add("idadeMaximaMeses", err);
                return Err(errors);
            }
        }
        Ok(())
    }
}

#[utoipa::path(
    post,
    path = "/categorias",
    tag = "Rebanho",
    request_body = CriarCategoriaPayload,
    responses(
        (status = 201, description = "Categoria criada", body = CategoriaAnimal),
        (status = 409, description = "Nome de categoria já existe"),
    )
)]
pub async fn criar_categoria(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarCategoriaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.validar_faixa()?;

    let categoria = app_state
        .rebanho_service
        .criar_categoria(
            &payload.nome,
            payload.descricao.as_deref(),
            payload.sexo,
            payload.idade_minima_meses,
            payload.idade_maxima_meses,
            payload.peso_medio_kg,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(categoria)))
}

#[utoipa::path(
    get,
    path = "/categorias",
    tag = "Rebanho",
    responses(
        (status = 200, description = "Taxonomia de categorias", body = [CategoriaAnimal]),
    )
)]
pub async fn listar_categorias(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categorias = app_state.rebanho_service.listar_categorias().await?;
    Ok(Json(categorias))
}

// ---
// Payload: RegistrarInventario
// ---
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemInventarioPayload {
    pub categoria_id: Uuid,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantidade: i32,

    #[validate(custom(function = "validar_nao_negativo"))]
    pub valor_por_cabeca: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarInventarioPayload {
    pub data_inventario: NaiveDate,

    #[validate(length(min = 1, message = "Informe ao menos uma categoria."), nested)]
    pub itens: Vec<ItemInventarioPayload>,
}

#[utoipa::path(
    post,
    path = "/propriedades/{id}/inventario",
    tag = "Rebanho",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    request_body = RegistrarInventarioPayload,
    responses(
        (status = 201, description = "Fotografia de inventário gravada", body = [InventarioRebanho]),
        (status = 404, description = "Propriedade ou categoria não encontrada"),
    )
)]
pub async fn registrar_inventario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegistrarInventarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let itens: Vec<ItemInventario> = payload
        .itens
        .iter()
        .map(|item| ItemInventario {
            categoria_id: item.categoria_id,
            quantidade: item.quantidade,
            valor_por_cabeca: item.valor_por_cabeca,
        })
        .collect();

    let gravados = app_state
        .rebanho_service
        .registrar_inventario(id, payload.data_inventario, &itens)
        .await?;

    Ok((StatusCode::CREATED, Json(gravados)))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/inventario",
    tag = "Rebanho",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Fotografias de inventário", body = [InventarioRebanho]),
        (status = 404, description = "Propriedade não encontrada"),
    )
)]
pub async fn listar_inventario(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let inventario = app_state.rebanho_service.listar_inventario(id).await?;
    Ok(Json(inventario))
}

// ---
// Consulta de saldo
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DataReferenciaQuery {
    /// Data de referência; hoje quando omitida.
    pub data: Option<NaiveDate>,
    /// Restringe o replay a uma rodada de projeção; sem ele, todas as
    /// rodadas da propriedade se somam.
    pub planejamento_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/categorias/{categoria_id}/saldo",
    tag = "Rebanho",
    params(
        ("id" = Uuid, Path, description = "Id da propriedade"),
        ("categoria_id" = Uuid, Path, description = "Id da categoria"),
        DataReferenciaQuery,
    ),
    responses(
        (status = 200, description = "Saldo disponível na data"),
        (status = 404, description = "Propriedade ou categoria não encontrada"),
    )
)]
pub async fn consultar_saldo(
    State(app_state): State<AppState>,
    Path((id, categoria_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<DataReferenciaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let data = query.data.unwrap_or_else(|| Utc::now().date_naive());
    let saldo = app_state
        .rebanho_service
        .saldo_categoria(id, categoria_id, data, query.planejamento_id)
        .await?;

    Ok(Json(json!({
        "propriedadeId": id,
        "categoriaId": categoria_id,
        "dataReferencia": data,
        "saldo": saldo,
    })))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}/auditoria",
    tag = "Rebanho",
    params(
        ("id" = Uuid, Path, description = "Id da propriedade"),
        DataReferenciaQuery,
    ),
    responses(
        (status = 200, description = "Relatório de auditoria do razão", body = RelatorioAuditoria),
        (status = 404, description = "Propriedade não encontrada"),
    )
)]
pub async fn auditar_razao(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DataReferenciaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let data = query.data.unwrap_or_else(|| Utc::now().date_naive());
    let relatorio = app_state
        .rebanho_service
        .auditar(id, data, query.planejamento_id)
        .await?;
    Ok(Json(relatorio))
}
