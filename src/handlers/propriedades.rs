// src/handlers/propriedades.rs

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

use crate::{common::error::AppError, config::AppState, models::propriedade::Propriedade};

pub fn validar_nao_negativo(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CriarPropriedade
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarPropriedadePayload {
    #[validate(length(min = 1, message = "O nome da propriedade é obrigatório."))]
    pub nome_propriedade: String,

    #[validate(length(min = 1, message = "O nome do produtor é obrigatório."))]
    pub produtor: String,

    #[validate(length(min = 1, message = "O município é obrigatório."))]
    pub municipio: String,

    #[validate(length(equal = 2, message = "A UF deve ter 2 letras."))]
    pub uf: String,

    #[validate(custom(function = "validar_nao_negativo"))]
    pub area_total_ha: Decimal,

    #[validate(length(min = 1, message = "O tipo de ciclo pecuário é obrigatório."))]
    pub tipo_ciclo_pecuario: String,
}

#[utoipa::path(
    post,
    path = "/propriedades",
    tag = "Propriedades",
    request_body = CriarPropriedadePayload,
    responses(
        (status = 201, description = "Propriedade cadastrada", body = Propriedade),
        (status = 400, description = "Payload inválido"),
    )
)]
pub async fn criar_propriedade(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarPropriedadePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let propriedade = app_state
        .propriedades
        .criar(
            app_state.propriedades.pool(),
            &payload.nome_propriedade,
            &payload.produtor,
            &payload.municipio,
            &payload.uf,
            payload.area_total_ha,
            &payload.tipo_ciclo_pecuario,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(propriedade)))
}

#[utoipa::path(
    get,
    path = "/propriedades",
    tag = "Propriedades",
    responses(
        (status = 200, description = "Lista de propriedades", body = [Propriedade]),
    )
)]
pub async fn listar_propriedades(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let propriedades = app_state.propriedades.listar().await?;
    Ok(Json(propriedades))
}

#[utoipa::path(
    get,
    path = "/propriedades/{id}",
    tag = "Propriedades",
    params(("id" = Uuid, Path, description = "Id da propriedade")),
    responses(
        (status = 200, description = "Propriedade", body = Propriedade),
        (status = 404, description = "Propriedade não encontrada"),
    )
)]
pub async fn obter_propriedade(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let propriedade = app_state
        .propriedades
        .obter(id)
        .await?
        .ok_or(AppError::PropriedadeNaoEncontrada)?;
    Ok(Json(propriedade))
}
