// src/models/propriedade.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Propriedade rural: agregado raiz de todos os dados do rebanho.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Propriedade {
    pub id: Uuid,
    pub nome_propriedade: String,
    pub produtor: String,
    pub municipio: String,
    pub uf: String,
    pub area_total_ha: Decimal,
    pub tipo_ciclo_pecuario: String,
    pub data_cadastro: DateTime<Utc>,
}
