// src/models/rebanho.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Sexo do animal ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sexo_animal", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Sexo {
    F,
    M,
    I,
}

// --- Categoria de Animal (faixa etária × sexo) ---
// Dados de referência: raramente criados, nunca apagados na prática.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriaAnimal {
    pub id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub sexo: Sexo,
    pub idade_minima_meses: Option<i32>,
    /// `None` indica faixa aberta (ex.: Multíparas >36m), portanto terminal.
    pub idade_maxima_meses: Option<i32>,
    pub peso_medio_kg: Option<Decimal>,
    pub ativo: bool,
}

impl CategoriaAnimal {
    /// Largura da faixa etária em meses, quando a faixa é fechada.
    pub fn largura_faixa_meses(&self) -> Option<i32> {
        match (self.idade_minima_meses, self.idade_maxima_meses) {
            (Some(min), Some(max)) if max > min => Some(max - min),
            _ => None,
        }
    }

    /// Bezerros/bezerras: faixa que termina até os 12 meses.
    pub fn e_bezerro(&self) -> bool {
        matches!(self.idade_maxima_meses, Some(max) if max <= 12)
    }

    /// Matrizes em idade reprodutiva: fêmeas a partir dos 24 meses.
    pub fn e_matriz(&self) -> bool {
        self.sexo == Sexo::F && matches!(self.idade_minima_meses, Some(min) if min >= 24)
    }
}

// --- Inventário do rebanho (fotografia datada por propriedade × categoria) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventarioRebanho {
    pub id: Uuid,
    pub propriedade_id: Uuid,
    pub categoria_id: Uuid,
    pub quantidade: i32,
    pub valor_por_cabeca: Decimal,
    pub data_inventario: NaiveDate,
}

impl InventarioRebanho {
    pub fn valor_total(&self) -> Decimal {
        self.valor_por_cabeca * Decimal::from(self.quantidade)
    }
}
