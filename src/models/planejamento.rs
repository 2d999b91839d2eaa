// src/models/planejamento.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Status do planejamento ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_planejamento", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusPlanejamento {
    Rascunho,
    EmAndamento,
    Aprovado,
    Concluido,
    Arquivado,
}

// --- Planejamento anual (lote nomeado de uma rodada de projeção) ---
// Cada rodada grava suas movimentações sob um planejamento próprio; rodadas
// anteriores nunca são apagadas nem misturadas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanejamentoAnual {
    pub id: Uuid,
    pub propriedade_id: Uuid,
    pub codigo: Option<String>,
    pub ano: i32,
    pub descricao: String,
    pub status: StatusPlanejamento,
    pub data_criacao: DateTime<Utc>,
    pub data_atualizacao: DateTime<Utc>,
}

// --- Parâmetros demográficos e comerciais da projeção ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParametrosProjecaoRebanho {
    pub id: Uuid,
    pub propriedade_id: Uuid,
    pub taxa_natalidade_anual: Decimal,
    pub taxa_mortalidade_bezerros_anual: Decimal,
    pub taxa_mortalidade_adultos_anual: Decimal,
    pub percentual_venda_machos_anual: Decimal,
    pub percentual_venda_femeas_anual: Decimal,
    pub preco_venda_kg: Decimal,
    pub venda_final_ultimo_ano: bool,
    pub data_criacao: DateTime<Utc>,
}

impl ParametrosProjecaoRebanho {
    /// Valores padrão usados quando uma fazenda contraparte de transferência
    /// ainda não tem parâmetros próprios configurados.
    pub fn padrao(propriedade_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            propriedade_id,
            taxa_natalidade_anual: Decimal::new(8500, 2),
            taxa_mortalidade_bezerros_anual: Decimal::new(500, 2),
            taxa_mortalidade_adultos_anual: Decimal::new(200, 2),
            percentual_venda_machos_anual: Decimal::new(9000, 2),
            percentual_venda_femeas_anual: Decimal::new(1000, 2),
            preco_venda_kg: Decimal::new(1000, 2),
            venda_final_ultimo_ano: false,
            data_criacao: Utc::now(),
        }
    }
}

// --- Percentual de venda por categoria (sobrepõe o padrão machos/fêmeas) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParametrosVendaPorCategoria {
    pub id: Uuid,
    pub propriedade_id: Uuid,
    pub categoria_id: Uuid,
    pub percentual_venda_anual: Decimal,
    pub ativo: bool,
}

// --- Regra declarativa de transferência entre fazendas do mesmo produtor ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegraTransferencia {
    pub id: Uuid,
    pub propriedade_origem_id: Uuid,
    pub propriedade_destino_id: Uuid,
    pub categoria_id: Uuid,
    pub quantidade: i32,
    pub frequencia_meses: i32,
    pub ativo: bool,
}

// --- Compra programada (reposição periódica por categoria) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompraProgramada {
    pub id: Uuid,
    pub propriedade_id: Uuid,
    pub categoria_id: Uuid,
    pub quantidade: i32,
    pub frequencia_meses: i32,
    pub valor_por_cabeca: Option<Decimal>,
    pub ativo: bool,
}
