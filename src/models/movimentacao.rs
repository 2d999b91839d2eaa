// src/models/movimentacao.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Tipo de movimentação do razão ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_movimentacao", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoMovimentacao {
    Nascimento,
    Compra,
    Venda,
    Morte,
    TransferenciaEntrada,
    TransferenciaSaida,
    PromocaoEntrada,
    PromocaoSaida,
}

impl TipoMovimentacao {
    /// Sinal aplicado ao saldo da categoria durante o replay.
    pub fn sinal(self) -> i32 {
        match self {
            TipoMovimentacao::Nascimento
            | TipoMovimentacao::Compra
            | TipoMovimentacao::TransferenciaEntrada
            | TipoMovimentacao::PromocaoEntrada => 1,
            TipoMovimentacao::Venda
            | TipoMovimentacao::Morte
            | TipoMovimentacao::TransferenciaSaida
            | TipoMovimentacao::PromocaoSaida => -1,
        }
    }

    pub fn e_saida(self) -> bool {
        self.sinal() < 0
    }
}

// --- Movimentação projetada (linha do razão) ---
// `ordem` é atribuída pelo banco na inserção; empates na mesma data são
// desfeitos por ela no replay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovimentacaoProjetada {
    pub id: Uuid,
    pub ordem: i64,
    pub propriedade_id: Uuid,
    pub planejamento_id: Uuid,
    pub categoria_id: Uuid,
    pub data_movimentacao: NaiveDate,
    pub tipo_movimentacao: TipoMovimentacao,
    pub quantidade: i32,
    pub valor_por_cabeca: Option<Decimal>,
    pub valor_total: Option<Decimal>,
    pub observacao: Option<String>,
}

/// Movimentação recém-gerada pelo motor de projeção, ainda sem id nem ordem.
#[derive(Debug, Clone)]
pub struct NovaMovimentacao {
    pub propriedade_id: Uuid,
    pub categoria_id: Uuid,
    pub data_movimentacao: NaiveDate,
    pub tipo_movimentacao: TipoMovimentacao,
    pub quantidade: i32,
    pub valor_por_cabeca: Option<Decimal>,
    pub valor_total: Option<Decimal>,
    pub observacao: Option<String>,
}

// --- Venda projetada (detalhe 1:1 de uma movimentação VENDA) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendaProjetada {
    pub id: Uuid,
    pub propriedade_id: Uuid,
    pub planejamento_id: Uuid,
    pub movimentacao_projetada_id: Uuid,
    pub categoria_id: Uuid,
    pub data_venda: NaiveDate,
    pub quantidade: i32,
    pub cliente_nome: Option<String>,
    pub peso_medio_kg: Option<Decimal>,
    pub peso_total_kg: Option<Decimal>,
    pub valor_por_kg: Option<Decimal>,
    pub valor_total: Option<Decimal>,
}

/// Detalhe de venda gerado pelo motor; `indice_movimentacao` aponta para a
/// posição da movimentação VENDA correspondente no lote gerado.
#[derive(Debug, Clone)]
pub struct NovaVendaProjetada {
    pub indice_movimentacao: usize,
    pub propriedade_id: Uuid,
    pub categoria_id: Uuid,
    pub data_venda: NaiveDate,
    pub quantidade: i32,
    pub peso_medio_kg: Option<Decimal>,
    pub peso_total_kg: Option<Decimal>,
    pub valor_por_kg: Option<Decimal>,
    pub valor_total: Option<Decimal>,
}
