// src/services/rebanho_service.rs
//
// Orquestra taxonomia, inventário, consulta de saldo e auditoria. As regras
// de cálculo ficam nos módulos puros `saldo` e `auditoria`; aqui só se carrega
// o que o banco tem e se delega.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MovimentacaoRepository, PropriedadeRepository, RebanhoRepository},
    models::rebanho::{CategoriaAnimal, InventarioRebanho, Sexo},
    services::{auditoria, saldo},
};

/// Linha de inventário a gravar numa fotografia datada.
#[derive(Debug, Clone)]
pub struct ItemInventario {
    pub categoria_id: Uuid,
    pub quantidade: i32,
    pub valor_por_cabeca: Decimal,
}

#[derive(Clone)]
pub struct RebanhoService {
    propriedades: PropriedadeRepository,
    rebanho: RebanhoRepository,
    movimentacoes: MovimentacaoRepository,
}

impl RebanhoService {
    pub fn new(
        propriedades: PropriedadeRepository,
        rebanho: RebanhoRepository,
        movimentacoes: MovimentacaoRepository,
    ) -> Self {
        Self { propriedades, rebanho, movimentacoes }
    }

    pub async fn listar_categorias(&self) -> Result<Vec<CategoriaAnimal>, AppError> {
        self.rebanho.listar_categorias().await
    }

    pub async fn criar_categoria(
        &self,
        nome: &str,
        descricao: Option<&str>,
        sexo: Sexo,
        idade_minima_meses: Option<i32>,
        idade_maxima_meses: Option<i32>,
        peso_medio_kg: Option<Decimal>,
    ) -> Result<CategoriaAnimal, AppError> {
        self.rebanho
            .criar_categoria(
                self.rebanho.pool(),
                nome,
                descricao,
                sexo,
                idade_minima_meses,
                idade_maxima_meses,
                peso_medio_kg,
            )
            .await
    }

    pub async fn listar_inventario(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<InventarioRebanho>, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.rebanho.listar_inventario(propriedade_id).await
    }

    /// Grava uma fotografia de inventário: uma linha por categoria, todas com
    /// a mesma data.
    pub async fn registrar_inventario(
        &self,
        propriedade_id: Uuid,
        data_inventario: NaiveDate,
        itens: &[ItemInventario],
    ) -> Result<Vec<InventarioRebanho>, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        for item in itens {
            if self.rebanho.obter_categoria(item.categoria_id).await?.is_none() {
                return Err(AppError::CategoriaNaoEncontrada);
            }
        }

        let mut gravados = Vec::with_capacity(itens.len());
        for item in itens {
            let linha = self
                .rebanho
                .upsert_inventario(
                    self.rebanho.pool(),
                    propriedade_id,
                    item.categoria_id,
                    item.quantidade,
                    item.valor_por_cabeca,
                    data_inventario,
                )
                .await?;
            gravados.push(linha);
        }

        tracing::info!(
            %propriedade_id,
            %data_inventario,
            linhas = gravados.len(),
            "inventário registrado"
        );
        Ok(gravados)
    }

    /// Saldo disponível de uma categoria na data: fotografia mais recente
    /// mais o replay do razão, nunca negativo. Com `planejamento_id`, só o
    /// razão daquela rodada entra no replay; sem ele, rodadas distintas se
    /// somariam, então o filtro é o uso normal.
    pub async fn saldo_categoria(
        &self,
        propriedade_id: Uuid,
        categoria_id: Uuid,
        data_referencia: NaiveDate,
        planejamento_id: Option<Uuid>,
    ) -> Result<i32, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        if self.rebanho.obter_categoria(categoria_id).await?.is_none() {
            return Err(AppError::CategoriaNaoEncontrada);
        }

        let inventarios = self.rebanho.listar_inventario(propriedade_id).await?;
        let movimentacoes = self
            .carregar_razao(propriedade_id, planejamento_id)
            .await?;
        Ok(saldo::saldo_em(&inventarios, &movimentacoes, categoria_id, data_referencia))
    }

    /// Auditoria de consistência do razão da propriedade: excursões negativas,
    /// promoções sem par, transferências desbalanceadas e categorias órfãs.
    pub async fn auditar(
        &self,
        propriedade_id: Uuid,
        data_referencia: NaiveDate,
        planejamento_id: Option<Uuid>,
    ) -> Result<auditoria::RelatorioAuditoria, AppError> {
        self.exigir_propriedade(propriedade_id).await?;

        let categorias = self.rebanho.listar_categorias().await?;
        let inventarios = self.rebanho.listar_inventario(propriedade_id).await?;
        let movimentacoes = self
            .carregar_razao(propriedade_id, planejamento_id)
            .await?;

        let relatorio = auditoria::auditar(&categorias, &inventarios, &movimentacoes, data_referencia);
        if !relatorio.consistente() {
            tracing::warn!(
                %propriedade_id,
                violacoes = relatorio.violacoes_saldo.len(),
                promocoes_sem_par = relatorio.promocoes_sem_par.len(),
                transferencias = relatorio.transferencias_desbalanceadas.len(),
                "razão inconsistente"
            );
        }
        Ok(relatorio)
    }

    async fn carregar_razao(
        &self,
        propriedade_id: Uuid,
        planejamento_id: Option<Uuid>,
    ) -> Result<Vec<crate::models::movimentacao::MovimentacaoProjetada>, AppError> {
        let mut movimentacoes = self
            .movimentacoes
            .listar_por_propriedade(propriedade_id)
            .await?;
        if let Some(planejamento_id) = planejamento_id {
            movimentacoes.retain(|m| m.planejamento_id == planejamento_id);
        }
        Ok(movimentacoes)
    }

    async fn exigir_propriedade(&self, propriedade_id: Uuid) -> Result<(), AppError> {
        self.propriedades
            .obter(propriedade_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::PropriedadeNaoEncontrada)
    }
}
