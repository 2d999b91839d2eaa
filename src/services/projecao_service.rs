// src/services/projecao_service.rs
//
// Casca de persistência do motor de projeção: carrega fazenda, parâmetros,
// inventário e regras, roda `projecao::gerar_projecao` e grava o lote inteiro
// numa transação sob um planejamento novo. Rodadas anteriores permanecem
// intactas em seus próprios planejamentos.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        MovimentacaoRepository, PlanejamentoRepository, PropriedadeRepository, RebanhoRepository,
    },
    models::{
        movimentacao::{MovimentacaoProjetada, VendaProjetada},
        planejamento::{
            CompraProgramada, ParametrosProjecaoRebanho, ParametrosVendaPorCategoria,
            PlanejamentoAnual, RegraTransferencia, StatusPlanejamento,
        },
    },
    services::{
        projecao::{self, DadosPropriedade, EntradaProjecao},
        saldo::{self, RelatorioEvolucao},
    },
};

/// Resultado de uma rodada de projeção recém-gravada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoProjecao {
    pub planejamento: PlanejamentoAnual,
    pub total_movimentacoes: usize,
    pub total_vendas: usize,
    pub valor_total_vendas: Decimal,
}

#[derive(Clone)]
pub struct ProjecaoService {
    propriedades: PropriedadeRepository,
    rebanho: RebanhoRepository,
    planejamentos: PlanejamentoRepository,
    movimentacoes: MovimentacaoRepository,
}

impl ProjecaoService {
    pub fn new(
        propriedades: PropriedadeRepository,
        rebanho: RebanhoRepository,
        planejamentos: PlanejamentoRepository,
        movimentacoes: MovimentacaoRepository,
    ) -> Self {
        Self { propriedades, rebanho, planejamentos, movimentacoes }
    }

    /// Gera e persiste uma projeção de `anos` anos a partir de `data_inicio`.
    pub async fn gerar(
        &self,
        propriedade_id: Uuid,
        anos: u32,
        data_inicio: NaiveDate,
        descricao: &str,
    ) -> Result<ResumoProjecao, AppError> {
        let propriedade = self
            .propriedades
            .obter(propriedade_id)
            .await?
            .ok_or(AppError::PropriedadeNaoEncontrada)?;

        if self
            .planejamentos
            .obter_parametros(propriedade_id)
            .await?
            .is_none()
        {
            return Err(AppError::ParametrosNaoConfigurados);
        }
        if !self.rebanho.existe_inventario(propriedade_id).await? {
            return Err(AppError::InventarioNaoCadastrado);
        }

        let categorias = self.rebanho.listar_categorias().await?;
        let regras = self
            .planejamentos
            .listar_regras_transferencia(propriedade_id)
            .await?;

        // A fazenda consultada e toda contraparte de transferência entram na
        // simulação, para que as pontas de saída e entrada fechem.
        let mut participantes = vec![propriedade_id];
        for regra in regras.iter().filter(|r| r.ativo) {
            for id in [regra.propriedade_origem_id, regra.propriedade_destino_id] {
                if !participantes.contains(&id) {
                    participantes.push(id);
                }
            }
        }

        let mut dados = Vec::with_capacity(participantes.len());
        for id in &participantes {
            dados.push(self.carregar_dados_propriedade(*id).await?);
        }

        let entrada = EntradaProjecao {
            categorias,
            propriedades: dados,
            regras_transferencia: regras,
            anos,
            data_inicio,
        };
        let saida = projecao::gerar_projecao(&entrada)?;

        // Gravação atômica: planejamento, movimentações e vendas ou nada.
        let mut tx = self.planejamentos.pool().begin().await?;

        let ano = data_inicio.year();
        let codigo = self.planejamentos.proximo_codigo(&mut *tx, ano).await?;
        let planejamento = self
            .planejamentos
            .criar(
                &mut *tx,
                propriedade_id,
                &codigo,
                ano,
                descricao,
                StatusPlanejamento::Concluido,
            )
            .await?;

        let mut ids_movimentacoes = Vec::with_capacity(saida.movimentacoes.len());
        for nova in &saida.movimentacoes {
            let gravada = self
                .movimentacoes
                .inserir(&mut *tx, planejamento.id, nova)
                .await?;
            ids_movimentacoes.push(gravada.id);
        }

        let mut valor_total_vendas = Decimal::ZERO;
        for venda in &saida.vendas {
            let movimentacao_id = ids_movimentacoes
                .get(venda.indice_movimentacao)
                .copied()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "venda aponta para movimentação inexistente no lote: {}",
                        venda.indice_movimentacao
                    )
                })?;
            self.movimentacoes
                .inserir_venda(&mut *tx, planejamento.id, movimentacao_id, venda)
                .await?;
            valor_total_vendas += venda.valor_total.unwrap_or(Decimal::ZERO);
        }

        tx.commit().await?;

        tracing::info!(
            %propriedade_id,
            propriedade = %propriedade.nome_propriedade,
            codigo = %codigo,
            anos,
            movimentacoes = saida.movimentacoes.len(),
            vendas = saida.vendas.len(),
            "projeção persistida"
        );

        Ok(ResumoProjecao {
            planejamento,
            total_movimentacoes: saida.movimentacoes.len(),
            total_vendas: saida.vendas.len(),
            valor_total_vendas,
        })
    }

    /// Tabela de evolução mensal do planejamento, categoria a categoria.
    pub async fn evolucao(&self, planejamento_id: Uuid) -> Result<RelatorioEvolucao, AppError> {
        let planejamento = self.exigir_planejamento(planejamento_id).await?;
        let categorias = self.rebanho.listar_categorias().await?;
        let inventarios = self
            .rebanho
            .listar_inventario(planejamento.propriedade_id)
            .await?;
        let movimentacoes = self
            .movimentacoes
            .listar_por_planejamento(planejamento_id)
            .await?;

        // Só o razão da fazenda dona do planejamento entra na tabela; as
        // pontas gravadas nas contrapartes ficam de fora.
        let proprias: Vec<MovimentacaoProjetada> = movimentacoes
            .into_iter()
            .filter(|m| m.propriedade_id == planejamento.propriedade_id)
            .collect();

        Ok(saldo::evolucao_mensal(&categorias, &inventarios, &proprias))
    }

    /// Totais mensais por tipo de movimentação da rodada.
    pub async fn resumo_mensal(
        &self,
        planejamento_id: Uuid,
    ) -> Result<Vec<saldo::ResumoPeriodo>, AppError> {
        self.exigir_planejamento(planejamento_id).await?;
        let movimentacoes = self
            .movimentacoes
            .listar_por_planejamento(planejamento_id)
            .await?;
        Ok(saldo::resumo_mensal(&movimentacoes))
    }

    pub async fn obter_planejamento(
        &self,
        planejamento_id: Uuid,
    ) -> Result<PlanejamentoAnual, AppError> {
        self.exigir_planejamento(planejamento_id).await
    }

    pub async fn listar_planejamentos(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<PlanejamentoAnual>, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.planejamentos.listar_por_propriedade(propriedade_id).await
    }

    pub async fn listar_movimentacoes(
        &self,
        planejamento_id: Uuid,
    ) -> Result<Vec<MovimentacaoProjetada>, AppError> {
        self.exigir_planejamento(planejamento_id).await?;
        self.movimentacoes.listar_por_planejamento(planejamento_id).await
    }

    pub async fn listar_vendas(
        &self,
        planejamento_id: Uuid,
    ) -> Result<Vec<VendaProjetada>, AppError> {
        self.exigir_planejamento(planejamento_id).await?;
        self.movimentacoes
            .listar_vendas_por_planejamento(planejamento_id)
            .await
    }

    // ---
    // Configuração da projeção
    // ---

    pub async fn obter_parametros(
        &self,
        propriedade_id: Uuid,
    ) -> Result<ParametrosProjecaoRebanho, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.planejamentos
            .obter_parametros(propriedade_id)
            .await?
            .ok_or(AppError::ParametrosNaoConfigurados)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn configurar_parametros(
        &self,
        propriedade_id: Uuid,
        taxa_natalidade_anual: Decimal,
        taxa_mortalidade_bezerros_anual: Decimal,
        taxa_mortalidade_adultos_anual: Decimal,
        percentual_venda_machos_anual: Decimal,
        percentual_venda_femeas_anual: Decimal,
        preco_venda_kg: Decimal,
        venda_final_ultimo_ano: bool,
    ) -> Result<ParametrosProjecaoRebanho, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.planejamentos
            .upsert_parametros(
                self.planejamentos.pool(),
                propriedade_id,
                taxa_natalidade_anual,
                taxa_mortalidade_bezerros_anual,
                taxa_mortalidade_adultos_anual,
                percentual_venda_machos_anual,
                percentual_venda_femeas_anual,
                preco_venda_kg,
                venda_final_ultimo_ano,
            )
            .await
    }

    pub async fn listar_percentuais_venda(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<ParametrosVendaPorCategoria>, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.planejamentos.listar_percentuais_venda(propriedade_id).await
    }

    pub async fn definir_percentual_venda(
        &self,
        propriedade_id: Uuid,
        categoria_id: Uuid,
        percentual_venda_anual: Decimal,
    ) -> Result<ParametrosVendaPorCategoria, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        if self.rebanho.obter_categoria(categoria_id).await?.is_none() {
            return Err(AppError::CategoriaNaoEncontrada);
        }
        self.planejamentos
            .upsert_percentual_venda(
                self.planejamentos.pool(),
                propriedade_id,
                categoria_id,
                percentual_venda_anual,
            )
            .await
    }

    pub async fn listar_regras_transferencia(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<RegraTransferencia>, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.planejamentos.listar_regras_transferencia(propriedade_id).await
    }

    pub async fn criar_regra_transferencia(
        &self,
        propriedade_origem_id: Uuid,
        propriedade_destino_id: Uuid,
        categoria_id: Uuid,
        quantidade: i32,
        frequencia_meses: i32,
    ) -> Result<RegraTransferencia, AppError> {
        self.exigir_propriedade(propriedade_origem_id).await?;
        self.exigir_propriedade(propriedade_destino_id).await?;
        if self.rebanho.obter_categoria(categoria_id).await?.is_none() {
            return Err(AppError::CategoriaNaoEncontrada);
        }
        self.planejamentos
            .criar_regra_transferencia(
                self.planejamentos.pool(),
                propriedade_origem_id,
                propriedade_destino_id,
                categoria_id,
                quantidade,
                frequencia_meses,
            )
            .await
    }

    pub async fn listar_compras_programadas(
        &self,
        propriedade_id: Uuid,
    ) -> Result<Vec<CompraProgramada>, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        self.planejamentos.listar_compras_programadas(propriedade_id).await
    }

    pub async fn criar_compra_programada(
        &self,
        propriedade_id: Uuid,
        categoria_id: Uuid,
        quantidade: i32,
        frequencia_meses: i32,
        valor_por_cabeca: Option<Decimal>,
    ) -> Result<CompraProgramada, AppError> {
        self.exigir_propriedade(propriedade_id).await?;
        if self.rebanho.obter_categoria(categoria_id).await?.is_none() {
            return Err(AppError::CategoriaNaoEncontrada);
        }
        self.planejamentos
            .criar_compra_programada(
                self.planejamentos.pool(),
                propriedade_id,
                categoria_id,
                quantidade,
                frequencia_meses,
                valor_por_cabeca,
            )
            .await
    }

    // ---

    async fn carregar_dados_propriedade(
        &self,
        propriedade_id: Uuid,
    ) -> Result<DadosPropriedade, AppError> {
        let propriedade = self
            .propriedades
            .obter(propriedade_id)
            .await?
            .ok_or(AppError::PropriedadeNaoEncontrada)?;

        // Contrapartes sem parâmetros próprios simulam com os padrões.
        let parametros = self
            .planejamentos
            .obter_parametros(propriedade_id)
            .await?
            .unwrap_or_else(|| ParametrosProjecaoRebanho::padrao(propriedade_id));

        Ok(DadosPropriedade {
            propriedade_id,
            nome_propriedade: propriedade.nome_propriedade,
            inventario: self.rebanho.listar_inventario(propriedade_id).await?,
            parametros,
            percentuais_venda: self
                .planejamentos
                .listar_percentuais_venda(propriedade_id)
                .await?,
            compras_programadas: self
                .planejamentos
                .listar_compras_programadas(propriedade_id)
                .await?,
        })
    }

    async fn exigir_propriedade(&self, propriedade_id: Uuid) -> Result<(), AppError> {
        self.propriedades
            .obter(propriedade_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::PropriedadeNaoEncontrada)
    }

    async fn exigir_planejamento(
        &self,
        planejamento_id: Uuid,
    ) -> Result<PlanejamentoAnual, AppError> {
        self.planejamentos
            .obter(planejamento_id)
            .await?
            .ok_or(AppError::PlanejamentoNaoEncontrado)
    }
}
