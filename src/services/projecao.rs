// src/services/projecao.rs
//
// Motor de projeção do rebanho. Simulação puramente em memória: recebe a
// taxonomia, o inventário e os parâmetros de cada fazenda e devolve o lote de
// movimentações datadas de N anos. A persistência fica no
// `projecao_service`.
//
// Ordem fixa dentro de cada mês: nascimentos, promoções de idade, mortes,
// vendas, compras, transferências. Os saldos correntes são atualizados após
// cada passo e toda saída é limitada ao saldo disponível, de modo que o razão
// gerado nunca produz saldo negativo em replay. Promoções sempre entram no
// lote antes das transferências do mesmo dia.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::movimentacao::{NovaMovimentacao, NovaVendaProjetada, TipoMovimentacao};
use crate::models::planejamento::{
    CompraProgramada, ParametrosProjecaoRebanho, ParametrosVendaPorCategoria, RegraTransferencia,
};
use crate::models::rebanho::{CategoriaAnimal, InventarioRebanho, Sexo};

/// Dados de uma fazenda participante da simulação.
#[derive(Debug, Clone)]
pub struct DadosPropriedade {
    pub propriedade_id: Uuid,
    pub nome_propriedade: String,
    pub inventario: Vec<InventarioRebanho>,
    pub parametros: ParametrosProjecaoRebanho,
    pub percentuais_venda: Vec<ParametrosVendaPorCategoria>,
    pub compras_programadas: Vec<CompraProgramada>,
}

#[derive(Debug, Clone)]
pub struct EntradaProjecao {
    pub categorias: Vec<CategoriaAnimal>,
    pub propriedades: Vec<DadosPropriedade>,
    pub regras_transferencia: Vec<RegraTransferencia>,
    pub anos: u32,
    pub data_inicio: NaiveDate,
}

#[derive(Debug, Default)]
pub struct SaidaProjecao {
    pub movimentacoes: Vec<NovaMovimentacao>,
    pub vendas: Vec<NovaVendaProjetada>,
}

/// Taxonomia resolvida: índice por id e mapa de sucessão derivado das faixas
/// etárias (mesmo sexo, idade mínima igual à idade máxima da antecessora).
struct Taxonomia<'a> {
    por_id: HashMap<Uuid, &'a CategoriaAnimal>,
    sucessora: HashMap<Uuid, Uuid>,
}

impl<'a> Taxonomia<'a> {
    fn montar(categorias: &'a [CategoriaAnimal]) -> Self {
        let ativas: Vec<&CategoriaAnimal> = categorias.iter().filter(|c| c.ativo).collect();
        let por_id = ativas.iter().map(|c| (c.id, *c)).collect();

        let mut sucessora = HashMap::new();
        for cat in &ativas {
            if let Some(max) = cat.idade_maxima_meses {
                if let Some(proxima) = ativas
                    .iter()
                    .find(|c| c.sexo == cat.sexo && c.idade_minima_meses == Some(max))
                {
                    sucessora.insert(cat.id, proxima.id);
                }
            }
        }

        Self { por_id, sucessora }
    }

    fn obter(&self, id: Uuid) -> Result<&'a CategoriaAnimal, AppError> {
        self.por_id.get(&id).copied().ok_or(AppError::CategoriaNaoEncontrada)
    }

    fn categoria_nascimento(&self, sexo: Sexo) -> Option<&'a CategoriaAnimal> {
        self.por_id
            .values()
            .find(|c| c.sexo == sexo && c.idade_minima_meses == Some(0))
            .copied()
    }

    /// Categorias em ordem estável (idade mínima, nome) para iteração
    /// determinística.
    fn ordenadas(&self) -> Vec<&'a CategoriaAnimal> {
        let mut cats: Vec<&CategoriaAnimal> = self.por_id.values().copied().collect();
        cats.sort_by(|a, b| {
            (a.idade_minima_meses, &a.nome).cmp(&(b.idade_minima_meses, &b.nome))
        });
        cats
    }
}

/// Estado corrente da simulação: saldos por (propriedade, categoria) e o lote
/// de movimentações emitido até aqui.
struct Simulacao {
    saldos: HashMap<(Uuid, Uuid), i32>,
    movimentacoes: Vec<NovaMovimentacao>,
    vendas: Vec<NovaVendaProjetada>,
}

impl Simulacao {
    fn saldo(&self, propriedade_id: Uuid, categoria_id: Uuid) -> i32 {
        *self.saldos.get(&(propriedade_id, categoria_id)).unwrap_or(&0)
    }

    fn emitir_entrada(&mut self, mov: NovaMovimentacao) {
        *self.saldos.entry((mov.propriedade_id, mov.categoria_id)).or_insert(0) += mov.quantidade;
        self.movimentacoes.push(mov);
    }

    /// Emite uma saída limitada ao saldo disponível; devolve a quantidade
    /// efetivamente movimentada.
    fn emitir_saida(&mut self, mut mov: NovaMovimentacao, desejado: i32) -> i32 {
        let disponivel = self.saldo(mov.propriedade_id, mov.categoria_id);
        let quantidade = desejado.min(disponivel);
        if quantidade <= 0 {
            return 0;
        }
        mov.quantidade = quantidade;
        *self
            .saldos
            .entry((mov.propriedade_id, mov.categoria_id))
            .or_insert(0) -= quantidade;
        self.movimentacoes.push(mov);
        quantidade
    }
}

/// Fração mensal de uma taxa anual percentual, aplicada a uma contagem de
/// cabeças. Aritmética inteira via Decimal, truncando como o gerador
/// original.
fn aplicar_taxa_mensal(cabecas: i32, taxa_anual: Decimal) -> i32 {
    if cabecas <= 0 || taxa_anual <= Decimal::ZERO {
        return 0;
    }
    let mensal = Decimal::from(cabecas) * taxa_anual / Decimal::from(1200);
    mensal.trunc().to_i32().unwrap_or(0)
}

pub fn gerar_projecao(entrada: &EntradaProjecao) -> Result<SaidaProjecao, AppError> {
    let taxonomia = Taxonomia::montar(&entrada.categorias);

    // Valida referências de categoria antes de simular.
    for prop in &entrada.propriedades {
        for pv in &prop.percentuais_venda {
            taxonomia.obter(pv.categoria_id)?;
        }
        for compra in &prop.compras_programadas {
            taxonomia.obter(compra.categoria_id)?;
        }
    }
    for regra in &entrada.regras_transferencia {
        taxonomia.obter(regra.categoria_id)?;
    }

    let mut sim = Simulacao {
        saldos: HashMap::new(),
        movimentacoes: Vec::new(),
        vendas: Vec::new(),
    };

    // Saldo inicial: fotografia mais recente com data ≤ início da projeção.
    for prop in &entrada.propriedades {
        for cat in taxonomia.ordenadas() {
            let inicial = prop
                .inventario
                .iter()
                .filter(|inv| {
                    inv.categoria_id == cat.id && inv.data_inventario <= entrada.data_inicio
                })
                .max_by_key(|inv| inv.data_inventario)
                .map(|inv| inv.quantidade)
                .unwrap_or(0);
            if inicial > 0 {
                sim.saldos.insert((prop.propriedade_id, cat.id), inicial);
            }
        }
    }

    let nomes: HashMap<Uuid, &str> = entrada
        .propriedades
        .iter()
        .map(|p| (p.propriedade_id, p.nome_propriedade.as_str()))
        .collect();

    let total_meses = entrada.anos.saturating_mul(12);
    let mut ano = entrada.data_inicio.year();
    let mut mes = entrada.data_inicio.month();

    for indice_mes in 0..total_meses {
        let data = NaiveDate::from_ymd_opt(ano, mes, 15)
            .ok_or_else(|| anyhow::anyhow!("data de simulação inválida: {ano}-{mes}"))?;

        for prop in &entrada.propriedades {
            simular_nascimentos(&mut sim, &taxonomia, prop, data)?;
            simular_promocoes(&mut sim, &taxonomia, prop, data);
            simular_mortes(&mut sim, &taxonomia, prop, data);
            simular_vendas(&mut sim, &taxonomia, prop, data, false)?;
            simular_compras(&mut sim, prop, data, indice_mes);
        }

        simular_transferencias(&mut sim, entrada, &nomes, data, indice_mes);

        // Fechamento do último ano projetado: zera as categorias de venda.
        if indice_mes + 1 == total_meses {
            for prop in &entrada.propriedades {
                if prop.parametros.venda_final_ultimo_ano {
                    simular_vendas(&mut sim, &taxonomia, prop, data, true)?;
                }
            }
        }

        mes += 1;
        if mes > 12 {
            mes = 1;
            ano += 1;
        }
    }

    tracing::info!(
        movimentacoes = sim.movimentacoes.len(),
        vendas = sim.vendas.len(),
        "projeção gerada"
    );

    Ok(SaidaProjecao { movimentacoes: sim.movimentacoes, vendas: sim.vendas })
}

fn simular_nascimentos(
    sim: &mut Simulacao,
    taxonomia: &Taxonomia<'_>,
    prop: &DadosPropriedade,
    data: NaiveDate,
) -> Result<(), AppError> {
    let matrizes: i32 = taxonomia
        .ordenadas()
        .iter()
        .filter(|c| c.e_matriz())
        .map(|c| sim.saldo(prop.propriedade_id, c.id))
        .sum();

    let total = aplicar_taxa_mensal(matrizes, prop.parametros.taxa_natalidade_anual);
    if total == 0 {
        return Ok(());
    }

    let machos = total / 2;
    let femeas = total - machos;

    for (sexo, quantidade) in [(Sexo::M, machos), (Sexo::F, femeas)] {
        if quantidade == 0 {
            continue;
        }
        let Some(destino) = taxonomia.categoria_nascimento(sexo) else {
            tracing::warn!(?sexo, "taxonomia sem categoria de nascimento");
            continue;
        };
        sim.emitir_entrada(NovaMovimentacao {
            propriedade_id: prop.propriedade_id,
            categoria_id: destino.id,
            data_movimentacao: data,
            tipo_movimentacao: TipoMovimentacao::Nascimento,
            quantidade,
            valor_por_cabeca: None,
            valor_total: None,
            observacao: Some(format!(
                "Nascimentos - natalidade {}% a.a. sobre {matrizes} matrizes",
                prop.parametros.taxa_natalidade_anual
            )),
        });
    }

    Ok(())
}

fn simular_promocoes(
    sim: &mut Simulacao,
    taxonomia: &Taxonomia<'_>,
    prop: &DadosPropriedade,
    data: NaiveDate,
) {
    // Fotografia no início da fase: animais recém-promovidos não evoluem de
    // novo no mesmo mês.
    let saldos_fase: Vec<(&CategoriaAnimal, i32)> = taxonomia
        .ordenadas()
        .into_iter()
        .map(|c| (c, sim.saldo(prop.propriedade_id, c.id)))
        .collect();

    for (categoria, saldo) in saldos_fase {
        if saldo <= 0 {
            continue;
        }
        let Some(&proxima_id) = taxonomia.sucessora.get(&categoria.id) else {
            continue;
        };
        let Some(largura) = categoria.largura_faixa_meses() else {
            continue;
        };
        // Parcela mensal proporcional à largura da faixa etária.
        let promovidos = saldo / largura;
        if promovidos <= 0 {
            continue;
        }

        let proxima_nome = taxonomia
            .por_id
            .get(&proxima_id)
            .map(|c| c.nome.clone())
            .unwrap_or_default();
        let observacao =
            Some(format!("Evolução de idade - {} -> {}", categoria.nome, proxima_nome));

        let efetivo = sim.emitir_saida(
            NovaMovimentacao {
                propriedade_id: prop.propriedade_id,
                categoria_id: categoria.id,
                data_movimentacao: data,
                tipo_movimentacao: TipoMovimentacao::PromocaoSaida,
                quantidade: promovidos,
                valor_por_cabeca: None,
                valor_total: None,
                observacao: observacao.clone(),
            },
            promovidos,
        );
        if efetivo > 0 {
            sim.emitir_entrada(NovaMovimentacao {
                propriedade_id: prop.propriedade_id,
                categoria_id: proxima_id,
                data_movimentacao: data,
                tipo_movimentacao: TipoMovimentacao::PromocaoEntrada,
                quantidade: efetivo,
                valor_por_cabeca: None,
                valor_total: None,
                observacao,
            });
        }
    }
}

fn simular_mortes(
    sim: &mut Simulacao,
    taxonomia: &Taxonomia<'_>,
    prop: &DadosPropriedade,
    data: NaiveDate,
) {
    for categoria in taxonomia.ordenadas() {
        let saldo = sim.saldo(prop.propriedade_id, categoria.id);
        if saldo <= 0 {
            continue;
        }
        let taxa = if categoria.e_bezerro() {
            prop.parametros.taxa_mortalidade_bezerros_anual
        } else {
            prop.parametros.taxa_mortalidade_adultos_anual
        };
        let mortes = aplicar_taxa_mensal(saldo, taxa);
        if mortes == 0 {
            continue;
        }
        sim.emitir_saida(
            NovaMovimentacao {
                propriedade_id: prop.propriedade_id,
                categoria_id: categoria.id,
                data_movimentacao: data,
                tipo_movimentacao: TipoMovimentacao::Morte,
                quantidade: mortes,
                valor_por_cabeca: None,
                valor_total: None,
                observacao: Some(format!("Mortes - mortalidade {taxa}% a.a.")),
            },
            mortes,
        );
    }
}

/// Percentual de venda efetivo de uma categoria: linha por categoria quando
/// configurada; senão o padrão machos/fêmeas, aplicado apenas às categorias
/// terminais (sem sucessora).
fn percentual_venda(
    taxonomia: &Taxonomia<'_>,
    prop: &DadosPropriedade,
    categoria: &CategoriaAnimal,
) -> Decimal {
    if let Some(pv) = prop
        .percentuais_venda
        .iter()
        .find(|pv| pv.ativo && pv.categoria_id == categoria.id)
    {
        return pv.percentual_venda_anual;
    }
    if taxonomia.sucessora.contains_key(&categoria.id) {
        return Decimal::ZERO;
    }
    match categoria.sexo {
        Sexo::M => prop.parametros.percentual_venda_machos_anual,
        Sexo::F => prop.parametros.percentual_venda_femeas_anual,
        Sexo::I => Decimal::ZERO,
    }
}

fn simular_vendas(
    sim: &mut Simulacao,
    taxonomia: &Taxonomia<'_>,
    prop: &DadosPropriedade,
    data: NaiveDate,
    fechamento_final: bool,
) -> Result<(), AppError> {
    for categoria in taxonomia.ordenadas() {
        let saldo = sim.saldo(prop.propriedade_id, categoria.id);
        if saldo <= 0 {
            continue;
        }
        let percentual = percentual_venda(taxonomia, prop, categoria);
        if percentual <= Decimal::ZERO {
            continue;
        }

        let desejado = if fechamento_final {
            saldo
        } else {
            aplicar_taxa_mensal(saldo, percentual)
        };
        if desejado == 0 {
            continue;
        }

        let valor_por_cabeca = categoria
            .peso_medio_kg
            .map(|peso| peso * prop.parametros.preco_venda_kg);
        let observacao = if fechamento_final {
            "Venda de fechamento do último ano projetado".to_string()
        } else {
            format!("Venda programada - {percentual}% a.a. de {}", categoria.nome)
        };

        let quantidade = sim.emitir_saida(
            NovaMovimentacao {
                propriedade_id: prop.propriedade_id,
                categoria_id: categoria.id,
                data_movimentacao: data,
                tipo_movimentacao: TipoMovimentacao::Venda,
                quantidade: desejado,
                valor_por_cabeca,
                valor_total: valor_por_cabeca.map(|v| v * Decimal::from(desejado)),
                observacao: Some(observacao),
            },
            desejado,
        );
        if quantidade == 0 {
            continue;
        }

        // Corrige o valor total para a quantidade efetiva e anexa o detalhe
        // de venda 1:1.
        let indice = sim.movimentacoes.len() - 1;
        if let Some(mov) = sim.movimentacoes.last_mut() {
            mov.valor_total = valor_por_cabeca.map(|v| v * Decimal::from(quantidade));
        }
        sim.vendas.push(NovaVendaProjetada {
            indice_movimentacao: indice,
            propriedade_id: prop.propriedade_id,
            categoria_id: categoria.id,
            data_venda: data,
            quantidade,
            peso_medio_kg: categoria.peso_medio_kg,
            peso_total_kg: categoria.peso_medio_kg.map(|p| p * Decimal::from(quantidade)),
            valor_por_kg: Some(prop.parametros.preco_venda_kg),
            valor_total: valor_por_cabeca.map(|v| v * Decimal::from(quantidade)),
        });
    }

    Ok(())
}

fn simular_compras(
    sim: &mut Simulacao,
    prop: &DadosPropriedade,
    data: NaiveDate,
    indice_mes: u32,
) {
    for compra in prop.compras_programadas.iter().filter(|c| c.ativo) {
        if indice_mes % compra.frequencia_meses.max(1) as u32 != 0 {
            continue;
        }
        sim.emitir_entrada(NovaMovimentacao {
            propriedade_id: prop.propriedade_id,
            categoria_id: compra.categoria_id,
            data_movimentacao: data,
            tipo_movimentacao: TipoMovimentacao::Compra,
            quantidade: compra.quantidade,
            valor_por_cabeca: compra.valor_por_cabeca,
            valor_total: compra
                .valor_por_cabeca
                .map(|v| v * Decimal::from(compra.quantidade)),
            observacao: Some("Compra programada".to_string()),
        });
    }
}

fn simular_transferencias(
    sim: &mut Simulacao,
    entrada: &EntradaProjecao,
    nomes: &HashMap<Uuid, &str>,
    data: NaiveDate,
    indice_mes: u32,
) {
    for regra in entrada.regras_transferencia.iter().filter(|r| r.ativo) {
        if indice_mes % regra.frequencia_meses.max(1) as u32 != 0 {
            continue;
        }

        let origem = nomes.get(&regra.propriedade_origem_id).copied().unwrap_or("origem");
        let destino = nomes.get(&regra.propriedade_destino_id).copied().unwrap_or("destino");
        let observacao = Some(format!("Transferência {origem} -> {destino}"));

        // A saída é limitada ao saldo da origem após as promoções do dia; a
        // entrada espelha exatamente a quantidade efetiva.
        let efetivo = sim.emitir_saida(
            NovaMovimentacao {
                propriedade_id: regra.propriedade_origem_id,
                categoria_id: regra.categoria_id,
                data_movimentacao: data,
                tipo_movimentacao: TipoMovimentacao::TransferenciaSaida,
                quantidade: regra.quantidade,
                valor_por_cabeca: None,
                valor_total: None,
                observacao: observacao.clone(),
            },
            regra.quantidade,
        );
        if efetivo > 0 {
            sim.emitir_entrada(NovaMovimentacao {
                propriedade_id: regra.propriedade_destino_id,
                categoria_id: regra.categoria_id,
                data_movimentacao: data,
                tipo_movimentacao: TipoMovimentacao::TransferenciaEntrada,
                quantidade: efetivo,
                valor_por_cabeca: None,
                valor_total: None,
                observacao,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movimentacao::MovimentacaoProjetada;
    use rust_decimal_macros::dec;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn categoria(
        nome: &str,
        sexo: Sexo,
        min: Option<i32>,
        max: Option<i32>,
        peso: Decimal,
    ) -> CategoriaAnimal {
        CategoriaAnimal {
            id: Uuid::new_v4(),
            nome: nome.to_string(),
            descricao: None,
            sexo,
            idade_minima_meses: min,
            idade_maxima_meses: max,
            peso_medio_kg: Some(peso),
            ativo: true,
        }
    }

    /// Taxonomia padrão do seed: duas cadeias de evolução (machos e fêmeas).
    fn taxonomia_padrao() -> Vec<CategoriaAnimal> {
        vec![
            categoria("Bezerros (0-12m)", Sexo::M, Some(0), Some(12), dec!(180)),
            categoria("Bezerras (0-12m)", Sexo::F, Some(0), Some(12), dec!(170)),
            categoria("Garrotes (12-24m)", Sexo::M, Some(12), Some(24), dec!(300)),
            categoria("Novilhas (12-24m)", Sexo::F, Some(12), Some(24), dec!(280)),
            categoria("Bois (24-36m)", Sexo::M, Some(24), Some(36), dec!(480)),
            categoria("Primíparas (24-36m)", Sexo::F, Some(24), Some(36), dec!(400)),
            categoria("Multíparas (>36m)", Sexo::F, Some(36), None, dec!(450)),
        ]
    }

    fn achar(categorias: &[CategoriaAnimal], nome: &str) -> Uuid {
        categorias.iter().find(|c| c.nome == nome).unwrap().id
    }

    fn inventario(prop: Uuid, cat: Uuid, qtd: i32) -> InventarioRebanho {
        InventarioRebanho {
            id: Uuid::new_v4(),
            propriedade_id: prop,
            categoria_id: cat,
            quantidade: qtd,
            valor_por_cabeca: dec!(2000),
            data_inventario: data(2024, 1, 1),
        }
    }

    fn parametros(prop: Uuid) -> ParametrosProjecaoRebanho {
        ParametrosProjecaoRebanho::padrao(prop)
    }

    fn propriedade(nome: &str, inventario: Vec<InventarioRebanho>, prop: Uuid) -> DadosPropriedade {
        DadosPropriedade {
            propriedade_id: prop,
            nome_propriedade: nome.to_string(),
            inventario,
            parametros: parametros(prop),
            percentuais_venda: vec![],
            compras_programadas: vec![],
        }
    }

    /// Converte o lote gerado em linhas de razão com `ordem` igual à posição
    /// de inserção, para replay nos testes.
    fn como_razao(saida: &SaidaProjecao) -> Vec<MovimentacaoProjetada> {
        saida
            .movimentacoes
            .iter()
            .enumerate()
            .map(|(i, m)| MovimentacaoProjetada {
                id: Uuid::new_v4(),
                ordem: i as i64,
                propriedade_id: m.propriedade_id,
                planejamento_id: Uuid::nil(),
                categoria_id: m.categoria_id,
                data_movimentacao: m.data_movimentacao,
                tipo_movimentacao: m.tipo_movimentacao,
                quantidade: m.quantidade,
                valor_por_cabeca: m.valor_por_cabeca,
                valor_total: m.valor_total,
                observacao: m.observacao.clone(),
            })
            .collect()
    }

    #[test]
    fn replay_do_lote_gerado_nunca_fica_negativo() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let inv: Vec<InventarioRebanho> = categorias
            .iter()
            .map(|c| inventario(prop, c.id, 120))
            .collect();

        let entrada = EntradaProjecao {
            categorias: categorias.clone(),
            propriedades: vec![propriedade("Fazenda Girassol", inv.clone(), prop)],
            regras_transferencia: vec![],
            anos: 3,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();
        assert!(!saida.movimentacoes.is_empty());

        let razao: Vec<MovimentacaoProjetada> = como_razao(&saida)
            .into_iter()
            .filter(|m| m.propriedade_id == prop)
            .collect();
        for cat in &categorias {
            let resultado = crate::services::saldo::saldo_estrito(
                &inv,
                &razao,
                cat.id,
                data(2027, 12, 31),
            );
            assert!(resultado.is_ok(), "saldo negativo em {}: {resultado:?}", cat.nome);
        }
    }

    #[test]
    fn promocoes_saem_em_pares_com_a_sucessora() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let bezerros = achar(&categorias, "Bezerros (0-12m)");
        let garrotes = achar(&categorias, "Garrotes (12-24m)");

        let entrada = EntradaProjecao {
            categorias: categorias.clone(),
            propriedades: vec![propriedade(
                "Favo de Mel",
                vec![inventario(prop, bezerros, 240)],
                prop,
            )],
            regras_transferencia: vec![],
            anos: 1,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();

        let saidas: Vec<&NovaMovimentacao> = saida
            .movimentacoes
            .iter()
            .filter(|m| m.tipo_movimentacao == TipoMovimentacao::PromocaoSaida)
            .collect();
        assert!(!saidas.is_empty());

        for (i, mov) in saida.movimentacoes.iter().enumerate() {
            if mov.tipo_movimentacao != TipoMovimentacao::PromocaoSaida {
                continue;
            }
            // O par PROMOCAO_ENTRADA é emitido imediatamente em seguida,
            // mesma data e mesma quantidade.
            let par = &saida.movimentacoes[i + 1];
            assert_eq!(par.tipo_movimentacao, TipoMovimentacao::PromocaoEntrada);
            assert_eq!(par.data_movimentacao, mov.data_movimentacao);
            assert_eq!(par.quantidade, mov.quantidade);
            if mov.categoria_id == bezerros {
                assert_eq!(par.categoria_id, garrotes);
            }
        }
    }

    #[test]
    fn nascimentos_proporcionais_as_matrizes_e_divididos_por_sexo() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let multiparas = achar(&categorias, "Multíparas (>36m)");
        let bezerros = achar(&categorias, "Bezerros (0-12m)");
        let bezerras = achar(&categorias, "Bezerras (0-12m)");

        let mut dados =
            propriedade("Canta Galo", vec![inventario(prop, multiparas, 1200)], prop);
        dados.parametros.taxa_natalidade_anual = dec!(80);
        // Sem venda de fêmeas para não drenar as matrizes no primeiro mês.
        dados.parametros.percentual_venda_femeas_anual = dec!(0);

        let entrada = EntradaProjecao {
            categorias,
            propriedades: vec![dados],
            regras_transferencia: vec![],
            anos: 1,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();

        // Primeiro mês: 1200 × 80% / 12 = 80 nascimentos, 40 machos + 40 fêmeas.
        let primeiro_mes: Vec<&NovaMovimentacao> = saida
            .movimentacoes
            .iter()
            .filter(|m| {
                m.tipo_movimentacao == TipoMovimentacao::Nascimento
                    && m.data_movimentacao == data(2024, 1, 15)
            })
            .collect();
        assert_eq!(primeiro_mes.len(), 2);
        let qtd_machos = primeiro_mes
            .iter()
            .find(|m| m.categoria_id == bezerros)
            .unwrap()
            .quantidade;
        let qtd_femeas = primeiro_mes
            .iter()
            .find(|m| m.categoria_id == bezerras)
            .unwrap()
            .quantidade;
        assert_eq!(qtd_machos, 40);
        assert_eq!(qtd_femeas, 40);
    }

    #[test]
    fn transferencia_e_pareada_e_limitada_ao_saldo_da_origem() {
        let categorias = taxonomia_padrao();
        let garrotes = achar(&categorias, "Garrotes (12-24m)");
        let origem = Uuid::new_v4();
        let destino = Uuid::new_v4();

        let mut dados_origem =
            propriedade("Favo de Mel", vec![inventario(origem, garrotes, 30)], origem);
        // Sem mortes para a conta da transferência ficar exata.
        dados_origem.parametros.taxa_mortalidade_adultos_anual = dec!(0);
        let dados_destino = propriedade("Girassol", vec![], destino);

        let regra = RegraTransferencia {
            id: Uuid::new_v4(),
            propriedade_origem_id: origem,
            propriedade_destino_id: destino,
            categoria_id: garrotes,
            quantidade: 480,
            frequencia_meses: 12,
            ativo: true,
        };

        let entrada = EntradaProjecao {
            categorias,
            propriedades: vec![dados_origem, dados_destino],
            regras_transferencia: vec![regra],
            anos: 1,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();

        let saidas: Vec<&NovaMovimentacao> = saida
            .movimentacoes
            .iter()
            .filter(|m| m.tipo_movimentacao == TipoMovimentacao::TransferenciaSaida)
            .collect();
        let entradas: Vec<&NovaMovimentacao> = saida
            .movimentacoes
            .iter()
            .filter(|m| m.tipo_movimentacao == TipoMovimentacao::TransferenciaEntrada)
            .collect();

        assert_eq!(saidas.len(), 1);
        assert_eq!(entradas.len(), 1);
        // Regra pede 480, mas a origem só tem 30 menos as promoções do dia.
        assert!(saidas[0].quantidade <= 30);
        assert_eq!(saidas[0].quantidade, entradas[0].quantidade);
        assert_eq!(saidas[0].propriedade_id, origem);
        assert_eq!(entradas[0].propriedade_id, destino);
        assert_eq!(saidas[0].data_movimentacao, entradas[0].data_movimentacao);

        // Promoções do mesmo dia precedem a transferência no lote.
        let pos_promocao = saida
            .movimentacoes
            .iter()
            .position(|m| m.tipo_movimentacao == TipoMovimentacao::PromocaoSaida);
        let pos_transferencia = saida
            .movimentacoes
            .iter()
            .position(|m| m.tipo_movimentacao == TipoMovimentacao::TransferenciaSaida)
            .unwrap();
        if let Some(pos_promocao) = pos_promocao {
            let mesma_data = saida.movimentacoes[pos_promocao].data_movimentacao
                == saida.movimentacoes[pos_transferencia].data_movimentacao;
            if mesma_data {
                assert!(pos_promocao < pos_transferencia);
            }
        }
    }

    #[test]
    fn venda_gera_detalhe_um_para_um_com_preco_por_kg() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let bois = achar(&categorias, "Bois (24-36m)");

        let mut dados = propriedade("Invernada", vec![inventario(prop, bois, 600)], prop);
        dados.parametros.preco_venda_kg = dec!(12);
        dados.parametros.taxa_mortalidade_adultos_anual = dec!(0);

        let entrada = EntradaProjecao {
            categorias,
            propriedades: vec![dados],
            regras_transferencia: vec![],
            anos: 1,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();

        let vendas_mov: Vec<usize> = saida
            .movimentacoes
            .iter()
            .enumerate()
            .filter(|(_, m)| m.tipo_movimentacao == TipoMovimentacao::Venda)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(vendas_mov.len(), saida.vendas.len());
        assert!(!saida.vendas.is_empty());

        for venda in &saida.vendas {
            let mov = &saida.movimentacoes[venda.indice_movimentacao];
            assert_eq!(mov.tipo_movimentacao, TipoMovimentacao::Venda);
            assert_eq!(mov.quantidade, venda.quantidade);
            // Bois: 480 kg × R$ 12/kg = R$ 5.760 por cabeça.
            assert_eq!(mov.valor_por_cabeca, Some(dec!(5760)));
            assert_eq!(venda.valor_por_kg, Some(dec!(12)));
            assert_eq!(
                venda.valor_total,
                Some(dec!(5760) * Decimal::from(venda.quantidade))
            );
        }
    }

    #[test]
    fn fechamento_do_ultimo_ano_zera_a_categoria_terminal() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let bois = achar(&categorias, "Bois (24-36m)");

        let mut dados = propriedade("Girassol", vec![inventario(prop, bois, 350)], prop);
        dados.parametros.venda_final_ultimo_ano = true;
        dados.parametros.taxa_mortalidade_adultos_anual = dec!(0);

        let entrada = EntradaProjecao {
            categorias: categorias.clone(),
            propriedades: vec![dados],
            regras_transferencia: vec![],
            anos: 2,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();

        let razao = como_razao(&saida);
        let inv = vec![inventario(prop, bois, 350)];
        let saldo_final =
            crate::services::saldo::saldo_em(&inv, &razao, bois, data(2025, 12, 31));
        assert_eq!(saldo_final, 0);
    }

    #[test]
    fn compra_programada_respeita_a_frequencia() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let garrotes = achar(&categorias, "Garrotes (12-24m)");

        let mut dados = propriedade("Recria", vec![], prop);
        dados.compras_programadas.push(CompraProgramada {
            id: Uuid::new_v4(),
            propriedade_id: prop,
            categoria_id: garrotes,
            quantidade: 100,
            frequencia_meses: 3,
            valor_por_cabeca: Some(dec!(2500)),
            ativo: true,
        });

        let entrada = EntradaProjecao {
            categorias,
            propriedades: vec![dados],
            regras_transferencia: vec![],
            anos: 1,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();

        let compras: Vec<&NovaMovimentacao> = saida
            .movimentacoes
            .iter()
            .filter(|m| m.tipo_movimentacao == TipoMovimentacao::Compra)
            .collect();
        // Meses 0, 3, 6 e 9.
        assert_eq!(compras.len(), 4);
        assert!(compras.iter().all(|c| c.quantidade == 100));
        assert_eq!(compras[0].valor_total, Some(dec!(250000)));
    }

    #[test]
    fn sem_inventario_e_sem_regras_nao_gera_movimentacao() {
        let categorias = taxonomia_padrao();
        let prop = Uuid::new_v4();
        let entrada = EntradaProjecao {
            categorias,
            propriedades: vec![propriedade("Vazia", vec![], prop)],
            regras_transferencia: vec![],
            anos: 5,
            data_inicio: data(2024, 1, 1),
        };
        let saida = gerar_projecao(&entrada).unwrap();
        assert!(saida.movimentacoes.is_empty());
        assert!(saida.vendas.is_empty());
    }

    #[test]
    fn categoria_desconhecida_em_regra_e_rejeitada() {
        let categorias = taxonomia_padrao();
        let origem = Uuid::new_v4();
        let destino = Uuid::new_v4();
        let entrada = EntradaProjecao {
            categorias,
            propriedades: vec![
                propriedade("A", vec![], origem),
                propriedade("B", vec![], destino),
            ],
            regras_transferencia: vec![RegraTransferencia {
                id: Uuid::new_v4(),
                propriedade_origem_id: origem,
                propriedade_destino_id: destino,
                categoria_id: Uuid::new_v4(),
                quantidade: 10,
                frequencia_meses: 1,
                ativo: true,
            }],
            anos: 1,
            data_inicio: data(2024, 1, 1),
        };
        assert!(matches!(
            gerar_projecao(&entrada),
            Err(AppError::CategoriaNaoEncontrada)
        ));
    }
}
