// src/services/saldo.rs
//
// Calculadora de saldo: replay puro do razão de movimentações sobre a
// fotografia de inventário mais recente. Nenhuma função aqui toca o banco;
// os repositórios entregam as linhas já filtradas por propriedade e
// planejamento.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::movimentacao::MovimentacaoProjetada;
use crate::models::rebanho::{CategoriaAnimal, InventarioRebanho};

/// Saldo de uma categoria na data de referência: fotografia mais recente com
/// data ≤ referência (0 se não houver), mais o replay assinado de todas as
/// movimentações com data ≤ referência, em ordem (data, ordem), grampeado em
/// zero após cada passo.
pub fn saldo_em(
    inventarios: &[InventarioRebanho],
    movimentacoes: &[MovimentacaoProjetada],
    categoria_id: Uuid,
    data_referencia: NaiveDate,
) -> i32 {
    let mut saldo = fotografia_inicial(inventarios, categoria_id, data_referencia);

    for mov in movimentacoes_ordenadas(movimentacoes, categoria_id, data_referencia) {
        saldo += mov.tipo_movimentacao.sinal() * mov.quantidade;
        if saldo < 0 {
            saldo = 0;
        }
    }

    saldo
}

/// Excursão negativa encontrada durante um replay estrito.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViolacaoSaldo {
    pub propriedade_id: Uuid,
    pub categoria_id: Uuid,
    pub data_movimentacao: NaiveDate,
    pub ordem: i64,
    pub saldo_apos: i32,
}

/// Variante estrita do replay: em vez de esconder o saldo negativo com o
/// grampo, devolve a primeira movimentação que o produziu.
pub fn saldo_estrito(
    inventarios: &[InventarioRebanho],
    movimentacoes: &[MovimentacaoProjetada],
    categoria_id: Uuid,
    data_referencia: NaiveDate,
) -> Result<i32, ViolacaoSaldo> {
    let mut saldo = fotografia_inicial(inventarios, categoria_id, data_referencia);

    for mov in movimentacoes_ordenadas(movimentacoes, categoria_id, data_referencia) {
        saldo += mov.tipo_movimentacao.sinal() * mov.quantidade;
        if saldo < 0 {
            return Err(ViolacaoSaldo {
                propriedade_id: mov.propriedade_id,
                categoria_id,
                data_movimentacao: mov.data_movimentacao,
                ordem: mov.ordem,
                saldo_apos: saldo,
            });
        }
    }

    Ok(saldo)
}

fn fotografia_inicial(
    inventarios: &[InventarioRebanho],
    categoria_id: Uuid,
    data_referencia: NaiveDate,
) -> i32 {
    inventarios
        .iter()
        .filter(|inv| inv.categoria_id == categoria_id && inv.data_inventario <= data_referencia)
        .max_by_key(|inv| inv.data_inventario)
        .map(|inv| inv.quantidade)
        .unwrap_or(0)
}

fn movimentacoes_ordenadas<'a>(
    movimentacoes: &'a [MovimentacaoProjetada],
    categoria_id: Uuid,
    data_referencia: NaiveDate,
) -> Vec<&'a MovimentacaoProjetada> {
    let mut linhas: Vec<&MovimentacaoProjetada> = movimentacoes
        .iter()
        .filter(|m| m.categoria_id == categoria_id && m.data_movimentacao <= data_referencia)
        .collect();
    linhas.sort_by_key(|m| (m.data_movimentacao, m.ordem));
    linhas
}

// --- Relatório de evolução mensal por categoria ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvolucaoCategoria {
    pub categoria_id: Uuid,
    pub nome: String,
    /// Saldo inicial seguido do saldo ao fim de cada período.
    pub saldos: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioEvolucao {
    /// Rótulos "MM/AAAA" em ordem cronológica.
    pub periodos: Vec<String>,
    pub categorias: Vec<EvolucaoCategoria>,
}

/// Tabela de evolução: saldo acumulado de cada categoria ao fim de cada mês
/// coberto pelo planejamento.
pub fn evolucao_mensal(
    categorias: &[CategoriaAnimal],
    inventarios: &[InventarioRebanho],
    movimentacoes: &[MovimentacaoProjetada],
) -> RelatorioEvolucao {
    let Some(primeira) = movimentacoes.iter().map(|m| m.data_movimentacao).min() else {
        return RelatorioEvolucao { periodos: vec![], categorias: vec![] };
    };
    let ultima = movimentacoes
        .iter()
        .map(|m| m.data_movimentacao)
        .max()
        .unwrap_or(primeira);

    let mut periodos = Vec::new();
    let mut marcos = Vec::new();
    let mut ano = primeira.year();
    let mut mes = primeira.month();
    loop {
        periodos.push(format!("{mes:02}/{ano}"));
        marcos.push(fim_do_mes(ano, mes));
        if ano == ultima.year() && mes == ultima.month() {
            break;
        }
        mes += 1;
        if mes > 12 {
            mes = 1;
            ano += 1;
        }
    }

    let mut linhas = Vec::new();
    for categoria in categorias.iter().filter(|c| c.ativo) {
        let inicial = inventarios
            .iter()
            .filter(|inv| inv.categoria_id == categoria.id)
            .max_by_key(|inv| inv.data_inventario)
            .map(|inv| inv.quantidade)
            .unwrap_or(0);

        let movimenta = movimentacoes.iter().any(|m| m.categoria_id == categoria.id);
        if inicial == 0 && !movimenta {
            continue;
        }

        let mut saldos = vec![inicial];
        let mut saldo = inicial;
        let mut restantes: Vec<&MovimentacaoProjetada> = movimentacoes
            .iter()
            .filter(|m| m.categoria_id == categoria.id)
            .collect();
        restantes.sort_by_key(|m| (m.data_movimentacao, m.ordem));

        let mut cursor = 0usize;
        for marco in &marcos {
            while cursor < restantes.len() && restantes[cursor].data_movimentacao <= *marco {
                let mov = restantes[cursor];
                saldo += mov.tipo_movimentacao.sinal() * mov.quantidade;
                cursor += 1;
            }
            saldos.push(saldo);
        }

        linhas.push(EvolucaoCategoria {
            categoria_id: categoria.id,
            nome: categoria.nome.clone(),
            saldos,
        });
    }

    RelatorioEvolucao { periodos, categorias: linhas }
}

// --- Resumo mensal por tipo de movimentação ---

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoPeriodo {
    /// Rótulo "MM/AAAA".
    pub periodo: String,
    pub nascimentos: i32,
    pub mortes: i32,
    pub vendas: i32,
    pub compras: i32,
    pub transferencias_entrada: i32,
    pub transferencias_saida: i32,
}

/// Totais de cabeças por tipo de movimentação em cada mês do planejamento.
/// Promoções ficam de fora: são remanejamento interno, não variação do
/// rebanho.
pub fn resumo_mensal(movimentacoes: &[MovimentacaoProjetada]) -> Vec<ResumoPeriodo> {
    use crate::models::movimentacao::TipoMovimentacao;

    let mut linhas: Vec<ResumoPeriodo> = Vec::new();
    let mut ordenadas: Vec<&MovimentacaoProjetada> = movimentacoes.iter().collect();
    ordenadas.sort_by_key(|m| (m.data_movimentacao, m.ordem));

    for mov in ordenadas {
        let periodo = format!(
            "{:02}/{}",
            mov.data_movimentacao.month(),
            mov.data_movimentacao.year()
        );
        if linhas.last().map(|l| l.periodo != periodo).unwrap_or(true) {
            linhas.push(ResumoPeriodo { periodo, ..Default::default() });
        }
        if let Some(linha) = linhas.last_mut() {
            match mov.tipo_movimentacao {
                TipoMovimentacao::Nascimento => linha.nascimentos += mov.quantidade,
                TipoMovimentacao::Morte => linha.mortes += mov.quantidade,
                TipoMovimentacao::Venda => linha.vendas += mov.quantidade,
                TipoMovimentacao::Compra => linha.compras += mov.quantidade,
                TipoMovimentacao::TransferenciaEntrada => {
                    linha.transferencias_entrada += mov.quantidade
                }
                TipoMovimentacao::TransferenciaSaida => {
                    linha.transferencias_saida += mov.quantidade
                }
                TipoMovimentacao::PromocaoEntrada | TipoMovimentacao::PromocaoSaida => {}
            }
        }
    }

    linhas
}

fn fim_do_mes(ano: i32, mes: u32) -> NaiveDate {
    let (prox_ano, prox_mes) = if mes == 12 { (ano + 1, 1) } else { (ano, mes + 1) };
    NaiveDate::from_ymd_opt(prox_ano, prox_mes, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movimentacao::TipoMovimentacao;
    use crate::models::rebanho::Sexo;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn inventario(categoria_id: Uuid, quantidade: i32, data_inv: NaiveDate) -> InventarioRebanho {
        InventarioRebanho {
            id: Uuid::new_v4(),
            propriedade_id: Uuid::nil(),
            categoria_id,
            quantidade,
            valor_por_cabeca: Decimal::ZERO,
            data_inventario: data_inv,
        }
    }

    fn mov(
        categoria_id: Uuid,
        tipo: TipoMovimentacao,
        quantidade: i32,
        data_mov: NaiveDate,
        ordem: i64,
    ) -> MovimentacaoProjetada {
        MovimentacaoProjetada {
            id: Uuid::new_v4(),
            ordem,
            propriedade_id: Uuid::nil(),
            planejamento_id: Uuid::nil(),
            categoria_id,
            data_movimentacao: data_mov,
            tipo_movimentacao: tipo,
            quantidade,
            valor_por_cabeca: None,
            valor_total: None,
            observacao: None,
        }
    }

    fn categoria(nome: &str, sexo: Sexo, min: Option<i32>, max: Option<i32>) -> CategoriaAnimal {
        CategoriaAnimal {
            id: Uuid::new_v4(),
            nome: nome.to_string(),
            descricao: None,
            sexo,
            idade_minima_meses: min,
            idade_maxima_meses: max,
            peso_medio_kg: None,
            ativo: true,
        }
    }

    #[test]
    fn cenario_bezerros_promovidos_a_garrotes() {
        // 100 bezerros em 01/01/2024; +20 nascimentos em 01/03/2024;
        // promoção de 100 para garrotes em 01/01/2025.
        let bezerros = Uuid::new_v4();
        let garrotes = Uuid::new_v4();
        let inventarios = vec![inventario(bezerros, 100, data(2024, 1, 1))];
        let movimentacoes = vec![
            mov(bezerros, TipoMovimentacao::Nascimento, 20, data(2024, 3, 1), 1),
            mov(bezerros, TipoMovimentacao::PromocaoSaida, 100, data(2025, 1, 1), 2),
            mov(garrotes, TipoMovimentacao::PromocaoEntrada, 100, data(2025, 1, 1), 3),
        ];

        let consulta = data(2025, 1, 2);
        assert_eq!(saldo_em(&inventarios, &movimentacoes, bezerros, consulta), 20);
        assert_eq!(saldo_em(&inventarios, &movimentacoes, garrotes, consulta), 100);
    }

    #[test]
    fn saida_maior_que_saldo_e_grampeada_em_zero() {
        let cat = Uuid::new_v4();
        let inventarios = vec![inventario(cat, 10, data(2024, 1, 1))];
        let movimentacoes = vec![
            mov(cat, TipoMovimentacao::Venda, 50, data(2024, 2, 1), 1),
            mov(cat, TipoMovimentacao::Compra, 5, data(2024, 3, 1), 2),
        ];

        // A venda excedente não leva o saldo abaixo de zero; a compra
        // posterior conta a partir do zero grampeado.
        assert_eq!(saldo_em(&inventarios, &movimentacoes, cat, data(2024, 2, 2)), 0);
        assert_eq!(saldo_em(&inventarios, &movimentacoes, cat, data(2024, 3, 2)), 5);
    }

    #[test]
    fn replay_estrito_aponta_a_excursao_negativa() {
        let cat = Uuid::new_v4();
        let inventarios = vec![inventario(cat, 10, data(2024, 1, 1))];
        let movimentacoes =
            vec![mov(cat, TipoMovimentacao::TransferenciaSaida, 30, data(2024, 2, 1), 7)];

        let violacao =
            saldo_estrito(&inventarios, &movimentacoes, cat, data(2024, 12, 31)).unwrap_err();
        assert_eq!(violacao.ordem, 7);
        assert_eq!(violacao.saldo_apos, -20);
    }

    #[test]
    fn usa_a_fotografia_mais_recente_anterior_a_data() {
        let cat = Uuid::new_v4();
        let inventarios = vec![
            inventario(cat, 50, data(2023, 1, 1)),
            inventario(cat, 80, data(2024, 1, 1)),
            inventario(cat, 999, data(2026, 1, 1)),
        ];

        // Fotografias futuras são ignoradas.
        assert_eq!(saldo_em(&inventarios, &[], cat, data(2024, 6, 1)), 80);
        assert_eq!(saldo_em(&inventarios, &[], cat, data(2023, 6, 1)), 50);
        assert_eq!(saldo_em(&inventarios, &[], cat, data(2022, 6, 1)), 0);
    }

    #[test]
    fn empates_na_mesma_data_respeitam_a_ordem_de_insercao() {
        let cat = Uuid::new_v4();
        let dia = data(2024, 5, 15);
        // Promoção inserida antes da transferência do mesmo dia: a saída de
        // 100 só é coberta porque a entrada de 100 vem primeiro na ordem.
        let inventarios = vec![inventario(cat, 0, data(2024, 1, 1))];
        let movimentacoes = vec![
            mov(cat, TipoMovimentacao::TransferenciaSaida, 100, dia, 2),
            mov(cat, TipoMovimentacao::PromocaoEntrada, 100, dia, 1),
        ];

        assert!(saldo_estrito(&inventarios, &movimentacoes, cat, dia).is_ok());
        assert_eq!(saldo_em(&inventarios, &movimentacoes, cat, dia), 0);
    }

    #[rstest]
    #[case(TipoMovimentacao::Nascimento, 1)]
    #[case(TipoMovimentacao::Compra, 1)]
    #[case(TipoMovimentacao::TransferenciaEntrada, 1)]
    #[case(TipoMovimentacao::PromocaoEntrada, 1)]
    #[case(TipoMovimentacao::Venda, -1)]
    #[case(TipoMovimentacao::Morte, -1)]
    #[case(TipoMovimentacao::TransferenciaSaida, -1)]
    #[case(TipoMovimentacao::PromocaoSaida, -1)]
    fn sinal_por_tipo(#[case] tipo: TipoMovimentacao, #[case] esperado: i32) {
        assert_eq!(tipo.sinal(), esperado);
    }

    #[test]
    fn replay_e_idempotente() {
        let cat = Uuid::new_v4();
        let inventarios = vec![inventario(cat, 40, data(2024, 1, 1))];
        let movimentacoes = vec![
            mov(cat, TipoMovimentacao::Nascimento, 10, data(2024, 2, 15), 1),
            mov(cat, TipoMovimentacao::Morte, 3, data(2024, 3, 15), 2),
            mov(cat, TipoMovimentacao::Venda, 12, data(2024, 6, 15), 3),
        ];

        let primeiro = saldo_em(&inventarios, &movimentacoes, cat, data(2024, 12, 31));
        let segundo = saldo_em(&inventarios, &movimentacoes, cat, data(2024, 12, 31));
        assert_eq!(primeiro, segundo);
        assert_eq!(primeiro, 35);
    }

    #[test]
    fn resumo_mensal_agrupa_por_tipo_e_ignora_promocoes() {
        let cat = Uuid::new_v4();
        let movimentacoes = vec![
            mov(cat, TipoMovimentacao::Nascimento, 40, data(2024, 1, 15), 1),
            mov(cat, TipoMovimentacao::Morte, 2, data(2024, 1, 15), 2),
            mov(cat, TipoMovimentacao::PromocaoSaida, 10, data(2024, 1, 15), 3),
            mov(cat, TipoMovimentacao::Venda, 25, data(2024, 2, 15), 4),
            mov(cat, TipoMovimentacao::Compra, 100, data(2024, 2, 15), 5),
        ];

        let resumo = resumo_mensal(&movimentacoes);
        assert_eq!(resumo.len(), 2);
        assert_eq!(resumo[0].periodo, "01/2024");
        assert_eq!(resumo[0].nascimentos, 40);
        assert_eq!(resumo[0].mortes, 2);
        assert_eq!(resumo[0].vendas, 0);
        assert_eq!(resumo[1].periodo, "02/2024");
        assert_eq!(resumo[1].vendas, 25);
        assert_eq!(resumo[1].compras, 100);
    }

    #[test]
    fn evolucao_mensal_acumula_saldos_por_periodo() {
        let cat = categoria("Bezerros (0-12m)", Sexo::M, Some(0), Some(12));
        let inventarios = vec![inventario(cat.id, 100, data(2024, 1, 1))];
        let movimentacoes = vec![
            mov(cat.id, TipoMovimentacao::Nascimento, 20, data(2024, 1, 15), 1),
            mov(cat.id, TipoMovimentacao::Venda, 30, data(2024, 3, 15), 2),
        ];

        let relatorio = evolucao_mensal(&[cat], &inventarios, &movimentacoes);
        assert_eq!(relatorio.periodos, vec!["01/2024", "02/2024", "03/2024"]);
        assert_eq!(relatorio.categorias.len(), 1);
        // Saldo inicial, depois jan, fev e mar.
        assert_eq!(relatorio.categorias[0].saldos, vec![100, 120, 120, 90]);
    }
}
