// src/services/auditoria.rs
//
// Auditoria de consistência do razão: replay somente-leitura que aponta as
// classes de defeito que historicamente apareciam em razões editados à mão:
// excursões de saldo negativo, pares de promoção sem contrapartida,
// transferências desbalanceadas e categorias fora da taxonomia. Nunca altera
// o razão.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::movimentacao::{MovimentacaoProjetada, TipoMovimentacao};
use crate::models::rebanho::{CategoriaAnimal, InventarioRebanho};
use crate::services::saldo::{self, ViolacaoSaldo};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromocaoSemPar {
    pub movimentacao_id: Uuid,
    pub categoria_id: Uuid,
    pub data_movimentacao: NaiveDate,
    pub tipo_movimentacao: TipoMovimentacao,
    pub quantidade: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferenciaDesbalanceada {
    pub categoria_id: Uuid,
    pub data_movimentacao: NaiveDate,
    pub total_saida: i32,
    pub total_entrada: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioAuditoria {
    pub violacoes_saldo: Vec<ViolacaoSaldo>,
    pub promocoes_sem_par: Vec<PromocaoSemPar>,
    pub transferencias_desbalanceadas: Vec<TransferenciaDesbalanceada>,
    pub categorias_desconhecidas: Vec<Uuid>,
}

impl RelatorioAuditoria {
    pub fn consistente(&self) -> bool {
        self.violacoes_saldo.is_empty()
            && self.promocoes_sem_par.is_empty()
            && self.transferencias_desbalanceadas.is_empty()
            && self.categorias_desconhecidas.is_empty()
    }
}

pub fn auditar(
    categorias: &[CategoriaAnimal],
    inventarios: &[InventarioRebanho],
    movimentacoes: &[MovimentacaoProjetada],
    data_referencia: NaiveDate,
) -> RelatorioAuditoria {
    RelatorioAuditoria {
        violacoes_saldo: verificar_saldos(inventarios, movimentacoes, data_referencia),
        promocoes_sem_par: verificar_promocoes(categorias, movimentacoes),
        transferencias_desbalanceadas: verificar_transferencias(movimentacoes),
        categorias_desconhecidas: verificar_categorias(categorias, movimentacoes),
    }
}

/// Replay estrito por (propriedade, categoria); recolhe a primeira excursão
/// negativa de cada uma.
fn verificar_saldos(
    inventarios: &[InventarioRebanho],
    movimentacoes: &[MovimentacaoProjetada],
    data_referencia: NaiveDate,
) -> Vec<ViolacaoSaldo> {
    let mut chaves: Vec<(Uuid, Uuid)> = movimentacoes
        .iter()
        .map(|m| (m.propriedade_id, m.categoria_id))
        .chain(inventarios.iter().map(|i| (i.propriedade_id, i.categoria_id)))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    chaves.sort();

    let mut violacoes = Vec::new();
    for (propriedade_id, categoria_id) in chaves {
        let inv: Vec<InventarioRebanho> = inventarios
            .iter()
            .filter(|i| i.propriedade_id == propriedade_id)
            .cloned()
            .collect();
        let movs: Vec<MovimentacaoProjetada> = movimentacoes
            .iter()
            .filter(|m| m.propriedade_id == propriedade_id)
            .cloned()
            .collect();
        if let Err(violacao) = saldo::saldo_estrito(&inv, &movs, categoria_id, data_referencia) {
            violacoes.push(violacao);
        }
    }
    violacoes
}

/// Toda PROMOCAO_SAIDA de X em D deve ter PROMOCAO_ENTRADA na sucessora de X,
/// mesma propriedade, mesma data e mesma quantidade; e vice-versa.
fn verificar_promocoes(
    categorias: &[CategoriaAnimal],
    movimentacoes: &[MovimentacaoProjetada],
) -> Vec<PromocaoSemPar> {
    let sucessora: HashMap<Uuid, Uuid> = categorias
        .iter()
        .filter(|c| c.ativo)
        .filter_map(|c| {
            let max = c.idade_maxima_meses?;
            let proxima = categorias
                .iter()
                .find(|s| s.ativo && s.sexo == c.sexo && s.idade_minima_meses == Some(max))?;
            Some((c.id, proxima.id))
        })
        .collect();

    let saidas: Vec<&MovimentacaoProjetada> = movimentacoes
        .iter()
        .filter(|m| m.tipo_movimentacao == TipoMovimentacao::PromocaoSaida)
        .collect();
    let entradas: Vec<&MovimentacaoProjetada> = movimentacoes
        .iter()
        .filter(|m| m.tipo_movimentacao == TipoMovimentacao::PromocaoEntrada)
        .collect();

    let mut entradas_usadas: HashSet<Uuid> = HashSet::new();
    let mut sem_par = Vec::new();

    for saida in &saidas {
        let destino = sucessora.get(&saida.categoria_id);
        let par = destino.and_then(|destino| {
            entradas.iter().find(|e| {
                !entradas_usadas.contains(&e.id)
                    && e.propriedade_id == saida.propriedade_id
                    && e.categoria_id == *destino
                    && e.data_movimentacao == saida.data_movimentacao
                    && e.quantidade == saida.quantidade
            })
        });
        match par {
            Some(e) => {
                entradas_usadas.insert(e.id);
            }
            None => sem_par.push(PromocaoSemPar {
                movimentacao_id: saida.id,
                categoria_id: saida.categoria_id,
                data_movimentacao: saida.data_movimentacao,
                tipo_movimentacao: TipoMovimentacao::PromocaoSaida,
                quantidade: saida.quantidade,
            }),
        }
    }

    for entrada in &entradas {
        if !entradas_usadas.contains(&entrada.id) {
            sem_par.push(PromocaoSemPar {
                movimentacao_id: entrada.id,
                categoria_id: entrada.categoria_id,
                data_movimentacao: entrada.data_movimentacao,
                tipo_movimentacao: TipoMovimentacao::PromocaoEntrada,
                quantidade: entrada.quantidade,
            });
        }
    }

    sem_par
}

/// Por (categoria, data), o total de TRANSFERENCIA_SAIDA deve igualar o total
/// de TRANSFERENCIA_ENTRADA entre as propriedades do lote.
fn verificar_transferencias(
    movimentacoes: &[MovimentacaoProjetada],
) -> Vec<TransferenciaDesbalanceada> {
    let mut totais: HashMap<(Uuid, NaiveDate), (i32, i32)> = HashMap::new();
    for mov in movimentacoes {
        match mov.tipo_movimentacao {
            TipoMovimentacao::TransferenciaSaida => {
                totais
                    .entry((mov.categoria_id, mov.data_movimentacao))
                    .or_insert((0, 0))
                    .0 += mov.quantidade;
            }
            TipoMovimentacao::TransferenciaEntrada => {
                totais
                    .entry((mov.categoria_id, mov.data_movimentacao))
                    .or_insert((0, 0))
                    .1 += mov.quantidade;
            }
            _ => {}
        }
    }

    let mut desbalanceadas: Vec<TransferenciaDesbalanceada> = totais
        .into_iter()
        .filter(|(_, (saida, entrada))| saida != entrada)
        .map(|((categoria_id, data_movimentacao), (total_saida, total_entrada))| {
            TransferenciaDesbalanceada {
                categoria_id,
                data_movimentacao,
                total_saida,
                total_entrada,
            }
        })
        .collect();
    desbalanceadas.sort_by_key(|t| (t.data_movimentacao, t.categoria_id));
    desbalanceadas
}

fn verificar_categorias(
    categorias: &[CategoriaAnimal],
    movimentacoes: &[MovimentacaoProjetada],
) -> Vec<Uuid> {
    let conhecidas: HashSet<Uuid> = categorias.iter().map(|c| c.id).collect();
    let mut desconhecidas: Vec<Uuid> = movimentacoes
        .iter()
        .map(|m| m.categoria_id)
        .filter(|id| !conhecidas.contains(id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    desconhecidas.sort();
    desconhecidas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rebanho::Sexo;
    use rust_decimal::Decimal;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn categoria(nome: &str, sexo: Sexo, min: i32, max: Option<i32>) -> CategoriaAnimal {
        CategoriaAnimal {
            id: Uuid::new_v4(),
            nome: nome.to_string(),
            descricao: None,
            sexo,
            idade_minima_meses: Some(min),
            idade_maxima_meses: max,
            peso_medio_kg: None,
            ativo: true,
        }
    }

    fn mov(
        propriedade_id: Uuid,
        categoria_id: Uuid,
        tipo: TipoMovimentacao,
        quantidade: i32,
        data_mov: NaiveDate,
        ordem: i64,
    ) -> MovimentacaoProjetada {
        MovimentacaoProjetada {
            id: Uuid::new_v4(),
            ordem,
            propriedade_id,
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

    fn inventario(prop: Uuid, cat: Uuid, qtd: i32) -> InventarioRebanho {
        InventarioRebanho {
            id: Uuid::new_v4(),
            propriedade_id: prop,
            categoria_id: cat,
            quantidade: qtd,
            valor_por_cabeca: Decimal::ZERO,
            data_inventario: data(2024, 1, 1),
        }
    }

    #[test]
    fn razao_consistente_passa_limpo() {
        let bezerros = categoria("Bezerros (0-12m)", Sexo::M, 0, Some(12));
        let garrotes = categoria("Garrotes (12-24m)", Sexo::M, 12, Some(24));
        let prop = Uuid::new_v4();
        let dia = data(2024, 6, 15);

        let categorias = vec![bezerros.clone(), garrotes.clone()];
        let inventarios = vec![inventario(prop, bezerros.id, 50)];
        let movimentacoes = vec![
            mov(prop, bezerros.id, TipoMovimentacao::PromocaoSaida, 10, dia, 1),
            mov(prop, garrotes.id, TipoMovimentacao::PromocaoEntrada, 10, dia, 2),
        ];

        let relatorio = auditar(&categorias, &inventarios, &movimentacoes, data(2024, 12, 31));
        assert!(relatorio.consistente(), "{relatorio:?}");
    }

    #[test]
    fn detecta_excursao_negativa() {
        let bois = categoria("Bois (24-36m)", Sexo::M, 24, Some(36));
        let prop = Uuid::new_v4();
        let categorias = vec![bois.clone()];
        let inventarios = vec![inventario(prop, bois.id, 10)];
        let movimentacoes =
            vec![mov(prop, bois.id, TipoMovimentacao::Venda, 25, data(2024, 3, 15), 1)];

        let relatorio = auditar(&categorias, &inventarios, &movimentacoes, data(2024, 12, 31));
        assert_eq!(relatorio.violacoes_saldo.len(), 1);
        assert_eq!(relatorio.violacoes_saldo[0].saldo_apos, -15);
    }

    #[test]
    fn detecta_promocao_sem_contrapartida() {
        let bezerros = categoria("Bezerros (0-12m)", Sexo::M, 0, Some(12));
        let garrotes = categoria("Garrotes (12-24m)", Sexo::M, 12, Some(24));
        let prop = Uuid::new_v4();
        let categorias = vec![bezerros.clone(), garrotes.clone()];
        let inventarios = vec![inventario(prop, bezerros.id, 100)];

        // Saída sem entrada correspondente.
        let movimentacoes = vec![mov(
            prop,
            bezerros.id,
            TipoMovimentacao::PromocaoSaida,
            30,
            data(2024, 5, 15),
            1,
        )];

        let relatorio = auditar(&categorias, &inventarios, &movimentacoes, data(2024, 12, 31));
        assert_eq!(relatorio.promocoes_sem_par.len(), 1);
        assert_eq!(
            relatorio.promocoes_sem_par[0].tipo_movimentacao,
            TipoMovimentacao::PromocaoSaida
        );
    }

    #[test]
    fn detecta_transferencia_duplicada_sem_contrapartida() {
        let garrotes = categoria("Garrotes (12-24m)", Sexo::M, 12, Some(24));
        let origem = Uuid::new_v4();
        let destino = Uuid::new_v4();
        let dia = data(2024, 7, 15);
        let categorias = vec![garrotes.clone()];
        let inventarios = vec![inventario(origem, garrotes.id, 1000)];

        // Saída duplicada: 2 × 480 saem, mas só 480 entram.
        let movimentacoes = vec![
            mov(origem, garrotes.id, TipoMovimentacao::TransferenciaSaida, 480, dia, 1),
            mov(origem, garrotes.id, TipoMovimentacao::TransferenciaSaida, 480, dia, 2),
            mov(destino, garrotes.id, TipoMovimentacao::TransferenciaEntrada, 480, dia, 3),
        ];

        let relatorio = auditar(&categorias, &inventarios, &movimentacoes, data(2024, 12, 31));
        assert_eq!(relatorio.transferencias_desbalanceadas.len(), 1);
        assert_eq!(relatorio.transferencias_desbalanceadas[0].total_saida, 960);
        assert_eq!(relatorio.transferencias_desbalanceadas[0].total_entrada, 480);
    }

    #[test]
    fn detecta_categoria_fora_da_taxonomia() {
        let bois = categoria("Bois (24-36m)", Sexo::M, 24, Some(36));
        let prop = Uuid::new_v4();
        let fantasma = Uuid::new_v4();
        let categorias = vec![bois];
        let movimentacoes = vec![mov(
            prop,
            fantasma,
            TipoMovimentacao::Compra,
            10,
            data(2024, 2, 15),
            1,
        )];

        let relatorio = auditar(&categorias, &[], &movimentacoes, data(2024, 12, 31));
        assert_eq!(relatorio.categorias_desconhecidas, vec![fantasma]);
    }
}
