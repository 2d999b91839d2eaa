// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Propriedades ---
        handlers::propriedades::criar_propriedade,
        handlers::propriedades::listar_propriedades,
        handlers::propriedades::obter_propriedade,

        // --- Rebanho ---
        handlers::rebanho::criar_categoria,
        handlers::rebanho::listar_categorias,
        handlers::rebanho::registrar_inventario,
        handlers::rebanho::listar_inventario,
        handlers::rebanho::consultar_saldo,
        handlers::rebanho::auditar_razao,

        // --- Planejamentos ---
        handlers::planejamentos::configurar_parametros,
        handlers::planejamentos::obter_parametros,
        handlers::planejamentos::definir_percentual_venda,
        handlers::planejamentos::listar_percentuais_venda,
        handlers::planejamentos::criar_regra_transferencia,
        handlers::planejamentos::listar_regras_transferencia,
        handlers::planejamentos::criar_compra_programada,
        handlers::planejamentos::listar_compras_programadas,
        handlers::planejamentos::listar_planejamentos,
        handlers::planejamentos::obter_planejamento,

        // --- Projeções ---
        handlers::projecoes::gerar_projecao,
        handlers::projecoes::listar_movimentacoes,
        handlers::projecoes::listar_vendas,
        handlers::projecoes::resumo_planejamento,
        handlers::projecoes::evolucao_planejamento,
    ),
    components(
        schemas(
            // --- Propriedades ---
            models::propriedade::Propriedade,
            handlers::propriedades::CriarPropriedadePayload,

            // --- Rebanho ---
            models::rebanho::Sexo,
            models::rebanho::CategoriaAnimal,
            models::rebanho::InventarioRebanho,
            handlers::rebanho::CriarCategoriaPayload,
            handlers::rebanho::ItemInventarioPayload,
            handlers::rebanho::RegistrarInventarioPayload,

            // --- Planejamentos ---
            models::planejamento::StatusPlanejamento,
            models::planejamento::PlanejamentoAnual,
            models::planejamento::ParametrosProjecaoRebanho,
            models::planejamento::ParametrosVendaPorCategoria,
            models::planejamento::RegraTransferencia,
            models::planejamento::CompraProgramada,
            handlers::planejamentos::ConfigurarParametrosPayload,
            handlers::planejamentos::PercentualVendaPayload,
            handlers::planejamentos::CriarRegraTransferenciaPayload,
            handlers::planejamentos::CriarCompraProgramadaPayload,

            // --- Movimentações ---
            models::movimentacao::TipoMovimentacao,
            models::movimentacao::MovimentacaoProjetada,
            models::movimentacao::VendaProjetada,
            handlers::projecoes::GerarProjecaoPayload,

            // --- Relatórios ---
            services::projecao_service::ResumoProjecao,
            services::saldo::ViolacaoSaldo,
            services::saldo::ResumoPeriodo,
            services::saldo::EvolucaoCategoria,
            services::saldo::RelatorioEvolucao,
            services::auditoria::PromocaoSemPar,
            services::auditoria::TransferenciaDesbalanceada,
            services::auditoria::RelatorioAuditoria,
        )
    ),
    tags(
        (name = "Propriedades", description = "Cadastro de propriedades rurais"),
        (name = "Rebanho", description = "Taxonomia, inventário, saldo e auditoria"),
        (name = "Planejamentos", description = "Parâmetros e regras da projeção"),
        (name = "Projeções", description = "Geração de projeções e relatórios")
    )
)]
pub struct ApiDoc;
