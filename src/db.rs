pub mod propriedade_repo;
pub use propriedade_repo::PropriedadeRepository;
pub mod rebanho_repo;
pub use rebanho_repo::RebanhoRepository;
pub mod planejamento_repo;
pub use planejamento_repo::PlanejamentoRepository;
pub mod movimentacao_repo;
pub use movimentacao_repo::MovimentacaoRepository;
