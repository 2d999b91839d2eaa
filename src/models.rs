pub mod movimentacao;
pub mod planejamento;
pub mod propriedade;
pub mod rebanho;
