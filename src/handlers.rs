pub mod planejamentos;
pub mod projecoes;
pub mod propriedades;
pub mod rebanho;
