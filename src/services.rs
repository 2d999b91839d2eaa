pub mod auditoria;
pub mod projecao;
pub mod projecao_service;
pub mod rebanho_service;
pub mod saldo;
