use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Tipo de erro da aplicação, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Propriedade não encontrada")]
    PropriedadeNaoEncontrada,

    #[error("Categoria de animal não encontrada")]
    CategoriaNaoEncontrada,

    #[error("Planejamento não encontrado")]
    PlanejamentoNaoEncontrado,

    #[error("Parâmetros de projeção não configurados para a propriedade")]
    ParametrosNaoConfigurados,

    #[error("Inventário não cadastrado para a propriedade")]
    InventarioNaoCadastrado,

    #[error("Saldo insuficiente: {0}")]
    SaldoInsuficiente(String),

    #[error("Registro duplicado: {0}")]
    RegistroDuplicado(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` captura o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::PropriedadeNaoEncontrada => {
                (StatusCode::NOT_FOUND, "Propriedade não encontrada.".to_string())
            }
            AppError::CategoriaNaoEncontrada => {
                (StatusCode::NOT_FOUND, "Categoria de animal não encontrada.".to_string())
            }
            AppError::PlanejamentoNaoEncontrado => {
                (StatusCode::NOT_FOUND, "Planejamento não encontrado.".to_string())
            }
            AppError::ParametrosNaoConfigurados => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Configure os parâmetros de projeção antes de gerar a projeção.".to_string(),
            ),
            AppError::InventarioNaoCadastrado => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "É necessário ter um inventário cadastrado antes de gerar a projeção.".to_string(),
            ),
            AppError::SaldoInsuficiente(detalhe) => {
                (StatusCode::UNPROCESSABLE_ENTITY, format!("Saldo insuficiente: {detalhe}"))
            }
            AppError::RegistroDuplicado(detalhe) => {
                (StatusCode::CONFLICT, format!("Registro duplicado: {detalhe}"))
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` produziu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
