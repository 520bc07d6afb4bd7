use serde::{Deserialize, Serialize};

/// Request body for the gateway's lookup endpoint
///
/// POST / with `{"cep": "01001-000"}`. The field may arrive with or without
/// the hyphen separator; normalization happens in `core::cep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}
