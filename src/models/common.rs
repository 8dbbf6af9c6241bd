use serde::Serialize;

/// Image model a backend knows how to call.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
}
