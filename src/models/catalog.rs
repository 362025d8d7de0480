// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- 1. Elemento construtivo ---
// Piso, parede ou teto. Substitui as três tabelas irmãs (pisos/paredes/tetos)
// por um único catálogo parametrizado.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "element_kind", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum ElementKind {
    Floor,
    Wall,
    Ceiling,
}

impl ElementKind {
    /// Ordem em que os lotes e os relatórios percorrem os elementos.
    pub const ALL: [ElementKind; 3] = [ElementKind::Floor, ElementKind::Wall, ElementKind::Ceiling];

    /// Rótulo usado nas linhas de relatório.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Floor => "Floor",
            ElementKind::Wall => "Wall",
            ElementKind::Ceiling => "Ceiling",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Floor => "floor",
            ElementKind::Wall => "wall",
            ElementKind::Ceiling => "ceiling",
        }
    }
}

// --- 2. Camada (bruta ou acabamento final) ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "finish_layer", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinishLayer {
    Rough,
    Clean,
}

impl FinishLayer {
    pub fn label(self) -> &'static str {
        match self {
            FinishLayer::Rough => "Rough",
            FinishLayer::Clean => "Clean",
        }
    }
}

// --- 3. Tipo de acabamento (dado de referência) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinishType {
    pub id: Uuid,
    pub element_kind: ElementKind,

    #[schema(example = "F-01")]
    pub type_code: String,

    #[schema(example = "Contrapiso autonivelante")]
    pub description: String,

    #[schema(example = "Argamassa")]
    pub material: String,

    pub layer: FinishLayer,
    pub created_at: DateTime<Utc>,
}

// --- 4. Cadastro de tipo de acabamento ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinishTypePayload {
    pub element_kind: ElementKind,
    #[validate(length(min = 1, max = 50, message = "O código deve ter entre 1 e 50 caracteres."))]
    pub type_code: String,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    #[validate(length(min = 1, message = "O material é obrigatório."))]
    pub material: String,
    pub layer: FinishLayer,
}

// Filtro opcional da listagem (?elementKind=wall)
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct FinishTypeQuery {
    pub element_kind: Option<ElementKind>,
}
