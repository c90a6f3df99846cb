use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Service package offered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Price in rupiah
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub features: Vec<String>,
    /// Number of influencers included in the package
    #[serde(default)]
    pub influencer_count: Option<u32>,
}

/// Payload for creating a package
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPackage {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(range(min = 1, message = "Price must be greater than 0"))]
    pub price: u64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "A package must include at least one influencer"))]
    pub influencer_count: Option<u32>,
}

/// Partial update; only `Some` fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePackage {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Price must be greater than 0"))]
    pub price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}
