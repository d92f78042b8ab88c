use serde::{Deserialize, Serialize};

use crate::types::TokenId;

/// Where a token sits on a deck/scene map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenPosition {
    pub id: TokenId,
    pub x: f64,
    pub y: f64,
}

impl TokenPosition {
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
        }
    }
}
