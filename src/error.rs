//! Engine error type
//!
//! The simulation itself never fails: bad input is ignored and GameOver is a
//! normal state. Errors only come from the boundary (config, spawn search,
//! JSON).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Every cell of the grid is occupied
    #[error("no free cell left on a {width}x{height} grid")]
    GridFull { width: i32, height: i32 },

    #[error("invalid game config: {0}")]
    InvalidConfig(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
