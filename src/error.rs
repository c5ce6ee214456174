//! Error types for console operations

use thiserror::Error;

/// Console error type
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Viewport metrics produced a degenerate console geometry.
    /// The previous valid geometry is kept.
    #[error("invalid console geometry: {viewport_width}x{viewport_height} px yields {columns} columns")]
    InvalidGeometry {
        viewport_width: u32,
        viewport_height: u32,
        columns: i64,
    },
}

/// Result type for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
