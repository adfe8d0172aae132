//! Central error types for the liquid-glass pipeline.
//!
//! This module provides typed errors for better error handling across the
//! codebase. Capture-side failures are always logged and skipped by the
//! scheduler; they never cross the component boundary.

use thiserror::Error;

/// Main error type for liquid-glass operations.
#[derive(Error, Debug)]
pub enum GlassError {
    /// Background snapshot failed
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Capture region degenerated to zero or negative size
    #[error("Invalid capture geometry: {0}")]
    InvalidGeometry(String),

    /// GPU rendering error (wgpu)
    #[error("GPU error: {0}")]
    GpuError(String),

    /// GPU surface could not be created from the host drawable
    #[error("Surface error: {0}")]
    SurfaceError(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<String> for GlassError {
    fn from(msg: String) -> Self {
        GlassError::Other(msg)
    }
}

impl From<&str> for GlassError {
    fn from(msg: &str) -> Self {
        GlassError::Other(msg.to_string())
    }
}

impl From<wgpu::CreateSurfaceError> for GlassError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        GlassError::SurfaceError(err.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// Allows chaining context information onto errors for better debugging.
pub trait ResultExt<T> {
    /// Add context to an error, converting it to GlassError::Other.
    fn context(self, msg: &str) -> GlassResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> GlassResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> GlassResult<T> {
        self.map_err(|e| GlassError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> GlassResult<T> {
        self.map_err(|e| GlassError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to GlassError::Other with the given message.
    fn context(self, msg: &str) -> GlassResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> GlassResult<T> {
        self.ok_or_else(|| GlassError::Other(msg.to_string()))
    }
}

/// Type alias for Results using GlassError.
pub type GlassResult<T> = Result<T, GlassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GlassError::CaptureError("offscreen render failed".to_string());
        assert_eq!(err.to_string(), "Capture failed: offscreen render failed");
    }

    #[test]
    fn test_from_string() {
        let err: GlassError = "test error".into();
        assert!(matches!(err, GlassError::Other(_)));
    }

    #[test]
    fn test_invalid_geometry_display() {
        let err = GlassError::InvalidGeometry("width 0".to_string());
        assert!(err.to_string().contains("Invalid capture geometry"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let with_context = result.context("operation failed");

        assert!(matches!(with_context, Err(GlassError::Other(_))));
        let msg = with_context.unwrap_err().to_string();
        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<(), &str> = Err("inner");
        let with_context = result.with_context(|| format!("ctx-{}", 42));

        let msg = with_context.unwrap_err().to_string();
        assert!(msg.contains("ctx-42"));
        assert!(msg.contains("inner"));
    }

    #[test]
    fn test_result_ext_ok_passthrough() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(result.context("should not appear").unwrap(), 42);
    }

    #[test]
    fn test_option_ext_context() {
        let opt: Option<i32> = None;
        let result = opt.context("value was missing");

        assert!(result.unwrap_err().to_string().contains("value was missing"));
    }
}
