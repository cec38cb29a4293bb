//! Host theme registry
//!
//! The host platform owns the live theme registry. This module defines the
//! two operations the integration needs from it and two registries: one
//! that emits service calls as JSON lines for an external orchestrator to
//! forward, and one that records calls in memory.

use crate::output::ThemePayload;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Service domain that owns theme calls
pub const FRONTEND_DOMAIN: &str = "frontend";
pub const SERVICE_SET_THEME: &str = "set_theme";
pub const SERVICE_RELOAD_THEMES: &str = "reload_themes";

/// Error type for registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Service call failed: {0}")]
    Rejected(String),
}

/// Theme operations provided by the host platform
pub trait ThemeRegistry {
    /// Register or replace a theme
    fn set_theme(&mut self, payload: &ThemePayload) -> Result<(), RegistryError>;

    /// Ask the frontend to pick up theme changes
    fn reload_themes(&mut self) -> Result<(), RegistryError>;
}

/// A single host service call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: serde_json::Value,
}

impl ServiceCall {
    pub fn set_theme(payload: &ThemePayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            domain: FRONTEND_DOMAIN.to_string(),
            service: SERVICE_SET_THEME.to_string(),
            data: serde_json::to_value(payload)?,
        })
    }

    pub fn reload_themes() -> Self {
        Self {
            domain: FRONTEND_DOMAIN.to_string(),
            service: SERVICE_RELOAD_THEMES.to_string(),
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Writes each service call as one line of JSON
pub struct JsonLinesRegistry<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRegistry<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, call: &ServiceCall) -> Result<(), RegistryError> {
        serde_json::to_writer(&mut self.writer, call)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ThemeRegistry for JsonLinesRegistry<W> {
    fn set_theme(&mut self, payload: &ThemePayload) -> Result<(), RegistryError> {
        let call = ServiceCall::set_theme(payload)?;
        self.emit(&call)
    }

    fn reload_themes(&mut self) -> Result<(), RegistryError> {
        self.emit(&ServiceCall::reload_themes())
    }
}

/// Keeps every call in memory
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub calls: Vec<ServiceCall>,
    /// When set, every call fails with this message
    pub fail_with: Option<String>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose calls all fail
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            fail_with: Some(message.into()),
        }
    }

    /// Service names in call order
    pub fn services(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.service.as_str()).collect()
    }

    fn check(&self) -> Result<(), RegistryError> {
        match &self.fail_with {
            Some(message) => Err(RegistryError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

impl ThemeRegistry for RecordingRegistry {
    fn set_theme(&mut self, payload: &ThemePayload) -> Result<(), RegistryError> {
        self.check()?;
        self.calls.push(ServiceCall::set_theme(payload)?);
        Ok(())
    }

    fn reload_themes(&mut self) -> Result<(), RegistryError> {
        self.check()?;
        self.calls.push(ServiceCall::reload_themes());
        Ok(())
    }
}
