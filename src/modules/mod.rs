//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client and supporting types for the Zendesk helpdesk API.

pub mod zendesk;
