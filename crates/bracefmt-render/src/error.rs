//! Recoverable-failure taxonomy.
//!
//! The engine's public contract is infallible: failures never propagate as
//! `Result`s or panics. Instead each recoverable failure is described by a
//! [`RenderFailure`], whose `Display` output is the diagnostic token placed
//! between the error markers at the affected substitution.

use std::any::Any;

use bracefmt_parser::mark;
use thiserror::Error;

/// A failure that was contained at a single substitution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderFailure {
    /// A caught panic with a string payload, typically from a user type's
    /// `Display` impl.
    #[error("[panic: {0}]")]
    Panic(String),

    /// A caught panic whose payload carried no usable description.
    #[error("[unidentifiable panic]")]
    UnidentifiablePanic,
}

impl RenderFailure {
    /// Classifies a caught panic payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            RenderFailure::Panic((*msg).to_string())
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            RenderFailure::Panic(msg.clone())
        } else {
            RenderFailure::UnidentifiablePanic
        }
    }

    /// The marker-wrapped form, ready to splice into output.
    pub fn marker(&self) -> String {
        mark(&self.to_string())
    }
}
