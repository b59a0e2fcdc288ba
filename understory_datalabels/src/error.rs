// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;
use understory_cascade::{CascadeError, ScopeLevel};
use understory_scriptable::ScriptableError;

/// Errors raised while configuring data labels.
#[derive(Debug, Error)]
pub enum DataLabelsError {
    /// A chart or context error.
    #[error(transparent)]
    Scriptable(#[from] ScriptableError),
    /// A defaults error.
    #[error(transparent)]
    Cascade(#[from] CascadeError),
    /// Engine defaults or native options could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// No label is registered under this identifier.
    #[error("unknown label `{id}`")]
    UnknownLabel {
        /// The identifier asked for.
        id: String,
    },
    /// The option name is not a data-label option.
    #[error("unknown option `{key}`")]
    UnknownOption {
        /// The name asked for.
        key: String,
    },
    /// Label identifiers must not be empty.
    #[error("label identifier must not be empty")]
    EmptyLabelId,
    /// A scope was installed at the wrong level.
    #[error("expected a {expected} scope, got a {actual} scope")]
    ScopeLevel {
        /// The level the slot takes.
        expected: ScopeLevel,
        /// The level of the scope that was passed.
        actual: ScopeLevel,
    },
    /// Native options were not shaped as expected.
    #[error("{what} must be an object")]
    NotAnObject {
        /// What was being read.
        what: &'static str,
    },
}
