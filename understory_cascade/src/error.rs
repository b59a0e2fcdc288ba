// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::scope::ScopeLevel;

/// Errors raised while assembling default scopes and cascades.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CascadeError {
    /// Two scopes of the same level were pushed into one cascade.
    #[error("cascade already has a {level} scope")]
    DuplicateScope {
        /// The level that appeared twice.
        level: ScopeLevel,
    },
    /// Native defaults were not a JSON object.
    #[error("{level} defaults must be an object, found {found}")]
    NotAnObject {
        /// The level being loaded.
        level: ScopeLevel,
        /// The JSON kind that was found instead.
        found: &'static str,
    },
}
