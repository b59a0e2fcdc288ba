// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::chart::ChartKind;

/// Configuration errors.
///
/// Resolution itself never fails: inconsistent contexts and unusable callback
/// results fall back to defaults instead of surfacing here.
#[derive(Debug, Error)]
pub enum ScriptableError {
    /// A required argument was absent or empty.
    #[error("missing required argument `{argument}`")]
    MissingArgument {
        /// Name of the argument.
        argument: &'static str,
    },
    /// The operation does not apply to this kind of chart.
    #[error("`{operation}` is not supported by {kind} charts, use `{alternative}` instead")]
    Unsupported {
        /// The rejected operation.
        operation: &'static str,
        /// The operation to use instead.
        alternative: &'static str,
        /// The chart kind that rejected it.
        kind: ChartKind,
    },
    /// The engine's context object could not be read.
    #[error("invalid native context: {0}")]
    NativeContext(#[from] serde_json::Error),
}
