// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Match kernel error types

use std::error;
use std::fmt::{Display, Formatter};
use std::result;

use arrow::error::ArrowError;

/// Result type for operations that could result in a [`MatchError`]
pub type Result<T> = result::Result<T, MatchError>;

/// Match kernel error
///
/// Errors are returned to the caller as values, never thrown, and a failed
/// call never leaves partial output behind.
#[derive(Debug)]
pub enum MatchError {
    /// Error returned by arrow.
    Arrow(ArrowError),
    /// The logical type of the inputs is outside the supported set.
    UnsupportedType(String),
    /// The inputs disagree on their logical type or its parameters
    /// (fixed-size width, decimal precision and scale, time unit, timezone).
    TypeMismatch(String),
    /// The memory pool could not satisfy an allocation.
    ResourcesExhausted(String),
    /// An internal consistency check failed.
    // The kernel has invariants that we are unable to ask the compiler to
    // check for us. This error is raised when one of those invariants does
    // not hold and indicates a bug.
    Internal(String),
}

impl From<ArrowError> for MatchError {
    fn from(e: ArrowError) -> Self {
        MatchError::Arrow(e)
    }
}

impl Display for MatchError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            MatchError::Arrow(desc) => write!(f, "Arrow error: {desc}"),
            MatchError::UnsupportedType(desc) => {
                write!(f, "Unsupported type: {desc}")
            }
            MatchError::TypeMismatch(desc) => write!(f, "Type mismatch: {desc}"),
            MatchError::ResourcesExhausted(desc) => {
                write!(f, "Resources exhausted: {desc}")
            }
            MatchError::Internal(desc) => write!(
                f,
                "Internal error: {desc}. This was likely caused by a bug in \
                 arrow-match's code and we would welcome that you file an bug report \
                 in our issue tracker"
            ),
        }
    }
}

impl error::Error for MatchError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MatchError::Arrow(e) => Some(e),
            _ => None,
        }
    }
}

/// Macro wraps `$ERR_MSG` with a [`MatchError::UnsupportedType`] and returns it
#[macro_export]
macro_rules! unsupported_type_err {
    ($($arg:tt)*) => {
        Err($crate::error::MatchError::UnsupportedType(format!($($arg)*)))
    };
}

/// Macro wraps `$ERR_MSG` with a [`MatchError::TypeMismatch`] and returns it
#[macro_export]
macro_rules! type_mismatch_err {
    ($($arg:tt)*) => {
        Err($crate::error::MatchError::TypeMismatch(format!($($arg)*)))
    };
}

/// Macro wraps `$ERR_MSG` with a [`MatchError::ResourcesExhausted`] and returns it
#[macro_export]
macro_rules! resources_err {
    ($($arg:tt)*) => {
        Err($crate::error::MatchError::ResourcesExhausted(format!($($arg)*)))
    };
}

/// Macro wraps `$ERR_MSG` with a [`MatchError::Internal`] and returns it
#[macro_export]
macro_rules! internal_err {
    ($($arg:tt)*) => {
        Err($crate::error::MatchError::Internal(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = MatchError::TypeMismatch("left is Int32, right is Int64".to_string());
        assert_eq!(
            e.to_string(),
            "Type mismatch: left is Int32, right is Int64"
        );

        let e: MatchError = ArrowError::DivideByZero.into();
        assert!(e.to_string().starts_with("Arrow error:"));
    }

    #[test]
    fn error_macros() {
        fn fail() -> Result<()> {
            unsupported_type_err!("match kernel does not support type {}", "Float16")
        }
        let err = fail().unwrap_err();
        assert!(matches!(err, MatchError::UnsupportedType(_)));
        assert_eq!(
            err.to_string(),
            "Unsupported type: match kernel does not support type Float16"
        );
    }
}
