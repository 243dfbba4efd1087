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

//! A vectorized match kernel for [Apache Arrow] arrays.
//!
//! [`match_indices`] takes a `haystack` and a `needles` input of one logical
//! type and returns, per haystack position, the `Int32` ordinal of the first
//! occurrence of that value in the deduplicated needles, or null when the
//! value is absent. It is the building block behind "is in" and "index of"
//! set-membership queries in a columnar engine.
//!
//! Supported types: all integer widths, `Float32`/`Float64`, `Boolean`,
//! `Null`, `Date32`/`Date64`, `Time32`/`Time64`, `Timestamp` of every time
//! unit, `Utf8`/`LargeUtf8`, `Binary`/`LargeBinary`, `FixedSizeBinary` and
//! `Decimal128`. Inputs can be single arrays or [`ChunkedArray`]s; a chunked
//! haystack yields a chunked result with the same chunk boundaries.
//!
//! Null matches null, unlike SQL comparison semantics: if needles contain a
//! null, haystack nulls resolve to its ordinal.
//!
//! ```
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int32Array};
//! use arrow_match::{match_arrays, KernelContext};
//!
//! let ctx = KernelContext::default();
//! let haystack: ArrayRef = Arc::new(Int32Array::from(vec![2, 1, 2, 1, 2, 3]));
//! let needles: ArrayRef = Arc::new(Int32Array::from(vec![2, 1, 2, 3]));
//!
//! let indices = match_arrays(&ctx, &haystack, &needles).unwrap();
//!
//! let expected: ArrayRef = Arc::new(Int32Array::from(vec![0, 1, 0, 1, 0, 2]));
//! assert_eq!(&indices, &expected);
//! ```
//!
//! Memory used by the needles table and the output buffers is accounted
//! against the [`memory_pool::MemoryPool`] carried by the [`KernelContext`];
//! a bounded pool turns runaway inputs into a resource-exhaustion status
//! instead of an allocator abort.
//!
//! [Apache Arrow]: https://arrow.apache.org

pub mod chunked;
pub mod context;
pub mod error;
pub mod kernel;
pub mod memory_pool;

mod index_builder;
mod table;

pub use chunked::{ChunkedArray, Datum};
pub use context::KernelContext;
pub use error::{MatchError, Result};
pub use kernel::{match_arrays, match_indices};
