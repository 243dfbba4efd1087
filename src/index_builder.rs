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

//! Builder for the `Int32` ordinal output of the match kernel

use arrow::array::{Int32Array, NullBufferBuilder};
use std::mem::size_of;

/// Appends matched ordinals or nulls, producing the kernel output array.
///
/// The validity bitmap is only materialized once the first null is appended,
/// so an all-match probe allocates no null buffer.
#[derive(Debug)]
pub(crate) struct IndexBuilder {
    values: Vec<i32>,
    nulls: NullBufferBuilder,
}

impl IndexBuilder {
    /// Create a builder pre-sized for `capacity` ordinals
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            nulls: NullBufferBuilder::new(capacity),
        }
    }

    /// Number of bytes a finished builder of `len` entries occupies
    pub fn estimated_size(len: usize) -> usize {
        len * size_of::<i32>() + len.div_ceil(8)
    }

    pub fn append_ordinal(&mut self, ordinal: u32) {
        self.values.push(ordinal as i32);
        self.nulls.append_non_null();
    }

    pub fn append_null(&mut self) {
        self.values.push(0);
        self.nulls.append_null();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn finish(mut self) -> Int32Array {
        Int32Array::new(self.values.into(), self.nulls.finish())
    }
}
