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

//! The match kernel: build a needles table, probe it with the haystack

use crate::chunked::{ChunkedArray, Datum};
use crate::context::KernelContext;
use crate::error::Result;
use crate::index_builder::IndexBuilder;
use crate::memory_pool::MemoryConsumer;
use crate::table::new_ordinal_table;
use crate::{internal_err, type_mismatch_err};
use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use log::debug;
use std::sync::Arc;

/// For each haystack position, find the ordinal of the first occurrence of
/// that value within the deduplicated needles, or null when the value does
/// not occur in needles.
///
/// Ordinals number the distinct needle values in order of first appearance,
/// starting at zero; a null in needles is one distinct value. Null matches
/// null: haystack nulls resolve to the null ordinal when needles contain at
/// least one null and to null otherwise.
///
/// Both inputs must share one [`DataType`], parameters included. The result
/// is `Int32` and its kind follows the haystack: an array haystack yields an
/// array, a chunked haystack yields a chunked result with the same chunk
/// boundaries. Mixed input kinds are accepted by treating a single array as
/// one chunk.
///
/// The needles table lives for the duration of the call; its memory and the
/// output buffers are accounted against the context's memory pool, and a
/// failed call returns no partial output.
pub fn match_indices(
    ctx: &KernelContext,
    haystack: &Datum,
    needles: &Datum,
) -> Result<Datum> {
    if haystack.data_type() != needles.data_type() {
        return type_mismatch_err!(
            "match kernel inputs must share one type: haystack is {}, needles is {}",
            haystack.data_type(),
            needles.data_type()
        );
    }

    let mut table = new_ordinal_table(haystack.data_type())?;
    let mut reservation = MemoryConsumer::new("MatchKernel").register(ctx.memory_pool());

    // Phase 1: intern the needles, assigning first-appearance ordinals
    for chunk in needles.chunks() {
        table.intern(chunk)?;
        reservation.try_resize(table.size())?;
    }
    if table.num_ordinals() > i32::MAX as usize {
        return internal_err!(
            "needles table holds {} distinct values, exceeding the Int32 ordinal range",
            table.num_ordinals()
        );
    }
    debug!(
        "match: {} distinct values interned from {} needles of type {}",
        table.num_ordinals(),
        needles.len(),
        needles.data_type()
    );

    // Phase 2: probe with the haystack, one output chunk per input chunk
    let mut output: Vec<ArrayRef> = Vec::with_capacity(haystack.chunks().len());
    for chunk in haystack.chunks() {
        reservation.try_grow(IndexBuilder::estimated_size(chunk.len()))?;
        let mut indices = IndexBuilder::with_capacity(chunk.len());
        table.probe(chunk, &mut indices)?;
        if indices.len() != chunk.len() {
            return internal_err!(
                "probe emitted {} indices for a chunk of {} values",
                indices.len(),
                chunk.len()
            );
        }
        output.push(Arc::new(indices.finish()));
    }

    match haystack {
        Datum::Array(_) => Ok(Datum::Array(output.swap_remove(0))),
        Datum::Chunked(_) => Ok(Datum::Chunked(ChunkedArray::try_new(
            output,
            DataType::Int32,
        )?)),
    }
}

/// [`match_indices`] for two single arrays, returning the `Int32` index array
pub fn match_arrays(
    ctx: &KernelContext,
    haystack: &ArrayRef,
    needles: &ArrayRef,
) -> Result<ArrayRef> {
    let haystack = Datum::Array(Arc::clone(haystack));
    let needles = Datum::Array(Arc::clone(needles));
    match match_indices(ctx, &haystack, &needles)? {
        Datum::Array(array) => Ok(array),
        Datum::Chunked(_) => internal_err!("array inputs produced a chunked result"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use arrow::array::{Int32Array, Int64Array};

    #[test]
    fn rejects_mismatched_types_before_allocating() {
        let ctx = KernelContext::default();
        let haystack: ArrayRef = Arc::new(Int32Array::from(vec![1]));
        let needles: ArrayRef = Arc::new(Int64Array::from(vec![1i64]));
        let err = match_arrays(&ctx, &haystack, &needles).unwrap_err();
        assert!(matches!(err, MatchError::TypeMismatch(_)));
        assert_eq!(ctx.memory_pool().reserved(), 0);
    }

    #[test]
    fn releases_reservation_on_return() {
        let ctx = KernelContext::default();
        let haystack: ArrayRef = Arc::new(Int32Array::from(vec![2, 1, 2, 1, 2, 3]));
        let needles: ArrayRef = Arc::new(Int32Array::from(vec![2, 1, 2, 3]));
        match_arrays(&ctx, &haystack, &needles).unwrap();
        assert_eq!(ctx.memory_pool().reserved(), 0);
    }
}
