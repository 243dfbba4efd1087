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

//! [`ChunkedArray`] and [`Datum`], the value containers of the kernel contract

use crate::error::Result;
use crate::type_mismatch_err;
use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use std::slice;

/// An ordered collection of [`ArrayRef`] with the same [`DataType`], treated
/// as one logical sequence.
///
/// Positions are numbered globally across chunks starting at zero. The data
/// type is carried explicitly so a chunked array with no chunks stays typed.
#[derive(Debug, Clone)]
pub struct ChunkedArray {
    chunks: Vec<ArrayRef>,
    data_type: DataType,
    len: usize,
}

impl ChunkedArray {
    /// Create a new [`ChunkedArray`] from `chunks`, verifying that every
    /// chunk carries `data_type`
    pub fn try_new(chunks: Vec<ArrayRef>, data_type: DataType) -> Result<Self> {
        for chunk in &chunks {
            if chunk.data_type() != &data_type {
                return type_mismatch_err!(
                    "chunked array of {} contains a chunk of {}",
                    data_type,
                    chunk.data_type()
                );
            }
        }
        let len = chunks.iter().map(|chunk| chunk.len()).sum();
        Ok(Self {
            chunks,
            data_type,
            len,
        })
    }

    /// The type of values stored in every chunk
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// The logical length, summed over all chunks
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this chunked array holds no values
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    /// Consume self, returning the chunks
    pub fn into_chunks(self) -> Vec<ArrayRef> {
        self.chunks
    }
}

/// Either a single [`ArrayRef`] or a [`ChunkedArray`].
///
/// The match kernel accepts both input kinds and its result kind follows the
/// haystack kind.
#[derive(Debug, Clone)]
pub enum Datum {
    /// A single contiguous array
    Array(ArrayRef),
    /// A logical sequence fragmented across chunks
    Chunked(ChunkedArray),
}

impl Datum {
    pub fn data_type(&self) -> &DataType {
        match self {
            Datum::Array(array) => array.data_type(),
            Datum::Chunked(chunked) => chunked.data_type(),
        }
    }

    /// The logical length of the underlying sequence
    pub fn len(&self) -> usize {
        match self {
            Datum::Array(array) => array.len(),
            Datum::Chunked(chunked) => chunked.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A uniform chunked view; a single array is one chunk
    pub fn chunks(&self) -> &[ArrayRef] {
        match self {
            Datum::Array(array) => slice::from_ref(array),
            Datum::Chunked(chunked) => chunked.chunks(),
        }
    }
}

impl From<ArrayRef> for Datum {
    fn from(array: ArrayRef) -> Self {
        Datum::Array(array)
    }
}

impl From<ChunkedArray> for Datum {
    fn from(chunked: ChunkedArray) -> Self {
        Datum::Chunked(chunked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use arrow::array::{Int32Array, StringArray};
    use std::sync::Arc;

    #[test]
    fn chunked_lengths() {
        let chunked = ChunkedArray::try_new(
            vec![
                Arc::new(Int32Array::from(vec![1, 2, 3])),
                Arc::new(Int32Array::from(Vec::<i32>::new())),
                Arc::new(Int32Array::from(vec![4])),
            ],
            DataType::Int32,
        )
        .unwrap();

        assert_eq!(chunked.len(), 4);
        assert_eq!(chunked.num_chunks(), 3);
        assert!(!chunked.is_empty());
    }

    #[test]
    fn chunked_empty_keeps_type() {
        let chunked = ChunkedArray::try_new(vec![], DataType::Utf8).unwrap();
        assert_eq!(chunked.data_type(), &DataType::Utf8);
        assert!(chunked.is_empty());
        assert_eq!(chunked.num_chunks(), 0);
    }

    #[test]
    fn chunked_rejects_mixed_types() {
        let err = ChunkedArray::try_new(
            vec![
                Arc::new(Int32Array::from(vec![1])),
                Arc::new(StringArray::from(vec!["a"])),
            ],
            DataType::Int32,
        )
        .unwrap_err();
        assert!(matches!(err, MatchError::TypeMismatch(_)));
    }

    #[test]
    fn datum_chunks_view() {
        let array: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        let datum = Datum::from(Arc::clone(&array));
        assert_eq!(datum.chunks().len(), 1);
        assert_eq!(datum.len(), 2);
        assert_eq!(datum.data_type(), &DataType::Int32);
    }
}
