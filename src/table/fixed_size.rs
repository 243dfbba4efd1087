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

use crate::error::Result;
use crate::index_builder::IndexBuilder;
use crate::internal_err;
use crate::table::{OrdinalTable, INITIAL_CAPACITY};
use ahash::RandomState;
use arrow::array::{cast::AsArray, ArrayRef};
use hashbrown::hash_table::{Entry, HashTable};
use std::mem::size_of;

/// An [`OrdinalTable`] for fixed-size binary values of one width.
///
/// Distinct values live in a single buffer of `width`-byte slots in ordinal
/// order; the null ordinal occupies a zeroed slot. A width of zero is valid
/// and makes every non-null value the same value.
pub(crate) struct FixedSizeOrdinalTable {
    width: usize,
    /// Stores the ordinal based on the hash of its value's bytes
    map: HashTable<u32>,
    /// `width`-byte slots of the distinct values, in ordinal order
    buffer: Vec<u8>,
    /// Number of ordinals assigned so far
    len: u32,
    /// The ordinal of the null value if any
    null_ordinal: Option<u32>,
    /// The random state used to generate hashes
    random_state: RandomState,
}

/// The bytes of `ordinal` within `buffer`
fn value_bytes(buffer: &[u8], width: usize, ordinal: u32) -> &[u8] {
    let start = ordinal as usize * width;
    &buffer[start..start + width]
}

impl FixedSizeOrdinalTable {
    pub fn new(width: i32) -> Self {
        Self {
            width: width as usize,
            map: HashTable::with_capacity(INITIAL_CAPACITY),
            buffer: Vec::new(),
            len: 0,
            null_ordinal: None,
            random_state: Default::default(),
        }
    }
}

impl OrdinalTable for FixedSizeOrdinalTable {
    fn intern(&mut self, array: &ArrayRef) -> Result<()> {
        let array = array.as_fixed_size_binary();
        if array.value_length() as usize != self.width {
            return internal_err!(
                "fixed-size table of width {} interning an array of width {}",
                self.width,
                array.value_length()
            );
        }
        for v in array.iter() {
            match v {
                None => {
                    if self.null_ordinal.is_none() {
                        self.null_ordinal = Some(self.len);
                        self.len += 1;
                        // nulls take a zeroed slot
                        self.buffer.resize(self.buffer.len() + self.width, 0);
                    }
                }
                Some(value) => {
                    let state = &self.random_state;
                    let width = self.width;
                    let hash = state.hash_one(value);
                    let entry = self.map.entry(
                        hash,
                        |v| value_bytes(&self.buffer, width, *v) == value,
                        |v| state.hash_one(value_bytes(&self.buffer, width, *v)),
                    );

                    if let Entry::Vacant(vacant) = entry {
                        vacant.insert(self.len);
                        self.len += 1;
                        self.buffer.extend_from_slice(value);
                    }
                }
            }
        }
        Ok(())
    }

    fn probe(&self, array: &ArrayRef, out: &mut IndexBuilder) -> Result<()> {
        let array = array.as_fixed_size_binary();
        if array.value_length() as usize != self.width {
            return internal_err!(
                "fixed-size table of width {} probed with an array of width {}",
                self.width,
                array.value_length()
            );
        }
        for v in array.iter() {
            match v {
                None => match self.null_ordinal {
                    Some(ordinal) => out.append_ordinal(ordinal),
                    None => out.append_null(),
                },
                Some(value) => {
                    let hash = self.random_state.hash_one(value);
                    let found = self
                        .map
                        .find(hash, |v| value_bytes(&self.buffer, self.width, *v) == value);
                    match found {
                        Some(ordinal) => out.append_ordinal(*ordinal),
                        None => out.append_null(),
                    }
                }
            }
        }
        Ok(())
    }

    fn num_ordinals(&self) -> usize {
        self.len as usize
    }

    fn size(&self) -> usize {
        self.map.capacity() * size_of::<u32>() + self.buffer.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::FixedSizeBinaryArray;
    use std::sync::Arc;

    fn fsb<T: AsRef<[u8]>>(values: Vec<Option<T>>, width: i32) -> ArrayRef {
        Arc::new(
            FixedSizeBinaryArray::try_from_sparse_iter_with_size(values.into_iter(), width)
                .unwrap(),
        )
    }

    fn probe_to_vec(table: &dyn OrdinalTable, array: &ArrayRef) -> Vec<Option<i32>> {
        let mut out = IndexBuilder::with_capacity(array.len());
        table.probe(array, &mut out).unwrap();
        out.finish().iter().collect()
    }

    #[test]
    fn interleaved_nulls() {
        let needles = fsb(
            vec![Some(b"bbbbb"), None, Some(b"bbbbb"), Some(b"aaaaa"), Some(b"ccccc")],
            5,
        );
        let mut table = FixedSizeOrdinalTable::new(5);
        table.intern(&needles).unwrap();

        assert_eq!(table.num_ordinals(), 4);
        assert_eq!(table.null_ordinal, Some(1));

        let haystack = fsb(vec![Some(b"bbbbb"), None, Some(b"aaaaa"), Some(b"ccccc")], 5);
        assert_eq!(
            probe_to_vec(&table, &haystack),
            vec![Some(0), Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn zero_width_values_are_all_equal() {
        let needles = fsb(vec![Some(b"".as_slice()), Some(b"".as_slice())], 0);
        let mut table = FixedSizeOrdinalTable::new(0);
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 1);

        let haystack = fsb(vec![Some(b"".as_slice()), None], 0);
        assert_eq!(probe_to_vec(&table, &haystack), vec![Some(0), None]);
    }

    #[test]
    fn width_mismatch_is_internal_error() {
        let needles = fsb(vec![Some(b"ab".as_slice())], 2);
        let mut table = FixedSizeOrdinalTable::new(3);
        let err = table.intern(&needles).unwrap_err();
        assert!(matches!(err, crate::error::MatchError::Internal(_)));
    }
}
