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
use crate::table::{OrdinalTable, INITIAL_CAPACITY};
use ahash::RandomState;
use arrow::array::{cast::AsArray, ArrayRef};
use arrow::datatypes::ByteArrayType;
use hashbrown::hash_table::{Entry, HashTable};
use std::marker::PhantomData;
use std::mem::size_of;

/// An [`OrdinalTable`] for variable-width binary and utf8 values.
///
/// Stores the bytes of every distinct value in a single buffer in ordinal
/// order. The `i`th value occupies `buffer[offsets[i]..offsets[i + 1]]`; the
/// null ordinal is stored as a zero length entry. Equality is byte for byte,
/// so the one table shape serves both binary and string inputs.
pub(crate) struct BytesOrdinalTable<B: ByteArrayType> {
    /// Stores the ordinal based on the hash of its value's bytes
    map: HashTable<u32>,
    /// Bytes of the distinct values, concatenated in ordinal order
    buffer: Vec<u8>,
    /// Value bounds into `buffer`, one more entry than ordinals
    offsets: Vec<usize>,
    /// The ordinal of the null value if any
    null_ordinal: Option<u32>,
    /// The random state used to generate hashes
    random_state: RandomState,
    _type: PhantomData<B>,
}

/// The bytes of `ordinal` within `buffer`
fn value_bytes<'a>(offsets: &[usize], buffer: &'a [u8], ordinal: u32) -> &'a [u8] {
    let ordinal = ordinal as usize;
    &buffer[offsets[ordinal]..offsets[ordinal + 1]]
}

impl<B: ByteArrayType> BytesOrdinalTable<B> {
    pub fn new() -> Self {
        Self {
            map: HashTable::with_capacity(INITIAL_CAPACITY),
            buffer: Vec::new(),
            offsets: vec![0],
            null_ordinal: None,
            random_state: Default::default(),
            _type: PhantomData,
        }
    }

    fn next_ordinal(&self) -> u32 {
        (self.offsets.len() - 1) as u32
    }
}

impl<B: ByteArrayType> OrdinalTable for BytesOrdinalTable<B> {
    fn intern(&mut self, array: &ArrayRef) -> Result<()> {
        let array = array.as_bytes::<B>();
        for v in array.iter() {
            match v {
                None => {
                    if self.null_ordinal.is_none() {
                        self.null_ordinal = Some(self.next_ordinal());
                        // nulls take a zero length entry in the offsets
                        self.offsets.push(self.buffer.len());
                    }
                }
                Some(value) => {
                    let value: &[u8] = value.as_ref();
                    let state = &self.random_state;
                    let hash = state.hash_one(value);
                    let entry = self.map.entry(
                        hash,
                        |v| value_bytes(&self.offsets, &self.buffer, *v) == value,
                        |v| state.hash_one(value_bytes(&self.offsets, &self.buffer, *v)),
                    );

                    if let Entry::Vacant(vacant) = entry {
                        vacant.insert((self.offsets.len() - 1) as u32);
                        self.buffer.extend_from_slice(value);
                        self.offsets.push(self.buffer.len());
                    }
                }
            }
        }
        Ok(())
    }

    fn probe(&self, array: &ArrayRef, out: &mut IndexBuilder) -> Result<()> {
        let array = array.as_bytes::<B>();
        for v in array.iter() {
            match v {
                None => match self.null_ordinal {
                    Some(ordinal) => out.append_ordinal(ordinal),
                    None => out.append_null(),
                },
                Some(value) => {
                    let value: &[u8] = value.as_ref();
                    let hash = self.random_state.hash_one(value);
                    let found = self.map.find(hash, |v| {
                        value_bytes(&self.offsets, &self.buffer, *v) == value
                    });
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
        self.offsets.len() - 1
    }

    fn size(&self) -> usize {
        self.map.capacity() * size_of::<u32>()
            + self.buffer.capacity()
            + self.offsets.capacity() * size_of::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BinaryArray, StringArray};
    use arrow::datatypes::GenericStringType;
    use std::sync::Arc;

    fn probe_to_vec(table: &dyn OrdinalTable, array: &ArrayRef) -> Vec<Option<i32>> {
        let mut out = IndexBuilder::with_capacity(array.len());
        table.probe(array, &mut out).unwrap();
        out.finish().iter().collect()
    }

    #[test]
    fn strings_intern_in_first_appearance_order() {
        let needles: ArrayRef = Arc::new(StringArray::from(vec![
            Some("foo"),
            None,
            Some("bar"),
            Some("foo"),
        ]));
        let mut table = BytesOrdinalTable::<GenericStringType<i32>>::new();
        table.intern(&needles).unwrap();

        assert_eq!(table.num_ordinals(), 3);
        assert_eq!(table.null_ordinal, Some(1));
        assert_eq!(value_bytes(&table.offsets, &table.buffer, 0), b"foo");
        assert_eq!(value_bytes(&table.offsets, &table.buffer, 1), b"");
        assert_eq!(value_bytes(&table.offsets, &table.buffer, 2), b"bar");

        let haystack: ArrayRef = Arc::new(StringArray::from(vec![
            Some("bar"),
            Some(""),
            None,
            Some("baz"),
        ]));
        // the empty string does not alias the null ordinal's empty entry
        assert_eq!(
            probe_to_vec(&table, &haystack),
            vec![Some(2), None, Some(1), None]
        );
    }

    #[test]
    fn empty_string_is_a_value() {
        let needles: ArrayRef = Arc::new(StringArray::from(vec![Some(""), None]));
        let mut table = BytesOrdinalTable::<GenericStringType<i32>>::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 2);

        let haystack: ArrayRef =
            Arc::new(StringArray::from(vec![Some(""), None, Some("x")]));
        assert_eq!(
            probe_to_vec(&table, &haystack),
            vec![Some(0), Some(1), None]
        );
    }

    #[test]
    fn binary_values() {
        let needles: ArrayRef = Arc::new(BinaryArray::from(vec![
            Some([1u8, 2].as_slice()),
            Some([1u8, 2, 3].as_slice()),
            Some([1u8, 2].as_slice()),
        ]));
        let mut table =
            BytesOrdinalTable::<arrow::datatypes::GenericBinaryType<i32>>::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 2);

        let haystack: ArrayRef = Arc::new(BinaryArray::from(vec![
            Some([1u8, 2, 3].as_slice()),
            Some([1u8].as_slice()),
        ]));
        assert_eq!(probe_to_vec(&table, &haystack), vec![Some(1), None]);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let total = 100_000usize;
        let values: Vec<String> = (0..total).map(|i| format!("test{i}")).collect();
        let needles: ArrayRef =
            Arc::new(StringArray::from_iter_values(values.iter()));
        let mut table = BytesOrdinalTable::<GenericStringType<i32>>::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), total);

        let mut out = IndexBuilder::with_capacity(total);
        table.probe(&needles, &mut out).unwrap();
        let out = out.finish();
        for (i, ordinal) in out.values().iter().enumerate() {
            assert_eq!(*ordinal as usize, i);
        }
    }
}
