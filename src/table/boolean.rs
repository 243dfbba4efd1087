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
use crate::table::OrdinalTable;
use arrow::array::{cast::AsArray, ArrayRef};

/// An [`OrdinalTable`] for boolean values.
///
/// With at most three distinct values (false, true, null) the table is two
/// direct slots plus the null slot; no hashing.
#[derive(Default)]
pub(crate) struct BooleanOrdinalTable {
    /// `slots[0]` holds the ordinal of false, `slots[1]` of true
    slots: [Option<u32>; 2],
    /// The ordinal of the null value if any
    null_ordinal: Option<u32>,
    /// Number of ordinals assigned so far
    len: u32,
}

impl BooleanOrdinalTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrdinalTable for BooleanOrdinalTable {
    fn intern(&mut self, array: &ArrayRef) -> Result<()> {
        for v in array.as_boolean() {
            let slot = match v {
                None => &mut self.null_ordinal,
                Some(value) => &mut self.slots[value as usize],
            };
            if slot.is_none() {
                *slot = Some(self.len);
                self.len += 1;
            }
        }
        Ok(())
    }

    fn probe(&self, array: &ArrayRef, out: &mut IndexBuilder) -> Result<()> {
        for v in array.as_boolean() {
            let slot = match v {
                None => self.null_ordinal,
                Some(value) => self.slots[value as usize],
            };
            match slot {
                Some(ordinal) => out.append_ordinal(ordinal),
                None => out.append_null(),
            }
        }
        Ok(())
    }

    fn num_ordinals(&self) -> usize {
        self.len as usize
    }

    fn size(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::BooleanArray;
    use std::sync::Arc;

    fn probe_to_vec(table: &dyn OrdinalTable, array: &ArrayRef) -> Vec<Option<i32>> {
        let mut out = IndexBuilder::with_capacity(array.len());
        table.probe(array, &mut out).unwrap();
        out.finish().iter().collect()
    }

    #[test]
    fn null_first_then_values() {
        let needles: ArrayRef =
            Arc::new(BooleanArray::from(vec![None, Some(false), Some(true)]));
        let mut table = BooleanOrdinalTable::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 3);

        let haystack: ArrayRef = Arc::new(BooleanArray::from(vec![
            Some(false),
            None,
            Some(false),
            Some(true),
        ]));
        assert_eq!(
            probe_to_vec(&table, &haystack),
            vec![Some(1), Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn repeats_keep_first_ordinals() {
        let needles: ArrayRef = Arc::new(BooleanArray::from(vec![
            Some(false),
            Some(true),
            None,
            Some(true),
            None,
        ]));
        let mut table = BooleanOrdinalTable::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 3);

        let haystack: ArrayRef = Arc::new(BooleanArray::from(vec![
            Some(false),
            None,
            Some(false),
            Some(true),
        ]));
        assert_eq!(
            probe_to_vec(&table, &haystack),
            vec![Some(0), Some(2), Some(0), Some(1)]
        );
    }

    #[test]
    fn missing_values_yield_null() {
        let needles: ArrayRef = Arc::new(BooleanArray::from(vec![true, true]));
        let mut table = BooleanOrdinalTable::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 1);

        let haystack: ArrayRef =
            Arc::new(BooleanArray::from(vec![Some(false), Some(true), None]));
        assert_eq!(probe_to_vec(&table, &haystack), vec![None, Some(0), None]);
    }
}
