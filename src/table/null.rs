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
use arrow::array::{Array, ArrayRef};

/// An [`OrdinalTable`] for the null type.
///
/// Every position of a null-typed array is null regardless of its physical
/// validity buffer, so only the null slot can ever be populated: interning a
/// non-empty array claims ordinal 0 and probing resolves every position to
/// it (or to null when no needle was interned).
#[derive(Default)]
pub(crate) struct NullOrdinalTable {
    null_ordinal: Option<u32>,
}

impl NullOrdinalTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrdinalTable for NullOrdinalTable {
    fn intern(&mut self, array: &ArrayRef) -> Result<()> {
        if !array.is_empty() {
            self.null_ordinal = Some(0);
        }
        Ok(())
    }

    fn probe(&self, array: &ArrayRef, out: &mut IndexBuilder) -> Result<()> {
        for _ in 0..array.len() {
            match self.null_ordinal {
                Some(ordinal) => out.append_ordinal(ordinal),
                None => out.append_null(),
            }
        }
        Ok(())
    }

    fn num_ordinals(&self) -> usize {
        usize::from(self.null_ordinal.is_some())
    }

    fn size(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::NullArray;
    use std::sync::Arc;

    #[test]
    fn null_needles_claim_ordinal_zero() {
        let needles: ArrayRef = Arc::new(NullArray::new(2));
        let mut table = NullOrdinalTable::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 1);

        let haystack: ArrayRef = Arc::new(NullArray::new(3));
        let mut out = IndexBuilder::with_capacity(haystack.len());
        table.probe(&haystack, &mut out).unwrap();
        assert_eq!(
            out.finish().iter().collect::<Vec<_>>(),
            vec![Some(0), Some(0), Some(0)]
        );
    }

    #[test]
    fn empty_needles_match_nothing() {
        let needles: ArrayRef = Arc::new(NullArray::new(0));
        let mut table = NullOrdinalTable::new();
        table.intern(&needles).unwrap();
        assert_eq!(table.num_ordinals(), 0);

        let haystack: ArrayRef = Arc::new(NullArray::new(3));
        let mut out = IndexBuilder::with_capacity(haystack.len());
        table.probe(&haystack, &mut out).unwrap();
        assert_eq!(
            out.finish().iter().collect::<Vec<_>>(),
            vec![None, None, None]
        );
    }
}
