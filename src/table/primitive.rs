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
use arrow::array::{cast::AsArray, ArrayRef, ArrowPrimitiveType};
use hashbrown::hash_table::{Entry, HashTable};
use std::mem::size_of;

/// Hashing, equality and canonicalization for primitive keys
pub(crate) trait HashKey: Copy {
    /// The canonical representation stored and compared by the table.
    ///
    /// The identity for integral keys. Floats collapse `-0.0` into `+0.0`
    /// and every NaN bit pattern into the one canonical NaN, so zero is one
    /// key regardless of sign and NaN is one key equal to itself.
    fn canonical(self) -> Self {
        self
    }

    fn hash(&self, state: &RandomState) -> u64;

    fn is_equal(&self, other: &Self) -> bool;
}

macro_rules! hash_integer {
    ($($t:ty),+) => {
        $(impl HashKey for $t {
            fn hash(&self, state: &RandomState) -> u64 {
                state.hash_one(self)
            }

            fn is_equal(&self, other: &Self) -> bool {
                self == other
            }
        })+
    };
}
hash_integer!(i8, i16, i32, i64, i128);
hash_integer!(u8, u16, u32, u64);

macro_rules! hash_float {
    ($($t:ty),+) => {
        $(impl HashKey for $t {
            fn canonical(self) -> Self {
                if self.is_nan() {
                    <$t>::NAN
                } else if self == 0.0 {
                    0.0
                } else {
                    self
                }
            }

            fn hash(&self, state: &RandomState) -> u64 {
                state.hash_one(self.to_bits())
            }

            fn is_equal(&self, other: &Self) -> bool {
                self.to_bits() == other.to_bits()
            }
        })+
    };
}
hash_float!(f32, f64);

/// An [`OrdinalTable`] storing fixed-width primitive values.
///
/// Covers the integer widths, floats, dates, times, timestamps of every
/// time unit, and decimal values through their native `i128`. One slot per
/// distinct value; the null ordinal holds a default placeholder so the
/// ordinals of later values stay dense.
pub(crate) struct PrimitiveOrdinalTable<T: ArrowPrimitiveType> {
    /// Stores the ordinal based on the hash of its value
    ///
    /// We don't store the hashes as hashing fixed width primitives
    /// is fast enough for this not to benefit performance
    map: HashTable<u32>,
    /// The ordinal of the null value if any
    null_ordinal: Option<u32>,
    /// The first-seen value for each ordinal
    values: Vec<T::Native>,
    /// The random state used to generate hashes
    random_state: RandomState,
}

impl<T: ArrowPrimitiveType> PrimitiveOrdinalTable<T> {
    pub fn new() -> Self {
        Self {
            map: HashTable::with_capacity(INITIAL_CAPACITY),
            null_ordinal: None,
            values: Vec::with_capacity(INITIAL_CAPACITY),
            random_state: Default::default(),
        }
    }
}

impl<T: ArrowPrimitiveType> OrdinalTable for PrimitiveOrdinalTable<T>
where
    T::Native: HashKey,
{
    fn intern(&mut self, array: &ArrayRef) -> Result<()> {
        for v in array.as_primitive::<T>() {
            match v {
                None => {
                    if self.null_ordinal.is_none() {
                        self.null_ordinal = Some(self.values.len() as u32);
                        self.values.push(Default::default());
                    }
                }
                Some(key) => {
                    let key = key.canonical();
                    let state = &self.random_state;
                    let hash = key.hash(state);
                    let entry = self.map.entry(
                        hash,
                        // Safety: ordinals in the map always index `values`
                        |v| unsafe { self.values.get_unchecked(*v as usize) }.is_equal(&key),
                        |v| unsafe { self.values.get_unchecked(*v as usize) }.hash(state),
                    );

                    if let Entry::Vacant(vacant) = entry {
                        vacant.insert(self.values.len() as u32);
                        self.values.push(key);
                    }
                }
            }
        }
        Ok(())
    }

    fn probe(&self, array: &ArrayRef, out: &mut IndexBuilder) -> Result<()> {
        for v in array.as_primitive::<T>() {
            match v {
                None => match self.null_ordinal {
                    Some(ordinal) => out.append_ordinal(ordinal),
                    None => out.append_null(),
                },
                Some(key) => {
                    let key = key.canonical();
                    let hash = key.hash(&self.random_state);
                    let found = self.map.find(hash, |v| {
                        // Safety: ordinals in the map always index `values`
                        unsafe { self.values.get_unchecked(*v as usize) }.is_equal(&key)
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
        self.values.len()
    }

    fn size(&self) -> usize {
        self.map.capacity() * size_of::<u32>()
            + self.values.capacity() * size_of::<T::Native>()
    }
}
