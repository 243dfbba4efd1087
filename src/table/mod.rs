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

//! [`OrdinalTable`], the deduplicated needles table of the match kernel

pub(crate) mod boolean;
pub(crate) mod bytes;
pub(crate) mod fixed_size;
pub(crate) mod null;
pub(crate) mod primitive;

use crate::error::Result;
use crate::index_builder::IndexBuilder;
use crate::unsupported_type_err;
use arrow::array::ArrayRef;
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Decimal128Type, Float32Type, Float64Type,
    GenericBinaryType, GenericStringType, Int16Type, Int32Type, Int64Type, Int8Type,
    Time32MillisecondType, Time32SecondType, Time64MicrosecondType, Time64NanosecondType,
    TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};

use boolean::BooleanOrdinalTable;
use bytes::BytesOrdinalTable;
use fixed_size::FixedSizeOrdinalTable;
use null::NullOrdinalTable;
use primitive::PrimitiveOrdinalTable;

/// Initial capacity of the hash tables and value storage
pub(crate) const INITIAL_CAPACITY: usize = 128;

/// Maps each distinct needle value to the ordinal of its first appearance.
///
/// Null is one distinct value: the first null interned claims a single
/// dedicated ordinal that every later null, in needles or haystack, resolves
/// to. Implementations hold copies of the interned values, so the table does
/// not borrow from the needles input.
pub(crate) trait OrdinalTable: Send {
    /// Intern every value of `array`, assigning fresh ordinals to first
    /// appearances in position order. Repeated values keep their ordinal.
    fn intern(&mut self, array: &ArrayRef) -> Result<()>;

    /// Look up every value of `array`, appending the matching ordinal (or
    /// null for values absent from the table) to `out`.
    fn probe(&self, array: &ArrayRef, out: &mut IndexBuilder) -> Result<()>;

    /// Number of distinct values interned, the null slot included
    fn num_ordinals(&self) -> usize;

    /// Bytes of memory allocated by this table
    fn size(&self) -> usize;
}

/// Create the [`OrdinalTable`] specialization for `data_type`.
///
/// Every type outside the supported set is rejected here, before any
/// allocation happens.
pub(crate) fn new_ordinal_table(data_type: &DataType) -> Result<Box<dyn OrdinalTable>> {
    macro_rules! primitive_table {
        ($t:ty) => {
            Ok(Box::new(PrimitiveOrdinalTable::<$t>::new()))
        };
    }

    match data_type {
        DataType::Null => Ok(Box::new(NullOrdinalTable::new())),
        DataType::Boolean => Ok(Box::new(BooleanOrdinalTable::new())),
        DataType::Int8 => primitive_table!(Int8Type),
        DataType::Int16 => primitive_table!(Int16Type),
        DataType::Int32 => primitive_table!(Int32Type),
        DataType::Int64 => primitive_table!(Int64Type),
        DataType::UInt8 => primitive_table!(UInt8Type),
        DataType::UInt16 => primitive_table!(UInt16Type),
        DataType::UInt32 => primitive_table!(UInt32Type),
        DataType::UInt64 => primitive_table!(UInt64Type),
        DataType::Float32 => primitive_table!(Float32Type),
        DataType::Float64 => primitive_table!(Float64Type),
        DataType::Date32 => primitive_table!(Date32Type),
        DataType::Date64 => primitive_table!(Date64Type),
        DataType::Time32(TimeUnit::Second) => primitive_table!(Time32SecondType),
        DataType::Time32(TimeUnit::Millisecond) => primitive_table!(Time32MillisecondType),
        DataType::Time64(TimeUnit::Microsecond) => primitive_table!(Time64MicrosecondType),
        DataType::Time64(TimeUnit::Nanosecond) => primitive_table!(Time64NanosecondType),
        DataType::Timestamp(TimeUnit::Second, _) => primitive_table!(TimestampSecondType),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            primitive_table!(TimestampMillisecondType)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            primitive_table!(TimestampMicrosecondType)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            primitive_table!(TimestampNanosecondType)
        }
        DataType::Decimal128(_, _) => primitive_table!(Decimal128Type),
        DataType::Utf8 => Ok(Box::new(BytesOrdinalTable::<GenericStringType<i32>>::new())),
        DataType::LargeUtf8 => {
            Ok(Box::new(BytesOrdinalTable::<GenericStringType<i64>>::new()))
        }
        DataType::Binary => Ok(Box::new(BytesOrdinalTable::<GenericBinaryType<i32>>::new())),
        DataType::LargeBinary => {
            Ok(Box::new(BytesOrdinalTable::<GenericBinaryType<i64>>::new()))
        }
        DataType::FixedSizeBinary(width) => {
            Ok(Box::new(FixedSizeOrdinalTable::new(*width)))
        }
        d => unsupported_type_err!("match kernel does not support type {d}"),
    }
}
