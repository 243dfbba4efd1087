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

//! [`KernelContext`], the per-call execution environment

use crate::memory_pool::{MemoryPool, UnboundedMemoryPool};
use std::sync::Arc;

/// Resources a kernel call draws on.
///
/// A context may be shared by any number of concurrent kernel calls; the
/// kernel itself holds no state across calls.
#[derive(Debug, Clone)]
pub struct KernelContext {
    memory_pool: Arc<dyn MemoryPool>,
}

impl KernelContext {
    /// Create a context drawing memory from `memory_pool`
    pub fn new(memory_pool: Arc<dyn MemoryPool>) -> Self {
        Self { memory_pool }
    }

    pub fn memory_pool(&self) -> &Arc<dyn MemoryPool> {
        &self.memory_pool
    }
}

impl Default for KernelContext {
    /// A context with unlimited memory
    fn default() -> Self {
        Self::new(Arc::new(UnboundedMemoryPool::default()))
    }
}
