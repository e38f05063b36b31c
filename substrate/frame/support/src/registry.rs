// This file is part of Sable.

// Copyright (C) Sable Developers.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The static table of modules of a runtime.
//!
//! The registry is built once at startup and never changes afterwards. It owns the module
//! instances, resolves every call index to the module exposing it and knows which calls are
//! inherents.

use crate::{
	dispatch::{DispatchInfo, DispatchResultWithPostInfo, RawOrigin, Weight},
	traits::{Module, ModuleMetadata, ProvideInherent},
};
use sable_runtime::{
	generic::{Call, CallIndex},
	BlockNumber, DispatchError,
};
use sable_storage::Storage;
use std::collections::BTreeMap;

/// Errors raised while building a [`ModuleRegistry`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
	/// Two modules were registered under the same index.
	#[error("module index {0} is already registered")]
	DuplicateModuleIndex(u8),
	/// Two modules were registered under the same name.
	#[error("module name `{0}` is already registered")]
	DuplicateModuleName(&'static str),
	/// A module declares the same function index twice.
	#[error("module `{module}` declares function index {index} twice")]
	DuplicateFunctionIndex {
		/// Name of the offending module.
		module: &'static str,
		/// The repeated index.
		index: u8,
	},
	/// A module declares the same function name twice.
	#[error("module `{module}` declares function `{name}` twice")]
	DuplicateFunctionName {
		/// Name of the offending module.
		module: &'static str,
		/// The repeated name.
		name: &'static str,
	},
}

struct Entry {
	metadata: ModuleMetadata,
	module: Box<dyn Module>,
}

/// Modules of a runtime, keyed by their index.
#[derive(Default)]
pub struct ModuleRegistry {
	modules: BTreeMap<u8, Entry>,
	calls: BTreeMap<CallIndex, &'static str>,
}

impl core::fmt::Debug for ModuleRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_list().entries(self.modules.values().map(|e| &e.metadata)).finish()
	}
}

impl ModuleRegistry {
	/// An empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`Self::register`].
	pub fn with_module(mut self, module: impl Module + 'static) -> Result<Self, RegistryError> {
		self.register(module)?;
		Ok(self)
	}

	/// Add `module` to the registry.
	///
	/// Nothing is registered when an error is returned.
	pub fn register(&mut self, module: impl Module + 'static) -> Result<(), RegistryError> {
		let metadata = module.metadata();

		if self.modules.contains_key(&metadata.index) {
			return Err(RegistryError::DuplicateModuleIndex(metadata.index))
		}
		if self.modules.values().any(|e| e.metadata.name == metadata.name) {
			return Err(RegistryError::DuplicateModuleName(metadata.name))
		}

		let mut calls = BTreeMap::new();
		for (i, function) in metadata.functions.iter().enumerate() {
			if metadata.functions[..i].iter().any(|f| f.name == function.name) {
				return Err(RegistryError::DuplicateFunctionName {
					module: metadata.name,
					name: function.name,
				})
			}
			let index = CallIndex::new(metadata.index, function.index);
			if calls.insert(index, function.name).is_some() {
				return Err(RegistryError::DuplicateFunctionIndex {
					module: metadata.name,
					index: function.index,
				})
			}
		}

		self.calls.append(&mut calls);
		self.modules.insert(metadata.index, Entry { metadata, module: Box::new(module) });
		Ok(())
	}

	/// The module registered at `index`.
	pub fn module(&self, index: u8) -> Option<&dyn Module> {
		self.modules.get(&index).map(|e| &*e.module)
	}

	/// The metadata of the module registered at `index`.
	pub fn metadata(&self, index: u8) -> Option<&ModuleMetadata> {
		self.modules.get(&index).map(|e| &e.metadata)
	}

	/// All modules, in ascending index order.
	pub fn modules(&self) -> impl Iterator<Item = &dyn Module> {
		self.modules.values().map(|e| &*e.module)
	}

	/// Number of registered modules.
	pub fn len(&self) -> usize {
		self.modules.len()
	}

	/// Whether no module is registered.
	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}

	/// Whether some module exposes a function at `index`.
	pub fn contains_call(&self, index: &CallIndex) -> bool {
		self.calls.contains_key(index)
	}

	/// The module and function names of the call at `index`.
	pub fn call_name(&self, index: &CallIndex) -> Option<(&'static str, &'static str)> {
		let function = self.calls.get(index)?;
		let module = self.metadata(index.module_index)?;
		Some((module.name, *function))
	}

	/// The inherent provider of the module `call` is addressed to, if that module provides one
	/// and recognises `call` as its inherent.
	pub fn inherent_provider_for(&self, call: &Call) -> Option<&dyn ProvideInherent> {
		self.module(call.index.module_index)?
			.inherent_provider()
			.filter(|provider| provider.is_inherent(call))
	}

	/// Whether `call` is an inherent of a registered module.
	pub fn is_inherent(&self, call: &Call) -> bool {
		self.inherent_provider_for(call).is_some()
	}

	/// Every inherent provider, in ascending module index order.
	pub fn inherent_providers(&self) -> impl Iterator<Item = &dyn ProvideInherent> {
		self.modules().filter_map(|m| m.inherent_provider())
	}

	/// Route `call` to the module exposing it.
	///
	/// A call index no module exposes fails with [`DispatchError::CannotLookup`].
	pub fn dispatch(
		&self,
		storage: &mut dyn Storage,
		origin: RawOrigin,
		call: &Call,
	) -> DispatchResultWithPostInfo {
		if !self.contains_call(&call.index) {
			return Err(DispatchError::CannotLookup.into())
		}
		match self.module(call.index.module_index) {
			Some(module) => module.dispatch(storage, origin, call),
			None => Err(DispatchError::CannotLookup.into()),
		}
	}

	/// Static dispatch information of `call`, or `None` when no module exposes it.
	pub fn dispatch_info(&self, call: &Call) -> Option<DispatchInfo> {
		if !self.contains_call(&call.index) {
			return None
		}
		self.module(call.index.module_index).map(|m| m.dispatch_info(call))
	}

	/// Run every `on_initialize` hook. Returns the weight they consumed.
	pub fn on_initialize(&self, storage: &mut dyn Storage, n: BlockNumber) -> Weight {
		self.modules()
			.fold(0, |weight: Weight, m| weight.saturating_add(m.on_initialize(storage, n)))
	}

	/// Run every `on_idle` hook, each one with what the previous ones left of
	/// `remaining_weight`. Returns the weight they consumed.
	pub fn on_idle(
		&self,
		storage: &mut dyn Storage,
		n: BlockNumber,
		remaining_weight: Weight,
	) -> Weight {
		let mut weight: Weight = 0;
		for module in self.modules() {
			let adjusted_remaining_weight = remaining_weight.saturating_sub(weight);
			weight = weight.saturating_add(module.on_idle(storage, n, adjusted_remaining_weight));
		}
		weight
	}

	/// Run every `on_finalize` hook.
	pub fn on_finalize(&self, storage: &mut dyn Storage, n: BlockNumber) {
		for module in self.modules() {
			module.on_finalize(storage, n);
		}
	}
}
