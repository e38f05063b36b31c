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

//! Traits for Sable modules.

mod storage;

pub use self::storage::StorageInstance;
pub use sp_core::{ConstU32, ConstU64, Get};

use crate::dispatch::{DispatchInfo, DispatchResultWithPostInfo, RawOrigin, Weight};
use sable_inherents::{InherentCheckError, InherentData, InherentIdentifier};
use sable_runtime::{generic::Call, BlockNumber};
use sable_storage::Storage;

/// A function a module exposes to extrinsics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FunctionMetadata {
	/// Name of the function.
	pub name: &'static str,
	/// Index of the function inside its module.
	pub index: u8,
}

/// What the registry knows about a module.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleMetadata {
	/// Index of the module, the first byte of every call to it.
	pub index: u8,
	/// Name of the module.
	pub name: &'static str,
	/// The functions callable through extrinsics.
	pub functions: Vec<FunctionMetadata>,
}

impl ModuleMetadata {
	/// Index of the function called `name`.
	pub fn function_index(&self, name: &str) -> Option<u8> {
		self.functions.iter().find(|f| f.name == name).map(|f| f.index)
	}

	/// Name of the function at `index`.
	pub fn function_name(&self, index: u8) -> Option<&'static str> {
		self.functions.iter().find(|f| f.index == index).map(|f| f.name)
	}
}

/// A module of the runtime.
///
/// Modules keep no state of their own: everything they know lives in the storage handle they
/// are given. The hooks run in ascending module index order.
pub trait Module {
	/// The index, name and functions of the module.
	fn metadata(&self) -> ModuleMetadata;

	/// Execute `call`, whose module index is the one of this module.
	fn dispatch(
		&self,
		storage: &mut dyn Storage,
		origin: RawOrigin,
		call: &Call,
	) -> DispatchResultWithPostInfo;

	/// Static information about `call`.
	fn dispatch_info(&self, _call: &Call) -> DispatchInfo {
		DispatchInfo::default()
	}

	/// Block initialization hook. Returns the weight consumed.
	fn on_initialize(&self, _storage: &mut dyn Storage, _n: BlockNumber) -> Weight {
		0
	}

	/// Hook run when the block has weight left after all extrinsics.
	///
	/// Must not consume more than `remaining_weight`. Returns the weight consumed.
	fn on_idle(
		&self,
		_storage: &mut dyn Storage,
		_n: BlockNumber,
		_remaining_weight: Weight,
	) -> Weight {
		0
	}

	/// Block finalization hook.
	fn on_finalize(&self, _storage: &mut dyn Storage, _n: BlockNumber) {}

	/// The inherent this module provides, if any.
	fn inherent_provider(&self) -> Option<&dyn ProvideInherent> {
		None
	}
}

/// A module that provides or verifies an inherent extrinsic.
///
/// The module creates an inherent extrinsic, provides it to the block author and verifies it on
/// import of the block.
pub trait ProvideInherent {
	/// The inherent identifier used by this inherent.
	fn identifier(&self) -> InherentIdentifier;

	/// Create an inherent out of the given `InherentData`.
	///
	/// NOTE: All checks necessary to ensure that the inherent is correct and that can be done in
	/// the runtime should happen in the returned `Call`.
	/// E.g. if this provides the timestamp, the call will check that the given timestamp is
	/// increasing the old timestamp by more than a minimum and it will also check that the
	/// timestamp hasn't already been set in the current block.
	fn create_inherent(&self, data: &InherentData) -> Option<Call>;

	/// Return whether the call is an inherent call.
	///
	/// NOTE: Signed extrinsics are not inherents, but a signed extrinsic with the given call
	/// variant can be dispatched.
	fn is_inherent(&self, call: &Call) -> bool;

	/// Check whether the given inherent is valid. Checking the inherent is optional and can be
	/// omitted by using the default implementation.
	///
	/// When checking an inherent, the first parameter represents the inherent that is actually
	/// included in the block by its author. Whereas the second parameter represents the inherent
	/// data that the verifying node calculates.
	fn check_inherent(&self, _call: &Call, _data: &InherentData) -> Result<(), InherentCheckError> {
		Ok(())
	}

	/// Determines whether this inherent is required in this block.
	///
	/// - `None` indicates that this inherent is not required in this block. The default
	/// implementation returns this.
	///
	/// - `Some(err)` indicates that this inherent is required in this block. The block is
	/// rejected with `err` if it does not contain one.
	fn is_inherent_required(&self, _data: &InherentData) -> Option<InherentCheckError> {
		None
	}
}
