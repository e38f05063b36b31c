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

//! Traits for naming the storage items of a module.

use sable_storage::{item_key, module_key};

/// An instance of a storage in a module.
///
/// The module prefix isolates the storage of a module from the other modules, and the storage
/// prefix isolates the items of a module from each other. Declare instances with
/// [`storage_instance!`](crate::storage_instance).
pub trait StorageInstance {
	/// Prefix of a module to isolate it from other modules.
	fn module_prefix() -> &'static str;

	/// Return the prefix hash of the module.
	///
	/// NOTE: This hash must be `twox_128(module_prefix())`.
	fn module_prefix_hash() -> [u8; 16] {
		module_key(Self::module_prefix())
	}

	/// Prefix given to a storage to isolate from other storages in the module.
	const STORAGE_PREFIX: &'static str;

	/// Return the prefix hash of instance.
	///
	/// NOTE: This hash must be `twox_128(module_prefix())++twox_128(STORAGE_PREFIX)`.
	/// Should not impl this function by hand. Only use the default or macro generated impls.
	fn prefix_hash() -> [u8; 32] {
		item_key(&Self::module_prefix_hash(), Self::STORAGE_PREFIX)
	}
}
