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

//! Storage primitives of the Sable runtime.
//!
//! This crate contains two things:
//!
//! - The derivation of storage keys from a module name, an item name and an optional map key
//!   (see [`module_key`], [`item_key`] and [`map_key`]).
//! - The byte-oriented contract the runtime uses to talk to the key-value store of the host
//!   (see [`Storage`]), together with an in-memory implementation used by tests and tools.
//!
//! The runtime never owns any state across calls: every component receives a `&mut dyn Storage`
//! handle and reads or writes through it.

mod hasher;
mod in_memory;
pub mod trie;

pub use hasher::{
	item_key, map_key, module_key, Blake2_128Concat, Identity, StorageHasher, Twox64Concat,
};
pub use in_memory::InMemoryStorage;

use codec::{Decode, Encode};
use sp_core::H256;

/// Keys with a fixed, well-known meaning that are not derived from a module prefix.
pub mod well_known_keys {
	/// Index of the extrinsic that is currently being applied.
	///
	/// Encodes to a little-endian `u32`. Only present while a block is being executed.
	pub const EXTRINSIC_INDEX: &[u8] = b":extrinsic_index";
}

/// The version of the trie layout used to compute storage and extrinsics roots.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum StateVersion {
	/// Old state version, values are always stored inline in the trie nodes.
	#[default]
	V0 = 0,
	/// New state version, values above 32 bytes are hashed into the nodes.
	V1 = 1,
}

impl TryFrom<u8> for StateVersion {
	type Error = ();

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(StateVersion::V0),
			1 => Ok(StateVersion::V1),
			_ => Err(()),
		}
	}
}

impl From<StateVersion> for u8 {
	fn from(version: StateVersion) -> u8 {
		version as u8
	}
}

/// Outcome of a bounded prefix deletion.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum KillStorageResult {
	/// No key remains under the prefix. Contains the number of keys removed.
	AllRemoved(u32),
	/// The limit was reached before every key under the prefix was removed. Contains the number
	/// of keys removed.
	SomeRemaining(u32),
}

impl KillStorageResult {
	/// Number of keys removed by the call.
	pub fn removed(&self) -> u32 {
		match self {
			KillStorageResult::AllRemoved(n) | KillStorageResult::SomeRemaining(n) => *n,
		}
	}

	/// Whether the prefix is now empty.
	pub fn all_removed(&self) -> bool {
		matches!(self, KillStorageResult::AllRemoved(_))
	}
}

/// The key-value store of the host, as seen by the runtime.
///
/// All keys and values are plain byte strings. Implementations are expected to be infallible:
/// a failing host is not something the runtime can recover from, so there is no error channel.
pub trait Storage {
	/// Read the value stored under `key`.
	fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

	/// Store `value` under `key`, replacing any previous value.
	fn set(&mut self, key: &[u8], value: &[u8]);

	/// Remove the value stored under `key`, if any.
	fn clear(&mut self, key: &[u8]);

	/// Remove up to `limit` keys starting with `prefix`.
	///
	/// `None` means no limit. Callers that need the prefix to be empty must loop while
	/// [`KillStorageResult::SomeRemaining`] is returned.
	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> KillStorageResult;

	/// The Merkle root of the whole store, computed with the given trie layout.
	fn root(&mut self, version: StateVersion) -> H256;

	/// Whether a value is stored under `key`.
	fn exists(&self, key: &[u8]) -> bool {
		self.get(key).is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn state_version_from_byte() {
		assert_eq!(StateVersion::try_from(0u8), Ok(StateVersion::V0));
		assert_eq!(StateVersion::try_from(1u8), Ok(StateVersion::V1));
		assert_eq!(StateVersion::try_from(2u8), Err(()));
		assert_eq!(u8::from(StateVersion::V1), 1);
	}

	#[test]
	fn kill_storage_result_accessors() {
		assert_eq!(KillStorageResult::AllRemoved(3).removed(), 3);
		assert!(KillStorageResult::AllRemoved(0).all_removed());
		assert!(!KillStorageResult::SomeRemaining(7).all_removed());
	}
}
