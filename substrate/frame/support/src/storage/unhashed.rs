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

//! Operation on unhashed runtime storage.

use codec::{Decode, Encode};
use sable_storage::{KillStorageResult, Storage};

const LOG_TARGET: &str = "runtime::storage";

/// Return the value of the item in storage under `key`, or `None` if there is no explicit entry.
///
/// A value that does not decode is logged and reported as absent.
pub fn get<T: Decode + Sized, S: Storage + ?Sized>(storage: &S, key: &[u8]) -> Option<T> {
	storage.get(key).and_then(|val| {
		Decode::decode(&mut &val[..]).map(Some).unwrap_or_else(|e| {
			log::error!(
				target: LOG_TARGET,
				"Corrupted state at `{:?}`: {:?}",
				key,
				e,
			);
			None
		})
	})
}

/// Return the value of the item in storage under `key`, or the type's default if there is no
/// explicit entry.
pub fn get_or_default<T: Decode + Sized + Default, S: Storage + ?Sized>(
	storage: &S,
	key: &[u8],
) -> T {
	get(storage, key).unwrap_or_default()
}

/// Return the value of the item in storage under `key`, or `default_value` if there is no
/// explicit entry.
pub fn get_or<T: Decode + Sized, S: Storage + ?Sized>(
	storage: &S,
	key: &[u8],
	default_value: T,
) -> T {
	get(storage, key).unwrap_or(default_value)
}

/// Put `value` in storage under `key`.
pub fn put<T: Encode + ?Sized, S: Storage + ?Sized>(storage: &mut S, key: &[u8], value: &T) {
	value.using_encoded(|slice| storage.set(key, slice));
}

/// Remove `key` from storage, returning its value if it had an explicit entry or `None` otherwise.
pub fn take<T: Decode + Sized, S: Storage + ?Sized>(storage: &mut S, key: &[u8]) -> Option<T> {
	let r = get(storage, key);
	if r.is_some() {
		kill(storage, key);
	}
	r
}

/// Remove `key` from storage, returning its value, or, if there was no explicit entry in storage,
/// the default for its type.
pub fn take_or_default<T: Decode + Sized + Default, S: Storage + ?Sized>(
	storage: &mut S,
	key: &[u8],
) -> T {
	take(storage, key).unwrap_or_default()
}

/// Check to see if `key` has an explicit entry in storage.
pub fn exists<S: Storage + ?Sized>(storage: &S, key: &[u8]) -> bool {
	storage.exists(key)
}

/// Ensure `key` has no explicit entry in storage.
pub fn kill<S: Storage + ?Sized>(storage: &mut S, key: &[u8]) {
	storage.clear(key);
}

/// Ensure keys with the given `prefix` have no entries in storage.
///
/// `None` removes every key under the prefix.
pub fn clear_prefix<S: Storage + ?Sized>(
	storage: &mut S,
	prefix: &[u8],
	limit: Option<u32>,
) -> KillStorageResult {
	storage.clear_prefix(prefix, limit)
}

/// Get a Vec of bytes from storage.
pub fn get_raw<S: Storage + ?Sized>(storage: &S, key: &[u8]) -> Option<Vec<u8>> {
	storage.get(key)
}

/// Put a raw byte slice into storage.
pub fn put_raw<S: Storage + ?Sized>(storage: &mut S, key: &[u8], value: &[u8]) {
	storage.set(key, value)
}

/// Remove `key` from storage and return its raw bytes, if any.
pub fn take_raw<S: Storage + ?Sized>(storage: &mut S, key: &[u8]) -> Option<Vec<u8>> {
	let r = storage.get(key);
	if r.is_some() {
		storage.clear(key);
	}
	r
}

#[cfg(test)]
mod tests {
	use super::*;
	use sable_storage::InMemoryStorage;

	#[test]
	fn typed_values_round_trip_through_bytes() {
		let mut storage = InMemoryStorage::new();

		put(&mut storage, b"number", &7u32);
		assert_eq!(get_raw(&storage, b"number"), Some(vec![7, 0, 0, 0]));
		assert_eq!(get::<u32, _>(&storage, b"number"), Some(7));
		assert!(exists(&storage, b"number"));

		assert_eq!(take::<u32, _>(&mut storage, b"number"), Some(7));
		assert!(!exists(&storage, b"number"));
		assert_eq!(get_or_default::<u32, _>(&storage, b"number"), 0);
		assert_eq!(get_or(&storage, b"number", 9u32), 9);
		assert_eq!(take_or_default::<u32, _>(&mut storage, b"number"), 0);
	}

	#[test]
	fn corrupted_values_read_as_absent() {
		let mut storage = InMemoryStorage::new();
		put_raw(&mut storage, b"number", &[1, 2]);
		assert_eq!(get::<u32, _>(&storage, b"number"), None);
		// The raw bytes are still there.
		assert_eq!(take_raw(&mut storage, b"number"), Some(vec![1, 2]));
		assert_eq!(take_raw(&mut storage, b"number"), None);
	}

	#[test]
	fn works_through_a_trait_object() {
		let mut backend = InMemoryStorage::new();
		let storage: &mut dyn Storage = &mut backend;

		put(storage, b"a1", &1u8);
		put(storage, b"a2", &2u8);
		put(storage, b"b", &3u8);
		kill(storage, b"b");

		assert_eq!(clear_prefix(storage, b"a", None), KillStorageResult::AllRemoved(2));
		assert!(backend.is_empty());
	}
}
