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

//! A [`Storage`] kept entirely in memory.

use crate::{trie, KillStorageResult, StateVersion, Storage};
use sp_core::H256;
use std::collections::BTreeMap;

const LOG_TARGET: &str = "runtime::storage";

/// In-memory key-value store.
///
/// Keys are kept ordered, which makes prefix deletion and root computation deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryStorage {
	data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStorage {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Iterate over all pairs in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
		self.data.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
	}

	/// Iterate over all keys starting with `prefix`, in key order.
	pub fn keys_with_prefix<'a>(&'a self, prefix: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
		self.data
			.range(prefix.to_vec()..)
			.map(|(k, _)| k.as_slice())
			.take_while(move |k| k.starts_with(prefix))
	}
}

impl From<BTreeMap<Vec<u8>, Vec<u8>>> for InMemoryStorage {
	fn from(data: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
		Self { data }
	}
}

impl FromIterator<(Vec<u8>, Vec<u8>)> for InMemoryStorage {
	fn from_iter<I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>>(iter: I) -> Self {
		Self { data: iter.into_iter().collect() }
	}
}

impl Storage for InMemoryStorage {
	fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
		self.data.get(key).cloned()
	}

	fn set(&mut self, key: &[u8], value: &[u8]) {
		self.data.insert(key.to_vec(), value.to_vec());
	}

	fn clear(&mut self, key: &[u8]) {
		self.data.remove(key);
	}

	fn clear_prefix(&mut self, prefix: &[u8], limit: Option<u32>) -> KillStorageResult {
		let limit = limit.unwrap_or(u32::MAX) as usize;
		let matching: Vec<Vec<u8>> = self
			.keys_with_prefix(prefix)
			.take(limit.saturating_add(1))
			.map(|k| k.to_vec())
			.collect();

		let remaining = matching.len() > limit;
		let mut removed = 0u32;
		for key in matching.into_iter().take(limit) {
			self.data.remove(&key);
			removed += 1;
		}

		log::trace!(
			target: LOG_TARGET,
			"cleared {} keys under prefix {:02x?} (remaining: {})",
			removed,
			prefix,
			remaining,
		);

		if remaining {
			KillStorageResult::SomeRemaining(removed)
		} else {
			KillStorageResult::AllRemoved(removed)
		}
	}

	fn root(&mut self, version: StateVersion) -> H256 {
		trie::root(self.data.iter(), version)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn populated() -> InMemoryStorage {
		[
			(b"abc1".to_vec(), vec![1]),
			(b"abc2".to_vec(), vec![2]),
			(b"abc3".to_vec(), vec![3]),
			(b"abd".to_vec(), vec![4]),
			(b"b".to_vec(), vec![5]),
		]
		.into_iter()
		.collect()
	}

	#[test]
	fn get_set_clear_work() {
		let mut storage = InMemoryStorage::new();
		assert_eq!(storage.get(b"key"), None);
		assert!(!storage.exists(b"key"));

		storage.set(b"key", b"value");
		assert_eq!(storage.get(b"key"), Some(b"value".to_vec()));
		assert!(storage.exists(b"key"));

		storage.set(b"key", b"other");
		assert_eq!(storage.get(b"key"), Some(b"other".to_vec()));

		storage.clear(b"key");
		assert_eq!(storage.get(b"key"), None);
		assert!(storage.is_empty());
	}

	#[test]
	fn clear_prefix_respects_limit() {
		let mut storage = populated();

		assert_eq!(storage.clear_prefix(b"abc", Some(2)), KillStorageResult::SomeRemaining(2));
		assert_eq!(storage.keys_with_prefix(b"abc").count(), 1);

		assert_eq!(storage.clear_prefix(b"abc", Some(2)), KillStorageResult::AllRemoved(1));
		assert_eq!(storage.keys_with_prefix(b"abc").count(), 0);

		// Siblings of the prefix are untouched.
		assert_eq!(storage.get(b"abd"), Some(vec![4]));
		assert_eq!(storage.get(b"b"), Some(vec![5]));
	}

	#[test]
	fn clear_prefix_with_exact_limit_reports_all_removed() {
		let mut storage = populated();
		assert_eq!(storage.clear_prefix(b"abc", Some(3)), KillStorageResult::AllRemoved(3));
	}

	#[test]
	fn clear_prefix_without_limit_removes_everything() {
		let mut storage = populated();
		assert_eq!(storage.clear_prefix(b"ab", None), KillStorageResult::AllRemoved(4));
		assert_eq!(storage.len(), 1);
		assert_eq!(storage.clear_prefix(b"zz", Some(u32::MAX)), KillStorageResult::AllRemoved(0));
	}

	#[test]
	fn root_tracks_content() {
		let mut storage = populated();
		let before = storage.root(StateVersion::V1);
		assert_eq!(before, storage.root(StateVersion::V1));

		storage.set(b"b", &[6]);
		let after = storage.root(StateVersion::V1);
		assert_ne!(before, after);

		storage.set(b"b", &[5]);
		assert_eq!(before, storage.root(StateVersion::V1));
	}

	#[test]
	fn root_of_empty_store_is_the_empty_trie_root() {
		let mut storage = InMemoryStorage::new();
		assert_eq!(
			storage.root(StateVersion::V0),
			trie::ordered_root(Vec::<Vec<u8>>::new(), StateVersion::V0),
		);
	}
}
