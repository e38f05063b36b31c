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

//! Typed storage items.
//!
//! A storage item is a zero-sized type naming where its values live. The key of a value is
//! `twox128(module) ++ twox128(item)`. A map entry appends the hashed SCALE encoding of its key.

use super::unhashed;
use crate::traits::StorageInstance;
use codec::{Encode, EncodeLike, FullCodec};
use core::marker::PhantomData;
use sable_storage::{map_key, KillStorageResult, Storage, StorageHasher};

/// A type representing a *value* in storage.
///
/// The value is stored at `Prefix::prefix_hash()`.
pub struct StorageValue<Prefix, Value>(PhantomData<(Prefix, Value)>);

impl<Prefix, Value> StorageValue<Prefix, Value>
where
	Prefix: StorageInstance,
	Value: FullCodec,
{
	/// Get the storage key.
	pub fn hashed_key() -> [u8; 32] {
		Prefix::prefix_hash()
	}

	/// Load the value from the provided storage instance.
	pub fn get<S: Storage + ?Sized>(storage: &S) -> Option<Value> {
		unhashed::get(storage, &Self::hashed_key())
	}

	/// Load the value, or the default of its type when there is none.
	pub fn get_or_default<S: Storage + ?Sized>(storage: &S) -> Value
	where
		Value: Default,
	{
		unhashed::get_or_default(storage, &Self::hashed_key())
	}

	/// Store a value under this key into the provided storage instance.
	pub fn put<S: Storage + ?Sized, Arg: EncodeLike<Value>>(storage: &mut S, val: Arg) {
		unhashed::put(storage, &Self::hashed_key(), &val)
	}

	/// Take a value from storage, removing it afterwards.
	pub fn take<S: Storage + ?Sized>(storage: &mut S) -> Option<Value> {
		unhashed::take(storage, &Self::hashed_key())
	}

	/// Clear the storage value.
	pub fn kill<S: Storage + ?Sized>(storage: &mut S) {
		unhashed::kill(storage, &Self::hashed_key())
	}

	/// Does the value (explicitly) exist in storage?
	pub fn exists<S: Storage + ?Sized>(storage: &S) -> bool {
		unhashed::exists(storage, &Self::hashed_key())
	}

	/// Mutate the value, starting from the default when there is none.
	pub fn mutate<S: Storage + ?Sized, R, F: FnOnce(&mut Value) -> R>(storage: &mut S, f: F) -> R
	where
		Value: Default,
	{
		let mut val = Self::get_or_default(storage);
		let ret = f(&mut val);
		Self::put(storage, &val);
		ret
	}
}

/// A type representing a *map* in storage.
///
/// Each value is stored at `Prefix::prefix_hash() ++ Hasher::hash(key.encode())`.
pub struct StorageMap<Prefix, Hasher, Key, Value>(PhantomData<(Prefix, Hasher, Key, Value)>);

impl<Prefix, Hasher, Key, Value> StorageMap<Prefix, Hasher, Key, Value>
where
	Prefix: StorageInstance,
	Hasher: StorageHasher,
	Key: FullCodec,
	Value: FullCodec,
{
	/// Get the storage key used to fetch a value corresponding to a specific key.
	pub fn hashed_key_for<KeyArg: EncodeLike<Key>>(key: KeyArg) -> Vec<u8> {
		key.using_encoded(|k| map_key::<Hasher>(&Prefix::prefix_hash(), k))
	}

	/// Load the value associated with the given key from the map.
	pub fn get<S: Storage + ?Sized, KeyArg: EncodeLike<Key>>(
		storage: &S,
		key: KeyArg,
	) -> Option<Value> {
		unhashed::get(storage, &Self::hashed_key_for(key))
	}

	/// Load the value associated with the given key, or the default of its type.
	pub fn get_or_default<S: Storage + ?Sized, KeyArg: EncodeLike<Key>>(
		storage: &S,
		key: KeyArg,
	) -> Value
	where
		Value: Default,
	{
		unhashed::get_or_default(storage, &Self::hashed_key_for(key))
	}

	/// Store a value to be associated with the given key from the map.
	pub fn insert<S: Storage + ?Sized, KeyArg: EncodeLike<Key>, ValArg: EncodeLike<Value>>(
		storage: &mut S,
		key: KeyArg,
		val: ValArg,
	) {
		unhashed::put(storage, &Self::hashed_key_for(key), &val)
	}

	/// Remove the value under a key.
	pub fn remove<S: Storage + ?Sized, KeyArg: EncodeLike<Key>>(storage: &mut S, key: KeyArg) {
		unhashed::kill(storage, &Self::hashed_key_for(key))
	}

	/// Take the value under a key.
	pub fn take<S: Storage + ?Sized, KeyArg: EncodeLike<Key>>(
		storage: &mut S,
		key: KeyArg,
	) -> Option<Value> {
		unhashed::take(storage, &Self::hashed_key_for(key))
	}

	/// Does the value (explicitly) exist in storage?
	pub fn contains_key<S: Storage + ?Sized, KeyArg: EncodeLike<Key>>(
		storage: &S,
		key: KeyArg,
	) -> bool {
		unhashed::exists(storage, &Self::hashed_key_for(key))
	}

	/// Mutate the value under a key, starting from the default when there is none.
	pub fn mutate<S, KeyArg, R, F>(storage: &mut S, key: KeyArg, f: F) -> R
	where
		S: Storage + ?Sized,
		KeyArg: EncodeLike<Key>,
		F: FnOnce(&mut Value) -> R,
		Value: Default,
	{
		let final_key = Self::hashed_key_for(key);
		let mut val: Value = unhashed::get_or_default(storage, &final_key);
		let ret = f(&mut val);
		unhashed::put(storage, &final_key, &val);
		ret
	}

	/// Remove up to `limit` entries of the map. `None` removes all of them.
	pub fn clear<S: Storage + ?Sized>(storage: &mut S, limit: Option<u32>) -> KillStorageResult {
		unhashed::clear_prefix(storage, &Prefix::prefix_hash(), limit)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{storage_instance, Blake2_128Concat, Twox64Concat};
	use hex_literal::hex;
	use sable_storage::{module_key, InMemoryStorage};

	storage_instance! {
		struct CounterPrefix => ("Test", "Counter");
		struct BalancesPrefix => ("Test", "Balances");
		struct HashesPrefix => ("Test", "Hashes");
	}

	type Counter = StorageValue<CounterPrefix, u32>;
	type Balances = StorageMap<BalancesPrefix, Blake2_128Concat, u64, u128>;
	type Hashes = StorageMap<HashesPrefix, Twox64Concat, u32, [u8; 32]>;

	#[test]
	fn value_lives_under_module_and_item_prefix() {
		let mut storage = InMemoryStorage::new();
		assert_eq!(Counter::hashed_key()[..16], module_key("Test"));
		assert_eq!(Counter::get(&storage), None);
		assert!(!Counter::exists(&storage));

		Counter::put(&mut storage, 3u32);
		assert_eq!(storage.get(&Counter::hashed_key()), Some(vec![3, 0, 0, 0]));

		let after = Counter::mutate(&mut storage, |c| {
			*c += 1;
			*c
		});
		assert_eq!(after, 4);
		assert_eq!(Counter::take(&mut storage), Some(4));
		assert_eq!(Counter::get_or_default(&storage), 0);

		Counter::put(&mut storage, 1u32);
		Counter::kill(&mut storage);
		assert!(storage.is_empty());
	}

	#[test]
	fn keys_match_the_frame_layout() {
		storage_instance! {
			struct NumberPrefix => ("System", "Number");
		}
		type Number = StorageValue<NumberPrefix, u32>;

		assert_eq!(
			Number::hashed_key(),
			hex!("26aa394eea5630e07c48ae0c9558cef702a5c1b19ab7a04f536c519aca4983ac"),
		);
	}

	#[test]
	fn map_keys_append_the_hashed_key() {
		let key = Hashes::hashed_key_for(7u32);
		assert_eq!(key.len(), 32 + 8 + 4);
		assert_eq!(key[..32], HashesPrefix::prefix_hash());
		assert_eq!(key[40..], 7u32.encode()[..]);
	}

	#[test]
	fn map_operations() {
		let mut storage = InMemoryStorage::new();

		Balances::insert(&mut storage, 1u64, 100u128);
		Balances::insert(&mut storage, 2u64, 200u128);
		assert_eq!(Balances::get(&storage, 1u64), Some(100));
		assert!(Balances::contains_key(&storage, 2u64));
		assert_eq!(Balances::get_or_default(&storage, 3u64), 0);

		Balances::mutate(&mut storage, 3u64, |b| *b += 5);
		assert_eq!(Balances::take(&mut storage, 3u64), Some(5));
		Balances::remove(&mut storage, 2u64);
		assert!(!Balances::contains_key(&storage, 2u64));

		Hashes::insert(&mut storage, 0u32, [1u8; 32]);
		assert_eq!(Balances::clear(&mut storage, None), KillStorageResult::AllRemoved(1));
		// Other items are left alone.
		assert_eq!(Hashes::get(&storage, 0u32), Some([1u8; 32]));
	}
}
