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

//! Storage key derivation.
//!
//! A storage key is laid out as:
//!
//! ```text
//! twox128(module) ++ twox128(item) [++ hasher(map_key)]
//! ```
//!
//! where the map hasher is one of the [`StorageHasher`] implementations of this module. The
//! "concat" hashers append the raw key after its hash, so the map key can be recovered from the
//! storage key while every entry of a map still shares the same 32 byte prefix.

use sp_crypto_hashing::{blake2_128, twox_128, twox_64};

/// Hasher used to turn an encoded map key into the suffix of a storage key.
pub trait StorageHasher: 'static {
	/// Hash `x` into the storage key suffix.
	fn hash(x: &[u8]) -> Vec<u8>;
}

/// Uses the key as-is. Only safe for keys that cannot be chosen by users.
pub struct Identity;

impl StorageHasher for Identity {
	fn hash(x: &[u8]) -> Vec<u8> {
		x.to_vec()
	}
}

/// 64 bit xxhash of the key followed by the key itself.
pub struct Twox64Concat;

impl StorageHasher for Twox64Concat {
	fn hash(x: &[u8]) -> Vec<u8> {
		twox_64(x).iter().chain(x.iter()).cloned().collect()
	}
}

/// 128 bit blake2 hash of the key followed by the key itself.
pub struct Blake2_128Concat;

impl StorageHasher for Blake2_128Concat {
	fn hash(x: &[u8]) -> Vec<u8> {
		blake2_128(x).iter().chain(x.iter()).cloned().collect()
	}
}

/// Prefix shared by every storage item of the module called `module`.
pub fn module_key(module: &str) -> [u8; 16] {
	twox_128(module.as_bytes())
}

/// Key of the storage item `item` inside the module whose prefix is `module_key`.
///
/// This is the full key of a plain value, and the common prefix of every entry of a map.
pub fn item_key(module_key: &[u8; 16], item: &str) -> [u8; 32] {
	let mut final_key = [0u8; 32];
	final_key[..16].copy_from_slice(module_key);
	final_key[16..].copy_from_slice(&twox_128(item.as_bytes()));
	final_key
}

/// Key of the map entry whose SCALE-encoded key is `encoded_key`.
pub fn map_key<H: StorageHasher>(item_key: &[u8; 32], encoded_key: &[u8]) -> Vec<u8> {
	let hashed = H::hash(encoded_key);
	let mut final_key = Vec::with_capacity(item_key.len() + hashed.len());
	final_key.extend_from_slice(item_key);
	final_key.extend_from_slice(&hashed);
	final_key
}
