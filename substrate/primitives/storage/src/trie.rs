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

//! Binding to the Merkle-Patricia trie used for block commitments.
//!
//! The runtime does not implement the trie. It assembles the leaves and hands them to
//! `sp-trie`, which computes roots with the Blake2-256 hasher.

use crate::StateVersion;
use codec::{DecodeAll, Error};
use sp_core::{Blake2Hasher, H256};
use sp_trie::{LayoutV0, LayoutV1, TrieConfiguration};

/// Root of the trie whose keys are the compact-encoded positions of `encoded_leaves`.
///
/// `encoded_leaves` is a compact item count followed by that many length-prefixed leaves, the
/// SCALE encoding of a `Vec<Vec<u8>>`. Fails if the buffer is not exactly such an encoding.
pub fn blake2_256_ordered_root(
	encoded_leaves: &[u8],
	version: StateVersion,
) -> Result<H256, Error> {
	let leaves = Vec::<Vec<u8>>::decode_all(&mut &encoded_leaves[..])?;
	Ok(ordered_root(leaves, version))
}

/// Root of the trie whose keys are the compact-encoded positions of `leaves`.
pub fn ordered_root<I, A>(leaves: I, version: StateVersion) -> H256
where
	I: IntoIterator<Item = A>,
	A: AsRef<[u8]>,
{
	match version {
		StateVersion::V0 => LayoutV0::<Blake2Hasher>::ordered_trie_root(leaves),
		StateVersion::V1 => LayoutV1::<Blake2Hasher>::ordered_trie_root(leaves),
	}
}

/// Root of the trie made of the given key-value pairs.
pub fn root<I, A, B>(pairs: I, version: StateVersion) -> H256
where
	I: IntoIterator<Item = (A, B)>,
	A: AsRef<[u8]> + Ord,
	B: AsRef<[u8]>,
{
	match version {
		StateVersion::V0 => LayoutV0::<Blake2Hasher>::trie_root(pairs),
		StateVersion::V1 => LayoutV1::<Blake2Hasher>::trie_root(pairs),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use codec::Encode;
	use hex_literal::hex;

	const EMPTY_ROOT: [u8; 32] =
		hex!("03170a2e7597b7b7e3d84c05391d139a62b157e78786d8c082f29dcf4c111314");

	#[test]
	fn empty_leaves_give_the_empty_root() {
		let encoded = Vec::<Vec<u8>>::new().encode();
		assert_eq!(encoded, vec![0]);

		for version in [StateVersion::V0, StateVersion::V1] {
			assert_eq!(blake2_256_ordered_root(&encoded, version).unwrap(), H256(EMPTY_ROOT));
		}
	}

	#[test]
	fn ordered_root_depends_on_order() {
		let leaves = vec![b"first".to_vec(), b"second".to_vec()];
		let reversed: Vec<Vec<u8>> = leaves.iter().rev().cloned().collect();

		let root = blake2_256_ordered_root(&leaves.encode(), StateVersion::V1).unwrap();
		assert_eq!(root, ordered_root(&leaves, StateVersion::V1));
		assert_ne!(root, ordered_root(&reversed, StateVersion::V1));
	}

	#[test]
	fn malformed_leaf_buffer_is_rejected() {
		// Claims two leaves, provides one.
		let mut encoded = vec![b"only".to_vec()].encode();
		encoded[0] = 2 << 2;
		assert!(blake2_256_ordered_root(&encoded, StateVersion::V0).is_err());

		// Trailing garbage after a well-formed list.
		let mut encoded = vec![b"leaf".to_vec()].encode();
		encoded.push(0xff);
		assert!(blake2_256_ordered_root(&encoded, StateVersion::V0).is_err());
	}
}
