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

//! Generic implementation of a digest.

use codec::{Decode, Encode};

/// Consensus engine unique ID.
pub type ConsensusEngineId = [u8; 4];

/// Generic header digest.
#[derive(PartialEq, Eq, Clone, Encode, Decode, Debug, Default)]
pub struct Digest {
	/// A list of logs in the digest.
	pub logs: Vec<DigestItem>,
}

impl Digest {
	/// Get reference to all digest items.
	pub fn logs(&self) -> &[DigestItem] {
		&self.logs
	}

	/// Push new digest item.
	pub fn push(&mut self, item: DigestItem) {
		self.logs.push(item);
	}

	/// Pop a digest item.
	pub fn pop(&mut self) -> Option<DigestItem> {
		self.logs.pop()
	}

	/// Get reference to the first digest item that matches the passed predicate.
	pub fn log<T: ?Sized, F: Fn(&DigestItem) -> Option<&T>>(&self, predicate: F) -> Option<&T> {
		self.logs().iter().find_map(predicate)
	}

	/// Get the first pre-runtime digest of the given consensus engine.
	pub fn pre_runtime_id(&self, id: &ConsensusEngineId) -> Option<&[u8]> {
		self.log(|item| item.pre_runtime_try_to(id))
	}
}

/// Digest item that is able to encode/decode 'system' digest items and
/// provide opaque access to other items.
#[derive(PartialEq, Eq, Clone, Encode, Decode, Debug)]
pub enum DigestItem {
	/// A pre-runtime digest.
	///
	/// These are messages from the consensus engine to the runtime, although
	/// the consensus engine can (and should) read them itself to avoid
	/// code and state duplication. It is erroneous for a runtime to produce
	/// these, but this is not (yet) checked.
	#[codec(index = 6)]
	PreRuntime(ConsensusEngineId, Vec<u8>),

	/// A message from the runtime to the consensus engine. This should *never*
	/// be generated by the native code of any consensus engine, but this is not
	/// checked (yet).
	#[codec(index = 4)]
	Consensus(ConsensusEngineId, Vec<u8>),

	/// Put a Seal on it. This is only used by native code, and is never seen
	/// by runtimes.
	#[codec(index = 5)]
	Seal(ConsensusEngineId, Vec<u8>),

	/// Some other thing. Unsupported and experimental.
	#[codec(index = 0)]
	Other(Vec<u8>),

	/// An indication for the light clients that the runtime execution
	/// environment is updated.
	#[codec(index = 8)]
	RuntimeEnvironmentUpdated,
}

impl DigestItem {
	/// Returns the payload if this is a pre-runtime digest of engine `id`.
	pub fn pre_runtime_try_to(&self, id: &ConsensusEngineId) -> Option<&[u8]> {
		match self {
			Self::PreRuntime(engine, data) if engine == id => Some(data),
			_ => None,
		}
	}

	/// Returns the engine and payload if this is a seal.
	pub fn as_seal(&self) -> Option<(ConsensusEngineId, &[u8])> {
		match self {
			Self::Seal(engine, data) => Some((*engine, data)),
			_ => None,
		}
	}
}
