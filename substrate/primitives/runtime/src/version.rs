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

use sable_storage::StateVersion;

const LOG_TARGET: &str = "runtime::version";

/// Version of the runtime, fixed at compile time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RuntimeVersion {
	/// Identifies the different runtimes.
	pub spec_name: &'static str,
	/// Name of the implementation of the spec.
	pub impl_name: &'static str,
	/// `authoring_version` is the version of the authorship interface.
	pub authoring_version: u32,
	/// Version of the runtime specification.
	pub spec_version: u32,
	/// Version of the implementation of the specification.
	pub impl_version: u32,
	/// All existing calls (dispatchables) are fully compatible when this number doesn't change.
	pub transaction_version: u32,
	/// Version of the trie layout used for the state and extrinsics roots.
	pub state_version: u8,
}

impl RuntimeVersion {
	/// The trie layout this runtime commits to.
	///
	/// Unknown values fall back to [`StateVersion::V0`].
	pub fn state_version(&self) -> StateVersion {
		StateVersion::try_from(self.state_version).unwrap_or_else(|_| {
			log::warn!(
				target: LOG_TARGET,
				"unknown state version {}, falling back to V0",
				self.state_version,
			);
			StateVersion::V0
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VERSION: RuntimeVersion = RuntimeVersion {
		spec_name: "node-sable",
		impl_name: "sable",
		authoring_version: 1,
		spec_version: 100,
		impl_version: 1,
		transaction_version: 1,
		state_version: 1,
	};

	#[test]
	fn state_version_is_resolved() {
		assert_eq!(VERSION.state_version(), StateVersion::V1);
		assert_eq!(RuntimeVersion { state_version: 0, ..VERSION }.state_version(), StateVersion::V0);
		assert_eq!(RuntimeVersion { state_version: 9, ..VERSION }.state_version(), StateVersion::V0);
	}
}
