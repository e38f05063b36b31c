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

use crate::{self as sable_system, Config};
use sable_runtime::{AccountId32, BlockNumber, RuntimeVersion};
use sable_storage::InMemoryStorage;
use sable_support::{dispatch::Weight, parameter_types};

pub const VERSION: RuntimeVersion = RuntimeVersion {
	spec_name: "test-runtime",
	impl_name: "system-test",
	authoring_version: 1,
	spec_version: 1,
	impl_version: 1,
	transaction_version: 1,
	state_version: 1,
};

parameter_types! {
	pub const BlockHashCount: BlockNumber = 10;
	pub const Version: RuntimeVersion = VERSION;
	pub const MaxBlockWeight: Weight = 1_000;
}

pub struct Test;

impl Config for Test {
	type RuntimeEvent = sable_system::Event;
	type AccountData = u64;
	type BlockHashCount = BlockHashCount;
	type Version = Version;
	type MaxBlockWeight = MaxBlockWeight;
}

pub type System = sable_system::Pallet<Test>;

/// The account whose id is 31 zero bytes followed by `who`.
pub fn account(who: u8) -> AccountId32 {
	let mut id = [0u8; 32];
	id[31] = who;
	AccountId32::new(id)
}

/// Create new externalities for `System` module tests.
pub fn new_test_ext() -> InMemoryStorage {
	let _ = sp_tracing::try_init_simple();
	InMemoryStorage::new()
}
