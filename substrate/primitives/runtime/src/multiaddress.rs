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

//! MultiAddress type is a wrapper for multiple downstream account formats.

use codec::{Decode, Encode};
use sp_core::crypto::AccountId32;

/// A multi-format address wrapper for on-chain accounts.
#[derive(Encode, Decode, PartialEq, Eq, Clone, Debug)]
pub enum MultiAddress {
	/// It's an account ID (pubkey).
	Id(AccountId32),
	/// It's an account index.
	Index(#[codec(compact)] u32),
	/// It's some arbitrary raw bytes.
	Raw(Vec<u8>),
	/// It's a 32 byte representation.
	Address32([u8; 32]),
	/// It's a 20 byte representation.
	Address20([u8; 20]),
}

impl MultiAddress {
	/// The account this address designates, when it can be resolved without a lookup.
	///
	/// Account indices and raw or 20 byte addresses need an index module, which this runtime
	/// does not have.
	pub fn account_id(&self) -> Option<AccountId32> {
		match self {
			Self::Id(who) => Some(who.clone()),
			Self::Address32(raw) => Some(AccountId32::new(*raw)),
			Self::Index(_) | Self::Raw(_) | Self::Address20(_) => None,
		}
	}
}

impl From<AccountId32> for MultiAddress {
	fn from(a: AccountId32) -> Self {
		Self::Id(a)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn variants_use_expected_tags() {
		let id = MultiAddress::Id(AccountId32::new([1u8; 32]));
		assert_eq!(id.encode()[0], 0);
		assert_eq!(id.encode().len(), 33);

		assert_eq!(MultiAddress::Index(1).encode(), vec![1, 4]);
		assert_eq!(MultiAddress::Raw(vec![9]).encode(), vec![2, 4, 9]);
		assert_eq!(MultiAddress::Address32([0u8; 32]).encode()[0], 3);
		assert_eq!(MultiAddress::Address20([0u8; 20]).encode()[0], 4);
	}

	#[test]
	fn only_direct_addresses_resolve() {
		let who = AccountId32::new([5u8; 32]);
		assert_eq!(MultiAddress::from(who.clone()).account_id(), Some(who.clone()));
		assert_eq!(MultiAddress::Address32([5u8; 32]).account_id(), Some(who));
		assert_eq!(MultiAddress::Index(3).account_id(), None);
		assert_eq!(MultiAddress::Address20([5u8; 20]).account_id(), None);
	}
}
