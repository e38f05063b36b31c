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

use crate::Config;
use codec::Encode;
use core::marker::PhantomData;
use sable_runtime::{
	transaction_validity::{InvalidTransaction, TransactionValidityError},
	AccountId32,
};

/// Check to ensure that the sender is not the zero address.
pub struct CheckNonZeroSender<T>(PhantomData<T>);

impl<T> core::fmt::Debug for CheckNonZeroSender<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckNonZeroSender")
	}
}

impl<T> Default for CheckNonZeroSender<T> {
	fn default() -> Self {
		Self(PhantomData)
	}
}

impl<T: Config> CheckNonZeroSender<T> {
	/// Create new check.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reject the zero account as a signer.
	pub fn validate(&self, who: &AccountId32) -> Result<(), TransactionValidityError> {
		if who.using_encoded(|d| d.iter().all(|x| *x == 0)) {
			return Err(InvalidTransaction::BadSigner.into())
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::Test;

	#[test]
	fn zero_account_ban_works() {
		assert_eq!(
			CheckNonZeroSender::<Test>::new().validate(&AccountId32::new([0; 32])).unwrap_err(),
			TransactionValidityError::from(InvalidTransaction::BadSigner)
		);
		let mut one = [0u8; 32];
		one[31] = 1;
		assert!(CheckNonZeroSender::<Test>::new().validate(&AccountId32::new(one)).is_ok());
	}
}
