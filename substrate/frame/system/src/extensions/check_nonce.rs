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

use crate::{Account, Config, LOG_TARGET};
use core::marker::PhantomData;
use sable_runtime::{
	transaction_validity::{InvalidTransaction, TransactionValidityError},
	AccountId32, Nonce,
};
use sable_storage::Storage;

/// Nonce check and increment to give replay protection for transactions.
///
/// The signer must have an account kept alive by at least one provider or sufficient, and the
/// nonce of the transaction must be the one of the account. Applying the transaction increments
/// the account nonce.
pub struct CheckNonce<T>(pub Nonce, PhantomData<T>);

impl<T> core::fmt::Debug for CheckNonce<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
		write!(f, "CheckNonce({})", self.0)
	}
}

impl<T: Config> CheckNonce<T> {
	/// Check that the signer sends the transaction with `nonce`.
	pub fn from(nonce: Nonce) -> Self {
		Self(nonce, PhantomData)
	}

	/// Check the nonce is not stale and the account may send transactions.
	///
	/// A nonce ahead of the account passes: it may become valid once the transactions before it
	/// have been applied.
	pub fn validate(
		&self,
		storage: &dyn Storage,
		who: &AccountId32,
	) -> Result<(), TransactionValidityError> {
		let account = Account::<T>::get_or_default(storage, who);
		if account.providers == 0 && account.sufficients == 0 {
			// Nonce storage not paid for
			return Err(InvalidTransaction::Payment.into())
		}
		if self.0 < account.nonce {
			return Err(InvalidTransaction::Stale.into())
		}
		Ok(())
	}

	/// Check the nonce is exactly the one of the account and increment the latter.
	///
	/// Assumes [`Self::validate`] passed.
	pub fn prepare(
		self,
		storage: &mut dyn Storage,
		who: &AccountId32,
	) -> Result<(), TransactionValidityError> {
		let mut account = Account::<T>::get_or_default(storage, who);
		// `self.0 < nonce` already checked in `validate`.
		if self.0 > account.nonce {
			return Err(InvalidTransaction::Future.into())
		}
		// An exhausted nonce would let the last transaction be replayed.
		account.nonce = account.nonce.checked_add(1).ok_or(InvalidTransaction::Stale)?;
		log::trace!(target: LOG_TARGET, "nonce of {:?} is now {}", who, account.nonce);
		Account::<T>::insert(storage, who, account);
		Ok(())
	}
}
