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

//! Checks run on the signer of an extrinsic before its call is dispatched.

pub mod check_non_zero_sender;
pub mod check_nonce;

pub use check_non_zero_sender::CheckNonZeroSender;
pub use check_nonce::CheckNonce;

use crate::Config;
use sable_runtime::{
	generic::SignedExtra, transaction_validity::TransactionValidityError, AccountId32,
};
use sable_storage::Storage;

/// Run every check `extra` is subject to for the signer `who`, then record the transaction in
/// the signer's account.
///
/// Nothing is written to `storage` when an error is returned.
pub fn check_signed<T: Config>(
	storage: &mut dyn Storage,
	who: &AccountId32,
	extra: &SignedExtra,
) -> Result<(), TransactionValidityError> {
	CheckNonZeroSender::<T>::new().validate(who)?;
	let check_nonce = CheckNonce::<T>::from(extra.nonce);
	check_nonce.validate(storage, who)?;
	check_nonce.prepare(storage, who)
}
