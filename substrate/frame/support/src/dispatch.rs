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

//! Dispatch system. Contains the origins and the information attached to a dispatch.

use codec::{Decode, Encode};
use sable_runtime::{AccountId32, DispatchError};

/// Numeric range of a transaction weight.
///
/// Weights are recorded but not enforced: fee and weight accounting are left to collaborators.
pub type Weight = u64;

/// The origin of a dispatch.
#[derive(PartialEq, Eq, Clone, Debug, Encode, Decode)]
pub enum RawOrigin {
	/// The system itself ordained this dispatch to happen: this is the highest privilege level.
	Root,
	/// It is signed by some public key and we provide the `AccountId`.
	Signed(AccountId32),
	/// It is signed by nobody, can be either:
	/// * included and agreed upon by the validators anyway,
	/// * or unsigned transaction validated by a module.
	None,
}

impl From<Option<AccountId32>> for RawOrigin {
	fn from(s: Option<AccountId32>) -> RawOrigin {
		match s {
			Some(who) => RawOrigin::Signed(who),
			None => RawOrigin::None,
		}
	}
}

impl RawOrigin {
	/// Returns `Some` with a reference to the `AccountId` if `self` is `Signed`, `None` otherwise.
	pub fn as_signed(&self) -> Option<&AccountId32> {
		match &self {
			Self::Signed(x) => Some(x),
			_ => None,
		}
	}

	/// Returns `true` if `self` is `Root`, `None` otherwise.
	pub fn is_root(&self) -> bool {
		matches!(&self, Self::Root)
	}

	/// Returns `true` if `self` is `None`, `None` otherwise.
	pub fn is_none(&self) -> bool {
		matches!(&self, Self::None)
	}
}

/// Ensure that the origin `o` represents a signed extrinsic (i.e. transaction).
/// Returns `Ok` with the account that signed the extrinsic or an `Err` otherwise.
pub fn ensure_signed(o: RawOrigin) -> Result<AccountId32, DispatchError> {
	match o {
		RawOrigin::Signed(t) => Ok(t),
		_ => Err(DispatchError::BadOrigin),
	}
}

/// Ensure that the origin `o` represents either a signed extrinsic (i.e. transaction) or the root.
/// Returns `Ok` with the account that signed the extrinsic, `None` if it was root,  or an `Err`
/// otherwise.
pub fn ensure_signed_or_root(o: RawOrigin) -> Result<Option<AccountId32>, DispatchError> {
	match o {
		RawOrigin::Root => Ok(None),
		RawOrigin::Signed(t) => Ok(Some(t)),
		RawOrigin::None => Err(DispatchError::BadOrigin),
	}
}

/// Ensure that the origin `o` represents the root. Returns `Ok` or an `Err` otherwise.
pub fn ensure_root(o: RawOrigin) -> Result<(), DispatchError> {
	match o {
		RawOrigin::Root => Ok(()),
		_ => Err(DispatchError::BadOrigin),
	}
}

/// Ensure that the origin `o` represents an unsigned extrinsic. Returns `Ok` or an `Err` otherwise.
pub fn ensure_none(o: RawOrigin) -> Result<(), DispatchError> {
	match o {
		RawOrigin::None => Ok(()),
		_ => Err(DispatchError::BadOrigin),
	}
}

/// A generalized group of dispatch types.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, Debug, Default)]
pub enum DispatchClass {
	/// A normal dispatch.
	#[default]
	Normal,
	/// An operational dispatch.
	Operational,
	/// A mandatory dispatch. These kinds of dispatch are always included regardless of their
	/// weight, therefore it is critical that they are separately validated to ensure that a
	/// malicious validator cannot craft a valid but impossibly heavy block. Usually this just
	/// means ensuring that the extrinsic can only be included once and that it is always very
	/// light.
	///
	/// Do *NOT* use it for extrinsics that can be heavy.
	///
	/// The only real use case for this is inherent extrinsics that are required to execute in a
	/// block for the block to be valid, and it solves the issue in the case that the block
	/// initialization is sufficiently heavy to mean that those inherents do not fit into the
	/// block. Essentially, we assume that in these exceptional circumstances, it is better to
	/// allow an overweight block to be created than to not allow any block at all to be created.
	Mandatory,
}

/// Explicit enum to denote if a transaction pays fee or not.
#[derive(Clone, Copy, Eq, PartialEq, Encode, Decode, Debug, Default)]
pub enum Pays {
	/// Transactor will pay related fees.
	#[default]
	Yes,
	/// Transactor will NOT pay related fees.
	No,
}

/// A bundle of static information collected from the dispatchable functions of a module.
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug, Encode, Decode)]
pub struct DispatchInfo {
	/// Weight of this transaction.
	pub weight: Weight,
	/// Class of this transaction.
	pub class: DispatchClass,
	/// Does this transaction pay fees.
	pub pays_fee: Pays,
}

/// Weight information that is only available post dispatch.
///
/// NOTE: This can only be used to reduce the weight or fee, not increase it.
#[derive(Clone, Copy, Eq, PartialEq, Default, Debug, Encode, Decode)]
pub struct PostDispatchInfo {
	/// Actual weight consumed by a call or `None` which stands for the worst case static weight.
	pub actual_weight: Option<Weight>,
	/// Whether this transaction should pay fees when all is said and done.
	pub pays_fee: Pays,
}

impl From<()> for PostDispatchInfo {
	fn from(_: ()) -> Self {
		Self { actual_weight: None, pays_fee: Pays::Yes }
	}
}

impl PostDispatchInfo {
	/// Calculate how much weight was actually spent by the `Dispatchable`.
	pub fn calc_actual_weight(&self, info: &DispatchInfo) -> Weight {
		if let Some(actual_weight) = self.actual_weight {
			actual_weight.min(info.weight)
		} else {
			info.weight
		}
	}

	/// Determine if user should actually pay fees at the end of the dispatch.
	pub fn pays_fee(&self, info: &DispatchInfo) -> Pays {
		// If they originally were not paying fees, or the post dispatch info
		// says they should not pay fees, then they don't pay fees.
		// This is because the pre dispatch information must contain the
		// worst case for weight and fees paid.
		if info.pays_fee == Pays::No || self.pays_fee == Pays::No {
			Pays::No
		} else {
			// Otherwise they pay.
			Pays::Yes
		}
	}
}

/// The error of a dispatch, together with what is known about its cost.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Encode, Decode)]
pub struct DispatchErrorWithPostInfo {
	/// Additional information about the `Dispatchable` which is only known post dispatch.
	pub post_info: PostDispatchInfo,
	/// The actual `DispatchResult` indicating whether the dispatch was successful.
	pub error: DispatchError,
}

impl From<DispatchError> for DispatchErrorWithPostInfo {
	fn from(error: DispatchError) -> Self {
		Self { post_info: Default::default(), error }
	}
}

impl From<&'static str> for DispatchErrorWithPostInfo {
	fn from(error: &'static str) -> Self {
		DispatchError::Other(error).into()
	}
}

/// The return type of a module function.
pub type DispatchResultWithPostInfo = Result<PostDispatchInfo, DispatchErrorWithPostInfo>;

/// Extract the actual weight from a dispatch result if any or fall back to the default weight.
pub fn extract_actual_weight(result: &DispatchResultWithPostInfo, info: &DispatchInfo) -> Weight {
	match result {
		Ok(post_info) => post_info,
		Err(err) => &err.post_info,
	}
	.calc_actual_weight(info)
}

/// Extract the actual pays_fee from a dispatch result if any or fall back to the default weight.
pub fn extract_actual_pays_fee(result: &DispatchResultWithPostInfo, info: &DispatchInfo) -> Pays {
	match result {
		Ok(post_info) => post_info,
		Err(err) => &err.post_info,
	}
	.pays_fee(info)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::assert_err;

	#[test]
	fn origins_are_checked() {
		let who = AccountId32::new([1u8; 32]);

		assert_eq!(ensure_signed(RawOrigin::Signed(who.clone())), Ok(who.clone()));
		assert_err!(ensure_signed(RawOrigin::Root), DispatchError::BadOrigin);
		assert_eq!(ensure_signed_or_root(RawOrigin::Root), Ok(None));
		assert_eq!(ensure_signed_or_root(RawOrigin::Signed(who.clone())), Ok(Some(who.clone())));
		assert_err!(ensure_signed_or_root(RawOrigin::None), DispatchError::BadOrigin);
		assert_eq!(ensure_root(RawOrigin::Root), Ok(()));
		assert_err!(ensure_root(RawOrigin::None), DispatchError::BadOrigin);
		assert_eq!(ensure_none(RawOrigin::None), Ok(()));
		assert_err!(ensure_none(RawOrigin::Signed(who.clone())), DispatchError::BadOrigin);

		assert_eq!(RawOrigin::from(Some(who.clone())).as_signed(), Some(&who));
		assert!(RawOrigin::from(None).is_none());
		assert!(RawOrigin::Root.is_root());
	}

	#[test]
	fn actual_weight_is_capped_by_the_declared_one() {
		let info = DispatchInfo { weight: 100, ..Default::default() };

		let refunded: DispatchResultWithPostInfo =
			Ok(PostDispatchInfo { actual_weight: Some(20), pays_fee: Pays::Yes });
		assert_eq!(extract_actual_weight(&refunded, &info), 20);

		let overrun: DispatchResultWithPostInfo =
			Ok(PostDispatchInfo { actual_weight: Some(500), pays_fee: Pays::Yes });
		assert_eq!(extract_actual_weight(&overrun, &info), 100);

		let failed: DispatchResultWithPostInfo = Err(DispatchError::BadOrigin.into());
		assert_eq!(extract_actual_weight(&failed, &info), 100);
		assert_eq!(extract_actual_pays_fee(&failed, &info), Pays::Yes);

		let free: DispatchResultWithPostInfo =
			Ok(PostDispatchInfo { actual_weight: None, pays_fee: Pays::No });
		assert_eq!(extract_actual_pays_fee(&free, &info), Pays::No);
	}

	#[test]
	fn dispatch_info_encoding() {
		let info =
			DispatchInfo { weight: 5, class: DispatchClass::Mandatory, pays_fee: Pays::No };
		assert_eq!(info.encode(), vec![5, 0, 0, 0, 0, 0, 0, 0, 2, 1]);
	}
}
