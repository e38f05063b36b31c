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

//! Generic implementation of an extrinsic that has passed the verification
//! stage.

/// The kind of extrinsic this is, including any fields required of that kind. This is basically
/// the full extrinsic except the `Call`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ExtrinsicFormat<AccountId, Extra> {
	/// Extrinsic is bare; it is only acceptable as an inherent of a module that claims the call.
	Bare,
	/// Extrinsic has a default origin of `Signed(AccountId)` and carries the extra data its
	/// signer committed to.
	Signed(AccountId, Extra),
}

/// Definition of something that the external world might want to say; its existence implies that
/// it has been checked and is good, particularly with regards to the signature.
///
/// Dispatching [`CheckedExtrinsic::function`] is the job of the executive.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CheckedExtrinsic<AccountId, Call, Extra> {
	/// Who this purports to be from and the extra data they signed, if anyone.
	pub format: ExtrinsicFormat<AccountId, Extra>,

	/// The function that should be called.
	pub function: Call,
}

impl<AccountId, Call, Extra> CheckedExtrinsic<AccountId, Call, Extra> {
	/// The verified signer, if the extrinsic was signed.
	pub fn signer(&self) -> Option<&AccountId> {
		match &self.format {
			ExtrinsicFormat::Bare => None,
			ExtrinsicFormat::Signed(signer, _) => Some(signer),
		}
	}

	/// The signed extra data, if the extrinsic was signed.
	pub fn extra(&self) -> Option<&Extra> {
		match &self.format {
			ExtrinsicFormat::Bare => None,
			ExtrinsicFormat::Signed(_, extra) => Some(extra),
		}
	}

	/// Whether this is a bare extrinsic.
	pub fn is_bare(&self) -> bool {
		matches!(self.format, ExtrinsicFormat::Bare)
	}
}
