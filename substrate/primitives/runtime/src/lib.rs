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

//! Runtime primitives of Sable.
//!
//! The wire representation of extrinsics and blocks lives in [`generic`]. This module holds the
//! types every layer of the runtime agrees on: signatures, dispatch errors and the outcome of
//! applying an extrinsic.

#![warn(missing_docs)]

mod error;
pub mod generic;
mod multiaddress;
pub mod transaction_validity;
mod version;

pub use error::DecodeError;
pub use multiaddress::MultiAddress;
pub use version::RuntimeVersion;

pub use sp_core::crypto::AccountId32;
pub use sp_core::H256;

use codec::{Decode, Encode};
use core::fmt;
use sp_core::{crypto::Pair as _, ecdsa, ed25519, sr25519};
use transaction_validity::TransactionValidityError;

/// Block number of the chain.
pub type BlockNumber = u32;

/// Hash of a block, of a header or of a trie.
pub type Hash = H256;

/// Account identifier, the 32 byte public key of the signer.
pub type AccountId = AccountId32;

/// Nonce of an account.
pub type Nonce = u32;

/// Balance of an account, also used for tips.
pub type Balance = u128;

/// Signature verified against an [`AccountId32`].
#[derive(Eq, PartialEq, Clone, Encode, Decode, Debug)]
pub enum MultiSignature {
	/// An Ed25519 signature.
	Ed25519(ed25519::Signature),
	/// An Sr25519 signature.
	Sr25519(sr25519::Signature),
	/// An ECDSA/SECP256k1 signature.
	Ecdsa(ecdsa::Signature),
}

impl MultiSignature {
	/// Verify `msg` against the account `signer`.
	///
	/// For ECDSA the account is the Blake2-256 hash of the compressed public key recovered from
	/// the signature.
	pub fn verify(&self, msg: &[u8], signer: &AccountId32) -> bool {
		let who: &[u8; 32] = signer.as_ref();
		match self {
			Self::Ed25519(sig) => ed25519::Pair::verify(sig, msg, &ed25519::Public::from_raw(*who)),
			Self::Sr25519(sig) => sr25519::Pair::verify(sig, msg, &sr25519::Public::from_raw(*who)),
			Self::Ecdsa(sig) => {
				let m = sp_crypto_hashing::blake2_256(msg);
				sig.recover_prehashed(&m)
					.map_or(false, |pubkey| &sp_crypto_hashing::blake2_256(pubkey.as_ref()) == who)
			},
		}
	}
}

impl From<ed25519::Signature> for MultiSignature {
	fn from(x: ed25519::Signature) -> Self {
		Self::Ed25519(x)
	}
}

impl From<sr25519::Signature> for MultiSignature {
	fn from(x: sr25519::Signature) -> Self {
		Self::Sr25519(x)
	}
}

impl From<ecdsa::Signature> for MultiSignature {
	fn from(x: ecdsa::Signature) -> Self {
		Self::Ecdsa(x)
	}
}

/// Reason why a module call failed.
#[derive(Eq, Clone, Copy, Encode, Decode, Debug)]
pub struct ModuleError {
	/// Module index matching the one of the module registry.
	pub index: u8,
	/// Module specific error value.
	pub error: [u8; 4],
	/// Optional error message.
	#[codec(skip)]
	pub message: Option<&'static str>,
}

impl PartialEq for ModuleError {
	fn eq(&self, other: &Self) -> bool {
		(self.index == other.index) && (self.error == other.error)
	}
}

/// Reason why a dispatch call failed.
#[derive(Eq, Clone, Copy, Encode, Decode, Debug, PartialEq)]
pub enum DispatchError {
	/// Some error occurred.
	#[codec(index = 0)]
	Other(#[codec(skip)] &'static str),
	/// Failed to lookup some data.
	#[codec(index = 1)]
	CannotLookup,
	/// A bad origin.
	#[codec(index = 2)]
	BadOrigin,
	/// A custom error in a module.
	#[codec(index = 3)]
	Module(ModuleError),
	/// Resources exhausted, e.g. attempt to read/write data which is too large to manipulate.
	#[codec(index = 10)]
	Exhausted,
	/// The state is corrupt; this is generally not going to fix itself.
	#[codec(index = 11)]
	Corruption,
	/// Some resource (e.g. a preimage) is unavailable right now. This might fix itself later.
	#[codec(index = 12)]
	Unavailable,
}

impl From<&'static str> for DispatchError {
	fn from(err: &'static str) -> DispatchError {
		DispatchError::Other(err)
	}
}

impl From<ModuleError> for DispatchError {
	fn from(err: ModuleError) -> DispatchError {
		DispatchError::Module(err)
	}
}

impl fmt::Display for DispatchError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Other(msg) => write!(f, "{}", msg),
			Self::CannotLookup => write!(f, "Cannot lookup"),
			Self::BadOrigin => write!(f, "Bad origin"),
			Self::Module(ModuleError { index, error, message }) => {
				write!(f, "Module error (index: {}, error: {:?})", index, error)?;
				if let Some(message) = message {
					write!(f, ": {}", message)?;
				}
				Ok(())
			},
			Self::Exhausted => write!(f, "Resources exhausted"),
			Self::Corruption => write!(f, "State corrupt"),
			Self::Unavailable => write!(f, "Resource unavailable"),
		}
	}
}

impl std::error::Error for DispatchError {}

/// Result of a module function call.
pub type DispatchResult = Result<(), DispatchError>;

/// The outcome of dispatching a call that was accepted into the block.
pub type DispatchOutcome = Result<(), DispatchError>;

/// The result of applying an extrinsic.
///
/// The outer error means the extrinsic is invalid and must not be part of the block. The inner
/// result is the outcome of the dispatch, whose failure is recorded but still part of the block.
pub type ApplyExtrinsicResult = Result<DispatchOutcome, TransactionValidityError>;
