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

//! # Executive Module
//!
//! The Executive module acts as the orchestration layer for the runtime. It dispatches incoming
//! extrinsic calls to the respective modules of the runtime.
//!
//! ## Overview
//!
//! The executive module is not a typical module providing functionality around a specific
//! feature. It is a cross-cutting framework component for the Sable runtime. It works in
//! conjunction with the [System module](sable_system) to perform these cross-cutting functions.
//!
//! The Executive module provides functions to:
//!
//! - Check transaction validity.
//! - Initialize a block.
//! - Apply extrinsics.
//! - Execute a block.
//! - Finalize a block.
//! - Create and check the inherents of a block.
//!
//! ## Usage
//!
//! The Executive is built once from the [`ModuleRegistry`] of the runtime. The System module must
//! be part of it. Every function takes the storage of the block being processed.
//!
//! A block is rejected in full as soon as anything is wrong with it: [`Executive::execute_block`]
//! returns an [`Error`] and the caller discards the storage changes.

#![warn(missing_docs)]

mod inherents;

pub use inherents::{check_inherents, ensure_inherents_are_first};

use codec::Encode;
use core::marker::PhantomData;
use sable_inherents::{CheckInherentsResult, InherentData};
use sable_runtime::{
	generic::{Block, Digest, ExtrinsicFormat, Header, UncheckedExtrinsic},
	transaction_validity::{InvalidTransaction, TransactionValidityError, UnknownTransaction},
	ApplyExtrinsicResult, BlockNumber, DecodeError, H256,
};
use sable_storage::Storage;
use sable_support::{
	dispatch::{DispatchClass, RawOrigin},
	ModuleRegistry,
};
use sable_system::Config;

const LOG_TARGET: &str = "runtime::executive";

type System<T> = sable_system::Pallet<T>;

/// Why a block was rejected.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
	/// The block could not be decoded.
	#[error("invalid block encoding: {0}")]
	Decode(#[from] DecodeError),
	/// An inherent comes after an extrinsic that is not one.
	#[error("invalid inherent position for extrinsic at index {0}")]
	InvalidInherentPosition(u32),
	/// An extrinsic of the block is not valid.
	#[error("extrinsic at index {index} is invalid: {error}")]
	InvalidExtrinsic {
		/// Position of the extrinsic in the block.
		index: u32,
		/// Why it is invalid.
		error: TransactionValidityError,
	},
	/// The header does not carry the number of the executed block.
	#[error("header number {expected} does not match the executed block {computed}")]
	NumberMismatch {
		/// Number in the supplied header.
		expected: BlockNumber,
		/// Number of the executed block.
		computed: BlockNumber,
	},
	/// The header does not carry the digest the block execution produced.
	#[error("digest item must match that calculated")]
	DigestMismatch {
		/// Digest in the supplied header.
		expected: Digest,
		/// Digest produced by the execution.
		computed: Digest,
	},
	/// The header does not commit to the state the block execution produced.
	#[error("storage root must match that calculated: {expected:?} != {computed:?}")]
	StateRootMismatch {
		/// Root in the supplied header.
		expected: H256,
		/// Root of the storage after execution.
		computed: H256,
	},
	/// The header does not commit to the extrinsics of the block.
	#[error("transaction trie root must be valid: expected {expected:?}, computed {computed:?}")]
	ExtrinsicsRootMismatch {
		/// Root in the supplied header.
		expected: H256,
		/// Root of the extrinsics of the block.
		computed: H256,
	},
}

/// Main entry point for certain runtime actions as e.g. `execute_block`.
///
/// Generic parameters:
/// - `T`: The configuration of the System module.
pub struct Executive<T> {
	registry: ModuleRegistry,
	_config: PhantomData<T>,
}

impl<T: Config> Executive<T> {
	/// Executive over the modules of `registry`.
	pub fn new(registry: ModuleRegistry) -> Self {
		Self { registry, _config: PhantomData }
	}

	/// The modules of the runtime.
	pub fn registry(&self) -> &ModuleRegistry {
		&self.registry
	}

	/// Start the execution of a particular block.
	pub fn initialize_block(&self, storage: &mut dyn Storage, header: &Header) {
		log::trace!(target: LOG_TARGET, "initialize_block({:?})", header);

		System::<T>::reset_events(storage);
		System::<T>::initialize(storage, header.number, &header.parent_hash, &header.digest);

		let weight = self.registry.on_initialize(storage, header.number);
		System::<T>::register_extra_weight_unchecked(storage, weight);

		System::<T>::note_finished_initialize(storage);
	}

	/// Actually execute all transitions for `block`.
	pub fn execute_block(&self, storage: &mut dyn Storage, block: Block) -> Result<(), Error> {
		log::debug!(
			target: LOG_TARGET,
			"[{:?}] Executing block with {} extrinsics",
			block.header.number,
			block.extrinsics.len(),
		);

		self.initialize_block(storage, &block.header);

		// any initial checks
		let num_inherents =
			self.ensure_inherents_are_first(&block).map_err(Error::InvalidInherentPosition)?;
		log::trace!(target: LOG_TARGET, "{} inherents", num_inherents);

		// execute extrinsics
		let (header, extrinsics) = block.deconstruct();
		self.apply_extrinsics(storage, extrinsics)?;

		// post-extrinsics book-keeping
		System::<T>::note_finished_extrinsics(storage);
		System::<T>::idle_and_finalize_hook(storage, &self.registry, header.number);

		// any final checks
		self.final_checks(storage, &header)
	}

	/// Decode `bytes` as a block and execute it.
	///
	/// A malformed extrinsic rejects the whole block before anything is executed.
	pub fn execute_encoded_block(
		&self,
		storage: &mut dyn Storage,
		bytes: &[u8],
	) -> Result<(), Error> {
		let block = Block::decode_from(bytes)?;
		self.execute_block(storage, block)
	}

	/// Execute given extrinsics.
	fn apply_extrinsics(
		&self,
		storage: &mut dyn Storage,
		extrinsics: Vec<UncheckedExtrinsic>,
	) -> Result<(), Error> {
		for (index, uxt) in extrinsics.into_iter().enumerate() {
			let index = index as u32;
			if let Err(error) = self.apply_extrinsic(storage, uxt) {
				log::debug!(
					target: LOG_TARGET,
					"extrinsic {} of the block is invalid: {:?}",
					index,
					error,
				);
				return Err(Error::InvalidExtrinsic { index, error })
			}
		}
		Ok(())
	}

	/// Finalize the block - it is up the caller to ensure that all header fields are valid
	/// except state-root.
	pub fn finalize_block(&self, storage: &mut dyn Storage) -> Header {
		System::<T>::note_finished_extrinsics(storage);
		let block_number = System::<T>::block_number(storage);
		System::<T>::idle_and_finalize_hook(storage, &self.registry, block_number);

		System::<T>::finalize(storage)
	}

	/// Apply extrinsic outside of the block execution function.
	///
	/// This doesn't attempt to validate anything regarding the block, but it builds a list of uxt
	/// hashes.
	pub fn apply_extrinsic(
		&self,
		storage: &mut dyn Storage,
		uxt: UncheckedExtrinsic,
	) -> ApplyExtrinsicResult {
		let encoded = uxt.encode();
		let encoded_len = encoded.len() as u32;
		log::trace!(target: LOG_TARGET, "apply_extrinsic: {:?}", uxt.function.index);

		// Verify that the signature is good.
		let xt = uxt.check()?;

		let call = xt.function;
		let dispatch_info = self.registry.dispatch_info(&call).ok_or(InvalidTransaction::Call)?;

		let origin = match xt.format {
			ExtrinsicFormat::Signed(who, extra) => {
				sable_system::check_signed::<T>(storage, &who, &extra)?;
				RawOrigin::Signed(who)
			},
			ExtrinsicFormat::Bare => {
				// Unsigned calls are only accepted as the inherents of their modules.
				if !self.registry.is_inherent(&call) {
					return Err(UnknownTransaction::NoUnsignedValidator.into())
				}
				RawOrigin::None
			},
		};

		// The extrinsic is going to be executed, record it for the extrinsics root.
		System::<T>::note_extrinsic(storage, encoded);

		let res = self.registry.dispatch(storage, origin, &call);

		// Mandatory(inherents) are not allowed to fail.
		//
		// The entire block should be discarded if an inherent fails to apply. Otherwise
		// it may open an attack vector.
		if res.is_err() && dispatch_info.class == DispatchClass::Mandatory {
			return Err(InvalidTransaction::BadMandatory.into())
		}

		System::<T>::note_extrinsic_len(storage, encoded_len);
		System::<T>::note_applied_extrinsic(storage, &res, dispatch_info);

		Ok(res.map(|_| ()).map_err(|e| e.error))
	}

	fn final_checks(&self, storage: &mut dyn Storage, header: &Header) -> Result<(), Error> {
		let new_header = System::<T>::finalize(storage);

		if header.number != new_header.number {
			return Err(Error::NumberMismatch {
				expected: header.number,
				computed: new_header.number,
			})
		}

		// check digest
		if header.digest != new_header.digest {
			return Err(Error::DigestMismatch {
				expected: header.digest.clone(),
				computed: new_header.digest,
			})
		}

		// check storage root.
		if header.state_root != new_header.state_root {
			return Err(Error::StateRootMismatch {
				expected: header.state_root,
				computed: new_header.state_root,
			})
		}

		// check transaction trie root represents the transactions.
		if header.extrinsics_root != new_header.extrinsics_root {
			return Err(Error::ExtrinsicsRootMismatch {
				expected: header.extrinsics_root,
				computed: new_header.extrinsics_root,
			})
		}

		log::debug!(target: LOG_TARGET, "[{:?}] block executed", header.number);
		Ok(())
	}

	/// The inherents the modules want in a block built on `data`, as unsigned extrinsics in
	/// ascending module index order.
	pub fn inherent_extrinsics(&self, data: &InherentData) -> Vec<UncheckedExtrinsic> {
		self.registry
			.inherent_providers()
			.filter_map(|provider| provider.create_inherent(data))
			.map(UncheckedExtrinsic::new_bare)
			.collect()
	}

	/// Check the inherents of `block` against the inherent data computed by the verifying node.
	///
	/// See [`check_inherents`].
	pub fn check_inherents(&self, block: &Block, data: &InherentData) -> CheckInherentsResult {
		check_inherents(&self.registry, block, data)
	}

	/// Check that the inherents of `block` all come first. Returns how many there are.
	///
	/// See [`ensure_inherents_are_first`].
	pub fn ensure_inherents_are_first(&self, block: &Block) -> Result<u32, u32> {
		ensure_inherents_are_first(&self.registry, block)
	}
}
