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

//! # System Module
//!
//! The System module keeps the per-block bookkeeping of the runtime: the block being built, the
//! execution phase, the extrinsics applied so far, the events they deposited and the hashes of
//! recent blocks. It also seals a block by computing its extrinsics and state roots.
//!
//! All state lives in the storage handle given to every function, under the `System` prefix.
//!
//! ## Block lifecycle
//!
//! The functions below must be called in this order for every block:
//!
//! - [`Pallet::reset_events`] and [`Pallet::initialize`].
//! - Module `on_initialize` hooks, then [`Pallet::note_finished_initialize`].
//! - For every extrinsic, [`Pallet::note_extrinsic`] before dispatching it and
//!   [`Pallet::note_applied_extrinsic`] after.
//! - [`Pallet::note_finished_extrinsics`].
//! - [`Pallet::idle_and_finalize_hook`].
//! - [`Pallet::finalize`], which returns the header of the block.
//!
//! ## Dispatchable functions
//!
//! - `remark`: make some on-chain remark. Signed or root origin.
//! - `remark_with_event`: make some on-chain remark and emit an event. Signed origin.

#![warn(missing_docs)]

use codec::{Compact, Decode, Encode, FullCodec};
use core::{fmt::Debug, marker::PhantomData};
use sable_runtime::{
	generic::{self, Call, Header},
	AccountId32, BlockNumber, DispatchError, Nonce, RuntimeVersion, H256,
};
use sable_storage::{trie, well_known_keys, Storage};
use sable_support::{
	dispatch::{
		ensure_signed, ensure_signed_or_root, extract_actual_pays_fee, extract_actual_weight,
		DispatchInfo, DispatchResultWithPostInfo, RawOrigin, Weight,
	},
	storage::{
		types::{StorageMap, StorageValue},
		unhashed,
	},
	storage_instance,
	traits::{FunctionMetadata, Get, Module, ModuleMetadata},
	Blake2_128Concat, ModuleRegistry, Twox64Concat,
};

pub mod extensions;
#[cfg(test)]
mod mock;

pub use extensions::{check_signed, CheckNonZeroSender, CheckNonce};

const LOG_TARGET: &str = "runtime::system";

/// Index of the System module in every runtime.
pub const MODULE_INDEX: u8 = 0;
/// Index of the `remark` function.
pub const REMARK_INDEX: u8 = 0;
/// Index of the `remark_with_event` function.
pub const REMARK_WITH_EVENT_INDEX: u8 = 7;

/// Reference count of an account.
pub type RefCount = u32;

/// Index of an event within a block.
pub type EventIndex = u32;

/// System configuration trait. Implemented by runtime.
pub trait Config: 'static {
	/// The aggregated event type of the runtime.
	type RuntimeEvent: From<Event> + FullCodec + Clone + PartialEq + Debug;

	/// Data to be associated with an account (other than nonce/transaction counter, which this
	/// module does regardless).
	type AccountData: FullCodec + Default + Clone + PartialEq + Debug;

	/// Maximum number of block number to block hash mappings to keep (oldest pruned first).
	type BlockHashCount: Get<BlockNumber>;

	/// Get the chain's in-code version.
	type Version: Get<RuntimeVersion>;

	/// The weight a block may consume. What is left after the extrinsics is offered to the
	/// `on_idle` hooks.
	type MaxBlockWeight: Get<Weight>;
}

/// A phase of a block's execution.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Phase {
	/// Applying an extrinsic.
	ApplyExtrinsic(u32),
	/// Finalizing the block.
	Finalization,
	/// Initializing the block.
	#[default]
	Initialization,
}

/// Information of an account.
#[derive(Clone, Eq, PartialEq, Default, Debug, Encode, Decode)]
pub struct AccountInfo<AccountData> {
	/// The number of transactions this account has sent.
	pub nonce: Nonce,
	/// The number of other modules that currently depend on this account's existence. The account
	/// cannot be reaped until this is zero.
	pub consumers: RefCount,
	/// The number of other modules that allow this account to exist. The account may not be reaped
	/// until this and `sufficients` are both zero.
	pub providers: RefCount,
	/// The number of modules that allow this account to exist for their own purposes only. The
	/// account may not be reaped until this and `providers` are both zero.
	pub sufficients: RefCount,
	/// The additional data that belongs to this account. Used to store the balance(s) in a lot of
	/// chain state.
	pub data: AccountData,
}

/// Record of an event happening.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub struct EventRecord<E> {
	/// The phase of the block it happened in.
	pub phase: Phase,
	/// The event itself.
	pub event: E,
	/// The list of the topics this event has.
	pub topics: Vec<H256>,
}

/// Event for the System module.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub enum Event {
	/// An extrinsic completed successfully.
	ExtrinsicSuccess {
		/// What the extrinsic declared, with the weight it actually consumed.
		dispatch_info: DispatchInfo,
	},
	/// An extrinsic failed.
	ExtrinsicFailed {
		/// Why it failed.
		dispatch_error: DispatchError,
		/// What the extrinsic declared, with the weight it actually consumed.
		dispatch_info: DispatchInfo,
	},
	/// On on-chain remark happened.
	Remarked {
		/// Who made the remark.
		sender: AccountId32,
		/// Blake2-256 hash of the remark.
		hash: H256,
	},
}

storage_instance! {
	pub struct AccountPrefix => ("System", "Account");
	pub struct ExtrinsicCountPrefix => ("System", "ExtrinsicCount");
	pub struct BlockWeightPrefix => ("System", "BlockWeight");
	pub struct AllExtrinsicsLenPrefix => ("System", "AllExtrinsicsLen");
	pub struct BlockHashPrefix => ("System", "BlockHash");
	pub struct ExtrinsicDataPrefix => ("System", "ExtrinsicData");
	pub struct NumberPrefix => ("System", "Number");
	pub struct ParentHashPrefix => ("System", "ParentHash");
	pub struct DigestPrefix => ("System", "Digest");
	pub struct EventsPrefix => ("System", "Events");
	pub struct EventCountPrefix => ("System", "EventCount");
	pub struct EventTopicsPrefix => ("System", "EventTopics");
	pub struct ExecutionPhasePrefix => ("System", "ExecutionPhase");
}

/// The full account information for a particular account ID.
pub type Account<T> = StorageMap<
	AccountPrefix,
	Blake2_128Concat,
	AccountId32,
	AccountInfo<<T as Config>::AccountData>,
>;

/// Total extrinsics count for the current block.
pub type ExtrinsicCount = StorageValue<ExtrinsicCountPrefix, u32>;

/// The current weight for the block.
pub type BlockWeight = StorageValue<BlockWeightPrefix, Weight>;

/// Total length (in bytes) for all extrinsics put together, for the current block.
pub type AllExtrinsicsLen = StorageValue<AllExtrinsicsLenPrefix, u32>;

/// Map of block numbers to block hashes.
pub type BlockHash = StorageMap<BlockHashPrefix, Twox64Concat, BlockNumber, H256>;

/// Extrinsics data for the current block (maps an extrinsic's index to its data).
pub type ExtrinsicData = StorageMap<ExtrinsicDataPrefix, Twox64Concat, u32, Vec<u8>>;

/// The current block number being processed. Set by `initialize`.
pub type Number = StorageValue<NumberPrefix, BlockNumber>;

/// Hash of the previous block.
pub type ParentHash = StorageValue<ParentHashPrefix, H256>;

/// Digest of the current block, also part of the block header.
pub type Digest = StorageValue<DigestPrefix, generic::Digest>;

/// Events deposited for the current block.
///
/// NOTE: The item is unbound and should therefore never be read on chain.
pub type Events<T> = StorageValue<EventsPrefix, Vec<EventRecord<<T as Config>::RuntimeEvent>>>;

/// The number of events in the `Events<T>` list.
pub type EventCount = StorageValue<EventCountPrefix, EventIndex>;

/// Mapping between a topic (represented by H256) and a vector of indexes
/// of events in the `<Events<T>>` list.
///
/// All topic vectors have deterministic storage locations depending on the topic.
///
/// The value has the type `(BlockNumber, EventIndex)` because if we used only just
/// the `EventIndex` then in case if the topic has the same contents on the next block
/// no notification will be triggered thus the event might be lost.
pub type EventTopics =
	StorageMap<EventTopicsPrefix, Blake2_128Concat, H256, Vec<(BlockNumber, EventIndex)>>;

/// The execution phase of the block.
pub type ExecutionPhase = StorageValue<ExecutionPhasePrefix, Phase>;

/// The System module.
pub struct Pallet<T>(PhantomData<T>);

impl<T> Default for Pallet<T> {
	fn default() -> Self {
		Self(PhantomData)
	}
}

impl<T: Config> Pallet<T> {
	/// The module, ready to be registered.
	pub fn new() -> Self {
		Self::default()
	}

	/// Make some on-chain remark.
	///
	/// Can be executed by every `origin` but `None`.
	pub fn remark(origin: RawOrigin, _remark: Vec<u8>) -> DispatchResultWithPostInfo {
		let _ = ensure_signed_or_root(origin)?;
		Ok(().into())
	}

	/// Make some on-chain remark and emit event.
	pub fn remark_with_event(
		storage: &mut dyn Storage,
		origin: RawOrigin,
		remark: Vec<u8>,
	) -> DispatchResultWithPostInfo {
		let who = ensure_signed(origin)?;
		let hash = H256(sp_crypto_hashing::blake2_256(&remark[..]));
		Self::deposit_event(storage, Event::Remarked { sender: who, hash });
		Ok(().into())
	}

	/// Start the execution of a particular block.
	pub fn initialize(
		storage: &mut dyn Storage,
		number: BlockNumber,
		parent_hash: &H256,
		digest: &generic::Digest,
	) {
		// populate environment
		ExecutionPhase::put(storage, Phase::Initialization);
		unhashed::put(storage, well_known_keys::EXTRINSIC_INDEX, &0u32);
		Number::put(storage, number);
		Digest::put(storage, digest);
		ParentHash::put(storage, parent_hash);
		BlockHash::insert(storage, number.saturating_sub(1), parent_hash);

		// Remove previous block data from storage
		BlockWeight::kill(storage);

		log::debug!(target: LOG_TARGET, "[{}] initialized on top of {:?}", number, parent_hash);
	}

	/// To be called immediately after the `on_initialize` hooks have run.
	pub fn note_finished_initialize(storage: &mut dyn Storage) {
		ExecutionPhase::put(storage, Phase::ApplyExtrinsic(0));
		log::trace!(target: LOG_TARGET, "initialization finished");
	}

	/// Note what the extrinsic data of the current extrinsic index is.
	///
	/// This is required to be called before applying an extrinsic. The data will used
	/// in [`Self::finalize`] to calculate the correct extrinsics root.
	pub fn note_extrinsic(storage: &mut dyn Storage, encoded_xt: Vec<u8>) {
		let index = Self::extrinsic_index(storage).unwrap_or_default();
		ExtrinsicData::insert(storage, index, encoded_xt);
	}

	/// To be called immediately after an extrinsic has been applied.
	///
	/// Emits an `ExtrinsicSuccess` or `ExtrinsicFailed` event depending on the outcome.
	/// The emitted event contains the post-dispatch corrected weight, which is also added to
	/// the weight of the block.
	pub fn note_applied_extrinsic(
		storage: &mut dyn Storage,
		r: &DispatchResultWithPostInfo,
		mut info: DispatchInfo,
	) {
		info.weight = extract_actual_weight(r, &info);
		info.pays_fee = extract_actual_pays_fee(r, &info);
		Self::register_extra_weight_unchecked(storage, info.weight);

		let event = match r {
			Ok(_) => Event::ExtrinsicSuccess { dispatch_info: info },
			Err(err) => {
				log::trace!(
					target: LOG_TARGET,
					"Extrinsic failed at block({:?}): {:?}",
					Self::block_number(storage),
					err,
				);
				Event::ExtrinsicFailed { dispatch_error: err.error, dispatch_info: info }
			},
		};
		Self::deposit_event(storage, event);

		let next_extrinsic_index = Self::extrinsic_index(storage).unwrap_or_default() + 1u32;

		unhashed::put(storage, well_known_keys::EXTRINSIC_INDEX, &next_extrinsic_index);
		ExecutionPhase::put(storage, Phase::ApplyExtrinsic(next_extrinsic_index));
	}

	/// To be called immediately after `note_applied_extrinsic` of the last extrinsic of the block
	/// has been called.
	pub fn note_finished_extrinsics(storage: &mut dyn Storage) {
		let extrinsic_index: u32 =
			unhashed::take(storage, well_known_keys::EXTRINSIC_INDEX).unwrap_or_default();
		ExtrinsicCount::put(storage, extrinsic_index);
		ExecutionPhase::put(storage, Phase::Finalization);
		log::trace!(target: LOG_TARGET, "{} extrinsics applied", extrinsic_index);
	}

	/// Offer the weight left in the block to the `on_idle` hooks, then run the `on_finalize`
	/// hooks of every module of `registry`.
	pub fn idle_and_finalize_hook(
		storage: &mut dyn Storage,
		registry: &ModuleRegistry,
		block_number: BlockNumber,
	) {
		let weight = Self::block_weight(storage);
		let max_weight = T::MaxBlockWeight::get();
		let remaining_weight = max_weight.saturating_sub(weight);

		if remaining_weight > 0 {
			let used_weight = registry.on_idle(storage, block_number, remaining_weight);
			Self::register_extra_weight_unchecked(storage, used_weight);
		}

		registry.on_finalize(storage, block_number);
	}

	/// Remove temporary "environment" entries in storage, compute the storage root and return the
	/// resulting header for this block.
	pub fn finalize(storage: &mut dyn Storage) -> Header {
		log::debug!(
			target: LOG_TARGET,
			"[{:?}] {} extrinsics, length: {}, weight: {} / {}",
			Self::block_number(storage),
			Self::extrinsic_count(storage),
			Self::all_extrinsics_len(storage),
			Self::block_weight(storage),
			T::MaxBlockWeight::get(),
		);
		ExecutionPhase::kill(storage);
		AllExtrinsicsLen::kill(storage);

		let number = Self::block_number(storage);
		let parent_hash = Self::parent_hash(storage);
		let digest = Self::digest(storage);

		let extrinsics_count = ExtrinsicCount::take(storage).unwrap_or_default();
		let mut extrinsics = Compact(extrinsics_count).encode();
		for index in 0..extrinsics_count {
			ExtrinsicData::take(storage, index).unwrap_or_default().encode_to(&mut extrinsics);
		}

		let version = T::Version::get().state_version();
		let extrinsics_root = trie::blake2_256_ordered_root(&extrinsics, version)
			.expect("a compact count followed by as many encoded byte vectors; qed");

		// move block hash pruning window by one block
		if let Some(to_remove) = Self::pruning_target(number) {
			BlockHash::remove(storage, to_remove);
		}

		let storage_root = storage.root(version);

		Header::new(number, extrinsics_root, storage_root, parent_hash, digest)
	}

	/// The block whose hash leaves the window when `number` is finalized, if any.
	///
	/// This is `number - BlockHashCount - 1`, and nothing while that would be zero or negative.
	pub fn pruning_target(number: BlockNumber) -> Option<BlockNumber> {
		number
			.checked_sub(T::BlockHashCount::get())
			.and_then(|n| n.checked_sub(1))
			.filter(|n| *n != 0)
	}

	/// Deposits an event into this block's event record.
	///
	/// NOTE: Events not registered at the genesis block and quietly omitted.
	pub fn deposit_event(storage: &mut dyn Storage, event: impl Into<T::RuntimeEvent>) {
		Self::deposit_event_indexed(storage, &[], event.into());
	}

	/// Deposits an event into this block's event record adding this event
	/// to the corresponding topic indexes.
	///
	/// This will update storage entries that correspond to the specified topics.
	/// It is expected that light-clients could subscribe to this topics.
	///
	/// NOTE: Events not registered at the genesis block and quietly omitted.
	pub fn deposit_event_indexed(
		storage: &mut dyn Storage,
		topics: &[H256],
		event: T::RuntimeEvent,
	) {
		let block_number = Self::block_number(storage);

		// Don't populate events on genesis.
		if block_number == 0 {
			return
		}

		let phase = ExecutionPhase::get(storage).unwrap_or_default();
		let event = EventRecord { phase, event, topics: topics.to_vec() };

		// Index of the event to be added.
		let event_idx = {
			let old_event_count = EventCount::get_or_default(storage);
			let new_event_count = match old_event_count.checked_add(1) {
				// We've reached the maximum number of events at this block, just
				// don't do anything and leave the event_count unaltered.
				None => return,
				Some(nc) => nc,
			};
			EventCount::put(storage, new_event_count);
			old_event_count
		};

		Events::<T>::mutate(storage, |events| events.push(event));

		for topic in topics {
			EventTopics::mutate(storage, topic, |indexes| indexes.push((block_number, event_idx)));
		}
	}

	/// Resets events and topics of the previous block.
	pub fn reset_events(storage: &mut dyn Storage) {
		Events::<T>::kill(storage);
		EventCount::kill(storage);
		let _ = EventTopics::clear(storage, None);
	}

	/// Get the current events deposited by the runtime.
	///
	/// NOTE: The list is unbounded. This should only be used in tests and by tools.
	pub fn events(storage: &dyn Storage) -> Vec<EventRecord<T::RuntimeEvent>> {
		Events::<T>::get_or_default(storage)
	}

	/// Number of events deposited in the current block.
	pub fn event_count(storage: &dyn Storage) -> EventIndex {
		EventCount::get_or_default(storage)
	}

	/// The events of the current block, and of no other block, indexed under `topic`.
	pub fn event_topics(storage: &dyn Storage, topic: &H256) -> Vec<(BlockNumber, EventIndex)> {
		EventTopics::get_or_default(storage, topic)
	}

	/// Inform the system module of some additional weight that should be accounted for, in the
	/// current block.
	///
	/// NOTE: use with extra care; this function is made public only be used for certain modules
	/// that need it. A runtime that does not have dynamic calls should never need this and should
	/// stick to static weights.
	pub fn register_extra_weight_unchecked(storage: &mut dyn Storage, weight: Weight) {
		BlockWeight::mutate(storage, |current| *current = current.saturating_add(weight));
	}

	/// Add `len` bytes to the total length of the extrinsics of the block.
	pub fn note_extrinsic_len(storage: &mut dyn Storage, len: u32) {
		AllExtrinsicsLen::mutate(storage, |all| *all = all.saturating_add(len));
	}

	/// The current block number being processed. Set by `initialize`.
	pub fn block_number(storage: &dyn Storage) -> BlockNumber {
		Number::get_or_default(storage)
	}

	/// Hash of the previous block.
	pub fn parent_hash(storage: &dyn Storage) -> H256 {
		ParentHash::get_or_default(storage)
	}

	/// Digest of the current block.
	pub fn digest(storage: &dyn Storage) -> generic::Digest {
		Digest::get_or_default(storage)
	}

	/// Gets the index of extrinsic that is currently executing.
	pub fn extrinsic_index(storage: &dyn Storage) -> Option<u32> {
		unhashed::get(storage, well_known_keys::EXTRINSIC_INDEX)
	}

	/// Gets extrinsics count.
	pub fn extrinsic_count(storage: &dyn Storage) -> u32 {
		ExtrinsicCount::get_or_default(storage)
	}

	/// Total length of the extrinsics applied so far.
	pub fn all_extrinsics_len(storage: &dyn Storage) -> u32 {
		AllExtrinsicsLen::get_or_default(storage)
	}

	/// Weight consumed by the current block so far.
	pub fn block_weight(storage: &dyn Storage) -> Weight {
		BlockWeight::get_or_default(storage)
	}

	/// The phase the current block is in, if it is being executed.
	pub fn execution_phase(storage: &dyn Storage) -> Option<Phase> {
		ExecutionPhase::get(storage)
	}

	/// Hash of the block `number`, or the zero hash if it is unknown.
	pub fn block_hash(storage: &dyn Storage, number: BlockNumber) -> H256 {
		BlockHash::get_or_default(storage, number)
	}

	/// Whether the hash of the block `number` is still known.
	pub fn block_hash_exists(storage: &dyn Storage, number: BlockNumber) -> bool {
		BlockHash::contains_key(storage, number)
	}

	/// The information of account `who`, or the default when it has none.
	pub fn account(storage: &dyn Storage, who: &AccountId32) -> AccountInfo<T::AccountData> {
		Account::<T>::get_or_default(storage, who)
	}

	/// Overwrite the information of account `who`.
	pub fn insert_account(
		storage: &mut dyn Storage,
		who: &AccountId32,
		info: &AccountInfo<T::AccountData>,
	) {
		Account::<T>::insert(storage, who, info);
	}

	/// Retrieve the account transaction counter from storage.
	pub fn account_nonce(storage: &dyn Storage, who: &AccountId32) -> Nonce {
		Self::account(storage, who).nonce
	}

	/// Increment a particular account's nonce by 1.
	pub fn inc_account_nonce(storage: &mut dyn Storage, who: &AccountId32) {
		Account::<T>::mutate(storage, who, |a| a.nonce = a.nonce.saturating_add(1));
	}

	/// An account is being created.
	pub fn account_exists(storage: &dyn Storage, who: &AccountId32) -> bool {
		Account::<T>::contains_key(storage, who)
	}
}

impl<T: Config> Module for Pallet<T> {
	fn metadata(&self) -> ModuleMetadata {
		ModuleMetadata {
			index: MODULE_INDEX,
			name: "System",
			functions: vec![
				FunctionMetadata { name: "remark", index: REMARK_INDEX },
				FunctionMetadata { name: "remark_with_event", index: REMARK_WITH_EVENT_INDEX },
			],
		}
	}

	fn dispatch(
		&self,
		storage: &mut dyn Storage,
		origin: RawOrigin,
		call: &Call,
	) -> DispatchResultWithPostInfo {
		let remark = || {
			call.decode_args::<Vec<u8>>()
				.map_err(|_| DispatchError::Other("remark is not a byte sequence"))
		};
		match call.index.function_index {
			REMARK_INDEX => Self::remark(origin, remark()?),
			REMARK_WITH_EVENT_INDEX => Self::remark_with_event(storage, origin, remark()?),
			_ => Err(DispatchError::CannotLookup.into()),
		}
	}
}
