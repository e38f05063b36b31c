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

//! Inherent extrinsics.
//!
//! Inherent extrinsics are unsigned extrinsics that are inserted into a block by the block
//! author. They carry environment data the chain cannot learn otherwise, the current time being
//! the canonical example.
//!
//! The author collects that data into an [`InherentData`] before building the block. Modules
//! turn it into extrinsics, and on import every node checks the inherents of the block against
//! its own view of the data. The outcome of that check is a [`CheckInherentsResult`].
//!
//! An inherent check may fail with a fatal error, which rejects the block at once, or with a
//! non-fatal one, which is recorded and lets the check continue. See [`IsFatalError`].

#![warn(missing_docs)]

use codec::{Compact, Decode, DecodeAll, Encode, Input, Output};
use std::collections::{btree_map::Entry, BTreeMap};

const LOG_TARGET: &str = "runtime::inherents";

/// An identifier for an inherent.
pub type InherentIdentifier = [u8; 8];

/// Errors that occur in context of inherents.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
	#[error("Inherent data already exists for identifier: {}", String::from_utf8_lossy(.0))]
	InherentDataExists(InherentIdentifier),
	#[error("Failed to decode inherent data for identifier: {}", String::from_utf8_lossy(.1))]
	DecodingFailed(#[source] codec::Error, InherentIdentifier),
	#[error("There was already a fatal error reported and no other errors are allowed")]
	FatalErrorReported,
}

/// Inherent data to include in a block.
///
/// Entries are kept ordered by identifier, so the encoding does not depend on insertion order.
#[derive(Clone, Default, PartialEq, Eq, Debug, Encode)]
pub struct InherentData {
	/// All inherent data encoded with parity-scale-codec and an identifier.
	data: BTreeMap<InherentIdentifier, Vec<u8>>,
}

impl InherentData {
	/// Create a new instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Put data for an inherent into the internal storage.
	///
	/// # Return
	///
	/// Returns `Ok(())` if the data could be inserted and no data for an inherent with the same
	/// identifier existed, otherwise an error is returned.
	///
	/// Inherent identifiers need to be unique, otherwise decoding of these values will not work!
	pub fn put_data<I: Encode>(
		&mut self,
		identifier: InherentIdentifier,
		inherent: &I,
	) -> Result<(), Error> {
		match self.data.entry(identifier) {
			Entry::Vacant(entry) => {
				entry.insert(inherent.encode());
				Ok(())
			},
			Entry::Occupied(_) => Err(Error::InherentDataExists(identifier)),
		}
	}

	/// Replace the data for an inherent.
	///
	/// If it does not exist, the data is just inserted.
	pub fn replace_data<I: Encode>(&mut self, identifier: InherentIdentifier, inherent: &I) {
		self.data.insert(identifier, inherent.encode());
	}

	/// Returns the data for the requested inherent.
	///
	/// # Return
	///
	/// - `Ok(Some(I))` if the data could be found and deserialized.
	/// - `Ok(None)` if the data could not be found.
	/// - `Err(_)` if the data could be found, but deserialization did not work.
	pub fn get_data<I: Decode>(&self, identifier: &InherentIdentifier) -> Result<Option<I>, Error> {
		match self.data.get(identifier) {
			Some(inherent) => I::decode_all(&mut &inherent[..])
				.map_err(|e| Error::DecodingFailed(e, *identifier))
				.map(Some),
			None => Ok(None),
		}
	}

	/// Returns the raw encoded data for the requested inherent.
	pub fn get_raw(&self, identifier: &InherentIdentifier) -> Option<&[u8]> {
		self.data.get(identifier).map(|data| &data[..])
	}

	/// Identifiers with data, in ascending order.
	pub fn identifiers(&self) -> impl Iterator<Item = &InherentIdentifier> {
		self.data.keys()
	}

	/// Get the number of inherents in this instance
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether no inherent data is stored.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	fn clear(&mut self) {
		self.data.clear();
	}
}

impl Decode for InherentData {
	fn decode<I: Input>(input: &mut I) -> Result<Self, codec::Error> {
		let len = Compact::<u32>::decode(input)?.0;
		let mut data = BTreeMap::new();
		for _ in 0..len {
			let identifier = InherentIdentifier::decode(input)?;
			let value = Vec::<u8>::decode(input)?;
			if data.insert(identifier, value).is_some() {
				return Err("Duplicate inherent identifier".into())
			}
		}
		Ok(Self { data })
	}
}

/// The result of checking inherents.
///
/// It either returns okay for all checks, stores all occurred errors or just one fatal error.
///
/// When a fatal error occurs, all other errors are removed and the implementation needs to
/// abort checking inherents.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub struct CheckInherentsResult {
	/// Did the check succeed?
	okay: bool,
	/// Did we encounter a fatal error?
	fatal_error: bool,
	/// We use the `InherentData` to store our errors.
	errors: InherentData,
}

impl Default for CheckInherentsResult {
	fn default() -> Self {
		Self { okay: true, errors: InherentData::new(), fatal_error: false }
	}
}

impl CheckInherentsResult {
	/// Create a new instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Put an error into the result.
	///
	/// This makes this result resolve to `ok() == false`.
	///
	/// # Parameters
	///
	/// - identifier - The identifier of the inherent that generated the error.
	/// - error - The error that will be encoded.
	pub fn put_error<E: Encode + IsFatalError>(
		&mut self,
		identifier: InherentIdentifier,
		error: &E,
	) -> Result<(), Error> {
		// Don't accept any other error
		if self.fatal_error {
			return Err(Error::FatalErrorReported)
		}

		if error.is_fatal_error() {
			// remove the other errors.
			self.errors.clear();
		}

		self.errors.put_data(identifier, error)?;

		self.okay = false;
		self.fatal_error = error.is_fatal_error();

		log::debug!(
			target: LOG_TARGET,
			"inherent {} failed its check (fatal: {})",
			String::from_utf8_lossy(&identifier),
			self.fatal_error,
		);

		Ok(())
	}

	/// Get an error out of the result.
	///
	/// # Return
	///
	/// - `Ok(Some(I))` if the error could be found and deserialized.
	/// - `Ok(None)` if the error could not be found.
	/// - `Err(_)` if the error could be found, but deserialization did not work.
	pub fn get_error<E: Decode>(
		&self,
		identifier: &InherentIdentifier,
	) -> Result<Option<E>, Error> {
		self.errors.get_data(identifier)
	}

	/// Convert into an iterator over all contained errors.
	pub fn into_errors(self) -> impl Iterator<Item = (InherentIdentifier, Vec<u8>)> {
		self.errors.data.into_iter()
	}

	/// Is this result ok?
	pub fn ok(&self) -> bool {
		self.okay
	}

	/// Is this a fatal error?
	pub fn fatal_error(&self) -> bool {
		self.fatal_error
	}
}

/// Did we encounter a fatal error while checking an inherent?
///
/// A fatal error is everything that fails while checking an inherent error, e.g. the inherent
/// was not found, could not be decoded etc.
/// Then there are cases where you not want the inherent check to fail, but report that there is
/// an action required. For example a timestamp of a block is in the future, the timestamp is still
/// correct, but it is required to verify the block at a later time again and then the inherent
/// check will succeed.
pub trait IsFatalError {
	/// Is this a fatal error?
	fn is_fatal_error(&self) -> bool;
}

/// Auxiliary to make any given error resolve to `is_fatal_error() == true` for [`IsFatalError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeFatalError<E>(pub E);

impl<E: Encode> Encode for MakeFatalError<E> {
	fn size_hint(&self) -> usize {
		self.0.size_hint()
	}

	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		self.0.encode_to(dest)
	}
}

impl<E> From<E> for MakeFatalError<E> {
	fn from(err: E) -> Self {
		MakeFatalError(err)
	}
}

impl<E> IsFatalError for MakeFatalError<E> {
	fn is_fatal_error(&self) -> bool {
		true
	}
}

/// A failed inherent check with its module-specific error already encoded.
///
/// This is what crosses the boundary between a module and the inherent checker, which does not
/// know the error types of the modules. It encodes to the raw module error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InherentCheckError {
	/// Whether the block must be rejected.
	pub fatal: bool,
	/// The encoded module error.
	pub payload: Vec<u8>,
}

impl InherentCheckError {
	/// Erase the type of a module error.
	pub fn new<E: Encode + IsFatalError>(error: &E) -> Self {
		Self { fatal: error.is_fatal_error(), payload: error.encode() }
	}

	/// A fatal error with the given encoded payload.
	pub fn fatal(payload: Vec<u8>) -> Self {
		Self { fatal: true, payload }
	}

	/// A non-fatal error with the given encoded payload.
	pub fn non_fatal(payload: Vec<u8>) -> Self {
		Self { fatal: false, payload }
	}
}

impl Encode for InherentCheckError {
	fn size_hint(&self) -> usize {
		self.payload.len()
	}

	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		dest.write(&self.payload)
	}
}

impl IsFatalError for InherentCheckError {
	fn is_fatal_error(&self) -> bool {
		self.fatal
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	const TEST_INHERENT_0: InherentIdentifier = *b"testinh0";
	const TEST_INHERENT_1: InherentIdentifier = *b"testinh1";

	#[derive(Encode)]
	struct NonFatalError(u32);

	impl IsFatalError for NonFatalError {
		fn is_fatal_error(&self) -> bool {
			false
		}
	}

	#[test]
	fn inherent_data_encodes_and_decodes() {
		let inherent_0 = vec![1, 2, 3];
		let inherent_1: u32 = 7;

		let mut data = InherentData::new();
		data.put_data(TEST_INHERENT_0, &inherent_0).unwrap();
		data.put_data(TEST_INHERENT_1, &inherent_1).unwrap();

		let encoded = data.encode();

		let decoded = InherentData::decode(&mut &encoded[..]).unwrap();

		assert_eq!(decoded.get_data::<Vec<u32>>(&TEST_INHERENT_0).unwrap().unwrap(), inherent_0);
		assert_eq!(decoded.get_data::<u32>(&TEST_INHERENT_1).unwrap().unwrap(), inherent_1);
	}

	#[test]
	fn encoding_is_sorted_by_identifier() {
		let mut forward = InherentData::new();
		forward.put_data(*b"aaaaaaaa", &1u8).unwrap();
		forward.put_data(*b"bbbbbbbb", &2u8).unwrap();

		let mut backward = InherentData::new();
		backward.put_data(*b"bbbbbbbb", &2u8).unwrap();
		backward.put_data(*b"aaaaaaaa", &1u8).unwrap();

		let mut expected = vec![8];
		expected.extend_from_slice(b"aaaaaaaa");
		expected.extend_from_slice(&[4, 1]);
		expected.extend_from_slice(b"bbbbbbbb");
		expected.extend_from_slice(&[4, 2]);

		assert_eq!(forward.encode(), expected);
		assert_eq!(backward.encode(), expected);
	}

	#[test]
	fn adding_same_inherent_returns_an_error() {
		let mut data = InherentData::new();
		data.put_data(TEST_INHERENT_0, &8).unwrap();
		assert_matches!(
			data.put_data(TEST_INHERENT_0, &10),
			Err(Error::InherentDataExists(id)) if id == TEST_INHERENT_0
		);
		assert_eq!(data.len(), 1);

		data.replace_data(TEST_INHERENT_0, &10u32);
		assert_eq!(data.get_data::<u32>(&TEST_INHERENT_0).unwrap(), Some(10));
	}

	#[test]
	fn decoding_rejects_duplicate_identifiers() {
		let mut encoded = vec![8];
		for _ in 0..2 {
			encoded.extend_from_slice(&TEST_INHERENT_0);
			encoded.extend_from_slice(&[4, 1]);
		}
		assert!(InherentData::decode(&mut &encoded[..]).is_err());
	}

	#[test]
	fn undecodable_data_is_reported() {
		let mut data = InherentData::new();
		data.put_data(TEST_INHERENT_0, &1u8).unwrap();
		assert_matches!(data.get_data::<u64>(&TEST_INHERENT_0), Err(Error::DecodingFailed(_, id)) if id == TEST_INHERENT_0);
		assert_matches!(data.get_data::<u8>(&TEST_INHERENT_1), Ok(None));
		assert_eq!(data.get_raw(&TEST_INHERENT_0), Some(&[1u8][..]));
	}

	#[test]
	fn check_inherents_result_encodes_and_decodes() {
		let mut result = CheckInherentsResult::new();
		assert!(result.ok());

		result.put_error(TEST_INHERENT_0, &NonFatalError(2)).unwrap();
		assert!(!result.ok());
		assert!(!result.fatal_error());

		let encoded = result.encode();
		let decoded = CheckInherentsResult::decode(&mut &encoded[..]).unwrap();

		assert_eq!(decoded.get_error::<u32>(&TEST_INHERENT_0).unwrap().unwrap(), 2);
		assert!(!decoded.ok());
		assert!(!decoded.fatal_error());
	}

	#[test]
	fn check_inherents_result_removes_other_errors_on_fatal_error() {
		let mut result = CheckInherentsResult::new();
		assert!(result.ok());

		result.put_error(TEST_INHERENT_0, &NonFatalError(2)).unwrap();
		assert!(!result.ok());
		assert!(!result.fatal_error());

		result.put_error(TEST_INHERENT_1, &MakeFatalError(4u32)).unwrap();
		assert!(!result.ok());
		assert!(result.fatal_error());

		assert!(result.put_error(TEST_INHERENT_0, &NonFatalError(5)).is_err());

		result.into_errors().for_each(|(i, e)| match i {
			TEST_INHERENT_1 => assert_eq!(u32::decode(&mut &e[..]).unwrap(), 4),
			_ => panic!("There should be no other error!"),
		});
	}

	#[test]
	fn type_erased_errors_keep_their_payload() {
		let erased = InherentCheckError::new(&MakeFatalError(9u32));
		assert!(erased.is_fatal_error());
		assert_eq!(erased.encode(), 9u32.encode());

		let mut result = CheckInherentsResult::new();
		result.put_error(TEST_INHERENT_0, &InherentCheckError::non_fatal(vec![1, 2])).unwrap();
		assert!(!result.fatal_error());
		assert_eq!(result.clone().into_errors().next(), Some((TEST_INHERENT_0, vec![1, 2])));

		result.put_error(TEST_INHERENT_1, &erased).unwrap();
		assert!(result.fatal_error());
		assert_matches!(
			result.put_error(TEST_INHERENT_0, &InherentCheckError::fatal(vec![])),
			Err(Error::FatalErrorReported)
		);
	}
}
