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

//! Generic implementation of a block.

use crate::{
	generic::{Header, UncheckedExtrinsic},
	DecodeError, Hash,
};
use codec::{Compact, Decode, Encode, Error, Input};

/// A block: a header and the extrinsics it commits to.
#[derive(PartialEq, Eq, Clone, Encode, Debug)]
pub struct Block {
	/// The block header.
	pub header: Header,
	/// The accompanying extrinsics.
	pub extrinsics: Vec<UncheckedExtrinsic>,
}

impl Block {
	/// Create a block.
	pub fn new(header: Header, extrinsics: Vec<UncheckedExtrinsic>) -> Self {
		Self { header, extrinsics }
	}

	/// Split the block into header and list of extrinsics.
	pub fn deconstruct(self) -> (Header, Vec<UncheckedExtrinsic>) {
		(self.header, self.extrinsics)
	}

	/// Hash of the header.
	pub fn hash(&self) -> Hash {
		self.header.hash()
	}

	/// Decode a block that spans the whole of `bytes`.
	///
	/// Unlike the [`Decode`] implementation, errors of individual extrinsics are kept typed, so a
	/// bad length prefix surfaces as [`DecodeError::InvalidLengthPrefix`].
	pub fn decode_from(bytes: &[u8]) -> Result<Self, DecodeError> {
		let input = &mut &bytes[..];

		let header = Header::decode(input)?;
		let count = Compact::<u32>::decode(input)?.0;

		// Each extrinsic takes at least one byte.
		let mut extrinsics = Vec::with_capacity((count as usize).min(input.len()));
		for _ in 0..count {
			extrinsics.push(UncheckedExtrinsic::decode_with_length(input)?);
		}

		if !input.is_empty() {
			return Err(DecodeError::Codec(format!("{} trailing bytes after block", input.len())))
		}

		Ok(Self { header, extrinsics })
	}
}

impl Decode for Block {
	fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
		Ok(Self { header: Decode::decode(input)?, extrinsics: Decode::decode(input)? })
	}
}
