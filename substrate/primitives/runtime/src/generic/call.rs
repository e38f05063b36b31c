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

use codec::{Decode, DecodeAll, Encode, Output};

/// Position of a function in the module registry.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CallIndex {
	/// Index of the module.
	pub module_index: u8,
	/// Index of the function inside the module.
	pub function_index: u8,
}

impl CallIndex {
	/// Create a new call index.
	pub const fn new(module_index: u8, function_index: u8) -> Self {
		Self { module_index, function_index }
	}
}

/// A call to a module function.
///
/// The arguments are kept SCALE-encoded: their layout is only known to the module that owns the
/// function. On the wire the call is the two index bytes followed by the raw arguments, with no
/// length of its own, so it always extends to the end of the enclosing extrinsic.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Call {
	/// Which function is called.
	pub index: CallIndex,
	/// The encoded arguments.
	pub args: Vec<u8>,
}

impl Call {
	/// Create a call with `args` encoded.
	pub fn new<A: Encode>(module_index: u8, function_index: u8, args: &A) -> Self {
		Self { index: CallIndex::new(module_index, function_index), args: args.encode() }
	}

	/// Create a call from already encoded arguments.
	pub fn from_raw(index: CallIndex, args: Vec<u8>) -> Self {
		Self { index, args }
	}

	/// Decode the arguments as `T`, which must consume them entirely.
	pub fn decode_args<T: Decode>(&self) -> Result<T, codec::Error> {
		T::decode_all(&mut &self.args[..])
	}

	/// Decode a call that spans the whole of `input`.
	pub(crate) fn decode_remainder(input: &mut &[u8]) -> Result<Self, codec::Error> {
		let index = CallIndex::decode(input)?;
		let args = input.to_vec();
		*input = &[];
		Ok(Self { index, args })
	}
}

impl Encode for Call {
	fn size_hint(&self) -> usize {
		2 + self.args.len()
	}

	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		self.index.encode_to(dest);
		dest.write(&self.args);
	}
}
