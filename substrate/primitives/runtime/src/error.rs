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

/// Failure to decode an extrinsic or a block from its wire representation.
///
/// Every variant is fatal for the enclosing block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
	/// The compact length prefix of an extrinsic does not match the bytes that follow it.
	#[error("invalid length prefix")]
	InvalidLengthPrefix,
	/// The low 7 bits of the version byte are not a supported extrinsic format version.
	#[error("unsupported extrinsic format version {0}")]
	UnsupportedVersion(u8),
	/// The SCALE decoding of a field failed.
	#[error("malformed input: {0}")]
	Codec(String),
}

impl From<codec::Error> for DecodeError {
	fn from(err: codec::Error) -> Self {
		DecodeError::Codec(err.to_string())
	}
}

impl From<DecodeError> for codec::Error {
	fn from(err: DecodeError) -> Self {
		match err {
			DecodeError::InvalidLengthPrefix => "invalid length prefix".into(),
			DecodeError::UnsupportedVersion(_) => "unsupported extrinsic format version".into(),
			DecodeError::Codec(_) => "malformed extrinsic".into(),
		}
	}
}
