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

//! Generic implementation of an unchecked (pre-verification) extrinsic.

use crate::{
	generic::{Call, CheckedExtrinsic, Era, ExtrinsicFormat},
	transaction_validity::{InvalidTransaction, TransactionValidityError, UnknownTransaction},
	AccountId32, Balance, DecodeError, MultiAddress, MultiSignature, Nonce,
};
use codec::{Compact, Decode, Encode, EncodeLike, Error, Input, Output};
use sp_crypto_hashing::blake2_256;

/// Current version of the extrinsic format, the low 7 bits of the version byte.
pub const EXTRINSIC_FORMAT_VERSION: u8 = 4;

/// Bit of the version byte that is set for signed extrinsics.
const SIGNED_FLAG: u8 = 0b1000_0000;

/// Bits of the version byte that carry the format version.
const VERSION_MASK: u8 = 0b0111_1111;

/// Signed payloads longer than this are hashed before being signed.
const MAX_UNHASHED_PAYLOAD: usize = 256;

/// Upper bound of a single allocation while reading a body of unknown available length.
const MAX_PREALLOCATION: usize = 16 * 1024;

/// The data a signer commits to besides the call.
#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug)]
pub struct SignedExtra {
	/// Blocks in which the transaction may be included.
	pub era: Era,
	/// Nonce of the signer.
	#[codec(compact)]
	pub nonce: Nonce,
	/// Tip paid on top of the fees.
	#[codec(compact)]
	pub tip: Balance,
}

impl SignedExtra {
	/// Create new signed extra data.
	pub fn new(era: Era, nonce: Nonce, tip: Balance) -> Self {
		Self { era, nonce, tip }
	}
}

/// The bytes a signer signs: the call followed by the signed extra data.
///
/// Payloads longer than 256 bytes are replaced by their Blake2-256 hash.
pub struct SignedPayload<'a> {
	call: &'a Call,
	extra: &'a SignedExtra,
}

impl<'a> SignedPayload<'a> {
	/// Create a payload for `call` and `extra`.
	pub fn new(call: &'a Call, extra: &'a SignedExtra) -> Self {
		Self { call, extra }
	}
}

impl Encode for SignedPayload<'_> {
	fn using_encoded<R, F: FnOnce(&[u8]) -> R>(&self, f: F) -> R {
		(self.call, self.extra).using_encoded(|payload| {
			if payload.len() > MAX_UNHASHED_PAYLOAD {
				f(&blake2_256(payload)[..])
			} else {
				f(payload)
			}
		})
	}
}

/// An extrinsic right from the external world. This is unchecked and so can contain a signature.
///
/// On the wire it is:
///
/// ```text
/// compact(len) ++ version ++ [signer ++ signature ++ extra] ++ call
/// ```
///
/// where `len` counts every byte that follows it and the bracketed envelope is only present when
/// the high bit of `version` is set.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct UncheckedExtrinsic {
	/// The signature, address and extra data, if this is a signed extrinsic.
	pub signature: Option<(MultiAddress, MultiSignature, SignedExtra)>,
	/// The function that should be called.
	pub function: Call,
}

impl UncheckedExtrinsic {
	/// New instance of a signed extrinsic.
	pub fn new_signed(
		function: Call,
		signed: MultiAddress,
		signature: MultiSignature,
		extra: SignedExtra,
	) -> Self {
		Self { signature: Some((signed, signature, extra)), function }
	}

	/// New instance of an unsigned extrinsic, also known as an inherent.
	pub fn new_bare(function: Call) -> Self {
		Self { signature: None, function }
	}

	/// Whether the extrinsic carries a signature.
	pub fn is_signed(&self) -> bool {
		self.signature.is_some()
	}

	/// The version byte of the encoding: the format version with the signed flag.
	pub fn version(&self) -> u8 {
		if self.is_signed() {
			EXTRINSIC_FORMAT_VERSION | SIGNED_FLAG
		} else {
			EXTRINSIC_FORMAT_VERSION
		}
	}

	/// Decode one length-prefixed extrinsic from `input`.
	///
	/// Fails with [`DecodeError::InvalidLengthPrefix`] if the declared length runs past the end
	/// of `input`.
	pub fn decode_with_length<I: Input>(input: &mut I) -> Result<Self, DecodeError> {
		let expected_length = Compact::<u32>::decode(input)?.0 as usize;

		let body = match input.remaining_len()? {
			Some(remaining) if remaining < expected_length =>
				return Err(DecodeError::InvalidLengthPrefix),
			Some(_) => {
				let mut body = vec![0u8; expected_length];
				input.read(&mut body)?;
				body
			},
			None => read_in_chunks(input, expected_length)?,
		};

		Self::decode_body(&body)
	}

	/// Decode an extrinsic that spans the whole of `bytes`.
	///
	/// Bytes left over after the declared length are a length mismatch as well.
	pub fn decode_from(bytes: &[u8]) -> Result<Self, DecodeError> {
		let input = &mut &bytes[..];
		let xt = Self::decode_with_length(input)?;
		if !input.is_empty() {
			return Err(DecodeError::InvalidLengthPrefix)
		}
		Ok(xt)
	}

	fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
		let input = &mut &body[..];

		let version = input.read_byte()?;
		let is_signed = version & SIGNED_FLAG != 0;
		if version & VERSION_MASK != EXTRINSIC_FORMAT_VERSION {
			return Err(DecodeError::UnsupportedVersion(version & VERSION_MASK))
		}

		let signature = if is_signed { Some(Decode::decode(input)?) } else { None };
		let function = Call::decode_remainder(input)?;

		Ok(Self { signature, function })
	}

	/// Resolve the signer and verify the signature.
	///
	/// Unsigned extrinsics pass through as [`ExtrinsicFormat::Bare`].
	pub fn check(
		self,
	) -> Result<CheckedExtrinsic<AccountId32, Call, SignedExtra>, TransactionValidityError> {
		Ok(match self.signature {
			Some((signed, signature, extra)) => {
				let signed = signed.account_id().ok_or(UnknownTransaction::CannotLookup)?;
				let valid = SignedPayload::new(&self.function, &extra)
					.using_encoded(|payload| signature.verify(payload, &signed));
				if !valid {
					return Err(InvalidTransaction::BadProof.into())
				}
				CheckedExtrinsic {
					format: ExtrinsicFormat::Signed(signed, extra),
					function: self.function,
				}
			},
			None => CheckedExtrinsic { format: ExtrinsicFormat::Bare, function: self.function },
		})
	}
}

impl Encode for UncheckedExtrinsic {
	fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
		let mut body = Vec::with_capacity(self.function.size_hint() + 1);
		body.push(self.version());
		if let Some(signature) = &self.signature {
			signature.encode_to(&mut body);
		}
		self.function.encode_to(&mut body);

		Compact(body.len() as u32).encode_to(dest);
		dest.write(&body);
	}
}

impl EncodeLike for UncheckedExtrinsic {}

impl Decode for UncheckedExtrinsic {
	fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
		Self::decode_with_length(input).map_err(Into::into)
	}
}

/// Read `len` bytes from an input that does not know how many it holds.
///
/// The buffer only grows as bytes arrive, so a bogus length prefix fails on the missing bytes
/// instead of allocating up front.
fn read_in_chunks<I: Input>(input: &mut I, len: usize) -> Result<Vec<u8>, DecodeError> {
	let mut body = Vec::with_capacity(len.min(MAX_PREALLOCATION));
	while body.len() < len {
		let start = body.len();
		let chunk = (len - start).min(MAX_PREALLOCATION);
		body.resize(start + chunk, 0);
		input.read(&mut body[start..]).map_err(|_| DecodeError::InvalidLengthPrefix)?;
	}
	Ok(body)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::generic::CallIndex;
	use assert_matches::assert_matches;
	use hex_literal::hex;
	use sp_core::{ed25519, Pair};

	const SIGNED_REMARK: [u8; 107] = hex!(
		"a501840000000000000000000000000000000000000000000000000000000000000000010000623761336331326463306338633734386162303735323562373031313232623838626437386636303063373633343264323766323565356639323434346364000000000000"
	);

	fn remark() -> Call {
		Call::new(0, 0, &Vec::<u8>::new())
	}

	fn reference_signed_remark() -> UncheckedExtrinsic {
		let mut who = [0u8; 32];
		who[31] = 1;
		let mut signature = [0u8; 64];
		signature[1..]
			.copy_from_slice(b"b7a3c12dc0c8c748ab07525b701122b88bd78f600c76342d27f25e5f92444cd");

		UncheckedExtrinsic::new_signed(
			remark(),
			MultiAddress::Id(AccountId32::new(who)),
			MultiSignature::Ed25519(ed25519::Signature::from_raw(signature)),
			SignedExtra::new(Era::Immortal, 0, 0),
		)
	}

	fn signed_by(pair: &ed25519::Pair, call: Call, extra: SignedExtra) -> UncheckedExtrinsic {
		let signature = SignedPayload::new(&call, &extra).using_encoded(|p| pair.sign(p));
		UncheckedExtrinsic::new_signed(
			call,
			MultiAddress::Id(AccountId32::from(pair.public().0)),
			signature.into(),
			extra,
		)
	}

	#[test]
	fn unsigned_remark_encodes_to_reference_bytes() {
		let xt = UncheckedExtrinsic::new_bare(remark());
		assert!(!xt.is_signed());
		assert_eq!(xt.version(), 0x04);
		assert_eq!(xt.encode(), vec![0x10, 0x04, 0x00, 0x00, 0x00]);
		assert_eq!(UncheckedExtrinsic::decode_from(&[0x10, 0x04, 0x00, 0x00, 0x00]), Ok(xt));
	}

	#[test]
	fn signed_remark_encodes_to_reference_bytes() {
		let xt = reference_signed_remark();
		assert!(xt.is_signed());
		assert_eq!(xt.version(), 132);
		assert_eq!(xt.encode(), SIGNED_REMARK.to_vec());
		assert_eq!(UncheckedExtrinsic::decode_from(&SIGNED_REMARK), Ok(xt));
	}

	#[test]
	fn length_prefix_past_the_end_is_rejected() {
		let mut encoded = SIGNED_REMARK;
		// Declares 106 bytes, 105 follow.
		encoded[0] = 0xa9;

		let err = UncheckedExtrinsic::decode_from(&encoded).unwrap_err();
		assert_eq!(err, DecodeError::InvalidLengthPrefix);
		assert_eq!(err.to_string(), "invalid length prefix");

		let err = UncheckedExtrinsic::decode(&mut &encoded[..]).unwrap_err();
		assert_eq!(err.to_string(), "invalid length prefix");
	}

	/// An input that cannot tell how many bytes it holds.
	struct Streamed<'a>(&'a [u8]);

	impl Input for Streamed<'_> {
		fn remaining_len(&mut self) -> Result<Option<usize>, Error> {
			Ok(None)
		}

		fn read(&mut self, into: &mut [u8]) -> Result<(), Error> {
			Input::read(&mut self.0, into)
		}
	}

	#[test]
	fn length_prefix_is_checked_without_known_input_length() {
		let encoded = reference_signed_remark().encode();
		assert_eq!(
			UncheckedExtrinsic::decode_with_length(&mut Streamed(&encoded)),
			Ok(reference_signed_remark())
		);

		// Declares five bytes, carries four.
		assert_eq!(
			UncheckedExtrinsic::decode_with_length(&mut Streamed(&hex!("1404000000"))),
			Err(DecodeError::InvalidLengthPrefix)
		);

		// A huge declared length fails on the missing bytes.
		let mut huge = Compact(u32::MAX).encode();
		huge.extend_from_slice(&hex!("04000000"));
		assert_eq!(
			UncheckedExtrinsic::decode_with_length(&mut Streamed(&huge)),
			Err(DecodeError::InvalidLengthPrefix)
		);

		let body = (0..3 * MAX_PREALLOCATION).map(|i| i as u8).collect::<Vec<_>>();
		let encoded = UncheckedExtrinsic::new_bare(Call::new(0, 0, &body)).encode();
		assert_eq!(
			UncheckedExtrinsic::decode_with_length(&mut Streamed(&encoded)),
			Ok(UncheckedExtrinsic::new_bare(Call::new(0, 0, &body)))
		);
	}

	#[test]
	fn trailing_bytes_are_rejected() {
		let mut encoded = UncheckedExtrinsic::new_bare(remark()).encode();
		encoded.push(0);
		assert_eq!(
			UncheckedExtrinsic::decode_from(&encoded),
			Err(DecodeError::InvalidLengthPrefix)
		);
	}

	#[test]
	fn signed_flag_follows_the_version_byte() {
		for xt in [UncheckedExtrinsic::new_bare(remark()), reference_signed_remark()] {
			let encoded = xt.encode();
			let mut body = &encoded[..];
			Compact::<u32>::decode(&mut body).unwrap();

			let decoded = UncheckedExtrinsic::decode_from(&encoded).unwrap();
			assert_eq!(decoded.is_signed(), body[0] & 0x80 != 0);
			assert_eq!(decoded, xt);
		}
	}

	#[test]
	fn unsupported_version_is_rejected() {
		assert_eq!(
			UncheckedExtrinsic::decode_from(&[0x0c, 0x05, 0x00, 0x00]),
			Err(DecodeError::UnsupportedVersion(5))
		);
		assert_eq!(
			UncheckedExtrinsic::decode_from(&[0x0c, 0x85, 0x00, 0x00]),
			Err(DecodeError::UnsupportedVersion(5))
		);
	}

	#[test]
	fn truncated_signed_envelope_is_rejected() {
		// Signed flag set but only an address tag follows.
		assert_matches!(
			UncheckedExtrinsic::decode_from(&[0x08, 0x84, 0x00]),
			Err(DecodeError::Codec(_))
		);
	}

	#[test]
	fn distinct_extrinsics_encode_differently() {
		let pair = ed25519::Pair::from_seed(&[1u8; 32]);
		let corpus = vec![
			UncheckedExtrinsic::new_bare(remark()),
			UncheckedExtrinsic::new_bare(Call::new(0, 0, &vec![1u8])),
			UncheckedExtrinsic::new_bare(Call::new(3, 0, &42u64)),
			reference_signed_remark(),
			signed_by(&pair, remark(), SignedExtra::new(Era::Immortal, 0, 0)),
			signed_by(&pair, remark(), SignedExtra::new(Era::Immortal, 1, 0)),
			signed_by(&pair, remark(), SignedExtra::new(Era::mortal(64, 10), 1, 5)),
		];

		let encoded: Vec<Vec<u8>> = corpus.iter().map(Encode::encode).collect();
		for (i, a) in encoded.iter().enumerate() {
			assert_eq!(UncheckedExtrinsic::decode_from(a).as_ref(), Ok(&corpus[i]));
			for b in encoded.iter().skip(i + 1) {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn extrinsics_decode_back_to_back() {
		let first = UncheckedExtrinsic::new_bare(Call::new(3, 0, &7u64));
		let second = reference_signed_remark();
		let encoded = vec![first.clone(), second.clone()].encode();

		let decoded = Vec::<UncheckedExtrinsic>::decode(&mut &encoded[..]).unwrap();
		assert_eq!(decoded, vec![first, second]);
	}

	#[test]
	fn check_verifies_the_signature() {
		let pair = ed25519::Pair::from_seed(&[1u8; 32]);
		let xt = signed_by(&pair, remark(), SignedExtra::new(Era::Immortal, 3, 0));

		let checked = xt.clone().check().unwrap();
		assert_eq!(checked.signer(), Some(&AccountId32::from(pair.public().0)));
		assert_eq!(checked.function.index, CallIndex::new(0, 0));

		let mut tampered = xt;
		tampered.function = Call::new(0, 0, &vec![1u8]);
		assert_eq!(tampered.check(), Err(InvalidTransaction::BadProof.into()));

		assert_eq!(reference_signed_remark().check(), Err(InvalidTransaction::BadProof.into()));
	}

	#[test]
	fn check_hashes_long_payloads() {
		let pair = ed25519::Pair::from_seed(&[2u8; 32]);
		let call = Call::new(0, 0, &vec![7u8; 300]);
		let extra = SignedExtra::new(Era::Immortal, 0, 0);

		let raw = (&call, &extra).encode();
		assert!(raw.len() > 256);
		let signature = pair.sign(&blake2_256(&raw)[..]);

		let xt = UncheckedExtrinsic::new_signed(
			call,
			MultiAddress::Id(AccountId32::from(pair.public().0)),
			signature.into(),
			extra,
		);
		assert!(xt.check().is_ok());
	}

	#[test]
	fn check_needs_a_resolvable_signer() {
		let mut xt = reference_signed_remark();
		if let Some((address, _, _)) = xt.signature.as_mut() {
			*address = MultiAddress::Index(1);
		}
		assert_eq!(xt.check(), Err(UnknownTransaction::CannotLookup.into()));
	}

	#[test]
	fn bare_extrinsics_check_without_signer() {
		let checked = UncheckedExtrinsic::new_bare(remark()).check().unwrap();
		assert_eq!(checked.format, ExtrinsicFormat::Bare);
		assert_eq!(checked.signer(), None);
	}
}
