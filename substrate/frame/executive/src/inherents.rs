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

//! Checks over the inherents of a block.

use sable_inherents::{CheckInherentsResult, InherentData, IsFatalError};
use sable_runtime::generic::Block;
use sable_support::ModuleRegistry;

/// Check the inherents of `block` against `data`.
///
/// The inherents of a block form its prefix: the scan stops at the first signed extrinsic or at
/// the first unsigned one no module recognises as its inherent. Each inherent is checked by the
/// module providing it. A fatal error ends the check at once; other errors are collected.
///
/// Then every module whose inherent is required for `data` but absent from the block reports
/// the error it gave for that case.
pub fn check_inherents(
	registry: &ModuleRegistry,
	block: &Block,
	data: &InherentData,
) -> CheckInherentsResult {
	let mut result = CheckInherentsResult::new();

	for xt in &block.extrinsics {
		// Inherents are before any other extrinsics.
		// And signed extrinsics are not inherents.
		if xt.is_signed() {
			break
		}

		let Some(provider) = registry.inherent_provider_for(&xt.function) else {
			// Inherents are before any other extrinsics.
			// No module marked it as inherent thus it is not.
			break
		};

		if let Err(e) = provider.check_inherent(&xt.function, data) {
			match result.put_error(provider.identifier(), &e) {
				// Several inherents of one provider: the first error is the one reported.
				Err(sable_inherents::Error::InherentDataExists(_)) => {},
				res => res.expect("We return on the first fatal error; qed"),
			}
			if e.is_fatal_error() {
				return result
			}
		}
	}

	for provider in registry.inherent_providers() {
		let Some(error) = provider.is_inherent_required(data) else { continue };

		let found = block.extrinsics.iter().any(|xt| {
			!xt.is_signed() &&
				registry
					.inherent_provider_for(&xt.function)
					.is_some_and(|p| p.identifier() == provider.identifier())
		});

		if !found {
			result.put_error(provider.identifier(), &error).expect(
				"No inherent of this provider was checked and we return on the first fatal \
				 error; qed",
			);
			if error.is_fatal_error() {
				return result
			}
		}
	}

	result
}

/// Check that all inherents of `block` come before every other extrinsic.
///
/// Returns the number of inherents, or the index of the first inherent that follows an
/// extrinsic that is not one.
pub fn ensure_inherents_are_first(registry: &ModuleRegistry, block: &Block) -> Result<u32, u32> {
	let mut num_inherents = 0u32;
	let mut first_non_inherent_observed = false;

	for (i, xt) in block.extrinsics.iter().enumerate() {
		let is_inherent = !xt.is_signed() && registry.is_inherent(&xt.function);

		if !is_inherent {
			first_non_inherent_observed = true;
		} else if first_non_inherent_observed {
			return Err(i as u32)
		} else {
			num_inherents += 1;
		}
	}

	Ok(num_inherents)
}
