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

//! Macros for the Sable support library.

/// Create new implementations of the [`Get`](crate::traits::Get) trait.
///
/// The so-called parameter type can be created in two different ways:
///
/// - Using `const` to create a parameter type that provides a `const` getter. It is required that
///   the `value` is const.
///
/// - Declare the parameter type without `const` to have more freedom when creating the value.
///
/// # Examples
///
/// ```
/// # use sable_support::traits::Get;
/// # use sable_support::parameter_types;
/// // This function cannot be used in a const context.
/// fn non_const_expression() -> u64 { 99 }
///
/// const FIXED_VALUE: u64 = 10;
/// parameter_types! {
///    pub const Argument: u64 = 42 + FIXED_VALUE;
///    /// Visibility of the type is optional
///    OtherArgument: u64 = non_const_expression();
/// }
///
/// trait Config {
///    type Parameter: Get<u64>;
///    type OtherParameter: Get<u64>;
/// }
///
/// struct Runtime;
/// impl Config for Runtime {
///    type Parameter = Argument;
///    type OtherParameter = OtherArgument;
/// }
///
/// assert_eq!(<Runtime as Config>::Parameter::get(), 52);
/// ```
#[macro_export]
macro_rules! parameter_types {
	(
		$( #[ $attr:meta ] )*
		$vis:vis const $name:ident: $type:ty = $value:expr;
		$( $rest:tt )*
	) => (
		$( #[ $attr ] )*
		$vis struct $name;
		$crate::parameter_types!(IMPL_CONST $name, $type, $value);
		$crate::parameter_types!( $( $rest )* );
	);
	(
		$( #[ $attr:meta ] )*
		$vis:vis $name:ident: $type:ty = $value:expr;
		$( $rest:tt )*
	) => (
		$( #[ $attr ] )*
		$vis struct $name;
		$crate::parameter_types!(IMPL $name, $type, $value);
		$crate::parameter_types!( $( $rest )* );
	);
	() => ();
	(IMPL_CONST $name:ident, $type:ty, $value:expr) => {
		impl $name {
			/// Returns the value of this parameter type.
			pub const fn get() -> $type {
				$value
			}
		}

		impl<_I: From<$type>> $crate::traits::Get<_I> for $name {
			fn get() -> _I {
				_I::from(Self::get())
			}
		}
	};
	(IMPL $name:ident, $type:ty, $value:expr) => {
		impl $name {
			/// Returns the value of this parameter type.
			pub fn get() -> $type {
				$value
			}
		}

		impl<_I: From<$type>> $crate::traits::Get<_I> for $name {
			fn get() -> _I {
				_I::from(Self::get())
			}
		}
	};
}

/// Declare storage instances: types naming the module and the item a storage lives under.
///
/// ```
/// # use sable_support::{storage_instance, storage::types::StorageValue};
/// storage_instance! {
/// 	/// The current block number.
/// 	pub struct NumberPrefix => ("System", "Number");
/// }
///
/// type Number = StorageValue<NumberPrefix, u32>;
/// assert_eq!(
/// 	Number::hashed_key()[..16],
/// 	sable_support::__private::sable_storage::module_key("System"),
/// );
/// ```
#[macro_export]
macro_rules! storage_instance {
	(
		$(
			$( #[ $attr:meta ] )*
			$vis:vis struct $name:ident => ($module:expr, $item:expr);
		)*
	) => {
		$(
			$( #[ $attr ] )*
			$vis struct $name;

			impl $crate::traits::StorageInstance for $name {
				fn module_prefix() -> &'static str {
					$module
				}

				const STORAGE_PREFIX: &'static str = $item;
			}
		)*
	};
}
