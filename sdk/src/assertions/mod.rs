// Copyright 2025 The c2pa-lineage Authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Assertion types this crate interprets.
//!
//! Assertions with other labels are kept with their raw bytes; see
//! [`AssertionData`](crate::AssertionData).

mod actions;
pub use actions::{c2pa_action, Action, Actions, IngredientReference};

mod creative_work;
pub use creative_work::CreativeWork;

mod ingredient;
pub use ingredient::{IngredientAssertion, Relationship};

pub mod labels;
