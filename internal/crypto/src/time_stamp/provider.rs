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

use crate::time_stamp::TimeStampError;

/// A `TimeStampProvider` implementation can contact a time stamp service,
/// or act as one, and return a time stamp token for a message.
///
/// The token is stored in the `sigTst` header of a COSE signature and is
/// later checked by [`verify_time_stamp`].
///
/// [`verify_time_stamp`]: crate::time_stamp::verify_time_stamp
pub trait TimeStampProvider: Send + Sync {
    /// Request a time stamp token over `message`.
    ///
    /// Returns `None` if this provider is not configured to produce time
    /// stamps.
    fn send_time_stamp_request(&self, message: &[u8]) -> Option<Result<Vec<u8>, TimeStampError>> {
        let _ = message;
        None
    }
}
