// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod expenses;
pub mod income;
pub mod reports;
pub mod notifications;
pub mod receipts;
pub mod settings;
