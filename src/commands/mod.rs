// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod groups;
pub mod users;
pub mod transactions;
pub mod balances;
pub mod settle;
pub mod sync;
pub mod exporter;
pub mod doctor;
