// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod salary;
pub mod fixed_incomes;
pub mod variable_incomes;
pub mod investments;
pub mod fixed_expenses;
pub mod variable_expenses;
pub mod summary;
pub mod importer;
pub mod exporter;
pub mod doctor;
