// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod observer;

pub(crate) use env::{CountingShaper, TestEnv, WeekdayDetector};
pub(crate) use observer::{Event, RecordingObserver};
