// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[derive(Debug)]
pub(crate) enum ClockState {
    #[cfg(any(feature = "test-util", test))]
    Control(crate::ClockControl),
    System,
}
