// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power management controller (PMC) and memory controller (MC) driver for
//! Tegra-family SoCs.
//!
//! The crate covers the partition power-gate state machine, the coordinated
//! hot-reset flush of memory-controller client groups, I/O pad deep power
//! down, suspend timing and emergency thermal reset configuration.
//!
//! All hardware access goes through the [`mmio::RegisterBus`] and
//! [`mmio::Delay`] seams, so the driver runs unchanged against real register
//! windows or against the fakes in [`fake`] (enabled with the `fakes`
//! feature or in unit tests). There is no global state: the owning context
//! is an explicit [`PowerController`] built from injected [`Pmc`] and [`Mc`]
//! halves plus the per-board domain configuration.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod controller;
pub mod domain;
#[cfg(any(test, feature = "fakes"))]
pub mod fake;
pub mod mc;
pub mod mmio;
pub mod pmc;
pub mod resources;
pub mod soc;

pub use controller::PowerController;
pub use domain::{DomainConfig, PowerDomain};
pub use mc::Mc;
pub use pmc::{Pmc, SuspendConfig, SuspendMode};

use core::fmt::{self, Display, Formatter};

/// Errors reported by power-gate, hot-reset and rail operations.
///
/// Hardware sequences stop at the first failing step and report it; partially
/// completed sequences are not rolled back because the hardware offers no
/// atomic multi-step transactions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A partition id, rail id or client-group reference was out of range or
    /// unknown to the active chip variant.
    InvalidArgument,
    /// A bounded polling loop elapsed before the hardware reached the
    /// requested state.
    Timeout,
    /// The operation is not available on this domain or chip variant, e.g.
    /// powering off an always-on partition.
    Unsupported,
    /// A clock, reset or regulator needed by the sequence is missing or its
    /// owning subsystem rejected the request.
    ResourceUnavailable,
    /// No power domain is registered under the given id or name.
    NotFound,
    /// The memory controller flush status never stabilised. Distinct from
    /// [`Error::Timeout`]: the flush handshake is expected to always
    /// converge, so hitting the retry bound points at a hardware fault.
    NoConvergence,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::Timeout => f.write_str("timed out waiting for hardware"),
            Self::Unsupported => f.write_str("operation not supported"),
            Self::ResourceUnavailable => f.write_str("resource unavailable"),
            Self::NotFound => f.write_str("no such power domain"),
            Self::NoConvergence => f.write_str("flush status did not converge"),
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
