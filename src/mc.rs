// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Memory controller client groups and the hot-reset flush handshake.
//!
//! Before a hardware block is isolated for power-down or reset, the memory
//! controller must drain the block's in-flight transactions. Each traffic
//! source (client) belongs to exactly one client group (swgroup) sharing a
//! flush bit; [`Mc::flush`] asserts that bit and waits for the drain to
//! complete, [`Mc::flush_done`] releases it after the block is back up.

mod tegra114;

pub use tegra114::TEGRA114_MC;

use crate::{
    Error, Result,
    mmio::{Delay, RegisterBus},
};
use log::debug;
use spin::mutex::SpinMutex;

/// Delay between flush status poll cycles.
const FLUSH_POLL_US: u32 = 10;

/// Number of identical re-reads required before a status value is trusted.
const STABLE_READS: u32 = 5;

/// Per-swgroup hot-reset register assignment.
#[derive(Clone, Copy, Debug)]
pub struct HotReset {
    /// Client group the entry belongs to.
    pub swgroup: u32,
    /// Flush control register offset.
    pub ctrl: u32,
    /// Flush status register offset.
    pub status: u32,
    /// Bit index of the group in both registers.
    pub bit: u32,
}

/// Latency allowance register slice of one client.
#[derive(Clone, Copy, Debug)]
pub struct LatencyAllowance {
    /// Register offset.
    pub reg: u32,
    /// Field position within the register.
    pub shift: u32,
    /// Field mask before shifting.
    pub mask: u32,
    /// Reset default programmed by the boot ROM.
    pub default: u32,
}

/// SMMU translation-enable bit of one client.
#[derive(Clone, Copy, Debug)]
pub struct SmmuEnable {
    /// ASID security register offset.
    pub reg: u32,
    /// Bit index of the client.
    pub bit: u32,
}

/// One memory controller traffic source.
#[derive(Clone, Copy, Debug)]
pub struct McClient {
    /// Hardware client id.
    pub id: u32,
    /// Display name.
    pub name: &'static str,
    /// Client group the client belongs to.
    pub swgroup: u32,
    /// Request FIFO depth in bytes, zero when the variant does not publish
    /// it.
    pub fifo_size: u32,
    /// SMMU enable bit, absent for clients that bypass translation.
    pub smmu: Option<SmmuEnable>,
    /// Latency allowance field, absent for clients without QoS control.
    pub la: Option<LatencyAllowance>,
}

/// SMMU per-group ASID register assignment.
#[derive(Clone, Copy, Debug)]
pub struct SmmuSwgroup {
    /// Client group.
    pub swgroup: u32,
    /// ASID register offset.
    pub reg: u32,
}

/// Client group identifiers.
///
/// The values are stable configuration keys used by domain descriptors to
/// name the groups they flush; the hardware register assignment comes from
/// the variant's [`HotReset`] table.
pub mod swgroup {
    /// AVP (boot/audio processor).
    pub const AVPC: u32 = 0;
    /// Display controller A.
    pub const DC: u32 = 1;
    /// Display controller B.
    pub const DCB: u32 = 2;
    /// Encoder pre-processor.
    pub const EPP: u32 = 3;
    /// 2D engine.
    pub const G2: u32 = 4;
    /// Host1x DMA.
    pub const HC: u32 = 5;
    /// HD audio.
    pub const HDA: u32 = 6;
    /// Image signal processor.
    pub const ISP: u32 = 7;
    /// Main CPU cluster.
    pub const MPCORE: u32 = 8;
    /// Low-power CPU cluster.
    pub const MPCORELP: u32 = 9;
    /// Video encoder.
    pub const MSENC: u32 = 10;
    /// 3D engine.
    pub const NV: u32 = 11;
    /// AHB/APB bridge DMA.
    pub const PPCS: u32 = 12;
    /// Video decoder.
    pub const VDE: u32 = 13;
    /// Video input.
    pub const VI: u32 = 14;
    /// Page table cache.
    pub const PTC: u32 = 15;
    /// XUSB host controller.
    pub const XUSB_HOST: u32 = 16;
    /// XUSB device controller.
    pub const XUSB_DEV: u32 = 17;
    /// Security co-processor.
    pub const TSEC: u32 = 18;
}

/// Static description of one chip variant's memory controller.
#[derive(Debug)]
pub struct McSoc {
    /// Variant name, for logs.
    pub name: &'static str,
    /// Client descriptors.
    pub clients: &'static [McClient],
    /// Hot-reset register table; groups without an entry cannot be flushed.
    pub hotresets: &'static [HotReset],
    /// SMMU ASID register table.
    pub swgroups: &'static [SmmuSwgroup],
    /// Physical address width of the controller.
    pub num_address_bits: u32,
    /// Smallest bus transaction unit in bytes.
    pub atom_size: u32,
}

impl McSoc {
    /// Returns the hot-reset descriptor of `swgroup`, if the group has one.
    pub fn hotreset(&self, swgroup: u32) -> Option<&HotReset> {
        self.hotresets.iter().find(|hr| hr.swgroup == swgroup)
    }

    /// Looks up a client descriptor by hardware id.
    pub fn client(&self, id: u32) -> Option<&McClient> {
        self.clients.iter().find(|client| client.id == id)
    }

    /// Looks up a client descriptor by name.
    pub fn client_by_name(&self, name: &str) -> Option<&McClient> {
        self.clients.iter().find(|client| client.name == name)
    }

    /// Iterates over the clients of one group.
    pub fn clients_in_group(&self, swgroup: u32) -> impl Iterator<Item = &McClient> {
        self.clients
            .iter()
            .filter(move |client| client.swgroup == swgroup)
    }
}

/// The memory controller register window.
pub struct Mc<B, D> {
    bus: B,
    delay: D,
    soc: &'static McSoc,
    /// Serialises all flush control/status traffic across client groups.
    lock: SpinMutex<()>,
    max_flush_attempts: u32,
}

impl<B: RegisterBus, D: Delay> Mc<B, D> {
    /// Default bound on flush poll cycles, roughly 250 ms of polling. The
    /// handshake converges within a few cycles on working hardware.
    pub const DEFAULT_FLUSH_ATTEMPTS: u32 = 25_000;

    /// Creates the controller for one chip variant.
    pub fn new(bus: B, delay: D, soc: &'static McSoc) -> Self {
        Self {
            bus,
            delay,
            soc,
            lock: SpinMutex::new(()),
            max_flush_attempts: Self::DEFAULT_FLUSH_ATTEMPTS,
        }
    }

    /// Overrides the bound on flush poll cycles.
    pub fn with_flush_attempts(mut self, attempts: u32) -> Self {
        self.max_flush_attempts = attempts;
        self
    }

    /// Returns the active chip-variant descriptor.
    pub fn soc(&self) -> &'static McSoc {
        self.soc
    }

    /// Direct access to the underlying register window, for tests driving a
    /// fake bus.
    #[cfg(any(test, feature = "fakes"))]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Requests a flush of `swgroup` and waits until the controller reports
    /// the group's queues drained.
    ///
    /// Groups without a hot-reset assignment are rejected with
    /// [`Error::InvalidArgument`]. The wait has no hardware-defined timeout;
    /// the bounded retry count only guards against a wedged controller and
    /// reports [`Error::NoConvergence`] when exhausted.
    pub fn flush(&self, swgroup: u32) -> Result<()> {
        let hotreset = self.soc.hotreset(swgroup).ok_or(Error::InvalidArgument)?;
        let mask = 1 << hotreset.bit;

        let _lock = self.lock.lock();

        let value = self.bus.read(hotreset.ctrl);
        self.bus.write(hotreset.ctrl, value | mask);
        // Read the control register back so the write has landed before the
        // status polling starts.
        self.bus.read(hotreset.ctrl);

        for _ in 0..self.max_flush_attempts {
            self.delay.delay_us(FLUSH_POLL_US);

            if let Some(status) = self.stable_status(hotreset.status)
                && status & mask != 0
            {
                debug!("flushed swgroup {swgroup} (bit {})", hotreset.bit);
                return Ok(());
            }
        }

        Err(Error::NoConvergence)
    }

    /// Releases the flush of `swgroup` after its block is operational again.
    /// Clearing needs no confirmation, so there is no status poll.
    pub fn flush_done(&self, swgroup: u32) -> Result<()> {
        let hotreset = self.soc.hotreset(swgroup).ok_or(Error::InvalidArgument)?;
        let mask = 1 << hotreset.bit;

        let _lock = self.lock.lock();

        let value = self.bus.read(hotreset.ctrl);
        self.bus.write(hotreset.ctrl, value & !mask);
        self.bus.read(hotreset.ctrl);

        debug!("flush done for swgroup {swgroup} (bit {})", hotreset.bit);
        Ok(())
    }

    /// Reads the status register until it holds still.
    ///
    /// A status read within a few cycles of a control write can return a
    /// transient value, so a value is only trusted after five identical
    /// re-reads. Returns `None` when the register is still moving.
    fn stable_status(&self, reg: u32) -> Option<u32> {
        let first = self.bus.read(reg);
        for _ in 0..STABLE_READS {
            if self.bus.read(reg) != first {
                return None;
            }
        }
        Some(first)
    }
}
