// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! I/O rail deep power down (DPD).
//!
//! Unused pad groups can be powered down at the rail level to cut static
//! leakage. Rails are addressed 0..=63 across two register banks; each
//! request programs a sampling window derived from the APB clock rate so the
//! pads see the minimum electrical settle time.

use super::Pmc;
use crate::{
    Error, Result,
    mmio::{Delay, RegisterBus},
};

pub(crate) const DPD_SAMPLE: u32 = 0x020;
pub(crate) const DPD_SAMPLE_ENABLE: u32 = 1 << 0;
pub(crate) const DPD_SAMPLE_DISABLE: u32 = 0;

pub(crate) const IO_DPD_REQ: u32 = 0x1b8;
/// Request codes select the deep-power-down state of the addressed rails;
/// they are distinct from the boolean rail power state. `CODE_OFF` releases
/// DPD (rail powered), `CODE_ON` engages it (rail down).
pub(crate) const IO_DPD_REQ_CODE_OFF: u32 = 1 << 30;
pub(crate) const IO_DPD_REQ_CODE_ON: u32 = 2 << 30;
pub(crate) const IO_DPD_REQ_CODE_MASK: u32 = 3 << 30;

pub(crate) const IO_DPD_STATUS: u32 = 0x1bc;
pub(crate) const IO_DPD2_REQ: u32 = 0x1c0;
pub(crate) const IO_DPD2_STATUS: u32 = 0x1c4;
pub(crate) const SEL_DPD_TIM: u32 = 0x1c8;

/// Minimum electrical settle time for a DPD sample, nanoseconds.
const DPD_SETTLE_NS: u64 = 200;

/// Status poll interval and bound.
const RAIL_POLL_US: u32 = 250;
const RAIL_TIMEOUT_US: u32 = 250_000;

/// Register addresses for one rail's bank.
struct RailRegs {
    request: u32,
    status: u32,
    mask: u32,
}

/// Resolves a rail id to its bank registers and selection bit.
///
/// Bits 30 and 31 of either bank are request-control bits rather than rail
/// selection bits, so the corresponding ids are invalid.
fn rail_regs(id: u32) -> Result<RailRegs> {
    let bit = id % 32;
    if id > 63 || bit == 30 || bit == 31 {
        return Err(Error::InvalidArgument);
    }

    let (request, status) = if id < 32 {
        (IO_DPD_REQ, IO_DPD_STATUS)
    } else {
        (IO_DPD2_REQ, IO_DPD2_STATUS)
    };

    Ok(RailRegs {
        request,
        status,
        mask: 1 << bit,
    })
}

/// Keeps DPD sampling enabled for the duration of one request and always
/// disables it again, even when the status poll times out.
struct DpdSampling<'a, B: RegisterBus, D: Delay> {
    pmc: &'a Pmc<B, D>,
}

impl<B: RegisterBus, D: Delay> Drop for DpdSampling<'_, B, D> {
    fn drop(&mut self) {
        self.pmc.write(DPD_SAMPLE, DPD_SAMPLE_DISABLE);
    }
}

impl<B: RegisterBus, D: Delay> Pmc<B, D> {
    /// Restores power to I/O rail `id` by releasing deep power down.
    pub fn rail_power_on(&self, id: u32) -> Result<()> {
        self.rail_set_power(id, true)
    }

    /// Powers I/O rail `id` down to cut leakage on its pads.
    pub fn rail_power_off(&self, id: u32) -> Result<()> {
        self.rail_set_power(id, false)
    }

    fn rail_set_power(&self, id: u32, on: bool) -> Result<()> {
        let regs = rail_regs(id)?;
        let _sampling = self.rail_prepare()?;

        let mut value = self.read(regs.request);
        value |= regs.mask;
        value &= !IO_DPD_REQ_CODE_MASK;
        value |= if on {
            IO_DPD_REQ_CODE_OFF
        } else {
            IO_DPD_REQ_CODE_ON
        };
        self.write(regs.request, value);

        let target = if on { 0 } else { regs.mask };
        self.rail_poll(regs.status, regs.mask, target)
    }

    /// Enables DPD sampling and programs the sample window to cover the
    /// minimum settle time, in APB clock ticks rounded up.
    fn rail_prepare(&self) -> Result<DpdSampling<'_, B, D>> {
        let rate = self.reference_rate();
        if rate == 0 {
            return Err(Error::ResourceUnavailable);
        }

        self.write(DPD_SAMPLE, DPD_SAMPLE_ENABLE);

        let tick_ns = 1_000_000_000u64.div_ceil(rate);
        self.write(SEL_DPD_TIM, DPD_SETTLE_NS.div_ceil(tick_ns) as u32);

        Ok(DpdSampling { pmc: self })
    }

    fn rail_poll(&self, status: u32, mask: u32, target: u32) -> Result<()> {
        for _ in 0..RAIL_TIMEOUT_US / RAIL_POLL_US {
            if self.read(status) & mask == target {
                return Ok(());
            }
            self.delay_us(RAIL_POLL_US);
        }

        Err(Error::Timeout)
    }
}
