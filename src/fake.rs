// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fake hardware for unit tests.
//!
//! [`FakePmcBus`] and [`FakeMcBus`] model just enough register behaviour to
//! drive the polling loops: the power-gate status bit follows toggle writes,
//! the DPD status banks follow rail requests and the MC flush status mirrors
//! the control register, optionally after a configurable number of glitched
//! reads. Every write is recorded for sequence assertions. The resource
//! fakes append to a shared [`EventLog`] so tests can check global ordering
//! across clocks, resets and regulators.

use crate::{
    Error, Result,
    mmio::{Delay, RegisterBus},
    pmc::{
        PWRGATE_STATUS, PWRGATE_TOGGLE, PWRGATE_TOGGLE_START,
        iorail::{
            IO_DPD_REQ, IO_DPD_REQ_CODE_MASK, IO_DPD_REQ_CODE_OFF, IO_DPD_REQ_CODE_ON, IO_DPD2_REQ,
        },
    },
    resources::{Clock, Regulator, ResetLine},
};
use alloc::{collections::BTreeMap, rc::Rc, vec::Vec};
use core::{
    cell::{Cell, RefCell},
    sync::atomic::{AtomicU64, Ordering},
};
use spin::mutex::SpinMutex;

/// Hot-reset register pair of the fake MC, mirroring the tegra114 layout.
const FLUSH_CTRL: u32 = 0x200;
const FLUSH_STATUS: u32 = 0x204;

#[derive(Default)]
struct PmcState {
    regs: BTreeMap<u32, u32>,
    writes: Vec<(u32, u32)>,
    toggle_writes: Vec<u32>,
    stuck_partitions: u32,
    rails_stuck: bool,
}

/// A fake PMC register window.
#[derive(Default)]
pub struct FakePmcBus {
    state: SpinMutex<PmcState>,
}

impl FakePmcBus {
    /// Creates a window with all registers reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets the power-gate status bit of partition `id` without going
    /// through a toggle.
    pub fn set_partition_state(&self, id: u32, on: bool) {
        let mut state = self.state.lock();
        let status = state.regs.entry(PWRGATE_STATUS).or_insert(0);
        if on {
            *status |= 1 << id;
        } else {
            *status &= !(1 << id);
        }
    }

    /// Makes partition `id` ignore toggle requests, so status polls time
    /// out.
    pub fn stick_partition(&self, id: u32) {
        self.state.lock().stuck_partitions |= 1 << id;
    }

    /// Makes the DPD status banks stop following rail requests.
    pub fn stick_rails(&self) {
        self.state.lock().rails_stuck = true;
    }

    /// Returns every `(offset, value)` write in issue order.
    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.state.lock().writes.clone()
    }

    /// Forgets the recorded writes, e.g. after a setup phase.
    pub fn clear_writes(&self) {
        self.state.lock().writes.clear();
    }

    /// Returns the partition ids of all toggle writes in issue order.
    pub fn toggle_writes(&self) -> Vec<u32> {
        self.state.lock().toggle_writes.clone()
    }

    /// Reads a register without going through the bus trait.
    pub fn reg(&self, offset: u32) -> u32 {
        self.state.lock().regs.get(&offset).copied().unwrap_or(0)
    }
}

impl RegisterBus for FakePmcBus {
    fn read(&self, offset: u32) -> u32 {
        self.state.lock().regs.get(&offset).copied().unwrap_or(0)
    }

    fn write(&self, offset: u32, value: u32) {
        let mut state = self.state.lock();
        state.writes.push((offset, value));

        match offset {
            PWRGATE_TOGGLE if value & PWRGATE_TOGGLE_START != 0 => {
                let id = value & 0x1f;
                state.toggle_writes.push(id);
                if state.stuck_partitions & (1 << id) == 0 {
                    let status = state.regs.entry(PWRGATE_STATUS).or_insert(0);
                    *status ^= 1 << id;
                }
            }
            IO_DPD_REQ | IO_DPD2_REQ => {
                state.regs.insert(offset, value);
                if !state.rails_stuck {
                    let rails = value & !IO_DPD_REQ_CODE_MASK;
                    let code = value & IO_DPD_REQ_CODE_MASK;
                    let status_offset = offset + 4;
                    let mut status = state.regs.get(&status_offset).copied().unwrap_or(0);
                    if code == IO_DPD_REQ_CODE_ON {
                        status |= rails;
                    } else if code == IO_DPD_REQ_CODE_OFF {
                        status &= !rails;
                    }
                    state.regs.insert(status_offset, status);
                }
            }
            _ => {
                state.regs.insert(offset, value);
            }
        }
    }
}

#[derive(Default)]
struct McState {
    regs: BTreeMap<u32, u32>,
    writes: Vec<(u32, u32)>,
    glitch_reads: u32,
    status_reads: u32,
    never_flush: bool,
}

/// A fake MC register window whose flush status mirrors the control
/// register.
#[derive(Default)]
pub struct FakeMcBus {
    state: SpinMutex<McState>,
}

impl FakeMcBus {
    /// Creates a window with all registers reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` status reads return distinct transient
    /// values, modelling the post-write glitch of the hardware.
    pub fn glitch_status_reads(&self, count: u32) {
        self.state.lock().glitch_reads = count;
    }

    /// Makes the flush status stay at zero forever.
    pub fn never_flush(&self) {
        self.state.lock().never_flush = true;
    }

    /// Returns the current flush control register value.
    pub fn ctrl(&self) -> u32 {
        self.state.lock().regs.get(&FLUSH_CTRL).copied().unwrap_or(0)
    }

    /// Returns every `(offset, value)` write in issue order.
    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.state.lock().writes.clone()
    }

    /// Returns how many times the status register was read.
    pub fn status_reads(&self) -> u32 {
        self.state.lock().status_reads
    }
}

impl RegisterBus for FakeMcBus {
    fn read(&self, offset: u32) -> u32 {
        let mut state = self.state.lock();

        if offset == FLUSH_STATUS {
            state.status_reads += 1;
            if state.glitch_reads > 0 {
                state.glitch_reads -= 1;
                return 0xaa55_0000 ^ state.glitch_reads;
            }
            if state.never_flush {
                return 0;
            }
            return state.regs.get(&FLUSH_CTRL).copied().unwrap_or(0);
        }

        state.regs.get(&offset).copied().unwrap_or(0)
    }

    fn write(&self, offset: u32, value: u32) {
        let mut state = self.state.lock();
        state.writes.push((offset, value));
        state.regs.insert(offset, value);
    }
}

/// A delay that only counts the requested microseconds instead of sleeping.
#[derive(Default)]
pub struct FakeDelay {
    elapsed: AtomicU64,
}

impl FakeDelay {
    /// Creates a delay with zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total microseconds requested so far.
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }
}

impl Delay for FakeDelay {
    fn delay_us(&self, us: u32) {
        self.elapsed.fetch_add(u64::from(us), Ordering::Relaxed);
    }
}

/// A call to one of the fake resource handles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceEvent {
    /// A clock was enabled.
    ClockEnabled(&'static str),
    /// A clock was disabled.
    ClockDisabled(&'static str),
    /// A reset line was asserted.
    ResetAsserted(&'static str),
    /// A reset line was deasserted.
    ResetDeasserted(&'static str),
    /// A regulator output was turned on.
    RegulatorEnabled(&'static str),
    /// A regulator output was turned off.
    RegulatorDisabled(&'static str),
}

/// An ordered log shared by all resource fakes of one test.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ResourceEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events recorded so far, in call order.
    pub fn events(&self) -> Vec<ResourceEvent> {
        self.events.borrow().clone()
    }

    fn push(&self, event: ResourceEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// A clock handle that records its calls.
pub struct FakeClock {
    log: EventLog,
    name: &'static str,
    rate: u64,
    fail: bool,
}

impl FakeClock {
    /// Creates a clock that reports a zero rate.
    pub fn new(log: EventLog, name: &'static str) -> Self {
        Self {
            log,
            name,
            rate: 0,
            fail: false,
        }
    }

    /// Sets the reported rate in Hz.
    pub fn with_rate(mut self, rate: u64) -> Self {
        self.rate = rate;
        self
    }

    /// Makes every enable attempt fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Clock for FakeClock {
    fn enable(&self) -> Result<()> {
        if self.fail {
            return Err(Error::ResourceUnavailable);
        }
        self.log.push(ResourceEvent::ClockEnabled(self.name));
        Ok(())
    }

    fn disable(&self) {
        self.log.push(ResourceEvent::ClockDisabled(self.name));
    }

    fn rate(&self) -> u64 {
        self.rate
    }
}

/// A reset line handle that records its calls.
pub struct FakeReset {
    log: EventLog,
    name: &'static str,
}

impl FakeReset {
    /// Creates a reset line.
    pub fn new(log: EventLog, name: &'static str) -> Self {
        Self { log, name }
    }
}

impl ResetLine for FakeReset {
    fn assert(&self) -> Result<()> {
        self.log.push(ResourceEvent::ResetAsserted(self.name));
        Ok(())
    }

    fn deassert(&self) -> Result<()> {
        self.log.push(ResourceEvent::ResetDeasserted(self.name));
        Ok(())
    }
}

/// A regulator handle that records its calls and tracks its state.
pub struct FakeRegulator {
    log: EventLog,
    name: &'static str,
    enabled: Cell<bool>,
}

impl FakeRegulator {
    /// Creates a regulator that starts disabled.
    pub fn new(log: EventLog, name: &'static str) -> Self {
        Self {
            log,
            name,
            enabled: Cell::new(false),
        }
    }
}

impl Regulator for FakeRegulator {
    fn enable(&self) -> Result<()> {
        self.enabled.set(true);
        self.log.push(ResourceEvent::RegulatorEnabled(self.name));
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        self.enabled.set(false);
        self.log.push(ResourceEvent::RegulatorDisabled(self.name));
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}
