// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power management controller register window.
//!
//! [`Pmc`] owns the PMC MMIO window and implements the partition power-gate
//! primitive, clamp removal, the CPU hotplug helpers, suspend timing and the
//! emergency thermal reset configuration. The partition on/off notion is
//! always a fresh read of the hardware status word, never a cached field, so
//! the driver cannot drift from the true state.

pub(crate) mod iorail;

use crate::{
    Error, Result,
    mmio::{Delay, RegisterBus},
    resources::Clock,
    soc::{SocData, SocFeatures, partition},
};
use alloc::boxed::Box;
use log::{info, warn};
use num_enum::FromPrimitive;
use spin::mutex::SpinMutex;

const PMC_CNTRL: u32 = 0x0;
const PMC_CNTRL_SYSCLK_POLARITY: u32 = 1 << 10;
const PMC_CNTRL_SYSCLK_OE: u32 = 1 << 11;
const PMC_CNTRL_SIDE_EFFECT_LP0: u32 = 1 << 14;
const PMC_CNTRL_CPU_PWRREQ_OE: u32 = 1 << 16;

pub(crate) const PWRGATE_TOGGLE: u32 = 0x30;
pub(crate) const PWRGATE_TOGGLE_START: u32 = 1 << 8;

pub(crate) const REMOVE_CLAMPING: u32 = 0x34;

pub(crate) const PWRGATE_STATUS: u32 = 0x38;

const PMC_CPUPWRGOOD_TIMER: u32 = 0xc8;
const PMC_CPUPWROFF_TIMER: u32 = 0xcc;

const PMC_SCRATCH41: u32 = 0x140;

const PMC_SENSOR_CTRL: u32 = 0x1b0;
const PMC_SENSOR_CTRL_SCRATCH_WRITE: u32 = 1 << 2;
const PMC_SENSOR_CTRL_ENABLE_RST: u32 = 1 << 1;

const PMC_SCRATCH54: u32 = 0x258;
const PMC_SCRATCH54_DATA_SHIFT: u32 = 8;
const PMC_SCRATCH54_ADDR_SHIFT: u32 = 0;

const PMC_SCRATCH55: u32 = 0x25c;
const PMC_SCRATCH55_RESET_TEGRA: u32 = 1 << 31;
const PMC_SCRATCH55_CNTRL_ID_SHIFT: u32 = 27;
const PMC_SCRATCH55_PINMUX_SHIFT: u32 = 24;
const PMC_SCRATCH55_CHECKSUM_SHIFT: u32 = 16;
const PMC_SCRATCH55_I2CSLV1_SHIFT: u32 = 0;

pub(crate) const GPU_RG_CNTRL: u32 = 0x2d4;

/// Settle time between power sequence steps.
const SETTLE_US: u32 = 10;

/// Power-gate status poll interval and bound. The partition bit normally
/// follows a toggle within a few intervals.
const PWRGATE_POLL_US: u32 = 10;
const PWRGATE_TIMEOUT_US: u32 = 50_000;

/// System suspend depth, deepest first in hardware terms.
///
/// Board configuration encodes the requested mode as a small integer;
/// unknown values decode to [`SuspendMode::None`].
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
#[repr(u32)]
pub enum SuspendMode {
    /// Deep sleep: rails off, state held in the PMC and a warm-boot vector.
    Lp0 = 0,
    /// CPU rail off, memory in self-refresh, clocked from the 32 kHz
    /// oscillator.
    Lp1 = 1,
    /// CPU voltage/clock gated only.
    Lp2 = 2,
    /// Suspend disabled.
    #[num_enum(default)]
    None = 3,
}

/// Physical location of the warm-boot (LP0 resume) code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WarmBootVector {
    /// Physical base address of the vector.
    pub base: u32,
    /// Size of the vector in bytes.
    pub size: u32,
}

/// Suspend mode and timing parameters from board configuration.
#[derive(Clone, Debug)]
pub struct SuspendConfig {
    /// Deepest suspend mode the board supports.
    pub mode: SuspendMode,
    /// CPU power-good time in microseconds.
    pub cpu_good_time_us: u32,
    /// CPU power-off time in microseconds.
    pub cpu_off_time_us: u32,
    /// Core power-good time counted from the oscillator, microseconds.
    pub core_osc_time_us: u32,
    /// Core power-good time counted from the PMU, microseconds.
    pub core_pmu_time_us: u32,
    /// Core power-off time in microseconds.
    pub core_off_time_us: u32,
    /// Core power request is active high.
    pub core_req_active_high: bool,
    /// System clock request is active high.
    pub sysclk_req_active_high: bool,
    /// CPU and core share a combined power request.
    pub combined_req: bool,
    /// The CPU power-good signal is wired up on this board.
    pub cpu_power_good_enabled: bool,
    /// Warm-boot code location; required for LP0.
    pub warm_boot: Option<WarmBootVector>,
}

impl Default for SuspendConfig {
    fn default() -> Self {
        Self {
            mode: SuspendMode::None,
            cpu_good_time_us: 0,
            cpu_off_time_us: 0,
            core_osc_time_us: 0,
            core_pmu_time_us: 0,
            core_off_time_us: 0,
            core_req_active_high: false,
            sysclk_req_active_high: false,
            combined_req: false,
            cpu_power_good_enabled: false,
            warm_boot: None,
        }
    }
}

/// Configuration of the emergency thermal reset: the I2C transaction the PMC
/// replays to the PMU when the thermal sensor trips. The values arrive
/// pre-validated from board configuration.
#[derive(Clone, Copy, Debug)]
pub struct ThermalResetConfig {
    /// I2C controller to replay the transaction on.
    pub controller_id: u32,
    /// PMU bus address.
    pub bus_addr: u32,
    /// PMU register address to write.
    pub reg_addr: u32,
    /// Value to write into the PMU register.
    pub reg_data: u32,
    /// Pinmux selector for the I2C pads.
    pub pinmux: u32,
}

/// The PMC register window and its chip-variant policy.
pub struct Pmc<B, D> {
    bus: B,
    delay: D,
    soc: &'static SocData,
    pclk: Box<dyn Clock>,
    suspend: SuspendConfig,
    suspend_mode: SpinMutex<SuspendMode>,
    /// Serialises all power-gate toggle/status sequences across partitions.
    gate_lock: SpinMutex<()>,
    /// Reference rate the suspend timers were last programmed for.
    timer_rate: SpinMutex<u64>,
}

impl<B: RegisterBus, D: Delay> Pmc<B, D> {
    /// Creates the controller for one chip variant.
    ///
    /// `pclk` is the PMC's APB reference clock, used to convert microsecond
    /// timing requirements into hardware tick counts. An LP0 request without
    /// a warm-boot vector is downgraded to LP1.
    pub fn new(
        bus: B,
        delay: D,
        soc: &'static SocData,
        pclk: Box<dyn Clock>,
        mut suspend: SuspendConfig,
    ) -> Self {
        if suspend.mode == SuspendMode::Lp0 && suspend.warm_boot.is_none() {
            warn!("LP0 requested without a warm boot vector, falling back to LP1");
            suspend.mode = SuspendMode::Lp1;
        }
        let suspend_mode = SpinMutex::new(suspend.mode);

        Self {
            bus,
            delay,
            soc,
            pclk,
            suspend,
            suspend_mode,
            gate_lock: SpinMutex::new(()),
            timer_rate: SpinMutex::new(0),
        }
    }

    /// Returns the active chip-variant descriptor.
    pub fn soc(&self) -> &'static SocData {
        self.soc
    }

    /// Direct access to the underlying register window, for tests driving a
    /// fake bus.
    #[cfg(any(test, feature = "fakes"))]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub(crate) fn read(&self, offset: u32) -> u32 {
        self.bus.read(offset)
    }

    pub(crate) fn write(&self, offset: u32, value: u32) {
        self.bus.write(offset, value);
    }

    /// Waits out the settle time between sequence steps.
    pub(crate) fn settle(&self) {
        self.delay.delay_us(SETTLE_US);
    }

    pub(crate) fn delay_us(&self, us: u32) {
        self.delay.delay_us(us);
    }

    pub(crate) fn reference_rate(&self) -> u64 {
        self.pclk.rate()
    }

    /// One-time controller setup: enables the CPU power request and
    /// programs the system clock request polarity while the request is
    /// still tristated, then enables it.
    pub fn init(&self) {
        let value = self.read(PMC_CNTRL);
        self.write(PMC_CNTRL, value | PMC_CNTRL_CPU_PWRREQ_OE);

        let mut value = self.read(PMC_CNTRL);
        if self.suspend.sysclk_req_active_high {
            value &= !PMC_CNTRL_SYSCLK_POLARITY;
        } else {
            value |= PMC_CNTRL_SYSCLK_POLARITY;
        }
        self.write(PMC_CNTRL, value);

        let value = self.read(PMC_CNTRL);
        self.write(PMC_CNTRL, value | PMC_CNTRL_SYSCLK_OE);
    }

    /// Requests partition `id` on or off and waits for the status bit to
    /// follow.
    ///
    /// Requesting the state the partition is already in is a no-op that
    /// issues no toggle write. A state change issues exactly one toggle and
    /// polls bounded by a 50 ms budget; on expiry the partition is reported
    /// as [`Error::Timeout`] and the caller decides whether to retry.
    pub fn set_partition_power(&self, id: u32, on: bool) -> Result<()> {
        if !self.soc.partition_is_valid(id) {
            return Err(Error::InvalidArgument);
        }

        let mask = 1 << id;
        let target = if on { mask } else { 0 };

        let _lock = self.gate_lock.lock();

        if self.read(PWRGATE_STATUS) & mask == target {
            return Ok(());
        }

        self.write(PWRGATE_TOGGLE, PWRGATE_TOGGLE_START | id);

        for _ in 0..PWRGATE_TIMEOUT_US / PWRGATE_POLL_US {
            if self.read(PWRGATE_STATUS) & mask == target {
                return Ok(());
            }
            self.delay.delay_us(PWRGATE_POLL_US);
        }

        Err(Error::Timeout)
    }

    /// Reads whether partition `id` is currently powered.
    pub fn is_partition_powered(&self, id: u32) -> Result<bool> {
        if !self.soc.partition_is_valid(id) {
            return Err(Error::InvalidArgument);
        }
        Ok(self.read(PWRGATE_STATUS) & (1 << id) != 0)
    }

    /// Removes the isolation clamps of partition `id` after power-up.
    ///
    /// The 3D partition uses a dedicated clamp register on variants with
    /// [`SocFeatures::GPU_CLAMPS`]. In the shared register the VDEC and PCIE
    /// clamp bits are swapped relative to the partition ids.
    pub fn remove_clamping(&self, id: u32) -> Result<()> {
        if !self.soc.partition_is_valid(id) {
            return Err(Error::InvalidArgument);
        }

        if id == partition::THREED && self.soc.features.contains(SocFeatures::GPU_CLAMPS) {
            self.write(GPU_RG_CNTRL, 0);
            return Ok(());
        }

        let mask = match id {
            partition::VDEC => 1 << partition::PCIE,
            partition::PCIE => 1 << partition::VDEC,
            _ => 1 << id,
        };
        self.write(REMOVE_CLAMPING, mask);

        Ok(())
    }

    /// Reads whether the partition backing CPU `cpu` is powered.
    pub fn cpu_is_powered(&self, cpu: usize) -> bool {
        match self.soc.cpu_partition(cpu) {
            Some(id) => self.is_partition_powered(id).unwrap_or(false),
            None => false,
        }
    }

    /// Opens the power gate of the partition backing CPU `cpu`.
    pub fn cpu_power_on(&self, cpu: usize) -> Result<()> {
        let id = self.soc.cpu_partition(cpu).ok_or(Error::InvalidArgument)?;
        self.set_partition_power(id, true)
    }

    /// Removes the clamps of the partition backing CPU `cpu`, after the
    /// mandatory settle time.
    pub fn cpu_remove_clamping(&self, cpu: usize) -> Result<()> {
        let id = self.soc.cpu_partition(cpu).ok_or(Error::InvalidArgument)?;
        self.settle();
        self.remove_clamping(id)
    }

    /// Returns the configured suspend mode.
    pub fn suspend_mode(&self) -> SuspendMode {
        *self.suspend_mode.lock()
    }

    /// Overrides the suspend mode, e.g. after the platform rules out deeper
    /// modes at runtime.
    pub fn set_suspend_mode(&self, mode: SuspendMode) {
        *self.suspend_mode.lock() = mode;
    }

    /// Programs the CPU power-good and power-off timers for entry into
    /// `mode` and arms the CPU power request.
    ///
    /// The timers count in ticks of the reference the mode suspends on: the
    /// 32 kHz oscillator for LP1, the APB clock for LP2. The timers are only
    /// rewritten when that rate changed since the last entry.
    pub fn enter_suspend(&self, mode: SuspendMode) {
        let rate = match mode {
            SuspendMode::Lp1 => 32_768,
            SuspendMode::Lp2 => self.pclk.rate(),
            _ => 0,
        };

        let rate = if rate == 0 {
            warn!("no reference rate for suspend mode {mode:?}, assuming 100 MHz");
            100_000_000
        } else {
            rate
        };

        let mut programmed = self.timer_rate.lock();
        if *programmed != rate {
            let good = suspend_timer_ticks(self.suspend.cpu_good_time_us, rate);
            let off = suspend_timer_ticks(self.suspend.cpu_off_time_us, rate);
            self.write(PMC_CPUPWRGOOD_TIMER, good);
            self.write(PMC_CPUPWROFF_TIMER, off);
            *programmed = rate;
        }

        let mut value = self.read(PMC_CNTRL);
        value &= !PMC_CNTRL_SIDE_EFFECT_LP0;
        value |= PMC_CNTRL_CPU_PWRREQ_OE;
        self.write(PMC_CNTRL, value);
    }

    /// Stores the physical resume address the boot ROM jumps to after a
    /// warm boot.
    pub fn set_resume_address(&self, phys: u32) {
        self.write(PMC_SCRATCH41, phys);
    }

    /// Clears the stored resume address after resume.
    pub fn clear_resume_address(&self) {
        self.write(PMC_SCRATCH41, 0);
    }

    /// Arms the emergency thermal reset: programs the PMU poweroff
    /// transaction into the sensor scratch registers and enables the reset.
    pub fn enable_thermal_reset(&self, config: &ThermalResetConfig) -> Result<()> {
        if !self.soc.features.contains(SocFeatures::TSENSE_RESET) {
            return Err(Error::Unsupported);
        }

        let value = self.read(PMC_SENSOR_CTRL);
        self.write(PMC_SENSOR_CTRL, value | PMC_SENSOR_CTRL_SCRATCH_WRITE);

        self.write(
            PMC_SCRATCH54,
            (config.reg_data << PMC_SCRATCH54_DATA_SHIFT)
                | (config.reg_addr << PMC_SCRATCH54_ADDR_SHIFT),
        );

        let mut value = PMC_SCRATCH55_RESET_TEGRA
            | (config.controller_id << PMC_SCRATCH55_CNTRL_ID_SHIFT)
            | (config.pinmux << PMC_SCRATCH55_PINMUX_SHIFT)
            | (config.bus_addr << PMC_SCRATCH55_I2CSLV1_SHIFT);

        // Checksum over the scratch 54/55 payload bytes. Bits 23:16 of the
        // value hold the checksum itself and are still zero here.
        let sum = config.reg_addr
            + config.reg_data
            + (value & 0xff)
            + ((value >> 8) & 0xff)
            + ((value >> 24) & 0xff);
        let checksum = (0x100 - (sum & 0xff)) & 0xff;
        value |= checksum << PMC_SCRATCH55_CHECKSUM_SHIFT;

        self.write(PMC_SCRATCH55, value);

        let value = self.read(PMC_SENSOR_CTRL);
        self.write(PMC_SENSOR_CTRL, value | PMC_SENSOR_CTRL_ENABLE_RST);

        info!("emergency thermal reset enabled");
        Ok(())
    }
}

/// Converts a microsecond time into reference clock ticks, rounding up.
fn suspend_timer_ticks(us: u32, rate: u64) -> u32 {
    (u64::from(us) * rate).div_ceil(1_000_000) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{EventLog, FakeClock, FakeDelay, FakePmcBus};
    use crate::soc::{TEGRA30, TEGRA114, TEGRA124};

    fn pmc(soc: &'static SocData) -> Pmc<FakePmcBus, FakeDelay> {
        pmc_with_rate(soc, 408_000_000)
    }

    fn pmc_with_rate(soc: &'static SocData, rate: u64) -> Pmc<FakePmcBus, FakeDelay> {
        let pclk = FakeClock::new(EventLog::new(), "pclk").with_rate(rate);
        Pmc::new(
            FakePmcBus::new(),
            FakeDelay::new(),
            soc,
            Box::new(pclk),
            SuspendConfig::default(),
        )
    }

    #[test]
    fn partition_power_toggles_once() {
        let pmc = pmc(&TEGRA114);

        assert_eq!(Ok(()), pmc.set_partition_power(partition::THREED, true));
        assert_eq!(vec![partition::THREED], pmc.bus.toggle_writes());
        assert_eq!(Ok(true), pmc.is_partition_powered(partition::THREED));

        // Already on: success with no further toggle.
        assert_eq!(Ok(()), pmc.set_partition_power(partition::THREED, true));
        assert_eq!(vec![partition::THREED], pmc.bus.toggle_writes());

        assert_eq!(Ok(()), pmc.set_partition_power(partition::THREED, false));
        assert_eq!(
            vec![partition::THREED, partition::THREED],
            pmc.bus.toggle_writes()
        );
        assert_eq!(Ok(false), pmc.is_partition_powered(partition::THREED));
    }

    #[test]
    fn partition_power_times_out_when_status_is_stuck() {
        let pmc = pmc(&TEGRA114);
        pmc.bus.stick_partition(partition::VENC);

        assert_eq!(
            Err(Error::Timeout),
            pmc.set_partition_power(partition::VENC, true)
        );
        // The toggle was still written exactly once.
        assert_eq!(vec![partition::VENC], pmc.bus.toggle_writes());
    }

    #[test]
    fn partition_power_rejects_unknown_ids() {
        let pmc = pmc(&TEGRA114);
        assert_eq!(Err(Error::InvalidArgument), pmc.set_partition_power(23, true));
        assert_eq!(Err(Error::InvalidArgument), pmc.is_partition_powered(31).map(|_| ()));
    }

    #[test]
    fn gpu_clamps_use_dedicated_register() {
        let with_gpu_clamps = pmc(&TEGRA124);
        assert_eq!(Ok(()), with_gpu_clamps.remove_clamping(partition::THREED));
        assert_eq!(vec![(GPU_RG_CNTRL, 0)], with_gpu_clamps.bus.writes());

        let shared_register = pmc(&TEGRA114);
        assert_eq!(Ok(()), shared_register.remove_clamping(partition::THREED));
        assert_eq!(
            vec![(REMOVE_CLAMPING, 1 << partition::THREED)],
            shared_register.bus.writes()
        );
    }

    #[test]
    fn vdec_and_pcie_clamp_bits_are_swapped() {
        let pmc = pmc(&TEGRA124);

        assert_eq!(Ok(()), pmc.remove_clamping(partition::VDEC));
        assert_eq!(Ok(()), pmc.remove_clamping(partition::PCIE));
        assert_eq!(Ok(()), pmc.remove_clamping(partition::VENC));
        assert_eq!(
            vec![
                (REMOVE_CLAMPING, 1 << partition::PCIE),
                (REMOVE_CLAMPING, 1 << partition::VDEC),
                (REMOVE_CLAMPING, 1 << partition::VENC),
            ],
            pmc.bus.writes()
        );
    }

    #[test]
    fn cpu_helpers_translate_indexes() {
        let pmc = pmc(&TEGRA114);

        assert_eq!(Err(Error::InvalidArgument), pmc.cpu_power_on(0));
        assert_eq!(Err(Error::InvalidArgument), pmc.cpu_power_on(4));
        assert!(!pmc.cpu_is_powered(0));

        assert_eq!(Ok(()), pmc.cpu_power_on(2));
        assert_eq!(vec![partition::CPU2], pmc.bus.toggle_writes());
        assert!(pmc.cpu_is_powered(2));

        assert_eq!(Ok(()), pmc.cpu_remove_clamping(2));
        assert!(
            pmc.bus
                .writes()
                .contains(&(REMOVE_CLAMPING, 1 << partition::CPU2))
        );
    }

    #[test]
    fn init_programs_sysclk_request() {
        let pclk = FakeClock::new(EventLog::new(), "pclk").with_rate(408_000_000);
        let config = SuspendConfig {
            sysclk_req_active_high: false,
            ..SuspendConfig::default()
        };
        let pmc = Pmc::new(
            FakePmcBus::new(),
            FakeDelay::new(),
            &TEGRA114,
            Box::new(pclk),
            config,
        );

        pmc.init();
        let cntrl = pmc.bus.reg(PMC_CNTRL);
        assert_eq!(
            PMC_CNTRL_CPU_PWRREQ_OE | PMC_CNTRL_SYSCLK_POLARITY | PMC_CNTRL_SYSCLK_OE,
            cntrl
        );
    }

    #[test]
    fn lp0_without_warm_boot_vector_degrades_to_lp1() {
        let pclk = FakeClock::new(EventLog::new(), "pclk").with_rate(408_000_000);
        let config = SuspendConfig {
            mode: SuspendMode::Lp0,
            ..SuspendConfig::default()
        };
        let pmc = Pmc::new(
            FakePmcBus::new(),
            FakeDelay::new(),
            &TEGRA114,
            Box::new(pclk),
            config,
        );
        assert_eq!(SuspendMode::Lp1, pmc.suspend_mode());
    }

    #[test]
    fn suspend_mode_decodes_from_config_value() {
        assert_eq!(SuspendMode::Lp0, SuspendMode::from(0u32));
        assert_eq!(SuspendMode::Lp2, SuspendMode::from(2u32));
        assert_eq!(SuspendMode::None, SuspendMode::from(7u32));
    }

    #[test]
    fn enter_suspend_programs_timers_in_reference_ticks() {
        let pclk = FakeClock::new(EventLog::new(), "pclk").with_rate(408_000_000);
        let config = SuspendConfig {
            mode: SuspendMode::Lp1,
            cpu_good_time_us: 2000,
            cpu_off_time_us: 1000,
            ..SuspendConfig::default()
        };
        let pmc = Pmc::new(
            FakePmcBus::new(),
            FakeDelay::new(),
            &TEGRA114,
            Box::new(pclk),
            config,
        );

        pmc.enter_suspend(SuspendMode::Lp1);
        // ceil(2000 us * 32768 Hz / 1e6) = 66, ceil(1000 * 32768 / 1e6) = 33.
        assert_eq!(66, pmc.bus.reg(PMC_CPUPWRGOOD_TIMER));
        assert_eq!(33, pmc.bus.reg(PMC_CPUPWROFF_TIMER));

        let writes_before = pmc.bus.writes().len();
        pmc.enter_suspend(SuspendMode::Lp1);
        // Same rate: the timers are not rewritten.
        assert_eq!(
            writes_before + 1,
            pmc.bus.writes().len(),
            "only the control register should be touched again"
        );
    }

    #[test]
    fn resume_address_round_trips_through_scratch() {
        let pmc = pmc(&TEGRA114);
        pmc.set_resume_address(0x8000_1234);
        assert_eq!(0x8000_1234, pmc.bus.reg(PMC_SCRATCH41));
        pmc.clear_resume_address();
        assert_eq!(0, pmc.bus.reg(PMC_SCRATCH41));
    }

    #[test]
    fn thermal_reset_needs_the_feature() {
        let config = ThermalResetConfig {
            controller_id: 4,
            bus_addr: 0x40,
            reg_addr: 0x3f,
            reg_data: 0x80,
            pinmux: 0,
        };

        let legacy = pmc(&TEGRA30);
        assert_eq!(Ok(()), legacy.enable_thermal_reset(&config));

        let no_tsense = SocData {
            name: "no-tsense",
            partitions: TEGRA114.partitions,
            num_partitions: TEGRA114.num_partitions,
            cpu_partitions: TEGRA114.cpu_partitions,
            features: SocFeatures::empty(),
        };
        let soc: &'static SocData = Box::leak(Box::new(no_tsense));
        let pmc = pmc(soc);
        assert_eq!(Err(Error::Unsupported), pmc.enable_thermal_reset(&config));
        assert!(pmc.bus.writes().is_empty());
    }

    #[test]
    fn thermal_reset_checksums_the_scratch_payload() {
        let config = ThermalResetConfig {
            controller_id: 4,
            bus_addr: 0x40,
            reg_addr: 0x3f,
            reg_data: 0x80,
            pinmux: 1,
        };
        let pmc = pmc(&TEGRA114);
        assert_eq!(Ok(()), pmc.enable_thermal_reset(&config));

        assert_eq!(
            (0x80 << PMC_SCRATCH54_DATA_SHIFT) | 0x3f,
            pmc.bus.reg(PMC_SCRATCH54)
        );

        let scratch55 = pmc.bus.reg(PMC_SCRATCH55);
        let sum = 0x3f
            + 0x80
            + (scratch55 & 0xff)
            + ((scratch55 >> 8) & 0xff)
            + ((scratch55 >> 16) & 0xff)
            + ((scratch55 >> 24) & 0xff);
        // The checksum byte makes the payload sum to a multiple of 256.
        assert_eq!(0, sum & 0xff);
        assert_ne!(0, scratch55 & PMC_SCRATCH55_RESET_TEGRA);

        let sensor = pmc.bus.reg(PMC_SENSOR_CTRL);
        assert_ne!(0, sensor & PMC_SENSOR_CTRL_ENABLE_RST);
    }

    #[test]
    fn suspend_timer_tick_rounding() {
        // 408 MHz: one tick is ~2.45 ns; 10 us rounds up to 4080 ticks.
        assert_eq!(4080, suspend_timer_ticks(10, 408_000_000));
        // Rounds up on a remainder.
        assert_eq!(33, suspend_timer_ticks(1000, 32_768));
        assert_eq!(0, suspend_timer_ticks(0, 32_768));
    }
}
