// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power domain descriptors and the power on/off sequences.
//!
//! A domain bundles everything one gated hardware block needs for a safe
//! transition: its power-gate partition (or external regulator), its clocks
//! and reset lines in registration order, and the memory controller client
//! groups whose queues must be drained around a transition.
//!
//! Sequences stop at the first failing step. The hardware has no atomic
//! multi-step transactions, so a failed transition intentionally leaves the
//! domain partially configured instead of pretending to roll back.

use crate::{
    Error, Result,
    mc::Mc,
    mmio::{Delay, RegisterBus},
    pmc::Pmc,
    resources::{Clock, Regulator, ResetLine},
    soc::{ALWAYS_ON, SocFeatures, partition},
};
use alloc::{boxed::Box, string::String, vec::Vec};
use log::debug;

/// Configuration of one power domain, assembled by the board integration
/// from its hardware description.
pub struct DomainConfig {
    /// Power-gate partition id of the domain.
    pub id: u32,
    /// Display name, unique among registered domains.
    pub name: String,
    /// Name of the domain this one depends on, if any. Forward references
    /// are allowed; resolution happens after every domain is registered.
    pub depends_on: Option<String>,
    /// The domain is supplied by an external regulator instead of the
    /// internal power gate.
    pub external_rail: bool,
    /// Regulator handle for external-rail domains. May be absent when the
    /// regulator is not available yet; the domain then registers without a
    /// working power path.
    pub regulator: Option<Box<dyn Regulator>>,
    /// Module clocks, in enable order.
    pub clocks: Vec<Box<dyn Clock>>,
    /// Module reset lines, in assert order.
    pub resets: Vec<Box<dyn ResetLine>>,
    /// Memory controller client groups flushed around transitions.
    pub swgroups: Vec<u32>,
}

/// One registered power domain.
pub struct PowerDomain {
    id: u32,
    name: String,
    external_rail: bool,
    regulator: Option<Box<dyn Regulator>>,
    clocks: Vec<Box<dyn Clock>>,
    resets: Vec<Box<dyn ResetLine>>,
    swgroups: Vec<u32>,
    parent: Option<u32>,
    children: Vec<u32>,
}

impl PowerDomain {
    pub(crate) fn from_config(config: DomainConfig) -> (Self, Option<String>) {
        let domain = Self {
            id: config.id,
            name: config.name,
            external_rail: config.external_rail,
            regulator: config.regulator,
            clocks: config.clocks,
            resets: config.resets,
            swgroups: config.swgroups,
            parent: None,
            children: Vec::new(),
        };
        (domain, config.depends_on)
    }

    /// Power-gate partition id of the domain.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name of the domain.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the domain is backed by an external regulator.
    pub fn external_rail(&self) -> bool {
        self.external_rail
    }

    /// Id of the domain this one depends on, if any.
    pub fn parent(&self) -> Option<u32> {
        self.parent
    }

    /// Ids of the domains depending on this one.
    pub fn children(&self) -> &[u32] {
        &self.children
    }

    /// Client groups flushed around transitions of this domain.
    pub fn swgroups(&self) -> &[u32] {
        &self.swgroups
    }

    pub(crate) fn set_parent(&mut self, parent: u32) {
        self.parent = Some(parent);
    }

    pub(crate) fn add_child(&mut self, child: u32) {
        self.children.push(child);
    }

    pub(crate) fn has_power_path(&self) -> bool {
        !self.external_rail || self.regulator.is_some()
    }

    /// Reads whether the domain is currently powered. External-rail domains
    /// defer to the regulator; everything else reads the partition status
    /// bit. The answer is never cached.
    pub(crate) fn is_powered<B: RegisterBus, D: Delay>(&self, pmc: &Pmc<B, D>) -> bool {
        if self.external_rail {
            self.regulator
                .as_ref()
                .is_some_and(|regulator| regulator.is_enabled())
        } else {
            pmc.is_partition_powered(self.id).unwrap_or(false)
        }
    }

    /// Runs the power-up sequence of the domain.
    pub(crate) fn power_on<PB: RegisterBus, MB: RegisterBus, D: Delay>(
        &self,
        pmc: &Pmc<PB, D>,
        mc: &Mc<MB, D>,
    ) -> Result<()> {
        debug!("powering on domain {}", self.name);

        if self.external_rail {
            self.regulator().ok_or(Error::ResourceUnavailable)?.enable()?;
        } else {
            pmc.set_partition_power(self.id, true)?;
        }
        pmc.settle();

        if pmc.soc().features.contains(SocFeatures::LEGACY_SEQUENCING) {
            self.assert_resets()?;
            pmc.settle();
        }

        // PCIe PLLs run from supplies owned by the PCIe driver, which also
        // keeps control of the clocks during power-up.
        let drive_clocks = self.id != partition::PCIE;
        if drive_clocks {
            self.enable_clocks()?;
            pmc.settle();
        }

        pmc.remove_clamping(self.id)?;
        pmc.settle();

        self.deassert_resets()?;
        pmc.settle();

        for &group in &self.swgroups {
            mc.flush_done(group)?;
        }
        pmc.settle();

        // The resets are released; the clocks go back to the owning driver.
        if drive_clocks {
            self.disable_clocks();
        }

        Ok(())
    }

    /// Runs the power-down sequence of the domain.
    pub(crate) fn power_off<PB: RegisterBus, MB: RegisterBus, D: Delay>(
        &self,
        pmc: &Pmc<PB, D>,
        mc: &Mc<MB, D>,
    ) -> Result<()> {
        if ALWAYS_ON.contains(&self.id) {
            debug!("not disabling always-on domain {}", self.name);
            return Err(Error::Unsupported);
        }

        debug!("powering off domain {}", self.name);
        let legacy = pmc.soc().features.contains(SocFeatures::LEGACY_SEQUENCING);

        if !legacy {
            self.enable_clocks()?;
            pmc.settle();

            for &group in &self.swgroups {
                mc.flush(group)?;
            }
            pmc.settle();
        }

        self.assert_resets()?;
        pmc.settle();

        if !legacy {
            self.disable_clocks();
            pmc.settle();
        }

        if self.external_rail {
            self.regulator().ok_or(Error::ResourceUnavailable)?.disable()?;
        } else {
            pmc.set_partition_power(self.id, false)?;
        }

        Ok(())
    }

    fn regulator(&self) -> Option<&dyn Regulator> {
        self.regulator.as_deref()
    }

    /// Enables the clock bundle in registration order. On a failure the
    /// already-enabled clocks are wound back in reverse order.
    fn enable_clocks(&self) -> Result<()> {
        for (index, clock) in self.clocks.iter().enumerate() {
            if let Err(error) = clock.enable() {
                for enabled in self.clocks[..index].iter().rev() {
                    enabled.disable();
                }
                return Err(error);
            }
        }
        Ok(())
    }

    fn disable_clocks(&self) {
        for clock in self.clocks.iter().rev() {
            clock.disable();
        }
    }

    fn assert_resets(&self) -> Result<()> {
        for reset in &self.resets {
            reset.assert()?;
        }
        Ok(())
    }

    fn deassert_resets(&self) -> Result<()> {
        for reset in &self.resets {
            reset.deassert()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{
        EventLog, FakeClock, FakeDelay, FakeMcBus, FakePmcBus, FakeRegulator, FakeReset,
        ResourceEvent,
    };
    use crate::mc::TEGRA114_MC;
    use crate::pmc::SuspendConfig;
    use crate::soc::{SocData, TEGRA30, TEGRA114};
    use alloc::{string::ToString, vec};

    fn pmc(soc: &'static SocData) -> Pmc<FakePmcBus, FakeDelay> {
        let pclk = FakeClock::new(EventLog::new(), "pclk").with_rate(408_000_000);
        Pmc::new(
            FakePmcBus::new(),
            FakeDelay::new(),
            soc,
            Box::new(pclk),
            SuspendConfig::default(),
        )
    }

    fn mc() -> Mc<FakeMcBus, FakeDelay> {
        Mc::new(FakeMcBus::new(), FakeDelay::new(), &TEGRA114_MC)
    }

    fn venc_domain(log: &EventLog) -> PowerDomain {
        let config = DomainConfig {
            id: partition::VENC,
            name: "venc".to_string(),
            depends_on: None,
            external_rail: false,
            regulator: None,
            clocks: vec![
                Box::new(FakeClock::new(log.clone(), "venc")),
                Box::new(FakeClock::new(log.clone(), "csi")),
            ],
            resets: vec![Box::new(FakeReset::new(log.clone(), "venc"))],
            swgroups: vec![crate::mc::swgroup::EPP],
        };
        PowerDomain::from_config(config).0
    }

    #[test]
    fn power_on_orders_gate_clocks_clamp_resets_flush() {
        let log = EventLog::new();
        let domain = venc_domain(&log);
        let pmc = pmc(&TEGRA114);
        let mc = mc();

        assert_eq!(Ok(()), domain.power_on(&pmc, &mc));
        assert!(domain.is_powered(&pmc));

        // Clocks run only around the reset release window, in registration
        // order on enable and reverse order on disable.
        assert_eq!(
            vec![
                ResourceEvent::ClockEnabled("venc"),
                ResourceEvent::ClockEnabled("csi"),
                ResourceEvent::ResetDeasserted("venc"),
                ResourceEvent::ClockDisabled("csi"),
                ResourceEvent::ClockDisabled("venc"),
            ],
            log.events()
        );

        let clamp_gone = pmc.bus().writes().iter().any(|(offset, value)| {
            *offset == crate::pmc::REMOVE_CLAMPING && *value == 1 << partition::VENC
        });
        assert!(clamp_gone);
    }

    #[test]
    fn modern_power_off_flushes_before_reset() {
        let log = EventLog::new();
        let domain = venc_domain(&log);
        let pmc = pmc(&TEGRA114);
        let mc = mc();
        pmc.bus().set_partition_state(partition::VENC, true);

        assert_eq!(Ok(()), domain.power_off(&pmc, &mc));
        assert!(!domain.is_powered(&pmc));

        let events = log.events();
        assert_eq!(
            vec![
                ResourceEvent::ClockEnabled("venc"),
                ResourceEvent::ClockEnabled("csi"),
                ResourceEvent::ResetAsserted("venc"),
                ResourceEvent::ClockDisabled("csi"),
                ResourceEvent::ClockDisabled("venc"),
            ],
            events
        );

        // The flush bit of the group was raised while the clocks ran.
        let bit = TEGRA114_MC.hotreset(crate::mc::swgroup::EPP).unwrap().bit;
        assert_ne!(0, mc.bus().ctrl() & (1 << bit));
    }

    #[test]
    fn legacy_power_off_skips_clocks_and_flush() {
        let log = EventLog::new();
        let domain = venc_domain(&log);
        let pmc = pmc(&TEGRA30);
        let mc = mc();
        pmc.bus().set_partition_state(partition::VENC, true);

        assert_eq!(Ok(()), domain.power_off(&pmc, &mc));

        assert_eq!(vec![ResourceEvent::ResetAsserted("venc")], log.events());
        assert_eq!(0, mc.bus().ctrl());
    }

    #[test]
    fn legacy_power_on_asserts_resets_first() {
        let log = EventLog::new();
        let domain = venc_domain(&log);
        let pmc = pmc(&TEGRA30);
        let mc = mc();

        assert_eq!(Ok(()), domain.power_on(&pmc, &mc));

        let events = log.events();
        assert_eq!(ResourceEvent::ResetAsserted("venc"), events[0]);
        assert!(events.contains(&ResourceEvent::ResetDeasserted("venc")));
    }

    #[test]
    fn always_on_domains_refuse_power_off_without_side_effects() {
        let log = EventLog::new();
        let config = DomainConfig {
            id: partition::CPU0,
            name: "cpu0".to_string(),
            depends_on: None,
            external_rail: false,
            regulator: None,
            clocks: vec![Box::new(FakeClock::new(log.clone(), "cpu"))],
            resets: vec![Box::new(FakeReset::new(log.clone(), "cpu"))],
            swgroups: vec![],
        };
        let domain = PowerDomain::from_config(config).0;
        let pmc = pmc(&TEGRA114);
        let mc = mc();
        pmc.bus().set_partition_state(partition::CPU0, true);

        assert_eq!(Err(Error::Unsupported), domain.power_off(&pmc, &mc));
        assert!(log.events().is_empty());
        assert!(pmc.bus().writes().is_empty());
        assert!(domain.is_powered(&pmc));
    }

    #[test]
    fn clock_failure_unwinds_enabled_clocks() {
        let log = EventLog::new();
        let config = DomainConfig {
            id: partition::VDEC,
            name: "vdec".to_string(),
            depends_on: None,
            external_rail: false,
            regulator: None,
            clocks: vec![
                Box::new(FakeClock::new(log.clone(), "vdec")),
                Box::new(FakeClock::new(log.clone(), "bsev").failing()),
            ],
            resets: vec![Box::new(FakeReset::new(log.clone(), "vdec"))],
            swgroups: vec![],
        };
        let domain = PowerDomain::from_config(config).0;
        let pmc = pmc(&TEGRA114);
        let mc = mc();

        assert_eq!(Err(Error::ResourceUnavailable), domain.power_on(&pmc, &mc));

        // The first clock was wound back, and the sequence stopped before
        // the clamps were touched.
        assert_eq!(
            vec![
                ResourceEvent::ClockEnabled("vdec"),
                ResourceEvent::ClockDisabled("vdec"),
            ],
            log.events()
        );
        assert!(
            !pmc.bus()
                .writes()
                .iter()
                .any(|(offset, _)| *offset == crate::pmc::REMOVE_CLAMPING)
        );
    }

    #[test]
    fn pcie_clocks_stay_with_their_driver() {
        let log = EventLog::new();
        let config = DomainConfig {
            id: partition::PCIE,
            name: "pcie".to_string(),
            depends_on: None,
            external_rail: false,
            regulator: None,
            clocks: vec![Box::new(FakeClock::new(log.clone(), "pcie"))],
            resets: vec![Box::new(FakeReset::new(log.clone(), "pcie"))],
            swgroups: vec![],
        };
        let domain = PowerDomain::from_config(config).0;
        let pmc = pmc(&TEGRA114);
        let mc = mc();

        assert_eq!(Ok(()), domain.power_on(&pmc, &mc));
        assert!(
            !log.events()
                .iter()
                .any(|event| matches!(event, ResourceEvent::ClockEnabled(_)))
        );
    }

    #[test]
    fn external_rail_domains_use_the_regulator() {
        let log = EventLog::new();
        let config = DomainConfig {
            id: partition::THREED,
            name: "3d".to_string(),
            depends_on: None,
            external_rail: true,
            regulator: Some(Box::new(FakeRegulator::new(log.clone(), "vdd-3d"))),
            clocks: vec![Box::new(FakeClock::new(log.clone(), "3d"))],
            resets: vec![Box::new(FakeReset::new(log.clone(), "3d"))],
            swgroups: vec![],
        };
        let domain = PowerDomain::from_config(config).0;
        let pmc = pmc(&TEGRA114);
        let mc = mc();

        assert!(!domain.is_powered(&pmc));
        assert_eq!(Ok(()), domain.power_on(&pmc, &mc));
        assert!(domain.is_powered(&pmc));
        // No gate toggle was issued for a regulator-backed domain.
        assert!(pmc.bus().toggle_writes().is_empty());
        assert_eq!(
            Some(&ResourceEvent::RegulatorEnabled("vdd-3d")),
            log.events().first()
        );

        assert_eq!(Ok(()), domain.power_off(&pmc, &mc));
        assert!(!domain.is_powered(&pmc));
        assert_eq!(
            Some(&ResourceEvent::RegulatorDisabled("vdd-3d")),
            log.events().last()
        );
    }

    #[test]
    fn external_rail_without_regulator_has_no_power_path() {
        let log = EventLog::new();
        let config = DomainConfig {
            id: partition::THREED,
            name: "3d".to_string(),
            depends_on: None,
            external_rail: true,
            regulator: None,
            clocks: vec![Box::new(FakeClock::new(log.clone(), "3d"))],
            resets: vec![],
            swgroups: vec![],
        };
        let domain = PowerDomain::from_config(config).0;
        let pmc = pmc(&TEGRA114);
        let mc = mc();

        assert!(!domain.has_power_path());
        assert!(!domain.is_powered(&pmc));
        assert_eq!(Err(Error::ResourceUnavailable), domain.power_on(&pmc, &mc));
    }
}
