// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The owning context for one chip's power management.
//!
//! [`PowerController`] ties the PMC and MC halves together with the
//! registered power domains and dispatches transitions by domain id or
//! name. Registration is a two-phase build: first every domain is created
//! and indexed, then dependency references are resolved by name. The split
//! exists because configuration may reference domains that register later;
//! a single pass would fail on such forward references.

use crate::{
    Error, Result,
    domain::{DomainConfig, PowerDomain},
    mc::Mc,
    mmio::{Delay, RegisterBus},
    pmc::Pmc,
};
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use log::{info, warn};

/// Power controller context for one chip.
///
/// Created once at initialisation via [`PowerController::new`]; dropping it
/// releases the register windows and every resource handle the domains own.
pub struct PowerController<PB, MB, D> {
    pmc: Pmc<PB, D>,
    mc: Mc<MB, D>,
    domains: Vec<PowerDomain>,
    by_id: BTreeMap<u32, usize>,
    by_name: BTreeMap<String, usize>,
}

impl<PB: RegisterBus, MB: RegisterBus, D: Delay> PowerController<PB, MB, D> {
    /// Builds the controller and registers the configured domains.
    ///
    /// Domains with an invalid partition id or a duplicate id or name are
    /// skipped with a warning; one bad entry does not abort the others.
    /// Freshly registered domains are driven to the powered-off state where
    /// possible, so unused blocks stop burning power from boot onwards.
    pub fn new(pmc: Pmc<PB, D>, mc: Mc<MB, D>, configs: Vec<DomainConfig>) -> Self {
        let mut domains: Vec<PowerDomain> = Vec::new();
        let mut depends: Vec<Option<String>> = Vec::new();
        let mut by_id = BTreeMap::new();
        let mut by_name = BTreeMap::new();

        for config in configs {
            if !pmc.soc().partition_is_valid(config.id) {
                warn!(
                    "domain {}: partition {} not valid on {}, skipping",
                    config.name,
                    config.id,
                    pmc.soc().name
                );
                continue;
            }
            if by_id.contains_key(&config.id) || by_name.contains_key(&config.name) {
                warn!("domain {}: duplicate id or name, skipping", config.name);
                continue;
            }
            if config.external_rail && config.regulator.is_none() {
                warn!("domain {}: regulator not available yet", config.name);
            }

            let (domain, depends_on) = PowerDomain::from_config(config);
            by_id.insert(domain.id(), domains.len());
            by_name.insert(String::from(domain.name()), domains.len());
            info!("added power domain {}", domain.name());
            domains.push(domain);
            depends.push(depends_on);
        }

        // Park every new domain in the off state. Always-on domains refuse,
        // and domains without a power path are left alone.
        for domain in &domains {
            if !domain.has_power_path() {
                continue;
            }
            if let Err(error) = domain.power_off(&pmc, &mc) {
                log::debug!("domain {} stays powered: {}", domain.name(), error);
            }
        }

        // Second pass: resolve dependency references now that every domain
        // is indexed.
        for index in 0..domains.len() {
            let Some(parent_name) = depends[index].take() else {
                continue;
            };
            match by_name.get(&parent_name) {
                Some(&parent) if parent != index => {
                    let parent_id = domains[parent].id();
                    let child_id = domains[index].id();
                    domains[index].set_parent(parent_id);
                    domains[parent].add_child(child_id);
                }
                _ => warn!(
                    "domain {}: parent {} not registered",
                    domains[index].name(),
                    parent_name
                ),
            }
        }

        info!("{} power domains added", domains.len());

        Self {
            pmc,
            mc,
            domains,
            by_id,
            by_name,
        }
    }

    /// Returns the PMC half of the controller.
    pub fn pmc(&self) -> &Pmc<PB, D> {
        &self.pmc
    }

    /// Returns the MC half of the controller.
    pub fn mc(&self) -> &Mc<MB, D> {
        &self.mc
    }

    /// Looks up a domain by partition id.
    pub fn domain(&self, id: u32) -> Result<&PowerDomain> {
        self.by_id
            .get(&id)
            .map(|&index| &self.domains[index])
            .ok_or(Error::NotFound)
    }

    /// Looks up a domain by name.
    pub fn domain_by_name(&self, name: &str) -> Result<&PowerDomain> {
        self.by_name
            .get(name)
            .map(|&index| &self.domains[index])
            .ok_or(Error::NotFound)
    }

    /// Iterates over the registered domains.
    pub fn domains(&self) -> impl Iterator<Item = &PowerDomain> {
        self.domains.iter()
    }

    /// Powers the domain `id` up.
    pub fn power_on(&self, id: u32) -> Result<()> {
        self.domain(id)?.power_on(&self.pmc, &self.mc)
    }

    /// Powers the domain `id` down.
    pub fn power_off(&self, id: u32) -> Result<()> {
        self.domain(id)?.power_off(&self.pmc, &self.mc)
    }

    /// Reads whether domain `id` is currently powered.
    pub fn is_powered(&self, id: u32) -> Result<bool> {
        Ok(self.domain(id)?.is_powered(&self.pmc))
    }
}
