// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Chip-variant descriptors for the PMC.
//!
//! A [`SocData`] names the power-gate partitions of one chip generation and
//! carries the feature flags the sequencing code branches on. The tables are
//! static hardware facts; board-specific configuration (which domains exist,
//! their clocks and resets) arrives separately through
//! [`crate::DomainConfig`].

use bitflags::bitflags;

/// Power-gate partition indexes.
///
/// A partition id selects one bit in the power-gate status word, so ids are
/// unique within a chip variant. Not every id exists on every variant; the
/// variant's partition table is authoritative.
pub mod partition {
    /// CPU power rail.
    pub const CRAIL: u32 = 0;
    /// 3D graphics core. Uses the dedicated clamp register on variants with
    /// [`super::SocFeatures::GPU_CLAMPS`].
    pub const THREED: u32 = 1;
    /// Video encoder.
    pub const VENC: u32 = 2;
    /// PCIe. Clamp bit swapped with [`VDEC`]; clocks stay under the PCIe
    /// driver's control during power-up.
    pub const PCIE: u32 = 3;
    /// Video decoder. Clamp bit swapped with [`PCIE`].
    pub const VDEC: u32 = 4;
    /// L2 cache.
    pub const L2: u32 = 5;
    /// Media processing engine.
    pub const MPE: u32 = 6;
    /// 2D/encoder host engines.
    pub const HEG: u32 = 7;
    /// SATA controller.
    pub const SATA: u32 = 8;
    /// CPU core 1.
    pub const CPU1: u32 = 9;
    /// CPU core 2.
    pub const CPU2: u32 = 10;
    /// CPU core 3.
    pub const CPU3: u32 = 11;
    /// Low-power cluster.
    pub const CELP: u32 = 12;
    /// Second 3D core (dual-GPU variants).
    pub const THREED1: u32 = 13;
    /// CPU core 0.
    pub const CPU0: u32 = 14;
    /// Cluster 0 non-CPU logic.
    pub const C0NC: u32 = 15;
    /// Cluster 1 non-CPU logic.
    pub const C1NC: u32 = 16;
    /// Serial output resource.
    pub const SOR: u32 = 17;
    /// Display controller A.
    pub const DIS: u32 = 18;
    /// Display controller B.
    pub const DISB: u32 = 19;
    /// XUSB host partition A.
    pub const XUSBA: u32 = 20;
    /// XUSB host partition B.
    pub const XUSBB: u32 = 21;
    /// XUSB host partition C.
    pub const XUSBC: u32 = 22;
    /// Video image compositor.
    pub const VIC: u32 = 23;
    /// Internal RAM.
    pub const IRAM: u32 = 24;
}

bitflags! {
    /// Feature flags describing one chip generation.
    #[derive(Debug, Eq, PartialEq, Clone, Copy)]
    #[repr(transparent)]
    pub struct SocFeatures: u32 {
        /// The PMC can arm an emergency thermal reset transaction.
        const TSENSE_RESET = 1 << 0;
        /// GPU clamps are controlled by a dedicated register instead of a
        /// bit in the shared clamp-removal register.
        const GPU_CLAMPS = 1 << 1;
        /// Older power-up ordering: resets are asserted right after the gate
        /// opens, and the memory controller is not flushed on power-down.
        const LEGACY_SEQUENCING = 1 << 2;
    }
}

/// Static description of one chip variant's PMC.
#[derive(Debug)]
pub struct SocData {
    /// Variant name, for logs.
    pub name: &'static str,
    /// Valid partitions as `(id, name)` pairs.
    pub partitions: &'static [(u32, &'static str)],
    /// Number of partition status bits implemented by the variant. Ids at or
    /// above this value are rejected.
    pub num_partitions: u32,
    /// Partition ids of the CPU cores, indexed by CPU number.
    pub cpu_partitions: &'static [u32],
    /// Feature flags of the variant.
    pub features: SocFeatures,
}

impl SocData {
    /// Returns whether `id` indexes an implemented partition status bit.
    pub fn partition_is_valid(&self, id: u32) -> bool {
        id < self.num_partitions
    }

    /// Returns the display name of partition `id`, if the variant names it.
    pub fn partition_name(&self, id: u32) -> Option<&'static str> {
        self.partitions
            .iter()
            .find(|(partition, _)| *partition == id)
            .map(|(_, name)| *name)
    }

    /// Maps a CPU number to its power-gate partition id.
    ///
    /// CPU 0 is the boot CPU and is never hotplugged through this driver, so
    /// only secondary CPU numbers resolve.
    pub fn cpu_partition(&self, cpu: usize) -> Option<u32> {
        if cpu > 0 && cpu < self.cpu_partitions.len() {
            Some(self.cpu_partitions[cpu])
        } else {
            None
        }
    }
}

/// Partitions that must never be returned to the off state: CPU cores and
/// rails, cluster logic and internal RAM. The set is shared by all variants.
pub const ALWAYS_ON: &[u32] = &[
    partition::CRAIL,
    partition::CPU0,
    partition::CPU1,
    partition::CPU2,
    partition::CPU3,
    partition::C0NC,
    partition::IRAM,
];

/// Legacy-sequencing variant without CPU power-gate support.
pub static TEGRA30: SocData = SocData {
    name: "tegra30",
    partitions: &[
        (partition::CRAIL, "cpu0"),
        (partition::THREED, "3d0"),
        (partition::VENC, "venc"),
        (partition::VDEC, "vdec"),
        (partition::PCIE, "pcie"),
        (partition::L2, "l2"),
        (partition::MPE, "mpe"),
        (partition::HEG, "heg"),
        (partition::SATA, "sata"),
        (partition::CPU1, "cpu1"),
        (partition::CPU2, "cpu2"),
        (partition::CPU3, "cpu3"),
        (partition::CELP, "celp"),
        (partition::THREED1, "3d1"),
    ],
    num_partitions: 14,
    cpu_partitions: &[
        partition::CRAIL,
        partition::CPU1,
        partition::CPU2,
        partition::CPU3,
    ],
    features: SocFeatures::TSENSE_RESET.union(SocFeatures::LEGACY_SEQUENCING),
};

/// First variant with the modern power-up ordering and hot-reset flush on
/// power-down.
pub static TEGRA114: SocData = SocData {
    name: "tegra114",
    partitions: &[
        (partition::CRAIL, "crail"),
        (partition::THREED, "3d"),
        (partition::VENC, "venc"),
        (partition::VDEC, "vdec"),
        (partition::MPE, "mpe"),
        (partition::HEG, "heg"),
        (partition::CPU1, "cpu1"),
        (partition::CPU2, "cpu2"),
        (partition::CPU3, "cpu3"),
        (partition::CELP, "celp"),
        (partition::CPU0, "cpu0"),
        (partition::C0NC, "c0nc"),
        (partition::C1NC, "c1nc"),
        (partition::DIS, "dis"),
        (partition::DISB, "disb"),
        (partition::XUSBA, "xusba"),
        (partition::XUSBB, "xusbb"),
        (partition::XUSBC, "xusbc"),
    ],
    num_partitions: 23,
    cpu_partitions: &[
        partition::CPU0,
        partition::CPU1,
        partition::CPU2,
        partition::CPU3,
    ],
    features: SocFeatures::TSENSE_RESET,
};

/// Modern variant with the dedicated GPU clamp register.
pub static TEGRA124: SocData = SocData {
    name: "tegra124",
    partitions: &[
        (partition::CRAIL, "crail"),
        (partition::THREED, "3d"),
        (partition::VENC, "venc"),
        (partition::PCIE, "pcie"),
        (partition::VDEC, "vdec"),
        (partition::L2, "l2"),
        (partition::MPE, "mpe"),
        (partition::HEG, "heg"),
        (partition::SATA, "sata"),
        (partition::CPU1, "cpu1"),
        (partition::CPU2, "cpu2"),
        (partition::CPU3, "cpu3"),
        (partition::CELP, "celp"),
        (partition::CPU0, "cpu0"),
        (partition::C0NC, "c0nc"),
        (partition::C1NC, "c1nc"),
        (partition::SOR, "sor"),
        (partition::DIS, "dis"),
        (partition::DISB, "disb"),
        (partition::XUSBA, "xusba"),
        (partition::XUSBB, "xusbb"),
        (partition::XUSBC, "xusbc"),
        (partition::VIC, "vic"),
        (partition::IRAM, "iram"),
    ],
    num_partitions: 25,
    cpu_partitions: &[
        partition::CPU0,
        partition::CPU1,
        partition::CPU2,
        partition::CPU3,
    ],
    features: SocFeatures::TSENSE_RESET.union(SocFeatures::GPU_CLAMPS),
};
