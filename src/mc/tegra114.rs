// Copyright The Tegra PMC Driver Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Memory controller tables for the tegra114 variant.

use super::{HotReset, LatencyAllowance, McClient, McSoc, SmmuEnable, SmmuSwgroup, swgroup};

const HOTRESET_CTRL: u32 = 0x200;
const HOTRESET_STATUS: u32 = 0x204;

const fn hotreset(swgroup: u32, bit: u32) -> HotReset {
    HotReset {
        swgroup,
        ctrl: HOTRESET_CTRL,
        status: HOTRESET_STATUS,
        bit,
    }
}

static TEGRA114_HOTRESETS: [HotReset; 15] = [
    hotreset(swgroup::AVPC, 1),
    hotreset(swgroup::DC, 2),
    hotreset(swgroup::DCB, 3),
    hotreset(swgroup::EPP, 4),
    hotreset(swgroup::G2, 5),
    hotreset(swgroup::HC, 6),
    hotreset(swgroup::HDA, 7),
    hotreset(swgroup::ISP, 8),
    hotreset(swgroup::MPCORE, 9),
    hotreset(swgroup::MPCORELP, 10),
    hotreset(swgroup::MSENC, 11),
    hotreset(swgroup::NV, 12),
    hotreset(swgroup::PPCS, 14),
    hotreset(swgroup::VDE, 16),
    hotreset(swgroup::VI, 17),
];

const fn client(
    id: u32,
    name: &'static str,
    swgroup: u32,
    smmu: Option<SmmuEnable>,
    la: Option<LatencyAllowance>,
) -> McClient {
    McClient {
        id,
        name,
        swgroup,
        fifo_size: 0,
        smmu,
        la,
    }
}

const fn smmu(reg: u32, bit: u32) -> Option<SmmuEnable> {
    Some(SmmuEnable { reg, bit })
}

const fn la(reg: u32, shift: u32, default: u32) -> Option<LatencyAllowance> {
    Some(LatencyAllowance {
        reg,
        shift,
        mask: 0xff,
        default,
    })
}

static TEGRA114_CLIENTS: [McClient; 24] = [
    client(0x00, "ptcr", swgroup::PTC, None, None),
    client(0x01, "display0a", swgroup::DC, smmu(0x228, 1), la(0x2e8, 0, 0x4e)),
    client(0x02, "display0ab", swgroup::DCB, smmu(0x228, 2), la(0x2f4, 0, 0x4e)),
    client(0x03, "display0b", swgroup::DC, smmu(0x228, 3), la(0x2e8, 16, 0x4e)),
    client(0x04, "display0bb", swgroup::DCB, smmu(0x228, 4), la(0x2f4, 16, 0x4e)),
    client(0x05, "display0c", swgroup::DC, smmu(0x228, 5), la(0x2ec, 0, 0x4e)),
    client(0x06, "display0cb", swgroup::DCB, smmu(0x228, 6), la(0x2f8, 0, 0x4e)),
    client(0x09, "eppup", swgroup::EPP, smmu(0x228, 9), la(0x300, 0, 0x33)),
    client(0x0a, "g2pr", swgroup::G2, smmu(0x228, 10), la(0x308, 0, 0x09)),
    client(0x0b, "g2sr", swgroup::G2, smmu(0x228, 11), la(0x308, 16, 0x09)),
    client(0x0f, "avpcarm7r", swgroup::AVPC, smmu(0x228, 15), la(0x2e4, 0, 0x04)),
    client(0x10, "displayhc", swgroup::DC, smmu(0x228, 16), la(0x2f0, 0, 0x68)),
    client(0x11, "displayhcb", swgroup::DCB, smmu(0x228, 17), la(0x2fc, 0, 0x68)),
    client(0x12, "fdcdrd", swgroup::NV, smmu(0x228, 18), la(0x334, 0, 0x0c)),
    client(0x13, "fdcdrd2", swgroup::NV, smmu(0x228, 19), la(0x33c, 0, 0x0c)),
    client(0x14, "g2dr", swgroup::G2, smmu(0x228, 20), la(0x30c, 0, 0x0a)),
    client(0x15, "hdar", swgroup::HDA, smmu(0x228, 21), la(0x318, 0, 0xff)),
    client(0x16, "host1xdmar", swgroup::HC, smmu(0x228, 22), la(0x310, 0, 0x10)),
    client(0x17, "host1xr", swgroup::HC, smmu(0x228, 23), la(0x310, 16, 0xa5)),
    client(0x1c, "msencsrd", swgroup::MSENC, smmu(0x228, 28), la(0x328, 0, 0x80)),
    client(0x1d, "ppcsahbdmar", swgroup::PPCS, smmu(0x228, 29), la(0x344, 0, 0x50)),
    client(0x1e, "ppcsahbslvr", swgroup::PPCS, smmu(0x228, 30), la(0x344, 16, 0xe8)),
    client(0x26, "mpcorelpr", swgroup::MPCORELP, None, la(0x324, 0, 0x04)),
    client(0x27, "mpcorer", swgroup::MPCORE, None, la(0x320, 0, 0x04)),
];

static TEGRA114_SWGROUPS: [SmmuSwgroup; 16] = [
    SmmuSwgroup { swgroup: swgroup::DC, reg: 0x240 },
    SmmuSwgroup { swgroup: swgroup::DCB, reg: 0x244 },
    SmmuSwgroup { swgroup: swgroup::EPP, reg: 0x248 },
    SmmuSwgroup { swgroup: swgroup::G2, reg: 0x24c },
    SmmuSwgroup { swgroup: swgroup::AVPC, reg: 0x23c },
    SmmuSwgroup { swgroup: swgroup::NV, reg: 0x268 },
    SmmuSwgroup { swgroup: swgroup::HDA, reg: 0x254 },
    SmmuSwgroup { swgroup: swgroup::HC, reg: 0x250 },
    SmmuSwgroup { swgroup: swgroup::MSENC, reg: 0x264 },
    SmmuSwgroup { swgroup: swgroup::PPCS, reg: 0x270 },
    SmmuSwgroup { swgroup: swgroup::VDE, reg: 0x27c },
    SmmuSwgroup { swgroup: swgroup::VI, reg: 0x280 },
    SmmuSwgroup { swgroup: swgroup::ISP, reg: 0x258 },
    SmmuSwgroup { swgroup: swgroup::XUSB_HOST, reg: 0x288 },
    SmmuSwgroup { swgroup: swgroup::XUSB_DEV, reg: 0x28c },
    SmmuSwgroup { swgroup: swgroup::TSEC, reg: 0x294 },
];

/// Memory controller description of the tegra114 variant.
pub static TEGRA114_MC: McSoc = McSoc {
    name: "tegra114",
    clients: &TEGRA114_CLIENTS,
    hotresets: &TEGRA114_HOTRESETS,
    swgroups: &TEGRA114_SWGROUPS,
    num_address_bits: 32,
    atom_size: 32,
};
