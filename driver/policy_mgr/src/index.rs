//! 查表下标分类：把当前连接表映射为各 PCL 表的下标
//!
//! - 0 条连接：下标即系统偏好；
//! - 1 条连接：`<角色>_<频段>_<天线>`，共 5×2×2 = 20 种；
//! - 2 条连接：`<角色对>_<SCC|MCC|DBS|SBS>_<频段>_<天线>`，每个角色对 13 种。
//!
//! 天线配置一律取槽位 0 的连接。无法分类时返回 `None`（即表的 MAX 哨兵）。

use ieee80211::{is_24ghz_ch, is_5ghz_ch};

use crate::conn::{ConnInfo, ConnTable};
use crate::types::{ChainMask, ConMode, ConcPriorityMode};

/// 信道所属频段类别：非 2.4G 一律按 5G 处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BandClass {
    Band24 = 0,
    Band5 = 1,
}

impl BandClass {
    #[inline]
    pub fn of(chan: u8) -> Self {
        if is_24ghz_ch(chan) {
            BandClass::Band24
        } else {
            BandClass::Band5
        }
    }
}

/// 0 条连接时的下标：系统偏好，非法值按 Throughput
pub fn first_connection_index(raw_pref: u8) -> ConcPriorityMode {
    ConcPriorityMode::from_raw(raw_pref).unwrap_or_default()
}

/// 1 条连接时的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneConnIndex {
    pub role: ConMode,
    pub band: BandClass,
    pub chains: ChainMask,
}

impl OneConnIndex {
    /// 下标总数（PM_MAX_ONE_CONNECTION_MODE）
    pub const COUNT: usize = 20;

    /// 稠密下标：STA_24_1x1, STA_24_2x2, STA_5_1x1, STA_5_2x2, SAP_24_1x1 ...
    #[inline]
    pub const fn index(&self) -> usize {
        self.role.index() * 4 + (self.band as usize) * 2 + self.chains as usize
    }
}

/// 1 条连接时，根据槽位 0 的连接得到第二条连接的查表下标
pub fn second_connection_index(conns: &ConnTable) -> Option<OneConnIndex> {
    let e = conns.entry(0)?;
    let index = OneConnIndex {
        role: e.mode,
        band: BandClass::of(e.chan),
        chains: e.chain_mask,
    };
    log::debug!(
        target: "wireless::policy",
        "mode:{:?} chan:{} chain:{:?} index:{}",
        e.mode, e.chan, e.chain_mask, index.index()
    );
    Some(index)
}

/// 已知的角色组合（与顺序无关）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RolePair {
    P2pCliSap = 0,
    StaSap = 1,
    SapSap = 2,
    StaP2pGo = 3,
    StaP2pCli = 4,
    P2pGoP2pCli = 5,
    P2pGoSap = 6,
    StaSta = 7,
}

impl RolePair {
    pub fn of(a: ConMode, b: ConMode) -> Option<Self> {
        use ConMode::*;
        let pair = match (a, b) {
            (P2pClient, Sap) | (Sap, P2pClient) => RolePair::P2pCliSap,
            (Sta, Sap) | (Sap, Sta) => RolePair::StaSap,
            (Sap, Sap) => RolePair::SapSap,
            (Sta, P2pGo) | (P2pGo, Sta) => RolePair::StaP2pGo,
            (Sta, P2pClient) | (P2pClient, Sta) => RolePair::StaP2pCli,
            (P2pGo, P2pClient) | (P2pClient, P2pGo) => RolePair::P2pGoP2pCli,
            (Sap, P2pGo) | (P2pGo, Sap) => RolePair::P2pGoSap,
            (Sta, Sta) => RolePair::StaSta,
            _ => return None,
        };
        Some(pair)
    }
}

/// MCC 时两条连接的频段组合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MccBand {
    Band24,
    Band5,
    Band24And5,
}

/// 两条连接的空间关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// 同信道
    Scc(BandClass),
    /// 同 MAC 异信道（分时）
    Mcc(MccBand),
    /// 不同 MAC，跨频段
    Dbs,
    /// 不同 MAC，均在 5G；只有 1x1
    Sbs,
}

/// 2 条连接时的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoConnIndex {
    pub pair: RolePair,
    pub relation: Relation,
    pub chains: ChainMask,
}

impl TwoConnIndex {
    /// 每个角色对的下标数
    pub const PER_PAIR: usize = 13;
    /// 下标总数（PM_MAX_TWO_CONNECTION_MODE）
    pub const COUNT: usize = 8 * Self::PER_PAIR;

    pub const fn index(&self) -> usize {
        let chains = self.chains as usize;
        let sub = match self.relation {
            Relation::Scc(BandClass::Band24) => chains,
            Relation::Scc(BandClass::Band5) => 2 + chains,
            Relation::Mcc(MccBand::Band24) => 4 + chains,
            Relation::Mcc(MccBand::Band5) => 6 + chains,
            Relation::Mcc(MccBand::Band24And5) => 8 + chains,
            Relation::Dbs => 10 + chains,
            Relation::Sbs => 12,
        };
        self.pair as usize * Self::PER_PAIR + sub
    }
}

/// 判定两条连接的关系；SBS 只定义了 1x1，2x2 返回 None
fn classify_relation(c0: &ConnInfo, c1: &ConnInfo) -> Option<Relation> {
    if c0.chan == c1.chan {
        return Some(Relation::Scc(BandClass::of(c0.chan)));
    }
    if c0.mac == c1.mac {
        let band = if is_24ghz_ch(c0.chan) && is_24ghz_ch(c1.chan) {
            MccBand::Band24
        } else if is_5ghz_ch(c0.chan) && is_5ghz_ch(c1.chan) {
            MccBand::Band5
        } else {
            MccBand::Band24And5
        };
        return Some(Relation::Mcc(band));
    }
    if is_5ghz_ch(c0.chan) && is_5ghz_ch(c1.chan) {
        return match c0.chain_mask {
            ChainMask::OneOne => Some(Relation::Sbs),
            ChainMask::TwoTwo => None,
        };
    }
    Some(Relation::Dbs)
}

/// 对任意两条连接分类（纯函数）
pub fn classify_pair(c0: &ConnInfo, c1: &ConnInfo) -> Option<TwoConnIndex> {
    let pair = RolePair::of(c0.mode, c1.mode)?;
    let relation = classify_relation(c0, c1)?;
    Some(TwoConnIndex {
        pair,
        relation,
        chains: c0.chain_mask,
    })
}

/// 2 条连接时，根据槽位 0、1 得到第三条连接的查表下标
pub fn third_connection_index(conns: &ConnTable) -> Option<TwoConnIndex> {
    let (c0, c1) = (conns.entry(0)?, conns.entry(1)?);
    let index = classify_pair(c0, c1);
    log::debug!(
        target: "wireless::policy",
        "mode0:{:?} mode1:{:?} chan0:{} chan1:{} chain:{:?} index:{:?}",
        c0.mode, c1.mode, c0.chan, c1.chan, c0.chain_mask, index.map(|i| i.index())
    );
    index
}
