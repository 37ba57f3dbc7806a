//! PCL 计算与对外查询接口
//!
//! `get_pcl` 按当前连接数选择 PCL 类型：
//! - 0 条：第一条连接表；
//! - 1 条：按槽位 0 分类后查第二条连接表（DBS / 非 DBS）；
//! - 2..=3 条：三连接查表没有启用，返回 [`PclType::Max`]，展开时得到 `Unsupported`；
//! - 其它：`BadState`。
//!
//! 之后依次经过 PCL 展开、安全信道过滤、按模式修正、DNBS 过滤。

use alloc::vec::Vec;

use axerrno::{AxError, AxResult};

use crate::chan_list::Pcl;
use crate::conn::ConnTable;
use crate::filter;
use crate::index::{first_connection_index, second_connection_index, third_connection_index, TwoConnIndex};
use crate::mandatory;
use crate::manager::PolicyMgr;
use crate::platform::PolicyPlatform;
use crate::resolver::{ChannelListResolver, ValidChannelResolver};
use crate::tables::first_connection_pcl;
use crate::types::{
    ConMode, PclType, MAX_NUMBER_OF_CONC_CONNECTIONS, MAX_NUM_CHAN, WEIGHT_OF_DISALLOWED_CHANNELS,
    WEIGHT_OF_GROUP1_PCL_CHANNELS, WEIGHT_OF_NON_PCL_CHANNELS,
};

/// 找不到任何可用信道时的兜底（2.4G 6 信道，至少不会落入 5G MCC）
const FALLBACK_CHANNEL: u8 = ieee80211::CHAN_6;

/// 合法信道加权结果
///
/// `saved_chans` 长度不超过 [`MAX_NUM_CHAN`]，由构造时保证。
#[derive(Debug, Clone)]
pub struct PclChanWeights {
    pcl: Pcl,
    saved_chans: Vec<u8>,
    /// 与 `saved_chans` 一一对应的权重
    weighed_valid_list: [u8; MAX_NUM_CHAN],
}

impl PclChanWeights {
    /// `pcl` 为已算好的 PCL，`saved_chans` 为待加权的合法信道；超长直接失败
    pub fn new(pcl: Pcl, saved_chans: &[u8]) -> AxResult<Self> {
        if saved_chans.len() > MAX_NUM_CHAN {
            log::error!(target: "wireless::policy", "Invalid valid channel count {}", saved_chans.len());
            return Err(AxError::InvalidInput);
        }
        Ok(Self {
            pcl,
            saved_chans: saved_chans.to_vec(),
            weighed_valid_list: [WEIGHT_OF_DISALLOWED_CHANNELS; MAX_NUM_CHAN],
        })
    }

    pub fn pcl(&self) -> &Pcl {
        &self.pcl
    }

    pub fn saved_chans(&self) -> &[u8] {
        &self.saved_chans
    }

    pub fn weights(&self) -> &[u8] {
        &self.weighed_valid_list[..self.saved_chans.len()]
    }
}

impl<P: PolicyPlatform, R: ChannelListResolver> PolicyMgr<P, R> {
    /// 根据连接表选出 PCL 类型
    fn pcl_type_for(&self, conns: &ConnTable, mode: ConMode, raw_pref: u8) -> AxResult<PclType> {
        let pref = first_connection_index(raw_pref);
        let num = conns.count();
        log::debug!(target: "wireless::policy", "connection count {} mode {:?} pref {:?}", num, mode, pref);
        match num {
            0 => Ok(first_connection_pcl(mode, pref)),
            1 => {
                let index = second_connection_index(conns).ok_or_else(|| {
                    log::error!(target: "wireless::policy", "second index not found");
                    AxError::BadState
                })?;
                let dbs = self.platform.is_dbs_capable() && self.platform.is_dbs_allowed_for(mode.iftype());
                Ok(self.tables.second_connection_pcl(index, mode, pref, dbs))
            }
            n if n <= MAX_NUMBER_OF_CONC_CONNECTIONS => {
                log::debug!(target: "wireless::policy", "pcl for {} existing connections not supported", n);
                Ok(PclType::Max)
            }
            n => {
                log::error!(target: "wireless::policy", "unexpected connection count {}", n);
                Err(AxError::BadState)
            }
        }
    }

    /// 在给定连接表（调用方持锁）上计算 PCL
    fn compute_pcl(&self, conns: &ConnTable, mode: ConMode, out: &mut Pcl) -> AxResult<()> {
        let state = self.state.lock();
        let pcl_type = self.pcl_type_for(conns, mode, state.conc_system_pref)?;
        self.resolver
            .get_channel_list(&self.platform, conns, pcl_type, mode, out)
            .map_err(|e| {
                log::error!(target: "wireless::policy", "failed to get channel list for {:?}: {:?}", pcl_type, e);
                e
            })?;
        out.dump("pcl from resolver");
        filter::apply(&self.platform, out, mode, &state.filter_ctx(conns))
    }

    /// 当前状态下请求模式对应的 PCL 类型
    pub fn get_pcl_type(&self, mode: ConMode) -> AxResult<PclType> {
        let conns = self.conns.lock();
        let pref = self.state.lock().conc_system_pref;
        self.pcl_type_for(&conns, mode, pref)
    }

    /// 新连接的首选信道列表
    pub fn get_pcl(&self, mode: ConMode) -> AxResult<Pcl> {
        let conns = self.conns.lock();
        let mut pcl = Pcl::new();
        self.compute_pcl(&conns, mode, &mut pcl)?;
        Ok(pcl)
    }

    /// 已有连接的 PCL：假设该模式的连接不存在再计算，结束后恢复连接表
    ///
    /// 没有该模式的连接时返回空列表。
    pub fn get_pcl_for_existing_conn(&self, mode: ConMode, all_matching: bool) -> AxResult<Pcl> {
        let mut conns = self.conns.lock();
        let mut pcl = Pcl::new();
        if conns.mode_count(mode) == 0 {
            log::debug!(target: "wireless::policy", "no existing connection of mode {:?}", mode);
            return Ok(pcl);
        }
        let removed = conns.simulate_removal(mode, all_matching);
        self.compute_pcl(&removed, mode, &mut pcl)?;
        Ok(pcl)
    }

    /// 首选的非 DFS 信道；找不到时返回 6
    pub fn get_nondfs_preferred_channel(&self, mode: ConMode, for_existing_conn: bool) -> u8 {
        let pcl = if for_existing_conn {
            let present = self.conns.lock().first_nondfs_channel(|c| self.platform.is_dfs(c));
            if let Some(chan) = present {
                return chan;
            }
            self.get_pcl_for_existing_conn(mode, false)
        } else {
            self.get_pcl(mode)
        };
        match pcl {
            Ok(pcl) => pcl
                .channels()
                .iter()
                .copied()
                .find(|&c| !self.platform.is_dfs(c))
                .unwrap_or(FALLBACK_CHANNEL),
            Err(_) => FALLBACK_CHANNEL,
        }
    }

    /// SAP 强制信道中最优的一个
    pub fn get_sap_mandatory_channel(&self) -> AxResult<u8> {
        let mut pcl = self.get_pcl_for_existing_conn(ConMode::Sap, false).map_err(|e| {
            log::error!(target: "wireless::policy", "Unable to get PCL for SAP");
            e
        })?;
        if pcl.is_empty() && self.conns.mode_count(ConMode::Sap) == 0 {
            log::debug!(target: "wireless::policy", "no existing SAP pcl, use new connection pcl");
            pcl = self.get_pcl(ConMode::Sap)?;
        }
        {
            let state = self.state.lock();
            if state.mandatory.is_set() {
                mandatory::intersect(&mut pcl, state.mandatory.as_slice());
            }
        }
        let chan = pcl.first().ok_or_else(|| {
            log::error!(target: "wireless::policy", "No common channel between mandatory list & PCL");
            AxError::NotFound
        })?;
        log::debug!(target: "wireless::policy", "mandatory channel:{}", chan);
        Ok(chan)
    }

    /// 给合法信道加权：PCL 内取 PCL 权重；
    /// 有 STA 时，并发检查允许 STA 的信道记为 NON_PCL；其余为 DISALLOWED
    pub fn get_valid_chan_weights(&self, weight: &mut PclChanWeights) -> AxResult<()> {
        if weight.saved_chans.len() > MAX_NUM_CHAN {
            log::error!(target: "wireless::policy", "Invalid valid channel count {}", weight.saved_chans.len());
            return Err(AxError::InvalidInput);
        }
        weight.weighed_valid_list.fill(WEIGHT_OF_DISALLOWED_CHANNELS);
        if self.conns.mode_count(ConMode::Sta) > 0 {
            // 摘除后锁已释放，并发检查会自行加锁
            let detached = self.conns.detach(ConMode::Sta, false);
            for (i, &chan) in weight.saved_chans.iter().enumerate() {
                if self.platform.is_concurrency_allowed(&self.conns, ConMode::Sta, chan) {
                    weight.weighed_valid_list[i] = WEIGHT_OF_NON_PCL_CHANNELS;
                }
            }
            drop(detached);
        }
        for (i, &chan) in weight.saved_chans.iter().enumerate() {
            if let Some(w) = weight.pcl.weight_of(chan) {
                weight.weighed_valid_list[i] = w;
            }
        }
        Ok(())
    }

    /// 合法信道（不含 DSRC）
    pub fn get_valid_chans(&self) -> AxResult<Vec<u8>> {
        ValidChannelResolver::valid_channels(&self.platform)
    }

    /// 把外部给定的信道范围当作 group1 PCL，经过同样的过滤流水线
    pub fn get_valid_chans_from_range(&self, chans: &[u8], mode: ConMode) -> AxResult<Pcl> {
        let mut pcl = Pcl::with_weight(chans, WEIGHT_OF_GROUP1_PCL_CHANNELS)?;
        let conns = self.conns.lock();
        let state = self.state.lock();
        filter::apply(&self.platform, &mut pcl, mode, &state.filter_ctx(&conns)).map_err(|e| {
            log::error!(target: "wireless::policy", "failed to get modified pcl for mode {:?}", mode);
            e
        })?;
        Ok(pcl)
    }

    /// SAP 的备选信道（PCL 第一项），无则 0
    pub fn get_alternate_channel_for_sap(&self) -> u8 {
        self.get_pcl(ConMode::Sap)
            .ok()
            .and_then(|pcl| pcl.first())
            .unwrap_or(0)
    }

    /// mode（可选限定 vdev）的工作信道，无则 0
    pub fn get_channel(&self, mode: ConMode, vdev_id: Option<u32>) -> u8 {
        self.conns.lock().get_channel(mode, vdev_id)
    }

    /// 第一条 mode 连接的工作信道，无则 0
    pub fn mode_specific_get_channel(&self, mode: ConMode) -> u8 {
        self.conns.lock().mode_specific_get_channel(mode)
    }

    /// 两条连接时第三条连接的查表下标（分类可用，但 get_pcl 尚未使用）
    pub fn get_third_connection_pcl_table_index(&self) -> Option<TwoConnIndex> {
        third_connection_index(&self.conns.lock())
    }

    /// 会话结束：删除连接；如仍有 STA，重新计算其 PCL 并下发固件
    ///
    /// 只有 vdev 不存在时返回错误；连接删除后，PCL 计算或下发失败只记录日志。
    pub fn decr_session_set_pcl(&self, vdev_id: u32) -> AxResult<()> {
        let info = self.conns.remove_by_vdev(vdev_id).ok_or_else(|| {
            log::debug!(target: "wireless::policy", "Invalid active session, vdev {}", vdev_id);
            AxError::NotFound
        })?;
        log::info!(target: "wireless::policy", "vdev {} mode {:?} removed", vdev_id, info.mode);
        if self.conns.mode_count(ConMode::Sta) == 0 {
            return Ok(());
        }
        let pushed = self
            .get_pcl_for_existing_conn(ConMode::Sta, false)
            .and_then(|pcl| self.platform.set_pcl_to_fw(ConMode::Sta, &pcl));
        if let Err(e) = pushed {
            log::error!(target: "wireless::policy", "failed to set sta pcl to fw: {:?}", e);
        }
        Ok(())
    }
}
