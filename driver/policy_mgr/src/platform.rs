//! 外部协作者接口：监管库、硬件能力、DNBS、合法信道、并发许可、固件下发
//!
//! 策略管理器只通过 [`PolicyPlatform`] 访问这些外部状态。[`StaticPlatform`] 是表驱动实现，
//! 平台未接入真实监管库时可直接使用，也是单元测试里的替身。

use alloc::vec::Vec;

use axerrno::{AxError, AxResult};
use ieee80211::Nl80211Iftype;

use crate::chan_list::Pcl;
use crate::conn::ConnRegistry;
use crate::types::ConMode;

/// 策略管理器依赖的平台操作
pub trait PolicyPlatform {
    // ---------- 监管 ----------
    fn is_dfs(&self, chan: u8) -> bool;
    /// 被禁用（含 NOL 中的雷达信道）
    fn is_disabled(&self, chan: u8) -> bool;
    fn is_passive_or_disabled(&self, chan: u8) -> bool;
    /// ETSI13 SRD 信道
    fn is_srd(&self, chan: u8) -> bool;
    /// 监管域是否允许 SRD 信道工作在 master 模式
    fn is_srd_master_allowed(&self) -> bool;
    fn is_dsrc(&self, chan: u8) -> bool;

    // ---------- 硬件能力 ----------
    fn is_dbs_capable(&self) -> bool;
    /// 当前并发策略是否允许该工作模式使用 DBS
    fn is_dbs_allowed_for(&self, iftype: Nl80211Iftype) -> bool;

    // ---------- DNBS ----------
    /// 信道是否满足 do-not-back-off 调度；查询失败时整个 PCL 计算失败
    fn is_chan_ok_for_dnbs(&self, chan: u8) -> AxResult<bool>;

    // ---------- 合法信道 ----------
    /// 把合法信道写入 buf，返回写入个数
    fn valid_channels(&self, buf: &mut [u8]) -> AxResult<usize>;

    /// 在给定连接表状态下，mode 是否可以在 chan 上建立连接
    ///
    /// 实现可以自行对 `registry` 加锁。
    fn is_concurrency_allowed(&self, _registry: &ConnRegistry, _mode: ConMode, _chan: u8) -> bool {
        true
    }

    /// 把 PCL 下发给固件；默认未实现
    fn set_pcl_to_fw(&self, _mode: ConMode, _pcl: &Pcl) -> AxResult<()> {
        Err(AxError::Unsupported)
    }
}

/// 常见监管域下的合法信道（2.4G 1-13，5G UNII-1/2/2e/3）
pub const DEFAULT_VALID_CHANNELS: [u8; 38] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, //
    36, 40, 44, 48, 52, 56, 60, 64, //
    100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144, //
    149, 153, 157, 161, 165,
];

/// 默认 DFS 信道（UNII-2 / UNII-2e）
pub const DEFAULT_DFS_CHANNELS: [u8; 16] = [
    52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
];

/// 表驱动的平台实现
#[derive(Debug, Default)]
pub struct StaticPlatform {
    pub valid: Vec<u8>,
    pub dfs: Vec<u8>,
    pub disabled: Vec<u8>,
    pub passive: Vec<u8>,
    pub srd: Vec<u8>,
    pub dsrc: Vec<u8>,
    pub srd_master_allowed: bool,
    pub dbs_capable: bool,
    /// 允许 DBS 的工作模式；空表示全部允许
    pub dbs_denied: Vec<Nl80211Iftype>,
    /// DNBS 不允许的信道
    pub dnbs_blocked: Vec<u8>,
    /// 置位时 DNBS 查询返回错误
    pub dnbs_fail: bool,
    /// 置位时合法信道查询返回错误
    pub valid_fail: bool,
    /// 并发检查不允许 STA 的信道
    pub concurrency_denied: Vec<u8>,
    /// 最近一次下发给固件的 PCL
    pub fw_pcl: spin::Mutex<Option<(ConMode, Pcl)>>,
}

impl StaticPlatform {
    /// 默认信道表，无 DBS
    pub fn new() -> Self {
        Self {
            valid: DEFAULT_VALID_CHANNELS.to_vec(),
            dfs: DEFAULT_DFS_CHANNELS.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_valid(mut self, chans: &[u8]) -> Self {
        self.valid = chans.to_vec();
        self
    }

    pub fn with_dfs(mut self, chans: &[u8]) -> Self {
        self.dfs = chans.to_vec();
        self
    }

    pub fn with_disabled(mut self, chans: &[u8]) -> Self {
        self.disabled = chans.to_vec();
        self
    }

    pub fn with_passive(mut self, chans: &[u8]) -> Self {
        self.passive = chans.to_vec();
        self
    }

    pub fn with_srd(mut self, chans: &[u8], master_allowed: bool) -> Self {
        self.srd = chans.to_vec();
        self.srd_master_allowed = master_allowed;
        self
    }

    pub fn with_dsrc(mut self, chans: &[u8]) -> Self {
        self.dsrc = chans.to_vec();
        self
    }

    pub fn with_dbs(mut self, capable: bool) -> Self {
        self.dbs_capable = capable;
        self
    }

    pub fn deny_dbs_for(mut self, iftype: Nl80211Iftype) -> Self {
        self.dbs_denied.push(iftype);
        self
    }

    pub fn with_dnbs_blocked(mut self, chans: &[u8]) -> Self {
        self.dnbs_blocked = chans.to_vec();
        self
    }

    pub fn with_concurrency_denied(mut self, chans: &[u8]) -> Self {
        self.concurrency_denied = chans.to_vec();
        self
    }

    /// 取出最近一次下发的 PCL
    pub fn take_fw_pcl(&self) -> Option<(ConMode, Pcl)> {
        self.fw_pcl.lock().take()
    }
}

impl PolicyPlatform for StaticPlatform {
    fn is_dfs(&self, chan: u8) -> bool {
        self.dfs.contains(&chan)
    }

    fn is_disabled(&self, chan: u8) -> bool {
        self.disabled.contains(&chan)
    }

    fn is_passive_or_disabled(&self, chan: u8) -> bool {
        self.passive.contains(&chan) || self.is_disabled(chan)
    }

    fn is_srd(&self, chan: u8) -> bool {
        self.srd.contains(&chan)
    }

    fn is_srd_master_allowed(&self) -> bool {
        self.srd_master_allowed
    }

    fn is_dsrc(&self, chan: u8) -> bool {
        self.dsrc.contains(&chan)
    }

    fn is_dbs_capable(&self) -> bool {
        self.dbs_capable
    }

    fn is_dbs_allowed_for(&self, iftype: Nl80211Iftype) -> bool {
        !self.dbs_denied.contains(&iftype)
    }

    fn is_chan_ok_for_dnbs(&self, chan: u8) -> AxResult<bool> {
        if self.dnbs_fail {
            return Err(AxError::BadState);
        }
        Ok(!self.dnbs_blocked.contains(&chan))
    }

    fn valid_channels(&self, buf: &mut [u8]) -> AxResult<usize> {
        if self.valid_fail {
            return Err(AxError::Io);
        }
        let n = self.valid.len().min(buf.len());
        buf[..n].copy_from_slice(&self.valid[..n]);
        Ok(n)
    }

    fn is_concurrency_allowed(&self, _registry: &ConnRegistry, _mode: ConMode, chan: u8) -> bool {
        !self.concurrency_denied.contains(&chan)
    }

    fn set_pcl_to_fw(&self, mode: ConMode, pcl: &Pcl) -> AxResult<()> {
        log::debug!(target: "wireless::policy", "StaticPlatform set_pcl_to_fw mode={:?} len={}", mode, pcl.len());
        *self.fw_pcl.lock() = Some((mode, pcl.clone()));
        Ok(())
    }
}
