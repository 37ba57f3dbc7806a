//! 策略管理器上下文
//!
//! 持有连接表、注入的 PCL 表、平台协作者、PCL 展开器以及可变策略状态。
//! 加锁顺序固定为：conc_list_lock（连接表） -> 策略状态锁。

use alloc::vec::Vec;

use axerrno::AxResult;

use crate::cfgfile::PolicyUserCfg;
use crate::conn::{ConnRegistry, ConnTable};
use crate::filter::{skip_dfs_channels, FilterCtx};
use crate::mandatory::MandatoryChannels;
use crate::platform::PolicyPlatform;
use crate::resolver::{ChannelListResolver, ValidChannelResolver};
use crate::tables::PclTables;
use crate::types::{ConMode, MAX_NUM_CHAN};

/// 运行期可变的策略状态
#[derive(Debug, Default)]
pub(crate) struct PolicyState {
    /// 系统偏好原始值，查表前再做钳位
    pub(crate) conc_system_pref: u8,
    pub(crate) enable_dfs_master_cap: bool,
    pub(crate) sta_sap_scc_on_dfs_chan: bool,
    /// 频率规避通知给出的不安全信道
    pub(crate) unsafe_chans: Vec<u8>,
    pub(crate) mandatory: MandatoryChannels,
}

impl PolicyState {
    /// 基于当前连接表生成过滤上下文
    pub(crate) fn filter_ctx(&self, conns: &ConnTable) -> FilterCtx<'_> {
        FilterCtx {
            unsafe_chans: &self.unsafe_chans,
            mandatory: self.mandatory.as_slice(),
            skip_dfs: skip_dfs_channels(
                self.enable_dfs_master_cap,
                conns.mode_count(ConMode::Sta),
                self.sta_sap_scc_on_dfs_chan,
            ),
        }
    }
}

/// 并发策略管理器
pub struct PolicyMgr<P: PolicyPlatform, R: ChannelListResolver = ValidChannelResolver> {
    pub(crate) conns: ConnRegistry,
    pub(crate) tables: PclTables,
    pub(crate) platform: P,
    pub(crate) resolver: R,
    pub(crate) state: spin::Mutex<PolicyState>,
}

impl<P: PolicyPlatform> PolicyMgr<P> {
    pub fn new(platform: P, tables: PclTables) -> Self {
        Self::with_resolver(platform, tables, ValidChannelResolver)
    }
}

impl<P: PolicyPlatform, R: ChannelListResolver> PolicyMgr<P, R> {
    pub fn with_resolver(platform: P, tables: PclTables, resolver: R) -> Self {
        log::info!(target: "wireless::policy", "policy manager created");
        Self {
            conns: ConnRegistry::new(),
            tables,
            platform,
            resolver,
            state: spin::Mutex::new(PolicyState::default()),
        }
    }

    /// 连接表（上层增删连接用）
    pub fn registry(&self) -> &ConnRegistry {
        &self.conns
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// 应用用户配置；强制信道非法时返回错误，其余配置已生效
    pub fn apply_cfg(&self, cfg: &PolicyUserCfg) -> AxResult<()> {
        {
            let mut state = self.state.lock();
            state.conc_system_pref = cfg.conc_system_pref;
            state.enable_dfs_master_cap = cfg.enable_dfs_master_cap;
            state.sta_sap_scc_on_dfs_chan = cfg.sta_sap_scc_on_dfs_chan;
        }
        if cfg.sap_mandatory_channels.is_empty() {
            return Ok(());
        }
        self.set_sap_mandatory_channels(&cfg.sap_mandatory_channels)
    }

    /// 设置系统偏好（原始值，非法值在查表时按吞吐优先处理）
    pub fn set_conc_system_pref(&self, pref: u8) {
        self.state.lock().conc_system_pref = pref;
        log::debug!(target: "wireless::policy", "conc system pref set to {}", pref);
    }

    pub fn set_dfs_master_cap(&self, enable: bool) {
        self.state.lock().enable_dfs_master_cap = enable;
    }

    pub fn set_sta_sap_scc_on_dfs_chan(&self, allow: bool) {
        self.state.lock().sta_sap_scc_on_dfs_chan = allow;
    }

    /// 频率规避通知：整体替换不安全信道表，超出容量的部分丢弃
    pub fn update_unsafe_channels(&self, chans: &[u8]) {
        let n = chans.len().min(MAX_NUM_CHAN);
        let mut state = self.state.lock();
        state.unsafe_chans.clear();
        state.unsafe_chans.extend_from_slice(&chans[..n]);
        log::debug!(target: "wireless::policy", "Channel list update, received {} avoided channels", n);
    }

    pub fn unsafe_channels(&self) -> Vec<u8> {
        self.state.lock().unsafe_chans.clone()
    }

    pub fn set_sap_mandatory_channels(&self, chans: &[u8]) -> AxResult<()> {
        self.state.lock().mandatory.set(chans)
    }

    pub fn clear_sap_mandatory_channels(&self) {
        self.state.lock().mandatory.clear();
    }

    pub fn is_sap_mandatory_channel_set(&self) -> bool {
        self.state.lock().mandatory.is_set()
    }
}
