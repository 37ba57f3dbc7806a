//! wireless crate
//!
//! 多角色并发时的信道策略：
//! - ieee80211: 频段、信道号判定、cfg80211 接口类型
//! - policy_mgr: 连接表、PCL 优先级表、过滤流水线与查询接口

#![cfg_attr(not(test), no_std)]

pub use ieee80211;
pub use policy_mgr;

use axerrno::AxResult;
use policy_mgr::{parse_policy_configfile, PclTables, PolicyMgr, PolicyPlatform, PolicyUserCfg, StaticPlatform};

/// 无线策略上下文：平台初始化时创建，交给连接管理等上层使用
pub struct WirelessPolicy<P: PolicyPlatform> {
    pub policy: PolicyMgr<P>,
}

impl<P: PolicyPlatform> WirelessPolicy<P> {
    pub fn new(platform: P, tables: PclTables) -> Self {
        Self {
            policy: PolicyMgr::new(platform, tables),
        }
    }

    /// 创建上下文并应用策略配置文件
    pub fn with_configfile(platform: P, tables: PclTables, file_data: &[u8]) -> AxResult<Self> {
        let ctx = Self::new(platform, tables);
        let mut cfg = PolicyUserCfg::default();
        parse_policy_configfile(file_data, &mut cfg)?;
        ctx.policy.apply_cfg(&cfg)?;
        log::info!(target: "wireless", "wireless: policy config applied, pref {}", cfg.conc_system_pref);
        Ok(ctx)
    }

    pub fn policy(&self) -> &PolicyMgr<P> {
        &self.policy
    }
}

/// 使用表驱动平台与默认 PCL 表的初始化（监管库 / 固件未接入时可用）
///
/// 平台接入真实监管库与固件后，改为创建 `WirelessPolicy<RealPlatform>`，
/// 并由宿主注入产品自己的第二条连接 PCL 表。
pub fn wireless_policy_init_stub() -> WirelessPolicy<StaticPlatform> {
    log::info!(target: "wireless", "wireless: init stub policy (StaticPlatform)");
    WirelessPolicy::new(StaticPlatform::new(), PclTables::default())
}
