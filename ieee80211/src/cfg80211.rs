//! cfg80211 抽象
//!
//! 对应 Linux net/cfg80211.h 中的接口类型。策略管理器把并发角色映射到这里的
//! `Nl80211Iftype`，再据此向硬件层询问 DBS 是否允许。

/// 虚拟接口类型（对应 NL80211_IFTYPE_*）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Nl80211Iftype {
    #[default]
    Unspecified = 0,
    AdHoc = 1,
    Station = 2,
    Ap = 3,
    ApVlan = 4,
    Wds = 5,
    Monitor = 6,
    MeshPoint = 7,
    P2pClient = 8,
    P2pGo = 9,
    P2pDevice = 10,
}
