//! # ieee80211: IEEE 802.11 / cfg80211 抽象
//!
//! 策略管理器（policy_mgr）依赖的最小 802.11 子集：频段、信道号判定、
//! 以及 cfg80211 虚拟接口类型（作为“工作模式类别”供 DBS 许可判定使用）。
//!
//! ## 模块与 Linux 对应
//!
//! | 模块      | Linux 位置                    | 说明 |
//! |-----------|-------------------------------|------|
//! | ieee80211 | include/linux/ieee80211.h     | 频段、信道号与中心频率换算 |
//! | cfg80211  | net/cfg80211.h                | NL80211_IFTYPE_* |

#![cfg_attr(not(test), no_std)]

pub mod cfg80211;
pub mod ieee80211;

pub use cfg80211::Nl80211Iftype;
pub use ieee80211::{
    chan_to_band, chan_to_freq, freq_to_chan, is_24ghz_ch, is_5ghz_ch, is_6ghz_ch, Band,
    CHAN_6, MAX_24GHZ_CHAN, MAX_5GHZ_CHAN, MIN_24GHZ_CHAN, MIN_5GHZ_CHAN,
};
