//! PCL 类型 -> 具体 (信道, 权重) 列表
//!
//! 每种 [`PclType`] 展开成若干“组”，按组序依次追加，第 n 组取 `group_weight(n)`。
//! 已出现过的信道不会重复加入，列表满后截断。

use alloc::vec::Vec;

use axerrno::{AxError, AxResult};
use ieee80211::is_24ghz_ch;

use crate::chan_list::Pcl;
use crate::conn::ConnTable;
use crate::platform::PolicyPlatform;
use crate::types::{group_weight, ConMode, PclType, MAX_NUM_CHAN};

/// PCL 展开器
pub trait ChannelListResolver {
    /// 把 `pcl` 展开到 `out`（先清空）。`conns` 是当前（可能已摘除部分连接的）连接表。
    fn get_channel_list<P: PolicyPlatform + ?Sized>(
        &self,
        platform: &P,
        conns: &ConnTable,
        pcl: PclType,
        mode: ConMode,
        out: &mut Pcl,
    ) -> AxResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Band24,
    Band5,
    /// 已有连接使用的信道
    Scc,
    Scc24,
    Scc5,
    Mcc,
}

fn groups_of(pcl: PclType) -> Option<&'static [Group]> {
    use Group::*;
    let groups: &'static [Group] = match pcl {
        PclType::None => &[],
        PclType::Pcl24G => &[Band24],
        PclType::Pcl5G => &[Band5],
        PclType::SccCh => &[Scc],
        PclType::MccCh => &[Mcc],
        PclType::SccCh24G => &[Scc, Band24],
        PclType::SccCh5G => &[Scc, Band5],
        PclType::Pcl24GSccCh => &[Band24, Scc],
        PclType::Pcl5GSccCh => &[Band5, Scc],
        PclType::SccOn5SccOn24Pcl24G => &[Scc5, Scc24, Band24],
        PclType::SccOn5SccOn24Pcl5G => &[Scc5, Scc24, Band5],
        PclType::SccOn24SccOn5Pcl24G => &[Scc24, Scc5, Band24],
        PclType::SccOn24SccOn5Pcl5G => &[Scc24, Scc5, Band5],
        PclType::SccOn5SccOn24 => &[Scc5, Scc24],
        PclType::SccOn24SccOn5 => &[Scc24, Scc5],
        PclType::MccCh24G => &[Mcc, Band24],
        PclType::MccCh5G => &[Mcc, Band5],
        PclType::Pcl24GMccCh => &[Band24, Mcc],
        PclType::Pcl5GMccCh => &[Band5, Mcc],
        PclType::Max => return None,
    };
    Some(groups)
}

/// 基于合法信道表的默认展开器
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidChannelResolver;

impl ValidChannelResolver {
    /// 合法信道（已去掉 DSRC）
    pub fn valid_channels<P: PolicyPlatform + ?Sized>(platform: &P) -> AxResult<Vec<u8>> {
        let mut buf = [0u8; MAX_NUM_CHAN];
        let n = platform.valid_channels(&mut buf).map_err(|e| {
            log::error!(target: "wireless::policy", "failed to get valid channel list: {:?}", e);
            e
        })?;
        Ok(buf[..n.min(MAX_NUM_CHAN)]
            .iter()
            .copied()
            .filter(|&c| c != 0 && !platform.is_dsrc(c))
            .collect())
    }
}

impl ChannelListResolver for ValidChannelResolver {
    fn get_channel_list<P: PolicyPlatform + ?Sized>(
        &self,
        platform: &P,
        conns: &ConnTable,
        pcl: PclType,
        mode: ConMode,
        out: &mut Pcl,
    ) -> AxResult<()> {
        out.clear();
        let groups = groups_of(pcl).ok_or_else(|| {
            log::error!(target: "wireless::policy", "invalid pcl type {:?} for mode {:?}", pcl, mode);
            AxError::Unsupported
        })?;
        if groups.is_empty() {
            log::debug!(target: "wireless::policy", "no preference for mode {:?}", mode);
            return Ok(());
        }

        let valid = Self::valid_channels(platform)?;
        let in_use: Vec<u8> = conns.live().map(|e| e.chan).filter(|&c| c != 0).collect();

        for (n, group) in groups.iter().enumerate() {
            let weight = group_weight(n);
            let chans = valid.iter().copied();
            let used = in_use.iter().copied();
            let full = match group {
                Group::Band24 => push_all(out, chans.filter(|&c| is_24ghz_ch(c)), weight),
                Group::Band5 => push_all(out, chans.filter(|&c| !is_24ghz_ch(c)), weight),
                Group::Scc | Group::Mcc => push_all(out, used, weight),
                Group::Scc24 => push_all(out, used.filter(|&c| is_24ghz_ch(c)), weight),
                Group::Scc5 => push_all(out, used.filter(|&c| !is_24ghz_ch(c)), weight),
            };
            if full {
                log::warn!(target: "wireless::policy", "pcl truncated at {} channels", MAX_NUM_CHAN);
                break;
            }
        }
        log::debug!(target: "wireless::policy", "pcl type {:?} mode {:?} -> {} channels", pcl, mode, out.len());
        Ok(())
    }
}

/// 追加一组信道；返回列表是否已满
fn push_all<I: Iterator<Item = u8>>(out: &mut Pcl, chans: I, weight: u8) -> bool {
    for chan in chans {
        if !out.push(chan, weight) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conn::ConnInfo;
    use crate::platform::StaticPlatform;
    use crate::types::{ChainMask, WEIGHT_OF_GROUP1_PCL_CHANNELS, WEIGHT_OF_GROUP2_PCL_CHANNELS};

    fn resolve(platform: &StaticPlatform, conns: &ConnTable, pcl: PclType) -> AxResult<Pcl> {
        let mut out = Pcl::new();
        ValidChannelResolver.get_channel_list(platform, conns, pcl, ConMode::Sap, &mut out)?;
        Ok(out)
    }

    #[test]
    fn pcl_5g_lists_only_5ghz_valid_channels() {
        let platform = StaticPlatform::new().with_valid(&[1, 6, 11, 36, 40, 149]);
        let pcl = resolve(&platform, &ConnTable::new(), PclType::Pcl5G).unwrap();
        assert_eq!(pcl.channels(), &[36, 40, 149]);
        assert!(pcl.weights().iter().all(|&w| w == WEIGHT_OF_GROUP1_PCL_CHANNELS));
    }

    #[test]
    fn scc_group_comes_first_and_is_not_repeated() {
        let platform = StaticPlatform::new().with_valid(&[1, 6, 11, 36]);
        let mut conns = ConnTable::new();
        conns.add(ConnInfo::new(ConMode::Sta, 6, ChainMask::OneOne, 0, 0)).unwrap();
        let pcl = resolve(&platform, &conns, PclType::SccCh24G).unwrap();
        assert_eq!(pcl.channels(), &[6, 1, 11]);
        assert_eq!(pcl.weight_of(6), Some(WEIGHT_OF_GROUP1_PCL_CHANNELS));
        assert_eq!(pcl.weight_of(1), Some(WEIGHT_OF_GROUP2_PCL_CHANNELS));
    }

    #[test]
    fn dsrc_channels_are_never_listed() {
        let platform = StaticPlatform::new().with_valid(&[36, 165, 172]).with_dsrc(&[172]);
        let pcl = resolve(&platform, &ConnTable::new(), PclType::Pcl5G).unwrap();
        assert_eq!(pcl.channels(), &[36, 165]);
    }

    #[test]
    fn none_is_empty_and_max_is_unsupported() {
        let platform = StaticPlatform::new();
        assert!(resolve(&platform, &ConnTable::new(), PclType::None).unwrap().is_empty());
        assert_eq!(
            resolve(&platform, &ConnTable::new(), PclType::Max).unwrap_err(),
            AxError::Unsupported
        );
    }

    #[test]
    fn valid_channel_failure_propagates() {
        let mut platform = StaticPlatform::new();
        platform.valid_fail = true;
        assert_eq!(
            resolve(&platform, &ConnTable::new(), PclType::Pcl24G).unwrap_err(),
            AxError::Io
        );
    }
}
