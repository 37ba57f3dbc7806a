//! SAP 强制信道集合

use axerrno::{AxError, AxResult};
use ieee80211::is_24ghz_ch;

use crate::chan_list::Pcl;
use crate::types::MAX_NUM_CHAN;

/// 列表中是否至少有一个 2.4G 信道
pub fn list_has_24ghz_channel(list: &[u8]) -> bool {
    list.iter().any(|&c| is_24ghz_ch(c))
}

/// 只保留同时出现在强制集合中的信道，顺序以 PCL 为准
pub fn intersect(pcl: &mut Pcl, mandatory: &[u8]) {
    pcl.retain(|c| mandatory.contains(&c));
    pcl.dump("after mandatory channel intersection");
}

/// 运维配置的强制信道
#[derive(Clone, PartialEq, Eq)]
pub struct MandatoryChannels {
    chans: [u8; MAX_NUM_CHAN],
    len: usize,
}

impl Default for MandatoryChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MandatoryChannels {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl MandatoryChannels {
    pub const fn new() -> Self {
        Self {
            chans: [0; MAX_NUM_CHAN],
            len: 0,
        }
    }

    /// 替换整个集合。空列表、超长列表或没有 2.4G 信道时失败，原集合不变。
    pub fn set(&mut self, list: &[u8]) -> AxResult<()> {
        if list.is_empty() || list.len() > MAX_NUM_CHAN {
            log::error!(target: "wireless::policy", "invalid mandatory channel count {}", list.len());
            return Err(AxError::InvalidInput);
        }
        if !list_has_24ghz_channel(list) {
            log::error!(target: "wireless::policy", "2.4G channel not present in mandatory list");
            return Err(AxError::InvalidInput);
        }
        self.chans = [0; MAX_NUM_CHAN];
        self.chans[..list.len()].copy_from_slice(list);
        self.len = list.len();
        log::info!(target: "wireless::policy", "sap mandatory channels set, count {}", self.len);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.chans = [0; MAX_NUM_CHAN];
        self.len = 0;
    }

    pub fn is_set(&self) -> bool {
        self.len != 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.chans[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_requires_a_24ghz_member() {
        let mut m = MandatoryChannels::new();
        m.set(&[1, 36]).unwrap();
        assert_eq!(m.as_slice(), &[1, 36]);

        assert_eq!(m.set(&[36, 149]).unwrap_err(), AxError::InvalidInput);
        assert_eq!(m.set(&[]).unwrap_err(), AxError::InvalidInput);
        assert_eq!(m.as_slice(), &[1, 36]);

        m.clear();
        assert!(!m.is_set());
    }

    #[test]
    fn intersection_is_idempotent() {
        let mut pcl = Pcl::from_parts(&[149, 36, 6, 1], &[255, 240, 225, 210]).unwrap();
        intersect(&mut pcl, &[1, 149, 11]);
        let once = pcl.clone();
        intersect(&mut pcl, &[1, 149, 11]);
        assert_eq!(pcl, once);
        assert_eq!(pcl.channels(), &[149, 1]);
        assert_eq!(pcl.weights(), &[255, 210]);
    }

    #[test]
    fn has_24ghz() {
        assert!(list_has_24ghz_channel(&[36, 14]));
        assert!(!list_has_24ghz_channel(&[36, 149]));
        assert!(!list_has_24ghz_channel(&[]));
    }
}
