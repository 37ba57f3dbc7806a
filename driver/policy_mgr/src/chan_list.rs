//! Pcl：定长的 (信道, 权重) 列表
//!
//! 布局：`channels[..len]` 与 `weights[..len]` 一一对应（同下标即同一信道的权重）。
//! 容量固定为 [`MAX_NUM_CHAN`]，不会增长；各过滤阶段都在原地压缩，保持相对顺序。

use axerrno::{AxError, AxResult};

use crate::types::MAX_NUM_CHAN;

/// 首选信道列表（下标越小越优先）
#[derive(Clone, PartialEq, Eq)]
pub struct Pcl {
    channels: [u8; MAX_NUM_CHAN],
    weights: [u8; MAX_NUM_CHAN],
    len: usize,
}

impl Default for Pcl {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Pcl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Pcl {
    pub const fn new() -> Self {
        Self {
            channels: [0; MAX_NUM_CHAN],
            weights: [0; MAX_NUM_CHAN],
            len: 0,
        }
    }

    /// 由外部提供的信道/权重数组构造。
    ///
    /// 长度超过 [`MAX_NUM_CHAN`] 或两数组长度不一致时直接失败，不做任何拷贝。
    /// 重复信道只保留第一次出现及其权重。
    pub fn from_parts(channels: &[u8], weights: &[u8]) -> AxResult<Self> {
        if channels.len() > MAX_NUM_CHAN || channels.len() != weights.len() {
            log::error!(target: "wireless::policy", "Invalid PCL List Length {}", channels.len());
            return Err(AxError::InvalidInput);
        }
        let mut pcl = Self::new();
        for (&chan, &weight) in channels.iter().zip(weights) {
            pcl.push(chan, weight);
        }
        Ok(pcl)
    }

    /// 所有信道取同一权重（get_valid_chans_from_range 用）
    pub fn with_weight(channels: &[u8], weight: u8) -> AxResult<Self> {
        if channels.len() > MAX_NUM_CHAN {
            log::error!(target: "wireless::policy", "Invalid PCL List Length {}", channels.len());
            return Err(AxError::InvalidInput);
        }
        let mut pcl = Self::new();
        for &chan in channels {
            pcl.push(chan, weight);
        }
        Ok(pcl)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == MAX_NUM_CHAN
    }

    #[inline]
    pub fn channels(&self) -> &[u8] {
        &self.channels[..self.len]
    }

    #[inline]
    pub fn weights(&self) -> &[u8] {
        &self.weights[..self.len]
    }

    /// 第一个（最优先）信道
    #[inline]
    pub fn first(&self) -> Option<u8> {
        self.channels().first().copied()
    }

    #[inline]
    pub fn contains(&self, chan: u8) -> bool {
        self.channels().contains(&chan)
    }

    /// 信道对应的权重
    pub fn weight_of(&self, chan: u8) -> Option<u8> {
        self.iter().find(|&(c, _)| c == chan).map(|(_, w)| w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.channels().iter().copied().zip(self.weights().iter().copied())
    }

    pub fn clear(&mut self) {
        self.channels.fill(0);
        self.weights.fill(0);
        self.len = 0;
    }

    /// 追加一项；已存在的信道忽略（返回 true），列表已满返回 false
    pub fn push(&mut self, chan: u8, weight: u8) -> bool {
        if self.contains(chan) {
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.channels[self.len] = chan;
        self.weights[self.len] = weight;
        self.len += 1;
        true
    }

    /// 只保留满足条件的信道；原地压缩，顺序与权重配对不变，尾部清零
    pub fn retain<F: FnMut(u8) -> bool>(&mut self, mut keep: F) {
        let mut n = 0;
        for i in 0..self.len {
            let chan = self.channels[i];
            if keep(chan) {
                self.channels[n] = chan;
                self.weights[n] = self.weights[i];
                n += 1;
            }
        }
        self.channels[n..self.len].fill(0);
        self.weights[n..self.len].fill(0);
        self.len = n;
    }

    /// 同 [`retain`](Self::retain)，但判定本身可能失败；失败时列表状态不可信
    pub fn try_retain<F: FnMut(u8) -> AxResult<bool>>(&mut self, mut keep: F) -> AxResult<()> {
        let mut n = 0;
        for i in 0..self.len {
            let chan = self.channels[i];
            if keep(chan)? {
                self.channels[n] = chan;
                self.weights[n] = self.weights[i];
                n += 1;
            }
        }
        self.channels[n..self.len].fill(0);
        self.weights[n..self.len].fill(0);
        self.len = n;
        Ok(())
    }

    /// 调试输出每一项（对应各阶段 "chan:%d weight:%d" 日志）
    pub fn dump(&self, stage: &str) {
        log::debug!(target: "wireless::policy", "{} pcl len:{}", stage, self.len);
        for (chan, weight) in self.iter() {
            log::debug!(target: "wireless::policy", "chan:{} weight:{}", chan, weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_keeps_order_and_weight_pairing() {
        let mut pcl = Pcl::from_parts(&[1, 6, 11, 36, 149], &[255, 240, 225, 210, 1]).unwrap();
        pcl.retain(|c| c != 6 && c != 36);
        assert_eq!(pcl.channels(), &[1, 11, 149]);
        assert_eq!(pcl.weights(), &[255, 225, 1]);
    }

    #[test]
    fn external_lists_are_deduplicated() {
        let pcl = Pcl::from_parts(&[6, 6, 36, 6], &[255, 1, 240, 2]).unwrap();
        assert_eq!(pcl.channels(), &[6, 36]);
        assert_eq!(pcl.weights(), &[255, 240]);

        let pcl = Pcl::with_weight(&[36, 36, 149], 255).unwrap();
        assert_eq!(pcl.channels(), &[36, 149]);
        assert_eq!(pcl.len(), 2);
    }

    #[test]
    fn push_skips_duplicates_and_stops_when_full() {
        let mut pcl = Pcl::new();
        assert!(pcl.push(36, 255));
        assert!(pcl.push(36, 1));
        assert_eq!(pcl.len(), 1);
        assert_eq!(pcl.weight_of(36), Some(255));

        let mut full = Pcl::new();
        for c in 0..MAX_NUM_CHAN {
            assert!(full.push(c as u8, 1));
        }
        assert!(!full.push(200, 1));
        assert_eq!(full.len(), MAX_NUM_CHAN);
    }

    #[test]
    fn oversize_input_is_rejected() {
        let chans = [1u8; MAX_NUM_CHAN + 1];
        assert_eq!(Pcl::from_parts(&chans, &chans).unwrap_err(), AxError::InvalidInput);
        assert_eq!(Pcl::with_weight(&chans, 1).unwrap_err(), AxError::InvalidInput);
        assert_eq!(Pcl::from_parts(&[1, 2], &[1]).unwrap_err(), AxError::InvalidInput);
    }

    #[test]
    fn try_retain_propagates_error() {
        let mut pcl = Pcl::with_weight(&[1, 6, 11], 255).unwrap();
        let r = pcl.try_retain(|c| if c == 11 { Err(AxError::Io) } else { Ok(true) });
        assert_eq!(r, Err(AxError::Io));
    }
}
