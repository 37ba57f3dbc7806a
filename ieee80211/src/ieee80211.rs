//! IEEE 802.11 频段与信道号
//!
//! 对应 Linux include/linux/ieee80211.h 中 ieee80211_channel_to_frequency /
//! ieee80211_frequency_to_channel，以及监管层常用的 IS_24GHZ_CH / IS_5GHZ_CH 判定。

/// 频段（对应 NL80211_BAND_*）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Band {
    #[default]
    TwoGhz = 0,
    FiveGhz = 1,
    SixGhz = 2,
}

/// 2.4G 最小信道号
pub const MIN_24GHZ_CHAN: u8 = 1;
/// 2.4G 最大信道号（含日本 14 信道）
pub const MAX_24GHZ_CHAN: u8 = 14;
/// 5G 最小信道号
pub const MIN_5GHZ_CHAN: u8 = 36;
/// 5G 最大信道号（含 5.9G DSRC 段）
pub const MAX_5GHZ_CHAN: u8 = 184;
/// 兜底信道：找不到任何可用信道时退回 2.4G 6 信道，至少不会落入 5G MCC
pub const CHAN_6: u8 = 6;

const BASE_FREQ_2GHZ: u32 = 2407;
const BASE_FREQ_5GHZ: u32 = 5000;
const BASE_FREQ_6GHZ: u32 = 5950;

/// 是否 2.4G 信道
#[inline]
pub const fn is_24ghz_ch(chan: u8) -> bool {
    chan >= MIN_24GHZ_CHAN && chan <= MAX_24GHZ_CHAN
}

/// 是否 5G 信道
#[inline]
pub const fn is_5ghz_ch(chan: u8) -> bool {
    chan >= MIN_5GHZ_CHAN && chan <= MAX_5GHZ_CHAN
}

/// 6G 信道号与 2.4G/5G 重叠，只能靠频率区分
#[inline]
pub const fn is_6ghz_ch(freq_mhz: u32) -> bool {
    freq_mhz > 5950 && freq_mhz <= 7115
}

/// 信道号所在频段；0 或越界返回 None
pub const fn chan_to_band(chan: u8) -> Option<Band> {
    if is_24ghz_ch(chan) {
        Some(Band::TwoGhz)
    } else if is_5ghz_ch(chan) {
        Some(Band::FiveGhz)
    } else {
        None
    }
}

/// 信道号 -> 中心频率 MHz（对应 ieee80211_channel_to_frequency）
pub fn chan_to_freq(chan: u8, band: Band) -> Option<u32> {
    let chan = chan as u32;
    match band {
        Band::TwoGhz => match chan {
            14 => Some(2484),
            1..=13 => Some(BASE_FREQ_2GHZ + chan * 5),
            _ => None,
        },
        Band::FiveGhz => match chan {
            36..=184 => Some(BASE_FREQ_5GHZ + chan * 5),
            _ => None,
        },
        Band::SixGhz => match chan {
            2 => Some(5935),
            1..=233 => Some(BASE_FREQ_6GHZ + chan * 5),
            _ => None,
        },
    }
}

/// 中心频率 MHz -> 信道号（对应 ieee80211_frequency_to_channel）；无法换算返回 0
pub fn freq_to_chan(freq_mhz: u32) -> u8 {
    let chan = match freq_mhz {
        2484 => 14,
        2412..=2472 => (freq_mhz - BASE_FREQ_2GHZ) / 5,
        5935 => 2,
        f if is_6ghz_ch(f) => (f - BASE_FREQ_6GHZ) / 5,
        5180..=5920 => (freq_mhz - BASE_FREQ_5GHZ) / 5,
        _ => 0,
    };
    chan as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_of_channel() {
        assert_eq!(chan_to_band(1), Some(Band::TwoGhz));
        assert_eq!(chan_to_band(14), Some(Band::TwoGhz));
        assert_eq!(chan_to_band(36), Some(Band::FiveGhz));
        assert_eq!(chan_to_band(165), Some(Band::FiveGhz));
        assert_eq!(chan_to_band(0), None);
        assert_eq!(chan_to_band(20), None);
    }

    #[test]
    fn freq_chan_conversion() {
        assert_eq!(chan_to_freq(6, Band::TwoGhz), Some(2437));
        assert_eq!(chan_to_freq(14, Band::TwoGhz), Some(2484));
        assert_eq!(chan_to_freq(149, Band::FiveGhz), Some(5745));
        assert_eq!(chan_to_freq(36, Band::TwoGhz), None);
        assert_eq!(freq_to_chan(2437), 6);
        assert_eq!(freq_to_chan(5745), 149);
        assert_eq!(freq_to_chan(6135), 37);
        assert_eq!(freq_to_chan(1000), 0);
    }
}
