//! 并发策略配置文件解析
//!
//! 行格式 `TAG=value`，找不到 tag 或值非法时取默认值：
//! CONC_SYSTEM_PREF=、ENABLE_DFS_MASTER_CAP=、STA_SAP_SCC_ON_DFS_CHAN=、SAP_MANDATORY_CHANNELS=。

use alloc::vec::Vec;

use axerrno::AxResult;

use crate::types::MAX_NUM_CHAN;

/// 解析后的用户配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyUserCfg {
    /// 系统偏好（0 吞吐 / 1 功耗 / 2 时延），原样保存
    pub conc_system_pref: u8,
    pub enable_dfs_master_cap: bool,
    pub sta_sap_scc_on_dfs_chan: bool,
    /// 空表示未配置
    pub sap_mandatory_channels: Vec<u8>,
}

/// 在 file_data 中查找 tag_name= 开头的行，返回等号后的值（不含换行）
fn find_tag<'a>(file_data: &'a [u8], tag_name: &str) -> Option<&'a [u8]> {
    let tag = tag_name.as_bytes();
    file_data
        .split(|&b| b == b'\n')
        .find(|line| line.starts_with(tag))
        .map(|line| trim(&line[tag.len()..]))
}

fn trim(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(s.len());
    let end = s.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |p| p + 1);
    &s[start..end]
}

fn parse_dec(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut v: u32 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return None;
        }
        v = v.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }
    Some(v)
}

fn parse_bool(s: &[u8]) -> Option<bool> {
    match parse_dec(s)? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// 逗号分隔的信道号；任一项非法则整项作废
fn parse_chan_list(s: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    for item in s.split(|&b| b == b',') {
        let chan = u8::try_from(parse_dec(trim(item))?).ok()?;
        if chan == 0 || out.len() >= MAX_NUM_CHAN {
            return None;
        }
        out.push(chan);
    }
    Some(out)
}

/// 解析策略配置文件
pub fn parse_policy_configfile(file_data: &[u8], config: &mut PolicyUserCfg) -> AxResult<()> {
    const DEFAULT_PREF: u8 = 0;
    config.conc_system_pref = find_tag(file_data, "CONC_SYSTEM_PREF=")
        .and_then(parse_dec)
        .and_then(|v| u8::try_from(v).ok())
        .unwrap_or(DEFAULT_PREF);
    config.enable_dfs_master_cap = find_tag(file_data, "ENABLE_DFS_MASTER_CAP=")
        .and_then(parse_bool)
        .unwrap_or(false);
    config.sta_sap_scc_on_dfs_chan = find_tag(file_data, "STA_SAP_SCC_ON_DFS_CHAN=")
        .and_then(parse_bool)
        .unwrap_or(false);
    config.sap_mandatory_channels = match find_tag(file_data, "SAP_MANDATORY_CHANNELS=") {
        Some(v) => parse_chan_list(v).unwrap_or_else(|| {
            log::warn!(target: "wireless::policy", "malformed SAP_MANDATORY_CHANNELS, ignored");
            Vec::new()
        }),
        None => Vec::new(),
    };
    log::debug!(target: "wireless::policy", "policy cfg: {:?}", config);
    Ok(())
}
