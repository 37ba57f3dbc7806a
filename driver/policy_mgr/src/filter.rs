//! PCL 过滤流水线
//!
//! 固定顺序：安全信道（SAP/GO） -> 按模式修正 -> DNBS。
//! 每一阶段都在原地压缩，保持剩余信道的相对顺序与权重配对，长度只减不增。

use axerrno::AxResult;

use crate::chan_list::Pcl;
use crate::mandatory;
use crate::platform::PolicyPlatform;
use crate::types::ConMode;

/// 过滤时需要的策略状态快照
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCtx<'a> {
    /// 不安全信道（频率规避通知）
    pub unsafe_chans: &'a [u8],
    /// SAP 强制信道，空表示未设置
    pub mandatory: &'a [u8],
    /// 是否剔除 DFS 信道
    pub skip_dfs: bool,
}

/// DFS 规避：不具备 DFS master 能力，或已有 STA 且不允许 STA+SAP 同信道落在 DFS 上
pub fn skip_dfs_channels(dfs_master_cap: bool, sta_count: usize, sta_sap_scc_on_dfs: bool) -> bool {
    if !dfs_master_cap {
        return true;
    }
    sta_count > 0 && !sta_sap_scc_on_dfs
}

/// 安全信道过滤，只作用于 SAP 与 P2P-GO
pub fn safe_channel_filter(pcl: &mut Pcl, mode: ConMode, unsafe_chans: &[u8]) {
    if !mode.is_beaconing() || unsafe_chans.is_empty() {
        return;
    }
    pcl.retain(|c| !unsafe_chans.contains(&c));
    pcl.dump("after safe channel filter");
}

fn srd_filter<P: PolicyPlatform + ?Sized>(platform: &P, pcl: &mut Pcl) {
    if platform.is_srd_master_allowed() {
        return;
    }
    pcl.retain(|c| !platform.is_srd(c));
}

fn modify_sap_pcl<P: PolicyPlatform + ?Sized>(platform: &P, pcl: &mut Pcl, ctx: &FilterCtx<'_>) {
    if !ctx.mandatory.is_empty() {
        mandatory::intersect(pcl, ctx.mandatory);
    }
    // NOL 中的信道由监管库标记为 disabled
    pcl.retain(|c| !platform.is_disabled(c));
    if ctx.skip_dfs {
        pcl.retain(|c| !platform.is_dfs(c));
    }
    srd_filter(platform, pcl);
}

fn modify_p2p_go_pcl<P: PolicyPlatform + ?Sized>(platform: &P, pcl: &mut Pcl) {
    pcl.retain(|c| !platform.is_passive_or_disabled(c));
    srd_filter(platform, pcl);
}

/// 按请求模式修正 PCL；STA / P2P-CLI / IBSS 跟随对端信道，不做修改
pub fn mode_specific_modification<P: PolicyPlatform + ?Sized>(
    platform: &P,
    pcl: &mut Pcl,
    mode: ConMode,
    ctx: &FilterCtx<'_>,
) {
    match mode {
        ConMode::Sap => {
            modify_sap_pcl(platform, pcl, ctx);
            pcl.dump("after sap modification");
        }
        ConMode::P2pGo => {
            modify_p2p_go_pcl(platform, pcl);
            pcl.dump("after p2p go modification");
        }
        ConMode::Sta | ConMode::P2pClient | ConMode::Ibss => {}
    }
}

/// DNBS 过滤；查询失败时整体失败，此时 `pcl` 内容不可用
pub fn dnbs_filter<P: PolicyPlatform + ?Sized>(platform: &P, pcl: &mut Pcl) -> AxResult<()> {
    pcl.try_retain(|c| platform.is_chan_ok_for_dnbs(c)).map_err(|e| {
        log::error!(target: "wireless::policy", "failed to get dnbs pcl: {:?}", e);
        e
    })?;
    pcl.dump("after dnbs filter");
    Ok(())
}

/// 完整流水线
pub fn apply<P: PolicyPlatform + ?Sized>(
    platform: &P,
    pcl: &mut Pcl,
    mode: ConMode,
    ctx: &FilterCtx<'_>,
) -> AxResult<()> {
    safe_channel_filter(pcl, mode, ctx.unsafe_chans);
    mode_specific_modification(platform, pcl, mode, ctx);
    dnbs_filter(platform, pcl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticPlatform;
    use axerrno::AxError;

    fn sample() -> Pcl {
        Pcl::from_parts(&[1, 6, 36, 52, 100, 149, 169], &[255, 255, 240, 240, 225, 225, 210]).unwrap()
    }

    #[test]
    fn skip_dfs_policy() {
        assert!(skip_dfs_channels(false, 0, true));
        assert!(!skip_dfs_channels(true, 0, false));
        assert!(skip_dfs_channels(true, 1, false));
        assert!(!skip_dfs_channels(true, 1, true));
    }

    #[test]
    fn safe_filter_only_touches_beaconing_modes() {
        let mut pcl = sample();
        safe_channel_filter(&mut pcl, ConMode::Sta, &[149]);
        assert!(pcl.contains(149));
        safe_channel_filter(&mut pcl, ConMode::P2pGo, &[149]);
        assert!(!pcl.contains(149));
    }

    #[test]
    fn sap_pipeline_order() {
        let platform = StaticPlatform::new()
            .with_dfs(&[52, 100])
            .with_disabled(&[100])
            .with_srd(&[169], false);
        let mut pcl = sample();
        let ctx = FilterCtx {
            skip_dfs: true,
            ..FilterCtx::default()
        };
        apply(&platform, &mut pcl, ConMode::Sap, &ctx).unwrap();
        assert_eq!(pcl.channels(), &[1, 6, 36, 149]);
        assert_eq!(pcl.weights(), &[255, 255, 240, 225]);
    }

    #[test]
    fn sap_keeps_dfs_and_srd_when_allowed() {
        let platform = StaticPlatform::new().with_dfs(&[52, 100]).with_srd(&[169], true);
        let mut pcl = sample();
        apply(&platform, &mut pcl, ConMode::Sap, &FilterCtx::default()).unwrap();
        assert_eq!(pcl, sample());
    }

    #[test]
    fn sap_mandatory_intersection_keeps_pcl_order() {
        let platform = StaticPlatform::new();
        let mut pcl = sample();
        let ctx = FilterCtx {
            mandatory: &[149, 6, 11],
            ..FilterCtx::default()
        };
        apply(&platform, &mut pcl, ConMode::Sap, &ctx).unwrap();
        assert_eq!(pcl.channels(), &[6, 149]);
    }

    #[test]
    fn go_drops_passive_and_srd() {
        let platform = StaticPlatform::new().with_passive(&[52]).with_srd(&[169], false);
        let mut pcl = sample();
        apply(&platform, &mut pcl, ConMode::P2pGo, &FilterCtx::default()).unwrap();
        assert_eq!(pcl.channels(), &[1, 6, 36, 100, 149]);
    }

    #[test]
    fn follower_modes_pass_through() {
        let platform = StaticPlatform::new().with_disabled(&[1, 6]).with_srd(&[169], false);
        for mode in [ConMode::Sta, ConMode::P2pClient, ConMode::Ibss] {
            let mut pcl = sample();
            apply(&platform, &mut pcl, mode, &FilterCtx::default()).unwrap();
            assert_eq!(pcl, sample());
        }
    }

    #[test]
    fn dnbs_drops_blocked_and_fails_on_error() {
        let mut platform = StaticPlatform::new().with_dnbs_blocked(&[36]);
        let mut pcl = sample();
        dnbs_filter(&platform, &mut pcl).unwrap();
        assert!(!pcl.contains(36));

        platform.dnbs_fail = true;
        let mut pcl = sample();
        assert_eq!(dnbs_filter(&platform, &mut pcl).unwrap_err(), AxError::BadState);
    }

    #[test]
    fn pipeline_never_grows_or_reorders() {
        let platform = StaticPlatform::new()
            .with_dfs(&[52, 100])
            .with_passive(&[36])
            .with_dnbs_blocked(&[6]);
        let before = sample();
        for mode in ConMode::ALL {
            let mut pcl = before.clone();
            let ctx = FilterCtx {
                unsafe_chans: &[1],
                skip_dfs: true,
                ..FilterCtx::default()
            };
            apply(&platform, &mut pcl, mode, &ctx).unwrap();
            assert!(pcl.len() <= before.len());
            let mut last = 0;
            for (chan, weight) in pcl.iter() {
                let pos = before.channels().iter().position(|&c| c == chan).unwrap();
                assert!(pos >= last);
                last = pos;
                assert_eq!(before.weight_of(chan), Some(weight));
            }
        }
    }
}
