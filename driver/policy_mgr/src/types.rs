//! 策略管理器公共类型：并发角色、天线配置、系统偏好、PCL 类型与权重

use axerrno::AxError;
use ieee80211::Nl80211Iftype;

/// 最大并发连接数（连接表槽位数）
pub const MAX_NUMBER_OF_CONC_CONNECTIONS: usize = 3;
/// PCL / 信道表最大长度
pub const MAX_NUM_CHAN: usize = 128;

/// 并发角色个数（表的第二维）
pub const MAX_NUM_OF_MODE: usize = 5;
/// 系统偏好个数（表的第三维）
pub const MAX_CONC_PRIORITY_MODE: usize = 3;

/// PCL 第一组信道权重
pub const WEIGHT_OF_GROUP1_PCL_CHANNELS: u8 = 255;
pub const WEIGHT_OF_GROUP2_PCL_CHANNELS: u8 = 240;
pub const WEIGHT_OF_GROUP3_PCL_CHANNELS: u8 = 225;
pub const WEIGHT_OF_GROUP4_PCL_CHANNELS: u8 = 210;
/// 合法但不在 PCL 内的信道
pub const WEIGHT_OF_NON_PCL_CHANNELS: u8 = 1;
/// 不允许的信道
pub const WEIGHT_OF_DISALLOWED_CHANNELS: u8 = 0;

/// 按组序号取权重（0 = group1），超过四组后沿用 group4
pub const fn group_weight(group: usize) -> u8 {
    match group {
        0 => WEIGHT_OF_GROUP1_PCL_CHANNELS,
        1 => WEIGHT_OF_GROUP2_PCL_CHANNELS,
        2 => WEIGHT_OF_GROUP3_PCL_CHANNELS,
        _ => WEIGHT_OF_GROUP4_PCL_CHANNELS,
    }
}

/// 并发角色（连接表中的 mode，也是查表时的“请求模式”）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ConMode {
    #[default]
    Sta = 0,
    Sap = 1,
    P2pClient = 2,
    P2pGo = 3,
    Ibss = 4,
}

impl ConMode {
    pub const ALL: [ConMode; MAX_NUM_OF_MODE] = [
        ConMode::Sta,
        ConMode::Sap,
        ConMode::P2pClient,
        ConMode::P2pGo,
        ConMode::Ibss,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 对应的 cfg80211 接口类型，作为 DBS 许可判定的工作模式类别
    pub const fn iftype(self) -> Nl80211Iftype {
        match self {
            ConMode::Sta => Nl80211Iftype::Station,
            ConMode::Sap => Nl80211Iftype::Ap,
            ConMode::P2pClient => Nl80211Iftype::P2pClient,
            ConMode::P2pGo => Nl80211Iftype::P2pGo,
            ConMode::Ibss => Nl80211Iftype::AdHoc,
        }
    }

    /// 是否由本角色选择信道（AP/GO）；其余角色跟随对端信道
    pub const fn is_beaconing(self) -> bool {
        matches!(self, ConMode::Sap | ConMode::P2pGo)
    }
}

impl TryFrom<u32> for ConMode {
    type Error = AxError;

    fn try_from(v: u32) -> Result<Self, AxError> {
        match v {
            0 => Ok(ConMode::Sta),
            1 => Ok(ConMode::Sap),
            2 => Ok(ConMode::P2pClient),
            3 => Ok(ConMode::P2pGo),
            4 => Ok(ConMode::Ibss),
            _ => Err(AxError::InvalidInput),
        }
    }
}

/// 天线配置（chain mask）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ChainMask {
    #[default]
    OneOne = 0,
    TwoTwo = 1,
}

/// 并发系统偏好（吞吐 / 省电 / 时延）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ConcPriorityMode {
    #[default]
    Throughput = 0,
    Powersave = 1,
    Latency = 2,
}

impl ConcPriorityMode {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 原始配置值 -> 偏好；越界返回 None
    pub const fn from_raw(v: u8) -> Option<Self> {
        match v {
            0 => Some(ConcPriorityMode::Throughput),
            1 => Some(ConcPriorityMode::Powersave),
            2 => Some(ConcPriorityMode::Latency),
            _ => None,
        }
    }
}

/// PCL 类型：查表结果，描述“选信道的策略”而不是具体信道
///
/// 命名规则：按优先级从左到右，`Scc` 指已有连接所在信道，`Mcc` 同样取已有连接信道
/// 但语义上允许与之异信道，`24G` / `5G` 指该频段全部合法信道。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum PclType {
    #[default]
    None = 0,
    Pcl24G,
    Pcl5G,
    SccCh,
    MccCh,
    SccCh24G,
    SccCh5G,
    Pcl24GSccCh,
    Pcl5GSccCh,
    SccOn5SccOn24Pcl24G,
    SccOn5SccOn24Pcl5G,
    SccOn24SccOn5Pcl24G,
    SccOn24SccOn5Pcl5G,
    SccOn5SccOn24,
    SccOn24SccOn5,
    MccCh24G,
    MccCh5G,
    Pcl24GMccCh,
    Pcl5GMccCh,
    /// 非法 / 未定义（也用作 ≥2 连接时的哨兵）
    Max,
}
