//! 并发策略管理器（policy_mgr）：首选信道列表（PCL）引擎
//!
//! 一个射频上同时存在 STA / SAP / P2P-CLI / P2P-GO / IBSS 等多个角色时，
//! 根据已有连接的信道、RF 通路和监管约束，为新的（或已有的）连接给出带权重的首选信道列表。
//!
//! ## 模块
//!
//! | 模块      | 说明 |
//! |-----------|------|
//! | types     | 角色、链路配置、PCL 类型、权重常量 |
//! | chan_list | 定长 (信道, 权重) 列表 [`Pcl`] |
//! | conn      | 连接表与临时摘除/恢复 |
//! | index     | 连接表分类（第二/第三条连接的查表下标） |
//! | tables    | PCL 优先级表 |
//! | resolver  | PCL 类型展开为具体信道 |
//! | filter    | 安全信道 / 按模式修正 / DNBS 过滤 |
//! | mandatory | SAP 强制信道 |
//! | platform  | 监管库、硬件能力等外部协作者 |
//! | cfgfile   | 策略配置文件解析 |
//! | manager   | [`PolicyMgr`] 上下文 |
//! | pcl       | PCL 计算与查询接口 |

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod cfgfile;
mod chan_list;
mod conn;
mod filter;
mod index;
mod mandatory;
mod manager;
mod pcl;
mod platform;
mod resolver;
mod tables;
mod types;

pub use cfgfile::{parse_policy_configfile, PolicyUserCfg};
pub use chan_list::Pcl;
pub use conn::{ConnInfo, ConnRegistry, ConnRemoval, ConnTable, DetachedConns};
pub use filter::{skip_dfs_channels, FilterCtx};
pub use index::{
    classify_pair, first_connection_index, second_connection_index, third_connection_index,
    BandClass, MccBand, OneConnIndex, Relation, RolePair, TwoConnIndex,
};
pub use mandatory::{list_has_24ghz_channel, MandatoryChannels};
pub use manager::PolicyMgr;
pub use pcl::PclChanWeights;
pub use platform::{PolicyPlatform, StaticPlatform, DEFAULT_DFS_CHANNELS, DEFAULT_VALID_CHANNELS};
pub use resolver::{ChannelListResolver, ValidChannelResolver};
pub use tables::{first_connection_pcl, PclRow, PclTables, SecondConnTable, FIRST_CONNECTION_PCL_TABLE};
pub use types::{
    group_weight, ChainMask, ConMode, ConcPriorityMode, PclType, MAX_CONC_PRIORITY_MODE,
    MAX_NUMBER_OF_CONC_CONNECTIONS, MAX_NUM_CHAN, MAX_NUM_OF_MODE, WEIGHT_OF_DISALLOWED_CHANNELS,
    WEIGHT_OF_GROUP1_PCL_CHANNELS, WEIGHT_OF_GROUP2_PCL_CHANNELS, WEIGHT_OF_GROUP3_PCL_CHANNELS,
    WEIGHT_OF_GROUP4_PCL_CHANNELS, WEIGHT_OF_NON_PCL_CHANNELS,
};
