//! PCL 优先级表
//!
//! - 第一条连接：常量表 `[请求模式][系统偏好]`；
//! - 第二条连接：`[OneConnIndex][请求模式][系统偏好]`，分 DBS / 非 DBS 两张，
//!   由宿主在构造 [`PolicyMgr`](crate::PolicyMgr) 时注入。
//!
//! 三条连接的表暂不提供：三连接场景的查表分发没有启用。

use crate::index::OneConnIndex;
use crate::types::{ConMode, ConcPriorityMode, PclType, MAX_CONC_PRIORITY_MODE, MAX_NUM_OF_MODE};

/// 第一条连接 PCL 表的一行
pub type PclRow = [PclType; MAX_CONC_PRIORITY_MODE];

/// 第二条连接 PCL 表
pub type SecondConnTable = [[PclRow; MAX_NUM_OF_MODE]; OneConnIndex::COUNT];

const fn all(t: PclType) -> PclRow {
    [t; MAX_CONC_PRIORITY_MODE]
}

/// 系统中第一条连接的 PCL：STA/IBSS 跟随对端不做偏好，AP 类与 P2P 优先 5G
pub const FIRST_CONNECTION_PCL_TABLE: [PclRow; MAX_NUM_OF_MODE] = [
    all(PclType::None), // Sta
    all(PclType::Pcl5G), // Sap
    all(PclType::Pcl5G), // P2pClient
    all(PclType::Pcl5G), // P2pGo
    all(PclType::None), // Ibss
];

#[inline]
pub fn first_connection_pcl(mode: ConMode, pref: ConcPriorityMode) -> PclType {
    FIRST_CONNECTION_PCL_TABLE[mode.index()][pref.index()]
}

/// 注入的第二条连接 PCL 表
#[derive(Clone)]
pub struct PclTables {
    second_dbs: SecondConnTable,
    second_nodbs: SecondConnTable,
}

impl PclTables {
    pub const fn new(second_dbs: SecondConnTable, second_nodbs: SecondConnTable) -> Self {
        Self {
            second_dbs,
            second_nodbs,
        }
    }

    /// 查第二条连接的 PCL 类型；`dbs` 为 true 时使用 DBS 表
    pub fn second_connection_pcl(
        &self,
        index: OneConnIndex,
        mode: ConMode,
        pref: ConcPriorityMode,
        dbs: bool,
    ) -> PclType {
        let table = if dbs { &self.second_dbs } else { &self.second_nodbs };
        table[index.index()][mode.index()][pref.index()]
    }
}

impl Default for PclTables {
    fn default() -> Self {
        Self::new(seed_second_table(true), seed_second_table(false))
    }
}

/// 默认表：IBSS 不参与并发；STA 跟随；
/// 非 DBS 时 AP/GO/GC 与已有连接同信道，DBS 时优先另一个频段再退回同信道。
fn seed_second_table(dbs: bool) -> SecondConnTable {
    let mut table = [[all(PclType::Max); MAX_NUM_OF_MODE]; OneConnIndex::COUNT];
    for (idx, rows) in table.iter_mut().enumerate() {
        let existing = ConMode::ALL[idx / 4];
        let on_5g = (idx / 2) % 2 == 1;
        if existing == ConMode::Ibss {
            continue;
        }
        for mode in ConMode::ALL {
            rows[mode.index()] = match mode {
                ConMode::Ibss => all(PclType::Max),
                ConMode::Sta => all(PclType::None),
                ConMode::Sap | ConMode::P2pGo | ConMode::P2pClient => match (dbs, on_5g) {
                    (false, false) => all(PclType::SccCh24G),
                    (false, true) => all(PclType::SccCh5G),
                    (true, false) => [PclType::Pcl5GSccCh, PclType::SccCh5G, PclType::Pcl5GSccCh],
                    (true, true) => [PclType::Pcl24GSccCh, PclType::SccCh24G, PclType::Pcl24GSccCh],
                },
            };
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::BandClass;
    use crate::types::ChainMask;

    #[test]
    fn first_table_matches_roles() {
        for pref in [ConcPriorityMode::Throughput, ConcPriorityMode::Powersave, ConcPriorityMode::Latency] {
            assert_eq!(first_connection_pcl(ConMode::Sta, pref), PclType::None);
            assert_eq!(first_connection_pcl(ConMode::Ibss, pref), PclType::None);
            assert_eq!(first_connection_pcl(ConMode::Sap, pref), PclType::Pcl5G);
            assert_eq!(first_connection_pcl(ConMode::P2pGo, pref), PclType::Pcl5G);
            assert_eq!(first_connection_pcl(ConMode::P2pClient, pref), PclType::Pcl5G);
        }
    }

    #[test]
    fn default_second_tables() {
        let tables = PclTables::default();
        let sta_24 = OneConnIndex {
            role: ConMode::Sta,
            band: BandClass::Band24,
            chains: ChainMask::OneOne,
        };
        let tp = ConcPriorityMode::Throughput;
        assert_eq!(tables.second_connection_pcl(sta_24, ConMode::Sap, tp, false), PclType::SccCh24G);
        assert_eq!(tables.second_connection_pcl(sta_24, ConMode::Sap, tp, true), PclType::Pcl5GSccCh);
        assert_eq!(tables.second_connection_pcl(sta_24, ConMode::Sta, tp, true), PclType::None);
        assert_eq!(tables.second_connection_pcl(sta_24, ConMode::Ibss, tp, false), PclType::Max);

        let ibss = OneConnIndex {
            role: ConMode::Ibss,
            band: BandClass::Band5,
            chains: ChainMask::TwoTwo,
        };
        assert_eq!(tables.second_connection_pcl(ibss, ConMode::Sap, tp, false), PclType::Max);
    }

    #[test]
    fn injected_tables_are_used() {
        let dbs = [[all(PclType::Pcl24G); MAX_NUM_OF_MODE]; OneConnIndex::COUNT];
        let nodbs = [[all(PclType::MccCh); MAX_NUM_OF_MODE]; OneConnIndex::COUNT];
        let tables = PclTables::new(dbs, nodbs);
        let idx = OneConnIndex {
            role: ConMode::Sap,
            band: BandClass::Band5,
            chains: ChainMask::OneOne,
        };
        let lat = ConcPriorityMode::Latency;
        assert_eq!(tables.second_connection_pcl(idx, ConMode::P2pGo, lat, true), PclType::Pcl24G);
        assert_eq!(tables.second_connection_pcl(idx, ConMode::P2pGo, lat, false), PclType::MccCh);
    }
}
