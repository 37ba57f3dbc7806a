//! 并发连接表（只读视图 + 临时摘除/恢复）
//!
//! - 连接表定长 [`MAX_NUMBER_OF_CONC_CONNECTIONS`]，存活项始终紧凑排列在 `0..count`，
//!   删除时后续项前移，恢复时追加到末尾（因此恢复后槽位顺序可能变化）。
//! - **conc_list_lock**（spin::Mutex）：保护整张表，任何读写都必须持锁。
//! - 临时摘除用于“假设某类连接不存在”的 PCL 计算：
//!   - [`ConnTable::simulate_removal`]：调用方已持锁，守卫析构时恢复；
//!   - [`ConnRegistry::detach`]：摘除后立即释放锁，守卫析构时重新加锁恢复。
//!     两次加锁之间其它线程可能修改连接表，这是可接受的竞态。

use core::ops::Deref;

use axerrno::{AxError, AxResult};

use crate::types::{ChainMask, ConMode, MAX_NUMBER_OF_CONC_CONNECTIONS};

/// 单条连接（对应连接表的一个槽位）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnInfo {
    pub mode: ConMode,
    /// 工作信道，0 表示未设置
    pub chan: u8,
    pub chain_mask: ChainMask,
    /// 所在 RF 通路（MAC）
    pub mac: u8,
    pub vdev_id: u32,
    pub in_use: bool,
}

impl ConnInfo {
    pub const fn new(mode: ConMode, chan: u8, chain_mask: ChainMask, mac: u8, vdev_id: u32) -> Self {
        Self {
            mode,
            chan,
            chain_mask,
            mac,
            vdev_id,
            in_use: true,
        }
    }
}

/// 被临时摘除的连接（暂存区）
#[derive(Debug, Clone, Copy, Default)]
struct SavedConns {
    info: [ConnInfo; MAX_NUMBER_OF_CONC_CONNECTIONS],
    num: usize,
}

/// 连接表本体
#[derive(Debug, Clone, Default)]
pub struct ConnTable {
    entries: [ConnInfo; MAX_NUMBER_OF_CONC_CONNECTIONS],
}

impl ConnTable {
    pub const fn new() -> Self {
        Self {
            entries: [ConnInfo {
                mode: ConMode::Sta,
                chan: 0,
                chain_mask: ChainMask::OneOne,
                mac: 0,
                vdev_id: 0,
                in_use: false,
            }; MAX_NUMBER_OF_CONC_CONNECTIONS],
        }
    }

    /// 存活连接数
    pub fn count(&self) -> usize {
        self.entries.iter().filter(|e| e.in_use).count()
    }

    /// 某角色的存活连接数
    pub fn mode_count(&self, mode: ConMode) -> usize {
        self.live().filter(|e| e.mode == mode).count()
    }

    /// 第 idx 个槽位（未使用的槽位返回 None）
    pub fn entry(&self, idx: usize) -> Option<&ConnInfo> {
        self.entries.get(idx).filter(|e| e.in_use)
    }

    pub fn live(&self) -> impl Iterator<Item = &ConnInfo> + '_ {
        self.entries.iter().filter(|e| e.in_use)
    }

    /// 新增连接，放在第一个空槽（紧凑末尾）
    pub fn add(&mut self, info: ConnInfo) -> AxResult<usize> {
        if self.live().any(|e| e.vdev_id == info.vdev_id) {
            log::error!(target: "wireless::policy", "vdev {} already in connection table", info.vdev_id);
            return Err(AxError::AlreadyExists);
        }
        let idx = self.count();
        if idx >= MAX_NUMBER_OF_CONC_CONNECTIONS {
            log::error!(target: "wireless::policy", "connection table full");
            return Err(AxError::NoMemory);
        }
        self.entries[idx] = ConnInfo { in_use: true, ..info };
        Ok(idx)
    }

    /// 按 vdev 删除连接，后续槽位前移
    pub fn remove_by_vdev(&mut self, vdev_id: u32) -> Option<ConnInfo> {
        let idx = self.live().position(|e| e.vdev_id == vdev_id)?;
        Some(self.remove_at(idx))
    }

    fn remove_at(&mut self, idx: usize) -> ConnInfo {
        let removed = self.entries[idx];
        let count = self.count();
        self.entries.copy_within(idx + 1..count, idx);
        self.entries[count - 1] = ConnInfo::default();
        removed
    }

    /// 信道切换后更新连接的信道与 MAC
    pub fn update_channel(&mut self, vdev_id: u32, chan: u8, mac: u8) -> AxResult<()> {
        let e = self
            .entries
            .iter_mut()
            .find(|e| e.in_use && e.vdev_id == vdev_id)
            .ok_or(AxError::NotFound)?;
        e.chan = chan;
        e.mac = mac;
        Ok(())
    }

    /// 指定角色（可选指定 vdev）的工作信道，找不到返回 0
    pub fn get_channel(&self, mode: ConMode, vdev_id: Option<u32>) -> u8 {
        self.live()
            .find(|e| e.mode == mode && vdev_id.map_or(true, |v| v == e.vdev_id))
            .map_or(0, |e| e.chan)
    }

    /// 第一个该角色连接的信道，找不到返回 0
    pub fn mode_specific_get_channel(&self, mode: ConMode) -> u8 {
        self.get_channel(mode, None)
    }

    /// 当前已使用的第一个非 DFS 信道
    pub fn first_nondfs_channel<F: Fn(u8) -> bool>(&self, is_dfs: F) -> Option<u8> {
        self.live().map(|e| e.chan).find(|&c| c != 0 && !is_dfs(c))
    }

    /// 暂存并删除 mode 的连接（all_matching=false 时只删第一条）
    fn store_and_del(&mut self, mode: ConMode, all_matching: bool) -> SavedConns {
        let mut saved = SavedConns::default();
        let mut idx = 0;
        while idx < self.count() {
            if self.entries[idx].mode == mode {
                saved.info[saved.num] = self.remove_at(idx);
                saved.num += 1;
                if all_matching {
                    continue;
                }
                break;
            }
            idx += 1;
        }
        log::debug!(target: "wireless::policy", "stored {} conn(s) of mode {:?}", saved.num, mode);
        saved
    }

    /// 把暂存的连接追加回表尾；表被并发填满时多余项丢弃
    fn restore(&mut self, saved: &SavedConns) {
        for info in &saved.info[..saved.num] {
            let idx = self.count();
            if idx >= MAX_NUMBER_OF_CONC_CONNECTIONS {
                log::warn!(target: "wireless::policy", "no slot to restore vdev {}", info.vdev_id);
                break;
            }
            self.entries[idx] = *info;
        }
    }

    /// 在当前持锁范围内临时摘除 mode 的连接，守卫析构时恢复
    pub fn simulate_removal(&mut self, mode: ConMode, all_matching: bool) -> ConnRemoval<'_> {
        let saved = self.store_and_del(mode, all_matching);
        ConnRemoval { table: self, saved }
    }
}

/// 临时摘除守卫：在持锁期间看到“去掉某类连接后”的连接表
pub struct ConnRemoval<'a> {
    table: &'a mut ConnTable,
    saved: SavedConns,
}

impl ConnRemoval<'_> {
    /// 被摘除的连接数
    pub fn removed(&self) -> usize {
        self.saved.num
    }
}

impl Deref for ConnRemoval<'_> {
    type Target = ConnTable;
    fn deref(&self) -> &ConnTable {
        &*self.table
    }
}

impl Drop for ConnRemoval<'_> {
    fn drop(&mut self) {
        self.table.restore(&self.saved);
    }
}

/// 带锁的连接表
#[derive(Default)]
pub struct ConnRegistry {
    table: spin::Mutex<ConnTable>,
}

impl ConnRegistry {
    pub const fn new() -> Self {
        Self {
            table: spin::Mutex::new(ConnTable::new()),
        }
    }

    /// 获取 conc_list_lock，返回 guard，析构时自动释放
    #[inline]
    pub fn lock(&self) -> spin::MutexGuard<'_, ConnTable> {
        self.table.lock()
    }

    pub fn count(&self) -> usize {
        self.lock().count()
    }

    pub fn mode_count(&self, mode: ConMode) -> usize {
        self.lock().mode_count(mode)
    }

    pub fn add(&self, info: ConnInfo) -> AxResult<usize> {
        self.lock().add(info)
    }

    pub fn remove_by_vdev(&self, vdev_id: u32) -> Option<ConnInfo> {
        self.lock().remove_by_vdev(vdev_id)
    }

    pub fn update_channel(&self, vdev_id: u32, chan: u8, mac: u8) -> AxResult<()> {
        self.lock().update_channel(vdev_id, chan, mac)
    }

    /// 摘除 mode 的连接后释放锁；守卫析构时重新加锁并恢复
    pub fn detach(&self, mode: ConMode, all_matching: bool) -> DetachedConns<'_> {
        let saved = self.lock().store_and_del(mode, all_matching);
        DetachedConns { registry: self, saved }
    }
}

/// 不持锁的摘除守卫（见模块文档中的竞态说明）
pub struct DetachedConns<'a> {
    registry: &'a ConnRegistry,
    saved: SavedConns,
}

impl DetachedConns<'_> {
    pub fn removed(&self) -> usize {
        self.saved.num
    }
}

impl Drop for DetachedConns<'_> {
    fn drop(&mut self) {
        self.registry.lock().restore(&self.saved);
    }
}
