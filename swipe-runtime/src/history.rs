//! # History 模块
//!
//! 滑动判定的历史记录。
//!
//! ## 设计原则
//!
//! - 每张卡片被滑出时记录一条，按判定顺序排列
//! - 所有数据可序列化，宿主可以自行持久化
//! - 不记录回弹等不产生判定的过渡

use serde::{Deserialize, Serialize};

use crate::drag::SwipeDecision;
use crate::stack::CardId;

/// 一条判定记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    /// 判定序号（从 0 开始）
    pub sequence: u64,
    /// 卡片标识
    pub card: CardId,
    /// 卡片标签
    pub label: String,
    /// 判定结果
    pub decision: SwipeDecision,
    /// 时间戳（Unix 秒）
    pub timestamp: u64,
}

/// 判定历史
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeHistory {
    /// 记录列表（按判定顺序）
    records: Vec<SwipeRecord>,
    /// 最大记录数（防止内存无限增长）
    max_records: usize,
    /// 下一个序号
    next_sequence: u64,
}

impl Default for SwipeHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeHistory {
    /// 创建新的历史记录
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            max_records: 1000,
            next_sequence: 0,
        }
    }

    /// 设置最大记录数
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    /// 记录一次判定
    pub fn record(&mut self, card: CardId, label: &str, decision: SwipeDecision) -> &SwipeRecord {
        let record = SwipeRecord {
            sequence: self.next_sequence,
            card,
            label: label.to_string(),
            decision,
            timestamp: current_timestamp(),
        };
        self.next_sequence += 1;
        self.records.push(record);

        // 超过上限时丢弃最早的记录
        if self.records.len() > self.max_records {
            let overflow = self.records.len() - self.max_records;
            self.records.drain(..overflow);
        }

        &self.records[self.records.len() - 1]
    }

    /// 全部记录
    pub fn records(&self) -> &[SwipeRecord] {
        &self.records
    }

    /// 最近一次判定
    pub fn last(&self) -> Option<&SwipeRecord> {
        self.records.last()
    }

    /// 某种判定的数量
    pub fn count(&self, decision: SwipeDecision) -> usize {
        self.records
            .iter()
            .filter(|r| r.decision == decision)
            .count()
    }

    /// 清空历史
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// 记录总数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 获取当前时间戳（Unix 秒）
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
