//! # Stack 模块
//!
//! 卡组缓冲区：维护全部卡片的有序积压列表，以及一个有容量上限的可见窗口。
//!
//! ## 窗口模型
//!
//! ```text
//! backlog:  [c0, c1, c2, c3, c4]
//!                ^^^^^^  ^
//!                window  next_unloaded
//! ```
//!
//! - 窗口总是 `backlog[next_unloaded - window.len() .. next_unloaded]`
//! - 窗口下标 0 是最前面的卡片，也是唯一接收手势的卡片
//! - 新实例化的卡片插入到当前最后一张卡片的下方
//! - 被滑出的卡片只离开窗口，积压列表中的记录保留

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::card::{CardController, DecisionSink};
use crate::config::SwipeConfig;
use crate::drag::{SwipeDecision, SwipeDirection};
use crate::error::SwipeResult;
use crate::history::SwipeHistory;
use crate::input::{GestureEvent, GesturePhase, HostCommand};
use crate::surface::RenderSurface;

/// 卡片标识符（积压列表中的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub usize);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 积压列表中的一张卡片，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub label: String,
}

impl CardRecord {
    pub fn new(id: CardId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// 卡组状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStackState {
    /// 积压列表长度
    pub backlog_len: usize,
    /// 下一张待实例化卡片的下标
    pub next_unloaded_index: usize,
    /// 可见窗口，从前到后
    pub visible_window: Vec<CardId>,
    /// 窗口容量
    pub window_capacity: usize,
}

/// 卡组观察者
///
/// 宿主通过它得知每张卡片的判定结果（例如记录"喜欢"/"跳过"）。
pub trait DeckObserver {
    /// 一张卡片被滑出
    fn card_resolved(&mut self, decision: SwipeDecision, card: &CardRecord);

    /// 窗口变空，没有更多卡片
    fn deck_emptied(&mut self) {}
}

/// 控制器报告的判定，等待卡组处理
#[derive(Debug, Default)]
struct PendingResolutions {
    queue: RefCell<VecDeque<(CardId, SwipeDirection)>>,
}

impl PendingResolutions {
    fn pop(&self) -> Option<(CardId, SwipeDirection)> {
        self.queue.borrow_mut().pop_front()
    }
}

impl DecisionSink for PendingResolutions {
    fn card_resolved(&self, card: CardId, direction: SwipeDirection) {
        self.queue.borrow_mut().push_back((card, direction));
    }
}

/// 卡组缓冲区
///
/// 独占渲染表面和全部卡片控制器。所有输入都在同一条控制流上到达，
/// 每次输入处理结束前统一结算控制器报告的判定。
pub struct CardStack<S: RenderSurface> {
    surface: S,
    config: SwipeConfig,
    backlog: Vec<CardRecord>,
    next_unloaded: usize,
    window: VecDeque<CardController>,
    resolutions: Rc<PendingResolutions>,
    observers: Vec<Box<dyn DeckObserver>>,
    history: SwipeHistory,
}

impl<S: RenderSurface> std::fmt::Debug for CardStack<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardStack")
            .field("backlog", &self.backlog.len())
            .field("next_unloaded", &self.next_unloaded)
            .field("window", &self.window)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<S: RenderSurface> CardStack<S> {
    /// 创建空卡组
    ///
    /// 配置无效时返回错误。
    pub fn new(surface: S, config: SwipeConfig) -> SwipeResult<Self> {
        config.validate()?;

        Ok(Self {
            surface,
            config,
            backlog: Vec::new(),
            next_unloaded: 0,
            window: VecDeque::new(),
            resolutions: Rc::new(PendingResolutions::default()),
            observers: Vec::new(),
            history: SwipeHistory::new(),
        })
    }

    /// 用一组标签初始化卡组
    ///
    /// 积压列表包含全部卡片，窗口最多实例化 `window_capacity` 张。
    pub fn initialize<I, L>(surface: S, config: SwipeConfig, labels: I) -> SwipeResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut stack = Self::new(surface, config)?;
        stack.append_cards(labels);
        Ok(stack)
    }

    /// 追加卡片到积压列表末尾
    ///
    /// 窗口有空位时立即实例化。返回新卡片的标识。
    pub fn append_cards<I, L>(&mut self, labels: I) -> Vec<CardId>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut added = Vec::new();
        for label in labels {
            let id = CardId(self.backlog.len());
            self.backlog.push(CardRecord::new(id, label));
            added.push(id);
        }

        if !added.is_empty() {
            debug!(count = added.len(), backlog = self.backlog.len(), "追加卡片");
            self.fill_window();
        }
        added
    }

    /// 注册观察者
    pub fn add_observer(&mut self, observer: Box<dyn DeckObserver>) {
        self.observers.push(observer);
    }

    /// 处理一次手势事件
    ///
    /// 只有最前面的卡片接收手势；窗口为空时什么也不做。
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        match self.window.front_mut() {
            Some(front) => front.handle_gesture(event, &mut self.surface),
            None => debug!(phase = ?event.phase, "卡组为空，忽略手势"),
        }
        self.settle_resolutions();
    }

    /// 处理宿主传来的原始手势
    ///
    /// 无法识别的阶段只记录警告，不改变任何状态。
    pub fn handle_raw_gesture(&mut self, phase: &str, offset_x: f32, offset_y: f32) {
        match phase.parse::<GesturePhase>() {
            Ok(phase) => self.handle_gesture(GestureEvent::new(phase, offset_x, offset_y)),
            Err(e) => warn!(error = %e, "忽略无法识别的手势"),
        }
    }

    /// 处理宿主命令
    pub fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::ForceSwipe(direction) => self.force_swipe(direction),
        }
    }

    /// 让最前面的卡片直接滑出
    ///
    /// 走与拖拽相同的动画和判定路径；窗口为空时什么也不做。
    pub fn force_swipe(&mut self, direction: SwipeDirection) {
        match self.window.front_mut() {
            Some(front) => front.force_swipe(direction, &mut self.surface),
            None => debug!(?direction, "卡组为空，忽略强制滑出"),
        }
        self.settle_resolutions();
    }

    /// 推进所有卡片的动画
    pub fn update(&mut self, dt: f32) {
        for controller in self.window.iter_mut() {
            controller.update(dt, &mut self.surface);
        }
        self.settle_resolutions();
    }

    /// 结算一张卡片的判定
    ///
    /// 移除窗口最前面的卡片，并在积压列表还有剩余时实例化下一张。
    /// 与最前面的卡片不符的判定会被忽略，保证每张卡片只结算一次。
    pub fn on_card_resolved(&mut self, card: CardId, direction: SwipeDirection) {
        let Some(front) = self.window.front() else {
            warn!(card = %card, "窗口为空，忽略判定");
            return;
        };
        if front.card() != card {
            warn!(card = %card, front = %front.card(), "判定与最前面的卡片不符，忽略");
            return;
        }

        self.window.pop_front();
        let decision = SwipeDecision::from(direction);
        let record = &self.backlog[card.0];
        self.history.record(card, &record.label, decision);
        info!(card = %card, label = %record.label, ?decision, "卡片已滑出");

        for observer in self.observers.iter_mut() {
            observer.card_resolved(decision, record);
        }

        self.fill_window();

        if self.window.is_empty() {
            info!("卡组已空");
            for observer in self.observers.iter_mut() {
                observer.deck_emptied();
            }
        }
    }

    fn settle_resolutions(&mut self) {
        while let Some((card, direction)) = self.resolutions.pop() {
            self.on_card_resolved(card, direction);
        }
    }

    fn fill_window(&mut self) {
        while self.window.len() < self.config.deck.window_capacity {
            if !self.load_next_card() {
                break;
            }
        }
    }

    /// 实例化积压列表中的下一张卡片，积压列表耗尽时返回 `false`
    fn load_next_card(&mut self) -> bool {
        let Some(record) = self.backlog.get(self.next_unloaded) else {
            return false;
        };

        let view = self.surface.create_view(record, self.config.deck.card_size());
        match self.window.back() {
            Some(back) => self.surface.insert_behind(view, back.view()),
            None => self.surface.add_child(view),
        }

        let rest_center = self.config.deck.rest_center();
        self.surface.set_center(view, rest_center);

        let sink: Rc<dyn DecisionSink> = self.resolutions.clone();
        let controller = CardController::new(record.id, view, &self.config, rest_center, sink);
        debug!(card = %record.id, label = %record.label, view = %view, "实例化卡片");

        self.window.push_back(controller);
        self.next_unloaded += 1;
        true
    }

    // ========== 查询 ==========

    /// 当前状态快照
    pub fn state(&self) -> CardStackState {
        CardStackState {
            backlog_len: self.backlog.len(),
            next_unloaded_index: self.next_unloaded,
            visible_window: self.window.iter().map(|c| c.card()).collect(),
            window_capacity: self.config.deck.window_capacity,
        }
    }

    /// 窗口是否为空
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// 最前面的卡片控制器
    pub fn front(&self) -> Option<&CardController> {
        self.window.front()
    }

    /// 最前面的卡片记录
    pub fn front_record(&self) -> Option<&CardRecord> {
        self.window.front().map(|c| &self.backlog[c.card().0])
    }

    /// 可见窗口，从前到后
    pub fn visible(&self) -> impl Iterator<Item = &CardController> {
        self.window.iter()
    }

    /// 尚未被滑出的卡片数（窗口内 + 未实例化）
    pub fn remaining(&self) -> usize {
        self.window.len() + self.backlog.len() - self.next_unloaded
    }

    /// 是否有卡片正在过渡
    pub fn is_animating(&self) -> bool {
        self.window.iter().any(|c| c.phase().is_transitioning())
    }

    /// 全部卡片记录（包括已滑出的）
    pub fn backlog(&self) -> &[CardRecord] {
        &self.backlog
    }

    /// 判定历史
    pub fn history(&self) -> &SwipeHistory {
        &self.history
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// 销毁卡组，取回渲染表面
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardPhase;
    use crate::error::{ConfigError, SwipeError};
    use crate::surface::RecordingSurface;

    const LABELS: [&str; 5] = ["first", "second", "third", "fourth", "last"];

    fn stack() -> CardStack<RecordingSurface> {
        CardStack::initialize(RecordingSurface::new(), SwipeConfig::default(), LABELS).unwrap()
    }

    fn settle(stack: &mut CardStack<RecordingSurface>) {
        for _ in 0..30 {
            stack.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_initialize_fills_window() {
        let stack = stack();
        let state = stack.state();

        assert_eq!(state.backlog_len, 5);
        assert_eq!(state.next_unloaded_index, 2);
        assert_eq!(state.visible_window, vec![CardId(0), CardId(1)]);
        assert_eq!(state.window_capacity, 2);
        assert_eq!(stack.remaining(), 5);
        assert_eq!(stack.front_record().map(|r| r.label.as_str()), Some("first"));
    }

    #[test]
    fn test_initialize_empty() {
        let stack = CardStack::initialize(
            RecordingSurface::new(),
            SwipeConfig::default(),
            Vec::<String>::new(),
        )
        .unwrap();
        assert!(stack.is_empty());
        assert_eq!(stack.state().next_unloaded_index, 0);
        assert!(stack.surface().calls().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SwipeConfig::default();
        config.tuning.rotation_max = -1.0;

        let err = CardStack::initialize(RecordingSurface::new(), config, LABELS).unwrap_err();
        assert!(matches!(
            err,
            SwipeError::Config(ConfigError::Validation(_))
        ));

        let mut config = SwipeConfig::default();
        config.deck.window_capacity = 0;
        assert!(CardStack::new(RecordingSurface::new(), config).is_err());
    }

    #[test]
    fn test_initialize_fewer_than_capacity() {
        let stack =
            CardStack::initialize(RecordingSurface::new(), SwipeConfig::default(), ["only"])
                .unwrap();
        assert_eq!(stack.state().visible_window, vec![CardId(0)]);
        assert_eq!(stack.state().next_unloaded_index, 1);
    }

    #[test]
    fn test_front_card_is_topmost() {
        let stack = stack();
        let views: Vec<_> = stack.visible().map(|c| c.view()).collect();
        // 绘制顺序从底到顶
        assert_eq!(stack.surface().draw_order(), &[views[1], views[0]]);
    }

    #[test]
    fn test_resolve_advances_window() {
        let mut stack = stack();

        stack.force_swipe(SwipeDirection::Right);
        assert_eq!(
            stack.front().map(|c| c.phase()),
            Some(CardPhase::Exiting(SwipeDirection::Right))
        );
        // 动画结束前窗口不变
        assert_eq!(stack.state().next_unloaded_index, 2);

        settle(&mut stack);
        let state = stack.state();
        assert_eq!(state.next_unloaded_index, 3);
        assert_eq!(state.visible_window, vec![CardId(1), CardId(2)]);
        assert_eq!(stack.remaining(), 4);

        // 新卡片在原最后一张的下方
        let views: Vec<_> = stack.visible().map(|c| c.view()).collect();
        assert_eq!(stack.surface().draw_order(), &[views[1], views[0]]);
    }

    #[test]
    fn test_resolve_all_then_noop() {
        let mut stack = stack();

        for _ in 0..LABELS.len() {
            stack.force_swipe(SwipeDirection::Left);
            settle(&mut stack);
        }
        assert!(stack.is_empty());
        assert_eq!(stack.state().next_unloaded_index, 5);
        assert_eq!(stack.history().len(), 5);
        // 积压列表记录保留
        assert_eq!(stack.backlog().len(), 5);

        stack.force_swipe(SwipeDirection::Right);
        stack.handle_gesture(GestureEvent::begin());
        stack.on_card_resolved(CardId(4), SwipeDirection::Left);
        settle(&mut stack);

        assert!(stack.is_empty());
        assert_eq!(stack.history().len(), 5);
    }

    #[test]
    fn test_stale_resolution_ignored() {
        let mut stack = stack();
        stack.on_card_resolved(CardId(1), SwipeDirection::Right);
        assert_eq!(stack.state().visible_window, vec![CardId(0), CardId(1)]);
        assert!(stack.history().is_empty());
    }

    #[test]
    fn test_append_cards_fills_free_slots() {
        let mut stack =
            CardStack::initialize(RecordingSurface::new(), SwipeConfig::default(), ["a"])
                .unwrap();
        let added = stack.append_cards(["b", "c"]);

        assert_eq!(added, vec![CardId(1), CardId(2)]);
        let state = stack.state();
        assert_eq!(state.visible_window, vec![CardId(0), CardId(1)]);
        assert_eq!(state.next_unloaded_index, 2);
        assert_eq!(state.backlog_len, 3);
    }

    #[test]
    fn test_raw_gesture_with_unknown_phase_ignored() {
        let mut stack = stack();
        stack.surface_mut().clear_calls();

        stack.handle_raw_gesture("hover", 200.0, 0.0);
        assert!(stack.surface().calls().is_empty());
        assert_eq!(stack.front().map(|c| c.phase()), Some(CardPhase::Idle));

        stack.handle_raw_gesture("began", 0.0, 0.0);
        assert_eq!(stack.front().map(|c| c.phase()), Some(CardPhase::Dragging));
    }
}
