//! # Card 模块
//!
//! 卡片控制器：把手势事件交给拖拽解释器，把松手判定交给动画器，
//! 滑出动画结束后通过 `DecisionSink` 报告结果。
//!
//! ## 状态机
//!
//! ```text
//! Idle ──begin──► Dragging ──change──► Dragging
//!                    │
//!                    ├─end(未过阈值)/cancelled──► SnappingBack ──完成──► Idle
//!                    └─end(过阈值)──────────────► Exiting ──完成──► Removed
//! Idle ──force_swipe──► Exiting
//! SnappingBack ──force_swipe──► (回弹完成后) Exiting
//! ```
//!
//! `Removed` 是终态；过渡进行中的卡片不再接受拖拽。
//! 回弹中收到的强制滑出会排队，等回弹结束再开始滑出，两段过渡不会重叠。

use std::rc::Rc;

use tracing::debug;

use crate::animation::{AnimationEvent, SwipeAnimator, TransitionKind};
use crate::config::{AnimationConfig, SwipeConfig};
use crate::drag::{DragInterpreter, OverlaySide, SwipeDirection};
use crate::input::{GestureEvent, GesturePhase};
use crate::stack::CardId;
use crate::surface::{RenderSurface, ViewId};
use crate::transform::{CardPose, Vec2};

/// 卡片状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardPhase {
    /// 静止，可以开始拖拽
    #[default]
    Idle,
    /// 拖拽中
    Dragging,
    /// 回弹动画中
    SnappingBack,
    /// 滑出动画中
    Exiting(SwipeDirection),
    /// 已移除（终态）
    Removed,
}

impl CardPhase {
    /// 是否可以接受手势
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Idle | Self::Dragging)
    }

    /// 是否处于过渡动画中
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::SnappingBack | Self::Exiting(_))
    }
}

/// 判定接收端
///
/// 卡片滑出动画结束后调用一次。由卡组在创建控制器时注入。
pub trait DecisionSink {
    fn card_resolved(&self, card: CardId, direction: SwipeDirection);
}

/// 卡片控制器
pub struct CardController {
    card: CardId,
    view: ViewId,
    phase: CardPhase,
    interpreter: DragInterpreter,
    animator: SwipeAnimator,
    animation: AnimationConfig,
    /// 卡片的静止中心
    rest_center: Vec2,
    /// 当前姿态
    pose: CardPose,
    /// 拖拽开始时的中心（松手时清除）
    drag_start: Option<Vec2>,
    /// 最近一次设置的覆盖层方向
    overlay_side: Option<OverlaySide>,
    /// 回弹结束后要执行的强制滑出
    pending_exit: Option<SwipeDirection>,
    sink: Rc<dyn DecisionSink>,
}

impl std::fmt::Debug for CardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardController")
            .field("card", &self.card)
            .field("view", &self.view)
            .field("phase", &self.phase)
            .field("pose", &self.pose)
            .finish()
    }
}

impl CardController {
    /// 为已创建的视图创建控制器
    pub fn new(
        card: CardId,
        view: ViewId,
        config: &SwipeConfig,
        rest_center: Vec2,
        sink: Rc<dyn DecisionSink>,
    ) -> Self {
        Self {
            card,
            view,
            phase: CardPhase::Idle,
            interpreter: DragInterpreter::new(config.tuning),
            animator: SwipeAnimator::new(),
            animation: config.animation,
            rest_center,
            pose: CardPose::resting(rest_center),
            drag_start: None,
            overlay_side: None,
            pending_exit: None,
            sink,
        }
    }

    pub fn card(&self) -> CardId {
        self.card
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn pose(&self) -> CardPose {
        self.pose
    }

    /// 处理一次手势事件
    ///
    /// 与当前状态不匹配的事件会被忽略。
    pub fn handle_gesture<S: RenderSurface + ?Sized>(
        &mut self,
        event: GestureEvent,
        surface: &mut S,
    ) {
        match (event.phase, self.phase) {
            (GesturePhase::Begin, CardPhase::Idle) => {
                self.drag_start = Some(self.pose.center);
                self.phase = CardPhase::Dragging;
                debug!(card = %self.card, "开始拖拽");
            }
            (GesturePhase::Change, CardPhase::Dragging) => {
                let start = self.drag_start.unwrap_or(self.rest_center);
                let feedback = self.interpreter.compute_feedback(start, event.sample);

                self.pose = CardPose {
                    center: feedback.center,
                    rotation: feedback.rotation,
                    scale: feedback.scale,
                    overlay_alpha: feedback.overlay_alpha,
                };
                self.show_overlay(feedback.overlay_side, surface);
                self.apply_pose(surface);
            }
            (GesturePhase::End, CardPhase::Dragging) => {
                let origin = self.drag_start.take().unwrap_or(self.rest_center);
                let decision = self.interpreter.compute_decision(event.sample);
                debug!(card = %self.card, ?decision, offset_x = event.sample.offset_x, "松手");

                match decision.direction() {
                    Some(direction) => self.start_exit(direction, surface),
                    None => self.start_snap_back(origin),
                }
            }
            (GesturePhase::Cancelled, CardPhase::Dragging) => {
                let origin = self.drag_start.take().unwrap_or(self.rest_center);
                debug!(card = %self.card, "拖拽被取消，回弹");
                self.start_snap_back(origin);
            }
            (phase, state) => {
                debug!(card = %self.card, ?phase, ?state, "忽略与当前状态不匹配的手势");
            }
        }
    }

    /// 不经拖拽直接滑出
    ///
    /// 回弹中的卡片会在回弹结束后滑出（只保留第一次请求）；
    /// 正在滑出或已移除的卡片忽略此命令。
    pub fn force_swipe<S: RenderSurface + ?Sized>(
        &mut self,
        direction: SwipeDirection,
        surface: &mut S,
    ) {
        match self.phase {
            CardPhase::Idle | CardPhase::Dragging => {
                self.drag_start = None;
                self.start_exit(direction, surface);
            }
            CardPhase::SnappingBack => {
                if self.pending_exit.is_none() {
                    self.pending_exit = Some(direction);
                    debug!(card = %self.card, ?direction, "回弹中，强制滑出排队");
                }
            }
            CardPhase::Exiting(_) | CardPhase::Removed => {
                debug!(card = %self.card, state = ?self.phase, "卡片已在滑出，忽略强制滑出");
            }
        }
    }

    /// 回弹结束后排队的强制滑出
    pub fn pending_exit(&self) -> Option<SwipeDirection> {
        self.pending_exit
    }

    /// 推进动画
    pub fn update<S: RenderSurface + ?Sized>(&mut self, dt: f32, surface: &mut S) {
        let Some(frame) = self.animator.update(dt) else {
            return;
        };

        self.pose = frame.pose;
        self.apply_pose(surface);

        if let Some(event) = frame.event {
            self.handle_animation_event(event, surface);
        }
    }

    /// 处理动画完成事件
    ///
    /// 每张卡片只会报告一次判定；重复或过期的完成事件会被忽略。
    pub fn handle_animation_event<S: RenderSurface + ?Sized>(
        &mut self,
        event: AnimationEvent,
        surface: &mut S,
    ) {
        let AnimationEvent::Completed(kind) = event;

        match (kind, self.phase) {
            (TransitionKind::SnapBack, CardPhase::SnappingBack) => {
                self.phase = CardPhase::Idle;
                debug!(card = %self.card, "回弹完成");
                if let Some(direction) = self.pending_exit.take() {
                    self.start_exit(direction, surface);
                }
            }
            (TransitionKind::Exit(done), CardPhase::Exiting(direction)) if done == direction => {
                self.phase = CardPhase::Removed;
                surface.remove_from_parent(self.view);
                debug!(card = %self.card, ?direction, "滑出完成");
                self.sink.card_resolved(self.card, direction);
            }
            (kind, state) => {
                debug!(card = %self.card, ?kind, ?state, "忽略重复的动画完成事件");
            }
        }
    }

    fn start_snap_back(&mut self, origin: Vec2) {
        let target = CardPose::resting(origin);
        self.phase = CardPhase::SnappingBack;
        self.animator.run_transition(
            TransitionKind::SnapBack,
            self.pose,
            target,
            self.animation.duration_secs,
        );
    }

    fn start_exit<S: RenderSurface + ?Sized>(&mut self, direction: SwipeDirection, surface: &mut S) {
        let tuning = self.interpreter.tuning();
        let sign = direction.sign();
        let target = CardPose {
            center: Vec2::new(
                self.rest_center.x + sign * self.animation.exit_distance,
                self.pose.center.y,
            ),
            rotation: sign * tuning.rotation_max,
            scale: 1.0,
            overlay_alpha: tuning.max_overlay_alpha,
        };

        self.show_overlay(direction.overlay_side(), surface);
        self.phase = CardPhase::Exiting(direction);
        self.animator.run_transition(
            TransitionKind::Exit(direction),
            self.pose,
            target,
            self.animation.duration_secs,
        );
        debug!(card = %self.card, ?direction, "开始滑出");
    }

    /// 只在方向变化时切换覆盖层图标
    fn show_overlay<S: RenderSurface + ?Sized>(&mut self, side: OverlaySide, surface: &mut S) {
        if self.overlay_side != Some(side) {
            self.overlay_side = Some(side);
            surface.set_overlay_side(self.view, side);
        }
    }

    fn apply_pose<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_center(self.view, self.pose.center);
        surface.set_transform(self.view, self.pose.rotation, self.pose.scale);
        surface.set_opacity(self.view, self.pose.overlay_alpha);
    }
}
