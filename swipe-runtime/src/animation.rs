//! # Animation 模块
//!
//! 滑动动画器：把卡片从当前姿态过渡到目标姿态，结束时报告一次完成事件。
//!
//! ## 核心设计
//!
//! 动画只负责时间轴：宿主每帧调用 `update(dt)` 推进时间，
//! 动画器返回插值后的姿态，由卡片控制器交给渲染表面。
//! 过渡一旦开始就会运行到结束，不支持中途取消。

use crate::drag::SwipeDirection;
use crate::transform::CardPose;

/// 过渡类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// 回到拖拽起点，卡片保留
    SnapBack,
    /// 滑出屏幕，卡片移除
    Exit(SwipeDirection),
}

/// 过渡状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// 尚未推进过时间
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已完成
    Completed,
}

/// 动画事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// 过渡完成（每次过渡只会产生一次）
    Completed(TransitionKind),
}

/// 一帧动画输出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// 当前插值姿态
    pub pose: CardPose,
    /// 本帧产生的事件
    pub event: Option<AnimationEvent>,
}

/// 单次姿态过渡
///
/// 管理一个 `CardPose` 从 `from` 到 `to` 在 `duration` 时间内的变化。
#[derive(Debug, Clone)]
pub struct PoseTransition {
    /// 过渡类型
    pub kind: TransitionKind,
    /// 起始姿态
    pub from: CardPose,
    /// 目标姿态
    pub to: CardPose,
    /// 时长（秒）
    pub duration: f32,
    /// 当前状态
    pub state: TransitionState,
    /// 当前进度（0.0 - 1.0，已应用缓动）
    pub progress: f32,
    /// 已经过的时间
    elapsed: f32,
}

impl PoseTransition {
    /// 创建新的过渡
    pub fn new(kind: TransitionKind, from: CardPose, to: CardPose, duration: f32) -> Self {
        Self {
            kind,
            from,
            to,
            duration: duration.max(0.0),
            state: TransitionState::Pending,
            progress: 0.0,
            elapsed: 0.0,
        }
    }

    /// 推进时间
    ///
    /// # 返回
    /// - `true`: 过渡仍在进行中
    /// - `false`: 过渡已结束
    pub fn update(&mut self, dt: f32) -> bool {
        if self.state == TransitionState::Completed {
            return false;
        }

        self.state = TransitionState::Playing;
        self.elapsed += dt.max(0.0);

        if self.duration <= 0.0 || self.elapsed >= self.duration {
            self.progress = 1.0;
            self.state = TransitionState::Completed;
            false
        } else {
            self.progress = ease_in_out(self.elapsed / self.duration);
            true
        }
    }

    /// 当前姿态
    pub fn current_pose(&self) -> CardPose {
        if self.progress >= 1.0 {
            self.to
        } else {
            self.from.lerp(&self.to, self.progress)
        }
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state == TransitionState::Completed
    }
}

/// 缓入缓出（Cubic）
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// 滑动动画器
///
/// 每张卡片持有一个。同一时刻最多运行一个过渡。
#[derive(Debug, Clone, Default)]
pub struct SwipeAnimator {
    active: Option<PoseTransition>,
}

impl SwipeAnimator {
    /// 创建空闲的动画器
    pub fn new() -> Self {
        Self { active: None }
    }

    /// 开始一次过渡
    ///
    /// 如果已有过渡在运行，新的过渡会被忽略并返回 `false`。
    pub fn run_transition(
        &mut self,
        kind: TransitionKind,
        from: CardPose,
        target: CardPose,
        duration: f32,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(PoseTransition::new(kind, from, target, duration));
        true
    }

    /// 推进动画
    ///
    /// 没有运行中的过渡时返回 `None`。过渡结束的那一帧带有
    /// `AnimationEvent::Completed`，之后动画器回到空闲。
    pub fn update(&mut self, dt: f32) -> Option<AnimationFrame> {
        let transition = self.active.as_mut()?;
        let running = transition.update(dt);
        let pose = transition.current_pose();

        if running {
            return Some(AnimationFrame { pose, event: None });
        }

        let kind = transition.kind;
        self.active = None;
        Some(AnimationFrame {
            pose,
            event: Some(AnimationEvent::Completed(kind)),
        })
    }

    /// 是否有过渡正在运行
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// 当前过渡
    pub fn active(&self) -> Option<&PoseTransition> {
        self.active.as_ref()
    }
}
