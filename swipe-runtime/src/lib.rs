//! # Swipe Runtime
//!
//! 卡片滑动交互的核心运行时库。
//!
//! ## 架构概述
//!
//! `swipe-runtime` 是纯逻辑核心，不依赖任何渲染引擎。
//! 宿主层（Host）采集手势、驱动时间，并通过 `RenderSurface` 接收绘制指令：
//!
//! ```text
//! Host                                Runtime
//!   │                                    │
//!   │──── GestureEvent / HostCommand ──►│ CardStack
//!   │──── update(dt) ──────────────────►│   └─ CardController (最前面的卡片)
//!   │                                    │        ├─ DragInterpreter
//!   │◄─── RenderSurface 调用 ────────────│        └─ SwipeAnimator
//!   │◄─── DeckObserver::card_resolved ──│
//! ```
//!
//! ## 核心类型
//!
//! - [`DragInterpreter`]：拖拽位移 → 视觉反馈 / 滑动判定
//! - [`SwipeAnimator`]：回弹与滑出的定时过渡
//! - [`CardController`]：单张卡片的状态机
//! - [`CardStack`]：积压列表 + 有限可见窗口
//!
//! ## 使用示例
//!
//! ```ignore
//! use swipe_runtime::{CardStack, GestureEvent, RecordingSurface, SwipeConfig};
//!
//! let mut stack = CardStack::initialize(
//!     RecordingSurface::new(),
//!     SwipeConfig::default(),
//!     ["first", "second", "third"],
//! )?;
//!
//! stack.handle_gesture(GestureEvent::begin());
//! stack.handle_gesture(GestureEvent::change(150.0, 0.0));
//! stack.handle_gesture(GestureEvent::end(150.0, 0.0));
//!
//! // 主循环
//! while stack.is_animating() {
//!     stack.update(1.0 / 60.0);
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`config`]：可调参数与配置文件
//! - [`drag`]：拖拽解释器
//! - [`animation`]：滑动动画器
//! - [`card`]：卡片控制器
//! - [`stack`]：卡组缓冲区
//! - [`surface`]：渲染表面接口
//! - [`input`]：手势与宿主命令
//! - [`history`]：判定历史
//! - [`error`]：错误类型定义

pub mod animation;
pub mod card;
pub mod config;
pub mod drag;
pub mod error;
pub mod history;
pub mod input;
pub mod stack;
pub mod surface;
pub mod transform;

// 重导出核心类型
pub use animation::{AnimationEvent, AnimationFrame, PoseTransition, SwipeAnimator, TransitionKind};
pub use card::{CardController, CardPhase, DecisionSink};
pub use config::{AnimationConfig, DeckConfig, SwipeConfig, SwipeTuning};
pub use drag::{DragInterpreter, OverlaySide, SwipeDecision, SwipeDirection, VisualFeedback};
pub use error::{ConfigError, InputError, SwipeError, SwipeResult};
pub use history::{SwipeHistory, SwipeRecord};
pub use input::{DragSample, GestureEvent, GesturePhase, HostCommand};
pub use stack::{CardId, CardRecord, CardStack, CardStackState, DeckObserver};
pub use surface::{RecordingSurface, RenderSurface, SurfaceCall, ViewId};
pub use transform::{CardPose, Vec2};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _event = GestureEvent::change(10.0, 0.0);
        let _command = HostCommand::swipe_right();
        let _drag = DragInterpreter::new(SwipeTuning::default());

        let stack =
            CardStack::initialize(RecordingSurface::new(), SwipeConfig::default(), ["a"]).unwrap();
        assert!(!stack.is_empty());
    }
}
