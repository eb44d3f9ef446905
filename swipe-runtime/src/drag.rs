//! # Drag 模块
//!
//! 拖拽解释器：把连续的拖拽位移映射为视觉反馈参数，
//! 并在松手时给出离散的滑动判定。
//!
//! 这里只有纯计算，没有任何副作用。

use serde::{Deserialize, Serialize};

use crate::config::SwipeTuning;
use crate::input::DragSample;
use crate::transform::Vec2;

/// 覆盖层方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlaySide {
    /// 左滑提示（拒绝）
    Left,
    /// 右滑提示（接受）
    Right,
}

/// 滑出方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// 水平符号：左为 -1，右为 +1
    pub fn sign(self) -> f32 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }

    /// 该方向对应的覆盖层
    pub fn overlay_side(self) -> OverlaySide {
        match self {
            SwipeDirection::Left => OverlaySide::Left,
            SwipeDirection::Right => OverlaySide::Right,
        }
    }
}

/// 松手时的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDecision {
    /// 向左滑出
    SwipeLeft,
    /// 向右滑出
    SwipeRight,
    /// 回到原位
    SnapBack,
}

impl SwipeDecision {
    /// 滑出方向（回弹时为 `None`）
    pub fn direction(self) -> Option<SwipeDirection> {
        match self {
            SwipeDecision::SwipeLeft => Some(SwipeDirection::Left),
            SwipeDecision::SwipeRight => Some(SwipeDirection::Right),
            SwipeDecision::SnapBack => None,
        }
    }
}

impl From<SwipeDirection> for SwipeDecision {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Left => SwipeDecision::SwipeLeft,
            SwipeDirection::Right => SwipeDecision::SwipeRight,
        }
    }
}

/// 拖拽中的视觉反馈
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualFeedback {
    /// 卡片新的中心点（拖拽起点 + 位移）
    pub center: Vec2,
    /// 旋转角度（弧度），绝对值不超过 `rotation_angle * rotation_max`
    pub rotation: f32,
    /// 缩放因子，范围 `[scale_max, 1]`
    pub scale: f32,
    /// 覆盖层方向
    pub overlay_side: OverlaySide,
    /// 覆盖层透明度，范围 `[0, max_overlay_alpha]`
    pub overlay_alpha: f32,
}

/// 拖拽解释器
///
/// 无状态，只持有参数；同一份参数可以被任意多张卡片共享。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragInterpreter {
    tuning: SwipeTuning,
}

impl DragInterpreter {
    /// 使用给定参数创建解释器
    pub fn new(tuning: SwipeTuning) -> Self {
        Self { tuning }
    }

    /// 当前参数
    pub fn tuning(&self) -> &SwipeTuning {
        &self.tuning
    }

    /// 旋转强度，对称截断到 `[-rotation_max, rotation_max]`
    pub fn rotation_strength(&self, offset_x: f32) -> f32 {
        // 未经验证的配置可能给出负数或 NaN，不能直接交给 clamp
        let max = self.tuning.rotation_max.abs();
        (offset_x / self.tuning.rotation_strength).min(max).max(-max)
    }

    /// 计算一次拖拽采样对应的视觉反馈
    pub fn compute_feedback(&self, drag_start_center: Vec2, sample: DragSample) -> VisualFeedback {
        let tuning = &self.tuning;
        let strength = self.rotation_strength(sample.offset_x);

        VisualFeedback {
            center: drag_start_center.offset(sample.offset_x, sample.offset_y),
            rotation: tuning.rotation_angle * strength,
            scale: (1.0 - strength.abs() / tuning.scale_strength).max(tuning.scale_max),
            overlay_side: self.overlay_side(sample.offset_x),
            overlay_alpha: self.overlay_alpha(sample.offset_x),
        }
    }

    /// 覆盖层方向：位移为正时显示右侧，否则显示左侧
    pub fn overlay_side(&self, offset_x: f32) -> OverlaySide {
        if offset_x > 0.0 {
            OverlaySide::Right
        } else {
            OverlaySide::Left
        }
    }

    /// 覆盖层透明度
    pub fn overlay_alpha(&self, offset_x: f32) -> f32 {
        (offset_x.abs() / self.tuning.overlay_distance).min(self.tuning.max_overlay_alpha)
    }

    /// 松手判定（严格大于阈值才会滑出）
    pub fn compute_decision(&self, sample: DragSample) -> SwipeDecision {
        let margin = self.tuning.action_margin;
        if sample.offset_x > margin {
            SwipeDecision::SwipeRight
        } else if sample.offset_x < -margin {
            SwipeDecision::SwipeLeft
        } else {
            SwipeDecision::SnapBack
        }
    }
}
