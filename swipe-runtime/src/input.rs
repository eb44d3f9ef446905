//! # Input 模块
//!
//! 定义宿主层向卡组传递的输入事件。
//!
//! ## 设计说明
//!
//! - `GestureEvent` 是宿主采集的拖拽手势，位移相对于拖拽起点
//! - `HostCommand` 是不依赖拖拽的外部命令（如"喜欢"/"跳过"按钮）
//! - 卡组不直接处理触摸/鼠标事件，只处理这里的语义化输入

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::drag::SwipeDirection;
use crate::error::InputError;
use crate::transform::Vec2;

/// 拖拽采样：相对于拖拽起点的位移
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragSample {
    pub offset_x: f32,
    pub offset_y: f32,
}

impl DragSample {
    /// 创建拖拽采样
    pub const fn new(offset_x: f32, offset_y: f32) -> Self {
        Self { offset_x, offset_y }
    }

    /// 位移向量
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

/// 手势阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// 开始拖拽
    Begin,
    /// 拖拽中
    Change,
    /// 松手
    End,
    /// 被系统取消（按回弹处理，不产生判定）
    Cancelled,
}

impl FromStr for GesturePhase {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "begin" | "began" => Ok(Self::Begin),
            "change" | "changed" => Ok(Self::Change),
            "end" | "ended" => Ok(Self::End),
            "cancel" | "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(InputError::UnknownPhase(other.to_string())),
        }
    }
}

/// 手势事件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub sample: DragSample,
}

impl GestureEvent {
    /// 创建手势事件
    pub fn new(phase: GesturePhase, offset_x: f32, offset_y: f32) -> Self {
        Self {
            phase,
            sample: DragSample::new(offset_x, offset_y),
        }
    }

    /// 开始拖拽
    pub fn begin() -> Self {
        Self::new(GesturePhase::Begin, 0.0, 0.0)
    }

    /// 拖拽中
    pub fn change(offset_x: f32, offset_y: f32) -> Self {
        Self::new(GesturePhase::Change, offset_x, offset_y)
    }

    /// 松手
    pub fn end(offset_x: f32, offset_y: f32) -> Self {
        Self::new(GesturePhase::End, offset_x, offset_y)
    }

    /// 取消
    pub fn cancelled(offset_x: f32, offset_y: f32) -> Self {
        Self::new(GesturePhase::Cancelled, offset_x, offset_y)
    }
}

/// 宿主命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostCommand {
    /// 不经拖拽直接把最前面的卡片滑出
    ForceSwipe(SwipeDirection),
}

impl HostCommand {
    /// "跳过"按钮
    pub fn swipe_left() -> Self {
        Self::ForceSwipe(SwipeDirection::Left)
    }

    /// "喜欢"按钮
    pub fn swipe_right() -> Self {
        Self::ForceSwipe(SwipeDirection::Right)
    }
}

impl FromStr for HostCommand {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "pass" | "no" => Ok(Self::swipe_left()),
            "right" | "like" | "yes" => Ok(Self::swipe_right()),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_creation() {
        let event = GestureEvent::change(12.0, -4.0);
        assert_eq!(event.phase, GesturePhase::Change);
        assert_eq!(event.sample.offset(), Vec2::new(12.0, -4.0));

        assert_eq!(GestureEvent::begin().sample, DragSample::default());
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("begin".parse::<GesturePhase>(), Ok(GesturePhase::Begin));
        assert_eq!("Changed".parse::<GesturePhase>(), Ok(GesturePhase::Change));
        assert_eq!(" end ".parse::<GesturePhase>(), Ok(GesturePhase::End));
        assert_eq!(
            "canceled".parse::<GesturePhase>(),
            Ok(GesturePhase::Cancelled)
        );
        assert_eq!(
            "possible".parse::<GesturePhase>(),
            Err(InputError::UnknownPhase("possible".to_string()))
        );
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("left".parse::<HostCommand>(), Ok(HostCommand::swipe_left()));
        assert_eq!("LIKE".parse::<HostCommand>(), Ok(HostCommand::swipe_right()));
        assert!(matches!(
            "menu".parse::<HostCommand>(),
            Err(InputError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_input_serialization() {
        let event = GestureEvent::end(150.0, 3.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"end\""));
        let deserialized: GestureEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
