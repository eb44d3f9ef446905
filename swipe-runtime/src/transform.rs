//! # Transform 模块
//!
//! 卡片的几何状态：中心点、旋转、缩放以及覆盖层透明度。

use serde::{Deserialize, Serialize};

/// 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 平移
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for (f32, f32) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

/// 卡片姿态
///
/// 一张卡片在某一时刻的完整视觉状态，动画在两个姿态之间插值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPose {
    /// 卡片中心（绝对坐标）
    pub center: Vec2,
    /// 旋转角度（弧度）
    pub rotation: f32,
    /// 均匀缩放因子
    pub scale: f32,
    /// 左/右覆盖层透明度
    pub overlay_alpha: f32,
}

impl CardPose {
    /// 静止姿态：位于 `center`，无旋转、无缩放、覆盖层隐藏
    pub fn resting(center: Vec2) -> Self {
        Self {
            center,
            rotation: 0.0,
            scale: 1.0,
            overlay_alpha: 0.0,
        }
    }

    /// 线性插值到另一个姿态
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            center: self.center.lerp(other.center, t),
            rotation: self.rotation + (other.rotation - self.rotation) * t,
            scale: self.scale + (other.scale - self.scale) * t,
            overlay_alpha: self.overlay_alpha + (other.overlay_alpha - self.overlay_alpha) * t,
        }
    }
}
