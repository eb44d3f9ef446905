//! # Surface 模块
//!
//! 渲染表面接口。
//!
//! 卡组不关心视图如何绘制，只通过 `RenderSurface` 创建、摆放和移除卡片视图。
//! 具体 UI 绑定实现一个薄适配层即可。

use crate::drag::OverlaySide;
use crate::stack::CardRecord;
use crate::transform::Vec2;

/// 视图标识符
///
/// 由渲染表面在创建视图时分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

/// 渲染表面
pub trait RenderSurface {
    /// 为卡片创建视图（尚未加入视图树）
    fn create_view(&mut self, card: &CardRecord, size: Vec2) -> ViewId;

    /// 把视图加到最上层
    fn add_child(&mut self, view: ViewId);

    /// 把视图插入到 `other` 的下方
    fn insert_behind(&mut self, view: ViewId, other: ViewId);

    /// 设置视图中心
    fn set_center(&mut self, view: ViewId, center: Vec2);

    /// 设置旋转（弧度）与均匀缩放
    fn set_transform(&mut self, view: ViewId, rotation: f32, scale: f32);

    /// 切换覆盖层图标
    fn set_overlay_side(&mut self, view: ViewId, side: OverlaySide);

    /// 设置覆盖层透明度
    fn set_opacity(&mut self, view: ViewId, value: f32);

    /// 从视图树移除并销毁视图
    fn remove_from_parent(&mut self, view: ViewId);
}

/// 渲染表面调用记录
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create { view: ViewId, label: String },
    AddChild(ViewId),
    InsertBehind { view: ViewId, other: ViewId },
    SetCenter { view: ViewId, center: Vec2 },
    SetTransform { view: ViewId, rotation: f32, scale: f32 },
    SetOverlaySide { view: ViewId, side: OverlaySide },
    SetOpacity { view: ViewId, value: f32 },
    Remove(ViewId),
}

/// 记录所有调用并维护绘制顺序的渲染表面
///
/// 不依赖真实的渲染设备，供无界面宿主和测试使用。
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    /// 绘制顺序，下标 0 为最底层
    draw_order: Vec<ViewId>,
    next_id: u64,
}

impl RecordingSurface {
    /// 创建空的表面
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部调用记录
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// 清空调用记录（不影响绘制顺序）
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// 当前绘制顺序，从底到顶
    pub fn draw_order(&self) -> &[ViewId] {
        &self.draw_order
    }

    /// 最上层视图
    pub fn topmost(&self) -> Option<ViewId> {
        self.draw_order.last().copied()
    }

    /// 某个视图最后一次被设置的中心
    pub fn last_center(&self, view: ViewId) -> Option<Vec2> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::SetCenter { view: v, center } if *v == view => Some(*center),
            _ => None,
        })
    }

    /// 某个视图最后一次被设置的覆盖层透明度
    pub fn last_opacity(&self, view: ViewId) -> Option<f32> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::SetOpacity { view: v, value } if *v == view => Some(*value),
            _ => None,
        })
    }

    /// 某个视图最后一次被设置的旋转与缩放
    pub fn last_transform(&self, view: ViewId) -> Option<(f32, f32)> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::SetTransform {
                view: v,
                rotation,
                scale,
            } if *v == view => Some((*rotation, *scale)),
            _ => None,
        })
    }

    /// 覆盖层图标的切换记录
    pub fn overlay_side_changes(&self, view: ViewId) -> Vec<OverlaySide> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::SetOverlaySide { view: v, side } if *v == view => Some(*side),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn create_view(&mut self, card: &CardRecord, _size: Vec2) -> ViewId {
        self.next_id += 1;
        let view = ViewId(self.next_id);
        self.calls.push(SurfaceCall::Create {
            view,
            label: card.label.clone(),
        });
        view
    }

    fn add_child(&mut self, view: ViewId) {
        self.draw_order.retain(|v| *v != view);
        self.draw_order.push(view);
        self.calls.push(SurfaceCall::AddChild(view));
    }

    fn insert_behind(&mut self, view: ViewId, other: ViewId) {
        self.draw_order.retain(|v| *v != view);
        let index = self
            .draw_order
            .iter()
            .position(|v| *v == other)
            .unwrap_or(0);
        self.draw_order.insert(index, view);
        self.calls.push(SurfaceCall::InsertBehind { view, other });
    }

    fn set_center(&mut self, view: ViewId, center: Vec2) {
        self.calls.push(SurfaceCall::SetCenter { view, center });
    }

    fn set_transform(&mut self, view: ViewId, rotation: f32, scale: f32) {
        self.calls.push(SurfaceCall::SetTransform {
            view,
            rotation,
            scale,
        });
    }

    fn set_overlay_side(&mut self, view: ViewId, side: OverlaySide) {
        self.calls.push(SurfaceCall::SetOverlaySide { view, side });
    }

    fn set_opacity(&mut self, view: ViewId, value: f32) {
        self.calls.push(SurfaceCall::SetOpacity { view, value });
    }

    fn remove_from_parent(&mut self, view: ViewId) {
        self.draw_order.retain(|v| *v != view);
        self.calls.push(SurfaceCall::Remove(view));
    }
}
