//! # Surface 模块
//!
//! 终端渲染表面：不绘制任何东西，只维护视图树并把变化写进日志。

use std::collections::HashMap;

use swipe_runtime::{CardRecord, OverlaySide, RenderSurface, Vec2, ViewId};
use tracing::{debug, info};

/// 视图状态
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub label: String,
    pub size: Vec2,
    pub center: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub overlay: Option<OverlaySide>,
    pub overlay_alpha: f32,
}

/// 终端渲染表面
#[derive(Debug, Default)]
pub struct TerminalSurface {
    views: HashMap<ViewId, ViewState>,
    /// 绘制顺序，下标 0 为最底层
    draw_order: Vec<ViewId>,
    next_id: u64,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 视图当前状态
    pub fn view(&self, view: ViewId) -> Option<&ViewState> {
        self.views.get(&view)
    }

    /// 按从顶到底的顺序列出仍在视图树中的卡片标签
    pub fn stack_labels(&self) -> Vec<&str> {
        self.draw_order
            .iter()
            .rev()
            .filter_map(|id| self.views.get(id))
            .map(|v| v.label.as_str())
            .collect()
    }

    fn label(&self, view: ViewId) -> &str {
        self.views.get(&view).map(|v| v.label.as_str()).unwrap_or("?")
    }
}

impl RenderSurface for TerminalSurface {
    fn create_view(&mut self, card: &CardRecord, size: Vec2) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        self.views.insert(
            id,
            ViewState {
                label: card.label.clone(),
                size,
                center: Vec2::zero(),
                rotation: 0.0,
                scale: 1.0,
                overlay: None,
                overlay_alpha: 0.0,
            },
        );
        id
    }

    fn add_child(&mut self, view: ViewId) {
        self.draw_order.retain(|v| *v != view);
        self.draw_order.push(view);
        info!(card = %self.label(view), "卡片置顶");
    }

    fn insert_behind(&mut self, view: ViewId, other: ViewId) {
        self.draw_order.retain(|v| *v != view);
        let index = self
            .draw_order
            .iter()
            .position(|v| *v == other)
            .unwrap_or(0);
        self.draw_order.insert(index, view);
        info!(card = %self.label(view), behind = %self.label(other), "卡片入列");
    }

    fn set_center(&mut self, view: ViewId, center: Vec2) {
        if let Some(state) = self.views.get_mut(&view) {
            state.center = center;
        }
    }

    fn set_transform(&mut self, view: ViewId, rotation: f32, scale: f32) {
        if let Some(state) = self.views.get_mut(&view) {
            state.rotation = rotation;
            state.scale = scale;
            debug!(
                card = %state.label,
                x = state.center.x,
                y = state.center.y,
                rotation,
                scale,
                "姿态"
            );
        }
    }

    fn set_overlay_side(&mut self, view: ViewId, side: OverlaySide) {
        if let Some(state) = self.views.get_mut(&view) {
            state.overlay = Some(side);
            debug!(card = %state.label, ?side, "覆盖层切换");
        }
    }

    fn set_opacity(&mut self, view: ViewId, value: f32) {
        if let Some(state) = self.views.get_mut(&view) {
            state.overlay_alpha = value;
        }
    }

    fn remove_from_parent(&mut self, view: ViewId) {
        self.draw_order.retain(|v| *v != view);
        if let Some(state) = self.views.remove(&view) {
            info!(card = %state.label, "卡片移除");
        }
    }
}
