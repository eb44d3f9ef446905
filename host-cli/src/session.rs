//! # Session 模块
//!
//! 按脚本驱动一叠卡片：把步骤翻译成手势和命令，并以固定帧长推进动画。

use anyhow::{Context, Result};
use swipe_runtime::{
    CardRecord, CardStack, DeckObserver, GestureEvent, SwipeConfig, SwipeDecision, SwipeHistory,
};
use tracing::{info, warn};

use crate::script::Step;
use crate::surface::TerminalSurface;

/// 一次拖拽拆成的采样数
const DRAG_SAMPLES: u32 = 12;

/// 防止动画永远不结束的帧数上限
const MAX_SETTLE_FRAMES: u32 = 10_000;

/// 在终端打印判定
struct ConsoleObserver;

impl DeckObserver for ConsoleObserver {
    fn card_resolved(&mut self, decision: SwipeDecision, card: &CardRecord) {
        match decision {
            SwipeDecision::SwipeRight => println!("👍 喜欢: {}", card.label),
            SwipeDecision::SwipeLeft => println!("👎 跳过: {}", card.label),
            SwipeDecision::SnapBack => {}
        }
    }

    fn deck_emptied(&mut self) {
        println!("🃏 没有更多卡片了");
    }
}

/// 脚本会话
pub struct Session {
    stack: CardStack<TerminalSurface>,
    /// 每帧时长（秒）
    tick: f32,
}

impl Session {
    pub fn new<I, L>(config: SwipeConfig, labels: I, tick_ms: u64) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut stack = CardStack::initialize(TerminalSurface::new(), config, labels)
            .context("无法创建卡组")?;
        stack.add_observer(Box::new(ConsoleObserver));

        Ok(Self {
            stack,
            tick: tick_ms.max(1) as f32 / 1000.0,
        })
    }

    /// 依次执行全部步骤
    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            if self.stack.is_empty() {
                warn!(?step, "卡组已空，跳过剩余步骤");
                break;
            }
            self.apply(step);
            self.settle();
        }
    }

    fn apply(&mut self, step: &Step) {
        info!(?step, "执行步骤");
        match step {
            Step::Drag { dx, dy } => {
                self.drag_to(*dx, *dy);
                self.stack.handle_gesture(GestureEvent::end(*dx, *dy));
            }
            Step::Cancel { dx, dy } => {
                self.drag_to(*dx, *dy);
                self.stack
                    .handle_gesture(GestureEvent::cancelled(*dx, *dy));
            }
            Step::Command(command) => self.stack.handle_command(*command),
            Step::Raw { phase, dx, dy } => self.stack.handle_raw_gesture(phase, *dx, *dy),
            Step::Wait(ms) => {
                let frames = (*ms as f32 / 1000.0 / self.tick).ceil() as u32;
                for _ in 0..frames {
                    self.stack.update(self.tick);
                }
            }
        }
    }

    /// 开始拖拽并分若干帧移动到目标位移
    fn drag_to(&mut self, dx: f32, dy: f32) {
        self.stack.handle_gesture(GestureEvent::begin());
        for i in 1..=DRAG_SAMPLES {
            let t = i as f32 / DRAG_SAMPLES as f32;
            self.stack.handle_gesture(GestureEvent::change(dx * t, dy * t));
            self.stack.update(self.tick);
        }
    }

    /// 推进到没有卡片在过渡
    fn settle(&mut self) {
        let mut frames = 0;
        while self.stack.is_animating() && frames < MAX_SETTLE_FRAMES {
            self.stack.update(self.tick);
            frames += 1;
        }
    }

    pub fn stack(&self) -> &CardStack<TerminalSurface> {
        &self.stack
    }

    pub fn history(&self) -> &SwipeHistory {
        self.stack.history()
    }
}
