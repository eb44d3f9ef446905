//! # 卡组流程集成测试
//!
//! 测试 手势 → CardController → CardStack → DeckObserver 的完整链路。
//! 这些测试不依赖真实的渲染设备。

use std::cell::RefCell;
use std::rc::Rc;

use swipe_runtime::{
    CardId, CardPhase, CardRecord, CardStack, DeckObserver, GestureEvent, HostCommand,
    RecordingSurface, SwipeConfig, SwipeDecision, SwipeDirection,
};

const LABELS: [&str; 5] = ["first", "second", "third", "fourth", "last"];

/// 记录观察者收到的通知
#[derive(Clone, Default)]
struct DecisionLog {
    resolved: Rc<RefCell<Vec<(String, SwipeDecision)>>>,
    emptied: Rc<RefCell<usize>>,
}

impl DeckObserver for DecisionLog {
    fn card_resolved(&mut self, decision: SwipeDecision, card: &CardRecord) {
        self.resolved.borrow_mut().push((card.label.clone(), decision));
    }

    fn deck_emptied(&mut self) {
        *self.emptied.borrow_mut() += 1;
    }
}

fn deck_with_log(config: SwipeConfig) -> (CardStack<RecordingSurface>, DecisionLog) {
    let mut stack = CardStack::initialize(RecordingSurface::new(), config, LABELS).unwrap();
    let log = DecisionLog::default();
    stack.add_observer(Box::new(log.clone()));
    (stack, log)
}

/// 以 60 FPS 推进到所有动画结束
fn run_until_idle(stack: &mut CardStack<RecordingSurface>) {
    let mut frames = 0;
    while stack.is_animating() {
        stack.update(1.0 / 60.0);
        frames += 1;
        assert!(frames < 600, "动画没有结束");
    }
}

fn drag(stack: &mut CardStack<RecordingSurface>, dx: f32, dy: f32) {
    stack.handle_gesture(GestureEvent::begin());
    for step in 1..=10 {
        let t = step as f32 / 10.0;
        stack.handle_gesture(GestureEvent::change(dx * t, dy * t));
    }
    stack.handle_gesture(GestureEvent::end(dx, dy));
}

#[test]
fn test_drag_right_past_margin() {
    let (mut stack, log) = deck_with_log(SwipeConfig::default());

    drag(&mut stack, 180.0, 20.0);
    assert_eq!(
        stack.front().map(|c| c.phase()),
        Some(CardPhase::Exiting(SwipeDirection::Right))
    );
    assert!(log.resolved.borrow().is_empty());

    run_until_idle(&mut stack);

    assert_eq!(
        log.resolved.borrow().as_slice(),
        &[("first".to_string(), SwipeDecision::SwipeRight)]
    );
    let state = stack.state();
    assert_eq!(state.next_unloaded_index, 3);
    assert_eq!(state.visible_window, vec![CardId(1), CardId(2)]);
}

#[test]
fn test_drag_within_margin_snaps_back() {
    let (mut stack, log) = deck_with_log(SwipeConfig::default());
    let rest = stack.config().deck.rest_center();

    drag(&mut stack, 120.0, -35.0);
    assert_eq!(stack.front().map(|c| c.phase()), Some(CardPhase::SnappingBack));
    run_until_idle(&mut stack);

    assert!(log.resolved.borrow().is_empty());
    let front = stack.front().unwrap();
    assert_eq!(front.card(), CardId(0));
    assert_eq!(front.phase(), CardPhase::Idle);
    assert_eq!(stack.surface().last_center(front.view()), Some(rest));
    assert_eq!(stack.state().next_unloaded_index, 2);
}

#[test]
fn test_force_swipe_matches_drag() {
    let (mut dragged, dragged_log) = deck_with_log(SwipeConfig::default());
    let (mut forced, forced_log) = deck_with_log(SwipeConfig::default());

    drag(&mut dragged, 200.0, 0.0);
    run_until_idle(&mut dragged);

    forced.handle_command(HostCommand::swipe_right());
    run_until_idle(&mut forced);

    assert_eq!(forced_log.resolved.borrow().len(), 1);
    assert_eq!(
        dragged_log.resolved.borrow().as_slice(),
        forced_log.resolved.borrow().as_slice()
    );
    assert_eq!(dragged.state(), forced.state());
}

#[test]
fn test_force_swipe_during_snap_back_resolves_once() {
    let (mut stack, log) = deck_with_log(SwipeConfig::default());

    drag(&mut stack, 60.0, 0.0);
    assert_eq!(stack.front().map(|c| c.phase()), Some(CardPhase::SnappingBack));
    stack.update(0.05);

    // 回弹途中点击按钮，回弹结束后滑出
    stack.handle_command(HostCommand::swipe_right());
    run_until_idle(&mut stack);

    assert_eq!(
        log.resolved.borrow().as_slice(),
        &[("first".to_string(), SwipeDecision::SwipeRight)]
    );
    assert_eq!(stack.state().visible_window, vec![CardId(1), CardId(2)]);
}

#[test]
fn test_gestures_ignored_during_exit() {
    let (mut stack, log) = deck_with_log(SwipeConfig::default());

    stack.force_swipe(SwipeDirection::Left);
    // 动画进行中再次拖拽和强制滑出都不生效
    drag(&mut stack, 300.0, 0.0);
    stack.force_swipe(SwipeDirection::Right);
    run_until_idle(&mut stack);

    assert_eq!(
        log.resolved.borrow().as_slice(),
        &[("first".to_string(), SwipeDecision::SwipeLeft)]
    );
}

#[test]
fn test_full_session() {
    let (mut stack, log) = deck_with_log(SwipeConfig::default());

    drag(&mut stack, 250.0, 10.0);
    run_until_idle(&mut stack);

    // 被取消的拖拽不产生判定
    stack.handle_gesture(GestureEvent::begin());
    stack.handle_gesture(GestureEvent::change(-300.0, 0.0));
    stack.handle_gesture(GestureEvent::cancelled(-300.0, 0.0));
    run_until_idle(&mut stack);

    drag(&mut stack, -121.0, 0.0);
    run_until_idle(&mut stack);

    stack.handle_command(HostCommand::swipe_right());
    run_until_idle(&mut stack);

    stack.handle_raw_gesture("begin", 0.0, 0.0);
    stack.handle_raw_gesture("possible", 0.0, 0.0);
    stack.handle_raw_gesture("end", -400.0, 80.0);
    run_until_idle(&mut stack);

    stack.force_swipe(SwipeDirection::Right);
    run_until_idle(&mut stack);

    insta::assert_debug_snapshot!(log.resolved.borrow().clone(), @r#"
    [
        (
            "first",
            SwipeRight,
        ),
        (
            "second",
            SwipeLeft,
        ),
        (
            "third",
            SwipeRight,
        ),
        (
            "fourth",
            SwipeLeft,
        ),
        (
            "last",
            SwipeRight,
        ),
    ]
    "#);

    assert!(stack.is_empty());
    assert_eq!(*log.emptied.borrow(), 1);
    assert_eq!(stack.history().count(SwipeDecision::SwipeRight), 3);
    assert_eq!(stack.backlog().len(), 5);

    // 卡组耗尽后的输入不会再产生通知
    stack.force_swipe(SwipeDirection::Left);
    drag(&mut stack, 500.0, 0.0);
    run_until_idle(&mut stack);
    assert_eq!(log.resolved.borrow().len(), 5);
    assert_eq!(*log.emptied.borrow(), 1);
}

#[test]
fn test_window_capacity_invariant() {
    let mut config = SwipeConfig::default();
    config.deck.window_capacity = 3;
    let (mut stack, _) = deck_with_log(config);

    for _ in 0..LABELS.len() {
        let state = stack.state();
        assert!(state.visible_window.len() <= 3);

        // 窗口总是积压列表中紧邻 next_unloaded 之前的连续区间
        let start = state.next_unloaded_index - state.visible_window.len();
        let expected: Vec<_> = (start..state.next_unloaded_index).map(CardId).collect();
        assert_eq!(state.visible_window, expected);

        // 最前面的卡片在最上层
        let front_view = stack.front().map(|c| c.view());
        assert_eq!(stack.surface().topmost(), front_view);

        stack.force_swipe(SwipeDirection::Left);
        run_until_idle(&mut stack);
    }

    assert!(stack.is_empty());
    assert!(stack.surface().draw_order().is_empty());
}

#[test]
fn test_append_after_empty_restarts_deck() {
    let (mut stack, log) = deck_with_log(SwipeConfig::default());
    for _ in 0..LABELS.len() {
        stack.force_swipe(SwipeDirection::Right);
        run_until_idle(&mut stack);
    }
    assert!(stack.is_empty());

    stack.append_cards(["bonus"]);
    assert_eq!(stack.front_record().map(|r| r.label.as_str()), Some("bonus"));

    stack.force_swipe(SwipeDirection::Left);
    run_until_idle(&mut stack);
    assert_eq!(
        log.resolved.borrow().last(),
        Some(&("bonus".to_string(), SwipeDecision::SwipeLeft))
    );
    assert_eq!(*log.emptied.borrow(), 2);
}
