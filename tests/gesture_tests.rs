//! Drag and selection integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use merge_grid::core::{Block, GameConfig, Grid, Position};
use merge_grid::events::{handler_fn, EventName, EventPayload};
use merge_grid::game::{GameBuilder, MergeGame};
use merge_grid::input::{DragState, Point, PointerEvent, PointerPhase};
use merge_grid::render::RecordingGateway;
use merge_grid::rules::{Adjacent, NoRevisit, SameValue};

fn config() -> GameConfig {
    GameConfig::new().with_dimensions(3, 3).with_seed(7)
}

async fn started(config: GameConfig) -> MergeGame<RecordingGateway> {
    let mut game = GameBuilder::new(RecordingGateway::default())
        .config(config)
        .build()
        .unwrap();
    game.initialize().await.unwrap();
    game
}

fn center(game: &MergeGame<RecordingGateway>, row: usize, col: usize) -> Point {
    game.gateway().cell_center(Position::new(row, col))
}

async fn pointer(game: &mut MergeGame<RecordingGateway>, phase: PointerPhase, point: Point) -> bool {
    let mut event = PointerEvent::mouse(phase, point.x, point.y);
    game.handle_pointer(&mut event).await.unwrap()
}

/// Records the `AfterDragEnd` outcome as `(merged, selection length)`.
fn watch_drag_end(game: &mut MergeGame<RecordingGateway>) -> Rc<RefCell<Option<(bool, usize)>>> {
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    game.subscribe(
        EventName::AfterDragEnd,
        handler_fn(move |event| {
            if let EventPayload::DragEnd { merged, selection } = &event.payload {
                *sink.borrow_mut() = Some((*merged, selection.len()));
            }
            Ok(())
        }),
    );
    seen
}

/// Start and end on a single block: at most one block selected, no merge.
#[tokio::test]
async fn test_single_block_gesture_does_not_merge() {
    let mut game = started(config()).await;
    let seen = watch_drag_end(&mut game);
    let before = game.grid().clone();
    let p = center(&game, 1, 1);

    assert!(pointer(&mut game, PointerPhase::Start, p).await);
    pointer(&mut game, PointerPhase::Move, p).await;
    assert!(game.selection().len() <= 1);
    assert!(!pointer(&mut game, PointerPhase::End, p).await);

    let (merged, len) = seen.borrow().expect("drag end published");
    assert!(!merged);
    assert!(len <= 1);
    assert_eq!(game.grid(), &before);
    assert!(game.history().is_empty());
}

#[tokio::test]
async fn test_empty_gesture_reports_no_merge() {
    let mut game = started(config()).await;
    let seen = watch_drag_end(&mut game);
    let outside = Point::new(-500.0, -500.0);

    pointer(&mut game, PointerPhase::Start, outside).await;
    pointer(&mut game, PointerPhase::End, outside).await;

    assert_eq!(*seen.borrow(), Some((false, 0)));
}

/// An always-false selection rule keeps the selection empty.
#[tokio::test]
async fn test_rejecting_rule_keeps_selection_empty() {
    let mut game = started(config()).await;
    game.selection_rules_mut()
        .add(|_: &Block, _: &[Block], _: &Grid| false);

    let start = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Start, start).await;
    for (row, col) in [(0, 0), (0, 1), (1, 1), (2, 2)] {
        let p = center(&game, row, col);
        assert!(!pointer(&mut game, PointerPhase::Move, p).await);
    }

    assert!(game.selection().is_empty());
    assert_eq!(game.gateway().highlighted_count(), 0);
}

#[tokio::test]
async fn test_adjacency_rule() {
    let mut game = started(config()).await;
    game.selection_rules_mut().add(NoRevisit);
    game.selection_rules_mut().add(Adjacent::orthogonal());

    let start = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Start, start).await;
    for (row, col) in [(0, 0), (1, 1), (0, 1), (0, 0)] {
        let p = center(&game, row, col);
        pointer(&mut game, PointerPhase::Move, p).await;
    }

    let picked: Vec<_> = game.selection().iter().map(|b| b.position).collect();
    assert_eq!(picked, vec![Position::new(0, 0), Position::new(0, 1)]);
}

#[tokio::test]
async fn test_same_value_rule() {
    let mut game = GameBuilder::new(RecordingGateway::default())
        .config(config())
        .selection_rule(SameValue)
        .build()
        .unwrap();
    game.initialize().await.unwrap();

    let first = game.grid().get(Position::new(0, 0)).cloned().unwrap();
    let start = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Start, start).await;
    for row in 0..3 {
        for col in 0..3 {
            let p = center(&game, row, col);
            pointer(&mut game, PointerPhase::Move, p).await;
        }
    }

    assert!(!game.selection().is_empty());
    assert!(game.selection().iter().all(|b| b.value == first.value));
}

#[tokio::test]
async fn test_cancelled_drag_start() {
    let mut game = started(config()).await;
    game.subscribe(
        EventName::BeforeDrag,
        handler_fn(|event| {
            event.cancel();
            Ok(())
        }),
    );

    let p = center(&game, 0, 0);
    let mut start = PointerEvent::mouse(PointerPhase::Start, p.x, p.y);
    assert!(!game.handle_pointer(&mut start).await.unwrap());
    assert!(!start.default_prevented());
    assert_eq!(game.drag_state(), DragState::Idle);
}

#[tokio::test]
async fn test_cancelled_select() {
    let mut game = started(config()).await;
    game.subscribe(
        EventName::BeforeSelect,
        handler_fn(|event| {
            if let EventPayload::Select { block, .. } = &event.payload {
                if block.position == Position::new(0, 1) {
                    event.cancel();
                }
            }
            Ok(())
        }),
    );

    let start = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Start, start).await;
    for col in 0..3 {
        let p = center(&game, 0, col);
        pointer(&mut game, PointerPhase::Move, p).await;
    }

    let picked: Vec<_> = game.selection().iter().map(|b| b.position.col).collect();
    assert_eq!(picked, vec![0, 2]);
}

#[tokio::test]
async fn test_touch_gesture() {
    let mut game = started(config()).await;
    let a = center(&game, 2, 0);
    let b = center(&game, 2, 1);

    let mut start = PointerEvent::touch(PointerPhase::Start, [a]);
    assert!(game.handle_pointer(&mut start).await.unwrap());
    assert!(start.default_prevented());

    let mut first = PointerEvent::touch(PointerPhase::Move, [a, b]);
    game.handle_pointer(&mut first).await.unwrap();
    let mut second = PointerEvent::touch(PointerPhase::Move, [b]);
    game.handle_pointer(&mut second).await.unwrap();
    assert_eq!(game.selection().len(), 2);

    let mut end = PointerEvent::touch(PointerPhase::End, std::iter::empty::<Point>());
    assert!(game.handle_pointer(&mut end).await.unwrap());
    assert_eq!(game.drag_state(), DragState::Idle);
}

#[tokio::test]
async fn test_secondary_button_does_not_start() {
    use merge_grid::input::MouseButton;

    let mut game = started(config()).await;
    let p = center(&game, 0, 0);
    let mut start = PointerEvent::mouse_button(PointerPhase::Start, p.x, p.y, MouseButton::Secondary);

    assert!(!game.handle_pointer(&mut start).await.unwrap());
    assert_eq!(game.drag_state(), DragState::Idle);
}

/// A hit box scale of 2.0 reaches half a block outside the visual.
#[tokio::test]
async fn test_enlarged_hit_box() {
    let mut game = started(config().with_hit_box_scale(2.0)).await;
    let corner = game.gateway().cell_rect(Position::new(0, 0));
    let outside = Point::new(corner.x - corner.width * 0.4, corner.y + corner.height / 2.0);

    pointer(&mut game, PointerPhase::Start, outside).await;
    assert!(pointer(&mut game, PointerPhase::Move, outside).await);
    assert_eq!(game.selection()[0].position, Position::new(0, 0));
}

#[tokio::test]
async fn test_zero_hit_box_never_hits() {
    let mut game = started(config().with_hit_box_scale(0.0)).await;

    let start = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Start, start).await;
    for row in 0..3 {
        for col in 0..3 {
            let p = center(&game, row, col);
            assert!(!pointer(&mut game, PointerPhase::Move, p).await);
        }
    }
    assert!(game.selection().is_empty());
}

#[tokio::test]
async fn test_highlights_follow_selection() {
    let mut game = started(config()).await;
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in [EventName::AfterHighlight, EventName::AfterRemoveHighlight] {
        let log = Rc::clone(&log);
        game.subscribe(
            name,
            handler_fn(move |event| {
                log.borrow_mut().push(event.name());
                Ok(())
            }),
        );
    }

    let start = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Start, start).await;
    let p = center(&game, 0, 0);
    pointer(&mut game, PointerPhase::Move, p).await;
    assert_eq!(game.gateway().highlighted_count(), 1);

    pointer(&mut game, PointerPhase::End, p).await;
    assert_eq!(game.gateway().highlighted_count(), 0);
    assert_eq!(
        *log.borrow(),
        vec![EventName::AfterHighlight, EventName::AfterRemoveHighlight]
    );
}
