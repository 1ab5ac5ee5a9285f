//! Game lifecycle integration tests: initialize, reset, generation, undo.

use std::cell::RefCell;
use std::rc::Rc;

use merge_grid::core::{GameConfig, GameError, Position};
use merge_grid::events::{handler_fn, EventName, EventPayload};
use merge_grid::game::{GameBuilder, MergeGame};
use merge_grid::input::{DragState, Point, PointerEvent, PointerPhase};
use merge_grid::render::{RecordingGateway, RenderCall};

fn game(rows: usize, cols: usize) -> MergeGame<RecordingGateway> {
    GameBuilder::new(RecordingGateway::default())
        .config(GameConfig::new().with_dimensions(rows, cols).with_seed(42))
        .build()
        .unwrap()
}

fn center(game: &MergeGame<RecordingGateway>, (row, col): (usize, usize)) -> Point {
    game.gateway().cell_center(Position::new(row, col))
}

async fn drag(game: &mut MergeGame<RecordingGateway>, cells: &[(usize, usize)]) -> bool {
    let first = center(game, cells[0]);
    let mut start = PointerEvent::mouse(PointerPhase::Start, first.x, first.y);
    game.handle_pointer(&mut start).await.unwrap();
    for &cell in cells {
        let p = center(game, cell);
        let mut over = PointerEvent::mouse(PointerPhase::Move, p.x, p.y);
        game.handle_pointer(&mut over).await.unwrap();
    }
    let mut end = PointerEvent::mouse(PointerPhase::End, first.x, first.y);
    game.handle_pointer(&mut end).await.unwrap()
}

/// A 3x3 reset fills all nine cells with distinct blocks from the ladder.
#[tokio::test]
async fn test_reset_fills_grid() {
    let mut game = game(3, 3);
    assert!(game.initialize().await.unwrap());

    let grid = game.grid();
    assert_eq!(grid.occupied_count(), 9);

    let mut ids: Vec<_> = grid.blocks().map(|b| b.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 9);

    let ladder = [2, 4, 8, 16, 32, 64];
    for position in grid.positions() {
        let block = grid.get(position).expect("every cell is occupied");
        assert_eq!(block.position, position);
        assert!(ladder.contains(&block.value), "unexpected value {}", block.value);
        assert!(block.is_rendered());
    }
}

#[tokio::test]
async fn test_same_seed_same_board() {
    let mut a = game(4, 4);
    let mut b = game(4, 4);
    a.initialize().await.unwrap();
    b.initialize().await.unwrap();
    assert_eq!(a.grid().snapshot().values(), b.grid().snapshot().values());
}

/// A game resumed from a captured RNG state draws the same boards as the
/// game it was captured from, whatever seed its config names.
#[tokio::test]
async fn test_rng_state_resumes_value_stream() {
    let mut original = game(4, 4);
    original.initialize().await.unwrap();
    let state = original.rng_state();

    let mut resumed = GameBuilder::new(RecordingGateway::default())
        .config(GameConfig::new().with_dimensions(4, 4).with_seed(7))
        .rng_state(state.clone())
        .build()
        .unwrap();
    assert_eq!(resumed.rng_seed(), 42);
    assert_eq!(resumed.rng_state(), state);

    assert!(original.reset().await.unwrap());
    assert!(resumed.initialize().await.unwrap());
    assert_eq!(
        original.grid().snapshot().values(),
        resumed.grid().snapshot().values()
    );
}

#[tokio::test]
async fn test_lifecycle_event_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = game(1, 1);
    for name in [
        EventName::BeforeInitialize,
        EventName::BeforeReset,
        EventName::BeforeGenerateState,
        EventName::BeforeGenerateBlock,
        EventName::AfterGenerateBlock,
        EventName::AfterGenerateState,
        EventName::BeforeRenderBlock,
        EventName::AfterRenderBlock,
        EventName::AfterReset,
        EventName::AfterInitialize,
    ] {
        let log = Rc::clone(&log);
        game.subscribe(
            name,
            handler_fn(move |event| {
                log.borrow_mut().push(event.name());
                Ok(())
            }),
        );
    }

    game.initialize().await.unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            EventName::BeforeInitialize,
            EventName::BeforeReset,
            EventName::BeforeGenerateState,
            EventName::BeforeGenerateBlock,
            EventName::AfterGenerateBlock,
            EventName::AfterGenerateState,
            EventName::BeforeRenderBlock,
            EventName::AfterRenderBlock,
            EventName::AfterReset,
            EventName::AfterInitialize,
        ]
    );
}

#[tokio::test]
async fn test_cancelled_initialize() {
    let mut game = game(2, 2);
    game.subscribe(
        EventName::BeforeInitialize,
        handler_fn(|event| {
            event.cancel();
            Ok(())
        }),
    );

    assert!(!game.initialize().await.unwrap());
    assert_eq!(game.grid().occupied_count(), 0);
    assert!(game.gateway().calls().is_empty());
}

/// Cancelling `BeforeReset` leaves the grid and the selection untouched.
#[tokio::test]
async fn test_cancelled_reset_preserves_state() {
    let mut game = game(3, 3);
    game.initialize().await.unwrap();

    let center = game.gateway().cell_center(Position::new(1, 1));
    let mut start = PointerEvent::mouse(PointerPhase::Start, center.x, center.y);
    game.handle_pointer(&mut start).await.unwrap();
    let mut over = PointerEvent::mouse(PointerPhase::Move, center.x, center.y);
    game.handle_pointer(&mut over).await.unwrap();

    let grid = game.grid().clone();
    game.subscribe(
        EventName::BeforeReset,
        handler_fn(|event| {
            event.cancel();
            Ok(())
        }),
    );

    assert!(!game.reset().await.unwrap());
    assert_eq!(game.grid(), &grid);
    assert_eq!(game.selection().len(), 1);
}

/// Cancelling `BeforeGenerateState` mid-drag keeps the drag alive, so its
/// highlights are still removed when the gesture ends.
#[tokio::test]
async fn test_cancelled_generation_keeps_drag() {
    let mut game = game(3, 3);
    game.initialize().await.unwrap();

    let center = game.gateway().cell_center(Position::new(1, 1));
    let mut start = PointerEvent::mouse(PointerPhase::Start, center.x, center.y);
    game.handle_pointer(&mut start).await.unwrap();
    let mut over = PointerEvent::mouse(PointerPhase::Move, center.x, center.y);
    game.handle_pointer(&mut over).await.unwrap();
    assert_eq!(game.gateway().highlighted_count(), 1);

    let grid = game.grid().clone();
    game.subscribe(
        EventName::BeforeGenerateState,
        handler_fn(|event| {
            event.cancel();
            Ok(())
        }),
    );

    assert!(!game.reset().await.unwrap());
    assert_eq!(game.grid(), &grid);
    assert_eq!(game.selection().len(), 1);
    assert_eq!(game.drag_state(), DragState::Dragging);
    assert_eq!(game.gateway().highlighted_count(), 1);

    let mut end = PointerEvent::mouse(PointerPhase::End, center.x, center.y);
    game.handle_pointer(&mut end).await.unwrap();
    assert_eq!(game.gateway().highlighted_count(), 0);
    assert_eq!(game.drag_state(), DragState::Idle);
}

#[tokio::test]
async fn test_reset_without_target() {
    let mut game = GameBuilder::new(RecordingGateway::detached()).build().unwrap();
    let err = game.initialize().await.unwrap_err();
    assert!(matches!(err, GameError::NoTargetElement));
}

#[tokio::test]
async fn test_generated_block_replacement() {
    let mut game = game(2, 3);
    game.subscribe(
        EventName::AfterGenerateBlock,
        handler_fn(|event| {
            if let EventPayload::Block(block) = &mut event.payload {
                block.value = 8;
            }
            Ok(())
        }),
    );

    game.initialize().await.unwrap();
    assert!(game.grid().blocks().all(|b| b.value == 8));
}

#[tokio::test]
async fn test_generation_cancel_leaves_holes() {
    let mut game = game(2, 2);
    game.subscribe(
        EventName::BeforeGenerateBlock,
        handler_fn(|event| {
            if event.payload == EventPayload::Position(Position::new(0, 1)) {
                event.cancel();
            }
            Ok(())
        }),
    );

    game.initialize().await.unwrap();
    assert_eq!(game.grid().empty_positions(), vec![Position::new(0, 1)]);
}

#[tokio::test]
async fn test_handler_error_propagates() {
    let mut game = game(2, 2);
    game.subscribe(EventName::AfterReset, handler_fn(|_| Err("host failure".into())));

    let err = game.initialize().await.unwrap_err();
    assert!(matches!(err, GameError::Handler { event: EventName::AfterReset, .. }));
}

#[tokio::test]
async fn test_reset_keeps_history() {
    let mut game = game(3, 3);
    game.initialize().await.unwrap();
    assert!(drag(&mut game, &[(0, 0), (0, 1)]).await);
    assert_eq!(game.history().len(), 1);

    game.reset().await.unwrap();
    assert_eq!(game.history().len(), 1);
}

#[tokio::test]
async fn test_undo_restores_previous_grid() {
    let mut game = game(3, 3);
    game.initialize().await.unwrap();
    let before = game.grid().snapshot();

    assert!(drag(&mut game, &[(1, 0), (1, 1), (1, 2)]).await);
    assert_ne!(game.grid().snapshot(), before);

    game.gateway_mut().clear_calls();
    assert!(game.undo().await.unwrap());

    assert_eq!(game.grid().snapshot(), before);
    assert!(game.history().is_empty());
    assert!(game.grid().blocks().all(|b| b.is_rendered()));
    assert_eq!(game.gateway().live_count(), 9);
    assert!(matches!(game.gateway().calls()[0], RenderCall::Retire(_)));

    assert!(!game.undo().await.unwrap());
}

#[tokio::test]
async fn test_cancelled_undo_keeps_history() {
    let mut game = game(3, 3);
    game.initialize().await.unwrap();
    drag(&mut game, &[(0, 0), (1, 0)]).await;
    let after_merge = game.grid().clone();

    game.subscribe(
        EventName::BeforeUndo,
        handler_fn(|event| {
            event.cancel();
            Ok(())
        }),
    );

    assert!(!game.undo().await.unwrap());
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.grid(), &after_merge);
}
