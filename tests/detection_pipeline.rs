//! Public API tests for the motion → capture → recognize → display pipeline.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use smileback::controller::{CycleOutcome, DetectionController, MotionHandler, MotionState};
use smileback::display::{ChannelDisplaySink, ScoreBoard};
use smileback::events::{EventBus, SmileEvent};
use smileback::gpio::{Edge, GpioController, Level, MockGpio};
use smileback::mood::MoodLevel;
use smileback::recognizer::{FaceScore, MockRecognizer};
use smileback::MockImageSource;
use tokio::time::timeout;

const LED: u32 = 6;
const MOTION: u32 = 5;

async fn wait_for_board(board: &Arc<Mutex<ScoreBoard>>, mood: MoodLevel) {
    timeout(Duration::from_secs(2), async {
        while board.lock().visible() != Some(mood) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("score board never showed the mood");
}

#[tokio::test]
async fn test_score_board_follows_each_detection() {
    let gpio = MockGpio::new();
    let events = EventBus::new(32);
    let mut receiver = events.subscribe();
    let motion = MotionState::new();

    let led = gpio.open_output(LED, Level::High).unwrap();
    let input = gpio.open_input(MOTION).unwrap();
    MotionHandler::new(motion.clone(), Some(led))
        .with_event_bus(events.clone())
        .attach(input.as_ref())
        .unwrap();

    let recognizer = Arc::new(MockRecognizer::new());
    recognizer.push_faces(vec![FaceScore::new(0.9, 0.0)]);
    recognizer.push_faces(vec![FaceScore::new(0.1, 0.35), FaceScore::new(0.1, 0.25)]);
    recognizer.push_faces(Vec::new());

    let (sink, mood_receiver) = ChannelDisplaySink::new();
    let board = Arc::new(Mutex::new(ScoreBoard::new()));
    let renderer = ScoreBoard::spawn(Arc::clone(&board), mood_receiver);

    let mut controller = DetectionController::new(
        Arc::new(MockImageSource::new()),
        recognizer.clone(),
        Arc::new(sink),
        motion,
        Duration::from_millis(250),
    )
    .await
    .unwrap()
    .with_event_bus(events);

    assert_eq!(controller.run_cycle().await, CycleOutcome::Idle);
    assert_eq!(board.lock().visible(), None);

    gpio.input(MOTION).unwrap().trigger(Edge::Rising);
    assert_eq!(gpio.output(LED).unwrap().level(), Level::Low);
    match receiver.recv().await.unwrap() {
        SmileEvent::MotionChanged { active, .. } => assert!(active),
        other => panic!("Unexpected event: {:?}", other),
    }

    assert_eq!(
        controller.run_cycle().await,
        CycleOutcome::Dispatched(MoodLevel::FullHappy)
    );
    wait_for_board(&board, MoodLevel::FullHappy).await;

    // Mean anger 0.3 doubled beats zero-ish happiness
    assert_eq!(
        controller.run_cycle().await,
        CycleOutcome::Dispatched(MoodLevel::FullAnger)
    );
    wait_for_board(&board, MoodLevel::FullAnger).await;

    assert_eq!(controller.run_cycle().await, CycleOutcome::NoFaces);
    assert_eq!(board.lock().visible(), Some(MoodLevel::FullAnger));
    assert_eq!(board.lock().render(), "[*][ ][ ][ ][ ]");

    gpio.input(MOTION).unwrap().trigger(Edge::Falling);
    assert_eq!(gpio.output(LED).unwrap().level(), Level::High);
    assert_eq!(controller.run_cycle().await, CycleOutcome::Idle);
    assert_eq!(recognizer.call_count(), 3);

    let stats = controller.stats();
    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.empty, 1);

    drop(controller);
    timeout(Duration::from_secs(1), renderer)
        .await
        .unwrap()
        .unwrap();
}
