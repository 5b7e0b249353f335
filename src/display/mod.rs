mod scoreboard;
mod sink;


pub use scoreboard::{ScoreBoard, ScoreBoardHandle};
pub use sink::{ChannelDisplaySink, DisplaySink, RecordingDisplaySink};
