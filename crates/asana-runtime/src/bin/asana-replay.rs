//! Replay a recorded session through the instructor
//!
//! Usage: asana-replay <recording.jsonl> [--config <config.json>] [--json]
//!
//! Each input line is a `RecordedFrame`. Frame timestamps drive the hold
//! timer, so a replay judges exactly as the live session would have.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use asana_core::{AsanaError, AsanaResult};
use asana_runtime::{
    init_tracing, FeedbackSink, FrameReport, Instructor, InstructorConfig, PoseSource,
    ReplaySource,
};
use asana_session::{FrameClock, ManualClock};

const DEFAULT_CONFIG_PATH: &str = "asana.json";

struct Args {
    recording: PathBuf,
    config: PathBuf,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut recording = None;
    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => {
                config = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or("--config needs a path")?;
            }
            "-h" | "--help" => return Err(String::new()),
            _ if recording.is_none() => recording = Some(PathBuf::from(arg)),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok(Args {
        recording: recording.ok_or("missing recording path")?,
        config,
        json,
    })
}

/// Prints one line per frame
struct ConsoleSink {
    json: bool,
}

impl FeedbackSink for ConsoleSink {
    fn present(&mut self, report: &FrameReport) {
        if self.json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("cannot serialize report: {}", e),
            }
        } else {
            println!("[{:>9.3}s] {}", report.time.as_secs_f64(), report.status_line());
        }
    }
}

fn replay(args: &Args) -> AsanaResult<()> {
    let config = InstructorConfig::load_or_default(&args.config)?;
    init_tracing(&config.telemetry)?;
    let plan = config.build()?;
    let mut instructor = Instructor::new(&plan)?;

    let file = File::open(&args.recording)
        .map_err(|e| AsanaError::SourceIo(format!("{}: {}", args.recording.display(), e)))?;
    let mut source = ReplaySource::new(BufReader::new(file)).with_controls(instructor.controls());
    let mut sink = ConsoleSink { json: args.json };
    let mut clock = ManualClock::new();

    while let Some(frame) = source.next_frame()? {
        if let Some(t) = source.last_timestamp() {
            clock.set(t);
        }
        let report = instructor.step(&frame, clock.now())?;
        sink.present(&report);
        if instructor.quit_requested() {
            break;
        }
    }

    let stats = instructor.stats();
    tracing::info!(
        frames = stats.frames,
        held = stats.postures_held,
        skipped = stats.postures_skipped,
        completed = stats.sessions_completed,
        "replay finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
            }
            eprintln!("usage: asana-replay <recording.jsonl> [--config <config.json>] [--json]");
            return ExitCode::from(2);
        }
    };

    match replay(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
