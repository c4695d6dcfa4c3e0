use std::time::Instant;

use lipsync_rs::{
    engines::lipsync::{LipSyncEngine, LipSyncParams, PlaybackRequest, ThreadedPlayer},
    PlaybackDriver,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello, lip reading!".to_string());
    let params = LipSyncParams {
        table_path: std::env::var_os("LIPSYNC_TABLE").map(Into::into),
    };

    let engine = LipSyncEngine::with_params(params)?;
    let sequence = engine.animate(&PlaybackRequest::emphasized(text.as_str()));
    if sequence.is_empty() {
        println!("Nothing to animate in {text:?}");
        return Ok(());
    }

    println!(
        "{} events, {:.2}s total for {text:?}",
        sequence.len(),
        sequence.total_duration_secs()
    );
    println!("{}", sequence.to_json()?);

    let start = Instant::now();
    let mut player = ThreadedPlayer::new(move |pose: &str| {
        println!("{:>8.3}s  {pose}", start.elapsed().as_secs_f64());
    });
    player.play(&sequence);
    player.wait();

    Ok(())
}
