use log::{error, info, warn};
use propstat::summary::{HttpEncoder, SentenceEncoder};
use propstat::{analyze_file, version};
use std::path::Path;
use std::time::Instant;

fn main() -> propstat::error::Result<()> {
    // Initialize logger
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        error!("Not enough arguments provided");
        eprintln!(
            "Usage: {} <listings_csv> [report_path] [cleaned_csv_path] [confidence]",
            args[0]
        );
        eprintln!("Version: {}", version());
        return Ok(());
    }

    let listings_path = Path::new(&args[1]);
    let report_path = if args.len() >= 3 {
        Path::new(&args[2])
    } else {
        Path::new("market_report.json")
    };
    let cleaned_path = if args.len() >= 4 {
        Some(Path::new(&args[3]))
    } else {
        None
    };

    let confidence = if args.len() >= 5 {
        args[4].parse().unwrap_or_else(|_| {
            warn!("Invalid confidence level provided, defaulting to 0.95");
            0.95
        })
    } else {
        0.95
    };

    info!("propstat v{}", version());
    info!("Analyzing listings at: {:?}", listings_path);
    info!("Confidence level: {}", confidence);

    // The embeddings client is optional; without it the summary falls back
    // to the first sentences in order.
    let encoder = HttpEncoder::from_env();
    if encoder.is_some() {
        info!("Embeddings client configured from environment");
    } else {
        info!("No embeddings client configured, summaries will be unranked");
    }
    let encoder_ref: Option<&dyn SentenceEncoder> =
        encoder.as_ref().map(|e| e as &dyn SentenceEncoder);

    let start_time = Instant::now();

    analyze_file(
        listings_path,
        report_path,
        cleaned_path,
        encoder_ref,
        confidence,
    )?;

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2?}", elapsed);
    info!("Report saved to: {:?}", report_path);

    Ok(())
}
