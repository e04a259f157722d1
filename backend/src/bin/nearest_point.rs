use std::path::PathBuf;

use clap::Parser;
use parking_backend::{config::DEFAULT_POINTS_PATH, models::Coordinate, points::PointTable};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print the parking point closest to a coordinate"
)]
struct Args {
    /// Latitude of the origin in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the origin in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// JSON point table to search
    #[arg(long, default_value = DEFAULT_POINTS_PATH)]
    points: PathBuf,

    /// Print the result as JSON instead of a text line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let origin = Coordinate::new(args.lat, args.lon);
    if !origin.is_valid() {
        return Err(format!("coordinates out of range: ({}, {})", args.lat, args.lon).into());
    }

    let table = PointTable::from_file(&args.points)?;
    tracing::info!("searching {} points from {:?}", table.len(), args.points);

    let nearest = table.nearest(origin)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&nearest)?);
    } else {
        println!(
            "{} ({:.6}, {:.6}) {:.1} m",
            nearest.point.name,
            nearest.point.latitude,
            nearest.point.longitude,
            nearest.distance_meters
        );
    }

    Ok(())
}
