use image::ImageReader;
use irisdet::{DetectConfig, Detector};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <eye.jpg> [config.json] [out.json]", args[0]);
        std::process::exit(2);
    }

    let image = ImageReader::open(&args[1])?.decode()?.to_rgb8();
    let config = match args.get(2) {
        Some(path) => DetectConfig::from_json_file(Path::new(path))?,
        None => DetectConfig::default(),
    };
    let detector = Detector::with_config(config);
    let (result, trace) = detector.detect_with_trace(&image)?;

    if !result.is_confident() {
        println!("No pupil found.");
        return Ok(());
    }
    println!(
        "Pupil: center ({:.4}, {:.4}), radius {:.4}",
        result.pupil.center.x, result.pupil.center.y, result.pupil.radius
    );
    println!(
        "Iris:  center ({:.4}, {:.4}), radius {:.4}",
        result.iris.center.x, result.iris.center.y, result.iris.radius
    );
    println!("Refinement stages: {}", trace.refinement.len());

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
