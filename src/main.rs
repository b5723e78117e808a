// src/main.rs
//
// Renders the LTEM contrast + moment map of every texture family.
//
// Run:
//   cargo run --release
//   RUST_LOG=debug cargo run --release      (per-pass timings and KDE factors)
//
// Output:
//   out/ltem/<texture>/
//     ├── figure.png            contrast (left) + moment map (right)
//     ├── figure_contrast.png
//     ├── figure_quiver.png
//     └── config.json           parameters + summary numbers
//
// The antiskyrmion entry uses n = 2 and reproduces the reference figure.

use std::path::Path;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use ltem_sim::config::{RunConfig, RunInfo};
use ltem_sim::params::LtemParams;
use ltem_sim::pipeline;
use ltem_sim::textures::TextureKind;
use ltem_sim::visualisation::PngSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let out_root = Path::new("out").join("ltem");

    for texture in TextureKind::ALL {
        let params = LtemParams::for_texture(texture);
        let out_dir = out_root.join(texture.as_str());
        let png = out_dir.join("figure.png");

        let t0 = Instant::now();
        let mut sink = PngSink {
            path: png.clone(),
            split_panels: true,
        };
        let figure = pipeline::run(&params, &mut sink)?;

        RunConfig::new(
            &figure,
            RunInfo {
                binary: "ltem_gallery".to_string(),
                run_id: texture.as_str().to_string(),
                figure: png.display().to_string(),
            },
        )
        .write_to_dir(&out_dir)?;

        tracing::debug!(
            texture = %texture,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            kde_factor = figure.kde_factor,
            "figure done"
        );
    }

    println!("Wrote LTEM gallery to {:?}", out_root);
    Ok(())
}
