//! Canopy CLI - parcel vegetation analysis

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use canopy_algorithms::imagery::ndvi;
use canopy_algorithms::region::{project_ring, rasterize_ring};
use canopy_algorithms::vegetation::{analyze_region_with, classify_image, AnalysisParams, VegetationStats};
use canopy_colormap::{draw_outline, render_vegetation_palette, VegetationPalette, OUTLINE_COLOR, OUTLINE_WIDTH};
use canopy_core::io::{read_geotiff, read_geotiff_georeferenced, read_png, write_geotiff, write_png};
use canopy_core::{BoundingBox, PolygonRing, Raster, RasterImage};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "canopy")]
#[command(author, version, about = "Vegetation health of land parcels", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RingArgs {
    /// Parcel ring as "lon,lat;lon,lat;..."
    #[arg(long, conflicts_with = "ring_file")]
    ring: Option<String>,
    /// JSON file holding the ring as [[lon, lat], ...]
    #[arg(long)]
    ring_file: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Analysis parameters (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Frame the imagery bounding box for a parcel
    Frame {
        #[command(flatten)]
        ring: RingArgs,
        /// Default view around "lon,lat" when there is no ring
        #[arg(long, conflicts_with_all = ["ring", "ring_file"])]
        center: Option<String>,
        #[command(flatten)]
        config: ConfigArgs,
        /// Canvas width in pixels
        #[arg(long)]
        width: Option<usize>,
        /// Canvas height in pixels
        #[arg(long)]
        height: Option<usize>,
    },
    /// Summarise vegetation health inside a parcel
    Analyze {
        /// Rendered index image (PNG); its size is the canvas size
        #[arg(short, long)]
        image: PathBuf,
        #[command(flatten)]
        ring: RingArgs,
        /// Bounding box of the image as "minLon,minLat,maxLon,maxLat"
        /// (framed from the ring when omitted)
        #[arg(long)]
        bbox: Option<String>,
        #[command(flatten)]
        config: ConfigArgs,
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render NDVI from near-infrared and red bands into a palette image
    Render {
        /// Near-infrared band (GeoTIFF)
        #[arg(long)]
        nir: PathBuf,
        /// Red band (GeoTIFF)
        #[arg(long)]
        red: PathBuf,
        /// Output image (PNG), the input of `analyze` and `classify`
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        ring: RingArgs,
        /// Separate copy of the image with the parcel outline (PNG, needs a ring)
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
    /// Write the per-pixel health classes of a parcel
    Classify {
        /// Rendered index image (PNG)
        #[arg(short, long)]
        image: PathBuf,
        #[command(flatten)]
        ring: RingArgs,
        /// Bounding box of the image as "minLon,minLat,maxLon,maxLat"
        #[arg(long)]
        bbox: Option<String>,
        #[command(flatten)]
        config: ConfigArgs,
        /// Output class raster (GeoTIFF, 0 outside, 1-4 healthy..barren)
        #[arg(short, long)]
        output: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_numbers(s: &str, expected: usize, what: &str) -> Result<Vec<f64>> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid {}: {}", what, s))?;
    if values.len() != expected {
        anyhow::bail!("{} needs {} numbers, got: {}", what, expected, s);
    }
    Ok(values)
}

fn parse_ring(s: &str) -> Result<PolygonRing> {
    let points = s
        .split(';')
        .filter(|p| !p.trim().is_empty())
        .map(|p| parse_numbers(p, 2, "ring vertex").map(|v| (v[0], v[1])))
        .collect::<Result<Vec<_>>>()?;
    Ok(PolygonRing::from_lon_lat(points))
}

/// "minLon,minLat,maxLon,maxLat"
fn parse_bbox(s: &str) -> Result<BoundingBox> {
    let v = parse_numbers(s, 4, "bounding box")?;
    BoundingBox::new(v[0], v[2], v[1], v[3]).context("Invalid bounding box")
}

impl RingArgs {
    fn load(&self) -> Result<Option<PolygonRing>> {
        match (&self.ring, &self.ring_file) {
            (Some(s), _) => parse_ring(s).map(Some),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read ring file {}", path.display()))?;
                let ring = serde_json::from_str(&text).context("Ring file must hold [[lon, lat], ...]")?;
                Ok(Some(ring))
            }
            (None, None) => Ok(None),
        }
    }

    fn require(&self) -> Result<PolygonRing> {
        self.load()?
            .ok_or_else(|| anyhow::anyhow!("A parcel ring is required (--ring or --ring-file)"))
    }
}

impl ConfigArgs {
    fn load(&self) -> Result<AnalysisParams> {
        let params = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text).context("Invalid analysis parameters")?
            }
            None => AnalysisParams::default(),
        };
        params.validate().context("Invalid analysis parameters")?;
        Ok(params)
    }
}

fn read_image(path: &Path) -> Result<RasterImage> {
    let pb = spinner("Reading image...");
    let image = read_png(path).context("Failed to read image")?;
    pb.finish_and_clear();
    info!("Input: {} x {}", image.width(), image.height());
    Ok(image)
}

fn read_band(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> = read_geotiff(path).context("Failed to read raster")?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

/// Explicit bbox, or the ring framed for the image's canvas
fn resolve_bbox(bbox: Option<&str>, ring: &PolygonRing, params: &AnalysisParams) -> Result<BoundingBox> {
    match bbox {
        Some(s) => parse_bbox(s),
        None => {
            let framed = params.frame(ring).context("Failed to frame parcel")?;
            debug!(?framed, "framed bounding box from ring");
            Ok(framed)
        }
    }
}

/// Palette image of the NDVI of two bands, and with a ring, a separate copy
/// carrying the parcel outline. The palette image itself is never drawn on.
fn render_palette(
    nir: &Path,
    red: &Path,
    outline: Option<&PolygonRing>,
) -> Result<(RasterImage, Option<RasterImage>)> {
    let nir_r = match outline {
        Some(_) => {
            let pb = spinner("Reading raster...");
            let band: Raster<f64> = read_geotiff_georeferenced(nir)
                .context("NIR band needs a lon/lat georeference to place the outline")?;
            pb.finish_and_clear();
            band
        }
        None => read_band(nir)?,
    };
    let red_r = read_band(red)?;

    let index = ndvi(&nir_r, &red_r).context("Failed to calculate NDVI")?;
    let img = render_vegetation_palette(&index, &VegetationPalette::default())
        .context("Failed to render palette")?;

    let outlined = match outline {
        Some(ring) => {
            let (min_lon, min_lat, max_lon, max_lat) = index.bounds();
            let bbox = BoundingBox::new(min_lon, max_lon, min_lat, max_lat)
                .context("Band georeference does not give a valid bounding box")?;
            let path = project_ring(&bbox, ring, img.width(), img.height())?;
            let mut outlined = img.clone();
            draw_outline(&mut outlined, &path, OUTLINE_COLOR, OUTLINE_WIDTH);
            Some(outlined)
        }
        None => None,
    };

    Ok((img, outlined))
}

fn print_stats(stats: &VegetationStats) {
    println!("Parcel pixels: {}", stats.pixel_count);
    println!("Mean index:    {:.2}", stats.mean);
    println!("  Healthy:     {}%", stats.healthy);
    println!("  Moderate:    {}%", stats.moderate);
    println!("  Sparse:      {}%", stats.sparse);
    println!("  Barren:      {}%", stats.barren);
    println!("Coverage:      {}%", stats.coverage_score);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Frame {
            ring,
            center,
            config,
            width,
            height,
        } => {
            let mut params = config.load()?;
            params = params.with_canvas(
                width.unwrap_or(params.canvas_width),
                height.unwrap_or(params.canvas_height),
            );
            let bbox = match (ring.load()?, center) {
                (Some(ring), _) => params.frame(&ring).context("Failed to frame parcel")?,
                (None, Some(center)) => {
                    let c = parse_numbers(&center, 2, "center")?;
                    params.frame_at(c[0], c[1]).context("Failed to frame view")?
                }
                (None, None) => anyhow::bail!("Give a parcel ring or --center"),
            };
            println!("{}", serde_json::to_string_pretty(&bbox)?);
        }

        Commands::Analyze {
            image,
            ring,
            bbox,
            config,
            json,
        } => {
            let ring = ring.require()?;
            let img = read_image(&image)?;
            let params = config.load()?.with_canvas(img.width(), img.height());
            let bbox = resolve_bbox(bbox.as_deref(), &ring, &params)?;

            let start = Instant::now();
            let stats = analyze_region_with(&bbox, &ring, &img, &params);
            info!("Analysis time: {:.2?}", start.elapsed());

            match (stats, json) {
                (stats, true) => println!("{}", serde_json::to_string_pretty(&stats)?),
                (Some(stats), false) => print_stats(&stats),
                (None, false) => println!("insufficient data"),
            }
        }

        Commands::Render {
            nir,
            red,
            output,
            ring,
            overlay,
        } => {
            let outline_ring = match overlay {
                Some(_) => Some(ring.require()?),
                None => None,
            };
            let start = Instant::now();
            let (img, outlined) = render_palette(&nir, &red, outline_ring.as_ref())?;

            let pb = spinner("Writing output...");
            write_png(&img, &output).context("Failed to write output")?;
            if let (Some(path), Some(outlined)) = (&overlay, &outlined) {
                write_png(outlined, path).context("Failed to write overlay")?;
            }
            pb.finish_and_clear();
            done("Vegetation palette", &output, start.elapsed());
            if let Some(path) = &overlay {
                println!("Outline overlay saved to: {}", path.display());
            }
        }

        Commands::Classify {
            image,
            ring,
            bbox,
            config,
            output,
        } => {
            let ring = ring.require()?;
            let img = read_image(&image)?;
            let params = config.load()?.with_canvas(img.width(), img.height());
            let bbox = resolve_bbox(bbox.as_deref(), &ring, &params)?;
            let start = Instant::now();

            let mask = rasterize_ring(&bbox, &ring, img.width(), img.height())
                .context("Failed to rasterize parcel")?;
            info!("Parcel pixels: {}", mask.count());
            let classes = classify_image(&img, &mask).context("Failed to classify image")?;

            let pb = spinner("Writing output...");
            write_geotiff(&classes, &output).context("Failed to write output")?;
            pb.finish_and_clear();
            done("Health classes", &output, start.elapsed());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_from_pairs() {
        let ring = parse_ring("77.0,12.0; 77.01,12.0;77.01,12.01;").unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.vertices()[1].x, 77.01);
        assert!(parse_ring("77.0;12.0").is_err());
        assert!(parse_ring("a,b").is_err());
    }

    #[test]
    fn test_bbox_order_is_min_lon_min_lat_max_lon_max_lat() {
        let bbox = parse_bbox("77.0,12.0,77.04,12.03").unwrap();
        assert_eq!(bbox.min_lon(), 77.0);
        assert_eq!(bbox.max_lat(), 12.03);
        assert!(parse_bbox("77.04,12.0,77.0,12.03").is_err());
        assert!(parse_bbox("1,2,3").is_err());
    }

    #[test]
    fn test_ring_file_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let ring_path = dir.path().join("ring.json");
        std::fs::write(&ring_path, "[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]").unwrap();
        let args = RingArgs {
            ring: None,
            ring_file: Some(ring_path),
        };
        assert_eq!(args.require().unwrap().len(), 3);

        let cfg_path = dir.path().join("params.json");
        std::fs::write(&cfg_path, r#"{"framing": {"padding_factor": 1.5}}"#).unwrap();
        let params = ConfigArgs { config: Some(cfg_path) }.load().unwrap();
        assert_eq!(params.framing.padding_factor, 1.5);
        assert_eq!(params.framing.min_span, 0.005);

        let missing = RingArgs {
            ring: None,
            ring_file: None,
        };
        assert!(missing.require().is_err());
    }

    fn write_band(dir: &Path, name: &str, value: f64, bbox: &BoundingBox) -> PathBuf {
        let mut band: Raster<f64> = Raster::filled(30, 40, value);
        band.set_transform(canopy_core::GeoTransform::from_bbox(bbox, 40, 30).unwrap());
        let path = dir.join(name);
        write_geotiff(&band, &path).unwrap();
        path
    }

    #[test]
    fn test_overlay_leaves_palette_image_clean() {
        let dir = tempfile::tempdir().unwrap();
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let nir = write_band(dir.path(), "nir.tif", 0.8, &bbox);
        let red = write_band(dir.path(), "red.tif", 0.1, &bbox);
        let ring = parse_ring("0.2,0.2;0.8,0.2;0.8,0.8;0.2,0.8").unwrap();

        let (img, outlined) = render_palette(&nir, &red, Some(&ring)).unwrap();
        let outlined = outlined.unwrap();

        let clean = canopy_algorithms::vegetation::analyze_region(&bbox, &ring, &img, 40, 30).unwrap();
        assert_eq!(clean.healthy, 100);
        assert_eq!(clean.barren, 0);

        // the red stroke reads as barren wherever it crosses the parcel
        let stroked = canopy_algorithms::vegetation::analyze_region(&bbox, &ring, &outlined, 40, 30).unwrap();
        assert!(stroked.barren > 0);
        assert!(stroked.healthy < 100);

        let (plain, none) = render_palette(&nir, &red, None).unwrap();
        assert!(none.is_none());
        assert_eq!(plain, img);
    }

    #[test]
    fn test_center_conflicts_with_ring() {
        assert!(Cli::try_parse_from(["canopy", "frame", "--ring", "0,0;1,0;1,1", "--center", "0,0"]).is_err());
        assert!(Cli::try_parse_from(["canopy", "frame", "--center", "0,0"]).is_ok());
    }
}
