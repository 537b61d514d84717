use std::time::{Duration, Instant};

use alphablend::{
    AlphaGrid, AlphaSource, CompositeSettings, CompositeThreading, composite_add_reference,
    composite_add_with, composite_over_reference, composite_over_with,
};
use anyhow::Context as _;
use image::{Rgba, RgbaImage};
use serde_json::json;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    warmup: u32,
    repeats: u32,
    fade_frames: u32,
    parallel: bool,
    threads: Option<usize>,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    over_grid: Duration,
    over_reference: Duration,
    add_grid: Duration,
    add_reference: Duration,
    fade_total: Duration,
    wall_total: Duration,
}

/// Layers shared by every run. Built once so runs only time compositing.
struct Scene {
    foreground: RgbaImage,
    background: RgbaImage,
    radial: AlphaGrid,
}

#[derive(Default)]
struct Digests {
    over_grid: String,
    over_reference: String,
    add_grid: String,
    add_reference: String,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.width == 0 || args.height == 0 {
        anyhow::bail!("--width/--height must be > 0");
    }
    if args.repeats == 0 {
        anyhow::bail!("--repeats must be >= 1");
    }
    if let Some(n) = args.threads
        && n == 0
    {
        anyhow::bail!("--threads must be >= 1 when set");
    }

    let settings = CompositeSettings {
        threading: CompositeThreading {
            parallel: args.parallel,
            threads: args.threads,
        },
        ..CompositeSettings::default()
    };
    let scene = build_scene(args.width, args.height);

    if args.warmup > 0 {
        eprintln!("warmup: {} run(s)", args.warmup);
        for i in 0..args.warmup {
            let _ = run_once(&args, &settings, &scene, i, /*is_warmup=*/ true)?;
        }
    }

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), {w}x{h}, fade={fade} frames/run, mode={mode}, threads={threads}",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        w = args.width,
        h = args.height,
        fade = args.fade_frames,
        mode = if args.parallel {
            "parallel"
        } else {
            "sequential"
        },
        threads = args
            .threads
            .map(|n| n.to_string())
            .unwrap_or_else(|| "auto".to_string()),
    );

    let mut runs = Vec::<RunMetrics>::with_capacity(args.repeats as usize);
    let mut digests = Digests::default();
    for i in 0..args.repeats {
        let (m, d) = run_once(&args, &settings, &scene, i, /*is_warmup=*/ false)?;
        runs.push(m);
        digests = d;
    }

    report_percentiles(&runs);

    let summary = json!({
        "width": args.width,
        "height": args.height,
        "repeats": args.repeats,
        "settings": serde_json::to_value(&settings).context("serialize settings")?,
        "sha256": {
            "over_grid": digests.over_grid,
            "over_reference": digests.over_reference,
            "add_grid": digests.add_grid,
            "add_reference": digests.add_reference,
        },
        "parity": {
            "over": digests.over_grid == digests.over_reference,
            "add": digests.add_grid == digests.add_reference,
        },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if digests.over_grid != digests.over_reference || digests.add_grid != digests.add_reference {
        anyhow::bail!("grid and reference outputs differ");
    }
    Ok(())
}

/// Deterministic stand-ins for a sprite with a transparent surround, a textured backdrop, and
/// a radial opacity falloff.
fn build_scene(width: u32, height: u32) -> Scene {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = cx.min(cy).max(1.0);

    let foreground = RgbaImage::from_fn(width, height, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt() / radius;
        let a = if d >= 1.0 {
            0
        } else {
            ((1.0 - d) * 255.0) as u8
        };
        Rgba([(x % 256) as u8, 96, (y % 256) as u8, a])
    });
    let background = RgbaImage::from_fn(width, height, |x, y| {
        let v = (((x / 8) + (y / 8)) % 2) as u8;
        Rgba([200 - v * 80, 60 + v * 40, 20, 255])
    });
    let radial = AlphaGrid::from_fn(width, height, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt() / radius;
        d.clamp(0.0, 1.0)
    });

    Scene {
        foreground,
        background,
        radial,
    }
}

/// Scalar opacity of fade frame `i`: counts down from 255/255, wrapping to 255 after 1/255.
fn fade_alpha(i: u32) -> f32 {
    let step = 255 - (i % 255);
    step as f32 / 255.0
}

fn run_once(
    args: &BenchArgs,
    settings: &CompositeSettings,
    scene: &Scene,
    run_idx: u32,
    is_warmup: bool,
) -> anyhow::Result<(RunMetrics, Digests)> {
    let wall = Instant::now();
    let mut m = RunMetrics::default();
    let mut d = Digests::default();

    let t0 = Instant::now();
    let over = composite_over_with(&scene.foreground, &scene.background, settings)?;
    m.over_grid = t0.elapsed();
    d.over_grid = sha256_hex(over.as_raw());

    let t1 = Instant::now();
    let over_ref = composite_over_reference(&scene.foreground, &scene.background, settings)?;
    m.over_reference = t1.elapsed();
    d.over_reference = sha256_hex(over_ref.as_raw());

    let a1 = AlphaSource::from(scene.radial.clone());
    let a2 = AlphaSource::uniform(1.0);

    let t2 = Instant::now();
    let add = composite_add_with(
        &scene.foreground,
        &scene.background,
        &a1,
        &a2,
        true,
        settings,
    )?;
    m.add_grid = t2.elapsed();
    d.add_grid = sha256_hex(add.as_raw());

    let t3 = Instant::now();
    let add_ref = composite_add_reference(
        &scene.foreground,
        &scene.background,
        &a1,
        &a2,
        true,
        settings,
    )?;
    m.add_reference = t3.elapsed();
    d.add_reference = sha256_hex(add_ref.as_raw());

    let t4 = Instant::now();
    for i in 0..args.fade_frames {
        let frame = composite_add_with(
            &scene.foreground,
            &scene.background,
            &AlphaSource::uniform(fade_alpha(i)),
            &a2,
            false,
            settings,
        )
        .with_context(|| format!("fade frame {i}"))?;
        std::hint::black_box(frame);
    }
    m.fade_total = t4.elapsed();

    m.wall_total = wall.elapsed();

    if !is_warmup {
        eprintln!(
            "run {run_idx:03}: wall={wall:.3}s over={og:.3}ms over_ref={or:.3}ms add={ag:.3}ms add_ref={ar:.3}ms fade={fa:.3}ms",
            wall = m.wall_total.as_secs_f64(),
            og = m.over_grid.as_secs_f64() * 1000.0,
            or = m.over_reference.as_secs_f64() * 1000.0,
            ag = m.add_grid.as_secs_f64() * 1000.0,
            ar = m.add_reference.as_secs_f64() * 1000.0,
            fa = m.fade_total.as_secs_f64() * 1000.0,
        );
    }

    Ok((m, d))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 256,
        height: 256,
        warmup: 1,
        repeats: 20,
        fade_frames: 255,
        parallel: false,
        threads: None,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--fade-frames" => out.fade_frames = parse_u32(args.next(), "--fade-frames")?,
            "--parallel" => out.parallel = true,
            "--threads" => out.threads = Some(parse_usize(args.next(), "--threads")?),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"alphablend-bench

Composites synthetic layers repeatedly and reports p50/p90/p99 for each implementation.
Prints a JSON summary with SHA-256 digests of the grid and reference outputs.

Usage:
  cargo run -q --release
  cargo run -q --release -- --width 1024 --height 1024 --repeats 10
  cargo run -q --release -- --parallel --threads 4

Args:
  --width N        (default 256)
  --height N       (default 256)
  --warmup N       (default 1)
  --repeats N      (default 20)
  --fade-frames N  frames of the 255/255 -> 1/255 opacity ramp per run (default 255)
  --parallel       process rows on rayon workers
  --threads N      dedicated pool size for --parallel (default: global pool)
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_usize(v: Option<String>, flag: &str) -> anyhow::Result<usize> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<usize>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn report_percentiles(runs: &[RunMetrics]) {
    type Getter = fn(&RunMetrics) -> Duration;
    type Field = (&'static str, Getter);

    fn collect(runs: &[RunMetrics], f: fn(&RunMetrics) -> Duration) -> Vec<Duration> {
        let mut v = runs.iter().map(f).collect::<Vec<_>>();
        v.sort_by_key(|d| d.as_nanos());
        v
    }

    fn p(v: &[Duration], p: f64) -> Duration {
        if v.is_empty() {
            return Duration::ZERO;
        }
        let n = v.len();
        let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
        v[rank - 1]
    }

    fn fmt_ms(d: Duration) -> String {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    }

    let fields: &[Field] = &[
        ("over_grid", |m| m.over_grid),
        ("over_reference", |m| m.over_reference),
        ("add_grid", |m| m.add_grid),
        ("add_reference", |m| m.add_reference),
        ("fade_total", |m| m.fade_total),
        ("wall_total", |m| m.wall_total),
    ];

    eprintln!("\npercentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let v = collect(runs, *getter);
        eprintln!(
            "  {name:15} p50={p50:>10}  p90={p90:>10}  p99={p99:>10}",
            name = *name,
            p50 = fmt_ms(p(&v, 0.50)),
            p90 = fmt_ms(p(&v, 0.90)),
            p99 = fmt_ms(p(&v, 0.99))
        );
    }
}
