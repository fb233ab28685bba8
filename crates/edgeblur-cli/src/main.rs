use argh::FromArgs;
use edgeblur::{
    imgproc::parallel::{ExecutionStrategy, ParallelError},
    io::bmp::{read_image_bmp_mono8, write_image_bmp_mono8},
    pipeline::blur_and_edges,
};
use std::path::PathBuf;

/// Blur a BMP image and compute its Sobel edge map
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the input BMP image (8-bit palette or 24-bit)
    #[argh(positional)]
    input: PathBuf,

    /// path to write the blurred image
    #[argh(positional)]
    blur_output: PathBuf,

    /// path to write the edge map
    #[argh(positional)]
    edge_output: PathBuf,

    /// execution strategy: serial, serial-rows or parallel
    #[argh(option, short = 's', default = "ExecutionStrategy::ParallelRows")]
    strategy: ExecutionStrategy,

    /// number of worker threads for the parallel strategy
    #[argh(option, short = 't')]
    threads: Option<usize>,
}

fn resolve_strategy(
    strategy: ExecutionStrategy,
    threads: Option<usize>,
) -> Result<ExecutionStrategy, ParallelError> {
    match (strategy, threads) {
        (_, Some(0)) => Err(ParallelError::InvalidThreadCount(0)),
        (ExecutionStrategy::ParallelRows, Some(n)) => Ok(ExecutionStrategy::Fixed(n)),
        (strategy, _) => Ok(strategy),
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let strategy = resolve_strategy(args.strategy, args.threads)?;
    if args.threads.is_some() && !strategy.is_parallel() {
        log::warn!("--threads is ignored by the {strategy} strategy");
    }

    let src = read_image_bmp_mono8(&args.input)?;
    log::info!("read {} from {}", src.size(), args.input.display());

    let out = blur_and_edges(&src, strategy)?;

    write_image_bmp_mono8(&args.blur_output, &out.blurred)?;
    write_image_bmp_mono8(&args.edge_output, &out.edges)?;

    println!(
        "conv_time={:.6} sobel_time={:.6}",
        out.blur_time.as_secs_f64(),
        out.sobel_time.as_secs_f64()
    );

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Args = argh::from_env();

    if let Err(e) = run(args) {
        eprintln!("edgeblur: {e}");
        std::process::exit(1);
    }
}
