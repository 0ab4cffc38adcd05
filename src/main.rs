use clap::Parser;
use godunov::config::{
    Boundaries, BoundaryCondition, Config, ImplementationVersion, MoodConfig, OutputConfig, Physics,
    RiemannSolverKind, RunConfig, SlopeLimiter,
};
use godunov::grid::Grid;
use godunov::output::OutputWriter;
use godunov::problems::Problem;
use godunov::{Error, MusclSolver};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[clap(version, about = "Second-order Godunov solver for gas dynamics and ideal MHD")]
struct Opts {
    #[clap(short = 'p', long, default_value = "blast")]
    problem: String,

    #[clap(short = 'n', long, default_value = "128")]
    resolution: i64,

    #[clap(long)]
    three_d: bool,

    #[clap(long)]
    mhd: bool,

    #[clap(short = 'r', long, default_value = "hll")]
    riemann: RiemannSolverKind,

    #[clap(short = 'l', long, default_value = "mc")]
    limiter: SlopeLimiter,

    #[clap(short = 'b', long)]
    boundary: Option<BoundaryCondition>,

    #[clap(long)]
    gamma: Option<f64>,

    #[clap(long, default_value = "0.4")]
    cfl: f64,

    #[clap(short = 't', long, default_value = "0.2")]
    t_end: f64,

    #[clap(long, default_value = "1000000")]
    max_steps: u64,

    #[clap(long)]
    fused_trace: bool,

    #[clap(long)]
    no_mood: bool,

    #[clap(long, default_value = "2")]
    mood_retries: usize,

    #[clap(short = 'o', long)]
    output: Option<String>,

    #[clap(long, default_value = "snapshot")]
    prefix: String,

    #[clap(long, default_value = "100")]
    every: u64,

    #[clap(long, default_value = "info")]
    log_level: String,
}

fn config_from_opts(opts: &Opts) -> Result<Config, Error> {
    let problem = Problem::from_name(&opts.problem)?;
    let physics = if opts.mhd || problem.requires_mhd() {
        Physics::Mhd
    } else {
        Physics::Hydro
    };
    let extent = problem.natural_extent();
    let mut grid = if opts.three_d {
        Grid::unit_cube(opts.resolution)
    } else {
        Grid::unit_square(opts.resolution)
    };
    grid.upper = (extent, extent, if opts.three_d { extent } else { 1.0 });

    let gamma_law_index = opts.gamma.unwrap_or(match physics {
        Physics::Mhd => 5.0 / 3.0,
        Physics::Hydro => 1.4,
    });

    Ok(Config {
        grid,
        physics,
        gamma_law_index,
        cfl: opts.cfl,
        riemann_solver: opts.riemann,
        slope_limiter: opts.limiter,
        implementation_version: if opts.fused_trace {
            ImplementationVersion::FusedTrace
        } else {
            ImplementationVersion::StoredTrace
        },
        boundaries: Boundaries::uniform(opts.boundary.unwrap_or_else(|| problem.natural_boundary())),
        mood: MoodConfig {
            enabled: !opts.no_mood,
            max_retries: opts.mood_retries,
            ..MoodConfig::default()
        },
        problem,
        run: RunConfig {
            t_end: opts.t_end,
            max_steps: opts.max_steps,
        },
        output: OutputConfig {
            enabled: opts.output.is_some(),
            directory: opts.output.clone().unwrap_or_else(|| "output".to_string()),
            prefix: opts.prefix.clone(),
            every_steps: opts.every,
        },
    })
}

fn main() -> Result<(), Error> {
    let opts = Opts::parse();

    let level: LevelFilter = opts
        .log_level
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("unknown log level: {}", opts.log_level)))?;
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;

    let config = config_from_opts(&opts)?;
    let writer = if config.output.enabled {
        Some(OutputWriter::new(&config.output.directory, &config.output.prefix)?)
    } else {
        None
    };

    let mut solver = MusclSolver::new(config)?;
    let start = std::time::Instant::now();
    let summary = solver.run(&stop, writer.as_ref())?;
    let seconds = start.elapsed().as_secs_f64();

    if let Some(writer) = writer {
        let count = writer.finish()?;
        info!("wrote {} snapshot(s)", count);
    }

    let zones = solver.grid().total_zones() as f64 * summary.iterations as f64;
    info!(
        "{} iterations to t={:.6} in {:.3}s ({:.3e} zone updates per second), {} step(s) corrected",
        summary.iterations,
        summary.time,
        seconds,
        zones / seconds.max(f64::MIN_POSITIVE),
        summary.corrected_steps
    );
    Ok(())
}
