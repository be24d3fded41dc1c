use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mincvrp::config::Config;
use mincvrp::instance;
use mincvrp::report::{stable_format, verbose_report, write_trace_csv};
use mincvrp::solver::{build_solution, gls, tabu, vnd, Neighborhood, TabuVariant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE).compact())
        .init();

    let config = Config::default().validate()?;

    let instance::Instance { mut graph, vehicles } = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        instance::generate(&config)
    };

    let mut solution = build_solution(&graph, vehicles)?;
    info!("INITIAL SOLUTION");
    println!("{}", verbose_report(&solution, &graph));

    vnd::run(&mut solution, &graph, &Neighborhood::VND_ORDER);
    info!("AFTER VND");
    println!("{}", verbose_report(&solution, &graph));

    let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);
    let gls_outcome = gls::run(&mut solution, &mut graph, &Neighborhood::VND_ORDER, &mut rng, 2000, config.gls_lambda);
    info!(best_after_gls = gls_outcome.best_solution_time, "AFTER GLS");
    println!("{}", verbose_report(&solution, &graph));
    if let Err(err) = write_trace_csv(&gls_outcome.trace, "best_so_far.csv") {
        info!(%err, "failed to write gls trace csv");
    }

    let best_after_tabu = tabu::run(
        &mut solution,
        &graph,
        &Neighborhood::VND_ORDER,
        TabuVariant::NodeTenure { tenure: config.tabu_tenure },
        500,
    );
    info!(best_after_tabu, "AFTER TABU");

    solution.run_checks(&graph)?;
    println!("{}", stable_format(&solution));

    Ok(())
}
