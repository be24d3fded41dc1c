//! Textual solution reporting: the stable round-trip format of the
//! external interface, plus verbose colorized diagnostics for interactive
//! use. The two must never be interleaved — callers pick one or the other.

use std::fmt::Write as _;
use std::path::Path;

use colored::Colorize;
use csv::Writer;

use crate::domain::{Graph, Solution};

/// Round `value` to `sig_figs` significant digits and render it the way
/// Python's `f"{value:.5}"` does: fixed-point notation, trailing zeros
/// stripped, but at least one digit kept after the decimal point. Mirrors
/// `map_objects/printer.py`'s `f"{self.solution.solution_time/60:.5} hr"` —
/// a plain `{:.5}` fixed-decimals format would print 5 decimal *places*
/// instead of 5 significant *digits* and diverge from the original on
/// anything with more than one integer digit.
fn format_significant(value: f64, sig_figs: i32) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let mut text = format!("{:.*}", decimals, value);

    // Rounding can push the value across a power of ten (e.g. 9.99996 at 4
    // decimals rounds to "10.0000"), which changes how many digits belong
    // before the decimal point; redo with the post-rounding magnitude.
    if let Ok(rounded) = text.parse::<f64>() {
        if rounded != 0.0 {
            let new_magnitude = rounded.abs().log10().floor() as i32;
            if new_magnitude != magnitude {
                let new_decimals = (sig_figs - 1 - new_magnitude).max(0) as usize;
                text = format!("{:.*}", new_decimals, value);
            }
        }
    }

    if text.contains('.') {
        while text.ends_with('0') && !text.ends_with(".0") {
            text.pop();
        }
    } else {
        text.push_str(".0");
    }
    text
}

/// Render the stable format:
/// ```text
/// Objective:
/// <hours to 5 significant digits> hr
/// Routes:
/// <vehicle_count>
/// Route Summary:
/// <comma-separated node ids, depot first, per vehicle>
/// ```
pub fn stable_format(solution: &Solution) -> String {
    let mut out = String::new();
    writeln!(out, "Objective:").unwrap();
    writeln!(out, "{} hr", format_significant(solution.solution_time() / 60.0, 5)).unwrap();
    writeln!(out, "Routes:").unwrap();
    writeln!(out, "{}", solution.vehicles.len()).unwrap();
    writeln!(out, "Route Summary:").unwrap();
    for vehicle in &solution.vehicles {
        let ids: Vec<String> = vehicle.route.nodes.iter().map(|id| id.to_string()).collect();
        writeln!(out, "{}", ids.join(",")).unwrap();
    }
    out
}

/// Verbose, colorized per-vehicle diagnostics: service time, demand and
/// distance for every route, plus the solution-wide objective. Not part of
/// the stable round-trip format — for interactive use only.
pub fn verbose_report(solution: &Solution, graph: &Graph) -> String {
    let mut out = String::new();
    let slowest = solution.slowest_vehicle();
    writeln!(
        out,
        "{}",
        format!("solution_time = {:.2} min, total_distance = {:.2}", solution.solution_time(), solution.total_distance(graph))
            .bold()
    )
    .unwrap();

    for (idx, vehicle) in solution.vehicles.iter().enumerate() {
        let service_time = vehicle.route.service_time();
        let demand = vehicle.route.total_demand();
        let distance: f64 = vehicle.route.nodes.windows(2).map(|w| graph.distance[w[0]][w[1]]).sum();
        let line = format!(
            "vehicle {idx}: service_time={service_time:.2} demand={demand}/{cap} distance={distance:.2} route={route:?}",
            cap = vehicle.capacity,
            route = vehicle.route.nodes,
        );
        if idx == slowest {
            writeln!(out, "{}", line.red()).unwrap();
        } else {
            writeln!(out, "{line}").unwrap();
        }
    }
    out
}

/// Dump a best-so-far trace (as produced by [`crate::solver::gls::GlsOutcome`])
/// to a CSV file: `iteration,new_best_so_far` per row.
pub fn write_trace_csv(trace: &[(usize, f64)], path: impl AsRef<Path>) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["iteration", "new_best_so_far"])?;
    for (iteration, value) in trace {
        wtr.write_record([iteration.to_string(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Graph, Node, Vehicle};
    use crate::solver::build_solution;

    #[test]
    fn format_significant_matches_pythons_general_float_format() {
        assert_eq!(format_significant(8.333333, 5), "8.3333");
        assert_eq!(format_significant(10.0, 5), "10.0");
        assert_eq!(format_significant(100.0, 5), "100.0");
        assert_eq!(format_significant(1.0, 5), "1.0");
        assert_eq!(format_significant(0.0, 5), "0.0");
        assert_eq!(format_significant(123.456, 5), "123.46");
        assert_eq!(format_significant(9.99996, 5), "10.0");
    }

    #[test]
    fn stable_format_matches_the_documented_shape() {
        let graph = Graph::new(vec![
            Node::depot(50.0, 50.0),
            Node { id: 1, x: 0.0, y: 0.0, demand: 100, unloading_time: 0.0 },
        ]);
        let vehicles = vec![Vehicle::new(0, 60.0, 1000, 0.0, 0, &graph)];
        let solution = build_solution(&graph, vehicles).unwrap();
        let text = stable_format(&solution);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Objective:");
        assert!(lines[1].ends_with(" hr"));
        assert_eq!(lines[2], "Routes:");
        assert_eq!(lines[3], "1");
        assert_eq!(lines[4], "Route Summary:");
        assert_eq!(lines[5], "0,1");
    }

    #[test]
    fn trace_csv_round_trips_through_a_real_reader() {
        let path = std::env::temp_dir().join("mincvrp_trace_test.csv");
        let trace = vec![(1usize, 120.5), (7, 98.25), (12, 90.0)];
        write_trace_csv(&trace, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.headers().unwrap(), vec!["iteration", "new_best_so_far"]);
        let rows: Vec<(usize, f64)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].parse().unwrap(), r[1].parse().unwrap())
            })
            .collect();
        assert_eq!(rows, trace);

        std::fs::remove_file(&path).unwrap();
    }
}
