// Entry point and high-level CLI flow.
//
// Load and validate the export once, apply the requested filter, then print
// previews of every report and export them unless `--no-export` is given.
use clap::Parser;
use logistics_report::cli::Args;
use logistics_report::{load_and_clean, output, reports, util, Analysis, Result};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let dataset = load_and_clean(&args.input, args.delimiter_byte()?)?;
    let load = dataset.report();
    println!(
        "Processing dataset... ({} rows read, {} valid)",
        util::format_int(load.total_rows),
        util::format_int(load.valid_rows)
    );
    if load.rejected_rows > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors.",
            util::format_int(load.rejected_rows)
        );
    }
    println!();
    if dataset.is_empty() {
        println!("The source holds no valid delivery records. Nothing to report.");
        return Ok(());
    }

    let spec = args.filter_spec(&dataset)?;
    let view = spec.apply(&dataset);
    if view.is_empty() {
        println!("No records match the selected filters. Adjust the selection and try again.");
        return Ok(());
    }
    info!(orders = view.len(), "running analysis");
    let analysis = Analysis::run(&view);

    println!(
        "Delivery Performance ({} to {}, {} orders)\n",
        spec.date_from().format("%d/%m/%Y"),
        spec.date_to().format("%d/%m/%Y"),
        util::format_int(view.len())
    );
    output::preview_table_rows(&reports::kpi_rows(&analysis.overview), 5);

    println!("Carriers\n");
    let carrier_rows = reports::carrier_rows(&analysis.carriers);
    output::preview_table_rows(&carrier_rows, carrier_rows.len());

    println!("Origin Hubs\n");
    let hub_rows = reports::hub_rows(&analysis.hubs);
    output::preview_table_rows(&hub_rows, hub_rows.len());

    println!("Monthly OTD and Freight Cost by Carrier\n");
    let monthly_rows = reports::monthly_rows(&analysis.monthly);
    output::preview_table_rows(&monthly_rows, monthly_rows.len());

    println!("Mean Delay (days), Hub x Carrier\n");
    output::preview_grid(reports::heatmap_grid(&analysis.delay_heatmap));

    println!(
        "Top {} Routes by Volume ({} of {} routes above the mean route delay of {} days)\n",
        args.top_routes,
        analysis.routes.delayed_count(),
        analysis.routes.routes.len(),
        util::format_measure(analysis.routes.global_mean_delay, 1)
    );
    output::preview_table_rows(
        &reports::route_rows(&analysis.routes, args.top_routes),
        args.top_routes,
    );

    println!("Cost Efficiency by Hub\n");
    let eff_rows = reports::cost_efficiency_rows(&analysis.cost_efficiency);
    output::preview_table_rows(&eff_rows, eff_rows.len());

    if let Some(insights) = &analysis.insights {
        println!("Insights and Recommendations\n");
        let rows = reports::insight_rows(insights);
        output::preview_table_rows(&rows, rows.len());
    }

    if !args.no_export {
        let written = output::export_all(&args.out_dir, load, &spec, &analysis)?;
        for path in written {
            println!("(exported {})", path.display());
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
