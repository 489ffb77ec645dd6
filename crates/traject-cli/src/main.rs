//! The `traject` executable: run one scenario file.
//!
//! Reads the scenario, builds and runs the scheduler, and produces four
//! outputs in the output directory: `tabout.asc` (tab table), `plot1.asc`
//! (plot rows), `doc.asc` (slot audit), and a stdout mirror of the tab
//! table. `doc.asc` is written before the run starts so a failing run
//! still leaves the audit for diagnosis.
//!
//! Exit status: 0 on any successful termination; 1 on configuration or
//! run errors, with a single diagnostic line on stderr.

use clap::Parser;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use traject_output::{ComWriter, DocWriter, OutputSet, PlotWriter, TabWriter};
use traject_scenario::{build, ScenarioSpec};

#[derive(Parser)]
#[command(name = "traject", version, about = "Fixed-step vehicle simulation runner")]
struct Args {
    /// Scenario definition file.
    scenario: PathBuf,

    /// Directory the output files are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let text = fs::read_to_string(&args.scenario)
        .map_err(|e| format!("{}: {e}", args.scenario.display()))?;
    let spec = ScenarioSpec::parse(&text).map_err(|e| e.to_string())?;

    let title = title_of(&args.scenario, &spec.vehicle);
    let deck_base = args
        .scenario
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut read_deck = |file: &str| fs::read_to_string(deck_base.join(file));
    let mut sched = build(&spec, &title, &mut read_deck).map_err(|e| e.to_string())?;

    fs::create_dir_all(&args.output_dir)
        .map_err(|e| format!("{}: {e}", args.output_dir.display()))?;

    // The audit goes out before the run so slot conflicts and a failing
    // first step can both be diagnosed from it.
    write_doc(&args.output_dir, sched.store(), &title).map_err(|e| format!("doc.asc: {e}"))?;

    let mut outputs = open_outputs(&args.output_dir, sched.store(), &spec.vehicle)
        .map_err(|e| e.to_string())?;

    match sched.run(&mut outputs) {
        Ok(summary) => {
            println!(
                "\n Stop: {} at t = {:.4} s ({} steps, {} rows)",
                summary.reason, summary.sim_time, summary.steps, summary.rows
            );
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}

fn title_of(scenario: &Path, vehicle: &str) -> String {
    let stem = scenario
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}: {vehicle}")
}

fn write_doc(dir: &Path, store: &traject_core::VarStore, title: &str) -> io::Result<()> {
    let mut doc = BufWriter::new(File::create(dir.join("doc.asc"))?);
    DocWriter::write(&mut doc, store, title)?;
    doc.flush()
}

fn open_outputs(
    dir: &Path,
    store: &traject_core::VarStore,
    vehicle: &str,
) -> io::Result<OutputSet> {
    let tab = File::create(dir.join("tabout.asc"))?;
    let plot = File::create(dir.join("plot1.asc"))?;

    let mut outputs = OutputSet::null();
    outputs.screen = Some(TabWriter::new(Box::new(io::stdout())));
    outputs.tab = Some(TabWriter::new(Box::new(BufWriter::new(tab))));
    outputs.plot = Some(PlotWriter::new(Box::new(BufWriter::new(plot))));

    // The communications file exists only when something is routed to it.
    let has_com = store.iter_defined().any(|(_, def, _)| def.output.has_com());
    if has_com {
        let com = File::create(dir.join("combus.asc"))?;
        outputs.com = Some(ComWriter::new(
            Box::new(BufWriter::new(com)),
            vehicle.to_string(),
        ));
    }
    Ok(outputs)
}
