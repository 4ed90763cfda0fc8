//! Command line interface

use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::analysis::check_cut;
use crate::cuts::find_cuts;
use crate::error::Error;
use crate::io::{read_network_file, Dot};
use crate::npn::{NpnCollector, NpnOptions};
use crate::params;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a logic net
    ///
    /// Will print the number of inputs, outputs and gates in the net,
    /// and the length of its longest path.
    #[clap()]
    Show(ShowArgs),

    /// Enumerate K-feasible cuts of a logic net
    ///
    /// For every gate a subsumption-pruned set of cuts is computed; the
    /// command reports their number and optionally validates each of them.
    #[clap()]
    Cuts(CutsArgs),

    /// Collect NPN classes of the cones of a logic net
    ///
    /// Every cut of exactly K leaves is extracted as a cone, simulated,
    /// and grouped by the NPN class of its function. The per-class
    /// histogram is printed as CSV.
    #[clap()]
    Npn(NpnArgs),

    /// Print a logic net in DOT format
    #[clap()]
    Dot(DotArgs),
}

/// Command arguments for net statistics
#[derive(Args)]
pub struct ShowArgs {
    /// Net to show
    file: PathBuf,
}

impl ShowArgs {
    /// Read the net and print its plain parameters
    pub fn run(&self) -> Result<(), Error> {
        let net = read_network_file(&self.file)?;
        print!("{}", params::collect(&net)?);
        Ok(())
    }
}

/// Command arguments for cut enumeration
#[derive(Args)]
pub struct CutsArgs {
    /// Net to enumerate
    file: PathBuf,

    /// Maximum cut size
    #[arg(short = 'k', long, default_value_t = 4)]
    cut_size: usize,

    /// Maximum number of cuts per gate, 0 for unlimited
    #[arg(short = 'm', long, default_value_t = 0)]
    max_cuts: usize,

    /// Keep subsumed cuts (legacy enumeration)
    #[arg(long)]
    legacy: bool,

    /// Validate every enumerated cut
    #[arg(long)]
    check: bool,
}

impl CutsArgs {
    /// Enumerate cuts and report their number
    pub fn run(&self) -> Result<(), Error> {
        let net = read_network_file(&self.file)?;
        let storage = find_cuts(&net, self.cut_size, self.max_cuts, self.legacy)?;

        let n_gates = storage.cuts.len();
        let n_cuts = storage.n_cuts();
        println!("Gates with cuts: {n_gates}");
        println!("Total cuts: {n_cuts}");
        if n_gates != 0 {
            println!("Average cuts per gate: {}", n_cuts as f64 / n_gates as f64);
        }

        if self.check {
            for (&gate, cuts) in &storage.cuts {
                for cut in cuts {
                    check_cut(&net, gate, cut)?;
                }
            }
            println!("All cuts are valid");
        }
        Ok(())
    }
}

/// Command arguments for NPN statistics
#[derive(Args)]
pub struct NpnArgs {
    /// Net to classify
    file: PathBuf,

    /// Cut size; only cuts of exactly this size are classified
    #[arg(short = 'k', long, default_value_t = 4)]
    cut_size: usize,

    /// Maximum number of cuts per gate during enumeration, 0 for unlimited
    #[arg(short = 'm', long, default_value_t = 0)]
    max_cuts: usize,

    /// Collect min/max heights of every cone
    #[arg(long)]
    heights: bool,

    /// Output file for the per-class histogram CSV; stdout when absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print the per-gate report
    #[arg(long)]
    gates: bool,

    /// Dump the cones of the most popular classes into this directory
    #[arg(long)]
    dot_dir: Option<PathBuf>,

    /// Number of top classes to dump
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Number of cones to dump per class
    #[arg(long, default_value_t = 10)]
    cones: usize,
}

impl NpnArgs {
    /// Run the NPN pipeline and emit the requested reports
    pub fn run(&self) -> Result<(), Error> {
        let net = read_network_file(&self.file)?;
        let mut collector = NpnCollector::new(
            &net,
            NpnOptions {
                cut_size: self.cut_size,
                max_cuts: self.max_cuts,
                collect_height: self.heights,
            },
        );
        collector.process()?;

        match &self.output {
            Some(path) => {
                let mut stream = BufWriter::new(File::create(path)?);
                collector.print_histogram_data(&mut stream)?;
            }
            None => collector.print_histogram_data(&mut std::io::stdout())?,
        }
        if self.gates {
            collector.print_gate_statistics(&mut std::io::stdout())?;
        }

        if let Some(dot_dir) = &self.dot_dir {
            for (npn_class, cones) in collector.essential_cones(self.top, self.cones) {
                let class_dir = dot_dir.join(npn_class.to_string());
                std::fs::create_dir_all(&class_dir)?;
                for (i, cone) in cones.iter().enumerate() {
                    Dot::new(cone).print_file(class_dir.join(format!("cone{i}.dot")))?;
                }
            }
        }
        Ok(())
    }
}

/// Command arguments for DOT output
#[derive(Args)]
pub struct DotArgs {
    /// Net to print
    file: PathBuf,

    /// Output file; stdout when absent
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl DotArgs {
    /// Print the net in DOT format
    pub fn run(&self) -> Result<(), Error> {
        let net = read_network_file(&self.file)?;
        match &self.output {
            Some(path) => Dot::new(&net).print_file(path)?,
            None => Dot::new(&net).print(&mut std::io::stdout())?,
        }
        Ok(())
    }
}
