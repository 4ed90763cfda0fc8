//! Read and write logic nets to files

mod bench;
mod dot;

use std::fs::File;
use std::path::Path;

pub use bench::{read_bench, write_bench};
pub use dot::Dot;

use crate::error::Error;
use crate::network::GNet;

/// Read a logic net from a file
///
/// Following extensions are supported: .bench
pub fn read_network_file(path: impl AsRef<Path>) -> Result<GNet, Error> {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "bench" => read_bench(File::open(path)?),
        _ => Err(Error::Parse {
            line: 0,
            msg: format!("unsupported file name {}", path.display()),
        }),
    }
}

/// Write a logic net to a file
///
/// Following extensions are supported: .bench
pub fn write_network_file(path: impl AsRef<Path>, net: &GNet) -> Result<(), Error> {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "bench" => {
            let mut file = File::create(path)?;
            write_bench(&mut file, net)
        }
        _ => Err(Error::Parse {
            line: 0,
            msg: format!("unsupported file name {}", path.display()),
        }),
    }
}
