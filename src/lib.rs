//! Cut enumeration and NPN classification for gate-level logic networks
//!
//! This crate provides the structural analyses that technology-mapping and
//! rewriting passes build upon: K-feasible cut enumeration, cone
//! extraction, and NPN classification of cone functions.
//!
//! # Usage and features
//!
//! Kerf provides a command line tool, that can be installed using
//! [Cargo](https://doc.rust-lang.org/cargo/getting-started/installation.html):
//! `cargo install kerf`.
//!
//! To show available commands:
//! ```bash
//! kerf help
//! ```
//!
//! The `cuts` command enumerates the K-feasible cuts of every gate:
//! ```bash
//! kerf cuts mydesign.bench -k 4
//! ```
//!
//! The `npn` command groups the cones of a design by the
//! [NPN class](https://en.wikipedia.org/wiki/Boolean_function#Classification)
//! of their function and prints a per-class histogram:
//! ```bash
//! kerf npn mydesign.bench -k 4 -o histogram.csv
//! ```
//!
//! At the moment, the only supported input format is `.bench`.
//!
//! # Development
//!
//! ## Philosophy
//!
//! All analyses operate on a single explicit-gate datastructure,
//! [`GNet`]. Unlike and-inverter-graph representations, inverters and
//! complex gates are ordinary nodes; the cut enumerator looks through
//! inverters instead, so cut sets never depend on how negations were
//! expressed.
//!
//! ## Datastructures
//!
//! [`GNet`] is a directed acyclic multigraph of gates. Each gate carries
//! its function ([`GateSymbol`]), its predecessor list and its fan-out
//! links; sequential elements take part in the structure but are opaque to
//! the analyses.
//!
//! For example, here is a full adder circuit:
//! ```
//! # use kerf::{GNet, GateSymbol};
//! let mut net = GNet::new();
//! let i0 = net.add_input();
//! let i1 = net.add_input();
//! let i2 = net.add_input();
//! let carry = net.add_gate(GateSymbol::Maj, &[i0, i1, i2]);
//! let sum = net.add_gate(GateSymbol::Xor, &[i0, i1, i2]);
//! net.add_out(carry);
//! net.add_out(sum);
//! ```
//!
//! The analyses are exposed as plain functions and collector types:
//! [`cuts::find_cuts`] fills a [`cuts::CutStorage`],
//! [`cone::extract_cone`] materializes the sub-net between a cut and a
//! root, and [`npn::NpnCollector`] drives the whole pipeline.

#![warn(missing_docs)]

pub mod analysis;
pub mod cmd;
pub mod cone;
pub mod cuts;
mod error;
pub mod io;
pub mod network;
pub mod npn;
pub mod params;
pub mod traverse;

pub use error::Error;
pub use network::{GNet, Gate, GateId, GateSymbol, Link};
