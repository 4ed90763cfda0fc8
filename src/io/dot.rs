//! DOT (Graphviz) output of a net

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::network::{GNet, GateId};

/// Prints a net in DOT format, optionally highlighting an extracted cone
pub struct Dot<'a> {
    net: &'a GNet,
}

impl<'a> Dot<'a> {
    /// Create a printer for `net`
    pub fn new(net: &'a GNet) -> Dot<'a> {
        Dot { net }
    }

    /// Print the net as a `digraph`, one edge per link
    pub fn print<W: Write>(&self, stream: &mut W) -> io::Result<()> {
        writeln!(stream, "digraph substNet {{")?;
        for (id, gate) in self.net.gates() {
            if gate.links().is_empty() {
                write!(stream, "\t")?;
                self.print_gate(stream, id)?;
                writeln!(stream, ";")?;
            }
            for link in gate.links() {
                write!(stream, "\t")?;
                self.print_gate(stream, id)?;
                write!(stream, " -> ")?;
                self.print_gate(stream, link.target)?;
                writeln!(stream, ";")?;
            }
        }
        writeln!(stream, "}}")
    }

    /// Print to a file path
    pub fn print_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut stream = BufWriter::new(File::create(path)?);
        self.print(&mut stream)
    }

    /// Print the net with the gates of `cone_gates` highlighted; each
    /// matched gate is labelled with its counterpart in the extracted cone
    pub fn print_color<W: Write>(
        &self,
        stream: &mut W,
        cone_gates: &HashMap<GateId, GateId>,
    ) -> io::Result<()> {
        writeln!(stream, "digraph substNet {{")?;
        for (id, gate) in self.net.gates() {
            write!(stream, "\t")?;
            self.print_gate(stream, id)?;
            if let Some(new_id) = cone_gates.get(&id) {
                write!(
                    stream,
                    " [label=\"{}({}, {})\", color=red, style=filled]",
                    id,
                    new_id,
                    gate.func()
                )?;
            }
            writeln!(stream, ";")?;
            for link in gate.links() {
                write!(stream, "\t")?;
                self.print_gate(stream, id)?;
                write!(stream, " -> ")?;
                self.print_gate(stream, link.target)?;
                writeln!(stream, ";")?;
            }
        }
        writeln!(stream, "}}")
    }

    fn print_gate<W: Write>(&self, stream: &mut W, id: GateId) -> io::Result<()> {
        write!(stream, "{}{}", self.net.gate(id).func(), id)
    }
}
