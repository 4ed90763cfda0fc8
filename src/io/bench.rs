//! IO for .bench (ISCAS) files

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};

use crate::error::Error;
use crate::network::{GNet, GateId, GateSymbol};

fn parse_error(line: usize, msg: impl Into<String>) -> Error {
    Error::Parse {
        line,
        msg: msg.into(),
    }
}

fn gate_symbol(token: &str, line: usize) -> Result<GateSymbol, Error> {
    use GateSymbol::*;
    match token.to_uppercase().as_str() {
        "AND" => Ok(And),
        "OR" => Ok(Or),
        "NAND" => Ok(Nand),
        "NOR" => Ok(Nor),
        "XOR" => Ok(Xor),
        "XNOR" => Ok(Xnor),
        "NOT" => Ok(Not),
        "BUF" | "BUFF" => Ok(Nop),
        "MAJ" => Ok(Maj),
        "DFF" => Ok(Dff),
        "DFFRS" => Ok(Dffrs),
        "LATCH" => Ok(Latch),
        "VDD" => Ok(One),
        "GND" => Ok(Zero),
        other => Err(parse_error(line, format!("unknown gate type {other}"))),
    }
}

struct Statement {
    name: String,
    func: GateSymbol,
    deps: Vec<String>,
    line: usize,
}

/// Parse a bench file, as used by the ISCAS benchmarks
///
/// These files describe the design with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = NOT(x1)
///     OUTPUT(x2)
/// ```
///
/// The names `vdd` and `gnd` denote the constants and may be used without
/// being declared.
pub fn read_bench<R: Read>(r: R) -> Result<GNet, Error> {
    let mut statements = Vec::new();
    let mut outputs = Vec::new();
    for (number, l) in BufReader::new(r).lines().enumerate() {
        let line = number + 1;
        let s = l?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = t
            .split(['=', '(', ',', ')'])
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() == 2 && ["INPUT", "OUTPUT"].contains(&parts[0]) {
            if parts[0] == "INPUT" {
                statements.push(Statement {
                    name: parts[1].to_string(),
                    func: GateSymbol::In,
                    deps: Vec::new(),
                    line,
                });
            } else {
                outputs.push((parts[1].to_string(), line));
            }
        } else if parts.len() < 2 {
            return Err(parse_error(line, "too few items on the line"));
        } else {
            statements.push(Statement {
                name: parts[0].to_string(),
                func: gate_symbol(parts[1], line)?,
                deps: parts[2..].iter().map(|s| s.to_string()).collect(),
                line,
            });
        }
    }
    net_from_statements(&statements, &outputs)
}

fn net_from_statements(
    statements: &[Statement],
    outputs: &[(String, usize)],
) -> Result<GNet, Error> {
    let mut net = GNet::new();

    // first create every gate, then wire them up, so that statements may
    // reference names defined later in the file
    let mut name_to_id: HashMap<&str, GateId> = HashMap::new();
    for statement in statements {
        let id = net.add_gate(statement.func, &[]);
        if name_to_id.insert(&statement.name, id).is_some() {
            return Err(parse_error(
                statement.line,
                format!("gate {} is defined twice", statement.name),
            ));
        }
    }

    // ABC-style naming for constant signals
    if !name_to_id.contains_key("vdd") {
        name_to_id.insert("vdd", net.add_gate(GateSymbol::One, &[]));
    }
    if !name_to_id.contains_key("gnd") {
        name_to_id.insert("gnd", net.add_gate(GateSymbol::Zero, &[]));
    }

    for statement in statements {
        let expected = match statement.func {
            GateSymbol::In | GateSymbol::Zero | GateSymbol::One => Some(0),
            GateSymbol::Not | GateSymbol::Nop | GateSymbol::Dff | GateSymbol::Latch => Some(1),
            GateSymbol::Maj => Some(3),
            _ => None,
        };
        if let Some(expected) = expected {
            if statement.deps.len() != expected {
                return Err(parse_error(
                    statement.line,
                    format!(
                        "{} takes {} inputs, got {}",
                        statement.func,
                        expected,
                        statement.deps.len()
                    ),
                ));
            }
        }
        let mut inputs = Vec::with_capacity(statement.deps.len());
        for dep in &statement.deps {
            let id = name_to_id.get(dep.as_str()).ok_or_else(|| {
                parse_error(
                    statement.line,
                    format!("gate input {dep} is not generated anywhere"),
                )
            })?;
            inputs.push(*id);
        }
        if !inputs.is_empty() {
            net.set_gate(name_to_id[statement.name.as_str()], statement.func, &inputs);
        }
    }

    for (output, line) in outputs {
        let id = name_to_id.get(output.as_str()).ok_or_else(|| {
            parse_error(*line, format!("output {output} is not generated anywhere"))
        })?;
        net.add_out(*id);
    }

    // unreferenced implicit constants would survive as dead sources
    for name in ["vdd", "gnd"] {
        let id = name_to_id[name];
        if net.gate(id).links().is_empty()
            && !statements.iter().any(|s| s.name == name)
            && !outputs.iter().any(|(o, _)| o == name)
        {
            net.erase_gate(id);
        }
    }

    net.check();
    Ok(net)
}

fn gate_name(net: &GNet, id: GateId) -> String {
    match net.gate(id).func() {
        GateSymbol::One => "vdd".to_string(),
        GateSymbol::Zero => "gnd".to_string(),
        _ => format!("g{id}"),
    }
}

/// Write a bench file, as used by the ISCAS benchmarks
pub fn write_bench<W: Write>(w: &mut W, net: &GNet) -> Result<(), Error> {
    use GateSymbol::*;

    writeln!(w, "# .bench (ISCAS) file")?;
    writeln!(w, "# Generated by kerf")?;
    for (id, gate) in net.gates() {
        if gate.func() == In {
            writeln!(w, "INPUT(g{id})")?;
        }
    }
    writeln!(w)?;
    for (_, gate) in net.gates() {
        if gate.is_target() {
            writeln!(w, "OUTPUT({})", gate_name(net, gate.inputs()[0]))?;
        }
    }
    writeln!(w)?;
    for (id, gate) in net.gates() {
        let token = match gate.func() {
            In | Out | Zero | One => continue,
            Nop => "BUF",
            Not => "NOT",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Nand => "NAND",
            Nor => "NOR",
            Xnor => "XNOR",
            Maj => "MAJ",
            Dff => "DFF",
            Dffrs => "DFFRS",
            Latch => "LATCH",
            Xxx => {
                return Err(Error::NoSemantics {
                    gate: id,
                    func: Xxx,
                })
            }
        };
        let deps: Vec<String> = gate
            .inputs()
            .iter()
            .map(|&input| gate_name(net, input))
            .collect();
        writeln!(w, "g{} = {}({})", id, token, deps.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_basic() {
        let example = "# A comment\n\
                       INPUT(i0)\n\
                       INPUT(i1)\n\
                       x0 = AND(i0, i1)\n\
                       x1 = NAND(x0, i1)\n\
                       x2 = NOT(x1)\n\
                       OUTPUT(x2)\n";
        let net = read_bench(example.as_bytes()).unwrap();
        assert_eq!(net.n_source_links(), 2);
        assert_eq!(net.n_target_links(), 1);
        // 2 inputs + 3 gates + 1 output
        assert_eq!(net.n_gates(), 6);
        let n_not = net.gates().filter(|(_, g)| g.is_not()).count();
        assert_eq!(n_not, 1);
    }

    #[test]
    fn test_read_forward_reference() {
        let example = "INPUT(a)\n\
                       y = NOT(x)\n\
                       x = AND(a, vdd)\n\
                       OUTPUT(y)\n";
        let net = read_bench(example.as_bytes()).unwrap();
        let n_one = net
            .gates()
            .filter(|(_, g)| g.func() == GateSymbol::One)
            .count();
        assert_eq!(n_one, 1);
        assert!(net.topological_order().is_ok());
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(
            read_bench("x0 = FOO(a)\n".as_bytes()),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read_bench("INPUT(a)\nx = AND(a, b)\n".as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            read_bench("INPUT(a)\nx = NOT(a, a)\n".as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            read_bench("INPUT(a)\nOUTPUT(b)\n".as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_round_trip() {
        let example = "INPUT(i0)\n\
                       INPUT(i1)\n\
                       INPUT(i2)\n\
                       m = MAJ(i0, i1, i2)\n\
                       x = XOR(m, gnd)\n\
                       OUTPUT(x)\n";
        let net = read_bench(example.as_bytes()).unwrap();

        let mut buffer = Vec::new();
        write_bench(&mut buffer, &net).unwrap();
        let again = read_bench(buffer.as_slice()).unwrap();

        assert_eq!(again.n_gates(), net.n_gates());
        assert_eq!(again.n_source_links(), net.n_source_links());
        assert_eq!(again.n_target_links(), net.n_target_links());
        for symbol in [GateSymbol::Maj, GateSymbol::Xor, GateSymbol::Zero] {
            let count = |n: &GNet| n.gates().filter(|(_, g)| g.func() == symbol).count();
            assert_eq!(count(&again), count(&net));
        }
    }
}
