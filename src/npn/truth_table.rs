use std::collections::HashMap;
use std::fmt;

use crate::cone::BoundGNet;
use crate::error::Error;
use crate::network::{GateId, GateSymbol};

/// Most inputs a truth table can cover with one 64-bit word
pub const MAX_VARS: usize = 6;

/// Cofactor pattern of each variable: input `i` toggles with period `2^i`
const VAR_PATTERNS: [u64; MAX_VARS] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// Truth table of a single-output function of up to [`MAX_VARS`] inputs
///
/// Bit `i` holds the output under the input assignment encoded by `i`,
/// with variable 0 as the least-significant selector bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TruthTable {
    bits: u64,
    num_vars: usize,
}

impl TruthTable {
    /// Build a table from raw bits; bits beyond `2^num_vars` are cleared
    pub fn new(bits: u64, num_vars: usize) -> TruthTable {
        assert!(num_vars <= MAX_VARS);
        TruthTable {
            bits: bits & Self::mask(num_vars),
            num_vars,
        }
    }

    /// Bitmask covering the `2^num_vars` valid bits
    pub fn mask(num_vars: usize) -> u64 {
        if num_vars == MAX_VARS {
            !0
        } else {
            (1u64 << (1usize << num_vars)) - 1
        }
    }

    /// Cofactor pattern of variable `index`
    pub fn var_pattern(index: usize) -> u64 {
        VAR_PATTERNS[index]
    }

    /// Raw bits of the table
    pub fn raw(&self) -> u64 {
        self.bits
    }

    /// Number of input variables
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Output bit under the given assignment index
    pub fn bit(&self, assignment: usize) -> bool {
        debug_assert!(assignment < (1 << self.num_vars));
        (self.bits >> assignment) & 1 != 0
    }

    /// Simulate a bound cone on all assignments of its inputs
    ///
    /// Every gate of the cone is evaluated once in topological order; the
    /// result is the word of the single OUT sink.
    pub fn of_cone(bound: &BoundGNet) -> Result<TruthTable, Error> {
        let num_vars = bound.input_bindings.len();
        if num_vars > MAX_VARS {
            return Err(Error::TooManyInputs(num_vars));
        }
        let net = &bound.net;

        let variables: HashMap<GateId, usize> = bound
            .input_bindings
            .iter()
            .enumerate()
            .map(|(var, &gate)| (gate, var))
            .collect();

        let mut values: HashMap<GateId, u64> = HashMap::new();
        let order = net.topological_order()?;
        let mut output = None;
        for id in order {
            let gate = net.gate(id);
            let value = eval_gate(id, gate.func(), gate.inputs(), &variables, &values)?;
            values.insert(id, value);
            if gate.is_target() {
                output = Some(value);
            }
        }

        match output {
            Some(bits) => Ok(TruthTable::new(bits, num_vars)),
            None => Err(Error::MissingOutput),
        }
    }
}

fn eval_gate(
    id: GateId,
    func: GateSymbol,
    inputs: &[GateId],
    variables: &HashMap<GateId, usize>,
    values: &HashMap<GateId, u64>,
) -> Result<u64, Error> {
    use GateSymbol::*;

    let operand = |i: usize| -> Result<u64, Error> {
        let input = *inputs.get(i).ok_or(Error::UnboundInput(id))?;
        Ok(values[&input])
    };
    let fold = |init: u64, op: fn(u64, u64) -> u64| -> Result<u64, Error> {
        let mut acc = init;
        for input in inputs {
            acc = op(acc, values[input]);
        }
        Ok(acc)
    };

    match func {
        In => variables
            .get(&id)
            .map(|&var| TruthTable::var_pattern(var))
            .ok_or(Error::UnboundInput(id)),
        Zero => Ok(0),
        One => Ok(!0),
        Nop | Out => operand(0),
        Not => Ok(!operand(0)?),
        And => fold(!0, |a, b| a & b),
        Or => fold(0, |a, b| a | b),
        Xor => fold(0, |a, b| a ^ b),
        Nand => Ok(!fold(!0, |a, b| a & b)?),
        Nor => Ok(!fold(0, |a, b| a | b)?),
        Xnor => Ok(!fold(0, |a, b| a ^ b)?),
        Maj => {
            if inputs.len() != 3 {
                return Err(Error::NoSemantics { gate: id, func });
            }
            let (a, b, c) = (operand(0)?, operand(1)?, operand(2)?);
            Ok((b & c) | (a & (b | c)))
        }
        Latch | Dff | Dffrs | Xxx => Err(Error::NoSemantics { gate: id, func }),
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = ((1usize << self.num_vars) + 3) / 4;
        write!(f, "{:0width$x}", self.bits, width = digits.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cone::{extract_cone, extract_cone_ordered};
    use crate::cuts::Cut;
    use crate::network::generators::testcases;
    use crate::network::GNet;

    #[test]
    fn test_masks_and_patterns() {
        assert_eq!(TruthTable::mask(0), 0x1);
        assert_eq!(TruthTable::mask(2), 0xF);
        assert_eq!(TruthTable::mask(6), !0);
        assert_eq!(TruthTable::var_pattern(0) & 0xF, 0xA);
        assert_eq!(TruthTable::var_pattern(1) & 0xF, 0xC);
    }

    #[test]
    fn test_and_cone() {
        let t = testcases::and_tree();
        let bound = extract_cone_ordered(&t.net, t.a, &[t.inputs[0], t.inputs[1]]);
        let table = TruthTable::of_cone(&bound).unwrap();
        assert_eq!(table.num_vars(), 2);
        assert_eq!(table.raw(), 0x8);
    }

    #[test]
    fn test_inverted_input_cone() {
        // b = AND(NOT(i1), i2): true only for i1 = 0, i2 = 1
        let n = testcases::inverter_and();
        let bound = extract_cone_ordered(&n.net, n.b, &[n.i1, n.i2]);
        let table = TruthTable::of_cone(&bound).unwrap();
        assert_eq!(table.raw(), 0x4);
    }

    #[test]
    fn test_wide_cone() {
        let t = testcases::and_tree();
        let order: Vec<_> = t.inputs.into();
        let bound = extract_cone_ordered(&t.net, t.root, &order);
        let table = TruthTable::of_cone(&bound).unwrap();
        assert_eq!(table.num_vars(), 4);
        // conjunction of all four inputs: only the last assignment holds
        assert_eq!(table.raw(), 0x8000);
    }

    #[test]
    fn test_constant_cone() {
        let c = testcases::const_mix();
        // the cone bounded by the constants only: f = (0 | i1) & 1 = i1
        let cut = Cut::from([c.zero, c.one, c.i1]);
        let order: Vec<_> = cut.iter().copied().collect();
        let bound = extract_cone(&c.net, c.root, &cut, &order);
        let table = TruthTable::of_cone(&bound).unwrap();
        let i1_var = order.iter().position(|&g| g == c.i1).unwrap();
        assert_eq!(
            table.raw(),
            TruthTable::var_pattern(i1_var) & TruthTable::mask(3)
        );
    }

    #[test]
    fn test_re_extraction_is_stable() {
        // extracting the extracted cone over its own inputs preserves the table
        let t = testcases::and_tree();
        let order: Vec<_> = t.inputs.into();
        let bound = extract_cone_ordered(&t.net, t.root, &order);
        let table = TruthTable::of_cone(&bound).unwrap();

        let root = bound
            .net
            .gates()
            .find(|(_, g)| g.is_target())
            .map(|(id, _)| id)
            .unwrap();
        let again = extract_cone_ordered(&bound.net, root, &bound.input_bindings);
        let table_again = TruthTable::of_cone(&again).unwrap();
        assert_eq!(table, table_again);
    }

    #[test]
    fn test_sequential_cone_is_rejected() {
        let mut net = GNet::new();
        let i1 = net.add_input();
        let d = net.add_gate(crate::network::GateSymbol::Dff, &[i1]);
        net.add_out(d);
        let bound = extract_cone_ordered(&net, d, &[i1]);
        assert!(matches!(
            TruthTable::of_cone(&bound),
            Err(Error::NoSemantics { .. })
        ));
    }
}
