//! Net generators and test fixtures

use crate::network::gnet::{GNet, GateId};
use crate::network::symbol::GateSymbol;

/// Adder generators
pub mod adder {
    use super::*;

    /// A simple and slow ripple-carry adder over explicit MAJ/XOR gates
    pub fn ripple_carry(len: usize) -> GNet {
        let mut net = GNet::new();
        let mut carry: Option<GateId> = None;
        for _ in 0..len {
            let a = net.add_input();
            let b = net.add_input();
            let (next_carry, sum) = match carry {
                Some(c) => (
                    net.add_gate(GateSymbol::Maj, &[a, b, c]),
                    net.add_gate(GateSymbol::Xor, &[a, b, c]),
                ),
                None => (
                    net.add_gate(GateSymbol::And, &[a, b]),
                    net.add_gate(GateSymbol::Xor, &[a, b]),
                ),
            };
            net.add_out(sum);
            carry = Some(next_carry);
        }
        if let Some(c) = carry {
            net.add_out(c);
        }
        net.check();
        net
    }
}

/// Small fixed nets used by the unit tests
#[allow(missing_docs)]
pub mod testcases {
    use super::*;

    /// Two-level AND tree: `a = AND(i1, i2)`, `b = AND(i3, i4)`, `t = AND(a, b)`
    pub struct AndTree {
        pub net: GNet,
        pub inputs: [GateId; 4],
        pub a: GateId,
        pub b: GateId,
        pub root: GateId,
        pub out: GateId,
    }

    pub fn and_tree() -> AndTree {
        let mut net = GNet::new();
        let inputs = [
            net.add_input(),
            net.add_input(),
            net.add_input(),
            net.add_input(),
        ];
        let a = net.add_gate(GateSymbol::And, &[inputs[0], inputs[1]]);
        let b = net.add_gate(GateSymbol::And, &[inputs[2], inputs[3]]);
        let root = net.add_gate(GateSymbol::And, &[a, b]);
        let out = net.add_out(root);
        net.check();
        AndTree {
            net,
            inputs,
            a,
            b,
            root,
            out,
        }
    }

    /// Inverter feeding a conjunction: `a = NOT(i1)`, `b = AND(a, i2)`
    pub struct InverterAnd {
        pub net: GNet,
        pub i1: GateId,
        pub i2: GateId,
        pub a: GateId,
        pub b: GateId,
    }

    pub fn inverter_and() -> InverterAnd {
        let mut net = GNet::new();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let a = net.add_gate(GateSymbol::Not, &[i1]);
        let b = net.add_gate(GateSymbol::And, &[a, i2]);
        net.add_out(b);
        net.check();
        InverterAnd { net, i1, i2, a, b }
    }

    /// Reconvergent diamond: `i1 → x → y` and `i1 → z → y`
    pub struct Diamond {
        pub net: GNet,
        pub i1: GateId,
        pub x: GateId,
        pub z: GateId,
        pub y: GateId,
    }

    pub fn diamond() -> Diamond {
        let mut net = GNet::new();
        let i1 = net.add_input();
        let x = net.add_gate(GateSymbol::Nop, &[i1]);
        let z = net.add_gate(GateSymbol::Nop, &[i1]);
        let y = net.add_gate(GateSymbol::And, &[x, z]);
        net.add_out(y);
        net.check();
        Diamond { net, i1, x, z, y }
    }

    /// A gate mixing a primary input with both constants
    pub struct ConstMix {
        pub net: GNet,
        pub zero: GateId,
        pub one: GateId,
        pub i1: GateId,
        pub root: GateId,
    }

    pub fn const_mix() -> ConstMix {
        let mut net = GNet::new();
        let zero = net.add_gate(GateSymbol::Zero, &[]);
        let one = net.add_gate(GateSymbol::One, &[]);
        let i1 = net.add_input();
        let a = net.add_gate(GateSymbol::Or, &[zero, i1]);
        let root = net.add_gate(GateSymbol::And, &[a, one]);
        net.add_out(root);
        net.check();
        ConstMix {
            net,
            zero,
            one,
            i1,
            root,
        }
    }
}
