use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use kdam::tqdm;

use crate::analysis::heights;
use crate::cone::{extract_cone, BoundGNet, ConeVisitor};
use crate::cuts::{find_cuts, Cut};
use crate::error::Error;
use crate::network::{GNet, GateId};
use crate::npn::canon::canonical_key;
use crate::npn::truth_table::{TruthTable, MAX_VARS};
use crate::traverse::Walker;

/// One classified cone: its NPN class and depth range within the cut
#[derive(Debug, Clone)]
pub struct NpnStats {
    /// Canonical 64-bit class key
    pub npn_class: u64,
    /// Distance from the root to the nearest cut node; -1 when not collected
    pub min_height: i32,
    /// Distance from the root to the farthest cut node; -1 when not collected
    pub max_height: i32,
    /// The cut the cone was extracted over
    pub cut: Cut,
}

/// Classification results of a single root gate
#[derive(Debug, Clone)]
pub struct GateStats {
    /// The root gate
    pub gate_id: GateId,
    /// Number of classified cones rooted at the gate
    pub number_of_cuts: usize,
    /// One record per classified cone
    pub npn_class_info: Vec<NpnStats>,
}

/// Accumulated members of one NPN class with height statistics
#[derive(Debug, Clone)]
pub struct ClassAggregate {
    /// Every recorded cone of the class
    pub stats: Vec<NpnStats>,
    /// Mean of the max heights; -1 before aggregation
    pub max_height_avg: f64,
    /// Standard deviation of the max heights; -1 before aggregation
    pub max_height_dev: f64,
    /// Mean of the min heights; -1 before aggregation
    pub min_height_avg: f64,
    /// Standard deviation of the min heights; -1 before aggregation
    pub min_height_dev: f64,
}

impl Default for ClassAggregate {
    fn default() -> ClassAggregate {
        ClassAggregate {
            stats: Vec::new(),
            max_height_avg: -1.0,
            max_height_dev: -1.0,
            min_height_avg: -1.0,
            min_height_dev: -1.0,
        }
    }
}

impl ClassAggregate {
    /// Mean and standard deviation of the min and max heights
    fn compute(&mut self) {
        if self.stats.is_empty() {
            return;
        }
        let n = self.stats.len() as f64;
        let sum_max: f64 = self.stats.iter().map(|s| s.max_height as f64).sum();
        let sum_min: f64 = self.stats.iter().map(|s| s.min_height as f64).sum();
        self.max_height_avg = sum_max / n;
        self.min_height_avg = sum_min / n;

        let sq_max: f64 = self
            .stats
            .iter()
            .map(|s| (s.max_height as f64 - self.max_height_avg).powi(2))
            .sum();
        let sq_min: f64 = self
            .stats
            .iter()
            .map(|s| (s.min_height as f64 - self.min_height_avg).powi(2))
            .sum();
        self.max_height_dev = (sq_max / n).sqrt();
        self.min_height_dev = (sq_min / n).sqrt();
    }
}

/// Options of an NPN collection pass
#[derive(Debug, Clone, Copy)]
pub struct NpnOptions {
    /// Cut size K, at most [`MAX_VARS`]; only cuts of exactly this size
    /// are classified
    pub cut_size: usize,
    /// Per-gate soft cap during enumeration; 0 means unlimited
    pub max_cuts: usize,
    /// Whether to fill min/max heights of each cone
    pub collect_height: bool,
}

impl Default for NpnOptions {
    fn default() -> NpnOptions {
        NpnOptions {
            cut_size: 4,
            max_cuts: 0,
            collect_height: false,
        }
    }
}

/// Collects and aggregates NPN statistics over all cones of a net
///
/// A single pass enumerates cuts, extracts the cone of every cut of exact
/// size K, classifies its function and groups the results per gate and per
/// NPN class. Cones whose effective cut is smaller than the stored cut are
/// dropped.
pub struct NpnCollector<'a> {
    net: &'a GNet,
    options: NpnOptions,
    gate_stats: HashMap<GateId, GateStats>,
    class_stats: HashMap<u64, ClassAggregate>,
}

impl<'a> NpnCollector<'a> {
    /// Create a collector over `net`; panics when the cut size exceeds
    /// what a truth table can hold
    pub fn new(net: &'a GNet, options: NpnOptions) -> NpnCollector<'a> {
        assert!(options.cut_size <= MAX_VARS, "cut size exceeds {MAX_VARS}");
        NpnCollector {
            net,
            options,
            gate_stats: HashMap::new(),
            class_stats: HashMap::new(),
        }
    }

    /// Run the whole pipeline: enumeration, classification, aggregation
    pub fn process(&mut self) -> Result<(), Error> {
        let options = self.options;
        let storage = find_cuts(self.net, options.cut_size, options.max_cuts, false)?;
        log::info!("found {} cuts", storage.n_cuts());

        let mut gate_ids: Vec<GateId> = storage.cuts.keys().copied().collect();
        gate_ids.sort();
        for gate_id in tqdm!(gate_ids.into_iter(), desc = "classifying") {
            for cut in &storage.cuts[&gate_id] {
                if cut.len() != options.cut_size {
                    continue;
                }
                if let Some(stat) = self.fill_npn_stats(cut, gate_id)? {
                    self.add_stat(gate_id, stat);
                }
            }
        }

        for aggregate in self.class_stats.values_mut() {
            aggregate.compute();
        }
        Ok(())
    }

    /// Classify one cone; `None` when the record is dropped
    fn fill_npn_stats(&self, cut: &Cut, gate_id: GateId) -> Result<Option<NpnStats>, Error> {
        let mut visitor = ConeVisitor::new(cut, gate_id);
        Walker::new(self.net, &mut visitor).walk_cut_cone(cut, gate_id, false);
        let (cone, match_map, result_cut) = visitor.into_parts();

        if result_cut.len() != cut.len() {
            log::debug!("dropping over-approximated cut of gate {gate_id}");
            return Ok(None);
        }

        let (min_height, max_height) = if self.options.collect_height {
            heights(self.net, gate_id, cut)
        } else {
            (-1, -1)
        };

        let input_bindings: Vec<GateId> = result_cut.iter().map(|gate| match_map[gate]).collect();
        let bound = BoundGNet {
            net: Rc::new(cone),
            input_bindings,
        };
        let table = match TruthTable::of_cone(&bound) {
            Ok(table) => table,
            Err(Error::NoSemantics { gate, func }) => {
                log::debug!("dropping cut of gate {gate_id}: {func} gate {gate} in cone");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        Ok(Some(NpnStats {
            npn_class: canonical_key(table),
            min_height,
            max_height,
            cut: cut.clone(),
        }))
    }

    /// Record one classified cone for a root gate
    pub fn add_stat(&mut self, gate_id: GateId, stat: NpnStats) {
        let gate_stat = self.gate_stats.entry(gate_id).or_insert_with(|| GateStats {
            gate_id,
            number_of_cuts: 0,
            npn_class_info: Vec::new(),
        });
        gate_stat.npn_class_info.push(stat.clone());
        gate_stat.number_of_cuts += 1;
        self.class_stats
            .entry(stat.npn_class)
            .or_default()
            .stats
            .push(stat);
    }

    /// Per-gate classification results
    pub fn gate_stats(&self) -> &HashMap<GateId, GateStats> {
        &self.gate_stats
    }

    /// Per-class aggregates
    pub fn class_stats(&self) -> &HashMap<u64, ClassAggregate> {
        &self.class_stats
    }

    /// Human-readable per-gate report
    pub fn print_gate_statistics(&self, stream: &mut dyn Write) -> io::Result<()> {
        let mut gate_ids: Vec<GateId> = self.gate_stats.keys().copied().collect();
        gate_ids.sort();
        for gate_id in gate_ids {
            let stats = &self.gate_stats[&gate_id];
            writeln!(stream, "Gate : {}{}", self.net.gate(gate_id).func(), gate_id)?;
            writeln!(stream, "\tNumber of Cuts: {}", stats.number_of_cuts)?;
            for npn_stats in &stats.npn_class_info {
                writeln!(
                    stream,
                    "\tNPN Class: {}, Max height: {}, Min height: {}",
                    npn_stats.npn_class, npn_stats.max_height, npn_stats.min_height
                )?;
            }
            writeln!(stream)?;
        }
        Ok(())
    }

    /// Per-class histogram rows, semicolon-separated
    pub fn print_histogram_data(&self, stream: &mut dyn Write) -> io::Result<()> {
        writeln!(
            stream,
            "NPN Class;Count;MaxHeightA;MaxHeightD;MinHeightA;MinHeightD"
        )?;
        let mut classes: Vec<u64> = self.class_stats.keys().copied().collect();
        classes.sort();
        for npn_class in classes {
            let data = &self.class_stats[&npn_class];
            writeln!(
                stream,
                "{};{};{};{};{};{}",
                npn_class,
                data.stats.len(),
                data.max_height_avg,
                data.max_height_dev,
                data.min_height_avg,
                data.min_height_dev
            )?;
        }
        Ok(())
    }

    /// Up to `cones_number` extracted cones for each of the `top_number`
    /// most popular NPN classes
    ///
    /// The returned nets are shared handles and stay valid after the
    /// collector is dropped.
    pub fn essential_cones(
        &self,
        top_number: usize,
        cones_number: usize,
    ) -> HashMap<u64, Vec<Rc<GNet>>> {
        let mut popular: Vec<(u64, usize)> = self
            .class_stats
            .iter()
            .map(|(&class, aggregate)| (class, aggregate.stats.len()))
            .collect();
        popular.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        popular.truncate(top_number);

        let mut result: HashMap<u64, Vec<Rc<GNet>>> =
            popular.into_iter().map(|(class, _)| (class, Vec::new())).collect();

        let mut gate_ids: Vec<GateId> = self.gate_stats.keys().copied().collect();
        gate_ids.sort();
        for gate_id in gate_ids {
            for stat in &self.gate_stats[&gate_id].npn_class_info {
                if let Some(cones) = result.get_mut(&stat.npn_class) {
                    if cones.len() < cones_number {
                        let order: Vec<GateId> = stat.cut.iter().copied().collect();
                        let bound = extract_cone(self.net, gate_id, &stat.cut, &order);
                        cones.push(bound.net);
                    }
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::generators::testcases;
    use crate::network::GateSymbol;

    #[test]
    fn test_and_tree_single_class() {
        let t = testcases::and_tree();
        let mut collector = NpnCollector::new(
            &t.net,
            NpnOptions {
                cut_size: 2,
                max_cuts: 0,
                collect_height: true,
            },
        );
        collector.process().unwrap();

        // the three AND gates and the OUT sink each contribute one
        // 2-input AND cone
        assert_eq!(collector.gate_stats().len(), 4);
        assert_eq!(collector.class_stats().len(), 1);
        let aggregate = collector.class_stats().values().next().unwrap();
        assert_eq!(aggregate.stats.len(), 4);
        // the AND cuts sit at distance 1, the OUT cut {a, b} at distance 2
        assert_eq!(aggregate.max_height_avg, 1.25);
        assert_eq!(aggregate.min_height_avg, 1.25);
        assert!((aggregate.max_height_dev - 0.75f64.sqrt() / 2.0).abs() < 1e-12);

        // 2-input AND cones are keyed by the smallest orbit member, NOR
        let (&class, _) = collector.class_stats().iter().next().unwrap();
        assert_eq!(class, 0x1);
    }

    #[test]
    fn test_heights_not_collected_by_default() {
        let t = testcases::and_tree();
        let mut collector = NpnCollector::new(
            &t.net,
            NpnOptions {
                cut_size: 2,
                ..NpnOptions::default()
            },
        );
        collector.process().unwrap();
        for stats in collector.gate_stats().values() {
            for npn_stats in &stats.npn_class_info {
                assert_eq!(npn_stats.min_height, -1);
                assert_eq!(npn_stats.max_height, -1);
            }
        }
    }

    #[test]
    fn test_over_approximated_cut_is_dropped() {
        // b = AND(a, i1) with a = AND(i1, i2): the cut {a, i1} of b is
        // over-approximated because i1 only reaches b through a's leaves
        let mut net = crate::network::GNet::new();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let a = net.add_gate(GateSymbol::And, &[i1, i2]);
        let b = net.add_gate(GateSymbol::And, &[a, i1]);
        net.add_out(b);

        let mut collector = NpnCollector::new(
            &net,
            NpnOptions {
                cut_size: 2,
                ..NpnOptions::default()
            },
        );
        collector.process().unwrap();

        let b_stats = &collector.gate_stats()[&b];
        assert!(b_stats
            .npn_class_info
            .iter()
            .all(|s| s.cut != Cut::from([a, i1])));
        assert!(b_stats
            .npn_class_info
            .iter()
            .any(|s| s.cut == Cut::from([i1, i2])));
    }

    #[test]
    fn test_essential_cones() {
        let t = testcases::and_tree();
        let mut collector = NpnCollector::new(
            &t.net,
            NpnOptions {
                cut_size: 2,
                ..NpnOptions::default()
            },
        );
        collector.process().unwrap();

        let cones = collector.essential_cones(10, 10);
        assert_eq!(cones.len(), 1);
        let members = cones.values().next().unwrap();
        assert_eq!(members.len(), 4);
        for cone in members {
            assert_eq!(cone.n_gates(), 4);
            assert_eq!(cone.n_target_links(), 1);
        }

        let capped = collector.essential_cones(10, 1);
        assert_eq!(capped.values().next().unwrap().len(), 1);
    }

    #[test]
    fn test_npn_grouping_collapses_input_negations() {
        // AND(i1, i2) and AND(NOT(i3), NOT(i4)) fall into the same class
        let mut net = crate::network::GNet::new();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let i3 = net.add_input();
        let i4 = net.add_input();
        let plain = net.add_gate(GateSymbol::And, &[i1, i2]);
        let n3 = net.add_gate(GateSymbol::Not, &[i3]);
        let n4 = net.add_gate(GateSymbol::Not, &[i4]);
        let negated = net.add_gate(GateSymbol::And, &[n3, n4]);
        net.add_out(plain);
        net.add_out(negated);

        let mut collector = NpnCollector::new(
            &net,
            NpnOptions {
                cut_size: 2,
                ..NpnOptions::default()
            },
        );
        collector.process().unwrap();

        let class_of = |gate: GateId| {
            collector.gate_stats()[&gate]
                .npn_class_info
                .first()
                .unwrap()
                .npn_class
        };
        assert_eq!(class_of(plain), class_of(negated));

        let mut xor_net = crate::network::GNet::new();
        let a = xor_net.add_input();
        let b = xor_net.add_input();
        let x = xor_net.add_gate(GateSymbol::Xor, &[a, b]);
        xor_net.add_out(x);
        let mut xor_collector = NpnCollector::new(
            &xor_net,
            NpnOptions {
                cut_size: 2,
                ..NpnOptions::default()
            },
        );
        xor_collector.process().unwrap();
        assert_ne!(class_of(plain), xor_collector.gate_stats()[&x].npn_class_info[0].npn_class);
    }

    #[test]
    fn test_histogram_format() {
        let t = testcases::and_tree();
        let mut collector = NpnCollector::new(
            &t.net,
            NpnOptions {
                cut_size: 2,
                collect_height: true,
                ..NpnOptions::default()
            },
        );
        collector.process().unwrap();

        let mut buffer = Vec::new();
        collector.print_histogram_data(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("NPN Class;Count;MaxHeightA;MaxHeightD;MinHeightA;MinHeightD")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1;4;1.25;"), "unexpected row {row}");
        assert_eq!(lines.next(), None);

        let mut report = Vec::new();
        collector.print_gate_statistics(&mut report).unwrap();
        let report = String::from_utf8(report).unwrap();
        assert!(report.contains("Gate : AND"));
        assert!(report.contains("Number of Cuts: 1"));
    }
}
