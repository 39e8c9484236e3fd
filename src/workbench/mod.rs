//! One instance of every container, driven by textual commands.
//!
//! The workbench is what a classroom front-end talks to: it parses a
//! [`Command`], routes it to the addressed container(s), advances all of
//! them on `tick` and hands out serializable snapshots. Presets rebuild every
//! container from a saved [`Options`] file.

mod command;

use std::path::Path;

pub use command::{Command, Op, Outcome, Target};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::containers::{
    ChainedMap, ChainedSet, Container, ContainerKind, ContainerSnapshot,
    DynamicArray, HashFlavor, LinkedChainedMap, LinkedChainedSet,
    LinkedSequence, OrderedMap, OrderedSet, PriorityHeap, RingDeque,
    StripedMap,
};
use crate::error::VizError;
use crate::options::Options;
use crate::value::Value;

/// Every simulated container, side by side.
#[derive(Debug)]
pub struct Workbench {
    options: Options,
    active_preset: Option<String>,
    rng: StdRng,
    array: DynamicArray,
    linked: LinkedSequence,
    deque: RingDeque,
    set: ChainedSet,
    linked_set: LinkedChainedSet,
    map: ChainedMap,
    linked_map: LinkedChainedMap,
    historic: ChainedMap,
    striped: StripedMap,
    tree_map: OrderedMap,
    tree_set: OrderedSet,
    heap: PriorityHeap,
}

impl Workbench {
    /// Fresh containers built from `options`, random values from OS entropy.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::build(options, StdRng::from_os_rng())
    }

    /// Like [`Workbench::new`] but with reproducible `random` commands.
    #[must_use]
    pub fn with_seed(options: Options, seed: u64) -> Self {
        Self::build(options, StdRng::seed_from_u64(seed))
    }

    fn build(options: Options, rng: StdRng) -> Self {
        Self {
            array: DynamicArray::from_options(&options),
            linked: LinkedSequence::from_options(&options),
            deque: RingDeque::from_options(&options),
            set: ChainedSet::from_options(&options, HashFlavor::Standard),
            linked_set: LinkedChainedSet::from_options(&options),
            map: ChainedMap::from_options(&options, HashFlavor::Standard),
            linked_map: LinkedChainedMap::from_options(&options),
            historic: ChainedMap::from_options(&options, HashFlavor::Historic),
            striped: StripedMap::from_options(&options),
            tree_map: OrderedMap::from_options(&options),
            tree_set: OrderedSet::from_options(&options),
            heap: PriorityHeap::from_options(&options),
            options,
            active_preset: None,
            rng,
        }
    }

    /// Options the containers were built from.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Name of the last preset loaded or saved.
    #[must_use]
    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Replace options and rebuild every container empty.
    pub fn set_options(&mut self, options: Options) {
        let rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
        let preset = self.active_preset.take();
        *self = Self::build(options, rng);
        self.active_preset = preset;
    }

    /// Load a named preset from `presets_dir`. Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = Options::preset_path(presets_dir, name);
        match Options::load(&path) {
            Ok(opts) => {
                log::info!("Loaded preset '{name}'");
                self.set_options(opts);
                self.active_preset = Some(name.to_owned());
                true
            }
            Err(e) => {
                log::error!("Failed to load preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named preset. Returns true on success.
    pub fn save_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = Options::preset_path(presets_dir, name);
        match self.options.save(&path) {
            Ok(()) => {
                log::info!("Saved preset '{name}'");
                self.active_preset = Some(name.to_owned());
                true
            }
            Err(e) => {
                log::error!("Failed to save preset '{name}': {e}");
                false
            }
        }
    }

    /// Shared view of one container.
    #[must_use]
    pub fn container(&self, kind: ContainerKind) -> &dyn Container {
        match kind {
            ContainerKind::DynamicArray => &self.array,
            ContainerKind::LinkedSequence => &self.linked,
            ContainerKind::RingDeque => &self.deque,
            ContainerKind::ChainedSet => &self.set,
            ContainerKind::LinkedChainedSet => &self.linked_set,
            ContainerKind::ChainedMap => &self.map,
            ContainerKind::LinkedChainedMap => &self.linked_map,
            ContainerKind::HistoricMap => &self.historic,
            ContainerKind::StripedMap => &self.striped,
            ContainerKind::OrderedMap => &self.tree_map,
            ContainerKind::OrderedSet => &self.tree_set,
            ContainerKind::PriorityHeap => &self.heap,
        }
    }

    fn container_mut(&mut self, kind: ContainerKind) -> &mut dyn Container {
        match kind {
            ContainerKind::DynamicArray => &mut self.array,
            ContainerKind::LinkedSequence => &mut self.linked,
            ContainerKind::RingDeque => &mut self.deque,
            ContainerKind::ChainedSet => &mut self.set,
            ContainerKind::LinkedChainedSet => &mut self.linked_set,
            ContainerKind::ChainedMap => &mut self.map,
            ContainerKind::LinkedChainedMap => &mut self.linked_map,
            ContainerKind::HistoricMap => &mut self.historic,
            ContainerKind::StripedMap => &mut self.striped,
            ContainerKind::OrderedMap => &mut self.tree_map,
            ContainerKind::OrderedSet => &mut self.tree_set,
            ContainerKind::PriorityHeap => &mut self.heap,
        }
    }

    /// Striped map, for segment-lock queries.
    #[must_use]
    pub fn striped(&self) -> &StripedMap {
        &self.striped
    }

    /// Parse and run one line.
    pub fn run_line(&mut self, line: &str) -> Result<Vec<(ContainerKind, Outcome)>, VizError> {
        let command: Command = line.parse()?;
        self.execute(&command)
    }

    /// Run `command` on its target(s). A single target that does not know
    /// the verb is an error; `*` silently skips such containers.
    pub fn execute(&mut self, command: &Command) -> Result<Vec<(ContainerKind, Outcome)>, VizError> {
        // drawn once per command so `*` spreads the same value everywhere
        let drawn = (command.op == Op::Random)
            .then(|| Value::from(self.rng.random_range(0..100_i64)));
        match command.target {
            Target::One(kind) => match self.apply(kind, &command.op, drawn.as_ref())? {
                Some(outcome) => Ok(vec![(kind, outcome)]),
                None => Err(VizError::Command(format!(
                    "{kind} does not support {:?}",
                    command.op
                ))),
            },
            Target::All => {
                let mut outcomes = Vec::new();
                for kind in ContainerKind::ALL {
                    if let Some(outcome) = self.apply(kind, &command.op, drawn.as_ref())? {
                        outcomes.push((kind, outcome));
                    }
                }
                if outcomes.is_empty() {
                    return Err(VizError::Command(format!(
                        "no container supports {:?}",
                        command.op
                    )));
                }
                Ok(outcomes)
            }
        }
    }

    /// Advance every container by `dt` seconds. Returns entities reclaimed.
    pub fn tick_all(&mut self, dt: f32) -> usize {
        ContainerKind::ALL
            .into_iter()
            .map(|kind| self.container_mut(kind).tick(dt))
            .sum()
    }

    /// Snapshot of every container, in workbench order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<ContainerSnapshot> {
        ContainerKind::ALL
            .into_iter()
            .map(|kind| self.container(kind).snapshot())
            .collect()
    }

    fn apply(
        &mut self,
        kind: ContainerKind,
        op: &Op,
        drawn: Option<&Value>,
    ) -> Result<Option<Outcome>, VizError> {
        if let (Op::Random, Some(drawn)) = (op, drawn) {
            let concrete = match kind {
                ContainerKind::ChainedMap
                | ContainerKind::LinkedChainedMap
                | ContainerKind::HistoricMap
                | ContainerKind::StripedMap
                | ContainerKind::OrderedMap => Op::Put {
                    key: drawn.clone(),
                    value: drawn.clone(),
                },
                _ => Op::Add(drawn.clone()),
            };
            return self.apply(kind, &concrete, None);
        }
        match kind {
            ContainerKind::DynamicArray => apply_array(&mut self.array, op),
            ContainerKind::LinkedSequence => Ok(apply_linked(&mut self.linked, op)),
            ContainerKind::RingDeque => Ok(apply_deque(&mut self.deque, op)),
            ContainerKind::ChainedSet => Ok(apply_set(&mut self.set, op)),
            ContainerKind::LinkedChainedSet => Ok(apply_linked_set(&mut self.linked_set, op)),
            ContainerKind::ChainedMap => Ok(apply_map(&mut self.map, op)),
            ContainerKind::HistoricMap => Ok(apply_map(&mut self.historic, op)),
            ContainerKind::LinkedChainedMap => Ok(apply_linked_map(&mut self.linked_map, op)),
            ContainerKind::StripedMap => Ok(apply_striped(&mut self.striped, op)),
            ContainerKind::OrderedMap => apply_tree_map(&mut self.tree_map, op),
            ContainerKind::OrderedSet => apply_tree_set(&mut self.tree_set, op),
            ContainerKind::PriorityHeap => apply_heap(&mut self.heap, op),
        }
    }
}

fn array_index(value: &Value) -> Result<usize, VizError> {
    match value {
        Value::Int(i) if *i >= 0 => Ok(*i as usize),
        other => Err(VizError::Command(format!("array get needs an index, got {other}"))),
    }
}

fn apply_array(a: &mut DynamicArray, op: &Op) -> Result<Option<Outcome>, VizError> {
    let outcome = match op {
        Op::Add(v) | Op::AddLast(v) => Outcome::Flag(a.append(v.clone())),
        Op::AddFirst(v) => Outcome::Flag(a.insert_at(0, v.clone())),
        Op::Insert { index, value } => Outcome::Flag(a.insert_at(*index, value.clone())),
        Op::Set { index, value } => Outcome::Value(a.set(*index, value.clone())),
        Op::Get(i) => Outcome::Value(a.get(array_index(i)?).cloned()),
        Op::Remove(v) => Outcome::Flag(a.remove_value(v)),
        Op::RemoveAt(i) => Outcome::Value(a.remove_at(*i)),
        Op::RemoveFirst => Outcome::Value(a.remove_first()),
        Op::RemoveLast => Outcome::Value(a.remove_last()),
        Op::RemoveRange { from, to } => Outcome::Count(a.remove_range(*from, *to)),
        Op::Contains(v) => Outcome::Flag(a.contains(v)),
        Op::IndexOf(v) => Outcome::Index(a.index_of(v)),
        Op::LastIndexOf(v) => Outcome::Index(a.last_index_of(v)),
        Op::Trim => {
            a.trim_to_size();
            Outcome::Done
        }
        Op::Ensure(min) => {
            a.ensure_capacity(*min);
            Outcome::Done
        }
        Op::Clear => {
            a.clear();
            Outcome::Done
        }
        _ => return Ok(None),
    };
    Ok(Some(outcome))
}

fn apply_linked(l: &mut LinkedSequence, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Add(v) | Op::AddLast(v) => {
            l.add_last(v.clone());
            Outcome::Done
        }
        Op::AddFirst(v) => {
            l.add_first(v.clone());
            Outcome::Done
        }
        Op::RemoveFirst => Outcome::Value(l.remove_first()),
        Op::RemoveLast => Outcome::Value(l.remove_last()),
        Op::PeekFirst => Outcome::Value(l.peek_first().cloned()),
        Op::PeekLast => Outcome::Value(l.peek_last().cloned()),
        Op::Clear => {
            l.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_deque(d: &mut RingDeque, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Add(v) | Op::AddLast(v) => Outcome::Flag(d.add_last(v.clone())),
        Op::AddFirst(v) => Outcome::Flag(d.add_first(v.clone())),
        Op::RemoveFirst => Outcome::Value(d.remove_first()),
        Op::RemoveLast => Outcome::Value(d.remove_last()),
        Op::PeekFirst => Outcome::Value(d.peek_first().cloned()),
        Op::PeekLast => Outcome::Value(d.peek_last().cloned()),
        Op::Contains(v) => Outcome::Flag(d.contains(v)),
        Op::Clear => {
            d.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_set(s: &mut ChainedSet, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Add(v) => Outcome::Flag(s.add(v.clone())),
        Op::Remove(v) => Outcome::Flag(s.remove(v)),
        Op::Contains(v) => Outcome::Flag(s.contains(v)),
        Op::Clear => {
            s.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_linked_set(s: &mut LinkedChainedSet, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Add(v) => Outcome::Flag(s.add(v.clone())),
        Op::Remove(v) => Outcome::Flag(s.remove(v)),
        Op::Contains(v) => Outcome::Flag(s.contains(v)),
        Op::Clear => {
            s.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_map(m: &mut ChainedMap, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Put { key, value } => Outcome::Put(m.put(key.clone(), value.clone())),
        Op::Get(k) => Outcome::Value(m.get(k).cloned()),
        Op::Remove(k) => Outcome::Value(m.remove(k)),
        Op::Contains(k) => Outcome::Flag(m.contains_key(k)),
        Op::Clear => {
            m.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_linked_map(m: &mut LinkedChainedMap, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Put { key, value } => Outcome::Put(m.put(key.clone(), value.clone())),
        Op::Get(k) => Outcome::Value(m.get(k).cloned()),
        Op::Remove(k) => Outcome::Value(m.remove(k)),
        Op::Contains(k) => Outcome::Flag(m.contains_key(k)),
        Op::Clear => {
            m.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_striped(m: &mut StripedMap, op: &Op) -> Option<Outcome> {
    let outcome = match op {
        Op::Put { key, value } => Outcome::Put(m.put(key.clone(), value.clone())),
        Op::Get(k) => Outcome::Value(m.get(k).cloned()),
        Op::Remove(k) => Outcome::Value(m.remove(k)),
        Op::Contains(k) => Outcome::Flag(m.contains_key(k)),
        Op::Clear => {
            m.clear();
            Outcome::Done
        }
        _ => return None,
    };
    Some(outcome)
}

fn apply_tree_map(m: &mut OrderedMap, op: &Op) -> Result<Option<Outcome>, VizError> {
    let outcome = match op {
        Op::Put { key, value } => Outcome::Put(m.put(key.clone(), value.clone())?),
        Op::Get(k) => Outcome::Value(m.get(k)?.cloned()),
        Op::Contains(k) => Outcome::Flag(m.contains_key(k)?),
        Op::First => Outcome::Value(m.first_key().cloned()),
        Op::Last => Outcome::Value(m.last_key().cloned()),
        Op::Clear => {
            m.clear();
            Outcome::Done
        }
        _ => return Ok(None),
    };
    Ok(Some(outcome))
}

fn apply_tree_set(s: &mut OrderedSet, op: &Op) -> Result<Option<Outcome>, VizError> {
    let outcome = match op {
        Op::Add(v) => Outcome::Flag(s.add(v.clone())?),
        Op::Contains(v) => Outcome::Flag(s.contains(v)?),
        Op::First => Outcome::Value(s.first().cloned()),
        Op::Last => Outcome::Value(s.last().cloned()),
        Op::Clear => {
            s.clear();
            Outcome::Done
        }
        _ => return Ok(None),
    };
    Ok(Some(outcome))
}

fn apply_heap(h: &mut PriorityHeap, op: &Op) -> Result<Option<Outcome>, VizError> {
    let outcome = match op {
        Op::Add(v) => Outcome::Flag(h.offer(v.clone())?),
        Op::Poll => Outcome::Value(h.poll()?),
        Op::Peek => Outcome::Value(h.peek().cloned()),
        Op::Remove(v) => Outcome::Flag(h.remove(v)?),
        Op::Contains(v) => Outcome::Flag(h.contains(v)),
        Op::Clear => {
            h.clear();
            Outcome::Done
        }
        _ => return Ok(None),
    };
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::PutResult;

    fn bench() -> Workbench {
        Workbench::with_seed(Options::default(), 1)
    }

    #[test]
    fn single_target_commands_route() {
        let mut wb = bench();
        let out = wb.run_line("array add 5").unwrap();
        assert_eq!(out, vec![(ContainerKind::DynamicArray, Outcome::Flag(true))]);
        let out = wb.run_line("array insert 0 4").unwrap();
        assert_eq!(out[0].1, Outcome::Flag(true));
        let out = wb.run_line("array get 0").unwrap();
        assert_eq!(out[0].1, Outcome::Value(Some(Value::from(4))));
        assert_eq!(wb.container(ContainerKind::DynamicArray).len(), 2);
    }

    #[test]
    fn map_put_reports_replacement() {
        let mut wb = bench();
        let _ = wb.run_line("map put 3 'x'").unwrap();
        let out = wb.run_line("map put 3 'y'").unwrap();
        assert_eq!(out[0].1, Outcome::Put(PutResult::Replaced(Value::from('x'))));
    }

    #[test]
    fn unsupported_verb_on_one_container_is_an_error() {
        let mut wb = bench();
        assert!(matches!(wb.run_line("heap insert 0 1"), Err(VizError::Command(_))));
        assert!(matches!(wb.run_line("array get x"), Err(VizError::Command(_))));
    }

    #[test]
    fn star_applies_to_every_supporting_container() {
        let mut wb = bench();
        let out = wb.run_line("* add 7").unwrap();
        let kinds: Vec<ContainerKind> = out.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                ContainerKind::DynamicArray,
                ContainerKind::LinkedSequence,
                ContainerKind::RingDeque,
                ContainerKind::ChainedSet,
                ContainerKind::LinkedChainedSet,
                ContainerKind::OrderedSet,
                ContainerKind::PriorityHeap,
            ]
        );
    }

    #[test]
    fn random_fills_every_container() {
        let mut wb = bench();
        let out = wb.run_line("* random").unwrap();
        assert_eq!(out.len(), ContainerKind::ALL.len());
        for kind in ContainerKind::ALL {
            assert_eq!(wb.container(kind).len(), 1, "{kind}");
        }
    }

    #[test]
    fn random_values_ignore_earlier_commands() {
        let mut quiet = bench();
        let _ = quiet.run_line("heap random").unwrap();

        let mut busy = bench();
        for line in ["array add 1", "map put 2 2", "deque peekfirst", "treeset add 3"] {
            let _ = busy.run_line(line).unwrap();
        }
        let _ = busy.run_line("heap random").unwrap();

        let drawn = |wb: &Workbench| wb.heap.values().next().cloned();
        assert!(drawn(&quiet).is_some());
        assert_eq!(drawn(&quiet), drawn(&busy));
    }

    #[test]
    fn incomparable_tree_key_surfaces() {
        let mut wb = bench();
        let _ = wb.run_line("treemap put 1 1").unwrap();
        assert!(matches!(
            wb.run_line("treemap put \"one\" 1"),
            Err(VizError::Incomparable { .. })
        ));
    }

    #[test]
    fn striped_put_locks_a_segment() {
        let mut options = Options::default();
        options.containers.concurrency_level = 4;
        let mut wb = Workbench::with_seed(options, 3);
        let _ = wb.run_line("striped put 10 1").unwrap();
        assert_eq!(wb.striped().last_lock().map(|l| l.segment), Some(2));
    }

    #[test]
    fn ticks_reclaim_removed_entities() {
        let mut wb = bench();
        let _ = wb.run_line("heap add 1").unwrap();
        let _ = wb.run_line("heap poll").unwrap();
        assert_eq!(wb.container(ContainerKind::PriorityHeap).entities().len(), 1);
        let mut reclaimed = 0;
        for _ in 0..20 {
            reclaimed += wb.tick_all(0.1);
        }
        assert_eq!(reclaimed, 1);
        assert!(wb.container(ContainerKind::PriorityHeap).entities().is_empty());
    }

    #[test]
    fn snapshots_cover_every_container() {
        let mut wb = bench();
        let _ = wb.run_line("deque addfirst 'z'").unwrap();
        let snaps = wb.snapshots();
        assert_eq!(snaps.len(), 12);
        assert_eq!(snaps[2].kind, ContainerKind::RingDeque);
        assert_eq!(snaps[2].len, 1);
        assert_eq!(snaps[2].operations, 1);
        let json = serde_json::to_string(&snaps[2]).unwrap();
        assert!(json.contains("\"ring_deque\""));
    }

    #[test]
    fn presets_round_trip_and_rebuild() {
        let dir = std::env::temp_dir().join(format!("collectviz_wb_{}", std::process::id()));
        let mut wb = bench();
        let _ = wb.run_line("array add 1").unwrap();
        assert!(wb.save_preset("classroom", &dir));
        assert_eq!(wb.active_preset(), Some("classroom"));
        assert!(wb.load_preset("classroom", &dir));
        assert!(wb.container(ContainerKind::DynamicArray).is_empty());
        assert!(!wb.load_preset("missing", &dir));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
