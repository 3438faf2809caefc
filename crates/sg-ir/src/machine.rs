//! The owning machine: parameter layout plus a pool of patterns.

use alloc::vec::Vec;
use arrayvec::ArrayString;
use slotmap::{new_key_type, SlotMap};

use crate::catalog::{Group, Parameter, ParameterCatalog};
use crate::error::PatternError;
use crate::pattern::{Pattern, MAX_TRACKS};

new_key_type! {
    /// Handle to a pattern in a machine's pool.
    pub struct PatternId;
}

/// Parameters every incoming connection carries.
fn connection_params() -> Vec<Parameter> {
    alloc::vec![
        Parameter::word("Amp", 0, 0x4000),
        Parameter::word("Pan", 0, 0x8000),
    ]
}

/// A machine whose parameters are sequenced by patterns.
///
/// Owns the authoritative layout (parameter lists, track count, incoming
/// connections) and keeps every pattern in its pool laid out to match.
#[derive(Clone, Debug)]
pub struct Machine {
    /// Display name
    pub name: ArrayString<32>,
    params: [Vec<Parameter>; 3],
    tracks: usize,
    connections: usize,
    patterns: SlotMap<PatternId, Pattern>,
}

impl Machine {
    /// Create a machine with one track and no incoming connections.
    pub fn new(name: &str, global_params: Vec<Parameter>, track_params: Vec<Parameter>) -> Self {
        let mut machine_name = ArrayString::new();
        let _ = machine_name.try_push_str(name);
        Self {
            name: machine_name,
            params: [connection_params(), global_params, track_params],
            tracks: 1,
            connections: 0,
            patterns: SlotMap::with_key(),
        }
    }

    // --- Pattern pool ---

    /// Create an empty pattern laid out for this machine and add it.
    pub fn create_pattern(&mut self, name: &str, rows: u16) -> Result<PatternId, PatternError> {
        let pattern = Pattern::new(name, rows, &*self)?;
        Ok(self.patterns.insert(pattern))
    }

    /// Add an existing pattern, re-laying it out to the current track counts.
    pub fn add_pattern(&mut self, mut pattern: Pattern) -> PatternId {
        pattern.sync_tracks(&*self);
        self.patterns.insert(pattern)
    }

    /// Remove a pattern from the pool.
    pub fn remove_pattern(&mut self, id: PatternId) -> Option<Pattern> {
        self.patterns.remove(id)
    }

    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    pub fn pattern_mut(&mut self, id: PatternId) -> Option<&mut Pattern> {
        self.patterns.get_mut(id)
    }

    /// Find a pattern by name.
    pub fn find_pattern(&self, name: &str) -> Option<PatternId> {
        self.patterns
            .iter()
            .find(|(_, p)| p.name.as_str() == name)
            .map(|(id, _)| id)
    }

    /// Iterate the pool.
    pub fn patterns(&self) -> impl Iterator<Item = (PatternId, &Pattern)> {
        self.patterns.iter()
    }

    // --- Layout changes ---

    /// Set the number of tracks in the Track group, capped at
    /// [`MAX_TRACKS`]. Returns the count applied.
    pub fn set_track_count(&mut self, tracks: usize) -> usize {
        self.tracks = tracks.min(MAX_TRACKS);
        self.sync_patterns();
        self.tracks
    }

    /// Add an incoming connection. Returns its track index in the Incoming
    /// group, or `None` when the group already has [`MAX_TRACKS`] tracks.
    pub fn add_connection(&mut self) -> Option<usize> {
        if self.connections >= MAX_TRACKS {
            return None;
        }
        self.connections += 1;
        self.sync_patterns();
        Some(self.connections - 1)
    }

    /// Remove the incoming connection at `index`.
    ///
    /// Returns false if there is no such connection.
    pub fn remove_connection(&mut self, index: usize) -> bool {
        if index >= self.connections {
            return false;
        }
        self.connections -= 1;
        for pattern in self.patterns.values_mut() {
            pattern.remove_track(Group::Incoming, index);
        }
        true
    }

    fn sync_patterns(&mut self) {
        let layout = Layout {
            params: &self.params,
            tracks: self.tracks,
            connections: self.connections,
        };
        for pattern in self.patterns.values_mut() {
            pattern.sync_tracks(&layout);
        }
    }
}

/// Borrowed view of a machine's layout, used while its pool is borrowed
/// mutably.
struct Layout<'a> {
    params: &'a [Vec<Parameter>; 3],
    tracks: usize,
    connections: usize,
}

fn track_count(group: Group, tracks: usize, connections: usize) -> usize {
    match group {
        Group::Incoming => connections,
        Group::Global => 1,
        Group::Track => tracks,
    }
}

impl ParameterCatalog for Layout<'_> {
    fn parameter_count(&self, group: Group) -> usize {
        self.params[group.index()].len()
    }

    fn track_count(&self, group: Group) -> usize {
        track_count(group, self.tracks, self.connections)
    }

    fn describe(&self, group: Group, index: usize) -> &Parameter {
        &self.params[group.index()][index]
    }
}

impl ParameterCatalog for Machine {
    fn parameter_count(&self, group: Group) -> usize {
        self.params[group.index()].len()
    }

    fn track_count(&self, group: Group) -> usize {
        track_count(group, self.tracks, self.connections)
    }

    fn describe(&self, group: Group, index: usize) -> &Parameter {
        &self.params[group.index()][index]
    }
}
