use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// A labelled connection out of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub direction: String,
    pub room: String,
}

/// Read/write view of room topology the engine needs. Room descriptions,
/// keys and the rest of the world model stay with the host.
pub trait World {
    /// Exits leaving `room`, in a stable order.
    fn exits(&self, room: &str) -> Vec<Exit>;

    /// Whether the way from `from` to `to` is locked.
    fn is_locked(&self, from: &str, to: &str) -> bool;

    /// Drops items on the floor of `room`.
    fn add_item(&mut self, room: &str, item_id: &str, quantity: u32);
}

/// Rooms reachable from `room` through unlocked exits.
pub fn open_neighbors(world: &dyn World, room: &str) -> Vec<String> {
    world
        .exits(room)
        .into_iter()
        .filter(|exit| !world.is_locked(room, &exit.room))
        .map(|exit| exit.room)
        .collect()
}

/// First room on a shortest unlocked path from `from` to `to`.
pub fn next_step_toward(world: &dyn World, from: &str, to: &str) -> Option<String> {
    if from == to {
        return None;
    }
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, String)> = VecDeque::new();
    visited.insert(from.to_string());
    for neighbor in open_neighbors(world, from) {
        if visited.insert(neighbor.clone()) {
            queue.push_back((neighbor.clone(), neighbor));
        }
    }
    while let Some((room, first_step)) = queue.pop_front() {
        if room == to {
            return Some(first_step);
        }
        for neighbor in open_neighbors(world, &room) {
            if visited.insert(neighbor.clone()) {
                queue.push_back((neighbor, first_step.clone()));
            }
        }
    }
    None
}

#[derive(Debug, Clone, Default)]
struct RoomNode {
    exits: BTreeMap<String, String>,
    locked: BTreeSet<String>,
    items: BTreeMap<String, u32>,
}

/// In-memory [`World`] used by tests and small hosts.
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    rooms: BTreeMap<String, RoomNode>,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, room: &str) {
        self.rooms.entry(room.to_string()).or_default();
    }

    /// Two-way connection.
    pub fn connect(&mut self, a: &str, direction: &str, b: &str, back: &str) {
        self.add_room(a);
        self.add_room(b);
        if let Some(node) = self.rooms.get_mut(a) {
            node.exits.insert(direction.to_string(), b.to_string());
        }
        if let Some(node) = self.rooms.get_mut(b) {
            node.exits.insert(back.to_string(), a.to_string());
        }
    }

    /// Locks the way from `from` into `to` (one direction).
    pub fn lock(&mut self, from: &str, to: &str) {
        if let Some(node) = self.rooms.get_mut(from) {
            node.locked.insert(to.to_string());
        }
    }

    pub fn unlock(&mut self, from: &str, to: &str) {
        if let Some(node) = self.rooms.get_mut(from) {
            node.locked.remove(to);
        }
    }

    pub fn items_in(&self, room: &str) -> Vec<(String, u32)> {
        self.rooms
            .get(room)
            .map(|node| {
                node.items
                    .iter()
                    .map(|(id, qty)| (id.clone(), *qty))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }
}

impl World for RoomGraph {
    fn exits(&self, room: &str) -> Vec<Exit> {
        self.rooms
            .get(room)
            .map(|node| {
                node.exits
                    .iter()
                    .map(|(direction, to)| Exit {
                        direction: direction.clone(),
                        room: to.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_locked(&self, from: &str, to: &str) -> bool {
        self.rooms
            .get(from)
            .is_some_and(|node| node.locked.contains(to))
    }

    fn add_item(&mut self, room: &str, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let node = self.rooms.entry(room.to_string()).or_default();
        *node.items.entry(item_id.to_string()).or_insert(0) += quantity;
    }
}
