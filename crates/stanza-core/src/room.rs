//! The fixed room catalog.
//!
//! Ten rooms with pre-assigned ids (1..=10) are the referential anchor for
//! all booking history. They are seeded once at bootstrap and never mutated
//! afterwards; capacity in particular is immutable once persisted.

use serde::{Deserialize, Serialize};

/// A bookable room from the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
  pub id:        i64,
  pub name:      String,
  pub capacity:  i64,
  pub room_type: String,
  pub location:  Option<String>,
}

/// Room id paired with capacity — the allocation optimizer's candidate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCapacity {
  pub id:       i64,
  pub capacity: i64,
}

/// The fixed catalog, in id order. Ids are pre-assigned and stable.
pub fn catalog() -> Vec<Room> {
  const ROOMS: [(i64, &str, i64, &str, &str); 10] = [
    (1, "Room A", 30, "Classroom", "Block 1"),
    (2, "Room B", 50, "Auditorium", "Block 1"),
    (3, "Room C", 20, "Lab", "Block 2"),
    (4, "Room D", 40, "Classroom", "Block 2"),
    (5, "Room E", 25, "Seminar", "Block 3"),
    (6, "Room F", 60, "Auditorium", "Block 3"),
    (7, "Room G", 35, "Classroom", "Block 4"),
    (8, "Room H", 45, "Lab", "Block 4"),
    (9, "Room I", 30, "Seminar", "Block 5"),
    (10, "Room J", 55, "Auditorium", "Block 5"),
  ];

  ROOMS
    .iter()
    .map(|&(id, name, capacity, room_type, location)| Room {
      id,
      name: name.to_owned(),
      capacity,
      room_type: room_type.to_owned(),
      location: Some(location.to_owned()),
    })
    .collect()
}

/// Ids of every catalog room, ascending.
pub fn catalog_ids() -> Vec<i64> { catalog().iter().map(|r| r.id).collect() }
