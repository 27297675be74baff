//! In-memory mirror of the server's trip graph.
//!
//! Trips, events and media are kept in flat maps keyed by id. Events point
//! back at their trip and media at their event, while parents keep the
//! ordered list of their children's ids. Lookups by inner id are therefore
//! constant time, and [`LocalMirror::trips`] reassembles the nested shape the
//! API returns.

use std::collections::HashMap;

use crate::{
    error::{EntityKind, JournalError},
    models::{Event, Media, Trip},
};

#[derive(Debug, Clone)]
struct TripEntry {
    trip: Trip,
    event_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
struct EventEntry {
    trip_id: i64,
    event: Event,
    media_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
struct MediaEntry {
    event_id: i64,
    media: Media,
}

/// Trip list ordered by `start_date`, with nested events and media.
#[derive(Debug, Clone, Default)]
pub struct LocalMirror {
    order: Vec<i64>,
    trips: HashMap<i64, TripEntry>,
    events: HashMap<i64, EventEntry>,
    media: HashMap<i64, MediaEntry>,
}

impl LocalMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nested snapshot in `start_date` order.
    pub fn trips(&self) -> Vec<Trip> {
        self.order
            .iter()
            .filter_map(|id| self.assemble_trip(*id))
            .collect()
    }

    pub fn trip(&self, id: i64) -> Option<Trip> {
        self.assemble_trip(id)
    }

    pub fn event(&self, id: i64) -> Option<Event> {
        self.assemble_event(id)
    }

    pub fn media(&self, id: i64) -> Option<Media> {
        self.media.get(&id).map(|entry| entry.media.clone())
    }

    pub fn trip_of_event(&self, event_id: i64) -> Option<i64> {
        self.events.get(&event_id).map(|entry| entry.trip_id)
    }

    pub fn event_of_media(&self, media_id: i64) -> Option<i64> {
        self.media.get(&media_id).map(|entry| entry.event_id)
    }

    pub fn replace_all(&mut self, trips: Vec<Trip>) {
        self.order.clear();
        self.trips.clear();
        self.events.clear();
        self.media.clear();
        for trip in trips {
            self.ingest_trip(trip);
        }
        self.sort();
    }

    /// Adds a trip, or overwrites the one with the same id.
    pub fn insert_trip(&mut self, trip: Trip) {
        self.ingest_trip(trip);
        self.sort();
    }

    pub fn replace_trip(&mut self, trip: Trip) -> Result<(), JournalError> {
        if !self.trips.contains_key(&trip.id) {
            return Err(JournalError::not_found(EntityKind::Trip, trip.id));
        }
        self.insert_trip(trip);
        Ok(())
    }

    /// Removes a trip and everything below it. Absent ids are ignored.
    pub fn remove_trip(&mut self, id: i64) -> Option<Trip> {
        let trip = self.assemble_trip(id)?;
        self.drop_trip_children(id);
        self.trips.remove(&id);
        self.order.retain(|existing| *existing != id);
        Some(trip)
    }

    pub fn append_event(&mut self, trip_id: i64, event: Event) -> Result<(), JournalError> {
        if !self.trips.contains_key(&trip_id) {
            return Err(JournalError::not_found(EntityKind::Trip, trip_id));
        }
        let event_id = self.ingest_event(trip_id, event);
        if let Some(trip) = self.trips.get_mut(&trip_id) {
            trip.event_ids.push(event_id);
        }
        Ok(())
    }

    /// Swaps an event's contents, keeping its trip and position.
    pub fn replace_event(&mut self, event: Event) -> Result<(), JournalError> {
        let Some(trip_id) = self.trip_of_event(event.id) else {
            return Err(JournalError::not_found(EntityKind::Event, event.id));
        };
        let position = self
            .trips
            .get(&trip_id)
            .and_then(|trip| trip.event_ids.iter().position(|id| *id == event.id));

        self.drop_event(event.id);
        let event_id = self.ingest_event(trip_id, event);
        if let Some(trip) = self.trips.get_mut(&trip_id) {
            let at = position.unwrap_or(trip.event_ids.len()).min(trip.event_ids.len());
            trip.event_ids.insert(at, event_id);
        }
        Ok(())
    }

    pub fn remove_event(&mut self, id: i64) -> Result<Event, JournalError> {
        let event = self
            .assemble_event(id)
            .ok_or_else(|| JournalError::not_found(EntityKind::Event, id))?;
        self.drop_event(id);
        Ok(event)
    }

    pub fn append_media(&mut self, event_id: i64, media: Media) -> Result<(), JournalError> {
        if !self.events.contains_key(&event_id) {
            return Err(JournalError::not_found(EntityKind::Event, event_id));
        }
        let media_id = self.ingest_media(event_id, media);
        if let Some(event) = self.events.get_mut(&event_id) {
            event.media_ids.push(media_id);
        }
        Ok(())
    }

    pub fn remove_media(&mut self, id: i64) -> Result<Media, JournalError> {
        self.drop_media(id)
            .map(|entry| entry.media)
            .ok_or_else(|| JournalError::not_found(EntityKind::Media, id))
    }

    fn sort(&mut self) {
        let trips = &self.trips;
        self.order
            .sort_by_key(|id| trips.get(id).map(|entry| entry.trip.start_date));
    }

    fn ingest_trip(&mut self, mut trip: Trip) {
        let id = trip.id;
        let events = std::mem::take(&mut trip.events);
        if self.trips.contains_key(&id) {
            self.drop_trip_children(id);
        } else {
            self.order.push(id);
        }
        self.trips.insert(
            id,
            TripEntry {
                trip,
                event_ids: Vec::with_capacity(events.len()),
            },
        );
        for event in events {
            let event_id = self.ingest_event(id, event);
            if let Some(entry) = self.trips.get_mut(&id) {
                entry.event_ids.push(event_id);
            }
        }
    }

    /// Stores an event and its media. The caller links it into the trip.
    fn ingest_event(&mut self, trip_id: i64, mut event: Event) -> i64 {
        let id = event.id;
        self.drop_event(id);
        let medias = std::mem::take(&mut event.medias);
        self.events.insert(
            id,
            EventEntry {
                trip_id,
                event,
                media_ids: Vec::with_capacity(medias.len()),
            },
        );
        for media in medias {
            let media_id = self.ingest_media(id, media);
            if let Some(entry) = self.events.get_mut(&id) {
                entry.media_ids.push(media_id);
            }
        }
        id
    }

    /// Stores a media item. The caller links it into the event.
    fn ingest_media(&mut self, event_id: i64, media: Media) -> i64 {
        let id = media.id;
        self.drop_media(id);
        self.media.insert(id, MediaEntry { event_id, media });
        id
    }

    fn drop_trip_children(&mut self, trip_id: i64) {
        let event_ids = self
            .trips
            .get_mut(&trip_id)
            .map(|entry| std::mem::take(&mut entry.event_ids))
            .unwrap_or_default();
        for event_id in event_ids {
            self.drop_event(event_id);
        }
    }

    fn drop_event(&mut self, id: i64) -> Option<EventEntry> {
        let entry = self.events.remove(&id)?;
        if let Some(trip) = self.trips.get_mut(&entry.trip_id) {
            trip.event_ids.retain(|existing| *existing != id);
        }
        for media_id in &entry.media_ids {
            self.media.remove(media_id);
        }
        Some(entry)
    }

    fn drop_media(&mut self, id: i64) -> Option<MediaEntry> {
        let entry = self.media.remove(&id)?;
        if let Some(event) = self.events.get_mut(&entry.event_id) {
            event.media_ids.retain(|existing| *existing != id);
        }
        Some(entry)
    }

    fn assemble_trip(&self, id: i64) -> Option<Trip> {
        let entry = self.trips.get(&id)?;
        let mut trip = entry.trip.clone();
        trip.events = entry
            .event_ids
            .iter()
            .filter_map(|event_id| self.assemble_event(*event_id))
            .collect();
        Some(trip)
    }

    fn assemble_event(&self, id: i64) -> Option<Event> {
        let entry = self.events.get(&id)?;
        let mut event = entry.event.clone();
        event.medias = entry
            .media_ids
            .iter()
            .filter_map(|media_id| self.media(*media_id))
            .collect();
        Some(event)
    }
}
