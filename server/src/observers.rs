//! Connected observers and their game subscriptions.
//!
//! An observer is any UDP peer that completed the connect handshake. It may
//! submit commands and subscribe to any number of games; every snapshot a game
//! publishes goes to that game's subscribers.

use log::info;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug)]
pub struct Observer {
    /// Assigned by the server, starting at 1
    pub id: u32,
    pub addr: SocketAddr,
    /// Last time any packet arrived from this observer
    pub last_seen: Instant,
    pub games: HashSet<Uuid>,
}

impl Observer {
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
            games: HashSet::new(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Registry of observers, keyed by id, plus the reverse topic index.
pub struct ObserverManager {
    observers: HashMap<u32, Observer>,
    topics: HashMap<Uuid, HashSet<u32>>,
    next_observer_id: u32,
    max_observers: usize,
    timeout: Duration,
}

impl ObserverManager {
    pub fn new(max_observers: usize, timeout: Duration) -> Self {
        Self {
            observers: HashMap::new(),
            topics: HashMap::new(),
            next_observer_id: 1,
            max_observers,
            timeout,
        }
    }

    /// Returns `None` when the server is full.
    pub fn add_observer(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.observers.len() >= self.max_observers {
            return None;
        }

        let observer_id = self.next_observer_id;
        self.next_observer_id += 1;

        info!("Observer {} connected from {}", observer_id, addr);
        self.observers
            .insert(observer_id, Observer::new(observer_id, addr));

        Some(observer_id)
    }

    /// Drops the observer and all of its subscriptions.
    pub fn remove_observer(&mut self, observer_id: &u32) -> bool {
        let Some(observer) = self.observers.remove(observer_id) else {
            return false;
        };

        for game_id in &observer.games {
            if let Some(subscribers) = self.topics.get_mut(game_id) {
                subscribers.remove(observer_id);
                if subscribers.is_empty() {
                    self.topics.remove(game_id);
                }
            }
        }
        info!("Observer {} disconnected", observer.id);
        true
    }

    pub fn find_observer_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.observers
            .iter()
            .find(|(_, observer)| observer.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Records activity and returns false for unknown observers.
    pub fn touch(&mut self, observer_id: u32) -> bool {
        match self.observers.get_mut(&observer_id) {
            Some(observer) => {
                observer.touch();
                true
            }
            None => false,
        }
    }

    pub fn subscribe(&mut self, observer_id: u32, game_id: Uuid) -> bool {
        let Some(observer) = self.observers.get_mut(&observer_id) else {
            return false;
        };
        observer.games.insert(game_id);
        self.topics.entry(game_id).or_default().insert(observer_id);
        true
    }

    /// Returns false when the observer was not subscribed.
    pub fn unsubscribe(&mut self, observer_id: u32, game_id: &Uuid) -> bool {
        let removed = self
            .observers
            .get_mut(&observer_id)
            .is_some_and(|observer| observer.games.remove(game_id));

        if let Some(subscribers) = self.topics.get_mut(game_id) {
            subscribers.remove(&observer_id);
            if subscribers.is_empty() {
                self.topics.remove(game_id);
            }
        }
        removed
    }

    /// Addresses of everyone subscribed to `game_id`.
    pub fn subscribers(&self, game_id: &Uuid) -> Vec<(u32, SocketAddr)> {
        self.topics
            .get(game_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.observers.get(id).map(|o| (*id, o.addr)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes and returns every observer that has gone quiet.
    pub fn check_timeouts(&mut self) -> Vec<u32> {
        let timed_out: Vec<u32> = self
            .observers
            .iter()
            .filter(|(_, observer)| observer.is_timed_out(self.timeout))
            .map(|(id, _)| *id)
            .collect();

        for observer_id in &timed_out {
            self.remove_observer(observer_id);
        }

        timed_out
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    fn manager(max: usize) -> ObserverManager {
        ObserverManager::new(max, Duration::from_secs(5))
    }

    #[test]
    fn test_observer_timeout() {
        let mut observer = Observer::new(1, test_addr());
        assert!(!observer.is_timed_out(Duration::from_secs(1)));

        observer.last_seen = Instant::now() - Duration::from_secs(2);
        assert!(observer.is_timed_out(Duration::from_secs(1)));

        observer.touch();
        assert!(!observer.is_timed_out(Duration::from_secs(1)));
    }

    #[test]
    fn test_add_multiple_observers() {
        let mut manager = manager(3);

        assert_eq!(manager.add_observer(test_addr()), Some(1));
        assert_eq!(manager.add_observer(test_addr2()), Some(2));
        assert_eq!(manager.len(), 2);
        assert!(!manager.is_empty());
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut manager = manager(1);

        assert!(manager.add_observer(test_addr()).is_some());
        assert!(manager.add_observer(test_addr2()).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_find_observer_by_addr() {
        let mut manager = manager(2);
        let first = manager.add_observer(test_addr()).unwrap();
        manager.add_observer(test_addr2()).unwrap();

        assert_eq!(manager.find_observer_by_addr(test_addr()), Some(first));
        let unknown: SocketAddr = "192.168.1.1:9999".parse().unwrap();
        assert_eq!(manager.find_observer_by_addr(unknown), None);
    }

    #[test]
    fn test_subscriptions_route_to_subscribers_only() {
        let mut manager = manager(4);
        let first = manager.add_observer(test_addr()).unwrap();
        let second = manager.add_observer(test_addr2()).unwrap();
        let game_a = Uuid::new_v4();
        let game_b = Uuid::new_v4();

        assert!(manager.subscribe(first, game_a));
        assert!(manager.subscribe(second, game_a));
        assert!(manager.subscribe(second, game_b));
        assert!(!manager.subscribe(99, game_a));

        let mut a = manager.subscribers(&game_a);
        a.sort();
        assert_eq!(a, vec![(first, test_addr()), (second, test_addr2())]);
        assert_eq!(manager.subscribers(&game_b), vec![(second, test_addr2())]);
        assert!(manager.subscribers(&Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut manager = manager(2);
        let observer = manager.add_observer(test_addr()).unwrap();
        let game = Uuid::new_v4();
        manager.subscribe(observer, game);

        assert!(manager.unsubscribe(observer, &game));
        assert!(!manager.unsubscribe(observer, &game));
        assert!(manager.subscribers(&game).is_empty());
        assert_eq!(manager.topic_count(), 0);
    }

    #[test]
    fn test_remove_observer_clears_topics() {
        let mut manager = manager(2);
        let observer = manager.add_observer(test_addr()).unwrap();
        let game = Uuid::new_v4();
        manager.subscribe(observer, game);

        assert!(manager.remove_observer(&observer));
        assert!(!manager.remove_observer(&observer));
        assert!(manager.subscribers(&game).is_empty());
        assert_eq!(manager.topic_count(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_check_timeouts() {
        let mut manager = manager(2);
        let stale = manager.add_observer(test_addr()).unwrap();
        let fresh = manager.add_observer(test_addr2()).unwrap();
        manager.subscribe(stale, Uuid::new_v4());
        manager.observers.get_mut(&stale).unwrap().last_seen =
            Instant::now() - Duration::from_secs(10);

        assert_eq!(manager.check_timeouts(), vec![stale]);
        assert_eq!(manager.len(), 1);
        assert!(manager.touch(fresh));
        assert!(!manager.touch(stale));
        assert_eq!(manager.topic_count(), 0);
    }
}
