//! Cosmetic multiplayer presence
//!
//! Each client publishes where it is once per frame and reads everyone
//! else's position back. Nothing here affects the simulation, and transport
//! errors are logged at debug level and dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, ModeKind};

/// What one client publishes about itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerPresence {
    pub x: f32,
    pub y: f32,
    pub mode: ModeKind,
    pub score: f32,
}

impl PeerPresence {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            x: state.player.pos.x,
            y: state.player.pos.y,
            mode: state.player.mode.kind(),
            score: state.score,
        }
    }
}

/// Profile details a room reports for each client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Client id -> latest presence
pub type PresenceSnapshot = BTreeMap<String, PeerPresence>;

/// A multiplayer room
pub trait PresenceTransport {
    /// Our own id in the room
    fn client_id(&self) -> &str;
    fn publish(&mut self, me: &PeerPresence) -> anyhow::Result<()>;
    /// Latest snapshot and roster, or `None` if nothing changed
    fn poll(&mut self) -> anyhow::Result<Option<(PresenceSnapshot, BTreeMap<String, PeerInfo>)>>;
}

/// One line of the multiplayer panel
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub score: u32,
    pub avatar_url: Option<String>,
}

/// A remote player to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePeer {
    pub y: f32,
    pub initial: char,
}

/// Presence cache, connected or not
#[derive(Default)]
pub struct Presence {
    transport: Option<Box<dyn PresenceTransport>>,
    peers: PresenceSnapshot,
    info: BTreeMap<String, PeerInfo>,
}

impl Presence {
    /// No room; every call is a no-op
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn connect(mut transport: Box<dyn PresenceTransport>) -> Self {
        let mut presence = Self::default();
        match transport.poll() {
            Ok(Some((peers, info))) => {
                presence.peers = peers;
                presence.info = info;
            }
            Ok(None) => {}
            Err(err) => log::debug!("initial presence poll failed: {err:#}"),
        }
        log::info!("Multiplayer connected as {}", transport.client_id());
        presence.transport = Some(transport);
        presence
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Publish our state and pick up the latest snapshot
    pub fn sync(&mut self, me: &PeerPresence) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        if let Err(err) = transport.publish(me) {
            log::debug!("presence publish failed: {err:#}");
        }
        match transport.poll() {
            Ok(Some((peers, info))) => {
                self.peers = peers;
                self.info = info;
            }
            Ok(None) => {}
            Err(err) => log::debug!("presence poll failed: {err:#}"),
        }
    }

    fn own_id(&self) -> Option<&str> {
        self.transport.as_ref().map(|t| t.client_id())
    }

    /// Everyone but us, in id order
    pub fn remote_peers(&self) -> Vec<RemotePeer> {
        let me = self.own_id();
        self.peers
            .iter()
            .filter(|(id, _)| Some(id.as_str()) != me)
            .map(|(id, p)| RemotePeer {
                y: p.y,
                initial: self
                    .info
                    .get(id)
                    .and_then(|i| i.username.as_deref())
                    .and_then(|name| name.chars().next())
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or('?'),
            })
            .collect()
    }

    /// Panel entries for everyone in the room, us included
    pub fn roster(&self) -> Vec<RosterEntry> {
        let me = self.own_id();
        self.peers
            .iter()
            .map(|(id, p)| {
                let info = self.info.get(id);
                let name = match info.and_then(|i| i.username.clone()) {
                    Some(name) => name,
                    None if Some(id.as_str()) == me => "You".to_string(),
                    None => format!("Player {}", id.chars().take(4).collect::<String>()),
                };
                RosterEntry {
                    name,
                    score: p.score.max(0.0).floor() as u32,
                    avatar_url: info.and_then(|i| i.avatar_url.clone()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FakeRoom {
        id: String,
        fail: bool,
        published: Vec<PeerPresence>,
        snapshot: PresenceSnapshot,
        info: BTreeMap<String, PeerInfo>,
    }

    impl FakeRoom {
        fn new(fail: bool) -> Self {
            let mut snapshot = PresenceSnapshot::new();
            snapshot.insert(
                "me".into(),
                PeerPresence { x: 60.0, y: 100.0, mode: ModeKind::Normal, score: 3.0 },
            );
            snapshot.insert(
                "abcdef".into(),
                PeerPresence { x: 60.0, y: 300.0, mode: ModeKind::Ship, score: 12.7 },
            );
            snapshot.insert(
                "zed".into(),
                PeerPresence { x: 60.0, y: 50.0, mode: ModeKind::Normal, score: 0.0 },
            );
            let mut info = BTreeMap::new();
            info.insert(
                "zed".into(),
                PeerInfo { username: Some("zoe".into()), avatar_url: None },
            );
            Self { id: "me".into(), fail, published: Vec::new(), snapshot, info }
        }
    }

    impl PresenceTransport for FakeRoom {
        fn client_id(&self) -> &str {
            &self.id
        }

        fn publish(&mut self, me: &PeerPresence) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("socket closed"));
            }
            self.published.push(me.clone());
            Ok(())
        }

        fn poll(&mut self) -> anyhow::Result<Option<(PresenceSnapshot, BTreeMap<String, PeerInfo>)>> {
            if self.fail {
                return Err(anyhow!("socket closed"));
            }
            Ok(Some((self.snapshot.clone(), self.info.clone())))
        }
    }

    fn me() -> PeerPresence {
        PeerPresence { x: 60.0, y: 200.0, mode: ModeKind::Normal, score: 5.0 }
    }

    #[test]
    fn test_offline_is_noop() {
        let mut p = Presence::offline();
        p.sync(&me());
        assert!(!p.is_connected());
        assert!(p.remote_peers().is_empty());
        assert!(p.roster().is_empty());
    }

    #[test]
    fn test_remote_peers_exclude_self() {
        let p = Presence::connect(Box::new(FakeRoom::new(false)));
        let peers = p.remote_peers();
        assert_eq!(
            peers,
            vec![
                RemotePeer { y: 300.0, initial: '?' },
                RemotePeer { y: 50.0, initial: 'Z' },
            ]
        );
    }

    #[test]
    fn test_roster_names() {
        let p = Presence::connect(Box::new(FakeRoom::new(false)));
        let names: Vec<_> = p.roster().into_iter().map(|e| (e.name, e.score)).collect();
        assert_eq!(
            names,
            vec![
                ("Player abcd".to_string(), 12),
                ("You".to_string(), 3),
                ("zoe".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_errors_are_swallowed() {
        let mut p = Presence::connect(Box::new(FakeRoom::new(true)));
        p.sync(&me());
        assert!(p.is_connected());
        assert!(p.remote_peers().is_empty());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&PeerPresence {
            x: 1.0,
            y: 2.0,
            mode: ModeKind::Ship,
            score: 3.5,
        })
        .unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"mode":"ship","score":3.5}"#);
        let info: PeerInfo =
            serde_json::from_str(r#"{"username":"al","avatarUrl":"a.png"}"#).unwrap();
        assert_eq!(info.avatar_url.as_deref(), Some("a.png"));
    }
}
