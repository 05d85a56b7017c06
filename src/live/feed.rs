//! Live snapshot feed
//!
//! A sans-IO state machine: the caller owns the socket, the HTTP client and
//! the clock, feeds events in with explicit `Instant`s, and executes the
//! `FeedCommand`s that come back. The push channel reconnects after a fixed
//! delay; the batch poll runs on a fixed interval. Both race into the same
//! snapshot with last-write merge.

use std::time::{Duration, Instant};

use super::protocol::{sanitize_entity_ids, BatchRequest, BatchResponse, ClientMessage, ServerMessage};
use super::snapshot::Snapshot;

/// Timing of the feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Wait after an unexpected close before reconnecting
    pub reconnect_delay: Duration,
    /// Interval between batch fetches
    pub poll_interval: Duration,
    /// Keep polling while the push channel is open
    pub poll_while_connected: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(3),
            poll_interval: Duration::from_secs(5),
            poll_while_connected: true,
        }
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_while_connected(mut self, enabled: bool) -> Self {
        self.poll_while_connected = enabled;
        self
    }
}

/// Side effects the caller must perform
#[derive(Debug, Clone, PartialEq)]
pub enum FeedCommand {
    /// Open the push channel, then report `on_open` or `on_close`
    Connect,
    /// Send a message on the open channel
    Send(ClientMessage),
    /// Run a batch fetch and report the result through `on_batch`
    FetchBatch(BatchRequest),
    /// Close the push channel; no `on_close` is expected afterwards
    Disconnect,
}

/// Push channel lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Connecting,
    Open,
    /// Closed unexpectedly; reconnect at `until`
    Waiting { until: Instant },
}

/// Keeps the snapshot for a set of bound entities up to date
#[derive(Debug)]
pub struct LiveFeed {
    config: FeedConfig,
    entity_ids: Vec<String>,
    channel: ChannelState,
    next_poll: Option<Instant>,
    snapshot: Snapshot,
}

impl LiveFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            entity_ids: Vec::new(),
            channel: ChannelState::Idle,
            next_poll: None,
            snapshot: Snapshot::new(),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn channel(&self) -> ChannelState {
        self.channel
    }

    pub fn entity_ids(&self) -> &[String] {
        &self.entity_ids
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether any channel or timer is held
    pub fn is_active(&self) -> bool {
        self.channel != ChannelState::Idle || self.next_poll.is_some()
    }

    /// Replace the set of bound entities
    ///
    /// An empty set releases the channel and all timers.
    pub fn set_entity_ids<I, S>(&mut self, ids: I, now: Instant) -> Vec<FeedCommand>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = sanitize_entity_ids(ids);
        if ids == self.entity_ids && (ids.is_empty() || self.is_active()) {
            return Vec::new();
        }
        if ids.is_empty() {
            self.entity_ids.clear();
            return self.release();
        }

        tracing::debug!(count = ids.len(), "bound entities changed");
        self.entity_ids = ids;
        self.snapshot.retain_ids(&self.entity_ids);

        let mut commands = Vec::new();
        match self.channel {
            ChannelState::Idle => {
                self.channel = ChannelState::Connecting;
                commands.push(FeedCommand::Connect);
            }
            ChannelState::Open => commands.push(FeedCommand::Send(self.subscribe_message())),
            // the subscribe goes out once the channel opens
            ChannelState::Connecting | ChannelState::Waiting { .. } => {}
        }
        commands.push(FeedCommand::FetchBatch(self.batch_request()));
        self.next_poll = Some(now + self.config.poll_interval);
        commands
    }

    /// The push channel connected
    pub fn on_open(&mut self, _now: Instant) -> Vec<FeedCommand> {
        if self.channel != ChannelState::Connecting {
            tracing::debug!(state = ?self.channel, "ignoring open for a channel we did not request");
            return Vec::new();
        }
        if self.entity_ids.is_empty() {
            self.channel = ChannelState::Idle;
            return vec![FeedCommand::Disconnect];
        }
        tracing::info!(count = self.entity_ids.len(), "live channel open");
        self.channel = ChannelState::Open;
        vec![FeedCommand::Send(self.subscribe_message())]
    }

    /// The push channel closed or failed
    pub fn on_close(&mut self, now: Instant) -> Vec<FeedCommand> {
        match self.channel {
            ChannelState::Open | ChannelState::Connecting if !self.entity_ids.is_empty() => {
                let until = now + self.config.reconnect_delay;
                tracing::warn!(
                    delay_ms = self.config.reconnect_delay.as_millis() as u64,
                    "live channel closed, reconnecting"
                );
                self.channel = ChannelState::Waiting { until };
            }
            _ => self.channel = ChannelState::Idle,
        }
        Vec::new()
    }

    /// Apply one raw push message; returns whether the snapshot changed
    pub fn on_text(&mut self, text: &str) -> bool {
        match ServerMessage::parse(text) {
            Ok(msg) => self.on_message(msg),
            Err(err) => {
                tracing::debug!(%err, "ignoring unreadable live message");
                false
            }
        }
    }

    /// Apply one push message; returns whether the snapshot changed
    pub fn on_message(&mut self, msg: ServerMessage) -> bool {
        let (entity_id, state) = msg.into_state();
        if !self.is_bound(&entity_id) {
            tracing::trace!(entity = %entity_id, "ignoring state for unbound entity");
            return false;
        }
        self.snapshot.apply_state(entity_id, state)
    }

    /// Merge a batch fetch result; returns how many entities changed
    pub fn on_batch(&mut self, response: BatchResponse) -> usize {
        let bound: Vec<_> = response
            .states
            .into_iter()
            .filter(|(id, _)| self.is_bound(id))
            .collect();
        self.snapshot.merge_batch(bound)
    }

    /// Fire any timers due at `now`
    pub fn poll(&mut self, now: Instant) -> Vec<FeedCommand> {
        let mut commands = Vec::new();
        if let ChannelState::Waiting { until } = self.channel {
            if now >= until {
                tracing::debug!("reconnecting live channel");
                self.channel = ChannelState::Connecting;
                commands.push(FeedCommand::Connect);
            }
        }
        if let Some(due) = self.next_poll {
            if now >= due {
                if self.config.poll_while_connected || self.channel != ChannelState::Open {
                    commands.push(FeedCommand::FetchBatch(self.batch_request()));
                }
                self.next_poll = Some(now + self.config.poll_interval);
            }
        }
        commands
    }

    /// Earliest instant at which `poll` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let reconnect = match self.channel {
            ChannelState::Waiting { until } => Some(until),
            _ => None,
        };
        match (reconnect, self.next_poll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Tear down: drop the channel, the timers and the bound set
    pub fn shutdown(&mut self) -> Vec<FeedCommand> {
        self.entity_ids.clear();
        self.release()
    }

    fn release(&mut self) -> Vec<FeedCommand> {
        let mut commands = Vec::new();
        match self.channel {
            ChannelState::Open => {
                commands.push(FeedCommand::Send(ClientMessage::Unsubscribe));
                commands.push(FeedCommand::Disconnect);
            }
            ChannelState::Connecting => commands.push(FeedCommand::Disconnect),
            ChannelState::Idle | ChannelState::Waiting { .. } => {}
        }
        if self.is_active() {
            tracing::info!("live feed released");
        }
        self.channel = ChannelState::Idle;
        self.next_poll = None;
        commands
    }

    fn is_bound(&self, entity_id: &str) -> bool {
        self.entity_ids.iter().any(|id| id == entity_id)
    }

    fn subscribe_message(&self) -> ClientMessage {
        ClientMessage::Subscribe {
            entity_ids: self.entity_ids.clone(),
        }
    }

    fn batch_request(&self) -> BatchRequest {
        BatchRequest {
            entity_ids: self.entity_ids.clone(),
        }
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}
